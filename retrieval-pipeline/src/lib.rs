pub mod mapper;
pub mod pipeline;
pub mod query;

pub use pipeline::{RetrievalConfig, RetrievalPipeline};
