#![allow(clippy::missing_docs_in_private_items, clippy::result_large_err)]

pub mod pipeline;
pub mod submit;
pub mod transform;

pub use pipeline::{IngestionConfig, IngestionPipeline};
pub use submit::BatchSubmitter;
pub use transform::{MalformedRowPolicy, RowTransformer, TransformPolicy};
