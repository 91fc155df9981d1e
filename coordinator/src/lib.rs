#![allow(clippy::missing_docs_in_private_items)]

mod flow;
pub mod requests;
pub mod service;
pub mod source;
mod state;

pub use requests::{FacetRequest, IndexRequest, IndexSummary, SearchRequest};
pub use service::Coordinator;
