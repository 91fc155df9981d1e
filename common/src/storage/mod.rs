pub mod collections;
pub mod engine;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod solr;
pub mod types;
