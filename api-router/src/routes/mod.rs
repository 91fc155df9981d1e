pub mod collections;
pub mod count;
pub mod delete;
pub mod facet;
pub mod ingest;
pub mod liveness;
pub mod readiness;
pub mod search;
