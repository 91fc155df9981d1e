use std::sync::Arc;

use common::{storage::engine::SearchEngine, utils::config::AppConfig};
use coordinator::Coordinator;

#[derive(Clone)]
pub struct ApiState {
    pub coordinator: Coordinator,
}

impl ApiState {
    pub fn new(engine: Arc<dyn SearchEngine>, config: AppConfig) -> Self {
        Self {
            coordinator: Coordinator::new(engine, config),
        }
    }
}
