use common::utils::config::AppConfig;

use crate::transform::{MalformedRowPolicy, DEFAULT_UNIQUE_KEY};

#[derive(Debug, Clone)]
pub struct IngestionConfig {
    pub exclude_column: Option<String>,
    pub id_field: Option<String>,
    pub unique_key: String,
    pub on_malformed: MalformedRowPolicy,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            exclude_column: None,
            id_field: None,
            unique_key: DEFAULT_UNIQUE_KEY.to_string(),
            on_malformed: MalformedRowPolicy::default(),
        }
    }
}

impl From<&AppConfig> for IngestionConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            exclude_column: config.exclude_column.clone(),
            id_field: config.id_field.clone(),
            unique_key: config.unique_key.clone(),
            on_malformed: if config.skip_malformed_rows {
                MalformedRowPolicy::Skip
            } else {
                MalformedRowPolicy::Abort
            },
        }
    }
}
