use common::utils::config::AppConfig;

#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Rows returned by a field search when the caller gives no limit.
    pub default_rows: u32,
    pub facet_min_count: u32,
    pub facet_limit: Option<i64>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_rows: 10,
            facet_min_count: 1,
            facet_limit: None,
        }
    }
}

impl From<&AppConfig> for RetrievalConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            default_rows: config.search_rows,
            facet_min_count: config.facet_min_count,
            facet_limit: config.facet_limit,
        }
    }
}
