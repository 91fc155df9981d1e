use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Clone, Deserialize, Debug)]
pub struct AppConfig {
    #[serde(default = "default_solr_protocol")]
    pub solr_protocol: String,
    #[serde(default = "default_solr_host")]
    pub solr_host: String,
    #[serde(default = "default_solr_port")]
    pub solr_port: u16,
    #[serde(default = "default_solr_path")]
    pub solr_path: String,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_csv_path")]
    pub csv_path: String,
    #[serde(default)]
    pub exclude_column: Option<String>,
    #[serde(default = "default_id_field")]
    pub id_field: Option<String>,
    #[serde(default = "default_unique_key")]
    pub unique_key: String,
    #[serde(default)]
    pub default_collection: Option<String>,
    #[serde(default)]
    pub skip_malformed_rows: bool,
    #[serde(default = "default_true")]
    pub verify_collections: bool,
    #[serde(default = "default_facet_field")]
    pub facet_field: String,
    #[serde(default = "default_facet_min_count")]
    pub facet_min_count: u32,
    #[serde(default)]
    pub facet_limit: Option<i64>,
    #[serde(default = "default_search_rows")]
    pub search_rows: u32,
    #[serde(default = "default_one")]
    pub shard_count: u32,
    #[serde(default = "default_one")]
    pub replication_factor: u32,
}

fn default_solr_protocol() -> String {
    "http".to_string()
}

fn default_solr_host() -> String {
    "localhost".to_string()
}

fn default_solr_port() -> u16 {
    8989
}

fn default_solr_path() -> String {
    "/solr".to_string()
}

fn default_http_port() -> u16 {
    3000
}

fn default_data_dir() -> String {
    ".".to_string()
}

fn default_csv_path() -> String {
    "Employee Sample Data 1.csv".to_string()
}

fn default_id_field() -> Option<String> {
    Some("EEID".to_string())
}

fn default_unique_key() -> String {
    "id".to_string()
}

fn default_facet_field() -> String {
    "Department".to_string()
}

fn default_facet_min_count() -> u32 {
    1
}

fn default_search_rows() -> u32 {
    10
}

fn default_one() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            solr_protocol: default_solr_protocol(),
            solr_host: default_solr_host(),
            solr_port: default_solr_port(),
            solr_path: default_solr_path(),
            request_timeout_secs: None,
            http_port: default_http_port(),
            data_dir: default_data_dir(),
            csv_path: default_csv_path(),
            exclude_column: None,
            id_field: default_id_field(),
            unique_key: default_unique_key(),
            default_collection: None,
            skip_malformed_rows: false,
            verify_collections: true,
            facet_field: default_facet_field(),
            facet_min_count: default_facet_min_count(),
            facet_limit: None,
            search_rows: default_search_rows(),
            shard_count: default_one(),
            replication_factor: default_one(),
        }
    }
}

impl AppConfig {
    /// Base URL of the Solr node, e.g. `http://localhost:8989/solr`.
    pub fn solr_base_url(&self) -> String {
        let path = self.solr_path.trim_end_matches('/');
        let path = if path.is_empty() || path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        format!(
            "{}://{}:{}{}",
            self.solr_protocol, self.solr_host, self.solr_port, path
        )
    }
}

pub fn get_config() -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::with_name("config").required(false))
        .add_source(Environment::default())
        .build()?;

    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sources_fall_back_to_defaults() {
        let config: AppConfig = Config::builder()
            .build()
            .and_then(Config::try_deserialize)
            .expect("defaults should deserialize");

        assert_eq!(config.solr_host, "localhost");
        assert_eq!(config.solr_port, 8989);
        assert_eq!(config.facet_field, "Department");
        assert_eq!(config.facet_min_count, 1);
        assert_eq!(config.shard_count, 1);
        assert_eq!(config.replication_factor, 1);
        assert!(config.verify_collections);
        assert!(!config.skip_malformed_rows);
        assert_eq!(config.id_field.as_deref(), Some("EEID"));
        assert_eq!(config.unique_key, "id");
    }

    #[test]
    fn overrides_are_applied() {
        let config: AppConfig = Config::builder()
            .set_override("solr_host", "solr.internal")
            .expect("override")
            .set_override("solr_port", 8983_i64)
            .expect("override")
            .set_override("exclude_column", "Department")
            .expect("override")
            .build()
            .and_then(Config::try_deserialize)
            .expect("overrides should deserialize");

        assert_eq!(config.solr_host, "solr.internal");
        assert_eq!(config.solr_port, 8983);
        assert_eq!(config.exclude_column.as_deref(), Some("Department"));
    }

    #[test]
    fn base_url_normalises_path() {
        let mut config = AppConfig::default();
        assert_eq!(config.solr_base_url(), "http://localhost:8989/solr");

        config.solr_path = "solr/".into();
        assert_eq!(config.solr_base_url(), "http://localhost:8989/solr");

        config.solr_path = String::new();
        assert_eq!(config.solr_base_url(), "http://localhost:8989");
    }
}
