use clap::{Args, Parser, Subcommand};
use common::utils::config::AppConfig;

#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Manage and query employee collections in Solr",
    long_about = None
)]
pub struct Cli {
    #[command(flatten)]
    pub engine: EngineArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Overrides for the configured Solr endpoint.
#[derive(Debug, Clone, Args)]
pub struct EngineArgs {
    /// Solr host name
    #[arg(long, global = true)]
    pub solr_host: Option<String>,

    /// Solr port
    #[arg(long, global = true)]
    pub solr_port: Option<u16>,

    /// Solr context path, e.g. /solr
    #[arg(long, global = true)]
    pub solr_path: Option<String>,
}

impl EngineArgs {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.solr_host {
            config.solr_host.clone_from(host);
        }
        if let Some(port) = self.solr_port {
            config.solr_port = port;
        }
        if let Some(path) = &self.solr_path {
            config.solr_path.clone_from(path);
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct IndexArgs {
    /// Column to drop from every row
    #[arg(long)]
    pub exclude: Option<String>,

    /// CSV path relative to the data directory; defaults to the configured CSV
    #[arg(long)]
    pub source: Option<String>,

    /// Column copied into the unique `id` field
    #[arg(long)]
    pub id_field: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create a collection (no-op when it already exists)
    CreateCollection { collection: String },

    /// Index the CSV source into a collection
    Index {
        collection: String,
        #[command(flatten)]
        index: IndexArgs,
    },

    /// Exact-match search on one column
    Search {
        collection: String,
        column: String,
        value: String,
        #[arg(long)]
        rows: Option<u32>,
    },

    /// Number of documents in a collection
    Count { collection: String },

    /// Delete one document by id
    Delete { collection: String, id: String },

    /// Facet counts for a field
    Facet {
        collection: String,
        /// Defaults to the configured facet field
        #[arg(long)]
        field: Option<String>,
    },

    /// Create, index, count, delete, count, search and facet in one go
    Run {
        collection: String,
        #[command(flatten)]
        index: IndexArgs,

        /// Id to delete after indexing
        #[arg(long)]
        delete_id: Option<String>,

        /// Search as COLUMN=VALUE after the delete
        #[arg(long, value_parser = parse_column_value)]
        search: Option<(String, String)>,
    },
}

fn parse_column_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(column, value)| (column.trim().to_string(), value.trim().to_string()))
        .filter(|(column, value)| !column.is_empty() && !value.is_empty())
        .ok_or_else(|| format!("expected COLUMN=VALUE, got '{raw}'"))
}
