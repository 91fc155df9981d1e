mod args;

use std::sync::Arc;

use anyhow::{Context, Result};
use args::{Cli, Command, IndexArgs};
use clap::Parser;
use common::{storage::solr::SolrClient, utils::config::get_config};
use coordinator::{Coordinator, FacetRequest, IndexRequest, SearchRequest};
use serde_json::{json, Value};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();

    let cli = Cli::parse();

    let mut config = get_config().context("failed to load configuration")?;
    cli.engine.apply(&mut config);

    let engine = Arc::new(SolrClient::from_config(&config).context("invalid Solr endpoint")?);
    info!(solr = %engine.base_url(), "Search engine client initialized");

    let coordinator = Coordinator::new(engine, config);
    execute(&coordinator, cli.command).await
}

fn index_request(collection: String, index: IndexArgs) -> IndexRequest {
    IndexRequest {
        collection,
        source_path: index.source,
        exclude_column: index.exclude,
        id_field: index.id_field,
    }
}

fn emit(step: &str, value: &Value) {
    println!("{}", json!({ "step": step, "result": value }));
}

async fn execute(coordinator: &Coordinator, command: Command) -> Result<()> {
    match command {
        Command::CreateCollection { collection } => {
            let (collection, ack) = coordinator.create_collection(&collection).await?;
            emit("create_collection", &json!({ "collection": collection, "status": ack }));
        }
        Command::Index { collection, index } => {
            let summary = coordinator
                .index_from_source(index_request(collection, index))
                .await?;
            emit("index", &json!(summary));
        }
        Command::Search {
            collection,
            column,
            value,
            rows,
        } => {
            let results = coordinator
                .search(SearchRequest {
                    collection,
                    field: column,
                    value,
                    rows,
                })
                .await?;
            emit("search", &json!({ "results": results }));
        }
        Command::Count { collection } => {
            let count = coordinator.count(&collection).await?;
            emit("count", &json!({ "count": count }));
        }
        Command::Delete { collection, id } => {
            coordinator.delete_by_id(&collection, &id).await?;
            emit("delete", &json!({ "id": id }));
        }
        Command::Facet { collection, field } => {
            let facets = coordinator
                .facet(FacetRequest { collection, field })
                .await?;
            emit("facet", &json!({ "facets": facets }));
        }
        Command::Run {
            collection,
            index,
            delete_id,
            search,
        } => run(coordinator, collection, index, delete_id, search).await?,
    }
    Ok(())
}

/// Scripted walk through every operation against one collection. Stops at the first failure.
async fn run(
    coordinator: &Coordinator,
    collection: String,
    index: IndexArgs,
    delete_id: Option<String>,
    search: Option<(String, String)>,
) -> Result<()> {
    let (name, ack) = coordinator
        .create_collection(&collection)
        .await
        .context("create collection")?;
    emit("create_collection", &json!({ "collection": name, "status": ack }));

    let summary = coordinator
        .index_from_source(index_request(collection.clone(), index))
        .await
        .context("index source")?;
    emit("index", &json!(summary));

    let count = coordinator.count(&collection).await.context("count")?;
    emit("count", &json!({ "count": count }));

    if let Some(id) = delete_id {
        coordinator
            .delete_by_id(&collection, &id)
            .await
            .context("delete by id")?;
        emit("delete", &json!({ "id": id }));

        let count = coordinator.count(&collection).await.context("count")?;
        emit("count", &json!({ "count": count }));
    }

    if let Some((column, value)) = search {
        let results = coordinator
            .search(SearchRequest {
                collection: collection.clone(),
                field: column,
                value,
                rows: None,
            })
            .await
            .context("search")?;
        emit("search", &json!({ "results": results }));
    }

    let facets = coordinator
        .facet(FacetRequest {
            collection,
            field: None,
        })
        .await
        .context("facet")?;
    emit("facet", &json!({ "facets": facets }));

    Ok(())
}
