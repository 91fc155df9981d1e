use std::sync::Arc;

use api_router::{api_routes, api_state::ApiState};
use axum::{extract::FromRef, Router};
use common::{storage::solr::SolrClient, utils::config::get_config};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set up tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();

    // Get config
    let config = get_config()?;

    let engine = Arc::new(SolrClient::from_config(&config)?);
    info!(solr = %engine.base_url(), "Search engine client initialized");

    let app = app(ApiState::new(engine, config.clone()));

    info!("Starting server listening on 0.0.0.0:{}", config.http_port);
    let serve_address = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(serve_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn app(api_state: ApiState) -> Router {
    Router::new()
        .merge(api_routes())
        .with_state(AppState { api_state })
}

#[derive(Clone, FromRef)]
struct AppState {
    api_state: ApiState,
}
