use api_state::ApiState;
use axum::{
    extract::FromRef,
    routing::{delete, get, post},
    Router,
};
use routes::{
    collections::create_collection, count::get_emp_count, delete::del_emp_by_id,
    facet::get_dep_facet, ingest::index_data_from_csv, liveness::live, readiness::ready,
    search::search_by_column,
};

pub mod api_state;
pub mod error;
mod extract;
mod routes;

/// Gateway and probe routes, mounted at the root.
pub fn api_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    ApiState: FromRef<S>,
{
    // Probes for k8s/systemd
    let probes = Router::new()
        .route("/ready", get(ready))
        .route("/live", get(live));

    let gateway = Router::new()
        .route("/createCollection", post(create_collection))
        .route("/indexDataFromCSV", post(index_data_from_csv))
        .route("/searchByColumn", get(search_by_column))
        .route("/getEmpCount", get(get_emp_count))
        .route("/delEmpById", delete(del_emp_by_id))
        .route("/getDepFacet", get(get_dep_facet));

    probes.merge(gateway)
}
