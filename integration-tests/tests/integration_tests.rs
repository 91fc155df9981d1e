use axum::http::StatusCode;
use common::storage::memory::EngineOp;
use serde_json::{json, Value};

use test_utils::*;

/// Integration tests for the Solr gateway over real HTTP.
/// The engine behind the gateway is the in-memory stand-in.

async fn create(gateway: &TestGateway, collection: &str) -> Value {
    gateway
        .client
        .post(gateway.url("/createCollection"))
        .json(&json!({ "collectionName": collection }))
        .send()
        .await
        .expect("Failed to send create request")
        .json()
        .await
        .expect("Failed to decode create response")
}

async fn index(gateway: &TestGateway, body: Value) -> (StatusCode, Value) {
    let response = gateway
        .client
        .post(gateway.url("/indexDataFromCSV"))
        .json(&body)
        .send()
        .await
        .expect("Failed to send index request");
    let status = StatusCode::from_u16(response.status().as_u16()).expect("status");
    (status, response.json().await.expect("Failed to decode index response"))
}

async fn get(gateway: &TestGateway, path: &str, query: &[(&str, &str)]) -> (StatusCode, Value) {
    let response = gateway
        .client
        .get(gateway.url(path))
        .query(query)
        .send()
        .await
        .expect("Failed to send GET request");
    let status = StatusCode::from_u16(response.status().as_u16()).expect("status");
    (status, response.json().await.expect("Failed to decode response"))
}

async fn count(gateway: &TestGateway, collection: &str) -> u64 {
    let (status, body) = get(gateway, "/getEmpCount", &[("collectionName", collection)]).await;
    assert_eq!(status, StatusCode::OK);
    body["count"].as_u64().expect("count should be a number")
}

#[tokio::test]
async fn test_employee_lifecycle() {
    let gateway = spawn_gateway().await;
    let collection = collection_name("emp");

    let created = create(&gateway, &collection).await;
    assert_eq!(created["status"], "created");

    let (status, indexed) = index(
        &gateway,
        json!({
            "collectionName": collection,
            "excludeColumn": "Department",
            "idField": "EEID"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(indexed["count"], 5);
    assert_eq!(count(&gateway, &collection).await, 5);

    let deleted = gateway
        .client
        .delete(gateway.url("/delEmpById"))
        .json(&json!({ "collectionName": collection, "employeeId": "E02003" }))
        .send()
        .await
        .expect("Failed to send delete request");
    assert_eq!(deleted.status().as_u16(), 200);
    assert_eq!(count(&gateway, &collection).await, 4);

    let (status, found) = get(
        &gateway,
        "/searchByColumn",
        &[
            ("collectionName", collection.as_str()),
            ("columnName", "Gender"),
            ("columnValue", "Male"),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let results = found["results"].as_array().expect("results array");
    assert_eq!(results.len(), 2);
    for doc in results {
        assert_eq!(doc["Gender"], "Male");
        assert!(doc.get("Department").is_none());
        assert_ne!(doc["id"], "E02003");
    }
}

#[tokio::test]
async fn test_documents_keep_column_order() {
    let gateway = spawn_gateway().await;
    let collection = collection_name("order");
    create(&gateway, &collection).await;
    index(
        &gateway,
        json!({ "collectionName": collection, "excludeColumn": "Ethnicity" }),
    )
    .await;

    let (_, found) = get(
        &gateway,
        "/searchByColumn",
        &[
            ("collectionName", collection.as_str()),
            ("columnName", "EEID"),
            ("columnValue", "E02004"),
        ],
    )
    .await;
    let doc = found["results"][0].as_object().expect("document");
    let columns: Vec<&str> = doc.keys().map(String::as_str).collect();
    assert_eq!(
        columns,
        vec![
            "id",
            "EEID",
            "Full Name",
            "Job Title",
            "Department",
            "Business Unit",
            "Gender",
            "Age"
        ]
    );
    assert_eq!(doc["id"], "E02004");
    assert_eq!(doc["Business Unit"], "Research & Development");
}

#[tokio::test]
async fn test_search_values_are_escaped() {
    let gateway = spawn_gateway().await;
    let collection = collection_name("escape");
    create(&gateway, &collection).await;
    index(&gateway, json!({ "collectionName": collection })).await;

    let (status, found) = get(
        &gateway,
        "/searchByColumn",
        &[
            ("collectionName", collection.as_str()),
            ("columnName", "Gender"),
            ("columnValue", "Male OR *:*"),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["results"], json!([]));

    let (_, found) = get(
        &gateway,
        "/searchByColumn",
        &[
            ("collectionName", collection.as_str()),
            ("columnName", "Business Unit"),
            ("columnValue", "Research & Development"),
        ],
    )
    .await;
    assert_eq!(found["results"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_department_facet() {
    let gateway = spawn_gateway().await;
    let collection = collection_name("facet");
    create(&gateway, &collection).await;
    index(&gateway, json!({ "collectionName": collection })).await;

    let (status, body) = get(
        &gateway,
        "/getDepFacet",
        &[("collectionName", collection.as_str())],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["facets"],
        json!([
            { "value": "Engineering", "count": 2 },
            { "value": "IT", "count": 2 },
            { "value": "Sales", "count": 1 }
        ])
    );

    let (_, body) = get(
        &gateway,
        "/getDepFacet",
        &[("collectionName", collection.as_str()), ("facetField", "Gender")],
    )
    .await;
    assert_eq!(body["facets"][0], json!({ "value": "Male", "count": 3 }));
}

#[tokio::test]
async fn test_malformed_source_indexes_nothing() {
    let gateway = spawn_gateway().await;
    gateway.write_source("broken.csv", "EEID,Gender\nE1,Male\nE2,Female,extra\n");
    let collection = collection_name("broken");
    create(&gateway, &collection).await;

    let (status, body) = index(
        &gateway,
        json!({ "collectionName": collection, "sourcePath": "broken.csv" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "malformed_row");
    assert_eq!(count(&gateway, &collection).await, 0);
    assert_eq!(gateway.engine.pending_count(&collection), 0);
}

#[tokio::test]
async fn test_skip_policy_indexes_well_formed_rows() {
    let gateway = spawn_gateway_with(|config| config.skip_malformed_rows = true).await;
    gateway.write_source("broken.csv", "EEID,Gender\nE1,Male\nE2,Female,extra\nE3,Male\n");
    let collection = collection_name("skip");
    create(&gateway, &collection).await;

    let (status, body) = index(
        &gateway,
        json!({ "collectionName": collection, "sourcePath": "broken.csv" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn test_commit_failure_is_partial() {
    let gateway = spawn_gateway().await;
    let collection = collection_name("partial");
    create(&gateway, &collection).await;
    gateway.engine.fail_on(EngineOp::Commit);

    let (status, body) = index(&gateway, json!({ "collectionName": collection })).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["status"], "partial");
    assert_eq!(body["kind"], "commit_failure");
    assert_eq!(gateway.engine.pending_count(&collection), 5);
}

#[tokio::test]
async fn test_source_path_confinement() {
    let gateway = spawn_gateway().await;
    let collection = collection_name("confined");
    create(&gateway, &collection).await;

    let (status, body) = index(
        &gateway,
        json!({ "collectionName": collection, "sourcePath": "../../etc/passwd" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation");
}

#[tokio::test]
async fn test_engine_outage_surfaces_as_bad_gateway() {
    let gateway = spawn_gateway().await;
    let collection = collection_name("outage");
    create(&gateway, &collection).await;
    index(&gateway, json!({ "collectionName": collection })).await;
    gateway.engine.fail_on(EngineOp::Search);

    let (status, body) = get(
        &gateway,
        "/getEmpCount",
        &[("collectionName", collection.as_str())],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["kind"], "query_error");
    assert_eq!(body["status"], "error");

    gateway.engine.recover(EngineOp::Search);
    assert_eq!(count(&gateway, &collection).await, 5);
}

#[tokio::test]
async fn test_delete_works_with_the_default_source_key() {
    let gateway = spawn_gateway().await;
    let collection = collection_name("keyed");
    create(&gateway, &collection).await;

    let (status, _) = index(
        &gateway,
        json!({ "collectionName": collection, "excludeColumn": "Department" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(count(&gateway, &collection).await, 5);

    let deleted = gateway
        .client
        .delete(gateway.url("/delEmpById"))
        .json(&json!({ "collectionName": collection, "employeeId": "E02003" }))
        .send()
        .await
        .expect("Failed to send delete request");
    assert_eq!(deleted.status().as_u16(), 200);
    assert_eq!(count(&gateway, &collection).await, 4);
}
