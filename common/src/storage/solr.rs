use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument};
use url::Url;

use super::{
    engine::{EngineError, FacetBucket, SearchEngine, SearchQuery, SearchResult},
    types::{Document, Record},
};
use crate::utils::config::AppConfig;

/// Longest slice of a non-JSON error body carried into an error message.
const ERROR_BODY_LIMIT: usize = 512;

/// `SearchEngine` backed by a Solr node's HTTP API.
#[derive(Clone, Debug)]
pub struct SolrClient {
    http: Client,
    base: Url,
}

impl SolrClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, EngineError> {
        let base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(EngineError::Url(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, EngineError> {
        Self::new(
            &config.solr_base_url(),
            config.request_timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Builds `<base>/<segments..>?wt=json`, escaping each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, EngineError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| EngineError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut().append_pair("wt", "json");
        Ok(url)
    }

    async fn read_json(response: Response) -> Result<Value, EngineError> {
        let status = response.status();
        let body = response.text().await?;
        let parsed: Option<Value> = serde_json::from_str(&body).ok();

        if let Some(message) = parsed.as_ref().and_then(error_message) {
            return Err(EngineError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        if !status.is_success() {
            return Err(EngineError::Rejected {
                status: status.as_u16(),
                message: truncate(&body),
            });
        }

        parsed.ok_or_else(|| EngineError::Decode(format!("non-JSON body: {}", truncate(&body))))
    }

    async fn post_update(
        &self,
        collection: &str,
        body: &Value,
        commit: bool,
    ) -> Result<Value, EngineError> {
        let mut url = self.endpoint(&[collection, "update"])?;
        if commit {
            url.query_pairs_mut().append_pair("commit", "true");
        }
        let response = self.http.post(url).json(body).send().await?;
        Self::read_json(response).await
    }
}

#[async_trait]
impl SearchEngine for SolrClient {
    async fn ping(&self) -> Result<(), EngineError> {
        let url = self.endpoint(&["admin", "info", "system"])?;
        let response = self.http.get(url).send().await?;
        Self::read_json(response).await.map(|_| ())
    }

    async fn list_collections(&self) -> Result<Vec<String>, EngineError> {
        let mut url = self.endpoint(&["admin", "collections"])?;
        url.query_pairs_mut().append_pair("action", "LIST");

        let value = Self::read_json(self.http.get(url).send().await?).await?;
        parse_collection_list(&value)
    }

    #[instrument(skip(self))]
    async fn create_collection(
        &self,
        name: &str,
        shard_count: u32,
        replication_factor: u32,
    ) -> Result<(), EngineError> {
        let mut url = self.endpoint(&["admin", "collections"])?;
        url.query_pairs_mut()
            .append_pair("action", "CREATE")
            .append_pair("name", name)
            .append_pair("numShards", &shard_count.to_string())
            .append_pair("replicationFactor", &replication_factor.to_string());

        Self::read_json(self.http.get(url).send().await?).await?;
        debug!(collection = name, "solr collection created");
        Ok(())
    }

    async fn add_documents(&self, collection: &str, records: &[Record]) -> Result<(), EngineError> {
        let body = serde_json::to_value(records)
            .map_err(|e| EngineError::Decode(format!("failed to encode documents: {e}")))?;
        self.post_update(collection, &body, false).await?;
        debug!(collection, documents = records.len(), "documents sent to solr");
        Ok(())
    }

    async fn commit(&self, collection: &str) -> Result<(), EngineError> {
        self.post_update(collection, &json!({ "commit": {} }), false)
            .await
            .map(|_| ())
    }

    async fn search(
        &self,
        collection: &str,
        query: &SearchQuery,
    ) -> Result<SearchResult, EngineError> {
        let mut url = self.endpoint(&[collection, "select"])?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in select_params(query) {
                pairs.append_pair(key, &value);
            }
        }
        debug!(collection, q = %query.q, "solr select");

        let value = Self::read_json(self.http.get(url).send().await?).await?;
        parse_select(value)
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<(), EngineError> {
        self.post_update(collection, &json!({ "delete": { "id": id } }), true)
            .await
            .map(|_| ())
    }
}

/// Query-string parameters for `/select`, excluding `wt`.
fn select_params(query: &SearchQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![("q", query.q.clone())];
    if let Some(rows) = query.rows {
        params.push(("rows", rows.to_string()));
    }
    if let Some(facet) = &query.facet {
        params.push(("facet", "true".to_string()));
        params.push(("facet.field", facet.field.clone()));
        params.push(("facet.mincount", facet.min_count.to_string()));
        if let Some(limit) = facet.limit {
            params.push(("facet.limit", limit.to_string()));
        }
    }
    params
}

fn error_message(value: &Value) -> Option<String> {
    if let Some(error) = value.get("error") {
        return Some(
            error
                .get("msg")
                .and_then(Value::as_str)
                .map_or_else(|| error.to_string(), str::to_string),
        );
    }
    // The collections API reports per-node failures next to a zero status.
    value.get("failure").map(Value::to_string)
}

fn truncate(body: &str) -> String {
    body.chars().take(ERROR_BODY_LIMIT).collect()
}

fn parse_collection_list(value: &Value) -> Result<Vec<String>, EngineError> {
    let collections = value
        .get("collections")
        .and_then(Value::as_array)
        .ok_or_else(|| EngineError::Decode("missing 'collections' in LIST response".into()))?;

    Ok(collections
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect())
}

#[derive(Deserialize)]
struct SelectResponse {
    response: Option<DocList>,
    facet_counts: Option<FacetCounts>,
}

#[derive(Deserialize)]
struct DocList {
    #[serde(rename = "numFound")]
    num_found: u64,
    #[serde(default)]
    docs: Vec<Document>,
}

#[derive(Deserialize)]
struct FacetCounts {
    #[serde(default)]
    facet_fields: HashMap<String, Vec<Value>>,
}

fn parse_select(value: Value) -> Result<SearchResult, EngineError> {
    let raw: SelectResponse = serde_json::from_value(value)
        .map_err(|e| EngineError::Decode(format!("malformed select response: {e}")))?;
    let doc_list = raw
        .response
        .ok_or_else(|| EngineError::Decode("select response has no 'response' block".into()))?;

    let mut facets = HashMap::new();
    if let Some(counts) = raw.facet_counts {
        for (field, flat) in counts.facet_fields {
            facets.insert(field, parse_facet_pairs(&flat)?);
        }
    }

    Ok(SearchResult {
        documents: doc_list.docs,
        total_found: doc_list.num_found,
        facets,
    })
}

/// Solr's default `json.nl=flat` layout: `["IT", 3, "HR", 1]`.
fn parse_facet_pairs(flat: &[Value]) -> Result<Vec<FacetBucket>, EngineError> {
    let pairs = flat.chunks_exact(2);
    if !pairs.remainder().is_empty() {
        return Err(EngineError::Decode(
            "facet list has an odd number of entries".into(),
        ));
    }

    pairs
        .map(|pair| match pair {
            [value, count] => {
                let count = count.as_u64().ok_or_else(|| {
                    EngineError::Decode(format!("facet count is not an integer: {count}"))
                })?;
                let value = match value {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                Ok(FacetBucket { value, count })
            }
            _ => Err(EngineError::Decode("facet pair is incomplete".into())),
        })
        .collect()
}
