use std::{
    collections::{HashMap, HashSet},
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use serde_json::Value;

use super::{
    engine::{EngineError, FacetBucket, SearchEngine, SearchQuery, SearchResult},
    types::{Document, Record},
};

const UNIQUE_KEY: &str = "id";
const DEFAULT_ROWS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineOp {
    Ping,
    ListCollections,
    CreateCollection,
    AddDocuments,
    Commit,
    Search,
    DeleteById,
}

#[derive(Default)]
struct MemCollection {
    committed: Vec<Document>,
    pending: Vec<Document>,
}

fn upsert(docs: &mut Vec<Document>, doc: Document) {
    let key = doc.get(UNIQUE_KEY).cloned();
    if let Some(key) = key {
        if let Some(existing) = docs.iter_mut().find(|d| d.get(UNIQUE_KEY) == Some(&key)) {
            *existing = doc;
            return;
        }
    }
    docs.push(doc);
}

/// In-process stand-in for Solr: documents become visible on commit, `id` is the unique key.
#[derive(Default)]
pub struct InMemoryEngine {
    collections: Mutex<HashMap<String, MemCollection>>,
    failing: Mutex<HashSet<EngineOp>>,
}

impl InMemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call of `op` fail until `recover` is called.
    pub fn fail_on(&self, op: EngineOp) {
        lock(&self.failing).insert(op);
    }

    pub fn recover(&self, op: EngineOp) {
        lock(&self.failing).remove(&op);
    }

    /// Documents added but not yet committed.
    pub fn pending_count(&self, collection: &str) -> usize {
        lock(&self.collections)
            .get(collection)
            .map_or(0, |c| c.pending.len())
    }

    fn check(&self, op: EngineOp) -> Result<(), EngineError> {
        if lock(&self.failing).contains(&op) {
            return Err(EngineError::Rejected {
                status: 500,
                message: format!("injected failure for {op:?}"),
            });
        }
        Ok(())
    }

    fn with_collection<T>(
        &self,
        name: &str,
        f: impl FnOnce(&mut MemCollection) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let mut collections = lock(&self.collections);
        let collection = collections.get_mut(name).ok_or_else(|| EngineError::Rejected {
            status: 404,
            message: format!("Collection not found: {name}"),
        })?;
        f(collection)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[async_trait]
impl SearchEngine for InMemoryEngine {
    async fn ping(&self) -> Result<(), EngineError> {
        self.check(EngineOp::Ping)
    }

    async fn list_collections(&self) -> Result<Vec<String>, EngineError> {
        self.check(EngineOp::ListCollections)?;
        let mut names: Vec<String> = lock(&self.collections).keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn create_collection(
        &self,
        name: &str,
        _shard_count: u32,
        _replication_factor: u32,
    ) -> Result<(), EngineError> {
        self.check(EngineOp::CreateCollection)?;
        let mut collections = lock(&self.collections);
        if collections.contains_key(name) {
            return Err(EngineError::Rejected {
                status: 400,
                message: format!("collection already exists: {name}"),
            });
        }
        collections.insert(name.to_string(), MemCollection::default());
        Ok(())
    }

    async fn add_documents(&self, collection: &str, records: &[Record]) -> Result<(), EngineError> {
        self.check(EngineOp::AddDocuments)?;
        self.with_collection(collection, |c| {
            for record in records {
                upsert(&mut c.pending, record.to_document());
            }
            Ok(())
        })
    }

    async fn commit(&self, collection: &str) -> Result<(), EngineError> {
        self.check(EngineOp::Commit)?;
        self.with_collection(collection, |c| {
            for doc in std::mem::take(&mut c.pending) {
                upsert(&mut c.committed, doc);
            }
            Ok(())
        })
    }

    async fn search(
        &self,
        collection: &str,
        query: &SearchQuery,
    ) -> Result<SearchResult, EngineError> {
        self.check(EngineOp::Search)?;
        let matcher = Matcher::parse(&query.q)?;

        self.with_collection(collection, |c| {
            let hits: Vec<&Document> = c.committed.iter().filter(|d| matcher.matches(d)).collect();
            let rows = query
                .rows
                .map_or(DEFAULT_ROWS, |rows| usize::try_from(rows).unwrap_or(usize::MAX));

            let mut facets = HashMap::new();
            if let Some(spec) = &query.facet {
                let mut counts: HashMap<String, u64> = HashMap::new();
                for doc in &hits {
                    if let Some(value) = doc.get(&spec.field) {
                        *counts.entry(value_text(value)).or_default() += 1;
                    }
                }
                let mut buckets: Vec<FacetBucket> = counts
                    .into_iter()
                    .filter(|(_, count)| *count >= u64::from(spec.min_count))
                    .map(|(value, count)| FacetBucket { value, count })
                    .collect();
                buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
                if let Some(limit) = spec.limit.and_then(|l| usize::try_from(l).ok()) {
                    buckets.truncate(limit);
                }
                facets.insert(spec.field.clone(), buckets);
            }

            Ok(SearchResult {
                total_found: hits.len() as u64,
                documents: hits.into_iter().take(rows).cloned().collect(),
                facets,
            })
        })
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<(), EngineError> {
        self.check(EngineOp::DeleteById)?;
        self.with_collection(collection, |c| {
            let key = Value::String(id.to_string());
            c.committed.retain(|d| d.get(UNIQUE_KEY) != Some(&key));
            c.pending.retain(|d| d.get(UNIQUE_KEY) != Some(&key));
            Ok(())
        })
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The subset of the Lucene syntax the gateway produces: `*:*` and `field:value`.
enum Matcher {
    All,
    Field { field: String, value: String },
}

impl Matcher {
    fn parse(q: &str) -> Result<Self, EngineError> {
        if q == "*:*" {
            return Ok(Self::All);
        }

        let mut escaped = false;
        let split = q.char_indices().find_map(|(i, c)| {
            if escaped {
                escaped = false;
                None
            } else if c == '\\' {
                escaped = true;
                None
            } else if c == ':' {
                Some(i)
            } else {
                None
            }
        });

        let Some(idx) = split else {
            return Err(EngineError::Rejected {
                status: 400,
                message: format!("unsupported query: {q}"),
            });
        };
        let (field, value) = q.split_at(idx);
        Ok(Self::Field {
            field: unescape(field),
            value: unescape(value.strip_prefix(':').unwrap_or(value)),
        })
    }

    fn matches(&self, doc: &Document) -> bool {
        match self {
            Self::All => true,
            Self::Field { field, value } => doc.get(field).is_some_and(|v| match v {
                Value::Array(items) => items.iter().any(|item| value_text(item) == *value),
                other => value_text(other) == *value,
            }),
        }
    }
}

fn unescape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::engine::FacetSpec;

    fn record(id: &str, dept: &str) -> Record {
        [("id", id), ("Department", dept)].into_iter().collect()
    }

    fn all(rows: Option<u32>) -> SearchQuery {
        SearchQuery {
            q: "*:*".into(),
            rows,
            facet: None,
        }
    }

    #[tokio::test]
    async fn documents_are_visible_only_after_commit() {
        let engine = InMemoryEngine::new();
        engine.create_collection("emp", 1, 1).await.expect("create");
        engine
            .add_documents("emp", &[record("1", "IT"), record("2", "HR")])
            .await
            .expect("add");

        assert_eq!(engine.search("emp", &all(Some(0))).await.expect("search").total_found, 0);
        assert_eq!(engine.pending_count("emp"), 2);

        engine.commit("emp").await.expect("commit");
        let result = engine.search("emp", &all(Some(0))).await.expect("search");
        assert_eq!(result.total_found, 2);
        assert!(result.documents.is_empty());
    }

    #[tokio::test]
    async fn unique_key_replaces_and_deletes() {
        let engine = InMemoryEngine::new();
        engine.create_collection("emp", 1, 1).await.expect("create");
        engine.add_documents("emp", &[record("1", "IT")]).await.expect("add");
        engine.add_documents("emp", &[record("1", "HR")]).await.expect("add");
        engine.commit("emp").await.expect("commit");

        let result = engine.search("emp", &all(None)).await.expect("search");
        assert_eq!(result.total_found, 1);
        assert_eq!(result.documents[0]["Department"], "HR");

        engine.delete_by_id("emp", "1").await.expect("delete");
        assert_eq!(engine.search("emp", &all(None)).await.expect("search").total_found, 0);
    }

    #[tokio::test]
    async fn field_queries_unescape_and_match_exactly() {
        let engine = InMemoryEngine::new();
        engine.create_collection("emp", 1, 1).await.expect("create");
        let docs = vec![
            [("id", "1"), ("Job Title", "Sr. Manager")].into_iter().collect::<Record>(),
            [("id", "2"), ("Job Title", "Manager")].into_iter().collect(),
        ];
        engine.add_documents("emp", &docs).await.expect("add");
        engine.commit("emp").await.expect("commit");

        let query = SearchQuery {
            q: r"Job\ Title:Sr.\ Manager".into(),
            rows: None,
            facet: None,
        };
        let result = engine.search("emp", &query).await.expect("search");
        assert_eq!(result.total_found, 1);
        assert_eq!(result.documents[0]["id"], "1");
    }

    #[tokio::test]
    async fn facets_respect_min_count_and_order() {
        let engine = InMemoryEngine::new();
        engine.create_collection("emp", 1, 1).await.expect("create");
        let docs = vec![
            record("1", "IT"),
            record("2", "IT"),
            record("3", "HR"),
            record("4", "IT"),
            record("5", "Finance"),
        ];
        engine.add_documents("emp", &docs).await.expect("add");
        engine.commit("emp").await.expect("commit");

        let query = SearchQuery {
            q: "*:*".into(),
            rows: Some(0),
            facet: Some(FacetSpec {
                field: "Department".into(),
                min_count: 1,
                limit: None,
            }),
        };
        let result = engine.search("emp", &query).await.expect("search");
        let buckets = &result.facets["Department"];
        assert_eq!(buckets[0], FacetBucket { value: "IT".into(), count: 3 });
        assert_eq!(buckets.len(), 3);

        let query = SearchQuery {
            facet: Some(FacetSpec {
                field: "Department".into(),
                min_count: 2,
                limit: None,
            }),
            ..query
        };
        let result = engine.search("emp", &query).await.expect("search");
        assert_eq!(result.facets["Department"].len(), 1);
    }

    #[tokio::test]
    async fn missing_collections_and_injected_failures_are_rejections() {
        let engine = InMemoryEngine::new();
        assert!(matches!(
            engine.commit("nope").await,
            Err(EngineError::Rejected { status: 404, .. })
        ));

        engine.create_collection("emp", 1, 1).await.expect("create");
        let dup = engine.create_collection("emp", 1, 1).await.expect_err("duplicate");
        assert!(dup.is_already_exists());

        engine.fail_on(EngineOp::Commit);
        assert!(engine.commit("emp").await.is_err());
        engine.recover(EngineOp::Commit);
        assert!(engine.commit("emp").await.is_ok());
    }
}
