use common::{
    error::AppError,
    storage::{
        engine::{FacetBucket, SearchResult},
        types::{CollectionRef, Document},
    },
};

/// Documents in engine order, values untouched.
pub fn documents(result: SearchResult) -> Vec<Document> {
    result.documents
}

pub fn count(result: &SearchResult) -> u64 {
    result.total_found
}

/// Buckets for exactly one facet field.
pub fn facet(
    mut result: SearchResult,
    collection: &CollectionRef,
    field: &str,
) -> Result<Vec<FacetBucket>, AppError> {
    result
        .facets
        .remove(field)
        .ok_or_else(|| AppError::FacetFieldMissing {
            collection: collection.to_string(),
            field: field.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn emp() -> CollectionRef {
        CollectionRef::parse("emp").expect("name")
    }

    #[test]
    fn documents_pass_through_in_order() {
        let first: Document =
            serde_json::from_value(json!({ "id": "E1", "Age": [47] })).expect("doc");
        let second: Document = serde_json::from_value(json!({ "id": "E2" })).expect("doc");
        let result = SearchResult {
            documents: vec![first.clone(), second.clone()],
            total_found: 12,
            facets: HashMap::new(),
        };

        assert_eq!(count(&result), 12);
        assert_eq!(documents(result), vec![first, second]);
    }

    #[test]
    fn facet_returns_requested_field_only() {
        let buckets = vec![
            FacetBucket { value: "IT".into(), count: 3 },
            FacetBucket { value: "HR".into(), count: 1 },
        ];
        let mut facets = HashMap::new();
        facets.insert("Department".to_string(), buckets.clone());
        facets.insert("Gender".to_string(), vec![]);

        let result = SearchResult {
            documents: vec![],
            total_found: 4,
            facets,
        };
        assert_eq!(facet(result, &emp(), "Department").expect("facet"), buckets);
    }

    #[test]
    fn missing_facet_field_is_an_error() {
        let err = facet(SearchResult::default(), &emp(), "Department").expect_err("missing");
        assert!(matches!(
            err,
            AppError::FacetFieldMissing { ref collection, ref field }
                if collection == "emp" && field == "Department"
        ));
    }
}
