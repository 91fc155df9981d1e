//! Builders for the three query shapes the gateway sends to Solr.
//!
//! Every user-supplied field name and value goes through [`escape`] before it is
//! placed in the `q` parameter, so a value such as `IT OR *:*` is matched literally
//! instead of widening the query.

use common::{
    error::AppError,
    storage::engine::{FacetSpec, SearchQuery},
};

pub const MATCH_ALL: &str = "*:*";

/// Characters with meaning in the Lucene/Solr standard query parser.
const SPECIAL: &[char] = &[
    '\\', '+', '-', '!', '(', ')', ':', '^', '[', ']', '"', '{', '}', '~', '*', '?', '|', '&',
    '/', ';',
];

/// Backslash-escapes query syntax characters and whitespace.
pub fn escape(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if SPECIAL.contains(&c) || c.is_whitespace() {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn require<'a>(what: &str, input: &'a str) -> Result<&'a str, AppError> {
    if input.trim().is_empty() {
        Err(AppError::Validation(format!("{what} must not be empty")))
    } else {
        Ok(input)
    }
}

/// `field:value`, exact term match.
pub fn field_match(field: &str, value: &str, rows: Option<u32>) -> Result<SearchQuery, AppError> {
    let field = require("field name", field)?;
    let value = require("field value", value)?;

    Ok(SearchQuery {
        q: format!("{}:{}", escape(field.trim()), escape(value)),
        rows,
        facet: None,
    })
}

/// Match-all with zero rows: the engine only reports how many documents matched.
pub fn count() -> SearchQuery {
    SearchQuery {
        q: MATCH_ALL.to_string(),
        rows: Some(0),
        facet: None,
    }
}

/// Match-all with buckets for `field`. Documents are not requested.
pub fn facet(field: &str, min_count: u32, limit: Option<i64>) -> Result<SearchQuery, AppError> {
    let field = require("facet field", field)?;

    Ok(SearchQuery {
        q: MATCH_ALL.to_string(),
        rows: Some(0),
        facet: Some(FacetSpec {
            field: field.trim().to_string(),
            min_count,
            limit,
        }),
    })
}
