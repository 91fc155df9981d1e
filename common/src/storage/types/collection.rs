use std::fmt;

use serde::Serialize;

use crate::error::AppError;

/// Name of a logical collection held by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CollectionRef(String);

impl CollectionRef {
    /// Validates a collection name using Solr's naming rules.
    pub fn parse(name: &str) -> Result<Self, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(
                "collection name must not be empty".to_string(),
            ));
        }
        if name.starts_with('-') {
            return Err(AppError::Validation(format!(
                "collection name '{name}' must not start with '-'"
            )));
        }
        if let Some(bad) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
        {
            return Err(AppError::Validation(format!(
                "collection name '{name}' contains invalid character '{bad}'"
            )));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CollectionRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Outcome of an idempotent create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionAck {
    Created,
    AlreadyExists,
}
