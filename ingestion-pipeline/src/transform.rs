use std::{fs::File, io::Read, path::Path};

use common::{error::AppError, storage::types::Record};
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use tracing::warn;

/// Solr's unique key field unless configured otherwise.
pub const DEFAULT_UNIQUE_KEY: &str = "id";

/// What to do with a row whose field count differs from the header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedRowPolicy {
    #[default]
    Abort,
    Skip,
}

#[derive(Debug, Clone)]
pub struct TransformPolicy {
    pub exclude_column: Option<String>,
    /// Source column copied into the unique key when the source has no such column.
    pub id_field: Option<String>,
    /// A missing `id_field` column fails the source instead of indexing without keys.
    pub require_id_field: bool,
    pub unique_key: String,
    pub on_malformed: MalformedRowPolicy,
}

impl Default for TransformPolicy {
    fn default() -> Self {
        Self {
            exclude_column: None,
            id_field: None,
            require_id_field: false,
            unique_key: DEFAULT_UNIQUE_KEY.to_string(),
            on_malformed: MalformedRowPolicy::default(),
        }
    }
}

/// Lazily turns CSV rows into `Record`s, dropping the excluded column.
pub struct RowTransformer<R: Read> {
    rows: StringRecordsIntoIter<R>,
    headers: Vec<String>,
    keep: Vec<bool>,
    id_source: Option<usize>,
    unique_key: String,
    on_malformed: MalformedRowPolicy,
    skipped: usize,
    finished: bool,
}

impl RowTransformer<File> {
    pub fn from_path(path: &Path, policy: TransformPolicy) -> Result<Self, AppError> {
        let file = File::open(path).map_err(|source| AppError::SourceNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file, policy)
    }
}

impl<R: Read> RowTransformer<R> {
    pub fn from_reader(reader: R, policy: TransformPolicy) -> Result<Self, AppError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| AppError::SourceRead(format!("failed to read header row: {e}")))?
            .iter()
            .map(str::to_string)
            .collect();

        let keep = headers
            .iter()
            .map(|h| policy.exclude_column.as_deref() != Some(h.as_str()))
            .collect();

        let has_key = headers.iter().any(|h| *h == policy.unique_key);
        let id_source = match policy.id_field.as_deref() {
            Some(field) if has_key => {
                warn!(
                    id_field = field,
                    unique_key = %policy.unique_key,
                    "source already has a unique key column, ignoring id field mapping"
                );
                None
            }
            Some(field) => match headers.iter().position(|h| h == field) {
                Some(idx) => Some(idx),
                None if policy.require_id_field => {
                    return Err(AppError::Validation(format!(
                        "id field '{field}' is not a column of the source"
                    )));
                }
                None => None,
            },
            None => None,
        };

        if !has_key && id_source.is_none() {
            warn!(
                unique_key = %policy.unique_key,
                id_field = ?policy.id_field,
                "source has no unique key column, documents cannot be deleted by id"
            );
        }

        Ok(Self {
            rows: reader.into_records(),
            headers,
            keep,
            id_source,
            unique_key: policy.unique_key,
            on_malformed: policy.on_malformed,
            skipped: 0,
            finished: false,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Rows dropped so far under `MalformedRowPolicy::Skip`.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn build(&self, row: &StringRecord) -> Record {
        let mut record = Record::with_capacity(self.headers.len().saturating_add(1));
        for ((header, value), keep) in self.headers.iter().zip(row.iter()).zip(&self.keep) {
            if *keep {
                record.push(header.as_str(), value);
            }
        }
        if let Some(value) = self.id_source.and_then(|idx| row.get(idx)) {
            record.prepend(self.unique_key.as_str(), value);
        }
        record
    }
}

impl<R: Read> Iterator for RowTransformer<R> {
    type Item = Result<Record, AppError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let row = match self.rows.next()? {
                Ok(row) => row,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(AppError::SourceRead(e.to_string())));
                }
            };

            if row.len() != self.headers.len() {
                let line = row.position().map_or(0, csv::Position::line);
                match self.on_malformed {
                    MalformedRowPolicy::Skip => {
                        self.skipped = self.skipped.saturating_add(1);
                        warn!(
                            line,
                            expected = self.headers.len(),
                            found = row.len(),
                            "skipping malformed row"
                        );
                        continue;
                    }
                    MalformedRowPolicy::Abort => {
                        self.finished = true;
                        return Some(Err(AppError::MalformedRow {
                            line,
                            expected: self.headers.len(),
                            found: row.len(),
                        }));
                    }
                }
            }

            return Some(Ok(self.build(&row)));
        }
    }
}
