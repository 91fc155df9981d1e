use std::path::{Component, Path, PathBuf};

use common::error::AppError;

/// Resolves the CSV to read. Request-supplied paths must stay inside `data_dir`;
/// the configured fallback is trusted as-is.
pub fn resolve_source(
    data_dir: &Path,
    configured: &str,
    requested: Option<&str>,
) -> Result<PathBuf, AppError> {
    let Some(requested) = requested.map(str::trim).filter(|p| !p.is_empty()) else {
        let configured = Path::new(configured);
        return Ok(if configured.is_absolute() {
            configured.to_path_buf()
        } else {
            data_dir.join(configured)
        });
    };

    let path = Path::new(requested);
    let confined = path
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
    if !confined {
        return Err(AppError::Validation(format!(
            "source path must be relative to the data directory: {requested}"
        )));
    }

    Ok(data_dir.join(path))
}
