//! JSON persistence of the documented `Spec`.
//!
//! The whole spec is rewritten on every update. There is no partial-write
//! protection: a torn file fails to decode on the next start and the
//! recorder begins from an empty spec.

use std::fs;
use std::path::{Path, PathBuf};

use crate::doc::error::{DocError, DocResult};
use crate::doc::model::Spec;

/// Absolute form of `path`, relative paths resolved against the working directory.
pub fn absolute(path: impl AsRef<Path>) -> DocResult<PathBuf> {
    let path = path.as_ref();
    std::path::absolute(path).map_err(|source| DocError::PathResolution {
        path: path.to_path_buf(),
        source,
    })
}

/// `<doc_path>.json`, made absolute.
pub fn json_path(doc_path: &str) -> DocResult<PathBuf> {
    absolute(format!("{doc_path}.json"))
}

/// Load a previously saved spec.
pub fn load_spec(path: &Path) -> DocResult<Spec> {
    let content = fs::read(path).map_err(|e| DocError::io(path, e))?;
    let spec = serde_json::from_slice(&content)?;
    Ok(spec)
}

/// Serialize `spec` and overwrite `path`.
pub fn save_spec(spec: &Spec, path: &Path) -> DocResult<()> {
    let data = serde_json::to_vec(spec)?;
    fs::write(path, data).map_err(|e| DocError::io(path, e))?;
    tracing::debug!(path = %path.display(), apis = spec.api_specs.len(), "Spec saved");
    Ok(())
}

/// Load the `Spec` if present; any failure yields an empty one.
pub fn load_or_default(path: &Path) -> (Spec, bool) {
    match load_spec(path) {
        Ok(spec) => {
            tracing::info!(
                path = %path.display(),
                apis = spec.api_specs.len(),
                calls = spec.call_count(),
                "Loaded recorded spec"
            );
            (spec, true)
        }
        Err(DocError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No recorded spec yet");
            (Spec::default(), false)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable spec file");
            (Spec::default(), false)
        }
    }
}
