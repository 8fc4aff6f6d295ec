//! Persistent storage sink for generated test files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

/// Where rendered tests are saved between generation and compilation.
///
/// Implementations must be durable enough that checking the returned path
/// for existence afterwards is meaningful; the feedback cycle treats a
/// missing file as a fatal persistence failure.
pub trait TestStorage: Send + Sync {
    /// Save `code` as `file_name` under `result_dir`, inside the package's
    /// directory layout, and return the path it was written to.
    fn save_generated_test(
        &self,
        package_name: &str,
        code: &str,
        result_dir: &Path,
        file_name: &str,
    ) -> Result<PathBuf>;
}

/// Plain-filesystem storage: `<result_dir>/<package path>/<file_name>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileTestStorage;

impl TestStorage for FileTestStorage {
    fn save_generated_test(
        &self,
        package_name: &str,
        code: &str,
        result_dir: &Path,
        file_name: &str,
    ) -> Result<PathBuf> {
        let mut dir = result_dir.to_path_buf();
        for segment in package_name.split('.').filter(|s| !s.is_empty()) {
            dir.push(segment);
        }
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create test output directory {}", dir.display()))?;

        let path = dir.join(file_name);
        fs::write(&path, code)
            .with_context(|| format!("Failed to write generated test to {}", path.display()))?;

        debug!(path = %path.display(), bytes = code.len(), "saved generated test");
        Ok(path)
    }
}
