//! Reference assembly bookkeeping for compilation requests.

use std::path::{Path, PathBuf};

/// Base file names the toolchain resolves implicitly; passing them again
/// alongside `--noframework` conflicts with its own resolution.
const RUNTIME_ASSEMBLIES: &[&str] = &["mscorlib", "mscorlib.dll"];

/// Deduplicated, insertion-ordered set of reference assembly paths.
///
/// References accumulate for the lifetime of the owning compiler; there is
/// no removal operation. Deduplication is by case-insensitive base file
/// name, so the same assembly found under two search locations is passed
/// to the compiler only once.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSet {
    paths: Vec<PathBuf>,
}

impl ReferenceSet {
    /// Create an empty reference set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reference assembly path.
    ///
    /// Ignores empty or whitespace-only paths, implicit runtime
    /// assemblies, and paths whose base file name is already present.
    pub fn add(&mut self, path: &str) {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return;
        }

        let Some(key) = file_name_key(Path::new(trimmed)) else {
            return;
        };
        if RUNTIME_ASSEMBLIES.contains(&key.as_str()) {
            tracing::debug!("Skipping implicit runtime assembly reference: {}", trimmed);
            return;
        }
        if self
            .paths
            .iter()
            .any(|existing| file_name_key(existing).as_deref() == Some(key.as_str()))
        {
            tracing::debug!("Skipping duplicate reference: {}", trimmed);
            return;
        }

        self.paths.push(PathBuf::from(trimmed));
    }

    /// Current references in insertion order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Number of stored references.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// True when no references have been added.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Lower-cased base file name used as the deduplication key.
fn file_name_key(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().to_lowercase())
}
