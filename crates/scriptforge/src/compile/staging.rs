//! Staging of compilation units as physical source files.
//!
//! The external compiler only reads files on disk, so each unit is written
//! to a temporary file carrying the source extension the toolchain
//! recognizes. Staged files live exactly as long as the request: dropping
//! [`StagedSources`] removes them on every exit path, including early
//! returns and panics.

use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;

use super::types::CompilationUnit;
use crate::error::{Error, Result};

/// File extension the external compiler recognizes for staged sources.
const SOURCE_EXTENSION: &str = ".fs";

/// Temporary source files for one in-flight compilation request.
pub struct StagedSources {
    files: Vec<NamedTempFile>,
    origins: Vec<Option<PathBuf>>,
}

impl StagedSources {
    /// Write every unit to its own temporary file.
    ///
    /// All units are validated before the first write: an empty request or
    /// a unit with whitespace-only source fails the whole request with
    /// [`Error::EmptySource`] and leaves no file behind.
    pub fn stage(units: &[CompilationUnit]) -> Result<Self> {
        if units.is_empty() || units.iter().any(|unit| unit.is_blank()) {
            return Err(Error::EmptySource);
        }

        let mut files = Vec::with_capacity(units.len());
        let mut origins = Vec::with_capacity(units.len());
        for unit in units {
            let mut file = tempfile::Builder::new()
                .prefix("scriptforge-")
                .suffix(SOURCE_EXTENSION)
                .tempfile()?;
            file.write_all(unit.source().as_bytes())?;
            file.flush()?;

            origins.push(unit.source_path().map(PathBuf::from));
            files.push(file);
        }

        tracing::debug!("Staged {} source file(s)", files.len());
        Ok(Self { files, origins })
    }

    /// Paths of the staged files, in unit order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|file| file.path().to_path_buf()).collect()
    }

    /// Staged path paired with the unit's originating source path, for
    /// diagnostic attribution.
    pub fn origin_map(&self) -> Vec<(PathBuf, Option<PathBuf>)> {
        self.files
            .iter()
            .zip(&self.origins)
            .map(|(file, origin)| (file.path().to_path_buf(), origin.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    #[test]
    fn test_rejects_empty_request() {
        assert!(matches!(StagedSources::stage(&[]), Err(Error::EmptySource)));
    }

    #[test]
    fn test_rejects_blank_unit_among_valid_ones() {
        let units = [
            CompilationUnit::new("module A"),
            CompilationUnit::new("   \n\t"),
        ];
        assert!(matches!(
            StagedSources::stage(&units),
            Err(Error::EmptySource)
        ));
    }

    #[test]
    fn test_writes_source_with_extension() {
        let units = [CompilationUnit::new("module A\nlet x = 1\n")];
        let staged = StagedSources::stage(&units).unwrap();

        let paths = staged.paths();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].to_string_lossy().ends_with(".fs"));
        assert_eq!(
            fs::read_to_string(&paths[0]).unwrap(),
            "module A\nlet x = 1\n"
        );
    }

    #[test]
    fn test_removes_files_on_drop() {
        let units = [
            CompilationUnit::new("module A"),
            CompilationUnit::new("module B"),
        ];
        let staged = StagedSources::stage(&units).unwrap();
        let paths = staged.paths();
        assert!(paths.iter().all(|path| path.exists()));

        drop(staged);
        assert!(paths.iter().all(|path| !path.exists()));
    }

    #[test]
    fn test_origin_map_pairs_staged_with_source_paths() {
        let units = [
            CompilationUnit::with_path("module A", "Scripts/A.fs"),
            CompilationUnit::new("module B"),
        ];
        let staged = StagedSources::stage(&units).unwrap();

        let origins = staged.origin_map();
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[0].1.as_deref(), Some(Path::new("Scripts/A.fs")));
        assert!(origins[1].1.is_none());
        assert_eq!(origins[0].0, staged.paths()[0]);
    }
}
