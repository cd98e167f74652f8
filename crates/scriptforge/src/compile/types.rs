//! Common types for the compilation pipeline.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use uuid::Uuid;

use super::diagnostics::Diagnostic;
use crate::load::LoadedModule;

/// Configuration for the script compiler.
#[derive(Debug, Clone)]
pub struct CompilerConfig {
    /// Directory receiving generated module artifacts
    pub assemblies_dir: PathBuf,

    /// Explicit compiler executable; None means search PATH
    pub fsc_path: Option<PathBuf>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            assemblies_dir: PathBuf::from("Scripts/Assemblies"),
            fsc_path: None,
        }
    }
}

impl CompilerConfig {
    /// Create a config writing artifacts under `dir` instead of the
    /// default assemblies directory.
    pub fn with_assemblies_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            assemblies_dir: dir.into(),
            ..Self::default()
        }
    }
}

/// A single named source text submitted for compilation.
///
/// The optional source path identifies the originating file for diagnostic
/// attribution; the text itself is always taken from `source`, never read
/// from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
    source: String,
    source_path: Option<PathBuf>,
}

impl CompilationUnit {
    /// Create a unit from bare source text.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            source_path: None,
        }
    }

    /// Create a unit with the originating file recorded for diagnostics.
    pub fn with_path(source: impl Into<String>, source_path: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            source_path: Some(source_path.into()),
        }
    }

    /// The source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The originating file, if the caller supplied one.
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// True when the unit holds no compilable text.
    pub(crate) fn is_blank(&self) -> bool {
        self.source.trim().is_empty()
    }
}

/// A compiler error attributed to a position in the submitted source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileIssue {
    /// 1-based line (0 when the compiler gave no location)
    pub line: usize,

    /// 1-based column (0 when the compiler gave no location)
    pub column: usize,

    /// Compiler message text
    pub message: String,
}

impl fmt::Display for CompileIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{}): {}", self.line, self.column, self.message)
    }
}

/// Result of one compilation request.
#[derive(Debug)]
pub struct CompileOutcome {
    /// True when the compiler reported no error diagnostics.
    ///
    /// Independent of whether the artifact could be loaded; callers that
    /// need the module must also check [`CompileOutcome::module`].
    pub success: bool,

    /// Error diagnostics in compiler order, reduced to position and text
    pub errors: Vec<CompileIssue>,

    /// Every diagnostic the compiler reported, warnings included, with
    /// staged temp paths re-attributed to the units' source paths
    pub diagnostics: Vec<Diagnostic>,

    /// The module, when the produced artifact could be loaded
    pub module: Option<LoadedModule>,

    /// Path where the artifact was (or would have been) written
    pub artifact_path: PathBuf,
}

/// Coarse classification of a compile attempt, for hosts that only branch
/// on the kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileStatus {
    /// The compiler reported no errors
    Succeeded,

    /// The compiler reported at least one error diagnostic
    CompilerError,

    /// An infrastructure failure prevented compilation
    GeneralError,
}

/// Collision-resistant artifact file name for one compilation request.
pub(crate) fn artifact_file_name() -> String {
    format!("FS-{}.dll", Uuid::new_v4())
}
