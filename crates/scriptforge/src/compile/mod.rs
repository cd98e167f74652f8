//! Compilation pipeline for script modules.
//!
//! This module provides:
//! - Reference bookkeeping (deduplicated reference assemblies)
//! - Source staging (temp files with guaranteed cleanup)
//! - Toolchain invocation (argument assembly, external process)
//! - Diagnostic parsing (compiler console lines → structured diagnostics)
//!
//! # Architecture
//!
//! ```text
//! CompilationUnit(s)
//!     │
//!     ├── ReferenceSet ──► --reference: tokens
//!     │
//!     └── StagedSources ──► temp .fs files
//!                │
//!                └── CompilerBackend (fsc) ──► diagnostics + FS-<uuid>.dll
//!                                                   │
//!                                                   └── LoadedModule + CompileOutcome
//! ```

mod compiler;
mod diagnostics;
mod references;
mod staging;
mod toolchain;
mod types;

pub use compiler::ScriptCompiler;
pub use diagnostics::{parse_compiler_output, Diagnostic, Severity};
pub use references::ReferenceSet;
pub use toolchain::{assemble_args, CompilerBackend, CompilerOutput, FscToolchain};
pub use types::{CompilationUnit, CompileIssue, CompileOutcome, CompileStatus, CompilerConfig};
