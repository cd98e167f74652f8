//! Script compilation orchestration for embedding hosts.
//!
//! This crate turns script source text into loaded modules by driving an
//! external F# compiler over staged temp files. The host gets back a
//! structured outcome instead of raw tool output.
//!
//! - Reference management (deduplicated assemblies shared across requests)
//! - Guaranteed cleanup (staged sources never outlive their request)
//! - Injectable toolchain (swap the real compiler for a stub in tests)
//! - Non-fatal loads (a module that compiles but will not load still
//!   reports its diagnostics)
//!
//! # Example
//!
//! ```rust,ignore
//! use scriptforge::{CompilerConfig, ScriptCompiler};
//!
//! let mut compiler = ScriptCompiler::new(CompilerConfig::default())?;
//! compiler.add_reference("Plugins/Engine.dll");
//!
//! let outcome = compiler.compile_script("module Hello\nlet greet () = \"hi\"", None)?;
//! if !outcome.success {
//!     for issue in &outcome.errors {
//!         eprintln!("{issue}");
//!     }
//! }
//! ```

pub mod compile;
pub mod error;
pub mod load;

pub use compile::{
    assemble_args, parse_compiler_output, CompilationUnit, CompileIssue, CompileOutcome,
    CompileStatus, CompilerBackend, CompilerConfig, CompilerOutput, Diagnostic, FscToolchain,
    ReferenceSet, ScriptCompiler, Severity,
};
pub use error::{Error, Result};
pub use load::LoadedModule;
