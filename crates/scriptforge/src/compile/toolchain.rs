//! External compiler toolchain discovery and invocation.
//!
//! The orchestrator talks to the compiler through [`CompilerBackend`], so
//! tests can substitute a deterministic stub for the real executable.

use std::path::{Path, PathBuf};
use std::process::Command;

use super::diagnostics::{parse_compiler_output, Diagnostic};
use crate::error::{Error, Result};

/// Name of the compiler executable, also used as the argument vector's
/// entry token.
const COMPILER_EXECUTABLE: &str = "fsc";

/// Raw result of one compiler invocation.
#[derive(Debug, Clone, Default)]
pub struct CompilerOutput {
    /// Structured diagnostics reported by the compiler
    pub diagnostics: Vec<Diagnostic>,

    /// Process exit code (-1 when terminated by a signal)
    pub exit_code: i32,
}

/// Capability interface over the external compiler.
///
/// `args` is the complete argument vector including the entry token at
/// index 0. Implementations run the compiler synchronously and may take
/// seconds; this is the sole blocking step of the pipeline. An `Err`
/// means the invocation itself failed (missing executable, spawn
/// failure). Compiler errors are data, reported through
/// [`CompilerOutput::diagnostics`].
pub trait CompilerBackend: Send + Sync {
    /// Run the compiler with the given argument vector.
    fn compile(&self, args: &[String]) -> Result<CompilerOutput>;
}

/// Production backend driving the `fsc` executable.
#[derive(Debug, Clone)]
pub struct FscToolchain {
    fsc_path: PathBuf,
}

impl FscToolchain {
    /// Use an explicit compiler executable.
    pub fn new(fsc_path: impl Into<PathBuf>) -> Self {
        Self {
            fsc_path: fsc_path.into(),
        }
    }

    /// Locate the compiler executable on PATH.
    pub fn locate() -> Result<Self> {
        let fsc_path = which::which(COMPILER_EXECUTABLE).map_err(|_| {
            Error::Toolchain(format!("{COMPILER_EXECUTABLE} not found in PATH"))
        })?;
        tracing::info!("Found compiler toolchain at {}", fsc_path.display());
        Ok(Self::new(fsc_path))
    }

    /// Path of the compiler executable.
    pub fn path(&self) -> &Path {
        &self.fsc_path
    }
}

impl CompilerBackend for FscToolchain {
    fn compile(&self, args: &[String]) -> Result<CompilerOutput> {
        // args[0] is the entry token; Command supplies its own.
        let tool_args = args.get(1..).unwrap_or(&[]);

        let output = Command::new(&self.fsc_path)
            .args(tool_args)
            .output()
            .map_err(|e| {
                Error::Toolchain(format!("failed to run {}: {}", self.fsc_path.display(), e))
            })?;

        let exit_code = output.status.code().unwrap_or(-1);

        // The compiler reports on stderr; some builds use stdout instead.
        let mut diagnostics = parse_compiler_output(&String::from_utf8_lossy(&output.stderr));
        diagnostics.extend(parse_compiler_output(&String::from_utf8_lossy(&output.stdout)));

        tracing::debug!(
            "Compiler exited with code {} and {} diagnostic(s)",
            exit_code,
            diagnostics.len()
        );
        Ok(CompilerOutput {
            diagnostics,
            exit_code,
        })
    }
}

/// Assemble the complete compiler argument vector.
///
/// The order is fixed: entry token, output path, library / debug-symbol /
/// framework-suppression flags, one `--reference:` token per reference in
/// insertion order, then the staged source files in unit order.
pub fn assemble_args(
    artifact_path: &Path,
    references: &[PathBuf],
    sources: &[PathBuf],
) -> Vec<String> {
    let mut args = vec![
        COMPILER_EXECUTABLE.to_string(),
        "-o".to_string(),
        artifact_path.display().to_string(),
        "-a".to_string(),
        "-g".to_string(),
        "--noframework".to_string(),
    ];
    for reference in references {
        args.push(format!("--reference:{}", reference.display()));
    }
    for source in sources {
        args.push(source.display().to_string());
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_args_order() {
        let args = assemble_args(
            Path::new("Scripts/Assemblies/FS-1234.dll"),
            &[
                PathBuf::from("Plugins/Engine.dll"),
                PathBuf::from("Plugins/Audio.dll"),
            ],
            &[PathBuf::from("/tmp/a.fs"), PathBuf::from("/tmp/b.fs")],
        );

        assert_eq!(
            args,
            vec![
                "fsc",
                "-o",
                "Scripts/Assemblies/FS-1234.dll",
                "-a",
                "-g",
                "--noframework",
                "--reference:Plugins/Engine.dll",
                "--reference:Plugins/Audio.dll",
                "/tmp/a.fs",
                "/tmp/b.fs",
            ]
        );
    }

    #[test]
    fn test_assemble_args_without_references() {
        let args = assemble_args(Path::new("out.dll"), &[], &[PathBuf::from("/tmp/a.fs")]);
        assert_eq!(args, vec!["fsc", "-o", "out.dll", "-a", "-g", "--noframework", "/tmp/a.fs"]);
    }

    #[test]
    fn test_toolchain_records_explicit_path() {
        let toolchain = FscToolchain::new("/opt/fsharp/fsc");
        assert_eq!(toolchain.path(), Path::new("/opt/fsharp/fsc"));
    }

    #[test]
    fn test_missing_executable_is_a_toolchain_error() {
        let toolchain = FscToolchain::new("/nonexistent/fsc-binary");
        let args = assemble_args(Path::new("out.dll"), &[], &[PathBuf::from("/tmp/a.fs")]);

        let err = toolchain.compile(&args).unwrap_err();
        assert!(matches!(err, Error::Toolchain(_)));
    }
}
