//! Compilation request orchestration.

use std::path::{Path, PathBuf};
use std::time::Instant;

use super::diagnostics;
use super::references::ReferenceSet;
use super::staging::StagedSources;
use super::toolchain::{assemble_args, CompilerBackend, FscToolchain};
use super::types::{
    artifact_file_name, CompilationUnit, CompileOutcome, CompileStatus, CompilerConfig,
};
use crate::error::Result;
use crate::load::LoadedModule;

/// Orchestrates script compilation against an external compiler toolchain.
///
/// One instance serves many requests. Accumulated references are shared
/// across them: compilation takes `&self`, so requests may run from
/// several threads at once, while [`ScriptCompiler::add_reference`]
/// requires `&mut self` and therefore exclusive access.
pub struct ScriptCompiler {
    config: CompilerConfig,
    backend: Box<dyn CompilerBackend>,
    references: ReferenceSet,
}

impl ScriptCompiler {
    /// Create a compiler driving the real toolchain, taken from the
    /// config's explicit path or located on PATH.
    pub fn new(config: CompilerConfig) -> Result<Self> {
        let toolchain = match &config.fsc_path {
            Some(path) => FscToolchain::new(path),
            None => FscToolchain::locate()?,
        };
        Ok(Self::with_backend(config, toolchain))
    }

    /// Create a compiler over an explicit backend. Tests inject stub
    /// backends here.
    pub fn with_backend(config: CompilerConfig, backend: impl CompilerBackend + 'static) -> Self {
        Self {
            config,
            backend: Box::new(backend),
            references: ReferenceSet::new(),
        }
    }

    /// Record a reference assembly for all subsequent requests.
    ///
    /// Duplicates (by case-insensitive base file name), blank paths, and
    /// implicit runtime assemblies are ignored.
    pub fn add_reference(&mut self, path: &str) {
        self.references.add(path);
    }

    /// Currently accumulated references, in insertion order.
    pub fn references(&self) -> &[PathBuf] {
        self.references.paths()
    }

    /// Compile a single script into a loadable module.
    pub fn compile_script(
        &self,
        script: &str,
        source_path: Option<PathBuf>,
    ) -> Result<CompileOutcome> {
        let unit = match source_path {
            Some(path) => CompilationUnit::with_path(script, path),
            None => CompilationUnit::new(script),
        };
        self.compile(&[unit], None)
    }

    /// Compile an ordered sequence of units into one module.
    ///
    /// The artifact lands in `output_dir` when given, otherwise in the
    /// configured assemblies directory; either is created on demand.
    /// Blocks the calling thread from staging through loading.
    pub fn compile(
        &self,
        units: &[CompilationUnit],
        output_dir: Option<&Path>,
    ) -> Result<CompileOutcome> {
        let start = Instant::now();

        // Stage before touching the output directory, so a rejected
        // request leaves the filesystem untouched.
        let staged = StagedSources::stage(units)?;

        let artifact_path = self.artifact_path(output_dir)?;
        let args = assemble_args(&artifact_path, self.references.paths(), &staged.paths());

        tracing::debug!("Invoking compiler with {} argument(s)", args.len());
        let output = self.backend.compile(&args)?;

        let mut raw = output.diagnostics;
        diagnostics::attribute_sources(&mut raw, &staged.origin_map());

        // Attempted regardless of diagnostics. A failed load is reported
        // through `module: None`, never as an error that would mask the
        // compiler's own output.
        let module = match LoadedModule::load(&artifact_path) {
            Ok(module) => Some(module),
            Err(e) => {
                tracing::warn!("Couldn't load module {}: {}", artifact_path.display(), e);
                None
            }
        };

        let errors = diagnostics::error_issues(&raw);
        let warnings = raw.len() - errors.len();
        if warnings > 0 {
            tracing::debug!("{} non-error diagnostic(s) excluded from the error list", warnings);
        }

        let outcome = CompileOutcome {
            success: errors.is_empty(),
            errors,
            diagnostics: raw,
            module,
            artifact_path,
        };
        tracing::info!(
            "Compiled {} unit(s) in {}ms: {}",
            units.len(),
            start.elapsed().as_millis(),
            if outcome.success { "ok" } else { "failed" }
        );
        Ok(outcome)
    }

    /// Compile a script, reducing the result to a coarse status.
    ///
    /// Never returns an error: compiler errors are logged individually
    /// and mapped to [`CompileStatus::CompilerError`], infrastructure
    /// failures to [`CompileStatus::GeneralError`].
    pub fn try_compile(
        &self,
        script: &str,
        source_path: Option<PathBuf>,
    ) -> (CompileStatus, Option<LoadedModule>) {
        match self.compile_script(script, source_path) {
            Ok(outcome) if outcome.success => (CompileStatus::Succeeded, outcome.module),
            Ok(outcome) => {
                for issue in &outcome.errors {
                    tracing::error!("Script compile error {}", issue);
                }
                (CompileStatus::CompilerError, outcome.module)
            }
            Err(e) => {
                tracing::error!("Script compilation failed: {}", e);
                (CompileStatus::GeneralError, None)
            }
        }
    }

    /// Resolve the directory receiving the artifact, create it if absent,
    /// and return the full collision-resistant artifact path.
    fn artifact_path(&self, output_dir: Option<&Path>) -> Result<PathBuf> {
        let dir = output_dir.unwrap_or(&self.config.assemblies_dir);
        std::fs::create_dir_all(dir)?;
        Ok(dir.join(artifact_file_name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::toolchain::CompilerOutput;
    use crate::error::Error;

    struct SilentBackend;

    impl CompilerBackend for SilentBackend {
        fn compile(&self, _args: &[String]) -> Result<CompilerOutput> {
            Ok(CompilerOutput::default())
        }
    }

    struct BrokenBackend;

    impl CompilerBackend for BrokenBackend {
        fn compile(&self, _args: &[String]) -> Result<CompilerOutput> {
            Err(Error::Toolchain("compiler exploded".to_string()))
        }
    }

    fn compiler_in(dir: &Path) -> ScriptCompiler {
        ScriptCompiler::with_backend(
            CompilerConfig::with_assemblies_dir(dir.join("assemblies")),
            SilentBackend,
        )
    }

    #[test]
    fn test_empty_request_leaves_filesystem_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = compiler_in(dir.path());

        assert!(matches!(
            compiler.compile(&[], None),
            Err(Error::EmptySource)
        ));
        assert!(matches!(
            compiler.compile_script("   \n", None),
            Err(Error::EmptySource)
        ));
        assert!(!dir.path().join("assemblies").exists());
    }

    #[test]
    fn test_references_accumulate_and_dedup() {
        let dir = tempfile::tempdir().unwrap();
        let mut compiler = compiler_in(dir.path());

        compiler.add_reference("Plugins/Engine.dll");
        compiler.add_reference("Plugins/Audio.dll");
        compiler.add_reference("Backup/ENGINE.DLL");
        assert_eq!(
            compiler.references(),
            &[
                PathBuf::from("Plugins/Engine.dll"),
                PathBuf::from("Plugins/Audio.dll"),
            ]
        );
    }

    #[test]
    fn test_success_without_loadable_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = compiler_in(dir.path());

        let outcome = compiler.compile_script("module A", None).unwrap();
        assert!(outcome.success);
        assert!(outcome.errors.is_empty());
        assert!(outcome.module.is_none());
        assert!(outcome.artifact_path.starts_with(dir.path().join("assemblies")));
        assert!(dir.path().join("assemblies").is_dir());
    }

    #[test]
    fn test_try_compile_maps_infrastructure_failure() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = ScriptCompiler::with_backend(
            CompilerConfig::with_assemblies_dir(dir.path().join("assemblies")),
            BrokenBackend,
        );

        let (status, module) = compiler.try_compile("module A", None);
        assert_eq!(status, CompileStatus::GeneralError);
        assert!(module.is_none());
    }
}
