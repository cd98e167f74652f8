//! Compile an F# script with the system toolchain and load the result.
//!
//! ```text
//! cargo run --example compile_script -- path/to/Script.fs [Reference.dll ...]
//! ```
//!
//! Requires `fsc` on PATH. Set `RUST_LOG=debug` to watch the pipeline.

use std::path::PathBuf;
use std::process::ExitCode;

use scriptforge::{CompilerConfig, ScriptCompiler};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(script_path) = args.next().map(PathBuf::from) else {
        eprintln!("usage: compile_script <Script.fs> [Reference.dll ...]");
        return ExitCode::FAILURE;
    };

    let script = match std::fs::read_to_string(&script_path) {
        Ok(script) => script,
        Err(e) => {
            eprintln!("cannot read {}: {}", script_path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let mut compiler = match ScriptCompiler::new(CompilerConfig::default()) {
        Ok(compiler) => compiler,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    for reference in args {
        compiler.add_reference(&reference);
    }

    match compiler.compile_script(&script, Some(script_path)) {
        Ok(outcome) if outcome.success => {
            println!("compiled to {}", outcome.artifact_path.display());
            if outcome.module.is_some() {
                println!("module loaded");
            }
            ExitCode::SUCCESS
        }
        Ok(outcome) => {
            for issue in &outcome.errors {
                eprintln!("{issue}");
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
