//! Diagnostic parsing and mapping for the compilation pipeline.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use super::types::CompileIssue;

/// Located diagnostic line, e.g.
/// `Script.fs(12,8): error FS0039: The value 'x' is not defined`.
/// The optional `-line,col` tail covers range-form locations.
static LOCATED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<file>.+?)\((?P<line>\d+),(?P<column>\d+)(?:-\d+,\d+)?\):\s+(?:(?P<subcategory>[A-Za-z][A-Za-z ]*?)\s+)?(?P<severity>error|warning)\s+(?P<code>[A-Z]{1,4}\d{1,5}):\s*(?P<message>.*)$",
    )
    .expect("valid located diagnostic pattern")
});

/// Tool-level diagnostic line with no source location, e.g.
/// `fsc : error FS0207: No inputs specified`.
static UNLOCATED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?P<origin>[^():]+?)\s*:\s*)?(?:(?P<subcategory>[A-Za-z][A-Za-z ]*?)\s+)?(?P<severity>error|warning)\s+(?P<code>[A-Z]{1,4}\d{1,5}):\s*(?P<message>.*)$",
    )
    .expect("valid unlocated diagnostic pattern")
});

/// Severity of a compiler diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A structured diagnostic reported by the external compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Source file the diagnostic points at, when the compiler named one
    pub file: Option<PathBuf>,

    /// Line number (1-indexed, 0 when the diagnostic has no location)
    pub line: usize,

    /// Column number (1-indexed, 0 when the diagnostic has no location)
    pub column: usize,

    /// Severity level
    pub severity: Severity,

    /// Compiler subcategory (e.g. "typecheck", "parse"), when present
    pub subcategory: Option<String>,

    /// Diagnostic code (e.g. "FS0039"), when present
    pub code: Option<String>,

    /// Message text, with continuation lines folded in
    pub message: String,
}

impl Diagnostic {
    /// Format the diagnostic for JSON output.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "file": self.file.as_ref().map(|file| file.display().to_string()),
            "line": self.line,
            "column": self.column,
            "severity": format!("{:?}", self.severity).to_lowercase(),
            "subcategory": self.subcategory,
            "code": self.code,
            "message": self.message,
        })
    }
}

/// Parse the compiler's console output into structured diagnostics.
///
/// Recognizes located lines (`Script.fs(12,8): error FS0039: message`)
/// and tool-level lines without a location (`fsc : error FS0207: message`).
/// Unmatched lines following a diagnostic are treated as wrapped message
/// text and folded into it; unmatched lines before the first diagnostic
/// (version banners and the like) are skipped.
pub fn parse_compiler_output(output: &str) -> Vec<Diagnostic> {
    let mut diagnostics: Vec<Diagnostic> = Vec::new();

    for line in output.lines() {
        let trimmed = line.trim_end();
        if trimmed.trim().is_empty() {
            continue;
        }

        if let Some(caps) = LOCATED.captures(trimmed) {
            diagnostics.push(Diagnostic {
                file: Some(PathBuf::from(&caps["file"])),
                line: caps["line"].parse().unwrap_or(0),
                column: caps["column"].parse().unwrap_or(0),
                severity: parse_severity(&caps["severity"]),
                subcategory: caps.name("subcategory").map(|m| m.as_str().trim().to_string()),
                code: Some(caps["code"].to_string()),
                message: caps["message"].to_string(),
            });
            continue;
        }

        // Indented lines are always wrapped message text, never new
        // diagnostics.
        if !line.starts_with([' ', '\t']) {
            if let Some(caps) = UNLOCATED.captures(trimmed) {
                diagnostics.push(Diagnostic {
                    file: None,
                    line: 0,
                    column: 0,
                    severity: parse_severity(&caps["severity"]),
                    subcategory: caps.name("subcategory").map(|m| m.as_str().trim().to_string()),
                    code: Some(caps["code"].to_string()),
                    message: caps["message"].to_string(),
                });
                continue;
            }
        }

        if let Some(last) = diagnostics.last_mut() {
            last.message.push('\n');
            last.message.push_str(trimmed.trim_start());
        } else {
            tracing::debug!("Skipping unrecognized compiler output line: {}", trimmed);
        }
    }

    diagnostics
}

/// Re-attribute diagnostics pointing at staged temp files to the unit's
/// originating source path, when the caller supplied one.
pub fn attribute_sources(diagnostics: &mut [Diagnostic], origins: &[(PathBuf, Option<PathBuf>)]) {
    for diagnostic in diagnostics.iter_mut() {
        let Some(file) = &diagnostic.file else {
            continue;
        };
        if let Some((_, Some(origin))) = origins.iter().find(|(staged, _)| staged == file) {
            diagnostic.file = Some(origin.clone());
        }
    }
}

/// Narrow raw diagnostics down to the error list exposed on the outcome.
/// Warnings and other non-error output never fail a request.
pub fn error_issues(diagnostics: &[Diagnostic]) -> Vec<CompileIssue> {
    diagnostics
        .iter()
        .filter(|diagnostic| diagnostic.severity == Severity::Error)
        .map(|diagnostic| CompileIssue {
            line: diagnostic.line,
            column: diagnostic.column,
            message: diagnostic.message.clone(),
        })
        .collect()
}

fn parse_severity(text: &str) -> Severity {
    if text.eq_ignore_ascii_case("warning") {
        Severity::Warning
    } else {
        Severity::Error
    }
}
