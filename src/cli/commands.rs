//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::io::IsTerminal;
use std::path::Path;

use peephole_core::PeepConfig;

use super::{CliError, CliResult, ExitCode};
use crate::report;
use crate::rewrite::{self, Expansion, RewriteError};
use crate::source_map::line_info;

/// Maximum source file size (100 MB)
///
/// Files larger than this are rejected to prevent out-of-memory conditions
/// while parsing.
const MAX_SOURCE_SIZE: u64 = 100 * 1024 * 1024;

/// Read a source file, refusing anything larger than [`MAX_SOURCE_SIZE`].
pub fn read_source(file_path: &Path) -> CliResult<String> {
    let shown = file_path.display();
    let metadata =
        fs::metadata(file_path).map_err(|e| CliError::failure(format!("Cannot access file '{shown}': {e}")))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Source file '{shown}' is too large ({} bytes, max {MAX_SOURCE_SIZE} bytes)",
            metadata.len(),
        )));
    }

    fs::read_to_string(file_path).map_err(|e| CliError::failure(format!("Error reading file '{shown}': {e}")))
}

/// Run the rewriter over one file, turning parse failures into a located CLI error.
fn expand(file_path: &Path, config: &PeepConfig) -> CliResult<(String, Expansion)> {
    let source = read_source(file_path)?;
    match rewrite::expand_source(&source, config) {
        Ok(expansion) => Ok((source, expansion)),
        Err(RewriteError::Parse { message, span }) => {
            let (line, col, _) = line_info(&source, span.start);
            Err(CliError::failure(format!(
                "error: {message}\n  --> {}:{line}:{col}",
                file_path.display()
            )))
        }
        Err(e @ RewriteError::Emit(_)) => Err(CliError::failure(format!("error: {e}"))),
    }
}

fn print_diagnostics(file_path: &Path, source: &str, expansion: &Expansion) {
    if expansion.diagnostics.is_empty() {
        return;
    }
    let color = std::io::stderr().is_terminal();
    let file_name = file_path.display().to_string();
    eprint!(
        "{}",
        report::render_graphical(&file_name, source, &expansion.diagnostics, color)
    );
}

/// `peephole expand`: print or write the rewritten source.
pub fn expand_file(file_path: &Path, output: Option<&Path>, config: &PeepConfig) -> CliResult<ExitCode> {
    let (source, expansion) = expand(file_path, config)?;
    print_diagnostics(file_path, &source, &expansion);

    if expansion.has_errors() {
        tracing::warn!(file = %file_path.display(), "not writing output: expansion reported errors");
        return Ok(ExitCode::FAILURE);
    }

    match output {
        Some(out) => {
            fs::write(out, &expansion.source)
                .map_err(|e| CliError::failure(format!("Error writing '{}': {e}", out.display())))?;
            tracing::info!(
                output = %out.display(),
                constants = expansion.synthesized,
                "wrote expanded source"
            );
        }
        None => print!("{}", expansion.source),
    }
    Ok(ExitCode::SUCCESS)
}

/// `peephole check`: report diagnostics only.
pub fn check_file(file_path: &Path, json: bool, config: &PeepConfig) -> CliResult<ExitCode> {
    let (source, expansion) = expand(file_path, config)?;

    if json {
        let file_name = file_path.display().to_string();
        println!("{:#}", report::render_json(&file_name, &source, &expansion.diagnostics));
    } else {
        print_diagnostics(file_path, &source, &expansion);
        let (errors, warnings) = count(&expansion);
        eprintln!(
            "{}: {} marked type(s), {} constant(s), {errors} error(s), {warnings} warning(s)",
            file_path.display(),
            expansion.marked_types,
            expansion.synthesized,
        );
    }

    Ok(if expansion.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn count(expansion: &Expansion) -> (usize, usize) {
    let errors = expansion.diagnostics.iter().filter(|d| d.is_error()).count();
    (errors, expansion.diagnostics.len() - errors)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("peephole_cli_{}_{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("input.rs");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_read_source_missing_file() {
        let err = read_source(Path::new("/definitely/not/here.rs")).unwrap_err();
        assert!(err.message.contains("Cannot access file"));
        assert_eq!(err.exit_code, ExitCode::FAILURE);
    }

    #[test]
    fn test_expand_writes_output() {
        let input = temp_file("expand", "#[peep_in]\nstruct Hotel { name: String }\n");
        let output = input.with_file_name("output.rs");
        let code = expand_file(&input, Some(output.as_path()), &PeepConfig::default()).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
        let written = fs::read_to_string(&output).unwrap();
        assert!(written.contains("pub const __NAME: &'static str = \"name\";"));
    }

    #[test]
    fn test_expand_with_errors_writes_nothing() {
        let input = temp_file("errors", "#[peep_in]\nenum Room { Single }\n");
        let output = input.with_file_name("output.rs");
        let code = expand_file(&input, Some(output.as_path()), &PeepConfig::default()).unwrap();
        assert_eq!(code, ExitCode::FAILURE);
        assert!(!output.exists());
    }

    #[test]
    fn test_check_parse_error_is_located() {
        let input = temp_file("parse", "struct Hotel {\n    name String,\n}\n");
        let err = check_file(&input, true, &PeepConfig::default()).unwrap_err();
        assert!(err.message.contains("input.rs:2:"));
    }

    #[test]
    fn test_check_warning_only_succeeds() {
        let input = temp_file(
            "warning",
            "#[peep_in]\nstruct Hotel { name: String }\nimpl Hotel { const __NAME: &'static str = \"x\"; }\n",
        );
        let code = check_file(&input, true, &PeepConfig::default()).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }
}
