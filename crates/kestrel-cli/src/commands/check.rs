//! Check command - report static errors without executing

use anyhow::{Context, Result};
use kestrel_runtime::Kestrel;
use std::fs;

/// Check a Kestrel source file without running it
///
/// Runs the lexer, parser, folder, and resolver against a scratch
/// interpreter. No statement executes.
pub fn run(file_path: &str) -> Result<i32> {
    let source = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read source file: {}", file_path))?;

    let runtime = Kestrel::new();
    let diagnostics = runtime.check(&source, file_path);

    if diagnostics.is_empty() {
        println!("{}: no errors found", file_path);
        return Ok(0);
    }

    super::report(&diagnostics);
    Ok(super::EXIT_STATIC)
}
