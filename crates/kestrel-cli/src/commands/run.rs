//! Run command - execute Kestrel source files

use anyhow::{Context, Result};
use kestrel_runtime::{Kestrel, Value};
use std::fs;

/// Execute a Kestrel source file
///
/// Runs the full pipeline and prints the final expression value to
/// stdout when it is not null. Diagnostics go to stderr; the exit code
/// distinguishes static errors from runtime errors.
pub fn run(file_path: &str, no_fold: bool) -> Result<i32> {
    let source = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read source file: {}", file_path))?;

    let runtime = Kestrel::new();
    runtime.set_folding(!no_fold);

    match runtime.eval_named(&source, file_path) {
        Ok(value) => {
            if !matches!(value, Value::Null) {
                println!("{}", value);
            }
            Ok(0)
        }
        Err(diagnostics) => {
            super::report(&diagnostics);
            Ok(super::exit_code(&diagnostics))
        }
    }
}
