//! AST dump command - output the parse tree as JSON

use anyhow::{Context, Result};
use kestrel_runtime::{Kestrel, VersionedProgram};
use std::fs;

/// Parse a source file and print the versioned AST as pretty JSON
///
/// With `fold`, the constant folding pass runs before the dump, so the
/// output shows the tree the interpreter would actually walk.
pub fn run(file_path: &str, fold: bool) -> Result<i32> {
    let source = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read source file: {}", file_path))?;

    let runtime = Kestrel::new();
    runtime.set_folding(fold);

    match runtime.parse_program(&source, file_path) {
        Ok(program) => {
            let versioned = VersionedProgram::new(program);
            println!("{}", versioned.to_json()?);
            Ok(0)
        }
        Err(diagnostics) => {
            super::report(&diagnostics);
            Ok(super::EXIT_STATIC)
        }
    }
}
