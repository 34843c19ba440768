//! CLI command implementations

pub mod ast;
pub mod check;
pub mod repl;
pub mod run;

use kestrel_runtime::Diagnostic;

/// Exit code for static errors (syntax and resolution), after EX_DATAERR
pub const EXIT_STATIC: i32 = 65;

/// Exit code for runtime errors, after EX_SOFTWARE
pub const EXIT_RUNTIME: i32 = 70;

/// Classify a failed evaluation into an exit code
///
/// Syntax (KS1xxx) and resolution (KS2xxx) diagnostics mean the program
/// never ran. Anything else made it to execution.
pub fn exit_code(diagnostics: &[Diagnostic]) -> i32 {
    let all_static = diagnostics
        .iter()
        .all(|d| d.code.starts_with("KS1") || d.code.starts_with("KS2"));
    if all_static {
        EXIT_STATIC
    } else {
        EXIT_RUNTIME
    }
}

/// Print diagnostics to stderr in human-readable form
pub fn report(diagnostics: &[Diagnostic]) {
    for diag in diagnostics {
        eprint!("{}", diag.to_human_string());
    }
}
