//! File-based test corpus harness
//!
//! Drives `.kst` files through the runtime and compares against companion
//! snapshot files:
//!
//! - `tests/corpus/pass/**/*.kst` → printed output vs `.stdout` companion
//! - `tests/corpus/fail/**/*.kst` → diagnostics vs `.stderr` companion
//!
//! # Snapshot generation
//!
//! Set `UPDATE_CORPUS=1` to write actual output to snapshot files instead
//! of asserting. This is the workflow for adding corpus tests or updating
//! expected output after an intentional behavior change.
//!
//! ```
//! UPDATE_CORPUS=1 cargo test -p kestrel-runtime --test corpus
//! ```

use kestrel_runtime::Kestrel;
use rstest::rstest;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

/// Run a corpus file and return everything it printed.
///
/// Diagnostics become the error string so a failing pass/ test shows what
/// went wrong instead of an empty output diff.
fn run_pass(source: &str, label: &str) -> Result<String, String> {
    let runtime = Kestrel::new();
    let buffer: Rc<RefCell<Vec<u8>>> = Rc::new(RefCell::new(Vec::new()));
    runtime.set_output(buffer.clone());

    match runtime.eval_named(source, label) {
        Ok(_) => Ok(String::from_utf8_lossy(&buffer.borrow()).into_owned()),
        Err(diagnostics) => Err(diagnostics
            .iter()
            .map(|d| format!("error[{}]: {}", d.code, d.message))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// Run a corpus file that must fail and return its diagnostics, one
/// `error[CODE]: message` line each.
fn run_fail(source: &str, label: &str) -> String {
    let runtime = Kestrel::new();
    let buffer: Rc<RefCell<Vec<u8>>> = Rc::new(RefCell::new(Vec::new()));
    runtime.set_output(buffer.clone());

    match runtime.eval_named(source, label) {
        Ok(_) => "(no error: expected failure did not occur)\n".to_string(),
        Err(diagnostics) => diagnostics
            .iter()
            .map(|d| format!("error[{}]: {}\n", d.code, d.message))
            .collect(),
    }
}

/// Read the expected snapshot from disk, or write it when UPDATE_CORPUS=1.
fn assert_snapshot(snapshot_path: &PathBuf, actual: &str) {
    if std::env::var("UPDATE_CORPUS").is_ok() {
        if let Some(parent) = snapshot_path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create snapshot dir");
        }
        std::fs::write(snapshot_path, actual).expect("failed to write snapshot");
        return;
    }

    match std::fs::read_to_string(snapshot_path) {
        Ok(expected) => {
            assert_eq!(
                actual,
                expected.as_str(),
                "\nCorpus snapshot mismatch: {}\n\n--- expected\n+++ actual",
                snapshot_path.display()
            );
        }
        Err(_) => {
            panic!(
                "Missing snapshot: {}\n\
                 Run with UPDATE_CORPUS=1 to generate it.\n\
                 Actual output:\n---\n{}\n---",
                snapshot_path.display(),
                actual
            );
        }
    }
}

fn label_for(path: &PathBuf) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "corpus.kst".to_string())
}

#[rstest]
fn pass_corpus(#[files("tests/corpus/pass/**/*.kst")] path: PathBuf) {
    let source = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));

    let output = run_pass(&source, &label_for(&path))
        .unwrap_or_else(|e| panic!("Pass test failed: {}\nFile: {}", e, path.display()));

    let snapshot = path.with_extension("stdout");
    assert_snapshot(&snapshot, &output);
}

#[rstest]
fn fail_corpus(#[files("tests/corpus/fail/**/*.kst")] path: PathBuf) {
    let source = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));

    let error = run_fail(&source, &label_for(&path));

    let snapshot = path.with_extension("stderr");
    assert_snapshot(&snapshot, &error);
}
