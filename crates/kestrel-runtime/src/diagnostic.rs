//! Diagnostic system for errors and warnings
//!
//! Lexer, parser, resolver, and runtime failures all flow through the
//! unified Diagnostic type, ensuring consistent formatting across phases.

use crate::span::Span;
use std::fmt;

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    /// Fatal error that prevents execution
    Error,
    /// Warning that does not prevent execution
    Warning,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Error => write!(f, "error"),
            DiagnosticLevel::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message (error or warning)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity level
    pub level: DiagnosticLevel,
    /// Error code (e.g., "KS0001")
    pub code: String,
    /// Main diagnostic message
    pub message: String,
    /// Byte span in the original source
    pub span: Span,
    /// File path
    pub file: String,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// Length of error span
    pub length: usize,
    /// Source line string
    pub snippet: String,
    /// Short label for caret range
    pub label: String,
    /// Additional notes (optional)
    pub notes: Vec<String>,
    /// Suggested fix (optional)
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic with code
    pub fn error_with_code(
        code: impl Into<String>,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            level: DiagnosticLevel::Error,
            code: code.into(),
            message: message.into(),
            span,
            file: "<script>".to_string(),
            line: 1,
            column: 1,
            length: span.len(),
            snippet: String::new(),
            label: String::new(),
            notes: Vec::new(),
            help: None,
        }
    }

    /// Create a new warning diagnostic with code
    pub fn warning_with_code(
        code: impl Into<String>,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            code: code.into(),
            message: message.into(),
            span,
            file: "<script>".to_string(),
            line: 1,
            column: 1,
            length: span.len(),
            snippet: String::new(),
            label: String::new(),
            notes: Vec::new(),
            help: None,
        }
    }

    /// Create a new error diagnostic (uses generic error code)
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::error_with_code(error_codes::GENERIC_ERROR, message, span)
    }

    /// Create a new warning diagnostic (uses generic warning code)
    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self::warning_with_code(error_codes::GENERIC_WARNING, message, span)
    }

    /// Set the file path
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = file.into();
        self
    }

    /// Set the line number
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// Set the snippet (source line)
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = snippet.into();
        self
    }

    /// Set the label (caret description)
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Add a note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Add a help message
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Fill line, column, and snippet from the source text this
    /// diagnostic's span points into. Spans past the end of the source
    /// (synthesized nodes) leave the defaults untouched.
    pub fn annotate(mut self, source: &str, file: &str) -> Self {
        self.file = file.to_string();
        if self.span.start > source.len() {
            return self;
        }
        let (line, column) = line_column(source, self.span.start);
        self.line = line;
        self.column = column;
        self.snippet = source
            .lines()
            .nth(line.saturating_sub(1))
            .unwrap_or("")
            .to_string();
        if self.length == 0 {
            self.length = 1;
        }
        self
    }

    /// Format as human-readable string
    pub fn to_human_string(&self) -> String {
        let mut output = String::new();

        // Header: error[KS0001]: Operands must be numbers.
        output.push_str(&format!(
            "{}[{}]: {}\n",
            self.level, self.code, self.message
        ));

        // Location: --> path/to/file.kst:12:9
        output.push_str(&format!(
            "  --> {}:{}:{}\n",
            self.file, self.line, self.column
        ));

        // Snippet with caret
        if !self.snippet.is_empty() {
            output.push_str("   |\n");
            output.push_str(&format!("{:>2} | {}\n", self.line, self.snippet));

            // Caret line
            if self.length > 0 {
                let padding = " ".repeat(self.column.saturating_sub(1));
                let carets = "^".repeat(self.length.min(self.snippet.len().max(1)));
                output.push_str(&format!("   | {}{}", padding, carets));

                if !self.label.is_empty() {
                    output.push_str(&format!(" {}", self.label));
                }
                output.push('\n');
            }
        }

        // Notes
        for note in &self.notes {
            output.push_str(&format!("   = note: {}\n", note));
        }

        // Help
        if let Some(help) = &self.help {
            output.push_str(&format!("   = help: {}\n", help));
        }

        output
    }
}

/// Compute the 1-based line and column for a byte offset
pub fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for (i, ch) in source.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

/// Sort diagnostics by level (errors first), then by location
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| {
        // Errors before warnings
        match (a.level, b.level) {
            (DiagnosticLevel::Error, DiagnosticLevel::Warning) => std::cmp::Ordering::Less,
            (DiagnosticLevel::Warning, DiagnosticLevel::Error) => std::cmp::Ordering::Greater,
            _ => {
                // Same level: sort by file, line, column
                a.file
                    .cmp(&b.file)
                    .then(a.line.cmp(&b.line))
                    .then(a.column.cmp(&b.column))
            }
        }
    });
}

/// Error code registry
pub mod error_codes {
    // KS0xxx - Runtime Errors
    pub const TYPE_MISMATCH: &str = "KS0001";
    pub const UNDEFINED_VARIABLE: &str = "KS0002";
    pub const UNDEFINED_PROPERTY: &str = "KS0003";
    pub const DIVIDE_BY_ZERO: &str = "KS0004";
    pub const INDEX_OUT_OF_RANGE: &str = "KS0005";
    pub const INVALID_INDEX: &str = "KS0006";
    pub const NOT_CALLABLE: &str = "KS0007";
    pub const ARITY_MISMATCH: &str = "KS0008";
    pub const ALREADY_DEFINED: &str = "KS0009";
    pub const INVALID_THROW: &str = "KS0010";
    pub const UNCAUGHT_EXCEPTION: &str = "KS0011";
    pub const EMPTY_LIST: &str = "KS0012";
    pub const BAD_SUPERCLASS: &str = "KS0013";
    pub const UNORDERABLE_LIST: &str = "KS0014";
    pub const IO_ERROR: &str = "KS0100";

    // KS1xxx - Syntax Errors
    pub const SYNTAX_ERROR: &str = "KS1000";
    pub const UNEXPECTED_TOKEN: &str = "KS1001";
    pub const UNTERMINATED_STRING: &str = "KS1002";
    pub const INVALID_ESCAPE: &str = "KS1003";
    pub const UNTERMINATED_COMMENT: &str = "KS1004";
    pub const UNEXPECTED_CHARACTER: &str = "KS1005";
    pub const INVALID_ASSIGNMENT_TARGET: &str = "KS1006";

    // KS2xxx - Resolution Errors
    pub const SELF_REFERENTIAL_INITIALIZER: &str = "KS2001";
    pub const DUPLICATE_DECLARATION: &str = "KS2002";
    pub const INVALID_RETURN: &str = "KS2003";
    pub const INITIALIZER_RETURN: &str = "KS2004";
    pub const INVALID_THIS: &str = "KS2005";
    pub const INVALID_SUPER: &str = "KS2006";
    pub const SELF_INHERITANCE: &str = "KS2007";
    pub const INVALID_LOOP_CONTROL: &str = "KS2008";

    // KS9xxx - Internal Errors
    pub const INTERNAL_ERROR: &str = "KS9995";
    pub const GENERIC_ERROR: &str = "KS9999";
    pub const GENERIC_WARNING: &str = "KW9999";
}
