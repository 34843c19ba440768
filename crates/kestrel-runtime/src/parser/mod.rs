//! Parsing (tokens to AST)
//!
//! The parser converts a stream of tokens into an Abstract Syntax Tree (AST).
//! Uses Pratt parsing for expressions and recursive descent for statements.
//! Each resolvable expression (variable, assignment, `this`, `super`) is
//! stamped with a fresh `NodeId` as it is built; callers that parse more than
//! once into the same interpreter session pass the previous high-water mark
//! so ids stay unique across parses.

mod expr;
mod stmt;

use crate::ast::*;
use crate::diagnostic::{error_codes, Diagnostic};
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Parser state for building AST from tokens
pub struct Parser {
    pub(super) tokens: Vec<Token>,
    pub(super) current: usize,
    pub(super) diagnostics: Vec<Diagnostic>,
    next_id: u32,
}

/// Operator precedence levels for Pratt parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(super) enum Precedence {
    Lowest,
    Or,         // or
    And,        // and
    Equality,   // == !=
    Comparison, // < <= > >=
    Term,       // + -
    Factor,     // * / %
    Unary,      // ! -
    Call,       // () [] .
}

impl Parser {
    /// Create a new parser for the given tokens
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_start_id(tokens, 0)
    }

    /// Create a parser whose first minted `NodeId` is `first_id`
    ///
    /// The REPL and repeated `eval` calls parse into one long-lived
    /// interpreter, so node ids must keep counting up rather than restart
    /// at zero and alias entries in the resolver's locals table.
    pub fn with_start_id(tokens: Vec<Token>, first_id: u32) -> Self {
        Self {
            tokens,
            current: 0,
            diagnostics: Vec::new(),
            next_id: first_id,
        }
    }

    /// The id the next minted node would receive
    pub fn next_node_id(&self) -> u32 {
        self.next_id
    }

    /// Parse tokens into an AST
    pub fn parse(&mut self) -> (Program, Vec<Diagnostic>) {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(_) => self.synchronize(),
            }
        }

        (Program { statements }, std::mem::take(&mut self.diagnostics))
    }

    // === Helper methods ===

    /// Mint a fresh node id
    pub(super) fn mint_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Advance to next token and return reference to previous
    pub(super) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        &self.tokens[self.current - 1]
    }

    /// Peek at current token
    pub(super) fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    /// Check if current token matches kind
    pub(super) fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    /// Match and consume token if it matches
    pub(super) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume token of given kind or error
    pub(super) fn consume(&mut self, kind: TokenKind, message: &str) -> Result<&Token, ()> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            self.error_with_code(error_codes::UNEXPECTED_TOKEN, message);
            Err(())
        }
    }

    /// Check if at end of token stream
    pub(super) fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len() || self.tokens[self.current].kind == TokenKind::Eof
    }

    /// Record a generic syntax error at the current token
    pub(super) fn error(&mut self, message: &str) {
        self.error_with_code(error_codes::SYNTAX_ERROR, message);
    }

    /// Record a syntax error with a specific code at the current token
    pub(super) fn error_with_code(&mut self, code: &str, message: &str) {
        let span = self.peek().span;
        self.error_at(span, code, message);
    }

    /// Record a syntax error at an explicit span
    pub(super) fn error_at(&mut self, span: Span, code: &str, message: &str) {
        self.diagnostics.push(
            Diagnostic::error_with_code(code, message, span)
                .with_label("syntax error")
                .with_help("check your syntax for typos or missing tokens"),
        );
    }

    /// Check if a token kind is a reserved keyword
    fn is_reserved_keyword(kind: TokenKind) -> bool {
        matches!(
            kind,
            TokenKind::And
                | TokenKind::Break
                | TokenKind::Catch
                | TokenKind::Class
                | TokenKind::Continue
                | TokenKind::Else
                | TokenKind::False
                | TokenKind::Finally
                | TokenKind::Fn
                | TokenKind::For
                | TokenKind::If
                | TokenKind::Null
                | TokenKind::Or
                | TokenKind::Print
                | TokenKind::Return
                | TokenKind::Super
                | TokenKind::This
                | TokenKind::Throw
                | TokenKind::True
                | TokenKind::Try
                | TokenKind::Var
                | TokenKind::While
        )
    }

    /// Consume an identifier token with enhanced error message for keywords
    pub(super) fn consume_identifier(&mut self, context: &str) -> Result<&Token, ()> {
        let current = self.peek();

        if Self::is_reserved_keyword(current.kind) {
            let keyword_name = current.lexeme.clone();
            self.error(&format!(
                "Cannot use reserved keyword '{}' as {}",
                keyword_name, context
            ));
            Err(())
        } else if current.kind == TokenKind::Identifier {
            Ok(self.advance())
        } else {
            let found = current.kind.as_str();
            self.error_with_code(
                error_codes::UNEXPECTED_TOKEN,
                &format!("Expected {} but found '{}'", context, found),
            );
            Err(())
        }
    }

    /// Synchronize after error
    pub(super) fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.tokens[self.current - 1].kind == TokenKind::Semicolon {
                return;
            }

            match self.peek().kind {
                TokenKind::Class
                | TokenKind::Fn
                | TokenKind::Var
                | TokenKind::If
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Print
                | TokenKind::Return
                | TokenKind::Throw
                | TokenKind::Try => return,
                _ => {
                    self.advance();
                }
            }
        }
    }
}
