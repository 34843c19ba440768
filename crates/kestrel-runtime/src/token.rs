//! Token types for lexical analysis
//!
//! Defines all token types recognized by the Kestrel lexer.

use crate::span::Span;
use serde::{Deserialize, Serialize};

/// Token produced by the lexer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The source text of this token
    pub lexeme: String,
    /// Source location
    pub span: Span,
}

impl Token {
    /// Create a new token
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }
}

/// Classification of token types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Literals
    /// Number literal (42, 3.14)
    Number,
    /// String literal ("hello")
    String,
    /// `true` keyword
    True,
    /// `false` keyword
    False,
    /// `null` keyword
    Null,
    /// Identifier
    Identifier,

    // Keywords
    /// `var` keyword (variable declaration)
    Var,
    /// `fn` keyword (function or method declaration)
    Fn,
    /// `class` keyword
    Class,
    /// `if` keyword
    If,
    /// `else` keyword
    Else,
    /// `while` keyword
    While,
    /// `for` keyword
    For,
    /// `return` keyword
    Return,
    /// `break` keyword
    Break,
    /// `continue` keyword
    Continue,
    /// `print` keyword (statement)
    Print,
    /// `and` keyword (short-circuit logical and)
    And,
    /// `or` keyword (short-circuit logical or)
    Or,
    /// `this` keyword
    This,
    /// `super` keyword
    Super,
    /// `throw` keyword
    Throw,
    /// `try` keyword
    Try,
    /// `catch` keyword
    Catch,
    /// `finally` keyword
    Finally,

    // Operators
    /// `+` (addition, concatenation)
    Plus,
    /// `-` (subtraction or negation)
    Minus,
    /// `*` (multiplication)
    Star,
    /// `/` (division)
    Slash,
    /// `%` (modulo)
    Percent,
    /// `!` (logical not)
    Bang,
    /// `==` (equality)
    EqualEqual,
    /// `!=` (inequality)
    BangEqual,
    /// `<` (less than)
    Less,
    /// `<=` (less than or equal)
    LessEqual,
    /// `>` (greater than)
    Greater,
    /// `>=` (greater than or equal)
    GreaterEqual,

    // Punctuation
    /// `=` (assignment)
    Equal,
    /// `(` (left parenthesis)
    LeftParen,
    /// `)` (right parenthesis)
    RightParen,
    /// `{` (left brace)
    LeftBrace,
    /// `}` (right brace)
    RightBrace,
    /// `[` (left bracket)
    LeftBracket,
    /// `]` (right bracket)
    RightBracket,
    /// `;` (semicolon)
    Semicolon,
    /// `,` (comma)
    Comma,
    /// `:` (superclass clause)
    Colon,
    /// `.` (property access)
    Dot,

    // Special
    /// End of file
    Eof,
    /// Lexer error
    Error,
}

impl TokenKind {
    /// Check if a string is a keyword and return its token kind
    pub fn is_keyword(s: &str) -> Option<TokenKind> {
        match s {
            "and" => Some(TokenKind::And),
            "break" => Some(TokenKind::Break),
            "catch" => Some(TokenKind::Catch),
            "class" => Some(TokenKind::Class),
            "continue" => Some(TokenKind::Continue),
            "else" => Some(TokenKind::Else),
            "false" => Some(TokenKind::False),
            "finally" => Some(TokenKind::Finally),
            "fn" => Some(TokenKind::Fn),
            "for" => Some(TokenKind::For),
            "if" => Some(TokenKind::If),
            "null" => Some(TokenKind::Null),
            "or" => Some(TokenKind::Or),
            "print" => Some(TokenKind::Print),
            "return" => Some(TokenKind::Return),
            "super" => Some(TokenKind::Super),
            "this" => Some(TokenKind::This),
            "throw" => Some(TokenKind::Throw),
            "true" => Some(TokenKind::True),
            "try" => Some(TokenKind::Try),
            "var" => Some(TokenKind::Var),
            "while" => Some(TokenKind::While),
            _ => None,
        }
    }

    /// Get the string representation of this token kind
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
            TokenKind::Identifier => "identifier",
            TokenKind::Var => "var",
            TokenKind::Fn => "fn",
            TokenKind::Class => "class",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::While => "while",
            TokenKind::For => "for",
            TokenKind::Return => "return",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::Print => "print",
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::This => "this",
            TokenKind::Super => "super",
            TokenKind::Throw => "throw",
            TokenKind::Try => "try",
            TokenKind::Catch => "catch",
            TokenKind::Finally => "finally",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Bang => "!",
            TokenKind::EqualEqual => "==",
            TokenKind::BangEqual => "!=",
            TokenKind::Less => "<",
            TokenKind::LessEqual => "<=",
            TokenKind::Greater => ">",
            TokenKind::GreaterEqual => ">=",
            TokenKind::Equal => "=",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::LeftBracket => "[",
            TokenKind::RightBracket => "]",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Dot => ".",
            TokenKind::Eof => "EOF",
            TokenKind::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_creation() {
        let token = Token::new(TokenKind::Number, "42", Span::new(0, 2));
        assert_eq!(token.kind, TokenKind::Number);
        assert_eq!(token.lexeme, "42");
        assert_eq!(token.span, Span::new(0, 2));
    }

    #[test]
    fn test_keyword_detection() {
        assert_eq!(TokenKind::is_keyword("var"), Some(TokenKind::Var));
        assert_eq!(TokenKind::is_keyword("fn"), Some(TokenKind::Fn));
        assert_eq!(TokenKind::is_keyword("class"), Some(TokenKind::Class));
        assert_eq!(TokenKind::is_keyword("if"), Some(TokenKind::If));
        assert_eq!(TokenKind::is_keyword("else"), Some(TokenKind::Else));
        assert_eq!(TokenKind::is_keyword("while"), Some(TokenKind::While));
        assert_eq!(TokenKind::is_keyword("for"), Some(TokenKind::For));
        assert_eq!(TokenKind::is_keyword("return"), Some(TokenKind::Return));
        assert_eq!(TokenKind::is_keyword("break"), Some(TokenKind::Break));
        assert_eq!(TokenKind::is_keyword("continue"), Some(TokenKind::Continue));
        assert_eq!(TokenKind::is_keyword("print"), Some(TokenKind::Print));
        assert_eq!(TokenKind::is_keyword("true"), Some(TokenKind::True));
        assert_eq!(TokenKind::is_keyword("false"), Some(TokenKind::False));
        assert_eq!(TokenKind::is_keyword("null"), Some(TokenKind::Null));
    }

    #[test]
    fn test_exception_keywords() {
        assert_eq!(TokenKind::is_keyword("throw"), Some(TokenKind::Throw));
        assert_eq!(TokenKind::is_keyword("try"), Some(TokenKind::Try));
        assert_eq!(TokenKind::is_keyword("catch"), Some(TokenKind::Catch));
        assert_eq!(TokenKind::is_keyword("finally"), Some(TokenKind::Finally));
    }

    #[test]
    fn test_class_keywords() {
        assert_eq!(TokenKind::is_keyword("this"), Some(TokenKind::This));
        assert_eq!(TokenKind::is_keyword("super"), Some(TokenKind::Super));
    }

    #[test]
    fn test_logical_keywords() {
        assert_eq!(TokenKind::is_keyword("and"), Some(TokenKind::And));
        assert_eq!(TokenKind::is_keyword("or"), Some(TokenKind::Or));
    }

    #[test]
    fn test_non_keyword() {
        assert_eq!(TokenKind::is_keyword("foo"), None);
        assert_eq!(TokenKind::is_keyword("x"), None);
        assert_eq!(TokenKind::is_keyword("Var"), None); // Case-sensitive
    }

    #[test]
    fn test_token_kind_as_str() {
        assert_eq!(TokenKind::Var.as_str(), "var");
        assert_eq!(TokenKind::Plus.as_str(), "+");
        assert_eq!(TokenKind::EqualEqual.as_str(), "==");
        assert_eq!(TokenKind::Dot.as_str(), ".");
    }

    #[test]
    fn test_all_operators() {
        let operators = vec![
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::Bang,
            TokenKind::EqualEqual,
            TokenKind::BangEqual,
            TokenKind::Less,
            TokenKind::LessEqual,
            TokenKind::Greater,
            TokenKind::GreaterEqual,
        ];

        for op in operators {
            assert!(!op.as_str().is_empty());
        }
    }

    #[test]
    fn test_all_punctuation() {
        let punctuation = vec![
            TokenKind::Equal,
            TokenKind::LeftParen,
            TokenKind::RightParen,
            TokenKind::LeftBrace,
            TokenKind::RightBrace,
            TokenKind::LeftBracket,
            TokenKind::RightBracket,
            TokenKind::Semicolon,
            TokenKind::Comma,
            TokenKind::Colon,
            TokenKind::Dot,
        ];

        for punct in punctuation {
            assert!(!punct.as_str().is_empty());
        }
    }
}
