//! Source code to colored token runs
//!
//! Highlighting is cosmetic: a lexer failure degrades the whole block to a
//! single uncolored run and never reaches the caller.

use crate::constants::{DEFAULT_TOKEN_COLOR, FALLBACK_CODE_COLOR, UNTYPED_TOKEN_COLOR};
use crate::types::{Color, LexError};

/// Node of the token tree returned by a lexer
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Text the grammar gives no kind to
    Text(String),
    Typed { kind: String, content: TokenContent },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenContent {
    Text(String),
    Nested(Vec<Token>),
}

impl Token {
    pub fn typed(kind: &str, text: impl Into<String>) -> Self {
        Token::Typed {
            kind: kind.to_string(),
            content: TokenContent::Text(text.into()),
        }
    }

    pub fn nested(kind: &str, children: Vec<Token>) -> Self {
        Token::Typed {
            kind: kind.to_string(),
            content: TokenContent::Nested(children),
        }
    }
}

/// Lexer collaborator: tokenizes one line of source
pub trait Lexer {
    fn tokenize(&self, line: &str) -> Result<Vec<Token>, LexError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenRun {
    pub text: String,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeLine {
    /// 1-based line number shown in the left column
    pub number: usize,
    pub runs: Vec<TokenRun>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CodeBlock {
    Highlighted(Vec<CodeLine>),
    /// Whole source as one run, used when tokenizing failed
    Plain(TokenRun),
}

/// Color for a token kind
pub fn token_color(kind: &str) -> Color {
    match kind {
        "keyword" => Color::from_hex(0x005cc5),
        "string" => Color::from_hex(0xa31515),
        "comment" => Color::from_hex(0x6a737d),
        "class-name" => Color::from_hex(0x2b91af),
        "function" => Color::from_hex(0x795e26),
        "number" => Color::from_hex(0x008080),
        "operator" => Color::from_hex(0x000000),
        "punctuation" => Color::from_hex(0x333333),
        _ => DEFAULT_TOKEN_COLOR,
    }
}

/// Flatten a token tree into runs, in source order
///
/// Untyped text is always [`UNTYPED_TOKEN_COLOR`], including inside nested
/// groups; a nested group only contributes its children.
pub fn flatten_tokens(tokens: &[Token]) -> Vec<TokenRun> {
    let mut runs = Vec::new();
    flatten_into(tokens, &mut runs);
    runs
}

fn flatten_into(tokens: &[Token], runs: &mut Vec<TokenRun>) {
    for token in tokens {
        match token {
            Token::Text(text) => push_run(runs, text, UNTYPED_TOKEN_COLOR),
            Token::Typed {
                kind,
                content: TokenContent::Text(text),
            } => push_run(runs, text, token_color(kind)),
            Token::Typed {
                content: TokenContent::Nested(children),
                ..
            } => flatten_into(children, runs),
        }
    }
}

fn push_run(runs: &mut Vec<TokenRun>, text: &str, color: Color) {
    if text.is_empty() {
        return;
    }
    runs.push(TokenRun {
        text: text.to_string(),
        color,
    });
}

/// Highlight source text line by line
pub fn highlight_code(source: &str, lexer: &impl Lexer) -> CodeBlock {
    let mut lines = Vec::new();
    for (index, line) in source.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        match lexer.tokenize(line) {
            Ok(tokens) => lines.push(CodeLine {
                number: index + 1,
                runs: flatten_tokens(&tokens),
            }),
            Err(e) => {
                log::warn!("Error processing code: {}", e);
                return CodeBlock::Plain(TokenRun {
                    text: source.to_string(),
                    color: FALLBACK_CODE_COLOR,
                });
            }
        }
    }
    CodeBlock::Highlighted(lines)
}
