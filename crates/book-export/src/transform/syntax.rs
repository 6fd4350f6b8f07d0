//! Line lexer over syntect grammars
//!
//! Scopes assigned by the grammar are folded onto the token kinds the color
//! table knows about. Each line is parsed from a fresh state.

use super::code::{Lexer, Token};
use crate::types::LexError;
use std::sync::Arc;
use syntect::parsing::{ParseState, Scope, ScopeStack, SyntaxReference, SyntaxSet};

/// Scope prefixes and the token kind they map to, most specific first
const SCOPE_KINDS: &[(&str, &str)] = &[
    ("comment", "comment"),
    ("string", "string"),
    ("constant.character", "string"),
    ("constant.numeric", "number"),
    ("keyword.operator", "operator"),
    ("keyword", "keyword"),
    ("storage", "keyword"),
    ("constant.language", "keyword"),
    ("variable.language", "keyword"),
    ("entity.name.function", "function"),
    ("variable.function", "function"),
    ("support.function", "function"),
    ("entity.name.class", "class-name"),
    ("entity.name.struct", "class-name"),
    ("entity.name.interface", "class-name"),
    ("entity.name.enum", "class-name"),
    ("entity.name.type", "class-name"),
    ("entity.other.inherited-class", "class-name"),
    ("support.class", "class-name"),
    ("support.type", "class-name"),
    ("punctuation", "punctuation"),
];

/// Scopes that open embedded code; text inside is classified on its own
const EMBEDDED_SCOPES: &[&str] = &["meta.interpolation", "meta.embedded", "source"];

/// Quote and comment delimiters take the color of what they delimit
const DELIMITER_SCOPES: &[&str] = &["punctuation.definition.string", "punctuation.definition.comment"];

#[derive(Debug, Clone)]
pub struct SyntectLexer {
    syntaxes: Arc<SyntaxSet>,
    syntax: SyntaxReference,
}

impl Default for SyntectLexer {
    fn default() -> Self {
        Self::csharp()
    }
}

impl SyntectLexer {
    /// Lexer for C# from the bundled grammars
    pub fn csharp() -> Self {
        Self::for_extension(SyntaxSet::load_defaults_newlines(), "cs")
    }

    /// Lexer for the grammar registered for `extension`. Falls back to plain
    /// text, which yields only untyped tokens.
    pub fn for_extension(syntaxes: SyntaxSet, extension: &str) -> Self {
        let syntax = match syntaxes.find_syntax_by_extension(extension) {
            Some(syntax) => syntax.clone(),
            None => {
                log::warn!("No grammar for .{} files, code will not be colored", extension);
                syntaxes.find_syntax_plain_text().clone()
            }
        };
        Self {
            syntaxes: Arc::new(syntaxes),
            syntax,
        }
    }

    pub fn syntax_name(&self) -> &str {
        &self.syntax.name
    }
}

impl Lexer for SyntectLexer {
    fn tokenize(&self, line: &str) -> Result<Vec<Token>, LexError> {
        // The bundled grammars expect newline-terminated input
        let input = format!("{}\n", line);
        let mut state = ParseState::new(&self.syntax);
        let ops = state
            .parse_line(&input, &self.syntaxes)
            .map_err(|e| LexError::Parse(e.to_string()))?;

        let mut stack = ScopeStack::new();
        let mut tokens = Vec::new();
        let mut cursor = 0;
        for (index, op) in &ops {
            let index = (*index).min(line.len());
            if index > cursor {
                push_token(&mut tokens, &line[cursor..index], stack.as_slice());
                cursor = index;
            }
            stack
                .apply(op)
                .map_err(|e| LexError::Scope(format!("{:?}", e)))?;
        }
        if cursor < line.len() {
            push_token(&mut tokens, &line[cursor..], stack.as_slice());
        }
        Ok(tokens)
    }
}

fn push_token(tokens: &mut Vec<Token>, text: &str, scopes: &[Scope]) {
    let token = match token_kind(scopes) {
        Some(kind) => Token::typed(kind, text),
        None => Token::Text(text.to_string()),
    };
    tokens.push(token);
}

/// Kind of the innermost scope that maps to one
fn token_kind(scopes: &[Scope]) -> Option<&'static str> {
    for scope in scopes.iter().rev() {
        let name = scope.build_string();
        if DELIMITER_SCOPES.iter().any(|prefix| has_prefix(&name, prefix)) {
            continue;
        }
        if let Some((_, kind)) = SCOPE_KINDS
            .iter()
            .find(|(prefix, _)| has_prefix(&name, prefix))
        {
            return Some(*kind);
        }
        if EMBEDDED_SCOPES.iter().any(|prefix| has_prefix(&name, prefix)) {
            return None;
        }
    }
    None
}

/// Scope-segment prefix match: `string` matches `string.quoted` but not `strings`
fn has_prefix(name: &str, prefix: &str) -> bool {
    name == prefix
        || name
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('.'))
}
