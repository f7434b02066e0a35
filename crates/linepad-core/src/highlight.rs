//! Highlighter seam.
//!
//! The core asks a [`Highlighter`] to decorate a line's text whenever a render slot is bound
//! to a line or the bound line's text changes. Decoration only feeds the slot's visual
//! content; row and column arithmetic never looks at it.
//!
//! Concrete highlighters live outside this crate (see `linepad-highlight-simple`);
//! [`PlainHighlighter`] is the default.

use serde::{Deserialize, Serialize};

/// Category of a lexeme, mapped to a color by the presentation surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenCategory {
    /// Undecorated text.
    Plain,
    /// Runs of spaces.
    Whitespace,
    /// Reserved word of the language.
    Keyword,
    /// Name that is not a keyword.
    Identifier,
    /// Identifier in call position.
    Function,
    /// Numeric literal.
    Number,
    /// Quoted string literal.
    String,
    /// Operators, brackets, separators.
    Punctuation,
    /// Comment text.
    Comment,
}

/// One decorated run of a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledRun {
    /// Category of the run.
    pub category: TokenCategory,
    /// Exact source text of the run.
    pub lexeme: String,
}

impl StyledRun {
    /// Create a run.
    pub fn new(category: TokenCategory, lexeme: impl Into<String>) -> Self {
        Self {
            category,
            lexeme: lexeme.into(),
        }
    }
}

/// Turns a line's text into an ordered sequence of decorated runs.
///
/// Implementations must be pure and must cover the input exactly: concatenating the lexemes
/// of the returned runs yields `line`.
pub trait Highlighter {
    /// Decorate one line of text (without its line break).
    fn decorate(&self, line: &str) -> Vec<StyledRun>;
}

/// Highlighter that emits the whole line as a single [`TokenCategory::Plain`] run.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainHighlighter;

impl Highlighter for PlainHighlighter {
    fn decorate(&self, line: &str) -> Vec<StyledRun> {
        if line.is_empty() {
            return Vec::new();
        }
        vec![StyledRun::new(TokenCategory::Plain, line)]
    }
}

impl<F> Highlighter for F
where
    F: Fn(&str) -> Vec<StyledRun>,
{
    fn decorate(&self, line: &str) -> Vec<StyledRun> {
        self(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_highlighter() {
        assert!(PlainHighlighter.decorate("").is_empty());
        assert_eq!(
            PlainHighlighter.decorate("let x"),
            vec![StyledRun::new(TokenCategory::Plain, "let x")]
        );
    }

    #[test]
    fn test_closure_highlighter() {
        let upper = |line: &str| vec![StyledRun::new(TokenCategory::Keyword, line)];
        assert_eq!(upper.decorate("if")[0].category, TokenCategory::Keyword);
    }
}
