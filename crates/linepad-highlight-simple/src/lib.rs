//! `linepad-highlight-simple` - Simple (regex-based) highlighting for `linepad-core`.
//!
//! A [`RuleHighlighter`] scans a line left to right. At each position the rules are tried in
//! order and the first one matching *at that position* produces a run; characters no rule
//! claims are collected into [`TokenCategory::Plain`] runs. The runs always concatenate back
//! to the input line, which is what the render slots require.
//!
//! This is a lexer-level highlighter: it has no state across lines (a block comment or a
//! template string spanning lines is not tracked).

use linepad_core::{Highlighter, StyledRun, TokenCategory};
use regex::Regex;

/// Reserved words recognised by [`RuleHighlighter::javascript_default`].
pub const JAVASCRIPT_KEYWORDS: &[&str] = &[
    "var", "let", "const", "export", "function", "case", "switch", "await", "async", "class",
    "new", "this", "private", "try", "catch", "finally", "default", "import", "from", "return",
    "for", "while", "if", "else", "break",
];

/// A single regex highlighting rule.
#[derive(Debug, Clone)]
pub struct TokenRule {
    regex: Regex,
    category: TokenCategory,
    capture_group: Option<usize>,
}

impl TokenRule {
    /// Rule matching `pattern` at the current scan position.
    pub fn new(pattern: &str, category: TokenCategory) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(&format!("^(?:{pattern})"))?,
            category,
            capture_group: None,
        })
    }

    /// Emit only a capture group of each match. The group must start at the scan position.
    ///
    /// Example (call site):
    /// - pattern: `([A-Za-z_$][A-Za-z0-9_$]*)\s*\(`
    /// - capture_group: `1` (the callee name; the paren is left for the next rule)
    pub fn with_capture_group(mut self, group: usize) -> Self {
        self.capture_group = Some(group);
        self
    }

    /// Category assigned to matches.
    pub fn category(&self) -> TokenCategory {
        self.category
    }

    /// Byte length of the token at the start of `rest`, if this rule matches there.
    fn match_len(&self, rest: &str) -> Option<usize> {
        let end = match self.capture_group {
            Some(group) => {
                let caps = self.regex.captures(rest)?;
                let m = caps.get(group)?;
                if m.start() != 0 {
                    return None;
                }
                m.end()
            }
            None => self.regex.find(rest)?.end(),
        };
        (end > 0).then_some(end)
    }
}

/// Ordered list of [`TokenRule`]s; the first rule matching at a position wins.
#[derive(Debug, Clone)]
pub struct RuleHighlighter {
    rules: Vec<TokenRule>,
}

impl RuleHighlighter {
    /// Highlighter trying `rules` in order.
    pub fn new(rules: Vec<TokenRule>) -> Self {
        Self { rules }
    }

    /// Rules in priority order.
    pub fn rules(&self) -> &[TokenRule] {
        &self.rules
    }

    /// A small JavaScript grammar: keywords, call-site names, identifiers, numbers, quoted
    /// strings, `//` comments and punctuation.
    pub fn javascript_default() -> Result<Self, regex::Error> {
        let keywords = JAVASCRIPT_KEYWORDS.join("|");
        Ok(Self::new(vec![
            TokenRule::new(r"[ \t]+", TokenCategory::Whitespace)?,
            TokenRule::new(r"//.*", TokenCategory::Comment)?,
            // Unterminated strings run to the end of the line.
            TokenRule::new(r#""(?:\\.|[^"\\])*"?"#, TokenCategory::String)?,
            TokenRule::new(r"'(?:\\.|[^'\\])*'?", TokenCategory::String)?,
            TokenRule::new(r"`(?:\\.|[^`\\])*`?", TokenCategory::String)?,
            TokenRule::new(&format!(r"(?:{keywords})\b"), TokenCategory::Keyword)?,
            TokenRule::new(r"([A-Za-z_$][A-Za-z0-9_$]*)\s*\(", TokenCategory::Function)?
                .with_capture_group(1),
            TokenRule::new(r"[A-Za-z_$][A-Za-z0-9_$]*", TokenCategory::Identifier)?,
            TokenRule::new(r"[0-9]+(?:\.[0-9]+)?", TokenCategory::Number)?,
            TokenRule::new(r"=>|[{}\[\]()+\-/*<>&^|%!?.;:,=~]", TokenCategory::Punctuation)?,
        ]))
    }

    /// A small JSON grammar (strings, numbers, booleans, null, punctuation).
    pub fn json_default() -> Result<Self, regex::Error> {
        Ok(Self::new(vec![
            TokenRule::new(r"[ \t]+", TokenCategory::Whitespace)?,
            TokenRule::new(r#""(?:\\.|[^"\\])*"?"#, TokenCategory::String)?,
            TokenRule::new(
                r"-?(?:0|[1-9][0-9]*)(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?",
                TokenCategory::Number,
            )?,
            TokenRule::new(r"(?:true|false|null)\b", TokenCategory::Keyword)?,
            TokenRule::new(r"[{}\[\]:,]", TokenCategory::Punctuation)?,
        ]))
    }

    fn match_at(&self, rest: &str) -> Option<(usize, TokenCategory)> {
        self.rules
            .iter()
            .find_map(|rule| rule.match_len(rest).map(|len| (len, rule.category)))
    }
}

impl Highlighter for RuleHighlighter {
    fn decorate(&self, line: &str) -> Vec<StyledRun> {
        let mut runs = Vec::new();
        let mut plain_start: Option<usize> = None;
        let mut pos = 0;

        while pos < line.len() {
            let rest = &line[pos..];
            match self.match_at(rest) {
                Some((len, category)) => {
                    if let Some(start) = plain_start.take() {
                        runs.push(StyledRun::new(TokenCategory::Plain, &line[start..pos]));
                    }
                    runs.push(StyledRun::new(category, &rest[..len]));
                    pos += len;
                }
                None => {
                    plain_start.get_or_insert(pos);
                    pos += rest.chars().next().map_or(1, char::len_utf8);
                }
            }
        }
        if let Some(start) = plain_start {
            runs.push(StyledRun::new(TokenCategory::Plain, &line[start..]));
        }
        runs
    }
}
