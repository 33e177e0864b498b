//! SQL `LIKE` pattern matching.
//!
//! `%` matches any run of characters, `_` matches exactly one character and
//! a backslash escapes the next character. Matching is case-insensitive, the
//! way the default collations of common SQL servers behave.

use regex::{Regex, RegexBuilder};

use crate::error::Result;

/// A compiled `LIKE` pattern.
#[derive(Debug, Clone)]
pub struct LikePattern {
    source: String,
    regex: Regex,
}

impl LikePattern {
    /// Compiles a `LIKE` pattern.
    pub fn new(pattern: &str) -> Result<Self> {
        let mut translated = String::with_capacity(pattern.len() + 8);
        translated.push('^');

        let mut literal = String::new();
        let mut chars = pattern.chars();
        while let Some(c) = chars.next() {
            match c {
                '%' | '_' => {
                    translated.push_str(&regex::escape(&literal));
                    literal.clear();
                    translated.push_str(if c == '%' { ".*" } else { "." });
                }
                '\\' => match chars.next() {
                    Some(escaped) => literal.push(escaped),
                    None => literal.push('\\'),
                },
                other => literal.push(other),
            }
        }
        translated.push_str(&regex::escape(&literal));
        translated.push('$');

        let regex = RegexBuilder::new(&translated)
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()?;

        Ok(LikePattern {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Returns the pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Tests a value against the pattern.
    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl PartialEq for LikePattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}
