use regex::{Regex, RegexBuilder};
use std::fmt;

/// A title pattern with SQL `LIKE` semantics.
///
/// `%` matches any run of characters, `_` matches exactly one character and
/// `\` makes the next character literal. The pattern must match the whole
/// title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikePattern {
    raw: String,
}

impl LikePattern {
    /// Wraps an already formed pattern.
    pub fn new(raw: impl Into<String>) -> Self {
        LikePattern { raw: raw.into() }
    }

    /// Pattern matching any title that contains `keyword` literally.
    pub fn contains(keyword: &str) -> Self {
        let mut raw = String::with_capacity(keyword.len() + 2);
        raw.push('%');
        for c in keyword.chars() {
            if matches!(c, '%' | '_' | '\\') {
                raw.push('\\');
            }
            raw.push(c);
        }
        raw.push('%');
        LikePattern { raw }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Compiles the pattern into an anchored regular expression.
    pub fn to_regex(&self, case_insensitive: bool) -> Result<Regex, regex::Error> {
        let mut expr = String::with_capacity(self.raw.len() + 8);
        expr.push('^');

        let mut chars = self.raw.chars();
        while let Some(c) = chars.next() {
            match c {
                '%' => expr.push_str(".*"),
                '_' => expr.push('.'),
                // A trailing backslash stands for itself
                '\\' => push_literal(&mut expr, chars.next().unwrap_or('\\')),
                other => push_literal(&mut expr, other),
            }
        }
        expr.push('$');

        RegexBuilder::new(&expr)
            .case_insensitive(case_insensitive)
            .dot_matches_new_line(true)
            .build()
    }
}

fn push_literal(expr: &mut String, c: char) {
    let mut buf = [0u8; 4];
    expr.push_str(&regex::escape(c.encode_utf8(&mut buf)));
}

impl fmt::Display for LikePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
