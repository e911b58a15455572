//! Device-name filtering.
//!
//! The filter text is matched case-insensitively against `name` only. In the
//! default literal mode regex metacharacters are escaped first, so `sensor.1`
//! matches a literal dot.

use crate::record::Record;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Characters escaped before the filter text is compiled.
const METACHARACTERS: &[char] = &[
    '.', '*', '+', '?', '^', '$', '{', '}', '(', ')', '|', '[', ']', '\\',
];

/// Compiled patterns above this size are rejected instead of built.
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("invalid filter pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Escape metacharacters; the text is matched as a substring.
    #[default]
    Literal,
    /// Compile the text as a regular expression.
    Regex,
}

impl FilterMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterMode::Literal => "literal",
            FilterMode::Regex => "regex",
        }
    }
}

pub fn escape_pattern(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if METACHARACTERS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// A compiled name filter. `None` inside means "match everything".
#[derive(Debug, Clone)]
pub struct NamePattern {
    regex: Option<Regex>,
}

impl NamePattern {
    pub fn compile(raw: &str, mode: FilterMode) -> Result<Self, FilterError> {
        if raw.is_empty() {
            return Ok(Self { regex: None });
        }
        let source = match mode {
            FilterMode::Literal => escape_pattern(raw),
            FilterMode::Regex => raw.to_string(),
        };
        let regex = RegexBuilder::new(&source)
            .case_insensitive(true)
            .size_limit(PATTERN_SIZE_LIMIT)
            .build()
            .map_err(|e| FilterError::InvalidPattern {
                pattern: raw.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { regex: Some(regex) })
    }

    pub fn is_identity(&self) -> bool {
        self.regex.is_none()
    }

    pub fn matches(&self, record: &Record) -> bool {
        match &self.regex {
            Some(regex) => regex.is_match(&record.name),
            None => true,
        }
    }

    pub fn apply<'a, I>(&self, records: I) -> Vec<&'a Record>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

/// Narrow `records` to those whose name matches `raw`.
pub fn filter_records<'a>(
    records: &'a [Record],
    raw: &str,
    mode: FilterMode,
) -> Result<Vec<&'a Record>, FilterError> {
    Ok(NamePattern::compile(raw, mode)?.apply(records))
}
