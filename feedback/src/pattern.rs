use std::fmt;

use fancy_regex::Regex;

use crate::error::{FeedbackError, Result};

const DELIMITER: char = '/';

/// A regular expression written as `/body/flags`, as used by `af_when_regex`.
///
/// A pattern without a leading delimiter is taken as the body with no flags.
/// Supported flags are `i`, `m`, `s` and `x`; `u` is accepted and ignored
/// since matching is always Unicode aware.
#[derive(Debug, Clone)]
pub struct DelimitedPattern {
    delimited: String,
    regex: Regex,
}

impl DelimitedPattern {
    pub fn parse(pattern: &str) -> Result<Self> {
        let pattern = pattern.trim();
        let delimited = if pattern.starts_with(DELIMITER) {
            pattern.to_string()
        } else {
            format!("{DELIMITER}{pattern}{DELIMITER}")
        };

        let (body, flags) =
            split_delimited(&delimited).ok_or_else(|| FeedbackError::MissingDelimiter {
                pattern: delimited.clone(),
            })?;

        let mut inline_flags = String::new();
        for flag in flags.chars() {
            match flag {
                'i' | 'm' | 's' | 'x' => {
                    if !inline_flags.contains(flag) {
                        inline_flags.push(flag);
                    }
                }
                'u' => (),
                _ => {
                    return Err(FeedbackError::UnknownRegexFlag {
                        pattern: delimited.clone(),
                        flag,
                    })
                }
            }
        }

        let source = if inline_flags.is_empty() {
            body.to_string()
        } else {
            format!("(?{inline_flags}){body}")
        };
        let regex = Regex::new(&source).map_err(|source| FeedbackError::Pattern {
            pattern: delimited.clone(),
            source,
        })?;

        Ok(Self { delimited, regex })
    }

    /// The pattern as written, always in `/body/flags` form.
    pub fn as_str(&self) -> &str {
        &self.delimited
    }

    /// Searches `haystack` for a match anywhere in it.
    pub fn is_match(&self, haystack: &str) -> Result<bool> {
        self.regex
            .is_match(haystack)
            .map_err(|source| FeedbackError::Pattern {
                pattern: self.delimited.clone(),
                source,
            })
    }
}

impl PartialEq for DelimitedPattern {
    fn eq(&self, other: &Self) -> bool {
        self.delimited == other.delimited
    }
}

impl fmt::Display for DelimitedPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.delimited)
    }
}

fn split_delimited(delimited: &str) -> Option<(&str, &str)> {
    let inner = delimited.strip_prefix(DELIMITER)?;
    let end = inner.rfind(DELIMITER)?;
    Some((&inner[..end], &inner[end + DELIMITER.len_utf8()..]))
}
