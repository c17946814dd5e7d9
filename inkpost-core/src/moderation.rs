//! Denylist for user supplied text

use std::collections::BTreeSet;

use thiserror::Error;
use tracing::debug;

pub const INAPPROPRIATE_LANGUAGE: &str = "The text contains inappropriate language.";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("The text contains inappropriate language.")]
pub struct DenylistViolation {
    /// The first denylisted word found, lowercased
    pub word: String,
}

/// A set of forbidden words, matched case-insensitively against whole
/// whitespace-separated tokens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Denylist {
    words: BTreeSet<String>,
}

impl Denylist {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|word| word.as_ref().trim().to_lowercase())
                .filter(|word| !word.is_empty())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn offending_word(&self, text: &str) -> Option<String> {
        text.to_lowercase()
            .split_whitespace()
            .find(|token| self.words.contains(*token))
            .map(str::to_string)
    }

    pub fn check(&self, text: &str) -> Result<(), DenylistViolation> {
        match self.offending_word(text) {
            Some(word) => {
                debug!("Rejected text containing denylisted word '{}'", word);
                Err(DenylistViolation { word })
            }
            None => Ok(()),
        }
    }
}
