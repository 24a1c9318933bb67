//! Judgments attached to decoded fields

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of comparing a decoded value against its expectation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// Decoded value equals the expected value
    Match,
    /// Decoded value deviates from the expected value
    Mismatch,
}

/// A verdict on one decoded address or value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    /// The address or value that was checked, as rendered in the call data
    pub subject: String,
    /// Whether it matched
    pub verdict: Verdict,
    /// Human readable explanation
    pub detail: String,
}

impl Insight {
    /// A positive annotation
    pub fn matched(subject: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            verdict: Verdict::Match,
            detail: detail.into(),
        }
    }

    /// A negative annotation
    pub fn mismatch(subject: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            verdict: Verdict::Mismatch,
            detail: detail.into(),
        }
    }

    pub fn is_match(&self) -> bool {
        self.verdict == Verdict::Match
    }
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.verdict {
            Verdict::Match => write!(f, "✅ {}", self.detail),
            Verdict::Mismatch => write!(f, "❌ {}", self.detail),
        }
    }
}
