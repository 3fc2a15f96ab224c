//! Token accounting for finished exchanges
//!
//! Upstream usage figures are preferred. When they are missing or unusable
//! the count is estimated from whitespace-separated words.

use crate::upstream::UsageTotals;
use parley_common::{AGENT_TOKEN_WEIGHT, word_count};
use tracing::debug;

pub struct TokenCalculator;

impl TokenCalculator {
    /// Total tokens for a standard exchange
    pub fn standard(question: &str, answer: &str, usage: Option<&UsageTotals>) -> u64 {
        match usage.and_then(|u| u.total_tokens) {
            Some(total) => total,
            None => {
                if usage.is_some() {
                    debug!("Usage reported without a total, estimating from words");
                }
                word_count(question) + word_count(answer)
            }
        }
    }

    /// `(total, thoughts)` for a thinking exchange
    pub fn thinking(
        question: &str,
        answer: &str,
        thoughts: &str,
        usage: Option<&UsageTotals>,
    ) -> (u64, u64) {
        match usage.and_then(|u| u.total_tokens.map(|t| (t, u.thoughts_tokens.unwrap_or(0)))) {
            Some(pair) => pair,
            None => {
                if usage.is_some() {
                    debug!("Usage reported without a total, estimating from words");
                }
                let thought_words = word_count(thoughts);
                (
                    word_count(question) + word_count(answer) + thought_words,
                    thought_words,
                )
            }
        }
    }

    /// Weighted estimate used by the agent, never below one
    pub fn agent(question: &str, streamed: &str) -> u64 {
        let words = (word_count(question) + word_count(streamed)) as f64;
        ((words * AGENT_TOKEN_WEIGHT).floor() as u64).max(1)
    }
}
