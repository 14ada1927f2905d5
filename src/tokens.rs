//! Prompt length estimation from sample text
//!
//! Helps fill in the per-prompt lengths: the sample is counted with the
//! cl100k tokenizer and compared against the `words * 1.3` rule of thumb.

use serde::Serialize;
use tiktoken_rs::cl100k_base;

use crate::inputs::TOKENS_PER_WORD;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TokenEstimate {
    pub words: usize,
    pub characters: usize,
    /// Exact cl100k token count
    pub tokens: usize,
    /// `words * 1.3`
    pub approximate_tokens: f64,
}

pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn approximate_tokens(words: usize) -> f64 {
    words as f64 * TOKENS_PER_WORD
}

pub fn estimate(text: &str) -> anyhow::Result<TokenEstimate> {
    let bpe = cl100k_base()?;
    let words = count_words(text);

    Ok(TokenEstimate {
        words,
        characters: text.chars().count(),
        tokens: bpe.encode_with_special_tokens(text).len(),
        approximate_tokens: approximate_tokens(words),
    })
}
