//! Reading time estimation

use super::ContentBlock;

/// Default reading speed
pub const DEFAULT_WORDS_PER_MINUTE: usize = 200;

/// Estimates how many minutes a post takes to read
#[derive(Debug, Clone, Copy)]
pub struct ReadingTimeEstimator {
    words_per_minute: usize,
}

impl Default for ReadingTimeEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_WORDS_PER_MINUTE)
    }
}

impl ReadingTimeEstimator {
    /// Create an estimator for the given reading speed (clamped to at least 1)
    pub fn new(words_per_minute: usize) -> Self {
        Self {
            words_per_minute: words_per_minute.max(1),
        }
    }

    pub fn words_per_minute(&self) -> usize {
        self.words_per_minute
    }

    /// Minutes needed to read `blocks`, rounded up.
    ///
    /// Never returns less than one minute, even for empty content.
    pub fn estimate(&self, blocks: &[ContentBlock]) -> u32 {
        let minutes = count_words(blocks).div_ceil(self.words_per_minute).max(1);
        u32::try_from(minutes).unwrap_or(u32::MAX)
    }
}

/// Count whitespace-separated words in headings and body text
pub fn count_words(blocks: &[ContentBlock]) -> usize {
    blocks
        .iter()
        .map(|block| {
            let heading = block.heading_text().split_whitespace().count();
            let body: usize = block
                .body
                .iter()
                .map(|node| node.text.split_whitespace().count())
                .sum();
            heading + body
        })
        .sum()
}
