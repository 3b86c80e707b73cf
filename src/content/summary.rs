//! Display-ready post summaries

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::{ContentBlock, Document, ReadingTimeEstimator, TextField};

/// Default excerpt length in characters
pub const DEFAULT_EXCERPT_LENGTH: usize = 100;

/// Marker appended to synthesized excerpts
pub const ELLIPSIS: &str = "...";

/// A post as shown in listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    pub uid: String,
    pub publication_date: Option<DateTime<FixedOffset>>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub reading_time: Option<u32>,
}

/// Maps raw documents to [`PostSummary`] values
#[derive(Debug, Clone)]
pub struct PostSummaryProjector {
    excerpt_length: usize,
    estimator: Option<ReadingTimeEstimator>,
}

impl Default for PostSummaryProjector {
    fn default() -> Self {
        Self::new(DEFAULT_EXCERPT_LENGTH)
    }
}

impl PostSummaryProjector {
    pub fn new(excerpt_length: usize) -> Self {
        Self {
            excerpt_length,
            estimator: None,
        }
    }

    /// Also fill in `reading_time` using `estimator`
    pub fn with_reading_time(mut self, estimator: ReadingTimeEstimator) -> Self {
        self.estimator = Some(estimator);
        self
    }

    /// Project one document. Missing fields become empty strings.
    pub fn project(&self, doc: &Document) -> PostSummary {
        let subtitle = match TextField::plain(doc.data.subtitle.as_ref()) {
            s if !s.trim().is_empty() => s,
            _ => self.excerpt(&doc.data.content),
        };

        PostSummary {
            uid: doc.uid().to_string(),
            publication_date: doc.first_publication(),
            title: doc.title(),
            subtitle,
            author: TextField::plain(doc.data.author.as_ref()),
            reading_time: self.estimator.map(|e| e.estimate(&doc.data.content)),
        }
    }

    /// Synthesize an excerpt from the first non-empty paragraph
    pub fn excerpt(&self, blocks: &[ContentBlock]) -> String {
        let paragraph = blocks
            .iter()
            .flat_map(|block| block.body.iter())
            .filter(|node| node.is_paragraph())
            .map(|node| node.text.trim())
            .find(|text| !text.is_empty());

        match paragraph {
            Some(text) => {
                let truncated: String = text.chars().take(self.excerpt_length).collect();
                format!("{}{}", truncated.trim_end(), ELLIPSIS)
            }
            None => String::new(),
        }
    }
}
