//! Content module - CMS documents, rich text, summaries and reading time

mod document;
pub mod reading_time;
pub mod rich_text;
mod summary;

pub use document::{parse_timestamp, Banner, ContentBlock, Document, PostFields, TextField};
pub use reading_time::ReadingTimeEstimator;
pub use rich_text::{RichTextNode, Span, SpanData};
pub use summary::{PostSummary, PostSummaryProjector, DEFAULT_EXCERPT_LENGTH, ELLIPSIS};
