//! Raw documents as returned by the CMS

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::rich_text::{self, RichTextNode};

/// A single CMS document (one blog post)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    /// Internal document id
    pub id: String,

    /// URL-friendly identifier
    pub uid: Option<String>,

    /// Custom type name
    #[serde(rename = "type")]
    pub doc_type: String,

    /// First publication timestamp
    pub first_publication_date: Option<String>,

    /// Last publication timestamp
    pub last_publication_date: Option<String>,

    /// Typed fields
    pub data: PostFields,
}

impl Document {
    /// The document uid, or an empty string when it has none
    pub fn uid(&self) -> &str {
        self.uid.as_deref().unwrap_or("")
    }

    /// Parsed first publication date
    pub fn first_publication(&self) -> Option<DateTime<FixedOffset>> {
        self.first_publication_date.as_deref().and_then(parse_timestamp)
    }

    /// Parsed last publication date
    pub fn last_publication(&self) -> Option<DateTime<FixedOffset>> {
        self.last_publication_date.as_deref().and_then(parse_timestamp)
    }

    /// Plain-text title
    pub fn title(&self) -> String {
        TextField::plain(self.data.title.as_ref())
    }
}

/// The `data` bag of a post document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostFields {
    pub title: Option<TextField>,
    pub subtitle: Option<TextField>,
    pub author: Option<TextField>,
    pub banner: Option<Banner>,
    pub content: Vec<ContentBlock>,
}

/// Banner image
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Banner {
    pub url: Option<String>,
    pub alt: Option<String>,
}

/// One section of a post: an optional heading followed by rich text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentBlock {
    pub heading: Option<TextField>,
    pub body: Vec<RichTextNode>,
}

impl ContentBlock {
    /// Heading as plain text, empty when absent
    pub fn heading_text(&self) -> String {
        TextField::plain(self.heading.as_ref())
    }
}

/// A text field that is either a plain string or a rich-text array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextField {
    Plain(String),
    Rich(Vec<RichTextNode>),
}

impl TextField {
    /// Flatten to plain text
    pub fn as_text(&self) -> String {
        match self {
            TextField::Plain(s) => s.clone(),
            TextField::Rich(nodes) => rich_text::as_text(nodes),
        }
    }

    /// Flatten an optional field, absent becomes empty
    pub fn plain(field: Option<&TextField>) -> String {
        field.map(TextField::as_text).unwrap_or_default()
    }
}

impl From<&str> for TextField {
    fn from(s: &str) -> Self {
        TextField::Plain(s.to_string())
    }
}

/// Parse a CMS timestamp (`2021-03-25T19:25:28+0000` or RFC 3339)
pub fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
}
