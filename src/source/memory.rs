//! In-memory document source
//!
//! Backed by a list of documents, typically loaded from a JSON export of a
//! Prismic repository. Cursors are opaque `memory:` strings.

use async_trait::async_trait;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::{DocumentSource, Ordering, Query};
use crate::content::Document;
use crate::error::{Error, Result};
use crate::feed::FeedPage;

const CURSOR_PREFIX: &str = "memory:";

/// Accepted shapes of an export file
#[derive(Deserialize)]
#[serde(untagged)]
enum Export {
    Documents(Vec<Document>),
    Search { results: Vec<Document> },
}

/// A fixed set of documents held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: Vec<Document>,
}

impl MemorySource {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Parse a JSON array of documents or a search response
    pub fn from_json(json: &str) -> Result<Self> {
        let documents = match serde_json::from_str::<Export>(json)? {
            Export::Documents(documents) => documents,
            Export::Search { results } => results,
        };
        Ok(Self::new(documents))
    }

    /// Load documents from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    fn search(&self, query: &Query) -> Result<FeedPage<Document>> {
        let mut docs: Vec<&Document> = self
            .documents
            .iter()
            .filter(|d| d.doc_type == query.doc_type)
            .collect();

        match query.ordering {
            Some(Ordering::PublicationDateAsc) => {
                docs.sort_by_key(|d| d.first_publication());
            }
            Some(Ordering::PublicationDateDesc) => {
                docs.sort_by(|a, b| b.first_publication().cmp(&a.first_publication()));
            }
            None => {}
        }

        if let Some(after) = &query.after {
            if let Some(pos) = docs.iter().position(|d| &d.id == after) {
                docs = docs.split_off(pos + 1);
            }
        }

        let page_size = query.page_size.max(1);
        let page = query.page.max(1);
        let start = (page - 1).saturating_mul(page_size);

        let results = docs
            .iter()
            .skip(start)
            .take(page_size)
            .map(|d| (*d).clone())
            .collect();

        let next_page = if start.saturating_add(page_size) < docs.len() {
            let next = query.clone().page(page.saturating_add(1));
            Some(format!("{}{}", CURSOR_PREFIX, serde_json::to_string(&next)?))
        } else {
            None
        };

        Ok(FeedPage { results, next_page })
    }
}

#[async_trait]
impl DocumentSource for MemorySource {
    async fn query(&self, query: &Query) -> Result<FeedPage<Document>> {
        self.search(query)
    }

    async fn fetch_page(&self, cursor: &str) -> Result<FeedPage<Document>> {
        let encoded = cursor
            .strip_prefix(CURSOR_PREFIX)
            .ok_or_else(|| Error::InvalidCursor(cursor.to_string()))?;
        let query: Query =
            serde_json::from_str(encoded).map_err(|_| Error::InvalidCursor(cursor.to_string()))?;
        self.search(&query)
    }

    async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<Document> {
        self.documents
            .iter()
            .find(|d| d.doc_type == doc_type && d.uid() == uid)
            .cloned()
            .ok_or_else(|| Error::NotFound {
                doc_type: doc_type.to_string(),
                uid: uid.to_string(),
            })
    }
}
