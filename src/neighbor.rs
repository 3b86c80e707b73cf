//! Previous/next post lookup

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::content::Document;
use crate::error::Result;
use crate::feed::FeedPage;
use crate::source::{DocumentSource, Ordering, Query};

/// The post adjacent to another one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighbor {
    pub title: String,
    pub uid: String,
}

/// Both neighbors of a post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighbors {
    pub previous: Option<Neighbor>,
    pub next: Option<Neighbor>,
}

/// Finds the chronologically adjacent posts of a document
pub struct NeighborResolver {
    source: Arc<dyn DocumentSource>,
}

impl NeighborResolver {
    pub fn new(source: Arc<dyn DocumentSource>) -> Self {
        Self { source }
    }

    /// Pick the neighbor out of a single-result query.
    ///
    /// No result, or a result that is the current post itself, means there is
    /// no neighbor in that direction.
    pub fn resolve(current_uid: &str, page: &FeedPage<Document>) -> Option<Neighbor> {
        let doc = page.results.first()?;
        if doc.uid() == current_uid {
            return None;
        }
        Some(Neighbor {
            title: doc.title(),
            uid: doc.uid().to_string(),
        })
    }

    /// The post before `doc` in descending publication order
    pub async fn previous(&self, doc: &Document) -> Result<Option<Neighbor>> {
        self.adjacent(doc, Ordering::PublicationDateDesc).await
    }

    /// The post after `doc` in ascending publication order
    pub async fn next(&self, doc: &Document) -> Result<Option<Neighbor>> {
        self.adjacent(doc, Ordering::PublicationDateAsc).await
    }

    pub async fn neighbors(&self, doc: &Document) -> Result<Neighbors> {
        let previous = self.previous(doc).await?;
        let next = self.next(doc).await?;
        Ok(Neighbors { previous, next })
    }

    async fn adjacent(&self, doc: &Document, ordering: Ordering) -> Result<Option<Neighbor>> {
        let query = Query::new(&doc.doc_type)
            .page_size(1)
            .ordering(ordering)
            .after(&doc.id);
        let page = self.source.query(&query).await?;
        Ok(Self::resolve(doc.uid(), &page))
    }
}
