//! Document sources - where posts come from
//!
//! The generator, the feed and the neighbor resolver never talk to the CMS
//! directly. They receive an explicit [`DocumentSource`] handle, which is either
//! the Prismic HTTP API or an in-memory set of documents loaded from a JSON
//! export.

mod memory;
mod prismic;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::SiteConfig;
use crate::content::Document;
use crate::error::{Error, Result};
use crate::feed::FeedPage;

pub use memory::MemorySource;
pub use prismic::PrismicClient;

#[cfg(test)]
pub(crate) use memory::tests::posts as sample_posts;

/// Sort order for queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ordering {
    PublicationDateDesc,
    PublicationDateAsc,
}

impl Ordering {
    /// Prismic `orderings` expression
    pub fn as_prismic(&self) -> &'static str {
        match self {
            Ordering::PublicationDateDesc => "[document.first_publication_date desc]",
            Ordering::PublicationDateAsc => "[document.first_publication_date]",
        }
    }
}

/// A query against the document source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub doc_type: String,
    pub page_size: usize,
    /// 1-based page number
    pub page: usize,
    pub ordering: Option<Ordering>,
    /// Only return documents that come after this document id
    pub after: Option<String>,
}

impl Query {
    pub fn new(doc_type: &str) -> Self {
        Self {
            doc_type: doc_type.to_string(),
            page_size: 20,
            page: 1,
            ordering: None,
            after: None,
        }
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn ordering(mut self, ordering: Ordering) -> Self {
        self.ordering = Some(ordering);
        self
    }

    pub fn after(mut self, id: &str) -> Self {
        self.after = Some(id.to_string());
        self
    }
}

/// A store of CMS documents
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Run a query and return the first matching page
    async fn query(&self, query: &Query) -> Result<FeedPage<Document>>;

    /// Fetch the page a cursor (`next_page`) points to
    async fn fetch_page(&self, cursor: &str) -> Result<FeedPage<Document>>;

    /// Look up a single document by uid, failing with [`Error::NotFound`]
    async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<Document>;
}

/// Build the source configured for a site
pub fn from_config(config: &SiteConfig) -> Result<Arc<dyn DocumentSource>> {
    if let Some(file) = config.documents_file.as_deref() {
        tracing::info!("Reading documents from {}", file);
        return Ok(Arc::new(MemorySource::load(file)?));
    }

    match config.api_endpoint.as_deref() {
        Some(endpoint) if !endpoint.is_empty() => {
            tracing::info!("Using Prismic API at {}", endpoint);
            Ok(Arc::new(PrismicClient::new(
                endpoint,
                config.access_token().as_deref(),
            )))
        }
        _ => Err(Error::Config(
            "either `api_endpoint` or `documents_file` must be set".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_builder() {
        let query = Query::new("posts")
            .page_size(1)
            .ordering(Ordering::PublicationDateDesc)
            .after("abc");
        assert_eq!(query.doc_type, "posts");
        assert_eq!(query.page_size, 1);
        assert_eq!(query.page, 1);
        assert_eq!(query.after.as_deref(), Some("abc"));
        assert_eq!(
            query.ordering.unwrap().as_prismic(),
            "[document.first_publication_date desc]"
        );
    }

    #[test]
    fn test_from_config_requires_a_source() {
        let config = SiteConfig::default();
        let err = from_config(&config).err().unwrap();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_from_config_prefers_documents_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("documents.json");
        std::fs::write(&file, "[]").unwrap();

        let config = SiteConfig {
            api_endpoint: Some("https://example.cdn.prismic.io/api/v2".to_string()),
            documents_file: Some(file.to_string_lossy().to_string()),
            ..SiteConfig::default()
        };
        assert!(from_config(&config).is_ok());
    }
}
