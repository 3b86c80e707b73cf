//! Cursor-driven post feed with "load more" accumulation

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::content::{Document, PostSummary, PostSummaryProjector};
use crate::error::Result;
use crate::source::{DocumentSource, Query};

/// One page of results as returned by the source.
///
/// `next_page` is the cursor for the following page; `None` ends the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedPage<T = PostSummary> {
    #[serde(default)]
    pub results: Vec<T>,
    #[serde(default)]
    pub next_page: Option<String>,
}

impl<T> FeedPage<T> {
    pub fn new(results: Vec<T>, next_page: Option<String>) -> Self {
        Self { results, next_page }
    }

    /// Convert every result, keeping the cursor
    pub fn map<U, F: FnMut(&T) -> U>(&self, f: F) -> FeedPage<U> {
        FeedPage {
            results: self.results.iter().map(f).collect(),
            next_page: self.next_page.clone(),
        }
    }
}

/// Posts loaded so far and the cursor to continue from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedState {
    accumulated: Vec<PostSummary>,
    cursor: Option<String>,
}

impl FeedState {
    /// State right after the first page was loaded
    pub fn from_page(page: FeedPage) -> Self {
        Self {
            accumulated: page.results,
            cursor: page.next_page,
        }
    }

    /// Append a page in arrival order and move the cursor forward
    pub fn apply(&mut self, page: FeedPage) -> usize {
        let added = page.results.len();
        self.accumulated.extend(page.results);
        self.cursor = page.next_page;
        added
    }

    pub fn accumulated(&self) -> &[PostSummary] {
        &self.accumulated
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn has_more(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn into_posts(self) -> Vec<PostSummary> {
        self.accumulated
    }
}

/// A feed of post summaries that grows one page at a time.
///
/// `load_more` borrows the feed mutably, so a second call cannot start
/// before the previous one has finished.
pub struct PaginatedFeed {
    source: Arc<dyn DocumentSource>,
    projector: PostSummaryProjector,
    state: FeedState,
}

impl PaginatedFeed {
    /// Build a feed from an already fetched first page
    pub fn new(
        source: Arc<dyn DocumentSource>,
        projector: PostSummaryProjector,
        initial: FeedPage<Document>,
    ) -> Self {
        let state = FeedState::from_page(initial.map(|doc| projector.project(doc)));
        Self {
            source,
            projector,
            state,
        }
    }

    /// Fetch the first page of `query` and build a feed from it
    pub async fn start(
        source: Arc<dyn DocumentSource>,
        projector: PostSummaryProjector,
        query: &Query,
    ) -> Result<Self> {
        let initial = source.query(query).await?;
        tracing::debug!(
            "Feed started with {} posts (more: {})",
            initial.results.len(),
            initial.next_page.is_some()
        );
        Ok(Self::new(source, projector, initial))
    }

    /// Fetch the next page and append it.
    ///
    /// Returns the number of posts added; `0` without fetching once the feed
    /// is exhausted. On error the feed is left untouched.
    pub async fn load_more(&mut self) -> Result<usize> {
        let Some(cursor) = self.state.cursor.clone() else {
            return Ok(0);
        };

        let page = self.source.fetch_page(&cursor).await?;
        let added = self
            .state
            .apply(page.map(|doc| self.projector.project(doc)));
        tracing::debug!(
            "Loaded {} more posts ({} total)",
            added,
            self.state.accumulated.len()
        );
        Ok(added)
    }

    /// Keep loading until the feed is exhausted
    pub async fn load_all(&mut self) -> Result<&[PostSummary]> {
        while self.has_more() {
            self.load_more().await?;
        }
        Ok(self.posts())
    }

    pub fn has_more(&self) -> bool {
        self.state.has_more()
    }

    pub fn posts(&self) -> &[PostSummary] {
        self.state.accumulated()
    }

    pub fn cursor(&self) -> Option<&str> {
        self.state.cursor()
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn into_state(self) -> FeedState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::source::{sample_posts, MemorySource, Ordering};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned pages by cursor; unknown cursors fail
    struct ScriptedSource {
        pages: Mutex<HashMap<String, FeedPage<Document>>>,
    }

    impl ScriptedSource {
        fn new(pages: Vec<(&str, FeedPage<Document>)>) -> Arc<Self> {
            Arc::new(Self {
                pages: Mutex::new(
                    pages
                        .into_iter()
                        .map(|(cursor, page)| (cursor.to_string(), page))
                        .collect(),
                ),
            })
        }
    }

    #[async_trait]
    impl DocumentSource for ScriptedSource {
        async fn query(&self, _query: &Query) -> Result<FeedPage<Document>> {
            self.fetch_page("initial").await
        }

        async fn fetch_page(&self, cursor: &str) -> Result<FeedPage<Document>> {
            self.pages
                .lock()
                .unwrap()
                .get(cursor)
                .cloned()
                .ok_or_else(|| Error::Status {
                    status: 503,
                    url: cursor.to_string(),
                })
        }

        async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<Document> {
            Err(Error::NotFound {
                doc_type: doc_type.to_string(),
                uid: uid.to_string(),
            })
        }
    }

    fn doc(uid: &str) -> Document {
        Document {
            id: format!("id-{}", uid),
            uid: Some(uid.to_string()),
            doc_type: "posts".to_string(),
            ..Default::default()
        }
    }

    fn uids(posts: &[PostSummary]) -> Vec<&str> {
        posts.iter().map(|p| p.uid.as_str()).collect()
    }

    #[tokio::test]
    async fn test_load_more_appends_and_ends() {
        let source = ScriptedSource::new(vec![(
            "page2",
            FeedPage::new(vec![doc("b")], None),
        )]);
        let mut feed = PaginatedFeed::new(
            source,
            PostSummaryProjector::default(),
            FeedPage::new(vec![doc("a")], Some("page2".to_string())),
        );
        assert!(feed.has_more());
        assert_eq!(uids(feed.posts()), vec!["a"]);

        assert_eq!(feed.load_more().await.unwrap(), 1);
        assert_eq!(uids(feed.posts()), vec!["a", "b"]);
        assert!(!feed.has_more());
        assert_eq!(feed.cursor(), None);
    }

    #[tokio::test]
    async fn test_load_more_without_cursor_is_noop() {
        // Any fetch would fail, so a successful 0 means nothing was requested
        let source = ScriptedSource::new(Vec::new());
        let mut feed = PaginatedFeed::new(
            source,
            PostSummaryProjector::default(),
            FeedPage::new(vec![doc("a")], None),
        );
        assert_eq!(feed.load_more().await.unwrap(), 0);
        assert_eq!(feed.load_more().await.unwrap(), 0);
        assert_eq!(uids(feed.posts()), vec!["a"]);
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_state_unchanged() {
        let source = ScriptedSource::new(Vec::new());
        let mut feed = PaginatedFeed::new(
            source,
            PostSummaryProjector::default(),
            FeedPage::new(vec![doc("a")], Some("broken".to_string())),
        );
        let before = feed.state().clone();

        assert!(feed.load_more().await.is_err());
        assert_eq!(feed.state(), &before);
        assert!(feed.has_more());
    }

    #[tokio::test]
    async fn test_accumulation_is_append_only() {
        let source = MemorySource::new(sample_posts(7));
        let query = Query::new("posts")
            .page_size(2)
            .ordering(Ordering::PublicationDateDesc);
        let mut feed = PaginatedFeed::start(
            Arc::new(source),
            PostSummaryProjector::default(),
            &query,
        )
        .await
        .unwrap();

        let mut previous = feed.posts().to_vec();
        while feed.has_more() {
            feed.load_more().await.unwrap();
            assert!(feed.posts().len() > previous.len());
            assert_eq!(&feed.posts()[..previous.len()], previous.as_slice());
            previous = feed.posts().to_vec();
        }

        assert_eq!(
            uids(feed.posts()),
            vec!["p7", "p6", "p5", "p4", "p3", "p2", "p1"]
        );
        assert_eq!(feed.load_more().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_load_all() {
        let source = Arc::new(MemorySource::new(sample_posts(5)));
        let query = Query::new("posts").page_size(2);
        let mut feed = PaginatedFeed::start(source, PostSummaryProjector::default(), &query)
            .await
            .unwrap();
        assert_eq!(feed.load_all().await.unwrap().len(), 5);
        assert!(!feed.has_more());
        assert_eq!(feed.into_state().into_posts().len(), 5);
    }

    #[test]
    fn test_feed_page_wire_format() {
        let json = r#"{ "page": 1, "results": [ { "uid": "a" } ], "next_page": null }"#;
        let page: FeedPage<Document> = serde_json::from_str(json).unwrap();
        assert_eq!(page.results.len(), 1);
        assert!(page.next_page.is_none());

        let json = r#"{ "results": [], "next_page": "https://example.com/page/2" }"#;
        let page: FeedPage<Document> = serde_json::from_str(json).unwrap();
        assert_eq!(page.next_page.as_deref(), Some("https://example.com/page/2"));
    }

    #[test]
    fn test_state_apply() {
        let summary = |uid: &str| PostSummaryProjector::default().project(&doc(uid));
        let mut state = FeedState::from_page(FeedPage::new(vec![summary("a")], Some("c".into())));
        assert_eq!(state.apply(FeedPage::new(vec![summary("b"), summary("a")], None)), 2);
        assert_eq!(uids(state.accumulated()), vec!["a", "b", "a"]);
        assert!(!state.has_more());
    }
}
