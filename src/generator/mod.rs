//! Generator module - renders the feed and post pages into the public directory

use anyhow::{Context as _, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tera::Context;

use crate::content::rich_text::{self, escape_html};
use crate::content::{Document, PostSummary, PostSummaryProjector, ReadingTimeEstimator};
use crate::error::Error;
use crate::feed::PaginatedFeed;
use crate::helpers::{date_xml, Helpers};
use crate::neighbor::{Neighbor, NeighborResolver};
use crate::source::DocumentSource;
use crate::templates::{NavPost, PostItem, PostView, SectionData, SiteData, TemplateRenderer};
use crate::Spacetraveling;

/// Static site generator
pub struct Generator {
    app: Spacetraveling,
    source: Arc<dyn DocumentSource>,
    renderer: TemplateRenderer,
    helpers: Helpers,
    projector: PostSummaryProjector,
    estimator: ReadingTimeEstimator,
}

impl Generator {
    /// Create a new generator reading from `source`
    pub fn new(app: &Spacetraveling, source: Arc<dyn DocumentSource>) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;
        let helpers = Helpers::new(app.config.clone());
        let projector = PostSummaryProjector::new(app.config.excerpt_length);
        let estimator = ReadingTimeEstimator::new(app.config.words_per_minute);

        Ok(Self {
            app: app.clone(),
            source,
            renderer,
            helpers,
            projector,
            estimator,
        })
    }

    /// Generate the entire site
    pub async fn generate(&self) -> Result<()> {
        fs::create_dir_all(&self.app.public_dir)?;

        let posts = self.generate_index_pages().await?;
        tracing::info!("Generated listing with {} posts", posts.len());

        if self.app.config.prerender_posts {
            let written = self.generate_post_pages(&posts).await?;
            tracing::info!("Generated {} post pages", written);
        }

        let not_found = self.render_not_found(None)?;
        fs::write(self.app.public_dir.join("404.html"), not_found)?;

        Ok(())
    }

    /// Write a page for every listed post with a usable uid, returning how
    /// many were written
    async fn generate_post_pages(&self, posts: &[PostSummary]) -> Result<usize> {
        let mut written = 0;
        for post in posts {
            if !is_safe_uid(&post.uid) {
                tracing::warn!("Skipping post with unusable uid {:?}", post.uid);
                continue;
            }
            self.generate_post(&post.uid).await?;
            written += 1;
        }
        Ok(written)
    }

    /// Generate the home page and one page per "load more" step.
    ///
    /// Listing page `n` shows everything accumulated after `n - 1` calls to
    /// `load_more`, so following the "load more" link keeps earlier posts.
    async fn generate_index_pages(&self) -> Result<Vec<PostSummary>> {
        let mut feed = PaginatedFeed::start(
            Arc::clone(&self.source),
            self.projector.clone(),
            &self.app.config.feed_query(),
        )
        .await
        .context("Failed to fetch the first page of posts")?;

        let mut page_num = 1;
        loop {
            let html = self.render_listing(&feed, page_num)?;
            let output_path = if page_num == 1 {
                self.app.public_dir.join("index.html")
            } else {
                self.app
                    .public_dir
                    .join(&self.app.config.pagination_dir)
                    .join(page_num.to_string())
                    .join("index.html")
            };
            write_file(&output_path, &html)?;

            if !feed.has_more() {
                break;
            }
            feed.load_more()
                .await
                .with_context(|| format!("Failed to load listing page {}", page_num + 1))?;
            page_num += 1;
        }

        Ok(feed.into_state().into_posts())
    }

    fn render_listing(&self, feed: &PaginatedFeed, page_num: usize) -> Result<String> {
        let posts: Vec<PostItem> = feed.posts().iter().map(|p| self.post_item(p)).collect();
        let next_link = feed
            .has_more()
            .then(|| self.app.config.listing_path(page_num + 1));

        let mut context = self.create_base_context();
        context.insert("posts", &posts);
        context.insert("next_link", &next_link);
        self.renderer.render("home.html", &context)
    }

    fn post_item(&self, post: &PostSummary) -> PostItem {
        PostItem {
            uid: escape_html(&post.uid),
            url: escape_html(&self.helpers.post_url(&post.uid)),
            title: escape_html(&post.title),
            subtitle: escape_html(&post.subtitle),
            author: escape_html(&post.author),
            date: self.helpers.date(post.publication_date.as_ref()),
            datetime: post
                .publication_date
                .as_ref()
                .map(date_xml)
                .unwrap_or_default(),
        }
    }

    /// Render a post page, fetching the post and its neighbors
    pub async fn render_post(&self, uid: &str) -> Result<String> {
        if !is_safe_uid(uid) {
            return Err(not_found(&self.app.config.document_type, uid).into());
        }

        let doc = self
            .source
            .get_by_uid(&self.app.config.document_type, uid)
            .await?;
        let neighbors = NeighborResolver::new(Arc::clone(&self.source))
            .neighbors(&doc)
            .await?;

        let view = PostView {
            previous: neighbors.previous.map(|n| self.nav_post(n)),
            next: neighbors.next.map(|n| self.nav_post(n)),
            ..self.post_view(&doc)
        };

        let mut context = self.create_base_context();
        context.insert("post", &view);
        self.renderer.render("post.html", &context)
    }

    /// Render a post page and write it to the public directory
    pub async fn generate_post(&self, uid: &str) -> Result<PathBuf> {
        let html = self.render_post(uid).await?;
        let output_path = self
            .app
            .public_dir
            .join(&self.app.config.post_dir)
            .join(uid)
            .join("index.html");
        write_file(&output_path, &html)?;
        Ok(output_path)
    }

    /// Render the not-found page
    pub fn render_not_found(&self, uid: Option<&str>) -> Result<String> {
        let mut context = self.create_base_context();
        context.insert("uid", &uid.map(escape_html));
        self.renderer.render("not_found.html", &context)
    }

    fn post_view(&self, doc: &Document) -> PostView {
        let summary = self.projector.project(doc);
        let first = doc.first_publication();
        let edited = doc
            .last_publication()
            .filter(|last| Some(last) != first.as_ref())
            .map(|last| self.helpers.date(Some(&last)));
        let banner = doc.data.banner.clone().unwrap_or_default();

        let sections = doc
            .data
            .content
            .iter()
            .map(|block| SectionData {
                heading: escape_html(block.heading_text().trim()),
                html: rich_text::as_html(&block.body),
            })
            .collect();

        PostView {
            uid: escape_html(&summary.uid),
            title: escape_html(&summary.title),
            author: escape_html(&summary.author),
            date: self.helpers.date(first.as_ref()),
            datetime: first.as_ref().map(date_xml).unwrap_or_default(),
            edited,
            banner_url: escape_html(banner.url.as_deref().unwrap_or("")),
            banner_alt: escape_html(banner.alt.as_deref().unwrap_or("")),
            reading_time: self
                .helpers
                .reading_time(self.estimator.estimate(&doc.data.content)),
            sections,
            previous: None,
            next: None,
        }
    }

    fn nav_post(&self, neighbor: Neighbor) -> NavPost {
        NavPost {
            url: escape_html(&self.helpers.post_url(&neighbor.uid)),
            title: escape_html(&neighbor.title),
        }
    }

    /// Create a base context with common variables
    fn create_base_context(&self) -> Context {
        let config = &self.app.config;
        let mut context = Context::new();
        context.insert(
            "site",
            &SiteData {
                title: escape_html(&config.title),
                description: escape_html(&config.description),
                language: escape_html(&config.language.replace('_', "-")),
                root: escape_html(&config.listing_path(1)),
            },
        );
        context
    }
}

/// Whether a uid can be used as a single path segment
pub fn is_safe_uid(uid: &str) -> bool {
    !uid.is_empty() && uid != "." && uid != ".." && !uid.contains(['/', '\\'])
}

/// Whether an error chain bottoms out in a missing document
pub fn is_not_found(err: &anyhow::Error) -> bool {
    err.downcast_ref::<Error>()
        .map(Error::is_not_found)
        .unwrap_or(false)
}

fn not_found(doc_type: &str, uid: &str) -> Error {
    Error::NotFound {
        doc_type: doc_type.to_string(),
        uid: uid.to_string(),
    }
}

fn write_file(path: &std::path::Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;
    }
    fs::write(path, html).map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", path, e))?;
    tracing::debug!("Generated: {:?}", path);
    Ok(())
}
