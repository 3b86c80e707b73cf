//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::content::reading_time::DEFAULT_WORDS_PER_MINUTE;
use crate::content::DEFAULT_EXCERPT_LENGTH;
use crate::source::{Ordering, Query};

/// Environment variable overriding `access_token`
pub const ACCESS_TOKEN_ENV: &str = "PRISMIC_ACCESS_TOKEN";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub language: String,
    pub url: String,
    pub root: String,

    // Content source
    pub api_endpoint: Option<String>,
    pub access_token: Option<String>,
    pub documents_file: Option<String>,
    pub document_type: String,

    // Feed
    pub page_size: usize,
    pub excerpt_length: usize,
    pub words_per_minute: usize,

    // Output
    pub public_dir: String,
    pub post_dir: String,
    pub pagination_dir: String,
    pub date_format: String,
    pub prerender_posts: bool,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "spacetraveling".to_string(),
            description: String::new(),
            language: "pt_BR".to_string(),
            url: "http://localhost:4000".to_string(),
            root: "/".to_string(),

            api_endpoint: None,
            access_token: None,
            documents_file: None,
            document_type: "posts".to_string(),

            page_size: 20,
            excerpt_length: DEFAULT_EXCERPT_LENGTH,
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,

            public_dir: "public".to_string(),
            post_dir: "post".to_string(),
            pagination_dir: "page".to_string(),
            date_format: "DD MMM YYYY".to_string(),
            prerender_posts: true,

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        tracing::debug!("Loaded config from {:?}", path.as_ref());
        Ok(config)
    }

    /// API access token, the environment taking precedence over the file
    pub fn access_token(&self) -> Option<String> {
        std::env::var(ACCESS_TOKEN_ENV)
            .ok()
            .filter(|t| !t.is_empty())
            .or_else(|| self.access_token.clone())
    }

    /// The query behind the home page feed, newest posts first
    pub fn feed_query(&self) -> Query {
        Query::new(&self.document_type)
            .page_size(self.page_size)
            .ordering(Ordering::PublicationDateDesc)
    }

    /// Root-relative URL of a post page
    pub fn post_path(&self, uid: &str) -> String {
        format!("{}{}/{}/", self.root_prefix(), self.post_dir, uid)
    }

    /// Root-relative URL of the `n`th listing page (1 is the home page)
    pub fn listing_path(&self, n: usize) -> String {
        if n <= 1 {
            self.root_prefix()
        } else {
            format!("{}{}/{}/", self.root_prefix(), self.pagination_dir, n)
        }
    }

    /// `root` with exactly one trailing slash
    fn root_prefix(&self) -> String {
        format!("{}/", self.root.trim_end_matches('/'))
    }
}
