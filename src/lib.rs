//! spacetraveling: a static blog front-end for a headless CMS
//!
//! Posts are fetched from a Prismic repository (or a JSON export of one),
//! projected into summaries for a paginated listing, and rendered into post
//! pages with reading time and previous/next navigation.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod feed;
pub mod generator;
pub mod helpers;
pub mod neighbor;
pub mod server;
pub mod source;
pub mod templates;

pub use error::{Error, Result};

use std::path::Path;
use std::sync::Arc;

/// The main application
#[derive(Clone)]
pub struct Spacetraveling {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
}

impl Spacetraveling {
    /// Create a new instance from a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> anyhow::Result<Self> {
        let config_path = base_dir.as_ref().join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create an instance with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            public_dir,
        }
    }

    /// The configured document source
    pub fn source(&self) -> anyhow::Result<Arc<dyn source::DocumentSource>> {
        let mut config = self.config.clone();
        // Relative export paths are resolved against the site directory
        if let Some(file) = config.documents_file.take() {
            config.documents_file = Some(self.base_dir.join(file).to_string_lossy().to_string());
        }
        Ok(source::from_config(&config)?)
    }

    /// Generate the static site
    pub async fn generate(&self) -> anyhow::Result<()> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> anyhow::Result<()> {
        commands::clean::run(self)
    }
}
