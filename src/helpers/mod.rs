//! Helper functions for templates
//!
//! Formatting done before values reach the templates: dates in the site's
//! locale, post URLs and reading time labels.

mod date;

use chrono::{DateTime, FixedOffset};

pub use date::*;

use crate::config::SiteConfig;

/// Collection of all helper functions
pub struct Helpers {
    config: SiteConfig,
}

impl Helpers {
    /// Create a new helpers instance
    pub fn new(config: SiteConfig) -> Self {
        Self { config }
    }

    /// Format a publication date with the site format and locale
    pub fn date(&self, date: Option<&DateTime<FixedOffset>>) -> String {
        date.map(|d| format_date(d, &self.config.date_format, &self.config.language))
            .unwrap_or_default()
    }

    /// URL of a post page
    pub fn post_url(&self, uid: &str) -> String {
        self.config.post_path(uid)
    }

    /// Human readable reading time
    pub fn reading_time(&self, minutes: u32) -> String {
        format!("{} min", minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::parse_timestamp;

    #[test]
    fn test_helpers() {
        let helpers = Helpers::new(SiteConfig::default());
        let date = parse_timestamp("2021-03-15T19:25:28+0000");
        assert_eq!(helpers.date(date.as_ref()), "15 mar 2021");
        assert_eq!(helpers.date(None), "");
        assert_eq!(helpers.post_url("hooks"), "/post/hooks/");
        assert_eq!(helpers.reading_time(4), "4 min");
    }
}
