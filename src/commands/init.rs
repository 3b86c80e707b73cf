//! Initialize a new spacetraveling site

use anyhow::Result;
use std::fs;
use std::path::Path;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;

    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("{:?} already exists", config_path);
    }

    let config_content = r#"# spacetraveling configuration

# Site
title: spacetraveling
description: ''
language: pt_BR
url: http://localhost:4000
root: /

# Content source
## Prismic API endpoint; the access token may also come from PRISMIC_ACCESS_TOKEN
# api_endpoint: https://your-repository.cdn.prismic.io/api/v2
# access_token: ''
## Build from a JSON export instead of the API
documents_file: documents.json
document_type: posts

# Feed
page_size: 20
excerpt_length: 100
words_per_minute: 200

# Output
public_dir: public
post_dir: post
pagination_dir: page
date_format: DD MMM YYYY
prerender_posts: true
"#;

    fs::write(&config_path, config_content)?;

    let now = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S+0000");
    let sample_documents = format!(
        r#"[
  {{
    "id": "hello-world",
    "uid": "hello-world",
    "type": "posts",
    "first_publication_date": "{now}",
    "last_publication_date": "{now}",
    "data": {{
      "title": "Hello World",
      "subtitle": "Your very first post",
      "author": "spacetraveling",
      "banner": {{ "url": null, "alt": null }},
      "content": [
        {{
          "heading": "Getting started",
          "body": [
            {{
              "type": "paragraph",
              "text": "Point api_endpoint in _config.yml at your Prismic repository, or keep editing documents.json.",
              "spans": []
            }}
          ]
        }}
      ]
    }}
  }}
]
"#
    );

    fs::write(target_dir.join("documents.json"), sample_documents)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use crate::Spacetraveling;

    #[test]
    fn test_init_site() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();

        let app = Spacetraveling::new(dir.path()).unwrap();
        assert_eq!(app.config.documents_file.as_deref(), Some("documents.json"));
        assert!(app.config.api_endpoint.is_none());

        let source = MemorySource::load(dir.path().join("documents.json")).unwrap();
        assert_eq!(source.documents().len(), 1);
        assert_eq!(source.documents()[0].uid(), "hello-world");
        assert!(source.documents()[0].first_publication().is_some());

        // A second init must not clobber the existing config
        assert!(init_site(dir.path()).is_err());
    }
}
