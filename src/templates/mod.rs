//! Built-in spacetraveling templates using the Tera template engine
//!
//! Templates are embedded in the binary. Autoescaping is off: every string
//! placed in the view structs below is escaped when the view is built, and
//! post bodies arrive as already rendered HTML.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

/// Template renderer with the embedded theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("spacetraveling/layout.html")),
            ("home.html", include_str!("spacetraveling/home.html")),
            ("post.html", include_str!("spacetraveling/post.html")),
            ("not_found.html", include_str!("spacetraveling/not_found.html")),
            (
                "partials/header.html",
                include_str!("spacetraveling/partials/header.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub language: String,
    pub root: String,
}

/// One entry of the post listing
#[derive(Debug, Clone, Serialize)]
pub struct PostItem {
    pub uid: String,
    pub url: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub date: String,
    pub datetime: String,
}

/// A full post page
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub uid: String,
    pub title: String,
    pub author: String,
    pub date: String,
    pub datetime: String,
    /// Set when the post was edited after its first publication
    pub edited: Option<String>,
    pub banner_url: String,
    pub banner_alt: String,
    pub reading_time: String,
    pub sections: Vec<SectionData>,
    pub previous: Option<NavPost>,
    pub next: Option<NavPost>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionData {
    pub heading: String,
    pub html: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavPost {
    pub title: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteData {
        SiteData {
            title: "spacetraveling".to_string(),
            description: String::new(),
            language: "pt_BR".to_string(),
            root: "/".to_string(),
        }
    }

    #[test]
    fn test_render_home() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = Context::new();
        context.insert("site", &site());
        context.insert(
            "posts",
            &vec![PostItem {
                uid: "hooks".to_string(),
                url: "/post/hooks/".to_string(),
                title: "Como utilizar Hooks".to_string(),
                subtitle: "Pensando em sincronização".to_string(),
                author: "Joseph Oliveira".to_string(),
                date: "15 mar 2021".to_string(),
                datetime: "2021-03-15T19:25:28.000+00:00".to_string(),
            }],
        );
        context.insert("next_link", "/page/2/");

        let html = renderer.render("home.html", &context).unwrap();
        assert!(html.contains(r#"href="/post/hooks/""#));
        assert!(html.contains("Como utilizar Hooks"));
        assert!(html.contains("15 mar 2021"));
        assert!(html.contains(r#"href="/page/2/""#));
        assert!(html.contains("<title>spacetraveling</title>"));
    }

    #[test]
    fn test_render_home_without_more() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = Context::new();
        context.insert("site", &site());
        context.insert("posts", &Vec::<PostItem>::new());
        context.insert("next_link", &Option::<String>::None);

        let html = renderer.render("home.html", &context).unwrap();
        assert!(!html.contains("load-more"));
    }

    #[test]
    fn test_render_not_found() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = Context::new();
        context.insert("site", &site());
        context.insert("uid", "missing");

        let html = renderer.render("not_found.html", &context).unwrap();
        assert!(html.contains("Post não encontrado"));
        assert!(html.contains("missing"));
    }
}
