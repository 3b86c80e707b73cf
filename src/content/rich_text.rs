//! Structured rich text: plain-text flattening and HTML rendering

use serde::{Deserialize, Serialize};

/// One rich-text node (paragraph, heading, list item, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RichTextNode {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    pub spans: Vec<Span>,
    /// Image nodes only
    pub url: Option<String>,
    /// Image nodes only
    pub alt: Option<String>,
}

impl RichTextNode {
    /// A plain paragraph node
    pub fn paragraph(text: &str) -> Self {
        Self {
            kind: "paragraph".to_string(),
            text: text.to_string(),
            ..Default::default()
        }
    }

    pub fn is_paragraph(&self) -> bool {
        self.kind == "paragraph"
    }
}

/// Inline formatting over a range of a node's text.
///
/// `start`/`end` are UTF-16 code unit offsets, as sent by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub kind: String,
    pub data: Option<SpanData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpanData {
    pub url: Option<String>,
    pub label: Option<String>,
    pub target: Option<String>,
}

impl Span {
    fn open_tag(&self) -> String {
        match self.kind.as_str() {
            "strong" => "<strong>".to_string(),
            "em" => "<em>".to_string(),
            "hyperlink" => {
                let data = self.data.clone().unwrap_or_default();
                let href = escape_html(data.url.as_deref().unwrap_or("#"));
                match data.target {
                    Some(target) => format!(
                        r#"<a href="{}" target="{}" rel="noopener noreferrer">"#,
                        href,
                        escape_html(&target)
                    ),
                    None => format!(r#"<a href="{}">"#, href),
                }
            }
            "label" => {
                let label = self
                    .data
                    .as_ref()
                    .and_then(|d| d.label.as_deref())
                    .unwrap_or("");
                format!(r#"<span class="{}">"#, escape_html(label))
            }
            _ => "<span>".to_string(),
        }
    }

    fn close_tag(&self) -> &'static str {
        match self.kind.as_str() {
            "strong" => "</strong>",
            "em" => "</em>",
            "hyperlink" => "</a>",
            _ => "</span>",
        }
    }
}

/// Concatenate the text of all nodes, separated by a space
pub fn as_text(nodes: &[RichTextNode]) -> String {
    nodes
        .iter()
        .map(|n| n.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render rich text to HTML
pub fn as_html(nodes: &[RichTextNode]) -> String {
    let mut html = String::new();
    // Open list wrapper, if any
    let mut list: Option<&'static str> = None;

    for node in nodes {
        let wrapper = match node.kind.as_str() {
            "list-item" => Some("ul"),
            "o-list-item" => Some("ol"),
            _ => None,
        };

        if list != wrapper {
            if let Some(tag) = list {
                html.push_str(&format!("</{}>", tag));
            }
            if let Some(tag) = wrapper {
                html.push_str(&format!("<{}>", tag));
            }
            list = wrapper;
        }

        match node.kind.as_str() {
            "list-item" | "o-list-item" => {
                html.push_str("<li>");
                html.push_str(&render_spans(&node.text, &node.spans, true));
                html.push_str("</li>");
            }
            "heading1" | "heading2" | "heading3" | "heading4" | "heading5" | "heading6" => {
                let level = &node.kind["heading".len()..];
                html.push_str(&format!(
                    "<h{}>{}</h{}>",
                    level,
                    render_spans(&node.text, &node.spans, true),
                    level
                ));
            }
            "preformatted" => {
                html.push_str("<pre>");
                html.push_str(&render_spans(&node.text, &node.spans, false));
                html.push_str("</pre>");
            }
            "image" => {
                html.push_str(&format!(
                    r#"<p class="block-img"><img src="{}" alt="{}" /></p>"#,
                    escape_html(node.url.as_deref().unwrap_or("")),
                    escape_html(node.alt.as_deref().unwrap_or(""))
                ));
            }
            _ => {
                html.push_str("<p>");
                html.push_str(&render_spans(&node.text, &node.spans, true));
                html.push_str("</p>");
            }
        }
    }

    if let Some(tag) = list {
        html.push_str(&format!("</{}>", tag));
    }

    html
}

/// Render one node's text with its inline spans applied
fn render_spans(text: &str, spans: &[Span], line_breaks: bool) -> String {
    let mut sorted: Vec<&Span> = spans.iter().filter(|s| s.end > s.start).collect();
    sorted.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut out = String::with_capacity(text.len());
    let mut open: Vec<&Span> = Vec::new();
    let mut next = 0;
    let mut offset = 0;

    for c in text.chars() {
        close_spans(&mut out, &mut open, offset);
        while next < sorted.len() && sorted[next].start <= offset {
            out.push_str(&sorted[next].open_tag());
            open.push(sorted[next]);
            next += 1;
        }

        if line_breaks && c == '\n' {
            out.push_str("<br />");
        } else {
            push_escaped(&mut out, c);
        }
        offset += c.len_utf16();
    }

    close_spans(&mut out, &mut open, usize::MAX);
    out
}

fn close_spans(out: &mut String, open: &mut Vec<&Span>, offset: usize) {
    while let Some(span) = open.last() {
        if span.end > offset {
            break;
        }
        out.push_str(span.close_tag());
        open.pop();
    }
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        _ => out.push(c),
    }
}

/// Escape HTML special characters
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        push_escaped(&mut out, c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(kind: &str, text: &str) -> RichTextNode {
        RichTextNode {
            kind: kind.to_string(),
            text: text.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_as_text() {
        let nodes = vec![node("paragraph", "one two"), node("paragraph", "three")];
        assert_eq!(as_text(&nodes), "one two three");
        assert_eq!(as_text(&[]), "");
    }

    #[test]
    fn test_paragraph_and_heading() {
        let nodes = vec![node("heading2", "Title"), node("paragraph", "a < b")];
        assert_eq!(as_html(&nodes), "<h2>Title</h2><p>a &lt; b</p>");
    }

    #[test]
    fn test_lists_are_grouped() {
        let nodes = vec![
            node("list-item", "one"),
            node("list-item", "two"),
            node("o-list-item", "first"),
            node("paragraph", "after"),
        ];
        assert_eq!(
            as_html(&nodes),
            "<ul><li>one</li><li>two</li></ul><ol><li>first</li></ol><p>after</p>"
        );
    }

    #[test]
    fn test_spans() {
        let mut p = node("paragraph", "hello bold world");
        p.spans = vec![
            Span {
                start: 6,
                end: 10,
                kind: "strong".to_string(),
                data: None,
            },
            Span {
                start: 11,
                end: 16,
                kind: "hyperlink".to_string(),
                data: Some(SpanData {
                    url: Some("https://example.com".to_string()),
                    ..Default::default()
                }),
            },
        ];
        assert_eq!(
            as_html(&[p]),
            r#"<p>hello <strong>bold</strong> <a href="https://example.com">world</a></p>"#
        );
    }

    #[test]
    fn test_nested_spans() {
        let mut p = node("paragraph", "abcdef");
        p.spans = vec![
            Span {
                start: 2,
                end: 4,
                kind: "em".to_string(),
                data: None,
            },
            Span {
                start: 0,
                end: 6,
                kind: "strong".to_string(),
                data: None,
            },
        ];
        assert_eq!(as_html(&[p]), "<p><strong>ab<em>cd</em>ef</strong></p>");
    }

    #[test]
    fn test_span_offsets_are_utf16() {
        // "😀" is two UTF-16 code units
        let mut p = node("paragraph", "😀 ok");
        p.spans = vec![Span {
            start: 3,
            end: 5,
            kind: "em".to_string(),
            data: None,
        }];
        assert_eq!(as_html(&[p]), "<p>😀 <em>ok</em></p>");
    }

    #[test]
    fn test_line_breaks_and_preformatted() {
        let nodes = vec![node("paragraph", "a\nb"), node("preformatted", "x\ny")];
        assert_eq!(as_html(&nodes), "<p>a<br />b</p><pre>x\ny</pre>");
    }
}
