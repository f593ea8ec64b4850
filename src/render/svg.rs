//! Static SVG renderer for parsed infographic documents.

use crate::error::{Error, Result};
use crate::render::syntax::{self, Document, Item};
use crate::render::{Renderer, Snapshot};
use std::fmt::Write as _;

const WIDTH: u32 = 960;
const MARGIN: u32 = 40;
const TITLE_HEIGHT: u32 = 56;
const DESC_HEIGHT: u32 = 32;
const CARD_HEIGHT: u32 = 88;
const CHILD_HEIGHT: u32 = 22;
const CARD_GAP: u32 = 16;

const DEFAULT_PALETTE: [&str; 6] = [
    "#3b82f6", "#8b5cf6", "#f97316", "#10b981", "#ef4444", "#eab308",
];

/// Draws a document as a vertical list of cards.
///
/// Every template is drawn with the same layout; the template id is kept as
/// metadata on the root element.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    svg: Option<String>,
    destroyed: bool,
}

impl SvgRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent render, if any.
    #[must_use]
    pub fn svg(&self) -> Option<&str> {
        self.svg.as_deref()
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, text: &str) -> Result<()> {
        if self.destroyed {
            return Err(Error::Render("renderer already destroyed".to_string()));
        }

        let doc = syntax::parse(syntax::extract_syntax(text));
        if doc.is_empty() {
            return Err(Error::Render("no infographic content found".to_string()));
        }

        self.svg = Some(draw(&doc));
        Ok(())
    }

    fn snapshot(&self) -> Result<Snapshot> {
        let svg = self
            .svg
            .as_ref()
            .ok_or_else(|| Error::Render("nothing rendered yet".to_string()))?;
        Ok(Snapshot {
            mime: "image/svg+xml",
            bytes: svg.clone().into_bytes(),
        })
    }

    fn destroy(&mut self) {
        self.svg = None;
        self.destroyed = true;
    }
}

fn card_height(item: &Item) -> u32 {
    let children = u32::try_from(item.children.len()).unwrap_or(u32::MAX);
    CARD_HEIGHT.saturating_add(children.saturating_mul(CHILD_HEIGHT))
}

fn draw(doc: &Document) -> String {
    let palette: Vec<&str> = if doc.palette.is_empty() {
        DEFAULT_PALETTE.to_vec()
    } else {
        doc.palette.iter().map(String::as_str).collect()
    };

    let mut height = MARGIN;
    if doc.title.is_some() {
        height += TITLE_HEIGHT;
    }
    if doc.desc.is_some() {
        height += DESC_HEIGHT;
    }
    for item in &doc.items {
        height = height.saturating_add(card_height(item) + CARD_GAP);
    }
    height += MARGIN;

    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{height}" viewBox="0 0 {WIDTH} {height}""#
    );
    if let Some(template) = &doc.template {
        let _ = write!(out, r#" data-template="{}""#, escape(template));
    }
    out.push_str(">\n");
    let _ = writeln!(
        out,
        r##"<rect width="100%" height="100%" fill="#ffffff"/>"##
    );

    let mut y = MARGIN;
    if let Some(title) = &doc.title {
        let _ = writeln!(
            out,
            r##"<text x="{MARGIN}" y="{}" font-family="sans-serif" font-size="28" font-weight="bold" fill="#111827">{}</text>"##,
            y + 32,
            escape(title)
        );
        y += TITLE_HEIGHT;
    }
    if let Some(desc) = &doc.desc {
        let _ = writeln!(
            out,
            r##"<text x="{MARGIN}" y="{}" font-family="sans-serif" font-size="16" fill="#4b5563">{}</text>"##,
            y + 16,
            escape(desc)
        );
        y += DESC_HEIGHT;
    }

    let card_width = WIDTH - 2 * MARGIN;
    for (i, item) in doc.items.iter().enumerate() {
        let color = palette[i % palette.len()];
        let h = card_height(item);
        let _ = writeln!(
            out,
            r#"<rect x="{MARGIN}" y="{y}" width="{card_width}" height="{h}" rx="8" fill="{}" fill-opacity="0.12" stroke="{}"/>"#,
            escape(color),
            escape(color)
        );

        let mut heading = item.label.clone().unwrap_or_default();
        if let Some(time) = &item.time {
            heading = if heading.is_empty() {
                time.clone()
            } else {
                format!("{time} · {heading}")
            };
        }
        if let Some(value) = item.value {
            let _ = write!(heading, "  {value}");
        }
        let _ = writeln!(
            out,
            r##"<text x="{}" y="{}" font-family="sans-serif" font-size="20" font-weight="bold" fill="#111827">{}</text>"##,
            MARGIN + 20,
            y + 34,
            escape(&heading)
        );
        if let Some(desc) = &item.desc {
            let _ = writeln!(
                out,
                r##"<text x="{}" y="{}" font-family="sans-serif" font-size="14" fill="#374151">{}</text>"##,
                MARGIN + 20,
                y + 62,
                escape(desc)
            );
        }
        if let Some(icon) = &item.icon {
            let _ = writeln!(
                out,
                r#"<text x="{}" y="{}" font-family="monospace" font-size="12" text-anchor="end" fill="{}">{}</text>"#,
                MARGIN + card_width - 20,
                y + 30,
                escape(color),
                escape(icon)
            );
        }

        let mut child_y = y + CARD_HEIGHT;
        for child in &item.children {
            let _ = writeln!(
                out,
                r##"<text x="{}" y="{child_y}" font-family="sans-serif" font-size="14" fill="#4b5563">• {}</text>"##,
                MARGIN + 40,
                escape(child.label.as_deref().unwrap_or_default())
            );
            child_y += CHILD_HEIGHT;
        }

        y += h + CARD_GAP;
    }

    out.push_str("</svg>\n");
    out
}

/// Escape text for XML content and attribute values.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = "```plain
infographic sequence-timeline-simple
data
  title Launch <Plan>
  items
    - label Design & Build
      desc Two sprints
    - label Ship
      children
        - label Beta
theme
  palette #112233
```";

    #[test]
    fn renders_title_and_items() {
        let mut renderer = SvgRenderer::new();
        renderer.render(REPLY).unwrap();
        let svg = renderer.svg().unwrap();

        assert!(svg.starts_with("<svg "));
        assert!(svg.contains(r#"data-template="sequence-timeline-simple""#));
        assert!(svg.contains("Launch &lt;Plan&gt;"));
        assert!(svg.contains("Design &amp; Build"));
        assert!(svg.contains("Two sprints"));
        assert!(svg.contains("• Beta"));
        assert!(svg.contains("#112233"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn render_replaces_previous_output() {
        let mut renderer = SvgRenderer::new();
        renderer.render(REPLY).unwrap();
        renderer
            .render("infographic chart-wordcloud\ndata\n  title Second")
            .unwrap();
        let svg = renderer.svg().unwrap();
        assert!(svg.contains("Second"));
        assert!(!svg.contains("Launch"));
    }

    #[test]
    fn empty_document_is_an_error() {
        let mut renderer = SvgRenderer::new();
        let err = renderer.render("just some prose").unwrap_err();
        assert!(matches!(err, Error::Render(_)));
        assert!(renderer.snapshot().is_err());
    }

    #[test]
    fn snapshot_is_svg() {
        let mut renderer = SvgRenderer::new();
        renderer.render(REPLY).unwrap();
        let snapshot = renderer.snapshot().unwrap();
        assert_eq!(snapshot.mime, "image/svg+xml");
        assert!(snapshot.to_data_url().starts_with("data:image/svg+xml;base64,"));
    }

    #[test]
    fn destroyed_renderer_refuses_work() {
        let mut renderer = SvgRenderer::new();
        renderer.render(REPLY).unwrap();
        renderer.destroy();
        assert!(renderer.svg().is_none());
        assert!(renderer.render(REPLY).is_err());
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&apos;&amp;&apos;&lt;/a&gt;");
    }
}
