//! Markdown to HTML conversion.

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Link schemes that may appear in rendered output.
fn is_safe_url(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    match lower.split_once(':') {
        // No scheme, or a colon after the first path separator
        None => true,
        Some((scheme, _)) if scheme.contains('/') || scheme.contains('?') || scheme.contains('#') => {
            true
        }
        Some((scheme, _)) => matches!(scheme, "http" | "https" | "mailto"),
    }
}

fn neutralize(url: CowStr<'_>) -> CowStr<'_> {
    if is_safe_url(&url) {
        url
    } else {
        tracing::warn!("Dropping unsafe link target {}", url);
        CowStr::Borrowed("#")
    }
}

/// Render markdown to an HTML fragment.
///
/// Raw HTML is emitted as escaped text and links with scripting schemes
/// are replaced with `#`.
pub fn render_markdown(source: &str) -> String {
    let parser = Parser::new_ext(source, options()).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: neutralize(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: neutralize(dest_url),
            title,
            id,
        }),
        other => other,
    });

    let mut output = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut output, parser);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_emphasis() {
        let html = render_markdown("Add description here with **bold** and _italic_ formatting");
        assert_eq!(
            html,
            "<p>Add description here with <strong>bold</strong> and <em>italic</em> formatting</p>\n"
        );
    }

    #[test]
    fn escapes_raw_html() {
        let html = render_markdown("<script>alert(1)</script>\n\nHi <b>there</b>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&lt;b&gt;there&lt;/b&gt;"));
    }

    #[test]
    fn renders_gfm_extensions() {
        let html = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~old~~\n\n- [x] done");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>old</del>"));
        assert!(html.contains("type=\"checkbox\""));
    }

    #[test]
    fn neutralizes_script_links() {
        let html = render_markdown("[click](javascript:alert(1)) and [docs](https://example.com)");
        assert!(html.contains("href=\"#\""));
        assert!(html.contains("href=\"https://example.com\""));
        assert!(!html.contains("javascript:"));
    }

    #[test]
    fn relative_links_are_kept() {
        assert!(is_safe_url("../images/shot.png"));
        assert!(is_safe_url("page?a=b:c"));
        assert!(!is_safe_url(" JavaScript:void(0)"));
        assert!(!is_safe_url("data:text/html,hi"));
    }
}
