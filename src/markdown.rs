//! Markdown rendering for posts and pages.
//!
//! A single pass over the `pulldown-cmark` event stream produces three things:
//!
//! - the HTML body, with content images optionally wrapped in a link to the
//!   original file and lazily loaded, fenced code marked up with its
//!   language, and sized iframes made responsive
//! - a plain-text excerpt for cards, meta descriptions and the feed
//! - the list of local files the document references, so the generator can
//!   copy them next to the rendered page

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html as md_html};

/// Excerpt length in characters, before the ellipsis.
pub const EXCERPT_LENGTH: usize = 160;

/// Rendering switches taken from site config.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub link_images_to_original: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            link_images_to_original: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub html: String,
    pub excerpt: String,
    /// Relative references (images and links) in document order, deduplicated.
    pub local_refs: Vec<String>,
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_SMART_PUNCTUATION
}

pub fn render(markdown: &str, options: RenderOptions) -> Rendered {
    let mut plain = String::new();
    let mut local_refs: Vec<String> = Vec::new();
    let mut events = Vec::new();
    let mut link_depth = 0usize;
    // Images nested in a link we opened ourselves
    let mut wrapped_images = Vec::new();
    let mut image_depth = 0usize;

    let mut note_ref = |url: &str| {
        if let Some(local) = local_reference(url)
            && !local_refs.iter().any(|r| r == &local)
        {
            local_refs.push(local);
        }
    };

    for event in Parser::new_ext(markdown, parser_options()) {
        match event {
            Event::Start(Tag::Link { ref dest_url, .. }) => {
                note_ref(dest_url);
                link_depth += 1;
                events.push(event);
            }
            Event::End(TagEnd::Link) => {
                link_depth = link_depth.saturating_sub(1);
                events.push(event);
            }
            Event::Start(Tag::Image {
                ref dest_url,
                ref title,
                ..
            }) => {
                note_ref(dest_url);
                let wrap = options.link_images_to_original && link_depth == 0;
                wrapped_images.push(wrap);
                image_depth += 1;
                if wrap {
                    events.push(Event::Html(CowStr::from(format!(
                        r#"<a class="content-image-link" href="{}" target="_blank" rel="noopener">"#,
                        escape_attr(dest_url)
                    ))));
                }
                let title_attr = if title.is_empty() {
                    String::new()
                } else {
                    format!(r#" title="{}""#, escape_attr(title))
                };
                // Alt text arrives as the image's inner events; collect it below.
                events.push(Event::Html(CowStr::from(format!(
                    r#"<img src="{}"{} loading="lazy" alt=""#,
                    escape_attr(dest_url),
                    title_attr
                ))));
            }
            Event::End(TagEnd::Image) => {
                image_depth = image_depth.saturating_sub(1);
                events.push(Event::Html(CowStr::from("\" />")));
                if wrapped_images.pop().unwrap_or(false) {
                    events.push(Event::Html(CowStr::from("</a>")));
                }
            }
            Event::Text(ref text)
            | Event::Code(ref text)
            | Event::InlineHtml(ref text)
            | Event::Html(ref text)
                if image_depth > 0 =>
            {
                events.push(Event::Html(CowStr::from(escape_attr(text))));
            }
            Event::Start(Tag::CodeBlock(ref kind)) => {
                let language = code_language(kind);
                events.push(Event::Html(CowStr::from(format!(
                    r#"<div class="code-block" data-language="{language}"><pre class="language-{language}"><code class="language-{language}">"#
                ))));
            }
            Event::End(TagEnd::CodeBlock) => {
                events.push(Event::Html(CowStr::from("</code></pre></div>\n")));
            }
            Event::Html(ref text) | Event::InlineHtml(ref text) if text.contains("<iframe") => {
                events.push(Event::Html(CowStr::from(wrap_iframes(text))));
            }
            Event::Text(ref text) | Event::Code(ref text) => {
                plain.push_str(text);
                events.push(event);
            }
            Event::SoftBreak | Event::HardBreak => {
                if image_depth == 0 {
                    plain.push(' ');
                }
                events.push(event);
            }
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item) => {
                plain.push(' ');
                events.push(event);
            }
            other => events.push(other),
        }
    }

    let mut html = String::with_capacity(markdown.len() * 3 / 2);
    md_html::push_html(&mut html, events.into_iter());

    Rendered {
        html,
        excerpt: prune(&collapse_whitespace(&plain), EXCERPT_LENGTH),
        local_refs,
    }
}

/// Normalize a reference to a local, copyable path, or `None` if it points
/// elsewhere (absolute URL, site-absolute path, fragment, parent directory).
///
/// The rules apply to the decoded path, so `%2E%2E/` counts as `../`.
pub fn local_reference(url: &str) -> Option<String> {
    let raw = url.split(['#', '?']).next().unwrap_or_default();
    if raw.is_empty() || url.starts_with('#') || has_scheme(raw) {
        return None;
    }
    let path = urlencoding::decode(raw).ok()?;
    if path.starts_with('/') || path.contains('\\') || has_scheme(&path) {
        return None;
    }
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty() && *s != ".").collect();
    if segments.is_empty() || segments.contains(&"..") {
        return None;
    }
    Some(segments.join("/"))
}

/// Language name for a fenced block's classes, `text` when the fence has none.
fn code_language(kind: &CodeBlockKind) -> String {
    let info = match kind {
        CodeBlockKind::Fenced(info) => &**info,
        CodeBlockKind::Indented => "",
    };
    let language: String = info
        .split(|c: char| c.is_whitespace() || c == '{' || c == ',')
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '#'))
        .collect::<String>()
        .to_ascii_lowercase();
    if language.is_empty() {
        "text".to_string()
    } else {
        language
    }
}

/// Wrap every `<iframe>` that declares a numeric `width` and `height` in a
/// container holding its aspect ratio. Iframes without both stay as written.
pub fn wrap_iframes(html: &str) -> String {
    const CLOSE: &str = "</iframe>";
    let mut out = String::with_capacity(html.len() + 64);
    let mut rest = html;
    while let Some(start) = rest.find("<iframe") {
        let Some(close) = rest[start..].find(CLOSE) else {
            break;
        };
        let end = start + close + CLOSE.len();
        let element = &rest[start..end];
        out.push_str(&rest[..start]);
        let open_tag = &element[..element.find('>').unwrap_or(element.len())];
        match aspect_ratio(open_tag) {
            Some(ratio) => {
                out.push_str(&format!(
                    r#"<div class="responsive-iframe" style="padding-bottom: {ratio:.2}%">"#
                ));
                out.push_str(element);
                out.push_str("</div>");
            }
            None => out.push_str(element),
        }
        rest = &rest[end..];
    }
    out.push_str(rest);
    out
}

/// Height as a percentage of width.
fn aspect_ratio(tag: &str) -> Option<f64> {
    let width: f64 = attr_value(tag, "width")?.parse().ok()?;
    let height: f64 = attr_value(tag, "height")?.parse().ok()?;
    (width > 0.0 && height > 0.0).then(|| height / width * 100.0)
}

fn attr_value<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let mut search = tag;
    while let Some(pos) = search.find(name) {
        let standalone = search[..pos].ends_with(char::is_whitespace);
        search = &search[pos + name.len()..];
        if !standalone {
            continue;
        }
        let Some(value) = search.trim_start().strip_prefix('=') else {
            continue;
        };
        let value = value.trim_start();
        return match value.chars().next() {
            Some(quote @ ('"' | '\'')) => value[1..].split(quote).next(),
            _ => value
                .split(|c: char| c.is_whitespace() || c == '>' || c == '/')
                .next(),
        };
    }
    None
}

fn has_scheme(url: &str) -> bool {
    match url.find(':') {
        Some(pos) => url[..pos]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
        None => false,
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max` characters at a word boundary, appending `…`.
pub fn prune(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    let boundary = match cut.rfind(char::is_whitespace) {
        Some(pos) if pos > 0 => &cut[..pos],
        _ => cut.as_str(),
    };
    let trimmed = boundary.trim_end_matches(|c: char| c.is_whitespace() || c == ',' || c == '.');
    format!("{trimmed}…")
}

/// Escape a string for use inside a double-quoted HTML attribute.
pub fn escape_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_default(md: &str) -> Rendered {
        render(md, RenderOptions::default())
    }

    #[test]
    fn renders_basic_markdown() {
        let r = render_default("# Title\n\nThis is **bold** and *italic*.");
        assert!(r.html.contains("<h1>Title</h1>"));
        assert!(r.html.contains("<strong>bold</strong>"));
        assert!(r.html.contains("<em>italic</em>"));
    }

    #[test]
    fn smart_punctuation_is_enabled() {
        let r = render_default("\"quoted\" -- and...");
        assert!(r.html.contains('“'));
        assert!(r.html.contains('–'));
        assert!(r.html.contains('…'));
    }

    #[test]
    fn tables_are_enabled() {
        let r = render_default("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(r.html.contains("<table>"));
    }

    #[test]
    fn image_wrapped_in_link_to_original() {
        let r = render_default("![A cat](./cat.png \"Kitty\")");
        assert!(r.html.contains(r#"<a class="content-image-link" href="./cat.png""#));
        assert!(r.html.contains(r#"<img src="./cat.png" title="Kitty" loading="lazy" alt="A cat" />"#));
        assert!(r.html.contains("</a>"));
    }

    #[test]
    fn image_not_wrapped_when_disabled() {
        let r = render(
            "![A cat](cat.png)",
            RenderOptions {
                link_images_to_original: false,
            },
        );
        assert!(!r.html.contains("content-image-link"));
        assert!(r.html.contains(r#"<img src="cat.png" loading="lazy" alt="A cat" />"#));
    }

    #[test]
    fn image_inside_link_is_not_double_wrapped() {
        let r = render_default("[![badge](badge.svg)](https://ci.example)");
        assert!(!r.html.contains("content-image-link"));
        assert!(r.html.contains(r#"href="https://ci.example""#));
    }

    #[test]
    fn image_alt_is_escaped() {
        let r = render_default("![a & <b>](x.png)");
        assert!(r.html.contains(r#"alt="a &amp; &lt;b&gt;""#));
    }

    #[test]
    fn image_alt_does_not_leak_into_excerpt() {
        let r = render_default("![secret alt](x.png)\n\nVisible text.");
        assert_eq!(r.excerpt, "Visible text.");
    }

    #[test]
    fn fenced_code_marked_with_language() {
        let r = render_default("```ts\nconst a: number = 1 < 2;\n```\n");
        assert!(r.html.contains(
            r#"<div class="code-block" data-language="ts"><pre class="language-ts"><code class="language-ts">"#
        ));
        assert!(r.html.contains("const a: number = 1 &lt; 2;"));
        assert!(r.html.contains("</code></pre></div>"));
    }

    #[test]
    fn code_without_language_is_text() {
        let r = render_default("    indented\n\n```\nplain\n```\n");
        assert_eq!(r.html.matches(r#"data-language="text""#).count(), 2);
    }

    #[test]
    fn code_language_ignores_fence_options() {
        let r = render_default("```JavaScript {1,3}\nx\n```\n");
        assert!(r.html.contains(r#"class="language-javascript""#));
    }

    #[test]
    fn sized_iframe_is_wrapped() {
        let r = render_default(
            "<iframe width=\"560\" height=\"315\" src=\"https://www.youtube.com/embed/x\"></iframe>\n",
        );
        assert!(r.html.contains(
            r#"<div class="responsive-iframe" style="padding-bottom: 56.25%"><iframe width="560""#
        ));
        assert!(r.html.contains("</iframe></div>"));
    }

    #[test]
    fn wrap_iframes_rules() {
        assert_eq!(
            wrap_iframes("<p>x</p><iframe width=400 height=300></iframe>"),
            r#"<p>x</p><div class="responsive-iframe" style="padding-bottom: 75.00%"><iframe width=400 height=300></iframe></div>"#
        );
        let r#unsized = r#"<iframe style="max-width: 10px" src="a"></iframe>"#;
        assert_eq!(wrap_iframes(r#unsized), r#unsized);
        let unclosed = r#"<iframe width="1" height="1">"#;
        assert_eq!(wrap_iframes(unclosed), unclosed);
    }

    #[test]
    fn collects_local_references_once() {
        let r = render_default(
            "![a](./img/a.png) [doc](files/report.pdf) ![again](img/a.png)\n\
             [ext](https://example.com) [abs](/about/) [frag](#top) [up](../other.png)",
        );
        assert_eq!(r.local_refs, vec!["img/a.png", "files/report.pdf"]);
    }

    #[test]
    fn excerpt_is_plain_text() {
        let r = render_default("# Heading\n\nSome `code` and [a link](x).\n\n- item one\n- item two");
        assert_eq!(r.excerpt, "Heading Some code and a link. item one item two");
    }

    #[test]
    fn excerpt_is_pruned() {
        let words = "word ".repeat(60);
        let r = render_default(&words);
        assert!(r.excerpt.ends_with('…'));
        assert!(r.excerpt.chars().count() <= EXCERPT_LENGTH + 1);
        assert!(!r.excerpt.contains("wor…"));
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    #[test]
    fn prune_short_text_unchanged() {
        assert_eq!(prune("short", 10), "short");
    }

    #[test]
    fn prune_cuts_at_word_boundary() {
        assert_eq!(prune("hello wonderful world", 12), "hello…");
    }

    #[test]
    fn prune_single_long_word() {
        assert_eq!(prune("abcdefghij", 4), "abcd…");
    }

    #[test]
    fn prune_counts_characters_not_bytes() {
        assert_eq!(prune("ąęść ąęść", 6), "ąęść…");
    }

    #[test]
    fn local_reference_rules() {
        assert_eq!(local_reference("./a.png").as_deref(), Some("a.png"));
        assert_eq!(local_reference("a%20b.png").as_deref(), Some("a b.png"));
        assert_eq!(local_reference("img/a.png?v=2#x").as_deref(), Some("img/a.png"));
        assert_eq!(local_reference("mailto:me@example.com"), None);
        assert_eq!(local_reference("https://example.com/a.png"), None);
        assert_eq!(local_reference("/assets/a.png"), None);
        assert_eq!(local_reference("../a.png"), None);
        assert_eq!(local_reference("#section"), None);
    }

    #[test]
    fn encoded_parent_and_root_references_rejected() {
        assert_eq!(local_reference("%2E%2E/%2E%2E/secret.txt"), None);
        assert_eq!(local_reference("img/%2e%2e/%2e%2e/x.png"), None);
        assert_eq!(local_reference("%2Fetc%2Fpasswd"), None);
        assert_eq!(local_reference("..%5C..%5Cx.png"), None);
        assert_eq!(local_reference("c%3A/x.png"), None);
    }

    #[test]
    fn escape_attr_escapes_quotes_and_brackets() {
        assert_eq!(escape_attr(r#"a"b<c>&"#), "a&quot;b&lt;c&gt;&amp;");
    }
}
