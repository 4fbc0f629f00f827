//! CLI output formatting for both pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every entity (post, page, tag) is its semantic identity: positional
//! index and title. Filesystem paths follow as indented context lines, so the
//! output reads as a content inventory while still tracing back to files.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Posts
//! 001 TypeScript Generics (12 Mar, 2021)
//!     Source: blog/typescript-generics/index.md
//!     Tags: TypeScript, Angular
//!     Cover: blog/typescript-generics/cover.png
//! 002 Short Note (01 Feb, 2018)
//!     Source: blog/short-note.md
//!
//! Pages
//! 001 about → /about/
//! 002 uses → /uses/ (hidden)
//!
//! Config
//!     config.toml
//!     assets/
//!     Avatar: assets/author.png
//! ```
//!
//! ## Generate
//!
//! ```text
//! Home → index.html
//! Posts
//! 001 TypeScript Generics → typescript-generics/index.html
//! Pages
//! 001 Hey there → about/index.html
//! Contact me → contact/index.html
//! Tags
//! 001 #Angular → tags/angular/index.html
//! 404: Not Found → 404.html
//! Feed → rss.xml
//! Service worker → sw.js (folio-1a2b3c4d5e6f)
//!
//! Generated 4 posts, 2 pages, 3 tag pages; copied 6 files
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure.

use crate::generate::{self, GenerateSummary, PageKind};
use crate::pwa;
use crate::scan::Manifest;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Index + title, optionally followed by a parenthesised detail.
///
/// ```text
/// 001 Hello World (05 Jan, 2019)
/// 002 uses
/// ```
fn entity_header(index: usize, title: &str, detail: Option<&str>) -> String {
    match detail {
        Some(d) => format!("{} {} ({})", format_index(index), title, d),
        None => format!("{} {}", format_index(index), title),
    }
}

/// `title → path` line for a generated file.
fn arrow_line(label: &str, url: &str) -> String {
    format!("{} \u{2192} {}", label, generate::output_file(url).display())
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format scan stage output showing discovered content.
pub fn format_scan_output(manifest: &Manifest, source_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Posts".to_string());
    if manifest.posts.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, post) in manifest.posts.iter().enumerate() {
        lines.push(entity_header(i + 1, &post.title, Some(&post.display_date())));
        lines.push(format!("{}Source: {}", indent(1), post.source_path));
        if let Some(desc) = post.description.as_deref().filter(|d| !d.trim().is_empty()) {
            lines.push(format!("{}{}", indent(1), truncate_desc(desc.trim(), 60)));
        }
        if !post.tags.is_empty() {
            lines.push(format!("{}Tags: {}", indent(1), post.tags.join(", ")));
        }
        if let Some(cover) = &post.cover {
            lines.push(format!("{}Cover: {}", indent(1), cover.source));
        }
        if !post.assets.is_empty() {
            lines.push(format!("{}Files: {}", indent(1), post.assets.len()));
        }
    }

    if !manifest.pages.is_empty() {
        lines.push(String::new());
        lines.push("Pages".to_string());
        for (i, page) in manifest.pages.iter().enumerate() {
            let hidden = if page.in_nav { "" } else { " (hidden)" };
            lines.push(format!(
                "{} {} \u{2192} {}{}",
                format_index(i + 1),
                page.link_title,
                page.url(),
                hidden
            ));
        }
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join("config.toml").exists() {
        lines.push(format!("{}config.toml", indent(1)));
    }
    if source_root.join(&manifest.config.assets_dir).is_dir() {
        lines.push(format!("{}{}/", indent(1), manifest.config.assets_dir));
    }
    if let Some(avatar) = &manifest.avatar {
        lines.push(format!("{}Avatar: {}", indent(1), avatar.source));
    }
    if let Some(icon) = &manifest.icon {
        lines.push(format!("{}Icon: {}", indent(1), icon.source));
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest, source_root: &Path) {
    for line in format_scan_output(manifest, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Generate output
// ============================================================================

/// Format generate stage output showing generated files.
///
/// Pages are grouped by kind in a fixed order; positional indices restart in
/// each group.
pub fn format_generate_output(summary: &GenerateSummary) -> Vec<String> {
    let mut lines = Vec::new();
    let of_kind = |kind: PageKind| summary.pages.iter().filter(move |p| p.kind == kind);

    for page in of_kind(PageKind::Home) {
        lines.push(arrow_line("Home", &page.url));
    }

    for (heading, kind) in [
        ("Posts", PageKind::Post),
        ("Pages", PageKind::Page),
    ] {
        let mut group = of_kind(kind).peekable();
        if group.peek().is_none() {
            continue;
        }
        lines.push(heading.to_string());
        for (i, page) in group.enumerate() {
            lines.push(arrow_line(&entity_header(i + 1, &page.title, None), &page.url));
        }
    }

    for page in of_kind(PageKind::Contact) {
        lines.push(arrow_line(&page.title, &page.url));
    }

    let mut tags = of_kind(PageKind::Tag).peekable();
    if tags.peek().is_some() {
        lines.push("Tags".to_string());
        for (i, page) in tags.enumerate() {
            lines.push(arrow_line(&entity_header(i + 1, &page.title, None), &page.url));
        }
    }

    for page in of_kind(PageKind::NotFound) {
        lines.push(arrow_line(&page.title, &page.url));
    }

    if let Some(feed) = &summary.feed {
        lines.push(format!("Feed \u{2192} {}", feed));
    }
    if summary.web_manifest {
        lines.push(format!("Web manifest \u{2192} {}", pwa::MANIFEST_FILE));
    }
    if let Some(cache) = &summary.cache_name {
        lines.push(format!(
            "Service worker \u{2192} {} ({})",
            pwa::SERVICE_WORKER_FILE,
            cache
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {} posts, {} pages, {} tag pages; copied {} files",
        summary.count(PageKind::Post),
        summary.count(PageKind::Page),
        summary.count(PageKind::Tag),
        summary.copied_files
    ));

    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(summary: &GenerateSummary) {
    for line in format_generate_output(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::generate::GeneratedPage;
    use crate::types::{ImageRef, Page, Post};
    use chrono::NaiveDate;

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn entity_header_with_and_without_detail() {
        assert_eq!(
            entity_header(1, "Hello", Some("05 Jan, 2019")),
            "001 Hello (05 Jan, 2019)"
        );
        assert_eq!(entity_header(2, "uses", None), "002 uses");
    }

    #[test]
    fn truncate_desc_counts_characters() {
        assert_eq!(truncate_desc("short", 10), "short");
        assert_eq!(truncate_desc("żółw żółw", 4), "żółw...");
    }

    #[test]
    fn arrow_line_maps_urls_to_files() {
        assert_eq!(arrow_line("Home", "/"), "Home \u{2192} index.html");
        assert_eq!(arrow_line("x", "/a/"), "x \u{2192} a/index.html");
    }

    // =========================================================================
    // Scan output
    // =========================================================================

    fn sample_manifest() -> Manifest {
        let post = Post {
            slug: "/hello-world/".to_string(),
            source_path: "blog/hello-world/index.md".to_string(),
            title: "Hello World".to_string(),
            date: NaiveDate::from_ymd_opt(2019, 1, 5)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            description: None,
            excerpt: String::new(),
            tags: vec!["Meta".to_string(), "Writing".to_string()],
            author: None,
            cover: Some(ImageRef {
                url: "/hello-world/cover.png".to_string(),
                source: "blog/hello-world/cover.png".to_string(),
                width: None,
                height: None,
            }),
            html: String::new(),
            assets: vec![],
        };
        let page = Page {
            title: "Uses".to_string(),
            link_title: "uses".to_string(),
            seo_title: None,
            description: None,
            slug: "uses".to_string(),
            cover: None,
            show_social: false,
            html: String::new(),
            in_nav: false,
            sort_key: u32::MAX,
        };
        Manifest {
            posts: vec![post],
            pages: vec![page],
            avatar: None,
            icon: None,
            config: SiteConfig::default(),
        }
    }

    #[test]
    fn scan_output_lists_posts_and_pages() {
        let tmp = tempfile::TempDir::new().unwrap();
        let lines = format_scan_output(&sample_manifest(), tmp.path());
        assert_eq!(lines[0], "Posts");
        assert_eq!(lines[1], "001 Hello World (05 Jan, 2019)");
        assert_eq!(lines[2], "    Source: blog/hello-world/index.md");
        assert_eq!(lines[3], "    Tags: Meta, Writing");
        assert_eq!(lines[4], "    Cover: blog/hello-world/cover.png");
        assert!(lines.contains(&"001 uses \u{2192} /uses/ (hidden)".to_string()));
    }

    #[test]
    fn scan_output_config_section() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(tmp.path().join("config.toml"), "").unwrap();
        std::fs::create_dir(tmp.path().join("assets")).unwrap();
        let lines = format_scan_output(&sample_manifest(), tmp.path());
        let config_at = lines.iter().position(|l| l == "Config").unwrap();
        assert_eq!(lines[config_at + 1], "    config.toml");
        assert_eq!(lines[config_at + 2], "    assets/");
    }

    #[test]
    fn scan_output_without_posts() {
        let mut manifest = sample_manifest();
        manifest.posts.clear();
        let tmp = tempfile::TempDir::new().unwrap();
        let lines = format_scan_output(&manifest, tmp.path());
        assert_eq!(lines[1], "    (none)");
    }

    // =========================================================================
    // Generate output
    // =========================================================================

    fn page(kind: PageKind, title: &str, url: &str) -> GeneratedPage {
        GeneratedPage {
            kind,
            title: title.to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn generate_output_groups_by_kind() {
        let summary = GenerateSummary {
            pages: vec![
                page(PageKind::Home, "My Blog", "/"),
                page(PageKind::Post, "Hello World", "/hello-world/"),
                page(PageKind::Page, "About", "/about/"),
                page(PageKind::Contact, "Contact me", "/contact/"),
                page(PageKind::Tag, "#Meta", "/tags/meta/"),
                page(PageKind::NotFound, "404: Not Found", "/404.html"),
            ],
            feed: Some("rss.xml".to_string()),
            web_manifest: true,
            cache_name: Some("folio-abc".to_string()),
            copied_files: 3,
        };
        let lines = format_generate_output(&summary);
        assert_eq!(
            lines,
            vec![
                "Home \u{2192} index.html",
                "Posts",
                "001 Hello World \u{2192} hello-world/index.html",
                "Pages",
                "001 About \u{2192} about/index.html",
                "Contact me \u{2192} contact/index.html",
                "Tags",
                "001 #Meta \u{2192} tags/meta/index.html",
                "404: Not Found \u{2192} 404.html",
                "Feed \u{2192} rss.xml",
                "Web manifest \u{2192} manifest.webmanifest",
                "Service worker \u{2192} sw.js (folio-abc)",
                "",
                "Generated 1 posts, 1 pages, 1 tag pages; copied 3 files",
            ]
        );
    }

    #[test]
    fn generate_output_skips_empty_groups() {
        let summary = GenerateSummary {
            pages: vec![page(PageKind::Home, "My Blog", "/")],
            ..Default::default()
        };
        let lines = format_generate_output(&summary);
        assert!(!lines.contains(&"Posts".to_string()));
        assert!(!lines.contains(&"Tags".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("Feed")));
    }
}
