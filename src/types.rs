//! Shared types used by both pipeline stages.
//!
//! These types are serialized to JSON by scan and read back by generate, so
//! the stage manifest is the single contract between the two.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Display format for post dates, e.g. `05 Jan, 2020`.
pub const DATE_DISPLAY_FORMAT: &str = "%d %b, %Y";

/// A blog post read from `content/blog/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// URL path with leading and trailing slash, e.g. `/hello-world/`
    pub slug: String,
    /// Markdown source, relative to the content root
    pub source_path: String,
    /// Frontmatter title, or the slug when the frontmatter has none
    pub title: String,
    pub date: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Plain-text summary pruned to 160 characters
    pub excerpt: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<ImageRef>,
    /// Rendered HTML body
    pub html: String,
    /// Local files referenced by the post, copied next to its page
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<PostAsset>,
}

impl Post {
    /// Description used for SEO and feeds: frontmatter first, excerpt otherwise.
    pub fn summary(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(&self.excerpt)
    }

    pub fn display_date(&self) -> String {
        self.date.format(DATE_DISPLAY_FORMAT).to_string()
    }

    /// Output directory of the post, relative to the site root (`hello-world`).
    pub fn output_dir(&self) -> &str {
        self.slug.trim_matches('/')
    }
}

/// A file referenced from a post body or its cover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostAsset {
    /// Source file, relative to the content root
    pub source: String,
    /// Destination, relative to the post's output directory
    pub target: String,
}

/// An image the site links to, resolved during scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Absolute URL path on the generated site
    pub url: String,
    /// Source file, relative to the content root
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// A page generated from a markdown file in `content/pages/`.
///
/// Pages follow the `NNN-name` convention:
/// - Numbered files (`010-about.md`) appear in navigation, sorted by number
/// - Unnumbered files are generated but hidden from navigation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Heading shown on the page
    pub title: String,
    /// Label in the navbar (filename with number stripped, dashes to spaces)
    pub link_title: String,
    /// `<title>` override; falls back to `title`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// URL slug (filename stem with number prefix stripped)
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<ImageRef>,
    /// Render the social profile links below the content
    #[serde(default)]
    pub show_social: bool,
    pub html: String,
    pub in_nav: bool,
    pub sort_key: u32,
}

impl Page {
    pub fn url(&self) -> String {
        format!("/{}/", self.slug)
    }
}
