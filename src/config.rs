//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! serialized to a TOML table, the user's sparse `config.toml` is merged on
//! top, and a small set of environment variables override secrets that should
//! not live in the content repository (analytics ID, newsletter endpoint).
//!
//! ## Config File Location
//!
//! ```text
//! content/
//! ├── config.toml          # Site config (optional)
//! ├── assets/
//! ├── blog/
//! └── pages/
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse; override just the values you want:
//!
//! ```toml
//! [site]
//! title = "by Jane Doe"
//! author = "Jane"
//! ```
//!
//! Unknown keys are rejected to catch typos early.
//!
//! ## Environment Overrides
//!
//! | Variable | Config key |
//! |----------|------------|
//! | `GOOGLE_ANALYTICS_TRACKING_ID` | `analytics.tracking_id` |
//! | `MAILCHIMP_ENDPOINT` | `newsletter.endpoint` |

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const ENV_TRACKING_ID: &str = "GOOGLE_ANALYTICS_TRACKING_ID";
pub const ENV_MAIL_ENDPOINT: &str = "MAILCHIMP_ENDPOINT";

const MANIFEST_DISPLAY_MODES: &[&str] = &["fullscreen", "standalone", "minimal-ui", "browser"];
const MAX_RELATED_LIMIT: usize = 12;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Directory holding blog posts, relative to the content root.
    pub blog_dir: String,
    /// Directory holding standalone pages, relative to the content root.
    pub pages_dir: String,
    /// Static assets directory, copied verbatim to `<output>/assets/`.
    pub assets_dir: String,
    pub site: SiteMetadata,
    /// Ordered social profile links shown in the intro, about and contact pages.
    pub social: Vec<SocialLink>,
    pub related: RelatedConfig,
    pub images: ImagesConfig,
    pub feed: FeedConfig,
    pub manifest: WebManifestConfig,
    pub offline: OfflineConfig,
    pub analytics: AnalyticsConfig,
    pub fonts: FontsConfig,
    pub newsletter: NewsletterConfig,
    pub colors: ColorConfig,
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            blog_dir: "blog".to_string(),
            pages_dir: "pages".to_string(),
            assets_dir: "assets".to_string(),
            site: SiteMetadata::default(),
            social: default_social_links(),
            related: RelatedConfig::default(),
            images: ImagesConfig::default(),
            feed: FeedConfig::default(),
            manifest: WebManifestConfig::default(),
            offline: OfflineConfig::default(),
            analytics: AnalyticsConfig::default(),
            fonts: FontsConfig::default(),
            newsletter: NewsletterConfig::default(),
            colors: ColorConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.related.limit == 0 || self.related.limit > MAX_RELATED_LIMIT {
            return Err(ConfigError::Validation(format!(
                "related.limit must be 1-{MAX_RELATED_LIMIT}"
            )));
        }
        let url = &self.site.site_url;
        if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Validation(
                "site.site_url must start with http:// or https://".into(),
            ));
        }
        if !MANIFEST_DISPLAY_MODES.contains(&self.manifest.display.as_str()) {
            return Err(ConfigError::Validation(format!(
                "manifest.display must be one of {}",
                MANIFEST_DISPLAY_MODES.join(", ")
            )));
        }
        if self.feed.path.trim().is_empty() || self.feed.path.starts_with('/') {
            return Err(ConfigError::Validation(
                "feed.path must be a non-empty relative path".into(),
            ));
        }
        if self.images.max_width == 0 {
            return Err(ConfigError::Validation(
                "images.max_width must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// Apply environment overrides. Empty values are ignored.
    ///
    /// Takes a lookup function rather than reading `std::env` directly so the
    /// override rules can be tested without touching process state.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(id) = non_empty(ENV_TRACKING_ID) {
            self.analytics.tracking_id = Some(id);
        }
        if let Some(endpoint) = non_empty(ENV_MAIL_ENDPOINT) {
            self.newsletter.endpoint = Some(endpoint);
        }
    }

    /// Canonical absolute URL for a site path, or `None` without a `site_url`.
    pub fn absolute_url(&self, path: &str) -> Option<String> {
        if self.site.site_url.is_empty() {
            return None;
        }
        let base = self.site.site_url.trim_end_matches('/');
        Some(format!("{}/{}", base, path.trim_start_matches('/')))
    }
}

/// Process-wide site metadata, read once before rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMetadata {
    /// Site title, appended to every page `<title>`.
    pub title: String,
    /// Short author name used in the intro ("Hey! I'm ...").
    pub author: String,
    /// Full author name used in the footer copyright line.
    pub author_full_name: String,
    /// Short bio shown in the intro and the post author block.
    pub about: String,
    /// Default meta description.
    pub description: String,
    /// Canonical site URL, e.g. `https://example.com`.
    pub site_url: String,
    /// Contact e-mail shown on the contact page.
    pub email: Option<String>,
    /// Author avatar file name inside the assets directory.
    pub avatar: String,
    /// Link used for the author name in the post author block.
    pub author_url: Option<String>,
    /// Twitter handle for `twitter:creator`, e.g. `@janedoe`.
    pub twitter: Option<String>,
    /// First year of the copyright range in the footer.
    pub copyright_since: i32,
    /// `<html lang>` and feed language.
    pub language: String,
}

impl Default for SiteMetadata {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            author: "Author".to_string(),
            author_full_name: "Author".to_string(),
            about: String::new(),
            description: String::new(),
            site_url: String::new(),
            email: None,
            avatar: "author.jpg".to_string(),
            author_url: None,
            twitter: None,
            copyright_since: 2017,
            language: "en".to_string(),
        }
    }
}

/// A social profile link: icon identifier, target URL, tooltip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SocialLink {
    pub icon: String,
    pub url: String,
    pub tooltip: String,
}

fn default_social_links() -> Vec<SocialLink> {
    vec![
        SocialLink {
            icon: "linkedin".to_string(),
            url: "https://www.linkedin.com/".to_string(),
            tooltip: "LinkedIn".to_string(),
        },
        SocialLink {
            icon: "twitter".to_string(),
            url: "https://twitter.com/".to_string(),
            tooltip: "Twitter".to_string(),
        },
        SocialLink {
            icon: "github".to_string(),
            url: "https://github.com/".to_string(),
            tooltip: "GitHub".to_string(),
        },
    ]
}

/// Related posts shown under each blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RelatedConfig {
    /// Maximum number of related posts.
    pub limit: usize,
}

impl Default for RelatedConfig {
    fn default() -> Self {
        Self {
            limit: crate::related::DEFAULT_LIMIT,
        }
    }
}

/// Markdown image presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Maximum rendered width of content images in pixels.
    pub max_width: u32,
    /// Wrap content images in a link to the original file.
    pub link_to_original: bool,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            max_width: 590,
            link_to_original: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    pub enabled: bool,
    /// Output path relative to the site root.
    pub path: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "rss.xml".to_string(),
        }
    }
}

/// Web app manifest (`manifest.webmanifest`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WebManifestConfig {
    pub enabled: bool,
    pub name: String,
    pub short_name: String,
    pub start_url: String,
    pub background_color: String,
    pub theme_color: String,
    /// One of `fullscreen`, `standalone`, `minimal-ui`, `browser`.
    pub display: String,
    /// Icon file name inside the assets directory.
    pub icon: String,
}

impl Default for WebManifestConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            name: "Personal Blog".to_string(),
            short_name: "Blog".to_string(),
            start_url: "/".to_string(),
            background_color: "#ffffff".to_string(),
            theme_color: "#663399".to_string(),
            display: "minimal-ui".to_string(),
            icon: "favicon.png".to_string(),
        }
    }
}

/// Offline support via a service worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OfflineConfig {
    pub enabled: bool,
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Google Analytics (gtag.js) settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyticsConfig {
    /// Tracking ID. Usually supplied through `GOOGLE_ANALYTICS_TRACKING_ID`.
    pub tracking_id: Option<String>,
    pub anonymize_ip: bool,
    pub cookie_expires: u32,
    /// Skip loading gtag when the browser sends Do-Not-Track.
    pub respect_dnt: bool,
    /// Path prefixes that get no tracking snippet.
    pub exclude: Vec<String>,
}

impl AnalyticsConfig {
    /// Tracking ID to emit for `path`, if tracking applies there.
    pub fn tracking_id_for(&self, path: &str) -> Option<&str> {
        let id = self.tracking_id.as_deref().map(str::trim)?;
        if id.is_empty() || self.exclude.iter().any(|p| path.starts_with(p.as_str())) {
            return None;
        }
        Some(id)
    }
}

/// Web fonts loaded from Google Fonts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontsConfig {
    /// Families in `Name:weights` form, e.g. `"Fira Sans:300,400"`.
    pub google: Vec<String>,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            google: vec![
                "Poppins:300,400,500,600,700".to_string(),
                "Fira Sans:100,300,400,500,600,700".to_string(),
            ],
        }
    }
}

impl FontsConfig {
    /// Google Fonts stylesheet URL, or `None` when no families are configured.
    pub fn stylesheet_url(&self) -> Option<String> {
        if self.google.is_empty() {
            return None;
        }
        let families: Vec<String> = self.google.iter().map(|f| f.replace(' ', "+")).collect();
        Some(format!(
            "https://fonts.googleapis.com/css?family={}",
            families.join("|")
        ))
    }
}

/// Newsletter subscription form on the contact page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NewsletterConfig {
    /// List endpoint the form posts to. Usually supplied through `MAILCHIMP_ENDPOINT`.
    pub endpoint: Option<String>,
}

/// Parallel rendering settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel render workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Dates, captions, footer.
    pub text_muted: String,
    pub border: String,
    pub link: String,
    pub link_hover: String,
    /// Tag links and highlights.
    pub accent: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#292929".to_string(),
            text_muted: "#757575".to_string(),
            border: "#ededed".to_string(),
            link: "#292929".to_string(),
            link_hover: "#663399".to_string(),
            accent: "#663399".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#121212".to_string(),
            text: "#eeeeee".to_string(),
            text_muted: "#9e9e9e".to_string(),
            border: "#2e2e2e".to_string(),
            link: "#eeeeee".to_string(),
            link_hover: "#b58be0".to_string(),
            accent: "#b58be0".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely, so an overlay
///   `[[social]]` list replaces the stock list rather than appending to it.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the content root.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// applies environment overrides from the process environment, and validates.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    let mut config = resolve_config(base, overlay)?;
    config.apply_env(|key| std::env::var(key).ok());
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Folio Configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# Content layout, relative to the content root.
blog_dir = "blog"
pages_dir = "pages"
assets_dir = "assets"

# ---------------------------------------------------------------------------
# Site metadata
# ---------------------------------------------------------------------------
[site]
title = "My Blog"
# Short name for the intro ("Hey! I'm Author").
author = "Author"
# Full name for the footer copyright line.
author_full_name = "Author"
# Short bio shown in the intro and under each post.
about = ""
description = ""
# Canonical URL, e.g. "https://example.com". Needed for feed links.
site_url = ""
# Contact e-mail shown on the contact page.
# email = "mail@example.com"
# Avatar file inside assets_dir. The post author block needs it.
avatar = "author.jpg"
# Link for the author name in the post author block.
# author_url = "https://twitter.com/example"
# twitter = "@example"
copyright_since = 2017
language = "en"

# ---------------------------------------------------------------------------
# Social profiles (ordered). Defining any [[social]] entry replaces this list.
# ---------------------------------------------------------------------------
[[social]]
icon = "linkedin"
url = "https://www.linkedin.com/"
tooltip = "LinkedIn"

[[social]]
icon = "twitter"
url = "https://twitter.com/"
tooltip = "Twitter"

[[social]]
icon = "github"
url = "https://github.com/"
tooltip = "GitHub"

# ---------------------------------------------------------------------------
# Related posts under each blog post (1-12)
# ---------------------------------------------------------------------------
[related]
limit = 3

# ---------------------------------------------------------------------------
# Content images
# ---------------------------------------------------------------------------
[images]
max_width = 590
link_to_original = true

# ---------------------------------------------------------------------------
# RSS feed
# ---------------------------------------------------------------------------
[feed]
enabled = true
path = "rss.xml"

# ---------------------------------------------------------------------------
# Web app manifest
# ---------------------------------------------------------------------------
[manifest]
enabled = true
name = "Personal Blog"
short_name = "Blog"
start_url = "/"
background_color = "#ffffff"
theme_color = "#663399"
# fullscreen | standalone | minimal-ui | browser
display = "minimal-ui"
# Icon file inside assets_dir.
icon = "favicon.png"

# ---------------------------------------------------------------------------
# Offline support (service worker)
# ---------------------------------------------------------------------------
[offline]
enabled = true

# ---------------------------------------------------------------------------
# Analytics (gtag.js). The tracking ID is usually set through the
# GOOGLE_ANALYTICS_TRACKING_ID environment variable or a .env.<mode> file.
# ---------------------------------------------------------------------------
[analytics]
# tracking_id = "G-XXXXXXX"
anonymize_ip = false
cookie_expires = 0
respect_dnt = false
# Path prefixes without tracking.
exclude = []

# ---------------------------------------------------------------------------
# Web fonts (Google Fonts), "Family:weights"
# ---------------------------------------------------------------------------
[fonts]
google = ["Poppins:300,400,500,600,700", "Fira Sans:100,300,400,500,600,700"]

# ---------------------------------------------------------------------------
# Newsletter form on the contact page. Usually set through MAILCHIMP_ENDPOINT.
# ---------------------------------------------------------------------------
[newsletter]
# endpoint = "https://example.us1.list-manage.com/subscribe/post?u=...&id=..."

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#292929"
text_muted = "#757575"
border = "#ededed"
link = "#292929"
link_hover = "#663399"
accent = "#663399"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#121212"
text = "#eeeeee"
text_muted = "#9e9e9e"
border = "#2e2e2e"
link = "#eeeeee"
link_hover = "#b58be0"
accent = "#b58be0"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel render workers. Omit to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-text: {light_text};
    --color-text-muted: {light_text_muted};
    --color-border: {light_border};
    --color-link: {light_link};
    --color-link-hover: {light_link_hover};
    --color-accent: {light_accent};
}}

@media (prefers-color-scheme: dark) {{
    :root {{
        --color-bg: {dark_bg};
        --color-text: {dark_text};
        --color-text-muted: {dark_text_muted};
        --color-border: {dark_border};
        --color-link: {dark_link};
        --color-link-hover: {dark_link_hover};
        --color-accent: {dark_accent};
    }}
}}"#,
        light_bg = colors.light.background,
        light_text = colors.light.text,
        light_text_muted = colors.light.text_muted,
        light_border = colors.light.border,
        light_link = colors.light.link,
        light_link_hover = colors.light.link_hover,
        light_accent = colors.light.accent,
        dark_bg = colors.dark.background,
        dark_text = colors.dark.text,
        dark_text_muted = colors.dark.text_muted,
        dark_border = colors.dark.border,
        dark_link = colors.dark.link,
        dark_link_hover = colors.dark.link_hover,
        dark_accent = colors.dark.accent,
    )
}

/// Generate CSS custom properties from image settings.
pub fn generate_images_css(images: &ImagesConfig) -> String {
    format!(
        ":root {{\n    --content-image-max-width: {}px;\n}}",
        images.max_width
    )
}
