//! HTML site generation.
//!
//! Stage 2 of the build pipeline. Takes the scan manifest and writes the final
//! static site.
//!
//! ## Generated Pages
//!
//! - **Home** (`/index.html`): author intro followed by a card for every post
//! - **Posts** (`/{slug}/index.html`): article, tags, discussion links, author
//!   block and related posts
//! - **Pages** (`/{slug}/index.html`): markdown pages such as `/about/`
//! - **Contact** (`/contact/index.html`): e-mail, newsletter form, social links
//! - **Tags** (`/tags/{tag}/index.html`): every post with that tag
//! - **Not found** (`/404.html`)
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── 404.html
//! ├── rss.xml                    # when site_url is set and the feed is enabled
//! ├── manifest.webmanifest
//! ├── sw.js
//! ├── assets/                    # copied from content/assets/
//! ├── hello-world/
//! │   ├── index.html
//! │   └── cover.jpg              # post files copied next to the page
//! ├── about/index.html
//! ├── contact/index.html
//! └── tags/
//!     └── type-script/index.html
//! ```
//!
//! ## CSS
//!
//! `static/style.css` is embedded at compile time and inlined into every page,
//! prefixed with custom properties generated from the color and image config.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Post pages are independent of each other and render in parallel on the
//! rayon pool; files are written afterwards from a single thread.

use crate::config::{self, AnalyticsConfig, SocialLink};
use crate::discussion::discussion_links;
use crate::feed;
use crate::layout::{self, AuthorBlock};
use crate::pwa;
use crate::related::related_posts;
use crate::scan::Manifest;
use crate::slug::{self, CONTACT_URL};
use crate::types::{ImageRef, Page, Post};
use chrono::Datelike;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Feed validation error: {0}")]
    Feed(#[from] rss::validation::ValidationError),
    #[error("Refusing to copy {0}: path leaves its directory")]
    UnsafePath(String),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const NOT_FOUND_URL: &str = "/404.html";
const CONTACT_SLUG: &str = "contact";
const ABOUT_SLUG: &str = "about";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Home,
    Post,
    Page,
    Contact,
    Tag,
    NotFound,
}

/// One HTML file written by the generate stage.
#[derive(Debug, Clone)]
pub struct GeneratedPage {
    pub kind: PageKind,
    pub title: String,
    pub url: String,
}

/// What the generate stage produced, for CLI output.
#[derive(Debug, Default)]
pub struct GenerateSummary {
    pub pages: Vec<GeneratedPage>,
    pub feed: Option<String>,
    pub web_manifest: bool,
    /// Cache name baked into `sw.js`, when offline support is enabled.
    pub cache_name: Option<String>,
    pub copied_files: usize,
}

impl GenerateSummary {
    pub fn count(&self, kind: PageKind) -> usize {
        self.pages.iter().filter(|p| p.kind == kind).count()
    }
}

struct RenderedPage {
    kind: PageKind,
    title: String,
    url: String,
    html: String,
}

/// Read the scan manifest from disk and generate the site.
pub fn generate(
    manifest_path: &Path,
    source_root: &Path,
    output_dir: &Path,
) -> Result<GenerateSummary, GenerateError> {
    let manifest_content = fs::read_to_string(manifest_path)?;
    let manifest: Manifest = serde_json::from_str(&manifest_content)?;
    generate_site(&manifest, source_root, output_dir)
}

pub fn generate_site(
    manifest: &Manifest,
    source_root: &Path,
    output_dir: &Path,
) -> Result<GenerateSummary, GenerateError> {
    let site = Site::new(manifest, chrono::Local::now().year());
    let config = &manifest.config;
    let mut summary = GenerateSummary::default();

    fs::create_dir_all(output_dir)?;

    let assets = source_root.join(&config.assets_dir);
    if assets.is_dir() {
        summary.copied_files += copy_dir_recursive(&assets, &output_dir.join(&config.assets_dir))?;
    }
    summary.copied_files += copy_content_files(manifest, source_root, output_dir)?;

    let pages = render_all(&site);

    for page in &pages {
        let path = output_dir.join(output_file(&page.url));
        write_file(&path, &page.html)?;
        debug!("wrote {}", path.display());
    }

    if config.feed.enabled {
        match feed::render_feed(manifest)? {
            Some(xml) => {
                write_file(&output_dir.join(&config.feed.path), &xml)?;
                summary.feed = Some(config.feed.path.clone());
            }
            None => warn!("site.site_url is not set; skipping {}", config.feed.path),
        }
    }

    if config.manifest.enabled {
        let json = pwa::web_manifest_json(&config.manifest, manifest.icon.as_ref())?;
        write_file(&output_dir.join(pwa::MANIFEST_FILE), &json)?;
        summary.web_manifest = true;
    }

    if config.offline.enabled {
        let cache_name = pwa::cache_name(pages.iter().map(|p| (p.url.as_str(), p.html.as_str())));
        let mut precache: Vec<String> = pages.iter().map(|p| p.url.clone()).collect();
        if let Some(feed) = &summary.feed {
            precache.push(format!("/{feed}"));
        }
        if summary.web_manifest {
            precache.push(format!("/{}", pwa::MANIFEST_FILE));
        }
        // `cache.addAll` rejects a list with repeated requests.
        let mut seen = HashSet::new();
        precache.retain(|url| seen.insert(url.clone()));
        let sw = pwa::service_worker(&cache_name, &precache)?;
        write_file(&output_dir.join(pwa::SERVICE_WORKER_FILE), &sw)?;
        summary.cache_name = Some(cache_name);
    }

    summary.pages = pages
        .into_iter()
        .map(|p| GeneratedPage {
            kind: p.kind,
            title: p.title,
            url: p.url,
        })
        .collect();

    info!(
        "generated {} pages in {}",
        summary.pages.len(),
        output_dir.display()
    );
    Ok(summary)
}

fn render_all(site: &Site) -> Vec<RenderedPage> {
    let manifest = site.manifest;
    let mut pages = vec![RenderedPage {
        kind: PageKind::Home,
        title: manifest.config.site.title.clone(),
        url: "/".to_string(),
        html: render_home(site).into_string(),
    }];

    let posts: Vec<RenderedPage> = manifest
        .posts
        .par_iter()
        .map(|post| RenderedPage {
            kind: PageKind::Post,
            title: post.title.clone(),
            url: post.slug.clone(),
            html: render_post(site, post).into_string(),
        })
        .collect();
    pages.extend(posts);

    for page in &manifest.pages {
        pages.push(RenderedPage {
            kind: PageKind::Page,
            title: page.title.clone(),
            url: page.url(),
            html: render_page(site, page).into_string(),
        });
    }

    // A content page named `contact` replaces the built-in one.
    if manifest.page(CONTACT_SLUG).is_none() {
        pages.push(RenderedPage {
            kind: PageKind::Contact,
            title: "Contact me".to_string(),
            url: CONTACT_URL.to_string(),
            html: render_contact(site).into_string(),
        });
    }

    for group in posts_by_tag(&manifest.posts) {
        pages.push(RenderedPage {
            kind: PageKind::Tag,
            title: format!("#{}", group.name),
            html: render_tag_page(site, &group).into_string(),
            url: group.url,
        });
    }

    pages.push(RenderedPage {
        kind: PageKind::NotFound,
        title: "404: Not Found".to_string(),
        url: NOT_FOUND_URL.to_string(),
        html: render_not_found(site).into_string(),
    });

    pages
}

struct TagGroup<'a> {
    /// First spelling seen
    name: &'a str,
    url: String,
    posts: Vec<&'a Post>,
}

/// Group posts by tag URL. Posts keep manifest order (newest first); tags
/// without a URL get no page.
fn posts_by_tag(posts: &[Post]) -> Vec<TagGroup<'_>> {
    let mut groups: BTreeMap<String, TagGroup<'_>> = BTreeMap::new();
    for post in posts {
        for tag in &post.tags {
            let Some(url) = slug::tag_url(tag) else {
                continue;
            };
            let group = groups.entry(url.clone()).or_insert_with(|| TagGroup {
                name: tag,
                url,
                posts: Vec::new(),
            });
            if !group.posts.iter().any(|p| p.slug == post.slug) {
                group.posts.push(post);
            }
        }
    }
    groups.into_values().collect()
}

/// Output file for a site URL: `/` → `index.html`, `/a/` → `a/index.html`.
pub fn output_file(url: &str) -> PathBuf {
    let trimmed = url.trim_matches('/');
    if trimmed.is_empty() {
        PathBuf::from("index.html")
    } else if url.ends_with('/') {
        Path::new(trimmed).join("index.html")
    } else {
        PathBuf::from(trimmed)
    }
}

fn write_file(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

fn copy_file(src: &Path, dst: &Path) -> std::io::Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dst)?;
    Ok(())
}

/// Copy covers and referenced files next to the pages that use them.
///
/// Every path comes from the manifest, which may be edited by hand between
/// stages, so each one must stay below its root.
fn copy_content_files(
    manifest: &Manifest,
    source_root: &Path,
    output_dir: &Path,
) -> Result<usize, GenerateError> {
    let mut copied = 0;
    for post in &manifest.posts {
        for asset in &post.assets {
            let target = format!("{}/{}", post.output_dir(), asset.target);
            copy_contained(source_root, &asset.source, output_dir, &target)?;
            copied += 1;
        }
    }
    let covers = manifest
        .posts
        .iter()
        .filter_map(|p| p.cover.as_ref())
        .chain(manifest.pages.iter().filter_map(|p| p.cover.as_ref()));
    for cover in covers {
        copy_contained(source_root, &cover.source, output_dir, &cover.url)?;
        copied += 1;
    }
    Ok(copied)
}

fn copy_contained(
    source_root: &Path,
    source: &str,
    output_dir: &Path,
    target: &str,
) -> Result<(), GenerateError> {
    let src = contained_path(source).ok_or_else(|| GenerateError::UnsafePath(source.to_string()))?;
    let dst = contained_path(target).ok_or_else(|| GenerateError::UnsafePath(target.to_string()))?;
    copy_file(&source_root.join(src), &output_dir.join(dst))?;
    Ok(())
}

/// A `/`-separated path as a relative path made only of normal components,
/// or `None` if any part would climb out of (or replace) the base it is
/// joined to.
fn contained_path(path: &str) -> Option<PathBuf> {
    let relative = PathBuf::from(path.trim_start_matches('/'));
    let normal = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    (normal && relative.components().next().is_some()).then_some(relative)
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<usize> {
    fs::create_dir_all(dst)?;
    let mut copied = 0;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        if src_path.is_dir() {
            copied += copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
            copied += 1;
        }
    }
    Ok(copied)
}

// ============================================================================
// Shared render context
// ============================================================================

/// Per-build data shared by every page render.
struct Site<'a> {
    manifest: &'a Manifest,
    css: String,
    year: i32,
}

impl<'a> Site<'a> {
    fn new(manifest: &'a Manifest, year: i32) -> Self {
        let css = format!(
            "{}\n\n{}\n\n{}",
            config::generate_color_css(&manifest.config.colors),
            config::generate_images_css(&manifest.config.images),
            CSS_STATIC
        );
        Self {
            manifest,
            css,
            year,
        }
    }

    fn has_about_page(&self) -> bool {
        self.manifest.page(ABOUT_SLUG).is_some()
    }
}

/// Per-page SEO values.
struct Seo<'a> {
    /// Page title before the site-title template. `None` uses the site title.
    title: Option<&'a str>,
    description: &'a str,
    /// Site path of the page, for the canonical link and analytics rules.
    path: &'a str,
    og_type: &'static str,
    image: Option<&'a ImageRef>,
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document with the SEO head.
fn base_document(
    site: &Site,
    seo: &Seo,
    current: &str,
    body_class: Option<&str>,
    content: Markup,
) -> Markup {
    let config = &site.manifest.config;
    let meta = &config.site;
    let title = match seo.title {
        Some(t) if t != meta.title => format!("{t} | {}", meta.title),
        _ => meta.title.clone(),
    };
    let description = if seo.description.is_empty() {
        meta.description.as_str()
    } else {
        seo.description
    };
    let creator = meta.twitter.as_deref().unwrap_or(meta.author.as_str());
    let canonical = config.absolute_url(seo.path);
    let og_image = seo
        .image
        .map(|i| config.absolute_url(&i.url).unwrap_or_else(|| i.url.clone()));
    let feed_href = (config.feed.enabled && !meta.site_url.is_empty())
        .then(|| format!("/{}", config.feed.path));
    let analytics = analytics_snippet(&config.analytics, seo.path);

    html! {
        (DOCTYPE)
        html lang=(meta.language) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                meta name="description" content=(description);
                meta property="og:title" content=(title);
                meta property="og:description" content=(description);
                meta property="og:type" content=(seo.og_type);
                @if let Some(image) = &og_image {
                    meta property="og:image" content=(image);
                }
                meta name="twitter:card" content="summary";
                meta name="twitter:creator" content=(creator);
                meta name="twitter:title" content=(title);
                meta name="twitter:description" content=(description);
                @if let Some(url) = &canonical {
                    link rel="canonical" href=(url);
                }
                @if let Some(href) = &feed_href {
                    link rel="alternate" type="application/rss+xml" title=(meta.title) href=(href);
                }
                @if config.manifest.enabled {
                    link rel="manifest" href={ "/" (pwa::MANIFEST_FILE) };
                    meta name="theme-color" content=(config.manifest.theme_color);
                }
                @if let Some(icon) = &site.manifest.icon {
                    link rel="icon" href=(icon.url);
                    link rel="apple-touch-icon" href=(icon.url);
                }
                @if let Some(fonts) = config.fonts.stylesheet_url() {
                    link rel="stylesheet" href=(fonts);
                }
                style { (PreEscaped(&site.css)) }
                @if let Some(snippet) = analytics {
                    (snippet)
                }
            }
            body class=[body_class] {
                (navbar(site, current))
                (content)
                (footer(site))
                @if config.offline.enabled {
                    script { (PreEscaped(pwa::REGISTRATION_SCRIPT)) }
                }
            }
        }
    }
}

/// gtag.js snippet for a page, or `None` when tracking is off for `path`.
fn analytics_snippet(analytics: &AnalyticsConfig, path: &str) -> Option<Markup> {
    let id = analytics.tracking_id_for(path)?;
    let id_js = js_string(id);
    let loader = format!("https://www.googletagmanager.com/gtag/js?id={}", urlencoding::encode(id));
    let mut options = Vec::new();
    if analytics.anonymize_ip {
        options.push("anonymize_ip: true".to_string());
    }
    if analytics.cookie_expires > 0 {
        options.push(format!("cookie_expires: {}", analytics.cookie_expires));
    }
    let config_call = format!(
        "window.dataLayer = window.dataLayer || [];\
         function gtag(){{dataLayer.push(arguments);}}\
         gtag('js', new Date());\
         gtag('config', {id_js}, {{{}}});",
        options.join(", ")
    );

    if analytics.respect_dnt {
        let guarded = format!(
            "(function () {{\
             var dnt = navigator.doNotTrack || window.doNotTrack || navigator.msDoNotTrack;\
             if (dnt === '1' || dnt === 'yes') {{ return; }}\
             var s = document.createElement('script');\
             s.async = true;\
             s.src = {};\
             document.head.appendChild(s);\
             {config_call}\
             }})();",
            js_string(&loader)
        );
        Some(html! { script { (PreEscaped(guarded)) } })
    } else {
        Some(html! {
            script async src=(loader) {}
            script { (PreEscaped(config_call)) }
        })
    }
}

/// Quote a value as a JavaScript string literal that is safe inside `<script>`.
fn js_string(value: &str) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace('<', "\\u003c")
}

fn navbar(site: &Site, current: &str) -> Markup {
    let is_current = |url: &str| current == url;
    html! {
        header.site-header {
            a.site-title href="/" { (site.manifest.config.site.title) }
            nav.site-nav {
                ul {
                    li.current[is_current("/")] { a href="/" { "Home" } }
                    @for page in site.manifest.nav_pages() {
                        @let url = page.url();
                        li.current[is_current(&url)] { a href=(url) { (page.link_title) } }
                    }
                    li.current[is_current(CONTACT_URL)] { a href=(CONTACT_URL) { "Contact" } }
                }
            }
        }
    }
}

fn footer(site: &Site) -> Markup {
    html! {
        footer.site-footer {
            (copyright_line(&site.manifest.config.site, site.year))
        }
    }
}

fn copyright_line(meta: &config::SiteMetadata, year: i32) -> String {
    format!(
        "Copyright © {} - {} {}",
        meta.copyright_since, year, meta.author_full_name
    )
}

fn social_profiles(links: &[SocialLink]) -> Markup {
    html! {
        @if !links.is_empty() {
            ul.social-profiles {
                @for link in links {
                    li {
                        a class={ "social-" (link.icon) } href=(link.url) title=(link.tooltip)
                            aria-label=(link.tooltip) target="_blank" rel="noopener noreferrer" {
                            (link.icon)
                        }
                    }
                }
            }
        }
    }
}

fn cover_image(image: &ImageRef, alt: &str) -> Markup {
    html! {
        img src=(image.url) alt=(alt) width=[image.width] height=[image.height] loading="lazy";
    }
}

fn post_card(post: &Post) -> Markup {
    html! {
        article.post-card {
            @if let Some(cover) = &post.cover {
                a.post-card-image href=(post.slug) { (cover_image(cover, &post.title)) }
            }
            div.post-card-body {
                h2.post-card-title { a href=(post.slug) { (post.title) } }
                time datetime=(post.date.format("%Y-%m-%d").to_string()) { (post.display_date()) }
                p.post-card-summary { (post.summary()) }
                (tag_list(&post.tags))
            }
        }
    }
}

fn tag_list(tags: &[String]) -> Markup {
    let links = layout::tag_links(tags);
    html! {
        @if !links.is_empty() {
            div.post-tags {
                @for link in &links {
                    a href=(link.url) { (link.text) }
                }
            }
        }
    }
}

fn author_meta(author: &AuthorBlock) -> Markup {
    html! {
        div.author-meta {
            div.author-avatar { (cover_image(author.avatar, "author")) }
            div.author-description {
                "Blog by "
                @if let Some(link) = &author.link {
                    a href=(link) { (author.name) }
                } @else {
                    (author.name)
                }
                @if !author.about.is_empty() {
                    br;
                    span { (author.about) }
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

fn render_home(site: &Site) -> Markup {
    let manifest = site.manifest;
    let meta = &manifest.config.site;
    let seo = Seo {
        title: None,
        description: &meta.description,
        path: "/",
        og_type: "website",
        image: manifest.avatar.as_ref(),
    };

    let content = html! {
        main.home-page {
            section.intro {
                @if let Some(avatar) = &manifest.avatar {
                    div.intro-image { (cover_image(avatar, "author")) }
                }
                div.intro-info {
                    h1.intro-title { "Hey! I’m " b { (meta.author) } }
                    p.intro-description {
                        (meta.about)
                        @if site.has_about_page() {
                            br;
                            a href={ "/" (ABOUT_SLUG) "/" } { "👉 Learn more" }
                        }
                    }
                    (social_profiles(&manifest.config.social))
                }
            }
            section.post-list {
                @for post in &manifest.posts {
                    (post_card(post))
                }
            }
        }
    };

    base_document(site, &seo, "/", None, content)
}

fn render_post(site: &Site, post: &Post) -> Markup {
    let manifest = site.manifest;
    let config = &manifest.config;
    let post_layout = layout::post_layout(post);
    let author = layout::author_block(post, manifest.avatar.as_ref(), &config.site);
    let links = discussion_links(&post.title);
    let related = related_posts(post, &manifest.posts, config.related.limit);

    let seo = Seo {
        title: Some(post.title.as_str()),
        description: post.summary(),
        path: &post.slug,
        og_type: "article",
        image: post.cover.as_ref(),
    };

    let content = html! {
        main.post-page {
            article class={ "post-details " (post_layout.image_position.class()) } {
                @if let Some(cover) = &post.cover {
                    figure.post-cover { (cover_image(cover, &post.title)) }
                }
                div.post-details-body {
                    h1.post-title { (post.title) }
                    time.post-date datetime=(post.date.format("%Y-%m-%d").to_string()) {
                        (post.display_date())
                    }
                    div.post-content { (PreEscaped(&post.html)) }
                }
            }
            footer.post-footer.center[post_layout.centered] {
                (tag_list(&post.tags))
                div.post-share {
                    span { "Community discussions:" }
                    a href=(links.twitter) target="_blank" rel="noopener noreferrer" { "on twitter" }
                    a href=(links.reddit) target="_blank" rel="noopener noreferrer" { "on reddit" }
                }
            }
            @if let Some(author) = &author {
                section.post-author {
                    h2.section-title { "Author" }
                    (author_meta(author))
                }
            }
            section.post-comment.center[post_layout.centered] {}
            @if !related.is_empty() {
                section.related-posts {
                    h2.section-title { "Related Posts" }
                    div.related-items {
                        @for item in &related {
                            (post_card(item))
                        }
                    }
                }
            }
        }
    };

    base_document(site, &seo, &post.slug, Some("post"), content)
}

fn render_page(site: &Site, page: &Page) -> Markup {
    let url = page.url();
    let seo = Seo {
        title: Some(page.seo_title.as_deref().unwrap_or(page.title.as_str())),
        description: page.description.as_deref().unwrap_or_default(),
        path: &url,
        og_type: "website",
        image: page.cover.as_ref(),
    };
    let position = if page.cover.is_some() {
        layout::ImagePosition::Left
    } else {
        layout::ImagePosition::Center
    };

    let content = html! {
        main.content-page {
            article class={ "post-details " (position.class()) } {
                @if let Some(cover) = &page.cover {
                    figure.post-cover { (cover_image(cover, &page.title)) }
                }
                div.post-details-body {
                    h1.post-title { (page.title) }
                    div.post-content { (PreEscaped(&page.html)) }
                }
            }
            @if page.show_social {
                div.social-section {
                    h3 { "Contact me on:" }
                    (social_profiles(&site.manifest.config.social))
                }
            }
        }
    };

    base_document(site, &seo, &url, None, content)
}

fn render_contact(site: &Site) -> Markup {
    let config = &site.manifest.config;
    let seo = Seo {
        title: Some("Contact me"),
        description: "",
        path: CONTACT_URL,
        og_type: "website",
        image: None,
    };

    let content = html! {
        main.contact-page {
            h1 { "Contact me" }
            @if let Some(email) = config.site.email.as_deref().filter(|e| !e.is_empty()) {
                p.contact-email {
                    "Drop me a line at "
                    a href={ "mailto:" (email) } { (email) }
                }
            }
            @if let Some(endpoint) = config.newsletter.endpoint.as_deref().filter(|e| !e.is_empty()) {
                form.newsletter action=(endpoint) method="post" target="_blank" {
                    label for="newsletter-email" { "Get new posts by e-mail" }
                    input id="newsletter-email" type="email" name="EMAIL" placeholder="you@example.com" required;
                    button type="submit" { "Subscribe" }
                }
            }
            (social_profiles(&config.social))
        }
    };

    base_document(site, &seo, CONTACT_URL, None, content)
}

fn render_tag_page(site: &Site, group: &TagGroup) -> Markup {
    let posts = &group.posts;
    let title = format!("#{}", group.name);
    let noun = if posts.len() == 1 { "post" } else { "posts" };
    let seo = Seo {
        title: Some(title.as_str()),
        description: "",
        path: &group.url,
        og_type: "website",
        image: None,
    };

    let content = html! {
        main.tag-page {
            header.tag-header {
                h1 { (title) }
                p { "A collection of " (posts.len()) " " (noun) }
            }
            section.post-list {
                @for post in posts {
                    (post_card(post))
                }
            }
        }
    };

    base_document(site, &seo, &group.url, None, content)
}

fn render_not_found(site: &Site) -> Markup {
    let seo = Seo {
        title: Some("404: Not Found"),
        description: "",
        path: NOT_FOUND_URL,
        og_type: "website",
        image: None,
    };

    let content = html! {
        main.not-found {
            h1 { "404: Not Found" }
            p { "This page doesn't exist. It may have moved, or the link may be wrong." }
            a href="/" { "Go back home" }
        }
    };

    base_document(site, &seo, NOT_FOUND_URL, Some("not-found-page"), content)
}

// ============================================================================
// Tests
// ============================================================================
