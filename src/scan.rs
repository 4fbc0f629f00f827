//! Filesystem scanning and manifest generation.
//!
//! Stage 1 of the build pipeline. Reads the content directory and produces a
//! structured [`Manifest`] that the generate stage consumes.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                          # Content root
//! ├── config.toml                   # Site configuration (optional)
//! ├── assets/                       # Copied verbatim; avatar and icon live here
//! │   ├── author.jpg
//! │   └── favicon.png
//! ├── blog/
//! │   ├── hello-world/              # Post with its own directory
//! │   │   ├── index.md              # → /hello-world/
//! │   │   └── cover.jpg             # Referenced files are copied alongside
//! │   └── short-note.md             # → /short-note/
//! └── pages/
//!     ├── 010-about.md              # Numbered = in navigation → /about/
//!     └── uses.md                   # Unnumbered = hidden from nav → /uses/
//! ```
//!
//! ## Validation
//!
//! - Every post needs a `date` in its frontmatter
//! - Two posts may not resolve to the same slug, and two pages may not share
//!   a name
//! - A post may not take the URL of a page, the contact page (`/contact/`)
//!   or anything under `/tags/`
//! - Missing optional files (cover, avatar, icon) are dropped with a warning,
//!   never an error

use crate::config::{self, SiteConfig};
use crate::frontmatter::{self, Frontmatter, FrontmatterError};
use crate::markdown::{self, RenderOptions};
use crate::slug::{self, parse_entry_name};
use crate::types::{ImageRef, Page, Post, PostAsset};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("{path}: {source}")]
    Frontmatter {
        path: PathBuf,
        #[source]
        source: FrontmatterError,
    },
    #[error("Post has no date in its frontmatter: {0}")]
    MissingDate(PathBuf),
    #[error("Cannot derive a slug for {0}; put the post in its own directory")]
    NoSlug(PathBuf),
    #[error("Duplicate slug {slug}: {first} and {second}")]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("{url} is claimed by both {first} and {second}")]
    UrlCollision {
        url: String,
        first: String,
        second: String,
    },
}

/// Manifest output from the scan stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// All published posts, newest first.
    pub posts: Vec<Post>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pages: Vec<Page>,
    /// Author avatar from the assets directory, if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<ImageRef>,
    /// Web manifest / favicon icon from the assets directory, if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<ImageRef>,
    pub config: SiteConfig,
}

impl Manifest {
    /// Pages shown in the navbar, in number order.
    pub fn nav_pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter().filter(|p| p.in_nav)
    }

    pub fn page(&self, slug: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.slug == slug)
    }
}

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    let config = config::load_config(root)?;
    scan_with_config(root, config)
}

/// Scan with an already-resolved config.
///
/// Split out from [`scan`] so callers that apply their own overrides (or
/// tests that want a specific config) skip the `config.toml` lookup.
pub fn scan_with_config(root: &Path, config: SiteConfig) -> Result<Manifest, ScanError> {
    let render_options = RenderOptions {
        link_images_to_original: config.images.link_to_original,
    };

    let posts = scan_posts(root, &root.join(&config.blog_dir), render_options)?;
    let pages = scan_pages(root, &root.join(&config.pages_dir), render_options)?;
    check_post_urls(&posts, &pages)?;

    let assets = root.join(&config.assets_dir);
    let avatar = asset_image(root, &assets, &config.assets_dir, &config.site.avatar);
    let icon = asset_image(root, &assets, &config.assets_dir, &config.manifest.icon);

    Ok(Manifest {
        posts,
        pages,
        avatar,
        icon,
        config,
    })
}

// ============================================================================
// Posts
// ============================================================================

fn scan_posts(
    root: &Path,
    blog_root: &Path,
    options: RenderOptions,
) -> Result<Vec<Post>, ScanError> {
    if !blog_root.is_dir() {
        debug!("no blog directory at {}", blog_root.display());
        return Ok(Vec::new());
    }

    let mut posts = Vec::new();
    let mut seen: HashMap<String, PathBuf> = HashMap::new();

    let walker = WalkDir::new(blog_root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_markdown(entry.path()) {
            continue;
        }
        let path = entry.path();
        let Some(post) = build_post(root, blog_root, path, options)? else {
            continue;
        };
        if let Some(first) = seen.get(&post.slug) {
            return Err(ScanError::DuplicateSlug {
                slug: post.slug,
                first: first.clone(),
                second: path.to_path_buf(),
            });
        }
        seen.insert(post.slug.clone(), path.to_path_buf());
        posts.push(post);
    }

    posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));
    Ok(posts)
}

/// Build a post from a markdown file. Returns `Ok(None)` for drafts.
fn build_post(
    root: &Path,
    blog_root: &Path,
    path: &Path,
    options: RenderOptions,
) -> Result<Option<Post>, ScanError> {
    let content = fs::read_to_string(path)?;
    let (fm, body) = parse_frontmatter(path, &content)?;

    if fm.draft {
        debug!("skipping draft {}", path.display());
        return Ok(None);
    }

    let relative = path.strip_prefix(blog_root).unwrap_or(path);
    let slug = slug::post_slug(relative).ok_or_else(|| ScanError::NoSlug(path.to_path_buf()))?;

    let raw_date = fm
        .date
        .as_deref()
        .ok_or_else(|| ScanError::MissingDate(path.to_path_buf()))?;
    let date = frontmatter::parse_date(raw_date).map_err(|source| ScanError::Frontmatter {
        path: path.to_path_buf(),
        source,
    })?;

    let rendered = markdown::render(body, options);
    let source_dir = path.parent().unwrap_or(root);

    let cover = fm
        .cover
        .as_deref()
        .and_then(|c| local_image(root, source_dir, &slug, c, path));

    let assets = rendered
        .local_refs
        .iter()
        .filter_map(|reference| {
            let file = source_dir.join(reference);
            if file.is_file() {
                Some(PostAsset {
                    source: relative_to(root, &file),
                    target: reference.clone(),
                })
            } else {
                debug!("{}: reference {reference} is not a local file", path.display());
                None
            }
        })
        .collect();

    let title = fm
        .title
        .clone()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| slug.clone());

    Ok(Some(Post {
        slug,
        source_path: relative_to(root, path),
        title,
        date,
        description: fm.description.clone(),
        excerpt: rendered.excerpt,
        tags: fm.tags(),
        author: fm.author.clone().filter(|a| !a.trim().is_empty()),
        cover,
        html: rendered.html,
        assets,
    }))
}

// ============================================================================
// Pages
// ============================================================================

/// Parse all markdown files directly inside the pages directory.
///
/// Numbered files (`NNN-name.md`) appear in navigation sorted by number;
/// unnumbered files are generated but hidden.
fn scan_pages(
    root: &Path,
    pages_root: &Path,
    options: RenderOptions,
) -> Result<Vec<Page>, ScanError> {
    if !pages_root.is_dir() {
        return Ok(Vec::new());
    }

    let mut md_files: Vec<PathBuf> = fs::read_dir(pages_root)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_markdown(p) && !is_hidden(p))
        .collect();
    md_files.sort();

    let mut pages = Vec::new();
    let mut seen: HashMap<String, String> = HashMap::new();
    for md_path in &md_files {
        let stem = md_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let parsed = parse_entry_name(&stem);
        if parsed.name.is_empty() {
            warn!("page {} has no name after its number, skipping", md_path.display());
            continue;
        }

        let content = fs::read_to_string(md_path)?;
        let (fm, body) = parse_frontmatter(md_path, &content)?;
        if fm.draft {
            debug!("skipping draft page {}", md_path.display());
            continue;
        }

        let rendered = markdown::render(body, options);
        let slug = parsed.name.clone();
        let page_url = format!("/{slug}/");
        let source = relative_to(root, md_path);
        if let Some(first) = seen.get(&page_url) {
            return Err(ScanError::UrlCollision {
                url: page_url,
                first: first.clone(),
                second: source,
            });
        }
        seen.insert(page_url.clone(), source);
        let cover = fm
            .cover
            .as_deref()
            .and_then(|c| local_image(root, pages_root, &page_url, c, md_path));

        pages.push(Page {
            title: fm
                .title
                .clone()
                .unwrap_or_else(|| parsed.display_title.clone()),
            link_title: parsed.display_title,
            seo_title: fm.seo_title.clone(),
            description: fm.description.clone(),
            slug,
            cover,
            show_social: fm.social,
            html: rendered.html,
            in_nav: parsed.number.is_some(),
            sort_key: parsed.number.unwrap_or(u32::MAX),
        });
    }

    pages.sort_by_key(|p| p.sort_key);
    Ok(pages)
}

/// Reject posts whose URL a page or a built-in page already owns. A content
/// page named `contact` takes over `/contact/`, so the two never clash.
fn check_post_urls(posts: &[Post], pages: &[Page]) -> Result<(), ScanError> {
    let mut owners: HashMap<String, String> = pages
        .iter()
        .map(|p| (p.url(), format!("page {}", p.slug)))
        .collect();
    owners
        .entry(slug::CONTACT_URL.to_string())
        .or_insert_with(|| "the contact page".to_string());

    for post in posts {
        let owner = if post.slug.starts_with(slug::TAGS_PREFIX) {
            Some("the tag pages".to_string())
        } else {
            owners.get(&post.slug).cloned()
        };
        if let Some(first) = owner {
            return Err(ScanError::UrlCollision {
                url: post.slug.clone(),
                first,
                second: post.source_path.clone(),
            });
        }
    }
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn parse_frontmatter<'a>(
    path: &Path,
    content: &'a str,
) -> Result<(Frontmatter, &'a str), ScanError> {
    frontmatter::parse(content).map_err(|source| ScanError::Frontmatter {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve an image referenced relative to a content file.
///
/// The image is published under `base_url` at the same relative path.
fn local_image(
    root: &Path,
    source_dir: &Path,
    base_url: &str,
    reference: &str,
    referrer: &Path,
) -> Option<ImageRef> {
    let Some(local) = markdown::local_reference(reference) else {
        warn!(
            "{}: cover {reference} is not a relative path, ignoring",
            referrer.display()
        );
        return None;
    };
    let file = source_dir.join(&local);
    if !file.is_file() {
        warn!("{}: cover {} not found", referrer.display(), file.display());
        return None;
    }
    Some(image_ref(root, &file, format!("{base_url}{local}")))
}

fn asset_image(root: &Path, assets: &Path, assets_dir: &str, name: &str) -> Option<ImageRef> {
    if name.trim().is_empty() {
        return None;
    }
    let file = assets.join(name);
    if !file.is_file() {
        debug!("asset {} not present", file.display());
        return None;
    }
    Some(image_ref(root, &file, format!("/{assets_dir}/{name}")))
}

fn image_ref(root: &Path, file: &Path, url: String) -> ImageRef {
    let (width, height) = match image::image_dimensions(file) {
        Ok((w, h)) => (Some(w), Some(h)),
        Err(e) => {
            debug!("could not read dimensions of {}: {e}", file.display());
            (None, None)
        }
    };
    ImageRef {
        url,
        source: relative_to(root, file),
        width,
        height,
    }
}

/// Path relative to the content root with forward slashes.
fn relative_to(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|e| MARKDOWN_EXTENSIONS.contains(&e.as_str()))
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|n| n.to_string_lossy().starts_with(['.', '_']))
}
