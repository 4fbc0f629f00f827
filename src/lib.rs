//! # Folio
//!
//! A static site generator for a personal blog. Posts are markdown files with
//! YAML frontmatter, tags connect posts to each other, and numbered pages
//! become navigation entries. The output is plain HTML with an RSS feed, a web
//! app manifest and an offline service worker.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Scan      content/  →  manifest.json    (filesystem → structured data)
//! 2. Generate  manifest  →  dist/            (final HTML site)
//! ```
//!
//! The manifest is human-readable JSON. `folio scan` writes it, `folio generate`
//! reads it back, and `folio build` runs both.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: walks the content directory, parses posts and pages, produces the manifest |
//! | [`generate`] | Stage 2: renders the final HTML site from the manifest using Maud |
//! | [`config`] | `config.toml` loading, validation, environment overrides and CSS generation |
//! | [`types`] | Shared types serialized between stages (`Post`, `Page`, `ImageRef`) |
//! | [`slug`] | `NNN-name` parsing, post slugs and tag URLs |
//! | [`frontmatter`] | YAML frontmatter split and date parsing |
//! | [`markdown`] | Markdown to HTML, excerpts and local file references |
//! | [`related`] | Related-post selection by shared tags |
//! | [`discussion`] | Share-on-Twitter and Reddit search links |
//! | [`layout`] | Post presentation decisions: centering, image position, author block |
//! | [`feed`] | RSS 2.0 feed |
//! | [`pwa`] | Web manifest and service worker |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), so markup errors
//! are compile errors and every interpolation is escaped by default. Markdown
//! bodies are the only pre-escaped HTML and come straight from `pulldown-cmark`.
//!
//! ## NNN-Prefix Ordering for Pages
//!
//! Pages use a numeric prefix (`010-about.md`) for navigation order. Pages
//! without a prefix are still generated but stay out of the navbar.
//!
//! ## Content-Hashed Offline Cache
//!
//! The service worker cache name is a hash of every generated page, so a
//! deploy that changes any page evicts the old cache on activation.

pub mod config;
pub mod discussion;
pub mod feed;
pub mod frontmatter;
pub mod generate;
pub mod layout;
pub mod markdown;
pub mod output;
pub mod pwa;
pub mod related;
pub mod scan;
pub mod slug;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
