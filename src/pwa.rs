//! Progressive web app files: the web manifest and the offline service worker.
//!
//! The service worker uses stale-while-revalidate: cached pages are served
//! immediately while a fresh copy is fetched in the background. Its cache name
//! is derived from the generated pages, so any content change produces a new
//! cache and the old one is dropped on activation.

use crate::config::WebManifestConfig;
use crate::types::ImageRef;
use serde::Serialize;
use sha2::{Digest, Sha256};

pub const MANIFEST_FILE: &str = "manifest.webmanifest";
pub const SERVICE_WORKER_FILE: &str = "sw.js";

const SW_TEMPLATE: &str = include_str!("../static/sw.js");
const CACHE_PREFIX: &str = "folio-";
const CACHE_HASH_LEN: usize = 12;

/// Inline script that registers the service worker after page load.
pub const REGISTRATION_SCRIPT: &str = "if ('serviceWorker' in navigator) { window.addEventListener('load', function () { navigator.serviceWorker.register('/sw.js'); }); }";

#[derive(Debug, Serialize)]
struct WebManifest<'a> {
    name: &'a str,
    short_name: &'a str,
    start_url: &'a str,
    background_color: &'a str,
    theme_color: &'a str,
    display: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    icons: Vec<ManifestIcon<'a>>,
}

#[derive(Debug, Serialize)]
struct ManifestIcon<'a> {
    src: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sizes: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    mime: Option<&'static str>,
}

/// Render `manifest.webmanifest`.
pub fn web_manifest_json(
    config: &WebManifestConfig,
    icon: Option<&ImageRef>,
) -> Result<String, serde_json::Error> {
    let icons = icon
        .map(|i| ManifestIcon {
            src: &i.url,
            sizes: i.width.zip(i.height).map(|(w, h)| format!("{w}x{h}")),
            mime: mime_for(&i.url),
        })
        .into_iter()
        .collect();

    let manifest = WebManifest {
        name: &config.name,
        short_name: &config.short_name,
        start_url: &config.start_url,
        background_color: &config.background_color,
        theme_color: &config.theme_color,
        display: &config.display,
        icons,
    };
    serde_json::to_string_pretty(&manifest)
}

fn mime_for(url: &str) -> Option<&'static str> {
    let ext = url.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "svg" => Some("image/svg+xml"),
        "ico" => Some("image/x-icon"),
        _ => None,
    }
}

/// Cache name for a set of generated pages, given as `(url, content)` pairs.
///
/// Order-independent: pages are sorted by URL before hashing.
pub fn cache_name<'a, I>(pages: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut pages: Vec<(&str, &str)> = pages.into_iter().collect();
    pages.sort_by(|a, b| a.0.cmp(b.0));

    let mut hasher = Sha256::new();
    for (url, content) in pages {
        hasher.update(url.as_bytes());
        hasher.update(b"\0");
        hasher.update(content.as_bytes());
        hasher.update(b"\0");
    }
    let digest = format!("{:x}", hasher.finalize());
    format!("{CACHE_PREFIX}{}", &digest[..CACHE_HASH_LEN])
}

/// Render `sw.js` for the given cache name and pre-cache list.
pub fn service_worker(cache_name: &str, precache: &[String]) -> Result<String, serde_json::Error> {
    let list = serde_json::to_string(precache)?;
    Ok(SW_TEMPLATE
        .replace("__CACHE_NAME__", cache_name)
        .replace("__PRECACHE__", &list))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn icon(url: &str, dims: Option<(u32, u32)>) -> ImageRef {
        ImageRef {
            url: url.to_string(),
            source: format!("assets{url}"),
            width: dims.map(|d| d.0),
            height: dims.map(|d| d.1),
        }
    }

    #[test]
    fn manifest_has_configured_fields() {
        let config = WebManifestConfig::default();
        let json = web_manifest_json(&config, None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "Personal Blog");
        assert_eq!(value["short_name"], "Blog");
        assert_eq!(value["start_url"], "/");
        assert_eq!(value["theme_color"], "#663399");
        assert_eq!(value["display"], "minimal-ui");
        assert!(value.get("icons").is_none());
    }

    #[test]
    fn manifest_icon_with_sizes_and_type() {
        let config = WebManifestConfig::default();
        let i = icon("/assets/favicon.png", Some((512, 512)));
        let json = web_manifest_json(&config, Some(&i)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["icons"][0]["src"], "/assets/favicon.png");
        assert_eq!(value["icons"][0]["sizes"], "512x512");
        assert_eq!(value["icons"][0]["type"], "image/png");
    }

    #[test]
    fn manifest_icon_without_dimensions_omits_sizes() {
        let config = WebManifestConfig::default();
        let i = icon("/assets/icon.weird", None);
        let json = web_manifest_json(&config, Some(&i)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["icons"][0].get("sizes").is_none());
        assert!(value["icons"][0].get("type").is_none());
    }

    #[test]
    fn cache_name_is_stable_and_prefixed() {
        let a = cache_name([("/", "<p>home</p>"), ("/a/", "<p>a</p>")]);
        let b = cache_name([("/a/", "<p>a</p>"), ("/", "<p>home</p>")]);
        assert_eq!(a, b);
        assert!(a.starts_with("folio-"));
        assert_eq!(a.len(), "folio-".len() + 12);
    }

    #[test]
    fn cache_name_changes_with_content() {
        let a = cache_name([("/", "<p>home</p>")]);
        let b = cache_name([("/", "<p>home!</p>")]);
        let c = cache_name([("/other/", "<p>home</p>")]);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn service_worker_fills_template() {
        let sw = service_worker("folio-abc", &["/".to_string(), "/a/".to_string()]).unwrap();
        assert!(sw.contains(r#"const CACHE_NAME = "folio-abc";"#));
        assert!(sw.contains(r#"const PRECACHE = ["/","/a/"];"#));
        assert!(!sw.contains("__"));
    }

    #[test]
    fn registration_script_registers_root_worker() {
        assert!(REGISTRATION_SCRIPT.contains("navigator.serviceWorker.register('/sw.js')"));
    }
}
