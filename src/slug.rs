//! Names, slugs and URL-safe identifiers.
//!
//! Three conventions meet here:
//!
//! - **Entry names** (`NNN-name`): pages use an optional numeric prefix for
//!   navigation order. `010-about` → number 10, slug `about`, link title `about`.
//! - **Post slugs**: derived from the post's path inside the blog directory.
//!   `hello-world/index.md` and `hello-world.md` both become `/hello-world/`.
//! - **Tag slugs**: lodash-style kebab case, so `TypeScript` links to
//!   `/tags/type-script/` and `Web Development` to `/tags/web-development/`.

use deunicode::deunicode;
use std::path::{Component, Path};

/// Result of parsing a numbered entry name like `020-My-Notes`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    /// Number prefix if present (e.g., `20` from `020-My-Notes`)
    pub number: Option<u32>,
    /// Raw name part after `NNN-`, dashes preserved. Empty if number-only.
    /// For unnumbered entries, this is the full input.
    pub name: String,
    /// Display title: name with dashes converted to spaces.
    pub display_title: String,
}

/// Parse an entry name following the `NNN-name` convention.
///
/// - `"010-about"` → number=Some(10), name="about", display_title="about"
/// - `"020-who-am-i"` → number=Some(20), name="who-am-i", display_title="who am i"
/// - `"001"` → number=Some(1), name="", display_title=""
/// - `"uses"` → number=None, name="uses", display_title="uses"
pub fn parse_entry_name(name: &str) -> ParsedName {
    if let Some((prefix, raw)) = name.split_once('-')
        && let Ok(num) = prefix.parse::<u32>()
    {
        return ParsedName {
            number: Some(num),
            name: raw.to_string(),
            display_title: raw.replace('-', " "),
        };
    }
    if let Ok(num) = name.parse::<u32>() {
        return ParsedName {
            number: Some(num),
            name: String::new(),
            display_title: String::new(),
        };
    }
    ParsedName {
        number: None,
        name: name.to_string(),
        display_title: name.replace('-', " "),
    }
}

/// Derive a post slug from its path relative to the blog directory.
///
/// `index.md` files take their directory's path; other files use their stem.
/// Returns `None` for a bare `index.md` at the blog root, which has no name.
pub fn post_slug(relative: &Path) -> Option<String> {
    let mut parts: Vec<String> = relative
        .parent()
        .into_iter()
        .flat_map(|p| p.components())
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    let stem = relative.file_stem()?.to_string_lossy();
    if stem != "index" {
        parts.push(stem.into_owned());
    }
    if parts.is_empty() {
        return None;
    }
    Some(format!("/{}/", parts.join("/")))
}

/// Convert text to kebab case the way lodash's `kebabCase` does.
///
/// Words are split on non-alphanumeric characters and on case changes
/// (`fooBar`, `XMLHttp`), lowercased, and joined with `-`. Non-ASCII letters
/// are transliterated first.
pub fn kebab_case(text: &str) -> String {
    split_words(&deunicode(text)).join("-")
}

fn split_words(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            // `fooBar` → foo|Bar, `XMLHttp` → XML|Http, `es2015` → es|2015
            let case_change = c.is_ascii_uppercase()
                && (prev.is_ascii_lowercase() || (prev.is_ascii_uppercase() && next_is_lower));
            let digit_change = c.is_ascii_digit() != prev.is_ascii_digit();
            if case_change || digit_change {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c.to_ascii_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Built-in contact page.
pub const CONTACT_URL: &str = "/contact/";
/// Tag listing pages live below this prefix.
pub const TAGS_PREFIX: &str = "/tags/";

/// URL of the listing page for a tag, or `None` when the tag has no
/// letters or digits to build one from.
pub fn tag_url(tag: &str) -> Option<String> {
    let slug = kebab_case(tag);
    (!slug.is_empty()).then(|| format!("{TAGS_PREFIX}{slug}/"))
}
