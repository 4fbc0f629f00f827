//! YAML frontmatter parsing.
//!
//! A content file may start with a block delimited by `---` lines:
//!
//! ```text
//! ---
//! title: Hello World
//! date: 2020-01-05
//! tags: [TypeScript, Angular]
//! cover: ./cover.jpg
//! ---
//! Body markdown...
//! ```
//!
//! Files without an opening `---` have empty frontmatter and the whole file is
//! the body.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("frontmatter block opened with --- but never closed")]
    Unterminated,
    #[error("invalid frontmatter YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unrecognized date '{0}' (expected YYYY-MM-DD, optionally with a time)")]
    InvalidDate(String),
}

/// Frontmatter fields understood by posts and pages.
///
/// Unknown keys are ignored so content written for other generators still
/// parses.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Frontmatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub author: Option<String>,
    pub cover: Option<String>,
    pub draft: bool,
    /// Pages only: `<title>` override.
    pub seo_title: Option<String>,
    /// Pages only: render social profile links below the content.
    pub social: bool,
}

impl Frontmatter {
    /// Tags with blanks removed; `None` and an empty list are the same thing.
    pub fn tags(&self) -> Vec<String> {
        self.tags
            .iter()
            .flatten()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Split a document into frontmatter and body, parsing the frontmatter.
pub fn parse(content: &str) -> Result<(Frontmatter, &str), FrontmatterError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let Some(rest) = strip_delimiter_line(content) else {
        return Ok((Frontmatter::default(), content));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            let frontmatter = if yaml.trim().is_empty() {
                Frontmatter::default()
            } else {
                serde_yaml::from_str(yaml)?
            };
            return Ok((frontmatter, body));
        }
        offset += line.len();
    }
    Err(FrontmatterError::Unterminated)
}

fn strip_delimiter_line(content: &str) -> Option<&str> {
    let rest = content.strip_prefix("---")?;
    rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))
}

/// Parse a frontmatter date.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM[:SS]`, `YYYY-MM-DDTHH:MM:SS[.f]`
/// and RFC 3339 with an offset (converted to its local wall-clock time).
pub fn parse_date(raw: &str) -> Result<NaiveDateTime, FrontmatterError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_local());
    }
    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| FrontmatterError::InvalidDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_frontmatter_and_body() {
        let doc = "---\ntitle: Hello World\ndate: 2020-01-05\ntags: [TypeScript, Angular]\n---\n# Body\n";
        let (fm, body) = parse(doc).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hello World"));
        assert_eq!(fm.date.as_deref(), Some("2020-01-05"));
        assert_eq!(fm.tags(), vec!["TypeScript", "Angular"]);
        assert_eq!(body, "# Body\n");
    }

    #[test]
    fn no_frontmatter_means_whole_body() {
        let doc = "Just text\n---\nmore";
        let (fm, body) = parse(doc).unwrap();
        assert_eq!(fm, Frontmatter::default());
        assert_eq!(body, doc);
    }

    #[test]
    fn crlf_line_endings() {
        let doc = "---\r\ntitle: Windows\r\n---\r\nBody";
        let (fm, body) = parse(doc).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Windows"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn byte_order_mark_is_skipped() {
        let doc = "\u{feff}---\ntitle: Bom\n---\n";
        let (fm, _) = parse(doc).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Bom"));
    }

    #[test]
    fn empty_block_is_default() {
        let (fm, body) = parse("---\n---\nBody").unwrap();
        assert_eq!(fm, Frontmatter::default());
        assert_eq!(body, "Body");
    }

    #[test]
    fn unterminated_block_is_error() {
        let result = parse("---\ntitle: Oops\nno closing line");
        assert!(matches!(result, Err(FrontmatterError::Unterminated)));
    }

    #[test]
    fn invalid_yaml_is_error() {
        let result = parse("---\ntitle: [unclosed\n---\n");
        assert!(matches!(result, Err(FrontmatterError::Yaml(_))));
    }

    #[test]
    fn null_tags_are_empty() {
        let (fm, _) = parse("---\ntags:\n---\n").unwrap();
        assert!(fm.tags().is_empty());
    }

    #[test]
    fn blank_tags_are_dropped() {
        let (fm, _) = parse("---\ntags: [\"a\", \" \", b]\n---\n").unwrap();
        assert_eq!(fm.tags(), vec!["a", "b"]);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let (fm, _) = parse("---\ntitle: X\nlayout: post\n---\n").unwrap();
        assert_eq!(fm.title.as_deref(), Some("X"));
    }

    #[test]
    fn draft_and_page_flags() {
        let (fm, _) = parse("---\ndraft: true\nsocial: true\nseo_title: About me\n---\n").unwrap();
        assert!(fm.draft);
        assert!(fm.social);
        assert_eq!(fm.seo_title.as_deref(), Some("About me"));
    }

    // =========================================================================
    // Dates
    // =========================================================================

    #[test]
    fn date_only() {
        let d = parse_date("2020-01-05").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2020, 1, 5));
        assert_eq!(d.hour(), 0);
    }

    #[test]
    fn date_with_time() {
        let d = parse_date("2020-01-05 14:30").unwrap();
        assert_eq!((d.hour(), d.minute()), (14, 30));
        let d = parse_date("2020-01-05T14:30:15").unwrap();
        assert_eq!(d.second(), 15);
    }

    #[test]
    fn rfc3339_keeps_wall_clock_time() {
        let d = parse_date("2020-01-05T23:10:00+02:00").unwrap();
        assert_eq!((d.day(), d.hour()), (5, 23));
    }

    #[test]
    fn invalid_date_is_error() {
        let result = parse_date("yesterday");
        assert!(matches!(result, Err(FrontmatterError::InvalidDate(_))));
    }
}
