//! Related-post selection.
//!
//! A post is related to another when the two share at least one tag. The
//! selector is pure: it only looks at the posts it is given, so the generate
//! stage can call it once per post page without touching the filesystem.

use crate::types::Post;

/// Default number of related posts shown under an article.
pub const DEFAULT_LIMIT: usize = 3;

/// Pick up to `limit` posts sharing a tag with `current`.
///
/// - `current` itself is never returned (matched by slug)
/// - a post with no tags has no related posts
/// - results are newest first; posts with equal dates keep their input order
pub fn related_posts<'a>(current: &Post, all: &'a [Post], limit: usize) -> Vec<&'a Post> {
    if current.tags.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut related: Vec<&Post> = all
        .iter()
        .filter(|p| p.slug != current.slug)
        .filter(|p| p.tags.iter().any(|t| current.tags.contains(t)))
        .collect();

    related.sort_by(|a, b| b.date.cmp(&a.date));
    related.truncate(limit);
    related
}
