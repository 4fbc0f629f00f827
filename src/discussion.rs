//! "Discuss this post" links.
//!
//! Each post ends with two search links, one on Twitter and one on Reddit,
//! that look up conversations mentioning the post title.

use urlencoding::encode;

const TWITTER_SEARCH: &str = "https://mobile.twitter.com/search";
const REDDIT_SEARCH: &str = "https://www.reddit.com/search/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscussionLinks {
    pub twitter: String,
    pub reddit: String,
}

/// Build both search URLs for a post title.
///
/// The title is percent-encoded as a whole, so reserved characters such as
/// `&`, `?` and `#` stay inside the `q` parameter.
pub fn discussion_links(title: &str) -> DiscussionLinks {
    let query = encode_uri_component(title);
    DiscussionLinks {
        twitter: format!("{TWITTER_SEARCH}?q={query}"),
        reddit: format!("{REDDIT_SEARCH}?q={query}"),
    }
}

/// Percent-encode like JavaScript's `encodeURIComponent`, which also leaves
/// `! ' ( ) *` unescaped.
fn encode_uri_component(text: &str) -> String {
    const KEPT: [(&str, &str); 5] = [
        ("%21", "!"),
        ("%27", "'"),
        ("%28", "("),
        ("%29", ")"),
        ("%2A", "*"),
    ];
    KEPT.iter()
        .fold(encode(text).into_owned(), |query, (escaped, raw)| {
            query.replace(escaped, raw)
        })
}
