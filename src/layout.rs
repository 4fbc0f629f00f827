//! Layout decisions for the post page.
//!
//! Kept apart from the maud templates so the rules can be tested on plain
//! data: which layout variant a post uses, whether its author block appears,
//! and how its tags link out.

use crate::config::SiteMetadata;
use crate::slug;
use crate::types::{ImageRef, Post};

/// Where the post details place the cover relative to the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImagePosition {
    Left,
    Center,
}

impl ImagePosition {
    pub fn class(self) -> &'static str {
        match self {
            ImagePosition::Left => "image-left",
            ImagePosition::Center => "image-center",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostLayout {
    pub centered: bool,
    pub image_position: ImagePosition,
}

/// Posts without a cover use the centered variant.
pub fn post_layout(post: &Post) -> PostLayout {
    match post.cover {
        Some(_) => PostLayout {
            centered: false,
            image_position: ImagePosition::Left,
        },
        None => PostLayout {
            centered: true,
            image_position: ImagePosition::Center,
        },
    }
}

/// Everything the author block shows. Only built when nothing is missing.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorBlock<'a> {
    pub name: &'a str,
    pub avatar: &'a ImageRef,
    pub about: &'a str,
    pub link: Option<String>,
}

/// The author block for a post, or `None` when the post has no author or the
/// site has no avatar. A partial block is never rendered.
pub fn author_block<'a>(
    post: &'a Post,
    avatar: Option<&'a ImageRef>,
    site: &'a SiteMetadata,
) -> Option<AuthorBlock<'a>> {
    let name = post.author.as_deref().filter(|a| !a.trim().is_empty())?;
    let avatar = avatar?;
    Some(AuthorBlock {
        name,
        avatar,
        about: &site.about,
        link: author_link(site),
    })
}

fn author_link(site: &SiteMetadata) -> Option<String> {
    if let Some(url) = site.author_url.as_deref().filter(|u| !u.is_empty()) {
        return Some(url.to_string());
    }
    site.twitter
        .as_deref()
        .map(|h| h.trim_start_matches('@'))
        .filter(|h| !h.is_empty())
        .map(|h| format!("https://twitter.com/{h}"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLink {
    pub text: String,
    pub url: String,
}

/// Links for a post's tags. A tag with no URL has no page to link to and is
/// left out.
pub fn tag_links(tags: &[String]) -> Vec<TagLink> {
    tags.iter()
        .filter_map(|t| {
            Some(TagLink {
                text: format!("#{t}"),
                url: slug::tag_url(t)?,
            })
        })
        .collect()
}
