//! RSS 2.0 feed generation.
//!
//! One item per post, newest first, each carrying the full rendered HTML as
//! `content:encoded`. Links are absolute, so the feed needs `site.site_url`;
//! without it the generate stage skips the feed with a warning.

use crate::scan::Manifest;
use crate::types::Post;
use rss::validation::{Validate, ValidationError};
use rss::{CategoryBuilder, Channel, ChannelBuilder, GuidBuilder, Item, ItemBuilder};
use std::collections::BTreeMap;

const CONTENT_NAMESPACE: &str = "http://purl.org/rss/1.0/modules/content/";

/// Build and validate the feed channel. Returns `None` when the site has no
/// canonical URL to build item links from.
pub fn build_channel(manifest: &Manifest) -> Result<Option<Channel>, ValidationError> {
    let config = &manifest.config;
    let Some(site_link) = config.absolute_url("/") else {
        return Ok(None);
    };

    let items: Vec<Item> = manifest
        .posts
        .iter()
        .filter_map(|post| post_to_item(post, manifest))
        .collect();

    let mut namespaces = BTreeMap::new();
    namespaces.insert("content".to_string(), CONTENT_NAMESPACE.to_string());

    let channel = ChannelBuilder::default()
        .title(config.site.title.clone())
        .link(site_link)
        .description(config.site.description.clone())
        .language(Some(config.site.language.clone()))
        .generator(Some(format!("folio {}", env!("CARGO_PKG_VERSION"))))
        .namespaces(namespaces)
        .items(items)
        .build();

    channel.validate()?;
    Ok(Some(channel))
}

pub fn render_feed(manifest: &Manifest) -> Result<Option<String>, ValidationError> {
    Ok(build_channel(manifest)?.map(|channel| channel.to_string()))
}

fn post_to_item(post: &Post, manifest: &Manifest) -> Option<Item> {
    let link = manifest.config.absolute_url(&post.slug)?;
    let categories = post
        .tags
        .iter()
        .map(|t| CategoryBuilder::default().name(t.clone()).build())
        .collect::<Vec<_>>();

    Some(
        ItemBuilder::default()
            .title(Some(post.title.clone()))
            .link(Some(link.clone()))
            .guid(Some(GuidBuilder::default().permalink(true).value(link).build()))
            .description(Some(post.summary().to_string()))
            .pub_date(Some(post.date.and_utc().to_rfc2822()))
            .categories(categories)
            .content(Some(post.html.clone()))
            .build(),
    )
}
