// src/crawl/discovery.rs
// =============================================================================
// Reads the category list from the site's side menu.
//
// The home page carries a nested list:
//
//   div.side_categories > ul > li ("Books") > ul > li > a ("Travel")
//                                                 > li > a ("Mystery") ...
//
// The order of that menu is the order categories are crawled, reported and
// written to disk, so it is kept exactly as it appears in the markup.
// =============================================================================

use crate::error::DiscoveryError;
use crate::fetch::PageFetcher;
use crate::html::{element_text, resolve_url, selector};
use scraper::Html;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRef {
    pub name: String,
    pub url: Url,
}

pub async fn discover_categories(
    fetcher: &PageFetcher,
    root_url: &Url,
) -> Result<Vec<CategoryRef>, DiscoveryError> {
    let page = fetcher.fetch(root_url).await?;
    parse_categories(&page.body, &page.url)
}

pub fn parse_categories(html: &str, page_url: &Url) -> Result<Vec<CategoryRef>, DiscoveryError> {
    let document = Html::parse_document(html);

    let nav = document
        .select(&selector("div.side_categories"))
        .next()
        .ok_or_else(|| DiscoveryError::NavigationNotFound {
            url: page_url.to_string(),
        })?;

    let categories = nav
        .select(&selector("ul li ul li a[href]"))
        .filter_map(|anchor| {
            let url = resolve_url(page_url, anchor.value().attr("href")?)?;
            Some(CategoryRef {
                name: element_text(anchor),
                url,
            })
        })
        .collect();

    Ok(categories)
}
