// src/crawl/pagination.rs
// =============================================================================
// Walks a category's list pages and collects every product link.
//
// How it works:
// 1. Fetch the category's first list page
// 2. Collect the product links on it, in page order
// 3. If the page has a "next" pager link, resolve it against the page we are
//    on (not the site root) and repeat from step 1
// 4. Stop when there is no "next" link
//
// A list page with no product entries at all means the selectors no longer
// match the site, so that is reported as an error instead of an empty list.
//
// The site's "next" links are trusted, but the walk still stops on a page it
// has already seen or after `max_pages` pages.
// =============================================================================

use crate::error::PaginationError;
use crate::fetch::PageFetcher;
use crate::html::{collect_hrefs, selector};
use scraper::Html;
use std::collections::HashSet;
use tracing::{debug, warn};
use url::Url;

const PRODUCT_ANCHORS: &str = "article.product_pod h3 a[href]";
const NEXT_ANCHOR: &str = "li.next a[href]";

/// What one list page contributes to the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPage {
    pub products: Vec<Url>,
    pub next: Option<Url>,
}

pub fn parse_list_page(html: &str, page_url: &Url) -> ListPage {
    let document = Html::parse_document(html);

    let products = collect_hrefs(&document, &selector(PRODUCT_ANCHORS), page_url);
    let next = collect_hrefs(&document, &selector(NEXT_ANCHOR), page_url)
        .into_iter()
        .next();

    ListPage { products, next }
}

/// Returns the product links of every list page reachable from `category_url`.
pub async fn collect_links(
    fetcher: &PageFetcher,
    category_url: &Url,
    max_pages: usize,
) -> Result<Vec<Url>, PaginationError> {
    let mut links = Vec::new();
    let mut visited = HashSet::new();
    let mut current = Some(category_url.clone());
    let mut page_number = 0;

    while let Some(url) = current.take() {
        if !visited.insert(url.clone()) {
            warn!(%url, "pagination loops back to a visited page, stopping");
            break;
        }
        if page_number >= max_pages {
            warn!(%category_url, max_pages, "page limit reached, stopping pagination");
            break;
        }
        page_number += 1;

        let page = fetcher.fetch(&url).await?;
        let list = parse_list_page(&page.body, &page.url);

        if list.products.is_empty() {
            return Err(PaginationError::NoEntriesFound {
                url: url.to_string(),
            });
        }

        println!("   Page {} done, {} books found", page_number, list.products.len());
        debug!(%url, entries = list.products.len(), next = ?list.next.as_ref().map(Url::as_str));

        links.extend(list.products);
        current = list.next;
    }

    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::list_page;
    use std::time::Duration;

    fn fetcher() -> PageFetcher {
        PageFetcher::new(Duration::from_secs(5), "test-agent").unwrap()
    }

    fn hrefs(prefix: &str, count: usize) -> Vec<String> {
        (0..count)
            .map(|i| format!("../../../{prefix}-{i}_{i}/index.html"))
            .collect()
    }

    #[test]
    fn test_parse_list_page_resolves_against_page() {
        let page_url =
            Url::parse("https://books.toscrape.com/catalogue/category/books/travel_2/index.html")
                .unwrap();
        let html = list_page(&hrefs("book", 2), Some("page-2.html"));

        let list = parse_list_page(&html, &page_url);

        assert_eq!(
            list.products[0].as_str(),
            "https://books.toscrape.com/catalogue/book-0_0/index.html"
        );
        assert_eq!(list.products.len(), 2);
        assert_eq!(
            list.next.unwrap().as_str(),
            "https://books.toscrape.com/catalogue/category/books/travel_2/page-2.html"
        );
    }

    #[test]
    fn test_last_page_has_no_next() {
        let page_url = Url::parse("https://books.toscrape.com/a/b/c/index.html").unwrap();
        let list = parse_list_page(&list_page(&hrefs("book", 1), None), &page_url);
        assert_eq!(list.next, None);
    }

    #[tokio::test]
    async fn test_follows_next_chain() {
        let mut server = mockito::Server::new_async().await;
        let base = "/catalogue/category/books/travel_2";
        let pages = [
            ("index.html", hrefs("a", 20), Some("page-2.html")),
            ("page-2.html", hrefs("b", 20), Some("page-3.html")),
            ("page-3.html", hrefs("c", 7), None),
        ];
        for (name, products, next) in &pages {
            server
                .mock("GET", format!("{base}/{name}").as_str())
                .with_status(200)
                .with_body(list_page(products, *next))
                .expect(1)
                .create_async()
                .await;
        }

        let start = Url::parse(&format!("{}{base}/index.html", server.url())).unwrap();
        let links = collect_links(&fetcher(), &start, 100).await.unwrap();

        assert_eq!(links.len(), 47);
        let unique: HashSet<_> = links.iter().collect();
        assert_eq!(unique.len(), 47);
        // page order, then in-page order
        assert!(links[0].path().ends_with("/catalogue/a-0_0/index.html"));
        assert!(links[20].path().ends_with("/catalogue/b-0_0/index.html"));
        assert!(links[46].path().ends_with("/catalogue/c-6_6/index.html"));
    }

    #[tokio::test]
    async fn test_empty_first_page_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/empty/index.html")
            .with_status(200)
            .with_body(list_page(&[], None))
            .create_async()
            .await;

        let start = Url::parse(&format!("{}/empty/index.html", server.url())).unwrap();
        let err = collect_links(&fetcher(), &start, 100).await.unwrap_err();

        assert!(matches!(err, PaginationError::NoEntriesFound { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_category_is_fetch_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/gone/index.html")
            .with_status(404)
            .create_async()
            .await;

        let start = Url::parse(&format!("{}/gone/index.html", server.url())).unwrap();
        let err = collect_links(&fetcher(), &start, 100).await.unwrap_err();

        assert!(matches!(err, PaginationError::Fetch(_)));
    }

    #[tokio::test]
    async fn test_next_cycle_stops_walk() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/loop/index.html")
            .with_status(200)
            .with_body(list_page(&hrefs("a", 2), Some("page-2.html")))
            .expect(1)
            .create_async()
            .await;
        server
            .mock("GET", "/loop/page-2.html")
            .with_status(200)
            .with_body(list_page(&hrefs("b", 2), Some("index.html")))
            .expect(1)
            .create_async()
            .await;

        let start = Url::parse(&format!("{}/loop/index.html", server.url())).unwrap();
        let links = collect_links(&fetcher(), &start, 100).await.unwrap();

        assert_eq!(links.len(), 4);
    }

    #[tokio::test]
    async fn test_page_cap() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/cap/index.html")
            .with_status(200)
            .with_body(list_page(&hrefs("a", 3), Some("page-2.html")))
            .create_async()
            .await;
        let second = server
            .mock("GET", "/cap/page-2.html")
            .with_status(200)
            .with_body(list_page(&hrefs("b", 3), None))
            .expect(0)
            .create_async()
            .await;

        let start = Url::parse(&format!("{}/cap/index.html", server.url())).unwrap();
        let links = collect_links(&fetcher(), &start, 1).await.unwrap();

        assert_eq!(links.len(), 3);
        second.assert_async().await;
    }
}
