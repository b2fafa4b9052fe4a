// src/html.rs
// =============================================================================
// Small helpers on top of `scraper` and `url` shared by the list page walker,
// the category menu parser and the product extractor.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// And the `url` crate to resolve relative hrefs ("../../media/x.jpg") against
// the page they were found on.
// =============================================================================

use scraper::{ElementRef, Html, Selector};
use url::Url;

// Builds a selector from a CSS string literal.
//
// Every selector in this crate is a constant written by us, so a parse
// failure is a programmer error and panicking is the right call.
pub fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid CSS selector '{css}': {e:?}"))
}

/// All text below `element`, with surrounding whitespace removed.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

// Resolves a possibly-relative href to an absolute URL
//
// Examples (base = "https://example.com/catalogue/page-1.html"):
//   "page-2.html"          -> https://example.com/catalogue/page-2.html
//   "../media/cover.jpg"   -> https://example.com/media/cover.jpg
//   "https://other.com"    -> https://other.com/
//   "#top", "mailto:..."   -> None
pub fn resolve_url(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    // join() handles both absolute and relative hrefs
    let url = base.join(href).ok()?;
    match url.scheme() {
        "http" | "https" => Some(url),
        _ => None,
    }
}

/// Resolved `href` of every element matched by `selector`, in document order.
pub fn collect_hrefs(document: &Html, selector: &Selector, base: &Url) -> Vec<Url> {
    document
        .select(selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_url(base, href))
        .collect()
}
