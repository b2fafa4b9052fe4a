// src/extract/book.rs
// =============================================================================
// Product page extractor for books.toscrape.com.
//
// Most fields live in the "Product Information" table, one <tr> per field
// with a <th> label and a <td> value. `lookup` finds a row by its label text,
// the rest is a handful of CSS selectors.
// =============================================================================

use super::{Extractor, ProductRecord};
use crate::error::ExtractionError;
use crate::fetch::Page;
use crate::html::{element_text, resolve_url, selector};
use regex::Regex;
use scraper::Html;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, Default)]
pub struct BookExtractor;

impl Extractor for BookExtractor {
    fn extract(&self, page: &Page) -> Result<ProductRecord, ExtractionError> {
        let document = page.document();

        let title = first_text(&document, "div.product_main h1")
            .ok_or_else(|| not_found("title"))?;
        let universal_product_code = lookup(&document, "UPC")?;
        let price_including_tax = parse_price(
            "Price (incl. tax)",
            &lookup(&document, "Price (incl. tax)")?,
        )?;
        let price_excluding_tax = parse_price(
            "Price (excl. tax)",
            &lookup(&document, "Price (excl. tax)")?,
        )?;
        let number_available = parse_available(&lookup(&document, "Availability")?);

        // A handful of books have no description block at all
        let product_description =
            first_text(&document, "#product_description ~ p").unwrap_or_default();

        let category = document
            .select(&selector("ul.breadcrumb li"))
            .nth(2)
            .map(element_text)
            .ok_or_else(|| not_found("category"))?;

        let image_url = document
            .select(&selector("div.item img"))
            .next()
            .and_then(|img| img.value().attr("src"))
            .and_then(|src| resolve_url(&page.url, src))
            .map(String::from);

        Ok(ProductRecord {
            product_page_url: page.url.to_string(),
            universal_product_code,
            title,
            price_including_tax,
            price_excluding_tax,
            number_available,
            product_description,
            category,
            review_rating: parse_rating(&document),
            image_url,
        })
    }
}

/// Text of the information table cell labelled `label`.
pub fn lookup(document: &Html, label: &str) -> Result<String, ExtractionError> {
    let header = selector("th");
    let cell = selector("td");

    document
        .select(&selector("table.table-striped tr"))
        .find(|row| {
            row.select(&header)
                .next()
                .is_some_and(|th| element_text(th) == label)
        })
        .and_then(|row| row.select(&cell).next())
        .map(element_text)
        .ok_or_else(|| not_found(label))
}

fn first_text(document: &Html, css: &str) -> Option<String> {
    document.select(&selector(css)).next().map(element_text)
}

fn not_found(field: &str) -> ExtractionError {
    ExtractionError::FieldNotFound {
        field: field.to_string(),
    }
}

// "£51.77" -> 51.77. Anything before the first digit is a currency sign,
// possibly mangled into several characters by a wrong server charset.
fn parse_price(field: &str, raw: &str) -> Result<f64, ExtractionError> {
    raw.trim_start_matches(|c: char| !c.is_ascii_digit())
        .trim()
        .parse::<f64>()
        .map_err(|_| ExtractionError::InvalidValue {
            field: field.to_string(),
            value: raw.to_string(),
        })
}

// "In stock (22 available)" -> Some(22)
fn parse_available(raw: &str) -> Option<u32> {
    static AVAILABLE: OnceLock<Regex> = OnceLock::new();
    let re = AVAILABLE.get_or_init(|| {
        Regex::new(r"\((\d+)\s+available\)").expect("availability regex is valid")
    });

    re.captures(raw)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

// <p class="star-rating Three"> -> 3
// Missing tag, missing class and "Zero" all mean 0.
fn parse_rating(document: &Html) -> u8 {
    document
        .select(&selector("p.star-rating"))
        .next()
        .and_then(|p| p.value().classes().find(|class| *class != "star-rating"))
        .map(|class| match class.to_ascii_lowercase().as_str() {
            "one" => 1,
            "two" => 2,
            "three" => 3,
            "four" => 4,
            "five" => 5,
            _ => 0,
        })
        .unwrap_or(0)
}
