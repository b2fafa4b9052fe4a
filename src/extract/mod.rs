// src/extract/mod.rs
// =============================================================================
// Turning a product page into a ProductRecord.
//
// The crawl engine only knows about the Extractor trait. The concrete
// BookExtractor understands the books.toscrape.com product page layout;
// pointing the crawler at a differently shaped catalogue means writing
// another Extractor, nothing else.
// =============================================================================

mod book;

pub use book::BookExtractor;

use crate::error::ExtractionError;
use crate::fetch::Page;
use serde::{Deserialize, Serialize};

/// One product, as written to the CSV files.
///
/// Field order here is the column order of the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub product_page_url: String,
    pub universal_product_code: String,
    pub title: String,
    pub price_including_tax: f64,
    pub price_excluding_tax: f64,
    pub number_available: Option<u32>,
    pub product_description: String,
    pub category: String,
    pub review_rating: u8,
    pub image_url: Option<String>,
}

/// Maps one fetched document to one record.
///
/// Implementations must not panic on unexpected markup: anything missing is
/// reported as an ExtractionError and the crawl moves on.
pub trait Extractor: Send + Sync {
    fn extract(&self, page: &Page) -> Result<ProductRecord, ExtractionError>;
}
