// src/test_support.rs
// =============================================================================
// HTML fixtures shared by the unit tests.
//
// The markup mirrors the parts of books.toscrape.com the crawler reads:
// the side category menu, the product_pod list entries with a "next" pager,
// and the product page with its information table.
// =============================================================================

/// Home page with a side menu listing `categories` as (name, href) pairs.
pub fn home_page(categories: &[(&str, &str)]) -> String {
    let items: String = categories
        .iter()
        .map(|(name, href)| {
            format!("<li>\n<a href=\"{href}\">\n                            {name}\n                        </a>\n</li>\n")
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en-us">
<head><title>All products | Books to Scrape</title></head>
<body>
<div class="side_categories">
  <ul class="nav nav-list">
    <li>
      <a href="catalogue/category/books_1/index.html">Books</a>
      <ul>
{items}      </ul>
    </li>
  </ul>
</div>
</body>
</html>"#
    )
}

/// Category list page linking to `product_hrefs`, with an optional pager link.
pub fn list_page(product_hrefs: &[String], next_href: Option<&str>) -> String {
    let articles: String = product_hrefs
        .iter()
        .map(|href| {
            format!(
                r#"<li class="col-xs-6 col-sm-4 col-md-3 col-lg-3">
<article class="product_pod">
  <div class="image_container"><a href="{href}"><img src="../../media/thumb.jpg" alt="x" class="thumbnail"></a></div>
  <p class="star-rating Three"></p>
  <h3><a href="{href}" title="A book">A book</a></h3>
</article>
</li>
"#
            )
        })
        .collect();

    let pager = match next_href {
        Some(href) => format!(
            r#"<ul class="pager"><li class="current">Page</li><li class="next"><a href="{href}">next</a></li></ul>"#
        ),
        None => r#"<ul class="pager"><li class="current">Page</li></ul>"#.to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html><body>
<section>
<ol class="row">
{articles}</ol>
{pager}
</section>
</body></html>"#
    )
}

/// Product page in books.toscrape.com layout.
pub fn book_page(title: &str, upc: &str, rating_class: &str, category: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en-us">
<body>
<ul class="breadcrumb">
    <li><a href="../../index.html">Home</a></li>
    <li><a href="../category/books_1/index.html">Books</a></li>
    <li>
        <a href="../category/books/poetry_23/index.html">{category}</a>
    </li>
    <li class="active">{title}</li>
</ul>
<article class="product_page">
<div class="row">
    <div class="col-sm-6">
        <div id="product_gallery" class="carousel">
            <div class="thumbnail">
                <div class="carousel-inner">
                    <div class="item active">
                        <img src="../../media/cache/fe/72/fe72f0532301ec28892ae79a629a293c.jpg" alt="{title}" />
                    </div>
                </div>
            </div>
        </div>
    </div>
    <div class="col-sm-6 product_main">
        <h1>{title}</h1>
        <p class="price_color">£51.77</p>
        <p class="star-rating {rating_class}">
            <i class="icon-star"></i>
        </p>
    </div>
</div>
<div id="product_description" class="sub-header">
    <h2>Product Description</h2>
</div>
<p>It's hard to imagine a world without {title}.</p>
<div class="sub-header"><h2>Product Information</h2></div>
<table class="table table-striped">
    <tr><th>UPC</th><td>{upc}</td></tr>
    <tr><th>Product Type</th><td>Books</td></tr>
    <tr><th>Price (excl. tax)</th><td>£51.77</td></tr>
    <tr><th>Price (incl. tax)</th><td>£51.77</td></tr>
    <tr><th>Tax</th><td>£0.00</td></tr>
    <tr><th>Availability</th><td>In stock (22 available)</td></tr>
    <tr><th>Number of reviews</th><td>0</td></tr>
</table>
</article>
</body>
</html>"#
    )
}
