//! URL classification for the catalog's URL index.
//!
//! Pure and total: every string classifies, no I/O.

use regex::Regex;
use std::sync::OnceLock;

/// Path segment that marks a URL as belonging to the product section.
const PRODUCT_PATH_SEGMENT: &str = "/products/";

/// How a candidate URL relates to the product catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlClass {
    /// A scrapable product detail page.
    Product,
    /// A product-section listing page (`<slug>.<digits>.html`), not scrapable.
    Category,
    /// Outside the product section entirely.
    Irrelevant,
}

fn category_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Listing pages end in a purely numeric segment before the extension,
    // e.g. "armchairs.1001.html".
    RE.get_or_init(|| Regex::new(r"\.\d+\.html$").expect("valid regex"))
}

/// Classify a candidate URL from the site's URL index.
///
/// A URL is eligible only if it contains the product-section path segment.
/// Among eligible URLs, a final path component of the form
/// `<slug>.<digits>.html` marks a category listing; everything else is a
/// product page.
#[must_use]
pub fn classify_url(url: &str) -> UrlClass {
    if !url.contains(PRODUCT_PATH_SEGMENT) {
        return UrlClass::Irrelevant;
    }
    if category_suffix().is_match(url) {
        return UrlClass::Category;
    }
    UrlClass::Product
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_outside_product_section_are_irrelevant() {
        assert_eq!(
            classify_url("https://example.com/ww/en/stories/heritage.html"),
            UrlClass::Irrelevant
        );
        assert_eq!(classify_url("https://example.com/"), UrlClass::Irrelevant);
        assert_eq!(classify_url(""), UrlClass::Irrelevant);
    }

    #[test]
    fn numeric_suffix_is_a_category_page() {
        assert_eq!(
            classify_url("https://example.com/ww/en/products/foo.123.html"),
            UrlClass::Category
        );
    }

    #[test]
    fn plain_slug_is_a_product_page() {
        assert_eq!(
            classify_url("https://example.com/ww/en/products/foo-bar.html"),
            UrlClass::Product
        );
    }

    #[test]
    fn non_numeric_dotted_suffix_is_still_a_product() {
        // Only a purely numeric segment before the extension marks a listing.
        assert_eq!(
            classify_url("https://example.com/ww/en/products/foo.v2a.html"),
            UrlClass::Product
        );
    }

    #[test]
    fn classification_ignores_everything_after_a_numeric_interior_segment() {
        assert_eq!(
            classify_url("https://example.com/ww/en/products/foo.123.html?x=1"),
            UrlClass::Product,
            "query string moves the numeric segment away from the end"
        );
    }
}
