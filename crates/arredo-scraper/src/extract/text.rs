//! Descriptive text extraction: product description and concept copy.

use crate::page::PageSession;

use super::{non_empty, run_chain, strip_markup, Found};

/// Separator between concatenated description paragraphs.
const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Product description from the content container's paragraphs.
pub fn product_description(page: &PageSession) -> Option<Found<String>> {
    let text_component = || joined_paragraphs(page, ".cmp-productcontents .cmp-text p");
    let any_paragraph = || joined_paragraphs(page, ".cmp-productcontents p");
    let strategies: [(&'static str, &dyn Fn() -> Option<String>); 2] = [
        ("productcontents-text", &text_component),
        ("productcontents-paragraphs", &any_paragraph),
    ];
    run_chain("product_description", &strategies)
}

/// Concept-and-design copy from the page metadata.
pub fn concept_and_design(page: &PageSession) -> Option<Found<String>> {
    let meta_description = || meta_content(page, "meta[name=\"description\"]");
    let og_description = || meta_content(page, "meta[property=\"og:description\"]");
    let strategies: [(&'static str, &dyn Fn() -> Option<String>); 2] = [
        ("meta-description", &meta_description),
        ("og-description", &og_description),
    ];
    run_chain("concept_and_design", &strategies)
}

fn joined_paragraphs(page: &PageSession, css: &str) -> Option<String> {
    let paragraphs: Vec<String> = page
        .find_all(css)
        .into_iter()
        .map(|node| node.text().to_owned())
        .filter(|text| !text.is_empty())
        .collect();
    if paragraphs.is_empty() {
        None
    } else {
        Some(paragraphs.join(PARAGRAPH_SEPARATOR))
    }
}

fn meta_content(page: &PageSession, css: &str) -> Option<String> {
    page.find_first(css)
        .and_then(|node| node.attr("content").map(strip_markup))
        .and_then(non_empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(html: &str) -> PageSession {
        PageSession::offline("https://example.com/ww/en/products/chair.html", html.to_owned())
    }

    #[test]
    fn description_concatenates_paragraphs_with_single_separator() {
        let page = page(
            r#"<div class="cmp-productcontents"><div class="cmp-text">
                <p>First paragraph.</p>
                <p>Second paragraph.</p>
            </div></div>"#,
        );
        let found = product_description(&page).unwrap();
        assert_eq!(found.strategy, "productcontents-text");
        assert_eq!(found.value, "First paragraph.\n\nSecond paragraph.");
    }

    #[test]
    fn description_falls_back_to_bare_paragraphs() {
        let page = page(r#"<div class="cmp-productcontents"><p>Only paragraph.</p></div>"#);
        let found = product_description(&page).unwrap();
        assert_eq!(found.strategy, "productcontents-paragraphs");
        assert_eq!(found.value, "Only paragraph.");
    }

    #[test]
    fn concept_reads_meta_description() {
        let page = page(r#"<meta name="description" content="Steel &amp; leather frame">"#);
        let found = concept_and_design(&page).unwrap();
        assert_eq!(found.strategy, "meta-description");
        assert_eq!(found.value, "Steel & leather frame");
    }

    #[test]
    fn concept_falls_back_to_og_description() {
        let page = page(r#"<meta property="og:description" content="A sculptural sofa">"#);
        let found = concept_and_design(&page).unwrap();
        assert_eq!(found.strategy, "og-description");
        assert_eq!(found.value, "A sculptural sofa");
    }

    #[test]
    fn empty_meta_content_is_a_miss() {
        let page = page(r#"<meta name="description" content="  ">"#);
        assert!(concept_and_design(&page).is_none());
    }
}
