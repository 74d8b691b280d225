//! Product name and identifier extraction.

use crate::page::PageSession;

use super::{non_empty, run_chain, Found};

/// Product display name from the product hero block.
///
/// Deliberately a single-strategy chain: a product page without a hero name
/// is malformed, and the miss must surface as a required-field gap rather
/// than being papered over by a weaker locator.
pub fn product_name(page: &PageSession) -> Option<Found<String>> {
    let hero_title = || {
        page.find_first("h1.cmp-producthero__productName span")
            .and_then(|node| non_empty(node.text().to_owned()))
    };
    let strategies: [(&'static str, &dyn Fn() -> Option<String>); 1] =
        [("producthero-title", &hero_title)];
    run_chain("product_name", &strategies)
}

/// Product identifier from the configurator container, preserved verbatim.
///
/// The attribute value is trusted as-is: no trimming to digits, no length
/// validation, even though the catalog nominally uses fixed-length numeric
/// codes.
pub fn sku(page: &PageSession) -> Option<Found<String>> {
    let configurator_attr = || {
        page.find_first("div.product.product-configurator-aem")
            .and_then(|node| node.attr("data-product-sku").map(str::to_owned))
            .and_then(non_empty)
    };
    let form_attr = || {
        page.find_first("form[data-product-sku]")
            .and_then(|node| node.attr("data-product-sku").map(str::to_owned))
            .and_then(non_empty)
    };
    let strategies: [(&'static str, &dyn Fn() -> Option<String>); 2] = [
        ("configurator-attr", &configurator_attr),
        ("form-attr", &form_attr),
    ];
    run_chain("sku", &strategies)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(html: &str) -> PageSession {
        PageSession::offline("https://example.com/ww/en/products/chair.html", html.to_owned())
    }

    #[test]
    fn product_name_from_hero_title() {
        let page = page(
            r#"<h1 class="cmp-producthero__productName"><span> Grantorino </span></h1>"#,
        );
        let found = product_name(&page).unwrap();
        assert_eq!(found.value, "Grantorino");
        assert_eq!(found.strategy, "producthero-title");
    }

    #[test]
    fn product_name_has_no_fallback() {
        let page = page(r#"<form data-product-name="Grantorino"></form>"#);
        assert!(product_name(&page).is_none());
    }

    #[test]
    fn sku_is_preserved_verbatim() {
        let page = page(
            r#"<div class="product product-configurator-aem" data-product-sku="5572*hi"></div>"#,
        );
        let found = sku(&page).unwrap();
        assert_eq!(found.value, "5572*hi", "no stripping, no case change");
        assert_eq!(found.strategy, "configurator-attr");
    }

    #[test]
    fn sku_falls_back_to_form_attribute() {
        let page = page(r#"<form data-product-sku="5572001"></form>"#);
        let found = sku(&page).unwrap();
        assert_eq!(found.value, "5572001");
        assert_eq!(found.strategy, "form-attr");
    }

    #[test]
    fn empty_sku_attribute_is_a_miss() {
        let page = page(
            r#"<div class="product product-configurator-aem" data-product-sku=""></div>"#,
        );
        assert!(sku(&page).is_none());
    }
}
