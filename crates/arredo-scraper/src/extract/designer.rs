//! Designer name, biography, and portrait extraction.

use crate::page::PageSession;

use super::{non_empty, run_chain, Found};

/// Designer display name from the product hero block.
pub fn designer_name(page: &PageSession) -> Option<Found<String>> {
    let hero_designer = || {
        page.find_first("h3.cmp-producthero__productDesigner")
            .and_then(|node| non_empty(node.text().to_owned()))
    };
    let form_attr = || {
        page.find_first("form[data-product-designer]")
            .and_then(|node| node.attr("data-product-designer").map(str::to_owned))
            .and_then(non_empty)
    };
    let strategies: [(&'static str, &dyn Fn() -> Option<String>); 2] = [
        ("producthero-designer", &hero_designer),
        ("form-attr", &form_attr),
    ];
    run_chain("designer.name", &strategies)
}

/// Designer biography from the designer panel.
///
/// The panel is lazily loaded; the record builder reveals it before calling
/// this extractor.
pub fn designer_bio(page: &PageSession) -> Option<Found<String>> {
    let panel_text = || {
        page.find_all("div.text.paneltext p")
            .into_iter()
            .find_map(|node| non_empty(node.text().to_owned()))
    };
    let strategies: [(&'static str, &dyn Fn() -> Option<String>); 1] =
        [("paneltext", &panel_text)];
    run_chain("designer.bio", &strategies)
}

/// Designer portrait URL.
///
/// Primary strategy looks for images whose URL carries a designer folder
/// token; the secondary strategy scans every image on the page and matches
/// `designer` or a normalized form of the designer's name against the URL
/// and alt text.
pub fn designer_image(page: &PageSession, designer: Option<&str>) -> Option<Found<String>> {
    let src_token = || {
        const SELECTORS: &[&str] = &[
            "img[src*=\"tab-designer\"]",
            "img[data-src*=\"tab-designer\"]",
            "img[src*=\"designer\"]",
            "img[data-src*=\"designer\"]",
        ];
        SELECTORS.iter().find_map(|css| {
            page.find_first(css)
                .and_then(|node| node.first_attr(&["src", "data-src"]).map(str::to_owned))
                .and_then(non_empty)
                .map(|src| page.absolutize(&src))
        })
    };
    let name_scan = || {
        let name_token = designer.map(normalize_token).filter(|t| t.len() > 2);
        page.find_all("img").into_iter().find_map(|node| {
            let src = node.first_attr(&["src", "data-src"])?;
            let normalized_src = normalize_token(src);
            let normalized_alt = node.attr("alt").map(normalize_token).unwrap_or_default();
            let matches = normalized_src.contains("designer")
                || normalized_alt.contains("designer")
                || name_token.as_deref().is_some_and(|token| {
                    normalized_src.contains(token) || normalized_alt.contains(token)
                });
            if matches {
                Some(page.absolutize(src))
            } else {
                None
            }
        })
    };
    let strategies: [(&'static str, &dyn Fn() -> Option<String>); 2] = [
        ("designer-src-token", &src_token),
        ("name-token-scan", &name_scan),
    ];
    run_chain("designer.image", &strategies)
}

/// Lower-case and drop every non-alphanumeric character, so that
/// `"Jean-Marie Massaud"` and `".../jean-marie-massaud.jpg"` compare.
fn normalize_token(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
