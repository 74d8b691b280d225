//! Breadcrumb navigation extraction.
//!
//! The embedded JSON-LD block is the most reliable source; a malformed or
//! absent block falls through silently to the visible breadcrumb nav. The
//! fallback is a recovered error, not surfaced to the caller.

use crate::page::PageSession;

use super::{run_chain, Found};

/// Ordered navigation path, root first.
pub fn breadcrumbs(page: &PageSession) -> Option<Found<Vec<String>>> {
    let jsonld = || jsonld_breadcrumbs(page);
    let nav_labels = || {
        let labels: Vec<String> = page
            .find_all("nav.cmp-breadcrumb li.cmp-breadcrumb__item span[itemprop=\"name\"]")
            .into_iter()
            .map(|node| node.text().to_owned())
            .filter(|label| !label.is_empty())
            .collect();
        if labels.is_empty() {
            None
        } else {
            Some(labels)
        }
    };
    let strategies: [(&'static str, &dyn Fn() -> Option<Vec<String>>); 2] =
        [("jsonld", &jsonld), ("breadcrumb-nav", &nav_labels)];
    run_chain("breadcrumbs", &strategies)
}

/// Parse the `BreadcrumbList` structured-data block.
fn jsonld_breadcrumbs(page: &PageSession) -> Option<Vec<String>> {
    let node = page.find_first("script#jsonldBreadcrumb")?;
    let value: serde_json::Value = serde_json::from_str(node.inner_html().trim()).ok()?;
    let items = value.get("itemListElement")?.as_array()?;
    let names: Vec<String> = items
        .iter()
        .filter_map(|entry| {
            entry
                .get("item")
                .and_then(|item| item.get("name"))
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned)
        })
        .collect();
    if names.is_empty() {
        None
    } else {
        Some(names)
    }
}
