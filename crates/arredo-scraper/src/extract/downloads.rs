//! Downloadable technical files from the downloads panel.
//!
//! The panel is a lazy tab; the record builder reveals it before calling
//! [`downloads`]. Anchors carry the file URL in `data-href`; the visible
//! label comes from the enclosing accordion title (sub-items carry the most
//! specific ones) or, failing that, from the anchor text or the file name
//! itself.

use std::collections::HashSet;

use arredo_core::Download;

use crate::page::PageSession;

use super::non_empty;

/// Scan the revealed downloads panel for technical-file anchors.
pub fn downloads(page: &PageSession) -> Vec<Download> {
    let mut found: Vec<(String, String)> = Vec::new();
    let mut claimed: HashSet<String> = HashSet::new();

    for scope in ["div.cmp-accordion__subitem", "div.cmp-accordion__item"] {
        for item in page.find_all(scope) {
            let title = item
                .select("span.cmp-accordion__title")
                .into_iter()
                .find_map(|node| non_empty(node.text().to_owned()));
            for anchor in item.select("a[data-href]") {
                let Some(href) = anchor.attr("data-href") else {
                    continue;
                };
                if !claimed.insert(href.to_owned()) {
                    continue;
                }
                let label = title
                    .clone()
                    .or_else(|| non_empty(anchor.text().to_owned()))
                    .unwrap_or_else(|| label_from_href(href));
                found.push((href.to_owned(), label));
            }
        }
    }

    // Header-level anchors outside any accordion scope.
    for anchor in page.find_all("a[data-href]") {
        let Some(href) = anchor.attr("data-href") else {
            continue;
        };
        if !claimed.insert(href.to_owned()) {
            continue;
        }
        let label = non_empty(anchor.text().to_owned()).unwrap_or_else(|| label_from_href(href));
        found.push((href.to_owned(), label));
    }

    let mut entries = Vec::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();
    for (href, label) in found {
        let group = group_from_label(&label);
        if group.is_empty() || group.contains("UNDEFINED") {
            continue;
        }
        let url = page.absolutize(&href);
        if !seen.insert((group.clone(), url.clone())) {
            continue;
        }
        entries.push(Download {
            filename: filename_from_url(&url),
            group,
            text: label,
            url,
        });
    }

    tracing::debug!(count = entries.len(), "downloads collected");
    entries
}

/// Group label: visible label without a leading "Download " verb, upper-cased.
fn group_from_label(label: &str) -> String {
    let trimmed = label.trim();
    let stripped = trimmed
        .strip_prefix("Download ")
        .or_else(|| trimmed.strip_prefix("download "))
        .unwrap_or(trimmed);
    stripped.trim().to_uppercase()
}

/// Last path segment of the file URL, without query or fragment.
fn filename_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path).to_owned()
}

/// Last-resort label derived from the file name, e.g.
/// `.../grantorino_PRODUCTSHEET.pdf` → `PRODUCTSHEET`.
fn label_from_href(href: &str) -> String {
    let file = filename_from_url(href);
    let stem = file.split('.').next().unwrap_or(&file);
    let tail = stem.rsplit('_').next().unwrap_or(stem);
    if tail.is_empty() {
        stem.to_uppercase()
    } else {
        tail.to_uppercase()
    }
}
