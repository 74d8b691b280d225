//! Coverings/finishes collection and grouping assembly.
//!
//! The swatch grid lives in a lazily-included fragment organized as
//! material tabs → category accordions → swatch cells. Collection produces
//! flat [`RawFinish`] leaves tagged with their raw labels; assembly folds
//! them into the two-level catalog, canonicalizing the material key.

use std::collections::HashSet;

use arredo_core::{Finish, FinishCatalog};

use crate::page::{select_fragment, Node, PageSession, RevealSection};

/// A finish leaf as discovered at source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFinish {
    pub material_label: String,
    pub category_label: String,
    pub color_caption: String,
    pub color_name: String,
    pub color_url: String,
}

/// Canonical material-type key for a raw tab label.
///
/// Total over all inputs: recognized labels map into the fixed set
/// (WOOD, FABRIC, LEATHER, METAL, GLASS, MARBLE); anything else passes
/// through upper-cased so no discovered finish is silently dropped.
#[must_use]
pub fn canonical_material(raw: &str) -> String {
    const GROUPS: &[(&str, &[&str])] = &[
        ("WOOD", &["wood", "legno", "oak", "walnut", "ash", "veneer", "timber"]),
        ("FABRIC", &["fabric", "tessuto", "textile", "velvet", "cloth"]),
        ("LEATHER", &["leather", "pelle", "hide", "nubuck"]),
        ("METAL", &["metal", "metallo", "steel", "aluminium", "aluminum", "brass"]),
        ("GLASS", &["glass", "vetro", "crystal"]),
        ("MARBLE", &["marble", "marmo", "stone"]),
    ];
    let needle = raw.to_lowercase();
    for (canonical, tokens) in GROUPS.iter().copied() {
        if tokens.iter().any(|token| needle.contains(token)) {
            return canonical.to_owned();
        }
    }
    raw.trim().to_uppercase()
}

/// Collect raw finish leaves from the revealed swatch section.
///
/// When the section came from a deferred include, scanning is scoped to
/// that fragment so base-tree imagery cannot masquerade as swatches. The
/// record builder reveals [`RevealSection::Finishes`] first.
#[must_use]
pub fn collect_raw_finishes(page: &PageSession) -> Vec<RawFinish> {
    match page.fragment_html(RevealSection::Finishes) {
        Some(fragment) => {
            let find = |css: &str| select_fragment(fragment, css);
            let mut raw = scan_tabbed_grid(&find, page);
            if raw.is_empty() {
                // The fragment exists but has no tab structure; fall back to
                // a flat scan of its swatch images.
                raw = scan_flat_swatches(&find, page);
            }
            raw
        }
        None => scan_tabbed_grid(&|css| page.find_all(css), page),
    }
}

/// Walk material tabs → panels → category accordions → swatch cells.
fn scan_tabbed_grid(find: &dyn Fn(&str) -> Vec<Node>, page: &PageSession) -> Vec<RawFinish> {
    let mut raw = Vec::new();

    for tab in find("ol[role=\"tablist\"] li[role=\"tab\"]") {
        let material_label = tab.text().to_owned();
        if material_label.is_empty() {
            continue;
        }
        // Tab ids pair with panel ids as "<N>-tab" / "<N>".
        let Some(panel_id) = tab
            .attr("id")
            .and_then(|id| id.split('-').next())
            .filter(|id| !id.is_empty())
        else {
            continue;
        };
        let Some(panel) = find(&format!("div[id=\"{panel_id}\"]")).into_iter().next() else {
            tracing::debug!(material = %material_label, panel_id, "no panel for material tab");
            continue;
        };

        for item in panel.select("div.cmp-accordion__item") {
            let category_label = item
                .select("h3.cmp-accordion__header span.cmp-accordion__title")
                .into_iter()
                .map(|node| node.text().to_owned())
                .find(|label| !label.is_empty())
                .unwrap_or_else(|| "Unknown Category".to_owned());

            let cells = item.select("div.finishes__grid-cell");
            let text_cells = item.select("div.finishes__grid-cell-text");
            for (index, cell) in cells.iter().enumerate() {
                let Some(leaf) =
                    leaf_from_cell(page, cell, text_cells.get(index), &material_label, &category_label)
                else {
                    continue;
                };
                raw.push(leaf);
            }
        }
    }

    tracing::debug!(count = raw.len(), "raw finish leaves collected");
    raw
}

fn leaf_from_cell(
    page: &PageSession,
    cell: &Node,
    paired_text: Option<&Node>,
    material_label: &str,
    category_label: &str,
) -> Option<RawFinish> {
    let img = cell.select("img[data-src]").into_iter().next()?;
    let src = img.attr("data-src")?;
    let color_url = page.absolutize(swatch_asset_path(src));

    let color_caption = cell
        .select("span.cmp-image__title")
        .into_iter()
        .map(|node| node.text().to_owned())
        .find(|caption| !caption.is_empty())
        .unwrap_or_default();

    // The color name sits either inside the cell or in a position-paired
    // sibling text cell.
    let color_name = cell
        .select("div.cmp-text")
        .into_iter()
        .map(|node| node.text().to_owned())
        .find(|name| !name.is_empty())
        .or_else(|| {
            paired_text.map(|text_cell| {
                text_cell
                    .select("div.cmp-text")
                    .into_iter()
                    .map(|node| node.text().to_owned())
                    .find(|name| !name.is_empty())
                    .unwrap_or_else(|| text_cell.text().to_owned())
            })
        })
        .unwrap_or_default();

    Some(RawFinish {
        material_label: material_label.to_owned(),
        category_label: category_label.to_owned(),
        color_caption,
        color_name,
        color_url,
    })
}

/// Flat fallback over a fragment with no tab structure: every swatch image
/// lands under Unknown/General, named by its alt text.
fn scan_flat_swatches(find: &dyn Fn(&str) -> Vec<Node>, page: &PageSession) -> Vec<RawFinish> {
    find("img[data-src]")
        .into_iter()
        .filter_map(|img| {
            let src = img.attr("data-src")?;
            Some(RawFinish {
                material_label: "Unknown".to_owned(),
                category_label: "General".to_owned(),
                color_caption: String::new(),
                color_name: img
                    .attr("alt")
                    .filter(|alt| !alt.trim().is_empty())
                    .unwrap_or("Finish Item")
                    .to_owned(),
                color_url: page.absolutize(swatch_asset_path(src)),
            })
        })
        .collect()
}

/// Swatch URLs point at renditions below the asset; keep the asset path.
fn swatch_asset_path(src: &str) -> &str {
    src.split("/jcr:content").next().unwrap_or(src)
}

/// Fold raw leaves into the two-level catalog.
///
/// Material keys are canonicalized, `color_caption` upper-cased, leaves
/// appended in discovery order; duplicate `(category, color_name)` pairs
/// are dropped, keeping the first occurrence. Deterministic and idempotent.
#[must_use]
pub fn assemble(raw: &[RawFinish]) -> FinishCatalog {
    let mut catalog = FinishCatalog::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();

    for leaf in raw {
        if leaf.color_url.is_empty() {
            continue;
        }
        if !seen.insert((leaf.category_label.clone(), leaf.color_name.clone())) {
            continue;
        }
        catalog
            .entry(canonical_material(&leaf.material_label))
            .or_default()
            .entry(leaf.category_label.clone())
            .or_default()
            .push(Finish {
                color_caption: leaf.color_caption.to_uppercase(),
                color_name: leaf.color_name.clone(),
                color_url: leaf.color_url.clone(),
            });
    }

    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(material: &str, category: &str, caption: &str, name: &str, url: &str) -> RawFinish {
        RawFinish {
            material_label: material.to_owned(),
            category_label: category.to_owned(),
            color_caption: caption.to_owned(),
            color_name: name.to_owned(),
            color_url: url.to_owned(),
        }
    }

    #[test]
    fn canonical_material_maps_known_labels() {
        assert_eq!(canonical_material("Wood finishes"), "WOOD");
        assert_eq!(canonical_material("PELLE FRAU"), "LEATHER");
        assert_eq!(canonical_material("Fabrics"), "FABRIC");
        assert_eq!(canonical_material("Brushed steel"), "METAL");
        assert_eq!(canonical_material("Vetro"), "GLASS");
        assert_eq!(canonical_material("Marmo di Carrara"), "MARBLE");
    }

    #[test]
    fn canonical_material_passes_unknown_labels_through_upper_cased() {
        assert_eq!(canonical_material("Cuoio Saddle Extra"), "CUOIO SADDLE EXTRA");
    }

    #[test]
    fn assemble_groups_by_canonical_material_and_category() {
        let raw = vec![
            leaf("Pelle Frau", "Color System", "sc 18", "Grigio", "https://a/1"),
            leaf("Pelle Frau", "Color System", "sc 19", "Blu", "https://a/2"),
            leaf("Wood", "Ash", "", "Nero", "https://a/3"),
        ];
        let catalog = assemble(&raw);
        assert_eq!(catalog.len(), 2);
        let leather = &catalog["LEATHER"]["Color System"];
        assert_eq!(leather.len(), 2);
        assert_eq!(leather[0].color_caption, "SC 18");
        assert_eq!(leather[0].color_name, "Grigio");
        assert_eq!(catalog["WOOD"]["Ash"][0].color_name, "Nero");
    }

    #[test]
    fn assemble_drops_duplicate_category_color_pairs() {
        let raw = vec![
            leaf("Leather", "Color System", "sc 18", "Grigio", "https://a/1"),
            leaf("Leather", "Color System", "sc 99", "Grigio", "https://a/other"),
        ];
        let catalog = assemble(&raw);
        let leaves = &catalog["LEATHER"]["Color System"];
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].color_caption, "SC 18", "first occurrence wins");
    }

    #[test]
    fn assemble_is_idempotent() {
        let raw = vec![
            leaf("Leather", "Color System", "sc 18", "Grigio", "https://a/1"),
            leaf("Wood", "Ash", "", "Nero", "https://a/3"),
            leaf("Leather", "Heritage", "h 1", "Cognac", "https://a/4"),
        ];
        assert_eq!(assemble(&raw), assemble(&raw));
    }

    #[tokio::test]
    async fn collect_walks_tabs_panels_and_accordions() {
        let base = r#"<div id="finishes-tab-positioning-bottom" data-include="/finishes.frag.html"></div>"#;
        let fragment = r#"
            <ol role="tablist">
              <li role="tab" id="0-tab">Pelle Frau</li>
              <li role="tab" id="1-tab">Wood</li>
            </ol>
            <div id="0">
              <div class="cmp-accordion__item">
                <h3 class="cmp-accordion__header"><span class="cmp-accordion__title">Color System</span></h3>
                <div class="finishes__grid-cell">
                  <img data-src="/dam/finishes/sc18.jpg/jcr:content/renditions/w100.jpg">
                  <span class="cmp-image__title">sc 18</span>
                </div>
                <div class="finishes__grid-cell-text"><div class="cmp-text">Grigio</div></div>
              </div>
            </div>
            <div id="1">
              <div class="cmp-accordion__item">
                <h3 class="cmp-accordion__header"><span class="cmp-accordion__title">Ash</span></h3>
                <div class="finishes__grid-cell">
                  <img data-src="/dam/finishes/ash-black.jpg">
                  <div class="cmp-text">Nero</div>
                </div>
              </div>
            </div>"#;

        let mut page = PageSession::offline(
            "https://example.com/ww/en/products/chair.html",
            base.to_owned(),
        )
        .with_fragment(RevealSection::Finishes, fragment.to_owned());

        // Simulate the builder's reveal.
        page.reveal(RevealSection::Finishes).await.unwrap();

        let raw = collect_raw_finishes(&page);
        assert_eq!(raw.len(), 2);

        assert_eq!(raw[0].material_label, "Pelle Frau");
        assert_eq!(raw[0].category_label, "Color System");
        assert_eq!(raw[0].color_caption, "sc 18");
        assert_eq!(raw[0].color_name, "Grigio");
        assert_eq!(
            raw[0].color_url,
            "https://example.com/dam/finishes/sc18.jpg",
            "rendition suffix trimmed at /jcr:content"
        );

        assert_eq!(raw[1].material_label, "Wood");
        assert_eq!(raw[1].color_name, "Nero");
    }

    #[tokio::test]
    async fn collect_falls_back_to_flat_scan_without_tab_structure() {
        let base = r#"<div data-include="/finishes.frag.html"></div>"#;
        let fragment = r#"<img data-src="/dam/finishes/loose.jpg" alt="Loose swatch">"#;
        let mut page = PageSession::offline(
            "https://example.com/ww/en/products/chair.html",
            base.to_owned(),
        )
        .with_fragment(RevealSection::Finishes, fragment.to_owned());
        page.reveal(RevealSection::Finishes).await.unwrap();

        let raw = collect_raw_finishes(&page);
        assert_eq!(raw.len(), 1);
        assert_eq!(raw[0].material_label, "Unknown");
        assert_eq!(raw[0].category_label, "General");
        assert_eq!(raw[0].color_name, "Loose swatch");
    }
}
