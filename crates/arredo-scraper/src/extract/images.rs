//! Image categorization by asset-folder token.
//!
//! The catalog's DAM stores renditions in numbered folders; the folder name
//! inside an image URL identifies the category. Categories are not mutually
//! exclusive: an image joins every category whose token its URL contains.

use arredo_core::{ImageCategory, ImageSet};

use crate::page::{Node, PageSession};

const CATEGORY_TOKENS: &[(ImageCategory, &str)] = &[
    (ImageCategory::Hero, "01_hero"),
    (ImageCategory::Product, "02_thumbnails"),
    (ImageCategory::Contextual, "03_concept"),
    (ImageCategory::Dimension, "08_dimensioni"),
];

/// Source attributes checked in priority order; lazy loaders park the real
/// URL in `data-src` or `data-lazy-src` until the image scrolls into view.
const SRC_ATTRS: &[&str] = &["src", "data-src", "data-lazy-src"];

/// Assets that are never product imagery.
const REJECT_TOKENS: &[&str] = &["placeholder", "loading", "blank", "icon", ".svg"];

/// Collect every usable image on the page into its matching categories.
pub fn images_by_category(page: &PageSession) -> ImageSet {
    let mut images = ImageSet::default();

    // The hero block qualifies its images structurally, independent of the
    // folder token.
    for node in page.find_all(".cmp-producthero__image img") {
        if let Some(url) = usable_src(page, &node) {
            images.insert(ImageCategory::Hero, url);
        }
    }

    for node in page.find_all("img") {
        let Some(url) = usable_src(page, &node) else {
            continue;
        };
        let lower = url.to_lowercase();
        for (category, token) in CATEGORY_TOKENS.iter().copied() {
            if lower.contains(token) {
                images.insert(category, url.clone());
            }
        }
    }

    images
}

fn usable_src(page: &PageSession, node: &Node) -> Option<String> {
    let src = node.first_attr(SRC_ATTRS)?;
    if src.trim().is_empty() {
        return None;
    }
    let url = page.absolutize(src);
    let lower = url.to_lowercase();
    if REJECT_TOKENS.iter().any(|token| lower.contains(token)) {
        return None;
    }
    Some(url)
}
