//! Output record types for a scraped catalog product page.
//!
//! The JSON shape of [`ProductRecord`] is a compatibility contract for the
//! export and UI layers: field names and nesting must not change without
//! coordinating with downstream consumers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Two-level finish catalog: canonical material type → category label →
/// finish options in discovery order.
pub type FinishCatalog = BTreeMap<String, BTreeMap<String, Vec<Finish>>>;

/// Completeness of a scraped record.
///
/// `Failed` is reserved for pages that could not be reached at all;
/// `Partial` means a required field (name or SKU) is missing; optional-field
/// gaps do not degrade a `Complete` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    Complete,
    Partial,
    Failed,
}

impl RecordStatus {
    /// Compute the record status from page reachability and the presence of
    /// the two required fields.
    #[must_use]
    pub fn compute(reachable: bool, has_name: bool, has_sku: bool) -> Self {
        if !reachable {
            Self::Failed
        } else if has_name && has_sku {
            Self::Complete
        } else {
            Self::Partial
        }
    }
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Complete => write!(f, "COMPLETE"),
            Self::Partial => write!(f, "PARTIAL"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// Designer sub-entity. Each field is independently nullable; the record
/// omits the whole entity only when all three are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Designer {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
}

impl Designer {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.bio.is_none() && self.image.is_none()
    }
}

/// A downloadable technical file discovered in the downloads panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Download {
    /// Last path segment of the file URL.
    pub filename: String,
    /// Group label derived from the visible label (upper-cased, without a
    /// leading "Download " prefix).
    pub group: String,
    /// The visible label text as shown on the page.
    pub text: String,
    pub url: String,
}

/// One finish/covering option within a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finish {
    pub color_caption: String,
    pub color_name: String,
    pub color_url: String,
}

/// Image categories recognized by the extraction engine.
///
/// Categories are not mutually exclusive: an image whose URL carries more
/// than one category token is listed under every matching category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageCategory {
    Hero,
    Product,
    Contextual,
    Dimension,
}

/// Categorized image URLs. Lists are deduplicated by value, first occurrence
/// wins, insertion order preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSet {
    pub hero_images: Vec<String>,
    pub product_images: Vec<String>,
    pub contextual_images: Vec<String>,
    pub dimension_images: Vec<String>,
}

impl ImageSet {
    /// Append `url` to the category list unless it is already present.
    pub fn insert(&mut self, category: ImageCategory, url: String) {
        let list = match category {
            ImageCategory::Hero => &mut self.hero_images,
            ImageCategory::Product => &mut self.product_images,
            ImageCategory::Contextual => &mut self.contextual_images,
            ImageCategory::Dimension => &mut self.dimension_images,
        };
        if !list.contains(&url) {
            list.push(url);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hero_images.is_empty()
            && self.product_images.is_empty()
            && self.contextual_images.is_empty()
            && self.dimension_images.is_empty()
    }
}

/// A field-level extraction failure recorded on the final record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionError {
    pub field: String,
    pub reason: String,
}

/// The structured record produced for one scraped URL.
///
/// Built once by the record builder and never mutated after its status is
/// finalized; `url` is set exactly once at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub url: String,
    pub product_name: Option<String>,
    pub sku: Option<String>,
    pub designer: Option<Designer>,
    pub breadcrumbs: Vec<String>,
    pub product_description: Option<String>,
    pub concept_and_design: Option<String>,
    pub images: ImageSet,
    pub downloads: Vec<Download>,
    pub coverings_and_finishes: FinishCatalog,
    pub extraction_errors: Vec<ExtractionError>,
    pub status: RecordStatus,
}

impl ProductRecord {
    /// The record for a page that could not be reached: every field null or
    /// empty except the URL.
    #[must_use]
    pub fn unreachable(url: &str) -> Self {
        Self {
            url: url.to_owned(),
            product_name: None,
            sku: None,
            designer: None,
            breadcrumbs: Vec::new(),
            product_description: None,
            concept_and_design: None,
            images: ImageSet::default(),
            downloads: Vec::new(),
            coverings_and_finishes: FinishCatalog::new(),
            extraction_errors: Vec::new(),
            status: RecordStatus::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_failed_when_unreachable() {
        assert_eq!(
            RecordStatus::compute(false, true, true),
            RecordStatus::Failed
        );
    }

    #[test]
    fn status_partial_when_name_missing() {
        assert_eq!(
            RecordStatus::compute(true, false, true),
            RecordStatus::Partial
        );
    }

    #[test]
    fn status_partial_when_sku_missing() {
        assert_eq!(
            RecordStatus::compute(true, true, false),
            RecordStatus::Partial
        );
    }

    #[test]
    fn status_complete_with_both_required_fields() {
        assert_eq!(
            RecordStatus::compute(true, true, true),
            RecordStatus::Complete
        );
    }

    #[test]
    fn status_serializes_as_upper_case() {
        let json = serde_json::to_string(&RecordStatus::Partial).unwrap();
        assert_eq!(json, "\"PARTIAL\"");
    }

    #[test]
    fn image_set_insert_deduplicates_by_value() {
        let mut images = ImageSet::default();
        images.insert(ImageCategory::Hero, "https://a/1.jpg".to_owned());
        images.insert(ImageCategory::Hero, "https://a/2.jpg".to_owned());
        images.insert(ImageCategory::Hero, "https://a/1.jpg".to_owned());
        assert_eq!(images.hero_images, vec!["https://a/1.jpg", "https://a/2.jpg"]);
    }

    #[test]
    fn image_set_categories_are_independent() {
        let mut images = ImageSet::default();
        images.insert(ImageCategory::Hero, "https://a/1.jpg".to_owned());
        images.insert(ImageCategory::Product, "https://a/1.jpg".to_owned());
        assert_eq!(images.hero_images.len(), 1);
        assert_eq!(images.product_images.len(), 1);
    }

    #[test]
    fn unreachable_record_has_only_url() {
        let record = ProductRecord::unreachable("https://example.com/products/x.html");
        assert_eq!(record.url, "https://example.com/products/x.html");
        assert_eq!(record.status, RecordStatus::Failed);
        assert!(record.product_name.is_none());
        assert!(record.sku.is_none());
        assert!(record.designer.is_none());
        assert!(record.breadcrumbs.is_empty());
        assert!(record.images.is_empty());
        assert!(record.downloads.is_empty());
        assert!(record.coverings_and_finishes.is_empty());
    }

    #[test]
    fn record_serializes_contract_field_names() {
        let record = ProductRecord::unreachable("https://example.com/products/x.html");
        let value = serde_json::to_value(&record).unwrap();
        for key in [
            "url",
            "product_name",
            "sku",
            "designer",
            "breadcrumbs",
            "product_description",
            "concept_and_design",
            "images",
            "downloads",
            "coverings_and_finishes",
            "extraction_errors",
            "status",
        ] {
            assert!(value.get(key).is_some(), "missing contract field {key}");
        }
        let images = value.get("images").unwrap();
        for key in [
            "hero_images",
            "product_images",
            "contextual_images",
            "dimension_images",
        ] {
            assert!(images.get(key).is_some(), "missing image category {key}");
        }
    }
}
