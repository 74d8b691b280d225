//! Record builder: orchestrates the field extractors and the grouping
//! assembler over one page session and finalizes the record status.
//!
//! All field-level failures are local: a miss becomes `null` plus an entry
//! on the record's error list, and extraction continues. Only page
//! unreachability short-circuits the whole record.

use arredo_core::{
    Designer, ExtractionError, FinishCatalog, ProductRecord, RecordStatus,
};

use crate::client::PageClient;
use crate::extract::{self, Found};
use crate::finishes;
use crate::page::{PageSession, RevealSection};

const NO_STRATEGY: &str = "no strategy produced a value";

/// Scrape one product URL into a record.
///
/// Never fails for partial data. An unreachable page — a non-success
/// response, or a transport failure that survives the retry policy —
/// produces a FAILED record with every field null except the URL.
pub async fn scrape_product(client: &PageClient, url: &str) -> ProductRecord {
    match client.open(url).await {
        Ok(mut page) => build_record(&mut page).await,
        Err(err) => {
            tracing::warn!(url, error = %err, "could not acquire page session");
            ProductRecord::unreachable(url)
        }
    }
}

/// Build a [`ProductRecord`] from a rendered page session.
///
/// Extractors run sequentially over the shared session; the downloads and
/// finishes extractors trigger their sections' reveals first. A reveal that
/// never completes degrades to an optional-field miss for that section
/// while the rest of the record is kept.
pub async fn build_record(page: &mut PageSession) -> ProductRecord {
    if !page.reachable() {
        tracing::warn!(
            url = page.url(),
            status = page.status(),
            "page unreachable — skipping extraction"
        );
        return ProductRecord::unreachable(page.url());
    }

    let mut errors: Vec<ExtractionError> = Vec::new();

    let product_name = take(extract::product_name(page), "product_name", &mut errors);
    let sku = take(extract::sku(page), "sku", &mut errors);

    let designer_name = take(extract::designer_name(page), "designer.name", &mut errors);
    let designer_bio = match page.reveal(RevealSection::Designer).await {
        Ok(()) => take(extract::designer_bio(page), "designer.bio", &mut errors),
        Err(err) => {
            note_missing(&mut errors, "designer.bio", err.to_string());
            None
        }
    };
    let designer_image = take(
        extract::designer_image(page, designer_name.as_deref()),
        "designer.image",
        &mut errors,
    );

    let breadcrumbs = match extract::breadcrumbs(page) {
        Some(found) => found.value,
        None => {
            note_missing(&mut errors, "breadcrumbs", NO_STRATEGY.to_owned());
            Vec::new()
        }
    };

    let product_description = take(
        extract::product_description(page),
        "product_description",
        &mut errors,
    );
    let concept_and_design = take(
        extract::concept_and_design(page),
        "concept_and_design",
        &mut errors,
    );

    let images = extract::images_by_category(page);
    if images.is_empty() {
        note_missing(&mut errors, "images", "no categorized images found".to_owned());
    }

    let downloads = match page.reveal(RevealSection::Downloads).await {
        Ok(()) => extract::downloads(page),
        Err(err) => {
            note_missing(&mut errors, "downloads", err.to_string());
            Vec::new()
        }
    };

    let coverings_and_finishes = match page.reveal(RevealSection::Finishes).await {
        Ok(()) => finishes::assemble(&finishes::collect_raw_finishes(page)),
        Err(err) => {
            note_missing(&mut errors, "coverings_and_finishes", err.to_string());
            FinishCatalog::new()
        }
    };

    let designer = Designer {
        name: designer_name,
        bio: designer_bio,
        image: designer_image,
    };
    let designer = if designer.is_empty() {
        None
    } else {
        Some(designer)
    };

    let status = RecordStatus::compute(true, product_name.is_some(), sku.is_some());
    tracing::info!(
        url = page.url(),
        %status,
        errors = errors.len(),
        "record built"
    );

    ProductRecord {
        url: page.url().to_owned(),
        product_name,
        sku,
        designer,
        breadcrumbs,
        product_description,
        concept_and_design,
        images,
        downloads,
        coverings_and_finishes,
        extraction_errors: errors,
        status,
    }
}

/// Unwrap a chain result, recording a miss on the error list.
fn take<T>(
    found: Option<Found<T>>,
    field: &str,
    errors: &mut Vec<ExtractionError>,
) -> Option<T> {
    match found {
        Some(found) => Some(found.value),
        None => {
            note_missing(errors, field, NO_STRATEGY.to_owned());
            None
        }
    }
}

fn note_missing(errors: &mut Vec<ExtractionError>, field: &str, reason: String) {
    tracing::debug!(field, reason = %reason, "field missing");
    errors.push(ExtractionError {
        field: field.to_owned(),
        reason,
    });
}
