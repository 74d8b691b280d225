//! JSON persistence for scraped records.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;

use arredo_core::ProductRecord;

/// Persist `record` as pretty-printed JSON under `dir`.
///
/// The directory is created if missing; the file name is derived from the
/// record's name and SKU plus a timestamp.
pub(crate) fn write_record(dir: &Path, record: &ProductRecord) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let timestamp = Utc::now().format("%Y%m%d_%H%M%S").to_string();
    let path = dir.join(record_filename(record, &timestamp));

    let json = serde_json::to_string_pretty(record)?;
    fs::write(&path, json)
        .with_context(|| format!("failed to write record to {}", path.display()))?;
    Ok(path)
}

/// `<name>_<sku>_<timestamp>.json` with filesystem-hostile characters removed.
fn record_filename(record: &ProductRecord, timestamp: &str) -> String {
    let name = slugify(record.product_name.as_deref().unwrap_or("unknown-product"));
    let sku = sanitize_sku(record.sku.as_deref().unwrap_or("unknown-sku"));
    format!("{name}_{sku}_{timestamp}.json")
}

/// Keep alphanumerics, collapse runs of everything else into single dashes.
fn slugify(value: &str) -> String {
    let spaced: String = value
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let parts: Vec<&str> = spaced.split_whitespace().collect();
    if parts.is_empty() {
        "unknown".to_owned()
    } else {
        parts.join("-")
    }
}

/// SKUs keep dashes and underscores but lose anything else non-alphanumeric.
fn sanitize_sku(value: &str) -> String {
    let kept: String = value
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if kept.is_empty() {
        "unknown-sku".to_owned()
    } else {
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: Option<&str>, sku: Option<&str>) -> ProductRecord {
        let mut record = ProductRecord::unreachable("https://example.com/ww/en/products/x.html");
        record.product_name = name.map(str::to_owned);
        record.sku = sku.map(str::to_owned);
        record
    }

    #[test]
    fn filename_joins_slug_sku_and_timestamp() {
        let record = record(Some("The Secret Garden Small Table"), Some("5572001"));
        assert_eq!(
            record_filename(&record, "20260806_120000"),
            "The-Secret-Garden-Small-Table_5572001_20260806_120000.json"
        );
    }

    #[test]
    fn filename_strips_special_characters() {
        let record = record(Some("Chair / Prototype #2"), Some("5572*hi"));
        assert_eq!(
            record_filename(&record, "ts"),
            "Chair-Prototype-2_5572hi_ts.json"
        );
    }

    #[test]
    fn filename_falls_back_for_missing_fields() {
        let record = record(None, None);
        assert_eq!(
            record_filename(&record, "ts"),
            "unknown-product_unknown-sku_ts.json"
        );
    }
}
