//! Command handlers for the CLI.
//!
//! Batch runs never stop at the first failure: each URL's outcome (status
//! plus error list) is independently reported, and a FAILED record moves
//! the loop on to the next URL.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

use arredo_core::{AppConfig, RecordStatus};
use arredo_scraper::{classify_url, scrape_product, sitemap, PageClient, UrlClass};

use crate::output;

/// Scrape one URL, print the record, optionally persist it.
pub(crate) async fn scrape(
    config: &AppConfig,
    url: &str,
    save: bool,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    if classify_url(url) != UrlClass::Product {
        tracing::warn!(url, "URL does not look like a product page — scraping anyway");
    }

    let client = PageClient::from_config(config).context("failed to build page client")?;
    let record = scrape_product(&client, url).await;

    println!("{}", serde_json::to_string_pretty(&record)?);

    if save {
        let dir = out.unwrap_or_else(|| config.output_dir.clone());
        let path = output::write_record(&dir, &record)?;
        tracing::info!(path = %path.display(), "record saved");
    }
    Ok(())
}

/// Scrape a list of URLs sequentially: one URL's full extraction (including
/// reveals) completes before the next begins.
pub(crate) async fn batch(
    config: &AppConfig,
    file: Option<PathBuf>,
    from_sitemap: bool,
    save: bool,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let client = PageClient::from_config(config).context("failed to build page client")?;

    let urls = if from_sitemap {
        sitemap::fetch_product_urls(&client, &config.sitemap_url).await?
    } else {
        let path = file.context("either --file or --sitemap is required")?;
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read URL file {}", path.display()))?;
        let (urls, skipped) = product_urls_from_lines(&contents);
        if skipped > 0 {
            tracing::warn!(skipped, "ignoring non-product URLs from file");
        }
        urls
    };

    if urls.is_empty() {
        println!("no product URLs to scrape");
        return Ok(());
    }

    let dir = out.unwrap_or_else(|| config.output_dir.clone());
    let total = urls.len();
    let mut complete = 0usize;
    let mut partial = 0usize;
    let mut failed = 0usize;

    for (index, url) in urls.iter().enumerate() {
        if index > 0 && config.inter_request_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(config.inter_request_delay_ms)).await;
        }
        tracing::info!(url, position = index + 1, total, "scraping");

        let record = scrape_product(&client, url).await;
        match record.status {
            RecordStatus::Complete => complete += 1,
            RecordStatus::Partial => partial += 1,
            RecordStatus::Failed => failed += 1,
        }
        if !record.extraction_errors.is_empty() {
            tracing::warn!(
                url,
                status = %record.status,
                errors = ?record.extraction_errors,
                "record has extraction gaps"
            );
        }

        if save {
            match output::write_record(&dir, &record) {
                Ok(path) => tracing::debug!(path = %path.display(), "record saved"),
                Err(err) => tracing::warn!(url, error = %err, "could not persist record"),
            }
        }
    }

    println!("scraped {total} URLs: {complete} complete, {partial} partial, {failed} failed");
    Ok(())
}

/// Fetch the URL index and print the scrapable product URLs.
pub(crate) async fn urls(config: &AppConfig, sitemap_url: Option<String>) -> anyhow::Result<()> {
    let client = PageClient::from_config(config).context("failed to build page client")?;
    let sitemap_url = sitemap_url.unwrap_or_else(|| config.sitemap_url.clone());
    let urls = sitemap::fetch_product_urls(&client, &sitemap_url).await?;
    for url in &urls {
        println!("{url}");
    }
    Ok(())
}

/// Split a URL file into scrapable product URLs and a count of skipped lines.
///
/// Blank lines and `#` comments are ignored silently; non-product URLs are
/// counted as skipped.
fn product_urls_from_lines(contents: &str) -> (Vec<String>, usize) {
    let mut urls = Vec::new();
    let mut skipped = 0usize;
    for line in contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
    {
        if classify_url(line) == UrlClass::Product {
            urls.push(line.to_owned());
        } else {
            skipped += 1;
        }
    }
    (urls, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_file_keeps_product_urls_in_order() {
        let contents = "\
            https://example.com/ww/en/products/a.html\n\
            \n\
            # a comment\n\
            https://example.com/ww/en/products/b.html\n";
        let (urls, skipped) = product_urls_from_lines(contents);
        assert_eq!(
            urls,
            vec![
                "https://example.com/ww/en/products/a.html",
                "https://example.com/ww/en/products/b.html",
            ]
        );
        assert_eq!(skipped, 0);
    }

    #[test]
    fn url_file_skips_category_and_foreign_urls() {
        let contents = "\
            https://example.com/ww/en/products/a.html\n\
            https://example.com/ww/en/products/chairs.1001.html\n\
            https://example.com/ww/en/stories/heritage.html\n";
        let (urls, skipped) = product_urls_from_lines(contents);
        assert_eq!(urls.len(), 1);
        assert_eq!(skipped, 2);
    }
}
