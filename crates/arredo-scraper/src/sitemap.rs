//! URL-index parsing.
//!
//! The site publishes its candidate URLs as a sitemap document. The engine
//! only lifts the flat URL list out of it and filters through the
//! classifier; it does not interpret the index beyond that.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::classify::{classify_url, UrlClass};
use crate::client::PageClient;
use crate::error::ScrapeError;

/// Extract all `<loc>` URLs from a sitemap document.
///
/// Tolerant of malformed XML: URLs parsed before the error are kept.
#[must_use]
pub fn parse_sitemap(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut urls = Vec::new();
    let mut in_url = false;
    let mut in_loc = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name_buf = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_buf).unwrap_or("");
                if name == "url" {
                    in_url = true;
                } else if name == "loc" && in_url {
                    in_loc = true;
                }
            }
            Ok(Event::End(e)) => {
                let name_buf = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_buf).unwrap_or("");
                if name == "url" {
                    in_url = false;
                }
                if name == "loc" {
                    in_loc = false;
                }
            }
            Ok(Event::Text(e)) => {
                if in_loc {
                    let url = e.unescape().unwrap_or_default().trim().to_owned();
                    if !url.is_empty() {
                        urls.push(url);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                tracing::warn!(error = %err, "malformed sitemap XML — keeping URLs parsed so far");
                break;
            }
            _ => {}
        }
    }

    urls
}

/// Scrapable product-page URLs from a sitemap document.
#[must_use]
pub fn product_urls(xml: &str) -> Vec<String> {
    parse_sitemap(xml)
        .into_iter()
        .filter(|url| classify_url(url) == UrlClass::Product)
        .collect()
}

/// Fetch the URL index and return its product-page URLs.
///
/// # Errors
///
/// Propagates [`ScrapeError`] from the index fetch; a sitemap that fails to
/// download is fatal for index-driven runs (there is nothing to iterate).
pub async fn fetch_product_urls(
    client: &PageClient,
    sitemap_url: &str,
) -> Result<Vec<String>, ScrapeError> {
    let xml = client.fetch_text(sitemap_url).await?;
    let urls = product_urls(&xml);
    tracing::info!(sitemap_url, count = urls.len(), "product URLs collected from index");
    Ok(urls)
}
