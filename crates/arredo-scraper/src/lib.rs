pub mod classify;
pub mod client;
pub mod error;
pub mod extract;
pub mod finishes;
pub mod page;
pub mod record;
pub mod sitemap;

mod rate_limit;

pub use classify::{classify_url, UrlClass};
pub use client::PageClient;
pub use error::{RevealError, ScrapeError};
pub use page::{FragmentSource, Node, PageSession, RevealSection};
pub use record::{build_record, scrape_product};
