//! Rendered-page session: the page-tree handle passed into every extractor.
//!
//! A [`PageSession`] owns the delivered page markup plus any lazily-revealed
//! fragments, and exposes structural queries over both. Element lookups
//! return owned [`Node`] snapshots so extractors never hold borrows into the
//! parsed tree; nested scans re-parse a node's inner HTML as a fragment.
//!
//! The catalog platform defers some sections (designer panel, downloads tab,
//! finish swatches) behind `data-include` URLs that the front end resolves
//! after load. [`PageSession::reveal`] performs that resolution here: a
//! one-way, idempotent graft of the fetched fragment into the session,
//! bounded by a timeout.

use std::collections::BTreeMap;
use std::time::Duration;

use scraper::{ElementRef, Html, Selector};

use crate::error::RevealError;

/// Lazily-loaded page sections that must be revealed before querying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RevealSection {
    /// Designer biography panel.
    Designer,
    /// Downloads tab with technical files.
    Downloads,
    /// Coverings and finishes swatch grid.
    Finishes,
}

impl RevealSection {
    /// Selectors locating the section's deferred-include element, tried in
    /// order.
    fn include_selectors(self) -> &'static [&'static str] {
        match self {
            Self::Designer => &["[data-include*=\"designer\"]"],
            Self::Downloads => &["[data-include*=\"downloads\"]"],
            Self::Finishes => &[
                "#finishes-tab-positioning-bottom[data-include]",
                "[data-include*=\"finishes\"]",
            ],
        }
    }
}

impl std::fmt::Display for RevealSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Designer => write!(f, "designer"),
            Self::Downloads => write!(f, "downloads"),
            Self::Finishes => write!(f, "finishes"),
        }
    }
}

/// Where reveal fragments come from.
#[derive(Debug, Clone)]
pub enum FragmentSource {
    /// Fetch deferred fragments over HTTP within `timeout`.
    Remote {
        http: reqwest::Client,
        timeout: Duration,
    },
    /// Serve fragments from an in-memory map (tests, offline pages).
    Preloaded(BTreeMap<RevealSection, String>),
    /// No fragment capability; reveals of deferred sections time out.
    Offline,
}

/// Owned snapshot of one matched element.
#[derive(Debug, Clone)]
pub struct Node {
    text: String,
    inner_html: String,
    attrs: BTreeMap<String, String>,
}

impl Node {
    fn from_element(el: ElementRef<'_>) -> Self {
        let text = el.text().collect::<String>();
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let attrs = el
            .value()
            .attrs()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Self {
            text,
            inner_html: el.inner_html(),
            attrs,
        }
    }

    /// Whitespace-normalized text content of the element.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Raw inner markup, useful for nested scans and embedded JSON blocks.
    #[must_use]
    pub fn inner_html(&self) -> &str {
        &self.inner_html
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// First present attribute among `names`, in the given priority order.
    #[must_use]
    pub fn first_attr(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|name| self.attr(name))
    }

    /// Select within this element's subtree.
    #[must_use]
    pub fn select(&self, css: &str) -> Vec<Node> {
        select_fragment(&self.inner_html, css)
    }
}

/// Run a selector over a standalone HTML fragment.
pub(crate) fn select_fragment(html: &str, css: &str) -> Vec<Node> {
    let selector = Selector::parse(css).expect("valid selector");
    let doc = Html::parse_fragment(html);
    doc.select(&selector).map(Node::from_element).collect()
}

/// One rendered page, acquired per URL and shared sequentially by all
/// extractors for that URL.
#[derive(Debug)]
pub struct PageSession {
    url: String,
    origin: String,
    status: Option<u16>,
    reachable: bool,
    html: String,
    revealed: BTreeMap<RevealSection, String>,
    fragments: FragmentSource,
}

impl PageSession {
    /// A session over successfully delivered page markup.
    #[must_use]
    pub fn live(url: &str, html: String, fragments: FragmentSource) -> Self {
        Self {
            url: url.to_owned(),
            origin: page_origin(url),
            status: Some(200),
            reachable: true,
            html,
            revealed: BTreeMap::new(),
            fragments,
        }
    }

    /// A session for a page that answered with a non-success status. No
    /// extractor runs against it.
    #[must_use]
    pub fn unreachable(url: &str, status: u16) -> Self {
        Self {
            url: url.to_owned(),
            origin: page_origin(url),
            status: Some(status),
            reachable: false,
            html: String::new(),
            revealed: BTreeMap::new(),
            fragments: FragmentSource::Offline,
        }
    }

    /// A session over static markup with no fragment capability.
    #[must_use]
    pub fn offline(url: &str, html: String) -> Self {
        Self::live(url, html, FragmentSource::Offline)
    }

    /// Register a preloaded fragment for `section`, converting the session's
    /// fragment source to [`FragmentSource::Preloaded`] if necessary.
    #[must_use]
    pub fn with_fragment(mut self, section: RevealSection, html: String) -> Self {
        match &mut self.fragments {
            FragmentSource::Preloaded(map) => {
                map.insert(section, html);
            }
            _ => {
                let mut map = BTreeMap::new();
                map.insert(section, html);
                self.fragments = FragmentSource::Preloaded(map);
            }
        }
        self
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Scheme and host the page was served from.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Whether the page answered with a success status.
    #[must_use]
    pub fn reachable(&self) -> bool {
        self.reachable
    }

    /// First element matching `css` across the base tree and all revealed
    /// fragments.
    #[must_use]
    pub fn find_first(&self, css: &str) -> Option<Node> {
        self.find_all(css).into_iter().next()
    }

    /// All elements matching `css`, base tree first, then revealed fragments.
    #[must_use]
    pub fn find_all(&self, css: &str) -> Vec<Node> {
        let selector = Selector::parse(css).expect("valid selector");
        let mut nodes = Vec::new();
        for html in std::iter::once(self.html.as_str())
            .chain(self.revealed.values().map(String::as_str))
        {
            let doc = Html::parse_document(html);
            nodes.extend(doc.select(&selector).map(Node::from_element));
        }
        nodes
    }

    /// Raw markup of a revealed fragment, if `section` was revealed from a
    /// deferred include. Used to scope scans to one section when the base
    /// tree would produce false matches.
    #[must_use]
    pub fn fragment_html(&self, section: RevealSection) -> Option<&str> {
        self.revealed.get(&section).map(String::as_str)
    }

    /// Resolve `href` against the page origin. Protocol-relative URLs get
    /// `https:`, absolute paths get the origin, everything else passes
    /// through verbatim.
    #[must_use]
    pub fn absolutize(&self, href: &str) -> String {
        if href.starts_with("//") {
            format!("https:{href}")
        } else if href.starts_with('/') {
            format!("{}{href}", self.origin)
        } else {
            href.to_owned()
        }
    }

    /// The section's deferred-include URL, if the base tree defers it.
    fn include_url(&self, section: RevealSection) -> Option<String> {
        let selector_matches = |css: &str| {
            let selector = Selector::parse(css).expect("valid selector");
            let doc = Html::parse_document(&self.html);
            doc.select(&selector)
                .find_map(|el| el.value().attr("data-include").map(str::to_owned))
        };
        section
            .include_selectors()
            .iter()
            .find_map(|css| selector_matches(css))
            .map(|href| self.absolutize(&href))
    }

    /// Reveal a lazily-loaded section: resolve its deferred include, fetch
    /// the fragment within the bounded timeout, and graft it into the
    /// session so subsequent queries see it.
    ///
    /// One-way and idempotent: revealing an already-revealed section is a
    /// no-op hit on the cache; a section with no deferred include resolves
    /// trivially because its content is already part of the initial tree.
    ///
    /// # Errors
    ///
    /// [`RevealError::Timeout`] when the fragment does not stabilize within
    /// the timeout (or the session has no fragment capability),
    /// [`RevealError::Fetch`]/[`RevealError::Status`] on transport failures.
    pub async fn reveal(&mut self, section: RevealSection) -> Result<(), RevealError> {
        if self.revealed.contains_key(&section) {
            tracing::debug!(%section, "section already revealed");
            return Ok(());
        }

        if let FragmentSource::Preloaded(map) = &self.fragments {
            let entry = map.get(&section).cloned();
            if let Some(html) = entry {
                self.revealed.insert(section, html);
                return Ok(());
            }
            if self.include_url(section).is_none() {
                return Ok(());
            }
            return Err(RevealError::Timeout { section });
        }

        let Some(include_url) = self.include_url(section) else {
            tracing::debug!(%section, "no deferred include — content already in the initial tree");
            return Ok(());
        };

        let (http, timeout) = match &self.fragments {
            FragmentSource::Remote { http, timeout } => (http.clone(), *timeout),
            _ => return Err(RevealError::Timeout { section }),
        };

        let response = tokio::time::timeout(timeout, http.get(&include_url).send())
            .await
            .map_err(|_| RevealError::Timeout { section })?
            .map_err(|source| RevealError::Fetch { section, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RevealError::Status {
                section,
                status: status.as_u16(),
            });
        }

        let body = tokio::time::timeout(timeout, response.text())
            .await
            .map_err(|_| RevealError::Timeout { section })?
            .map_err(|source| RevealError::Fetch { section, source })?;

        tracing::debug!(%section, url = %include_url, bytes = body.len(), "revealed deferred section");
        self.revealed.insert(section, body);
        Ok(())
    }
}

/// Extracts the scheme+host origin from a page URL.
///
/// Given `"https://example.com/ww/en/products/x.html"`, returns
/// `"https://example.com"`.
fn page_origin(url: &str) -> String {
    reqwest::Url::parse(url).map_or_else(
        |_| {
            // fallback: take "https://host" by splitting on '/' and taking first 3 parts
            url.trim_end_matches('/')
                .splitn(4, '/')
                .take(3)
                .collect::<Vec<_>>()
                .join("/")
        },
        |u| u.origin().ascii_serialization(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_URL: &str = "https://example.com/ww/en/products/club-chair.html";

    #[test]
    fn page_origin_strips_path() {
        assert_eq!(page_origin(PAGE_URL), "https://example.com");
    }

    #[test]
    fn absolutize_handles_relative_and_protocol_relative() {
        let page = PageSession::offline(PAGE_URL, String::new());
        assert_eq!(
            page.absolutize("/content/x.jpg"),
            "https://example.com/content/x.jpg"
        );
        assert_eq!(
            page.absolutize("//cdn.example.com/x.jpg"),
            "https://cdn.example.com/x.jpg"
        );
        assert_eq!(
            page.absolutize("https://other.com/x.jpg"),
            "https://other.com/x.jpg"
        );
    }

    #[test]
    fn find_all_returns_snapshots_with_text_and_attrs() {
        let html = r#"<div class="a" data-id="7"><p>Hello <b>world</b></p></div>"#.to_owned();
        let page = PageSession::offline(PAGE_URL, html);
        let nodes = page.find_all("div.a");
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].text(), "Hello world");
        assert_eq!(nodes[0].attr("data-id"), Some("7"));
        assert_eq!(nodes[0].select("b").len(), 1);
    }

    #[tokio::test]
    async fn reveal_without_deferred_include_is_trivially_ok() {
        let mut page = PageSession::offline(PAGE_URL, "<p>static</p>".to_owned());
        assert!(page.reveal(RevealSection::Downloads).await.is_ok());
    }

    #[tokio::test]
    async fn reveal_grafts_preloaded_fragment_into_queries() {
        let base = r#"<div id="finishes-tab-positioning-bottom" data-include="/frag.html"></div>"#;
        let mut page = PageSession::offline(PAGE_URL, base.to_owned()).with_fragment(
            RevealSection::Finishes,
            r#"<ol role="tablist"><li role="tab" id="0-tab">Wood</li></ol>"#.to_owned(),
        );

        assert!(page.find_first("li[role=\"tab\"]").is_none());
        page.reveal(RevealSection::Finishes).await.unwrap();
        let tab = page.find_first("li[role=\"tab\"]").unwrap();
        assert_eq!(tab.text(), "Wood");

        // Second reveal is a cache hit, not a second graft.
        page.reveal(RevealSection::Finishes).await.unwrap();
        assert_eq!(page.find_all("li[role=\"tab\"]").len(), 1);
    }

    #[tokio::test]
    async fn reveal_of_missing_preloaded_fragment_times_out() {
        let base = r#"<div data-include="/finishes.frag.html"></div>"#;
        let mut page = PageSession::offline(PAGE_URL, base.to_owned())
            .with_fragment(RevealSection::Downloads, "<a data-href=\"/f.pdf\">x</a>".to_owned());
        let err = page.reveal(RevealSection::Finishes).await.unwrap_err();
        assert!(matches!(err, RevealError::Timeout { section } if section == RevealSection::Finishes));
    }

    #[test]
    fn unreachable_session_reports_status() {
        let page = PageSession::unreachable(PAGE_URL, 404);
        assert!(!page.reachable());
        assert_eq!(page.status(), Some(404));
        assert!(page.find_first("h1").is_none());
    }
}
