//! Per-field extractors over the rendered page tree.
//!
//! Every extractor shares one contract: try an ordered list of strategies
//! against the page session and return the first non-empty value together
//! with the name of the strategy that produced it, or `None` once the list
//! is exhausted. A missing field is never an error at this layer — the
//! record builder decides whether a miss is required or optional.

mod breadcrumbs;
mod designer;
mod downloads;
mod images;
mod product;
mod text;

pub use breadcrumbs::breadcrumbs;
pub use designer::{designer_bio, designer_image, designer_name};
pub use downloads::downloads;
pub use images::images_by_category;
pub use product::{product_name, sku};
pub use text::{concept_and_design, product_description};

/// A value produced by a strategy chain, tagged with the winning strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Found<T> {
    pub value: T,
    pub strategy: &'static str,
}

/// Try `strategies` in order; the first to produce a value wins.
///
/// Strategy order is data: reordering the slice reorders the fallback
/// behavior, with no conditional branching to update.
pub(crate) fn run_chain<T>(
    field: &'static str,
    strategies: &[(&'static str, &dyn Fn() -> Option<T>)],
) -> Option<Found<T>> {
    for (strategy, attempt) in strategies.iter().copied() {
        if let Some(value) = attempt() {
            tracing::debug!(field, strategy, "field extracted");
            return Some(Found { value, strategy });
        }
        tracing::debug!(field, strategy, "strategy produced nothing");
    }
    None
}

/// Treat whitespace-only values as absent.
pub(crate) fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Strip markup tags from a string and normalize whitespace.
pub(crate) fn strip_markup(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_chain_reports_winning_strategy() {
        let first = || None::<String>;
        let second = || Some("value".to_owned());
        let strategies: [(&'static str, &dyn Fn() -> Option<String>); 2] =
            [("first", &first), ("second", &second)];
        let found = run_chain("field", &strategies).unwrap();
        assert_eq!(found.value, "value");
        assert_eq!(found.strategy, "second");
    }

    #[test]
    fn run_chain_exhaustion_yields_none() {
        let nothing = || None::<String>;
        let strategies: [(&'static str, &dyn Fn() -> Option<String>); 1] = [("only", &nothing)];
        assert!(run_chain("field", &strategies).is_none());
    }

    #[test]
    fn strip_markup_removes_tags_and_squeezes_whitespace() {
        assert_eq!(
            strip_markup("A <b>classic</b>\n  armchair"),
            "A classic armchair"
        );
    }
}
