//! Teacher search over the alphabetical category listing.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::error::WikiError;

static GROUP_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"div[class="mw-category-group"]"#)
        .expect("Failed to parse category group selector - this is a bug")
});

static LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a").expect("Failed to parse link selector - this is a bug")
});

/// Names matching a query, capped to the configured maximum.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    /// Matching page titles in listing order.
    pub names: Vec<String>,
    /// True if more names matched than are included.
    pub truncated: bool,
}

/// Trim a query, lowercase it and fold `ё` into `е`.
///
/// # Errors
///
/// Returns [`WikiError::BadQuery`] if the query is empty or contains anything
/// other than Russian letters and spaces.
pub fn normalize_query(query: &str) -> Result<String, WikiError> {
    let normalized = fold(query.trim());
    let allowed = |c: char| matches!(c, 'а'..='я' | ' ');
    if normalized.is_empty() || !normalized.chars().all(allowed) {
        return Err(WikiError::BadQuery {
            query: query.to_string(),
        });
    }
    Ok(normalized)
}

fn fold(s: &str) -> String {
    s.to_lowercase().replace('ё', "е")
}

/// First character of a title, folded the way listing URLs expect it.
pub(crate) fn listing_letter(title: &str) -> Option<char> {
    fold(title).chars().next()
}

/// Collect titles from the first category group that start with `query`.
///
/// `query` must already be normalized. At most `max_results` names are kept.
///
/// # Errors
///
/// Returns [`WikiError::StructuralMismatch`] if the listing has no category group.
pub fn parse_search_results(
    document: &Html,
    query: &str,
    max_results: usize,
) -> Result<SearchResults, WikiError> {
    let group = document.select(&GROUP_SELECTOR).next().ok_or_else(|| {
        WikiError::StructuralMismatch("category group `div.mw-category-group` not found".to_string())
    })?;

    let mut matches = group
        .select(&LINK_SELECTOR)
        .filter_map(|a| a.value().attr("title"))
        .filter(|title| fold(title).starts_with(query))
        .map(str::to_string);

    let names: Vec<String> = matches.by_ref().take(max_results).collect();
    let truncated = matches.next().is_some();
    Ok(SearchResults { names, truncated })
}

/// Find the first title in the first category group that starts with `prefix`.
///
/// Unlike [`parse_search_results`] the comparison is exact: `prefix` is a cut
/// of a title taken from an earlier search, not a user query.
///
/// # Errors
///
/// Returns [`WikiError::StructuralMismatch`] if the listing has no category group.
pub fn find_title(document: &Html, prefix: &str) -> Result<Option<String>, WikiError> {
    let group = document.select(&GROUP_SELECTOR).next().ok_or_else(|| {
        WikiError::StructuralMismatch("category group `div.mw-category-group` not found".to_string())
    })?;

    Ok(group
        .select(&LINK_SELECTOR)
        .filter_map(|a| a.value().attr("title"))
        .find(|title| title.starts_with(prefix))
        .map(str::to_string))
}
