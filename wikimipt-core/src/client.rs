//! High-level wiki client: search and profile lookup.

use std::sync::Arc;

use scraper::Html;

use crate::config::Config;
use crate::error::WikiError;
use crate::profile::{TeacherProfile, assemble_profile};
use crate::render::{Renderer, TagTable};
use crate::search::{
    SearchResults, find_title, listing_letter, normalize_query, parse_search_results,
};
use crate::site::Site;
use crate::source::{HttpPageSource, PageSource};

/// Fetches wiki pages and turns them into search results and profiles.
///
/// Holds only immutable state, so it is shared between handlers behind an `Arc`.
/// Pages are parsed in synchronous helpers; no parsed tree lives across an
/// await point.
pub struct WikiClient {
    source: Arc<dyn PageSource>,
    site: Site,
    tags: TagTable,
    max_depth: usize,
    max_results: usize,
}

impl WikiClient {
    /// Create a client over any page source.
    pub fn new(source: Arc<dyn PageSource>, config: &Config) -> Self {
        Self {
            source,
            site: Site::from_config(&config.site),
            tags: TagTable::standard(),
            max_depth: config.render.max_depth,
            max_results: config.search.max_results,
        }
    }

    /// Create a client that fetches over HTTP.
    ///
    /// # Errors
    ///
    /// Returns [`WikiError::Fetch`] if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, WikiError> {
        let source = HttpPageSource::from_config(&config.site)?;
        Ok(Self::new(Arc::new(source), config))
    }

    /// The site this client talks to.
    pub fn site(&self) -> &Site {
        &self.site
    }

    /// Find teachers whose name starts with `query`.
    ///
    /// # Errors
    ///
    /// - [`WikiError::BadQuery`] before any request if the query has unsupported characters
    /// - [`WikiError::Fetch`] if the listing cannot be fetched
    /// - [`WikiError::StructuralMismatch`] if the listing layout is unexpected
    pub async fn search(&self, query: &str) -> Result<SearchResults, WikiError> {
        let normalized = normalize_query(query)?;
        let Some(first) = normalized.chars().next() else {
            return Err(WikiError::BadQuery {
                query: query.to_string(),
            });
        };

        let html = self.source.fetch(&self.site.search_url(first)).await?;
        let results = self.search_from_html(&html, &normalized)?;
        tracing::debug!(
            "Search '{}' matched {} names (truncated: {})",
            normalized,
            results.names.len(),
            results.truncated
        );
        Ok(results)
    }

    /// Find the full title of the teacher whose name starts with `prefix`.
    ///
    /// Used for names too long to be carried whole; the listing is fetched
    /// again and the first title starting with `prefix` wins.
    ///
    /// # Errors
    ///
    /// - [`WikiError::NameNotFound`] if `prefix` is empty or matches no title
    /// - [`WikiError::Fetch`] if the listing cannot be fetched
    /// - [`WikiError::StructuralMismatch`] if the listing layout is unexpected
    pub async fn resolve_name(&self, prefix: &str) -> Result<String, WikiError> {
        let not_found = || WikiError::NameNotFound {
            prefix: prefix.to_string(),
        };
        let first = listing_letter(prefix).ok_or_else(not_found)?;

        let html = self.source.fetch(&self.site.search_url(first)).await?;
        let name = Self::title_from_html(&html, prefix)?.ok_or_else(not_found)?;
        tracing::debug!("Resolved '{}' to '{}'", prefix, name);
        Ok(name)
    }

    /// Fetch and assemble the profile of the teacher titled `name`.
    ///
    /// # Errors
    ///
    /// Returns [`WikiError::Fetch`] if the page cannot be fetched, or any
    /// error from [`assemble_profile`].
    pub async fn profile(&self, name: &str) -> Result<TeacherProfile, WikiError> {
        let html = self.source.fetch(&self.site.page_url(name)).await?;
        self.profile_from_html(name, &html)
    }

    /// Assemble a profile from an already fetched page.
    ///
    /// # Errors
    ///
    /// Any error from [`assemble_profile`].
    pub fn profile_from_html(&self, name: &str, html: &str) -> Result<TeacherProfile, WikiError> {
        let document = Html::parse_document(html);
        let renderer = Renderer::new(&self.tags, &self.site, self.max_depth);
        assemble_profile(name, &document, &renderer, &self.site)
    }

    fn title_from_html(html: &str, prefix: &str) -> Result<Option<String>, WikiError> {
        let document = Html::parse_document(html);
        find_title(&document, prefix)
    }

    fn search_from_html(&self, html: &str, query: &str) -> Result<SearchResults, WikiError> {
        let document = Html::parse_document(html);
        parse_search_results(&document, query, self.max_results)
    }
}
