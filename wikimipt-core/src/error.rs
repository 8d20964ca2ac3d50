//! Error type shared by every wiki operation.

use thiserror::Error;

/// Errors that can occur while searching for or assembling a teacher profile.
///
/// A lookup either fully succeeds or fails with one of these; no partial
/// profile is ever returned.
#[derive(Debug, Error)]
pub enum WikiError {
    /// The search query contains characters outside the Russian lowercase
    /// alphabet and space.
    #[error("unsupported characters in query {query:?}")]
    BadQuery {
        /// The query as received, before normalization.
        query: String,
    },

    /// A non-whitelisted tag was met while rendering in strict mode.
    #[error("not supported tag: {tag}")]
    UnsupportedTag {
        /// Name of the offending element.
        tag: String,
    },

    /// The page does not have the layout the assembler expects.
    #[error("unexpected page structure: {0}")]
    StructuralMismatch(String),

    /// A rating summary is neither a score nor the no-votes placeholder.
    #[error("cannot parse rating {text:?}: {reason}")]
    NumericParse {
        /// The rating text as found on the page.
        text: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The biography walk ran out of siblings before the terminator tag.
    #[error("biography section is not terminated by <{terminator}>")]
    UnterminatedSection {
        /// Tag name the walk was waiting for.
        terminator: &'static str,
    },

    /// The markup nests deeper than the renderer allows.
    #[error("markup nested deeper than {limit} levels")]
    TooDeep {
        /// Configured depth limit.
        limit: usize,
    },

    /// No teacher title in the listing starts with the requested prefix.
    #[error("no teacher title starts with {prefix:?}")]
    NameNotFound {
        /// The prefix that was looked up.
        prefix: String,
    },

    /// The page could not be fetched.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// A link or image source could not be turned into an absolute URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}
