//! URL rules for the wiki site.

use reqwest::Url;

use crate::config::SiteConfig;
use crate::error::WikiError;

/// Title of the category page that lists every teacher alphabetically.
const LISTING_TITLE: &str = "Категория:Преподаватели_по_алфавиту";

/// Host and scheme of the wiki, plus the URL shapes derived from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    host: String,
    scheme: String,
}

impl Site {
    /// Create a site description from a host (e.g. `wikimipt.org`) and scheme.
    pub fn new(host: impl Into<String>, scheme: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            scheme: scheme.into(),
        }
    }

    /// Build the site from the `[site]` config section.
    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(&config.host, &config.scheme)
    }

    /// The bare host, e.g. `wikimipt.org`.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Host-qualify a site-relative link.
    ///
    /// Links starting with `/` get the host prepended without a scheme, which
    /// Telegram accepts in MarkdownV2 links. Protocol-relative links (`//host/x`)
    /// already name their host and only lose the leading slashes. Anything else
    /// is returned as is.
    pub fn qualify(&self, link: &str) -> String {
        if let Some(rest) = link.strip_prefix("//") {
            rest.to_string()
        } else if link.starts_with('/') {
            format!("{}{}", self.host, link)
        } else {
            link.to_string()
        }
    }

    /// Full URL of a teacher's page. Spaces in the name become underscores.
    pub fn page_url(&self, name: &str) -> String {
        format!(
            "{}://{}/wiki/{}",
            self.scheme,
            self.host,
            name.replace(' ', "_")
        )
    }

    /// URL of the alphabetical listing starting at `first`.
    pub fn search_url(&self, first: char) -> String {
        format!(
            "{}://{}/index.php?title={}&from={}",
            self.scheme, self.host, LISTING_TITLE, first
        )
    }

    /// Turn a page link (relative, host-qualified or absolute) into a URL
    /// with a scheme, suitable for handing to Telegram as a photo source.
    ///
    /// # Errors
    ///
    /// Returns [`WikiError::InvalidUrl`] if the result does not parse.
    pub fn absolute_url(&self, link: &str) -> Result<Url, WikiError> {
        let qualified = self.qualify(link);
        let full = if qualified.contains("://") {
            qualified
        } else {
            format!("{}://{}", self.scheme, qualified)
        };
        Url::parse(&full).map_err(|e| WikiError::InvalidUrl(format!("{}: {}", full, e)))
    }
}

impl Default for Site {
    fn default() -> Self {
        Self::from_config(&SiteConfig::default())
    }
}
