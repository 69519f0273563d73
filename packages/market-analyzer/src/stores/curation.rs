//! The user-editable working set of candidate URLs.

use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::{AnalyzerError, Result};

/// Where a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlOrigin {
    Discovered,
    Manual,
}

/// A URL the user may include in the next analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateUrl {
    pub url: String,
    pub included: bool,
    pub origin: UrlOrigin,
}

/// Ordered, duplicate-free list of candidate URLs for the current session.
///
/// Discovered URLs come first in discovery order; manual additions follow in
/// the order they were added.
#[derive(Debug, Default)]
pub struct CurationStore {
    entries: Vec<CandidateUrl>,
}

impl CurationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start over from a fresh discovery run.
    ///
    /// Drops every existing entry, manual ones included. Duplicates in
    /// `urls` keep their first position.
    pub fn replace_discovered(&mut self, urls: impl IntoIterator<Item = String>) {
        self.entries.clear();
        for url in urls {
            if !self.contains(&url) {
                self.entries.push(CandidateUrl {
                    url,
                    included: true,
                    origin: UrlOrigin::Discovered,
                });
            }
        }
        debug!(count = self.entries.len(), "Loaded discovered URLs");
    }

    /// Add a URL by hand.
    ///
    /// Returns `Ok(false)` when the URL is already listed (the store is left
    /// as it was) and an error when the text is not an absolute http(s) URL.
    pub fn add(&mut self, url: &str) -> Result<bool> {
        let url = url.trim();
        validate_url(url)?;

        if self.contains(url) {
            return Ok(false);
        }

        self.entries.push(CandidateUrl {
            url: url.to_string(),
            included: true,
            origin: UrlOrigin::Manual,
        });
        Ok(true)
    }

    /// Flag a URL in or out of the next run. Returns false for unknown URLs.
    pub fn set_included(&mut self, url: &str, included: bool) -> bool {
        let url = url.trim();
        match self.entries.iter_mut().find(|e| e.url == url) {
            Some(entry) => {
                entry.included = included;
                true
            }
            None => false,
        }
    }

    /// Remove a URL entirely. Returns false for unknown URLs.
    pub fn remove(&mut self, url: &str) -> bool {
        let url = url.trim();
        let before = self.entries.len();
        self.entries.retain(|e| e.url != url);
        self.entries.len() != before
    }

    /// Included URLs, in list order.
    pub fn active_urls(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.included)
            .map(|e| e.url.clone())
            .collect()
    }

    pub fn entries(&self) -> &[CandidateUrl] {
        &self.entries
    }

    pub fn contains(&self, url: &str) -> bool {
        let url = url.trim();
        self.entries.iter().any(|e| e.url == url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Accept only absolute http(s) URLs with a host.
pub fn validate_url(raw: &str) -> Result<Url> {
    let invalid = || AnalyzerError::InvalidUrl {
        url: raw.to_string(),
    };

    let parsed = Url::parse(raw).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(invalid());
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(urls: &[&str]) -> CurationStore {
        let mut store = CurationStore::new();
        store.replace_discovered(urls.iter().map(|u| u.to_string()));
        store
    }

    #[test]
    fn test_add_twice_keeps_one_entry() {
        let mut store = CurationStore::new();

        assert!(store.add("https://x.lt").unwrap());
        assert!(!store.add("https://x.lt").unwrap());

        assert_eq!(store.len(), 1);
        assert_eq!(store.entries()[0].origin, UrlOrigin::Manual);
    }

    #[test]
    fn test_exclusion_preserves_order() {
        let mut store = store_with(&["https://a.lt", "https://b.lt", "https://c.lt"]);

        assert!(store.set_included("https://b.lt", false));

        assert_eq!(store.active_urls(), vec!["https://a.lt", "https://c.lt"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_reinclude() {
        let mut store = store_with(&["https://a.lt", "https://b.lt"]);
        store.set_included("https://a.lt", false);
        store.set_included("https://a.lt", true);

        assert_eq!(store.active_urls(), vec!["https://a.lt", "https://b.lt"]);
    }

    #[test]
    fn test_manual_urls_follow_discovered() {
        let mut store = store_with(&["https://a.lt"]);
        store.add("https://manual-1.lt").unwrap();
        store.add("https://manual-2.lt").unwrap();

        assert_eq!(
            store.active_urls(),
            vec!["https://a.lt", "https://manual-1.lt", "https://manual-2.lt"]
        );
    }

    #[test]
    fn test_add_of_discovered_url_is_noop() {
        let mut store = store_with(&["https://a.lt"]);
        store.set_included("https://a.lt", false);

        assert!(!store.add("https://a.lt").unwrap());
        assert!(store.active_urls().is_empty());
    }

    #[test]
    fn test_add_rejects_relative_and_non_http() {
        let mut store = CurationStore::new();

        assert!(matches!(
            store.add("shop.lt/product"),
            Err(AnalyzerError::InvalidUrl { .. })
        ));
        assert!(store.add("ftp://shop.lt/file").is_err());
        assert!(store.add("").is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_replace_discovered_drops_everything() {
        let mut store = store_with(&["https://a.lt"]);
        store.add("https://manual.lt").unwrap();

        store.replace_discovered(vec!["https://b.lt".to_string(), "https://b.lt".to_string()]);

        assert_eq!(store.active_urls(), vec!["https://b.lt"]);
    }

    #[test]
    fn test_unknown_url_operations() {
        let mut store = store_with(&["https://a.lt"]);

        assert!(!store.set_included("https://zzz.lt", false));
        assert!(!store.remove("https://zzz.lt"));
        assert!(store.remove("https://a.lt"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_lookups_ignore_surrounding_whitespace() {
        let mut store = store_with(&["https://a.lt", "https://b.lt"]);
        store.add("  https://manual.lt\n").unwrap();

        assert!(store.contains(" https://manual.lt "));
        assert!(store.set_included("  https://a.lt ", false));
        assert_eq!(store.active_urls(), vec!["https://b.lt", "https://manual.lt"]);

        assert!(store.remove("\thttps://manual.lt  "));
        assert_eq!(store.active_urls(), vec!["https://b.lt"]);
        assert_eq!(store.len(), 2);
    }
}
