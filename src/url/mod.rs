//! URL handling module for Kanoon-Indexer
//!
//! This module turns listing hrefs into request targets and canonical
//! document references. All URLs are built on the configured base URL.

mod document;

pub use document::{extract_doc_id, DocumentReference};

use url::Url;

/// Resolves a site-relative href against the base URL
///
/// # Examples
///
/// ```
/// use kanoon_indexer::url::resolve;
/// use url::Url;
///
/// let base = Url::parse("https://indiankanoon.org").unwrap();
/// let url = resolve(&base, "/browse/supremecourt/").unwrap();
/// assert_eq!(url.as_str(), "https://indiankanoon.org/browse/supremecourt/");
/// ```
pub fn resolve(base: &Url, href: &str) -> Result<Url, url::ParseError> {
    base.join(href.trim())
}

/// Builds the URL of one page of a month's search results
///
/// The month href already carries the search query; the page number is
/// appended as an extra query parameter.
pub fn page_url(
    base: &Url,
    month_href: &str,
    page_param: &str,
    page: u32,
) -> Result<Url, url::ParseError> {
    let mut url = resolve(base, month_href)?;
    url.query_pairs_mut()
        .append_pair(page_param, &page.to_string());
    Ok(url)
}
