use crate::state::CollectionKind;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use url::Url;

/// Numeric id inside a court search-result fragment link
static FRAGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/docfragment/(\d+)/").expect("valid regex"));

/// Numeric id inside a direct document link
static DOC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/doc/(\d+)/").expect("valid regex"));

/// Canonical reference to one legal document: `{base}/doc/{id}/`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentReference {
    id: u64,
    url: String,
}

impl DocumentReference {
    /// Builds the canonical reference for a document id on the given site
    pub fn new(base: &Url, id: u64) -> Result<Self, url::ParseError> {
        let url = base.join(&format!("/doc/{}/", id))?;
        Ok(Self {
            id,
            url: url.into(),
        })
    }

    /// Extracts the id from a listing href and canonicalizes it
    ///
    /// Court listings link to `/docfragment/<id>/...`, act listings to
    /// `/doc/<id>/...`. Returns `None` when the href does not carry an id
    /// in the form expected for `kind`.
    pub fn from_href(base: &Url, href: &str, kind: CollectionKind) -> Option<Self> {
        let id = extract_doc_id(href, kind)?;
        Self::new(base, id).ok()
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn into_string(self) -> String {
        self.url
    }
}

impl fmt::Display for DocumentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Pulls the numeric document id out of an href using the pattern for `kind`
pub fn extract_doc_id(href: &str, kind: CollectionKind) -> Option<u64> {
    let pattern = match kind {
        CollectionKind::Court => &*FRAGMENT_RE,
        CollectionKind::Act => &*DOC_RE,
    };

    pattern
        .captures(href)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
