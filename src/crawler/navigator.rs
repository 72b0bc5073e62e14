//! Listing navigator: typed link extraction from browse pages
//!
//! Every listing level is recognised by href prefix and, where needed, by
//! link text:
//! - category links start with the browse prefix and carry the collection name
//! - year links start with the browse prefix and their text is a year
//! - month links start with the search prefix, minus the whole-year link
//! - document links start with `/docfragment` (courts) or `/doc` (acts)

use crate::config::SiteConfig;
use crate::crawler::fetcher::ParsedDocument;
use crate::state::{CollectionKind, YearRange};
use crate::url::DocumentReference;
use scraper::Selector;
use url::Url;

/// An anchor's href and visible text, both trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub href: String,
    pub text: String,
}

/// A browse link whose text is a year inside the requested range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearLink {
    pub year: u16,
    pub href: String,
}

/// Document references found on one month page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentLinks {
    /// Canonical references, in page order
    pub references: Vec<DocumentReference>,

    /// Links that had the document prefix
    pub matched: usize,

    /// Prefixed links whose href carried no usable id
    pub skipped: usize,
}

impl DocumentLinks {
    /// True when the page had no document links at all: the end of a month
    pub fn is_empty(&self) -> bool {
        self.matched == 0
    }
}

/// Returns every anchor whose (href, text) satisfies the predicate
pub fn extract_links<P>(doc: &ParsedDocument, predicate: P) -> Vec<Link>
where
    P: Fn(&str, &str) -> bool,
{
    let Ok(anchor) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    doc.html()
        .select(&anchor)
        .filter_map(|element| {
            let href = element.value().attr("href")?.trim();
            let text = element.text().collect::<String>();
            let text = text.trim();
            predicate(href, text).then(|| Link {
                href: href.to_string(),
                text: text.to_string(),
            })
        })
        .collect()
}

/// Href prefix of document links for a collection kind
pub fn document_prefix(kind: CollectionKind) -> &'static str {
    match kind {
        CollectionKind::Court => "/docfragment",
        CollectionKind::Act => "/doc",
    }
}

/// Link extraction rules for one site
#[derive(Debug, Clone)]
pub struct Navigator {
    site: SiteConfig,
    base: Url,
}

impl Navigator {
    pub fn new(site: SiteConfig, base: Url) -> Self {
        Self { site, base }
    }

    /// Every category link on a root listing
    pub fn category_links(&self, doc: &ParsedDocument) -> Vec<Link> {
        extract_links(doc, |href, _| href.starts_with(&self.site.browse_prefix))
    }

    /// The category link whose text is exactly the collection name
    pub fn find_category(&self, doc: &ParsedDocument, name: &str) -> Option<Link> {
        let mut matches = self
            .category_links(doc)
            .into_iter()
            .filter(|link| link.text == name);

        let first = matches.next()?;
        let extra = matches.count();
        if extra > 0 {
            tracing::warn!(
                "{} more category links named '{}'; using {}",
                extra,
                name,
                first.href
            );
        }
        Some(first)
    }

    /// Year links inside the range, in page order, each year once
    pub fn year_links(&self, doc: &ParsedDocument, range: YearRange) -> Vec<YearLink> {
        let mut seen = std::collections::HashSet::new();

        extract_links(doc, |href, _| href.starts_with(&self.site.browse_prefix))
            .into_iter()
            .filter_map(|link| {
                let year = parse_year(&link.text)?;
                range.contains(year).then_some(YearLink {
                    year,
                    href: link.href,
                })
            })
            .filter(|link| seen.insert(link.year))
            .collect()
    }

    /// Per-month search links, excluding the whole-year link
    pub fn month_links(&self, doc: &ParsedDocument) -> Vec<Link> {
        extract_links(doc, |href, text| {
            href.starts_with(&self.site.search_prefix) && text != self.site.whole_year_label
        })
    }

    /// Document references on a month page
    ///
    /// Links with the document prefix but no recognisable id are counted
    /// in `skipped` and logged, never treated as errors.
    pub fn document_links(&self, doc: &ParsedDocument, kind: CollectionKind) -> DocumentLinks {
        let prefix = document_prefix(kind);
        let links = extract_links(doc, |href, _| href.starts_with(prefix));

        let mut found = DocumentLinks {
            matched: links.len(),
            ..DocumentLinks::default()
        };

        for link in links {
            match DocumentReference::from_href(&self.base, &link.href, kind) {
                Some(reference) => found.references.push(reference),
                None => {
                    tracing::warn!("Skipping link without a document id: {}", link.href);
                    found.skipped += 1;
                }
            }
        }

        found
    }
}

/// Parses link text that is exactly a four-digit year
fn parse_year(text: &str) -> Option<u16> {
    if text.len() != 4 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
