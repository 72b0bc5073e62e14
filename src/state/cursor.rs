use crate::state::Collection;
use crate::url::page_url;
use std::fmt;
use url::Url;

/// Position of the page walk inside one month of one year
///
/// Lives only in memory; it is created fresh at page 0 for every month.
#[derive(Debug, Clone)]
pub struct PageCursor<'a> {
    collection: &'a Collection,
    year: u16,
    month_href: &'a str,
    page: u32,
}

impl<'a> PageCursor<'a> {
    pub fn new(collection: &'a Collection, year: u16, month_href: &'a str) -> Self {
        Self {
            collection,
            year,
            month_href,
            page: 0,
        }
    }

    pub fn collection(&self) -> &Collection {
        self.collection
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month_href(&self) -> &str {
        self.month_href
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Moves to the next page number
    pub fn advance(&mut self) {
        self.page += 1;
    }

    /// Returns true when the page number has hit the pagination ceiling
    pub fn exhausted(&self, pagination_limit: u32) -> bool {
        self.page >= pagination_limit
    }

    /// URL of the page the cursor currently points at
    pub fn url(&self, base: &Url, page_param: &str) -> Result<Url, url::ParseError> {
        page_url(base, self.month_href, page_param, self.page)
    }
}

impl fmt::Display for PageCursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} year {} month {} page {}",
            self.collection, self.year, self.month_href, self.page
        )
    }
}
