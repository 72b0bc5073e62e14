//! Phases of the category → year → month → page walk
use std::fmt;

/// Where the coordinator currently is in a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Fetching the root listing and looking for the requested collection
    SelectCategory,

    /// Fetching the category page and filtering its year links
    SelectYear,

    /// A stored index was found for the current year; nothing is fetched
    ResumeHit,

    /// A fresh, empty index was opened for the current year
    CrawlYear,

    /// Fetching the year page and extracting its month links
    SelectMonth,

    /// Fetching page `n` of the current month
    CrawlPage(u32),

    /// Every month of the year is exhausted and the index was persisted
    YearComplete,

    /// The current year failed or was cancelled; its index was discarded
    YearAborted,

    /// All requested years were processed
    Done,
}

impl CrawlPhase {
    /// Returns true while a year's index is open and not yet persisted
    pub fn is_inside_year(&self) -> bool {
        matches!(
            self,
            Self::CrawlYear | Self::SelectMonth | Self::CrawlPage(_)
        )
    }

    /// Checks whether moving from `self` to `next` is a legal step
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        use CrawlPhase::*;

        let between_years = matches!(next, ResumeHit | CrawlYear | Done);

        match (*self, next) {
            // Everything already stored: skip the listing entirely
            (SelectCategory, ResumeHit) => true,
            (SelectCategory, SelectYear | Done) => true,
            (SelectYear, _) => between_years,
            (ResumeHit, _) => between_years,
            (CrawlYear, SelectMonth) => true,
            (SelectMonth, CrawlPage(0) | YearComplete) => true,
            (CrawlPage(n), CrawlPage(m)) => n.checked_add(1) == Some(m) || m == 0,
            (CrawlPage(_), YearComplete) => true,
            (YearComplete, _) => between_years,
            (YearAborted, _) => between_years,
            (from, YearAborted) => from.is_inside_year(),
            _ => false,
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelectCategory => write!(f, "select-category"),
            Self::SelectYear => write!(f, "select-year"),
            Self::ResumeHit => write!(f, "resume-hit"),
            Self::CrawlYear => write!(f, "crawl-year"),
            Self::SelectMonth => write!(f, "select-month"),
            Self::CrawlPage(n) => write!(f, "crawl-page({})", n),
            Self::YearComplete => write!(f, "year-complete"),
            Self::YearAborted => write!(f, "year-aborted"),
            Self::Done => write!(f, "done"),
        }
    }
}
