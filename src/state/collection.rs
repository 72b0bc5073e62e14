//! Collection identity and the year range requested by the caller
use std::fmt;
use std::ops::RangeInclusive;
use thiserror::Error;

/// Whether a collection is a court or a legislative act
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum CollectionKind {
    Court,
    Act,
}

impl CollectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Court => "court",
            Self::Act => "act",
        }
    }

    /// Directory under the links root that holds this kind's year files
    ///
    /// These names are read by the PDF downloader and must not change.
    pub fn storage_dir(&self) -> &'static str {
        match self {
            Self::Court => "Court_PDFs",
            Self::Act => "Constitution_ACTs",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named court or act being crawled
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Collection {
    pub name: String,
    pub kind: CollectionKind,
}

impl Collection {
    pub fn new(name: impl Into<String>, kind: CollectionKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn court(name: impl Into<String>) -> Self {
        Self::new(name, CollectionKind::Court)
    }

    pub fn act(name: impl Into<String>) -> Self {
        Self::new(name, CollectionKind::Act)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.name)
    }
}

/// Why a requested year range was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum YearRangeError {
    #[error("years must be four-digit values, got {start}..={end}")]
    NotFourDigit { start: u16, end: u16 },

    #[error("start year {start} is after end year {end}")]
    Reversed { start: u16, end: u16 },
}

/// Inclusive range of four-digit years
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    start: u16,
    end: u16,
}

impl YearRange {
    /// Creates a range, rejecting reversed bounds and years outside 1000..=9999
    pub fn new(start: u16, end: u16) -> Result<Self, YearRangeError> {
        if !(1000..=9999).contains(&start) || !(1000..=9999).contains(&end) {
            return Err(YearRangeError::NotFourDigit { start, end });
        }
        if start > end {
            return Err(YearRangeError::Reversed { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn single(year: u16) -> Result<Self, YearRangeError> {
        Self::new(year, year)
    }

    pub fn start(&self) -> u16 {
        self.start
    }

    pub fn end(&self) -> u16 {
        self.end
    }

    pub fn contains(&self, year: u16) -> bool {
        (self.start..=self.end).contains(&year)
    }

    pub fn years(&self) -> RangeInclusive<u16> {
        self.start..=self.end
    }

    /// Number of years covered, always at least one
    pub fn year_count(&self) -> usize {
        usize::from(self.end - self.start) + 1
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
