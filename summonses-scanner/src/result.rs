use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Calendar month and year, the only precision archive links carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthYear {
    year: i32,
    month: u32,
}

impl MonthYear {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self::from)
    }

    /// Parse `"<full month name> <4-digit year>"`, e.g. `"August 2012"`.
    ///
    /// Month names are matched case-insensitively. The separator may be any
    /// run of whitespace or a single `-`. Abbreviated month names are rejected.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (month, year) = match text.split_once(char::is_whitespace) {
            Some((month, rest)) => (month, rest.trim_start()),
            None => text.split_once('-')?,
        };
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let date = NaiveDate::parse_from_str(&format!("1 {} {}", month, year), "%d %B %Y").ok()?;

        // chrono's %B also accepts "Aug"
        if !date.format("%B").to_string().eq_ignore_ascii_case(month) {
            return None;
        }

        Some(Self::from(date))
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        // Constructors only ever build valid (year, month) pairs.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }
}

impl From<NaiveDate> for MonthYear {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first_day().format("%B %Y"))
    }
}

impl Serialize for MonthYear {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&format_args!("{:04}-{:02}", self.year, self.month))
    }
}

/// Month-year to dataset URL. Later anchors overwrite earlier ones.
pub type LinkMap = BTreeMap<MonthYear, String>;

/// Three-way outcome of a single page fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page exists; carries the response body.
    Body(String),
    /// The page definitively does not exist (404/410). Never retried.
    Absent,
    /// Indeterminate failure, eligible for retry.
    Transient(String),
}

/// One archive page collected by the walker.
#[derive(Debug, Clone, Serialize)]
pub struct ArchivePage {
    pub year: i32,
    pub url: String,
    #[serde(skip)]
    pub body: String,
}

impl ArchivePage {
    pub fn new(year: i32, url: String, body: String) -> Self {
        Self { year, url, body }
    }
}
