use crate::error::{Result, ScanError};
use crate::fetch::PageFetcher;
use crate::result::{ArchivePage, FetchOutcome};
use tracing::{debug, info, warn};

pub const DEFAULT_RETRIES: u32 = 5;

pub type ProgressCallback = Box<dyn Fn(i32, &str)>;

/// A URL pattern with exactly one `{year}` placeholder.
///
/// `{{` and `}}` stand for literal braces. Any other placeholder, a second
/// `{year}`, or an unbalanced brace is a configuration error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearTemplate {
    before: String,
    after: String,
}

impl YearTemplate {
    pub fn parse(template: &str) -> Result<Self> {
        let mut before = String::new();
        let mut after = String::new();
        let mut seen_year = false;
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            let target = if seen_year { &mut after } else { &mut before };
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    target.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    target.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(ch) => name.push(ch),
                            None => {
                                return Err(ScanError::Configuration(format!(
                                    "unclosed '{{' in template '{}'",
                                    template
                                )));
                            }
                        }
                    }
                    if name != "year" {
                        return Err(ScanError::Configuration(format!(
                            "template '{}' has placeholder '{{{}}}', only '{{year}}' is allowed",
                            template, name
                        )));
                    }
                    if seen_year {
                        return Err(ScanError::Configuration(format!(
                            "template '{}' has more than one '{{year}}' placeholder",
                            template
                        )));
                    }
                    seen_year = true;
                }
                '}' => {
                    return Err(ScanError::Configuration(format!(
                        "unmatched '}}' in template '{}'",
                        template
                    )));
                }
                _ => target.push(c),
            }
        }

        if !seen_year {
            return Err(ScanError::Configuration(format!(
                "template '{}' has no '{{year}}' placeholder",
                template
            )));
        }

        Ok(Self { before, after })
    }

    pub fn render(&self, year: i32) -> String {
        format!("{}{}{}", self.before, year, self.after)
    }
}

/// Walks a year-indexed archive outward from a starting year.
///
/// The start year is fetched first and never gates expansion. The walk then
/// goes forward one year at a time until a page is absent, then backward the
/// same way. A page that keeps failing transiently for every attempt counts as
/// absent. Pages come back in that order: start year (if present), later years
/// ascending, earlier years descending.
pub struct ArchiveWalker<F> {
    fetcher: F,
    template: YearTemplate,
    retries: u32,
    progress_callback: Option<ProgressCallback>,
}

impl<F: PageFetcher> ArchiveWalker<F> {
    pub fn new(template: &str, fetcher: F) -> Result<Self> {
        Ok(Self {
            fetcher,
            template: YearTemplate::parse(template)?,
            retries: DEFAULT_RETRIES,
            progress_callback: None,
        })
    }

    /// Total attempts per year, including the first. Zero is treated as one.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries.max(1);
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn template(&self) -> &YearTemplate {
        &self.template
    }

    pub fn walk(&self, start_year: i32) -> Vec<ArchivePage> {
        info!("Walking archive outward from {}", start_year);

        let mut pages = Vec::new();
        if let Some(page) = self.fetch_year(start_year) {
            pages.push(page);
        } else {
            debug!("No page for start year {}, expanding anyway", start_year);
        }

        self.walk_direction(start_year, 1, &mut pages);
        self.walk_direction(start_year, -1, &mut pages);

        info!("Archive walk complete. Collected {} pages", pages.len());
        pages
    }

    fn walk_direction(&self, start_year: i32, step: i32, pages: &mut Vec<ArchivePage>) {
        let mut year = start_year;
        while let Some(next) = year.checked_add(step) {
            year = next;
            match self.fetch_year(year) {
                Some(page) => pages.push(page),
                None => {
                    debug!("Archive boundary reached at {}", year);
                    break;
                }
            }
        }
    }

    fn fetch_year(&self, year: i32) -> Option<ArchivePage> {
        let url = self.template.render(year);
        if let Some(ref callback) = self.progress_callback {
            callback(year, &url);
        }

        for attempt in 1..=self.retries {
            match self.fetcher.fetch(&url) {
                FetchOutcome::Body(body) => return Some(ArchivePage::new(year, url, body)),
                FetchOutcome::Absent => {
                    debug!("{} does not exist", url);
                    return None;
                }
                FetchOutcome::Transient(reason) => {
                    warn!(%url, attempt, retries = self.retries, %reason, "Fetch failed");
                }
            }
        }

        warn!("Giving up on {} after {} attempts", url, self.retries);
        None
    }
}
