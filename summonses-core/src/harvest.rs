use chrono::Datelike;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use summonses_scanner::error::Result;
use summonses_scanner::links::{COLLISION_PREFIX, SUMMONS_PREFIX};
use summonses_scanner::{ArchiveWalker, LinkExtractor, LinkMap, PageFetcher};
use tracing::{debug, info};

/// Yearly archive pages of the NYPD traffic reports
pub const DEFAULT_TEMPLATE: &str =
    "http://www.nyc.gov/html/nypd/html/traffic_reports/traffic_report_archive_{year}.shtml";

pub const DEFAULT_RETRIES: u32 = summonses_scanner::walker::DEFAULT_RETRIES;

/// Which monthly dataset to collect links for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Summonses,
    Collisions,
}

impl Category {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "summonses" | "summons" => Some(Category::Summonses),
            "collisions" | "collision" => Some(Category::Collisions),
            _ => None,
        }
    }

    /// Leading word of the anchor text for this category
    pub fn prefix(&self) -> &'static str {
        match self {
            Category::Summonses => SUMMONS_PREFIX,
            Category::Collisions => COLLISION_PREFIX,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Summonses => write!(f, "Summonses"),
            Category::Collisions => write!(f, "Collisions"),
        }
    }
}

/// Options for configuring a harvest
pub struct HarvestOptions {
    pub template: String,
    pub start_year: i32,
    pub retries: u32,
    pub category: Category,
    pub skip_malformed: bool,
    pub show_progress_bars: bool,
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
            start_year: chrono::Local::now().year(),
            retries: DEFAULT_RETRIES,
            category: Category::Summonses,
            skip_malformed: false,
            show_progress_bars: false,
        }
    }
}

/// Callback for reporting harvest progress
pub type HarvestProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

#[derive(Debug, Clone, Serialize)]
pub struct PageSummary {
    pub year: i32,
    pub url: String,
    pub links_found: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct HarvestReport {
    pub category: Category,
    /// Archive pages that were fetched, oldest first
    pub pages: Vec<PageSummary>,
    pub links: LinkMap,
}

/// Extract one category's links from a single page.
pub fn extract_category_links(
    document: &str,
    category: Category,
    base_url: Option<&str>,
    skip_malformed: bool,
) -> Result<LinkMap> {
    let mut extractor = LinkExtractor::new(category.prefix())?.skip_malformed(skip_malformed);
    if let Some(base) = base_url {
        extractor = extractor.with_base_url(base)?;
    }
    extractor.extract(document)
}

/// Walk the archive and collect every link for the chosen category.
///
/// Each page's hrefs are resolved against that page's own URL. Pages are
/// merged oldest first, so if two years list the same month the newer page
/// wins.
pub fn execute_harvest<F: PageFetcher>(
    options: HarvestOptions,
    fetcher: F,
    progress_callback: Option<HarvestProgressCallback>,
) -> Result<HarvestReport> {
    let HarvestOptions {
        template,
        start_year,
        retries,
        category,
        skip_malformed,
        show_progress_bars,
    } = options;

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting archive walk...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let pb_clone = progress_bar.clone();
    let callback_clone = progress_callback.clone();
    let walker = ArchiveWalker::new(&template, fetcher)?
        .with_retries(retries)
        .with_progress_callback(Box::new(move |year: i32, url: &str| {
            if let Some(ref pb) = pb_clone {
                pb.set_message(format!("Fetching {} archive...", year));
            }
            if let Some(ref callback) = callback_clone {
                callback(format!("Fetching {}", url));
            }
        }));

    let mut pages = walker.walk(start_year);
    pages.sort_by_key(|page| page.year);

    let mut links = LinkMap::new();
    let mut summaries = Vec::with_capacity(pages.len());
    for page in &pages {
        let page_links =
            extract_category_links(&page.body, category, Some(&page.url), skip_malformed)?;
        debug!("{} {} links on {}", page_links.len(), category, page.url);

        if let Some(ref callback) = progress_callback {
            callback(format!(
                "Found {} {} links in {}",
                page_links.len(),
                category,
                page.year
            ));
        }

        summaries.push(PageSummary {
            year: page.year,
            url: page.url.clone(),
            links_found: page_links.len(),
        });
        links.extend(page_links);
    }

    if let Some(ref pb) = progress_bar {
        pb.finish_with_message(format!(
            "Harvest complete! {} pages, {} links",
            summaries.len(),
            links.len()
        ));
    }
    info!(
        pages = summaries.len(),
        links = links.len(),
        %category,
        "Harvest complete"
    );

    Ok(HarvestReport {
        category,
        pages: summaries,
        links,
    })
}
