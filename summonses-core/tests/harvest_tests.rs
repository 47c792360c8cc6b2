// Tests for archive harvesting

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use summonses_core::harvest::{Category, HarvestOptions, execute_harvest};
use summonses_scanner::{FetchOutcome, HttpFetcher, MonthYear, PageFetcher, ScanError};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

const TEMPLATE: &str = "http://archive.test/reports/archive_{year}.shtml";

/// Serves fixed pages by URL; everything else is absent.
struct StaticFetcher {
    pages: HashMap<String, String>,
}

impl StaticFetcher {
    fn new(pages: &[(i32, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(year, body)| (TEMPLATE.replace("{year}", &year.to_string()), body.to_string()))
                .collect(),
        }
    }
}

impl PageFetcher for StaticFetcher {
    fn fetch(&self, url: &str) -> FetchOutcome {
        match self.pages.get(url) {
            Some(body) => FetchOutcome::Body(body.clone()),
            None => FetchOutcome::Absent,
        }
    }
}

fn options(category: Category, start_year: i32) -> HarvestOptions {
    HarvestOptions {
        template: TEMPLATE.to_string(),
        start_year,
        retries: 2,
        category,
        skip_malformed: false,
        show_progress_bars: false,
    }
}

fn month(year: i32, month: u32) -> MonthYear {
    MonthYear::new(year, month).unwrap()
}

const PAGE_2012: &str = r#"<html><body>
    <a href="../data/sum_2012_01.pdf">Summonses January 2012</a>
    <a href="../data/acc_2012_01.pdf">Collisions January 2012</a>
    <a href="http://mirror.test/sum_2012_02.pdf">Summonses February 2012</a>
</body></html>"#;

const PAGE_2013: &str = r#"<html><body>
    <a href="../data/sum_2013_01.pdf">Summonses January 2013</a>
</body></html>"#;

#[test]
fn test_harvest_merges_pages_and_resolves_links() {
    let fetcher = StaticFetcher::new(&[(2012, PAGE_2012), (2013, PAGE_2013)]);

    let report = execute_harvest(options(Category::Summonses, 2013), fetcher, None).unwrap();

    assert_eq!(report.category, Category::Summonses);
    assert_eq!(
        report.pages.iter().map(|p| p.year).collect::<Vec<_>>(),
        vec![2012, 2013]
    );
    assert_eq!(report.pages[0].links_found, 2);
    assert_eq!(report.pages[1].links_found, 1);
    assert_eq!(report.links.len(), 3);
    assert_eq!(
        report.links[&month(2012, 1)],
        "http://archive.test/data/sum_2012_01.pdf"
    );
    assert_eq!(
        report.links[&month(2012, 2)],
        "http://mirror.test/sum_2012_02.pdf"
    );
    assert_eq!(
        report.links[&month(2013, 1)],
        "http://archive.test/data/sum_2013_01.pdf"
    );
}

#[test]
fn test_harvest_collisions_category() {
    let fetcher = StaticFetcher::new(&[(2012, PAGE_2012), (2013, PAGE_2013)]);

    let report = execute_harvest(options(Category::Collisions, 2012), fetcher, None).unwrap();

    assert_eq!(report.links.len(), 1);
    assert_eq!(
        report.links[&month(2012, 1)],
        "http://archive.test/data/acc_2012_01.pdf"
    );
}

#[test]
fn test_harvest_newer_page_wins_duplicate_month() {
    let late_listing = r#"<a href="corrected.pdf">Summonses December 2012</a>"#;
    let early_listing = r#"<a href="original.pdf">Summonses December 2012</a>"#;
    let fetcher = StaticFetcher::new(&[(2012, early_listing), (2013, late_listing)]);

    let report = execute_harvest(options(Category::Summonses, 2012), fetcher, None).unwrap();

    assert_eq!(
        report.links[&month(2012, 12)],
        "http://archive.test/reports/corrected.pdf"
    );
}

#[test]
fn test_harvest_malformed_date_fails() {
    let bad = r#"<a href="x.pdf">Summonses Q3 2012</a>"#;
    let fetcher = StaticFetcher::new(&[(2012, bad)]);

    let result = execute_harvest(options(Category::Summonses, 2012), fetcher, None);
    assert!(matches!(result, Err(ScanError::MalformedDate { .. })));
}

#[test]
fn test_harvest_malformed_date_skipped_on_request() {
    let bad = r#"<a href="x.pdf">Summonses Q3 2012</a>
                 <a href="y.pdf">Summonses October 2012</a>"#;
    let fetcher = StaticFetcher::new(&[(2012, bad)]);

    let mut opts = options(Category::Summonses, 2012);
    opts.skip_malformed = true;
    let report = execute_harvest(opts, fetcher, None).unwrap();

    assert_eq!(report.links.len(), 1);
    assert!(report.links.contains_key(&month(2012, 10)));
}

#[test]
fn test_harvest_bad_template_is_configuration_error() {
    let fetcher = StaticFetcher::new(&[]);
    let mut opts = options(Category::Summonses, 2012);
    opts.template = "http://archive.test/reports/archive.shtml".to_string();

    let result = execute_harvest(opts, fetcher, None);
    assert!(matches!(result, Err(ScanError::Configuration(_))));
}

#[test]
fn test_harvest_reports_progress() {
    let messages: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let messages_clone = messages.clone();
    let fetcher = StaticFetcher::new(&[(2012, PAGE_2012)]);

    execute_harvest(
        options(Category::Summonses, 2012),
        fetcher,
        Some(Arc::new(move |msg: String| {
            messages_clone.lock().unwrap().push(msg);
        })),
    )
    .unwrap();

    let messages = messages.lock().unwrap();
    assert!(messages.iter().any(|m| m.contains("archive_2012.shtml")));
    assert!(messages.iter().any(|m| m == "Found 2 Summonses links in 2012"));
}

/// End to end over HTTP. The blocking client runs off the async runtime.
#[tokio::test(flavor = "multi_thread")]
async fn test_harvest_over_http() {
    let mock_server = MockServer::start().await;

    for (year, body) in [(2012, PAGE_2012), (2013, PAGE_2013)] {
        Mock::given(method("GET"))
            .and(path(format!("/reports/archive_{}.shtml", year)))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_string(body),
            )
            .mount(&mock_server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/reports/archive_2011.shtml"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&mock_server)
        .await;

    let template = format!("{}/reports/archive_{{year}}.shtml", mock_server.uri());
    let base = mock_server.uri();

    let report = tokio::task::spawn_blocking(move || {
        let fetcher = HttpFetcher::with_timeout(5).unwrap();
        let mut opts = options(Category::Summonses, 2012);
        opts.template = template;
        execute_harvest(opts, fetcher, None).unwrap()
    })
    .await
    .unwrap();

    assert_eq!(report.pages.len(), 2);
    assert_eq!(report.links.len(), 3);
    assert_eq!(
        report.links[&month(2013, 1)],
        format!("{}/data/sum_2013_01.pdf", base)
    );
}
