use clap::ArgMatches;
use colored::Colorize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use summonses_core::harvest::{
    Category, HarvestOptions, HarvestReport, execute_harvest, extract_category_links,
};
use summonses_core::report::{ReportFormat, render_report, save_report};
use summonses_scanner::HttpFetcher;
use summonses_scanner::fetch::DEFAULT_TIMEOUT_SECS;
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Log to stderr so reports on stdout stay clean. `RUST_LOG` overrides the default.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

pub fn parse_category(value: &str) -> Result<Category, String> {
    Category::from_str(value).ok_or_else(|| format!("Unknown category '{}'", value))
}

pub fn parse_format(value: &str) -> Result<ReportFormat, String> {
    ReportFormat::from_str(value).ok_or_else(|| format!("Unknown report format '{}'", value))
}

/// Expand a leading `~` in a user-supplied output path
pub fn expand_output_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&raw).into_owned())
}

/// Read a saved page from disk, or stdin when the path is `-`
pub fn load_page(path: &Path) -> Result<String, String> {
    if path == Path::new("-") {
        return io::read_to_string(io::stdin()).map_err(|e| format!("Failed to read stdin: {}", e));
    }
    fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))
}

/// Build a report for a single page that was saved locally
pub fn build_page_report(
    document: &str,
    category: Category,
    base_url: Option<&Url>,
    skip_malformed: bool,
) -> Result<HarvestReport, String> {
    let links = extract_category_links(
        document,
        category,
        base_url.map(Url::as_str),
        skip_malformed,
    )
    .map_err(|e| e.to_string())?;

    Ok(HarvestReport {
        category,
        pages: Vec::new(),
        links,
    })
}

/// Print the report, or write it to `output` if one was given
pub fn emit_report(
    report: &HarvestReport,
    format: ReportFormat,
    output: Option<&PathBuf>,
) -> Result<(), String> {
    match output {
        Some(path) => {
            let path = expand_output_path(path);
            save_report(report, format, &path).map_err(|e| {
                format!("Failed to save report to {}: {}", path.display(), e)
            })?;
            println!(
                "{} Report saved to {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            );
        }
        None => {
            let rendered = render_report(report, format).map_err(|e| e.to_string())?;
            print!("{}", rendered);
        }
    }
    Ok(())
}

fn common_options(sub_matches: &ArgMatches) -> Result<(Category, ReportFormat, bool), String> {
    let category = parse_category(
        sub_matches
            .get_one::<String>("category")
            .map(String::as_str)
            .unwrap_or("summonses"),
    )?;
    let format = parse_format(
        sub_matches
            .get_one::<String>("format")
            .map(String::as_str)
            .unwrap_or("text"),
    )?;
    let skip_malformed = sub_matches.get_flag("skip-malformed");
    Ok((category, format, skip_malformed))
}

pub fn handle_links(sub_matches: &ArgMatches, quiet: bool) -> Result<(), String> {
    let (category, format, skip_malformed) = common_options(sub_matches)?;
    let defaults = HarvestOptions::default();
    let start_year = sub_matches
        .get_one::<i32>("start-year")
        .copied()
        .unwrap_or(defaults.start_year);
    let retries = sub_matches
        .get_one::<u32>("retries")
        .copied()
        .unwrap_or(defaults.retries);
    let template = sub_matches
        .get_one::<String>("template")
        .cloned()
        .unwrap_or(defaults.template);
    let timeout = *sub_matches
        .get_one::<u64>("timeout")
        .unwrap_or(&DEFAULT_TIMEOUT_SECS);
    let output = sub_matches.get_one::<PathBuf>("output");

    if !quiet {
        println!("{} {} links", "→".blue(), category.to_string().bright_white());
        println!("Template: {}", template);
        println!("Start year: {}", start_year);
        println!("Attempts per page: {}\n", retries);
    }

    info!(%template, start_year, retries, %category, "Starting harvest");
    let fetcher = HttpFetcher::with_timeout(timeout).map_err(|e| e.to_string())?;
    let options = HarvestOptions {
        template,
        start_year,
        retries,
        category,
        skip_malformed,
        show_progress_bars: !quiet,
    };

    let report =
        execute_harvest(options, fetcher, None).map_err(|e| format!("Harvest failed: {}", e))?;

    if !quiet {
        println!();
    }
    emit_report(&report, format, output)
}

pub fn handle_parse(sub_matches: &ArgMatches) -> Result<(), String> {
    let (category, format, skip_malformed) = common_options(sub_matches)?;
    let file = sub_matches
        .get_one::<PathBuf>("FILE")
        .ok_or_else(|| "A page to parse must be provided".to_string())?;
    let base_url = sub_matches.get_one::<Url>("base-url");
    let output = sub_matches.get_one::<PathBuf>("output");

    let document = load_page(file)?;
    let report = build_page_report(&document, category, base_url, skip_malformed)?;
    emit_report(&report, format, output)
}
