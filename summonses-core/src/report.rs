// Report generation from harvest results

use crate::harvest::HarvestReport;
use std::fs;
use std::path::Path;
use summonses_scanner::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            _ => None,
        }
    }
}

const DIVIDER: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";

pub fn generate_text_report(report: &HarvestReport) -> String {
    let mut out = String::new();
    out.push_str(DIVIDER);
    out.push('\n');
    out.push_str("# Summary:\n");
    out.push_str(&format!("  Category: {}\n", report.category));
    out.push_str(&format!("  Archive pages fetched: {}\n", report.pages.len()));
    out.push_str(&format!("  Links found: {}\n", report.links.len()));

    if let (Some(first), Some(last)) = (report.links.keys().next(), report.links.keys().last()) {
        out.push_str(&format!("  Coverage: {} - {}\n", first, last));
    }

    out.push('\n');
    out.push_str(DIVIDER);
    out.push('\n');

    if !report.pages.is_empty() {
        out.push_str("## Pages\n");
        for page in &report.pages {
            out.push_str(&format!(
                "  {} {:>3} links  {}\n",
                page.year, page.links_found, page.url
            ));
        }
        out.push('\n');
    }

    out.push_str("## Links\n");
    if report.links.is_empty() {
        out.push_str("  (none)\n");
    }
    for (month, url) in &report.links {
        out.push_str(&format!("  {:<15} {}\n", month.to_string(), url));
    }

    out
}

pub fn generate_json_report(report: &HarvestReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn generate_csv_report(report: &HarvestReport) -> String {
    let mut out = String::from("month,url\n");
    for (month, url) in &report.links {
        out.push_str(&format!(
            "{:04}-{:02},{}\n",
            month.year(),
            month.month(),
            csv_field(url)
        ));
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn render_report(report: &HarvestReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(report)),
        ReportFormat::Json => generate_json_report(report),
        ReportFormat::Csv => Ok(generate_csv_report(report)),
    }
}

pub fn save_report(report: &HarvestReport, format: ReportFormat, path: &Path) -> Result<()> {
    let rendered = render_report(report, format)?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, rendered)?;
    Ok(())
}
