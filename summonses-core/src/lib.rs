pub mod harvest;
pub mod report;

use colored::Colorize;

pub use harvest::{
    Category, HarvestOptions, HarvestProgressCallback, HarvestReport, PageSummary,
    execute_harvest, extract_category_links,
};
pub use report::{ReportFormat, render_report, save_report};

pub fn print_banner() {
    println!(
        "{} {}",
        "summonses".bright_cyan().bold(),
        env!("CARGO_PKG_VERSION").bright_black()
    );
    println!(
        "{}\n",
        "NYPD traffic report archive link harvester".bright_black()
    );
}
