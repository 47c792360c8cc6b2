use crate::CLAP_STYLING;
use clap::{arg, command};
use summonses_core::harvest::DEFAULT_TEMPLATE;
use url::Url;

fn category_arg() -> clap::Arg {
    arg!(-c --"category" <CATEGORY>)
        .required(false)
        .help("Which dataset to collect links for")
        .value_parser(["summonses", "collisions"])
        .default_value("summonses")
}

fn format_arg() -> clap::Arg {
    arg!(-f --"format" <FORMAT>)
        .required(false)
        .help("Report format: text, json, csv")
        .value_parser(["text", "json", "csv"])
        .default_value("text")
}

fn output_arg() -> clap::Arg {
    arg!(-o --"output" <PATH>)
        .required(false)
        .help("Save report to file (default: display to screen)")
        .value_parser(clap::value_parser!(std::path::PathBuf))
}

fn skip_malformed_arg() -> clap::Arg {
    arg!(--"skip-malformed")
        .required(false)
        .help("Skip links whose month/year cannot be parsed instead of failing")
        .action(clap::ArgAction::SetTrue)
}

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("summonses")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("summonses")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("links")
                .about(
                    "Walk the yearly traffic report archive outward from a start year and list \
                every monthly dataset link found.",
                )
                .arg(category_arg())
                .arg(
                    arg!(-y --"start-year" <YEAR>)
                        .required(false)
                        .help("Year to start walking from (default: current year)")
                        .value_parser(clap::value_parser!(i32)),
                )
                .arg(
                    arg!(-r --"retries" <ATTEMPTS>)
                        .required(false)
                        .help("Attempts per archive page before treating it as missing")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("5"),
                )
                .arg(
                    arg!(-t --"template" <TEMPLATE>)
                        .required(false)
                        .help("Archive page URL with a single {year} placeholder")
                        .default_value(DEFAULT_TEMPLATE),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64).range(1..))
                        .default_value("10"),
                )
                .arg(skip_malformed_arg())
                .arg(format_arg())
                .arg(output_arg()),
        )
        .subcommand(
            command!("parse")
                .about("Extract dataset links from a saved archive page")
                .arg(
                    arg!(<FILE>)
                        .help("HTML file to read ('-' for stdin)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(category_arg())
                .arg(
                    arg!(-b --"base-url" <URL>)
                        .required(false)
                        .help("URL the page was saved from, used to resolve relative links")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(skip_malformed_arg())
                .arg(format_arg())
                .arg(output_arg()),
        )
}
