use anyhow::Result;
use clap::{Arg, ArgMatches, Command, value_parser};
use folio_core::build_site;
use tracing::{error, info};

use crate::config::load_build_config;

pub fn add_build_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("static")
                .long("static")
                .value_name("DIR")
                .help("Static assets copied into the output directory"),
        )
        .arg(
            Arg::new("templates")
                .long("templates")
                .value_name("DIR")
                .help("Directory holding main.html and page templates"),
        )
        .arg(
            Arg::new("content")
                .long("content")
                .value_name("DIR")
                .help("Directory of markdown files with front matter"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .help("Output directory, deleted and rebuilt on every run"),
        )
        .arg(
            Arg::new("year")
                .long("year")
                .value_name("YEAR")
                .value_parser(value_parser!(i32))
                .help("Fixed value for meta.Year instead of the current year"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file")
                .default_value("./folio.toml"),
        )
}

pub fn make_command() -> Command {
    add_build_args(Command::new("folio"))
        .about("Build a static site from markdown content")
        .version(env!("CARGO_PKG_VERSION"))
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let config = load_build_config(args)?;
    let build_config = config.build_config();

    let report = build_site(build_config).inspect_err(|e| {
        error!(
            error = e as &dyn std::error::Error,
            stage = %e.stage(),
            "Failed to build site"
        );
    })?;

    info!(
        "Built {} pages ({} articles, {} skipped) in {}",
        report.generated.len(),
        report.articles,
        report.skipped.len(),
        build_config.output_dir.display()
    );

    Ok(())
}
