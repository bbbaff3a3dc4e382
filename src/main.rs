use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use donation_analytics::{analyze_files, read_percentile, AnalyzerConfig, RepeatPolicy};

#[derive(Parser)]
#[command(
    name = "donation-analytics",
    about = "Percentile, running total and count of repeat-donor contributions.",
    version
)]
struct Cli {
    /// Pipe-delimited individual contributions file
    input: PathBuf,

    /// File whose first line is the percentile to report (1-100)
    percentile_file: PathBuf,

    /// Where to write one line per repeat donation
    output: PathBuf,

    /// How a donation is compared with the donor's earlier one
    #[arg(long, value_enum, default_value_t = RepeatPolicy::YearForward)]
    repeat_policy: RepeatPolicy,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    summary: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _r = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_target(false)
        .format_timestamp(None)
        .try_init();

    let percentile = read_percentile(&cli.percentile_file)?;
    let config = AnalyzerConfig::new(percentile).with_repeat_policy(cli.repeat_policy);

    let summary = analyze_files(config, &cli.input, &cli.output)?;

    if cli.summary {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}
