//! Command implementations for the year splitter CLI
//!
//! Sets up logging, turns arguments into a [`PartitionConfig`], drives the
//! [`BatchRunner`] and reports the outcome.

use crate::app::models::{BatchReport, FileOutcome};
use crate::app::services::batch_runner::{BatchRunner, InputPlan};
use crate::cli::args::{Args, OutputFormat};
use crate::config::PartitionConfig;
use crate::{Error, Result};
use colored::*;
use indicatif::HumanDuration;
use std::time::Duration;
use tracing::{debug, info};

/// Main command runner
///
/// 1. Set up logging
/// 2. Validate arguments and build the configuration
/// 3. Partition every selected file (or only list them on a dry run)
/// 4. Print the summary
pub async fn run(args: Args) -> Result<BatchReport> {
    setup_logging(&args)?;

    info!("Starting year splitter");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;
    let config = args.to_config()?;
    debug!("Partition configuration: {:?}", config);

    info!("Input path: {}", args.input_path.display());
    info!("Output directory: {}", config.output_dir().display());

    let plan = InputPlan::discover(&args.input_path)?;

    if args.dry_run {
        return run_dry_run(&config, &plan);
    }

    let runner = BatchRunner::new(config).with_progress(args.show_progress());
    let report = runner.run_plan(&plan).await?;

    generate_final_report(&args, &report)?;

    Ok(report)
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("year_splitter={}", log_level)));

    let result = if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    result.map_err(|e| Error::configuration(format!("Failed to initialize logging: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// List the files a run would partition without touching the output directory
fn run_dry_run(config: &PartitionConfig, plan: &InputPlan) -> Result<BatchReport> {
    info!("Performing dry run - no files will be created");

    let files = plan.files();
    println!("\n{}", "Dry run".bright_yellow().bold());
    println!(
        "  {} {}",
        "Output directory:".bright_cyan(),
        config.output_dir().display()
    );
    println!(
        "  {} {}",
        "Files to process:".bright_cyan(),
        files.len().to_string().bright_white().bold()
    );
    for path in &files {
        println!("    {}", path.display());
    }

    Ok(BatchReport::default())
}

/// Print the final report in the requested format
fn generate_final_report(args: &Args, report: &BatchReport) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if !args.quiet {
                generate_human_report(report);
            }
            Ok(())
        }
        OutputFormat::Json => generate_json_report(report),
    }
}

/// Per-file, per-year counts followed by totals
fn generate_human_report(report: &BatchReport) {
    println!("\n{}", "Summary".bright_green().bold());

    for (file, counts) in report.summary_entries() {
        println!("  {}:", file.display_name().bright_white().bold());
        for (year, count) in counts {
            println!("    {}: {} records", year.to_string().bright_cyan(), count);
        }
    }

    let elapsed = Duration::from_millis(report.processing_time_ms.min(u64::MAX as u128) as u64);
    println!();
    println!(
        "  {} {}",
        "Files partitioned:".bright_cyan(),
        report.files_partitioned().to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Records written:".bright_cyan(),
        report.total_records().to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Time elapsed:".bright_cyan(),
        HumanDuration(elapsed).to_string().bright_white()
    );

    if report.files_skipped() > 0 {
        println!(
            "  {} {}",
            "Files skipped:".bright_yellow(),
            report.files_skipped().to_string().bright_yellow().bold()
        );
    }

    if report.files_failed() > 0 {
        println!(
            "  {} {}",
            "Files failed:".bright_red(),
            report.files_failed().to_string().bright_red().bold()
        );
        for file in &report.files {
            if let FileOutcome::Failed { reason } = &file.outcome {
                println!("    {} {}", file.display_name().bright_red(), reason);
            }
        }
    }
}

/// Print the report as JSON for scripting
fn generate_json_report(report: &BatchReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| Error::json_parsing("<report>", "Failed to serialize report", e))?;
    println!("{}", json);
    Ok(())
}
