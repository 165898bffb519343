use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use mediaorg::utils::format_duration;
use mediaorg::{
    Action, ChecksumIndex, ChecksumIndexBuilder, DateFormat, Deduplicator, LogFacade, Logger,
    RunConfig, RunReport,
};

#[derive(Debug, Clone, ValueEnum)]
enum ActionType {
    /// Copy one file per distinct content into the output directory
    Deduplicate,
    /// Copy files into date-named folders
    Organize,
}

#[derive(Debug, Clone, ValueEnum)]
enum DateFormatArg {
    /// Folder names like 2024-01-10 Description
    #[value(name = "YYYYMMDD")]
    Yyyymmdd,
    /// Folder names like 10-01-2024 Description
    #[value(name = "DDMMYYYY")]
    Ddmmyyyy,
}

#[derive(Parser)]
#[command(
    name = "mediaorg",
    version,
    about = "Deduplicate media folders or sort them into dated folders",
    long_about = "Scan input directories and either copy one file per distinct content into an output directory (keeping the relative layout), or copy every file into a YYYY-MM-DD folder taken from its parent directory name or its modification time."
)]
struct Cli {
    /// Action to perform
    #[arg(short, long, value_enum, help = "Action to perform")]
    action: ActionType,

    /// Input directories
    #[arg(
        short,
        long = "input",
        value_name = "PATH",
        required = true,
        help = "Input directory (can be specified multiple times)"
    )]
    input: Vec<PathBuf>,

    /// Output directory
    #[arg(short, long, value_name = "PATH", help = "Output directory")]
    output: PathBuf,

    /// Date token order used when reading folder names
    #[arg(
        short,
        long,
        value_enum,
        default_value = "YYYYMMDD",
        help = "Date format of dated folder names when organizing"
    )]
    date_format: DateFormatArg,

    /// Perform a dry run without making actual changes
    #[arg(short, long, help = "Show what would be done without copying anything")]
    preview: bool,

    /// Skip confirmation prompts
    #[arg(short, long, help = "Skip confirmation prompts")]
    yes: bool,

    /// Verbose output
    #[arg(short, long, help = "Log every file decision")]
    verbose: bool,

    /// Print the run report as JSON
    #[arg(long, help = "Print the run report as JSON instead of a summary")]
    json: bool,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Info
        } else {
            log::LevelFilter::Warn
        })
        .parse_default_env()
        .format_timestamp_secs()
        .init();

    let action = match args.action {
        ActionType::Deduplicate => Action::Deduplicate,
        ActionType::Organize => Action::Organize,
    };
    let date_format = match args.date_format {
        DateFormatArg::Yyyymmdd => DateFormat::YearMonthDay,
        DateFormatArg::Ddmmyyyy => DateFormat::DayMonthYear,
    };
    let config = RunConfig::new(action, args.input, args.output, date_format, args.preview)?;
    let logger: Arc<dyn Logger> = Arc::new(LogFacade);

    if config.preview() {
        println!("{}", style("🧪 Preview mode - no changes will be made").yellow().bold());
    } else if !args.yes {
        let proceed = dialoguer::Confirm::new()
            .with_prompt(format!(
                "Copy files into {}?",
                config.output_dir().display()
            ))
            .interact()
            .context("Failed to read confirmation")?;

        if !proceed {
            println!("{}", style("Operation cancelled").yellow());
            return Ok(());
        }
    }

    let started = Instant::now();
    let report = match config.action() {
        Action::Deduplicate => run_deduplicate(&config, logger, args.verbose, args.json)?,
        Action::Organize => {
            println!("{}", style("📅 Organizing files by date...").cyan().bold());
            mediaorg::run(&config, logger).context("Organize run failed")?
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print_summary();
        println!("Elapsed: {}", format_duration(started.elapsed()));
    }

    Ok(())
}

fn run_deduplicate(
    config: &RunConfig,
    logger: Arc<dyn Logger>,
    verbose: bool,
    json: bool,
) -> Result<RunReport> {
    println!("{}", style("🔍 Scanning directories for duplicate files...").cyan().bold());

    let progress = if verbose || json {
        ProgressBar::hidden()
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {pos} files hashed")
                .context("Invalid progress template")?,
        );
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    };

    let index = ChecksumIndexBuilder::new()
        .logger(logger.clone())
        .progress(progress)
        .scan(config.input_dirs())
        .context("Failed to scan input directories")?
        .build();

    if !json {
        display_duplicates(&index, verbose);
    }

    Deduplicator::new(config.output_dir(), config.preview())
        .with_logger(logger)
        .deduplicate(&index)
        .context("Deduplication failed")
}

fn display_duplicates(index: &ChecksumIndex, verbose: bool) {
    println!();
    println!("{}", style("📊 Duplicate Files Found").cyan().bold());
    println!("{}", style("=".repeat(40)).cyan());

    let mut groups = 0;
    for (hash, files) in index.duplicate_groups() {
        groups += 1;
        if verbose {
            println!();
            println!("{} {}", style("Hash:").bold(), hash);
            for (i, file) in files.iter().enumerate() {
                let marker = if i == 0 { "📄" } else { "🔗" };
                println!("  {} {}", marker, file.path.display());
            }
        } else {
            println!(
                "{} duplicate files for {}",
                files.len() - 1,
                files[0].path.file_name().unwrap_or_default().to_string_lossy()
            );
        }
    }

    println!();
    println!("Total files scanned: {}", index.total_files());
    println!("Unreadable files: {}", index.unreadable_files());
    println!("Distinct contents: {}", index.len());
    println!("Duplicate groups: {}", groups);
}
