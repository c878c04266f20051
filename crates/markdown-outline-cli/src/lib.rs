use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use markdown_outline::{NumberingMode, TocMode};
use markdown_outline_config::{Config, LoadOptions};
use markdown_outline_format::ReportFormat;
use markdown_outline_ops::{NumberOptions, Operations, RunOutcome, TocOverrides, TocRunOptions};

/// Entry point for CLI execution. Returns the desired exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(&cli);

    let mut load = LoadOptions::default();
    if let Some(path) = &cli.config {
        load = load.with_override_path(path);
    }
    let config = Config::load(load).context("failed to load configuration")?;
    let ops = Operations::new(config);

    let format = match cli.format.unwrap_or(FormatValue::Plain) {
        FormatValue::Plain => ReportFormat::Plain,
        FormatValue::Json => ReportFormat::Json,
    };

    let outcome = match cli.command {
        Command::Number(args) => handle_number(&ops, args)?,
        Command::Toc(args) => handle_toc(&ops, args)?,
    };

    if !cli.quiet || outcome.exit_code != 0 {
        emit(&outcome.report.render(format));
    }
    Ok(outcome.exit_code)
}

fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Error);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

fn handle_number(ops: &Operations, args: NumberArgs) -> Result<RunOutcome> {
    let NumberArgs {
        action,
        directory,
        dry_run,
    } = args;

    let mode = match action {
        ActionValue::Add => NumberingMode::Add,
        ActionValue::Remove => NumberingMode::Remove,
        ActionValue::Update => NumberingMode::Update,
    };

    let options = NumberOptions {
        root: directory,
        mode,
        dry_run,
    };
    Ok(ops.number(options)?)
}

fn handle_toc(ops: &Operations, args: TocArgs) -> Result<RunOutcome> {
    let TocArgs {
        action,
        directory,
        dry_run,
        marker,
        skip_first_heading,
    } = args;

    let mode = match action {
        ActionValue::Add => TocMode::Add,
        ActionValue::Remove => TocMode::Remove,
        ActionValue::Update => TocMode::Update,
    };

    let options = TocRunOptions {
        root: directory,
        mode,
        dry_run,
        overrides: TocOverrides {
            marker,
            skip_first_heading: skip_first_heading.then_some(true),
        },
    };
    Ok(ops.toc(options)?)
}

fn emit(content: &str) {
    print!("{}", content);
    if !content.ends_with('\n') {
        println!();
    }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Number Markdown headers and maintain tables of contents",
    propagate_version = true
)]
struct Cli {
    /// Use this config file on top of any discovered `.markdown-outline.toml`
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Report format (plain or json)
    #[arg(long, global = true, value_enum)]
    format: Option<FormatValue>,
    /// Only log errors and print the report only when a file failed
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    /// Log every discovered and skipped file
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add, remove or refresh hierarchical header numbers
    Number(NumberArgs),
    /// Add, remove or refresh the table of contents block
    Toc(TocArgs),
}

#[derive(Args)]
struct NumberArgs {
    #[arg(value_enum)]
    action: ActionValue,
    /// Directory searched recursively for `.md` files
    #[arg(value_name = "DIRECTORY")]
    directory: PathBuf,
    /// Show a diff of what would change without writing files
    #[arg(long = "dry-run")]
    dry_run: bool,
}

#[derive(Args)]
struct TocArgs {
    #[arg(value_enum)]
    action: ActionValue,
    /// Directory searched recursively for `.md` files
    #[arg(value_name = "DIRECTORY")]
    directory: PathBuf,
    /// Show a diff of what would change without writing files
    #[arg(long = "dry-run")]
    dry_run: bool,
    /// Marker line delimiting the TOC block
    #[arg(long, value_name = "TEXT")]
    marker: Option<String>,
    /// Leave the first header out of the TOC
    #[arg(long = "skip-first-heading")]
    skip_first_heading: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ActionValue {
    Add,
    Remove,
    /// Remove, then add
    Update,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatValue {
    Plain,
    Json,
}
