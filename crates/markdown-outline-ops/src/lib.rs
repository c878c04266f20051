//! File-system operations for markdown-outline: discover Markdown files under
//! a directory, run a document transform on each, and collect a report.

mod apply;
mod discover;

use std::io;
use std::path::{Path, PathBuf};

use markdown_outline::{numbering_transform, toc_transform, NumberingMode, TocMode, TocOptions};
use markdown_outline_config::Config;
use markdown_outline_format::Report;
use markdown_outline_utils::parallel_map;
use thiserror::Error;

use crate::apply::{apply_to_file, Rewrite};

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("I/O error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("{path} is not a directory")]
    NotADirectory { path: PathBuf },
    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Options for `number` runs.
#[derive(Clone, Debug)]
pub struct NumberOptions {
    pub root: PathBuf,
    pub mode: NumberingMode,
    pub dry_run: bool,
}

/// Command-line overrides layered on top of `[toc]` settings.
#[derive(Clone, Debug, Default)]
pub struct TocOverrides {
    pub marker: Option<String>,
    pub skip_first_heading: Option<bool>,
}

/// Options for `toc` runs.
#[derive(Clone, Debug)]
pub struct TocRunOptions {
    pub root: PathBuf,
    pub mode: TocMode,
    pub dry_run: bool,
    pub overrides: TocOverrides,
}

#[derive(Debug)]
pub struct RunOutcome {
    pub report: Report,
    pub exit_code: i32,
}

/// Operation bundle wired from resolved configuration.
pub struct Operations {
    config: Config,
}

impl Operations {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// List the Markdown files a run over `root` would touch.
    pub fn discover(&self, root: &Path) -> Result<Vec<PathBuf>, OperationError> {
        discover::markdown_files(root, &self.config.scan)
    }

    /// Add, remove or refresh header numbers in every file under `options.root`.
    pub fn number(&self, options: NumberOptions) -> Result<RunOutcome, OperationError> {
        let NumberOptions {
            root,
            mode,
            dry_run,
        } = options;

        let command = format!("number {}", numbering_label(mode));
        self.run(command, &root, dry_run, move |contents| {
            numbering_transform(contents, mode).map(|text| Rewrite { text, notice: None })
        })
    }

    /// Insert, remove or refresh the TOC block in every file under `options.root`.
    pub fn toc(&self, options: TocRunOptions) -> Result<RunOutcome, OperationError> {
        let TocRunOptions {
            root,
            mode,
            dry_run,
            overrides,
        } = options;

        let toc_options = self.toc_options(overrides)?;
        let command = format!("toc {}", toc_label(mode));
        self.run(command, &root, dry_run, move |contents| {
            toc_transform(contents, mode, &toc_options).map(|outcome| Rewrite {
                text: outcome.text,
                notice: outcome.notice,
            })
        })
    }

    fn toc_options(&self, overrides: TocOverrides) -> Result<TocOptions, OperationError> {
        let settings = &self.config.toc;
        let marker = match overrides.marker {
            Some(marker) if marker.trim().is_empty() || marker.contains('\n') => {
                return Err(OperationError::InvalidInput(
                    "TOC marker must be a non-empty single line".into(),
                ));
            }
            Some(marker) => marker.trim().to_string(),
            None => settings.marker.clone(),
        };

        Ok(TocOptions {
            marker,
            skip_first_heading: overrides
                .skip_first_heading
                .unwrap_or(settings.skip_first_heading),
            default_title: settings.default_title.clone(),
            max_level: usize::from(settings.max_level),
        })
    }

    fn run<F>(
        &self,
        command: String,
        root: &Path,
        dry_run: bool,
        transform: F,
    ) -> Result<RunOutcome, OperationError>
    where
        F: Fn(&str) -> Result<Rewrite, markdown_outline::OutlineError> + Send + Sync,
    {
        let files = self.discover(root)?;
        log::debug!("{command}: {} file(s) under {}", files.len(), root.display());

        let reports = parallel_map(files, |path| apply_to_file(root, &path, dry_run, &transform));

        let report = Report::new(command, dry_run, reports);
        let exit_code = if report.has_failures() { 1 } else { 0 };
        Ok(RunOutcome { report, exit_code })
    }
}

fn numbering_label(mode: NumberingMode) -> &'static str {
    match mode {
        NumberingMode::Add => "add",
        NumberingMode::Remove => "remove",
        NumberingMode::Update => "update",
    }
}

fn toc_label(mode: TocMode) -> &'static str {
    match mode {
        TocMode::Add => "add",
        TocMode::Remove => "remove",
        TocMode::Update => "update",
    }
}
