//! Per-file reports for markdown-outline runs and their renderers.

use std::fmt::Write as _;
use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// Output format requested by the caller.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ReportFormat {
    #[default]
    Plain,
    Json,
}

/// What happened to a single file.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Updated,
    Unchanged,
    Skipped { reason: String },
    Failed { message: String },
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ReportSummary {
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Outcome of one command across every discovered file.
#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub command: String,
    pub dry_run: bool,
    #[serde(serialize_with = "serialize_timestamp")]
    pub generated_at: DateTime<Utc>,
    pub files: Vec<FileReport>,
}

impl Report {
    pub fn new(command: impl Into<String>, dry_run: bool, files: Vec<FileReport>) -> Self {
        Self {
            command: command.into(),
            dry_run,
            generated_at: Utc::now(),
            files,
        }
    }

    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary::default();
        for file in &self.files {
            match file.status {
                FileStatus::Updated => summary.updated += 1,
                FileStatus::Unchanged => summary.unchanged += 1,
                FileStatus::Skipped { .. } => summary.skipped += 1,
                FileStatus::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }

    pub fn has_failures(&self) -> bool {
        self.files
            .iter()
            .any(|file| matches!(file.status, FileStatus::Failed { .. }))
    }

    pub fn render(&self, format: ReportFormat) -> String {
        match format {
            ReportFormat::Plain => render_plain(self),
            ReportFormat::Json => render_json(self),
        }
    }
}

fn serialize_timestamp<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Secs, true))
}

fn render_plain(report: &Report) -> String {
    let mut output = String::new();
    let updated_label = if report.dry_run {
        "would update"
    } else {
        "updated"
    };

    for file in &report.files {
        let path = file.path.display();
        let _ = match &file.status {
            FileStatus::Updated => writeln!(output, "{updated_label} {path}"),
            FileStatus::Unchanged => writeln!(output, "unchanged {path}"),
            FileStatus::Skipped { reason } => writeln!(output, "skipped {path}: {reason}"),
            FileStatus::Failed { message } => writeln!(output, "failed {path}: {message}"),
        };
        if let Some(diff) = &file.diff {
            output.push_str(diff);
            if !diff.ends_with('\n') {
                output.push('\n');
            }
        }
    }

    let summary = report.summary();
    let _ = writeln!(
        output,
        "{}: {} {}, {} unchanged, {} skipped, {} failed",
        report.command,
        summary.updated,
        updated_label,
        summary.unchanged,
        summary.skipped,
        summary.failed
    );
    output
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    report: &'a Report,
    summary: ReportSummary,
}

fn render_json(report: &Report) -> String {
    let payload = JsonReport {
        report,
        summary: report.summary(),
    };
    serde_json::to_string_pretty(&payload).unwrap_or_else(|_| "{}".to_string())
}
