use std::fmt;

use crate::anchors::slugify;
use crate::error::OutlineResult;
use crate::line::join_lines;
use crate::scanner::{scan_document, LineKind, ScannedLine, MAX_LEVEL};

pub const DEFAULT_MARKER: &str = "<!-- Table of contents -->";
pub const DEFAULT_TITLE: &str = "Title";

const TITLE_UNDERLINE: &str = "===";
const INDENT_WIDTH: usize = 4;

/// Knobs for generating and placing a TOC block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocOptions {
    /// Literal line delimiting the managed block. Appears twice.
    pub marker: String,
    /// Leave the first header out of the TOC, treating it as the document title.
    pub skip_first_heading: bool,
    /// Title synthesised when the document has no setext title.
    pub default_title: String,
    /// Deepest header level listed.
    pub max_level: usize,
}

impl Default for TocOptions {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            skip_first_heading: false,
            default_title: DEFAULT_TITLE.to_string(),
            max_level: MAX_LEVEL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub level: usize,
    pub text: String,
    pub anchor: String,
}

impl TocEntry {
    /// Render as a bullet indented by nesting depth. Level 0 renders flush.
    pub fn render(&self) -> String {
        let indent = " ".repeat(self.level.saturating_sub(1) * INDENT_WIDTH);
        format!("{indent}- [{}](#{})", self.text, self.anchor)
    }
}

/// Reason a TOC operation left the document untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TocNotice {
    MarkerAlreadyPresent,
    MarkerUnpaired,
    MarkerAbsent,
}

impl fmt::Display for TocNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            TocNotice::MarkerAlreadyPresent => "table of contents already present",
            TocNotice::MarkerUnpaired => "table of contents marker is not paired",
            TocNotice::MarkerAbsent => "table of contents marker not found",
        };
        f.write_str(message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocOutcome {
    pub text: String,
    pub notice: Option<TocNotice>,
}

impl TocOutcome {
    fn rewritten(text: String) -> Self {
        Self { text, notice: None }
    }

    fn unchanged(contents: &str, notice: TocNotice) -> Self {
        Self {
            text: contents.to_string(),
            notice: Some(notice),
        }
    }
}

/// Collect TOC entries for every header outside fenced code, in document order.
pub fn generate_toc(contents: &str, options: &TocOptions) -> OutlineResult<Vec<TocEntry>> {
    let scanned = scan_document(contents)?;
    Ok(collect_entries(&scanned, options))
}

/// Insert a marker-delimited TOC after the document title.
///
/// A document that already contains the marker is returned unchanged.
pub fn insert_toc(contents: &str, options: &TocOptions) -> OutlineResult<TocOutcome> {
    let scanned = scan_document(contents)?;
    if !marker_lines(&scanned, &options.marker).is_empty() {
        return Ok(TocOutcome::unchanged(
            contents,
            TocNotice::MarkerAlreadyPresent,
        ));
    }

    let entries = collect_entries(&scanned, options);
    let eol = carriage_return(&scanned);
    let mut block = Vec::with_capacity(entries.len() + 2);
    block.push(format!("{}{eol}", options.marker));
    block.extend(entries.iter().map(|entry| format!("{}{eol}", entry.render())));
    block.push(format!("{}{eol}", options.marker));

    let originals = scanned.iter().map(|scanned| scanned.line.text.to_string());
    let text = match find_title(&scanned) {
        Some(underline) => {
            let mut lines: Vec<String> = originals.collect();
            let rest = lines.split_off(underline + 1);
            lines.extend(block);
            lines.extend(rest);
            join_lines(lines)
        }
        None => {
            log::debug!("no setext title found, using '{}'", options.default_title);
            let title = [
                format!("{}{eol}", options.default_title),
                format!("{TITLE_UNDERLINE}{eol}"),
            ];
            join_lines(title.into_iter().chain(block).chain(originals))
        }
    };

    Ok(TocOutcome::rewritten(text))
}

/// Remove the block between the first two marker lines, markers included.
pub fn remove_toc(contents: &str, marker: &str) -> OutlineResult<TocOutcome> {
    let scanned = scan_document(contents)?;

    match marker_lines(&scanned, marker).as_slice() {
        [] => Ok(TocOutcome::unchanged(contents, TocNotice::MarkerAbsent)),
        [_] => Ok(TocOutcome::unchanged(contents, TocNotice::MarkerUnpaired)),
        [first, second, ..] => {
            let start = scanned[*first].line.start;
            // Resume at the second marker's own terminator (`\r\n` or `\n`).
            let closing = scanned[*second].line;
            let end = closing.start + closing.text.trim_end_matches('\r').len();
            let mut text = contents[..start].trim_end().to_string();
            text.push_str(&contents[end..]);
            Ok(TocOutcome::rewritten(text))
        }
    }
}

/// Remove any existing block, then insert a freshly generated one.
pub fn update_toc(contents: &str, options: &TocOptions) -> OutlineResult<TocOutcome> {
    let removed = remove_toc(contents, &options.marker)?;
    if removed.notice == Some(TocNotice::MarkerUnpaired) {
        return Ok(removed);
    }
    insert_toc(&removed.text, options)
}

fn collect_entries(scanned: &[ScannedLine<'_>], options: &TocOptions) -> Vec<TocEntry> {
    scanned
        .iter()
        .filter_map(|scanned| match scanned.kind {
            LineKind::Header(header) => Some(header),
            _ => None,
        })
        .skip(usize::from(options.skip_first_heading))
        .filter(|header| header.level <= options.max_level)
        .map(|header| {
            let text = header.title().to_string();
            TocEntry {
                level: header.level,
                anchor: slugify(&text),
                text,
            }
        })
        .collect()
}

/// `"\r"` when the document's lines end in CRLF, empty otherwise.
fn carriage_return(scanned: &[ScannedLine<'_>]) -> &'static str {
    match scanned.first() {
        Some(first) if first.line.text.ends_with('\r') => "\r",
        _ => "",
    }
}

fn marker_lines(scanned: &[ScannedLine<'_>], marker: &str) -> Vec<usize> {
    let marker = marker.trim();
    scanned
        .iter()
        .enumerate()
        .filter(|(_, scanned)| scanned.is_plain() && scanned.line.text.trim() == marker)
        .map(|(idx, _)| idx)
        .collect()
}

/// Index of the `===` underline of the first setext title.
fn find_title(scanned: &[ScannedLine<'_>]) -> Option<usize> {
    scanned
        .windows(2)
        .position(|pair| {
            let (title, underline) = (&pair[0], &pair[1]);
            title.is_plain()
                && !title.line.text.trim().is_empty()
                && underline.is_plain()
                && is_title_underline(underline.line.text)
        })
        .map(|idx| idx + 1)
}

fn is_title_underline(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= TITLE_UNDERLINE.len() && trimmed.chars().all(|ch| ch == '=')
}
