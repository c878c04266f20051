//! Header numbering and table-of-contents maintenance for Markdown text.
//!
//! Everything here operates on one document's full text and returns the
//! replacement text. No function touches the filesystem.

mod anchors;
mod error;
mod line;
mod numbering;
mod scanner;
mod toc;
mod transform;

pub use anchors::slugify;
pub use error::{OutlineError, OutlineResult};
pub use line::{split_lines, LineRecord};
pub use numbering::{add_numbers, remove_numbers, LevelCounters};
pub use scanner::{
    scan_document, HeaderLine, HeaderScanner, LineKind, ScannedLine, FENCE_MARKER, MAX_LEVEL,
};
pub use toc::{
    generate_toc, insert_toc, remove_toc, update_toc, TocEntry, TocNotice,
    TocOptions, TocOutcome, DEFAULT_MARKER, DEFAULT_TITLE,
};
pub use transform::{numbering_transform, toc_transform, NumberingMode, TocMode};
