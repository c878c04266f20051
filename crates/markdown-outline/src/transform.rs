//! Whole-document entry points. Each call is independent and keeps no state.

use crate::error::OutlineResult;
use crate::numbering::{add_numbers, remove_numbers};
use crate::toc::{insert_toc, remove_toc, update_toc, TocOptions, TocOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberingMode {
    Add,
    Remove,
    /// Remove then add, so reordered or edited headers are renumbered cleanly.
    Update,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TocMode {
    Add,
    Remove,
    Update,
}

pub fn numbering_transform(contents: &str, mode: NumberingMode) -> OutlineResult<String> {
    match mode {
        NumberingMode::Add => add_numbers(contents),
        NumberingMode::Remove => remove_numbers(contents),
        NumberingMode::Update => add_numbers(&remove_numbers(contents)?),
    }
}

pub fn toc_transform(
    contents: &str,
    mode: TocMode,
    options: &TocOptions,
) -> OutlineResult<TocOutcome> {
    match mode {
        TocMode::Add => insert_toc(contents, options),
        TocMode::Remove => remove_toc(contents, &options.marker),
        TocMode::Update => update_toc(contents, options),
    }
}
