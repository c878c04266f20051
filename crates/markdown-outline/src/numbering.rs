use crate::error::OutlineResult;
use crate::line::join_lines;
use crate::scanner::{scan_document, HeaderLine, LineKind, MAX_LEVEL};

/// Per-level header counters for a single numbering pass.
#[derive(Debug, Clone, Default)]
pub struct LevelCounters {
    counts: [usize; MAX_LEVEL + 1],
    last_level: Option<usize>,
}

impl LevelCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a header at `level` and return its rendered number, e.g. `1.2.1`.
    ///
    /// Moving to a shallower level clears every deeper counter. Ancestor
    /// levels that were never seen are taken to be `1`. Levels outside
    /// `1..=MAX_LEVEL` are clamped into that range.
    pub fn advance(&mut self, level: usize) -> String {
        let level = level.clamp(1, MAX_LEVEL);

        if let Some(last) = self.last_level {
            if level < last {
                self.counts[level + 1..].fill(0);
            }
        }
        self.last_level = Some(level);
        self.counts[level] += 1;

        for count in &mut self.counts[1..level] {
            if *count == 0 {
                *count = 1;
            }
        }

        self.counts[1..=level]
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }

    pub fn get(&self, level: usize) -> usize {
        self.counts.get(level).copied().unwrap_or(0)
    }
}

/// Number every header, replacing any prefix that is already there.
pub fn add_numbers(contents: &str) -> OutlineResult<String> {
    let scanned = scan_document(contents)?;
    let mut counters = LevelCounters::new();

    let lines = scanned.iter().map(|scanned| match scanned.kind {
        LineKind::Header(header) => {
            let number = counters.advance(header.level);
            format!("{} {} {}", marks(&header), number, header.text)
        }
        _ => scanned.line.text.to_string(),
    });

    Ok(join_lines(lines))
}

/// Strip number prefixes from every header.
pub fn remove_numbers(contents: &str) -> OutlineResult<String> {
    let scanned = scan_document(contents)?;

    let lines = scanned.iter().map(|scanned| match scanned.kind {
        LineKind::Header(header) => format!("{} {}", marks(&header), header.text),
        _ => scanned.line.text.to_string(),
    });

    Ok(join_lines(lines))
}

fn marks(header: &HeaderLine<'_>) -> String {
    "#".repeat(header.level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn siblings_increment() {
        let mut counters = LevelCounters::new();
        assert_eq!(counters.advance(1), "1");
        assert_eq!(counters.advance(2), "1.1");
        assert_eq!(counters.advance(2), "1.2");
        assert_eq!(counters.advance(3), "1.2.1");
        assert_eq!(counters.advance(1), "2");
        assert_eq!(counters.advance(2), "2.1");
    }

    #[test]
    fn ascending_resets_all_deeper_levels() {
        let mut counters = LevelCounters::new();
        counters.advance(1);
        counters.advance(2);
        counters.advance(3);
        counters.advance(4);
        assert_eq!(counters.advance(2), "1.2");
        assert_eq!(counters.get(3), 0);
        assert_eq!(counters.get(4), 0);
        assert_eq!(counters.advance(4), "1.2.1.1");
    }

    #[test]
    fn out_of_range_levels_are_clamped() {
        let mut counters = LevelCounters::new();
        assert_eq!(counters.advance(0), "1");
        assert_eq!(counters.advance(9), "1.1.1.1.1.1");
        assert_eq!(counters.advance(6), "1.1.1.1.1.2");
    }

    #[test]
    fn missing_ancestors_count_as_one() {
        let mut counters = LevelCounters::new();
        assert_eq!(counters.advance(3), "1.1.1");
        assert_eq!(counters.advance(1), "2");
    }
}
