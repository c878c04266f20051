use crate::error::{OutlineError, OutlineResult};
use crate::line::{split_lines, LineRecord};

/// Deepest header level a document may use.
pub const MAX_LEVEL: usize = 6;

/// Lines starting with this marker open or close a fenced code block.
pub const FENCE_MARKER: &str = "```";

const HEADER_MARK: u8 = b'#';
const INLINE_SPACE: &[char] = &[' ', '\t'];

/// ATX header view over a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLine<'a> {
    pub level: usize,
    /// Existing `1.2.3` style prefix, if the header carries one.
    pub number: Option<&'a str>,
    /// Header text with the marks, whitespace and any number prefix removed.
    pub text: &'a str,
    pub raw: &'a str,
}

impl<'a> HeaderLine<'a> {
    /// Everything after the `#` marks, trimmed. Includes the number prefix.
    pub fn title(&self) -> &'a str {
        self.raw[self.level..].trim()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    CodeFenceToggle,
    /// Inside a fenced code block; never interpreted.
    Fenced,
    Header(HeaderLine<'a>),
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannedLine<'a> {
    pub line: LineRecord<'a>,
    pub kind: LineKind<'a>,
}

impl ScannedLine<'_> {
    pub fn is_plain(&self) -> bool {
        matches!(self.kind, LineKind::Plain)
    }
}

/// Per-document line classifier. The only state is whether a fence is open.
#[derive(Debug, Default)]
pub struct HeaderScanner {
    in_fence: bool,
}

impl HeaderScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_fence(&self) -> bool {
        self.in_fence
    }

    /// Classify the line at zero-based `index`, advancing the fence state.
    pub fn classify<'a>(&mut self, index: usize, line: &'a str) -> OutlineResult<LineKind<'a>> {
        if line.starts_with(FENCE_MARKER) {
            self.in_fence = !self.in_fence;
            return Ok(LineKind::CodeFenceToggle);
        }

        if self.in_fence {
            return Ok(LineKind::Fenced);
        }

        match parse_header(index, line)? {
            Some(header) => Ok(LineKind::Header(header)),
            None => Ok(LineKind::Plain),
        }
    }
}

/// Classify every line of `contents`. Fails on the first header deeper than
/// [`MAX_LEVEL`].
pub fn scan_document(contents: &str) -> OutlineResult<Vec<ScannedLine<'_>>> {
    let mut scanner = HeaderScanner::new();
    split_lines(contents)
        .into_iter()
        .enumerate()
        .map(|(idx, line)| {
            let kind = scanner.classify(idx, line.text)?;
            Ok(ScannedLine { line, kind })
        })
        .collect()
}

fn parse_header(index: usize, line: &str) -> OutlineResult<Option<HeaderLine<'_>>> {
    let level = line.bytes().take_while(|byte| *byte == HEADER_MARK).count();
    if level == 0 {
        return Ok(None);
    }

    let after_marks = &line[level..];
    let body = after_marks.trim_start_matches(INLINE_SPACE);
    if body.len() == after_marks.len() {
        return Ok(None);
    }

    if level > MAX_LEVEL {
        return Err(OutlineError::HeaderLevelExceeded {
            line: index + 1,
            snippet: line.chars().take(10).collect(),
            max: MAX_LEVEL,
        });
    }

    let (number, text) = split_number_prefix(body);
    Ok(Some(HeaderLine {
        level,
        number,
        text,
        raw: line,
    }))
}

/// Split a leading `\d+(\.\d+)*` group followed by whitespace off `body`.
fn split_number_prefix(body: &str) -> (Option<&str>, &str) {
    let bytes = body.as_bytes();
    let mut pos = 0usize;
    let mut prefix_end = 0usize;

    loop {
        let digits = bytes[pos..]
            .iter()
            .take_while(|byte| byte.is_ascii_digit())
            .count();
        if digits == 0 {
            break;
        }
        pos += digits;
        prefix_end = pos;

        let continues = bytes.get(pos) == Some(&b'.')
            && bytes.get(pos + 1).is_some_and(|byte| byte.is_ascii_digit());
        if !continues {
            break;
        }
        pos += 1;
    }

    if prefix_end == 0 {
        return (None, body);
    }

    let rest = &body[prefix_end..];
    let text = rest.trim_start_matches(INLINE_SPACE);
    if text.len() == rest.len() {
        return (None, body);
    }

    (Some(&body[..prefix_end]), text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(line: &str) -> HeaderLine<'_> {
        match HeaderScanner::new().classify(0, line).unwrap() {
            LineKind::Header(header) => header,
            other => panic!("expected header, got {other:?}"),
        }
    }

    #[test]
    fn parses_header_with_number_prefix() {
        let parsed = header("### 1.2.10 Details here");
        assert_eq!(parsed.level, 3);
        assert_eq!(parsed.number, Some("1.2.10"));
        assert_eq!(parsed.text, "Details here");
        assert_eq!(parsed.title(), "1.2.10 Details here");
    }

    #[test]
    fn accepts_tabs_between_parts() {
        let parsed = header("##\t3\tTabbed");
        assert_eq!(parsed.level, 2);
        assert_eq!(parsed.number, Some("3"));
        assert_eq!(parsed.text, "Tabbed");
    }

    #[test]
    fn incomplete_number_stays_in_text() {
        assert_eq!(header("# 1. Intro").number, None);
        assert_eq!(header("# 1. Intro").text, "1. Intro");
        assert_eq!(header("# 1.2.x Intro").text, "1.2.x Intro");
        assert_eq!(header("# 42").text, "42");
    }

    #[test]
    fn marks_without_whitespace_are_plain() {
        let mut scanner = HeaderScanner::new();
        assert_eq!(scanner.classify(0, "#hashtag").unwrap(), LineKind::Plain);
        assert_eq!(scanner.classify(1, "#").unwrap(), LineKind::Plain);
        assert_eq!(scanner.classify(2, "#########").unwrap(), LineKind::Plain);
        assert_eq!(scanner.classify(3, " # indented").unwrap(), LineKind::Plain);
    }

    #[test]
    fn fence_toggles_suppress_headers() {
        let mut scanner = HeaderScanner::new();
        assert_eq!(
            scanner.classify(0, "```rust").unwrap(),
            LineKind::CodeFenceToggle
        );
        assert!(scanner.in_fence());
        assert_eq!(scanner.classify(1, "# not a header").unwrap(), LineKind::Fenced);
        assert_eq!(scanner.classify(2, "####### deep").unwrap(), LineKind::Fenced);
        assert_eq!(scanner.classify(3, "```").unwrap(), LineKind::CodeFenceToggle);
        assert!(!scanner.in_fence());
        assert!(matches!(
            scanner.classify(4, "# header").unwrap(),
            LineKind::Header(_)
        ));
    }

    #[test]
    fn rejects_levels_beyond_max() {
        let err = scan_document("# ok\n\n####### Too deep header").unwrap_err();
        assert_eq!(
            err,
            OutlineError::HeaderLevelExceeded {
                line: 3,
                snippet: "####### To".into(),
                max: MAX_LEVEL,
            }
        );
    }
}
