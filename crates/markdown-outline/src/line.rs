/// A single `\n`-delimited line of a document together with its byte span.
///
/// `end` is exclusive and stops before the newline, so the newline (if any)
/// lives at `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRecord<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Split `contents` on `\n`. A trailing newline yields a final empty line so
/// that joining the records back with `\n` reproduces the input exactly.
pub fn split_lines(contents: &str) -> Vec<LineRecord<'_>> {
    let mut lines = Vec::new();
    let mut offset = 0usize;

    for text in contents.split('\n') {
        lines.push(LineRecord {
            text,
            start: offset,
            end: offset + text.len(),
        });
        offset += text.len() + 1;
    }

    lines
}

pub(crate) fn join_lines<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut output = String::new();
    for (idx, line) in lines.into_iter().enumerate() {
        if idx > 0 {
            output.push('\n');
        }
        output.push_str(line.as_ref());
    }
    output
}
