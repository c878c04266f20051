use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutlineError {
    #[error("\"{snippet}...\" (line {line}): level of header cannot exceed {max}")]
    HeaderLevelExceeded {
        line: usize,
        snippet: String,
        max: usize,
    },
}

pub type OutlineResult<T> = Result<T, OutlineError>;
