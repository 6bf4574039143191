use thiserror::Error;

/// Errors raised while parsing, solving or ranking a puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("Invalid puzzle length: {found} (expected {expected})")]
    InvalidLength { expected: usize, found: usize },

    #[error("Malformed puzzle: {0}")]
    MalformedInput(String),

    #[error("Unsolvable puzzle: no progress after {passes} passes, unsolved rows {unsolved:?}")]
    Unsolvable { passes: usize, unsolved: Vec<usize> },

    #[error("Relations form a cycle through entity {entity}")]
    Cyclic { entity: usize },

    #[error("Relation at ({row}, {column}) is unresolved")]
    Incomplete { row: usize, column: usize },
}

impl PuzzleError {
    /// True for errors caused by the shape of the raw input rather than its content.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::InvalidLength { .. } | Self::MalformedInput(_))
    }
}

pub type Result<T> = std::result::Result<T, PuzzleError>;
