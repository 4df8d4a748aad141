use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Grid has no cells")]
    Empty,
    #[error("Grid row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Grid dimension {0} does not fit a coordinate")]
    TooLarge(usize),
}

pub type Result<T> = core::result::Result<T, GridError>;
