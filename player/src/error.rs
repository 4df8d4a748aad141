use std::path::PathBuf;
use sweeptrace_core::GridError;
use sweeptrace_protocol::ShapeError;
use thiserror::Error;

/// Failure talking to the generator or solver service.
#[derive(Error, Debug)]
pub enum CollaboratorError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Service answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Could not decode response: {0}")]
    Decode(String),
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Problem {index} has a malformed grid: {source}")]
    MalformedGrid { index: usize, source: GridError },
    #[error("Asked for {requested} problems, generator returned {returned}")]
    TooFewProblems { requested: usize, returned: usize },
    #[error("No problems to process, generate problems first")]
    NoProblems,
    #[error("No problem at index {index}, collection has {len}")]
    NoSuchProblem { index: usize, len: usize },
    #[error(transparent)]
    Collaborator(CollaboratorError),
    #[error("Solver response is malformed: {0}")]
    ResultShape(ShapeError),
    #[error("Solver returned {results} results for {problems} problems")]
    ResultCountMismatch { problems: usize, results: usize },
}

impl From<CollaboratorError> for SessionError {
    fn from(err: CollaboratorError) -> Self {
        match err {
            CollaboratorError::Shape(shape) => Self::ResultShape(shape),
            other => Self::Collaborator(other),
        }
    }
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid settings: {0}")]
    Parse(#[from] toml::de::Error),
}

/// An interactive command line that could not be understood.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command `{0}`, try `help`")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("Invalid argument for `{command}`: {value}")]
    InvalidArgument { command: &'static str, value: String },
}
