//! JSON contract spoken with the problem generator and solver service.
//!
//! Generation responses are decoded strictly. Solver responses are decoded leniently: only the presence of the
//! `results` array is required, anything malformed below it becomes a missing result or a hole in a trace.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sweeptrace_core::{Coord, Grid, Move, MoveKind, MoveList, Outcome, Problem, parse_result};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("Solver response is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("Solver response has no `results` field")]
    MissingResults,
    #[error("Solver response `results` is {0}, expected an array")]
    ResultsNotArray(&'static str),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub difficulty: String,
    pub count: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub problems: Vec<GeneratedProblem>,
}

/// A problem as the generator hands it out, grid still in solver orientation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedProblem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    pub grid: Vec<Vec<i32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cols: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_y: Option<i32>,
}

impl GeneratedProblem {
    pub fn from_grid(grid: Vec<Vec<i32>>) -> Self {
        Self {
            id: None,
            grid,
            rows: None,
            cols: None,
            start_x: None,
            start_y: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRequest {
    pub problems: Vec<ProblemPayload>,
}

impl ProcessRequest {
    pub fn from_problems<'a>(problems: impl IntoIterator<Item = &'a Problem>) -> Self {
        Self {
            problems: problems.into_iter().map(ProblemPayload::from).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemPayload {
    pub id: u32,
    pub grid: Vec<Vec<i32>>,
}

impl From<&Problem> for ProblemPayload {
    fn from(problem: &Problem) -> Self {
        Self {
            id: problem.id(),
            grid: problem.grid().to_raw(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessResponse {
    /// One entry per solved problem, `None` where the entry was not an object.
    pub results: Vec<Option<ProblemResult>>,
}

impl ProcessResponse {
    pub fn from_json(text: &str) -> Result<Self, ShapeError> {
        let value: Value =
            serde_json::from_str(text).map_err(|err| ShapeError::InvalidJson(err.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, ShapeError> {
        let results = match value {
            Value::Object(mut fields) => fields.remove("results"),
            _ => None,
        };

        let entries = match results {
            None | Some(Value::Null) => return Err(ShapeError::MissingResults),
            Some(Value::Array(entries)) => entries,
            Some(other) => return Err(ShapeError::ResultsNotArray(json_kind(&other))),
        };

        let results = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(result) => Some(result),
                Err(err) => {
                    log::warn!("ignoring malformed result #{}: {}", index, err);
                    None
                }
            })
            .collect();
        Ok(Self { results })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(default)]
    pub moves: Option<Vec<Value>>,
    #[serde(default)]
    pub outcome: Option<String>,
}

impl ProblemResult {
    /// Decodes the trace, turning entries that are not valid moves into holes.
    pub fn move_list(&self) -> MoveList {
        let Some(moves) = &self.moves else {
            return MoveList::new();
        };

        moves
            .iter()
            .enumerate()
            .map(|(index, value)| {
                let mv = decode_move(value);
                if mv.is_none() && !value.is_null() {
                    log::warn!("problem {:?}: unreadable move #{}: {}", self.id, index, value);
                }
                mv
            })
            .collect()
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome.as_deref().map_or(Outcome::Pending, parse_outcome)
    }
}

/// Move record as the solver writes it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMove {
    pub x: i64,
    pub y: i64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl WireMove {
    pub fn to_move(&self) -> Option<Move> {
        let kind = parse_move_kind(&self.kind)?;
        let x = Coord::try_from(self.x).ok()?;
        let y = Coord::try_from(self.y).ok()?;
        let result = match &self.result {
            Some(Value::String(text)) => parse_result(text),
            Some(Value::Number(number)) => number.as_i64().and_then(|n| i32::try_from(n).ok()),
            _ => None,
        };
        // flags never carry a value
        let result = result.filter(|_| kind.reveals());
        Some(Move::new((x, y), kind, result))
    }
}

impl From<&Move> for WireMove {
    fn from(mv: &Move) -> Self {
        Self {
            x: mv.x.into(),
            y: mv.y.into(),
            kind: move_kind_name(mv.kind).to_owned(),
            result: mv.result.map(|result| Value::String(result.to_string())),
        }
    }
}

fn decode_move(value: &Value) -> Option<Move> {
    WireMove::deserialize(value).ok()?.to_move()
}

pub fn parse_move_kind(name: &str) -> Option<MoveKind> {
    match name {
        "reveal" => Some(MoveKind::Reveal),
        "flag" => Some(MoveKind::Flag),
        "exploded" => Some(MoveKind::Exploded),
        _ => None,
    }
}

pub const fn move_kind_name(kind: MoveKind) -> &'static str {
    match kind {
        MoveKind::Reveal => "reveal",
        MoveKind::Flag => "flag",
        MoveKind::Exploded => "exploded",
    }
}

pub fn parse_outcome(name: &str) -> Outcome {
    match name {
        "win" => Outcome::Win,
        "lose" => Outcome::Lose,
        "error" => Outcome::Error,
        "" => Outcome::Pending,
        other => {
            log::warn!("unknown outcome {:?}, treating as pending", other);
            Outcome::Pending
        }
    }
}

/// Converts a generated problem into the display-oriented grid used for replay.
pub fn grid_of(problem: &GeneratedProblem) -> sweeptrace_core::Result<Grid> {
    Grid::from_raw(&problem.grid)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
