use thiserror::Error;

/// A team name that does not belong to the division.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown team `{name}`")]
pub struct UnknownTeam {
    pub name: String,
}

impl UnknownTeam {
    pub fn new(name: impl Into<String>) -> Self {
        UnknownTeam { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DivisionError {
    #[error("expected {expected} teams, got {found}")]
    TeamCountMismatch { expected: usize, found: usize },
    #[error("team `{0}` appears more than once")]
    DuplicateTeam(String),
    #[error("team `{team}` lists {found} opponents, expected {expected}")]
    OppositionLength {
        team: String,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("input is empty")]
    Empty,
    #[error("line {line}: expected team count, found `{token}`")]
    BadHeader { line: usize, token: String },
    #[error("line {line}: missing {field}")]
    MissingField { line: usize, field: &'static str },
    #[error("line {line}: invalid {field} `{token}`")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        token: String,
    },
    #[error("line {line}: expected {expected} records, input ended after {found}")]
    MissingTeams {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: unexpected trailing data `{token}`")]
    TrailingData { line: usize, token: String },
    #[error(transparent)]
    Division(#[from] DivisionError),
}
