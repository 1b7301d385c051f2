//! Parsing of typed sticker locations in `(row,col)` form.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A non-negative grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    /// Row index.
    pub row: usize,
    /// Column index.
    pub col: usize,
}

impl Location {
    /// Creates a location.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The location as signed compositing offsets `(row, col)`.
    pub fn offsets(&self) -> (i64, i64) {
        (self.row as i64, self.col as i64)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Reasons a location string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// No surrounding `(` and `)`.
    #[error("location must be wrapped in parentheses, e.g. (10,20)")]
    MissingParens,
    /// No comma between the coordinates.
    #[error("location must contain a comma between row and column")]
    MissingComma,
    /// A coordinate did not parse as an integer.
    #[error("{0:?} is not an integer")]
    NotInteger(String),
    /// A coordinate was below zero.
    #[error("coordinates must be non-negative, got {0}")]
    Negative(i64),
}

/// Parses `(row,col)`. Whitespace around the whole string and around each
/// number is ignored.
pub fn parse_location(text: &str) -> Result<Location, LocationError> {
    let inner = text
        .trim()
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or(LocationError::MissingParens)?;
    let (row, col) = inner.split_once(',').ok_or(LocationError::MissingComma)?;
    Ok(Location {
        row: parse_coordinate(row)?,
        col: parse_coordinate(col)?,
    })
}

fn parse_coordinate(token: &str) -> Result<usize, LocationError> {
    let token = token.trim();
    let value: i64 = token
        .parse()
        .map_err(|_| LocationError::NotInteger(token.to_string()))?;
    usize::try_from(value).map_err(|_| LocationError::Negative(value))
}

impl FromStr for Location {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_location(s)
    }
}
