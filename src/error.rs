use std::fmt;
use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Error decoding a puzzle from its ID string
#[derive(Debug, Error)]
#[cfg_attr(test, derive(PartialEq))]
pub struct DecodeError {
    kind: DecodeErrorKind,
    token: Option<char>,
    index: Option<usize>,
}

impl DecodeError {
    pub(crate) fn new(kind: DecodeErrorKind, token: char, index: usize) -> Self {
        Self {
            kind,
            token: Some(token),
            index: Some(index),
        }
    }

    pub(crate) const fn from_kind(kind: DecodeErrorKind) -> Self {
        Self {
            kind,
            token: None,
            index: None,
        }
    }

    pub fn kind(&self) -> DecodeErrorKind {
        self.kind
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DecodeErrorKind {
    InvalidHeader,
    InvalidCageGrid,
    InvalidOperatorRecord,
    Unsolvable,
}

impl Display for DecodeErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            DecodeErrorKind::InvalidHeader => "invalid header",
            DecodeErrorKind::InvalidCageGrid => "invalid cage grid",
            DecodeErrorKind::InvalidOperatorRecord => "invalid operator record",
            DecodeErrorKind::Unsolvable => "puzzle has no solution",
        };
        write!(f, "{}", s)
    }
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(token) = self.token {
            write!(f, ": '{}'", token)?;
        }
        if let Some(index) = self.index {
            write!(f, " at {}", index)?;
        }
        Ok(())
    }
}

/// The grid size has no known box configuration
#[derive(Debug, Error)]
#[cfg_attr(test, derive(PartialEq))]
#[error("unsupported grid size: {0}")]
pub struct UnsupportedGridSize(pub usize);

/// Error decoding a Killer Sudoku puzzle from its ID string
#[derive(Debug, Error)]
pub enum KillerIdError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    UnsupportedGridSize(#[from] UnsupportedGridSize),
}
