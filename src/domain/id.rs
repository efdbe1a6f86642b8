//! Record identifiers
//!
//! Identifiers are positive integers assigned by the store on first
//! insertion. `0` is never a valid identifier, so it is rejected both when
//! parsing user input and when decoding stored lines.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid record ID: expected a positive integer, got '{0}'")]
    InvalidFormat(String),

    #[error("Invalid record ID: identifiers start at 1")]
    Zero,
}

/// Identifier of a stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct RecordId(u64);

impl RecordId {
    /// The first identifier handed out by an empty store
    pub const FIRST: RecordId = RecordId(1);

    /// Creates an identifier, rejecting zero
    pub fn new(value: u64) -> Result<Self, IdError> {
        if value == 0 {
            return Err(IdError::Zero);
        }
        Ok(Self(value))
    }

    /// Returns the raw numeric value
    pub fn get(self) -> u64 {
        self.0
    }

    /// Returns the identifier that follows this one, or `None` past `u64::MAX`
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u64 = s
            .trim()
            .parse()
            .map_err(|_| IdError::InvalidFormat(s.to_string()))?;
        Self::new(value)
    }
}

impl TryFrom<u64> for RecordId {
    type Error = IdError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RecordId> for u64 {
    fn from(id: RecordId) -> Self {
        id.0
    }
}
