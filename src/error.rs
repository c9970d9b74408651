//! Error types.
//!
//! All structural validation happens eagerly when an engine is built; the
//! only error a run itself can produce is [`MatchError::IterationBoundExceeded`].
//! None of these are recoverable for the input that caused them.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::ReceiverId;

/// One of the four input tables handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    ProposerPreferences,
    ReceiverPreferences,
    ReceiverUnacceptable,
    Capacities,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Table::ProposerPreferences => "proposer preferences",
            Table::ReceiverPreferences => "receiver preferences",
            Table::ReceiverUnacceptable => "receiver unacceptable lists",
            Table::Capacities => "capacities",
        };
        f.write_str(name)
    }
}

/// Which dimension of a table disagreed with the declared counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Rows,
    Columns,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Rows => f.write_str("rows"),
            Axis::Columns => f.write_str("columns"),
        }
    }
}

/// Why a preference row was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Malformation {
    #[error("id {0} appears more than once")]
    Duplicate(i64),

    #[error("id {0} is out of range")]
    OutOfRange(i64),

    #[error("id {0} is listed as both acceptable and unacceptable")]
    Conflicting(i64),
}

/// Errors raised while building or running a matching engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("{table} has {actual} {axis}, inconsistent with the declared {expected}")]
    InvalidDimensions {
        table: Table,
        axis: Axis,
        expected: usize,
        actual: usize,
    },

    #[error("malformed {table} row {row}: {reason}")]
    MalformedPreferenceList {
        table: Table,
        row: usize,
        reason: Malformation,
    },

    #[error("receiver {receiver} has non-positive capacity {capacity}")]
    NonPositiveCapacity { receiver: ReceiverId, capacity: i64 },

    #[error("matching did not terminate within {bound} steps")]
    IterationBoundExceeded { bound: usize },
}

/// Errors raised while reading preference tables from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: row {row}, column {column}: {value:?} is not an integer", path.display())]
    InvalidCell {
        path: PathBuf,
        row: usize,
        column: usize,
        value: String,
    },

    #[error("{}: capacity file is empty", path.display())]
    MissingCapacities { path: PathBuf },
}

// ============================================================================
// Unit Tests
// ============================================================================
