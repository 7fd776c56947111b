//! Load-time errors.
//!
//! Only level and asset-table loading can fail; nothing inside a tick does.

use crate::animation::Action;
use crate::components::Role;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    EmptyGrid,
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    UnknownTileCode {
        row: usize,
        col: usize,
        code: i32,
    },
    MissingPlayerSpawn,
    DuplicatePlayerSpawn {
        first: (usize, usize),
        second: (usize, usize),
    },
    EmptyAnimation {
        role: Role,
        action: Action,
    },
    /// A config value that would stall or break the fixed-step loop.
    InvalidConfig {
        field: &'static str,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::EmptyGrid => write!(f, "level grid has no cells"),
            LoadError::RaggedRow {
                row,
                expected,
                found,
            } => write!(
                f,
                "level row {row} has {found} columns, expected {expected}"
            ),
            LoadError::UnknownTileCode { row, col, code } => {
                write!(f, "unknown tile code {code} at row {row}, column {col}")
            }
            LoadError::MissingPlayerSpawn => write!(f, "level has no player spawn marker"),
            LoadError::DuplicatePlayerSpawn { first, second } => write!(
                f,
                "level has more than one player spawn: {first:?} and {second:?}"
            ),
            LoadError::EmptyAnimation { role, action } => write!(
                f,
                "{} animation {} has no frames",
                role.as_str(),
                action.as_str()
            ),
            LoadError::InvalidConfig { field } => {
                write!(f, "config field `{field}` must be a positive number")
            }
        }
    }
}

impl std::error::Error for LoadError {}
