//! The fixed set of board columns.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Kanban status bucket. A task is in exactly one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Backlog,
    Todo,
    InProgress,
    Review,
    Done,
}

impl Column {
    /// Columns in board order, left to right.
    pub const fn all() -> [Column; 5] {
        [
            Column::Backlog,
            Column::Todo,
            Column::InProgress,
            Column::Review,
            Column::Done,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Review => "review",
            Self::Done => "done",
        }
    }

    /// Header text.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Backlog => "Backlog",
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Review => "Review",
            Self::Done => "Done",
        }
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Column {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::all()
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "column".to_string(),
                message: format!("unknown column '{s}'"),
            })
    }
}

/// Per-column work-in-progress limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WipLimits {
    limits: [Option<usize>; 5],
}

impl WipLimits {
    /// No limits anywhere.
    pub fn none() -> Self {
        Self { limits: [None; 5] }
    }

    pub fn with_limit(mut self, column: Column, limit: Option<usize>) -> Self {
        self.limits[column.index()] = limit;
        self
    }

    pub fn limit(&self, column: Column) -> Option<usize> {
        self.limits[column.index()]
    }
}

impl Default for WipLimits {
    /// Only `in_progress` is capped, at three cards.
    fn default() -> Self {
        Self::none().with_limit(Column::InProgress, Some(3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_column_name() {
        for column in Column::all() {
            assert_eq!(column.as_str().parse::<Column>().unwrap(), column);
        }
        assert!("doing".parse::<Column>().is_err());
    }

    #[test]
    fn serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Column::InProgress).unwrap(),
            "\"in_progress\""
        );
    }

    #[test]
    fn default_wip_limit_only_on_in_progress() {
        let limits = WipLimits::default();
        assert_eq!(limits.limit(Column::InProgress), Some(3));
        assert_eq!(limits.limit(Column::Todo), None);
        assert_eq!(limits.limit(Column::Done), None);
    }
}
