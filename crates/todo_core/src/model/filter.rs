//! View filter for task list projections.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Transient list selector. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterState {
    #[default]
    All,
    /// Only tasks with `completed == false`.
    Active,
    /// Only tasks with `completed == true`.
    Completed,
}

impl FilterState {
    /// Stable string id used by UI and CLI callers.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl Display for FilterState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a filter name is not one of `all|active|completed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterParseError(pub String);

impl Display for FilterParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported filter `{}`; expected all|active|completed",
            self.0
        )
    }
}

impl Error for FilterParseError {}

impl FromStr for FilterState {
    type Err = FilterParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(FilterParseError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FilterParseError, FilterState};

    #[test]
    fn parses_case_insensitive_names() {
        assert_eq!(" Active ".parse::<FilterState>(), Ok(FilterState::Active));
        assert_eq!("COMPLETED".parse::<FilterState>(), Ok(FilterState::Completed));
        assert_eq!("all".parse::<FilterState>(), Ok(FilterState::All));
    }

    #[test]
    fn rejects_unknown_names() {
        assert_eq!(
            "done".parse::<FilterState>(),
            Err(FilterParseError("done".to_string()))
        );
    }

    #[test]
    fn defaults_to_all() {
        assert_eq!(FilterState::default(), FilterState::All);
        assert_eq!(FilterState::default().to_string(), "all");
    }
}
