use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a user recorded for a day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayState {
    #[default]
    Empty,
    Office,
    Home,
    DayOff,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown day state '{0}' (expected empty, office, home or day_off)")]
pub struct ParseDayStateError(pub String);

impl DayState {
    pub const ALL: [DayState; 4] = [
        DayState::Empty,
        DayState::Office,
        DayState::Home,
        DayState::DayOff,
    ];

    /// Next state in the click cycle: empty → office → home → day_off → empty.
    pub fn next(self) -> Self {
        match self {
            DayState::Empty => DayState::Office,
            DayState::Office => DayState::Home,
            DayState::Home => DayState::DayOff,
            DayState::DayOff => DayState::Empty,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DayState::Empty => "empty",
            DayState::Office => "office",
            DayState::Home => "home",
            DayState::DayOff => "day_off",
        }
    }
}

impl fmt::Display for DayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayState {
    type Err = ParseDayStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DayState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| ParseDayStateError(s.to_string()))
    }
}
