//! Turn states of a session.

use serde::{Deserialize, Serialize};

/// Why a session ended.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Every cell holds a city.
    #[strum(to_string = "grid full")]
    GridFull,
    /// The configured number of cities is on the board.
    #[strum(to_string = "placement limit reached")]
    PlacedLimit,
    /// No city is left to draw, beyond the configured reserve.
    #[strum(to_string = "deck empty")]
    DeckEmpty,
    /// The configured number of rounds was played.
    #[strum(to_string = "round limit reached")]
    RoundLimit,
}

/// Where the session is within the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnState {
    /// The current player must draw a city.
    AwaitingDraw,
    /// The current player holds a city and must place (or discard) it.
    AwaitingPlacement,
    /// No further turn will be played.
    Finished(FinishReason),
}

impl TurnState {
    /// Whether the session has ended.
    pub fn is_finished(&self) -> bool {
        matches!(self, TurnState::Finished(_))
    }

    /// The finish reason, if finished.
    pub fn finish_reason(&self) -> Option<FinishReason> {
        match self {
            TurnState::Finished(reason) => Some(*reason),
            _ => None,
        }
    }
}

impl std::fmt::Display for TurnState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnState::AwaitingDraw => write!(f, "awaiting draw"),
            TurnState::AwaitingPlacement => write!(f, "awaiting placement"),
            TurnState::Finished(reason) => write!(f, "finished ({})", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(TurnState::AwaitingDraw.to_string(), "awaiting draw");
        assert_eq!(
            TurnState::Finished(FinishReason::DeckEmpty).to_string(),
            "finished (deck empty)"
        );
    }

    #[test]
    fn test_finish_reason() {
        assert_eq!(TurnState::AwaitingPlacement.finish_reason(), None);
        assert!(TurnState::Finished(FinishReason::GridFull).is_finished());
    }
}
