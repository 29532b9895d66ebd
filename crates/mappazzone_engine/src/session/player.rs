//! Player identity.

use serde::{Deserialize, Serialize};

/// Opaque player name, unique within a session.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Owner of the city seeded at the grid center before the first turn.
    pub const BOARD: &'static str = "board";

    /// The owner of a seeded center city.
    pub fn board() -> Self {
        Self(Self::BOARD.to_string())
    }

    /// The raw name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for PlayerId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for PlayerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
