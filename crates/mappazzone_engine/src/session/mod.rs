//! Sessions: players, turn states and the turn state machine.

mod game;
mod phases;
mod player;
mod record;

pub use game::GameSession;
pub use phases::{FinishReason, TurnState};
pub use player::PlayerId;
pub use record::{PlacementReport, Resolution, TurnAction, TurnRecord};
