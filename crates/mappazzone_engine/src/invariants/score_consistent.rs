//! Score consistency invariant: the scoreboard is the sum of the history.

use super::Invariant;
use crate::session::{GameSession, Resolution};

/// Invariant: each player's score and counters equal what their turn records add up to.
pub struct ScoreConsistentInvariant;

impl Invariant<GameSession> for ScoreConsistentInvariant {
    fn holds(session: &GameSession) -> bool {
        session.scoreboard().entries().iter().all(|entry| {
            let records = session
                .history()
                .iter()
                .filter(|r| r.player() == entry.player());
            let (mut score, mut placed, mut rejected, mut discarded) = (0i64, 0, 0, 0);
            for record in records {
                score += record.delta();
                match record.action().resolution() {
                    Resolution::Committed => placed += 1,
                    Resolution::Rejected => rejected += 1,
                    Resolution::Discarded => discarded += 1,
                }
            }
            *entry.score() == score
                && *entry.placed() == placed
                && *entry.rejected() == rejected
                && *entry.discarded() == discarded
        })
    }

    fn name() -> &'static str {
        "score consistency"
    }

    fn description() -> &'static str {
        "Scores equal the sum of recorded turn deltas"
    }
}
