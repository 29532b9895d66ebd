//! Score deltas and per-player tallies.

use crate::error::{GameError, GameResult};
use crate::grid::Grid;
use crate::session::PlayerId;
use crate::validator::Validation;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// How a committed placement is rewarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoringMode {
    /// Every committed placement earns the same award.
    Fixed {
        /// Points per placement.
        #[serde(default = "default_award")]
        award: u32,
    },
    /// Early placements, made while the grid is emptier, earn more:
    /// `max(floor, ceil(base * free / capacity))`.
    Decreasing {
        /// Points for a placement on an empty grid.
        base: u32,
        /// Minimum award.
        #[serde(default)]
        floor: u32,
    },
}

fn default_award() -> u32 {
    1
}

impl Default for ScoringMode {
    fn default() -> Self {
        ScoringMode::Fixed {
            award: default_award(),
        }
    }
}

/// Complete scoring configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreRules {
    /// Reward for committed placements.
    pub mode: ScoringMode,
    /// Points lost by a rejected placement.
    pub penalty: u32,
    /// Multiply the penalty by the number of coordinates (longitude, latitude) violated.
    pub penalty_per_violation: bool,
}

/// Grid fill level before a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_new::new)]
pub struct Occupancy {
    /// Empty cells before the placement.
    pub free: usize,
    /// Total cells.
    pub capacity: usize,
}

impl Occupancy {
    /// Current occupancy of `grid`.
    pub fn of(grid: &Grid) -> Self {
        Self::new(grid.free(), grid.capacity())
    }
}

/// One player's running totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ScoreEntry {
    /// The player.
    player: PlayerId,
    /// Accumulated score.
    score: i64,
    /// Committed placements.
    placed: usize,
    /// Rejected placements.
    rejected: usize,
    /// Drawn cities dropped without a placement attempt.
    discarded: usize,
}

impl ScoreEntry {
    fn new(player: PlayerId) -> Self {
        Self {
            player,
            score: 0,
            placed: 0,
            rejected: 0,
            discarded: 0,
        }
    }
}

/// Tallies for every player, in registration order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBoard {
    entries: Vec<ScoreEntry>,
}

impl ScoreBoard {
    /// A zeroed board for `players`.
    pub fn new<'a>(players: impl IntoIterator<Item = &'a PlayerId>) -> Self {
        Self {
            entries: players
                .into_iter()
                .cloned()
                .map(ScoreEntry::new)
                .collect(),
        }
    }

    /// Entries in registration order.
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    /// Entry for `player`.
    pub fn entry(&self, player: &PlayerId) -> Option<&ScoreEntry> {
        self.entries.iter().find(|e| &e.player == player)
    }

    /// Score of `player`.
    pub fn score(&self, player: &PlayerId) -> Option<i64> {
        self.entry(player).map(|e| e.score)
    }

    /// Sum of all scores.
    pub fn total(&self) -> i64 {
        self.entries.iter().map(|e| e.score).sum()
    }

    /// Entries ranked by score, then committed placements, then registration order.
    pub fn standings(&self) -> Vec<&ScoreEntry> {
        let mut ranked: Vec<&ScoreEntry> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.score.cmp(&a.score).then(b.placed.cmp(&a.placed)));
        ranked
    }

    fn entry_mut(&mut self, player: &PlayerId) -> GameResult<&mut ScoreEntry> {
        self.entries
            .iter_mut()
            .find(|e| &e.player == player)
            .ok_or_else(|| GameError::UnknownPlayer(player.clone()))
    }
}

impl std::fmt::Display for ScoreBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (rank, entry) in self.standings().into_iter().enumerate() {
            writeln!(
                f,
                "{}. {}: {} ({} placed, {} rejected)",
                rank + 1,
                entry.player,
                entry.score,
                entry.placed,
                entry.rejected
            )?;
        }
        Ok(())
    }
}

/// Applies [`ScoreRules`] to placement outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreKeeper {
    rules: ScoreRules,
    board: ScoreBoard,
}

impl ScoreKeeper {
    /// A keeper with a zeroed board for `players`.
    pub fn new<'a>(rules: ScoreRules, players: impl IntoIterator<Item = &'a PlayerId>) -> Self {
        Self {
            rules,
            board: ScoreBoard::new(players),
        }
    }

    /// The rules in force.
    pub fn rules(&self) -> &ScoreRules {
        &self.rules
    }

    /// Current tallies.
    pub fn board(&self) -> &ScoreBoard {
        &self.board
    }

    /// Score change for an outcome. Pure.
    pub fn delta(&self, outcome: &Validation, occupancy: Occupancy) -> i64 {
        match outcome {
            Validation::Valid => match self.rules.mode {
                ScoringMode::Fixed { award } => i64::from(award),
                ScoringMode::Decreasing { base, floor } => {
                    let scaled = if occupancy.capacity == 0 {
                        0
                    } else {
                        (u64::from(base) * occupancy.free as u64).div_ceil(occupancy.capacity as u64)
                    };
                    scaled.max(u64::from(floor)) as i64
                }
            },
            Validation::Invalid(_) => {
                let multiplier = if self.rules.penalty_per_violation {
                    outcome.violated_directions().len() as i64
                } else {
                    1
                };
                -(i64::from(self.rules.penalty) * multiplier)
            }
        }
    }

    /// Applies the delta for `outcome` to `owner` and bumps their counters.
    #[instrument(skip(self, outcome), fields(valid = outcome.is_valid()))]
    pub fn record(
        &mut self,
        owner: &PlayerId,
        outcome: &Validation,
        occupancy: Occupancy,
    ) -> GameResult<&ScoreBoard> {
        let delta = self.delta(outcome, occupancy);
        let entry = self.board.entry_mut(owner)?;
        entry.score += delta;
        if outcome.is_valid() {
            entry.placed += 1;
        } else {
            entry.rejected += 1;
        }
        debug!(delta, score = entry.score, "Score recorded");
        Ok(&self.board)
    }

    /// Counts a discarded draw for `owner`. Discards never change the score.
    #[instrument(skip(self))]
    pub fn record_discard(&mut self, owner: &PlayerId) -> GameResult<&ScoreBoard> {
        self.board.entry_mut(owner)?.discarded += 1;
        Ok(&self.board)
    }
}
