//! The turn state machine.

use crate::config::SessionConfig;
use crate::contracts::{Contract, DiscardContract, PlacementContract};
use crate::deck::Deck;
use crate::error::{GameError, GameResult};
use crate::geo::{City, GeoIndex};
use crate::grid::{Cell, Grid, Placement};
use crate::rules::RuleSet;
use crate::score::{Occupancy, ScoreBoard, ScoreKeeper};
use crate::session::{
    FinishReason, PlacementReport, PlayerId, TurnAction, TurnRecord, TurnState,
};
use crate::validator::{PlacementValidator, Validation};
use rand::Rng;
use std::collections::HashSet;
use tracing::{debug, info, instrument};

/// One play-through: players take turns drawing a city and placing it on a shared grid.
///
/// Turn flow: `draw` moves from `AwaitingDraw` to `AwaitingPlacement`; `attempt_place`
/// (or `discard`) consumes the turn and moves on to the next player's
/// `AwaitingDraw`, or to `Finished`.
#[derive(Debug, Clone)]
pub struct GameSession {
    players: Vec<PlayerId>,
    config: SessionConfig,
    validator: PlacementValidator,
    grid: Grid,
    deck: Deck,
    keeper: ScoreKeeper,
    state: TurnState,
    current: usize,
    drawn: Option<City>,
    history: Vec<TurnRecord>,
    seeded: Option<Cell>,
}

impl GameSession {
    /// Creates a session dealing a shuffled deck from the filtered `geo` index.
    #[instrument(skip_all, fields(index = geo.len()))]
    pub fn new<P, R>(
        geo: &GeoIndex,
        players: impl IntoIterator<Item = P>,
        config: SessionConfig,
        rng: &mut R,
    ) -> GameResult<Self>
    where
        P: Into<PlayerId>,
        R: Rng + ?Sized,
    {
        config.validate()?;
        let index = geo.filtered(config.filter());
        let deck = Deck::shuffled(&index, *config.deck_size(), rng)?;
        Self::with_deck(players, config, deck)
    }

    /// Creates a session drawing from a prepared deck.
    #[instrument(skip_all, fields(cards = deck.remaining()))]
    pub fn with_deck<P: Into<PlayerId>>(
        players: impl IntoIterator<Item = P>,
        config: SessionConfig,
        mut deck: Deck,
    ) -> GameResult<Self> {
        let players: Vec<PlayerId> = players.into_iter().map(Into::into).collect();
        if players.is_empty() {
            return Err(GameError::NoPlayers);
        }
        let mut seen = HashSet::new();
        for player in &players {
            let reserved = *config.seed_center() && player.as_str() == PlayerId::BOARD;
            if !seen.insert(player) || reserved {
                return Err(GameError::DuplicatePlayer(player.clone()));
            }
        }
        config.validate()?;

        let mut grid = Grid::new(*config.rows(), *config.columns())?;
        let mut seeded = None;
        if *config.seed_center() {
            if let Some(city) = deck.draw() {
                let center = grid.center();
                grid.place(center, city, PlayerId::board())?;
                debug!(%center, "Center seeded");
                seeded = Some(center);
            }
        }
        let state = if grid.is_full() {
            TurnState::Finished(FinishReason::GridFull)
        } else {
            TurnState::AwaitingDraw
        };

        info!(
            players = players.len(),
            rows = grid.rows(),
            columns = grid.columns(),
            cards = deck.remaining(),
            "Session created"
        );
        Ok(Self {
            keeper: ScoreKeeper::new(*config.scoring(), &players),
            validator: PlacementValidator::new(*config.rules()),
            players,
            config,
            grid,
            deck,
            state,
            current: 0,
            drawn: None,
            history: Vec::new(),
            seeded,
        })
    }

    /// Draws the next city for the current player.
    ///
    /// A deck down to its reserve finishes the session with [`FinishReason::DeckEmpty`].
    #[instrument(skip(self), fields(player = %self.current_player()))]
    pub fn draw(&mut self) -> GameResult<&City> {
        if self.state != TurnState::AwaitingDraw {
            return Err(GameError::WrongPhase {
                expected: "awaiting draw",
                actual: self.state,
            });
        }
        let reserve = *self.config.deck_reserve();
        let next = if self.deck.remaining() > reserve {
            self.deck.draw()
        } else {
            None
        };
        match next {
            Some(city) => {
                debug!(city = %city, remaining = self.deck.remaining(), "City drawn");
                self.state = TurnState::AwaitingPlacement;
                Ok(&*self.drawn.insert(city))
            }
            None => {
                self.state = TurnState::Finished(FinishReason::DeckEmpty);
                info!("Deck exhausted on draw");
                Err(GameError::EmptyDeck)
            }
        }
    }

    /// Validates the drawn city at `cell` without consuming the turn.
    pub fn preview(&self, cell: Cell) -> GameResult<Validation> {
        PlacementContract::pre(self, &cell)?;
        let city = self.drawn.as_ref().ok_or(GameError::WrongPhase {
            expected: "awaiting placement",
            actual: self.state,
        })?;
        Ok(self.validator.validate(&self.grid, cell, city))
    }

    /// Tries to place the drawn city at `cell`.
    ///
    /// Out-of-bounds and occupied cells are errors and leave the turn open. Otherwise
    /// the turn is consumed: a valid placement is committed and scored, an invalid one
    /// is penalised and the city is thrown away.
    #[instrument(skip(self), fields(player = %self.current_player()))]
    pub fn attempt_place(&mut self, cell: Cell) -> GameResult<PlacementReport> {
        PlacementContract::pre(self, &cell)?;
        #[cfg(debug_assertions)]
        let before = self.clone();

        let city = self.take_drawn()?;
        let player = self.current_player().clone();
        let occupancy = Occupancy::of(&self.grid);
        let outcome = self.validator.validate(&self.grid, cell, &city);
        let delta = self.keeper.delta(&outcome, occupancy);

        let action = match &outcome {
            Validation::Valid => {
                self.grid.place(cell, city.clone(), player.clone())?;
                info!(city = %city.name(), %cell, delta, "Placement committed");
                TurnAction::Placed(cell)
            }
            Validation::Invalid(violations) => {
                info!(
                    city = %city.name(),
                    %cell,
                    delta,
                    violations = violations.len(),
                    "Placement rejected"
                );
                TurnAction::Rejected {
                    cell,
                    violations: violations.clone(),
                }
            }
        };
        self.keeper.record(&player, &outcome, occupancy)?;
        self.finish_turn(player, city, action, delta);

        #[cfg(debug_assertions)]
        PlacementContract::post(&before, self)?;

        Ok(PlacementReport::new(
            outcome,
            delta,
            self.keeper.board().clone(),
            self.state,
        ))
    }

    /// Drops the drawn city without scoring and passes the turn.
    #[instrument(skip(self), fields(player = %self.current_player()))]
    pub fn discard(&mut self) -> GameResult<TurnState> {
        DiscardContract::pre(self, &())?;
        #[cfg(debug_assertions)]
        let before = self.clone();

        let city = self.take_drawn()?;
        let player = self.current_player().clone();
        self.keeper.record_discard(&player)?;
        debug!(city = %city.name(), "City discarded");
        self.finish_turn(player, city, TurnAction::Discarded, 0);

        #[cfg(debug_assertions)]
        DiscardContract::post(&before, self)?;

        Ok(self.state)
    }

    fn take_drawn(&mut self) -> GameResult<City> {
        self.drawn.take().ok_or(GameError::WrongPhase {
            expected: "awaiting placement",
            actual: self.state,
        })
    }

    fn finish_turn(&mut self, player: PlayerId, city: City, action: TurnAction, delta: i64) {
        let turn = self.history.len();
        self.history
            .push(TurnRecord::new(turn, self.round(), player, city, action, delta));

        let turns = self.history.len();
        let round_limit = self
            .config
            .max_rounds()
            .is_some_and(|rounds| turns >= rounds.saturating_mul(self.players.len()));
        let placed_limit = self
            .config
            .max_placed()
            .is_some_and(|limit| self.grid.placed() >= limit);
        self.state = if self.grid.is_full() {
            TurnState::Finished(FinishReason::GridFull)
        } else if placed_limit {
            TurnState::Finished(FinishReason::PlacedLimit)
        } else if self.deck.remaining() <= *self.config.deck_reserve() {
            TurnState::Finished(FinishReason::DeckEmpty)
        } else if round_limit {
            TurnState::Finished(FinishReason::RoundLimit)
        } else {
            self.current = (self.current + 1) % self.players.len();
            TurnState::AwaitingDraw
        };
        if let TurnState::Finished(reason) = self.state {
            info!(%reason, turns, "Session finished");
        }
    }

    /// Where the session is within the current turn.
    pub fn state(&self) -> TurnState {
        self.state
    }

    /// The player whose turn it is (the last player once finished).
    pub fn current_player(&self) -> &PlayerId {
        &self.players[self.current]
    }

    /// The city held by the current player.
    pub fn drawn(&self) -> Option<&City> {
        self.drawn.as_ref()
    }

    /// One-based round of the current turn. A round is one turn per player.
    pub fn round(&self) -> usize {
        self.history.len() / self.players.len() + 1
    }

    /// Players in turn order.
    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    /// The board.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Ordering rules in force.
    pub fn rules(&self) -> &RuleSet {
        self.validator.rules()
    }

    /// The configuration the session was created with.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Every consumed turn, oldest first.
    pub fn history(&self) -> &[TurnRecord] {
        &self.history
    }

    /// Current tallies.
    pub fn scoreboard(&self) -> &ScoreBoard {
        self.keeper.board()
    }

    /// Cities left in the deck.
    pub fn deck_remaining(&self) -> usize {
        self.deck.remaining()
    }

    /// The city seeded at the grid center, if any.
    pub fn seeded(&self) -> Option<&Placement> {
        self.seeded.and_then(|cell| self.grid.get(cell))
    }

    /// Final tallies. Fails with [`GameError::NotFinished`] while turns remain.
    pub fn final_scores(&self) -> GameResult<&ScoreBoard> {
        if self.state.is_finished() {
            Ok(self.keeper.board())
        } else {
            Err(GameError::NotFinished)
        }
    }

    #[cfg(test)]
    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    #[cfg(test)]
    pub(crate) fn history_mut(&mut self) -> &mut Vec<TurnRecord> {
        &mut self.history
    }
}
