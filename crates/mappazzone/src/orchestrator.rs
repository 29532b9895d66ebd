//! Game orchestration between players.

use crate::players::{Move, Player};
use anyhow::{Result, bail};
use mappazzone_engine::{GameError, GameSession, Resolution};
use std::io::Write;
use tracing::{debug, info, instrument, warn};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The session reached `Finished`.
    Completed,
    /// A player quit.
    Abandoned,
}

/// Drives a session, asking each seat's player for moves and reporting on `out`.
pub struct Orchestrator<W> {
    session: GameSession,
    players: Vec<Box<dyn Player>>,
    out: W,
}

impl<W: Write> Orchestrator<W> {
    /// Creates an orchestrator. `players` must follow the session's turn order.
    pub fn new(session: GameSession, players: Vec<Box<dyn Player>>, out: W) -> Result<Self> {
        if players.len() != session.players().len() {
            bail!(
                "{} players for {} seats",
                players.len(),
                session.players().len()
            );
        }
        Ok(Self {
            session,
            players,
            out,
        })
    }

    /// The session being played.
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Consumes the orchestrator, returning the session.
    pub fn into_session(self) -> GameSession {
        self.session
    }

    fn seat(&self) -> usize {
        let current = self.session.current_player();
        self.session
            .players()
            .iter()
            .position(|p| p == current)
            .unwrap_or(0)
    }

    /// Runs the game loop until the session finishes or a player quits.
    #[instrument(skip(self))]
    pub fn run(&mut self) -> Result<RunOutcome> {
        info!("Starting game orchestration");
        if let Some(seeded) = self.session.seeded() {
            writeln!(
                self.out,
                "{} starts at the center {}",
                seeded.city(),
                seeded.cell()
            )?;
        }

        while !self.session.state().is_finished() {
            let seat = self.seat();
            let player_name = self.players[seat].name().to_string();

            let city = match self.session.draw() {
                Ok(city) => city.clone(),
                Err(GameError::EmptyDeck) => break,
                Err(e) => return Err(e.into()),
            };
            writeln!(self.out)?;
            write!(self.out, "{}", self.session.grid())?;
            writeln!(self.out, "{} drew {}", player_name, city)?;

            if !self.play_turn(seat, &player_name)? {
                info!(player = %player_name, "Player quit");
                return Ok(RunOutcome::Abandoned);
            }
        }

        let reason = self
            .session
            .state()
            .finish_reason()
            .map(|r| r.to_string())
            .unwrap_or_default();
        writeln!(self.out)?;
        write!(self.out, "{}", self.session.grid())?;
        writeln!(self.out, "Game over: {}", reason)?;
        write!(self.out, "{}", self.session.final_scores()?)?;
        info!(%reason, "Game finished");
        Ok(RunOutcome::Completed)
    }

    /// Asks the seated player until a move consumes the turn. `false` when they quit.
    ///
    /// Interactive players are asked again for as long as they keep answering; computer
    /// players get one attempt per cell.
    fn play_turn(&mut self, seat: usize, player_name: &str) -> Result<bool> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            if !self.players[seat].is_interactive() && attempts > self.session.grid().capacity() + 1
            {
                bail!("{} made no legal move", player_name);
            }
            let mov = self.players[seat].choose(&self.session)?;
            debug!(player = %player_name, %mov, "Move chosen");
            let result = match mov {
                Move::Quit => return Ok(false),
                Move::Discard => self.session.discard().map(|next| {
                    (format!("{} discarded the city", player_name), next)
                }),
                Move::Place(cell) => self.session.attempt_place(cell).map(|report| {
                    let line = match report.resolution() {
                        Resolution::Committed => {
                            format!("{} placed at {} ({:+})", player_name, cell, report.delta())
                        }
                        _ => format!(
                            "{} rejected at {}: {} ({:+})",
                            player_name,
                            cell,
                            report.reason().unwrap_or_default(),
                            report.delta()
                        ),
                    };
                    (line, *report.next())
                }),
            };
            match result {
                Ok((line, next)) => {
                    writeln!(self.out, "{}", line)?;
                    debug!(%next, "Turn consumed");
                    return Ok(true);
                }
                Err(
                    e @ (GameError::CellOccupied(_)
                    | GameError::OutOfBounds { .. }
                    | GameError::DiscardNotAllowed),
                ) if self.players[seat].is_interactive() => {
                    writeln!(self.out, "{}", e)?;
                }
                Err(e) => {
                    warn!(player = %player_name, error = %e, "Move failed");
                    return Err(e.into());
                }
            }
        }
    }
}
