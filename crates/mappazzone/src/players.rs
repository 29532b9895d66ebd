//! Player trait and implementations.

use anyhow::{Result, bail};
use mappazzone_engine::{Cell, GameSession};
use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::rc::Rc;
use tracing::debug;

/// What a player does with the city in hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Move {
    /// Place the city at a cell.
    #[display("place at {}", _0)]
    Place(Cell),
    /// Drop the city.
    #[display("discard")]
    Discard,
    /// Leave the game.
    #[display("quit")]
    Quit,
}

/// Something that chooses moves for one seat.
pub trait Player {
    /// Chooses a move for the city the session currently holds.
    fn choose(&mut self, session: &GameSession) -> Result<Move>;

    /// Returns the player's display name.
    fn name(&self) -> &str;

    /// Whether failed moves should be explained and asked again.
    fn is_interactive(&self) -> bool {
        false
    }
}

/// Parses a line of player input: `row col`, `discard` or `quit`.
pub fn parse_move(line: &str) -> Option<Move> {
    let line = line.trim().to_lowercase();
    match line.as_str() {
        "discard" | "d" => Some(Move::Discard),
        "quit" | "q" => Some(Move::Quit),
        _ => {
            let mut parts = line
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|p| !p.is_empty());
            let row = parts.next()?.parse().ok()?;
            let column = parts.next()?.parse().ok()?;
            if parts.next().is_some() {
                return None;
            }
            Some(Move::Place(Cell::new(row, column)))
        }
    }
}

/// Line source shared by every human seat reading the same terminal.
///
/// Clones read from the same underlying reader.
pub struct SharedInput<R>(Rc<RefCell<R>>);

impl<R: BufRead> SharedInput<R> {
    /// Wraps a reader.
    pub fn new(reader: R) -> Self {
        Self(Rc::new(RefCell::new(reader)))
    }

    /// Reads one line into `buf`, returning the bytes read (0 at end of input).
    pub fn read_line(&self, buf: &mut String) -> std::io::Result<usize> {
        self.0.borrow_mut().read_line(buf)
    }
}

impl<R> Clone for SharedInput<R> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

/// Human player typing moves on a line-oriented terminal.
pub struct HumanPlayer<R, W> {
    name: String,
    input: SharedInput<R>,
    output: W,
}

impl<R: BufRead, W: Write> HumanPlayer<R, W> {
    /// Creates a new human player reading from `input`.
    pub fn new(name: impl Into<String>, input: SharedInput<R>, output: W) -> Self {
        Self {
            name: name.into(),
            input,
            output,
        }
    }
}

impl<R: BufRead, W: Write> Player for HumanPlayer<R, W> {
    fn choose(&mut self, session: &GameSession) -> Result<Move> {
        loop {
            write!(self.output, "{}> ", self.name)?;
            self.output.flush()?;
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                debug!(player = %self.name, "Input closed");
                return Ok(Move::Quit);
            }
            match parse_move(&line) {
                Some(mov) => return Ok(mov),
                None => writeln!(
                    self.output,
                    "Enter `row column` (0..{} and 0..{}), `discard` or `quit`",
                    session.grid().rows(),
                    session.grid().columns()
                )?,
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_interactive(&self) -> bool {
        true
    }
}

/// Simple AI that picks the first free cell.
pub struct SimpleAI {
    name: String,
}

impl SimpleAI {
    /// Creates a new simple AI.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Player for SimpleAI {
    fn choose(&mut self, session: &GameSession) -> Result<Move> {
        match session.grid().free_cells().first() {
            Some(&cell) => {
                debug!(ai = %self.name, %cell, "AI chose cell");
                Ok(Move::Place(cell))
            }
            None => bail!("No free cell available"),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// AI that places the city in the first cell where it is accepted.
///
/// When no cell accepts it, the city is discarded if the rules allow it, and
/// otherwise sacrificed on the first free cell.
pub struct GreedyAI {
    name: String,
}

impl GreedyAI {
    /// Creates a new greedy AI.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Player for GreedyAI {
    fn choose(&mut self, session: &GameSession) -> Result<Move> {
        let free = session.grid().free_cells();
        for &cell in &free {
            if session.preview(cell)?.is_valid() {
                debug!(ai = %self.name, %cell, "AI found an accepted cell");
                return Ok(Move::Place(cell));
            }
        }
        if *session.config().allow_discard() {
            debug!(ai = %self.name, "AI discards");
            return Ok(Move::Discard);
        }
        match free.first() {
            Some(&cell) => Ok(Move::Place(cell)),
            None => bail!("No free cell available"),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move() {
        assert_eq!(parse_move("1 2\n"), Some(Move::Place(Cell::new(1, 2))));
        assert_eq!(parse_move(" 0,3 "), Some(Move::Place(Cell::new(0, 3))));
        assert_eq!(parse_move("Discard"), Some(Move::Discard));
        assert_eq!(parse_move("q"), Some(Move::Quit));
        assert_eq!(parse_move("1"), None);
        assert_eq!(parse_move("1 2 3"), None);
        assert_eq!(parse_move("north"), None);
    }

    #[test]
    fn test_seats_share_one_input() {
        let session = mappazzone_engine::GameSession::with_deck(
            ["ada", "bob"],
            mappazzone_engine::SessionConfig::default(),
            mappazzone_engine::Deck::default(),
        )
        .unwrap();
        let input = SharedInput::new(std::io::Cursor::new("0 0\n1 1\nquit\n"));
        let mut ada = HumanPlayer::new("ada", input.clone(), std::io::sink());
        let mut bob = HumanPlayer::new("bob", input, std::io::sink());

        assert_eq!(ada.choose(&session).unwrap(), Move::Place(Cell::new(0, 0)));
        assert_eq!(bob.choose(&session).unwrap(), Move::Place(Cell::new(1, 1)));
        assert_eq!(ada.choose(&session).unwrap(), Move::Quit);
        assert_eq!(bob.choose(&session).unwrap(), Move::Quit);
    }

    #[test]
    fn test_move_display() {
        assert_eq!(Move::Place(Cell::new(1, 2)).to_string(), "place at (1, 2)");
        assert_eq!(Move::Discard.to_string(), "discard");
    }
}
