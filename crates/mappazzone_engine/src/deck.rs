//! The draw pile.

use crate::error::GameResult;
use crate::geo::{City, GeoIndex};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, instrument};

/// Cities drawn without replacement, top of the pile first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Deck {
    /// Stored reversed so that drawing pops from the end.
    cards: Vec<City>,
}

impl Deck {
    /// A deck drawing `cities` in the given order.
    pub fn from_cities(mut cities: Vec<City>) -> Self {
        cities.reverse();
        Self { cards: cities }
    }

    /// Samples `size` distinct cities from `index` (all of them when `None`) and shuffles.
    #[instrument(skip(index, rng), fields(available = index.len()))]
    pub fn shuffled<R: Rng + ?Sized>(
        index: &GeoIndex,
        size: Option<usize>,
        rng: &mut R,
    ) -> GameResult<Self> {
        let mut cards = index.sample(size.unwrap_or(index.len()), rng)?;
        cards.shuffle(rng);
        debug!(cards = cards.len(), "Deck shuffled");
        Ok(Self { cards })
    }

    /// Takes the top city.
    pub fn draw(&mut self) -> Option<City> {
        self.cards.pop()
    }

    /// The top city without drawing it.
    pub fn peek(&self) -> Option<&City> {
        self.cards.last()
    }

    /// Cities left.
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    /// Whether the pile is exhausted.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_draw_order() {
        let mut deck = Deck::from_cities(vec![City::new("A", 0.0, 0.0), City::new("B", 1.0, 1.0)]);
        assert_eq!(deck.peek().map(City::name), Some("A"));
        assert_eq!(deck.draw().map(|c| c.name().to_string()), Some("A".to_string()));
        assert_eq!(deck.remaining(), 1);
        assert_eq!(deck.draw().map(|c| c.name().to_string()), Some("B".to_string()));
        assert!(deck.draw().is_none());
        assert!(deck.is_empty());
    }

    #[test]
    fn test_shuffled_is_seeded_and_distinct() {
        let index = GeoIndex::builtin().unwrap();
        let first = Deck::shuffled(&index, Some(10), &mut StdRng::seed_from_u64(7)).unwrap();
        let second = Deck::shuffled(&index, Some(10), &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.remaining(), 10);

        let mut names: Vec<_> = first.cards.iter().map(|c| c.name().to_string()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 10);
    }

    #[test]
    fn test_full_deck_by_default() {
        let index = GeoIndex::builtin().unwrap();
        let deck = Deck::shuffled(&index, None, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(deck.remaining(), index.len());
    }

    #[test]
    fn test_oversized_deck_fails() {
        let index = GeoIndex::from_cities(vec![City::new("A", 0.0, 0.0)]).unwrap();
        assert!(Deck::shuffled(&index, Some(2), &mut StdRng::seed_from_u64(1)).is_err());
    }
}
