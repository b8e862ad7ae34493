//! The ordered sequence of role tokens not currently held by a player.

use crate::error::{EngineError, Result};
use crate::rng::{shuffle, Seed};
use crate::role::Role;

/// Top-of-deck is the front of the `Vec`. `push_front`/`pop_front` are named
/// for that convention even though they are implemented with `Vec::insert`
/// and `Vec::remove` at index 0 -- decks in this game are small (at most
/// `roles * multiplicity` cards), so the O(n) shift is not worth a
/// `VecDeque`'s extra indirection for a type this is cloned and compared in
/// tests as often as `Deck` is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Role>,
}

impl Deck {
    pub fn new(cards: Vec<Role>) -> Deck {
        Deck { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn push_front(&mut self, role: Role) {
        self.cards.insert(0, role);
    }

    /// Removes and returns the top card.
    ///
    /// Every call site is reached only once a guard has already established
    /// the deck is non-empty (the total-roles invariant guarantees a
    /// reshuffle never needs more cards than the closed system has), so an
    /// empty deck here is an engine bug, not a guard failure.
    pub fn pop_front(&mut self) -> Result<Role> {
        if self.cards.is_empty() {
            return Err(EngineError::invariant("pop_front on an empty deck"));
        }
        Ok(self.cards.remove(0))
    }

    pub fn shuffle(&mut self, seed: Seed) -> Seed {
        let cards = std::mem::take(&mut self.cards);
        let (shuffled, next) = shuffle(seed, cards);
        self.cards = shuffled;
        next
    }

    pub fn cards(&self) -> &[Role] {
        &self.cards
    }
}

/// The reshuffle-after-reveal protocol backing a successful bluff: the
/// revealed role goes back into the deck, the deck is reshuffled, and the
/// new top card becomes the player's replacement influence. The replacement
/// may coincide with the original role -- that is an observable, intended
/// outcome, not a bug.
pub fn replace_via_reshuffle(deck: &mut Deck, seed: Seed, revealed: Role) -> Result<(Role, Seed)> {
    deck.push_front(revealed);
    let seed = deck.shuffle(seed);
    let new_role = deck.pop_front()?;
    Ok((new_role, seed))
}
