//! Building the first `State` of a game.

use std::rc::Rc;

use crate::deck::Deck;
use crate::error::{EngineError, Result};
use crate::gamedef::GameDef;
use crate::player::Player;
use crate::rng::Seed;
use crate::role::Role;
use crate::statemachine::{Context, State, StateTag};

/// Everything the caller supplies to stand up a fresh game: how many
/// players, what each one starts with, whose turn it is, the rulebook, and
/// the seed the deck is shuffled under.
#[derive(Debug, Clone)]
pub struct InitialConfig {
    pub player_hands: Vec<[Role; 2]>,
    pub starting_cash: u32,
    pub whose_turn: usize,
    pub seed: Seed,
    pub def: GameDef,
}

impl InitialConfig {
    pub fn new(player_hands: Vec<[Role; 2]>, starting_cash: u32, whose_turn: usize, seed: Seed, def: GameDef) -> InitialConfig {
        InitialConfig {
            player_hands,
            starting_cash,
            whose_turn,
            seed,
            def,
        }
    }
}

/// Deals `config.player_hands` off the top of a freshly shuffled deck built
/// from `def.roles()` at `def.deck_multiplicity()` copies each, then returns
/// the game's opening `StartOfTurn` state.
///
/// The deck is built, the dealt hands are removed from it, and only then is
/// it shuffled -- this matches the order the spec's worked scenarios assume:
/// the seed governs the shuffle of whatever is left undealt, not the
/// dealing itself (which this distillation takes as given via
/// `player_hands` rather than drawing hands from the deck).
pub fn initial_state(config: InitialConfig) -> Result<State> {
    if config.player_hands.len() < 2 {
        return Err(EngineError::invariant("a game needs at least two players"));
    }
    if config.whose_turn >= config.player_hands.len() {
        return Err(EngineError::invariant("whose_turn is out of range"));
    }

    let mut pool: Vec<Role> = config
        .def
        .roles()
        .into_iter()
        .flat_map(|r| std::iter::repeat(r).take(config.def.deck_multiplicity() as usize))
        .collect();

    for hand in &config.player_hands {
        for role in hand {
            let pos = pool
                .iter()
                .position(|r| r == role)
                .ok_or_else(|| EngineError::invariant(format!("not enough {} in the supply", role.name())))?;
            pool.remove(pos);
        }
    }

    let mut deck = Deck::new(pool);
    let seed = deck.shuffle(config.seed);

    let players = config
        .player_hands
        .iter()
        .map(|hand| Player::new(config.starting_cash, *hand))
        .collect();

    let ctx = Context::new(players, deck, seed, config.whose_turn, Rc::new(config.def));
    Ok(State::new(StateTag::StartOfTurn, ctx))
}
