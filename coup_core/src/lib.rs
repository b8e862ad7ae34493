//! A pure, deterministic rules engine for a Coup-like bluffing and
//! deduction card game.
//!
//! The engine exposes two calls and nothing else: [`initial_state`] builds
//! the opening position from an [`InitialConfig`], and [`transition`]
//! advances a [`State`] by one legal [`Event`]. Everything in between --
//! claims, blocks, challenges, reveals, the turn order -- is modeled as a
//! tagged-union state graph in [`statemachine`], consulted against the
//! immutable rulebook in [`gamedef`]. There is no I/O, no clock, and no
//! networking in this crate: it is meant to sit behind a server loop or a
//! test harness that owns those concerns (see the `coup_test` binary in
//! this workspace for the latter).

pub mod config;
pub mod deck;
pub mod error;
pub mod gamedef;
pub mod player;
pub mod rng;
pub mod role;
pub mod statemachine;

pub use config::{initial_state, InitialConfig};
pub use error::{EngineError, Result};
pub use gamedef::{ActionDef, ActionName, GameDef};
pub use player::{InfluenceCard, Player};
pub use rng::Seed;
pub use role::{Role, RoleSet};
pub use statemachine::{transition, Context, Event, EventKind, State, StateTag};

/// Read-only queries a front end typically wants without reaching into
/// `Context`'s fields directly.
pub fn whose_turn(state: &State) -> usize {
    state.context().whose_turn
}

pub fn player_cash(state: &State, player: usize) -> Option<u32> {
    state.context().players.get(player).map(|p| p.cash())
}

pub fn player_unrevealed_count(state: &State, player: usize) -> Option<u32> {
    state.context().players.get(player).map(|p| p.count_unrevealed())
}

pub fn player_has_unrevealed_role(state: &State, player: usize, role: Role) -> Option<bool> {
    state
        .context()
        .players
        .get(player)
        .map(|p| p.has_unrevealed_role(role))
}

pub fn is_game_over(state: &State) -> bool {
    state.tag() == StateTag::GameOver
}

/// A stable, display-friendly name for `state`'s current tag (`"tax"`,
/// `"wait-for-response"`, ...), for callers that want to show or log where
/// the game is without depending on the `StateTag` enum directly.
pub fn current_state_name(state: &State) -> &'static str {
    state.tag().name()
}

/// The full mutable context backing `state`: `whose_turn`, `players`, the
/// deck, the seed, and every sub-protocol field. Exposed alongside the
/// narrower `player_*` queries for callers (a UI, a replay inspector) that
/// need the whole picture rather than one player's slice of it.
pub fn current_context(state: &State) -> &Context {
    state.context()
}
