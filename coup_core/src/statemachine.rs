//! The transition function: state graph, guards, and context mutations.
//!
//! This module is the hard 70% of the engine: a plain enum tag for "what
//! state are we observably in", an ordinary struct for the fields that
//! actually get mutated, and a transition function that validates before it
//! commits any change. The fan-out of sub-protocols here (action challenge,
//! block, block-challenge, last-chance block, reveal-on-action) is large
//! enough that each rest state gets its own small `on_*` function rather
//! than one flat match, and the eager ("no event") advances get their own
//! `eager_step` loop instead of being folded into a single mutate call.

use std::rc::Rc;

use log::{debug, trace, warn};

use crate::deck::{replace_via_reshuffle, Deck};
use crate::error::{EngineError, Result};
use crate::gamedef::{ActionName, GameDef};
use crate::player::Player;
use crate::rng::Seed;
use crate::role::Role;

/// The tagged union of states a `State` may observably be in. The four
/// transient tags (`ExecRevealOnChallenge`, `ExecCounterReveal`,
/// `FinishAction`, `EndOfTurn`) are entered and left within a single call to
/// [`transition`] and are never the tag of a `State` handed back to a
/// caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateTag {
    StartOfTurn,
    WaitForResponse,
    Block,
    Challenge,
    ExecRevealOnChallenge,
    ChallengeIncorrect,
    ExecCounterReveal,
    WaitForBlock,
    FinishAction,
    RevealOnAction,
    EndOfTurn,
    GameOver,
}

impl StateTag {
    /// The "rest" states, plus `GameOver`: every tag a `transition` call is
    /// allowed to return to a caller.
    pub fn is_rest(&self) -> bool {
        !matches!(
            self,
            StateTag::ExecRevealOnChallenge
                | StateTag::ExecCounterReveal
                | StateTag::FinishAction
                | StateTag::EndOfTurn
        )
    }

    /// A stable, lowercase name for the tag, for callers that want to log or
    /// display "what state is the game in" without matching on the enum.
    pub fn name(&self) -> &'static str {
        match self {
            StateTag::StartOfTurn => "start-of-turn",
            StateTag::WaitForResponse => "wait-for-response",
            StateTag::Block => "block",
            StateTag::Challenge => "challenge",
            StateTag::ExecRevealOnChallenge => "exec-reveal-on-challenge",
            StateTag::ChallengeIncorrect => "challenge-incorrect",
            StateTag::ExecCounterReveal => "exec-counter-reveal",
            StateTag::WaitForBlock => "wait-for-block",
            StateTag::FinishAction => "finish-action",
            StateTag::RevealOnAction => "reveal-on-action",
            StateTag::EndOfTurn => "end-of-turn",
            StateTag::GameOver => "game-over",
        }
    }
}

/// The mutable fields threaded across every state. `def` is the immutable
/// rulebook the whole game was configured with; it rides along in an `Rc`
/// so cloning a `Context` (as every `transition` call does, to leave the
/// caller's copy untouched on rejection) never re-clones the rulebook table.
#[derive(Debug, Clone)]
pub struct Context {
    pub whose_turn: usize,
    pub players: Vec<Player>,
    pub deck: Deck,
    pub seed: Seed,
    pub current_action: Option<ActionName>,
    pub target: Option<usize>,
    pub blocker: Option<usize>,
    pub challenger: Option<usize>,
    pub revealer: Option<usize>,
    pub revealed_role: Option<Role>,
    pub(crate) cost_paid: bool,
    pub def: Rc<GameDef>,
}

impl Context {
    pub fn new(players: Vec<Player>, deck: Deck, seed: Seed, whose_turn: usize, def: Rc<GameDef>) -> Context {
        Context {
            whose_turn,
            players,
            deck,
            seed,
            current_action: None,
            target: None,
            blocker: None,
            challenger: None,
            revealer: None,
            revealed_role: None,
            cost_paid: false,
            def,
        }
    }

    fn reset_for_start_of_turn(&mut self) {
        self.current_action = None;
        self.target = None;
        self.blocker = None;
        self.challenger = None;
        self.revealer = None;
        self.revealed_role = None;
        self.cost_paid = false;
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn living_player_count(&self) -> usize {
        self.players.iter().filter(|p| !p.is_dead()).count()
    }
}

/// A complete, observable engine state: the tag plus the context it carries.
#[derive(Debug, Clone)]
pub struct State {
    tag: StateTag,
    ctx: Context,
}

impl State {
    pub fn new(tag: StateTag, ctx: Context) -> State {
        State { tag, ctx }
    }

    pub fn tag(&self) -> StateTag {
        self.tag
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }
}

/// The event vocabulary of the state machine. Every event names the acting
/// player; the remaining fields vary by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Event {
    pub player: usize,
    pub kind: EventKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Action {
        action: ActionName,
        target: Option<usize>,
    },
    Block {
        role: Role,
    },
    Challenge,
    Allow,
    Reveal {
        role: Role,
    },
}

impl Event {
    pub fn action(player: usize, action: ActionName, target: Option<usize>) -> Event {
        Event {
            player,
            kind: EventKind::Action { action, target },
        }
    }
    pub fn block(player: usize, role: Role) -> Event {
        Event {
            player,
            kind: EventKind::Block { role },
        }
    }
    pub fn challenge(player: usize) -> Event {
        Event {
            player,
            kind: EventKind::Challenge,
        }
    }
    pub fn allow(player: usize) -> Event {
        Event {
            player,
            kind: EventKind::Allow,
        }
    }
    pub fn reveal(player: usize, role: Role) -> Event {
        Event {
            player,
            kind: EventKind::Reveal { role },
        }
    }
}

// ---------------------------------------------------------------------
// Guards
// ---------------------------------------------------------------------

fn valid_player(ctx: &Context, idx: usize) -> Result<()> {
    let player = ctx
        .players
        .get(idx)
        .ok_or_else(|| EngineError::illegal(format!("no such player: {idx}")))?;
    if player.is_dead() {
        return Err(EngineError::illegal(format!(
            "player {idx} has no influence left"
        )));
    }
    Ok(())
}

fn valid_opponent(ctx: &Context, idx: usize) -> Result<()> {
    valid_player(ctx, idx)?;
    if idx == ctx.whose_turn {
        return Err(EngineError::illegal("active player cannot act as an opponent here"));
    }
    Ok(())
}

fn current_player(ctx: &Context, idx: usize) -> Result<()> {
    valid_player(ctx, idx)?;
    if idx != ctx.whose_turn {
        return Err(EngineError::illegal("only the active player may allow here"));
    }
    Ok(())
}

fn can_start_action(
    ctx: &Context,
    player: usize,
    action: ActionName,
    target: Option<usize>,
) -> Result<()> {
    valid_player(ctx, player)?;
    if !ctx.def.is_valid_action(action) {
        return Err(EngineError::illegal(format!("unknown action: {}", action.name())));
    }
    if player != ctx.whose_turn {
        return Err(EngineError::illegal("it is not this player's turn"));
    }
    if ctx.def.is_targeted(action) {
        let t = target.ok_or_else(|| EngineError::illegal(format!("{} requires a target", action.name())))?;
        valid_player(ctx, t)?;
        if t == player {
            return Err(EngineError::illegal("cannot target yourself"));
        }
    }
    let cost = ctx.def.cost(action);
    if ctx.players[player].cash() < cost {
        return Err(EngineError::illegal(format!(
            "player {player} cannot afford {} (needs {cost})",
            action.name()
        )));
    }
    Ok(())
}

fn can_reveal(ctx: &Context, player: usize, role: Role) -> Result<()> {
    valid_player(ctx, player)?;
    let revealer = ctx
        .revealer
        .ok_or_else(|| EngineError::illegal("no reveal is pending"))?;
    if player != revealer {
        return Err(EngineError::illegal("this player is not the one who must reveal"));
    }
    if !ctx.players[player].has_unrevealed_role(role) {
        return Err(EngineError::illegal(format!(
            "player {player} has no unrevealed {}",
            role.name()
        )));
    }
    Ok(())
}

fn can_challenge(ctx: &Context, player: usize) -> Result<()> {
    if let Some(blocker) = ctx.blocker {
        valid_player(ctx, player)?;
        if player == blocker {
            return Err(EngineError::illegal("the blocker cannot challenge their own block"));
        }
        Ok(())
    } else {
        valid_opponent(ctx, player)?;
        let action = ctx
            .current_action
            .ok_or_else(|| EngineError::invariant("can_challenge with no current_action"))?;
        if !ctx.def.is_role_required(action) {
            return Err(EngineError::illegal(format!("{} cannot be challenged", action.name())));
        }
        Ok(())
    }
}

fn can_block(ctx: &Context, player: usize, role: Role) -> Result<()> {
    valid_opponent(ctx, player)?;
    let action = ctx
        .current_action
        .ok_or_else(|| EngineError::invariant("can_block with no current_action"))?;
    if !ctx.def.is_blocked_by(action, role) {
        return Err(EngineError::illegal(format!(
            "{} is not blockable by {}",
            action.name(),
            role.name()
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------
// Shared effects
// ---------------------------------------------------------------------

fn pay_action_cost(ctx: &mut Context) -> Result<()> {
    if ctx.cost_paid {
        return Ok(());
    }
    let action = ctx
        .current_action
        .ok_or_else(|| EngineError::invariant("pay_action_cost with no current_action"))?;
    let cost = ctx.def.cost(action);
    ctx.players[ctx.whose_turn].adjust_cash(-(cost as i64))?;
    ctx.cost_paid = true;
    trace!("paid action cost {cost} for {}", action.name());
    Ok(())
}

fn reveal_influence(ctx: &mut Context, player: usize, role: Role) -> Result<()> {
    ctx.players[player].reveal_role(role)?;
    ctx.revealed_role = Some(role);
    debug!("player {player} revealed {}", role.name());
    Ok(())
}

/// Returns the role to auto-reveal for `ctx.revealer`, if that player has
/// exactly one unrevealed influence left.
fn auto_reveal_role(ctx: &Context) -> Result<Option<Role>> {
    let revealer = match ctx.revealer {
        Some(r) => r,
        None => return Ok(None),
    };
    let player = &ctx.players[revealer];
    if player.has_n_unrevealed(1) {
        Ok(Some(player.first_unrevealed_role()?))
    } else {
        Ok(None)
    }
}

fn enter_challenge(ctx: &mut Context, challenger: usize) -> Result<()> {
    ctx.challenger = Some(challenger);
    ctx.revealer = Some(ctx.blocker.unwrap_or(ctx.whose_turn));
    ctx.revealed_role = None;
    Ok(())
}

/// Entry action shared by both ways `ExecRevealOnChallenge` is reached: an
/// explicit `REVEAL` event, or the auto-reveal eager check in `Challenge`.
fn enter_exec_reveal_on_challenge(ctx: &mut Context, role: Role) -> Result<()> {
    let revealer = ctx
        .revealer
        .ok_or_else(|| EngineError::invariant("ExecRevealOnChallenge with no revealer"))?;
    reveal_influence(ctx, revealer, role)
}

fn is_challenge_incorrect(ctx: &Context) -> Result<bool> {
    let action = ctx
        .current_action
        .ok_or_else(|| EngineError::invariant("challenge resolution with no current_action"))?;
    let role = ctx
        .revealed_role
        .ok_or_else(|| EngineError::invariant("challenge resolution with no revealed_role"))?;
    Ok(if ctx.blocker.is_some() {
        ctx.def.is_blocked_by(action, role)
    } else {
        ctx.def.role_allows_action(role, action)
    })
}

fn enter_challenge_incorrect(ctx: &mut Context) -> Result<()> {
    let revealer = ctx
        .revealer
        .ok_or_else(|| EngineError::invariant("ChallengeIncorrect with no revealer"))?;
    let revealed = ctx
        .revealed_role
        .ok_or_else(|| EngineError::invariant("ChallengeIncorrect with no revealed_role"))?;
    let challenger = ctx
        .challenger
        .ok_or_else(|| EngineError::invariant("ChallengeIncorrect with no challenger"))?;

    ctx.players[revealer].unreveal_role(revealed)?;
    let (new_role, next_seed) = replace_via_reshuffle(&mut ctx.deck, ctx.seed, revealed)?;
    ctx.seed = next_seed;
    ctx.players[revealer].swap_role(revealed, new_role)?;
    debug!(
        "player {revealer}'s bluffed {} was replaced via reshuffle",
        revealed.name()
    );

    ctx.revealer = Some(challenger);
    ctx.revealed_role = None;
    Ok(())
}

/// Entry action shared by both ways `ExecCounterReveal` is reached: an
/// explicit `REVEAL` event out of `ChallengeIncorrect`, or its auto-reveal.
fn enter_exec_counter_reveal(ctx: &mut Context, role: Role) -> Result<()> {
    let revealer = ctx
        .revealer
        .ok_or_else(|| EngineError::invariant("ExecCounterReveal with no revealer"))?;
    reveal_influence(ctx, revealer, role)
}

fn enter_wait_for_block(ctx: &mut Context) -> Result<()> {
    ctx.revealer = None;
    pay_action_cost(ctx)
}

/// Entry action for `FinishAction`, reached from four different edges (see
/// the module doc comment). Beyond the spec's literal `clear_revealer`, this
/// also clears `revealed_role`: every path into `FinishAction` other than a
/// fresh, uncontested `ALLOW` arrives with a stale `revealed_role` left over
/// from the challenge sub-protocol that just resolved, and the "is a reveal
/// now pending" check right below needs a clean slate to tell a genuinely
/// new reveal (an assassination target, say) from that leftover.
fn enter_finish_action(ctx: &mut Context) -> Result<()> {
    ctx.revealer = None;
    ctx.revealed_role = None;
    let action = ctx
        .current_action
        .ok_or_else(|| EngineError::invariant("FinishAction with no current_action"))?;
    let actor = ctx.whose_turn;
    match action {
        ActionName::Income | ActionName::ForeignAid | ActionName::Tax => {
            if let Some(gain) = ctx.def.gain(action) {
                ctx.players[actor].adjust_cash(gain as i64)?;
            }
        }
        ActionName::Assassinate => {
            let target = ctx
                .target
                .ok_or_else(|| EngineError::invariant("assassinate with no target"))?;
            ctx.revealer = Some(target);
        }
        ActionName::Steal | ActionName::Exchange | ActionName::Interrogate | ActionName::Coup => {
            // Extension point: these actions are challengeable/blockable in
            // the rulebook but this distillation does not execute their
            // board effects. Coup's own effect (target loses an influence)
            // is the natural next addition here and needs no new state.
        }
    }
    debug!("finished action {}", action.name());
    Ok(())
}

fn next_living_player(ctx: &Context, from: usize) -> usize {
    let n = ctx.player_count();
    let mut idx = (from + 1) % n;
    for _ in 0..n {
        if !ctx.players[idx].is_dead() {
            return idx;
        }
        idx = (idx + 1) % n;
    }
    idx
}

// ---------------------------------------------------------------------
// Event dispatch (rest states only)
// ---------------------------------------------------------------------

fn dispatch_event(tag: StateTag, ctx: &mut Context, event: &Event) -> Result<StateTag> {
    match tag {
        StateTag::StartOfTurn => on_start_of_turn(ctx, event),
        StateTag::WaitForResponse => on_wait_for_response(ctx, event),
        StateTag::Block => on_block(ctx, event),
        StateTag::Challenge => on_challenge(ctx, event),
        StateTag::ChallengeIncorrect => on_challenge_incorrect(ctx, event),
        StateTag::WaitForBlock => on_wait_for_block(ctx, event),
        StateTag::RevealOnAction => on_reveal_on_action(ctx, event),
        StateTag::GameOver => Err(EngineError::illegal("the game is over")),
        StateTag::ExecRevealOnChallenge
        | StateTag::ExecCounterReveal
        | StateTag::FinishAction
        | StateTag::EndOfTurn => Err(EngineError::invariant(
            "an event was dispatched against a transient state",
        )),
    }
}

fn on_start_of_turn(ctx: &mut Context, event: &Event) -> Result<StateTag> {
    match event.kind {
        EventKind::Action { action, target } => {
            can_start_action(ctx, event.player, action, target)?;
            ctx.current_action = Some(action);
            ctx.target = target;
            debug!(
                "player {} started {} (target {:?})",
                event.player,
                action.name(),
                target
            );
            Ok(StateTag::WaitForResponse)
        }
        _ => Err(EngineError::illegal("StartOfTurn only accepts ACTION")),
    }
}

fn on_wait_for_response(ctx: &mut Context, event: &Event) -> Result<StateTag> {
    match event.kind {
        EventKind::Block { role } => {
            can_block(ctx, event.player, role)?;
            pay_action_cost(ctx)?;
            ctx.blocker = Some(event.player);
            debug!("player {} claims to block with {}", event.player, role.name());
            Ok(StateTag::Block)
        }
        EventKind::Challenge => {
            can_challenge(ctx, event.player)?;
            enter_challenge(ctx, event.player)?;
            debug!("player {} challenges the action", event.player);
            Ok(StateTag::Challenge)
        }
        EventKind::Allow => {
            valid_opponent(ctx, event.player)?;
            pay_action_cost(ctx)?;
            Ok(StateTag::FinishAction)
        }
        _ => Err(EngineError::illegal("WaitForResponse only accepts BLOCK, CHALLENGE, ALLOW")),
    }
}

fn on_block(ctx: &mut Context, event: &Event) -> Result<StateTag> {
    match event.kind {
        EventKind::Challenge => {
            can_challenge(ctx, event.player)?;
            enter_challenge(ctx, event.player)?;
            debug!("player {} challenges the block", event.player);
            Ok(StateTag::Challenge)
        }
        EventKind::Allow => {
            current_player(ctx, event.player)?;
            Ok(StateTag::EndOfTurn)
        }
        _ => Err(EngineError::illegal("Block only accepts CHALLENGE, ALLOW")),
    }
}

fn on_challenge(ctx: &mut Context, event: &Event) -> Result<StateTag> {
    match event.kind {
        EventKind::Reveal { role } => {
            can_reveal(ctx, event.player, role)?;
            enter_exec_reveal_on_challenge(ctx, role)?;
            Ok(StateTag::ExecRevealOnChallenge)
        }
        _ => Err(EngineError::illegal("Challenge only accepts REVEAL")),
    }
}

fn on_challenge_incorrect(ctx: &mut Context, event: &Event) -> Result<StateTag> {
    match event.kind {
        EventKind::Reveal { role } => {
            can_reveal(ctx, event.player, role)?;
            enter_exec_counter_reveal(ctx, role)?;
            Ok(StateTag::ExecCounterReveal)
        }
        _ => Err(EngineError::illegal("ChallengeIncorrect only accepts REVEAL")),
    }
}

fn on_wait_for_block(ctx: &mut Context, event: &Event) -> Result<StateTag> {
    match event.kind {
        EventKind::Block { role } => {
            can_block(ctx, event.player, role)?;
            ctx.blocker = Some(event.player);
            debug!(
                "player {} claims a last-chance block with {}",
                event.player,
                role.name()
            );
            Ok(StateTag::Block)
        }
        EventKind::Allow => {
            valid_opponent(ctx, event.player)?;
            Ok(StateTag::FinishAction)
        }
        _ => Err(EngineError::illegal("WaitForBlock only accepts BLOCK, ALLOW")),
    }
}

fn on_reveal_on_action(ctx: &mut Context, event: &Event) -> Result<StateTag> {
    match event.kind {
        EventKind::Reveal { role } => {
            can_reveal(ctx, event.player, role)?;
            let revealer = ctx.revealer.expect("can_reveal already checked revealer is set");
            reveal_influence(ctx, revealer, role)?;
            ctx.revealer = None;
            Ok(StateTag::EndOfTurn)
        }
        _ => Err(EngineError::illegal("RevealOnAction only accepts REVEAL")),
    }
}

// ---------------------------------------------------------------------
// Eager ("always") transitions
// ---------------------------------------------------------------------

/// Runs the `always`-list for `tag`, in the spec's listed order, stopping at
/// the first match. Returns `Ok(None)` when no guard in the list fires,
/// meaning `tag` is now at rest (or, for `GameOver`, terminal) and
/// [`transition`] should stop looping.
fn eager_step(tag: StateTag, ctx: &mut Context) -> Result<Option<StateTag>> {
    match tag {
        StateTag::WaitForResponse => {
            let action = ctx
                .current_action
                .ok_or_else(|| EngineError::invariant("WaitForResponse with no current_action"))?;
            if ctx.def.is_uncontested(action) {
                pay_action_cost(ctx)?;
                Ok(Some(StateTag::FinishAction))
            } else {
                Ok(None)
            }
        }
        StateTag::Challenge => {
            if let Some(role) = auto_reveal_role(ctx)? {
                trace!("auto-revealing sole remaining influence under challenge");
                enter_exec_reveal_on_challenge(ctx, role)?;
                Ok(Some(StateTag::ExecRevealOnChallenge))
            } else {
                Ok(None)
            }
        }
        StateTag::ExecRevealOnChallenge => {
            if is_challenge_incorrect(ctx)? {
                enter_challenge_incorrect(ctx)?;
                Ok(Some(StateTag::ChallengeIncorrect))
            } else if ctx.blocker.is_some() {
                enter_finish_action(ctx)?;
                Ok(Some(StateTag::FinishAction))
            } else {
                Ok(Some(StateTag::EndOfTurn))
            }
        }
        StateTag::ChallengeIncorrect => {
            if let Some(role) = auto_reveal_role(ctx)? {
                trace!("auto-revealing sole remaining influence for the counter-reveal");
                enter_exec_counter_reveal(ctx, role)?;
                Ok(Some(StateTag::ExecCounterReveal))
            } else {
                Ok(None)
            }
        }
        StateTag::ExecCounterReveal => {
            if ctx.blocker.is_some() {
                Ok(Some(StateTag::EndOfTurn))
            } else {
                let action = ctx
                    .current_action
                    .ok_or_else(|| EngineError::invariant("ExecCounterReveal with no current_action"))?;
                if ctx.def.is_blockable(action) {
                    enter_wait_for_block(ctx)?;
                    Ok(Some(StateTag::WaitForBlock))
                } else {
                    enter_finish_action(ctx)?;
                    Ok(Some(StateTag::FinishAction))
                }
            }
        }
        StateTag::FinishAction => {
            if ctx.revealer.is_some() && ctx.revealed_role.is_none() {
                Ok(Some(StateTag::RevealOnAction))
            } else {
                Ok(Some(StateTag::EndOfTurn))
            }
        }
        StateTag::RevealOnAction => {
            if let Some(role) = auto_reveal_role(ctx)? {
                let revealer = ctx.revealer.expect("auto_reveal_role already checked revealer");
                reveal_influence(ctx, revealer, role)?;
                ctx.revealer = None;
                trace!("auto-revealing the sole remaining influence owed on this action");
                Ok(Some(StateTag::EndOfTurn))
            } else {
                Ok(None)
            }
        }
        StateTag::EndOfTurn => {
            if ctx.living_player_count() <= 1 {
                warn!("game over");
                Ok(Some(StateTag::GameOver))
            } else {
                let next = next_living_player(ctx, ctx.whose_turn);
                ctx.whose_turn = next;
                ctx.reset_for_start_of_turn();
                debug!("turn passes to player {next}");
                Ok(Some(StateTag::StartOfTurn))
            }
        }
        StateTag::StartOfTurn
        | StateTag::Block
        | StateTag::WaitForBlock
        | StateTag::GameOver => Ok(None),
    }
}

// ---------------------------------------------------------------------
// Public transition function
// ---------------------------------------------------------------------

/// Validates `event` against `state` and, if legal, returns the resulting
/// state after running every eager transition that follows. `state` is
/// borrowed, not consumed: a rejected event never touches the caller's
/// copy, matching the engine's failure-atomicity contract.
pub fn transition(state: &State, event: &Event) -> Result<State> {
    let mut ctx = state.ctx.clone();
    let mut tag = dispatch_event(state.tag, &mut ctx, event)?;
    while let Some(next) = eager_step(tag, &mut ctx)? {
        tag = next;
    }
    debug_assert!(tag.is_rest(), "transition must stop at a rest state");
    Ok(State::new(tag, ctx))
}
