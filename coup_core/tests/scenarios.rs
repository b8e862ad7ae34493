//! End-to-end scenarios driven purely through the public API: `initial_state`
//! plus a scripted sequence of `transition` calls, asserted against the
//! resulting `State` rather than printed.

use coup_core::{
    initial_state, is_game_over, player_cash, player_has_unrevealed_role, player_unrevealed_count,
    whose_turn, ActionName, Event, GameDef, InitialConfig, Role, Seed, StateTag,
};

fn two_player_config(p0: [Role; 2], p1: [Role; 2], cash: u32, whose_turn: usize, seed: [u32; 4]) -> InitialConfig {
    InitialConfig::new(vec![p0, p1], cash, whose_turn, Seed::new(seed), GameDef::default_ruleset())
}

#[test]
fn s1_income_credits_active_player_and_passes_turn() {
    let cfg = two_player_config(
        [Role::Duke, Role::Captain],
        [Role::Assassin, Role::Duke],
        2,
        0,
        [1, 2, 3, 4],
    );
    let s0 = initial_state(cfg).unwrap();
    let s1 = coup_core::transition(&s0, &Event::action(0, ActionName::Income, None)).unwrap();
    assert_eq!(s1.tag(), StateTag::StartOfTurn);
    assert_eq!(whose_turn(&s1), 1);
    assert_eq!(player_cash(&s1, 0), Some(3));
    assert_eq!(player_cash(&s1, 1), Some(2));
}

#[test]
fn s2_tax_then_allow_credits_three() {
    let cfg = two_player_config(
        [Role::Duke, Role::Captain],
        [Role::Assassin, Role::Duke],
        2,
        0,
        [1, 2, 3, 4],
    );
    let s0 = initial_state(cfg).unwrap();
    let s1 = coup_core::transition(&s0, &Event::action(0, ActionName::Tax, None)).unwrap();
    assert_eq!(s1.tag(), StateTag::WaitForResponse);
    assert_eq!(s1.context().current_action, Some(ActionName::Tax));
    let s2 = coup_core::transition(&s1, &Event::allow(1)).unwrap();
    assert_eq!(s2.tag(), StateTag::StartOfTurn);
    assert_eq!(whose_turn(&s2), 1);
    assert_eq!(player_cash(&s2, 0), Some(5));
}

#[test]
fn s3_tax_challenged_challenger_wrong() {
    let cfg = two_player_config(
        [Role::Duke, Role::Captain],
        [Role::Assassin, Role::Duke],
        2,
        0,
        [1, 2, 3, 4],
    );
    let s0 = initial_state(cfg).unwrap();
    let s1 = coup_core::transition(&s0, &Event::action(0, ActionName::Tax, None)).unwrap();
    let s2 = coup_core::transition(&s1, &Event::challenge(1)).unwrap();
    assert_eq!(s2.tag(), StateTag::Challenge);
    assert_eq!(s2.context().revealer, Some(0));
    let deck_before_swap = s2.context().deck.clone();
    let s3 = coup_core::transition(&s2, &Event::reveal(0, Role::Duke)).unwrap();
    assert_eq!(s3.tag(), StateTag::ChallengeIncorrect);
    assert_eq!(s3.context().revealer, Some(1));
    assert_eq!(player_unrevealed_count(&s3, 0), Some(2));
    assert_eq!(player_has_unrevealed_role(&s3, 0, Role::Duke), Some(true));
    let s4 = coup_core::transition(&s3, &Event::reveal(1, Role::Duke)).unwrap();
    assert_eq!(s4.tag(), StateTag::StartOfTurn);
    assert_eq!(player_unrevealed_count(&s4, 1), Some(1));
    assert_eq!(player_cash(&s4, 0), Some(5));
    assert_ne!(s4.context().deck, deck_before_swap);
}

#[test]
fn s4_foreign_aid_blocked_and_allowed() {
    let cfg = two_player_config(
        [Role::Duke, Role::Captain],
        [Role::Assassin, Role::Duke],
        2,
        0,
        [1, 2, 3, 4],
    );
    let s0 = initial_state(cfg).unwrap();
    let s1 = coup_core::transition(&s0, &Event::action(0, ActionName::ForeignAid, None)).unwrap();
    assert_eq!(s1.tag(), StateTag::WaitForResponse);
    let s2 = coup_core::transition(&s1, &Event::block(1, Role::Duke)).unwrap();
    assert_eq!(s2.tag(), StateTag::Block);
    let s3 = coup_core::transition(&s2, &Event::allow(0)).unwrap();
    assert_eq!(s3.tag(), StateTag::StartOfTurn);
    assert_eq!(whose_turn(&s3), 1);
    assert_eq!(player_cash(&s3, 0), Some(2));
}

#[test]
fn s5_assassinate_then_target_reveals() {
    let cfg = two_player_config(
        [Role::Duke, Role::Captain],
        [Role::Assassin, Role::Duke],
        3,
        1,
        [1, 2, 3, 4],
    );
    let s0 = initial_state(cfg).unwrap();
    let s1 = coup_core::transition(&s0, &Event::action(1, ActionName::Assassinate, Some(0))).unwrap();
    assert_eq!(s1.tag(), StateTag::WaitForResponse);
    let s2 = coup_core::transition(&s1, &Event::allow(0)).unwrap();
    assert_eq!(s2.tag(), StateTag::RevealOnAction);
    assert_eq!(player_cash(&s2, 1), Some(0));
    let s3 = coup_core::transition(&s2, &Event::reveal(0, Role::Captain)).unwrap();
    assert_eq!(s3.tag(), StateTag::StartOfTurn);
    assert_eq!(player_unrevealed_count(&s3, 0), Some(1));
    assert_eq!(player_has_unrevealed_role(&s3, 0, Role::Captain), Some(false));
}

#[test]
fn s6_last_chance_block_after_incorrect_challenge_of_assassinate() {
    let cfg = two_player_config(
        [Role::Captain, Role::Duke],
        [Role::Assassin, Role::Contessa],
        5,
        1,
        [1, 2, 3, 4],
    );
    let s0 = initial_state(cfg).unwrap();
    let s1 = coup_core::transition(&s0, &Event::action(1, ActionName::Assassinate, Some(0))).unwrap();
    let s2 = coup_core::transition(&s1, &Event::challenge(0)).unwrap();
    assert_eq!(s2.tag(), StateTag::Challenge);
    assert_eq!(s2.context().revealer, Some(1));
    let s3 = coup_core::transition(&s2, &Event::reveal(1, Role::Assassin)).unwrap();
    assert_eq!(s3.tag(), StateTag::ChallengeIncorrect);
    assert_eq!(s3.context().revealer, Some(0));
    let s4 = coup_core::transition(&s3, &Event::reveal(0, Role::Captain)).unwrap();
    assert_eq!(s4.tag(), StateTag::WaitForBlock);
    let s5 = coup_core::transition(&s4, &Event::block(0, Role::Contessa)).unwrap();
    assert_eq!(s5.tag(), StateTag::Block);
}

#[test]
fn s7_game_over_on_a_one_influence_players_bluff_correctly_challenged() {
    // P1 never holds a duke. The first bluffed tax, correctly challenged,
    // costs P1 its ambassador and leaves it at one unrevealed card
    // (captain). The second bluffed tax auto-reveals that last card under
    // challenge, which is also not a duke, so the challenge is correct
    // again and P1 is eliminated.
    let cfg = two_player_config(
        [Role::Duke, Role::Assassin],
        [Role::Captain, Role::Ambassador],
        2,
        0,
        [1, 2, 3, 4],
    );
    let s0 = initial_state(cfg).unwrap();

    let s1 = coup_core::transition(&s0, &Event::action(0, ActionName::Income, None)).unwrap();
    assert_eq!(whose_turn(&s1), 1);

    let s2 = coup_core::transition(&s1, &Event::action(1, ActionName::Tax, None)).unwrap();
    let s3 = coup_core::transition(&s2, &Event::challenge(0)).unwrap();
    assert_eq!(s3.tag(), StateTag::Challenge);
    let s4 = coup_core::transition(&s3, &Event::reveal(1, Role::Ambassador)).unwrap();
    assert_eq!(s4.tag(), StateTag::StartOfTurn);
    assert_eq!(whose_turn(&s4), 0);
    assert_eq!(player_unrevealed_count(&s4, 1), Some(1));
    assert_eq!(player_has_unrevealed_role(&s4, 1, Role::Captain), Some(true));

    let s5 = coup_core::transition(&s4, &Event::action(0, ActionName::Income, None)).unwrap();
    assert_eq!(whose_turn(&s5), 1);

    let s6 = coup_core::transition(&s5, &Event::action(1, ActionName::Tax, None)).unwrap();
    let s7 = coup_core::transition(&s6, &Event::challenge(0)).unwrap();
    assert_eq!(s7.tag(), StateTag::GameOver);
    assert!(is_game_over(&s7));
    assert_eq!(player_unrevealed_count(&s7, 1), Some(0));
    assert_eq!(player_unrevealed_count(&s7, 0), Some(2));
}

#[test]
fn s8_coup_pays_cost_and_skips_the_challenge_and_block_window() {
    // coup's rulebook row has empty required_roles and empty blocking_roles,
    // so `WaitForResponse`'s eager check (`is_uncontested`) should fire
    // immediately: no BLOCK/CHALLENGE event is ever legal against it, the
    // action lands straight in FinishAction, and the turn passes with the
    // cost already deducted.
    let cfg = two_player_config(
        [Role::Duke, Role::Captain],
        [Role::Assassin, Role::Ambassador],
        7,
        0,
        [1, 2, 3, 4],
    );
    let s0 = initial_state(cfg).unwrap();
    let s1 = coup_core::transition(&s0, &Event::action(0, ActionName::Coup, Some(1))).unwrap();

    // No rest in WaitForResponse, Block, or Challenge: the eager chain runs
    // straight through to the next StartOfTurn in one `transition` call.
    assert_eq!(s1.tag(), StateTag::StartOfTurn);
    assert_eq!(whose_turn(&s1), 1);
    assert_eq!(player_cash(&s1, 0), Some(0));
}

#[test]
fn p1_deck_and_influence_total_is_conserved_across_a_challenge() {
    let cfg = two_player_config(
        [Role::Duke, Role::Captain],
        [Role::Assassin, Role::Duke],
        2,
        0,
        [7, 8, 9, 10],
    );
    let s0 = initial_state(cfg).unwrap();
    let total = |s: &coup_core::State| {
        s.context().deck.len()
            + (0..s.context().players.len())
                .map(|i| player_unrevealed_count(s, i).unwrap() as usize)
                .sum::<usize>()
    };
    let total_before = total(&s0);
    let s1 = coup_core::transition(&s0, &Event::action(0, ActionName::Tax, None)).unwrap();
    let s2 = coup_core::transition(&s1, &Event::challenge(1)).unwrap();
    let s3 = coup_core::transition(&s2, &Event::reveal(0, Role::Duke)).unwrap();
    let s4 = coup_core::transition(&s3, &Event::reveal(1, Role::Duke)).unwrap();
    assert_eq!(total(&s4), total_before);
}

#[test]
fn p2_cash_never_goes_negative_after_paying_for_assassinate() {
    let cfg = two_player_config(
        [Role::Duke, Role::Captain],
        [Role::Assassin, Role::Ambassador],
        3,
        1,
        [3, 1, 4, 1],
    );
    let s0 = initial_state(cfg).unwrap();
    let s1 = coup_core::transition(&s0, &Event::action(1, ActionName::Assassinate, Some(0))).unwrap();
    let s2 = coup_core::transition(&s1, &Event::allow(0)).unwrap();
    assert_eq!(player_cash(&s2, 1), Some(0));
    assert!(coup_core::transition(&s0, &Event::action(1, ActionName::Assassinate, Some(0))).is_ok());
}

#[test]
fn p3_start_of_turn_clears_every_sub_protocol_field() {
    let cfg = two_player_config(
        [Role::Duke, Role::Captain],
        [Role::Assassin, Role::Duke],
        2,
        0,
        [1, 2, 3, 4],
    );
    let s0 = initial_state(cfg).unwrap();
    let s1 = coup_core::transition(&s0, &Event::action(0, ActionName::Tax, None)).unwrap();
    let s2 = coup_core::transition(&s1, &Event::allow(1)).unwrap();
    assert_eq!(s2.tag(), StateTag::StartOfTurn);
    let ctx = s2.context();
    assert!(ctx.current_action.is_none());
    assert!(ctx.blocker.is_none());
    assert!(ctx.challenger.is_none());
    assert!(ctx.revealer.is_none());
    assert!(ctx.revealed_role.is_none());
}

#[test]
fn p5_same_seed_and_events_reproduce_the_same_state() {
    let events = [
        Event::action(0, ActionName::Tax, None),
        Event::challenge(1),
        Event::reveal(0, Role::Duke),
        Event::reveal(1, Role::Duke),
    ];
    let run = || {
        let cfg = two_player_config(
            [Role::Duke, Role::Captain],
            [Role::Assassin, Role::Duke],
            2,
            0,
            [42, 42, 42, 42],
        );
        let mut s = initial_state(cfg).unwrap();
        for e in &events {
            s = coup_core::transition(&s, e).unwrap();
        }
        s
    };
    let a = run();
    let b = run();
    assert_eq!(a.context().deck, b.context().deck);
    assert_eq!(a.tag(), b.tag());
    assert_eq!(player_cash(&a, 0), player_cash(&b, 0));
}

#[test]
fn rejecting_an_illegal_event_does_not_perturb_later_accepted_transitions() {
    let cfg = two_player_config(
        [Role::Duke, Role::Captain],
        [Role::Assassin, Role::Duke],
        2,
        0,
        [1, 2, 3, 4],
    );
    let s0 = initial_state(cfg).unwrap();
    let rejected = coup_core::transition(&s0, &Event::action(1, ActionName::Income, None));
    assert!(rejected.is_err());
    assert_eq!(whose_turn(&s0), 0);
    let s1 = coup_core::transition(&s0, &Event::action(0, ActionName::Income, None)).unwrap();
    assert_eq!(player_cash(&s1, 0), Some(3));
}
