//! Smoke-test binary: builds a fresh game and drives it through a short,
//! hand-scripted sequence of events, printing the resulting `Context` after
//! each one. A thin `main` that exercises the library crate end to end, not
//! a test harness in its own right.

use coup_core::{initial_state, ActionName, Event, GameDef, InitialConfig, Role, Seed};

fn main() {
    env_logger::init();

    let config = InitialConfig::new(
        vec![
            [Role::Duke, Role::Captain],
            [Role::Assassin, Role::Ambassador],
        ],
        2,
        0,
        Seed::fresh(),
        GameDef::default_ruleset(),
    );

    let mut state = initial_state(config).expect("a two-player game always starts cleanly");
    println!("opening state: {:?}", state.context());

    let script = [Event::action(0, ActionName::Tax, None), Event::challenge(1)];

    for event in script {
        match coup_core::transition(&state, &event) {
            Ok(next) => {
                println!(
                    "{:?} -> {:?} (whose_turn now {})",
                    event,
                    next.tag(),
                    next.context().whose_turn
                );
                state = next;
            }
            Err(e) => println!("{:?} rejected: {e}", event),
        }
    }

    println!("final state: {:?}", state.context());
}
