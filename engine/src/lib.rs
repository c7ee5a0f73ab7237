//! Game-state engine for running a youth lacrosse bench: who is on the field,
//! the quarter clock, goals and field time, an activity log and undo.
//!
//! All mutation goes through [`Game`]. Rendering, timers and storage wiring
//! live with the caller; the engine only exposes plain data and operations.

pub mod activity;
pub mod clock;
pub mod config;
pub mod error;
pub mod export;
pub mod game;
pub mod history;
pub mod persistence;
pub mod roster;
pub mod stats;

pub use activity::{ActivityLog, LogEntry, LogKind};
pub use clock::{ClockState, GameClock, TickOutcome, quarter_name};
pub use config::GameConfig;
pub use error::{GameError, Result};
pub use export::{export_log, write_export};
pub use game::{Fatigue, Game, GameState, GoalEvent, MoveOutcome, Zone};
pub use persistence::{FileStore, Loaded, MemoryStore, SavedGame, SnapshotStore, load, save};
pub use roster::{Player, PlayerId, Roster};
pub use stats::{PlayerStats, StatsTable, format_clock};

#[cfg(test)]
mod invariant_tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Toggle(usize),
        Drag(usize, bool, usize),
        Goal(usize),
        Tick(u8),
        Start,
        Pause,
        ResetClock,
        NextQuarter,
        Undo,
        Reset,
        Remove(usize),
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0usize..9).prop_map(Op::Toggle),
            2 => (0usize..9, any::<bool>(), 0usize..10).prop_map(|(p, f, i)| Op::Drag(p, f, i)),
            2 => (0usize..9).prop_map(Op::Goal),
            3 => (1u8..40).prop_map(Op::Tick),
            1 => Just(Op::Start),
            1 => Just(Op::Pause),
            1 => Just(Op::ResetClock),
            1 => Just(Op::NextQuarter),
            2 => Just(Op::Undo),
            1 => Just(Op::Reset),
            1 => (0usize..9).prop_map(Op::Remove),
        ]
    }

    fn apply(game: &mut Game, op: &Op) {
        let seed: Vec<PlayerId> = game.seed().iter().map(|p| p.id.clone()).collect();
        let pick = |index: usize| &seed[index % seed.len()];
        let _ = match op {
            Op::Toggle(p) => game.toggle(pick(*p)).map(|_| ()),
            Op::Drag(p, to_field, i) => {
                let zone = if *to_field { Zone::Field } else { Zone::Bench };
                game.move_player(pick(*p), zone, *i).map(|_| ())
            }
            Op::Goal(p) => game.record_goal(pick(*p)).map(|_| ()),
            Op::Tick(n) => {
                for _ in 0..*n {
                    game.tick();
                }
                Ok(())
            }
            Op::Start => game.start_clock(),
            Op::Pause => game.toggle_pause().map(|_| ()),
            Op::ResetClock => game.reset_clock(),
            Op::NextQuarter => game.next_quarter().map(|_| ()),
            Op::Undo => game.undo(),
            Op::Reset => game.reset(),
            Op::Remove(p) => game.remove_player(pick(*p)).map(|_| ()),
        };
    }

    proptest! {
        #[test]
        fn zone_partition_and_field_cap_always_hold(ops in proptest::collection::vec(arb_op(), 0..80)) {
            let mut game = Game::new(GameConfig::default(), Roster::seed());
            let goalie = game.seed().goalie().map(|p| p.id.clone()).unwrap();
            for op in &ops {
                apply(&mut game, op);

                let state = game.state();
                prop_assert!(state.validate(game.config()).is_ok());
                prop_assert!(game.field_count() <= game.config().field_cap);
                prop_assert!(game.on_field().contains(&goalie));
                prop_assert!(!game.on_bench().contains(&goalie));
                prop_assert_eq!(game.on_field().len() + game.on_bench().len(), game.roster().len());
                prop_assert!((1..=4).contains(&game.clock().quarter()));
                prop_assert_eq!(game.score(), state.stats().total_goals());
            }
        }

        #[test]
        fn a_recorded_operation_is_undone_exactly(ops in proptest::collection::vec(arb_op(), 0..40), last in arb_op()) {
            let mut game = Game::new(GameConfig::default(), Roster::seed());
            for op in &ops {
                apply(&mut game, op);
            }
            if matches!(last, Op::Undo | Op::Tick(_)) {
                return Ok(());
            }
            let before = game.state().clone();
            let depth = game.undo_depth();
            apply(&mut game, &last);
            if game.clock().is_finished() {
                let finished = game.state().clone();
                prop_assert!(game.undo().is_err());
                prop_assert_eq!(game.state(), &finished);
                return Ok(());
            }
            if game.undo_depth() > depth {
                game.undo().unwrap();
            }
            prop_assert_eq!(game.state(), &before);
        }

        #[test]
        fn ticking_a_stopped_clock_changes_nothing(ops in proptest::collection::vec(arb_op(), 0..40), ticks in 1u32..30) {
            let mut game = Game::new(GameConfig::default(), Roster::seed());
            for op in &ops {
                apply(&mut game, op);
            }
            if game.clock().is_ticking() {
                game.pause().unwrap();
            }
            let before = game.state().clone();
            for _ in 0..ticks {
                prop_assert_eq!(game.tick(), TickOutcome::Idle);
            }
            prop_assert_eq!(game.state(), &before);
        }
    }
}
