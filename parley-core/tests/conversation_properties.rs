//! Property-based tests for the single-active-conversation invariant.
//!
//! Uses `proptest` to drive random sequences of target switches, clears,
//! and turn appends, and checks the structural guarantees the tick loop
//! relies on.

use proptest::prelude::*;

use parley_core::conversation::ConversationState;
use parley_core::types::EntityId;

/// One tick-thread operation against the conversation state.
#[derive(Debug, Clone)]
enum Op {
    SetTarget(u64),
    ClearTarget,
    AppendToTarget(String),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..6u64).prop_map(Op::SetTarget),
        Just(Op::ClearTarget),
        "[a-z ]{1,16}".prop_map(Op::AppendToTarget),
    ]
}

proptest! {
    // Under tick-thread-only mutation (appends go to the current target),
    // at most one entity ever holds a history, and it is the target.
    #[test]
    fn at_most_one_live_history(ops in prop::collection::vec(arb_op(), 0..64)) {
        let state = ConversationState::new();

        for op in ops {
            match op {
                Op::SetTarget(id) => state.set_target(EntityId(id)),
                Op::ClearTarget => state.clear_target(),
                Op::AppendToTarget(text) => {
                    if let Some(target) = state.current_target() {
                        state.append_turn(target, &format!("\nPlayer: {text}\nNpc:"));
                    }
                }
            }

            prop_assert!(state.tracked_entities() <= 1);
            if let Some(target) = state.current_target() {
                // Any non-target entity reads back empty.
                for id in 0..6u64 {
                    if EntityId(id) != target {
                        prop_assert_eq!(state.history(EntityId(id)), String::new());
                    }
                }
            } else {
                prop_assert_eq!(state.tracked_entities(), 0);
            }
        }
    }

    // A stale append (entity no longer targeted) always succeeds, never
    // moves the target, and never touches the target's own history.
    #[test]
    fn stale_appends_are_isolated(
        stale_id in 10..20u64,
        target_id in 0..6u64,
        text in "[a-z ]{1,24}",
    ) {
        let state = ConversationState::new();
        state.set_target(EntityId(target_id));
        state.append_turn(EntityId(target_id), "\nPlayer: hi\nNpc: hello");
        let before = state.history(EntityId(target_id));

        state.append_turn(EntityId(stale_id), &format!("\nPlayer: {text}\nNpc: late"));

        prop_assert_eq!(state.current_target(), Some(EntityId(target_id)));
        prop_assert_eq!(state.history(EntityId(target_id)), before);
        prop_assert!(state.history(EntityId(stale_id)).contains("late"));
    }

    // The history cap holds for any append pattern.
    #[test]
    fn history_never_exceeds_limit(
        turns in prop::collection::vec("[a-z]{1,40}", 1..40),
        limit in 64..512usize,
    ) {
        let state = ConversationState::with_history_limit(limit);
        let npc = EntityId(1);
        state.set_target(npc);

        for turn in &turns {
            state.append_turn(npc, &format!("\nPlayer: {turn}\nNpc: {turn}"));
            prop_assert!(state.history(npc).len() <= limit);
        }
    }
}
