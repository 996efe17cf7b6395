//! Property-based invariant tests for the surface registry and selection cycle.
//!
//! ## Invariants
//!
//! 1. `is_valid(slot)` agrees with `get(slot).is_some()` after any event sequence
//! 2. A destruction notice only clears the handle it names
//! 3. The registry matches a simple last-writer model of create/destroy events
//! 4. Advancing the selection follows A -> B -> None -> A for any count

use std::collections::HashMap;

use proptest::prelude::*;
use surfswitch_core::{InputSlot, SelectionState, SurfaceHandle, SurfaceRegistry, SurfaceRole};

// ── Strategies ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Op {
    Create(SurfaceRole, u64),
    Destroy(SurfaceRole, u64),
}

fn arb_role() -> impl Strategy<Value = SurfaceRole> {
    prop_oneof![
        Just(SurfaceRole::Output),
        Just(SurfaceRole::Input(InputSlot::A)),
        Just(SurfaceRole::Input(InputSlot::B)),
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    (arb_role(), 0u64..6, any::<bool>()).prop_map(|(role, raw, create)| {
        if create {
            Op::Create(role, raw)
        } else {
            Op::Destroy(role, raw)
        }
    })
}

fn apply(reg: &mut SurfaceRegistry, op: Op) {
    match op {
        Op::Create(role, raw) => reg.set_role(role, Some(SurfaceHandle::new(raw))),
        Op::Destroy(role, raw) => {
            reg.revoke(role, SurfaceHandle::new(raw));
        }
    }
}

// ── 1. Validity agrees with lookup ────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn validity_matches_lookup(ops in prop::collection::vec(arb_op(), 0..64)) {
        let mut reg = SurfaceRegistry::new();
        for op in ops {
            apply(&mut reg, op);
            for slot in InputSlot::ALL {
                prop_assert_eq!(reg.is_valid(slot), reg.get(slot).is_some());
            }
        }
    }
}

// ── 2. Destroy only clears its own handle ─────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn destroy_only_clears_named_handle(
        role in arb_role(),
        current in 0u64..6,
        destroyed in 0u64..6,
    ) {
        let mut reg = SurfaceRegistry::new();
        reg.set_role(role, Some(SurfaceHandle::new(current)));
        let cleared = reg.revoke(role, SurfaceHandle::new(destroyed));
        prop_assert_eq!(cleared, current == destroyed);
        if current == destroyed {
            prop_assert_eq!(reg.get_role(role), None);
        } else {
            prop_assert_eq!(reg.get_role(role), Some(SurfaceHandle::new(current)));
        }
    }
}

// ── 3. Last-writer model ──────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn registry_matches_model(ops in prop::collection::vec(arb_op(), 0..64)) {
        let mut reg = SurfaceRegistry::new();
        let mut model: HashMap<SurfaceRole, u64> = HashMap::new();
        for op in ops {
            apply(&mut reg, op);
            match op {
                Op::Create(role, raw) => {
                    model.insert(role, raw);
                }
                Op::Destroy(role, raw) => {
                    if model.get(&role) == Some(&raw) {
                        model.remove(&role);
                    }
                }
            }
        }
        for role in [
            SurfaceRole::Output,
            SurfaceRole::Input(InputSlot::A),
            SurfaceRole::Input(InputSlot::B),
        ] {
            prop_assert_eq!(
                reg.get_role(role),
                model.get(&role).copied().map(SurfaceHandle::new)
            );
        }
    }
}

// ── 4. Cyclic totality ────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn advancing_follows_cycle(advances in 0usize..200) {
        let cycle = [SelectionState::A, SelectionState::B, SelectionState::None];
        let mut state = SelectionState::default();
        for i in 0..advances {
            prop_assert_eq!(state, cycle[i % 3]);
            state = state.next();
        }
        prop_assert_eq!(state, cycle[advances % 3]);
    }
}
