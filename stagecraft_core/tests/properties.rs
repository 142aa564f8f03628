// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for registration, activation, and routing.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use proptest::prelude::*;
use stagecraft_core::id::{LayerId, StateId};
use stagecraft_core::manager::Manager;
use stagecraft_core::state::{State, StateLogic};

#[derive(Clone, Debug)]
enum Op {
    Add { id: u16, is_default: bool },
    Activate(u16),
    Dispatch,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0_u16..8, any::<bool>()).prop_map(|(id, is_default)| Op::Add { id, is_default }),
        (0_u16..12).prop_map(Op::Activate),
        Just(Op::Dispatch),
    ]
}

/// Records which state ran each frame.
struct Tag {
    id: u16,
    hits: Rc<RefCell<Vec<u16>>>,
}

impl StateLogic for Tag {
    fn on_update(&mut self, _elapsed: f32) -> bool {
        self.hits.borrow_mut().push(self.id);
        true
    }
}

proptest! {
    #[test]
    fn count_equals_distinct_ids(ids in proptest::collection::vec(0_u16..16, 0..40)) {
        let mut manager = Manager::new();
        for &id in &ids {
            manager.add_state(State::empty(StateId(id)), false);
        }
        let distinct: HashSet<_> = ids.iter().copied().collect();
        prop_assert_eq!(manager.count(), distinct.len());
    }

    #[test]
    fn routing_follows_the_model(ops in proptest::collection::vec(op(), 0..60)) {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let mut manager = Manager::new();

        // Reference model: registration order and the current id.
        let mut registered: Vec<u16> = Vec::new();
        let mut current: Option<u16> = None;
        let mut ever_current = false;

        for op in ops {
            match op {
                Op::Add { id, is_default } => {
                    let state = State::new(StateId(id), Tag { id, hits: Rc::clone(&hits) });
                    let accepted = manager.add_state(state, is_default);
                    prop_assert_eq!(accepted, !registered.contains(&id));
                    if accepted {
                        registered.push(id);
                        if is_default {
                            current = Some(id);
                        }
                    }
                }
                Op::Activate(id) => {
                    if registered.contains(&id) {
                        current = Some(id);
                    }
                    manager.activate_state(StateId(id));
                }
                Op::Dispatch => {
                    hits.borrow_mut().clear();
                    prop_assert!(manager.dispatch(0.016));
                    let expected: Vec<u16> = current.into_iter().collect();
                    prop_assert_eq!(&*hits.borrow(), &expected);
                }
            }

            prop_assert_eq!(manager.current_id(), current.map(StateId));
            ever_current |= current.is_some();
            if ever_current {
                prop_assert!(manager.current_state().is_some());
            }
        }
    }

    #[test]
    fn unknown_activation_keeps_current(start in 0_u16..4, miss in 4_u16..100) {
        let mut manager = Manager::new();
        for id in 0..4 {
            manager.add_state(State::empty(StateId(id)), id == start);
        }
        manager.activate_state(StateId(miss));
        prop_assert_eq!(manager.current_id(), Some(StateId(start)));
    }

    #[test]
    fn layers_run_in_insertion_order(
        ids in proptest::collection::vec(0_u16..32, 1..12),
        stop_at in proptest::option::of(0_usize..12),
    ) {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut state = State::empty(StateId(0));
        let mut inserted = Vec::new();
        for &id in &ids {
            let order = Rc::clone(&order);
            let index = inserted.len();
            let keep_going = stop_at != Some(index);
            let added = state.add_layer(LayerId(id), move |_: f32| {
                order.borrow_mut().push(id);
                keep_going
            });
            if added {
                inserted.push(id);
            }
        }

        let result = state.dispatch(0.016);

        let expected: Vec<u16> = match stop_at {
            Some(stop) if stop < inserted.len() => inserted[..=stop].to_vec(),
            _ => inserted.clone(),
        };
        prop_assert_eq!(&*order.borrow(), &expected);
        prop_assert_eq!(result, !matches!(stop_at, Some(stop) if stop < inserted.len()));
    }
}

#[test]
fn repeated_activation_has_no_side_effects() {
    let hits = Rc::new(RefCell::new(Vec::new()));
    let mut manager = Manager::new();
    for id in 0..3 {
        let tag = Tag {
            id,
            hits: Rc::clone(&hits),
        };
        manager.add_state(State::new(StateId(id), tag), id == 0);
    }
    manager.create();

    manager.activate_state(StateId(1));
    manager.activate_state(StateId(1));
    assert!(hits.borrow().is_empty(), "activation must not dispatch");

    assert!(manager.dispatch(0.016));
    assert_eq!(*hits.borrow(), [1]);
}
