// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors surfaced by the `try_*` registration and lookup methods.
//!
//! The plain methods ([`Manager::activate_state`], [`State::add_layer`], ...)
//! treat unknown and duplicate ids as silent no-ops. The `try_*` variants
//! report the same conditions through [`Error`] for callers that want to know.
//!
//! [`Manager::activate_state`]: crate::manager::Manager::activate_state
//! [`State::add_layer`]: crate::state::State::add_layer

use crate::id::{LayerId, StateId};

/// A lookup or registration that did not take effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Error {
    /// No state with this id is registered with the manager.
    #[error("no state registered with id {0}")]
    UnknownState(StateId),
    /// A state with this id is already registered; the first one is kept.
    #[error("state {0} is already registered")]
    DuplicateState(StateId),
    /// The state owns no layer with this id.
    #[error("state {state} has no layer with id {layer}")]
    UnknownLayer {
        /// The state that was searched.
        state: StateId,
        /// The missing layer id.
        layer: LayerId,
    },
    /// The state already owns a layer with this id; the first one is kept.
    #[error("state {state} already owns layer {layer}")]
    DuplicateLayer {
        /// The owning state.
        state: StateId,
        /// The colliding layer id.
        layer: LayerId,
    },
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn messages_name_the_ids() {
        assert_eq!(
            Error::UnknownState(StateId(99)).to_string(),
            "no state registered with id 99"
        );
        assert_eq!(
            Error::DuplicateLayer {
                state: StateId(1),
                layer: LayerId(4),
            }
            .to_string(),
            "state 1 already owns layer 4"
        );
    }
}
