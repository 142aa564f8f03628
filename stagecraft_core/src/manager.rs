// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! State ownership, activation, and frame dispatch.
//!
//! The [`Manager`] owns every registered [`State`] and marks exactly one of
//! them as *current*. Each frame, the driver calls
//! [`dispatch`](Manager::dispatch) and the manager forwards the call to the
//! current state, handing the state's result back unchanged. A `false`
//! result means the application loop should stop; the driver is free to
//! ignore it.
//!
//! States form a flat, fully connected set: any registered state can be
//! activated from any other, activating the current state is a no-op, and
//! there is no terminal state. Switching is immediate and never runs a
//! lifecycle hook. Setup and teardown happen in [`create`](Manager::create)
//! and [`destroy`](Manager::destroy) instead.
//!
//! # Usage
//!
//! ```
//! use stagecraft_core::id::{LayerId, StateId};
//! use stagecraft_core::manager::Manager;
//! use stagecraft_core::state::State;
//!
//! const MENU: StateId = StateId(0);
//! const PLAY: StateId = StateId(1);
//!
//! let mut manager = Manager::new();
//! manager.add_state(State::empty(MENU), true);
//! manager.add_state(
//!     State::empty(PLAY).with_layer(LayerId(0), |_elapsed: f32| true),
//!     false,
//! );
//! manager.create();
//!
//! assert!(manager.dispatch(0.016));
//! manager.activate_state(PLAY);
//! assert_eq!(manager.current_id(), Some(PLAY));
//! assert!(manager.dispatch(0.016));
//!
//! manager.destroy();
//! ```

use alloc::vec::Vec;

use crate::error::Error;
use crate::id::StateId;
use crate::state::State;
use crate::trace::{
    ActivationMissEvent, FrameBeginEvent, FrameEndEvent, FrameSummaryBuilder, LifecycleEvent,
    LifecyclePhase, StateActivatedEvent, StateAddedEvent, Tracer,
};

/// Configuration for the [`Manager`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ManagerConfig {
    /// Run the create pass for states registered after
    /// [`Manager::create`] has already run.
    pub create_late_states: bool,
    /// Run [`Manager::destroy`] when a created manager is dropped without
    /// having been destroyed.
    pub destroy_on_drop: bool,
}

impl ManagerConfig {
    /// The default configuration: late states are created on registration
    /// and a created manager tears its states down on drop.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            create_late_states: true,
            destroy_on_drop: true,
        }
    }

    /// Lifecycle hooks run only through explicit
    /// [`create`](Manager::create) and [`destroy`](Manager::destroy) calls.
    #[must_use]
    pub const fn manual() -> Self {
        Self {
            create_late_states: false,
            destroy_on_drop: false,
        }
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Owner of all states and router of frame dispatch.
///
/// States are kept in registration order. The current state is tracked by
/// index into that list; since states are never removed, the index stays
/// valid for the manager's lifetime.
#[derive(Debug)]
pub struct Manager {
    config: ManagerConfig,
    states: Vec<State>,
    current: Option<usize>,
    frame_index: u64,
    /// Result of the create pass, once it has run.
    created: Option<bool>,
    /// Result of the destroy pass, once it has run.
    destroyed: Option<bool>,
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}

impl Manager {
    /// Creates an empty manager with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ManagerConfig::new())
    }

    /// Creates an empty manager with the given configuration.
    #[must_use]
    pub fn with_config(config: ManagerConfig) -> Self {
        Self {
            config,
            states: Vec::new(),
            current: None,
            frame_index: 0,
            created: None,
            destroyed: None,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ManagerConfig {
        &self.config
    }

    // -- Registration --

    /// Registers a state.
    ///
    /// Returns `false`, dropping `state`, if a state with the same id is
    /// already registered; the first registration wins and `is_default` is
    /// ignored. Otherwise the state is appended and, when `is_default` is
    /// set, becomes current.
    ///
    /// If the manager has already been [created](Self::create) and
    /// [`ManagerConfig::create_late_states`] is set, the state's create pass
    /// runs here. Its result is reported through tracing only; the state
    /// stays registered either way.
    pub fn add_state(&mut self, state: State, is_default: bool) -> bool {
        self.add_state_traced(state, is_default, &mut Tracer::none())
    }

    /// Like [`add_state`](Self::add_state), reporting a colliding id as
    /// [`Error::DuplicateState`].
    pub fn try_add_state(&mut self, state: State, is_default: bool) -> Result<(), Error> {
        let id = state.id();
        if self.add_state(state, is_default) {
            Ok(())
        } else {
            Err(Error::DuplicateState(id))
        }
    }

    /// Like [`add_state`](Self::add_state), emitting trace events.
    pub fn add_state_traced(
        &mut self,
        mut state: State,
        is_default: bool,
        tracer: &mut Tracer<'_>,
    ) -> bool {
        let id = state.id();
        if self.contains(id) {
            tracer.state_added(&StateAddedEvent {
                state: id,
                is_default,
                accepted: false,
            });
            return false;
        }

        if self.is_created() && self.config.create_late_states {
            let result = state.run_create();
            tracer.lifecycle(&LifecycleEvent {
                phase: LifecyclePhase::Create,
                state: id,
                result,
            });
        }

        self.states.push(state);
        tracer.state_added(&StateAddedEvent {
            state: id,
            is_default,
            accepted: true,
        });

        if is_default {
            self.switch_to(self.states.len() - 1, tracer);
        }
        true
    }

    // -- Activation --

    /// Makes the state with the given id current.
    ///
    /// Activating the current state does nothing. An unknown id leaves the
    /// current state unchanged and is not reported; use
    /// [`try_activate_state`](Self::try_activate_state) to detect it.
    pub fn activate_state(&mut self, id: StateId) {
        self.activate_state_traced(id, &mut Tracer::none());
    }

    /// Like [`activate_state`](Self::activate_state), reporting an unknown id
    /// as [`Error::UnknownState`].
    pub fn try_activate_state(&mut self, id: StateId) -> Result<(), Error> {
        if !self.contains(id) {
            return Err(Error::UnknownState(id));
        }
        self.activate_state(id);
        Ok(())
    }

    /// Like [`activate_state`](Self::activate_state), emitting trace events.
    pub fn activate_state_traced(&mut self, id: StateId, tracer: &mut Tracer<'_>) {
        if self.current_id() == Some(id) {
            return;
        }
        match self.position(id) {
            Some(idx) => self.switch_to(idx, tracer),
            None => tracer.activation_miss(&ActivationMissEvent {
                frame_index: self.frame_index,
                requested: id,
                current: self.current_id(),
            }),
        }
    }

    // -- Dispatch --

    /// Dispatches one frame to the current state and returns its result.
    ///
    /// With no current state this does nothing and returns `true`.
    pub fn dispatch(&mut self, elapsed: f32) -> bool {
        self.dispatch_traced(elapsed, &mut Tracer::none())
    }

    /// Like [`dispatch`](Self::dispatch), emitting trace events.
    pub fn dispatch_traced(&mut self, elapsed: f32, tracer: &mut Tracer<'_>) -> bool {
        let frame_index = self.frame_index;
        self.frame_index += 1;

        let begin = FrameBeginEvent {
            frame_index,
            state: self.current_id(),
            elapsed,
        };
        tracer.frame_begin(&begin);

        let mut summary = FrameSummaryBuilder::new(&begin);
        let result = match self.current {
            Some(idx) => self.states[idx].run_update(elapsed, frame_index, &mut summary, tracer),
            None => true,
        };

        tracer.frame_end(&FrameEndEvent {
            frame_index,
            state: begin.state,
            result,
        });
        tracer.frame_summary(&summary.finish(result));
        result
    }

    // -- Lifecycle --

    /// Runs the create pass for every registered state, in registration
    /// order.
    ///
    /// Stops at the first state whose pass returns `false` and returns
    /// `false`. Later calls return the first call's result without running
    /// any hooks. After [`destroy`](Self::destroy), a manager that was never
    /// created returns `false` and stays uncreated.
    pub fn create(&mut self) -> bool {
        self.create_traced(&mut Tracer::none())
    }

    /// Like [`create`](Self::create), emitting trace events.
    pub fn create_traced(&mut self, tracer: &mut Tracer<'_>) -> bool {
        if let Some(result) = self.created {
            return result;
        }
        if self.destroyed.is_some() {
            return false;
        }
        let result = Self::run_pass(&mut self.states, LifecyclePhase::Create, tracer);
        self.created = Some(result);
        result
    }

    /// Runs the destroy pass for every registered state, in registration
    /// order.
    ///
    /// Stops at the first state whose pass returns `false` and returns
    /// `false`. The states themselves are still dropped with the manager;
    /// a `false` result never keeps anything alive. Later calls return the
    /// first call's result without running any hooks.
    pub fn destroy(&mut self) -> bool {
        self.destroy_traced(&mut Tracer::none())
    }

    /// Like [`destroy`](Self::destroy), emitting trace events.
    pub fn destroy_traced(&mut self, tracer: &mut Tracer<'_>) -> bool {
        if let Some(result) = self.destroyed {
            return result;
        }
        let result = Self::run_pass(&mut self.states, LifecyclePhase::Destroy, tracer);
        self.destroyed = Some(result);
        result
    }

    /// Returns whether [`create`](Self::create) has run and
    /// [`destroy`](Self::destroy) has not.
    #[must_use]
    pub fn is_created(&self) -> bool {
        self.created.is_some() && self.destroyed.is_none()
    }

    /// Returns whether [`destroy`](Self::destroy) has run.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.is_some()
    }

    // -- Enabled flags --

    /// Sets a state's enabled flag. Returns `false` if the id is unknown.
    ///
    /// Does not change which state is current.
    pub fn set_state_enabled(&mut self, id: StateId, enabled: bool) -> bool {
        self.try_set_state_enabled(id, enabled).is_ok()
    }

    /// Like [`set_state_enabled`](Self::set_state_enabled), reporting an
    /// unknown id as [`Error::UnknownState`].
    pub fn try_set_state_enabled(&mut self, id: StateId, enabled: bool) -> Result<(), Error> {
        let state = self.state_mut(id).ok_or(Error::UnknownState(id))?;
        state.set_enabled(enabled);
        Ok(())
    }

    // -- Queries --

    /// Returns the number of registered states.
    #[must_use]
    pub fn count(&self) -> usize {
        self.states.len()
    }

    /// Returns whether a state with the given id is registered.
    #[must_use]
    pub fn contains(&self, id: StateId) -> bool {
        self.position(id).is_some()
    }

    /// Returns the registered states in registration order.
    pub fn states(&self) -> core::slice::Iter<'_, State> {
        self.states.iter()
    }

    /// Returns the state with the given id.
    #[must_use]
    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.iter().find(|s| s.id() == id)
    }

    /// Returns the state with the given id, mutably.
    #[must_use]
    pub fn state_mut(&mut self, id: StateId) -> Option<&mut State> {
        self.states.iter_mut().find(|s| s.id() == id)
    }

    /// Returns the id of the current state.
    #[must_use]
    pub fn current_id(&self) -> Option<StateId> {
        self.current.map(|idx| self.states[idx].id())
    }

    /// Returns the current state.
    #[must_use]
    pub fn current_state(&self) -> Option<&State> {
        self.current.map(|idx| &self.states[idx])
    }

    /// Returns the current state, mutably.
    #[must_use]
    pub fn current_state_mut(&mut self) -> Option<&mut State> {
        self.current.map(|idx| &mut self.states[idx])
    }

    /// Returns the number of frames dispatched so far.
    #[must_use]
    pub const fn frame_index(&self) -> u64 {
        self.frame_index
    }

    // -- Internal helpers --

    fn position(&self, id: StateId) -> Option<usize> {
        self.states.iter().position(|s| s.id() == id)
    }

    fn switch_to(&mut self, idx: usize, tracer: &mut Tracer<'_>) {
        let from = self.current_id();
        self.current = Some(idx);
        tracer.state_activated(&StateActivatedEvent {
            frame_index: self.frame_index,
            from,
            to: self.states[idx].id(),
        });
    }

    fn run_pass(states: &mut [State], phase: LifecyclePhase, tracer: &mut Tracer<'_>) -> bool {
        for state in states {
            let result = match phase {
                LifecyclePhase::Create => state.run_create(),
                LifecyclePhase::Destroy => state.run_destroy(),
            };
            tracer.lifecycle(&LifecycleEvent {
                phase,
                state: state.id(),
                result,
            });
            if !result {
                return false;
            }
        }
        true
    }
}

impl Drop for Manager {
    fn drop(&mut self) {
        if self.config.destroy_on_drop && self.is_created() {
            self.destroy();
        }
    }
}
