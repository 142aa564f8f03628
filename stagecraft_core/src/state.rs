// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! States: mutually exclusive application modes that own ordered layers.
//!
//! A [`State`] owns zero or more layers (see [`layer`](crate::layer)) and an
//! optional piece of its own per-frame logic, supplied as a [`StateLogic`]
//! implementation. When the state is dispatched it runs its layers first, in
//! registration order, then its own hook.
//!
//! # Update pass
//!
//! 1. Enabled layers run in registration order. Disabled layers are skipped
//!    without counting as failures.
//! 2. The first layer that returns `false` stops the pass: the layers after
//!    it are not run this frame.
//! 3. The state's own [`on_update`](StateLogic::on_update) runs according to
//!    the state's [`LayerFailurePolicy`]. With the default
//!    [`RunState`](LayerFailurePolicy::RunState) it always runs; with
//!    [`SkipState`](LayerFailurePolicy::SkipState) it runs only when no layer
//!    stopped the pass.
//! 4. The result is `true` only if no layer stopped and the state's own hook
//!    (if it ran) returned `true`.
//!
//! # Create and destroy passes
//!
//! Every layer, enabled or not, sees [`on_create`](crate::layer::Layer::on_create)
//! and [`on_destroy`](crate::layer::Layer::on_destroy) in registration order.
//! A layer returning `false` stops the pass, and the state's own hook then
//! does not run. These passes are driven only by the owning
//! [`Manager`](crate::manager::Manager); a state cannot be created or
//! destroyed from outside this crate.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::error::Error;
use crate::id::{LayerId, StateId};
use crate::layer::{Layer, LayerSlot};
#[cfg(feature = "trace-rich")]
use crate::trace::LayerDispatchEvent;
use crate::trace::{FrameBeginEvent, FrameSummaryBuilder, LayerOutcome, Tracer};

/// A state's own lifecycle hooks, run after its layers.
///
/// All hooks default to `true`, so a state that only renders needs nothing
/// but [`on_update`](Self::on_update).
pub trait StateLogic {
    /// Runs after every layer's create hook succeeded.
    fn on_create(&mut self) -> bool {
        true
    }

    /// Runs once per frame after the layer pass. `elapsed` is in seconds.
    fn on_update(&mut self, elapsed: f32) -> bool {
        _ = elapsed;
        true
    }

    /// Runs after every layer's destroy hook succeeded.
    fn on_destroy(&mut self) -> bool {
        true
    }
}

/// State logic that does nothing and always continues.
///
/// Used by [`State::empty`] for states that only aggregate their layers.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoLogic;

impl StateLogic for NoLogic {}

/// What a state does with its own update hook after a layer stops the pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LayerFailurePolicy {
    /// Run the state's own hook anyway. The layer failure still makes the
    /// frame result `false`.
    #[default]
    RunState,
    /// Skip the state's own hook and return `false` immediately.
    SkipState,
}

/// An application mode owning an ordered set of layers.
pub struct State {
    id: StateId,
    enabled: bool,
    layers: Vec<LayerSlot>,
    logic: Box<dyn StateLogic>,
    failure_policy: LayerFailurePolicy,
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("id", &self.id)
            .field("enabled", &self.enabled)
            .field("layers", &self.layers)
            .field("failure_policy", &self.failure_policy)
            .finish_non_exhaustive()
    }
}

impl State {
    /// Creates a state with the given identity and own logic.
    #[must_use]
    pub fn new(id: StateId, logic: impl StateLogic + 'static) -> Self {
        Self::from_boxed(id, Box::new(logic))
    }

    /// Creates a state from already boxed logic.
    #[must_use]
    pub fn from_boxed(id: StateId, logic: Box<dyn StateLogic>) -> Self {
        Self {
            id,
            enabled: true,
            layers: Vec::new(),
            logic,
            failure_policy: LayerFailurePolicy::default(),
        }
    }

    /// Creates a state with no logic of its own.
    #[must_use]
    pub fn empty(id: StateId) -> Self {
        Self::new(id, NoLogic)
    }

    /// Adds a layer and returns `self`, for building states inline.
    ///
    /// A colliding id is ignored, as with [`add_layer`](Self::add_layer).
    #[must_use]
    pub fn with_layer(mut self, id: LayerId, layer: impl Layer + 'static) -> Self {
        self.add_layer(id, layer);
        self
    }

    /// Sets the failure policy and returns `self`.
    #[must_use]
    pub fn with_failure_policy(mut self, policy: LayerFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Returns the state's identity.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> StateId {
        self.id
    }

    /// Returns the enabled flag.
    ///
    /// The manager does not consult this flag: a disabled state can still be
    /// activated and dispatched. It is metadata for other systems to poll.
    #[inline]
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Sets the enabled flag.
    #[inline]
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Returns the failure policy.
    #[inline]
    #[must_use]
    pub const fn failure_policy(&self) -> LayerFailurePolicy {
        self.failure_policy
    }

    /// Sets the failure policy.
    pub fn set_failure_policy(&mut self, policy: LayerFailurePolicy) {
        self.failure_policy = policy;
    }

    /// Returns the number of owned layers, enabled or not.
    #[inline]
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Returns the owned layers in dispatch order.
    pub fn layers(&self) -> core::slice::Iter<'_, LayerSlot> {
        self.layers.iter()
    }

    /// Returns the layer with the given id.
    #[must_use]
    pub fn layer(&self, id: LayerId) -> Option<&LayerSlot> {
        self.layers.iter().find(|slot| slot.id() == id)
    }

    /// Returns the layer with the given id, mutably.
    #[must_use]
    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut LayerSlot> {
        self.layers.iter_mut().find(|slot| slot.id() == id)
    }

    /// Returns whether a layer with the given id is owned by this state.
    #[must_use]
    pub fn contains_layer(&self, id: LayerId) -> bool {
        self.layer(id).is_some()
    }

    /// Appends a layer to the dispatch order.
    ///
    /// Returns `false`, dropping `layer`, if the id is already taken. The
    /// layer registered first keeps its slot.
    pub fn add_layer(&mut self, id: LayerId, layer: impl Layer + 'static) -> bool {
        self.try_add_layer(id, layer).is_ok()
    }

    /// Appends a layer, reporting a colliding id as [`Error::DuplicateLayer`].
    pub fn try_add_layer(&mut self, id: LayerId, layer: impl Layer + 'static) -> Result<(), Error> {
        if self.contains_layer(id) {
            return Err(Error::DuplicateLayer {
                state: self.id,
                layer: id,
            });
        }
        self.layers.push(LayerSlot::new(id, layer));
        Ok(())
    }

    /// Enables or disables a layer. Returns `false` if the id is unknown.
    pub fn set_layer_enabled(&mut self, id: LayerId, enabled: bool) -> bool {
        self.try_set_layer_enabled(id, enabled).is_ok()
    }

    /// Enables or disables a layer, reporting an unknown id as
    /// [`Error::UnknownLayer`].
    pub fn try_set_layer_enabled(&mut self, id: LayerId, enabled: bool) -> Result<(), Error> {
        let state = self.id;
        let slot = self
            .layer_mut(id)
            .ok_or(Error::UnknownLayer { state, layer: id })?;
        slot.set_enabled(enabled);
        Ok(())
    }

    /// Runs one update pass outside of a manager and returns its result.
    ///
    /// See the [module docs](self) for the pass order.
    pub fn dispatch(&mut self, elapsed: f32) -> bool {
        let begin = FrameBeginEvent {
            frame_index: 0,
            state: Some(self.id),
            elapsed,
        };
        let mut summary = FrameSummaryBuilder::new(&begin);
        self.run_update(elapsed, 0, &mut summary, &mut Tracer::none())
    }

    // -- Lifecycle entry points, driven by the manager --

    pub(crate) fn run_update(
        &mut self,
        elapsed: f32,
        frame_index: u64,
        summary: &mut FrameSummaryBuilder,
        tracer: &mut Tracer<'_>,
    ) -> bool {
        #[cfg(not(feature = "trace-rich"))]
        {
            _ = (frame_index, &tracer);
        }

        let mut layers_ok = true;
        for slot in &mut self.layers {
            let outcome = if !layers_ok {
                summary.layer_skipped();
                LayerOutcome::Skipped
            } else if !slot.enabled() {
                summary.layer_disabled();
                LayerOutcome::Disabled
            } else {
                layers_ok = slot.dispatch(elapsed);
                summary.layer_ran(layers_ok);
                if layers_ok {
                    LayerOutcome::Continued
                } else {
                    LayerOutcome::Stopped
                }
            };
            #[cfg(feature = "trace-rich")]
            tracer.layer_dispatch(&LayerDispatchEvent {
                frame_index,
                state: self.id,
                layer: slot.id(),
                outcome,
            });
            #[cfg(not(feature = "trace-rich"))]
            {
                _ = outcome;
            }
        }

        if !layers_ok && self.failure_policy == LayerFailurePolicy::SkipState {
            return false;
        }
        summary.state_hook_ran();
        let own = self.logic.on_update(elapsed);
        layers_ok && own
    }

    pub(crate) fn run_create(&mut self) -> bool {
        self.layers.iter_mut().all(LayerSlot::create) && self.logic.on_create()
    }

    pub(crate) fn run_destroy(&mut self) -> bool {
        self.layers.iter_mut().all(LayerSlot::destroy) && self.logic.on_destroy()
    }
}
