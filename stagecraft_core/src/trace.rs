// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for state registration, activation, and dispatch.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [`Manager`](crate::manager::Manager) calls as it registers, activates, and
//! dispatches states. All method bodies default to no-ops, so implementing
//! only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! [`FrameSummaryBuilder`] collects per-layer outcomes during a frame and
//! produces a [`FrameSummary`] at the end.
//!
//! # Crate features
//!
//! - `trace` enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) gates [`LayerDispatchEvent`] and the
//!   corresponding `TraceSink` method.

use crate::id::StateId;
#[cfg(feature = "trace-rich")]
use crate::id::LayerId;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which lifecycle pass produced a [`LifecycleEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecyclePhase {
    /// The create pass (`Manager::create` or late registration).
    Create,
    /// The destroy pass (`Manager::destroy` or drop).
    Destroy,
}

/// What happened to one layer during an update pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerOutcome {
    /// The layer ran and asked to continue.
    Continued,
    /// The layer ran and asked to stop; later layers are skipped.
    Stopped,
    /// The layer is disabled and was not run.
    Disabled,
    /// An earlier layer stopped the pass, so this one was not run.
    Skipped,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted for every state registration attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateAddedEvent {
    /// The submitted state's id.
    pub state: StateId,
    /// Whether the caller asked for this state to become current.
    pub is_default: bool,
    /// `false` when the id was already registered and the call was ignored.
    pub accepted: bool,
}

/// Emitted when the current state changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateActivatedEvent {
    /// Frame counter at the time of the switch.
    pub frame_index: u64,
    /// The previously current state, if any.
    pub from: Option<StateId>,
    /// The newly current state.
    pub to: StateId,
}

/// Emitted when an activation names an id that is not registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActivationMissEvent {
    /// Frame counter at the time of the request.
    pub frame_index: u64,
    /// The id that was asked for.
    pub requested: StateId,
    /// The state that stays current.
    pub current: Option<StateId>,
}

/// Marks the beginning of a frame dispatch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameBeginEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// The state receiving the frame, or `None` when nothing is current.
    pub state: Option<StateId>,
    /// Elapsed frame time in seconds, as passed by the driver.
    pub elapsed: f32,
}

/// Marks the end of a frame dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameEndEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// The state that received the frame.
    pub state: Option<StateId>,
    /// The result handed back to the driver. `false` means "stop".
    pub result: bool,
}

/// Emitted after a state's create or destroy pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LifecycleEvent {
    /// Which pass ran.
    pub phase: LifecyclePhase,
    /// The state whose hooks ran.
    pub state: StateId,
    /// Conjunction of the layer hooks and the state's own hook.
    pub result: bool,
}

/// Emitted once per layer during an update pass.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerDispatchEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// The owning state.
    pub state: StateId,
    /// The layer.
    pub layer: LayerId,
    /// Whether it ran, and with what result.
    pub outcome: LayerOutcome,
}

/// Per-frame dispatch summary produced by [`FrameSummaryBuilder`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSummary {
    /// Frame counter.
    pub frame_index: u64,
    /// The state that received the frame.
    pub state: Option<StateId>,
    /// Elapsed frame time in seconds.
    pub elapsed: f32,
    /// Layers whose update hook ran.
    pub layers_run: u32,
    /// Layers not run because they are disabled.
    pub layers_disabled: u32,
    /// Layers not run because an earlier layer stopped the pass.
    pub layers_skipped: u32,
    /// Whether a layer stopped the pass.
    pub layer_stopped: bool,
    /// Whether the state's own update hook ran.
    pub state_hook_ran: bool,
    /// The result handed back to the driver.
    pub result: bool,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the manager.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called for every registration attempt, accepted or not.
    fn on_state_added(&mut self, e: &StateAddedEvent) {
        _ = e;
    }

    /// Called when the current state changes.
    fn on_state_activated(&mut self, e: &StateActivatedEvent) {
        _ = e;
    }

    /// Called when an activation names an unregistered id.
    fn on_activation_miss(&mut self, e: &ActivationMissEvent) {
        _ = e;
    }

    /// Called before a frame is dispatched.
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        _ = e;
    }

    /// Called after a frame is dispatched.
    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        _ = e;
    }

    /// Called after a state's create or destroy pass.
    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        _ = e;
    }

    /// Called with a per-frame summary.
    fn on_frame_summary(&mut self, s: &FrameSummary) {
        _ = s;
    }

    /// Called once per layer during an update pass (requires `trace-rich`).
    #[cfg(feature = "trace-rich")]
    fn on_layer_dispatch(&mut self, e: &LayerDispatchEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`StateAddedEvent`].
    #[inline]
    pub fn state_added(&mut self, e: &StateAddedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_state_added(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`StateActivatedEvent`].
    #[inline]
    pub fn state_activated(&mut self, e: &StateActivatedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_state_activated(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`ActivationMissEvent`].
    #[inline]
    pub fn activation_miss(&mut self, e: &ActivationMissEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_activation_miss(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameBeginEvent`].
    #[inline]
    pub fn frame_begin(&mut self, e: &FrameBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameEndEvent`].
    #[inline]
    pub fn frame_end(&mut self, e: &FrameEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LifecycleEvent`].
    #[inline]
    pub fn lifecycle(&mut self, e: &LifecycleEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_lifecycle(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameSummary`].
    #[inline]
    pub fn frame_summary(&mut self, s: &FrameSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_frame_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits a [`LayerDispatchEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn layer_dispatch(&mut self, e: &LayerDispatchEvent) {
        if let Some(s) = &mut self.sink {
            s.on_layer_dispatch(e);
        }
    }
}

// ---------------------------------------------------------------------------
// FrameSummaryBuilder
// ---------------------------------------------------------------------------

/// Collects layer outcomes during a frame and produces a [`FrameSummary`].
#[derive(Debug)]
pub struct FrameSummaryBuilder {
    begin: FrameBeginEvent,
    layers_run: u32,
    layers_disabled: u32,
    layers_skipped: u32,
    layer_stopped: bool,
    state_hook_ran: bool,
}

impl FrameSummaryBuilder {
    /// Starts building a summary for the given frame.
    #[must_use]
    pub fn new(begin: &FrameBeginEvent) -> Self {
        Self {
            begin: *begin,
            layers_run: 0,
            layers_disabled: 0,
            layers_skipped: 0,
            layer_stopped: false,
            state_hook_ran: false,
        }
    }

    /// Records a layer whose update hook ran with the given result.
    pub fn layer_ran(&mut self, result: bool) {
        self.layers_run += 1;
        if !result {
            self.layer_stopped = true;
        }
    }

    /// Records a disabled layer.
    pub fn layer_disabled(&mut self) {
        self.layers_disabled += 1;
    }

    /// Records a layer skipped after an earlier layer stopped the pass.
    pub fn layer_skipped(&mut self) {
        self.layers_skipped += 1;
    }

    /// Records that the state's own update hook ran.
    pub fn state_hook_ran(&mut self) {
        self.state_hook_ran = true;
    }

    /// Consumes the builder and produces the final [`FrameSummary`].
    #[must_use]
    pub fn finish(self, result: bool) -> FrameSummary {
        FrameSummary {
            frame_index: self.begin.frame_index,
            state: self.begin.state,
            elapsed: self.begin.elapsed,
            layers_run: self.layers_run,
            layers_disabled: self.layers_disabled,
            layers_skipped: self.layers_skipped,
            layer_stopped: self.layer_stopped,
            state_hook_ran: self.state_hook_ran,
            result,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_begin() -> FrameBeginEvent {
        FrameBeginEvent {
            frame_index: 42,
            state: Some(StateId(2)),
            elapsed: 0.016,
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_state_added(&StateAddedEvent {
            state: StateId(0),
            is_default: true,
            accepted: true,
        });
        sink.on_frame_begin(&sample_begin());
        sink.on_frame_summary(&FrameSummaryBuilder::new(&sample_begin()).finish(true));
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.frame_begin(&sample_begin());
        tracer.frame_end(&FrameEndEvent {
            frame_index: 42,
            state: None,
            result: true,
        });
    }

    #[test]
    fn summary_builder_counts_outcomes() {
        let mut builder = FrameSummaryBuilder::new(&sample_begin());
        builder.layer_ran(true);
        builder.layer_disabled();
        builder.layer_ran(false);
        builder.layer_skipped();
        builder.layer_skipped();
        builder.state_hook_ran();

        let summary = builder.finish(false);
        assert_eq!(summary.frame_index, 42);
        assert_eq!(summary.state, Some(StateId(2)));
        assert_eq!(summary.layers_run, 2);
        assert_eq!(summary.layers_disabled, 1);
        assert_eq!(summary.layers_skipped, 2);
        assert!(summary.layer_stopped);
        assert!(summary.state_hook_ran);
        assert!(!summary.result);
    }

    #[test]
    fn summary_builder_empty_frame() {
        let summary = FrameSummaryBuilder::new(&sample_begin()).finish(true);
        assert_eq!(summary.layers_run, 0);
        assert_eq!(summary.layers_disabled, 0);
        assert_eq!(summary.layers_skipped, 0);
        assert!(!summary.layer_stopped);
        assert!(!summary.state_hook_ran);
        assert!(summary.result);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            frames: Vec<u64>,
        }
        impl TraceSink for RecordingSink {
            fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
                self.frames.push(e.frame_index);
            }
        }

        let mut sink = RecordingSink { frames: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.frame_begin(&sample_begin());
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.frames, &[42]);
    }
}
