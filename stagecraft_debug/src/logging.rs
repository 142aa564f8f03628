// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Forwarding of trace events to the [`tracing`] ecosystem.
//!
//! [`TracingSink`] turns each event into a structured `tracing` record under
//! the `stagecraft` target, so the application's subscriber decides what is
//! shown and where:
//!
//! | Event                      | Level   |
//! |----------------------------|---------|
//! | registration, activation   | `INFO`  |
//! | duplicate registration     | `DEBUG` |
//! | activation miss            | `WARN`  |
//! | lifecycle pass             | `INFO` (`WARN` on failure) |
//! | frame summary              | `DEBUG` (`WARN` when the frame stops) |
//! | frame begin/end, layers    | `TRACE` |

use stagecraft_core::trace::{
    ActivationMissEvent, FrameBeginEvent, FrameEndEvent, FrameSummary, LayerDispatchEvent,
    LifecycleEvent, StateActivatedEvent, StateAddedEvent, TraceSink,
};
use tracing::{debug, info, trace, warn};

/// A [`TraceSink`] that emits `tracing` records.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Creates a new sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TraceSink for TracingSink {
    fn on_state_added(&mut self, e: &StateAddedEvent) {
        if e.accepted {
            info!(
                target: "stagecraft",
                state = %e.state,
                is_default = e.is_default,
                "state registered"
            );
        } else {
            debug!(target: "stagecraft", state = %e.state, "duplicate state ignored");
        }
    }

    fn on_state_activated(&mut self, e: &StateActivatedEvent) {
        info!(
            target: "stagecraft",
            frame = e.frame_index,
            from = ?e.from,
            to = %e.to,
            "state activated"
        );
    }

    fn on_activation_miss(&mut self, e: &ActivationMissEvent) {
        warn!(
            target: "stagecraft",
            frame = e.frame_index,
            requested = %e.requested,
            current = ?e.current,
            "activation of unregistered state ignored"
        );
    }

    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        trace!(
            target: "stagecraft",
            frame = e.frame_index,
            state = ?e.state,
            elapsed = e.elapsed,
            "frame begin"
        );
    }

    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        trace!(
            target: "stagecraft",
            frame = e.frame_index,
            state = ?e.state,
            result = e.result,
            "frame end"
        );
    }

    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        if e.result {
            info!(target: "stagecraft", phase = ?e.phase, state = %e.state, "lifecycle pass");
        } else {
            warn!(
                target: "stagecraft",
                phase = ?e.phase,
                state = %e.state,
                "lifecycle pass failed"
            );
        }
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        if s.result {
            debug!(
                target: "stagecraft",
                frame = s.frame_index,
                state = ?s.state,
                run = s.layers_run,
                disabled = s.layers_disabled,
                skipped = s.layers_skipped,
                "frame dispatched"
            );
        } else {
            warn!(
                target: "stagecraft",
                frame = s.frame_index,
                state = ?s.state,
                layer_stopped = s.layer_stopped,
                run = s.layers_run,
                skipped = s.layers_skipped,
                "frame asked the loop to stop"
            );
        }
    }

    fn on_layer_dispatch(&mut self, e: &LayerDispatchEvent) {
        trace!(
            target: "stagecraft",
            frame = e.frame_index,
            state = %e.state,
            layer = %e.layer,
            outcome = ?e.outcome,
            "layer dispatch"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;
    use stagecraft_core::id::StateId;
    use tracing::Level;

    /// Collects formatted output from a test subscriber.
    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn captured(max_level: Level, f: impl FnOnce(&mut TracingSink)) -> String {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(max_level)
            .finish();
        tracing::subscriber::with_default(subscriber, || f(&mut TracingSink::new()));
        let bytes = capture.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn registration_is_logged_at_info() {
        let out = captured(Level::INFO, |sink| {
            sink.on_state_added(&StateAddedEvent {
                state: StateId(3),
                is_default: true,
                accepted: true,
            });
        });
        assert!(out.contains("INFO"), "got: {out}");
        assert!(out.contains("state registered"), "got: {out}");
        assert!(out.contains("state=3"), "got: {out}");
    }

    #[test]
    fn misses_are_warnings() {
        let out = captured(Level::WARN, |sink| {
            sink.on_activation_miss(&ActivationMissEvent {
                frame_index: 2,
                requested: StateId(9),
                current: Some(StateId(1)),
            });
        });
        assert!(out.contains("WARN"), "got: {out}");
        assert!(out.contains("requested=9"), "got: {out}");
    }

    #[test]
    fn frame_events_stay_below_info() {
        let out = captured(Level::INFO, |sink| {
            sink.on_frame_begin(&FrameBeginEvent {
                frame_index: 0,
                state: Some(StateId(1)),
                elapsed: 0.016,
            });
            sink.on_frame_end(&FrameEndEvent {
                frame_index: 0,
                state: Some(StateId(1)),
                result: true,
            });
        });
        assert!(out.is_empty(), "got: {out}");
    }
}
