// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Elapsed
//! frame times are shown in milliseconds.

use std::fmt;
use std::io::Write;

use stagecraft_core::id::StateId;
use stagecraft_core::trace::{
    ActivationMissEvent, FrameBeginEvent, FrameEndEvent, FrameSummary, LayerDispatchEvent,
    LayerOutcome, LifecycleEvent, LifecyclePhase, StateActivatedEvent, StateAddedEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    show_frames: bool,
}

impl<W: Write> fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("show_frames", &self.show_frames)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self::with_writer(writer)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            show_frames: true,
        }
    }

    /// Suppresses the per-frame begin/end and layer lines, keeping
    /// registration, activation, lifecycle, and summary output.
    #[must_use]
    pub fn summaries_only(mut self) -> Self {
        self.show_frames = false;
        self
    }

    /// Consumes the sink and returns the writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Formats an optional state as its id or `-`.
struct OptState(Option<StateId>);

impl fmt::Display for OptState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(id) => write!(f, "{id}"),
            None => f.write_str("-"),
        }
    }
}

fn verdict(result: bool) -> &'static str {
    if result { "continue" } else { "STOP" }
}

fn ms(elapsed: f32) -> f64 {
    f64::from(elapsed) * 1000.0
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_state_added(&mut self, e: &StateAddedEvent) {
        let status = if e.accepted { "ok" } else { "duplicate" };
        let _ = writeln!(
            self.writer,
            "[add] state={} default={} {status}",
            e.state, e.is_default,
        );
    }

    fn on_state_activated(&mut self, e: &StateActivatedEvent) {
        let _ = writeln!(
            self.writer,
            "[activate] frame={} {} -> {}",
            e.frame_index,
            OptState(e.from),
            e.to,
        );
    }

    fn on_activation_miss(&mut self, e: &ActivationMissEvent) {
        let _ = writeln!(
            self.writer,
            "[miss] frame={} requested={} current={}",
            e.frame_index,
            e.requested,
            OptState(e.current),
        );
    }

    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        if !self.show_frames {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[frame:begin] frame={} state={} elapsed={:.3}ms",
            e.frame_index,
            OptState(e.state),
            ms(e.elapsed),
        );
    }

    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        if !self.show_frames {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[frame:end] frame={} state={} {}",
            e.frame_index,
            OptState(e.state),
            verdict(e.result),
        );
    }

    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        let phase = match e.phase {
            LifecyclePhase::Create => "create",
            LifecyclePhase::Destroy => "destroy",
        };
        let status = if e.result { "ok" } else { "FAILED" };
        let _ = writeln!(self.writer, "[{phase}] state={} {status}", e.state);
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        let _ = writeln!(
            self.writer,
            "[summary] frame={} state={} elapsed={:.3}ms run={} disabled={} \
             skipped={} hook={} {}",
            s.frame_index,
            OptState(s.state),
            ms(s.elapsed),
            s.layers_run,
            s.layers_disabled,
            s.layers_skipped,
            if s.state_hook_ran { "ran" } else { "skipped" },
            verdict(s.result),
        );
    }

    fn on_layer_dispatch(&mut self, e: &LayerDispatchEvent) {
        if !self.show_frames {
            return;
        }
        let outcome = match e.outcome {
            LayerOutcome::Continued => "continue",
            LayerOutcome::Stopped => "STOP",
            LayerOutcome::Disabled => "disabled",
            LayerOutcome::Skipped => "skipped",
        };
        let _ = writeln!(
            self.writer,
            "[layer] frame={} state={} layer={} {outcome}",
            e.frame_index, e.state, e.layer,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagecraft_core::id::LayerId;

    fn output(sink: PrettyPrintSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn pretty_print_frame_begin() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_frame_begin(&FrameBeginEvent {
            frame_index: 1,
            state: Some(StateId(2)),
            elapsed: 0.016,
        });
        let output = output(sink);
        assert!(output.contains("[frame:begin]"), "got: {output}");
        assert!(output.contains("frame=1"), "got: {output}");
        assert!(output.contains("state=2"), "got: {output}");
        assert!(output.contains("elapsed=16.000ms"), "got: {output}");
    }

    #[test]
    fn missing_state_prints_dash() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_activation_miss(&ActivationMissEvent {
            frame_index: 0,
            requested: StateId(7),
            current: None,
        });
        let output = output(sink);
        assert_eq!(output, "[miss] frame=0 requested=7 current=-\n");
    }

    #[test]
    fn stop_results_stand_out() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_layer_dispatch(&LayerDispatchEvent {
            frame_index: 4,
            state: StateId(1),
            layer: LayerId(3),
            outcome: LayerOutcome::Stopped,
        });
        sink.on_frame_end(&FrameEndEvent {
            frame_index: 4,
            state: Some(StateId(1)),
            result: false,
        });
        let output = output(sink);
        assert!(output.contains("layer=3 STOP"), "got: {output}");
        assert!(output.contains("[frame:end] frame=4 state=1 STOP"), "got: {output}");
    }

    #[test]
    fn summaries_only_hides_frame_lines() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new()).summaries_only();
        let begin = FrameBeginEvent {
            frame_index: 0,
            state: None,
            elapsed: 0.01,
        };
        sink.on_frame_begin(&begin);
        sink.on_frame_summary(
            &stagecraft_core::trace::FrameSummaryBuilder::new(&begin).finish(true),
        );
        let output = output(sink);
        assert!(!output.contains("[frame:begin]"), "got: {output}");
        assert!(output.starts_with("[summary]"), "got: {output}");
    }
}
