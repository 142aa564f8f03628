// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Recordings carry no wall-clock timestamps, so the timeline is rebuilt by
//! summing the elapsed time of each frame: a frame spans from the running
//! clock to the clock plus its own elapsed time. Events outside a frame are
//! placed at the current clock.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use stagecraft_core::id::StateId;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Each frame becomes a `B`/`E` slice named after the state that received
/// it. Registration, activation, misses, lifecycle passes, and layer
/// outcomes become instant events, and each frame summary becomes a counter
/// sample.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    // Running clock in microseconds.
    let mut clock_us = 0.0_f64;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::StateAdded(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "StateAdded",
                    "cat": "Registry",
                    "ts": clock_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "state": e.state.0,
                        "is_default": e.is_default,
                        "accepted": e.accepted,
                    }
                }));
            }
            RecordedEvent::StateActivated(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "StateActivated",
                    "cat": "Routing",
                    "ts": clock_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "frame_index": e.frame_index,
                        "from": e.from.map(|id| id.0),
                        "to": e.to.0,
                    }
                }));
            }
            RecordedEvent::ActivationMiss(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "ActivationMiss",
                    "cat": "Routing",
                    "ts": clock_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "frame_index": e.frame_index,
                        "requested": e.requested.0,
                        "current": e.current.map(|id| id.0),
                    }
                }));
            }
            RecordedEvent::FrameBegin(e) => {
                events.push(json!({
                    "ph": "B",
                    "name": slice_name(e.state),
                    "cat": "Frame",
                    "ts": clock_us,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "frame_index": e.frame_index,
                        "elapsed_ms": f64::from(e.elapsed) * 1000.0,
                    }
                }));
                // Negative or non-finite elapsed values would run the clock
                // backwards, which trace viewers reject.
                if e.elapsed.is_finite() && e.elapsed > 0.0 {
                    clock_us += f64::from(e.elapsed) * 1_000_000.0;
                }
            }
            RecordedEvent::FrameEnd(e) => {
                events.push(json!({
                    "ph": "E",
                    "name": slice_name(e.state),
                    "cat": "Frame",
                    "ts": clock_us,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "frame_index": e.frame_index,
                        "result": e.result,
                    }
                }));
            }
            RecordedEvent::Lifecycle(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("{:?}", e.phase),
                    "cat": "Lifecycle",
                    "ts": clock_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "state": e.state.0,
                        "result": e.result,
                    }
                }));
            }
            RecordedEvent::FrameSummary(s) => {
                events.push(json!({
                    "ph": "C",
                    "name": "Layers",
                    "cat": "Summary",
                    "ts": clock_us,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "run": s.layers_run,
                        "disabled": s.layers_disabled,
                        "skipped": s.layers_skipped,
                    }
                }));
            }
            RecordedEvent::LayerDispatch(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("layer {}", e.layer),
                    "cat": "Layer",
                    "ts": clock_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "state": e.state.0,
                        "outcome": format!("{:?}", e.outcome),
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn slice_name(state: Option<StateId>) -> String {
    match state {
        Some(id) => format!("state {id}"),
        None => "idle".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use stagecraft_core::trace::{FrameBeginEvent, FrameEndEvent, StateAddedEvent, TraceSink};

    fn frame(rec: &mut RecorderSink, frame_index: u64, elapsed: f32) {
        let state = Some(StateId(1));
        rec.on_frame_begin(&FrameBeginEvent {
            frame_index,
            state,
            elapsed,
        });
        rec.on_frame_end(&FrameEndEvent {
            frame_index,
            state,
            result: true,
        });
    }

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_state_added(&StateAddedEvent {
            state: StateId(1),
            is_default: true,
            accepted: true,
        });
        frame(&mut rec, 0, 0.01);

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        // Should parse as a JSON array.
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 3);

        // First event is an instant registration.
        assert_eq!(parsed[0]["ph"], "i");
        assert_eq!(parsed[0]["name"], "StateAdded");

        // Then the frame slice.
        assert_eq!(parsed[1]["ph"], "B");
        assert_eq!(parsed[1]["name"], "state 1");
        assert_eq!(parsed[2]["ph"], "E");
        assert_eq!(parsed[2]["name"], "state 1");
    }

    #[test]
    fn frames_are_laid_end_to_end() {
        let mut rec = RecorderSink::new();
        frame(&mut rec, 0, 0.5);
        frame(&mut rec, 1, 0.25);

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        let ts: Vec<f64> = parsed.iter().map(|e| e["ts"].as_f64().unwrap()).collect();
        assert_eq!(ts, [0.0, 500_000.0, 500_000.0, 750_000.0]);
    }

    #[test]
    fn negative_elapsed_does_not_rewind() {
        let mut rec = RecorderSink::new();
        frame(&mut rec, 0, -1.0);

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[1]["ts"].as_f64(), Some(0.0));
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
