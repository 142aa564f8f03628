// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated game loop that drives a [`Manager`] through menu, play, and
//! pause states.
//!
//! A scripted input sequence activates states and toggles the particle
//! layer while the loop dispatches fixed-length frames. Every manager event
//! goes to a [`TracingSink`](stagecraft_debug::logging::TracingSink) and a
//! [`RecorderSink`](stagecraft_debug::recorder::RecorderSink), and optionally
//! a [`PrettyPrintSink`](stagecraft_debug::pretty::PrettyPrintSink). The
//! recording can be exported as a Chrome trace.

mod cli;
mod scene;

use std::cell::Cell;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use stagecraft_core::id::StateId;
use stagecraft_core::manager::Manager;
use stagecraft_core::trace::{
    ActivationMissEvent, FrameBeginEvent, FrameEndEvent, FrameSummary, LayerDispatchEvent,
    LifecycleEvent, StateActivatedEvent, StateAddedEvent, TraceSink, Tracer,
};
use stagecraft_debug::logging::TracingSink;
use stagecraft_debug::pretty::PrettyPrintSink;
use stagecraft_debug::recorder::RecorderSink;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

/// A state the script tries to activate without registering it.
const MISSING: StateId = StateId(42);

/// One scripted input.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Input {
    Activate(StateId),
    Particles(bool),
}

/// Inputs keyed by the frame they arrive on.
const SCRIPT: &[(u64, Input)] = &[
    (30, Input::Activate(scene::PLAY)),
    (90, Input::Particles(false)),
    (120, Input::Activate(scene::PAUSE)),
    (150, Input::Activate(MISSING)),
    (160, Input::Activate(scene::PLAY)),
    (170, Input::Particles(true)),
];

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let recorder = run(&cli);

    if let Some(path) = &cli.trace_out {
        let file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        stagecraft_debug::chrome::export(recorder.as_bytes(), &mut writer)
            .with_context(|| format!("failed to write Chrome trace to {}", path.display()))?;
        writer.flush()?;
        info!(path = %path.display(), "wrote Chrome trace");
    }

    Ok(())
}

/// Runs the simulated loop and returns the recording.
fn run(cli: &Cli) -> RecorderSink {
    let elapsed = 1.0 / cli.fps;
    let quit = Rc::new(Cell::new(false));

    let mut recorder = RecorderSink::new();
    let mut logger = TracingSink::new();
    let mut pretty = cli
        .pretty
        .then(|| PrettyPrintSink::new(Box::new(std::io::stdout())));

    let mut fanout = Fanout::default();
    fanout.push(&mut recorder);
    fanout.push(&mut logger);
    if let Some(pretty) = &mut pretty {
        fanout.push(pretty);
    }
    let mut tracer = Tracer::new(&mut fanout);

    let mut manager = Manager::new();
    manager.add_state_traced(scene::menu(Rc::clone(&quit)), true, &mut tracer);
    manager.add_state_traced(scene::play(), false, &mut tracer);
    if !manager.create_traced(&mut tracer) {
        warn!("a create hook failed; continuing");
    }
    // Registered after create, so the manager creates it on the spot.
    manager.add_state_traced(scene::pause(), false, &mut tracer);

    let mut frames_run = 0;
    for frame in 0..cli.frames {
        for input in inputs_at(frame) {
            apply(&mut manager, input, &mut tracer);
        }
        if cli.quit_after == Some(frame) {
            info!(frame, "quit requested");
            manager.activate_state_traced(scene::MENU, &mut tracer);
            quit.set(true);
        }

        frames_run += 1;
        if !manager.dispatch_traced(elapsed, &mut tracer) {
            info!(frame, current = ?manager.current_id(), "loop stopped by state");
            break;
        }
    }

    if !manager.destroy_traced(&mut tracer) {
        warn!("a destroy hook failed");
    }
    info!(frames = frames_run, "simulation finished");

    drop(tracer);
    drop(fanout);
    recorder
}

fn inputs_at(frame: u64) -> impl Iterator<Item = Input> {
    SCRIPT
        .iter()
        .filter(move |(at, _)| *at == frame)
        .map(|&(_, input)| input)
}

fn apply(manager: &mut Manager, input: Input, tracer: &mut Tracer<'_>) {
    match input {
        Input::Activate(id) => manager.activate_state_traced(id, tracer),
        Input::Particles(enabled) => {
            let toggled = manager
                .state_mut(scene::PLAY)
                .is_some_and(|play| play.set_layer_enabled(scene::PARTICLES, enabled));
            if !toggled {
                warn!("particle layer not found");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Fan-out sink
// ---------------------------------------------------------------------------

/// Forwards every event to each of its sinks, in insertion order.
#[derive(Default)]
struct Fanout<'a> {
    sinks: Vec<&'a mut dyn TraceSink>,
}

impl<'a> Fanout<'a> {
    fn push(&mut self, sink: &'a mut dyn TraceSink) {
        self.sinks.push(sink);
    }
}

impl std::fmt::Debug for Fanout<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fanout")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl TraceSink for Fanout<'_> {
    fn on_state_added(&mut self, e: &StateAddedEvent) {
        for sink in &mut self.sinks {
            sink.on_state_added(e);
        }
    }

    fn on_state_activated(&mut self, e: &StateActivatedEvent) {
        for sink in &mut self.sinks {
            sink.on_state_activated(e);
        }
    }

    fn on_activation_miss(&mut self, e: &ActivationMissEvent) {
        for sink in &mut self.sinks {
            sink.on_activation_miss(e);
        }
    }

    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        for sink in &mut self.sinks {
            sink.on_frame_begin(e);
        }
    }

    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        for sink in &mut self.sinks {
            sink.on_frame_end(e);
        }
    }

    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        for sink in &mut self.sinks {
            sink.on_lifecycle(e);
        }
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        for sink in &mut self.sinks {
            sink.on_frame_summary(s);
        }
    }

    fn on_layer_dispatch(&mut self, e: &LayerDispatchEvent) {
        for sink in &mut self.sinks {
            sink.on_layer_dispatch(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagecraft_core::trace::LifecyclePhase::{Create, Destroy};
    use stagecraft_debug::recorder::{RecordedEvent, decode};

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("shooter_demo").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn script_inputs_are_found_by_frame() {
        assert_eq!(
            inputs_at(30).collect::<Vec<_>>(),
            [Input::Activate(scene::PLAY)]
        );
        assert_eq!(inputs_at(31).count(), 0);
    }

    #[test]
    fn full_run_visits_every_state_and_misses_once() {
        let recorder = run(&cli(&["--frames", "200"]));
        let events: Vec<_> = decode(recorder.as_bytes()).collect();

        let activated: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                RecordedEvent::StateActivated(a) => Some(a.to),
                _ => None,
            })
            .collect();
        assert_eq!(
            activated,
            [scene::MENU, scene::PLAY, scene::PAUSE, scene::PLAY]
        );

        let misses = events
            .iter()
            .filter(|e| matches!(e, RecordedEvent::ActivationMiss(m) if m.requested == MISSING))
            .count();
        assert_eq!(misses, 1);

        let frames = events
            .iter()
            .filter(|e| matches!(e, RecordedEvent::FrameEnd(_)))
            .count();
        assert_eq!(frames, 200);
    }

    #[test]
    fn quit_after_stops_the_loop_from_the_menu() {
        let recorder = run(&cli(&["--frames", "500", "--quit-after", "100"]));
        let events: Vec<_> = decode(recorder.as_bytes()).collect();

        let last_frame = events
            .iter()
            .rev()
            .find_map(|e| match e {
                RecordedEvent::FrameEnd(f) => Some(*f),
                _ => None,
            })
            .unwrap();
        assert_eq!(last_frame.frame_index, 100);
        assert_eq!(last_frame.state, Some(scene::MENU));
        assert!(!last_frame.result);
    }

    #[test]
    fn late_state_is_created_and_every_state_destroyed() {
        let recorder = run(&cli(&["--frames", "1"]));
        let lifecycle: Vec<_> = decode(recorder.as_bytes())
            .filter_map(|e| match e {
                RecordedEvent::Lifecycle(l) => Some((l.phase, l.state)),
                _ => None,
            })
            .collect();

        assert_eq!(
            lifecycle,
            [
                (Create, scene::MENU),
                (Create, scene::PLAY),
                (Create, scene::PAUSE),
                (Destroy, scene::MENU),
                (Destroy, scene::PLAY),
                (Destroy, scene::PAUSE),
            ]
        );
    }
}
