// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "shooter_demo",
    version,
    about = "Drive a simulated menu/play/pause game loop through a stagecraft manager",
    long_about = "Drive a simulated menu/play/pause game loop through a stagecraft manager.\n\n\
                  A scripted input sequence switches states and toggles layers. \
                  Set RUST_LOG (for example RUST_LOG=stagecraft=debug) to see the \
                  manager's events through tracing."
)]
pub(crate) struct Cli {
    /// Number of frames to simulate.
    #[arg(long, default_value_t = 240)]
    pub(crate) frames: u64,

    /// Simulated frame rate; each frame reports an elapsed time of 1/fps.
    #[arg(long, default_value_t = 60.0, value_parser = parse_fps)]
    pub(crate) fps: f32,

    /// Write a Chrome trace of the run to this file.
    #[arg(long = "trace-out", value_name = "PATH")]
    pub(crate) trace_out: Option<PathBuf>,

    /// Print every trace event to stdout.
    #[arg(long)]
    pub(crate) pretty: bool,

    /// Return to the menu and quit at this frame.
    #[arg(long = "quit-after", value_name = "FRAME")]
    pub(crate) quit_after: Option<u64>,
}

/// Slowest and fastest simulated frame rates accepted by `--fps`.
const FPS_RANGE: std::ops::RangeInclusive<f32> = 1.0..=1000.0;

fn parse_fps(arg: &str) -> Result<f32, String> {
    let fps: f32 = arg
        .parse()
        .map_err(|err| format!("`{arg}` is not a number: {err}"))?;
    if FPS_RANGE.contains(&fps) {
        Ok(fps)
    } else {
        Err(format!(
            "must be between {} and {}",
            FPS_RANGE.start(),
            FPS_RANGE.end()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["shooter_demo"]).unwrap();
        assert_eq!(cli.frames, 240);
        assert!(cli.trace_out.is_none());
        assert!(!cli.pretty);
        assert!(cli.quit_after.is_none());
    }

    #[test]
    fn all_flags() {
        let cli = Cli::try_parse_from([
            "shooter_demo",
            "--frames",
            "10",
            "--fps",
            "30",
            "--trace-out",
            "trace.json",
            "--pretty",
            "--quit-after",
            "5",
        ])
        .unwrap();
        assert_eq!(cli.frames, 10);
        assert_eq!(cli.fps.to_bits(), 30.0_f32.to_bits());
        assert_eq!(cli.trace_out, Some(PathBuf::from("trace.json")));
        assert!(cli.pretty);
        assert_eq!(cli.quit_after, Some(5));
    }

    #[test]
    fn fps_outside_range_is_rejected() {
        for fps in ["0.0000001", "0", "-60", "NaN", "inf", "5000", "fast"] {
            assert!(
                Cli::try_parse_from(["shooter_demo", "--fps", fps]).is_err(),
                "--fps {fps} was accepted"
            );
        }
        let cli = Cli::try_parse_from(["shooter_demo", "--fps", "1"]).unwrap();
        assert_eq!(cli.fps.to_bits(), 1.0_f32.to_bits());
    }
}
