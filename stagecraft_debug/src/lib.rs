// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing, recording, Chrome trace export, and `tracing` bridge for
//! stagecraft diagnostics.
//!
//! This crate provides [`TraceSink`](stagecraft_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`chrome::export`]: writes Chrome Trace Event Format JSON from recorded
//!   bytes.
//! - [`logging::TracingSink`]: forwards events to the `tracing` ecosystem as
//!   structured log records.

pub mod chrome;
pub mod logging;
pub mod pretty;
pub mod recorder;
