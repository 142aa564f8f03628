// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-active-branch state and layer container for per-frame logic.
//!
//! `stagecraft_core` structures an interactive application's frame loop into
//! mutually exclusive **states** (menu, gameplay, pause), each optionally
//! decomposed into ordered **layers** (background, entities, particles) that
//! run together whenever their state is current. It is `no_std` compatible
//! (with `alloc`), does no I/O, and never blocks.
//!
//! # Architecture
//!
//! One frame flows top-down through the tree and its result flows back up:
//!
//! ```text
//!   Driver (frame loop)
//!       │ dispatch(elapsed)
//!       ▼
//!   Manager ──► current State ──► Layer 0 ──► Layer 1 ──► ... ──► own logic
//!       │                                                             │
//!       ◄──────────────────────────── bool ◄──────────────────────────┘
//!   false = "stop the application loop"
//! ```
//!
//! **[`manager`]** owns every state, tracks the current one, and is the only
//! entry point for the driver. Activation is an immediate routing change.
//!
//! **[`state`]** owns ordered layers and runs them fail-fast before its own
//! [`StateLogic`](state::StateLogic). The create and destroy passes are only
//! reachable through the manager.
//!
//! **[`layer`]** is the smallest unit of per-frame work: the
//! [`Layer`](layer::Layer) trait plus the [`LayerSlot`](layer::LayerSlot)
//! that carries its identity and enabled flag.
//!
//! **[`id`]** holds the `StateId` and `LayerId` identity types.
//!
//! **[`error`]** reports misses and collisions from the `try_*` methods.
//! The plain methods treat them as silent no-ops.
//!
//! **[`trace`]** has the [`TraceSink`](trace::TraceSink) trait and event
//! types for registration, activation, and dispatch instrumentation, with a
//! zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Concurrency
//!
//! Everything here is single-threaded and synchronous. One frame's call tree
//! runs to completion before the next starts; registration and dispatch both
//! take `&mut self`, so they cannot overlap.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Adds per-layer
//!   dispatch events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod error;
pub mod id;
pub mod layer;
pub mod manager;
pub mod state;
pub mod trace;

pub use error::Error;
