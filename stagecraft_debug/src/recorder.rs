// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].

use stagecraft_core::id::{LayerId, StateId};
use stagecraft_core::trace::{
    ActivationMissEvent, FrameBeginEvent, FrameEndEvent, FrameSummary, LayerDispatchEvent,
    LayerOutcome, LifecycleEvent, LifecyclePhase, StateActivatedEvent, StateAddedEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_STATE_ADDED: u8 = 1;
const TAG_STATE_ACTIVATED: u8 = 2;
const TAG_ACTIVATION_MISS: u8 = 3;
const TAG_FRAME_BEGIN: u8 = 4;
const TAG_FRAME_END: u8 = 5;
const TAG_LIFECYCLE: u8 = 6;
const TAG_FRAME_SUMMARY: u8 = 7;
const TAG_LAYER_DISPATCH: u8 = 8;

// Bit flags packed into the summary's trailing byte.
const SUMMARY_LAYER_STOPPED: u8 = 1 << 0;
const SUMMARY_STATE_HOOK_RAN: u8 = 1 << 1;
const SUMMARY_RESULT: u8 = 1 << 2;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f32(&mut self, v: f32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_state(&mut self, id: StateId) {
        self.write_u16(id.0);
    }

    fn write_option_state(&mut self, v: Option<StateId>) {
        match v {
            Some(id) => {
                self.write_u8(1);
                self.write_state(id);
            }
            None => {
                self.write_u8(0);
                self.write_u16(0);
            }
        }
    }

    fn write_outcome(&mut self, o: LayerOutcome) {
        self.write_u8(match o {
            LayerOutcome::Continued => 0,
            LayerOutcome::Stopped => 1,
            LayerOutcome::Disabled => 2,
            LayerOutcome::Skipped => 3,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_state_added(&mut self, e: &StateAddedEvent) {
        self.write_u8(TAG_STATE_ADDED);
        self.write_state(e.state);
        self.write_bool(e.is_default);
        self.write_bool(e.accepted);
    }

    fn on_state_activated(&mut self, e: &StateActivatedEvent) {
        self.write_u8(TAG_STATE_ACTIVATED);
        self.write_u64(e.frame_index);
        self.write_option_state(e.from);
        self.write_state(e.to);
    }

    fn on_activation_miss(&mut self, e: &ActivationMissEvent) {
        self.write_u8(TAG_ACTIVATION_MISS);
        self.write_u64(e.frame_index);
        self.write_state(e.requested);
        self.write_option_state(e.current);
    }

    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        self.write_u8(TAG_FRAME_BEGIN);
        self.write_u64(e.frame_index);
        self.write_option_state(e.state);
        self.write_f32(e.elapsed);
    }

    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        self.write_u8(TAG_FRAME_END);
        self.write_u64(e.frame_index);
        self.write_option_state(e.state);
        self.write_bool(e.result);
    }

    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        self.write_u8(TAG_LIFECYCLE);
        self.write_u8(match e.phase {
            LifecyclePhase::Create => 0,
            LifecyclePhase::Destroy => 1,
        });
        self.write_state(e.state);
        self.write_bool(e.result);
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.write_u8(TAG_FRAME_SUMMARY);
        self.write_u64(s.frame_index);
        self.write_option_state(s.state);
        self.write_f32(s.elapsed);
        self.write_u32(s.layers_run);
        self.write_u32(s.layers_disabled);
        self.write_u32(s.layers_skipped);
        let mut flags = 0;
        if s.layer_stopped {
            flags |= SUMMARY_LAYER_STOPPED;
        }
        if s.state_hook_ran {
            flags |= SUMMARY_STATE_HOOK_RAN;
        }
        if s.result {
            flags |= SUMMARY_RESULT;
        }
        self.write_u8(flags);
    }

    fn on_layer_dispatch(&mut self, e: &LayerDispatchEvent) {
        self.write_u8(TAG_LAYER_DISPATCH);
        self.write_u64(e.frame_index);
        self.write_state(e.state);
        self.write_u16(e.layer.0);
        self.write_outcome(e.outcome);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`StateAddedEvent`].
    StateAdded(StateAddedEvent),
    /// A [`StateActivatedEvent`].
    StateActivated(StateActivatedEvent),
    /// An [`ActivationMissEvent`].
    ActivationMiss(ActivationMissEvent),
    /// A [`FrameBeginEvent`].
    FrameBegin(FrameBeginEvent),
    /// A [`FrameEndEvent`].
    FrameEnd(FrameEndEvent),
    /// A [`LifecycleEvent`].
    Lifecycle(LifecycleEvent),
    /// A [`FrameSummary`].
    FrameSummary(FrameSummary),
    /// A [`LayerDispatchEvent`].
    LayerDispatch(LayerDispatchEvent),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
///
/// Iteration stops at the first unknown tag, unknown enum discriminant, or
/// truncated record.
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let end = self.pos.checked_add(N)?;
        let bytes = self.data.get(self.pos..end)?.try_into().ok()?;
        self.pos = end;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        Some(self.take::<1>()?[0])
    }

    fn read_bool(&mut self) -> Option<bool> {
        Some(self.read_u8()? != 0)
    }

    fn read_u16(&mut self) -> Option<u16> {
        Some(u16::from_le_bytes(self.take()?))
    }

    fn read_u32(&mut self) -> Option<u32> {
        Some(u32::from_le_bytes(self.take()?))
    }

    fn read_u64(&mut self) -> Option<u64> {
        Some(u64::from_le_bytes(self.take()?))
    }

    fn read_f32(&mut self) -> Option<f32> {
        Some(f32::from_le_bytes(self.take()?))
    }

    fn read_state(&mut self) -> Option<StateId> {
        Some(StateId(self.read_u16()?))
    }

    fn read_option_state(&mut self) -> Option<Option<StateId>> {
        let present = self.read_u8()?;
        let id = self.read_state()?;
        Some(if present != 0 { Some(id) } else { None })
    }

    fn read_outcome(&mut self) -> Option<LayerOutcome> {
        match self.read_u8()? {
            0 => Some(LayerOutcome::Continued),
            1 => Some(LayerOutcome::Stopped),
            2 => Some(LayerOutcome::Disabled),
            3 => Some(LayerOutcome::Skipped),
            _ => None,
        }
    }

    fn decode_state_added(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::StateAdded(StateAddedEvent {
            state: self.read_state()?,
            is_default: self.read_bool()?,
            accepted: self.read_bool()?,
        }))
    }

    fn decode_state_activated(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::StateActivated(StateActivatedEvent {
            frame_index: self.read_u64()?,
            from: self.read_option_state()?,
            to: self.read_state()?,
        }))
    }

    fn decode_activation_miss(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::ActivationMiss(ActivationMissEvent {
            frame_index: self.read_u64()?,
            requested: self.read_state()?,
            current: self.read_option_state()?,
        }))
    }

    fn decode_frame_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameBegin(FrameBeginEvent {
            frame_index: self.read_u64()?,
            state: self.read_option_state()?,
            elapsed: self.read_f32()?,
        }))
    }

    fn decode_frame_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameEnd(FrameEndEvent {
            frame_index: self.read_u64()?,
            state: self.read_option_state()?,
            result: self.read_bool()?,
        }))
    }

    fn decode_lifecycle(&mut self) -> Option<RecordedEvent> {
        let phase = match self.read_u8()? {
            0 => LifecyclePhase::Create,
            1 => LifecyclePhase::Destroy,
            _ => return None,
        };
        Some(RecordedEvent::Lifecycle(LifecycleEvent {
            phase,
            state: self.read_state()?,
            result: self.read_bool()?,
        }))
    }

    fn decode_frame_summary(&mut self) -> Option<RecordedEvent> {
        let frame_index = self.read_u64()?;
        let state = self.read_option_state()?;
        let elapsed = self.read_f32()?;
        let layers_run = self.read_u32()?;
        let layers_disabled = self.read_u32()?;
        let layers_skipped = self.read_u32()?;
        let flags = self.read_u8()?;
        Some(RecordedEvent::FrameSummary(FrameSummary {
            frame_index,
            state,
            elapsed,
            layers_run,
            layers_disabled,
            layers_skipped,
            layer_stopped: flags & SUMMARY_LAYER_STOPPED != 0,
            state_hook_ran: flags & SUMMARY_STATE_HOOK_RAN != 0,
            result: flags & SUMMARY_RESULT != 0,
        }))
    }

    fn decode_layer_dispatch(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::LayerDispatch(LayerDispatchEvent {
            frame_index: self.read_u64()?,
            state: self.read_state()?,
            layer: LayerId(self.read_u16()?),
            outcome: self.read_outcome()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_STATE_ADDED => self.decode_state_added(),
            TAG_STATE_ACTIVATED => self.decode_state_activated(),
            TAG_ACTIVATION_MISS => self.decode_activation_miss(),
            TAG_FRAME_BEGIN => self.decode_frame_begin(),
            TAG_FRAME_END => self.decode_frame_end(),
            TAG_LIFECYCLE => self.decode_lifecycle(),
            TAG_FRAME_SUMMARY => self.decode_frame_summary(),
            TAG_LAYER_DISPATCH => self.decode_layer_dispatch(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
