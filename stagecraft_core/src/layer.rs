// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layers: the smallest unit of per-frame work.
//!
//! A *layer* is owned by exactly one [`State`](crate::state::State) and is
//! dispatched whenever that state is current. Each layer has:
//!
//! - An identity ([`LayerId`]) unique within its state.
//! - An enabled flag. Disabled layers keep their slot and their position in
//!   the dispatch order, but are skipped by update dispatch.
//! - Behavior, supplied by the application as a [`Layer`] implementation.
//!
//! The [`Layer`] trait carries the create/update/destroy hooks. Only
//! [`on_update`](Layer::on_update) is required, so an update-only layer (or a
//! plain closure, see below) is all the simple lifecycle shape needs.
//!
//! ```
//! use stagecraft_core::layer::{Layer, LayerSlot};
//! use stagecraft_core::id::LayerId;
//!
//! struct Starfield {
//!     scroll: f32,
//! }
//!
//! impl Layer for Starfield {
//!     fn on_update(&mut self, elapsed: f32) -> bool {
//!         self.scroll += elapsed * 40.0;
//!         true
//!     }
//! }
//!
//! let mut slot = LayerSlot::new(LayerId(0), Starfield { scroll: 0.0 });
//! assert!(slot.dispatch(0.016));
//!
//! // Closures work as update-only layers.
//! let mut ticker = LayerSlot::new(LayerId(1), |_elapsed: f32| true);
//! assert!(ticker.dispatch(0.016));
//! ```

use alloc::boxed::Box;
use core::fmt;

use crate::id::LayerId;

/// Per-frame work owned by a state.
///
/// Every hook returns `true` to continue. Returning `false` asks the enclosing
/// scope to stop: for [`on_update`](Self::on_update) the state skips its
/// remaining layers for this frame and the signal reaches the frame driver;
/// for [`on_create`](Self::on_create) and [`on_destroy`](Self::on_destroy)
/// the remaining siblings are not visited. Layers report failure only through
/// these results and must not panic to signal it.
pub trait Layer {
    /// Sets up resources. Runs once, before the first update.
    fn on_create(&mut self) -> bool {
        true
    }

    /// Runs one frame of work. `elapsed` is the frame time in seconds.
    fn on_update(&mut self, elapsed: f32) -> bool;

    /// Releases resources. Runs once, when the owning manager shuts down.
    fn on_destroy(&mut self) -> bool {
        true
    }
}

impl<F> Layer for F
where
    F: FnMut(f32) -> bool,
{
    fn on_update(&mut self, elapsed: f32) -> bool {
        self(elapsed)
    }
}

/// A registered layer: identity, enabled flag, and behavior.
pub struct LayerSlot {
    id: LayerId,
    enabled: bool,
    layer: Box<dyn Layer>,
}

impl fmt::Debug for LayerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerSlot")
            .field("id", &self.id)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

impl LayerSlot {
    /// Wraps `layer` with the given identity. New slots start enabled.
    #[must_use]
    pub fn new(id: LayerId, layer: impl Layer + 'static) -> Self {
        Self::from_boxed(id, Box::new(layer))
    }

    /// Wraps an already boxed layer.
    #[must_use]
    pub fn from_boxed(id: LayerId, layer: Box<dyn Layer>) -> Self {
        Self {
            id,
            enabled: true,
            layer,
        }
    }

    /// Returns the layer's identity.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> LayerId {
        self.id
    }

    /// Returns whether the layer takes part in update dispatch.
    #[inline]
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables the layer without removing it from its state.
    #[inline]
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Runs one frame of the layer's update hook and returns its result.
    ///
    /// This ignores the enabled flag; the owning state is responsible for
    /// skipping disabled layers.
    pub fn dispatch(&mut self, elapsed: f32) -> bool {
        self.layer.on_update(elapsed)
    }

    pub(crate) fn create(&mut self) -> bool {
        self.layer.on_create()
    }

    pub(crate) fn destroy(&mut self) -> bool {
        self.layer.on_destroy()
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use super::*;

    struct Counting {
        log: Rc<RefCell<Vec<&'static str>>>,
        keep_going: bool,
    }

    impl Layer for Counting {
        fn on_create(&mut self) -> bool {
            self.log.borrow_mut().push("create");
            true
        }

        fn on_update(&mut self, _elapsed: f32) -> bool {
            self.log.borrow_mut().push("update");
            self.keep_going
        }

        fn on_destroy(&mut self) -> bool {
            self.log.borrow_mut().push("destroy");
            true
        }
    }

    #[test]
    fn new_slot_is_enabled() {
        let slot = LayerSlot::new(LayerId(5), |_: f32| true);
        assert_eq!(slot.id(), LayerId(5));
        assert!(slot.enabled());
    }

    #[test]
    fn set_enabled_round_trips() {
        let mut slot = LayerSlot::new(LayerId(0), |_: f32| true);
        slot.set_enabled(false);
        assert!(!slot.enabled());
        slot.set_enabled(true);
        assert!(slot.enabled());
    }

    #[test]
    fn dispatch_returns_update_result() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut slot = LayerSlot::new(
            LayerId(1),
            Counting {
                log: Rc::clone(&log),
                keep_going: false,
            },
        );
        assert!(!slot.dispatch(0.5));
        assert_eq!(*log.borrow(), ["update"]);
    }

    #[test]
    fn hooks_reach_the_layer() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut slot = LayerSlot::new(
            LayerId(1),
            Counting {
                log: Rc::clone(&log),
                keep_going: true,
            },
        );
        assert!(slot.create());
        assert!(slot.dispatch(0.1));
        assert!(slot.destroy());
        assert_eq!(*log.borrow(), ["create", "update", "destroy"]);
    }

    #[test]
    fn closure_layers_default_create_and_destroy() {
        let mut slot = LayerSlot::new(LayerId(2), |elapsed: f32| elapsed < 1.0);
        assert!(slot.create());
        assert!(slot.dispatch(0.5));
        assert!(!slot.dispatch(2.0));
        assert!(slot.destroy());
    }
}
