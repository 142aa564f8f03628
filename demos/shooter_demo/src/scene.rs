// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The demo's states and layers.
//!
//! The game has three states. The menu idles until asked to quit. Play draws
//! a scrolling background, moves entities, and animates particles. Pause
//! freezes everything but counts how long it has been paused.

use std::cell::Cell;
use std::rc::Rc;

use stagecraft_core::id::{LayerId, StateId};
use stagecraft_core::layer::Layer;
use stagecraft_core::state::{State, StateLogic};
use tracing::debug;

pub(crate) const MENU: StateId = StateId(0);
pub(crate) const PLAY: StateId = StateId(1);
pub(crate) const PAUSE: StateId = StateId(2);

pub(crate) const BACKGROUND: LayerId = LayerId(0);
pub(crate) const ENTITIES: LayerId = LayerId(1);
pub(crate) const PARTICLES: LayerId = LayerId(2);

/// Width of the background strip, in world units.
const WORLD_WIDTH: f32 = 320.0;

/// Builds the menu state. Its update returns `false` once `quit` is set.
pub(crate) fn menu(quit: Rc<Cell<bool>>) -> State {
    State::new(MENU, Menu { quit, idle: 0.0 })
}

/// Builds the play state with its three layers.
pub(crate) fn play() -> State {
    State::new(PLAY, Session::default())
        .with_layer(
            BACKGROUND,
            Background {
                offset: 0.0,
                speed: 40.0,
            },
        )
        .with_layer(ENTITIES, Entities::default())
        .with_layer(PARTICLES, Particles::default())
}

/// Builds the pause state.
pub(crate) fn pause() -> State {
    State::new(PAUSE, Paused { paused_for: 0.0 })
}

// ---------------------------------------------------------------------------
// State logic
// ---------------------------------------------------------------------------

struct Menu {
    quit: Rc<Cell<bool>>,
    idle: f32,
}

impl StateLogic for Menu {
    fn on_update(&mut self, elapsed: f32) -> bool {
        self.idle += elapsed;
        !self.quit.get()
    }

    fn on_destroy(&mut self) -> bool {
        debug!(idle_seconds = self.idle, "menu torn down");
        true
    }
}

#[derive(Default)]
struct Session {
    frames: u64,
    time: f32,
}

impl StateLogic for Session {
    fn on_create(&mut self) -> bool {
        debug!("play session created");
        true
    }

    fn on_update(&mut self, elapsed: f32) -> bool {
        self.frames += 1;
        self.time += elapsed;
        true
    }

    fn on_destroy(&mut self) -> bool {
        debug!(frames = self.frames, seconds = self.time, "play session ended");
        true
    }
}

struct Paused {
    paused_for: f32,
}

impl StateLogic for Paused {
    fn on_update(&mut self, elapsed: f32) -> bool {
        self.paused_for += elapsed;
        true
    }
}

// ---------------------------------------------------------------------------
// Layers
// ---------------------------------------------------------------------------

struct Background {
    offset: f32,
    speed: f32,
}

impl Layer for Background {
    fn on_update(&mut self, elapsed: f32) -> bool {
        self.offset = (self.offset + self.speed * elapsed).rem_euclid(WORLD_WIDTH);
        true
    }
}

#[derive(Default)]
struct Entities {
    player_x: f32,
    heading: f32,
    shots: u32,
}

impl Layer for Entities {
    fn on_create(&mut self) -> bool {
        self.player_x = WORLD_WIDTH / 2.0;
        self.heading = 1.0;
        true
    }

    fn on_update(&mut self, elapsed: f32) -> bool {
        self.player_x += self.heading * 60.0 * elapsed;
        if !(0.0..=WORLD_WIDTH).contains(&self.player_x) {
            self.heading = -self.heading;
            self.player_x = self.player_x.clamp(0.0, WORLD_WIDTH);
            self.shots += 1;
        }
        true
    }

    fn on_destroy(&mut self) -> bool {
        debug!(shots = self.shots, "entities cleared");
        true
    }
}

#[derive(Default)]
struct Particles {
    /// Remaining lifetime of each live particle, in seconds.
    live: Vec<f32>,
    spawn_timer: f32,
}

impl Particles {
    const SPAWN_INTERVAL: f32 = 0.05;
    const LIFETIME: f32 = 0.6;
    /// Particles alive at once when spawning continuously.
    const MAX_LIVE: usize = 12;
}

impl Layer for Particles {
    fn on_update(&mut self, elapsed: f32) -> bool {
        for life in &mut self.live {
            *life -= elapsed;
        }
        self.live.retain(|&life| life > 0.0);

        self.spawn_timer += elapsed;
        let due = (self.spawn_timer / Self::SPAWN_INTERVAL).floor();
        if due >= 1.0 {
            self.spawn_timer = self.spawn_timer.rem_euclid(Self::SPAWN_INTERVAL);
            #[expect(
                clippy::cast_possible_truncation,
                reason = "spawn count is capped at MAX_LIVE before the cast"
            )]
            let spawned = due.min(Self::MAX_LIVE as f32) as usize;
            self.live.extend(std::iter::repeat_n(Self::LIFETIME, spawned));
        }
        if self.live.len() > Self::MAX_LIVE {
            let excess = self.live.len() - Self::MAX_LIVE;
            self.live.drain(..excess);
        }
        true
    }

    fn on_destroy(&mut self) -> bool {
        self.live.clear();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_has_layers_in_draw_order() {
        let state = play();
        let ids: Vec<_> = state.layers().map(|slot| slot.id()).collect();
        assert_eq!(ids, [BACKGROUND, ENTITIES, PARTICLES]);
    }

    #[test]
    fn menu_stops_once_quit_is_requested() {
        let quit = Rc::new(Cell::new(false));
        let mut state = menu(Rc::clone(&quit));
        assert!(state.dispatch(0.016));
        quit.set(true);
        assert!(!state.dispatch(0.016));
    }

    #[test]
    fn particles_spawn_and_expire() {
        let mut particles = Particles::default();
        assert!(particles.on_update(0.1));
        assert_eq!(particles.live.len(), 2);
        assert!(particles.on_update(1.0));
        assert!(!particles.live.is_empty());
        assert!(particles.live.iter().all(|&life| life > 0.0));
    }

    #[test]
    fn huge_elapsed_times_spawn_a_bounded_burst() {
        let mut particles = Particles::default();
        for elapsed in [1.0e8, 1.0e7, f32::MAX, 0.016] {
            assert!(particles.on_update(elapsed));
            assert!(
                particles.live.len() <= Particles::MAX_LIVE,
                "{} live after {elapsed}s",
                particles.live.len()
            );
        }
    }
}
