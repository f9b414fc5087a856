//! Browser bindings
//!
//! The page owns the canvas, DOM and input listeners. It forwards pointer
//! events already mapped into court coordinates, calls `frame` from
//! `requestAnimationFrame`, and draws from the snapshot and ball buffer.

use glam::DVec2;
use wasm_bindgen::prelude::*;

use super::FrameClock;
use crate::config::RulesConfig;
use crate::sim::{AutoPlayer, GameEvent, GameState, TickInput, tick};
use crate::view::{CourtLayout, Snapshot, ball_instances, events_json};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by a previous module instance
        return;
    }
    log::info!("Boccia engine loaded");
}

/// Game instance holding all engine state for the page
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    clock: FrameClock,
    /// Demo mode: the computer plays both sides
    autoplay: Option<AutoPlayer>,
    seed: u64,
    /// Events not yet collected by the page
    events: Vec<GameEvent>,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a game; `config_json` may override rule defaults
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, config_json: Option<String>) -> Result<WebGame, JsValue> {
        let config = match config_json.as_deref() {
            Some(json) => {
                RulesConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?
            }
            None => RulesConfig::default(),
        };
        log::info!("Game initialized with seed: {}", seed);
        Ok(Self {
            state: GameState::new(config),
            clock: FrameClock::new(),
            autoplay: None,
            seed,
            events: Vec::new(),
        })
    }

    /// Run the ticks due at `now_ms`; returns false once the game is over
    pub fn frame(&mut self, now_ms: f64) -> bool {
        let ticks = self.clock.advance(now_ms);
        for _ in 0..ticks {
            let input = self.autoplay_input();
            tick(&mut self.state, &input);
        }
        let events = self.state.drain_events();
        for event in &events {
            log::debug!("{:?}", event);
        }
        self.events.extend(events);
        !self.state.is_game_over()
    }

    fn autoplay_input(&mut self) -> TickInput {
        let Some(player) = self.autoplay.as_mut() else {
            return TickInput::default();
        };
        if self.state.notice.is_some() {
            return TickInput {
                acknowledge: true,
                ..Default::default()
            };
        }
        player
            .plan_throw(&self.state)
            .map(|plan| plan.to_input())
            .unwrap_or_default()
    }

    /// Select throwing box 1..=6; returns false if the index is invalid
    pub fn select_box(&mut self, index: u8) -> bool {
        self.state.select_box(index).is_ok()
    }

    /// Pointer pressed; returns whether a throw gesture started
    pub fn throw_start(&mut self, x: f64, y: f64) -> bool {
        match self.state.throw_start(DVec2::new(x, y)) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("throw start ignored: {e}");
                false
            }
        }
    }

    /// Pointer released; returns whether a ball was thrown
    pub fn throw_end(&mut self, x: f64, y: f64) -> bool {
        match self.state.throw_end(DVec2::new(x, y)) {
            Ok(_) => true,
            Err(e) => {
                log::debug!("throw end ignored: {e}");
                false
            }
        }
    }

    /// Pointer cancelled or left the canvas; returns whether a gesture was dropped
    pub fn cancel_throw(&mut self) -> bool {
        self.state.cancel_gesture()
    }

    /// Dismiss the current notice; returns whether there was one
    pub fn acknowledge(&mut self) -> bool {
        self.state.acknowledge().is_ok()
    }

    pub fn set_autoplay(&mut self, enabled: bool) {
        self.autoplay = enabled.then(|| AutoPlayer::new(self.seed));
        log::info!("Autoplay: {}", enabled);
    }

    pub fn restart(&mut self, seed: u64) {
        self.seed = seed;
        self.state.restart();
        self.clock.reset();
        self.events.clear();
        if self.autoplay.is_some() {
            self.autoplay = Some(AutoPlayer::new(seed));
        }
        log::info!("Game restarted with seed: {}", seed);
    }

    /// HUD status as JSON
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        Snapshot::capture(&self.state)
            .to_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Events since the last call as a JSON array, oldest first
    pub fn take_events_json(&mut self) -> Result<String, JsValue> {
        let events = std::mem::take(&mut self.events);
        events_json(&events).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Court markings as JSON
    pub fn court_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&CourtLayout::from_state(&self.state))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Ball draw buffer, 8 floats per ball: x, y, radius, angle, r, g, b, a
    pub fn ball_buffer(&self) -> Vec<f32> {
        bytemuck::cast_slice(&ball_instances(&self.state)).to_vec()
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }
}
