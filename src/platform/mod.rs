//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame timing (fixed-timestep accumulator shared by every host)
//! - Browser bindings (wasm32 only)

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Converts variable frame times into a whole number of simulation ticks
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
    last_time_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks to run for a frame presented at `now_ms`
    ///
    /// Long stalls (tab hidden, debugger) are clamped to 0.1 s, so a frame
    /// never runs more than `MAX_SUBSTEPS` ticks and no backlog carries over.
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let dt = match self.last_time_ms.replace(now_ms) {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => SIM_DT,
        };
        self.accumulator += dt.clamp(0.0, 0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Forget frame history (after a pause or restart)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time_ms = None;
    }
}
