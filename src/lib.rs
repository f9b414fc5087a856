//! Boccia - a two-player court bowling simulator
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball physics, collisions, round rules, scoring)
//! - `view`: Read-only snapshots and draw buffers for the presentation layer
//! - `config`: Rule parameters fixed at game creation
//! - `platform`: Browser bindings (wasm32 only)

pub mod config;
pub mod platform;
pub mod sim;
pub mod view;

pub use config::RulesConfig;
pub use sim::{GameState, Side, tick};
pub use view::{BallInstance, CourtLayout, Snapshot};

use glam::DVec2;

/// Game configuration constants
///
/// All distances are in court units (1 m = 100 units). The y axis points
/// from the far end of the court (y = 0) toward the throwing boxes.
pub mod consts {
    /// Court units per metre
    pub const METER: f64 = 100.0;

    /// Fixed simulation timestep (drag is applied per tick, so the rate is part of the physics)
    pub const SIM_HZ: u32 = 60;
    pub const SIM_DT: f32 = 1.0 / SIM_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Court dimensions
    pub const COURT_WIDTH: f64 = 6.0 * METER;
    pub const COURT_HEIGHT: f64 = 12.5 * METER;

    /// Throwing boxes sit behind the throw line at the near end of the court
    pub const THROWING_BOX_DEPTH: f64 = 2.5 * METER;
    pub const THROWING_BOX_WIDTH: f64 = 1.0 * METER;
    pub const THROWING_BOX_COUNT: u8 = (COURT_WIDTH / THROWING_BOX_WIDTH) as u8;
    pub const THROW_LINE_Y: f64 = COURT_HEIGHT - THROWING_BOX_DEPTH;
    /// A jack that stops at or behind this line must be re-thrown
    pub const V_LINE_Y: f64 = THROW_LINE_Y - 3.0 * METER;

    /// Cross mark where an out-of-court jack is re-spotted
    pub const CROSS_X: f64 = COURT_WIDTH / 2.0;
    pub const CROSS_Y: f64 = 4.0 * METER;
    pub const CROSS_ARM_LENGTH: f64 = 0.5 * METER;

    /// Preview ball offset behind the throw line
    pub const PREVIEW_OFFSET_Y: f64 = 40.0;

    /// Ball defaults
    pub const BALL_RADIUS: f64 = 15.0;
    pub const JACK_RADIUS: f64 = 15.0;

    /// Per-tick velocity damping
    pub const DRAG: f64 = 0.98;
    /// Velocity components below this snap to zero
    pub const STOP_EPSILON: f64 = 0.1;
    /// Spin angle gained per unit of speed (cosmetic)
    pub const SPIN_FACTOR: f64 = 0.05;

    /// Gesture length is divided by this to get launch power
    pub const POWER_SCALE: f64 = 10.0;
    pub const MAX_POWER: f64 = 30.0;
    /// Gestures weaker than this are ignored
    pub const MIN_POWER: f64 = 1.0;

    /// Rule defaults
    pub const BALLS_PER_SIDE: u8 = 6;
    pub const TOTAL_ENDS: u32 = 4;
    /// Pause between end completion and the next end (2 seconds)
    pub const END_DELAY_TICKS: u64 = 2 * SIM_HZ as u64;
    /// Longest configurable end delay (one minute)
    pub const MAX_END_DELAY_TICKS: u64 = 60 * SIM_HZ as u64;
}

/// Unit vector for an angle in radians
#[inline]
pub fn direction(angle: f64) -> DVec2 {
    DVec2::new(angle.cos(), angle.sin())
}

/// Launch velocity for a drag gesture, `None` when the gesture is too weak
///
/// Power is the gesture length scaled down by [`consts::POWER_SCALE`] and
/// capped at [`consts::MAX_POWER`].
pub fn launch_velocity(start: DVec2, end: DVec2) -> Option<DVec2> {
    use consts::*;

    let delta = end - start;
    let power = (delta.length() / POWER_SCALE).min(MAX_POWER);
    if power < MIN_POWER {
        return None;
    }
    Some(direction(delta.y.atan2(delta.x)) * power)
}
