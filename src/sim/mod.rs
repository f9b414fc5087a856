//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed tick per step, drag applied per tick
//! - Seeded RNG only (autoplay)
//! - Stable iteration order (balls in throw order)
//! - No rendering or platform dependencies

pub mod autoplay;
pub mod collision;
pub mod court;
pub mod rules;
pub mod scoring;
pub mod state;
pub mod tick;

pub use autoplay::{AutoPlayer, ThrowPlan};
pub use collision::{CollisionResult, ball_ball_collision, resolve_collisions};
pub use court::{BoxSpan, Court};
pub use rules::{InputRejected, ThrowAccepted, next_player};
pub use scoring::{closest_to_jack, score_end};
pub use state::{
    Ball, EndResult, GameEvent, GamePhase, GameState, Notice, Outcome, Owner, PerSide, Side,
    all_stopped,
};
pub use tick::{TickInput, run_until_settled, step_motion, tick};
