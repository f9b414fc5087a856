//! Computer player
//!
//! Produces throw gestures for whichever side is active. Used by the
//! headless runner and by hosts in demo mode. Seeded, so a given seed
//! replays the same match.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{GamePhase, GameState};
use super::tick::TickInput;
use crate::consts::*;
use crate::direction;

/// A complete throw gesture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThrowPlan {
    pub box_index: u8,
    pub start: DVec2,
    pub end: DVec2,
}

impl ThrowPlan {
    /// The plan as a single tick of input
    pub fn to_input(self) -> TickInput {
        TickInput {
            select_box: Some(self.box_index),
            throw_start: Some(self.start),
            throw_end: Some(self.end),
            acknowledge: false,
        }
    }
}

/// RNG seed wrapper for serialization
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Seeded computer player
#[derive(Debug, Clone)]
pub struct AutoPlayer {
    pub rng_state: RngState,
    rng: Pcg32,
    /// Angular aim error bound (radians)
    pub aim_jitter: f64,
    /// Relative distance error bound
    pub power_jitter: f64,
}

impl AutoPlayer {
    pub fn new(seed: u64) -> Self {
        let rng_state = RngState::new(seed);
        Self {
            rng: rng_state.to_rng(),
            rng_state,
            aim_jitter: 0.04,
            power_jitter: 0.12,
        }
    }

    /// Plan a throw for the active side, `None` if the state takes no throw now
    pub fn plan_throw(&mut self, state: &GameState) -> Option<ThrowPlan> {
        if state.notice.is_some() || state.pending.is_some() || state.gesture.is_some() {
            return None;
        }

        let target = match state.phase {
            GamePhase::WaitingForJack => {
                let margin = JACK_RADIUS * 4.0;
                DVec2::new(
                    self.rng.random_range(margin..state.court.width - margin),
                    self.rng
                        .random_range(state.court.cross.y - METER..state.court.v_line_y - METER),
                )
            }
            GamePhase::WaitingForThrow => {
                if state.balls_remaining[state.active] == 0 {
                    return None;
                }
                state.jack().filter(|j| j.alive)?.pos
            }
            GamePhase::JackMoving
            | GamePhase::ColorBallMoving
            | GamePhase::EndOfEnd
            | GamePhase::GameOver => return None,
        };

        let box_index = state.court.box_for_x(target.x);
        let start = state.court.preview_position(box_index)?;

        let to_target = target - start;
        let aim = to_target.y.atan2(to_target.x)
            + self.rng.random_range(-self.aim_jitter..=self.aim_jitter);
        let travel = to_target.length()
            * (1.0 + self.rng.random_range(-self.power_jitter..=self.power_jitter));

        // A ball launched at power p rolls about p / (1 - DRAG) before stopping
        let power = (travel * (1.0 - DRAG)).clamp(MIN_POWER, MAX_POWER);
        let end = start + direction(aim) * power * POWER_SCALE;

        Some(ThrowPlan {
            box_index,
            start,
            end,
        })
    }
}
