//! Rule parameters
//!
//! Chosen once when a game is created and never changed while it runs.

use serde::{Deserialize, Serialize};

use crate::consts::{BALLS_PER_SIDE, END_DELAY_TICKS, MAX_END_DELAY_TICKS, TOTAL_ENDS};

/// Game rule parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Number of ends in a match
    pub total_ends: u32,
    /// Colour balls each side throws per end
    pub balls_per_side: u8,
    /// Ticks between end completion and the next end
    pub end_delay_ticks: u64,
    /// Hold rule notices until the host calls `acknowledge`
    pub require_acknowledge: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            total_ends: TOTAL_ENDS,
            balls_per_side: BALLS_PER_SIDE,
            end_delay_ticks: END_DELAY_TICKS,
            require_acknowledge: true,
        }
    }
}

impl RulesConfig {
    /// Parse a (partial) JSON override, falling back to defaults for missing keys
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Rules without the acknowledge handshake (headless runs, tests)
    pub fn unattended() -> Self {
        Self {
            require_acknowledge: false,
            ..Self::default()
        }
    }

    /// Clamp values into the ranges the engine supports
    pub fn sanitized(mut self) -> Self {
        if self.total_ends == 0 {
            log::warn!("total_ends must be at least 1, using 1");
            self.total_ends = 1;
        }
        if self.balls_per_side == 0 || self.balls_per_side > BALLS_PER_SIDE {
            log::warn!(
                "balls_per_side {} out of range, using {}",
                self.balls_per_side,
                BALLS_PER_SIDE
            );
            self.balls_per_side = BALLS_PER_SIDE;
        }
        if self.end_delay_ticks > MAX_END_DELAY_TICKS {
            log::warn!(
                "end_delay_ticks {} too long, using {}",
                self.end_delay_ticks,
                MAX_END_DELAY_TICKS
            );
            self.end_delay_ticks = MAX_END_DELAY_TICKS;
        }
        self
    }
}
