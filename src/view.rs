//! Read-only views for the presentation layer
//!
//! Nothing here mutates the simulation. Hosts read a [`Snapshot`] for status
//! text, a [`BallInstance`] buffer for drawing, a [`CourtLayout`] once for
//! the court markings, and drained [`GameEvent`]s as JSON.

use bytemuck::{Pod, Zeroable};
use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::sim::{
    EndResult, GameEvent, GamePhase, GameState, Notice, Outcome, Owner, PerSide, Side,
};

/// Colors for court elements (RGBA)
pub mod colors {
    pub const COURT: [f32; 4] = [0.0, 0.39, 0.0, 1.0];
    pub const LINES: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const JACK: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const RED: [f32; 4] = [0.86, 0.1, 0.1, 1.0];
    pub const BLUE: [f32; 4] = [0.1, 0.25, 0.86, 1.0];
    /// Spin marker drawn from centre to rim
    pub const SPIN_MARKER: [f32; 4] = [1.0, 1.0, 1.0, 0.5];
}

/// Fill colour for a ball owner
pub fn owner_color(owner: Owner) -> [f32; 4] {
    match owner {
        Owner::Jack => colors::JACK,
        Owner::Red => colors::RED,
        Owner::Blue => colors::BLUE,
    }
}

/// Per-ball draw data (matches a 32-byte instance layout)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct BallInstance {
    pub position: [f32; 2], // offset 0
    pub radius: f32,        // offset 8
    pub angle: f32,         // offset 12
    pub color: [f32; 4],    // offset 16
}

impl BallInstance {
    pub fn new(pos: DVec2, radius: f64, angle: f64, owner: Owner) -> Self {
        Self {
            position: [pos.x as f32, pos.y as f32],
            radius: radius as f32,
            angle: angle as f32,
            color: owner_color(owner),
        }
    }
}

/// Draw buffer for the live balls plus the preview ball, if any
///
/// Dead balls are not drawn.
pub fn ball_instances(state: &GameState) -> Vec<BallInstance> {
    let mut instances: Vec<BallInstance> = state
        .balls
        .iter()
        .filter(|b| b.alive)
        .map(|b| BallInstance::new(b.pos, b.radius, b.angle, b.owner))
        .collect();

    if let Some(preview) = preview_ball(state) {
        let radius = match preview.owner {
            Owner::Jack => crate::consts::JACK_RADIUS,
            Owner::Red | Owner::Blue => crate::consts::BALL_RADIUS,
        };
        instances.push(BallInstance::new(preview.pos, radius, 0.0, preview.owner));
    }
    instances
}

/// Raw bytes of a draw buffer, ready for upload
pub fn instance_bytes(instances: &[BallInstance]) -> &[u8] {
    bytemuck::cast_slice(instances)
}

/// The ball waiting to be thrown from the selected box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviewBall {
    pub owner: Owner,
    pub pos: DVec2,
}

/// Preview shown while the active side is choosing its throw
pub fn preview_ball(state: &GameState) -> Option<PreviewBall> {
    if state.notice.is_some() {
        return None;
    }
    let owner = match state.phase {
        GamePhase::WaitingForJack => Owner::Jack,
        GamePhase::WaitingForThrow => Owner::from(state.active),
        GamePhase::JackMoving
        | GamePhase::ColorBallMoving
        | GamePhase::EndOfEnd
        | GamePhase::GameOver => return None,
    };
    let pos = state.court.preview_position(state.selected_box)?;
    Some(PreviewBall { owner, pos })
}

/// Status information for the HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub active: Side,
    pub balls_remaining: PerSide<u8>,
    pub scores: PerSide<u32>,
    pub current_end: u32,
    pub total_ends: u32,
    pub end_starter: Side,
    pub selected_box: u8,
    pub throwing: bool,
    pub notice: Option<Notice>,
    pub preview: Option<PreviewBall>,
    pub end_history: Vec<EndResult>,
    pub game_over: bool,
    /// Set once the match is over
    pub outcome: Option<Outcome>,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let game_over = state.is_game_over();
        Self {
            phase: state.phase,
            active: state.active,
            balls_remaining: state.balls_remaining,
            scores: state.scores,
            current_end: state.current_end,
            total_ends: state.config.total_ends,
            end_starter: state.end_starter,
            selected_box: state.selected_box,
            throwing: state.gesture.is_some(),
            notice: state.notice,
            preview: preview_ball(state),
            end_history: state.end_history.clone(),
            game_over,
            outcome: game_over.then(|| state.outcome()),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Drained events as a JSON array, oldest first
pub fn events_json(events: &[GameEvent]) -> Result<String, serde_json::Error> {
    serde_json::to_string(events)
}

/// Court markings for drawing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourtLayout {
    pub width: f64,
    pub height: f64,
    pub throw_line_y: f64,
    pub v_line_y: f64,
    /// x of the dividers between throwing boxes
    pub box_dividers: Vec<f64>,
    pub box_count: u8,
    pub cross: DVec2,
    pub cross_arm_length: f64,
    pub court_color: [f32; 4],
    pub line_color: [f32; 4],
    /// Spin marker drawn on every ball
    pub spin_marker_color: [f32; 4],
}

impl CourtLayout {
    pub fn from_state(state: &GameState) -> Self {
        let court = &state.court;
        Self {
            width: court.width,
            height: court.height,
            throw_line_y: court.throw_line_y,
            v_line_y: court.v_line_y,
            box_dividers: (1..court.box_count)
                .map(|i| f64::from(i) * court.box_width)
                .collect(),
            box_count: court.box_count,
            cross: court.cross,
            cross_arm_length: crate::consts::CROSS_ARM_LENGTH,
            court_color: colors::COURT,
            line_color: colors::LINES,
            spin_marker_color: colors::SPIN_MARKER,
        }
    }
}
