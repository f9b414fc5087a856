//! Game state and core simulation types
//!
//! Everything the round state machine owns lives in [`GameState`]; the
//! other simulation modules borrow it for the duration of a call.

use std::ops::{Index, IndexMut};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::court::Court;
use crate::config::RulesConfig;
use crate::consts::*;

/// One of the two competing sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Red,
    Blue,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Red, Side::Blue];

    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::Red => Side::Blue,
            Side::Blue => Side::Red,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Red => "red",
            Side::Blue => "blue",
        }
    }
}

/// Who a ball belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    Jack,
    Red,
    Blue,
}

impl Owner {
    /// The side owning a colour ball, `None` for the jack
    #[inline]
    pub fn side(self) -> Option<Side> {
        match self {
            Owner::Jack => None,
            Owner::Red => Some(Side::Red),
            Owner::Blue => Some(Side::Blue),
        }
    }
}

impl From<Side> for Owner {
    fn from(side: Side) -> Self {
        match side {
            Side::Red => Owner::Red,
            Side::Blue => Owner::Blue,
        }
    }
}

/// A value kept per side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerSide<T> {
    pub red: T,
    pub blue: T,
}

impl<T: Copy> PerSide<T> {
    pub fn splat(value: T) -> Self {
        Self {
            red: value,
            blue: value,
        }
    }
}

impl<T> Index<Side> for PerSide<T> {
    type Output = T;

    fn index(&self, side: Side) -> &T {
        match side {
            Side::Red => &self.red,
            Side::Blue => &self.blue,
        }
    }
}

impl<T> IndexMut<Side> for PerSide<T> {
    fn index_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Red => &mut self.red,
            Side::Blue => &mut self.blue,
        }
    }
}

/// A ball on the court
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: DVec2,
    pub vel: DVec2,
    pub radius: f64,
    pub owner: Owner,
    /// Cleared once the ball leaves the court; dead balls stay in the collection
    pub alive: bool,
    /// Spin angle for rendering only (radians)
    pub angle: f64,
}

impl Ball {
    pub fn new(id: u32, owner: Owner, pos: DVec2, vel: DVec2) -> Self {
        let radius = match owner {
            Owner::Jack => JACK_RADIUS,
            Owner::Red | Owner::Blue => BALL_RADIUS,
        };
        Self {
            id,
            pos,
            vel,
            radius,
            owner,
            alive: true,
            angle: 0.0,
        }
    }

    #[inline]
    pub fn is_jack(&self) -> bool {
        self.owner == Owner::Jack
    }

    /// Advance one tick: move, apply drag, snap slow balls to rest
    pub fn integrate(&mut self) {
        if !self.alive {
            return;
        }

        let speed = self.vel.length();
        let spin_dir = if self.vel.y > 0.0 { 1.0 } else { -1.0 };
        self.angle += spin_dir * speed * SPIN_FACTOR;

        self.pos += self.vel;
        self.vel *= DRAG;

        if self.vel.x.abs() < STOP_EPSILON && self.vel.y.abs() < STOP_EPSILON {
            self.vel = DVec2::ZERO;
        }
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.vel == DVec2::ZERO
    }

    /// Mark the ball dead and freeze it in place
    pub fn kill(&mut self) {
        self.alive = false;
        self.vel = DVec2::ZERO;
    }

    /// Put the ball back in play at rest at `pos`
    pub fn respot(&mut self, pos: DVec2) {
        self.pos = pos;
        self.vel = DVec2::ZERO;
        self.alive = true;
    }

    #[inline]
    pub fn distance_to(&self, other: &Ball) -> f64 {
        self.pos.distance(other.pos)
    }
}

/// True when every ball, dead or alive, is at rest
pub fn all_stopped(balls: &[Ball]) -> bool {
    balls.iter().all(Ball::is_stopped)
}

/// Current phase of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active side must throw the jack
    WaitingForJack,
    /// Jack is rolling
    JackMoving,
    /// Active side must throw a colour ball
    WaitingForThrow,
    /// A colour ball was thrown and balls are rolling
    ColorBallMoving,
    /// All balls thrown; end scored, waiting to advance
    EndOfEnd,
    /// Match finished
    GameOver,
}

impl GamePhase {
    /// Phases in which a throw gesture may be made
    #[inline]
    pub fn accepts_throw(self) -> bool {
        matches!(self, GamePhase::WaitingForJack | GamePhase::WaitingForThrow)
    }
}

/// A throw gesture between press and release
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThrowGesture {
    pub start: DVec2,
    pub box_index: u8,
}

/// A state transition deferred to a later tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionKind {
    /// Leave `EndOfEnd` for the next end or game over
    AdvanceEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransition {
    pub due_tick: u64,
    pub kind: TransitionKind,
}

/// Rule notice the host must show and acknowledge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    /// Jack fell short of the V line or left the court; `rethrower` throws it again
    InvalidJack { rethrower: Side },
    /// End finished with these match scores
    EndComplete { end: u32, scores: PerSide<u32> },
}

/// Scoring outcome of one end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndResult {
    pub end: u32,
    pub winner: Option<Side>,
    pub points: u32,
    pub next_starter: Side,
}

/// Final result of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Winner(Side),
    Draw,
}

/// Things that happened during a tick, for the host to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BallThrown { id: u32, owner: Owner },
    BallDead { id: u32, owner: Owner },
    JackAccepted,
    JackRejected { rethrower: Side },
    JackRelocated,
    TurnChanged { side: Side },
    EndScored(EndResult),
    EndStarted { end: u32, starter: Side },
    GameOver { outcome: Outcome },
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Rules this game was created with
    pub config: RulesConfig,
    pub court: Court,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    /// Side whose turn it is
    pub active: Side,
    /// Side that throws the jack this end
    pub end_starter: Side,
    pub balls_remaining: PerSide<u8>,
    pub scores: PerSide<u32>,
    /// 1-based end counter
    pub current_end: u32,
    /// Throwing box chosen by the host (1-based)
    pub selected_box: u8,
    /// Balls thrown this end, in throw order
    pub balls: Vec<Ball>,
    pub gesture: Option<ThrowGesture>,
    pub pending: Option<PendingTransition>,
    /// Unacknowledged rule notice; blocks throws while set
    pub notice: Option<Notice>,
    pub end_history: Vec<EndResult>,
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(RulesConfig::default())
    }
}

impl GameState {
    /// Create a new match, red throwing the first jack
    pub fn new(config: RulesConfig) -> Self {
        let config = config.sanitized();
        let balls_remaining = PerSide::splat(config.balls_per_side);
        Self {
            config,
            court: Court::default(),
            time_ticks: 0,
            phase: GamePhase::WaitingForJack,
            active: Side::Red,
            end_starter: Side::Red,
            balls_remaining,
            scores: PerSide::default(),
            current_end: 1,
            selected_box: 1,
            balls: Vec::new(),
            gesture: None,
            pending: None,
            notice: None,
            end_history: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Throw the current match away and start over with the same rules
    pub fn restart(&mut self) {
        let selected_box = self.selected_box;
        *self = Self::new(self.config.clone());
        self.selected_box = selected_box;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a ball to the court and return its id
    pub fn spawn_ball(&mut self, owner: Owner, pos: DVec2, vel: DVec2) -> u32 {
        let id = self.next_entity_id();
        self.balls.push(Ball::new(id, owner, pos, vel));
        self.events.push(GameEvent::BallThrown { id, owner });
        id
    }

    pub fn jack(&self) -> Option<&Ball> {
        self.balls.iter().find(|b| b.is_jack())
    }

    pub fn jack_mut(&mut self) -> Option<&mut Ball> {
        self.balls.iter_mut().find(|b| b.is_jack())
    }

    /// Colour balls thrown so far this end
    pub fn balls_thrown(&self) -> u32 {
        let per_side = u32::from(self.config.balls_per_side);
        Side::ALL
            .iter()
            .map(|&side| per_side - u32::from(self.balls_remaining[side]))
            .sum()
    }

    /// Reset per-end state; the end-starter throws the jack
    pub fn reset_end(&mut self) {
        self.balls.clear();
        self.balls_remaining = PerSide::splat(self.config.balls_per_side);
        self.active = self.end_starter;
        self.gesture = None;
        self.phase = GamePhase::WaitingForJack;
    }

    /// Drop a scheduled transition; returns whether one was pending
    pub fn cancel_pending(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Leader on points; only meaningful once the match is over
    pub fn outcome(&self) -> Outcome {
        use std::cmp::Ordering;
        match self.scores.red.cmp(&self.scores.blue) {
            Ordering::Greater => Outcome::Winner(Side::Red),
            Ordering::Less => Outcome::Winner(Side::Blue),
            Ordering::Equal => Outcome::Draw,
        }
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
