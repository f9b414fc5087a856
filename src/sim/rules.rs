//! Round rules: throw input, turn order and end transitions
//!
//! Invalid input never changes state. Each input method reports why it was
//! ignored so hosts can surface hints, but ignoring the error is always safe.

use glam::DVec2;
use thiserror::Error;

use super::collision::kill_out_of_bounds;
use super::scoring::{closest_per_side, score_end};
use super::state::{
    GameEvent, GamePhase, GameState, Notice, Owner, PendingTransition, Side, ThrowGesture,
    TransitionKind,
};
use crate::launch_velocity;

/// Why an input was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputRejected {
    #[error("throws are not accepted while {0:?}")]
    NotAcceptingThrows(GamePhase),
    #[error("a throw gesture is already in progress")]
    GestureInProgress,
    #[error("no throw gesture in progress")]
    NoGestureInProgress,
    #[error("throw must start inside box {0} behind the throw line")]
    OutsideThrowingBox(u8),
    #[error("throw gesture too weak")]
    TooWeak,
    #[error("{0:?} has no balls remaining")]
    NoBallsRemaining(Side),
    #[error("a rule notice is awaiting acknowledgement")]
    AwaitingAcknowledge,
    #[error("no throwing box {0}")]
    InvalidBox(u8),
    #[error("nothing to acknowledge")]
    NothingToAcknowledge,
}

/// What a completed throw put on the court
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrowAccepted {
    pub ball_id: u32,
    pub owner: Owner,
    pub velocity: DVec2,
}

impl GameState {
    /// Choose the throwing box (1-based) for subsequent throws
    pub fn select_box(&mut self, index: u8) -> Result<(), InputRejected> {
        if !self.court.is_valid_box(index) {
            return Err(InputRejected::InvalidBox(index));
        }
        self.selected_box = index;
        Ok(())
    }

    /// Whether a new throw may begin right now
    fn check_can_throw(&self) -> Result<(), InputRejected> {
        if self.notice.is_some() {
            return Err(InputRejected::AwaitingAcknowledge);
        }
        if !self.phase.accepts_throw() || self.pending.is_some() {
            return Err(InputRejected::NotAcceptingThrows(self.phase));
        }
        Ok(())
    }

    /// Press: begin a throw gesture at `pos` (court coordinates)
    pub fn throw_start(&mut self, pos: DVec2) -> Result<(), InputRejected> {
        self.check_can_throw()?;
        if self.gesture.is_some() {
            return Err(InputRejected::GestureInProgress);
        }
        if !self.court.is_valid_throw_origin(self.selected_box, pos) {
            return Err(InputRejected::OutsideThrowingBox(self.selected_box));
        }

        self.gesture = Some(ThrowGesture {
            start: pos,
            box_index: self.selected_box,
        });
        Ok(())
    }

    /// Release: finish the gesture at `pos` and throw if it is strong enough
    ///
    /// The gesture is consumed even when the throw is rejected.
    pub fn throw_end(&mut self, pos: DVec2) -> Result<ThrowAccepted, InputRejected> {
        let gesture = self.gesture.take().ok_or(InputRejected::NoGestureInProgress)?;
        self.check_can_throw()?;

        let velocity = launch_velocity(gesture.start, pos).ok_or(InputRejected::TooWeak)?;

        let owner = match self.phase {
            GamePhase::WaitingForJack => Owner::Jack,
            GamePhase::WaitingForThrow => {
                let side = self.active;
                if self.balls_remaining[side] == 0 {
                    return Err(InputRejected::NoBallsRemaining(side));
                }
                self.balls_remaining[side] -= 1;
                Owner::from(side)
            }
            phase => return Err(InputRejected::NotAcceptingThrows(phase)),
        };

        let ball_id = self.spawn_ball(owner, gesture.start, velocity);
        self.phase = match owner {
            Owner::Jack => GamePhase::JackMoving,
            Owner::Red | Owner::Blue => GamePhase::ColorBallMoving,
        };
        log::debug!(
            "{} threw {:?} from box {} at {:.1} ({:.2}, {:.2})",
            self.active.as_str(),
            owner,
            gesture.box_index,
            velocity.length(),
            velocity.x,
            velocity.y
        );

        Ok(ThrowAccepted {
            ball_id,
            owner,
            velocity,
        })
    }

    /// Drop a gesture in progress without throwing
    pub fn cancel_gesture(&mut self) -> bool {
        self.gesture.take().is_some()
    }

    /// Dismiss the current notice and perform the transition it was holding
    pub fn acknowledge(&mut self) -> Result<Notice, InputRejected> {
        let notice = self.notice.take().ok_or(InputRejected::NothingToAcknowledge)?;
        if let Notice::EndComplete { .. } = notice {
            advance_end(self);
        }
        Ok(notice)
    }

    /// Raise a notice; without the acknowledge handshake it is only an event
    fn raise_notice(&mut self, notice: Notice) -> bool {
        if self.config.require_acknowledge {
            self.notice = Some(notice);
            true
        } else {
            false
        }
    }
}

/// Jack came to rest: accept it or hand the re-throw to the non-starter
pub fn settle_jack(state: &mut GameState) {
    let valid = state
        .jack()
        .is_some_and(|jack| jack.alive && state.court.is_past_v_line(jack.pos));

    if valid {
        state.phase = GamePhase::WaitingForThrow;
        state.events.push(GameEvent::JackAccepted);
        return;
    }

    let rethrower = state.end_starter.opponent();
    log::info!("Invalid jack, {} throws it again", rethrower.as_str());
    state.balls.clear();
    state.gesture = None;
    state.active = rethrower;
    state.phase = GamePhase::WaitingForJack;
    state.events.push(GameEvent::JackRejected { rethrower });
    state.raise_notice(Notice::InvalidJack { rethrower });
}

/// A colour ball came to rest: tidy the court, then score or pick the next thrower
pub fn settle_color_ball(state: &mut GameState) {
    for id in kill_out_of_bounds(&mut state.balls, &state.court) {
        if let Some(ball) = state.balls.iter().find(|b| b.id == id) {
            state.events.push(GameEvent::BallDead {
                id,
                owner: ball.owner,
            });
        }
    }

    let cross = state.court.cross;
    if let Some(jack) = state.jack_mut().filter(|jack| !jack.alive) {
        jack.respot(cross);
        log::info!("Jack left the court, re-spotted on the cross");
        state.events.push(GameEvent::JackRelocated);
    }

    if state.balls_remaining.red == 0 && state.balls_remaining.blue == 0 {
        state.phase = GamePhase::EndOfEnd;
        state.gesture = None;
        score_end(state);
        state.pending = Some(PendingTransition {
            due_tick: state.time_ticks.saturating_add(state.config.end_delay_ticks),
            kind: TransitionKind::AdvanceEnd,
        });
        return;
    }

    let next = next_player(state);
    if next != state.active {
        state.active = next;
        state.events.push(GameEvent::TurnChanged { side: next });
    }
    state.phase = GamePhase::WaitingForThrow;
}

/// Side to throw next: whoever is losing, as long as they still have balls
pub fn next_player(state: &GameState) -> Side {
    let proximity = closest_per_side(&state.balls).and_then(|closest| {
        match (closest.red, closest.blue) {
            (None, None) => None,
            (None, Some(_)) => (state.balls_remaining.red > 0).then_some(Side::Red),
            (Some(_), None) => (state.balls_remaining.blue > 0).then_some(Side::Blue),
            // Ties go against red: the opponent of the nearer-or-equal side throws
            (Some(red), Some(blue)) if red.dist <= blue.dist => Some(Side::Blue),
            (Some(_), Some(_)) => Some(Side::Red),
        }
    });

    let candidate = proximity.unwrap_or(state.active);
    if state.balls_remaining[candidate] == 0 {
        candidate.opponent()
    } else {
        candidate
    }
}

/// Fire a deferred transition whose due tick has been reached
pub fn fire_pending(state: &mut GameState) {
    let Some(pending) = state.pending else {
        return;
    };
    if state.time_ticks < pending.due_tick {
        return;
    }
    state.pending = None;

    match pending.kind {
        TransitionKind::AdvanceEnd => {
            let notice = Notice::EndComplete {
                end: state.current_end,
                scores: state.scores,
            };
            if !state.raise_notice(notice) {
                advance_end(state);
            }
        }
    }
}

/// Leave `EndOfEnd`: start the next end or finish the match
pub fn advance_end(state: &mut GameState) {
    if state.phase != GamePhase::EndOfEnd {
        return;
    }

    if state.current_end >= state.config.total_ends {
        state.phase = GamePhase::GameOver;
        let outcome = state.outcome();
        log::info!(
            "Game over: red {} - blue {} ({:?})",
            state.scores.red,
            state.scores.blue,
            outcome
        );
        state.events.push(GameEvent::GameOver { outcome });
        return;
    }

    state.current_end += 1;
    state.reset_end();
    log::info!(
        "End {} of {}, {} starts",
        state.current_end,
        state.config.total_ends,
        state.end_starter.as_str()
    );
    state.events.push(GameEvent::EndStarted {
        end: state.current_end,
        starter: state.end_starter,
    });
}
