//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::DVec2;

use super::collision::{check_boundary, resolve_collisions};
use super::rules::{fire_pending, settle_color_ball, settle_jack};
use super::state::{GameEvent, GamePhase, GameState, all_stopped};

/// Input commands for a single tick (deterministic)
///
/// Applied in field order before the physics step. Hosts that prefer
/// immediate feedback can call the `GameState` input methods directly.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Throwing box picked in the UI (1-based)
    pub select_box: Option<u8>,
    /// Pointer pressed (court coordinates)
    pub throw_start: Option<DVec2>,
    /// Pointer released (court coordinates)
    pub throw_end: Option<DVec2>,
    /// Dismiss the current notice
    pub acknowledge: bool,
}

fn apply_input(state: &mut GameState, input: &TickInput) {
    if let Some(index) = input.select_box {
        if let Err(e) = state.select_box(index) {
            log::debug!("select_box ignored: {e}");
        }
    }
    if input.acknowledge {
        if let Err(e) = state.acknowledge() {
            log::debug!("acknowledge ignored: {e}");
        }
    }
    if let Some(pos) = input.throw_start {
        if let Err(e) = state.throw_start(pos) {
            log::debug!("throw start ignored: {e}");
        }
    }
    if let Some(pos) = input.throw_end {
        if let Err(e) = state.throw_end(pos) {
            log::debug!("throw end ignored: {e}");
        }
    }
}

/// Move every ball one tick, kill balls that leave the court, then collide
///
/// Returns the number of colliding pairs.
pub fn step_motion(state: &mut GameState) -> usize {
    for ball in &mut state.balls {
        ball.integrate();
        if check_boundary(ball, &state.court) {
            log::debug!("ball {} ({:?}) left the court", ball.id, ball.owner);
            state.events.push(GameEvent::BallDead {
                id: ball.id,
                owner: ball.owner,
            });
        }
    }

    resolve_collisions(&mut state.balls)
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.is_game_over() {
        return;
    }

    apply_input(state, input);

    state.time_ticks += 1;
    step_motion(state);
    fire_pending(state);

    if !all_stopped(&state.balls) {
        return;
    }
    match state.phase {
        GamePhase::JackMoving => settle_jack(state),
        GamePhase::ColorBallMoving => settle_color_ball(state),
        GamePhase::WaitingForJack
        | GamePhase::WaitingForThrow
        | GamePhase::EndOfEnd
        | GamePhase::GameOver => {}
    }
}

/// Tick until every ball is at rest, up to `max_ticks`; returns ticks used
pub fn run_until_settled(state: &mut GameState, max_ticks: u32) -> Option<u32> {
    let idle = TickInput::default();
    for n in 1..=max_ticks {
        tick(state, &idle);
        if all_stopped(&state.balls)
            && !matches!(
                state.phase,
                GamePhase::JackMoving | GamePhase::ColorBallMoving
            )
        {
            return Some(n);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesConfig;
    use crate::sim::state::{Owner, PerSide, Side};
    use proptest::prelude::*;

    const BOX1: DVec2 = DVec2::new(50.0, 1100.0);

    fn throw(state: &mut GameState, start: DVec2, end: DVec2) {
        let input = TickInput {
            throw_start: Some(start),
            throw_end: Some(end),
            ..Default::default()
        };
        tick(state, &input);
    }

    #[test]
    fn test_tick_jack_throw_to_waiting_for_throw() {
        let mut state = GameState::new(RulesConfig::unattended());
        // Straight up the box-1 lane, power 12 ~ 600 units of travel
        throw(&mut state, BOX1, BOX1 + DVec2::new(0.0, -120.0));
        assert_eq!(state.phase, GamePhase::JackMoving);

        assert!(run_until_settled(&mut state, 2000).is_some());
        assert_eq!(state.phase, GamePhase::WaitingForThrow);
        let jack = state.jack().unwrap();
        assert!(jack.alive);
        assert!(jack.pos.y < 700.0);
    }

    #[test]
    fn test_short_jack_is_rethrown_by_opponent() {
        let mut state = GameState::new(RulesConfig::unattended());
        throw(&mut state, BOX1, BOX1 + DVec2::new(0.0, -30.0));
        run_until_settled(&mut state, 2000).unwrap();

        assert_eq!(state.phase, GamePhase::WaitingForJack);
        assert_eq!(state.active, Side::Blue);
        assert!(state.balls.is_empty());
    }

    #[test]
    fn test_jack_off_the_side_is_invalid() {
        let mut state = GameState::new(RulesConfig::unattended());
        throw(&mut state, BOX1, BOX1 + DVec2::new(-200.0, -10.0));
        run_until_settled(&mut state, 2000).unwrap();
        assert_eq!(state.phase, GamePhase::WaitingForJack);
        assert_eq!(state.active, Side::Blue);
    }

    #[test]
    fn test_tick_ignores_input_while_moving() {
        let mut state = GameState::new(RulesConfig::unattended());
        throw(&mut state, BOX1, BOX1 + DVec2::new(0.0, -120.0));
        let before = state.balls.len();
        throw(&mut state, BOX1, BOX1 + DVec2::new(0.0, -120.0));
        assert_eq!(state.balls.len(), before);
        assert_eq!(state.phase, GamePhase::JackMoving);
    }

    #[test]
    fn test_colour_ball_settles_and_turn_passes() {
        let mut state = GameState::new(RulesConfig::unattended());
        state.spawn_ball(Owner::Jack, DVec2::new(50.0, 500.0), DVec2::ZERO);
        state.phase = GamePhase::WaitingForThrow;

        throw(&mut state, BOX1, BOX1 + DVec2::new(0.0, -100.0));
        assert_eq!(state.phase, GamePhase::ColorBallMoving);
        run_until_settled(&mut state, 2000).unwrap();

        assert_eq!(state.phase, GamePhase::WaitingForThrow);
        assert_eq!(state.balls_remaining, PerSide { red: 5, blue: 6 });
        // Blue has no ball on the court, so blue throws
        assert_eq!(state.active, Side::Blue);
    }

    #[test]
    fn test_moving_ball_knocks_resting_ball() {
        let mut state = GameState::new(RulesConfig::unattended());
        state.spawn_ball(Owner::Jack, DVec2::new(300.0, 400.0), DVec2::ZERO);
        state.spawn_ball(Owner::Red, DVec2::new(300.0, 600.0), DVec2::new(0.0, -10.0));
        state.phase = GamePhase::ColorBallMoving;

        for _ in 0..40 {
            tick(&mut state, &TickInput::default());
        }
        let jack = state.jack().unwrap();
        assert!(jack.pos.y < 400.0);
    }

    #[test]
    fn test_game_over_stops_ticking() {
        let mut state = GameState::default();
        state.phase = GamePhase::GameOver;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_end_delay_then_next_end() {
        let mut state = GameState::new(RulesConfig::unattended());
        state.spawn_ball(Owner::Jack, DVec2::new(300.0, 400.0), DVec2::ZERO);
        state.spawn_ball(Owner::Red, DVec2::new(300.0, 450.0), DVec2::ZERO);
        state.spawn_ball(Owner::Blue, DVec2::new(300.0, 480.0), DVec2::ZERO);
        state.balls_remaining = PerSide::splat(0);
        state.phase = GamePhase::ColorBallMoving;

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::EndOfEnd);
        assert_eq!(state.scores.red, 1);

        // No throws during the delay
        throw(&mut state, BOX1, BOX1 + DVec2::new(0.0, -120.0));
        assert_eq!(state.phase, GamePhase::EndOfEnd);

        for _ in 0..state.config.end_delay_ticks {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.phase, GamePhase::WaitingForJack);
        assert_eq!(state.current_end, 2);
        assert_eq!(state.active, Side::Red);
        assert_eq!(state.end_history.len(), 1);
    }

    #[test]
    fn test_determinism() {
        let inputs = [
            TickInput {
                select_box: Some(3),
                ..Default::default()
            },
            TickInput {
                throw_start: Some(DVec2::new(250.0, 1050.0)),
                throw_end: Some(DVec2::new(240.0, 920.0)),
                ..Default::default()
            },
            TickInput::default(),
        ];

        let mut state1 = GameState::default();
        let mut state2 = GameState::default();
        for _ in 0..50 {
            for input in &inputs {
                tick(&mut state1, input);
                tick(&mut state2, input);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.balls, state2.balls);
        assert_eq!(state1.phase, state2.phase);
    }

    proptest! {
        /// Dead balls never drift, however long the simulation runs
        #[test]
        fn prop_dead_balls_stay_frozen(
            balls in prop::collection::vec(
                (20.0f64..580.0, 20.0f64..1230.0, -30.0f64..30.0, -30.0f64..30.0),
                1..8,
            ),
            ticks in 1usize..400,
        ) {
            let mut state = GameState::new(RulesConfig::unattended());
            state.phase = GamePhase::EndOfEnd;
            for (x, y, vx, vy) in balls {
                state.spawn_ball(Owner::Red, DVec2::new(x, y), DVec2::new(vx, vy));
            }
            for _ in 0..ticks {
                step_motion(&mut state);
                for ball in &state.balls {
                    if !ball.alive {
                        prop_assert_eq!(ball.vel, DVec2::ZERO);
                    }
                }
            }
        }

        /// Every ball comes to rest in finite time
        #[test]
        fn prop_motion_terminates(
            balls in prop::collection::vec(
                (20.0f64..580.0, 20.0f64..1230.0, -30.0f64..30.0, -30.0f64..30.0),
                1..8,
            ),
        ) {
            let mut state = GameState::new(RulesConfig::unattended());
            for (x, y, vx, vy) in balls {
                state.spawn_ball(Owner::Blue, DVec2::new(x, y), DVec2::new(vx, vy));
            }
            let mut ticks = 0;
            while !all_stopped(&state.balls) {
                step_motion(&mut state);
                ticks += 1;
                prop_assert!(ticks < 5000);
            }
        }
    }
}
