//! End scoring
//!
//! The side with the live ball nearest the jack wins the end and scores one
//! point for each of its live balls closer than the opponent's best ball.

use super::state::{Ball, EndResult, GameEvent, GameState, Owner, PerSide, Side};

/// Nearest live ball of one side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Closest {
    pub id: u32,
    pub dist: f64,
}

/// Nearest live ball of `side` to `jack`, `None` when the side has no live balls
pub fn closest_to_jack(balls: &[Ball], jack: &Ball, side: Side) -> Option<Closest> {
    let owner = Owner::from(side);
    balls
        .iter()
        .filter(|b| b.alive && b.owner == owner)
        .map(|b| Closest {
            id: b.id,
            dist: b.distance_to(jack),
        })
        .fold(None, |best: Option<Closest>, c| match best {
            Some(b) if b.dist <= c.dist => Some(b),
            _ => Some(c),
        })
}

/// Closest ball per side, `None` overall when the jack is missing or dead
pub fn closest_per_side(balls: &[Ball]) -> Option<PerSide<Option<Closest>>> {
    let jack = balls.iter().find(|b| b.is_jack() && b.alive)?;
    Some(PerSide {
        red: closest_to_jack(balls, jack, Side::Red),
        blue: closest_to_jack(balls, jack, Side::Blue),
    })
}

/// Winner and points for a finished end, without touching any state
pub fn evaluate_end(balls: &[Ball]) -> (Option<Side>, u32) {
    let Some(jack) = balls.iter().find(|b| b.is_jack() && b.alive) else {
        return (None, 0);
    };
    let red = closest_to_jack(balls, jack, Side::Red);
    let blue = closest_to_jack(balls, jack, Side::Blue);

    let winner = match (red, blue) {
        (None, None) => return (None, 0),
        (Some(_), None) => Side::Red,
        (None, Some(_)) => Side::Blue,
        (Some(r), Some(b)) if r.dist < b.dist => Side::Red,
        (Some(r), Some(b)) if b.dist < r.dist => Side::Blue,
        // Exact tie: nobody is strictly closer
        (Some(_), Some(_)) => return (None, 0),
    };

    let loser_best = match winner {
        Side::Red => blue,
        Side::Blue => red,
    }
    .map_or(f64::INFINITY, |c| c.dist);

    let owner = Owner::from(winner);
    let points = balls
        .iter()
        .filter(|b| b.alive && b.owner == owner && b.distance_to(jack) < loser_best)
        .count() as u32;

    (Some(winner), points)
}

/// Score the current end, update match scores and the next end-starter
pub fn score_end(state: &mut GameState) -> EndResult {
    let (winner, points) = evaluate_end(&state.balls);

    let next_starter = match winner {
        Some(side) if points > 0 => {
            state.scores[side] += points;
            side
        }
        _ => state.end_starter.opponent(),
    };
    state.end_starter = next_starter;

    let result = EndResult {
        end: state.current_end,
        winner: winner.filter(|_| points > 0),
        points,
        next_starter,
    };
    log::info!(
        "End {} scored: {} ({} point(s)), red {} - blue {}",
        result.end,
        result.winner.map_or("no winner", Side::as_str),
        points,
        state.scores.red,
        state.scores.blue
    );
    state.end_history.push(result);
    state.events.push(GameEvent::EndScored(result));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    const JACK: DVec2 = DVec2::new(300.0, 400.0);

    fn setup(colour_balls: &[(Owner, f64)]) -> GameState {
        let mut state = GameState::default();
        state.spawn_ball(Owner::Jack, JACK, DVec2::ZERO);
        for &(owner, dist) in colour_balls {
            state.spawn_ball(owner, JACK + DVec2::new(0.0, dist), DVec2::ZERO);
        }
        state
    }

    #[test]
    fn test_red_closer_scores_one() {
        let mut state = setup(&[(Owner::Red, 50.0), (Owner::Blue, 80.0)]);
        state.end_starter = Side::Blue;
        state.balls_remaining = PerSide::splat(0);

        let result = score_end(&mut state);
        assert_eq!(result.winner, Some(Side::Red));
        assert_eq!(result.points, 1);
        assert_eq!(state.scores, PerSide { red: 1, blue: 0 });
        assert_eq!(state.end_starter, Side::Red);
    }

    #[test]
    fn test_multiple_points_until_opponent_ball() {
        let mut state = setup(&[
            (Owner::Blue, 30.0),
            (Owner::Blue, 45.0),
            (Owner::Red, 60.0),
            (Owner::Blue, 70.0),
            (Owner::Red, 90.0),
        ]);
        let result = score_end(&mut state);
        assert_eq!(result.winner, Some(Side::Blue));
        assert_eq!(result.points, 2);
        assert_eq!(state.scores.blue, 2);
        assert_eq!(state.end_starter, Side::Blue);
    }

    #[test]
    fn test_absent_side_loses_all_balls_count() {
        let mut state = setup(&[(Owner::Red, 50.0), (Owner::Red, 500.0)]);
        let result = score_end(&mut state);
        assert_eq!(result.winner, Some(Side::Red));
        assert_eq!(result.points, 2);
    }

    #[test]
    fn test_dead_balls_do_not_score() {
        let mut state = setup(&[(Owner::Red, 50.0), (Owner::Blue, 80.0), (Owner::Blue, 10.0)]);
        state.balls[3].kill();
        let result = score_end(&mut state);
        assert_eq!(result.winner, Some(Side::Red));
        assert_eq!(result.points, 1);
    }

    #[test]
    fn test_no_live_colour_balls_alternates_starter() {
        let mut state = setup(&[(Owner::Red, 50.0)]);
        state.balls[1].kill();
        state.end_starter = Side::Red;
        let result = score_end(&mut state);
        assert_eq!(result.winner, None);
        assert_eq!(result.points, 0);
        assert_eq!(state.end_starter, Side::Blue);
        assert_eq!(state.scores, PerSide::default());
    }

    #[test]
    fn test_dead_jack_scores_nothing() {
        let mut state = setup(&[(Owner::Red, 50.0)]);
        state.balls[0].kill();
        let result = score_end(&mut state);
        assert_eq!(result.points, 0);
        assert_eq!(state.end_starter, Side::Blue);
    }

    #[test]
    fn test_exact_tie_scores_nothing() {
        let mut state = setup(&[(Owner::Red, 50.0), (Owner::Blue, 50.0)]);
        state.end_starter = Side::Blue;
        let result = score_end(&mut state);
        assert_eq!(result.winner, None);
        assert_eq!(result.points, 0);
        assert_eq!(state.end_starter, Side::Red);
    }

    #[test]
    fn test_result_is_recorded() {
        let mut state = setup(&[(Owner::Blue, 20.0)]);
        let result = score_end(&mut state);
        assert_eq!(state.end_history, vec![result]);
        assert_eq!(state.drain_events().last(), Some(&GameEvent::EndScored(result)));
    }

    #[test]
    fn test_closest_to_jack_skips_other_side() {
        let state = setup(&[(Owner::Red, 70.0), (Owner::Blue, 10.0), (Owner::Red, 40.0)]);
        let jack = state.jack().unwrap();
        let red = closest_to_jack(&state.balls, jack, Side::Red).unwrap();
        assert_eq!(red.id, 4);
        assert!((red.dist - 40.0).abs() < 1e-9);
    }
}
