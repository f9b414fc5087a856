//! Ball-ball collision response and court boundary checks
//!
//! Balls are disks whose mass is proportional to their radius. A pair that
//! overlaps exchanges momentum along the line of centres as a 1-D elastic
//! collision, then is pushed apart so the disks just touch.

use glam::DVec2;

use super::court::Court;
use super::state::Ball;

/// Result of a collision check between two balls
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the disks overlap
    pub hit: bool,
    /// Unit vector from the first ball's centre to the second's
    pub normal: DVec2,
    /// Overlap depth (for position correction)
    pub penetration: f64,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: DVec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check whether two disks overlap
///
/// Coincident centres collide along +x.
pub fn ball_ball_collision(
    a_pos: DVec2,
    a_radius: f64,
    b_pos: DVec2,
    b_radius: f64,
) -> CollisionResult {
    let delta = b_pos - a_pos;
    let dist = delta.length();
    let reach = a_radius + b_radius;

    if dist >= reach {
        return CollisionResult::miss();
    }

    let normal = if dist > 0.0 { delta / dist } else { DVec2::X };
    CollisionResult {
        hit: true,
        normal,
        penetration: reach - dist,
    }
}

/// Post-collision normal speeds for a 1-D elastic collision, radius as mass
#[inline]
pub fn elastic_exchange(v1: f64, r1: f64, v2: f64, r2: f64) -> (f64, f64) {
    let total = r1 + r2;
    let v1_final = ((r1 - r2) * v1 + 2.0 * r2 * v2) / total;
    let v2_final = ((r2 - r1) * v2 + 2.0 * r1 * v1) / total;
    (v1_final, v2_final)
}

/// Resolve a collision between two balls, returns whether they touched
///
/// Dead balls never collide.
pub fn resolve_pair(a: &mut Ball, b: &mut Ball) -> bool {
    if !a.alive || !b.alive {
        return false;
    }

    let result = ball_ball_collision(a.pos, a.radius, b.pos, b.radius);
    if !result.hit {
        return false;
    }

    // Collision frame: x along the line of centres, y tangential
    let n = result.normal;
    let t = n.perp();
    let (a_n, a_t) = (a.vel.dot(n), a.vel.dot(t));
    let (b_n, b_t) = (b.vel.dot(n), b.vel.dot(t));

    let (a_n, b_n) = elastic_exchange(a_n, a.radius, b_n, b.radius);
    a.vel = n * a_n + t * a_t;
    b.vel = n * b_n + t * b_t;

    let push = n * (result.penetration / 2.0);
    a.pos -= push;
    b.pos += push;

    log::trace!(
        "collision {} <-> {} (overlap {:.2})",
        a.id,
        b.id,
        result.penetration
    );
    true
}

/// Resolve every overlapping pair once, in index order
///
/// Returns the number of pairs that collided.
pub fn resolve_collisions(balls: &mut [Ball]) -> usize {
    let mut hits = 0;
    for i in 0..balls.len() {
        let (head, tail) = balls.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if resolve_pair(a, b) {
                hits += 1;
            }
        }
    }
    hits
}

/// Kill a live ball that crosses a court edge; returns whether it died now
pub fn check_boundary(ball: &mut Ball, court: &Court) -> bool {
    if ball.alive && court.circle_out_of_bounds(ball.pos, ball.radius) {
        ball.kill();
        return true;
    }
    false
}

/// Boundary pass over the whole collection; returns ids of newly dead balls
pub fn kill_out_of_bounds(balls: &mut [Ball], court: &Court) -> Vec<u32> {
    balls
        .iter_mut()
        .filter_map(|ball| check_boundary(ball, court).then_some(ball.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Owner;
    use proptest::prelude::*;

    fn ball(id: u32, pos: DVec2, vel: DVec2) -> Ball {
        Ball::new(id, Owner::Red, pos, vel)
    }

    #[test]
    fn test_ball_ball_collision_miss() {
        let result = ball_ball_collision(DVec2::ZERO, 15.0, DVec2::new(30.0, 0.0), 15.0);
        assert!(!result.hit);
    }

    #[test]
    fn test_overlap_is_fully_separated() {
        let mut a = ball(1, DVec2::new(100.0, 100.0), DVec2::ZERO);
        let mut b = ball(2, DVec2::new(120.0, 100.0), DVec2::ZERO);

        assert!(resolve_pair(&mut a, &mut b));
        assert!((a.distance_to(&b) - 30.0).abs() < 1e-9);
        assert!((a.pos.x - 95.0).abs() < 1e-9);
        assert!((b.pos.x - 125.0).abs() < 1e-9);
    }

    #[test]
    fn test_equal_radii_head_on_swaps_velocities() {
        let mut a = ball(1, DVec2::new(100.0, 100.0), DVec2::new(5.0, 0.0));
        let mut b = ball(2, DVec2::new(125.0, 100.0), DVec2::ZERO);

        resolve_pair(&mut a, &mut b);
        assert!(a.vel.length() < 1e-9);
        assert!((b.vel.x - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_tangential_velocity_is_kept() {
        let mut a = ball(1, DVec2::new(100.0, 100.0), DVec2::new(3.0, 4.0));
        let mut b = ball(2, DVec2::new(125.0, 100.0), DVec2::ZERO);

        resolve_pair(&mut a, &mut b);
        assert!((a.vel.y - 4.0).abs() < 1e-9);
        assert!(a.vel.x.abs() < 1e-9);
        assert!((b.vel.x - 3.0).abs() < 1e-9);
        assert!(b.vel.y.abs() < 1e-9);
    }

    #[test]
    fn test_dead_balls_never_collide() {
        let mut a = ball(1, DVec2::new(100.0, 100.0), DVec2::new(5.0, 0.0));
        let mut b = ball(2, DVec2::new(110.0, 100.0), DVec2::ZERO);
        b.kill();

        assert!(!resolve_pair(&mut a, &mut b));
        assert_eq!(a.vel, DVec2::new(5.0, 0.0));
        assert_eq!(b.pos, DVec2::new(110.0, 100.0));
    }

    #[test]
    fn test_coincident_centres_separate_along_x() {
        let mut a = ball(1, DVec2::new(200.0, 200.0), DVec2::ZERO);
        let mut b = ball(2, DVec2::new(200.0, 200.0), DVec2::ZERO);

        assert!(resolve_pair(&mut a, &mut b));
        assert!((a.pos.x - 185.0).abs() < 1e-9);
        assert!((b.pos.x - 215.0).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_collisions_counts_pairs() {
        let mut balls = vec![
            ball(1, DVec2::new(100.0, 100.0), DVec2::ZERO),
            ball(2, DVec2::new(120.0, 100.0), DVec2::ZERO),
            ball(3, DVec2::new(400.0, 400.0), DVec2::ZERO),
        ];
        assert_eq!(resolve_collisions(&mut balls), 1);
        assert_eq!(resolve_collisions(&mut balls), 0);
    }

    #[test]
    fn test_ball_leaving_left_edge_dies() {
        let court = Court::default();
        let mut b = ball(1, DVec2::new(-1.0, 600.0), DVec2::new(-4.0, 1.0));

        assert!(check_boundary(&mut b, &court));
        assert!(!b.alive);
        assert_eq!(b.vel, DVec2::ZERO);

        // Already dead: not reported again, never moves
        assert!(!check_boundary(&mut b, &court));
        b.integrate();
        assert_eq!(b.pos, DVec2::new(-1.0, 600.0));
    }

    #[test]
    fn test_kill_out_of_bounds_reports_ids() {
        let court = Court::default();
        let mut balls = vec![
            ball(1, DVec2::new(300.0, 600.0), DVec2::ZERO),
            ball(2, DVec2::new(590.0, 600.0), DVec2::ZERO),
            ball(3, DVec2::new(300.0, 5.0), DVec2::ZERO),
        ];
        assert_eq!(kill_out_of_bounds(&mut balls, &court), vec![2, 3]);
        assert!(balls[0].alive);
    }

    proptest! {
        /// Radius-weighted momentum along the collision axis is conserved
        #[test]
        fn prop_collision_conserves_momentum(
            ax in 100.0f64..500.0, ay in 100.0f64..1100.0,
            dx in -20.0f64..20.0, dy in -20.0f64..20.0,
            ra in 5.0f64..25.0, rb in 5.0f64..25.0,
            avx in -30.0f64..30.0, avy in -30.0f64..30.0,
            bvx in -30.0f64..30.0, bvy in -30.0f64..30.0,
        ) {
            prop_assume!(dx.hypot(dy) > 1e-3 && dx.hypot(dy) < ra + rb);
            let mut a = Ball::new(1, Owner::Red, DVec2::new(ax, ay), DVec2::new(avx, avy));
            let mut b = Ball::new(2, Owner::Blue, DVec2::new(ax + dx, ay + dy), DVec2::new(bvx, bvy));
            a.radius = ra;
            b.radius = rb;

            let axis = (b.pos - a.pos).normalize();
            let before = ra * a.vel.dot(axis) + rb * b.vel.dot(axis);
            let total_before = a.vel * ra + b.vel * rb;

            prop_assert!(resolve_pair(&mut a, &mut b));

            let after = ra * a.vel.dot(axis) + rb * b.vel.dot(axis);
            prop_assert!((before - after).abs() < 1e-6);
            prop_assert!((total_before - (a.vel * ra + b.vel * rb)).length() < 1e-6);
            prop_assert!((a.distance_to(&b) - (ra + rb)).abs() < 1e-6);
        }
    }
}
