//! Stateless analysis over recorded trajectories: closing dynamics between
//! two aircraft and a Newton-Raphson estimate of the minimum-distance
//! instant. Nothing here mutates simulation state.

use glam::DVec3;

/// Default separation threshold for a closing alert (position units).
pub const ALERT_THRESHOLD: f64 = 5.0;

/// Finite-difference step for the derivative estimates.
const FD_STEP: f64 = 1e-5;
/// Newton-Raphson iteration cap.
const MAX_ITERATIONS: usize = 20;
/// Below this |f''| the squared-distance curve is treated as flat
/// (parallel or near-parallel trajectories) and iteration stops.
const CURVATURE_EPS: f64 = 1e-10;

/// Snapshot of two recorded position histories (one sample per tick,
/// tick 0 = registration) plus each aircraft's constant velocity. Derived
/// from tower state on demand; not kept in sync afterward.
#[derive(Clone, Debug)]
pub struct TrajectoryPair {
    pub positions_a: Vec<DVec3>,
    pub velocity_a: DVec3,
    pub positions_b: Vec<DVec3>,
    pub velocity_b: DVec3,
}

/// Separation and closing dynamics at one instant.
#[derive(Clone, Copy, Debug)]
pub struct ApproachReading {
    pub distance: f64,
    /// Rate of separation change; negative means the aircraft are closing.
    pub radial_velocity: f64,
    pub alert: bool,
}

/// One radar sample along a recorded trajectory pair.
#[derive(Clone, Copy, Debug)]
pub struct ApproachSample {
    pub tick: u32,
    pub reading: ApproachReading,
}

/// Result of the minimum-distance search.
#[derive(Clone, Copy, Debug)]
pub struct MinimumDistance {
    pub time: f64,
    pub distance: f64,
    pub position_a: DVec3,
    pub position_b: DVec3,
}

/// Rate of change of separation along the line of sight between two moving
/// points. Returns NaN when `rel_pos` is the zero vector (coincident
/// positions have no line of sight); the caller must guard.
pub fn radial_velocity(rel_pos: DVec3, rel_vel: DVec3) -> f64 {
    rel_pos.dot(rel_vel) / rel_pos.length()
}

/// Instantaneous separation plus closing check between two aircraft states.
pub fn approach_reading(
    pos1: DVec3,
    vel1: DVec3,
    pos2: DVec3,
    vel2: DVec3,
    threshold: f64,
) -> ApproachReading {
    let distance = (pos2 - pos1).length();
    let vr = radial_velocity(pos2 - pos1, vel2 - vel1);
    ApproachReading {
        distance,
        radial_velocity: vr,
        alert: distance < threshold && vr < 0.0,
    }
}

/// True iff the aircraft are inside `threshold` of each other and closing.
pub fn closing_alert(pos1: DVec3, vel1: DVec3, pos2: DVec3, vel2: DVec3, threshold: f64) -> bool {
    approach_reading(pos1, vel1, pos2, vel2, threshold).alert
}

/// One approach reading per recorded tick over the common prefix of the two
/// histories.
pub fn closing_profile(pair: &TrajectoryPair) -> Vec<ApproachSample> {
    let n = pair.positions_a.len().min(pair.positions_b.len());
    (0..n)
        .map(|i| ApproachSample {
            tick: i as u32,
            reading: approach_reading(
                pair.positions_a[i],
                pair.velocity_a,
                pair.positions_b[i],
                pair.velocity_b,
                ALERT_THRESHOLD,
            ),
        })
        .collect()
}

/// Newton-Raphson search for the instant of minimum separation between two
/// linear trajectories, rooted on the finite-difference derivative of the
/// squared distance. The returned time is clamped to t >= 0: a negative
/// iterate means the closest approach lies in the past, so the search stops
/// at the initial instant. Near-zero curvature (parallel trajectories)
/// terminates early with the last valid t.
pub fn find_minimum_distance_time(
    r0_a: DVec3,
    vel_a: DVec3,
    r0_b: DVec3,
    vel_b: DVec3,
) -> MinimumDistance {
    let separation_sq = |t: f64| {
        let d = (r0_a + vel_a * t) - (r0_b + vel_b * t);
        d.length_squared()
    };

    let mut t = 0.0;
    for _ in 0..MAX_ITERATIONS {
        let f1 = central_difference(&separation_sq, t);
        let f2 = second_difference(&separation_sq, t);
        if f2.abs() < CURVATURE_EPS {
            break;
        }
        t -= f1 / f2;
        if t < 0.0 {
            t = 0.0;
            break;
        }
    }

    let position_a = r0_a + vel_a * t;
    let position_b = r0_b + vel_b * t;
    MinimumDistance {
        time: t,
        distance: (position_a - position_b).length(),
        position_a,
        position_b,
    }
}

/// Symmetric first-derivative estimate.
fn central_difference(f: &impl Fn(f64) -> f64, t: f64) -> f64 {
    (f(t + FD_STEP) - f(t - FD_STEP)) / (2.0 * FD_STEP)
}

/// Symmetric second-derivative estimate.
fn second_difference(f: &impl Fn(f64) -> f64, t: f64) -> f64 {
    (f(t + FD_STEP) - 2.0 * f(t) + f(t - FD_STEP)) / (FD_STEP * FD_STEP)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radial_velocity_head_on() {
        // B sits 10 units along +X, closing at 2 units/tick
        let vr = radial_velocity(DVec3::new(10.0, 0.0, 0.0), DVec3::new(-2.0, 0.0, 0.0));
        assert!((vr + 2.0).abs() < 1e-12, "vr: {vr}");
    }

    #[test]
    fn radial_velocity_coincident_is_nan() {
        let vr = radial_velocity(DVec3::ZERO, DVec3::X);
        assert!(vr.is_nan());
    }

    #[test]
    fn alert_requires_closing() {
        let p1 = DVec3::ZERO;
        let p2 = DVec3::new(3.0, 0.0, 0.0);
        // Inside threshold and closing
        assert!(closing_alert(p1, DVec3::X, p2, -DVec3::X, ALERT_THRESHOLD));
        // Inside threshold but separating
        assert!(!closing_alert(p1, -DVec3::X, p2, DVec3::X, ALERT_THRESHOLD));
        // Closing but outside threshold
        let far = DVec3::new(30.0, 0.0, 0.0);
        assert!(!closing_alert(p1, DVec3::X, far, -DVec3::X, ALERT_THRESHOLD));
    }

    #[test]
    fn crossing_paths_meet_at_t5() {
        // Paths cross exactly: d(t) = |10 - 2t| along X
        let result = find_minimum_distance_time(
            DVec3::ZERO,
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(10.0, 0.0, 0.0),
            DVec3::new(-1.0, 1.0, 0.0),
        );
        assert!((result.time - 5.0).abs() < 1e-6, "t_min: {}", result.time);
        assert!(result.distance < 1e-6, "distance: {}", result.distance);
        assert!((result.position_a - DVec3::new(5.0, 5.0, 0.0)).length() < 1e-5);
        assert!((result.position_a - result.position_b).length() < 1e-5);
    }

    #[test]
    fn parallel_trajectories_terminate_early() {
        // Equal velocities: squared distance is constant, curvature zero
        let result = find_minimum_distance_time(
            DVec3::ZERO,
            DVec3::X,
            DVec3::new(0.0, 5.0, 0.0),
            DVec3::X,
        );
        assert_eq!(result.time, 0.0);
        assert!((result.distance - 5.0).abs() < 1e-12, "d: {}", result.distance);
    }

    #[test]
    fn diverging_pair_clamps_to_zero() {
        // Separation (5 + t) grows from the start; minimum lies at t < 0
        let result = find_minimum_distance_time(
            DVec3::ZERO,
            DVec3::X,
            DVec3::new(5.0, 0.0, 0.0),
            DVec3::new(2.0, 0.0, 0.0),
        );
        assert_eq!(result.time, 0.0);
        assert!((result.distance - 5.0).abs() < 1e-9, "d: {}", result.distance);
    }

    #[test]
    fn closing_profile_covers_common_prefix() {
        let pair = TrajectoryPair {
            positions_a: (0..5).map(|t| DVec3::new(t as f64, 0.0, 0.0)).collect(),
            velocity_a: DVec3::X,
            positions_b: (0..3).map(|t| DVec3::new(10.0 - t as f64, 0.0, 0.0)).collect(),
            velocity_b: -DVec3::X,
        };
        let profile = closing_profile(&pair);
        assert_eq!(profile.len(), 3);
        assert!((profile[0].reading.distance - 10.0).abs() < 1e-12);
        assert!((profile[2].reading.distance - 6.0).abs() < 1e-12);
        // Closing at 2 units per tick the whole way
        for sample in &profile {
            assert!((sample.reading.radial_velocity + 2.0).abs() < 1e-12);
        }
    }
}
