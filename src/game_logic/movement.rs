use crate::game_logic::grid::DEFAULT_CELL_SIZE;
use bevy::prelude::*;
use std::f32::consts::{PI, TAU};

/// Timing and shape parameters for hop, bump, turn and pose animations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementConfig {
    pub cell_size: f32,
    pub hop_duration: f32,
    pub hop_height: f32,
    pub bump_duration: f32,
    pub bump_distance: f32,
    /// Radians per second
    pub turn_rate: f32,
    /// Pose progress units per second (1.0 = full blend in one second)
    pub pose_blend_rate: f32,
    /// Offset from the cell center when fully lying down
    pub lying_offset: Vec3,
    /// Pitch applied when fully lying down
    pub lying_pitch: f32,
    /// Extra lift at the middle of the pose blend (climbing over the bed frame)
    pub pose_lift: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            hop_duration: 0.18,
            hop_height: 0.6,
            bump_duration: 0.16,
            bump_distance: 0.35,
            turn_rate: 14.0,
            pose_blend_rate: 2.5,
            lying_offset: Vec3::new(0.4, 0.45, 0.0),
            lying_pitch: -PI / 2.0,
            pose_lift: 0.3,
        }
    }
}

/// Cubic ease-in-out on `[0, 1]`; input is clamped
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Quintic ease-in-out on `[0, 1]` with zero first and second derivatives at both ends
pub fn smootherstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Normalized progress of an animation, safe for zero durations
pub fn progress(elapsed: f32, duration: f32) -> f32 {
    if !(duration > 0.0 && duration.is_finite()) {
        return 1.0;
    }
    (elapsed / duration).clamp(0.0, 1.0)
}

/// Vertical arc for a hop at progress `t`; zero at both ends, `height` at the middle
pub fn hop_arc(t: f32, height: f32) -> f32 {
    (t.clamp(0.0, 1.0) * PI).sin() * height
}

/// Displacement along the bump direction at progress `t`: out for the first half, back for the second
pub fn bump_extent(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        smoothstep(t * 2.0)
    } else {
        1.0 - smoothstep((t - 0.5) * 2.0)
    }
}

/// Wrap an angle into `(-PI, PI]`
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// Turn `current` toward `target` by at most `max_step`, taking the shorter way round
pub fn step_yaw(current: f32, target: f32, max_step: f32) -> f32 {
    let mut delta = target - current;
    if delta > PI {
        delta -= TAU;
    } else if delta < -PI {
        delta += TAU;
    }

    if delta.abs() <= max_step {
        wrap_angle(target)
    } else {
        wrap_angle(current + max_step * delta.signum())
    }
}

/// Offset curve used while climbing in: eased slide plus a mid-blend lift
fn entering_offset(p: f32, config: &MovementConfig) -> Vec3 {
    config.lying_offset * smoothstep(p) + Vec3::Y * hop_arc(p, config.pose_lift)
}

/// Offset curve used while getting out: flatter start and finish, no lift
fn leaving_offset(p: f32, config: &MovementConfig) -> Vec3 {
    config.lying_offset * smootherstep(p)
}

/// Offset from the cell center for pose progress `p` (0 = standing, 1 = lying).
///
/// The leaving curve dominates near standing and the entering curve near lying,
/// so the result depends only on `p` and stays continuous if the target flips mid-blend.
pub fn pose_offset(p: f32, config: &MovementConfig) -> Vec3 {
    let p = p.clamp(0.0, 1.0);
    leaving_offset(p, config).lerp(entering_offset(p, config), smoothstep(p))
}

/// Pitch for pose progress `p`
pub fn pose_pitch(p: f32, config: &MovementConfig) -> f32 {
    config.lying_pitch * smoothstep(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_smoothstep_endpoints_and_midpoint() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert!((smoothstep(0.5) - 0.5).abs() < EPS);
        assert_eq!(smoothstep(-3.0), 0.0);
        assert_eq!(smoothstep(7.0), 1.0);
    }

    #[test]
    fn test_smootherstep_endpoints() {
        assert_eq!(smootherstep(0.0), 0.0);
        assert!((smootherstep(1.0) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_progress_handles_zero_duration() {
        assert_eq!(progress(0.0, 0.0), 1.0);
        assert_eq!(progress(0.05, 0.1), 0.5);
        assert_eq!(progress(0.5, 0.1), 1.0);
        assert_eq!(progress(0.0, f32::NAN), 1.0);
        assert_eq!(progress(0.0, f32::INFINITY), 1.0);
    }

    #[test]
    fn test_hop_arc_peaks_mid_hop() {
        assert!(hop_arc(0.0, 0.6).abs() < EPS);
        assert!((hop_arc(0.5, 0.6) - 0.6).abs() < EPS);
        assert!(hop_arc(1.0, 0.6).abs() < EPS);
    }

    #[test]
    fn test_bump_goes_out_and_back() {
        assert_eq!(bump_extent(0.0), 0.0);
        assert!((bump_extent(0.5) - 1.0).abs() < EPS);
        assert!(bump_extent(1.0).abs() < EPS);
        assert!(bump_extent(0.25) > 0.0 && bump_extent(0.25) < 1.0);
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(3.0 * PI) - PI).abs() < EPS);
        assert!((wrap_angle(-FRAC_PI_2) + FRAC_PI_2).abs() < EPS);
        assert!((wrap_angle(TAU + 0.25) - 0.25).abs() < EPS);
    }

    #[test]
    fn test_step_yaw_takes_short_way_round() {
        // From just below +PI to just above -PI is a short hop across the seam
        let current = PI - 0.1;
        let target = -PI + 0.1;
        let next = step_yaw(current, target, 0.05);
        // Moving forward across PI, not backward through 0
        assert!(next > current || next < -PI + 0.2);
        assert!((wrap_angle(next - current) - 0.05).abs() < 1e-4);
    }

    #[test]
    fn test_step_yaw_snaps_when_close() {
        let next = step_yaw(0.0, FRAC_PI_2, 10.0);
        assert!((next - FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn test_pose_offset_endpoints() {
        let config = MovementConfig::default();
        assert!(pose_offset(0.0, &config).length() < EPS);
        assert!((pose_offset(1.0, &config) - config.lying_offset).length() < 1e-4);
        // Lift makes the middle of the blend higher than a straight line
        let mid = pose_offset(0.5, &config);
        assert!(mid.y > config.lying_offset.y * 0.5);
    }

    #[test]
    fn test_pose_pitch_endpoints() {
        let config = MovementConfig::default();
        assert_eq!(pose_pitch(0.0, &config), 0.0);
        assert!((pose_pitch(1.0, &config) - config.lying_pitch).abs() < EPS);
    }
}
