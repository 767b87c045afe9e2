use crate::game_logic::grid::GridCoord;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};

/// One of the four cardinal moves the player can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveIntent {
    Forward,
    Backward,
    Left,
    Right,
}

impl MoveIntent {
    pub const ALL: [MoveIntent; 4] = [
        MoveIntent::Forward,
        MoveIntent::Backward,
        MoveIntent::Left,
        MoveIntent::Right,
    ];

    /// Unit grid step for this intent. Forward is toward -z.
    pub fn delta(self) -> GridCoord {
        match self {
            MoveIntent::Forward => GridCoord::new(0, -1),
            MoveIntent::Backward => GridCoord::new(0, 1),
            MoveIntent::Left => GridCoord::new(-1, 0),
            MoveIntent::Right => GridCoord::new(1, 0),
        }
    }

    /// Yaw (radians about +Y) that turns a +Z-facing model toward the move direction
    pub fn facing_angle(self) -> f32 {
        match self {
            MoveIntent::Forward => PI,
            MoveIntent::Backward => 0.0,
            MoveIntent::Left => -FRAC_PI_2,
            MoveIntent::Right => FRAC_PI_2,
        }
    }
}

impl std::fmt::Display for MoveIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MoveIntent::Forward => "forward",
            MoveIntent::Backward => "backward",
            MoveIntent::Left => "left",
            MoveIntent::Right => "right",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deltas_are_unit_steps() {
        for intent in MoveIntent::ALL {
            assert!(GridCoord::ORIGIN.is_adjacent(intent.delta()));
        }
    }

    #[test]
    fn test_forward_decrements_z() {
        assert_eq!(MoveIntent::Forward.delta(), GridCoord::new(0, -1));
    }

    #[test]
    fn test_facing_points_along_delta() {
        for intent in MoveIntent::ALL {
            let yaw = intent.facing_angle();
            let delta = intent.delta();
            // Rotating +Z by yaw about +Y gives (sin, cos)
            assert!((yaw.sin() - delta.x as f32).abs() < 1e-5);
            assert!((yaw.cos() - delta.z as f32).abs() < 1e-5);
        }
    }
}
