use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Clamp into `[min, max]`; NaN and infinities fall back to `default`
fn clamp_finite(value: f32, min: f32, max: f32, default: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        default
    }
}

/// An animation duration in seconds constrained to [0.01, 2.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, From, Serialize, Deserialize)]
pub struct AnimationDuration(f32);

impl AnimationDuration {
    const MIN: f32 = 0.01;
    const MAX: f32 = 2.0;
    const DEFAULT: f32 = 0.18;

    pub fn new(value: f32) -> Self {
        Self(clamp_finite(value, Self::MIN, Self::MAX, Self::DEFAULT))
    }

    pub fn get(self) -> f32 {
        clamp_finite(self.0, Self::MIN, Self::MAX, Self::DEFAULT)
    }
}

impl Default for AnimationDuration {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Peak height of the hop arc in world units, constrained to [0.0, 5.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, From, Serialize, Deserialize)]
pub struct HopHeight(f32);

impl HopHeight {
    const MIN: f32 = 0.0;
    const MAX: f32 = 5.0;
    const DEFAULT: f32 = 0.6;

    pub fn new(value: f32) -> Self {
        Self(clamp_finite(value, Self::MIN, Self::MAX, Self::DEFAULT))
    }

    pub fn get(self) -> f32 {
        clamp_finite(self.0, Self::MIN, Self::MAX, Self::DEFAULT)
    }
}

impl Default for HopHeight {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// How far a rejected move leans toward the blocked cell, constrained to [0.0, 0.9]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, From, Serialize, Deserialize)]
pub struct BumpDistance(f32);

impl BumpDistance {
    const MIN: f32 = 0.0;
    const MAX: f32 = 0.9;
    const DEFAULT: f32 = 0.35;

    pub fn new(value: f32) -> Self {
        Self(clamp_finite(value, Self::MIN, Self::MAX, Self::DEFAULT))
    }

    pub fn get(self) -> f32 {
        clamp_finite(self.0, Self::MIN, Self::MAX, Self::DEFAULT)
    }
}

impl Default for BumpDistance {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Facing turn speed in radians per second, constrained to [0.5, 60.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, From, Serialize, Deserialize)]
pub struct TurnRate(f32);

impl TurnRate {
    const MIN: f32 = 0.5;
    const MAX: f32 = 60.0;
    const DEFAULT: f32 = 14.0;

    pub fn new(value: f32) -> Self {
        Self(clamp_finite(value, Self::MIN, Self::MAX, Self::DEFAULT))
    }

    pub fn get(self) -> f32 {
        clamp_finite(self.0, Self::MIN, Self::MAX, Self::DEFAULT)
    }
}

impl Default for TurnRate {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Pose blend progress per second, constrained to [0.1, 20.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, From, Serialize, Deserialize)]
pub struct BlendRate(f32);

impl BlendRate {
    const MIN: f32 = 0.1;
    const MAX: f32 = 20.0;
    const DEFAULT: f32 = 2.5;

    pub fn new(value: f32) -> Self {
        Self(clamp_finite(value, Self::MIN, Self::MAX, Self::DEFAULT))
    }

    pub fn get(self) -> f32 {
        clamp_finite(self.0, Self::MIN, Self::MAX, Self::DEFAULT)
    }
}

impl Default for BlendRate {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_are_clamped() {
        assert_eq!(AnimationDuration::new(0.0).get(), 0.01);
        assert_eq!(HopHeight::new(-1.0).get(), 0.0);
        assert_eq!(BumpDistance::new(3.0).get(), 0.9);
        assert_eq!(TurnRate::new(1000.0).get(), 60.0);
        assert_eq!(BlendRate::new(0.0).get(), 0.1);
    }

    #[test]
    fn test_from_bypasses_clamp_but_get_does_not() {
        // Values deserialized or converted straight from f32 are clamped on read
        let raw: TurnRate = 500.0_f32.into();
        assert_eq!(raw.get(), 60.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(HopHeight::new(0.5).to_string(), "0.5");
    }

    #[test]
    fn test_non_finite_values_use_defaults() {
        assert_eq!(AnimationDuration::new(f32::NAN).get(), 0.18);
        assert_eq!(HopHeight::new(f32::INFINITY).get(), 0.6);
        assert_eq!(BlendRate::new(f32::NEG_INFINITY).get(), 2.5);

        let raw: TurnRate = f32::NAN.into();
        assert_eq!(raw.get(), 14.0);
    }
}
