//! Dynamic Toss - drag an object around, fling it away, watch it come home
//!
//! Core modules:
//! - `sim`: Deterministic interaction core (attachment, release, toss, reset)
//! - `settings`: Data-driven tuning loaded from JSON
//! - `error`: Crate error type

pub mod error;
pub mod settings;
pub mod sim;

pub use error::TossError;
pub use settings::{Easing, TossSettings};
pub use sim::{
    ControllerEvent, Decision, GestureEvent, Phase, Pose, Snapshot, TossController,
    TossableObject,
};

use glam::Vec2;

/// Interaction configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth motion)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death; covers a
    /// full `MAX_FRAME_DT` so clamped frames still keep wall-clock time
    pub const MAX_SUBSTEPS: u32 = 12;
    /// Longest frame delta accepted by the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Release speed (units/s) a drag must exceed to become a toss
    pub const THROWING_THRESHOLD: f32 = 1000.0;
    /// Divides release speed into push magnitude (tuned by trial and error)
    pub const THROWING_VELOCITY_PADDING: f32 = 35.0;
    /// Divides release velocity into push direction
    pub const PUSH_DIRECTION_DIVISOR: f32 = 10.0;
    /// Speed (units/s) gained from a unit push on a reference-area object
    pub const PUSH_VELOCITY_SCALE: f32 = 100.0;
    /// Area of the object a unit push is calibrated against (100 x 100)
    pub const PUSH_REFERENCE_AREA: f32 = 100.0 * 100.0;

    /// Linear damping coefficient while tossing
    pub const TOSS_FRICTION: f32 = 0.2;
    /// Inclusive spin range (rad/s) drawn on toss
    pub const SPIN_MIN: i32 = -10;
    pub const SPIN_MAX: i32 = 9;

    /// Time a toss flies before the object is sent home (seconds)
    pub const TOSS_DURATION: f32 = 5.0;
    /// Duration of the ease back to the original pose (seconds)
    pub const RESET_DURATION: f32 = 0.45;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    if !angle.is_finite() {
        return 0.0;
    }
    // Long spins can wind up hundreds of turns; fold before the loop
    angle %= TAU;
    while angle >= PI {
        angle -= TAU;
    }
    while angle < -PI {
        angle += TAU;
    }
    angle
}

/// Rotate a vector counter-clockwise by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(2.5 * PI) - PI / 2.0).abs() < 1e-4);
        assert!((normalize_angle(-1.5 * PI) - PI / 2.0).abs() < 1e-4);
        assert!((normalize_angle(-0.5) - (-0.5)).abs() < 1e-6);
        assert!(normalize_angle(45.0).abs() <= PI);
        assert_eq!(normalize_angle(f32::NAN), 0.0);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let v = rotate(Vec2::new(1.0, 0.0), PI / 2.0);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }
}
