//! Object state and core interaction types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::rotate;

/// Current phase of the interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Resting, waiting for a drag
    Idle,
    /// Object follows the pointer
    Dragging,
    /// Object flies under impulse, spin and friction
    Tossing,
    /// Object eases back to its original pose
    Resetting,
}

/// Placement of the object on screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Center of the object
    pub center: Vec2,
    /// Width and height
    pub size: Vec2,
    /// Rotation about the center (radians, counter-clockwise)
    pub rotation: f32,
}

impl Pose {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            size,
            rotation: 0.0,
        }
    }

    /// Whether two poses agree within `tolerance` on every component
    pub fn approx_eq(&self, other: &Pose, tolerance: f32) -> bool {
        self.center.abs_diff_eq(other.center, tolerance)
            && self.size.abs_diff_eq(other.size, tolerance)
            && (self.rotation - other.rotation).abs() <= tolerance
    }
}

/// The single object the user drags and tosses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TossableObject {
    pub pose: Pose,
    /// Linear velocity (units/s); only meaningful while tossing
    pub vel: Vec2,
    /// Angular velocity (rad/s); only meaningful while tossing
    pub angular_vel: f32,
}

impl TossableObject {
    pub fn new(pose: Pose) -> Self {
        Self {
            pose,
            vel: Vec2::ZERO,
            angular_vel: 0.0,
        }
    }

    /// Zero both velocities (position is being driven directly)
    pub fn halt(&mut self) {
        self.vel = Vec2::ZERO;
        self.angular_vel = 0.0;
    }

    /// Area of the object's bounds
    pub fn area(&self) -> f32 {
        self.pose.size.x * self.pose.size.y
    }

    /// Convert a screen point into object-local coordinates, relative to
    /// the object's center and undoing its rotation
    pub fn to_local(&self, point: Vec2) -> Vec2 {
        rotate(point - self.pose.center, -self.pose.rotation)
    }

    /// Convert an object-local offset back into a screen point
    pub fn to_screen(&self, local: Vec2) -> Vec2 {
        self.pose.center + rotate(local, self.pose.rotation)
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_local_round_trip_with_rotation() {
        let mut object = TossableObject::new(Pose::new(Vec2::new(100.0, 100.0), Vec2::splat(50.0)));
        object.pose.rotation = FRAC_PI_2;

        let point = Vec2::new(110.0, 105.0);
        let local = object.to_local(point);
        // Quarter turn maps screen +x onto local -y
        assert!((local - Vec2::new(5.0, -10.0)).length() < 1e-4);
        assert!((object.to_screen(local) - point).length() < 1e-4);
    }

    #[test]
    fn test_halt_clears_motion() {
        let mut object = TossableObject::new(Pose::new(Vec2::ZERO, Vec2::ONE));
        object.vel = Vec2::new(3.0, 4.0);
        object.angular_vel = 2.0;
        object.halt();
        assert_eq!(object.vel, Vec2::ZERO);
        assert_eq!(object.angular_vel, 0.0);
    }

    #[test]
    fn test_rng_state_is_reproducible() {
        use rand::Rng;
        let mut a = RngState::new(7).to_rng();
        let mut b = RngState::new(7).to_rng();
        for _ in 0..16 {
            assert_eq!(a.random_range(0..20), b.random_range(0..20));
        }
    }
}
