//! Reset animator
//!
//! Eases the object from wherever it ended up back to its original pose.

use serde::{Deserialize, Serialize};

use super::state::Pose;
use crate::normalize_angle;
use crate::settings::Easing;

/// An in-flight ease back to the original pose
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetAnimation {
    from: Pose,
    to: Pose,
    /// Rotation travelled, taking the short way round
    rotation_delta: f32,
    elapsed: f32,
    duration: f32,
    easing: Easing,
}

impl ResetAnimation {
    pub fn new(from: Pose, to: Pose, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            rotation_delta: normalize_angle(to.rotation - from.rotation),
            elapsed: 0.0,
            duration,
            easing,
        }
    }

    /// Linear progress through the animation in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Pose at the current point of the animation. The final pose is the
    /// target itself, not an interpolated approximation.
    pub fn pose(&self) -> Pose {
        if self.is_finished() {
            return self.to;
        }

        let t = self.easing.transform(self.progress());
        Pose {
            center: self.from.center.lerp(self.to.center, t),
            size: self.from.size.lerp(self.to.size, t),
            rotation: self.from.rotation + self.rotation_delta * t,
        }
    }

    /// Advance by `dt` seconds and return the new pose
    pub fn step(&mut self, dt: f32) -> Pose {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration.max(0.0));
        self.pose()
    }

    /// Remaining distance between the animated center and its target
    pub fn remaining_distance(&self) -> f32 {
        self.pose().center.distance(self.to.center)
    }
}
