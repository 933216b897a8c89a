//! Release evaluator
//!
//! Decides from the pointer velocity at release whether the object gets
//! tossed or goes straight back home.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Outcome of releasing a drag
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Decision {
    /// Launch the object along `direction` (unit vector) with release
    /// speed `magnitude` (units/s)
    Toss { direction: Vec2, magnitude: f32 },
    /// Animate back to the original pose
    SnapBack,
}

impl Decision {
    pub fn is_toss(&self) -> bool {
        matches!(self, Decision::Toss { .. })
    }
}

/// Classify a release velocity against the throwing threshold.
///
/// The comparison is strict: a release exactly at the threshold snaps back.
pub fn evaluate_release(velocity: Vec2, threshold: f32) -> Decision {
    let magnitude = velocity.x.hypot(velocity.y);

    if magnitude > threshold {
        // Scale down before normalizing so huge components cannot overflow
        let largest = velocity.abs().max_element();
        Decision::Toss {
            direction: (velocity / largest).normalize(),
            magnitude,
        }
    } else {
        Decision::SnapBack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_exclusive() {
        assert_eq!(
            evaluate_release(Vec2::new(1000.0, 0.0), 1000.0),
            Decision::SnapBack
        );
        // 600-800-1000 triangle lands exactly on the threshold
        assert_eq!(
            evaluate_release(Vec2::new(-600.0, 800.0), 1000.0),
            Decision::SnapBack
        );
    }

    #[test]
    fn test_fast_release_tosses() {
        let decision = evaluate_release(Vec2::new(2000.0, 0.0), 1000.0);
        match decision {
            Decision::Toss {
                direction,
                magnitude,
            } => {
                assert_eq!(direction, Vec2::new(1.0, 0.0));
                assert_eq!(magnitude, 2000.0);
            }
            Decision::SnapBack => panic!("expected toss"),
        }
    }

    #[test]
    fn test_just_over_threshold_tosses() {
        assert!(evaluate_release(Vec2::new(0.0, -1000.5), 1000.0).is_toss());
    }

    #[test]
    fn test_zero_velocity_snaps_back() {
        assert_eq!(evaluate_release(Vec2::ZERO, 1000.0), Decision::SnapBack);
    }

    #[test]
    fn test_huge_velocity_keeps_direction() {
        let decision = evaluate_release(Vec2::new(3e19, -4e19), 1000.0);
        match decision {
            Decision::Toss {
                direction,
                magnitude,
            } => {
                assert!((magnitude - 5e19).abs() / 5e19 < 1e-6);
                assert!((direction - Vec2::new(0.6, -0.8)).length() < 1e-6);
            }
            Decision::SnapBack => panic!("expected toss"),
        }

        // Past f32::MAX the magnitude saturates but the heading survives
        let decision = evaluate_release(Vec2::new(f32::MAX, f32::MAX), 1000.0);
        let Decision::Toss { direction, .. } = decision else {
            panic!("expected toss");
        };
        assert!((direction.length() - 1.0).abs() < 1e-6);
        assert!(direction.x > 0.0 && direction.y > 0.0);
    }
}
