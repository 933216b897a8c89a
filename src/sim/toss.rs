//! Toss simulator
//!
//! An instantaneous push sets the object's velocity, a random spin is
//! added, and friction bleeds off linear speed until the flight expires.
//! There is no collision or boundary clamping; the object is free to fly
//! off screen.

use glam::Vec2;
use rand::Rng;

use super::state::TossableObject;
use crate::consts::PUSH_REFERENCE_AREA;
use crate::settings::TossSettings;

/// Speed an instantaneous push gives the object.
///
/// A unit push moves a reference-area object at `push_velocity_scale`;
/// bigger objects are heavier and move proportionally slower.
pub fn impulse_speed(magnitude: f32, settings: &TossSettings, area: f32) -> f32 {
    let push = magnitude / settings.throwing_velocity_padding;
    push * settings.push_velocity_scale * PUSH_REFERENCE_AREA / area.max(1.0)
}

/// Draw an angular velocity uniformly from the configured integer range
pub fn draw_spin<R: Rng>(rng: &mut R, settings: &TossSettings) -> f32 {
    rng.random_range(settings.spin_min..=settings.spin_max) as f32
}

/// Launch the object: velocity is replaced, never accumulated
pub fn apply_toss(
    object: &mut TossableObject,
    direction: Vec2,
    magnitude: f32,
    spin: f32,
    settings: &TossSettings,
) {
    let heading = (direction / settings.push_direction_divisor).normalize_or_zero();
    object.vel = heading * impulse_speed(magnitude, settings, object.area());
    object.angular_vel = spin;
}

/// Advance a tossed object by `dt` seconds
pub fn integrate(object: &mut TossableObject, dt: f32, friction: f32) {
    object.pose.center += object.vel * dt;
    object.pose.rotation += object.angular_vel * dt;
    object.vel *= (-friction * dt).exp();
}
