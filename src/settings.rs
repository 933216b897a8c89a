//! Interaction tuning
//!
//! Every empirically tuned number lives here so it can be tweaked from a
//! JSON file without touching the simulation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TossError;

/// Curve used when easing the object back to its original pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Easing {
    Linear,
    #[default]
    EaseInOut,
}

impl Easing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseInOut => "ease-in-out",
        }
    }

    /// Parse a curve name as given on the command line
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "linear" => Some(Easing::Linear),
            "easeinout" | "ease-in-out" | "ease_in_out" => Some(Easing::EaseInOut),
            _ => None,
        }
    }

    /// Map linear progress in [0, 1] onto the curve
    pub fn transform(&self, fraction: f32) -> f32 {
        let t = fraction.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
        }
    }
}

/// Cubic bezier timing curve through (0,0), (x1,y1), (x2,y2), (1,1)
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, fraction: f32) -> f32 {
    if fraction <= 0.0 {
        return 0.0;
    }
    if fraction >= 1.0 {
        return 1.0;
    }

    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;

    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    let sample = |a: f32, b: f32, c: f32, t: f32| ((a * t + b) * t + c) * t;
    let slope = |a: f32, b: f32, c: f32, t: f32| (3.0 * a * t + 2.0 * b) * t + c;

    // Newton-Raphson for the parameter whose x matches the fraction
    let mut t = fraction;
    let mut converged = false;
    for _ in 0..8 {
        let x = sample(ax, bx, cx, t) - fraction;
        if x.abs() < 1e-6 {
            converged = true;
            break;
        }
        let d = slope(ax, bx, cx, t);
        if d.abs() < 1e-6 {
            break;
        }
        t = (t - x / d).clamp(0.0, 1.0);
    }

    if !converged {
        t = bisect(|t| sample(ax, bx, cx, t), fraction);
    }

    sample(ay, by, cy, t)
}

/// Binary subdivision for the parameter whose x matches the fraction.
/// x(t) is monotonic on [0, 1] for any curve with x1, x2 in [0, 1].
fn bisect(x_at: impl Fn(f32) -> f32, fraction: f32) -> f32 {
    let mut lo = 0.0;
    let mut hi = 1.0;
    let mut t = fraction;
    for _ in 0..24 {
        let delta = x_at(t) - fraction;
        if delta.abs() < 1e-6 {
            break;
        }
        if delta > 0.0 {
            hi = t;
        } else {
            lo = t;
        }
        t = 0.5 * (lo + hi);
    }
    t
}

/// Interaction tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TossSettings {
    // === Release ===
    /// Release speed (units/s) that must be exceeded to toss
    pub throwing_threshold: f32,
    /// Release speed is divided by this to get push magnitude
    pub throwing_velocity_padding: f32,

    // === Toss ===
    /// Release velocity is divided by this to get push direction
    pub push_direction_divisor: f32,
    /// Speed (units/s) a unit push gives an object of reference area
    pub push_velocity_scale: f32,
    /// Linear damping coefficient (per second)
    pub friction: f32,
    /// Inclusive spin range (rad/s)
    pub spin_min: i32,
    pub spin_max: i32,
    /// Seconds a toss flies before the object is sent home
    pub toss_duration: f32,

    // === Reset ===
    /// Seconds the ease back to the original pose takes
    pub reset_duration: f32,
    pub reset_easing: Easing,

    /// Seed for the spin RNG
    pub seed: u64,
}

impl Default for TossSettings {
    fn default() -> Self {
        Self {
            throwing_threshold: THROWING_THRESHOLD,
            throwing_velocity_padding: THROWING_VELOCITY_PADDING,

            push_direction_divisor: PUSH_DIRECTION_DIVISOR,
            push_velocity_scale: PUSH_VELOCITY_SCALE,
            friction: TOSS_FRICTION,
            spin_min: SPIN_MIN,
            spin_max: SPIN_MAX,
            toss_duration: TOSS_DURATION,

            reset_duration: RESET_DURATION,
            reset_easing: Easing::EaseInOut,

            seed: 0x5eed_7055,
        }
    }
}

impl TossSettings {
    /// Parse and validate settings from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, TossError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, TossError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file, falling back to defaults when the
    /// file does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TossError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let settings = Self::from_json(&json)?;
                log::info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("{} not found, using default settings", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TossError> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Reject tuning the simulation cannot run with
    pub fn validate(&self) -> Result<(), TossError> {
        let fail = |msg: String| Err(TossError::InvalidSettings(msg));

        if !(self.throwing_threshold >= 0.0) {
            return fail(format!(
                "throwing_threshold must be >= 0, got {}",
                self.throwing_threshold
            ));
        }
        if !(self.throwing_velocity_padding > 0.0) {
            return fail(format!(
                "throwing_velocity_padding must be > 0, got {}",
                self.throwing_velocity_padding
            ));
        }
        if !(self.push_direction_divisor > 0.0) {
            return fail(format!(
                "push_direction_divisor must be > 0, got {}",
                self.push_direction_divisor
            ));
        }
        if !(self.push_velocity_scale >= 0.0) {
            return fail(format!(
                "push_velocity_scale must be >= 0, got {}",
                self.push_velocity_scale
            ));
        }
        if !(self.friction >= 0.0) {
            return fail(format!("friction must be >= 0, got {}", self.friction));
        }
        if self.spin_min > self.spin_max {
            return fail(format!(
                "spin range {}..={} is empty",
                self.spin_min, self.spin_max
            ));
        }
        if !(self.toss_duration > 0.0) {
            return fail(format!(
                "toss_duration must be > 0, got {}",
                self.toss_duration
            ));
        }
        if !(self.reset_duration > 0.0) {
            return fail(format!(
                "reset_duration must be > 0, got {}",
                self.reset_duration
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_tuned_constants() {
        let s = TossSettings::default();
        assert_eq!(s.throwing_threshold, 1000.0);
        assert_eq!(s.throwing_velocity_padding, 35.0);
        assert_eq!(s.push_direction_divisor, 10.0);
        assert_eq!((s.spin_min, s.spin_max), (-10, 9));
        assert_eq!(s.toss_duration, 5.0);
        assert_eq!(s.reset_duration, 0.45);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s = TossSettings::from_json(r#"{ "throwing_threshold": 500.0 }"#).unwrap();
        assert_eq!(s.throwing_threshold, 500.0);
        assert_eq!(s.throwing_velocity_padding, 35.0);
        assert_eq!(s.reset_easing, Easing::EaseInOut);
    }

    #[test]
    fn test_json_rejects_bad_values() {
        let err = TossSettings::from_json(r#"{ "throwing_velocity_padding": 0.0 }"#);
        assert!(matches!(err, Err(TossError::InvalidSettings(_))));

        let err = TossSettings::from_json(r#"{ "spin_min": 5, "spin_max": 4 }"#);
        assert!(matches!(err, Err(TossError::InvalidSettings(_))));

        let err = TossSettings::from_json("not json");
        assert!(matches!(err, Err(TossError::Json(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let mut s = TossSettings::default();
        s.reset_easing = Easing::Linear;
        s.seed = 42;
        let back = TossSettings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("dynamic-toss-no-such-settings.json");
        let s = TossSettings::load(&path).unwrap();
        assert_eq!(s, TossSettings::default());
    }

    #[test]
    fn test_easing_endpoints_and_symmetry() {
        for easing in [Easing::Linear, Easing::EaseInOut] {
            assert_eq!(easing.transform(0.0), 0.0);
            assert_eq!(easing.transform(1.0), 1.0);
            assert_eq!(easing.transform(2.0), 1.0);
        }
        let mid = Easing::EaseInOut.transform(0.5);
        assert!((mid - 0.5).abs() < 1e-3);
        // Slow start
        assert!(Easing::EaseInOut.transform(0.1) < 0.1);
    }

    #[test]
    fn test_easing_from_str() {
        assert_eq!(Easing::from_str("linear"), Some(Easing::Linear));
        assert_eq!(Easing::from_str("Ease-In-Out"), Some(Easing::EaseInOut));
        assert_eq!(Easing::from_str("bounce"), None);
        for easing in [Easing::Linear, Easing::EaseInOut] {
            assert_eq!(Easing::from_str(easing.as_str()), Some(easing));
        }
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!(
            "dynamic-toss-settings-{}.json",
            std::process::id()
        ));
        let s = TossSettings {
            friction: 0.5,
            reset_easing: Easing::Linear,
            seed: 7,
            ..TossSettings::default()
        };
        s.save(&path).unwrap();
        let loaded = TossSettings::load(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.unwrap(), s);
    }

    #[test]
    fn test_bezier_solves_flat_slope_curve() {
        // Control points mirrored on the diagonal make y(t) == x(t), so the
        // output must reproduce the input. x'(0.5) == 0 on this curve.
        for i in 0..=100 {
            let f = i as f32 / 100.0;
            let y = cubic_bezier(1.0, 1.0, 0.0, 0.0, f);
            assert!((y - f).abs() < 1e-4, "fraction {f} gave {y}");
        }
    }

    #[test]
    fn test_bisect_finds_parameter() {
        let t = bisect(|t| t * t, 0.25);
        assert!((t - 0.5).abs() < 1e-5);
    }
}
