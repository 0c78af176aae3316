//! Simulation settings
//!
//! Data-driven tuning for spawning and collision resolution. Loaded from JSON
//! by the host; every field falls back to the defaults in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;

/// Which predecessor progress a member is checked against during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PredecessorView {
    /// Progress the predecessor had when the tick started
    #[default]
    TickStart,
    /// Progress the predecessor has after its own advance in this tick
    Live,
}

impl PredecessorView {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredecessorView::TickStart => "TickStart",
            PredecessorView::Live => "Live",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "tickstart" | "tick_start" | "stale" => Some(PredecessorView::TickStart),
            "live" => Some(PredecessorView::Live),
            _ => None,
        }
    }
}

/// Inclusive-exclusive range `[min, max)` sampled with a unit random value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Map `t` in [0, 1) onto the range
    #[inline]
    pub fn lerp(&self, t: f32) -> f32 {
        self.min + (self.max - self.min) * t
    }
}

/// Simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    /// Seconds between spawn attempts
    pub spawn_interval: f32,
    /// Ball radius range for new members
    pub radius: Range,
    /// Path fraction per second for new members
    pub speed: Range,
    /// Fixed iteration budget of the legal-advance search
    pub bisection_steps: u32,
    /// Maximum live instances (`None` = unbounded)
    pub pool_capacity: Option<usize>,
    /// Predecessor progress used for overlap checks
    pub predecessor_view: PredecessorView,
    /// Defer spawning while the newest member still sits at progress 0
    pub require_free_head: bool,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            spawn_interval: SPAWN_INTERVAL,
            radius: Range::new(BALL_RADIUS_MIN, BALL_RADIUS_MAX),
            speed: Range::new(BALL_SPEED_MIN, BALL_SPEED_MAX),
            bisection_steps: BISECTION_STEPS,
            pool_capacity: None,
            predecessor_view: PredecessorView::TickStart,
            require_free_head: true,
        }
    }
}

impl SimSettings {
    /// Parse settings from a JSON string and validate them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.spawn_interval.is_finite() && self.spawn_interval > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "spawn_interval must be positive, got {}",
                self.spawn_interval
            )));
        }
        for (name, range) in [("radius", self.radius), ("speed", self.speed)] {
            if !(range.min.is_finite() && range.max.is_finite())
                || range.min < 0.0
                || range.min > range.max
            {
                return Err(SettingsError::Invalid(format!(
                    "{} range must satisfy 0 <= min <= max, got [{}, {})",
                    name, range.min, range.max
                )));
            }
        }
        if self.bisection_steps == 0 {
            return Err(SettingsError::Invalid("bisection_steps must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let settings = SimSettings::default();
        assert_eq!(settings.spawn_interval, SPAWN_INTERVAL);
        assert_eq!(settings.bisection_steps, 10);
        assert_eq!(settings.radius, Range::new(10.0, 30.0));
        assert_eq!(settings.speed, Range::new(0.1, 0.3));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = SimSettings::from_json(r#"{ "spawn_interval": 0.25, "predecessor_view": "Live" }"#)
            .unwrap();
        assert_eq!(settings.spawn_interval, 0.25);
        assert_eq!(settings.predecessor_view, PredecessorView::Live);
        assert_eq!(settings.bisection_steps, BISECTION_STEPS);
        assert!(settings.require_free_head);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut settings = SimSettings::default();
        settings.pool_capacity = Some(12);
        let json = settings.to_json().unwrap();
        let loaded = SimSettings::from_json(&json).unwrap();
        assert_eq!(loaded.pool_capacity, Some(12));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let err = SimSettings::from_json(r#"{ "spawn_interval": 0.0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));

        let err = SimSettings::from_json(r#"{ "radius": { "min": 30.0, "max": 10.0 } }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));

        let err = SimSettings::from_json(r#"{ "bisection_steps": 0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn test_predecessor_view_from_str() {
        assert_eq!(PredecessorView::from_str("live"), Some(PredecessorView::Live));
        assert_eq!(PredecessorView::from_str("Stale"), Some(PredecessorView::TickStart));
        assert_eq!(PredecessorView::from_str("sideways"), None);
        assert_eq!(PredecessorView::TickStart.as_str(), "TickStart");
    }

    #[test]
    fn test_range_lerp() {
        let range = Range::new(10.0, 30.0);
        assert_eq!(range.lerp(0.0), 10.0);
        assert!((range.lerp(0.5) - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_load_missing_file() {
        let err = SimSettings::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
