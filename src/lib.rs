//! Ball Chain - balls rolling along a curved path without overlapping
//!
//! Core modules:
//! - `sim`: Deterministic simulation (path sampling, collision resolution, spawning)
//! - `settings`: Data-driven spawn and solver tuning
//! - `error`: Precondition and contract failures

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{ChainError, SettingsError};
pub use settings::{PredecessorView, Range, SimSettings};

use glam::Vec3;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the demo loop (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Seconds between spawn attempts
    pub const SPAWN_INTERVAL: f32 = 0.5;
    /// Most members one tick may spawn; further elapsed intervals are deferred
    pub const MAX_SPAWNS_PER_TICK: u32 = 64;

    /// Iteration budget for the legal-advance search
    pub const BISECTION_STEPS: u32 = 10;

    /// Ball radius range
    pub const BALL_RADIUS_MIN: f32 = 10.0;
    pub const BALL_RADIUS_MAX: f32 = 30.0;

    /// Ball speed range (path fraction per second)
    pub const BALL_SPEED_MIN: f32 = 0.1;
    pub const BALL_SPEED_MAX: f32 = 0.3;
}

/// Euclidean distance between two path points
#[inline]
pub fn distance(a: Vec3, b: Vec3) -> f32 {
    (a - b).length()
}
