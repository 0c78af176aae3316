//! Error types
//!
//! Backpressure outcomes (an empty pool, a member that cannot move) are not
//! errors; they show up in [`crate::sim::TickReport`]. Only precondition
//! violations and broken collaborator contracts end up here.

use std::fmt;

/// Simulation precondition or contract failure
#[derive(Debug, Clone, PartialEq)]
pub enum ChainError {
    /// `remove_at` was given an index outside the chain
    InvalidIndex { index: usize, len: usize },
    /// `tick` was given a negative or non-finite timestep
    InvalidTimestep(f32),
    /// The path sampler produced a NaN or infinite point
    NonFinitePoint { fraction: f32 },
    /// A spline needs at least two control points
    InsufficientControlPoints(usize),
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainError::InvalidIndex { index, len } => {
                write!(f, "chain index {} out of range (len {})", index, len)
            }
            ChainError::InvalidTimestep(dt) => write!(f, "invalid timestep: {}", dt),
            ChainError::NonFinitePoint { fraction } => {
                write!(f, "path sampler returned a non-finite point at fraction {}", fraction)
            }
            ChainError::InsufficientControlPoints(n) => {
                write!(f, "path needs at least 2 control points, got {}", n)
            }
        }
    }
}

impl std::error::Error for ChainError {}

/// Settings loading errors
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "IO error: {}", e),
            SettingsError::Parse(e) => write!(f, "JSON parse error: {}", e),
            SettingsError::Invalid(msg) => write!(f, "invalid settings: {}", msg),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Parse(e) => Some(e),
            SettingsError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(err: std::io::Error) -> Self {
        SettingsError::Io(err)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        SettingsError::Parse(err)
    }
}
