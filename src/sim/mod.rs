//! Deterministic simulation module
//!
//! All chain logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Injected randomness only
//! - Stable iteration order (furthest member first)
//! - No rendering, input or platform dependencies

pub mod collision;
pub mod path;
pub mod pool;
pub mod random;
pub mod state;
pub mod tick;

pub use collision::{Advance, Obstacle, find_legal_advance, resolve_advance};
pub use path::{CatmullRomPath, PathMode, PathSampler, catmull_rom, sample_checked};
pub use pool::{BallId, BallPool, InstancePool};
pub use random::{RandomSource, RngState, ScriptedRandom};
pub use state::{ChainMember, Rgb, SpawnParams};
pub use tick::{ChainSimulator, TickReport};
