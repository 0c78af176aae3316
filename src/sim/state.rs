//! Chain members and spawn parameters
//!
//! Everything a host needs to persist or render a member lives here.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::random::RandomSource;
use crate::settings::SimSettings;

/// 8-bit color channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pack as 0xRRGGBB
    pub fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

#[inline]
fn unit_to_channel(t: f32) -> u8 {
    (t * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Randomized properties assigned to a member when it spawns
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnParams {
    pub radius: f32,
    pub speed: f32,
    pub color: Rgb,
}

impl SpawnParams {
    /// Draw radius, color, then speed from `rng`
    pub fn draw<R: RandomSource + ?Sized>(settings: &SimSettings, rng: &mut R) -> Self {
        let radius = settings.radius.lerp(rng.uniform());
        let color = Rgb::new(
            unit_to_channel(rng.uniform()),
            unit_to_channel(rng.uniform()),
            unit_to_channel(rng.uniform()),
        );
        let speed = settings.speed.lerp(rng.uniform());
        Self { radius, speed, color }
    }
}

/// One ball on the path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainMember<H> {
    /// Pool handle, returned to the pool on eviction or removal
    pub handle: H,
    /// Collision radius
    pub radius: f32,
    /// Path fraction per second
    pub speed: f32,
    pub color: Rgb,
    /// Fraction of the path travelled, in [0, 1) while on the chain
    pub progress: f32,
    /// Last committed path position
    pub position: Vec3,
}

impl<H> ChainMember<H> {
    /// New member at the start of the path
    pub fn new(handle: H, params: SpawnParams, start: Vec3) -> Self {
        Self {
            handle,
            radius: params.radius,
            speed: params.speed,
            color: params.color,
            progress: 0.0,
            position: start,
        }
    }

    /// Unconstrained advance for a timestep
    #[inline]
    pub fn naive_advance(&self, dt: f32) -> f32 {
        dt * self.speed
    }

    /// Minimum center distance to another member
    #[inline]
    pub fn min_distance(&self, other: &ChainMember<H>) -> f32 {
        self.radius + other.radius
    }

    /// Reached the end of the path
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.progress >= 1.0
    }
}
