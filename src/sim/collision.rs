//! Overlap detection and legal-advance search along the path
//!
//! Distance to the predecessor as a function of progress has no closed-form
//! inverse on an arbitrary curve, so the largest legal advance is found by
//! bisection with a fixed iteration budget.

use glam::Vec3;

use super::path::{PathSampler, sample_checked};
use crate::distance;
use crate::error::ChainError;

/// Outcome of resolving one member's advance against its predecessor
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advance {
    /// The naive advance is legal
    Free(f32),
    /// The naive advance overlapped; this is the largest legal one found
    Resolved(f32),
    /// No legal advance within the search budget; the member waits
    Blocked,
}

impl Advance {
    /// Progress delta to apply, if any
    pub fn amount(self) -> Option<f32> {
        match self {
            Advance::Free(a) | Advance::Resolved(a) => Some(a),
            Advance::Blocked => None,
        }
    }
}

/// Predecessor a member must keep its distance from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub position: Vec3,
    /// Sum of both radii
    pub min_distance: f32,
}

/// Check a naive advance and fall back to the bisection search if it overlaps
pub fn resolve_advance<S: PathSampler + ?Sized>(
    sampler: &S,
    progress: f32,
    naive_advance: f32,
    obstacle: Option<Obstacle>,
    steps: u32,
) -> Result<Advance, ChainError> {
    let Some(obstacle) = obstacle else {
        return Ok(Advance::Free(naive_advance));
    };

    let next = sample_checked(sampler, progress + naive_advance)?;
    if distance(next, obstacle.position) >= obstacle.min_distance {
        return Ok(Advance::Free(naive_advance));
    }

    let found = find_legal_advance(
        sampler,
        progress,
        naive_advance,
        obstacle.min_distance,
        obstacle.position,
        steps,
    )?;
    Ok(match found {
        Some(advance) => Advance::Resolved(advance),
        None => Advance::Blocked,
    })
}

/// Largest `advance <= max_advance` keeping `sample(progress + advance)` at
/// least `min_distance` from `obstacle`
///
/// `max_advance` is expected to overlap. Each step halves the search window,
/// so the answer is within `max_advance / 2^steps` of the true supremum.
/// Returns `None` if every probed candidate overlaps.
pub fn find_legal_advance<S: PathSampler + ?Sized>(
    sampler: &S,
    progress: f32,
    max_advance: f32,
    min_distance: f32,
    obstacle: Vec3,
    steps: u32,
) -> Result<Option<f32>, ChainError> {
    let mut delta = max_advance;
    let mut step = delta / 2.0;
    let mut sign = -1.0;
    let mut best = None;

    for _ in 0..steps {
        let candidate = delta + sign * step;
        let point = sample_checked(sampler, progress + candidate)?;
        delta = candidate;
        if distance(point, obstacle) < min_distance {
            sign = -1.0;
        } else {
            best = Some(delta);
            sign = 1.0;
        }
        step /= 2.0;
    }

    Ok(best)
}
