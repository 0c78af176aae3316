//! Path sampling
//!
//! A path maps a progress fraction to a point in space. Fraction 0 is the
//! spawn end, fraction 1 is the exit. The simulation only ever asks for
//! non-negative fractions derived from member progress.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ChainError;

/// Maps a path fraction to a point on a continuous curve
///
/// Implementations must be deterministic for the duration of a run: the same
/// fraction always yields the same point.
pub trait PathSampler {
    fn sample(&self, fraction: f32) -> Vec3;
}

impl<F> PathSampler for F
where
    F: Fn(f32) -> Vec3,
{
    #[inline]
    fn sample(&self, fraction: f32) -> Vec3 {
        self(fraction)
    }
}

/// Sample a point and reject NaN/infinite results
pub fn sample_checked<S: PathSampler + ?Sized>(sampler: &S, fraction: f32) -> Result<Vec3, ChainError> {
    let point = sampler.sample(fraction);
    if point.is_finite() {
        Ok(point)
    } else {
        log::warn!("Path sampler returned {:?} at fraction {}", point, fraction);
        Err(ChainError::NonFinitePoint { fraction })
    }
}

/// How fractions outside [0, 1] are mapped onto the curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PathMode {
    /// Clamp to the end points
    #[default]
    Clamp,
    /// Wrap around; the last control point connects back to the first
    Loop,
}

/// Uniform Catmull-Rom spline through a list of control points
///
/// Always holds at least two knots.
#[derive(Debug, Clone)]
pub struct CatmullRomPath {
    knots: Vec<Vec3>,
    mode: PathMode,
}

impl CatmullRomPath {
    pub fn new(control_points: &[Vec3], mode: PathMode) -> Result<Self, ChainError> {
        let mut path = Self {
            knots: Vec::new(),
            mode,
        };
        path.rebuild(control_points)?;
        Ok(path)
    }

    /// Replace the control points, e.g. after they were moved in an editor
    ///
    /// On error the previous curve is kept.
    pub fn rebuild(&mut self, control_points: &[Vec3]) -> Result<(), ChainError> {
        if control_points.len() < 2 {
            return Err(ChainError::InsufficientControlPoints(control_points.len()));
        }
        if let Some(i) = control_points.iter().position(|p| !p.is_finite()) {
            log::warn!("Rejecting control point {} ({:?})", i, control_points[i]);
            return Err(ChainError::NonFinitePoint {
                fraction: i as f32 / (control_points.len() - 1) as f32,
            });
        }
        self.knots.clear();
        self.knots.extend_from_slice(control_points);
        log::debug!("Rebuilt path with {} control points ({:?})", self.knots.len(), self.mode);
        Ok(())
    }

    pub fn mode(&self) -> PathMode {
        self.mode
    }

    pub fn control_points(&self) -> &[Vec3] {
        &self.knots
    }

    /// Number of curve segments
    pub fn segment_count(&self) -> usize {
        match self.mode {
            PathMode::Clamp => self.knots.len() - 1,
            PathMode::Loop => self.knots.len(),
        }
    }

    /// Knot at `i`, clamped or wrapped per mode
    fn knot(&self, i: isize) -> Vec3 {
        let n = self.knots.len() as isize;
        let idx = match self.mode {
            PathMode::Clamp => i.clamp(0, n - 1),
            PathMode::Loop => i.rem_euclid(n),
        };
        self.knots[idx as usize]
    }

    /// Approximate arc length by summing `samples` chords
    pub fn approximate_length(&self, samples: usize) -> f32 {
        let samples = samples.max(1);
        let mut prev = self.sample(0.0);
        let mut length = 0.0;
        for i in 1..=samples {
            let p = self.sample(i as f32 / samples as f32);
            length += (p - prev).length();
            prev = p;
        }
        length
    }
}

impl PathSampler for CatmullRomPath {
    fn sample(&self, fraction: f32) -> Vec3 {
        let segments = self.segment_count();
        let t = match self.mode {
            PathMode::Clamp => fraction.clamp(0.0, 1.0),
            PathMode::Loop => fraction.rem_euclid(1.0),
        };

        let scaled = t * segments as f32;
        // t == 1 lands on the end of the last segment, not past it
        let index = (scaled.floor() as usize).min(segments - 1);
        let local = scaled - index as f32;

        let i = index as isize;
        catmull_rom(
            self.knot(i - 1),
            self.knot(i),
            self.knot(i + 1),
            self.knot(i + 2),
            local,
        )
    }
}

/// Uniform Catmull-Rom interpolation between `p1` and `p2`
#[inline]
pub fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * (2.0 * p1
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
}
