//! Chain simulation tick
//!
//! Advances every member along the path, keeps adjacent members apart,
//! evicts members that reach the end and spawns new ones on a timer.

use glam::Vec3;

use super::collision::{Obstacle, resolve_advance};
use super::path::{CatmullRomPath, PathSampler, sample_checked};
use super::pool::InstancePool;
use super::random::RandomSource;
use super::state::{ChainMember, SpawnParams};
use crate::consts::MAX_SPAWNS_PER_TICK;
use crate::error::ChainError;
use crate::settings::{PredecessorView, SimSettings};

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Times the spawn timer fired
    pub spawn_attempts: u32,
    /// Members added at the spawn end
    pub spawned: u32,
    /// Attempts deferred because the pool was empty or the head slot was taken
    pub spawn_deferred: u32,
    /// Members removed after reaching the end of the path
    pub evicted: u32,
    /// Members that found no legal advance and stayed put
    pub stalled: u32,
}

impl TickReport {
    /// Add another report's counts into this one
    pub fn merge(&mut self, other: TickReport) {
        self.spawn_attempts += other.spawn_attempts;
        self.spawned += other.spawned;
        self.spawn_deferred += other.spawn_deferred;
        self.evicted += other.evicted;
        self.stalled += other.stalled;
    }
}

/// Ordered chain of balls following a path
///
/// `members()[0]` is the furthest along; new members are appended at the end
/// with progress 0.
pub struct ChainSimulator<S, P, R, H> {
    path: S,
    pool: P,
    rng: R,
    settings: SimSettings,
    members: Vec<ChainMember<H>>,
    spawn_timer: f32,
    /// Progress snapshot reused across ticks
    start_progress: Vec<f32>,
    /// Eviction flags reused across ticks
    finished: Vec<bool>,
    time_ticks: u64,
}

impl<S, P, R, H> ChainSimulator<S, P, R, H>
where
    S: PathSampler,
    P: InstancePool<H>,
    R: RandomSource,
{
    pub fn new(path: S, pool: P, rng: R, settings: SimSettings) -> Self {
        Self {
            path,
            pool,
            rng,
            settings,
            members: Vec::new(),
            spawn_timer: 0.0,
            start_progress: Vec::new(),
            finished: Vec::new(),
            time_ticks: 0,
        }
    }

    pub fn members(&self) -> &[ChainMember<H>] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn path(&self) -> &S {
        &self.path
    }

    pub fn pool(&self) -> &P {
        &self.pool
    }

    pub fn settings(&self) -> &SimSettings {
        &self.settings
    }

    /// Seconds accumulated toward the next spawn
    pub fn spawn_timer(&self) -> f32 {
        self.spawn_timer
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Advance the chain by `dt` seconds
    ///
    /// On `NonFinitePoint` the members advanced before the failure keep their
    /// new progress and finished ones are still evicted; the spawn timer is
    /// left untouched.
    pub fn tick(&mut self, dt: f32) -> Result<TickReport, ChainError> {
        if !(dt.is_finite() && dt >= 0.0) {
            return Err(ChainError::InvalidTimestep(dt));
        }
        self.time_ticks += 1;

        // Finished members are evicted even when a later member failed to sample
        let advanced = self.advance_members(dt);
        let evicted = self.evict_finished();
        let mut report = advanced?;
        report.merge(evicted);
        report.merge(self.run_spawn_timer(dt)?);
        Ok(report)
    }

    /// Move each member, resolving overlaps against its predecessor
    fn advance_members(&mut self, dt: f32) -> Result<TickReport, ChainError> {
        let mut report = TickReport::default();
        let steps = self.settings.bisection_steps;

        self.start_progress.clear();
        self.start_progress.extend(self.members.iter().map(|m| m.progress));
        self.finished.clear();
        self.finished.resize(self.members.len(), false);

        for i in 0..self.members.len() {
            let obstacle = match i.checked_sub(1) {
                Some(prev) => {
                    let pred_progress = match self.settings.predecessor_view {
                        PredecessorView::TickStart => self.start_progress[prev],
                        PredecessorView::Live => self.members[prev].progress,
                    };
                    // A predecessor still at the start of the path does not block
                    if pred_progress > 0.0 {
                        Some(Obstacle {
                            position: sample_checked(&self.path, pred_progress)?,
                            min_distance: self.members[i].min_distance(&self.members[prev]),
                        })
                    } else {
                        None
                    }
                }
                None => None,
            };

            let member = &self.members[i];
            let naive = member.naive_advance(dt);
            let advance = resolve_advance(&self.path, member.progress, naive, obstacle, steps)?;

            let Some(amount) = advance.amount() else {
                log::trace!("Member {} blocked at progress {:.4}", i, member.progress);
                report.stalled += 1;
                continue;
            };

            let member = &mut self.members[i];
            member.progress += amount;
            if member.is_finished() {
                self.finished[i] = true;
            } else {
                member.position = sample_checked(&self.path, member.progress)?;
            }
        }

        Ok(report)
    }

    /// Drop members that reached the end of the path, in one pass
    fn evict_finished(&mut self) -> TickReport {
        let mut report = TickReport::default();
        if !self.finished.iter().any(|&f| f) {
            return report;
        }

        let members = std::mem::take(&mut self.members);
        for (member, finished) in members.into_iter().zip(self.finished.iter().copied()) {
            if finished {
                report.evicted += 1;
                self.pool.release(member.handle);
            } else {
                self.members.push(member);
            }
        }
        log::debug!("Evicted {} member(s), {} remain", report.evicted, self.members.len());
        report
    }

    /// Accumulate time and spawn once per elapsed interval
    ///
    /// The elapsed interval count is taken in one step so a huge `dt` cannot
    /// stall the loop. After the first deferral nothing can change within the
    /// tick, so the remaining attempts are counted as deferred directly.
    fn run_spawn_timer(&mut self, dt: f32) -> Result<TickReport, ChainError> {
        let mut report = TickReport::default();
        let interval = self.settings.spawn_interval;

        self.spawn_timer += dt;
        if self.spawn_timer < interval {
            return Ok(report);
        }
        // Keep the remainder so frame drops catch up
        let remainder = self.spawn_timer.rem_euclid(interval);
        let elapsed = ((self.spawn_timer - remainder) / interval).round();
        self.spawn_timer = remainder;

        // Float-to-int casts saturate
        report.spawn_attempts = (elapsed as u32).max(1);
        while report.spawned < report.spawn_attempts.min(MAX_SPAWNS_PER_TICK) {
            if !self.try_spawn()? {
                break;
            }
            report.spawned += 1;
        }
        report.spawn_deferred = report.spawn_attempts - report.spawned;
        if report.spawn_deferred > 1 {
            log::debug!("Deferred {} spawn attempt(s) this tick", report.spawn_deferred);
        }
        Ok(report)
    }

    /// Append a new member at the start of the path
    fn try_spawn(&mut self) -> Result<bool, ChainError> {
        if self.settings.require_free_head && self.members.last().is_some_and(|m| m.progress <= 0.0) {
            log::trace!("Spawn deferred: head slot occupied");
            return Ok(false);
        }

        let Some(handle) = self.pool.acquire() else {
            log::trace!("Spawn deferred: pool exhausted");
            return Ok(false);
        };

        let start = match sample_checked(&self.path, 0.0) {
            Ok(p) => p,
            Err(e) => {
                self.pool.release(handle);
                return Err(e);
            }
        };
        let params = SpawnParams::draw(&self.settings, &mut self.rng);
        log::debug!(
            "Spawned member #{} (radius {:.1}, speed {:.3})",
            self.members.len(),
            params.radius,
            params.speed
        );
        self.members.push(ChainMember::new(handle, params, start));
        Ok(true)
    }

    /// Remove the member at `index` and recycle its instance
    ///
    /// Removing a member only loosens spacing constraints, so nothing is
    /// re-validated until the next tick.
    pub fn remove_at(&mut self, index: usize) -> Result<(), ChainError> {
        if index >= self.members.len() {
            return Err(ChainError::InvalidIndex {
                index,
                len: self.members.len(),
            });
        }
        let member = self.members.remove(index);
        log::debug!("Removed member {} at progress {:.4}", index, member.progress);
        self.pool.release(member.handle);
        Ok(())
    }

    /// Remove a uniformly chosen member, returning its former index
    pub fn remove_random(&mut self) -> Option<usize> {
        if self.members.is_empty() {
            return None;
        }
        let len = self.members.len();
        let index = ((self.rng.uniform() * len as f32) as usize).min(len - 1);
        self.remove_at(index).ok().map(|_| index)
    }

    /// Return every member to the pool and reset the spawn timer
    pub fn clear(&mut self) {
        for member in self.members.drain(..) {
            self.pool.release(member.handle);
        }
        self.spawn_timer = 0.0;
    }

    /// Insert a member directly, keeping the chain ordered by progress
    ///
    /// Used to restore a saved chain or set up scenarios. The position is
    /// recomputed from the path.
    pub fn insert_member(&mut self, mut member: ChainMember<H>) -> Result<usize, ChainError> {
        member.position = sample_checked(&self.path, member.progress)?;
        let index = self
            .members
            .iter()
            .position(|m| m.progress < member.progress)
            .unwrap_or(self.members.len());
        self.members.insert(index, member);
        Ok(index)
    }
}

impl<P, R, H> ChainSimulator<CatmullRomPath, P, R, H>
where
    P: InstancePool<H>,
    R: RandomSource,
{
    /// Rebuild the spline from new control points and refresh positions
    ///
    /// On error the old curve and positions are kept.
    pub fn rebuild_path(&mut self, control_points: &[Vec3]) -> Result<(), ChainError> {
        self.path.rebuild(control_points)?;
        for member in &mut self.members {
            member.position = self.path.sample(member.progress);
        }
        Ok(())
    }
}
