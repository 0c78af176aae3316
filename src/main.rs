//! Ball Chain entry point
//!
//! Runs the chain headless on a spiral path with a fixed-timestep loop and
//! logs what happens. Pass a JSON settings file as the first argument to
//! override the defaults; `RUST_LOG` controls verbosity.

use std::process::ExitCode;

use glam::Vec3;

use ball_chain::consts::*;
use ball_chain::sim::{BallId, BallPool, CatmullRomPath, ChainSimulator, PathMode, RngState, TickReport};
use ball_chain::{ChainError, SimSettings};

/// Simulated seconds to run
const RUN_SECONDS: f32 = 60.0;
/// Render frame length fed into the accumulator (slightly uneven on purpose)
const FRAME_TIMES: [f32; 4] = [1.0 / 60.0, 1.0 / 55.0, 1.0 / 70.0, 1.0 / 30.0];
const SEED: u64 = 0x5eed;

type Sim = ChainSimulator<CatmullRomPath, BallPool, rand_pcg::Pcg32, BallId>;

/// Inward spiral control points in the XY plane
fn spiral_control_points(turns: f32, outer: f32, inner: f32, count: usize) -> Vec<Vec3> {
    let count = count.max(2);
    (0..count)
        .map(|i| {
            let t = i as f32 / (count - 1) as f32;
            let angle = t * turns * std::f32::consts::TAU;
            let r = outer + (inner - outer) * t;
            Vec3::new(r * angle.cos(), r * angle.sin(), 0.0)
        })
        .collect()
}

/// Fixed-step driver
struct Game {
    sim: Sim,
    accumulator: f32,
    totals: TickReport,
    peak_len: usize,
}

impl Game {
    fn new(settings: SimSettings) -> Result<Self, ChainError> {
        let path = CatmullRomPath::new(&spiral_control_points(2.5, 600.0, 150.0, 40), PathMode::Clamp)?;
        log::info!("Spiral path length ~{:.0} units", path.approximate_length(512));

        let pool = match settings.pool_capacity {
            Some(cap) => BallPool::with_capacity(cap),
            None => BallPool::new(),
        };
        Ok(Self {
            sim: ChainSimulator::new(path, pool, RngState::new(SEED).to_rng(), settings),
            accumulator: 0.0,
            totals: TickReport::default(),
            peak_len: 0,
        })
    }

    /// Run simulation ticks for one frame
    fn update(&mut self, dt: f32) -> Result<(), ChainError> {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let report = self.sim.tick(SIM_DT)?;
            self.accumulator -= SIM_DT;
            substeps += 1;

            self.totals.merge(report);
        }
        self.peak_len = self.peak_len.max(self.sim.len());
        Ok(())
    }
}

fn run(settings: SimSettings) -> Result<(), ChainError> {
    let mut game = Game::new(settings)?;

    let mut elapsed = 0.0;
    let mut frame = 0usize;
    let mut next_report = 5.0;
    while elapsed < RUN_SECONDS {
        let dt = FRAME_TIMES[frame % FRAME_TIMES.len()];
        game.update(dt)?;
        elapsed += dt;
        frame += 1;

        // Pop a ball every ~7 seconds, like a player tapping the chain
        if frame % 420 == 0 {
            let colors: Vec<u32> = game.sim.members().iter().map(|m| m.color.to_u32()).collect();
            if let Some(index) = game.sim.remove_random() {
                log::info!("Popped ball at index {} (color #{:06x})", index, colors[index]);
            }
        }

        if elapsed >= next_report {
            let lead = game.sim.members().first().map(|m| m.progress).unwrap_or(0.0);
            log::info!(
                "t={:>5.1}s chain={:>2} lead={:.3} pool(live={}, idle={})",
                elapsed,
                game.sim.len(),
                lead,
                game.sim.pool().live(),
                game.sim.pool().idle()
            );
            next_report += 5.0;
        }
    }

    let t = game.totals;
    log::info!(
        "Done after {} ticks: spawned={} deferred={} evicted={} stalled={} peak chain={}",
        game.sim.time_ticks(),
        t.spawned,
        t.spawn_deferred,
        t.evicted,
        t.stalled,
        game.peak_len
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Ball Chain (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => match SimSettings::load(&path) {
            Ok(s) => s,
            Err(e) => {
                log::error!("Failed to load settings from {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            log::info!("Using default settings");
            SimSettings::default()
        }
    };

    match run(settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Simulation aborted: {}", e);
            ExitCode::FAILURE
        }
    }
}
