//! # Stress Run
//!
//! Worker threads hammer one cube with random rotations and snapshots for a
//! fixed wall-clock budget. Every snapshot is checked against a sequential
//! replay, see [`ReplayHooks`].
//!
//! ```toml
//! threads = 8
//! duration_ms = 2000
//! show_probability = 0.2
//! seed = 42
//!
//! [cube]
//! size = 4
//! ```

use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::unbounded;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tracing::{debug, info, warn};

use cube_core::{Cube, CubeConfig, CubeStats, FaceletState, ReplayHooks};

use crate::error::{CliError, CliResult};

/// Stress run parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StressConfig {
    /// Worker thread count.
    pub threads: usize,
    /// Wall-clock budget in milliseconds.
    pub duration_ms: u64,
    /// Chance that a worker's next operation is a `show()`.
    pub show_probability: f64,
    /// Base seed; worker `i` uses `seed + i`.
    pub seed: u64,
    /// The cube under test.
    pub cube: CubeConfig,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            threads: 8,
            duration_ms: 1_000,
            show_probability: 0.2,
            seed: 0,
            cube: CubeConfig::default(),
        }
    }
}

impl StressConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Config`] on malformed TOML or out-of-range values.
    pub fn from_toml_str(source: &str) -> CliResult<Self> {
        let config: Self = toml::from_str(source).map_err(|e| CliError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Config`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> CliResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Config`] for zero threads or a probability outside
    /// `0..=1`, and [`CliError::Cube`] for a bad cube section.
    pub fn validate(&self) -> CliResult<()> {
        if self.threads == 0 {
            return Err(CliError::Config("threads must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.show_probability) {
            return Err(CliError::Config(format!(
                "show_probability {} is not within 0..=1",
                self.show_probability
            )));
        }
        self.cube.validate()?;
        Ok(())
    }

    /// Wall-clock budget as a [`Duration`].
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// What one worker did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorkerSummary {
    /// Worker index.
    pub worker: usize,
    /// Completed rotations.
    pub rotations: u64,
    /// Completed snapshots.
    pub shows: u64,
    /// Snapshots that differed from the replay.
    pub mismatches: u64,
}

/// Outcome of a whole stress run.
#[derive(Clone, Debug)]
pub struct StressReport {
    /// Per-worker summaries, ordered by worker index.
    pub workers: Vec<WorkerSummary>,
    /// The cube's own counters at the end.
    pub stats: CubeStats,
    /// Final state equals the replay of every rotation.
    pub final_state_matches: bool,
    /// Final state has `size * size` facelets of every color.
    pub color_balanced: bool,
    /// Serialized final state.
    pub final_state: String,
    /// Wall-clock time spent.
    pub elapsed: Duration,
}

impl StressReport {
    /// Sum of rotations over all workers.
    #[must_use]
    pub fn rotations(&self) -> u64 {
        self.workers.iter().map(|w| w.rotations).sum()
    }

    /// Sum of snapshots over all workers.
    #[must_use]
    pub fn shows(&self) -> u64 {
        self.workers.iter().map(|w| w.shows).sum()
    }

    /// Sum of mismatched snapshots over all workers.
    #[must_use]
    pub fn mismatches(&self) -> u64 {
        self.workers.iter().map(|w| w.mismatches).sum()
    }

    /// No snapshot was torn or stale and the final state is consistent.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.mismatches() == 0 && self.final_state_matches && self.color_balanced
    }
}

/// Runs the workload described by `config`.
///
/// # Errors
///
/// Returns the first error any worker hit, or a config error.
pub fn run(config: &StressConfig) -> CliResult<StressReport> {
    config.validate()?;
    let size = config.cube.size;
    let hooks = ReplayHooks::new(size)?;
    let cube = Arc::new(Cube::with_config(config.cube.clone(), hooks)?);
    let deadline = Instant::now() + config.duration();
    let start = Instant::now();

    info!(
        threads = config.threads,
        size,
        duration_ms = config.duration_ms,
        "stress run starting"
    );

    let (tx, rx) = unbounded::<CliResult<WorkerSummary>>();
    let handles: Vec<_> = (0..config.threads)
        .map(|worker| {
            let cube = Arc::clone(&cube);
            let tx = tx.clone();
            let seed = config.seed.wrapping_add(worker as u64);
            let show_probability = config.show_probability;
            thread::spawn(move || {
                let result = run_worker(&cube, worker, seed, show_probability, deadline);
                tx.send(result).ok();
            })
        })
        .collect();
    drop(tx);

    let mut workers = Vec::with_capacity(config.threads);
    let mut first_error = None;
    for result in rx {
        match result {
            Ok(summary) => {
                debug!(?summary, "worker finished");
                workers.push(summary);
            }
            Err(e) => {
                warn!(error = %e, "worker failed");
                first_error.get_or_insert(e);
            }
        }
    }
    for handle in handles {
        if handle.join().is_err() {
            first_error.get_or_insert(CliError::Worker("thread panicked".into()));
        }
    }
    if let Some(e) = first_error {
        return Err(e);
    }
    workers.sort_by_key(|w| w.worker);

    let final_state = cube.show()?;
    let final_state_matches = final_state == cube.hooks().reference();
    let color_balanced = FaceletState::from_serialized(size, &final_state)?.is_color_balanced();

    let report = StressReport {
        workers,
        stats: cube.stats(),
        final_state_matches,
        color_balanced,
        final_state,
        elapsed: start.elapsed(),
    };
    info!(
        rotations = report.rotations(),
        shows = report.shows(),
        mismatches = report.mismatches(),
        passed = report.passed(),
        "stress run finished"
    );
    Ok(report)
}

fn run_worker(
    cube: &Cube<ReplayHooks>,
    worker: usize,
    seed: u64,
    show_probability: f64,
    deadline: Instant,
) -> CliResult<WorkerSummary> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut summary = WorkerSummary {
        worker,
        ..WorkerSummary::default()
    };

    while Instant::now() < deadline {
        if rng.gen_bool(show_probability) {
            let shown = cube.show()?;
            if !cube.hooks().verify(&shown) {
                summary.mismatches += 1;
            }
            summary.shows += 1;
        } else {
            let side = rng.gen_range(0..6);
            let layer = rng.gen_range(0..cube.size());
            cube.rotate(side, layer)?;
            summary.rotations += 1;
        }
    }
    Ok(summary)
}
