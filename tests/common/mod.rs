#![allow(dead_code)]

/// Shared fixtures for integration tests: synthetic populations and
/// scriptable progress collaborators.
use rand::prelude::*;
use tracing_subscriber::EnvFilter;

use haplosort::progress::{ClusterStage, Progress};
use haplosort::{Haplosome, MutationTable};

/// Routes the engine's tracing output to the test harness; set `RUST_LOG`
/// to see it. Safe to call from every test, later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Builds a random sample of `count` haplosomes over `site_count`
/// mutation sites spread across a chromosome of `site_count * 10` bases.
/// Each haplosome carries each mutation with probability `density`.
pub fn random_population(
    count: usize,
    site_count: usize,
    density: f64,
    seed: u64,
) -> (Vec<Haplosome>, MutationTable) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut table = MutationTable::new();
    let ids: Vec<_> = (0..site_count)
        .map(|s| table.push(s as i64 * 10, rng.gen_bool(0.5)))
        .collect();

    let run_width = (site_count as i64 * 10).max(1);
    let haplosomes = (0..count)
        .map(|_| {
            let carried = ids
                .iter()
                .copied()
                .filter(|_| rng.gen_bool(density))
                .collect();
            Haplosome::single_run(carried, run_width)
        })
        .collect();

    (haplosomes, table)
}

/// Four haplosomes forming an obvious chain: each neighbor pair differs
/// at one site, so the ideal ordering is 0-1-2-3 (or its reverse).
pub fn chain_population() -> (Vec<Haplosome>, MutationTable) {
    let mut table = MutationTable::new();
    let a = table.push(10, true);
    let b = table.push(20, true);
    let c = table.push(30, true);

    let haplosomes = vec![
        Haplosome::single_run(vec![], 100),
        Haplosome::single_run(vec![a], 100),
        Haplosome::single_run(vec![a, b], 100),
        Haplosome::single_run(vec![a, b, c], 100),
    ];

    (haplosomes, table)
}

/// Records every report and never cancels.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    pub reports: Vec<(usize, ClusterStage)>,
}

impl Progress for RecordingProgress {
    fn report(&mut self, completed: usize, stage: ClusterStage) {
        self.reports.push((completed, stage));
    }

    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Flips to cancelled after the nth report within a chosen stage.
#[derive(Debug)]
pub struct CancelAt {
    stage: ClusterStage,
    after: usize,
    seen: usize,
    cancelled: bool,
}

impl CancelAt {
    pub fn new(stage: ClusterStage, after: usize) -> Self {
        Self {
            stage,
            after,
            seen: 0,
            cancelled: false,
        }
    }
}

impl Progress for CancelAt {
    fn report(&mut self, _completed: usize, stage: ClusterStage) {
        if stage == self.stage {
            self.seen += 1;
            if self.seen >= self.after {
                self.cancelled = true;
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}
