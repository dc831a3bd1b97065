/// Progress reporting and cooperative cancellation for the clustering engine
///
/// The engine polls a `Progress` collaborator at fixed checkpoints (each
/// distance-matrix row, each construction step, each 2-opt outer pass).
/// Cancellation is advisory: it is honored at the next checkpoint, never
/// preemptively.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};

/// The stages a clustering run moves through, in order. Stage indices are
/// stable: 0 for distances, 1 for construction, 2 for refinement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClusterStage {
    Distances,
    Construction,
    Refinement,
}

impl ClusterStage {
    pub fn index(self) -> usize {
        match self {
            Self::Distances => 0,
            Self::Construction => 1,
            Self::Refinement => 2,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Distances => "Comparing sequences",
            Self::Construction => "Ordering sequences",
            Self::Refinement => "Refining order",
        }
    }
}

/// Injected progress/cancellation collaborator.
pub trait Progress {
    /// Reports how many units of the given stage have completed.
    fn report(&mut self, completed: usize, stage: ClusterStage);

    /// Polled at every checkpoint; once this returns true the engine
    /// unwinds and surfaces no ordering.
    fn is_cancelled(&self) -> bool;

    /// Whether incremental updates are wanted at all. When false, the
    /// greedy construction skips the incremental edge sort and does one
    /// conventional full sort instead.
    fn is_live(&self) -> bool {
        true
    }
}

/// Inert token for callers that want neither progress nor cancellation.
#[derive(Debug, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn report(&mut self, _completed: usize, _stage: ClusterStage) {}

    fn is_cancelled(&self) -> bool {
        false
    }

    fn is_live(&self) -> bool {
        false
    }
}

/// Terminal progress bar with a shared cancellation flag.
///
/// The bar is restyled per stage; another thread (a UI, a signal handler)
/// cancels the run by setting the flag returned from `cancel_flag`.
pub struct ConsoleProgress {
    bar: ProgressBar,
    stage: Option<ClusterStage>,
    sequence_count: u64,
    cancel: Arc<AtomicBool>,
}

impl ConsoleProgress {
    pub fn new(sequence_count: usize) -> Self {
        let bar = ProgressBar::new(sequence_count as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                .unwrap()
                .progress_chars("━━─"),
        );

        Self {
            bar,
            stage: None,
            sequence_count: sequence_count as u64,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shared flag that requests cancellation when set.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Progress for ConsoleProgress {
    fn report(&mut self, completed: usize, stage: ClusterStage) {
        if self.stage != Some(stage) {
            self.stage = Some(stage);
            self.bar.set_message(stage.display_name());
            self.bar.set_length(self.sequence_count);
            self.bar.set_position(0);
        }

        self.bar.set_position(completed as u64);
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }
}
