//! Progress reporting.
//!
//! This module provides [`ProgressCallback`] for monitoring a reflow run and
//! [`ProgressInfo`] for the snapshots it receives.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use subreflow::{ProgressCallback, ProgressInfo, ReflowOptions};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         if let Some(pct) = info.percentage {
//!             println!("[{:?}] {pct:.1}% complete", info.stage);
//!         }
//!     }
//! }
//!
//! let options = ReflowOptions::new().with_progress(Arc::new(PrintProgress));
//! ```

use std::time::{Duration, Instant};

/// The pipeline stage currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Stage {
    /// Rebuilding sentences from source blocks.
    Segmentation,
    /// Waiting on the translation provider.
    Translation,
    /// Reflowing translated words into target blocks.
    Placement,
}

/// A snapshot of reflow progress.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// What is being done.
    pub stage: Stage,
    /// How many items (blocks or sentences) have been processed so far.
    pub current: u64,
    /// Total items expected, if known.
    pub total: Option<u64>,
    /// Completion percentage (0.0 to 100.0), if `total` is known.
    pub percentage: Option<f32>,
    /// Wall-clock time since the stage started.
    pub elapsed: Duration,
}

/// Trait for receiving progress updates during a reflow run.
///
/// Callbacks observe only; they cannot halt the run.
pub trait ProgressCallback: Send + Sync {
    /// Called as each stage advances.
    fn on_progress(&self, info: &ProgressInfo);
}

/// Discards all progress notifications. The default.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Tracks one stage and builds [`ProgressInfo`] snapshots for it.
pub(crate) struct ProgressTracker<'a> {
    callback: &'a dyn ProgressCallback,
    stage: Stage,
    total: Option<u64>,
    current: u64,
    started: Instant,
}

impl<'a> ProgressTracker<'a> {
    pub(crate) fn new(callback: &'a dyn ProgressCallback, stage: Stage, total: Option<u64>) -> Self {
        Self {
            callback,
            stage,
            total,
            current: 0,
            started: Instant::now(),
        }
    }

    /// Record `count` more processed items and notify.
    pub(crate) fn advance(&mut self, count: u64) {
        self.current += count;
        self.report();
    }

    /// Notify with the current count unchanged.
    pub(crate) fn report(&self) {
        let percentage = self.total.map(|total| {
            if total == 0 {
                100.0
            } else {
                (self.current as f32 / total as f32 * 100.0).min(100.0)
            }
        });
        self.callback.on_progress(&ProgressInfo {
            stage: self.stage,
            current: self.current,
            total: self.total,
            percentage,
            elapsed: self.started.elapsed(),
        });
    }
}
