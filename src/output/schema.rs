//! Replay report schema.
//!
//! This module defines the structure of JSON files we write to disk.
//! Schema is versioned to allow future evolution.

use crate::sampler::TickReport;
use serde::{Deserialize, Serialize};

/// Top-level report written by the replay command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Recording the report was built from
    pub source: String,

    /// Totals across all threads
    pub summary: ReplaySummary,

    /// One entry per reported tick, in recorded order
    pub ticks: Vec<TickReport>,

    /// Timestamp when the report was generated
    pub generated_at: String,
}

/// Totals for a replay run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplaySummary {
    /// Samples replayed
    pub samples: u64,

    /// Samples with no usable frames after cleaning
    pub skipped: u64,

    /// Distinct threads seen
    pub threads: usize,

    /// Sum of cleaned stack depths
    pub total_frames: u64,

    /// Frames shared with the previous tick of the same thread
    pub reused_frames: u64,
}

impl ReplaySummary {
    /// Add one reported tick to the totals
    pub fn record(&mut self, tick: &TickReport) {
        self.total_frames += tick.depth as u64;
        self.reused_frames += tick.unchanged as u64;
    }

    /// Percentage of frames that did not need re-extraction
    pub fn reuse_percentage(&self) -> f64 {
        if self.total_frames == 0 {
            0.0
        } else {
            (self.reused_frames as f64 / self.total_frames as f64) * 100.0
        }
    }

    /// Get human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "Samples: {} | Skipped: {} | Threads: {} | Frames: {} | Reused: {} ({:.1}%)",
            self.samples,
            self.skipped,
            self.threads,
            self.total_frames,
            self.reused_frames,
            self.reuse_percentage()
        )
    }
}
