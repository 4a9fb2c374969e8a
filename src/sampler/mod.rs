//! Per-thread sampling state.
//!
//! Each traced thread owns one [`SamplerContext`]: its stack source, the
//! current and previous snapshots, and the cleaner options. Nothing is
//! shared between contexts, so sampling several threads needs no locking.
//!
//! A tick captures the stack, cleans it, compares it with the previous
//! tick's snapshot and extracts records only for the frames that changed.

use crate::frame::{extract_into, FrameRecord};
use crate::runtime::StackSource;
use crate::snapshot::Snapshot;
use crate::utils::config::{CleanerOptions, DEFAULT_STACK_CAPACITY};
use crate::utils::error::SnapshotError;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::mem;

/// Result of one sampling tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Tick number within this context, starting at 1
    pub tick: u64,

    /// Thread the stack was sampled on
    pub thread_id: u64,

    /// Cleaned stack depth
    pub depth: usize,

    /// Outer frames shared with the previous reported tick
    pub unchanged: usize,

    /// Records for the inner frames that differ, innermost first
    pub changed: Vec<FrameRecord>,
}

/// Sampling state owned by one thread
pub struct SamplerContext<S: StackSource> {
    source: S,
    current: Snapshot<S::Handle>,
    previous: Snapshot<S::Handle>,
    options: CleanerOptions,
    ticks: u64,
    skipped: u64,
}

impl<S> SamplerContext<S>
where
    S: StackSource,
    S::Handle: Default,
{
    pub fn new(source: S) -> Self {
        Self::with_capacity(source, DEFAULT_STACK_CAPACITY)
    }

    /// Create a context whose snapshots hold at most `capacity` frames
    pub fn with_capacity(source: S, capacity: usize) -> Self {
        Self {
            source,
            current: Snapshot::with_capacity(capacity),
            previous: Snapshot::with_capacity(capacity),
            options: CleanerOptions::default(),
            ticks: 0,
            skipped: 0,
        }
    }
}

impl<S: StackSource> SamplerContext<S> {
    pub fn with_options(mut self, options: CleanerOptions) -> Self {
        self.options = options;
        self
    }

    /// Capture, clean and diff one stack
    ///
    /// Returns `None` when no usable frames remain after cleaning. The
    /// previous snapshot is then kept so the next tick diffs against the
    /// last stack that was actually reported.
    pub fn tick(&mut self) -> Result<Option<TickReport>, SnapshotError> {
        self.ticks += 1;

        let captured = self.current.capture(&mut self.source);
        let depth = self.current.clean(&self.source, &self.options)?;
        let thread_id = self.source.current_thread_id();

        if depth == 0 {
            self.skipped += 1;
            debug!(
                "Thread {thread_id}: tick {} has no usable frames ({captured} captured)",
                self.ticks
            );
            return Ok(None);
        }

        let unchanged = self.current.common_suffix(&self.previous);
        let changed = self.current.frames()[..depth - unchanged]
            .iter()
            .map(|&handle| {
                let mut record = FrameRecord::default();
                extract_into(&self.source, handle, &mut record);
                record
            })
            .collect();

        trace!(
            "Thread {thread_id}: tick {} captured {captured}, cleaned {depth}, unchanged {unchanged}",
            self.ticks
        );

        mem::swap(&mut self.current, &mut self.previous);

        Ok(Some(TickReport {
            tick: self.ticks,
            thread_id,
            depth,
            unchanged,
            changed,
        }))
    }

    /// The last reported snapshot
    pub fn previous(&self) -> &Snapshot<S::Handle> {
        &self.previous
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}
