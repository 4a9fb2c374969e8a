//! In-memory host runtime backed by a recorded frame table.
//!
//! A [`Recording`] is a frame table plus an ordered list of captured
//! samples. Frame handles are indices into the table, so two samples that
//! share a [`FrameId`] share frame identity, exactly like live handles.
//!
//! Accessor values are kept as raw JSON so a recording can reproduce the
//! odd values a live runtime hands back (nil paths, non-integer lines).

use super::{FrameAccessor, HostValue, StackSource};
use crate::utils::error::RecordingError;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use std::path::Path;

/// Handle for a frame in a [`RecordedRuntime`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameId(pub u32);

/// One entry of the recorded frame table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    #[serde(default)]
    pub owner: Value,

    #[serde(default)]
    pub absolute_path: Value,

    #[serde(default)]
    pub path: Value,

    #[serde(default)]
    pub label: Value,

    #[serde(default)]
    pub line: Value,
}

impl RecordedFrame {
    /// An ordinary frame with every field readable
    pub fn new(owner: &str, path: &str, label: &str, line: i64) -> Self {
        Self {
            owner: Value::from(owner),
            absolute_path: Value::from(path),
            path: Value::from(path),
            label: Value::from(label),
            line: Value::from(line),
        }
    }

    pub fn with_owner(mut self, owner: Value) -> Self {
        self.owner = owner;
        self
    }

    pub fn with_absolute_path(mut self, absolute_path: Value) -> Self {
        self.absolute_path = absolute_path;
        self
    }

    pub fn with_path(mut self, path: Value) -> Self {
        self.path = path;
        self
    }

    pub fn with_label(mut self, label: Value) -> Self {
        self.label = label;
        self
    }

    pub fn with_line(mut self, line: Value) -> Self {
        self.line = line;
        self
    }
}

/// One captured stack, innermost frame first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedSample {
    pub thread_id: u64,
    pub stack: Vec<FrameId>,
}

/// A frame table plus the samples captured against it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    #[serde(default)]
    pub frames: Vec<RecordedFrame>,

    #[serde(default)]
    pub samples: Vec<RecordedSample>,
}

impl Recording {
    /// Parse and validate a recording from JSON text
    pub fn from_json(raw: &str) -> Result<Self, RecordingError> {
        let recording: Recording = serde_json::from_str(raw)?;
        recording.validate()?;

        debug!(
            "Loaded recording: {} frames, {} samples",
            recording.frames.len(),
            recording.samples.len()
        );

        Ok(recording)
    }

    /// Read, parse and validate a recording file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RecordingError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    /// Check that every sample only references frames in the table
    pub fn validate(&self) -> Result<(), RecordingError> {
        if self.frames.is_empty() && self.samples.iter().any(|s| !s.stack.is_empty()) {
            return Err(RecordingError::EmptyFrameTable);
        }

        for (index, sample) in self.samples.iter().enumerate() {
            if let Some(bad) = sample
                .stack
                .iter()
                .find(|id| id.0 as usize >= self.frames.len())
            {
                return Err(RecordingError::UnknownFrame {
                    sample: index,
                    frame: bad.0,
                });
            }
        }

        Ok(())
    }
}

/// Host runtime that resolves [`FrameId`]s against a recorded frame table
#[derive(Debug, Clone, Default)]
pub struct RecordedRuntime {
    frames: Vec<RecordedFrame>,
}

impl RecordedRuntime {
    pub fn new(frames: Vec<RecordedFrame>) -> Self {
        Self { frames }
    }

    pub fn from_recording(recording: &Recording) -> Self {
        Self::new(recording.frames.clone())
    }

    /// Append a frame and return its handle
    pub fn push_frame(&mut self, frame: RecordedFrame) -> FrameId {
        self.frames.push(frame);
        FrameId((self.frames.len() - 1) as u32)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// A per-thread view that replays samples through [`StackSource`]
    pub fn thread(&self, thread_id: u64) -> ThreadReplay<'_> {
        ThreadReplay {
            runtime: self,
            thread_id,
            pending: VecDeque::new(),
        }
    }

    fn field(&self, handle: FrameId, pick: impl Fn(&RecordedFrame) -> &Value) -> HostValue {
        match self.frames.get(handle.0 as usize) {
            Some(frame) => HostValue::from(pick(frame).clone()),
            None => HostValue::Nil,
        }
    }
}

/// Replays recorded samples for a single thread
#[derive(Debug, Clone)]
pub struct ThreadReplay<'r> {
    runtime: &'r RecordedRuntime,
    thread_id: u64,
    pending: VecDeque<Vec<FrameId>>,
}

impl ThreadReplay<'_> {
    /// Queue a stack to be returned by the next capture
    pub fn push_sample(&mut self, stack: Vec<FrameId>) {
        self.pending.push_back(stack);
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl FrameAccessor for RecordedRuntime {
    type Handle = FrameId;

    fn owner_name(&self, handle: FrameId) -> HostValue {
        self.field(handle, |f| &f.owner)
    }

    fn absolute_path(&self, handle: FrameId) -> HostValue {
        self.field(handle, |f| &f.absolute_path)
    }

    fn source_path(&self, handle: FrameId) -> HostValue {
        self.field(handle, |f| &f.path)
    }

    fn method_label(&self, handle: FrameId) -> HostValue {
        self.field(handle, |f| &f.label)
    }

    fn first_line_number(&self, handle: FrameId) -> HostValue {
        self.field(handle, |f| &f.line)
    }

    // No sampling thread; use `thread()` to get a view with one
    fn current_thread_id(&self) -> u64 {
        0
    }
}

impl FrameAccessor for ThreadReplay<'_> {
    type Handle = FrameId;

    fn owner_name(&self, handle: FrameId) -> HostValue {
        self.runtime.owner_name(handle)
    }

    fn absolute_path(&self, handle: FrameId) -> HostValue {
        self.runtime.absolute_path(handle)
    }

    fn source_path(&self, handle: FrameId) -> HostValue {
        self.runtime.source_path(handle)
    }

    fn method_label(&self, handle: FrameId) -> HostValue {
        self.runtime.method_label(handle)
    }

    fn first_line_number(&self, handle: FrameId) -> HostValue {
        self.runtime.first_line_number(handle)
    }

    fn current_thread_id(&self) -> u64 {
        self.thread_id
    }
}

impl StackSource for ThreadReplay<'_> {
    fn capture_stack(&mut self, buffer: &mut [FrameId]) -> usize {
        let Some(stack) = self.pending.pop_front() else {
            return 0;
        };

        // Like a live capture, a deep stack keeps only its innermost frames
        let depth = stack.len().min(buffer.len());
        if depth < stack.len() {
            warn!(
                "Thread {}: stack of {} frames truncated to {}",
                self.thread_id,
                stack.len(),
                depth
            );
        }

        buffer[..depth].copy_from_slice(&stack[..depth]);
        depth
    }
}
