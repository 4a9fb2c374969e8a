//! Stack snapshots: capture buffers, cleaning and diffing.
//!
//! A [`Snapshot`] is a fixed-capacity buffer of frame handles plus the
//! logical length of the stack it currently holds (innermost frame at
//! index 0). Sampler threads keep two of them and reuse both every tick.

pub mod cleaner;
pub mod differ;

use crate::runtime::{FrameAccessor, FrameHandle, StackSource};
use crate::utils::config::CleanerOptions;
use crate::utils::error::SnapshotError;

// Re-export main functions
pub use cleaner::{collapse_repeats, remove_garbage, remove_garbage_with, strip_unwanted, trim_outer_frames};
pub use differ::{common_suffix_len, compare};

/// Reusable buffer holding one captured stack
#[derive(Debug, Clone)]
pub struct Snapshot<H> {
    slots: Vec<H>,
    len: usize,
}

impl<H: FrameHandle + Default> Snapshot<H> {
    /// Allocate a snapshot able to hold `capacity` frames
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![H::default(); capacity],
            len: 0,
        }
    }
}

impl<H: FrameHandle> Snapshot<H> {
    /// Build a snapshot from already captured frames
    pub fn from_frames(frames: Vec<H>) -> Self {
        let len = frames.len();
        Self { slots: frames, len }
    }

    /// Fill the buffer from the runtime, replacing the previous contents
    pub fn capture<S: StackSource<Handle = H>>(&mut self, source: &mut S) -> usize {
        // A misbehaving source cannot push the length past the buffer
        self.len = source.capture_stack(&mut self.slots).min(self.slots.len());
        self.len
    }

    /// Clean the held stack in place and return the new length
    pub fn clean<A: FrameAccessor<Handle = H>>(
        &mut self,
        accessor: &A,
        options: &CleanerOptions,
    ) -> Result<usize, SnapshotError> {
        self.len = remove_garbage_with(accessor, &mut self.slots, self.len, options)?;
        Ok(self.len)
    }

    /// Frames shared with `other` at the outer end
    pub fn common_suffix(&self, other: &Snapshot<H>) -> usize {
        common_suffix_len(self.frames(), other.frames())
    }

    /// The held frames, innermost first
    pub fn frames(&self) -> &[H] {
        &self.slots[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{FrameId, RecordedFrame, RecordedRuntime};

    #[test]
    fn test_capture_clean_and_compare() {
        let mut runtime = RecordedRuntime::default();
        let main = runtime.push_frame(RecordedFrame::new("App", "/app.rb", "main", 1));
        let work = runtime.push_frame(RecordedFrame::new("App", "/app.rb", "work", 5));
        let block = runtime.push_frame(RecordedFrame::new("App", "/app.rb", "block in work", 6));

        let mut thread = runtime.thread(1);
        thread.push_sample(vec![block, work, work, main]);
        thread.push_sample(vec![main]);

        let mut first = Snapshot::<FrameId>::with_capacity(8);
        assert_eq!(first.capture(&mut thread), 4);
        assert_eq!(first.clean(&thread, &CleanerOptions::default()).unwrap(), 2);
        assert_eq!(first.frames(), &[work, main]);

        let mut second = Snapshot::with_capacity(8);
        second.capture(&mut thread);
        second.clean(&thread, &CleanerOptions::default()).unwrap();

        assert_eq!(first.common_suffix(&second), 1);
        assert_eq!(second.common_suffix(&first), 1);
    }

    #[test]
    fn test_from_frames_and_clear() {
        let mut snapshot = Snapshot::from_frames(vec![FrameId(1), FrameId(2)]);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.capacity(), 2);

        snapshot.clear();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.capacity(), 2);
    }
}
