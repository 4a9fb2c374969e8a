//! In-place cleaning of a captured stack snapshot.
//!
//! A raw capture is noisy: runtime trampolines with no line info sit at the
//! root, recursion repeats the same frame, and anonymous closures are
//! attributed differently from one sample to the next. Cleaning removes all
//! three without allocating, compacting surviving frames towards index 0
//! while keeping their relative order.
//!
//! Passes, in order:
//! 1. Trim outer frames without a usable line number
//! 2. Collapse repeated frames, keeping the outermost occurrence
//! 3. Drop block frames (and frames outside the app root, if configured)
//! 4. Trim outer frames again, since pass 3 may expose a new outermost frame

use crate::frame::is_block_label;
use crate::frame::record::resolve_file;
use crate::runtime::FrameAccessor;
use crate::utils::config::CleanerOptions;
use crate::utils::error::SnapshotError;
use log::trace;

/// Clean `buffer[..num]` in place and return the cleaned length
///
/// # Errors
/// * `SnapshotError::LengthOutOfBounds` - `num` is larger than the buffer
pub fn remove_garbage<A: FrameAccessor>(
    accessor: &A,
    buffer: &mut [A::Handle],
    num: usize,
) -> Result<usize, SnapshotError> {
    remove_garbage_with(accessor, buffer, num, &CleanerOptions::default())
}

/// [`remove_garbage`] with explicit cleaner options
pub fn remove_garbage_with<A: FrameAccessor>(
    accessor: &A,
    buffer: &mut [A::Handle],
    num: usize,
    options: &CleanerOptions,
) -> Result<usize, SnapshotError> {
    if num > buffer.len() {
        return Err(SnapshotError::LengthOutOfBounds {
            len: num,
            capacity: buffer.len(),
        });
    }

    let frames = &mut buffer[..num];

    let trimmed = trim_outer_frames(accessor, frames);
    let unique = collapse_repeats(&mut frames[..trimmed]);
    let kept = strip_unwanted(accessor, &mut frames[..unique], options);
    let cleaned = trim_outer_frames(accessor, &frames[..kept]);

    trace!("remove_garbage: {num} -> {trimmed} -> {unique} -> {kept} -> {cleaned}");

    Ok(cleaned)
}

/// Length after dropping outer frames whose line number is missing or 0
///
/// Only the outer end is trimmed: interior frames without line info are
/// legitimate and stay attributed.
pub fn trim_outer_frames<A: FrameAccessor>(accessor: &A, frames: &[A::Handle]) -> usize {
    let mut num = frames.len();
    while num > 0 && !has_line_number(accessor, frames[num - 1]) {
        num -= 1;
    }
    num
}

/// Remove repeated handles, keeping the last occurrence of each
///
/// Two cursors walk the slice: `read` visits every frame, `write` is the
/// next slot for a survivor. A frame survives only if its handle does not
/// appear again further out. Worst case is quadratic, which is fine for real
/// stack depths.
pub fn collapse_repeats<H: Copy + Eq>(frames: &mut [H]) -> usize {
    let num = frames.len();
    let mut write = 0;

    for read in 0..num {
        let handle = frames[read];
        if frames[read + 1..].contains(&handle) {
            continue;
        }
        frames[write] = handle;
        write += 1;
    }

    write
}

/// Remove block frames (and out-of-root frames) with a stable compaction
///
/// A frame whose label is unreadable is treated as a block frame.
pub fn strip_unwanted<A: FrameAccessor>(
    accessor: &A,
    frames: &mut [A::Handle],
    options: &CleanerOptions,
) -> usize {
    let mut write = 0;

    for read in 0..frames.len() {
        let handle = frames[read];
        if is_block_frame(accessor, handle) || !in_app_root(accessor, handle, options) {
            continue;
        }
        frames[write] = handle;
        write += 1;
    }

    write
}

fn has_line_number<A: FrameAccessor>(accessor: &A, handle: A::Handle) -> bool {
    matches!(accessor.first_line_number(handle).as_int(), Some(line) if line != 0)
}

fn is_block_frame<A: FrameAccessor>(accessor: &A, handle: A::Handle) -> bool {
    match accessor.method_label(handle).as_str() {
        Some(label) => is_block_label(label),
        None => true,
    }
}

fn in_app_root<A: FrameAccessor>(accessor: &A, handle: A::Handle, options: &CleanerOptions) -> bool {
    let Some(root) = options.app_root.as_deref() else {
        return true;
    };

    resolve_file(accessor, handle).is_some_and(|file| file.starts_with(root))
}
