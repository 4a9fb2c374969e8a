//! Outer-end comparison of two cleaned snapshots.
//!
//! Between consecutive samples a stack usually changes only at the inner
//! end, so the number of shared caller frames tells the aggregator how much
//! of the call tree can be left alone.

use crate::utils::error::SnapshotError;

/// Number of frames shared by `a[..num_a]` and `b[..num_b]` at the outer end
///
/// # Errors
/// * `SnapshotError::LengthOutOfBounds` - a length is larger than its buffer
pub fn compare<H: Eq>(a: &[H], num_a: usize, b: &[H], num_b: usize) -> Result<usize, SnapshotError> {
    for (buffer, num) in [(a, num_a), (b, num_b)] {
        if num > buffer.len() {
            return Err(SnapshotError::LengthOutOfBounds {
                len: num,
                capacity: buffer.len(),
            });
        }
    }

    Ok(common_suffix_len(&a[..num_a], &b[..num_b]))
}

/// Length of the longest common suffix of two frame slices
pub fn common_suffix_len<H: Eq>(a: &[H], b: &[H]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}
