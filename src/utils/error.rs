//! Error types for the entire crate.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Caller contract violations on snapshot buffers
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("Snapshot length {len} exceeds buffer capacity {capacity}")]
    LengthOutOfBounds { len: usize, capacity: usize },
}

/// Errors that can occur while loading a recorded runtime
#[derive(Error, Debug)]
pub enum RecordingError {
    #[error("Failed to read recording: {0}")]
    ReadFailed(#[from] std::io::Error),

    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Sample {sample} references unknown frame {frame}")]
    UnknownFrame { sample: usize, frame: u32 },

    #[error("Recording has samples but no frames")]
    EmptyFrameTable,
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_error_display() {
        let err = SnapshotError::LengthOutOfBounds { len: 12, capacity: 8 };
        assert_eq!(err.to_string(), "Snapshot length 12 exceeds buffer capacity 8");
    }

    #[test]
    fn test_unknown_frame_display() {
        let err = RecordingError::UnknownFrame { sample: 3, frame: 99 };
        assert_eq!(err.to_string(), "Sample 3 references unknown frame 99");
    }
}
