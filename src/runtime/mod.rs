//! Boundary with the host runtime.
//!
//! The profiler never looks inside a frame handle. It compares handles for
//! identity and asks the runtime to resolve them through [`FrameAccessor`].
//! Capturing the stack itself is delegated to a [`StackSource`].

pub mod recorded;

use std::fmt::Debug;

pub use recorded::{FrameId, RecordedFrame, RecordedRuntime, RecordedSample, Recording, ThreadReplay};

/// Opaque, identity-comparable token for one captured stack frame
pub trait FrameHandle: Copy + Eq + Debug {}

impl<T: Copy + Eq + Debug> FrameHandle for T {}

/// Dynamically typed value returned by the runtime's frame accessors
///
/// Accessors may hand back nil, a string, an integer, or something else
/// entirely. Only the variant a field expects is ever used.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum HostValue {
    #[default]
    Nil,
    Str(String),
    Int(i64),
    /// Any other runtime type, kept only by name
    Other(String),
}

impl HostValue {
    /// The string payload, if this value is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            HostValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The integer payload, if this value is an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            HostValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, HostValue::Nil)
    }
}

impl From<serde_json::Value> for HostValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => HostValue::Nil,
            Value::String(s) => HostValue::Str(s),
            Value::Number(n) => match n.as_i64() {
                Some(i) => HostValue::Int(i),
                None => HostValue::Other("float".to_string()),
            },
            Value::Bool(_) => HostValue::Other("bool".to_string()),
            Value::Array(_) => HostValue::Other("array".to_string()),
            Value::Object(_) => HostValue::Other("object".to_string()),
        }
    }
}

impl From<&str> for HostValue {
    fn from(value: &str) -> Self {
        HostValue::Str(value.to_string())
    }
}

impl From<i64> for HostValue {
    fn from(value: i64) -> Self {
        HostValue::Int(value)
    }
}

/// Per-handle metadata accessors provided by the host runtime
///
/// Every accessor is total: a field the runtime cannot provide comes back
/// as [`HostValue::Nil`] (or some non-matching variant), never as an error.
pub trait FrameAccessor {
    type Handle: FrameHandle;

    /// Owning class or module path
    fn owner_name(&self, handle: Self::Handle) -> HostValue;

    /// Absolute file path of the frame's source
    fn absolute_path(&self, handle: Self::Handle) -> HostValue;

    /// Source path as loaded, used when no absolute path exists
    fn source_path(&self, handle: Self::Handle) -> HostValue;

    /// Method label; anonymous closures carry the block marker prefix
    fn method_label(&self, handle: Self::Handle) -> HostValue;

    /// First line number of the frame's code
    fn first_line_number(&self, handle: Self::Handle) -> HostValue;

    /// Identifier of the thread doing the sampling
    fn current_thread_id(&self) -> u64;
}

/// Stack capture primitive provided by the host runtime
pub trait StackSource: FrameAccessor {
    /// Fill `buffer` with the current call stack, innermost frame first.
    ///
    /// Returns the number of frames written, never more than `buffer.len()`.
    fn capture_stack(&mut self, buffer: &mut [Self::Handle]) -> usize;
}
