//! Frame record extraction.
//!
//! Extraction is total: any field the runtime cannot provide is left at its
//! default instead of failing the sample.

use crate::runtime::{FrameAccessor, HostValue};
use crate::utils::config::BLOCK_MARKER;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized metadata for one surviving frame
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Owner (class/module) prefixed with the sampling thread id
    pub owner: String,

    /// Source file, absolute when the runtime knows it
    pub file: String,

    /// Method label
    pub method: String,

    /// First line number, 0 when unreadable
    pub line: i64,

    /// Whether the label marks an anonymous closure
    pub is_block: bool,
}

impl FrameRecord {
    /// Clear every field so the record can be refilled
    pub fn reset(&mut self) {
        self.owner.clear();
        self.file.clear();
        self.method.clear();
        self.line = 0;
        self.is_block = false;
    }
}

impl fmt::Display for FrameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.line, self.file, self.owner, self.method)
    }
}

/// Whether a method label denotes a block frame
pub fn is_block_label(label: &str) -> bool {
    label.starts_with(BLOCK_MARKER)
}

/// Extract a fresh record for `handle`
pub fn extract<A: FrameAccessor>(accessor: &A, handle: A::Handle) -> FrameRecord {
    let mut record = FrameRecord::default();
    extract_into(accessor, handle, &mut record);
    record
}

/// Fill `record` with metadata for `handle`, reusing its allocations.
///
/// Returns `true` when the frame is an ordinary frame and `false` when it is
/// a block frame, so callers can use it as a quick filter.
pub fn extract_into<A: FrameAccessor>(
    accessor: &A,
    handle: A::Handle,
    record: &mut FrameRecord,
) -> bool {
    record.reset();

    // The thread prefix is always present, even without an owner
    record.owner.push_str(&accessor.current_thread_id().to_string());
    if let HostValue::Str(owner) = accessor.owner_name(handle) {
        record.owner.push(' ');
        record.owner.push_str(&owner);
    }

    if let Some(file) = resolve_file(accessor, handle) {
        record.file = file;
    }

    if let HostValue::Str(method) = accessor.method_label(handle) {
        record.method = method;
    }

    if let Some(line) = accessor.first_line_number(handle).as_int() {
        record.line = line;
    }

    record.is_block = is_block_label(&record.method);
    !record.is_block
}

/// Absolute path if the runtime has one, else the source path
pub(crate) fn resolve_file<A: FrameAccessor>(accessor: &A, handle: A::Handle) -> Option<String> {
    match accessor.absolute_path(handle) {
        HostValue::Str(path) => Some(path),
        _ => accessor.source_path(handle).as_str().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{RecordedFrame, RecordedRuntime};
    use serde_json::{json, Value};

    #[test]
    fn test_extract_full_record() {
        let mut runtime = RecordedRuntime::default();
        let id = runtime.push_frame(RecordedFrame::new("Foo::Bar", "/app/bar.rb", "call", 42));

        let record = extract(&runtime.thread(17), id);

        assert_eq!(record.owner, "17 Foo::Bar");
        assert_eq!(record.file, "/app/bar.rb");
        assert_eq!(record.method, "call");
        assert_eq!(record.line, 42);
        assert!(!record.is_block);
    }

    #[test]
    fn test_missing_owner_keeps_thread_prefix() {
        let mut runtime = RecordedRuntime::default();
        let id = runtime.push_frame(RecordedFrame::new("x", "/x.rb", "run", 1).with_owner(Value::Null));

        let record = extract(&runtime.thread(5), id);
        assert_eq!(record.owner, "5");
    }

    #[test]
    fn test_file_falls_back_to_source_path() {
        let mut runtime = RecordedRuntime::default();
        let id = runtime.push_frame(
            RecordedFrame::new("Foo", "lib/foo.rb", "foo", 3).with_absolute_path(Value::Null),
        );
        let not_a_string = runtime.push_frame(
            RecordedFrame::new("Foo", "lib/foo.rb", "foo", 3).with_absolute_path(json!(12)),
        );

        let thread = runtime.thread(1);
        assert_eq!(extract(&thread, id).file, "lib/foo.rb");
        assert_eq!(extract(&thread, not_a_string).file, "lib/foo.rb");
    }

    #[test]
    fn test_non_integer_line_defaults_to_zero() {
        let mut runtime = RecordedRuntime::default();
        let text = runtime.push_frame(RecordedFrame::new("A", "/a.rb", "a", 1).with_line(json!("9")));
        let float = runtime.push_frame(RecordedFrame::new("A", "/a.rb", "a", 1).with_line(json!(9.5)));

        let thread = runtime.thread(1);
        assert_eq!(extract(&thread, text).line, 0);
        assert_eq!(extract(&thread, float).line, 0);
    }

    #[test]
    fn test_block_classification() {
        let mut runtime = RecordedRuntime::default();
        let block = runtime.push_frame(RecordedFrame::new("A", "/a.rb", "block in foo", 4));
        let blockish = runtime.push_frame(RecordedFrame::new("A", "/a.rb", "blocked_io", 4));

        let thread = runtime.thread(1);
        let mut record = FrameRecord::default();

        assert!(!extract_into(&thread, block, &mut record));
        assert!(record.is_block);

        assert!(extract_into(&thread, blockish, &mut record));
        assert!(!record.is_block);
        assert_eq!(record.method, "blocked_io");
    }

    #[test]
    fn test_nothing_readable_degrades_to_defaults() {
        let mut runtime = RecordedRuntime::default();
        let id = runtime.push_frame(RecordedFrame::default());

        let record = extract(&runtime.thread(2), id);
        assert_eq!(
            record,
            FrameRecord {
                owner: "2".to_string(),
                ..FrameRecord::default()
            }
        );
    }

    #[test]
    fn test_extract_into_clears_previous_values() {
        let mut runtime = RecordedRuntime::default();
        let full = runtime.push_frame(RecordedFrame::new("A", "/a.rb", "a", 8));
        let empty = runtime.push_frame(RecordedFrame::default());

        let thread = runtime.thread(1);
        let mut record = FrameRecord::default();
        extract_into(&thread, full, &mut record);
        extract_into(&thread, empty, &mut record);

        assert_eq!(record.file, "");
        assert_eq!(record.line, 0);
        assert_eq!(record.owner, "1");
    }

    #[test]
    fn test_display_format() {
        let record = FrameRecord {
            owner: "1 Foo".to_string(),
            file: "/foo.rb".to_string(),
            method: "bar".to_string(),
            line: 12,
            is_block: false,
        };
        assert_eq!(record.to_string(), "12 /foo.rb 1 Foo bar");
    }
}
