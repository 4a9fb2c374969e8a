//! Configuration and constants for snapshot processing.

/// Method label prefix the host runtime uses for anonymous closures
pub const BLOCK_MARKER: &str = "block ";

/// Default number of frame slots reserved per snapshot buffer
pub const DEFAULT_STACK_CAPACITY: usize = 2048;

/// Current replay report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Options for the snapshot cleaner
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanerOptions {
    /// Only keep frames whose file path starts with this prefix
    pub app_root: Option<String>,
}

impl CleanerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_app_root(mut self, app_root: impl Into<String>) -> Self {
        let app_root = app_root.into();
        // An empty root would match every path anyway
        self.app_root = if app_root.is_empty() { None } else { Some(app_root) };
        self
    }
}
