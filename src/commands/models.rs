use crate::utils::config::{CleanerOptions, DEFAULT_STACK_CAPACITY};
use std::path::PathBuf;

/// Arguments for the replay command
#[derive(Debug, Clone)]
pub struct ReplayArgs {
    /// Recording to replay
    pub input: PathBuf,

    /// Output path for the JSON report (optional)
    pub output_json: Option<PathBuf>,

    /// Frame slots per snapshot buffer
    pub capacity: usize,

    /// Cleaner configuration
    pub cleaner: CleanerOptions,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for ReplayArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("recording.json"),
            output_json: Some(PathBuf::from("report.json")),
            capacity: DEFAULT_STACK_CAPACITY,
            cleaner: CleanerOptions::default(),
            print_summary: false,
        }
    }
}
