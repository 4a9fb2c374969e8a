//! Replay command implementation.
//!
//! The replay command:
//! 1. Loads a recording (frame table + samples)
//! 2. Runs one sampler context per recorded thread, in recorded order
//! 3. Builds the report and totals
//! 4. Writes output files

use super::models::ReplayArgs;
use crate::output::{write_report, ReplayReport, ReplaySummary};
use crate::runtime::{RecordedRuntime, Recording, ThreadReplay};
use crate::sampler::SamplerContext;
use crate::utils::config::{CleanerOptions, SCHEMA_VERSION};
use crate::utils::error::SnapshotError;
use anyhow::{Context, Result};
use log::{debug, info};
use std::collections::BTreeMap;
use std::time::Instant;

/// Largest snapshot buffer the CLI will allocate
const MAX_CAPACITY: usize = 1 << 16;

/// Execute the replay command
///
/// # Errors
/// * Recording read or validation failures
/// * Report write failures
pub fn execute_replay(args: &ReplayArgs) -> Result<ReplayReport> {
    let start_time = Instant::now();

    info!("Starting replay of: {}", args.input.display());

    info!("Step 1/3: Loading recording...");
    let recording = Recording::load(&args.input)
        .with_context(|| format!("Failed to load recording {}", args.input.display()))?;

    info!("Step 2/3: Replaying {} samples...", recording.samples.len());
    let report = build_report(
        &recording,
        &args.input.display().to_string(),
        &args.cleaner,
        args.capacity,
    )
    .context("Failed to replay samples")?;

    info!("Replay: {}", report.summary.summary());

    if let Some(path) = &args.output_json {
        info!("Step 3/3: Writing report...");
        write_report(&report, path).context("Failed to write report JSON")?;
        info!("✓ Report written to: {}", path.display());
    } else {
        info!("Step 3/3: Skipping report file (not requested)");
    }

    if args.print_summary {
        print_summary(&report);
    }

    info!("Replay completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(report)
}

/// Replay every sample of `recording` and collect the tick reports
pub fn build_report(
    recording: &Recording,
    source: &str,
    options: &CleanerOptions,
    capacity: usize,
) -> Result<ReplayReport, SnapshotError> {
    let runtime = RecordedRuntime::from_recording(recording);
    let mut contexts: BTreeMap<u64, SamplerContext<ThreadReplay<'_>>> = BTreeMap::new();
    let mut summary = ReplaySummary::default();
    let mut ticks = Vec::new();

    for sample in &recording.samples {
        let context = contexts.entry(sample.thread_id).or_insert_with(|| {
            debug!("New sampler context for thread {}", sample.thread_id);
            SamplerContext::with_capacity(runtime.thread(sample.thread_id), capacity)
                .with_options(options.clone())
        });

        context.source_mut().push_sample(sample.stack.clone());
        summary.samples += 1;

        match context.tick()? {
            Some(tick) => {
                summary.record(&tick);
                ticks.push(tick);
            }
            None => summary.skipped += 1,
        }
    }

    summary.threads = contexts.len();

    Ok(ReplayReport {
        version: SCHEMA_VERSION.to_string(),
        source: source.to_string(),
        summary,
        ticks,
        generated_at: chrono::Utc::now().to_rfc3339(),
    })
}

/// Validate replay arguments
pub fn validate_args(args: &ReplayArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input recording path cannot be empty");
    }

    if args.capacity == 0 {
        anyhow::bail!("capacity must be greater than 0");
    }

    if args.capacity > MAX_CAPACITY {
        anyhow::bail!("capacity is too large (max {})", MAX_CAPACITY);
    }

    Ok(())
}

fn print_summary(report: &ReplayReport) {
    println!("\n{}", "=".repeat(80));
    println!("REPLAY SUMMARY");
    println!("{}", "=".repeat(80));
    println!("Recording:    {}", report.source);
    println!("Samples:      {}", report.summary.samples);
    println!("Skipped:      {}", report.summary.skipped);
    println!("Threads:      {}", report.summary.threads);
    println!("Frames:       {}", report.summary.total_frames);
    println!(
        "Reused:       {} ({:.1}%)",
        report.summary.reused_frames,
        report.summary.reuse_percentage()
    );

    for tick in report.ticks.iter().take(5) {
        println!(
            "\n[thread {} tick {}] depth {}, {} unchanged",
            tick.thread_id, tick.tick, tick.depth, tick.unchanged
        );
        for record in &tick.changed {
            println!("  {record}");
        }
    }
    println!("{}", "=".repeat(80));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{FrameId, RecordedFrame, RecordedSample};
    use std::path::PathBuf;

    fn recording() -> Recording {
        Recording {
            frames: vec![
                RecordedFrame::new("App", "/app/main.rb", "main", 1),
                RecordedFrame::new("App", "/app/worker.rb", "work", 10),
                RecordedFrame::new("App", "/app/worker.rb", "block in work", 11),
                RecordedFrame::new("VM", "", "<top>", 0),
            ],
            samples: vec![
                RecordedSample { thread_id: 1, stack: vec![FrameId(1), FrameId(0)] },
                RecordedSample { thread_id: 2, stack: vec![FrameId(0)] },
                RecordedSample { thread_id: 1, stack: vec![FrameId(2), FrameId(1), FrameId(0)] },
                RecordedSample { thread_id: 2, stack: vec![FrameId(3)] },
            ],
        }
    }

    #[test]
    fn test_build_report_per_thread_diffing() {
        let report = build_report(&recording(), "mem", &CleanerOptions::default(), 16).unwrap();

        assert_eq!(report.version, SCHEMA_VERSION);
        assert_eq!(report.summary.samples, 4);
        assert_eq!(report.summary.skipped, 1);
        assert_eq!(report.summary.threads, 2);
        assert_eq!(report.ticks.len(), 3);

        // Thread 1's second sample only differs by a block frame
        let repeat = &report.ticks[2];
        assert_eq!(repeat.thread_id, 1);
        assert_eq!(repeat.depth, 2);
        assert_eq!(repeat.unchanged, 2);
        assert!(repeat.changed.is_empty());

        assert_eq!(report.summary.total_frames, 5);
        assert_eq!(report.summary.reused_frames, 2);
    }

    #[test]
    fn test_validate_args_valid() {
        assert!(validate_args(&ReplayArgs::default()).is_ok());
    }

    #[test]
    fn test_validate_args_empty_input() {
        let args = ReplayArgs {
            input: PathBuf::new(),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_capacity_bounds() {
        let zero = ReplayArgs {
            capacity: 0,
            ..Default::default()
        };
        assert!(validate_args(&zero).is_err());

        let huge = ReplayArgs {
            capacity: MAX_CAPACITY + 1,
            ..Default::default()
        };
        assert!(validate_args(&huge).is_err());
    }
}
