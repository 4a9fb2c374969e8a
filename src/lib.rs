//! Frame Snapshot
//!
//! Stack snapshot post-processing for sampling profilers embedded in a
//! managed-language runtime.
//!
//! On every sampling tick the runtime hands over an array of opaque frame
//! handles, innermost first. This crate turns that raw array into something
//! an aggregator can use cheaply:
//!
//! - [`snapshot::remove_garbage`] trims, de-duplicates and strips block
//!   frames in place
//! - [`snapshot::compare`] counts the caller frames shared with the previous
//!   snapshot
//! - [`frame::extract`] resolves a surviving handle into a [`frame::FrameRecord`]
//!
//! [`sampler::SamplerContext`] ties the three together for one thread. The
//! host runtime is reached only through the traits in [`runtime`].

pub mod commands;
pub mod frame;
pub mod output;
pub mod runtime;
pub mod sampler;
pub mod snapshot;
pub mod utils;
