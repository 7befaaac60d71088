//! Record/replay of image model calls for deterministic runs.

pub mod config;
pub mod format;
pub mod recorder;
pub mod replayer;
