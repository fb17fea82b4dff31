//! Report renderers for classification results.
//!
//! - [`terminal`] — colored, tabular output with summary box; respects
//!   `--verbose` / `--quiet`. The JSON report is plain
//!   [`ScanReport`](crate::models::ScanReport) serialization and needs no
//!   renderer of its own.

pub mod terminal;
