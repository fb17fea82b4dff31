//! Artifact path classification.
//!
//! - [`probe`] — the filesystem existence seam: [`probe::Probe`] plus the real
//!   [`probe::FsProbe`] with UNC gating.
//! - [`classifier`] — pure classification of raw inventory paths into
//!   [`PathStatus`](crate::models::PathStatus) values, including heuristic
//!   repair of trailing garbage.

pub mod classifier;
pub mod probe;
