//! Artifacts Module - persisted training output
//!
//! # Architecture
//! - `manifest.rs`: `ArtifactManifest`, checksums, layout stamp
//! - `storage.rs`: `ArtifactStore` (staged save, verified load)
//!
//! # Failure Strategy
//! A save either replaces the whole set or leaves the previous one in
//! place. A load that finds a checksum or layout mismatch refuses the set;
//! the operator retrains.

pub mod manifest;
pub mod storage;
#[cfg(test)]
mod tests;

pub use manifest::{ArtifactChecksums, ArtifactManifest};
pub use storage::{ArtifactSnapshot, ArtifactStore, TestSet};
