//! Dataset Module - historical labeled samples
//!
//! Loads the water-quality CSV and produces the reproducible train/test split.

pub mod record;
pub mod loader;
pub mod split;

#[cfg(test)]
mod tests;

pub use record::{Dataset, Label, LabeledSample};
pub use loader::load;
pub use split::{split, Split};
