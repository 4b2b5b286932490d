//! Logic Module - prediction pipeline
//!
//! ## Structure
//! - `features/` - schema, defaults, operator input validation
//! - `dataset/` - CSV ingest and train/test split
//! - `model/` - mean imputer, CART tree, random forest
//! - `artifacts/` - persisted model set with manifest
//! - `risk/` - probability -> LOW / MODERATE / HIGH advisory
//! - `evaluation/` - metrics over the frozen test split
//! - `pipeline` - train_and_save / assess

pub mod error;
pub mod config;
pub mod logging;

pub mod features;
pub mod dataset;
pub mod model;
pub mod artifacts;
pub mod risk;
pub mod evaluation;
pub mod pipeline;
