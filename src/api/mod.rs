//! API Module - operator console
//!
//! - `menu`: interactive menus over stdin/stdout
//! - `report`: text rendering of assessments and metrics

pub mod menu;
pub mod report;
