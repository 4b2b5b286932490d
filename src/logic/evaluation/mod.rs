//! Evaluation Module - classifier performance on the frozen test split
//!
//! ## Structure
//! - `metrics`: pure metric functions (confusion matrix, report, ROC/AUC)
//! - `session`: `EvaluationContext`, cached predictions over stored artifacts

pub mod metrics;
pub mod session;

pub use metrics::{
    classification_report, precision_recall_f1, roc_curve, ClassReportRow, ClassScores,
    ClassificationReport, ConfusionMatrix, RocCurve, RocPoint,
};
pub use session::EvaluationContext;
