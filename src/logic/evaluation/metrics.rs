//! Classification Metrics
//!
//! Pure functions over actual/predicted labels or scores. Class 1
//! (Contaminated) is the positive class. Every ratio with a zero
//! denominator is reported as 0.0, never NaN.

use crate::logic::dataset::Label;
use crate::logic::error::{PipelineError, PipelineResult};

fn check_lengths(actual: usize, other: usize, what: &str) -> PipelineResult<()> {
    if actual == 0 {
        return Err(PipelineError::InsufficientData("no samples to evaluate".to_string()));
    }
    if actual != other {
        return Err(PipelineError::InsufficientData(format!(
            "{} labels but {} {}",
            actual, other, what
        )));
    }
    Ok(())
}

fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    ratio(2.0 * precision * recall, precision + recall)
}

// ============================================================================
// CONFUSION MATRIX
// ============================================================================

/// Binary confusion matrix. Rows = actual, columns = predicted:
/// `[[tn, fp], [fn, tp]]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfusionMatrix {
    pub tn: usize,
    pub fp: usize,
    pub fn_: usize,
    pub tp: usize,
}

impl ConfusionMatrix {
    pub fn from_labels(actual: &[Label], predicted: &[Label]) -> PipelineResult<Self> {
        check_lengths(actual.len(), predicted.len(), "predictions")?;

        let mut cm = Self::default();
        for (a, p) in actual.iter().zip(predicted) {
            match (a, p) {
                (Label::Good, Label::Good) => cm.tn += 1,
                (Label::Good, Label::Contaminated) => cm.fp += 1,
                (Label::Contaminated, Label::Good) => cm.fn_ += 1,
                (Label::Contaminated, Label::Contaminated) => cm.tp += 1,
            }
        }
        Ok(cm)
    }

    pub fn total(&self) -> usize {
        self.tn + self.fp + self.fn_ + self.tp
    }

    pub fn as_rows(&self) -> [[usize; 2]; 2] {
        [[self.tn, self.fp], [self.fn_, self.tp]]
    }

    pub fn accuracy(&self) -> f64 {
        ratio((self.tn + self.tp) as f64, self.total() as f64)
    }

    /// (precision, recall, f1) for `label` treated as the positive class
    pub fn scores_for(&self, label: Label) -> ClassScores {
        let (tp, fp, fn_) = match label {
            Label::Contaminated => (self.tp, self.fp, self.fn_),
            Label::Good => (self.tn, self.fn_, self.fp),
        };
        let precision = ratio(tp as f64, (tp + fp) as f64);
        let recall = ratio(tp as f64, (tp + fn_) as f64);
        ClassScores {
            precision,
            recall,
            f1: f1(precision, recall),
        }
    }

    pub fn support(&self, label: Label) -> usize {
        match label {
            Label::Good => self.tn + self.fp,
            Label::Contaminated => self.fn_ + self.tp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClassScores {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Precision, recall and F1 of the Contaminated class
pub fn precision_recall_f1(actual: &[Label], predicted: &[Label]) -> PipelineResult<(f64, f64, f64)> {
    let scores = ConfusionMatrix::from_labels(actual, predicted)?.scores_for(Label::Contaminated);
    Ok((scores.precision, scores.recall, scores.f1))
}

// ============================================================================
// CLASSIFICATION REPORT
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ClassReportRow {
    pub label: Label,
    pub scores: ClassScores,
    pub support: usize,
}

impl ClassReportRow {
    pub fn name(&self) -> &'static str {
        self.label.display_name()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport {
    /// Água Boa (0) then Água Ruim (1)
    pub rows: Vec<ClassReportRow>,
    pub accuracy: f64,
    pub macro_avg: ClassScores,
    pub weighted_avg: ClassScores,
    pub total_support: usize,
}

pub fn classification_report(actual: &[Label], predicted: &[Label]) -> PipelineResult<ClassificationReport> {
    let cm = ConfusionMatrix::from_labels(actual, predicted)?;
    Ok(report_from_matrix(&cm))
}

pub fn report_from_matrix(cm: &ConfusionMatrix) -> ClassificationReport {
    let rows: Vec<ClassReportRow> = [Label::Good, Label::Contaminated]
        .into_iter()
        .map(|label| ClassReportRow {
            label,
            scores: cm.scores_for(label),
            support: cm.support(label),
        })
        .collect();

    let total = cm.total() as f64;
    let n_rows = rows.len() as f64;

    let mut macro_avg = ClassScores::default();
    let mut weighted_avg = ClassScores::default();
    for row in &rows {
        let weight = ratio(row.support as f64, total);
        macro_avg.precision += row.scores.precision / n_rows;
        macro_avg.recall += row.scores.recall / n_rows;
        macro_avg.f1 += row.scores.f1 / n_rows;
        weighted_avg.precision += row.scores.precision * weight;
        weighted_avg.recall += row.scores.recall * weight;
        weighted_avg.f1 += row.scores.f1 * weight;
    }

    ClassificationReport {
        rows,
        accuracy: cm.accuracy(),
        macro_avg,
        weighted_avg,
        total_support: cm.total(),
    }
}

// ============================================================================
// ROC CURVE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RocPoint {
    /// Scores >= threshold are predicted positive
    pub threshold: f64,
    pub fpr: f64,
    pub tpr: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RocCurve {
    pub points: Vec<RocPoint>,
    /// Trapezoidal area under the curve
    pub auc: f64,
}

/// ROC curve over descending distinct scores, starting at (0, 0) with
/// threshold +inf. A test set holding a single class keeps the missing
/// rate at 0.
pub fn roc_curve(scores: &[f64], labels: &[Label]) -> PipelineResult<RocCurve> {
    check_lengths(labels.len(), scores.len(), "scores")?;

    let total_pos = labels.iter().filter(|l| l.is_positive()).count() as f64;
    let total_neg = labels.len() as f64 - total_pos;

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut points = vec![RocPoint {
        threshold: f64::INFINITY,
        fpr: 0.0,
        tpr: 0.0,
    }];

    let (mut tp, mut fp) = (0usize, 0usize);
    let mut i = 0;
    while i < order.len() {
        let current = scores[order[i]];
        while i < order.len() && scores[order[i]] == current {
            if labels[order[i]].is_positive() {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }
        points.push(RocPoint {
            threshold: current,
            fpr: ratio(fp as f64, total_neg),
            tpr: ratio(tp as f64, total_pos),
        });
    }

    let auc = trapezoidal_auc(&points);
    Ok(RocCurve { points, auc })
}

fn trapezoidal_auc(points: &[RocPoint]) -> f64 {
    points
        .windows(2)
        .map(|w| (w[1].fpr - w[0].fpr).abs() * (w[1].tpr + w[0].tpr) / 2.0)
        .sum()
}
