//! Text rendering for the operator console
//!
//! Pure String builders. Nothing here reads input or touches artifacts.

use crate::logic::evaluation::{ClassificationReport, ConfusionMatrix, RocCurve, RocPoint};
use crate::logic::pipeline::TrainingSummary;
use crate::logic::risk::RiskAssessment;
use crate::logic::dataset::Label;

pub const YELLOW: &str = "\x1b[1;33m";
pub const RED: &str = "\x1b[1;31m";
pub const BLUE: &str = "\x1b[1;34m";
pub const RESET: &str = "\x1b[m";

/// Longest ROC table printed; longer curves are sampled evenly
const MAX_ROC_ROWS: usize = 25;

pub fn paint(color: &str, text: &str) -> String {
    format!("{}{}{}", color, text, RESET)
}

// ============================================================================
// TRAINING / ASSESSMENT
// ============================================================================

pub fn render_training_summary(summary: &TrainingSummary) -> String {
    format!(
        "Carregando dados de: {}\n\
         Amostras: {} (treino {}, teste {})\n\n\
         Modelo treinado salvo em: {}\n\
         Dados de teste salvos em: {}\n",
        paint(BLUE, &summary.dataset_path.display().to_string()),
        summary.total_rows,
        summary.train_rows,
        summary.test_rows,
        paint(BLUE, &summary.model_path.display().to_string()),
        paint(BLUE, &summary.test_data_dir.display().to_string()),
    )
}

pub fn render_assessment(assessment: &RiskAssessment) -> String {
    let mut out = format!("\nNível de contaminação da água: {:.2}%\n\n", assessment.percent());

    if let Some(headline) = assessment.advisory.headline {
        out.push_str(&paint(assessment.tier.ansi_color(), headline));
        out.push('\n');
    }
    for line in assessment.advisory.lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}

// ============================================================================
// EVALUATION
// ============================================================================

pub fn render_classification_report(report: &ClassificationReport) -> String {
    let width = report
        .rows
        .iter()
        .map(|r| r.name().chars().count())
        .chain(std::iter::once("weighted avg".len()))
        .max()
        .unwrap_or(12);

    let mut out = String::from("Relatório de Classificação Detalhado:\n");
    out.push_str(&format!(
        "{:>w$} {:>9} {:>9} {:>9} {:>9}\n\n",
        "", "precision", "recall", "f1-score", "support",
        w = width
    ));

    for row in &report.rows {
        out.push_str(&format!(
            "{:>w$} {:>9.2} {:>9.2} {:>9.2} {:>9}\n",
            row.name(),
            row.scores.precision,
            row.scores.recall,
            row.scores.f1,
            row.support,
            w = width
        ));
    }
    out.push('\n');
    out.push_str(&format!(
        "{:>w$} {:>9} {:>9} {:>9.2} {:>9}\n",
        "accuracy", "", "", report.accuracy, report.total_support,
        w = width
    ));
    for (name, avg) in [("macro avg", &report.macro_avg), ("weighted avg", &report.weighted_avg)] {
        out.push_str(&format!(
            "{:>w$} {:>9.2} {:>9.2} {:>9.2} {:>9}\n",
            name, avg.precision, avg.recall, avg.f1, report.total_support,
            w = width
        ));
    }
    out
}

pub fn render_precision_recall_f1(scores: (f64, f64, f64)) -> String {
    let (precision, recall, f1) = scores;
    format!(
        "\nPrecisão (Precision): {:.2}\nRecall (Sensibilidade): {:.2}\nF1-Score: {:.2}\n",
        precision, recall, f1
    )
}

pub fn render_confusion_matrix(cm: &ConfusionMatrix) -> String {
    let names = [Label::Good.display_name(), Label::Contaminated.display_name()];
    let rows = cm.as_rows();
    let width = names.iter().map(|n| n.chars().count()).max().unwrap_or(12);

    let mut out = String::from("Matriz de Confusão (linhas: Real, colunas: Previsão)\n\n");
    out.push_str(&format!("{:>w$}  {:>w$}  {:>w$}\n", "", names[0], names[1], w = width));
    for (name, row) in names.iter().zip(rows) {
        out.push_str(&format!("{:>w$}  {:>w$}  {:>w$}\n", name, row[0], row[1], w = width));
    }
    out
}

pub fn render_roc_curve(curve: &RocCurve) -> String {
    let mut out = format!("Curva ROC (AUC = {:.2})\n\n", curve.auc);
    out.push_str(&format!("{:>10}  {:>6}  {:>6}\n", "limiar", "FPR", "TPR"));

    for point in sample_points(&curve.points) {
        let threshold = if point.threshold.is_infinite() {
            "inf".to_string()
        } else {
            format!("{:.4}", point.threshold)
        };
        out.push_str(&format!("{:>10}  {:>6.3}  {:>6.3}\n", threshold, point.fpr, point.tpr));
    }
    out
}

/// Evenly spaced subset, first and last point always kept
fn sample_points(points: &[RocPoint]) -> Vec<RocPoint> {
    if points.len() <= MAX_ROC_ROWS {
        return points.to_vec();
    }
    let last = points.len() - 1;
    let step = last as f64 / (MAX_ROC_ROWS - 1) as f64;
    let mut picked: Vec<usize> = (0..MAX_ROC_ROWS).map(|k| (k as f64 * step).round() as usize).collect();
    picked.dedup();
    picked.into_iter().map(|i| points[i.min(last)]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::evaluation::metrics::{classification_report, roc_curve};
    use crate::logic::risk::classify;

    fn labels(bits: &[u8]) -> Vec<Label> {
        bits.iter().filter_map(|&b| Label::from_u8(b)).collect()
    }

    #[test]
    fn test_assessment_text() {
        let text = render_assessment(&classify(0.4567));
        assert!(text.contains("Nível de contaminação da água: 45.67%"));
        assert!(text.contains("CONTAMINAÇÃO MODERADA DETECTADA!"));
        assert!(text.contains(YELLOW));

        let low = render_assessment(&classify(0.1));
        assert!(low.contains("Em caso de dúvidas, entre em contato com a defesa civil"));
        assert!(!low.contains(RED));
    }

    #[test]
    fn test_report_rows() {
        let report = classification_report(&labels(&[0, 1, 0, 1]), &labels(&[0, 1, 1, 1])).unwrap();
        let text = render_classification_report(&report);
        assert!(text.contains("Água Boa (0)"));
        assert!(text.contains("Água Ruim (1)"));
        assert!(text.contains("weighted avg"));
        assert!(text.contains("0.75"));
    }

    #[test]
    fn test_prf_text() {
        let text = render_precision_recall_f1((2.0 / 3.0, 1.0, 0.8));
        assert!(text.contains("Precisão (Precision): 0.67"));
        assert!(text.contains("Recall (Sensibilidade): 1.00"));
        assert!(text.contains("F1-Score: 0.80"));
    }

    #[test]
    fn test_confusion_matrix_text() {
        let cm = ConfusionMatrix { tn: 11, fp: 2, fn_: 3, tp: 17 };
        let text = render_confusion_matrix(&cm);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[3].trim_start().starts_with("Água Boa (0)"));
        assert!(lines[3].ends_with("2"));
        assert!(lines[4].ends_with("17"));
    }

    #[test]
    fn test_roc_text_is_sampled() {
        let scores: Vec<f64> = (0..100).map(|i| i as f64 / 100.0).collect();
        let truth: Vec<Label> = (0..100).map(|i| Label::from_u8((i % 2) as u8).unwrap()).collect();
        let curve = roc_curve(&scores, &truth).unwrap();

        let text = render_roc_curve(&curve);
        assert!(text.starts_with("Curva ROC (AUC = "));
        assert!(text.contains("inf"));
        assert!(text.lines().count() <= MAX_ROC_ROWS + 3);
    }
}
