//! Operator Console - main menu, assessment loop, evaluation menu
//!
//! Thin adapter over `logic`: it only reads lines, calls the pipeline or
//! the evaluation context and prints what `report` renders. Errors from an
//! action are logged and shown, then control returns to the menu.
//! EOF on input ends the session.

use std::io::{self, BufRead, Write};

use crate::constants::{APP_NAME, APP_VERSION};
use crate::logic::config::PipelineConfig;
use crate::logic::error::PipelineError;
use crate::logic::evaluation::EvaluationContext;
use crate::logic::features::{read_measurement, InputError, OperatorInput, OPERATOR_RANGES};
use crate::logic::pipeline::{self, TrainedModel};
use super::report::{self, paint, RED, YELLOW};

/// Line-oriented console over any reader/writer pair
pub struct Console<R, W> {
    input: R,
    output: W,
}

/// Outcome of one prompt
enum Reply {
    Line(String),
    Eof,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{}", text)
    }

    fn ask(&mut self, prompt: &str) -> io::Result<Reply> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(Reply::Eof);
        }
        Ok(Reply::Line(line.trim().to_string()))
    }

    // ========================================================================
    // MAIN MENU
    // ========================================================================

    pub fn run(&mut self, config: &PipelineConfig) -> io::Result<()> {
        log::info!("{} v{} console started", APP_NAME, APP_VERSION);
        let store = config.store();
        let evaluation = EvaluationContext::new(store.clone());

        loop {
            let model_exists = store.exists();

            self.say(&format!("\n{}", paint(YELLOW, "=-=-=-= Menu Principal =-=-=-=")))?;
            self.say("1. Executar modelo de classificação")?;
            if model_exists {
                self.say("2. Exibir métricas de análise de desempenho")?;
            } else {
                self.say(&paint(RED, "2. Exibir métricas (indisponível - treine o modelo primeiro)"))?;
            }
            self.say("3. Sair")?;

            let choice = match self.ask("Escolha uma opção (1-3): ")? {
                Reply::Line(line) => line,
                Reply::Eof => break,
            };
            self.say("")?;

            match choice.parse::<u32>() {
                Ok(1) => {
                    if !self.run_model(config)? {
                        break;
                    }
                }
                Ok(2) if model_exists => {
                    if !self.evaluation_menu(&evaluation)? {
                        break;
                    }
                }
                Ok(2) => self.say("Por favor, execute primeiro a opção 1 para treinar o modelo.")?,
                Ok(3) => {
                    self.say("Saindo do programa...")?;
                    break;
                }
                Ok(_) => self.say("Opção inválida! Por favor, escolha 1, 2 ou 3.")?,
                Err(_) => self.say("Entrada inválida! Por favor, digite um número entre 1 e 3.")?,
            }
        }

        log::info!("Console session ended");
        Ok(())
    }

    fn report_error(&mut self, context: &str, err: &PipelineError) -> io::Result<()> {
        log::error!("{}: {}", context, err);
        if err.is_recoverable() {
            self.say(&paint(RED, &err.user_message()))
        } else {
            self.say(&paint(RED, &format!("{} ({})", err.user_message(), err)))
        }
    }

    // ========================================================================
    // TRAINING + ASSESSMENT LOOP
    // ========================================================================

    /// Returns false when input hit EOF
    fn run_model(&mut self, config: &PipelineConfig) -> io::Result<bool> {
        let trained = match pipeline::train_and_save(config) {
            Ok(t) => t,
            Err(e) => {
                self.report_error("Training failed", &e)?;
                return Ok(true);
            }
        };
        self.say(&report::render_training_summary(&trained.summary))?;
        self.assessment_loop(&trained)
    }

    fn assessment_loop(&mut self, trained: &TrainedModel) -> io::Result<bool> {
        loop {
            let input = match self.read_operator_input()? {
                Some(input) => input,
                None => return Ok(false),
            };

            match trained.assess(&input) {
                Ok(assessment) => self.say(&report::render_assessment(&assessment))?,
                Err(e) => self.report_error("Assessment failed", &e)?,
            }

            match self.ask("\nDeseja cadastrar novos dados? [S/N]: ")? {
                Reply::Line(answer) if answer.eq_ignore_ascii_case("n") => return Ok(true),
                Reply::Line(_) => {}
                Reply::Eof => return Ok(false),
            }
        }
    }

    /// Prompt each operator feature until it is valid. None on EOF.
    fn read_operator_input(&mut self) -> io::Result<Option<OperatorInput>> {
        self.say("\n--- Entrada de Dados ---")?;

        let mut values = [0.0f64; 3];
        for (slot, range) in values.iter_mut().zip(OPERATOR_RANGES.iter()) {
            let prompt = format!("{} ({}-{}): ", range.feature, range.min, range.max);
            *slot = loop {
                let raw = match self.ask(&prompt)? {
                    Reply::Line(line) => line,
                    Reply::Eof => return Ok(None),
                };
                match read_measurement(range.feature, &raw) {
                    Ok(v) => break v,
                    Err(e @ InputError::OutOfRange { .. }) => self.say(&e.to_string())?,
                    Err(e) => self.say(&format!("Erro: {}", e))?,
                }
            };
        }

        // Each value was range-checked by read_measurement
        let [ph, turbidity, conductivity] = values;
        Ok(Some(OperatorInput { ph, turbidity, conductivity }))
    }

    // ========================================================================
    // EVALUATION MENU
    // ========================================================================

    /// Returns false when input hit EOF
    fn evaluation_menu(&mut self, ctx: &EvaluationContext) -> io::Result<bool> {
        loop {
            self.say(&format!("\n{}", paint(YELLOW, "---------- ÍNDICE ----------")))?;
            self.say("1 - Relatório de classificação")?;
            self.say("2 - Precisão | Recall | F1")?;
            self.say("3 - Matriz de confusão")?;
            self.say("4 - Curva ROC")?;
            self.say("5 - Sair do menu de avaliações")?;

            let choice = match self.ask(&format!("\n{}", paint(YELLOW, "Digite valor do índice: ")))? {
                Reply::Line(line) => line,
                Reply::Eof => return Ok(false),
            };
            self.say("")?;

            let rendered = match choice.parse::<u32>() {
                Ok(1) => ctx.classification_report().map(|r| report::render_classification_report(&r)),
                Ok(2) => ctx.precision_recall_f1().map(report::render_precision_recall_f1),
                Ok(3) => ctx.confusion_matrix().map(|cm| report::render_confusion_matrix(&cm)),
                Ok(4) => ctx.roc_curve().map(|c| report::render_roc_curve(&c)),
                Ok(5) => return Ok(true),
                Ok(_) => {
                    self.say("Entrada inválida! Por favor, digite um número entre 1 e 5.")?;
                    continue;
                }
                Err(_) => {
                    self.say("Entrada inválida! Por favor, digite um número.")?;
                    continue;
                }
            };

            match rendered {
                Ok(text) => self.say(&text)?,
                Err(e) => self.report_error("Evaluation failed", &e)?,
            }
        }
    }
}

/// Run the console on stdin/stdout
pub fn run_stdio(config: &PipelineConfig) -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut console = Console::new(stdin.lock(), stdout.lock());
    console.run(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::FEATURE_LAYOUT;
    use crate::logic::model::ForestParams;
    use std::fs;
    use std::io::Cursor;

    fn session(config: &PipelineConfig, script: &str) -> String {
        let mut console = Console::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
        console.run(config).unwrap();
        String::from_utf8(console.into_output()).unwrap()
    }

    fn config_with_dataset(root: &std::path::Path) -> PipelineConfig {
        let mut config = PipelineConfig::with_root(root);
        config.forest = ForestParams { n_estimators: 10, ..config.forest };

        let mut csv = FEATURE_LAYOUT.join(",");
        csv.push_str(",Target\n");
        for i in 0..100 {
            let ph = (i % 14) as f64;
            let cells: Vec<String> = FEATURE_LAYOUT
                .iter()
                .map(|&n| if n == "pH" { ph.to_string() } else { ((i * 7) % 11).to_string() })
                .collect();
            csv.push_str(&cells.join(","));
            csv.push_str(if ph < 5.0 { ",1\n" } else { ",0\n" });
        }
        fs::create_dir_all(config.data_dir()).unwrap();
        fs::write(&config.dataset_path, csv).unwrap();
        config
    }

    #[test]
    fn test_exit_option() {
        let dir = tempfile::tempdir().unwrap();
        let out = session(&PipelineConfig::with_root(dir.path()), "3\n");
        assert!(out.contains("Menu Principal"));
        assert!(out.contains("indisponível"));
        assert!(out.contains("Saindo do programa..."));
    }

    #[test]
    fn test_eof_exits_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let out = session(&PipelineConfig::with_root(dir.path()), "");
        assert!(out.contains("Escolha uma opção (1-3): "));
    }

    #[test]
    fn test_invalid_choices() {
        let dir = tempfile::tempdir().unwrap();
        let out = session(&PipelineConfig::with_root(dir.path()), "abc\n9\n2\n3\n");
        assert!(out.contains("Entrada inválida! Por favor, digite um número entre 1 e 3."));
        assert!(out.contains("Opção inválida! Por favor, escolha 1, 2 ou 3."));
        assert!(out.contains("Por favor, execute primeiro a opção 1 para treinar o modelo."));
    }

    #[test]
    fn test_missing_dataset_returns_to_menu() {
        let dir = tempfile::tempdir().unwrap();
        let out = session(&PipelineConfig::with_root(dir.path()), "1\n3\n");
        assert!(out.contains("Arquivo de dados não encontrado!"));
        assert!(out.contains("Saindo do programa..."));
    }

    #[test]
    fn test_train_assess_and_evaluate() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_dataset(dir.path());

        // Bad format, out of range, then valid values; stop; metrics 1-4; leave
        let script = "1\nabc\n15\n7\n10\n300\nN\n2\n1\n2\n3\n4\n7\nx\n5\n3\n";
        let out = session(&config, script);

        assert!(out.contains("Modelo treinado salvo em:"));
        assert!(out.contains("Erro: Entrada inválida: use apenas números"));
        assert!(out.contains("Valor fora da faixa permitida! (0-14)"));
        assert!(out.contains("Nível de contaminação da água:"));
        assert!(out.contains("Relatório de Classificação Detalhado:"));
        assert!(out.contains("F1-Score:"));
        assert!(out.contains("Matriz de Confusão"));
        assert!(out.contains("Curva ROC (AUC = "));
        assert!(out.contains("Entrada inválida! Por favor, digite um número entre 1 e 5."));
        assert!(out.contains("Entrada inválida! Por favor, digite um número."));
        assert!(out.contains("2. Exibir métricas de análise de desempenho"));
        assert!(out.contains("Saindo do programa..."));
    }
}
