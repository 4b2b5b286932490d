//! Pipeline Errors
//!
//! One error enum for the training / inference / evaluation pipeline.
//! Operator input has its own `InputError` in `features::input`.

use std::path::PathBuf;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug)]
pub enum PipelineError {
    /// Dataset CSV is absent
    DatasetNotFound(PathBuf),
    /// A required column is missing from a CSV header
    SchemaMismatch(String),
    /// A data row could not be parsed
    MalformedRow {
        line: usize,
        column: String,
        reason: String,
    },
    /// Not enough rows to split/train
    InsufficientData(String),
    /// Feature has no observed value in the training set
    DegenerateFeature(String),
    /// Training has never produced this artifact
    ArtifactNotFound(PathBuf),
    /// Artifact bytes don't match the manifest checksum
    CorruptArtifact(String),
    /// Artifacts were produced with another feature layout
    LayoutMismatch {
        expected_version: u8,
        expected_hash: u32,
        actual_version: u8,
        actual_hash: u32,
    },
    /// Classifier used before fit/load
    NotFitted,
    Io(std::io::Error),
    Serialization(serde_json::Error),
}

impl PipelineError {
    /// Conditions the operator can fix (missing files, bad data, train first)
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            PipelineError::Io(_) | PipelineError::Serialization(_) | PipelineError::CorruptArtifact(_)
        )
    }

    /// Actionable message for the operator console
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::DatasetNotFound(path) => format!(
                "Arquivo de dados não encontrado! Coloque o arquivo em: {}",
                path.display()
            ),
            PipelineError::SchemaMismatch(column) => {
                format!("Coluna obrigatória ausente no arquivo de dados: {}", column)
            }
            PipelineError::MalformedRow { line, column, .. } => format!(
                "Valor inválido na linha {} (coluna {}). Corrija o arquivo de dados.",
                line, column
            ),
            PipelineError::InsufficientData(msg) => {
                format!("Dados insuficientes para treinar o modelo: {}", msg)
            }
            PipelineError::DegenerateFeature(name) => format!(
                "A variável '{}' não possui nenhum valor no conjunto de treino.",
                name
            ),
            PipelineError::ArtifactNotFound(_) | PipelineError::NotFitted => {
                "Modelo não encontrado. Execute primeiro a opção 1 para treinar o modelo.".to_string()
            }
            PipelineError::CorruptArtifact(_) | PipelineError::LayoutMismatch { .. } => {
                "Artefatos do modelo inválidos. Treine o modelo novamente.".to_string()
            }
            PipelineError::Io(_) | PipelineError::Serialization(_) => {
                "Erro inesperado. Tente novamente.".to_string()
            }
        }
    }
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::DatasetNotFound(path) => {
                write!(f, "Dataset not found: {}", path.display())
            }
            PipelineError::SchemaMismatch(column) => {
                write!(f, "Schema mismatch: missing column '{}'", column)
            }
            PipelineError::MalformedRow { line, column, reason } => {
                write!(f, "Malformed row at line {} ({}): {}", line, column, reason)
            }
            PipelineError::InsufficientData(msg) => write!(f, "Insufficient data: {}", msg),
            PipelineError::DegenerateFeature(name) => {
                write!(f, "Degenerate feature '{}': no observed values in training set", name)
            }
            PipelineError::ArtifactNotFound(path) => {
                write!(f, "Artifact not found: {}", path.display())
            }
            PipelineError::CorruptArtifact(msg) => write!(f, "Corrupt artifact: {}", msg),
            PipelineError::LayoutMismatch {
                expected_version,
                expected_hash,
                actual_version,
                actual_hash,
            } => write!(
                f,
                "Artifact layout mismatch: expected v{} ({:08x}), got v{} ({:08x})",
                expected_version, expected_hash, actual_version, actual_hash
            ),
            PipelineError::NotFitted => write!(f, "Classifier is not fitted"),
            PipelineError::Io(e) => write!(f, "IO Error: {}", e),
            PipelineError::Serialization(e) => write!(f, "Serialization Error: {}", e),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Io(e) => Some(e),
            PipelineError::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::Io(err)
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::Serialization(err)
    }
}
