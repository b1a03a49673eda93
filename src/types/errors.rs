//! Tipos de erro do Motriz.

use thiserror::Error;

/// Tipo de resultado padrão do Motriz.
pub type MotrizResult<T> = Result<T, MotrizError>;

/// Erros possíveis no Motriz.
///
/// As operações centrais do motor (tokenização, similaridade, matching,
/// aprendizado e feedback) nunca falham; estes erros aparecem apenas nas
/// bordas: arquivos, configuração e a camada de chat.
#[derive(Error, Debug)]
pub enum MotrizError {
    #[error("Erro de configuração: {0}")]
    Config(String),

    #[error("Erro de IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("Erro ao parsear TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Erro ao serializar TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Erro de JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Snapshot corrompido: {0}")]
    CorruptSnapshot(String),

    #[error("Versão de schema {found} não suportada (máxima suportada: {supported})")]
    UnsupportedSchema { found: u32, supported: u32 },

    #[error("Mensagem inválida: {0}")]
    InvalidInput(String),

    #[error("Erro no diretório de equipamentos: {0}")]
    Directory(String),

    #[error("Erro de entrada interativa: {0}")]
    Prompt(String),

    #[error("{0}")]
    Other(String),
}

impl MotrizError {
    /// Cria um erro genérico.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }

    /// Cria um erro de configuração.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Indica se o erro descreve um snapshot ilegível (corrompido ou de versão futura).
    pub fn is_snapshot_error(&self) -> bool {
        matches!(
            self,
            Self::CorruptSnapshot(_) | Self::UnsupportedSchema { .. } | Self::Json(_)
        )
    }
}

#[cfg(feature = "cli")]
impl From<dialoguer::Error> for MotrizError {
    fn from(err: dialoguer::Error) -> Self {
        Self::Prompt(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_error_classification() {
        assert!(MotrizError::CorruptSnapshot("x".into()).is_snapshot_error());
        assert!(MotrizError::UnsupportedSchema {
            found: 9,
            supported: 1
        }
        .is_snapshot_error());
        assert!(!MotrizError::other("x").is_snapshot_error());
    }

    #[test]
    fn test_display_messages() {
        let err = MotrizError::UnsupportedSchema {
            found: 3,
            supported: 1,
        };
        assert!(err.to_string().contains('3'));
        assert_eq!(MotrizError::other("falhou").to_string(), "falhou");
    }
}
