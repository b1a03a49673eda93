//! Tipos de requisição do Motriz.

use serde::{Deserialize, Serialize};

/// Requisição de chat vinda da aplicação hospedeira.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// ID único da requisição (correlação de logs).
    #[serde(default = "new_request_id")]
    pub request_id: String,

    /// Texto livre digitado pelo usuário.
    pub message: String,

    /// Turnos anteriores da conversa, do mais antigo ao mais recente.
    #[serde(default)]
    pub history: Vec<HistoryEntry>,

    /// Avaliação da resposta anterior (true = útil).
    #[serde(default)]
    pub feedback: Option<bool>,
}

fn new_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl ChatRequest {
    /// Cria uma nova requisição de chat.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            request_id: new_request_id(),
            message: message.into(),
            history: Vec::new(),
            feedback: None,
        }
    }

    /// Define o histórico da conversa.
    pub fn with_history(mut self, history: Vec<HistoryEntry>) -> Self {
        self.history = history;
        self
    }

    /// Define o feedback sobre a resposta anterior.
    pub fn with_feedback(mut self, success: bool) -> Self {
        self.feedback = Some(success);
        self
    }
}

/// Quem falou em um turno do histórico.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// Usuário humano.
    User,
    /// O próprio assistente.
    Assistant,
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Speaker::User => write!(f, "user"),
            Speaker::Assistant => write!(f, "assistant"),
        }
    }
}

/// Um turno do histórico de conversa.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Autor do turno.
    pub speaker: Speaker,

    /// Texto do turno.
    pub text: String,
}

impl HistoryEntry {
    /// Turno do usuário.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    /// Turno do assistente.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
        }
    }
}
