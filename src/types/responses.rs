//! Tipos de resposta do Motriz.

use serde::{Deserialize, Serialize};

/// Origem da resolução de intenção que produziu uma resposta.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// Padrão aprendido pelo motor.
    Learned,
    /// Regras de palavras-chave (fallback).
    Heuristic,
    /// Nenhum resolvedor reconheceu a mensagem.
    Unresolved,
}

impl std::fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionSource::Learned => write!(f, "learned"),
            ResolutionSource::Heuristic => write!(f, "heuristic"),
            ResolutionSource::Unresolved => write!(f, "unresolved"),
        }
    }
}

/// Resposta do chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// ID da requisição.
    pub request_id: String,

    /// Texto da resposta para o usuário.
    pub response: String,

    /// Sugestões de próximas perguntas.
    pub suggestions: Vec<String>,

    /// Intenção resolvida (se houver).
    pub intent: Option<String>,

    /// De onde veio a resolução.
    pub source: ResolutionSource,

    /// Score da resolução (0.0 quando não resolvida).
    pub score: f64,
}

impl ChatResponse {
    /// Indica se alguma intenção foi reconhecida.
    pub fn is_resolved(&self) -> bool {
        self.source != ResolutionSource::Unresolved
    }
}
