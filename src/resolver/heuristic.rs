//! Resolvedor heurístico por palavras-chave.
//!
//! Regras fixas avaliadas em ordem. Perguntas sobre quem tem um equipamento
//! vêm antes de "asignado", e equipamentos emprestados antes de disponíveis.

use async_trait::async_trait;

use crate::learning::{
    AVAILABLE, FIND_WORKER, LIST_ALL, LIST_AVAILABLE, LIST_LOANED, LOANED, TOTAL, WHO_HAS,
};
use crate::types::responses::ResolutionSource;

use super::{IntentResolver, Resolution};

/// Regra: se alguma frase aparece na mensagem, resolve para (intent, action).
#[derive(Debug, Clone)]
pub struct KeywordRule {
    pub intent: &'static str,
    pub action: &'static str,
    pub phrases: &'static [&'static str],
}

impl KeywordRule {
    /// Verifica se a regra reconhece a mensagem (já em caixa baixa).
    pub fn matches(&self, lowered: &str) -> bool {
        self.phrases.iter().any(|phrase| lowered.contains(phrase))
    }
}

const DEFAULT_RULES: &[KeywordRule] = &[
    KeywordRule {
        intent: WHO_HAS,
        action: FIND_WORKER,
        phrases: &[
            "quien tiene",
            "quién tiene",
            "trabajador tiene",
            "a quien se le asigno",
            "a quién se le asignó",
        ],
    },
    KeywordRule {
        intent: LOANED,
        action: LIST_LOANED,
        phrases: &["prestado", "asignados", "en préstamo", "en prestamo", "ocupados"],
    },
    KeywordRule {
        intent: AVAILABLE,
        action: LIST_AVAILABLE,
        phrases: &["disponible", "libres"],
    },
    KeywordRule {
        intent: TOTAL,
        action: LIST_ALL,
        phrases: &["total", "todos los equipos", "cuantos equipos", "cuántos equipos"],
    },
];

/// Fallback por palavras-chave para mensagens que o motor não reconhece.
#[derive(Debug, Clone)]
pub struct HeuristicResolver {
    rules: Vec<KeywordRule>,
}

impl Default for HeuristicResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl HeuristicResolver {
    /// Cria o resolvedor com as regras padrão.
    pub fn new() -> Self {
        Self {
            rules: DEFAULT_RULES.to_vec(),
        }
    }

    /// Cria o resolvedor com regras próprias.
    pub fn with_rules(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }

    /// Versão síncrona de `resolve`.
    pub fn classify(&self, message: &str) -> Option<Resolution> {
        let lowered = message.to_lowercase();
        let rule = self.rules.iter().find(|rule| rule.matches(&lowered))?;

        Some(Resolution {
            intent: rule.intent.to_string(),
            action: rule.action.to_string(),
            score: 0.0,
            source: ResolutionSource::Heuristic,
            pattern: None,
        })
    }
}

#[async_trait]
impl IntentResolver for HeuristicResolver {
    fn name(&self) -> &str {
        "heuristic"
    }

    async fn resolve(&self, message: &str) -> Option<Resolution> {
        self.classify(message)
    }
}
