//! Armazenamento de padrões aprendidos.
//!
//! O `PatternStore` é a única fonte de verdade: padrões em ordem de inserção,
//! pesos de palavras-chave e o índice derivado intenção → textos.
//! Padrões nunca são removidos; um padrão com confiança baixa apenas deixa
//! de ser alcançável pelo matching.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::tokenizer::normalize;

/// Limite inferior da confiança.
pub const MIN_CONFIDENCE: f64 = 0.1;
/// Limite superior da confiança.
pub const MAX_CONFIDENCE: f64 = 1.0;
/// Confiança mínima para um padrão ser considerado no matching e no feedback.
pub const REACHABLE_CONFIDENCE: f64 = 0.3;
/// Reforço aplicado a cada uso.
pub const USAGE_REINFORCEMENT: f64 = 0.01;
/// Reforço aplicado por feedback positivo.
pub const POSITIVE_FEEDBACK: f64 = 0.05;
/// Penalidade aplicada por feedback negativo.
pub const NEGATIVE_FEEDBACK: f64 = 0.1;
/// Incremento do peso de cada token quando um padrão novo é aprendido.
pub const KEYWORD_INCREMENT: f64 = 0.1;

/// Contexto livre anexado a um padrão.
pub type PatternContext = Map<String, Value>;

/// Identificador estável de um padrão (posição de inserção no store).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PatternId(pub usize);

impl std::fmt::Display for PatternId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Um padrão (texto, intenção, ação) com metadados adaptativos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    /// Texto normalizado (caixa baixa, sem espaços nas pontas).
    pub text: String,
    /// Categoria simbólica do pedido.
    pub intent: String,
    /// Operação de domínio a executar.
    pub action: String,
    #[serde(default)]
    pub context: PatternContext,
    #[serde(default = "default_usage_count")]
    pub usage_count: u32,
    #[serde(default = "Utc::now")]
    pub last_used_at: DateTime<Utc>,
    /// Se o último desfecho conhecido foi positivo.
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

fn default_usage_count() -> u32 {
    1
}

fn default_success() -> bool {
    true
}

fn default_confidence() -> f64 {
    MAX_CONFIDENCE
}

impl Pattern {
    /// Cria um padrão novo com confiança máxima e uso 1.
    pub fn new(
        text: &str,
        intent: impl Into<String>,
        action: impl Into<String>,
        context: Option<PatternContext>,
    ) -> Self {
        Self {
            text: normalize(text),
            intent: intent.into(),
            action: action.into(),
            context: context.unwrap_or_default(),
            usage_count: 1,
            last_used_at: Utc::now(),
            success: true,
            confidence: MAX_CONFIDENCE,
        }
    }

    /// Registra um uso: contador, timestamp e um reforço pequeno de confiança.
    pub fn increment_usage(&mut self) {
        self.usage_count = self.usage_count.saturating_add(1);
        self.last_used_at = Utc::now();
        self.confidence = (self.confidence + USAGE_REINFORCEMENT).min(MAX_CONFIDENCE);
    }

    /// Aplica o desfecho de um feedback explícito.
    pub fn mark_outcome(&mut self, success: bool) {
        self.success = success;
        self.confidence = if success {
            (self.confidence + POSITIVE_FEEDBACK).min(MAX_CONFIDENCE)
        } else {
            (self.confidence - NEGATIVE_FEEDBACK).max(MIN_CONFIDENCE)
        };
    }

    /// Se o padrão participa do matching.
    pub fn is_reachable(&self) -> bool {
        self.success && self.confidence >= REACHABLE_CONFIDENCE
    }

    /// Fator de uso: +2% por uso adicional, limitado a 1.15.
    pub fn usage_factor(&self) -> f64 {
        (1.0 + 0.02 * (self.usage_count.saturating_sub(1)) as f64).min(1.15)
    }

    /// Corrige valores vindos de fontes externas para respeitar os invariantes.
    pub(crate) fn sanitize(&mut self) {
        self.text = normalize(&self.text);
        self.usage_count = self.usage_count.max(1);
        self.confidence = if self.confidence.is_finite() {
            self.confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
        } else {
            MAX_CONFIDENCE
        };
    }
}

/// Índice derivado intenção → textos dos padrões, usado só para estatísticas.
#[derive(Debug, Clone, Default)]
pub struct IntentIndex {
    by_intent: HashMap<String, Vec<String>>,
}

impl IntentIndex {
    /// Reconstrói o índice a partir dos padrões.
    pub fn rebuild(patterns: &[Pattern]) -> Self {
        let mut index = Self::default();
        for pattern in patterns {
            index.register(&pattern.intent, &pattern.text);
        }
        index
    }

    /// Registra um texto sob uma intenção.
    pub fn register(&mut self, intent: &str, text: &str) {
        self.by_intent
            .entry(intent.to_string())
            .or_default()
            .push(text.to_string());
    }

    /// Textos registrados para uma intenção.
    pub fn texts(&self, intent: &str) -> &[String] {
        self.by_intent
            .get(intent)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Número de padrões por intenção.
    pub fn counts(&self) -> HashMap<String, usize> {
        self.by_intent
            .iter()
            .map(|(intent, texts)| (intent.clone(), texts.len()))
            .collect()
    }

    /// Número de intenções distintas.
    pub fn len(&self) -> usize {
        self.by_intent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_intent.is_empty()
    }
}

/// Padrões, pesos de palavras-chave e índice de intenções.
#[derive(Debug, Clone, Default)]
pub struct PatternStore {
    patterns: Vec<Pattern>,
    keyword_weights: HashMap<String, f64>,
    intents: IntentIndex,
}

impl PatternStore {
    /// Cria um store vazio.
    pub fn new() -> Self {
        Self::default()
    }

    /// Monta um store a partir de partes externas, saneando cada padrão.
    pub fn from_parts(mut patterns: Vec<Pattern>, keyword_weights: HashMap<String, f64>) -> Self {
        for pattern in &mut patterns {
            pattern.sanitize();
        }
        let keyword_weights = keyword_weights
            .into_iter()
            .filter(|(_, weight)| weight.is_finite())
            .collect();
        let intents = IntentIndex::rebuild(&patterns);

        Self {
            patterns,
            keyword_weights,
            intents,
        }
    }

    /// Adiciona um padrão ao final e o registra no índice.
    pub fn push(&mut self, pattern: Pattern) -> PatternId {
        self.intents.register(&pattern.intent, &pattern.text);
        self.patterns.push(pattern);
        PatternId(self.patterns.len() - 1)
    }

    pub fn get(&self, id: PatternId) -> Option<&Pattern> {
        self.patterns.get(id.0)
    }

    pub fn get_mut(&mut self, id: PatternId) -> Option<&mut Pattern> {
        self.patterns.get_mut(id.0)
    }

    /// Padrões com seus IDs, em ordem de inserção.
    pub fn iter(&self) -> impl Iterator<Item = (PatternId, &Pattern)> {
        self.patterns
            .iter()
            .enumerate()
            .map(|(i, pattern)| (PatternId(i), pattern))
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Soma o incremento de peso a cada token (criando entradas ausentes).
    pub fn reinforce_keywords<'t>(&mut self, tokens: impl IntoIterator<Item = &'t String>) {
        for token in tokens {
            *self.keyword_weights.entry(token.clone()).or_insert(0.0) += KEYWORD_INCREMENT;
        }
    }

    /// Peso acumulado de um token (0.0 se nunca visto).
    pub fn keyword_weight(&self, token: &str) -> f64 {
        self.keyword_weights.get(token).copied().unwrap_or(0.0)
    }

    pub fn keyword_weights(&self) -> &HashMap<String, f64> {
        &self.keyword_weights
    }

    pub fn intents(&self) -> &IntentIndex {
        &self.intents
    }
}
