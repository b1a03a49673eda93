//! Estatísticas administrativas do motor.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::store::PatternStore;

/// Tamanho da lista de padrões mais usados.
pub const TOP_PATTERNS: usize = 10;
/// Tamanho da lista de palavras-chave mais pesadas.
pub const TOP_KEYWORDS: usize = 20;

/// Resumo de uso de um padrão.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternUsage {
    pub text: String,
    pub intent: String,
    pub usage_count: u32,
    pub confidence: f64,
}

/// Peso acumulado de uma palavra-chave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordWeight {
    pub word: String,
    pub weight: f64,
}

/// Estatísticas do conhecimento aprendido.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatistics {
    pub total_patterns: usize,
    pub patterns_per_intent: BTreeMap<String, usize>,
    /// Top 10 por uso, ordem de inserção nos empates.
    pub top_patterns: Vec<PatternUsage>,
    /// Top 20 por peso, ordem alfabética nos empates.
    pub top_keywords: Vec<KeywordWeight>,
    pub successful_patterns: usize,
    /// Padrões fora do alcance do matching.
    pub dormant_patterns: usize,
    pub average_confidence: f64,
    /// Nível de aprendizado em [0, 100].
    pub learning_percentage: f64,
}

impl EngineStatistics {
    /// Calcula as estatísticas de um store.
    pub fn compute(store: &PatternStore) -> Self {
        let patterns = store.patterns();
        let total_patterns = patterns.len();

        let patterns_per_intent = store.intents().counts().into_iter().collect();

        let mut by_usage: Vec<PatternUsage> = patterns
            .iter()
            .map(|p| PatternUsage {
                text: p.text.clone(),
                intent: p.intent.clone(),
                usage_count: p.usage_count,
                confidence: p.confidence,
            })
            .collect();
        // sort_by é estável: empates mantêm a ordem de inserção
        by_usage.sort_by(|a, b| b.usage_count.cmp(&a.usage_count));
        by_usage.truncate(TOP_PATTERNS);

        let mut top_keywords: Vec<KeywordWeight> = store
            .keyword_weights()
            .iter()
            .map(|(word, weight)| KeywordWeight {
                word: word.clone(),
                weight: *weight,
            })
            .collect();
        top_keywords.sort_by(|a, b| b.weight.total_cmp(&a.weight).then_with(|| a.word.cmp(&b.word)));
        top_keywords.truncate(TOP_KEYWORDS);

        let successful_patterns = patterns.iter().filter(|p| p.success).count();
        let dormant_patterns = patterns.iter().filter(|p| !p.is_reachable()).count();

        let (average_confidence, learning_percentage) = if total_patterns == 0 {
            (0.0, 0.0)
        } else {
            let average = patterns.iter().map(|p| p.confidence).sum::<f64>() / total_patterns as f64;
            let success_rate = successful_patterns as f64 / total_patterns as f64;
            (average, (success_rate * 100.0 * average).min(100.0))
        };

        Self {
            total_patterns,
            patterns_per_intent,
            top_patterns: by_usage,
            top_keywords,
            successful_patterns,
            dormant_patterns,
            average_confidence,
            learning_percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learning::store::Pattern;

    #[test]
    fn test_empty_store() {
        let stats = EngineStatistics::compute(&PatternStore::new());
        assert_eq!(stats.total_patterns, 0);
        assert!(stats.top_patterns.is_empty());
        assert_eq!(stats.learning_percentage, 0.0);
    }

    #[test]
    fn test_top_patterns_stable_order() {
        let mut store = PatternStore::new();
        for text in ["a", "b", "c"] {
            store.push(Pattern::new(text, "i", "x", None));
        }
        if let Some(pattern) = store.get_mut(crate::learning::store::PatternId(2)) {
            pattern.usage_count = 5;
        }

        let stats = EngineStatistics::compute(&store);
        let texts: Vec<&str> = stats.top_patterns.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["c", "a", "b"]);
        assert_eq!(stats.patterns_per_intent.get("i"), Some(&3));
    }

    #[test]
    fn test_top_keywords_sorted_and_truncated() {
        let mut store = PatternStore::new();
        let words: Vec<String> = (0..25).map(|i| format!("palavra{:02}", i)).collect();
        store.reinforce_keywords(&words);
        store.reinforce_keywords(&words[24..]);

        let stats = EngineStatistics::compute(&store);
        assert_eq!(stats.top_keywords.len(), TOP_KEYWORDS);
        assert_eq!(stats.top_keywords[0].word, "palavra24");
        assert_eq!(stats.top_keywords[1].word, "palavra00");
    }

    #[test]
    fn test_learning_percentage() {
        let mut a = Pattern::new("a", "i", "x", None);
        a.confidence = 0.8;
        let mut b = Pattern::new("b", "i", "x", None);
        b.success = false;
        b.confidence = 0.2;

        let stats = EngineStatistics::compute(&PatternStore::from_parts(vec![a, b], Default::default()));
        assert_eq!(stats.successful_patterns, 1);
        assert_eq!(stats.dormant_patterns, 1);
        assert!((stats.average_confidence - 0.5).abs() < 1e-12);
        assert!((stats.learning_percentage - 25.0).abs() < 1e-9);
    }
}
