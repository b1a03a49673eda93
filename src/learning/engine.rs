//! IntentEngine - motor de intenções auto-adaptativo.
//!
//! Implementa o ciclo MATCH → LEARN → FEEDBACK → PERSIST:
//! encontra o melhor padrão para uma mensagem, aprende padrões novos,
//! ajusta a confiança a partir de desfechos e persiste o estado.
//!
//! O motor não tem sincronização interna. Quem compartilha uma instância
//! entre tarefas deve envolvê-la em `Arc<RwLock<_>>`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::types::config::{Config, LearningConfig};

use super::baseline::{TrainingExample, BASELINE};
use super::similarity::similarity;
use super::snapshot::{quarantine, Snapshot};
use super::stats::EngineStatistics;
use super::store::{Pattern, PatternContext, PatternId, PatternStore};
use super::tokenizer::{normalize, tokenize};

/// Melhor padrão encontrado para uma mensagem.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PatternMatch {
    pub id: PatternId,
    /// Similaridade bruta entre a mensagem e o texto do padrão.
    pub raw: f64,
    /// Score ajustado por confiança e uso.
    pub score: f64,
}

/// Resultado de um `learn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LearnOutcome {
    pub id: PatternId,
    /// `false` quando a mensagem foi mesclada a um padrão existente.
    pub created: bool,
}

/// Resultado de um feedback aplicado.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedbackOutcome {
    pub id: PatternId,
    pub success: bool,
    pub previous_confidence: f64,
    pub confidence: f64,
}

/// Resumo de um ciclo de treino.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingReport {
    pub examples: usize,
    pub created: usize,
    pub merged: usize,
    /// Textos distintos no store sobre o número de exemplos, em [0, 100].
    pub coverage: f64,
}

/// Motor de intenções.
#[derive(Debug, Clone)]
pub struct IntentEngine {
    store: PatternStore,
    config: LearningConfig,
    snapshot_path: Option<PathBuf>,
    generation: u64,
}

impl IntentEngine {
    /// Cria um motor vazio, sem persistência.
    pub fn new(config: LearningConfig) -> Self {
        Self {
            store: PatternStore::new(),
            config,
            snapshot_path: None,
            generation: 0,
        }
    }

    /// Define o arquivo de snapshot usado por `save`/`load`.
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    /// Cria o motor a partir da configuração: carrega o snapshot e semeia o baseline.
    pub fn open(config: &Config) -> Self {
        let mut engine = Self::new(config.learning.clone());
        if config.persistence.enabled {
            engine.snapshot_path = Some(config.persistence.snapshot_path.clone());
            engine.load();
        }

        if engine.store.is_empty() && config.learning.bootstrap_baseline {
            engine.bootstrap_baseline();
        }

        engine
    }

    // ═══════════════════════════════════════════════════════════════════════
    // FASE 1: MATCH - Busca o melhor padrão
    // ═══════════════════════════════════════════════════════════════════════

    /// Melhor padrão alcançável para a mensagem.
    ///
    /// Retorna `None` se o store estiver vazio, se nenhum padrão for alcançável
    /// ou se todos os scores forem zero. Empates ficam com o padrão mais antigo.
    pub fn find_best(&self, message: &str) -> Option<PatternMatch> {
        let message = normalize(message);
        let mut best: Option<PatternMatch> = None;
        let mut best_score = 0.0;

        for (id, pattern) in self.store.iter() {
            if !pattern.is_reachable() {
                continue;
            }

            let raw = similarity(&message, &pattern.text);
            let score = raw * pattern.confidence * pattern.usage_factor();

            if score > best_score {
                best_score = score;
                best = Some(PatternMatch { id, raw, score });
            }
        }

        best
    }

    // ═══════════════════════════════════════════════════════════════════════
    // FASE 2: LEARN - Cria ou mescla padrões
    // ═══════════════════════════════════════════════════════════════════════

    /// Aprende uma mensagem sob uma intenção/ação.
    ///
    /// Mensagens quase idênticas a um padrão existente (score acima de
    /// `duplicate_threshold`) apenas reforçam esse padrão.
    pub fn learn(
        &mut self,
        message: &str,
        intent: &str,
        action: &str,
        context: Option<PatternContext>,
    ) -> LearnOutcome {
        if let Some(found) = self.find_best(message) {
            if found.score > self.config.duplicate_threshold {
                self.increment_usage(found.id);
                tracing::info!(
                    pattern = %found.id,
                    score = found.score,
                    intent = intent,
                    "Duplicate pattern reinforced"
                );
                return LearnOutcome {
                    id: found.id,
                    created: false,
                };
            }
        }

        let pattern = Pattern::new(message, intent, action, context);
        let tokens = tokenize(&pattern.text);
        let text = pattern.text.clone();

        let id = self.store.push(pattern);
        self.store.reinforce_keywords(&tokens);
        self.generation += 1;

        tracing::info!(
            pattern = %id,
            intent = intent,
            action = action,
            text = %text,
            "New pattern learned"
        );

        LearnOutcome { id, created: true }
    }

    /// Treina o motor com uma lista de exemplos (apenas `learn`, sem feedback).
    pub fn train(&mut self, examples: &[TrainingExample]) -> TrainingReport {
        self.train_with(examples, |_| {})
    }

    /// Como `train`, chamando `on_example` após cada exemplo aprendido.
    pub fn train_with<F>(&mut self, examples: &[TrainingExample], mut on_example: F) -> TrainingReport
    where
        F: FnMut(&LearnOutcome),
    {
        let mut created = 0;
        let mut merged = 0;

        for example in examples {
            let outcome = self.learn(&example.text, &example.intent, &example.action, None);
            on_example(&outcome);
            if outcome.created {
                created += 1;
            } else {
                merged += 1;
            }
        }

        let distinct: HashSet<&str> = self.store.patterns().iter().map(|p| p.text.as_str()).collect();
        let coverage = if examples.is_empty() {
            0.0
        } else {
            (distinct.len() as f64 / examples.len() as f64 * 100.0).min(100.0)
        };

        tracing::info!(
            examples = examples.len(),
            created = created,
            merged = merged,
            "Training cycle finished"
        );

        TrainingReport {
            examples: examples.len(),
            created,
            merged,
            coverage,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // FASE 3: FEEDBACK - Ajusta a confiança
    // ═══════════════════════════════════════════════════════════════════════

    /// Aplica feedback ao melhor padrão alcançável da mensagem.
    ///
    /// Sem padrão alcançável, é um no-op. Padrões dormentes não recebem
    /// feedback, nem positivo.
    pub fn feedback(&mut self, message: &str, success: bool) -> Option<FeedbackOutcome> {
        let found = self.find_best(message)?;
        let pattern = self.store.get_mut(found.id)?;

        let previous_confidence = pattern.confidence;
        pattern.mark_outcome(success);
        if success {
            pattern.increment_usage();
        }
        let confidence = pattern.confidence;
        self.generation += 1;

        if success {
            tracing::info!(
                pattern = %found.id,
                confidence = confidence,
                "Positive feedback applied"
            );
        } else {
            tracing::warn!(
                pattern = %found.id,
                confidence = confidence,
                "Negative feedback applied"
            );
        }

        Some(FeedbackOutcome {
            id: found.id,
            success,
            previous_confidence,
            confidence,
        })
    }

    /// Registra um uso do padrão. Retorna `false` para IDs desconhecidos.
    pub fn increment_usage(&mut self, id: PatternId) -> bool {
        match self.store.get_mut(id) {
            Some(pattern) => {
                pattern.increment_usage();
                self.generation += 1;
                true
            }
            None => false,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // FASE 4: PERSIST - Snapshot em disco
    // ═══════════════════════════════════════════════════════════════════════

    /// Grava o snapshot. Falhas são logadas e nunca propagadas.
    pub fn save(&self) -> bool {
        let Some(path) = &self.snapshot_path else {
            return false;
        };

        match self.snapshot().write_atomic(path) {
            Ok(()) => {
                tracing::info!(
                    path = %path.display(),
                    patterns = self.store.len(),
                    "Knowledge saved"
                );
                true
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to save knowledge");
                false
            }
        }
    }

    /// Carrega o snapshot, se existir.
    ///
    /// Um snapshot ilegível é movido para o lado e o motor segue vazio.
    pub fn load(&mut self) -> bool {
        let Some(path) = self.snapshot_path.clone() else {
            return false;
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "No snapshot found");
            return false;
        }

        match Snapshot::read_from(&path) {
            Ok(snapshot) => {
                self.restore(snapshot);
                tracing::info!(
                    path = %path.display(),
                    patterns = self.store.len(),
                    "Knowledge loaded"
                );
                true
            }
            Err(e) if e.is_snapshot_error() => {
                tracing::warn!(path = %path.display(), error = %e, "Corrupt snapshot, starting empty");
                self.store = PatternStore::new();
                match quarantine(&path) {
                    Ok(moved) => {
                        tracing::warn!(moved_to = %moved.display(), "Corrupt snapshot moved aside")
                    }
                    Err(e) => tracing::error!(error = %e, "Failed to move corrupt snapshot"),
                }
                false
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read snapshot");
                false
            }
        }
    }

    /// Semeia o baseline se o store estiver vazio. Retorna quantos padrões foram criados.
    pub fn bootstrap_baseline(&mut self) -> usize {
        if !self.store.is_empty() {
            return 0;
        }

        for seed in BASELINE {
            self.store
                .push(Pattern::new(seed.text, seed.intent, seed.action, None));
        }
        self.generation += 1;

        tracing::info!(patterns = BASELINE.len(), "Baseline knowledge seeded");
        BASELINE.len()
    }

    /// Cópia do estado atual para persistência.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.store)
    }

    /// Substitui o estado pelo conteúdo de um snapshot.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.store = snapshot.into_store();
        self.generation += 1;
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Consultas
    // ═══════════════════════════════════════════════════════════════════════

    pub fn pattern(&self, id: PatternId) -> Option<&Pattern> {
        self.store.get(id)
    }

    pub fn patterns(&self) -> &[Pattern] {
        self.store.patterns()
    }

    pub fn keyword_weight(&self, token: &str) -> f64 {
        self.store.keyword_weight(token)
    }

    pub fn statistics(&self) -> EngineStatistics {
        EngineStatistics::compute(&self.store)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn config(&self) -> &LearningConfig {
        &self.config
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    /// Contador monotônico de mutações.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    fn create_test_engine() -> (IntentEngine, TempDir) {
        let dir = tempdir().unwrap();
        let engine = IntentEngine::new(LearningConfig::default())
            .with_snapshot_path(dir.path().join("knowledge.json"));
        (engine, dir)
    }

    #[test]
    fn test_find_best_empty_store() {
        let (engine, _dir) = create_test_engine();
        assert!(engine.find_best("equipos disponibles").is_none());
    }

    #[test]
    fn test_find_best_exact_match() {
        let (mut engine, _dir) = create_test_engine();
        engine.bootstrap_baseline();

        let found = engine.find_best("Equipos Libres").unwrap();
        let pattern = engine.pattern(found.id).unwrap();
        assert_eq!(pattern.text, "equipos libres");
        assert!((found.score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_find_best_skips_dormant_patterns() {
        let (mut engine, _dir) = create_test_engine();
        engine.learn("equipos libres", "d", "a", None);
        engine.store.get_mut(PatternId(0)).unwrap().confidence = 0.2;
        assert!(engine.find_best("equipos libres").is_none());

        engine.store.get_mut(PatternId(0)).unwrap().confidence = 1.0;
        engine.feedback("equipos libres", false);
        assert!(engine.find_best("equipos libres").is_none());
    }

    #[test]
    fn test_find_best_tie_keeps_first() {
        let (mut engine, _dir) = create_test_engine();
        engine.learn("equipos libres", "primero", "a", None);
        let second = Pattern::new("equipos libres", "segundo", "a", None);
        engine.store.push(second);

        let found = engine.find_best("equipos libres").unwrap();
        assert_eq!(found.id, PatternId(0));
    }

    #[test]
    fn test_learn_creates_and_weights_keywords() {
        let (mut engine, _dir) = create_test_engine();
        let outcome = engine.learn("Equipos en préstamo", "equipos_prestados", "listar", None);

        assert!(outcome.created);
        assert_eq!(engine.len(), 1);
        assert_eq!(engine.patterns()[0].text, "equipos en préstamo");
        assert!((engine.keyword_weight("equipos") - 0.1).abs() < 1e-12);
        assert!((engine.keyword_weight("préstamo") - 0.1).abs() < 1e-12);
        assert_eq!(engine.keyword_weight("en"), 0.0);
    }

    #[test]
    fn test_learn_duplicate_merges() {
        let (mut engine, _dir) = create_test_engine();
        let first = engine.learn("equipos libres", "d", "a", None);
        let second = engine.learn("equipos libres", "d", "a", None);

        assert!(!second.created);
        assert_eq!(first.id, second.id);
        assert_eq!(engine.len(), 1);
        assert_eq!(engine.patterns()[0].usage_count, 2);
        // keyword weights só crescem em padrões novos
        assert!((engine.keyword_weight("equipos") - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_feedback_positive_and_negative() {
        let (mut engine, _dir) = create_test_engine();
        engine.learn("equipos libres", "d", "a", None);

        let negative = engine.feedback("equipos libres", false).unwrap();
        assert!((negative.confidence - 0.9).abs() < 1e-12);
        assert!(!engine.patterns()[0].success);

        // padrão com success=false não é alcançável: feedback vira no-op
        assert!(engine.feedback("equipos libres", true).is_none());
    }

    #[test]
    fn test_feedback_positive_reinforces_usage() {
        let (mut engine, _dir) = create_test_engine();
        engine.learn("equipos libres", "d", "a", None);
        engine.store.get_mut(PatternId(0)).unwrap().confidence = 0.5;

        let outcome = engine.feedback("equipos libres", true).unwrap();
        assert_eq!(outcome.previous_confidence, 0.5);
        assert!((outcome.confidence - 0.56).abs() < 1e-12);
        assert_eq!(engine.patterns()[0].usage_count, 2);
    }

    #[test]
    fn test_increment_usage_unknown_id() {
        let (mut engine, _dir) = create_test_engine();
        assert!(!engine.increment_usage(PatternId(42)));
        assert_eq!(engine.generation(), 0);
    }

    #[test]
    fn test_bootstrap_only_when_empty() {
        let (mut engine, _dir) = create_test_engine();
        assert_eq!(engine.bootstrap_baseline(), 12);
        assert_eq!(engine.bootstrap_baseline(), 0);
        assert_eq!(engine.len(), 12);
        assert_eq!(engine.statistics().patterns_per_intent.len(), 4);
    }

    #[test]
    fn test_save_and_load() {
        let (mut engine, dir) = create_test_engine();
        engine.learn("equipos libres", "d", "a", None);
        assert!(engine.save());

        let mut reloaded = IntentEngine::new(LearningConfig::default())
            .with_snapshot_path(dir.path().join("knowledge.json"));
        assert!(reloaded.load());
        assert_eq!(reloaded.patterns(), engine.patterns());
    }

    #[test]
    fn test_save_without_path_is_noop() {
        let engine = IntentEngine::new(LearningConfig::default());
        assert!(!engine.save());
    }

    #[test]
    fn test_load_missing_file() {
        let (mut engine, _dir) = create_test_engine();
        assert!(!engine.load());
        assert!(engine.is_empty());
    }

    #[test]
    fn test_train_reports_counts() {
        let (mut engine, _dir) = create_test_engine();
        let examples = vec![
            TrainingExample {
                text: "equipos libres".into(),
                intent: "d".into(),
                action: "a".into(),
            },
            TrainingExample {
                text: "equipos libres".into(),
                intent: "d".into(),
                action: "a".into(),
            },
        ];

        let report = engine.train(&examples);
        assert_eq!(report.created, 1);
        assert_eq!(report.merged, 1);
        assert!((report.coverage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_train_with_reports_each_example() {
        let (mut engine, _dir) = create_test_engine();
        let examples = crate::learning::default_training_examples();

        let mut seen = 0;
        let report = engine.train_with(&examples, |_| seen += 1);

        assert_eq!(seen, examples.len());
        assert_eq!(report.created + report.merged, examples.len());
        assert!(report.coverage > 0.0 && report.coverage <= 100.0);
    }
}
