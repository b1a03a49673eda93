//! Resolvedor baseado nos padrões aprendidos.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::learning::IntentEngine;
use crate::types::responses::ResolutionSource;

use super::{IntentResolver, Resolution};

/// Consulta o motor e aceita o melhor padrão acima do limiar de despacho.
///
/// Matching e reforço de uso acontecem sob o mesmo write lock, então duas
/// mensagens concorrentes nunca perdem um incremento.
pub struct LearnedResolver {
    engine: Arc<RwLock<IntentEngine>>,
    threshold: f64,
}

impl LearnedResolver {
    /// Cria um resolvedor com o limiar configurado no motor.
    pub async fn new(engine: Arc<RwLock<IntentEngine>>) -> Self {
        let threshold = engine.read().await.config().match_threshold;
        Self { engine, threshold }
    }

    /// Cria um resolvedor com limiar explícito.
    pub fn with_threshold(engine: Arc<RwLock<IntentEngine>>, threshold: f64) -> Self {
        Self { engine, threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

#[async_trait]
impl IntentResolver for LearnedResolver {
    fn name(&self) -> &str {
        "learned"
    }

    async fn resolve(&self, message: &str) -> Option<Resolution> {
        let mut engine = self.engine.write().await;

        let found = engine.find_best(message)?;
        if found.score < self.threshold {
            tracing::debug!(score = found.score, threshold = self.threshold, "Best pattern below threshold");
            return None;
        }

        engine.increment_usage(found.id);
        let pattern = engine.pattern(found.id)?;

        tracing::debug!(
            pattern = %found.id,
            intent = %pattern.intent,
            score = found.score,
            "Message resolved by learned pattern"
        );

        Some(Resolution {
            intent: pattern.intent.clone(),
            action: pattern.action.clone(),
            score: found.score,
            source: ResolutionSource::Learned,
            pattern: Some(found.id),
        })
    }
}
