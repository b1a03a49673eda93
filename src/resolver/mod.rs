//! Resolvedores de intenção.
//!
//! Uma mensagem passa por uma cadeia ordenada de resolvedores; o primeiro
//! que reconhece a mensagem decide a intenção e a ação.
//!
//! - [`LearnedResolver`] consulta o motor de padrões aprendidos
//! - [`HeuristicResolver`] aplica regras fixas de palavras-chave
//! - [`ResolverChain`] compõe os dois em ordem de prioridade

mod chain;
mod heuristic;
mod learned;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::learning::PatternId;
use crate::types::responses::ResolutionSource;

pub use chain::ResolverChain;
pub use heuristic::{HeuristicResolver, KeywordRule};
pub use learned::LearnedResolver;

/// Intenção e ação resolvidas para uma mensagem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub intent: String,
    pub action: String,
    /// Score ajustado do padrão (0.0 para resoluções heurísticas).
    pub score: f64,
    pub source: ResolutionSource,
    /// Padrão que originou a resolução, se veio do motor.
    pub pattern: Option<PatternId>,
}

/// Trait para resolvedores de intenção.
#[async_trait]
pub trait IntentResolver: Send + Sync {
    /// Nome do resolvedor.
    fn name(&self) -> &str;

    /// Tenta resolver a mensagem. `None` passa a vez ao próximo resolvedor.
    async fn resolve(&self, message: &str) -> Option<Resolution>;
}
