//! Cadeia de resolvedores em ordem de prioridade.

use super::{IntentResolver, Resolution};

/// Lista ordenada de resolvedores; o primeiro que responde vence.
#[derive(Default)]
pub struct ResolverChain {
    resolvers: Vec<Box<dyn IntentResolver>>,
}

impl ResolverChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adiciona um resolvedor ao final da cadeia.
    pub fn with(mut self, resolver: impl IntentResolver + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }

    /// Resolve a mensagem percorrendo a cadeia.
    pub async fn resolve(&self, message: &str) -> Option<Resolution> {
        for resolver in &self.resolvers {
            if let Some(resolution) = resolver.resolve(message).await {
                tracing::debug!(resolver = resolver.name(), intent = %resolution.intent, "Message resolved");
                return Some(resolution);
            }
        }

        tracing::debug!(resolvers = self.resolvers.len(), "No resolver recognized the message");
        None
    }

    /// Nomes dos resolvedores, em ordem.
    pub fn names(&self) -> Vec<&str> {
        self.resolvers.iter().map(|r| r.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}
