//! Serviço de chat: resolve, executa, aprende e persiste.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::learning::{EngineStatistics, FeedbackOutcome, IntentEngine};
use crate::persistence::SnapshotWriter;
use crate::resolver::{HeuristicResolver, LearnedResolver, Resolution, ResolverChain};
use crate::types::config::{AssistantConfig, Config};
use crate::types::requests::{ChatRequest, HistoryEntry};
use crate::types::responses::{ChatResponse, ResolutionSource};
use crate::{MotrizError, MotrizResult};

use super::actions::{self, Action, ERROR_TEXT, HELP_TEXT};
use super::directory::{EquipmentDirectory, InMemoryDirectory};
use super::suggestions::suggestions_for;

/// Assistente de chat.
///
/// Clonar é barato: todos os clones compartilham o mesmo motor, a mesma
/// cadeia de resolvedores e o mesmo gravador de snapshots.
#[derive(Clone)]
pub struct Assistant {
    engine: Arc<RwLock<IntentEngine>>,
    chain: Arc<ResolverChain>,
    fallback: HeuristicResolver,
    directory: Arc<dyn EquipmentDirectory>,
    writer: Option<SnapshotWriter>,
    save_every: u64,
    /// Mutações desde a última gravação agendada.
    unsaved: Arc<AtomicU64>,
    config: AssistantConfig,
}

impl Assistant {
    /// Cria o assistente com a cadeia padrão (aprendido → heurístico).
    pub fn new(
        engine: IntentEngine,
        directory: Arc<dyn EquipmentDirectory>,
        config: AssistantConfig,
    ) -> Self {
        let threshold = engine.config().match_threshold;
        let engine = Arc::new(RwLock::new(engine));
        let chain = ResolverChain::new()
            .with(LearnedResolver::with_threshold(engine.clone(), threshold))
            .with(HeuristicResolver::new());

        Self {
            engine,
            chain: Arc::new(chain),
            fallback: HeuristicResolver::new(),
            directory,
            writer: None,
            save_every: 0,
            unsaved: Arc::new(AtomicU64::new(0)),
            config,
        }
    }

    /// Monta motor, diretório e gravador a partir da configuração.
    ///
    /// Precisa de um runtime tokio ativo quando a persistência está habilitada.
    pub fn from_config(config: &Config) -> MotrizResult<Self> {
        let engine = IntentEngine::open(config);

        let directory: Arc<dyn EquipmentDirectory> = match &config.assistant.inventory_path {
            Some(path) => Arc::new(InMemoryDirectory::load(path)?),
            None => Arc::new(InMemoryDirectory::empty()),
        };

        let mut assistant = Self::new(engine, directory, config.assistant.clone());
        if config.persistence.enabled {
            assistant = assistant.with_writer(
                SnapshotWriter::spawn(&config.persistence),
                config.persistence.save_every,
            );
        }

        Ok(assistant)
    }

    /// Persiste via gravador em segundo plano, com gravação periódica a cada `save_every` mutações.
    pub fn with_writer(mut self, writer: SnapshotWriter, save_every: u64) -> Self {
        self.writer = Some(writer);
        self.save_every = save_every;
        self
    }

    /// Substitui a cadeia de resolvedores.
    pub fn with_chain(mut self, chain: ResolverChain) -> Self {
        self.chain = Arc::new(chain);
        self
    }

    /// Processa uma mensagem de chat.
    pub async fn chat(&self, request: ChatRequest) -> MotrizResult<ChatResponse> {
        let message = request.message.trim();
        if message.is_empty() {
            return Err(MotrizError::InvalidInput(
                "El mensaje no puede estar vacío".to_string(),
            ));
        }

        tracing::debug!(request_id = %request.request_id, message = %message, "Chat request");

        if let Some(success) = request.feedback {
            self.feedback(message, success).await;
        }

        let resolution = self.chain.resolve(message).await;

        let (response, intent, source, score) = match resolution {
            Some(resolution) => {
                let response = self.dispatch(&resolution, message, &request.history).await;
                self.after_dispatch(&resolution, message, &response).await;
                (
                    response,
                    Some(resolution.intent),
                    resolution.source,
                    resolution.score,
                )
            }
            None => (HELP_TEXT.to_string(), None, ResolutionSource::Unresolved, 0.0),
        };

        Ok(ChatResponse {
            request_id: request.request_id,
            response,
            suggestions: suggestions_for(message, self.config.max_suggestions),
            intent,
            source,
            score,
        })
    }

    async fn dispatch(&self, resolution: &Resolution, message: &str, history: &[HistoryEntry]) -> String {
        let mut action = Action::parse(&resolution.action);
        if !action.is_known() {
            // Padrões com ação desconhecida usam a heurística para a própria mensagem
            match self.fallback.classify(message) {
                Some(fallback) => action = Action::parse(&fallback.action),
                None => return HELP_TEXT.to_string(),
            }
        }

        let serials = if action == Action::FindWorkerBySerial {
            self.serial_candidates(message, history)
        } else {
            Vec::new()
        };

        match actions::execute(&action, &serials, self.directory.as_ref()).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(action = %action, error = %e, "Action failed");
                ERROR_TEXT.to_string()
            }
        }
    }

    /// Séries da mensagem ou, na falta delas, do turno mais recente do histórico que cite uma.
    fn serial_candidates(&self, message: &str, history: &[HistoryEntry]) -> Vec<String> {
        let serials = actions::extract_serials(message);
        if !serials.is_empty() {
            return serials;
        }

        history
            .iter()
            .rev()
            .take(self.config.history_window)
            .map(|entry| actions::extract_serials(&entry.text))
            .find(|serials| !serials.is_empty())
            .unwrap_or_default()
    }

    async fn after_dispatch(&self, resolution: &Resolution, message: &str, response: &str) {
        match resolution.source {
            ResolutionSource::Learned => self.persist_periodically().await,
            ResolutionSource::Heuristic => {
                // Só aprende quando a resposta confirma a intenção resolvida
                if actions::infer_intent(message, response) != Some(resolution.intent.as_str()) {
                    return;
                }
                let outcome = self.engine.write().await.learn(
                    message,
                    &resolution.intent,
                    &resolution.action,
                    None,
                );
                if outcome.created {
                    self.persist_now().await;
                } else {
                    self.persist_periodically().await;
                }
            }
            ResolutionSource::Unresolved => {}
        }
    }

    /// Aplica feedback ao padrão mais próximo da mensagem e agenda a gravação.
    pub async fn feedback(&self, message: &str, success: bool) -> Option<FeedbackOutcome> {
        let applied = self.engine.write().await.feedback(message, success);
        if applied.is_some() {
            self.persist_now().await;
        }
        applied
    }

    async fn persist_now(&self) {
        if let Some(writer) = &self.writer {
            self.unsaved.store(0, Ordering::SeqCst);
            let snapshot = self.engine.read().await.snapshot();
            if !writer.schedule(snapshot) {
                tracing::warn!("Snapshot writer is not running");
            }
        }
    }

    async fn persist_periodically(&self) {
        let Some(writer) = &self.writer else {
            return;
        };
        if self.save_every == 0 {
            return;
        }

        let pending = self.unsaved.fetch_add(1, Ordering::SeqCst) + 1;
        if pending < self.save_every {
            return;
        }

        self.unsaved.store(0, Ordering::SeqCst);
        let snapshot = self.engine.read().await.snapshot();
        if !writer.schedule(snapshot) {
            tracing::warn!("Snapshot writer is not running");
        }
    }

    /// Agenda o estado atual e espera a gravação terminar.
    pub async fn persist(&self) {
        self.persist_now().await;
        self.flush().await;
    }

    /// Espera as gravações pendentes.
    pub async fn flush(&self) {
        if let Some(writer) = &self.writer {
            writer.flush().await;
        }
    }

    /// Motor compartilhado.
    pub fn engine(&self) -> Arc<RwLock<IntentEngine>> {
        self.engine.clone()
    }

    pub async fn statistics(&self) -> EngineStatistics {
        self.engine.read().await.statistics()
    }
}
