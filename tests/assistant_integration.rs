//! Testes de integração para o assistente de chat do Motriz.

use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;

use motriz::assistant::{Assistant, InMemoryDirectory, Inventory, HELP_TEXT, SERIAL_NOT_FOUND};
use motriz::learning::{IntentEngine, Snapshot, LIST_LOANED, LOANED, WHO_HAS};
use motriz::persistence::SnapshotWriter;
use motriz::resolver::{IntentResolver, Resolution, ResolverChain};
use motriz::types::config::{AssistantConfig, Config, LearningConfig, PersistenceConfig};
use motriz::types::requests::{ChatRequest, HistoryEntry};
use motriz::types::responses::ResolutionSource;
use motriz::MotrizError;

const INVENTORY: &str = r#"{
    "equipment": [
        {"serial": "AB-1234", "brand": "Lenovo", "model": "T14", "type": "Notebook", "status": "OPERATIVO"},
        {"serial": "MP1D2AEJ", "brand": "HP", "model": "ProBook", "type": "Notebook", "status": "OPERATIVO"},
        {"serial": "PC-9000", "brand": "Dell", "model": "Optiplex", "type": "PC", "status": "OPERATIVO"},
        {"serial": "OLD-0001", "brand": "Acer", "model": "", "type": "PC", "status": "BAJA"}
    ],
    "workers": [
        {"rut": "11.111.111-1", "name": "Ana Pérez", "site": "Obra Norte"}
    ],
    "loans": [
        {"serial": "AB-1234", "rut": "11.111.111-1", "status": "ASIGNADO"}
    ]
}"#;

fn inventory_directory() -> Arc<InMemoryDirectory> {
    let inventory: Inventory = serde_json::from_str(INVENTORY).expect("Invalid inventory");
    Arc::new(InMemoryDirectory::new(inventory).expect("Inconsistent inventory"))
}

fn baseline_engine() -> IntentEngine {
    let mut engine = IntentEngine::new(LearningConfig::default());
    engine.bootstrap_baseline();
    engine
}

fn create_assistant() -> Assistant {
    Assistant::new(baseline_engine(), inventory_directory(), AssistantConfig::default())
}

fn create_persistent_assistant(save_every: u64) -> (Assistant, TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("knowledge.json");
    let persistence = PersistenceConfig {
        snapshot_path: path.clone(),
        ..PersistenceConfig::default()
    };

    let assistant = create_assistant().with_writer(SnapshotWriter::spawn(&persistence), save_every);
    (assistant, temp_dir, path)
}

/// Resolvedor que sempre devolve a mesma resolução heurística.
struct FixedResolver {
    intent: &'static str,
    action: &'static str,
}

#[async_trait]
impl IntentResolver for FixedResolver {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn resolve(&self, _message: &str) -> Option<Resolution> {
        Some(Resolution {
            intent: self.intent.to_string(),
            action: self.action.to_string(),
            score: 0.0,
            source: ResolutionSource::Heuristic,
            pattern: None,
        })
    }
}

// Fluxo básico do chat
mod chat_flow_tests {
    use super::*;

    #[tokio::test]
    async fn test_learned_available_listing() {
        let assistant = create_assistant();
        let response = assistant.chat(ChatRequest::new("equipos libres")).await.unwrap();

        assert_eq!(response.source, ResolutionSource::Learned);
        assert!(response.response.starts_with("Hay 2 equipos disponibles"));
        assert!(response.response.contains("MP1D2AEJ"));
        assert!(response.response.contains("PC-9000"));
        // Equipamento em baixa e emprestado não aparecem
        assert!(!response.response.contains("OLD-0001"));
        assert!(!response.response.contains("AB-1234"));
    }

    #[tokio::test]
    async fn test_total_listing_marks_assigned() {
        let assistant = create_assistant();
        let response = assistant
            .chat(ChatRequest::new("cuantos equipos hay en total"))
            .await
            .unwrap();

        assert!(response.response.starts_with("Hay 3 equipos en total"));
        assert!(response.response.contains("AB-1234 - Lenovo T14 | Estado: ASIGNADO"));
        assert!(response.response.contains("PC-9000 - Dell Optiplex | Estado: DISPONIBLE"));
        assert!(!response.response.contains("OLD-0001"));
    }

    #[tokio::test]
    async fn test_who_has_with_hyphenated_serial() {
        let assistant = create_assistant();
        let response = assistant
            .chat(ChatRequest::new("quien tiene el notebook serie AB-1234"))
            .await
            .unwrap();

        assert_eq!(response.intent.as_deref(), Some(WHO_HAS));
        assert!(response.response.contains("Ana Pérez"));
        assert!(response.response.contains("Obra Norte"));
    }

    #[tokio::test]
    async fn test_unknown_serial() {
        let assistant = create_assistant();
        let response = assistant
            .chat(ChatRequest::new("quien tiene el notebook con la serie ZZ9999"))
            .await
            .unwrap();

        assert_eq!(response.response, SERIAL_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unresolved_message() {
        let assistant = create_assistant();
        let response = assistant.chat(ChatRequest::new("hola")).await.unwrap();

        assert_eq!(response.source, ResolutionSource::Unresolved);
        assert_eq!(response.response, HELP_TEXT);
        assert!(response.intent.is_none());
        assert_eq!(response.score, 0.0);
    }

    #[tokio::test]
    async fn test_blank_message_rejected() {
        let assistant = create_assistant();
        let result = assistant.chat(ChatRequest::new("\n\t ")).await;
        assert!(matches!(result, Err(MotrizError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_serial_from_history() {
        let assistant = create_assistant();
        let request = ChatRequest::new("quien tiene ese equipo").with_history(vec![
            HistoryEntry::user("necesito el PC-9000 para mañana"),
            HistoryEntry::assistant("Anotado."),
            HistoryEntry::user("y el notebook AB-1234?"),
        ]);

        let response = assistant.chat(request).await.unwrap();
        assert_eq!(response.source, ResolutionSource::Heuristic);
        assert!(response.response.contains("Ana Pérez"));
    }
}

// Aprendizado a partir do fallback heurístico
mod learning_tests {
    use super::*;

    #[tokio::test]
    async fn test_heuristic_hit_is_learned() {
        let assistant = create_assistant();
        let message = "necesito saber cuales notebooks estan ocupados hoy por la cuadrilla";

        let first = assistant.chat(ChatRequest::new(message)).await.unwrap();
        assert_eq!(first.source, ResolutionSource::Heuristic);
        assert_eq!(first.intent.as_deref(), Some(LOANED));
        assert_eq!(assistant.statistics().await.total_patterns, 13);

        let second = assistant.chat(ChatRequest::new(message)).await.unwrap();
        assert_eq!(second.source, ResolutionSource::Learned);
        assert_eq!(second.intent.as_deref(), Some(LOANED));
        assert_eq!(second.response, first.response);
    }

    #[tokio::test]
    async fn test_unconfirmed_heuristic_is_not_learned() {
        // Sem inventário, a resposta não confirma a intenção
        let assistant = Assistant::new(
            baseline_engine(),
            Arc::new(InMemoryDirectory::empty()),
            AssistantConfig::default(),
        );
        let response = assistant
            .chat(ChatRequest::new("quien tiene ese equipo"))
            .await
            .unwrap();

        assert_eq!(response.response, SERIAL_NOT_FOUND);
        assert_eq!(assistant.statistics().await.total_patterns, 12);
    }

    #[tokio::test]
    async fn test_mismatched_heuristic_intent_is_not_learned() {
        // A intenção diz "quem tem", mas a resposta é a listagem de emprestados
        let chain = ResolverChain::new().with(FixedResolver {
            intent: WHO_HAS,
            action: LIST_LOANED,
        });
        let assistant = create_assistant().with_chain(chain);

        let response = assistant
            .chat(ChatRequest::new("quien anda con los notebooks de la obra"))
            .await
            .unwrap();

        assert!(response.response.contains("Prestado a: Ana Pérez"));
        assert_eq!(assistant.statistics().await.total_patterns, 12);
    }

    #[tokio::test]
    async fn test_matching_heuristic_intent_is_learned() {
        let chain = ResolverChain::new().with(FixedResolver {
            intent: LOANED,
            action: LIST_LOANED,
        });
        let assistant = create_assistant().with_chain(chain);

        assistant
            .chat(ChatRequest::new("quien anda con los notebooks de la obra"))
            .await
            .unwrap();

        let engine = assistant.engine();
        let engine = engine.read().await;
        let learned = engine
            .patterns()
            .iter()
            .find(|p| p.text == "quien anda con los notebooks de la obra")
            .expect("Pattern should be learned");
        assert_eq!(learned.intent, LOANED);
    }

    #[tokio::test]
    async fn test_feedback_in_request() {
        let assistant = create_assistant();
        let engine = assistant.engine();

        assistant
            .chat(ChatRequest::new("equipos prestados").with_feedback(false))
            .await
            .unwrap();

        let engine = engine.read().await;
        let pattern = engine
            .patterns()
            .iter()
            .find(|p| p.text == "equipos prestados")
            .unwrap();
        assert!(!pattern.success);
        assert!((pattern.confidence - 0.9).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_concurrent_chats_share_engine() {
        let assistant = create_assistant();

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let assistant = assistant.clone();
                tokio::spawn(async move { assistant.chat(ChatRequest::new("equipos libres")).await })
            })
            .collect();

        for handle in handles {
            let response = handle.await.unwrap().unwrap();
            assert_eq!(response.source, ResolutionSource::Learned);
        }

        let engine = assistant.engine();
        let engine = engine.read().await;
        let pattern = engine
            .patterns()
            .iter()
            .find(|p| p.text == "equipos libres")
            .unwrap();
        assert_eq!(pattern.usage_count, 11);
        assert_eq!(pattern.confidence, 1.0);
    }
}

// Persistência pelo gravador em segundo plano
mod persistence_tests {
    use super::*;

    #[tokio::test]
    async fn test_new_pattern_is_written() {
        let (assistant, _temp_dir, path) = create_persistent_assistant(1000);

        assistant
            .chat(ChatRequest::new(
                "necesito saber cuales notebooks estan ocupados hoy por la cuadrilla",
            ))
            .await
            .unwrap();
        assistant.flush().await;

        let snapshot = Snapshot::read_from(&path).unwrap();
        assert_eq!(snapshot.patterns.len(), 13);
    }

    #[tokio::test]
    async fn test_persist_writes_current_state() {
        let (assistant, _temp_dir, path) = create_persistent_assistant(1000);

        assistant.chat(ChatRequest::new("equipos libres")).await.unwrap();
        // Learned com save_every alto: nada agendado ainda
        assistant.flush().await;
        assert!(!path.exists());

        assistant.persist().await;
        let snapshot = Snapshot::read_from(&path).unwrap();
        let pattern = snapshot
            .patterns
            .iter()
            .find(|p| p.text == "equipos libres")
            .unwrap();
        assert_eq!(pattern.usage_count, 2);
    }

    #[tokio::test]
    async fn test_learned_hits_saved_every_n() {
        let (assistant, _temp_dir, path) = create_persistent_assistant(2);

        assistant.chat(ChatRequest::new("equipos libres")).await.unwrap();
        assistant.flush().await;
        assert!(!path.exists());

        assistant.chat(ChatRequest::new("equipos libres")).await.unwrap();
        assistant.flush().await;
        let snapshot = Snapshot::read_from(&path).unwrap();
        let pattern = snapshot
            .patterns
            .iter()
            .find(|p| p.text == "equipos libres")
            .unwrap();
        assert_eq!(pattern.usage_count, 3);
    }

    #[tokio::test]
    async fn test_concurrent_learned_hits_reach_threshold() {
        let (assistant, _temp_dir, path) = create_persistent_assistant(4);

        // Gerações concorrentes não podem pular o múltiplo de save_every
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let assistant = assistant.clone();
                tokio::spawn(async move { assistant.chat(ChatRequest::new("equipos libres")).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assistant.flush().await;

        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_from_config_with_inventory_file() {
        let temp_dir = TempDir::new().unwrap();
        let inventory_path = temp_dir.path().join("inventory.json");
        std::fs::write(&inventory_path, INVENTORY).unwrap();

        let mut config = Config::default_config();
        config.persistence.snapshot_path = temp_dir.path().join("knowledge.json");
        config.assistant.inventory_path = Some(inventory_path);

        let assistant = Assistant::from_config(&config).unwrap();
        let response = assistant.chat(ChatRequest::new("equipos prestados")).await.unwrap();
        assert!(response.response.starts_with("Hay 1 equipos prestados"));

        assistant.persist().await;
        assert!(config.persistence.snapshot_path.exists());
    }
}
