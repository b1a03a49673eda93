//! Gravador de snapshots em segundo plano.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use crate::learning::Snapshot;
use crate::types::config::PersistenceConfig;

enum Command {
    Write(Arc<Snapshot>),
    Flush(oneshot::Sender<()>),
}

/// Handle para a tarefa que grava snapshots.
///
/// Clonar o handle compartilha a mesma tarefa. Snapshots enfileirados são
/// coalescidos: apenas o mais recente é gravado.
#[derive(Clone)]
pub struct SnapshotWriter {
    tx: mpsc::UnboundedSender<Command>,
    path: PathBuf,
}

impl SnapshotWriter {
    /// Inicia a tarefa de gravação. Precisa de um runtime tokio ativo.
    pub fn spawn(config: &PersistenceConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let path = config.snapshot_path.clone();

        let worker = Worker {
            path: path.clone(),
            retry_attempts: config.retry_attempts,
            backoff: Duration::from_millis(config.retry_backoff_ms),
        };
        tokio::spawn(worker.run(rx));

        Self { tx, path }
    }

    /// Enfileira um snapshot. Retorna `false` se a tarefa já terminou.
    pub fn schedule(&self, snapshot: Snapshot) -> bool {
        self.tx.send(Command::Write(Arc::new(snapshot))).is_ok()
    }

    /// Espera todas as gravações enfileiradas até aqui.
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(Command::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.await;
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

struct Worker {
    path: PathBuf,
    retry_attempts: u32,
    backoff: Duration,
}

impl Worker {
    async fn run(self, mut rx: mpsc::UnboundedReceiver<Command>) {
        while let Some(command) = rx.recv().await {
            let mut latest = None;
            let mut waiters = Vec::new();

            match command {
                Command::Write(snapshot) => latest = Some(snapshot),
                Command::Flush(ack) => waiters.push(ack),
            }

            // Coalesce tudo o que já está na fila
            while let Ok(next) = rx.try_recv() {
                match next {
                    Command::Write(snapshot) => latest = Some(snapshot),
                    Command::Flush(ack) => waiters.push(ack),
                }
            }

            if let Some(snapshot) = latest {
                self.write_with_retry(snapshot).await;
            }

            for ack in waiters {
                let _ = ack.send(());
            }
        }

        tracing::debug!(path = %self.path.display(), "Snapshot writer stopped");
    }

    async fn write_with_retry(&self, snapshot: Arc<Snapshot>) -> bool {
        let attempts = self.retry_attempts + 1;

        for attempt in 1..=attempts {
            let path = self.path.clone();
            let pending = Arc::clone(&snapshot);
            let result = tokio::task::spawn_blocking(move || pending.write_atomic(&path)).await;

            match result {
                Ok(Ok(())) => {
                    tracing::info!(
                        path = %self.path.display(),
                        patterns = snapshot.patterns.len(),
                        "Knowledge saved"
                    );
                    return true;
                }
                Ok(Err(e)) => {
                    tracing::warn!(attempt = attempt, error = %e, "Snapshot write failed");
                }
                Err(e) => {
                    tracing::warn!(attempt = attempt, error = %e, "Snapshot write task failed");
                }
            }

            if attempt < attempts {
                tokio::time::sleep(self.backoff).await;
            }
        }

        tracing::error!(
            path = %self.path.display(),
            attempts = attempts,
            "Giving up on snapshot write"
        );
        false
    }
}
