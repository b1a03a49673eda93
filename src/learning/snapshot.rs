//! Snapshot versionado do conhecimento aprendido.
//!
//! Formato JSON com marcador `schema_version`. Arquivos sem o marcador são
//! lidos como schema 0 e migrados; versões futuras são recusadas.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{MotrizError, MotrizResult};

use super::store::{Pattern, PatternStore};

/// Versão atual do schema do snapshot.
pub const SCHEMA_VERSION: u32 = 1;

/// Representação persistida do estado completo do motor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub schema_version: u32,
    #[serde(default = "Utc::now")]
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub patterns: Vec<Pattern>,
    #[serde(default)]
    pub keyword_weights: HashMap<String, f64>,
}

impl Snapshot {
    /// Captura o estado atual do store.
    pub fn capture(store: &PatternStore) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            saved_at: Utc::now(),
            patterns: store.patterns().to_vec(),
            keyword_weights: store.keyword_weights().clone(),
        }
    }

    /// Converte o snapshot de volta em um store (valores saneados, índice reconstruído).
    pub fn into_store(self) -> PatternStore {
        PatternStore::from_parts(self.patterns, self.keyword_weights)
    }

    /// Interpreta o conteúdo de um snapshot, migrando versões antigas.
    pub fn parse(content: &str) -> MotrizResult<Self> {
        Self::parse_bytes(content.as_bytes())
    }

    /// Como `parse`, sobre bytes crus. UTF-8 inválido vira erro de JSON.
    pub fn parse_bytes(content: &[u8]) -> MotrizResult<Self> {
        let value: Value = serde_json::from_slice(content)?;
        let value = migrate(value)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Lê um snapshot do disco.
    pub fn read_from(path: &Path) -> MotrizResult<Self> {
        let content = std::fs::read(path)?;
        Self::parse_bytes(&content)
    }

    /// Grava o snapshot em `<path>.tmp` e renomeia sobre o destino.
    pub fn write_atomic(&self, path: &Path) -> MotrizResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(self)?;
        let tmp_path = path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, path)?;

        tracing::debug!(
            path = %path.display(),
            patterns = self.patterns.len(),
            "Snapshot written"
        );

        Ok(())
    }
}

/// Leva um documento JSON de qualquer versão conhecida até `SCHEMA_VERSION`.
fn migrate(mut value: Value) -> MotrizResult<Value> {
    let object = value
        .as_object_mut()
        .ok_or_else(|| MotrizError::CorruptSnapshot("documento não é um objeto JSON".into()))?;

    let found = match object.get("schema_version") {
        None => 0,
        Some(version) => version
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| MotrizError::CorruptSnapshot("schema_version inválido".into()))?,
    };

    if found > SCHEMA_VERSION {
        return Err(MotrizError::UnsupportedSchema {
            found,
            supported: SCHEMA_VERSION,
        });
    }

    if found == 0 {
        // Schema 0: mesmos campos, sem versão e com `timestamp` no lugar de `saved_at`
        if !object.contains_key("saved_at") {
            if let Some(timestamp) = object.remove("timestamp") {
                object.insert("saved_at".into(), timestamp);
            }
        }
        object.insert("schema_version".into(), Value::from(SCHEMA_VERSION));
        tracing::info!(from = found, to = SCHEMA_VERSION, "Snapshot migrated");
    }

    Ok(value)
}

/// Move um snapshot ilegível para `<nome>.corrupt-<timestamp>`.
pub fn quarantine(path: &Path) -> MotrizResult<PathBuf> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "snapshot".to_string());
    let target = path.with_file_name(format!(
        "{}.corrupt-{}",
        file_name,
        Utc::now().format("%Y%m%d%H%M%S")
    ));

    std::fs::rename(path, &target)?;
    Ok(target)
}
