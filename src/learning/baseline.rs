//! Conhecimento inicial e exemplos de treino.
//!
//! `BASELINE` semeia um motor vazio; `TRAINING_EXAMPLES` é o conjunto usado
//! pelo comando `train` quando nenhum arquivo é informado.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::MotrizResult;

/// Um exemplo (texto, intenção, ação) estático.
#[derive(Debug, Clone, Copy)]
pub struct Seed {
    pub text: &'static str,
    pub intent: &'static str,
    pub action: &'static str,
}

const fn seed(text: &'static str, intent: &'static str, action: &'static str) -> Seed {
    Seed {
        text,
        intent,
        action,
    }
}

/// Intenção: quem tem um equipamento.
pub const WHO_HAS: &str = "quien_tiene_equipo";
/// Ação: buscar o trabalhador pela série.
pub const FIND_WORKER: &str = "buscar_trabajador_por_serie";
pub const AVAILABLE: &str = "equipos_disponibles";
pub const LIST_AVAILABLE: &str = "listar_equipos_disponibles";
pub const LOANED: &str = "equipos_prestados";
pub const LIST_LOANED: &str = "listar_equipos_prestados";
pub const TOTAL: &str = "total_equipos";
pub const LIST_ALL: &str = "listar_todos_equipos";

/// Padrões curados inseridos quando o store está vazio após o load.
pub const BASELINE: &[Seed] = &[
    seed("quien tiene el notebook con la serie", WHO_HAS, FIND_WORKER),
    seed("que trabajador tiene el equipo con serie", WHO_HAS, FIND_WORKER),
    seed("a quien se le asigno el equipo con serie", WHO_HAS, FIND_WORKER),
    seed("quien tiene el pc con serie", WHO_HAS, FIND_WORKER),
    seed("equipos disponibles", AVAILABLE, LIST_AVAILABLE),
    seed("que equipos hay disponibles", AVAILABLE, LIST_AVAILABLE),
    seed("equipos libres", AVAILABLE, LIST_AVAILABLE),
    seed("equipos prestados", LOANED, LIST_LOANED),
    seed("equipos asignados", LOANED, LIST_LOANED),
    seed("equipos ocupados", LOANED, LIST_LOANED),
    seed("total equipos", TOTAL, LIST_ALL),
    seed("cuantos equipos hay en total", TOTAL, LIST_ALL),
];

/// Conjunto de treino padrão.
pub const TRAINING_EXAMPLES: &[Seed] = &[
    seed("quien tiene el notebook con la serie MP1D2AEJ", WHO_HAS, FIND_WORKER),
    seed("que trabajador tiene el pc con serie ABC123", WHO_HAS, FIND_WORKER),
    seed("a quien se le asigno el equipo con serie XYZ789", WHO_HAS, FIND_WORKER),
    seed("quien tiene el laptop con la serie DEF456", WHO_HAS, FIND_WORKER),
    seed("que trabajador tiene el notebook MP1D2AEJ", WHO_HAS, FIND_WORKER),
    seed("a quien se le asigno el pc ABC123", WHO_HAS, FIND_WORKER),
    seed("equipos disponibles", AVAILABLE, LIST_AVAILABLE),
    seed("que equipos hay disponibles", AVAILABLE, LIST_AVAILABLE),
    seed("equipos libres", AVAILABLE, LIST_AVAILABLE),
    seed("hay equipos disponibles", AVAILABLE, LIST_AVAILABLE),
    seed("mostrar equipos disponibles", AVAILABLE, LIST_AVAILABLE),
    seed("listar equipos disponibles", AVAILABLE, LIST_AVAILABLE),
    seed("que hay disponible", AVAILABLE, LIST_AVAILABLE),
    seed("equipos prestados", LOANED, LIST_LOANED),
    seed("equipos asignados", LOANED, LIST_LOANED),
    seed("equipos ocupados", LOANED, LIST_LOANED),
    seed("equipos en préstamo", LOANED, LIST_LOANED),
    seed("que equipos estan prestados", LOANED, LIST_LOANED),
    seed("que equipos están asignados", LOANED, LIST_LOANED),
    seed("mostrar equipos prestados", LOANED, LIST_LOANED),
    seed("total equipos", TOTAL, LIST_ALL),
    seed("equipos en total", TOTAL, LIST_ALL),
    seed("cuantos equipos hay", TOTAL, LIST_ALL),
    seed("cuántos equipos hay en total", TOTAL, LIST_ALL),
    seed("todos los equipos", TOTAL, LIST_ALL),
    seed("listar todos los equipos", TOTAL, LIST_ALL),
];

/// Exemplo de treino com dono (carregado de arquivo).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub text: String,
    pub intent: String,
    pub action: String,
}

impl From<&Seed> for TrainingExample {
    fn from(seed: &Seed) -> Self {
        Self {
            text: seed.text.to_string(),
            intent: seed.intent.to_string(),
            action: seed.action.to_string(),
        }
    }
}

/// Exemplos de treino padrão como valores com dono.
pub fn default_training_examples() -> Vec<TrainingExample> {
    TRAINING_EXAMPLES.iter().map(TrainingExample::from).collect()
}

/// Carrega exemplos de treino de um arquivo JSON (lista de `{text, intent, action}`).
pub fn load_training_examples(path: &Path) -> MotrizResult<Vec<TrainingExample>> {
    let content = std::fs::read_to_string(path)?;
    let examples: Vec<TrainingExample> = serde_json::from_str(&content)?;
    Ok(examples)
}
