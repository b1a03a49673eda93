//! Ações de domínio despachadas após a resolução de intenção.
//!
//! Cada ação consulta o [`EquipmentDirectory`] e formata a resposta em
//! espanhol para o usuário final.

use std::fmt::Write as _;

use crate::learning::{FIND_WORKER, LIST_ALL, LIST_AVAILABLE, LIST_LOANED};
use crate::MotrizResult;

use super::directory::{Equipment, EquipmentDirectory, EquipmentRecord};

/// Palavras em maiúsculas que nunca são tratadas como série.
const NON_SERIAL_WORDS: &[&str] = &[
    "NOTEBOOK",
    "LAPTOP",
    "IPHONE",
    "TABLET",
    "SERIE",
    "TRABAJADOR",
    "EQUIPO",
];

/// Tamanho mínimo de uma série (após remover hífens).
const MIN_SERIAL_LEN: usize = 4;

pub const SERIAL_NOT_FOUND: &str =
    "No pude encontrar la serie del equipo en tu mensaje. ¿Podrías especificarla?";

pub const HELP_TEXT: &str = "No entendí tu consulta. Puedo ayudarte con:\n\
    • Equipos disponibles\n\
    • Préstamos activos\n\
    • Buscar trabajadores\n\
    • Estadísticas\n\
    • Buscar equipos por serie\n\n\
    Intenta reformular tu pregunta.";

pub const ERROR_TEXT: &str =
    "Lo siento, hubo un error al procesar tu consulta. Por favor intenta de nuevo.";

/// Ação identificada pelo nome armazenado no padrão.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    FindWorkerBySerial,
    ListAvailable,
    ListLoaned,
    ListAll,
    /// Ação desconhecida (ex.: padrões aprendidos por outro processador).
    Other(String),
}

impl Action {
    /// Interpreta um identificador de ação.
    pub fn parse(id: &str) -> Self {
        match id {
            FIND_WORKER => Action::FindWorkerBySerial,
            LIST_AVAILABLE => Action::ListAvailable,
            LIST_LOANED => Action::ListLoaned,
            LIST_ALL => Action::ListAll,
            other => Action::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Action::FindWorkerBySerial => FIND_WORKER,
            Action::ListAvailable => LIST_AVAILABLE,
            Action::ListLoaned => LIST_LOANED,
            Action::ListAll => LIST_ALL,
            Action::Other(id) => id,
        }
    }

    /// Se a ação tem implementação própria.
    pub fn is_known(&self) -> bool {
        !matches!(self, Action::Other(_))
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Executa uma ação conhecida. `serials` são os candidatos já extraídos.
///
/// Ações `Other` não têm execução própria e retornam o texto de ajuda.
pub async fn execute(
    action: &Action,
    serials: &[String],
    directory: &dyn EquipmentDirectory,
) -> MotrizResult<String> {
    match action {
        Action::FindWorkerBySerial => find_worker_by_serial(serials, directory).await,
        Action::ListAvailable => Ok(format_available(&directory.list_available_equipment().await?)),
        Action::ListLoaned => Ok(format_loaned(&directory.list_loaned_equipment().await?)),
        Action::ListAll => Ok(format_all(&directory.list_all_equipment().await?)),
        Action::Other(_) => Ok(HELP_TEXT.to_string()),
    }
}

async fn find_worker_by_serial(
    serials: &[String],
    directory: &dyn EquipmentDirectory,
) -> MotrizResult<String> {
    for serial in serials {
        if let Some(record) = directory.find_equipment_by_serial(serial).await? {
            return Ok(format_holder(&record));
        }
    }
    Ok(SERIAL_NOT_FOUND.to_string())
}

// ═══════════════════════════════════════════════════════════════════════════
// Extração de séries
// ═══════════════════════════════════════════════════════════════════════════

/// Candidatos a série em uma mensagem, em ordem de prioridade.
///
/// Primeiro a palavra após "serie"; depois qualquer sequência `[A-Z0-9-]`
/// com pelo menos um dígito. Hífens são removidos, resultados com menos de
/// 4 caracteres e palavras comuns de equipamento são descartados.
pub fn extract_serials(message: &str) -> Vec<String> {
    let upper = message.to_uppercase();
    let mut raw = Vec::new();

    if let Some(after) = serial_after_keyword(&upper) {
        raw.push(after);
    }

    raw.extend(
        upper
            .split(|c: char| !is_serial_char(c))
            .filter(|run| run.chars().any(|c| c.is_ascii_digit()))
            .map(str::to_string),
    );

    let mut serials: Vec<String> = Vec::new();
    for candidate in raw {
        let cleaned: String = candidate.chars().filter(|c| *c != '-').collect();
        if cleaned.len() >= MIN_SERIAL_LEN
            && !NON_SERIAL_WORDS.contains(&cleaned.as_str())
            && !serials.contains(&cleaned)
        {
            serials.push(cleaned);
        }
    }
    serials
}

fn is_serial_char(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-'
}

/// Token `[A-Z0-9-]+` logo após a primeira ocorrência de "SERIE" seguida de espaço.
fn serial_after_keyword(upper: &str) -> Option<String> {
    let mut rest = upper;
    while let Some(pos) = rest.find("SERIE") {
        let after = &rest[pos + "SERIE".len()..];
        let trimmed = after.trim_start();
        if trimmed.len() < after.len() {
            let token: String = trimmed
                .chars()
                .take_while(|c| is_serial_char(*c))
                .collect();
            if !token.is_empty() {
                return Some(token);
            }
        }
        rest = after;
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
// Formatação
// ═══════════════════════════════════════════════════════════════════════════

/// Resposta para "quem tem o equipamento X".
pub fn format_holder(record: &EquipmentRecord) -> String {
    let eq = &record.equipment;
    match &record.assigned_to {
        Some(worker) => format!(
            "El equipo {} con serie **{}** ({} {}) está prestado a:\n\n• **{}**\n• RUT: {}\n• Obra: {}",
            eq.kind, eq.serial, eq.brand, eq.model, worker.name, worker.rut, worker.site
        ),
        None => format!(
            "El equipo {} con serie **{}** ({} {}) está **disponible** y no está asignado a ningún trabajador.",
            eq.kind, eq.serial, eq.brand, eq.model
        ),
    }
}

/// Agrupa itens por tipo, preservando a ordem da primeira aparição.
fn group_by_kind<'a, T>(
    items: &'a [T],
    equipment: impl Fn(&T) -> &Equipment,
) -> Vec<(&'a str, Vec<&'a T>)> {
    let mut groups: Vec<(&str, Vec<&T>)> = Vec::new();
    for item in items {
        let kind = equipment(item).kind_label();
        match groups.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, members)) => members.push(item),
            None => groups.push((kind, vec![item])),
        }
    }
    groups
}

pub fn format_available(equipment: &[Equipment]) -> String {
    if equipment.is_empty() {
        return "No hay equipos disponibles en este momento.".to_string();
    }

    let mut out = format!("Hay {} equipos disponibles:\n\n", equipment.len());
    for (kind, members) in group_by_kind(equipment, |e| e) {
        let _ = writeln!(out, "📦 {} ({} disponibles):", kind, members.len());
        for eq in members {
            let _ = writeln!(out, "   • Serie: {} - {}", eq.serial, eq.brand_model());
        }
        out.push('\n');
    }
    out.trim().to_string()
}

pub fn format_loaned(records: &[EquipmentRecord]) -> String {
    if records.is_empty() {
        return "No hay equipos prestados en este momento.".to_string();
    }

    let mut out = format!("Hay {} equipos prestados:\n\n", records.len());
    for (kind, members) in group_by_kind(records, |r| &r.equipment) {
        let _ = writeln!(out, "📦 {} ({} prestados):", kind, members.len());
        for record in members {
            let eq = &record.equipment;
            let _ = write!(out, "   • Serie: {} - {}", eq.serial, eq.brand_model());
            if let Some(worker) = &record.assigned_to {
                let _ = write!(out, " | Prestado a: {} (Obra: {})", worker.name, worker.site);
            }
            out.push('\n');
        }
        out.push('\n');
    }
    out.trim().to_string()
}

pub fn format_all(records: &[EquipmentRecord]) -> String {
    if records.is_empty() {
        return "No hay equipos en el sistema.".to_string();
    }

    let mut out = format!("Hay {} equipos en total:\n\n", records.len());
    for (kind, members) in group_by_kind(records, |r| &r.equipment) {
        let _ = writeln!(out, "📦 {} ({} en total):", kind, members.len());
        for record in members {
            let eq = &record.equipment;
            let status = if record.is_assigned() {
                "ASIGNADO"
            } else {
                "DISPONIBLE"
            };
            let _ = writeln!(
                out,
                "   • Serie: {} - {} | Estado: {}",
                eq.serial,
                eq.brand_model(),
                status
            );
        }
        out.push('\n');
    }
    out.trim().to_string()
}

/// Intenção deduzida do texto de uma resposta já formatada.
pub fn infer_intent(message: &str, response: &str) -> Option<&'static str> {
    let message = message.to_lowercase();
    let response = response.to_lowercase();

    let holder_answer = response.contains("está prestado a")
        || response.contains("no está asignado a ningún trabajador");
    if holder_answer || (response.contains("trabajador") && message.contains("serie")) {
        Some(crate::learning::WHO_HAS)
    } else if response.contains("disponibles") || response.contains("libres") {
        Some(crate::learning::AVAILABLE)
    } else if response.contains("prestados") || response.contains("asignados") {
        Some(crate::learning::LOANED)
    } else if response.contains("total") {
        Some(crate::learning::TOTAL)
    } else {
        None
    }
}
