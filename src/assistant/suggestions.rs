//! Sugestões de próximas perguntas.

const EQUIPMENT_SUGGESTIONS: &[&str] = &[
    "¿Qué equipos están disponibles?",
    "¿Cuántos equipos hay en total?",
];

const WORKER_SUGGESTIONS: &[&str] = &["Buscar trabajador por nombre", "Ver trabajadores activos"];

const DEFAULT_SUGGESTIONS: &[&str] = &[
    "¿Qué equipos están disponibles?",
    "¿Cuántos préstamos activos hay?",
    "Ver estadísticas del sistema",
];

/// Sugestões para a mensagem, no máximo `max`.
pub fn suggestions_for(message: &str, max: usize) -> Vec<String> {
    let lowered = message.to_lowercase();
    let mut suggestions: Vec<&str> = Vec::new();

    if lowered.contains("equipo") {
        suggestions.extend(EQUIPMENT_SUGGESTIONS);
    }
    if lowered.contains("trabajador") {
        suggestions.extend(WORKER_SUGGESTIONS);
    }
    if suggestions.is_empty() {
        suggestions.extend(DEFAULT_SUGGESTIONS);
    }

    suggestions.into_iter().take(max).map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equipment_suggestions() {
        let suggestions = suggestions_for("Equipos libres", 3);
        assert_eq!(suggestions, vec![EQUIPMENT_SUGGESTIONS[0], EQUIPMENT_SUGGESTIONS[1]]);
    }

    #[test]
    fn test_equipment_and_worker_are_capped() {
        let suggestions = suggestions_for("que trabajador tiene el equipo", 3);
        assert_eq!(suggestions.len(), 3);
        assert_eq!(suggestions[2], "Buscar trabajador por nombre");
    }

    #[test]
    fn test_default_suggestions() {
        assert_eq!(suggestions_for("hola", 3).len(), 3);
        assert_eq!(suggestions_for("hola", 1), vec!["¿Qué equipos están disponibles?"]);
        assert!(suggestions_for("hola", 0).is_empty());
    }
}
