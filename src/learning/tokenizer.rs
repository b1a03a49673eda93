//! Normalização e tokenização de texto.
//!
//! Funções puras e determinísticas: caixa baixa, pontuação vira espaço,
//! tokens com até 2 caracteres e stopwords são descartados.

use std::collections::HashSet;

/// Palavras funcionais ignoradas na tokenização.
pub const STOPWORDS: &[&str] = &[
    "el", "la", "los", "las", "de", "del", "con", "por", "para", "que", "qué", "un", "una", "es",
    "está", "estan",
];

/// Tokens com este número de caracteres (ou menos) são descartados.
const MIN_TOKEN_CHARS: usize = 2;

/// Normaliza texto para comparação com padrões armazenados (caixa baixa + trim).
pub fn normalize(text: &str) -> String {
    text.to_lowercase().trim().to_string()
}

/// Divide o texto em tokens significativos, preservando a ordem.
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|word| word.chars().count() > MIN_TOKEN_CHARS && !STOPWORDS.contains(word))
        .map(str::to_string)
        .collect()
}

/// Conjunto de tokens do texto.
pub fn token_set(text: &str) -> HashSet<String> {
    tokenize(text).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Equipos DISPONIBLES \n"), "equipos disponibles");
    }

    #[test]
    fn test_tokenize_filters_short_and_stopwords() {
        let tokens = tokenize("¿Quién tiene el notebook con la serie AB12?");
        assert_eq!(tokens, vec!["quién", "tiene", "notebook", "serie", "ab12"]);
    }

    #[test]
    fn test_tokenize_punctuation_splits_words() {
        let tokens = tokenize("equipos,disponibles;ahora");
        assert_eq!(tokens, vec!["equipos", "disponibles", "ahora"]);
    }

    #[test]
    fn test_tokenize_accented_stopwords() {
        assert!(tokenize("qué está").is_empty());
    }

    #[test]
    fn test_tokenize_blank_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t ").is_empty());
        assert!(tokenize("el la de").is_empty());
    }

    #[test]
    fn test_tokenize_keeps_underscore_words() {
        assert_eq!(tokenize("equipo_uno"), vec!["equipo_uno"]);
    }

    #[test]
    fn test_token_set_deduplicates() {
        let set = token_set("equipos equipos libres");
        assert_eq!(set.len(), 2);
    }
}
