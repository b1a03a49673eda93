//! Similaridade multi-sinal entre mensagens.
//!
//! Combina três sinais:
//! - **sequência**: razão de blocos coincidentes por caractere (Ratcliff/Obershelp)
//! - **tokens**: índice de Jaccard entre os conjuntos de tokens
//! - **palavras-chave**: Jaccard restrito ao vocabulário de domínio
//!
//! Quando algum conjunto de tokens (ou de palavras-chave) é vazio, o score é
//! apenas a similaridade de sequência. Os pesos não são redistribuídos.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::tokenizer::token_set;

/// Peso da similaridade de sequência.
pub const SEQUENCE_WEIGHT: f64 = 0.3;
/// Peso do Jaccard de tokens.
pub const TOKEN_WEIGHT: f64 = 0.4;
/// Peso do Jaccard de palavras-chave.
pub const KEYWORD_WEIGHT: f64 = 0.3;

/// Vocabulário de domínio que recebe peso extra.
pub const IMPORTANT_WORDS: &[&str] = &[
    "quien",
    "trabajador",
    "equipo",
    "serie",
    "disponible",
    "prestado",
    "asignado",
    "total",
    "notebook",
    "pc",
    "laptop",
];

/// Detalhamento de um cálculo de similaridade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityBreakdown {
    /// Razão de sequência por caractere.
    pub sequence: f64,
    /// Jaccard de tokens (None quando o termo foi pulado).
    pub tokens: Option<f64>,
    /// Jaccard de palavras-chave (None quando o termo foi pulado).
    pub keywords: Option<f64>,
    /// Score final em [0, 1].
    pub score: f64,
}

/// Similaridade entre dois textos, em [0, 1].
pub fn similarity(a: &str, b: &str) -> f64 {
    similarity_breakdown(a, b).score
}

/// Similaridade com cada termo exposto.
pub fn similarity_breakdown(a: &str, b: &str) -> SimilarityBreakdown {
    let sequence = sequence_ratio(&a.to_lowercase(), &b.to_lowercase());

    let sequence_only = SimilarityBreakdown {
        sequence,
        tokens: None,
        keywords: None,
        score: sequence,
    };

    let tokens_a = token_set(a);
    let tokens_b = token_set(b);
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return sequence_only;
    }

    let keywords_a = important_tokens(&tokens_a);
    let keywords_b = important_tokens(&tokens_b);
    if keywords_a.is_empty() || keywords_b.is_empty() {
        return SimilarityBreakdown {
            tokens: Some(jaccard(&tokens_a, &tokens_b)),
            ..sequence_only
        };
    }

    let tokens = jaccard(&tokens_a, &tokens_b);
    let keywords = jaccard(&keywords_a, &keywords_b);
    let score = SEQUENCE_WEIGHT * sequence + TOKEN_WEIGHT * tokens + KEYWORD_WEIGHT * keywords;

    SimilarityBreakdown {
        sequence,
        tokens: Some(tokens),
        keywords: Some(keywords),
        score: score.clamp(0.0, 1.0),
    }
}

fn important_tokens(tokens: &HashSet<String>) -> HashSet<String> {
    tokens
        .iter()
        .filter(|t| IMPORTANT_WORDS.contains(&t.as_str()))
        .cloned()
        .collect()
}

/// Índice de Jaccard entre dois conjuntos (0.0 quando ambos são vazios).
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Razão de blocos coincidentes: `2·M / (|a| + |b|)`.
///
/// Retorna 1.0 para duas strings vazias. Assimétrica, como o algoritmo
/// Ratcliff/Obershelp: `b` é indexada e `a` percorrida.
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matched = BlockMatcher::new(&a, &b).matching_chars();
    2.0 * matched as f64 / total as f64
}

/// Tamanho a partir do qual caracteres muito frequentes em `b` deixam de ser indexados.
const POPULAR_MIN_LEN: usize = 200;

struct BlockMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    b_index: HashMap<char, Vec<usize>>,
}

impl<'a> BlockMatcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b_index: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, c) in b.iter().enumerate() {
            b_index.entry(*c).or_default().push(j);
        }

        if b.len() >= POPULAR_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b_index.retain(|_, positions| positions.len() <= limit);
        }

        Self { a, b, b_index }
    }

    /// Soma dos tamanhos de todos os blocos coincidentes.
    fn matching_chars(&self) -> usize {
        let mut total = 0;
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, size) = self.longest_match(alo, ahi, blo, bhi);
            if size == 0 {
                continue;
            }
            total += size;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + size < ahi && j + size < bhi {
                queue.push((i + size, ahi, j + size, bhi));
            }
        }

        total
    }

    /// Maior bloco comum em `a[alo..ahi]` × `b[blo..bhi]`; empates ficam com o primeiro.
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
        let mut run_lengths: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next_runs = HashMap::new();
            if let Some(positions) = self.b_index.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| run_lengths.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_runs.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            run_lengths = next_runs;
        }

        // Estende sobre caracteres populares, que não estão no índice
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        (best_i, best_j, best_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_sequence_ratio_identical() {
        assert_eq!(sequence_ratio("equipos", "equipos"), 1.0);
    }

    #[test]
    fn test_sequence_ratio_disjoint() {
        assert_eq!(sequence_ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_sequence_ratio_empty() {
        assert_eq!(sequence_ratio("", ""), 1.0);
        assert_eq!(sequence_ratio("x", ""), 0.0);
        assert_eq!(sequence_ratio("", "x"), 0.0);
    }

    #[test]
    fn test_sequence_ratio_partial() {
        // "bcd" é o único bloco: 2·3 / 8
        assert!(approx(sequence_ratio("abcd", "bcde"), 0.75));
    }

    #[test]
    fn test_sequence_ratio_is_asymmetric() {
        assert!(approx(sequence_ratio("tide", "diet"), 0.25));
        assert!(approx(sequence_ratio("diet", "tide"), 0.5));
    }

    #[test]
    fn test_sequence_ratio_counts_chars_not_bytes() {
        assert_eq!(sequence_ratio("préstamo", "préstamo"), 1.0);
        assert!(approx(sequence_ratio("á", "a"), 0.0));
    }

    #[test]
    fn test_sequence_ratio_long_inputs_stay_bounded() {
        let a = "a".repeat(300);
        let b = format!("{}b", "a".repeat(250));
        let ratio = sequence_ratio(&a, &b);
        assert!((0.0..=1.0).contains(&ratio));
        assert!(ratio > 0.5);
    }

    #[test]
    fn test_jaccard() {
        let a: HashSet<String> = ["x", "y"].iter().map(|s| s.to_string()).collect();
        let b: HashSet<String> = ["y", "z"].iter().map(|s| s.to_string()).collect();
        assert!(approx(jaccard(&a, &b), 1.0 / 3.0));
        assert_eq!(jaccard(&HashSet::new(), &HashSet::new()), 0.0);
    }

    #[test]
    fn test_similarity_empty_inputs() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("x", ""), 0.0);
    }

    #[test]
    fn test_similarity_without_keywords_is_sequence_only() {
        let breakdown = similarity_breakdown("que equipos hay disponibles", "equipos disponibles");
        assert!(breakdown.keywords.is_none());
        assert_eq!(breakdown.score, breakdown.sequence);
        assert!(approx(breakdown.score, 38.0 / 46.0));
    }

    #[test]
    fn test_similarity_full_weighting() {
        let a = "quien tiene el notebook con la serie ab12";
        let b = "quien tiene el notebook serie ab12";
        let breakdown = similarity_breakdown(a, b);

        assert_eq!(breakdown.tokens, Some(1.0));
        assert_eq!(breakdown.keywords, Some(1.0));
        let expected = 0.3 * (68.0 / 75.0) + 0.4 + 0.3;
        assert!(approx(breakdown.score, expected));
    }

    #[test]
    fn test_similarity_stopword_only_input() {
        let breakdown = similarity_breakdown("el la de", "equipos disponibles");
        assert!(breakdown.tokens.is_none());
        assert_eq!(breakdown.score, breakdown.sequence);
    }

    #[test]
    fn test_similarity_is_case_insensitive() {
        assert!(approx(
            similarity("EQUIPOS Libres", "equipos libres"),
            1.0
        ));
    }

    #[test]
    fn test_similarity_in_unit_interval() {
        let pairs = [
            ("quien tiene el pc", "quien tiene el pc"),
            ("trabajador equipo serie", "equipo"),
            ("total", "notebook laptop pc"),
        ];
        for (a, b) in pairs {
            let score = similarity(a, b);
            assert!((0.0..=1.0).contains(&score), "{} vs {} = {}", a, b, score);
        }
    }
}
