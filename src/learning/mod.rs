//! Motor de intenções do Motriz.
//!
//! Este módulo implementa o ciclo MATCH→LEARN→FEEDBACK→PERSIST
//! que roteia mensagens de chat para ações de domínio.
//!
//! ## Componentes
//!
//! - **Tokenizer**: normalização e tokens significativos
//! - **Similarity**: score multi-sinal (sequência, tokens, palavras-chave)
//! - **PatternStore**: padrões, pesos de palavras-chave e índice de intenções
//! - **IntentEngine**: matching, aprendizado, feedback e persistência
//! - **Snapshot**: formato JSON versionado em disco
//! - **Baseline**: conhecimento inicial e exemplos de treino

mod baseline;
mod engine;
mod similarity;
mod snapshot;
mod stats;
mod store;
mod tokenizer;

pub use baseline::{
    default_training_examples, load_training_examples, Seed, TrainingExample, AVAILABLE,
    BASELINE, FIND_WORKER, LIST_ALL, LIST_AVAILABLE, LIST_LOANED, LOANED, TOTAL,
    TRAINING_EXAMPLES, WHO_HAS,
};
pub use engine::{FeedbackOutcome, IntentEngine, LearnOutcome, PatternMatch, TrainingReport};
pub use similarity::{
    jaccard, sequence_ratio, similarity, similarity_breakdown, SimilarityBreakdown,
    IMPORTANT_WORDS, KEYWORD_WEIGHT, SEQUENCE_WEIGHT, TOKEN_WEIGHT,
};
pub use snapshot::{quarantine, Snapshot, SCHEMA_VERSION};
pub use stats::{EngineStatistics, KeywordWeight, PatternUsage, TOP_KEYWORDS, TOP_PATTERNS};
pub use store::{
    IntentIndex, Pattern, PatternContext, PatternId, PatternStore, KEYWORD_INCREMENT,
    MAX_CONFIDENCE, MIN_CONFIDENCE, NEGATIVE_FEEDBACK, POSITIVE_FEEDBACK, REACHABLE_CONFIDENCE,
    USAGE_REINFORCEMENT,
};
pub use tokenizer::{normalize, token_set, tokenize, STOPWORDS};
