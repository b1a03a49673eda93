//! # Motriz
//!
//! Motor de intenções auto-adaptativo para consultas de chat sobre
//! empréstimo de equipamentos.
//!
//! Motriz aprende padrões de mensagens, mede a similaridade entre uma
//! mensagem nova e o que já conhece e ajusta a confiança de cada padrão
//! a partir do feedback dos usuários.
//!
//! ## Módulos
//!
//! - [`learning`] - Motor de intenções (matching, aprendizado, feedback, snapshot)
//! - [`resolver`] - Cadeia de resolvedores (aprendido → heurístico)
//! - [`assistant`] - Serviço de chat, ações de domínio e diretório de equipamentos
//! - [`persistence`] - Gravação de snapshots em segundo plano
//! - [`cli`] - Interface de linha de comando
//! - [`types`] - Tipos compartilhados

pub mod assistant;
#[cfg(feature = "cli")]
pub mod cli;
pub mod learning;
pub mod persistence;
pub mod resolver;
pub mod types;

pub use types::config::Config;
pub use types::errors::{MotrizError, MotrizResult};
