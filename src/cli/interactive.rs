//! Conversa interativa com o assistente.
//!
//! Loop de prompt com dialoguer. Depois de cada resposta resolvida, pergunta
//! se foi útil e devolve a resposta ao motor como feedback.

use dialoguer::{theme::ColorfulTheme, Confirm, Input};

use crate::assistant::Assistant;
use crate::types::config::Config;
use crate::types::requests::{ChatRequest, HistoryEntry};
use crate::MotrizResult;

use super::commands::print_response;

/// Palavras que encerram a conversa.
const EXIT_WORDS: &[&str] = &["salir", "sair", "exit", "quit"];

/// Fonte das entradas do usuário durante a conversa.
pub trait ChatPrompt {
    /// Próxima mensagem do usuário.
    fn message(&mut self) -> MotrizResult<String>;

    /// Se a última resposta foi útil.
    fn useful(&mut self) -> MotrizResult<bool>;
}

/// Prompt de terminal com dialoguer.
pub struct TerminalPrompt {
    theme: ColorfulTheme,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatPrompt for TerminalPrompt {
    fn message(&mut self) -> MotrizResult<String> {
        Ok(Input::with_theme(&self.theme)
            .with_prompt("Tú")
            .allow_empty(true)
            .interact_text()?)
    }

    fn useful(&mut self) -> MotrizResult<bool> {
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt("¿Te sirvió la respuesta?")
            .default(true)
            .interact()?)
    }
}

/// Executa a conversa interativa.
pub async fn run_interactive_chat(config: &Config) -> MotrizResult<()> {
    let assistant = Assistant::from_config(config)?;

    println!("\n💬 Motriz - consultas de equipamentos");
    println!("Escreva 'salir' para encerrar.\n");

    let result = chat_session(&assistant, &mut TerminalPrompt::new()).await;

    // Grava mesmo quando o prompt falha no meio da conversa
    assistant.persist().await;
    result?;

    println!("\n✓ Conhecimento salvo. Até logo!\n");
    Ok(())
}

/// Loop de conversa até uma palavra de saída ou um erro do prompt.
async fn chat_session(assistant: &Assistant, prompt: &mut impl ChatPrompt) -> MotrizResult<()> {
    let mut history: Vec<HistoryEntry> = Vec::new();

    loop {
        let message = prompt.message()?;
        let message = message.trim();
        if message.is_empty() {
            continue;
        }
        if EXIT_WORDS.contains(&message.to_lowercase().as_str()) {
            return Ok(());
        }

        let request = ChatRequest::new(message).with_history(history.clone());
        let response = assistant.chat(request).await?;

        println!();
        print_response(&response);
        println!();

        history.push(HistoryEntry::user(message));
        history.push(HistoryEntry::assistant(response.response.clone()));

        if !response.is_resolved() {
            continue;
        }

        let useful = prompt.useful()?;
        if let Some(outcome) = assistant.feedback(message, useful).await {
            tracing::debug!(
                pattern = %outcome.id,
                confidence = outcome.confidence,
                "Interactive feedback recorded"
            );
        }
    }
}
