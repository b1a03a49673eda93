//! Implementação dos comandos CLI do Motriz.

use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};

use crate::assistant::Assistant;
use crate::learning::{default_training_examples, load_training_examples, IntentEngine};
use crate::types::config::Config;
use crate::types::requests::ChatRequest;
use crate::types::responses::ChatResponse;
use crate::MotrizResult;

/// Largura da barra de aprendizado em `status`.
const LEARNING_BAR_WIDTH: usize = 20;

/// Initializes configuration in the specified directory.
pub async fn init(path: Option<PathBuf>) -> MotrizResult<()> {
    let target_dir = path.unwrap_or_else(|| PathBuf::from("."));

    // Create directory if it doesn't exist
    if !target_dir.exists() {
        std::fs::create_dir_all(&target_dir)?;
        tracing::info!("Directory created: {}", target_dir.display());
    }

    let config_path = target_dir.join("motriz.toml");

    if config_path.exists() {
        println!("Configuration already exists at: {}", config_path.display());
        return Ok(());
    }

    // Create .motriz/ directory for the knowledge snapshot
    let data_dir = target_dir.join(".motriz");
    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
        tracing::info!(".motriz/ directory created");
    }

    update_gitignore(&target_dir)?;

    let config = Config::default_config();
    config.save(&config_path)?;

    println!("Motriz initialized successfully!");
    println!("Configuration created at: {}", config_path.display());
    println!("Data directory: .motriz/");
    println!();
    println!("Next steps:");
    println!("  1. Point assistant.inventory_path to your inventory JSON");
    println!("  2. Train the engine: motriz train");
    println!("  3. Start chatting: motriz interactive");

    Ok(())
}

/// Updates or creates .gitignore to include .motriz/
fn update_gitignore(target_dir: &Path) -> MotrizResult<()> {
    let gitignore_path = target_dir.join(".gitignore");
    let entry = ".motriz/";
    let comment = "# Motriz - learned knowledge snapshot";

    if gitignore_path.exists() {
        let content = std::fs::read_to_string(&gitignore_path)?;

        if content.lines().any(|line| line.trim() == entry || line.trim() == ".motriz") {
            tracing::debug!(".gitignore already contains .motriz/");
            return Ok(());
        }

        let mut new_content = content.trim_end().to_string();
        if !new_content.is_empty() {
            new_content.push_str("\n\n");
        }
        new_content.push_str(comment);
        new_content.push('\n');
        new_content.push_str(entry);
        new_content.push('\n');

        std::fs::write(&gitignore_path, new_content)?;
        println!(".gitignore updated with .motriz/");
    } else {
        let content = format!("{}\n{}\n", comment, entry);
        std::fs::write(&gitignore_path, content)?;
        println!(".gitignore created with .motriz/");
    }

    Ok(())
}

/// Envia uma única mensagem ao assistente.
pub async fn chat(message: &str, feedback: Option<bool>, config: &Config) -> MotrizResult<()> {
    let assistant = Assistant::from_config(config)?;

    let mut request = ChatRequest::new(message);
    if let Some(success) = feedback {
        request = request.with_feedback(success);
    }

    let response = assistant.chat(request).await?;
    print_response(&response);

    assistant.persist().await;
    Ok(())
}

/// Imprime a resposta do assistente com as sugestões.
pub(crate) fn print_response(response: &ChatResponse) {
    println!("{}", response.response);

    if response.is_resolved() {
        tracing::debug!(
            intent = response.intent.as_deref().unwrap_or_default(),
            source = %response.source,
            score = response.score,
            "Message resolved"
        );
    }

    if !response.suggestions.is_empty() {
        println!("\nSugestões:");
        for suggestion in &response.suggestions {
            println!("  - {}", suggestion);
        }
    }
}

/// Diagnóstico: melhor padrão para a mensagem, sem executar nada.
pub async fn match_message(message: &str, config: &Config) -> MotrizResult<()> {
    let engine = IntentEngine::open(config);
    let threshold = engine.config().match_threshold;

    let Some(found) = engine.find_best(message) else {
        println!("Nenhum padrão alcançável para: {}", message);
        return Ok(());
    };

    let Some(pattern) = engine.pattern(found.id) else {
        return Ok(());
    };

    println!("Melhor padrão {}: \"{}\"", found.id, pattern.text);
    println!("  Intenção:    {}", pattern.intent);
    println!("  Ação:        {}", pattern.action);
    println!("  Confiança:   {:.2}", pattern.confidence);
    println!("  Usos:        {}", pattern.usage_count);
    println!("  Score bruto: {:.4}", found.raw);
    println!("  Score:       {:.4}", found.score);
    println!(
        "  Despacha:    {} (limiar {:.2})",
        if found.score >= threshold { "SIM" } else { "NÃO" },
        threshold
    );

    Ok(())
}

/// Ensina um padrão e grava o snapshot.
pub async fn learn(message: &str, intent: &str, action: &str, config: &Config) -> MotrizResult<()> {
    let mut engine = IntentEngine::open(config);
    let outcome = engine.learn(message, intent, action, None);

    if outcome.created {
        println!("Novo padrão {} aprendido ({} → {})", outcome.id, intent, action);
    } else {
        println!("Mensagem mesclada ao padrão existente {}", outcome.id);
    }

    save(&engine);
    Ok(())
}

/// Aplica feedback e grava o snapshot.
pub async fn feedback(message: &str, success: bool, config: &Config) -> MotrizResult<()> {
    let mut engine = IntentEngine::open(config);

    match engine.feedback(message, success) {
        Some(outcome) => {
            println!(
                "Feedback {} aplicado ao padrão {}: confiança {:.2} → {:.2}",
                if success { "positivo" } else { "negativo" },
                outcome.id,
                outcome.previous_confidence,
                outcome.confidence
            );
            save(&engine);
        }
        None => println!("Nenhum padrão alcançável para: {}", message),
    }

    Ok(())
}

/// Treina o motor com os exemplos embutidos ou de um arquivo.
pub async fn train(file: Option<&Path>, config: &Config) -> MotrizResult<()> {
    let examples = match file {
        Some(path) => load_training_examples(path)?,
        None => default_training_examples(),
    };

    if examples.is_empty() {
        println!("Nenhum exemplo de treino encontrado.");
        return Ok(());
    }

    let mut engine = IntentEngine::open(config);

    let progress = ProgressBar::new(examples.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} Treinando [{bar:30}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let report = engine.train_with(&examples, |_| progress.inc(1));
    progress.finish_and_clear();

    println!("Treinamento concluído:");
    println!("  Exemplos:          {}", report.examples);
    println!("  Padrões novos:     {}", report.created);
    println!("  Padrões mesclados: {}", report.merged);
    println!("  Cobertura:         {:.1}%", report.coverage);

    let stats = engine.statistics();
    println!();
    println!("Total de padrões: {}", stats.total_patterns);
    for (intent, count) in &stats.patterns_per_intent {
        println!("  {}: {}", intent, count);
    }
    println!(
        "Aprendizado: {} {:.1}%",
        learning_bar(stats.learning_percentage),
        stats.learning_percentage
    );

    save(&engine);
    Ok(())
}

/// Mostra estatísticas do conhecimento aprendido.
pub async fn status(limit: usize, config: &Config) -> MotrizResult<()> {
    let engine = IntentEngine::open(config);
    let stats = engine.statistics();

    println!("Motriz - Conhecimento Aprendido\n");
    println!("Total de padrões: {}", stats.total_patterns);
    println!("Padrões bem-sucedidos: {}", stats.successful_patterns);
    println!("Padrões dormentes: {}", stats.dormant_patterns);
    println!("Confiança média: {:.0}%", stats.average_confidence * 100.0);
    println!(
        "Aprendizado: {} {:.1}%",
        learning_bar(stats.learning_percentage),
        stats.learning_percentage
    );

    if !stats.patterns_per_intent.is_empty() {
        println!("\nPadrões por intenção:");
        for (intent, count) in &stats.patterns_per_intent {
            println!("  {}: {}", intent, count);
        }
    }

    if !stats.top_patterns.is_empty() {
        println!("\nPadrões mais usados:");
        for (i, pattern) in stats.top_patterns.iter().take(limit).enumerate() {
            println!(
                "  {}. \"{}\" ({}) - {} usos, {:.0}% confiança",
                i + 1,
                pattern.text,
                pattern.intent,
                pattern.usage_count,
                pattern.confidence * 100.0
            );
        }
    }

    if !stats.top_keywords.is_empty() {
        println!("\nPalavras-chave:");
        for keyword in stats.top_keywords.iter().take(limit) {
            println!("  {} ({:.1})", keyword.word, keyword.weight);
        }
    }

    Ok(())
}

/// Shows version.
pub fn version() {
    println!("motriz {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Motor de intenções auto-adaptativo para consultas de equipamentos");
}

/// Barra de texto para um percentual em [0, 100].
fn learning_bar(percentage: f64) -> String {
    let filled = ((percentage.clamp(0.0, 100.0) / 100.0) * LEARNING_BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(LEARNING_BAR_WIDTH - filled)
    )
}

fn save(engine: &IntentEngine) {
    if engine.snapshot_path().is_some() && !engine.save() {
        eprintln!("Aviso: não foi possível gravar o conhecimento aprendido.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_config(dir: &Path) -> Config {
        let mut config = Config::default_config();
        config.persistence.snapshot_path = dir.join("knowledge.json");
        config
    }

    #[tokio::test]
    async fn test_version() {
        // Apenas verifica que não causa panic
        version();
    }

    #[test]
    fn test_learning_bar() {
        assert_eq!(learning_bar(0.0), format!("[{}]", "-".repeat(20)));
        assert_eq!(learning_bar(50.0), format!("[{}{}]", "#".repeat(10), "-".repeat(10)));
        assert_eq!(learning_bar(150.0), format!("[{}]", "#".repeat(20)));
    }

    #[tokio::test]
    async fn test_init_creates_config_and_gitignore() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(".gitignore"), "target/\n").unwrap();

        init(Some(dir.path().to_path_buf())).await.unwrap();

        assert!(dir.path().join("motriz.toml").exists());
        assert!(dir.path().join(".motriz").is_dir());

        let gitignore = std::fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        assert!(gitignore.contains("target/"));
        assert!(gitignore.contains(".motriz/"));

        // Segunda execução não duplica a entrada
        update_gitignore(dir.path()).unwrap();
        let again = std::fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        assert_eq!(again.matches(".motriz/").count(), 1);
    }

    #[tokio::test]
    async fn test_learn_persists_snapshot() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());

        learn("planilla de equipos de obra", "reporte", "generar_reporte", &config)
            .await
            .unwrap();

        let engine = IntentEngine::open(&config);
        assert!(engine.patterns().iter().any(|p| p.intent == "reporte"));
    }

    #[tokio::test]
    async fn test_train_and_status() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());

        train(None, &config).await.unwrap();
        assert!(config.persistence.snapshot_path.exists());
        assert!(status(5, &config).await.is_ok());
    }
}
