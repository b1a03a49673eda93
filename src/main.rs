use clap::Parser;
use motriz::cli::{Cli, Commands};
use motriz::types::config::Config;
use motriz::MotrizResult;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> MotrizResult<()> {
    let cli = Cli::parse();

    // Load configuration first (no logging yet)
    let config = if cli.config.exists() {
        Config::load(&cli.config).unwrap_or_else(|_| Config::default_config())
    } else {
        Config::default_config()
    };

    // Determine log level: CLI flags take precedence over config
    let log_level = if cli.quiet {
        "error".to_string()
    } else if cli.verbose {
        "debug".to_string()
    } else {
        config.general.log_level.clone()
    };

    let filter = EnvFilter::from_default_env().add_directive(
        format!("motriz={}", log_level)
            .parse()
            .unwrap_or_else(|_| "motriz=info".parse().expect("fallback directive is valid")),
    );

    if config.general.log_format == "json" {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }

    tracing::debug!("Configuration loaded from: {}", cli.config.display());

    match cli.command {
        Commands::Init { path } => {
            motriz::cli::commands::init(path).await?;
        }
        Commands::Chat { message, feedback } => {
            motriz::cli::commands::chat(&message, feedback, &config).await?;
        }
        Commands::Interactive => {
            motriz::cli::interactive::run_interactive_chat(&config).await?;
        }
        Commands::Match { message } => {
            motriz::cli::commands::match_message(&message, &config).await?;
        }
        Commands::Learn {
            message,
            intent,
            action,
        } => {
            motriz::cli::commands::learn(&message, &intent, &action, &config).await?;
        }
        Commands::Feedback {
            message,
            success,
            ..
        } => {
            motriz::cli::commands::feedback(&message, success, &config).await?;
        }
        Commands::Train { file } => {
            motriz::cli::commands::train(file.as_deref(), &config).await?;
        }
        Commands::Status { limit } => {
            motriz::cli::commands::status(limit, &config).await?;
        }
        Commands::Version => {
            motriz::cli::commands::version();
        }
    }

    Ok(())
}
