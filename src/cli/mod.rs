//! Interface de linha de comando do Motriz.

pub mod commands;
pub mod interactive;

use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

/// Motriz - motor de intenções para consultas de empréstimo de equipamentos.
#[derive(Parser, Debug)]
#[command(name = "motriz")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Arquivo de configuração.
    #[arg(short, long, default_value = "motriz.toml")]
    pub config: PathBuf,

    /// Modo verbose.
    #[arg(short, long)]
    pub verbose: bool,

    /// Modo silencioso.
    #[arg(short, long)]
    pub quiet: bool,

    /// Comando a executar.
    #[command(subcommand)]
    pub command: Commands,
}

/// Comandos disponíveis.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inicializa configuração no diretório atual.
    Init {
        /// Diretório de destino (padrão: diretório atual).
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Envia uma mensagem ao assistente.
    Chat {
        /// Mensagem do usuário.
        message: String,

        /// Feedback sobre a resposta anterior a esta mensagem.
        #[arg(short, long)]
        feedback: Option<bool>,
    },

    /// Conversa com o assistente no terminal.
    Interactive,

    /// Mostra o melhor padrão para uma mensagem, sem executar ações.
    Match {
        /// Mensagem a analisar.
        message: String,
    },

    /// Ensina um padrão ao motor.
    Learn {
        /// Texto do padrão.
        message: String,

        /// Intenção associada.
        #[arg(short, long)]
        intent: String,

        /// Ação associada.
        #[arg(short, long)]
        action: String,
    },

    /// Registra feedback para o padrão mais próximo da mensagem.
    #[command(group(ArgGroup::new("outcome").required(true).args(["success", "failure"])))]
    Feedback {
        /// Mensagem avaliada.
        message: String,

        /// A resposta foi útil.
        #[arg(long)]
        success: bool,

        /// A resposta não foi útil.
        #[arg(long)]
        failure: bool,
    },

    /// Treina o motor com exemplos (embutidos ou de um arquivo JSON).
    Train {
        /// Arquivo JSON com exemplos `{text, intent, action}`.
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Mostra estatísticas do conhecimento aprendido.
    Status {
        /// Número de padrões e palavras-chave exibidos.
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Mostra versão.
    Version,
}
