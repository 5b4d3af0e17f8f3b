// Command-line arguments

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ConfigOverrides;

#[derive(Debug, Parser)]
#[command(
    name = "codebreakers",
    version,
    about = "Prompt a local Ollama model and keep a per-model history"
)]
pub struct Cli {
    /// Config file (default: ~/.codebreakers/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Inference server base URL (default: http://localhost:11434)
    #[arg(long, global = true, value_name = "URL")]
    pub server_url: Option<String>,

    /// Directory for output-<model>.csv history files
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List models available on the server
    Models,

    /// Generate a response for one prompt
    Generate {
        /// Model to use
        #[arg(short, long)]
        model: String,

        /// Prompt text (read from stdin when omitted)
        prompt: Vec<String>,
    },

    /// Delete all logged exchanges for a model
    Clear {
        /// Model whose history is cleared
        #[arg(short, long)]
        model: String,

        /// Skip the confirmation question
        #[arg(short, long)]
        yes: bool,
    },

    /// Show logged exchanges for a model
    History {
        #[arg(short, long)]
        model: String,
    },

    /// Interactive session (default)
    Repl {
        /// Model to select initially (default: first listed)
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Serve the web front-end
    Serve {
        /// Address to listen on (default: 127.0.0.1:8501)
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        let bind_address = match &self.command {
            Some(Commands::Serve { bind }) => bind.clone(),
            _ => None,
        };

        ConfigOverrides {
            config_path: self.config.clone(),
            server_url: self.server_url.clone(),
            log_dir: self.log_dir.clone(),
            bind_address,
        }
    }
}
