// Code Breakers - main entry point

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read};
use std::process::ExitCode;

use codebreakers::build_service;
use codebreakers::chat::GenerateParams;
use codebreakers::cli::{actions, Cli, Commands, Repl};
use codebreakers::config::load_config;
use codebreakers::logging::init_tracing;
use codebreakers::server;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<u8> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli.overrides())?;
    let service = build_service(&config)?;

    let mut stdout = io::stdout();
    let mut stderr = io::stderr();

    match cli.command {
        Some(Commands::Models) => actions::list_models(&service, &mut stdout, &mut stderr).await,
        Some(Commands::Generate { model, prompt }) => {
            let prompt = if prompt.is_empty() {
                let mut buf = String::new();
                io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read prompt from stdin")?;
                buf
            } else {
                prompt.join(" ")
            };
            let params = GenerateParams::new(model, prompt);
            actions::generate(&service, &params, &mut stdout, &mut stderr).await
        }
        Some(Commands::Clear { model, yes }) => {
            let mut stdin = io::stdin().lock();
            actions::clear_history(&service, &model, yes, &mut stdin, &mut stdout, &mut stderr)
        }
        Some(Commands::History { model }) => {
            actions::show_history(&service, &model, &mut stdout, &mut stderr)
        }
        Some(Commands::Serve { .. }) => {
            server::serve(service, config.bind_socket_addr()?).await?;
            Ok(actions::EXIT_OK)
        }
        Some(Commands::Repl { model }) => {
            Repl::new(service)?.run(model).await?;
            Ok(actions::EXIT_OK)
        }
        None => {
            Repl::new(service)?.run(None).await?;
            Ok(actions::EXIT_OK)
        }
    }
}
