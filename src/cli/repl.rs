// Interactive REPL
//
// Mirrors the web page: pick a model, type prompts, clear history after
// confirming. A spinner runs on stderr while a request is in flight.

use anyhow::{Context, Result};
use crossterm::{
    style::Stylize,
    terminal::{Clear, ClearType},
    ExecutableCommand,
};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::future::Future;
use std::io::{self, IsTerminal, Write};
use std::sync::Arc;
use std::time::Duration;

use super::actions::{format_entry, is_yes, print_generation};
use super::commands::{format_help, format_models, Command};
use super::{print_error, print_success, print_warning};
use crate::chat::{ChatService, GenerateParams};
use crate::errors::{ChatError, MODEL_LIST_ERROR, NO_MODELS_WARNING};

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct Repl {
    service: Arc<ChatService>,
    models: Vec<String>,
    selected: Option<String>,
    editor: DefaultEditor,
}

impl Repl {
    pub fn new(service: Arc<ChatService>) -> Result<Self> {
        let editor = DefaultEditor::new().context("Failed to initialise line editor")?;
        Ok(Self {
            service,
            models: Vec::new(),
            selected: None,
            editor,
        })
    }

    pub async fn run(&mut self, preferred_model: Option<String>) -> Result<()> {
        println!("{}", "CODE BREAKERS".bold());
        println!("Type a prompt to send it to the selected model. /help for commands.");

        self.refresh_models().await?;
        if let Some(model) = &preferred_model {
            if !self.models.is_empty() && !self.models.contains(model) {
                print_warning(
                    &mut io::stderr(),
                    &format!("'{}' is not in the server's model list", model),
                )?;
            }
        }
        self.selected = initial_selection(&self.models, preferred_model);
        if let Some(model) = &self.selected {
            println!("Selected model: {}", model.as_str().cyan());
        }

        loop {
            let line = match self.editor.readline("> ") {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(e) => return Err(e).context("Failed to read input"),
            };

            if line.trim().is_empty() {
                continue;
            }
            let _ = self.editor.add_history_entry(line.as_str());

            match Command::parse(&line) {
                Some(Command::Quit) => break,
                Some(command) => self.handle_command(command).await?,
                None => self.generate(line).await?,
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    async fn refresh_models(&mut self) -> Result<()> {
        let mut stderr = io::stderr();
        match with_spinner("Fetching models...", self.service.fetch_models()).await {
            Ok(models) => {
                if models.is_empty() {
                    print_warning(&mut stderr, NO_MODELS_WARNING)?;
                }
                self.models = models;
            }
            Err(e) => {
                print_error(&mut stderr, &format!("{} ({})", MODEL_LIST_ERROR, e))?;
                print_warning(&mut stderr, NO_MODELS_WARNING)?;
                self.models.clear();
            }
        }
        Ok(())
    }

    async fn handle_command(&mut self, command: Command) -> Result<()> {
        let mut stdout = io::stdout();
        let mut stderr = io::stderr();

        match command {
            Command::Help => println!("{}", format_help()),
            Command::Models => {
                self.refresh_models().await?;
                if !self.models.is_empty() {
                    println!("{}", format_models(&self.models, self.selected.as_deref()));
                }
            }
            Command::Model(None) => match &self.selected {
                Some(model) => println!("Selected model: {}", model),
                None => print_warning(&mut stderr, "No model selected.")?,
            },
            Command::Model(Some(model)) => {
                if !self.models.is_empty() && !self.models.contains(&model) {
                    print_warning(
                        &mut stderr,
                        &format!("'{}' is not in the server's model list", model),
                    )?;
                }
                println!("Selected model: {}", model);
                self.selected = Some(model);
            }
            Command::History => {
                let Some(model) = self.selected.clone() else {
                    return Ok(print_warning(&mut stderr, "No model selected.")?);
                };
                match self.service.history(&model) {
                    Ok(entries) if entries.is_empty() => println!("No history for {}.", model),
                    Ok(entries) => {
                        for entry in &entries {
                            println!("{}", format_entry(entry));
                        }
                    }
                    Err(e) => print_error(&mut stderr, &e.to_string())?,
                }
            }
            Command::Clear => {
                let Some(model) = self.selected.clone() else {
                    return Ok(print_warning(&mut stderr, "No model selected.")?);
                };
                let question = format!("Clear conversation history for '{}'? [y/N] ", model);
                let answer = match self.editor.readline(&question) {
                    Ok(answer) => Some(answer),
                    Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => None,
                    Err(e) => return Err(e).context("Failed to read input"),
                };
                match clear_if_confirmed(&self.service, &model, answer.as_deref()) {
                    Ok(true) => print_success(&mut stdout, "Conversation history cleared.")?,
                    Ok(false) => print_warning(&mut stderr, "History not cleared.")?,
                    Err(e) => print_error(&mut stderr, &e.to_string())?,
                }
            }
            Command::Unknown(name) => {
                print_warning(&mut stderr, &format!("Unknown command {}. Try /help.", name))?
            }
            Command::Quit => {}
        }
        Ok(())
    }

    async fn generate(&mut self, prompt: String) -> Result<()> {
        let mut stdout = io::stdout();
        let mut stderr = io::stderr();

        let model = self.selected.clone().unwrap_or_default();
        let params = GenerateParams::new(model, prompt);

        match with_spinner("Generating response...", self.service.generate(&params)).await {
            Ok(generation) => print_generation(&generation, &mut stdout, &mut stderr)?,
            Err(e) if e.is_warning() => print_warning(&mut stderr, &e.to_string())?,
            Err(e) => print_error(&mut stderr, &e.to_string())?,
        }
        Ok(())
    }
}

/// Model selected at start-up: the preferred one if given, else the first listed
fn initial_selection(models: &[String], preferred: Option<String>) -> Option<String> {
    preferred.or_else(|| models.first().cloned())
}

/// Clear `model`'s history only when `answer` is a yes
///
/// `None` stands for an abandoned prompt (Ctrl-C or Ctrl-D) and never clears.
fn clear_if_confirmed(
    service: &ChatService,
    model: &str,
    answer: Option<&str>,
) -> Result<bool, ChatError> {
    if !answer.is_some_and(is_yes) {
        return Ok(false);
    }
    service.clear_history(model)?;
    Ok(true)
}

/// Await `work` while animating `label` on stderr (only when it is a terminal)
async fn with_spinner<F: Future>(label: &str, work: F) -> F::Output {
    if !io::stderr().is_terminal() {
        return work.await;
    }

    let label = label.to_string();
    let spinner = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(100));
        for frame in SPINNER_FRAMES.iter().cycle() {
            interval.tick().await;
            let mut stderr = io::stderr();
            let _ = write!(stderr, "\r{} {}", frame.cyan(), label);
            let _ = stderr.flush();
        }
    });

    let output = work.await;

    spinner.abort();
    let _ = spinner.await;
    let mut stderr = io::stderr();
    let _ = stderr.execute(Clear(ClearType::CurrentLine));
    let _ = write!(stderr, "\r");
    let _ = stderr.flush();

    output
}
