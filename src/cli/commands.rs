// Slash command handling

pub enum Command {
    Help,
    Quit,
    Models,
    /// `/model` shows the selection, `/model <name>` changes it
    Model(Option<String>),
    Clear,
    History,
    Unknown(String),
}

impl Command {
    /// Parse a line starting with `/`. Anything else is a prompt.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if !input.starts_with('/') {
            return None;
        }

        let (name, rest) = match input.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (input, ""),
        };

        let command = match name {
            "/help" => Command::Help,
            "/quit" | "/exit" => Command::Quit,
            "/models" => Command::Models,
            "/model" if rest.is_empty() => Command::Model(None),
            "/model" => Command::Model(Some(rest.to_string())),
            "/clear" => Command::Clear,
            "/history" => Command::History,
            other => Command::Unknown(other.to_string()),
        };
        Some(command)
    }
}

pub fn format_help() -> String {
    r#"Available commands:
  /help           - Show this help message
  /models         - List models on the server
  /model [NAME]   - Show or change the selected model
  /history        - Show logged exchanges for the selected model
  /clear          - Clear the selected model's history (asks first)
  /quit           - Exit

Anything else is sent to the selected model as a prompt."#
        .to_string()
}

pub fn format_models(models: &[String], selected: Option<&str>) -> String {
    models
        .iter()
        .map(|name| {
            if Some(name.as_str()) == selected {
                format!("* {}", name)
            } else {
                format!("  {}", name)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
