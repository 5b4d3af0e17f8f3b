// One-shot subcommands
//
// Each action writes to the given stdout/stderr handles and returns the process
// exit status, so the same code paths run under tests.

use anyhow::Result;
use std::io::{BufRead, Write};

use super::{print_error, print_success, print_warning};
use crate::chat::{ChatService, GenerateParams, Generation};
use crate::errors::{ChatError, MODEL_LIST_ERROR, NO_MODELS_WARNING};
use crate::logging::LogEntry;

pub const EXIT_OK: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
/// Rejected input (blank prompt, declined confirmation)
pub const EXIT_INVALID_INPUT: u8 = 2;

pub async fn list_models(
    service: &ChatService,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<u8> {
    match service.fetch_models().await {
        Ok(models) if models.is_empty() => {
            print_warning(err, NO_MODELS_WARNING)?;
            Ok(EXIT_OK)
        }
        Ok(models) => {
            for model in models {
                writeln!(out, "{}", model)?;
            }
            Ok(EXIT_OK)
        }
        Err(e) => {
            tracing::debug!("Listing models failed: {:?}", e);
            print_error(err, &format!("{} ({})", MODEL_LIST_ERROR, e))?;
            print_warning(err, NO_MODELS_WARNING)?;
            Ok(EXIT_FAILURE)
        }
    }
}

pub async fn generate(
    service: &ChatService,
    params: &GenerateParams,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<u8> {
    match service.generate(params).await {
        Ok(generation) => {
            print_generation(&generation, out, err)?;
            Ok(EXIT_OK)
        }
        Err(e) => report_failure(&e, err),
    }
}

pub fn print_generation(
    generation: &Generation,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<()> {
    writeln!(out, "{}", generation.response)?;
    if let Some(log_error) = &generation.log_error {
        print_warning(
            err,
            &format!("Response was not saved to history: {}", log_error),
        )?;
    }
    Ok(())
}

/// Clear a model's history, asking first unless `assume_yes`
pub fn clear_history(
    service: &ChatService,
    model: &str,
    assume_yes: bool,
    input: &mut impl BufRead,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<u8> {
    if !assume_yes {
        let question = format!("Clear conversation history for '{}'? [y/N] ", model);
        if !confirm(&question, input, out)? {
            print_warning(err, "History not cleared.")?;
            return Ok(EXIT_INVALID_INPUT);
        }
    }

    match service.clear_history(model) {
        Ok(()) => {
            print_success(out, "Conversation history cleared.")?;
            Ok(EXIT_OK)
        }
        Err(e) => report_failure(&e, err),
    }
}

pub fn show_history(
    service: &ChatService,
    model: &str,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<u8> {
    match service.history(model) {
        Ok(entries) if entries.is_empty() => {
            writeln!(out, "No history for {}.", model)?;
            Ok(EXIT_OK)
        }
        Ok(entries) => {
            for entry in &entries {
                writeln!(out, "{}", format_entry(entry))?;
            }
            Ok(EXIT_OK)
        }
        Err(e) => report_failure(&e, err),
    }
}

pub fn format_entry(entry: &LogEntry) -> String {
    format!(
        "[{}] {} => {}",
        entry.formatted_timestamp(),
        entry.prompt,
        entry.response
    )
}

/// Ask a yes/no question and read the answer with [`is_yes`]
pub fn confirm(question: &str, input: &mut impl BufRead, out: &mut impl Write) -> Result<bool> {
    write!(out, "{}", question)?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

/// Only "y" or "yes" (any case, surrounding whitespace ignored) counts as yes
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn report_failure(e: &ChatError, err: &mut impl Write) -> Result<u8> {
    if e.is_warning() {
        print_warning(err, &e.to_string())?;
        Ok(EXIT_INVALID_INPUT)
    } else {
        print_error(err, &e.to_string())?;
        Ok(EXIT_FAILURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_confirm_answers() {
        for (answer, expected) in [
            ("y\n", true),
            ("YES\n", true),
            ("n\n", false),
            ("\n", false),
            ("", false),
            ("yep\n", false),
        ] {
            let mut input = Cursor::new(answer.as_bytes());
            let mut out: Vec<u8> = Vec::new();
            assert_eq!(
                confirm("Sure? ", &mut input, &mut out).unwrap(),
                expected,
                "answer {answer:?}"
            );
            assert_eq!(String::from_utf8(out).unwrap(), "Sure? ");
        }
    }

    #[test]
    fn test_is_yes() {
        for answer in ["y", "Y", "yes", " Yes \n", "YES"] {
            assert!(is_yes(answer), "answer {answer:?}");
        }
        for answer in ["", "n", "no", "yep", "ye", "y e s"] {
            assert!(!is_yes(answer), "answer {answer:?}");
        }
    }
}
