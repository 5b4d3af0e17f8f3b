// Terminal front-ends: one-shot subcommands and the interactive REPL

pub mod actions;
mod args;
mod commands;
mod repl;

pub use args::{Cli, Commands};
pub use repl::Repl;

use crossterm::style::Stylize;
use std::io::{self, Write};

pub fn print_error(w: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(w, "{} {}", "✗".red().bold(), message)
}

pub fn print_warning(w: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(w, "{} {}", "!".yellow().bold(), message)
}

pub fn print_success(w: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(w, "{} {}", "✓".green().bold(), message)
}
