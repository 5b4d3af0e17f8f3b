// Logging
//
// Two concerns live here: the per-model conversation history files, and the
// process-wide tracing subscriber.

pub mod conversation_logger;

pub use conversation_logger::{ConversationLogger, HistoryError, LogEntry, TIMESTAMP_FORMAT};

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber (stderr, filtered by `RUST_LOG`)
///
/// Without `RUST_LOG`, this crate logs at `info`, or `debug` when `verbose`.
/// Calling it twice is harmless: the second install is ignored.
pub fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "codebreakers=debug"
    } else {
        "codebreakers=info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        // Route `log` records from dependencies through tracing
        let _ = tracing_log::LogTracer::init();
    }
}
