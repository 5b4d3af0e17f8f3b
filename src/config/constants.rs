// Project-wide constants
//
// Centralised here so addresses and other magic values have one source of
// truth. Import via `use crate::config::constants::*;`.

/// Default address of the local Ollama server.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:11434";

/// Default directory for `output-<model>.csv` files (the working directory).
pub const DEFAULT_LOG_DIR: &str = ".";

/// Default bind address for `codebreakers serve` (localhost only).
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8501";

/// Config directory name under the user's home directory.
pub const CONFIG_DIR_NAME: &str = ".codebreakers";

/// Config file name inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment override for the server URL.
pub const ENV_SERVER_URL: &str = "CODEBREAKERS_SERVER_URL";

/// Environment override for the log directory.
pub const ENV_LOG_DIR: &str = "CODEBREAKERS_LOG_DIR";
