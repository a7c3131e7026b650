use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SopsConfig {
    /// Colon-separated external SOP directories, highest precedence first.
    pub sop_paths: Option<String>,
    /// Override for the built-in SOP directory (always scanned last).
    pub builtin_dir: Option<PathBuf>,
    /// Override for the directory holding `agent-sop-format.md`.
    pub rules_dir: Option<PathBuf>,
    pub server: ServerConfig,
}

/// Identity advertised by the prompt/tool server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "agent-sop-prompt-server".into(),
        }
    }
}
