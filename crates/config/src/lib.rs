//! Configuration loading, env substitution, and environment overrides.
//!
//! Config files: `agent-sops.toml`, `agent-sops.yaml`, or `agent-sops.json`
//! Searched in `./` then `~/.config/agent-sops/`.
//!
//! Supports `${ENV_VAR}` and `${ENV_VAR:-fallback}` substitution in the raw
//! file text.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;

pub use {
    error::{Error, Result},
    loader::{
        BUILTIN_DIR_ENV, RULES_DIR_ENV, SOP_PATHS_ENV, apply_env_overrides, config_dir,
        discover_and_load, load_config,
    },
    schema::{ServerConfig, SopsConfig},
};
