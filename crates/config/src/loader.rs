use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{
    env_subst::substitute_env,
    error::{Error, Result},
    schema::SopsConfig,
};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "agent-sops.toml",
    "agent-sops.yaml",
    "agent-sops.yml",
    "agent-sops.json",
];

/// Colon-separated external SOP directories.
pub const SOP_PATHS_ENV: &str = "AGENT_SOP_PATHS";
/// Override for the built-in SOP directory.
pub const BUILTIN_DIR_ENV: &str = "AGENT_SOPS_BUILTIN_DIR";
/// Override for the authoring-rules directory.
pub const RULES_DIR_ENV: &str = "AGENT_SOPS_RULES_DIR";

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<SopsConfig> {
    let raw = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config, then apply environment overrides.
///
/// With `explicit` set, only that file is read and a failure is returned.
/// Otherwise the search order is:
/// 1. `./agent-sops.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/agent-sops/agent-sops.{toml,yaml,yml,json}` (user-global)
///
/// A discovered file that fails to load is logged and defaults are used.
pub fn discover_and_load(explicit: Option<&Path>) -> Result<SopsConfig> {
    let config = match explicit {
        Some(path) => {
            debug!(path = %path.display(), "loading explicit config");
            load_config(path)?
        },
        None => match find_config_file() {
            Some(path) => {
                debug!(path = %path.display(), "loading config");
                load_config(&path).unwrap_or_else(|e| {
                    warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
                    SopsConfig::default()
                })
            },
            None => {
                debug!("no config file found, using defaults");
                SopsConfig::default()
            },
        },
    };
    Ok(apply_env_overrides(config))
}

/// Apply `AGENT_SOP_PATHS`, `AGENT_SOPS_BUILTIN_DIR` and `AGENT_SOPS_RULES_DIR`.
pub fn apply_env_overrides(config: SopsConfig) -> SopsConfig {
    apply_env_overrides_with(config, |name| std::env::var(name).ok())
}

fn apply_env_overrides_with(
    mut config: SopsConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> SopsConfig {
    let set = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(paths) = set(SOP_PATHS_ENV) {
        debug!(env = SOP_PATHS_ENV, "sop_paths overridden from environment");
        config.sop_paths = Some(paths);
    }
    if let Some(dir) = set(BUILTIN_DIR_ENV) {
        config.builtin_dir = Some(PathBuf::from(dir));
    }
    if let Some(dir) = set(RULES_DIR_ENV) {
        config.rules_dir = Some(PathBuf::from(dir));
    }
    config
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.is_file() {
            return Some(p);
        }
    }

    let dir = config_dir()?;
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
}

/// Returns the user-global config directory (`~/.config/agent-sops/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "agent-sops").map(|d| d.config_dir().to_path_buf())
}

fn parse_config(raw: &str, path: &Path) -> Result<SopsConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        other => Err(Error::UnsupportedFormat(other.to_string())),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_toml_with_server_section() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("agent-sops.toml");
        std::fs::write(
            &path,
            "sop_paths = \"~/sops:/srv/team\"\nbuiltin_dir = \"/opt/sops\"\n\n[server]\nname = \"team-sops\"\n",
        )
        .unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.sop_paths.as_deref(), Some("~/sops:/srv/team"));
        assert_eq!(cfg.builtin_dir, Some(PathBuf::from("/opt/sops")));
        assert_eq!(cfg.rules_dir, None);
        assert_eq!(cfg.server.name, "team-sops");
    }

    #[test]
    fn loads_yaml_and_json() {
        let tmp = tempfile::tempdir().unwrap();
        let yaml = tmp.path().join("agent-sops.yaml");
        std::fs::write(&yaml, "sop_paths: /a:/b\n").unwrap();
        assert_eq!(load_config(&yaml).unwrap().sop_paths.as_deref(), Some("/a:/b"));

        let json = tmp.path().join("agent-sops.json");
        std::fs::write(&json, r#"{"rules_dir": "/rules"}"#).unwrap();
        let cfg = load_config(&json).unwrap();
        assert_eq!(cfg.rules_dir, Some(PathBuf::from("/rules")));
        assert_eq!(cfg.server.name, "agent-sop-prompt-server");
    }

    #[test]
    fn rejects_unknown_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("agent-sops.ini");
        std::fs::write(&path, "sop_paths=/a").unwrap();
        assert!(matches!(
            load_config(&path),
            Err(Error::UnsupportedFormat(ext)) if ext == "ini"
        ));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope.toml");
        assert!(matches!(
            discover_and_load(Some(&missing)),
            Err(Error::Read { .. })
        ));
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let cfg = SopsConfig {
            sop_paths: Some("/from-file".into()),
            ..Default::default()
        };
        let cfg = apply_env_overrides_with(cfg, |name| match name {
            SOP_PATHS_ENV => Some("/from-env".into()),
            BUILTIN_DIR_ENV => Some("   ".into()),
            RULES_DIR_ENV => Some("/rules".into()),
            _ => None,
        });
        assert_eq!(cfg.sop_paths.as_deref(), Some("/from-env"));
        assert_eq!(cfg.builtin_dir, None);
        assert_eq!(cfg.rules_dir, Some(PathBuf::from("/rules")));
    }
}
