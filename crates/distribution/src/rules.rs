//! The SOP authoring rule shipped alongside the built-in SOPs.

use std::path::{Path, PathBuf};

use tracing::warn;

const RULES_DIR_NAME: &str = "rules";
const FORMAT_RULE_FILE: &str = "agent-sop-format.md";

/// Rules directory: explicit override, then `<exe dir>/rules`, then the
/// `rules/` directory shipped with this crate.
pub fn rules_dir(configured: Option<&Path>) -> PathBuf {
    if let Some(dir) = configured {
        return dir.to_path_buf();
    }
    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join(RULES_DIR_NAME)))
        .filter(|dir| dir.is_dir());
    beside_exe.unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join(RULES_DIR_NAME))
}

/// Text of the SOP format rule, or `None` when it cannot be read.
pub fn sop_format_rule(configured: Option<&Path>) -> Option<String> {
    let path = rules_dir(configured).join(FORMAT_RULE_FILE);
    match std::fs::read_to_string(&path) {
        Ok(text) => Some(text),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "SOP format rule unavailable");
            None
        },
    }
}
