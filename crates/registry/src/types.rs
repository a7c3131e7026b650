use std::{fmt, path::PathBuf};

use serde::{Deserialize, Serialize};

/// File-name suffix that marks a candidate SOP document.
pub const SOP_SUFFIX: &str = ".sop.md";

// ── Source tiers ─────────────────────────────────────────────────────────────

/// Precedence level a document was loaded from.
///
/// External tiers (in the order their directories were configured) always
/// rank above the single built-in tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceTier {
    /// Index into the resolved external path list.
    External(usize),
    /// The directory shipped alongside the program.
    Builtin,
}

impl fmt::Display for SourceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::External(idx) => write!(f, "external[{idx}]"),
            Self::Builtin => write!(f, "builtin"),
        }
    }
}

// ── Documents ────────────────────────────────────────────────────────────────

/// One parsed SOP file. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SopDocument {
    /// File name with the `.sop.md` suffix stripped.
    pub name: String,
    /// Overview section collapsed onto a single line. Never empty.
    pub description: String,
    /// Raw file text, byte-for-byte.
    pub content: String,
    /// Tier the document came from; only used while merging.
    pub source_tier: SourceTier,
    /// Where the document was read from.
    pub path: PathBuf,
}

/// Declared input to a SOP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub required: bool,
    /// Only set for optional parameters that declare one.
    pub default: Option<String>,
    pub description: String,
}

/// Descriptor handed to distribution backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SopMetadata {
    pub name: String,
    pub description: String,
    /// In declaration order.
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub troubleshooting: Option<String>,
}

impl SopMetadata {
    /// Look a parameter up by name.
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn required_parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().filter(|p| p.required)
    }

    pub fn optional_parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().filter(|p| !p.required)
    }
}
