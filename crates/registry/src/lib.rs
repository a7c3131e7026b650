//! SOP registry: path resolution, discovery, parsing, first-wins merging,
//! and metadata for distribution backends.
//!
//! SOPs are `*.sop.md` markdown files with a required `## Overview` section
//! and optional `## Parameters`, `## Steps`, `## Examples` and
//! `## Troubleshooting` sections.

pub mod discover;
pub mod error;
pub mod loader;
pub mod metadata;
pub mod parse;
pub mod paths;
pub mod registry;
pub mod types;

pub use {
    error::{Error, Result},
    registry::{SopRegistry, build_registry},
    types::{Parameter, SopDocument, SopMetadata, SourceTier},
};
