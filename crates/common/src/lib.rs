//! Shared error plumbing for the agent-sops crates.

pub mod error;

pub use error::FromMessage;
