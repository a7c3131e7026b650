use std::path::PathBuf;

use sops_common::FromMessage;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no Overview section found")]
    MissingOverviewSection,
    #[error("Overview section is empty")]
    EmptyOverviewSection,
    #[error("SOP directory does not exist: {}", path.display())]
    DirectoryNotFound { path: PathBuf },
    #[error("SOP path is not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },
    #[error("error loading SOP from {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("error scanning directory {}: {source}", path.display())]
    DirectoryScan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("SOP '{name}' not found. Available SOPs: [{}]", available.join(", "))]
    UnknownName {
        name: String,
        available: Vec<String>,
    },
    #[error("{message}")]
    Message { message: String },
}

impl Error {
    /// Whether this failure should be logged at `warn` rather than `error`.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::MissingOverviewSection
                | Self::EmptyOverviewSection
                | Self::DirectoryNotFound { .. }
                | Self::NotADirectory { .. }
        )
    }
}

impl FromMessage for Error {
    fn from_message(message: String) -> Self {
        Self::Message { message }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

sops_common::impl_context!();
