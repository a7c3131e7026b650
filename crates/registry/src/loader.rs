//! Scanning a single directory for `*.sop.md` files.
//!
//! Nothing here returns an error: every failure becomes a [`LoadFailure`],
//! is logged, and contributes zero documents.

use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use crate::{
    error::Error,
    parse,
    types::{SOP_SUFFIX, SopDocument, SourceTier},
};

/// A file or directory that contributed nothing, and why.
#[derive(Debug)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: Error,
}

/// Result of scanning one directory.
#[derive(Debug, Default)]
pub struct DirectoryScan {
    /// Parsed documents in file-name order.
    pub documents: Vec<SopDocument>,
    pub failures: Vec<LoadFailure>,
}

impl DirectoryScan {
    fn fail(&mut self, path: &Path, err: Error) {
        if err.is_expected() {
            warn!(path = %path.display(), error = %err, "skipping SOP source");
        } else {
            error!(path = %path.display(), error = %err, "skipping SOP source");
        }
        self.failures.push(LoadFailure {
            path: path.to_path_buf(),
            error: err,
        });
    }
}

/// Registry name for a candidate file, or `None` if it isn't one.
///
/// `foo.sop.md` → `foo`; `foo.md` and a bare `.sop.md` are not documents.
pub fn sop_name(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(SOP_SUFFIX)
        .filter(|stem| !stem.is_empty())
}

/// Load every parseable SOP in `dir`.
pub fn load_dir(dir: &Path, tier: SourceTier) -> Vec<SopDocument> {
    scan_dir(dir, tier).documents
}

/// Scan `dir` (non-recursively), keeping failures for reporting.
pub fn scan_dir(dir: &Path, tier: SourceTier) -> DirectoryScan {
    let mut scan = DirectoryScan::default();

    if !dir.exists() {
        scan.fail(dir, Error::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
        return scan;
    }
    if !dir.is_dir() {
        scan.fail(dir, Error::NotADirectory {
            path: dir.to_path_buf(),
        });
        return scan;
    }

    let candidates = match list_candidates(dir) {
        Ok(c) => c,
        Err(source) => {
            scan.fail(dir, Error::DirectoryScan {
                path: dir.to_path_buf(),
                source,
            });
            return scan;
        },
    };

    for (name, path) in candidates {
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(source) => {
                scan.fail(&path, Error::FileRead {
                    path: path.clone(),
                    source,
                });
                continue;
            },
        };
        match parse::parse(&name, &content, tier, &path) {
            Ok(doc) => scan.documents.push(doc),
            Err(e) => scan.fail(&path, e),
        }
    }

    debug!(
        dir = %dir.display(),
        %tier,
        loaded = scan.documents.len(),
        skipped = scan.failures.len(),
        "scanned SOP directory"
    );
    scan
}

/// Candidate `(name, path)` pairs sorted by file name.
fn list_candidates(dir: &Path) -> std::io::Result<Vec<(String, PathBuf)>> {
    let mut candidates = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str().and_then(sop_name) else {
            continue;
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        candidates.push((name.to_string(), path));
    }
    candidates.sort_by(|a, b| a.1.file_name().cmp(&b.1.file_name()));
    Ok(candidates)
}
