use std::path::PathBuf;

use {async_trait::async_trait, futures::future::join_all, sops_config::SopsConfig, tracing::error};

use crate::{
    error::Context,
    loader::{self, DirectoryScan, LoadFailure},
    paths,
    types::SourceTier,
};

/// Discovers SOP documents, one scan per tier.
#[async_trait]
pub trait SopDiscoverer: Send + Sync {
    /// Scan every configured source and return the results in precedence
    /// order, whatever order the scans finished in.
    async fn discover(&self) -> Vec<DirectoryScan>;
}

/// Default filesystem-based discoverer.
pub struct FsSopDiscoverer {
    /// (path, tier) pairs to scan, in precedence order.
    search_paths: Vec<(PathBuf, SourceTier)>,
}

impl FsSopDiscoverer {
    pub fn new(search_paths: Vec<(PathBuf, SourceTier)>) -> Self {
        Self { search_paths }
    }

    /// External directories from `sop_paths` in order, then the built-in directory.
    pub fn from_config(config: &SopsConfig) -> Self {
        Self::new(Self::default_paths(config))
    }

    pub fn default_paths(config: &SopsConfig) -> Vec<(PathBuf, SourceTier)> {
        let external = config
            .sop_paths
            .as_deref()
            .map(paths::resolve)
            .unwrap_or_default();

        let mut search_paths: Vec<_> = external
            .into_iter()
            .enumerate()
            .map(|(idx, dir)| (dir, SourceTier::External(idx)))
            .collect();
        search_paths.push((
            paths::builtin_dir(config.builtin_dir.as_deref()),
            SourceTier::Builtin,
        ));
        search_paths
    }

    pub fn search_paths(&self) -> &[(PathBuf, SourceTier)] {
        &self.search_paths
    }
}

#[async_trait]
impl SopDiscoverer for FsSopDiscoverer {
    async fn discover(&self) -> Vec<DirectoryScan> {
        // join_all yields results in input order, so tier order survives
        // even though directories are scanned concurrently.
        let scans = self.search_paths.iter().cloned().map(|(dir, tier)| async move {
            let scan_path = dir.clone();
            let task = tokio::task::spawn_blocking(move || loader::scan_dir(&scan_path, tier));
            match task.await.context("scan task failed") {
                Ok(scan) => scan,
                Err(e) => {
                    error!(dir = %dir.display(), error = %e, "SOP scan task failed");
                    DirectoryScan {
                        documents: Vec::new(),
                        failures: vec![LoadFailure { path: dir, error: e }],
                    }
                },
            }
        });
        join_all(scans).await
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, std::path::Path};

    fn sop(dir: &Path, name: &str, overview: &str) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(
            dir.join(format!("{name}.sop.md")),
            format!("# {name}\n\n## Overview\n{overview}\n"),
        )
        .unwrap();
    }

    #[tokio::test]
    async fn scans_come_back_in_tier_order() {
        let tmp = tempfile::tempdir().unwrap();
        let first = tmp.path().join("first");
        let second = tmp.path().join("second");
        sop(&first, "shared", "from first");
        sop(&second, "shared", "from second");
        sop(&second, "extra", "only second");

        let discoverer = FsSopDiscoverer::new(vec![
            (first, SourceTier::External(0)),
            (tmp.path().join("missing"), SourceTier::External(1)),
            (second, SourceTier::Builtin),
        ]);
        let scans = discoverer.discover().await;
        assert_eq!(scans.len(), 3);
        assert_eq!(scans[0].documents[0].description, "from first");
        assert!(scans[1].documents.is_empty());
        assert_eq!(scans[1].failures.len(), 1);
        assert_eq!(scans[2].documents.len(), 2);
        assert!(
            scans[2]
                .documents
                .iter()
                .all(|d| d.source_tier == SourceTier::Builtin)
        );
    }

    #[test]
    fn default_paths_put_builtin_last() {
        let config = SopsConfig {
            sop_paths: Some("/nonexistent-a::/nonexistent-b".into()),
            builtin_dir: Some(PathBuf::from("/opt/builtin")),
            ..Default::default()
        };
        let paths = FsSopDiscoverer::default_paths(&config);
        assert_eq!(paths, vec![
            (PathBuf::from("/nonexistent-a"), SourceTier::External(0)),
            (PathBuf::from("/nonexistent-b"), SourceTier::External(1)),
            (PathBuf::from("/opt/builtin"), SourceTier::Builtin),
        ]);
    }

    #[test]
    fn no_sop_paths_means_builtin_only() {
        let paths = FsSopDiscoverer::default_paths(&SopsConfig::default());
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].1, SourceTier::Builtin);
    }
}
