use std::collections::HashMap;

use {
    sops_config::SopsConfig,
    tracing::{debug, info},
};

use crate::{
    discover::{FsSopDiscoverer, SopDiscoverer},
    error::{Error, Result},
    metadata::build_metadata,
    types::{SopDocument, SopMetadata},
};

/// Immutable, per-invocation collection of SOPs, keyed by name and kept in
/// first-seen order.
#[derive(Debug, Clone, Default)]
pub struct SopRegistry {
    documents: Vec<SopDocument>,
    index: HashMap<String, usize>,
}

impl SopRegistry {
    /// Merge tiers given in precedence order. The first document seen for a
    /// name wins; later ones (in the same or a lower tier) are dropped.
    pub fn from_tiers<I>(tiers: I) -> Self
    where
        I: IntoIterator<Item = Vec<SopDocument>>,
    {
        let mut registry = Self::default();
        for doc in tiers.into_iter().flatten() {
            registry.insert_first(doc);
        }
        registry
    }

    /// Registry over a single tier.
    pub fn from_documents(documents: Vec<SopDocument>) -> Self {
        Self::from_tiers([documents])
    }

    /// Populate the registry from a discoverer.
    pub async fn from_discoverer(discoverer: &dyn SopDiscoverer) -> Self {
        let scans = discoverer.discover().await;
        Self::from_tiers(scans.into_iter().map(|scan| scan.documents))
    }

    fn insert_first(&mut self, doc: SopDocument) {
        if let Some(&existing) = self.index.get(&doc.name) {
            let kept = &self.documents[existing];
            debug!(
                name = %doc.name,
                kept = %kept.source_tier,
                dropped = %doc.source_tier,
                path = %doc.path.display(),
                "SOP shadowed by higher-precedence copy"
            );
            return;
        }
        self.index.insert(doc.name.clone(), self.documents.len());
        self.documents.push(doc);
    }

    /// All documents in registry order.
    pub fn list(&self) -> &[SopDocument] {
        &self.documents
    }

    /// Fetch a document by exact name.
    pub fn get(&self, name: &str) -> Result<&SopDocument> {
        self.index
            .get(name)
            .map(|&idx| &self.documents[idx])
            .ok_or_else(|| Error::UnknownName {
                name: name.to_string(),
                available: self.names().map(String::from).collect(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Metadata for one document.
    pub fn metadata(&self, name: &str) -> Result<SopMetadata> {
        self.get(name).map(build_metadata)
    }

    /// Metadata for every document, in registry order.
    pub fn list_metadata(&self) -> Vec<SopMetadata> {
        self.documents.iter().map(build_metadata).collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().map(|d| d.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Build the registry once for this process: configured external
/// directories first, built-in directory last.
pub async fn build_registry(config: &SopsConfig) -> SopRegistry {
    let discoverer = FsSopDiscoverer::from_config(config);
    let registry = SopRegistry::from_discoverer(&discoverer).await;
    info!(
        sources = discoverer.search_paths().len(),
        sops = registry.len(),
        "SOP registry built"
    );
    registry
}
