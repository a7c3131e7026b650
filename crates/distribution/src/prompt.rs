//! SOPs served as prompts.
//!
//! One generic handler renders any entry; the table only stores the
//! `(name, content)` pairs captured from the registry.

use std::collections::HashMap;

use sops_registry::{Error, Result, SopRegistry};

/// A prompt captured from one registry document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptEntry {
    pub name: String,
    pub description: String,
    pub content: String,
}

impl PromptEntry {
    pub fn render(&self, user_input: &str) -> String {
        render_prompt(&self.name, &self.content, user_input)
    }
}

/// Name-indexed dispatch table of prompts, in registry order.
#[derive(Debug, Clone, Default)]
pub struct PromptTable {
    entries: Vec<PromptEntry>,
    index: HashMap<String, usize>,
}

impl PromptTable {
    pub fn from_registry(registry: &SopRegistry) -> Self {
        let entries: Vec<PromptEntry> = registry
            .list()
            .iter()
            .map(|doc| PromptEntry {
                name: doc.name.clone(),
                description: doc.description.clone(),
                content: doc.content.clone(),
            })
            .collect();
        let index = entries
            .iter()
            .enumerate()
            .map(|(idx, e)| (e.name.clone(), idx))
            .collect();
        Self { entries, index }
    }

    pub fn list(&self) -> &[PromptEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Result<&PromptEntry> {
        self.index
            .get(name)
            .map(|&idx| &self.entries[idx])
            .ok_or_else(|| Error::UnknownName {
                name: name.to_string(),
                available: self.entries.iter().map(|e| e.name.clone()).collect(),
            })
    }

    /// Render the named prompt with the caller's input.
    pub fn render(&self, name: &str, user_input: &str) -> Result<String> {
        self.get(name).map(|entry| entry.render(user_input))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Wrap a SOP and the caller's input in `<agent-sop>` tags.
pub fn render_prompt(name: &str, content: &str, user_input: &str) -> String {
    format!(
        "Run this SOP:\n<agent-sop name=\"{name}\">\n<content>\n{content}\n</content>\n<user-input>\n{user_input}\n</user-input>\n</agent-sop>"
    )
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        sops_registry::{SopDocument, SourceTier},
        std::path::PathBuf,
    };

    fn registry() -> SopRegistry {
        let doc = |name: &str, content: &str| SopDocument {
            name: name.into(),
            description: format!("{name} description"),
            content: content.into(),
            source_tier: SourceTier::Builtin,
            path: PathBuf::from(format!("{name}.sop.md")),
        };
        SopRegistry::from_documents(vec![
            doc("code-assist", "## Overview\nHelps write code."),
            doc("pdd", "## Overview\nPlans things."),
        ])
    }

    #[test]
    fn renders_the_captured_document() {
        let table = PromptTable::from_registry(&registry());
        let out = table.render("pdd", "build a dotfile syncer").unwrap();
        assert_eq!(
            out,
            "Run this SOP:\n<agent-sop name=\"pdd\">\n<content>\n## Overview\nPlans things.\n</content>\n<user-input>\nbuild a dotfile syncer\n</user-input>\n</agent-sop>"
        );
    }

    #[test]
    fn each_entry_keeps_its_own_content() {
        let table = PromptTable::from_registry(&registry());
        let a = table.render("code-assist", "").unwrap();
        let b = table.render("pdd", "").unwrap();
        assert!(a.contains("Helps write code.") && !a.contains("Plans things."));
        assert!(b.contains("Plans things.") && !b.contains("Helps write code."));
    }

    #[test]
    fn keeps_registry_order() {
        let table = PromptTable::from_registry(&registry());
        let names: Vec<_> = table.list().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["code-assist", "pdd"]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn unknown_prompt_lists_known_names() {
        let table = PromptTable::from_registry(&registry());
        let msg = table.render("deploy", "").unwrap_err().to_string();
        assert!(msg.contains("deploy"));
        assert!(msg.contains("code-assist") && msg.contains("pdd"));
    }
}
