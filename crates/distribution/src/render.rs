//! Renderers that turn registry records into distributable documents.
//!
//! Renderers only produce text; where a caller writes it is up to them.

use std::{fmt, str::FromStr};

use {
    anyhow::{Context, Result},
    serde::Serialize,
    sops_registry::{Parameter, SopDocument, SopMetadata},
};

use crate::prompt::render_prompt;

/// Output format of a distribution document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderTarget {
    /// `SKILL.md` with YAML frontmatter.
    Skill,
    /// IDE slash-command markdown.
    Command,
}

impl RenderTarget {
    pub fn renderer(self) -> Box<dyn DocumentRenderer> {
        match self {
            Self::Skill => Box::new(SkillRenderer),
            Self::Command => Box::new(CommandRenderer),
        }
    }
}

impl fmt::Display for RenderTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skill => write!(f, "skill"),
            Self::Command => write!(f, "command"),
        }
    }
}

impl FromStr for RenderTarget {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "skill" => Ok(Self::Skill),
            "command" => Ok(Self::Command),
            other => Err(format!(
                "unknown render target '{other}' (expected 'skill' or 'command')"
            )),
        }
    }
}

/// Turns one SOP into a document for a distribution target.
pub trait DocumentRenderer: Send + Sync {
    fn target(&self) -> RenderTarget;

    fn render(&self, doc: &SopDocument, metadata: &SopMetadata) -> Result<String>;
}

// ── Skill bundles ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct SkillFrontmatter<'a> {
    name: &'a str,
    description: &'a str,
}

/// `SKILL.md`: frontmatter with name and description, then the raw SOP.
pub struct SkillRenderer;

impl DocumentRenderer for SkillRenderer {
    fn target(&self) -> RenderTarget {
        RenderTarget::Skill
    }

    fn render(&self, doc: &SopDocument, metadata: &SopMetadata) -> Result<String> {
        let frontmatter = serde_yaml::to_string(&SkillFrontmatter {
            name: &metadata.name,
            description: &metadata.description,
        })
        .with_context(|| format!("serializing frontmatter for '{}'", metadata.name))?;
        Ok(format!("---\n{frontmatter}---\n\n{}", doc.content))
    }
}

// ── IDE commands ────────────────────────────────────────────────────────────

/// Slash-command document: usage header, parameter prompts, and the SOP
/// wrapped the same way prompts are.
pub struct CommandRenderer;

impl DocumentRenderer for CommandRenderer {
    fn target(&self) -> RenderTarget {
        RenderTarget::Command
    }

    fn render(&self, doc: &SopDocument, metadata: &SopMetadata) -> Result<String> {
        let name = &metadata.name;
        let wrapped = render_prompt(name, &doc.content, "");
        // Commands take their input interactively, so drop the empty input block.
        let wrapped = wrapped.replace("<user-input>\n\n</user-input>\n", "");

        Ok(format!(
            "# {title}\n\n{description}\n\n## Usage\n\nType `/` followed by `{name}` in the chat to execute this workflow.\n\n{parameters}\n---\n\n{wrapped}\n",
            title = title_case(name),
            description = metadata.description,
            parameters = parameter_instructions(&metadata.parameters),
        ))
    }
}

/// `code-assist` → `Code Assist`.
fn title_case(name: &str) -> String {
    name.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// The "## Parameters" block of a command document.
pub fn parameter_instructions(parameters: &[Parameter]) -> String {
    let mut out = String::from("## Parameters\n\n");
    if parameters.is_empty() {
        out.push_str(
            "This workflow does not require any parameters. Simply execute the command to begin.\n",
        );
        return out;
    }

    out.push_str("When you execute this command, I will prompt you for the following parameters:\n\n");

    let (required, optional): (Vec<_>, Vec<_>) = parameters.iter().partition(|p| p.required);
    if !required.is_empty() {
        out.push_str("### Required Parameters\n\n");
        for p in required {
            out.push_str(&format!("- **{}**: {}\n", p.name, p.description));
        }
        out.push('\n');
    }
    if !optional.is_empty() {
        out.push_str("### Optional Parameters\n\n");
        for p in optional {
            match &p.default {
                Some(default) => out.push_str(&format!(
                    "- **{}**: {} (default: {default})\n",
                    p.name, p.description
                )),
                None => out.push_str(&format!("- **{}**: {}\n", p.name, p.description)),
            }
        }
        out.push('\n');
    }

    out.push_str(
        "**Note**: Please provide all required parameters when prompted. Optional parameters can be skipped to use their default values.\n",
    );
    out
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        rstest::rstest,
        sops_registry::{SourceTier, metadata::build_metadata, parse::parse},
        std::path::Path,
    };

    const SOP: &str = "# Code Assist

## Overview
Helps write code: tests first.

## Parameters
- **task** (required): what to build
- **mode** (optional, default: auto): how to work
- **notes** (optional): anything else
";

    fn doc(content: &str) -> SopDocument {
        parse("code-assist", content, SourceTier::Builtin, Path::new("code-assist.sop.md")).unwrap()
    }

    #[test]
    fn skill_has_yaml_frontmatter_then_content() {
        let d = doc(SOP);
        let out = SkillRenderer.render(&d, &build_metadata(&d)).unwrap();
        assert!(out.starts_with("---\nname: code-assist\n"));
        assert!(out.ends_with(&format!("---\n\n{SOP}")));

        let yaml = out
            .strip_prefix("---\n")
            .and_then(|rest| rest.split_once("---\n"))
            .map(|(fm, _)| fm)
            .unwrap();
        let parsed: serde_yaml::Value = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(parsed["description"], "Helps write code: tests first.");
    }

    #[test]
    fn command_lists_required_and_optional_parameters() {
        let d = doc(SOP);
        let out = CommandRenderer.render(&d, &build_metadata(&d)).unwrap();
        assert!(out.starts_with("# Code Assist\n\nHelps write code: tests first.\n"));
        assert!(out.contains("`/` followed by `code-assist`"));
        assert!(out.contains("### Required Parameters\n\n- **task**: what to build\n"));
        assert!(out.contains("- **mode**: how to work (default: auto)\n"));
        assert!(out.contains("- **notes**: anything else\n"));
        assert!(out.contains("Run this SOP:\n<agent-sop name=\"code-assist\">\n<content>\n"));
        assert!(!out.contains("<user-input>"));
        assert!(out.trim_end().ends_with("</agent-sop>"));
    }

    #[test]
    fn command_without_parameters_says_so() {
        let d = doc("## Overview\nNo inputs.\n");
        let out = CommandRenderer.render(&d, &build_metadata(&d)).unwrap();
        assert!(out.contains("does not require any parameters"));
        assert!(!out.contains("### Required Parameters"));
    }

    #[rstest]
    #[case("code-assist", "Code Assist")]
    #[case("pdd", "Pdd")]
    #[case("codebase_summary", "Codebase Summary")]
    #[case("API-review", "Api Review")]
    fn titles(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(title_case(name), expected);
    }

    #[test]
    fn targets_parse_and_pick_their_renderer() {
        assert_eq!("skill".parse::<RenderTarget>(), Ok(RenderTarget::Skill));
        assert_eq!(
            "command".parse::<RenderTarget>().unwrap().renderer().target(),
            RenderTarget::Command
        );
        assert!("cursor".parse::<RenderTarget>().is_err());
    }
}
