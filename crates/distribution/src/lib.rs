//! Consumers of the SOP registry: the prompt table and tools served to
//! agents, renderers for skill bundles and IDE commands, and the SOP
//! authoring rule.

pub mod prompt;
pub mod render;
pub mod rules;
pub mod tools;

pub use {
    prompt::{PromptEntry, PromptTable, render_prompt},
    render::{CommandRenderer, DocumentRenderer, RenderTarget, SkillRenderer},
    rules::sop_format_rule,
    tools::{GetAgentSopTool, ListAgentSopsTool, SopTool, ToolTable},
};
