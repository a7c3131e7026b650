//! Tools for browsing the SOP registry.

use std::{collections::HashMap, sync::Arc};

use {
    anyhow::{Result, anyhow},
    async_trait::async_trait,
    serde::Serialize,
    serde_json::{Value, json},
    sops_registry::{Parameter, SopMetadata, SopRegistry},
};

/// Agent-callable tool.
#[async_trait]
pub trait SopTool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters_schema(&self) -> Value;
    async fn execute(&self, params: Value) -> Result<Value>;
}

// ── list_agent_sops ─────────────────────────────────────────────────────────

#[derive(Serialize)]
struct SopSummary<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a [Parameter],
}

/// Lists every SOP with its description and parameters.
pub struct ListAgentSopsTool {
    registry: Arc<SopRegistry>,
}

impl ListAgentSopsTool {
    pub fn new(registry: Arc<SopRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl SopTool for ListAgentSopsTool {
    fn name(&self) -> &str {
        "list_agent_sops"
    }

    fn description(&self) -> &str {
        "List all available agent SOPs with their name, description and parameters."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _params: Value) -> Result<Value> {
        let metadata = self.registry.list_metadata();
        let summaries: Vec<_> = metadata
            .iter()
            .map(|m| SopSummary {
                name: &m.name,
                description: &m.description,
                parameters: &m.parameters,
            })
            .collect();
        Ok(serde_json::to_value(summaries)?)
    }
}

// ── get_agent_sop ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct SopDetail<'a> {
    #[serde(flatten)]
    metadata: SopMetadata,
    content: &'a str,
}

/// Returns one SOP's full metadata and raw content.
pub struct GetAgentSopTool {
    registry: Arc<SopRegistry>,
}

impl GetAgentSopTool {
    pub fn new(registry: Arc<SopRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl SopTool for GetAgentSopTool {
    fn name(&self) -> &str {
        "get_agent_sop"
    }

    fn description(&self) -> &str {
        "Get the full content and metadata of a specific SOP, including \
         parameters, examples and troubleshooting."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["sop_name"],
            "properties": {
                "sop_name": {
                    "type": "string",
                    "description": "Name of the SOP to retrieve"
                }
            }
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let name = params
            .get("sop_name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow!("missing 'sop_name'"))?;

        let doc = self.registry.get(name)?;
        let detail = SopDetail {
            metadata: sops_registry::metadata::build_metadata(doc),
            content: &doc.content,
        };
        Ok(serde_json::to_value(detail)?)
    }
}

// ── Dispatch table ──────────────────────────────────────────────────────────

/// Name-indexed set of tools.
#[derive(Default, Clone)]
pub struct ToolTable {
    tools: HashMap<String, Arc<dyn SopTool>>,
}

impl ToolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The two registry tools over a shared registry.
    pub fn for_registry(registry: Arc<SopRegistry>) -> Self {
        let mut table = Self::new();
        table.register(Box::new(ListAgentSopsTool::new(Arc::clone(&registry))));
        table.register(Box::new(GetAgentSopTool::new(registry)));
        table
    }

    pub fn register(&mut self, tool: Box<dyn SopTool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, Arc::from(tool));
    }

    pub fn get(&self, name: &str) -> Option<&dyn SopTool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Tool names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Schemas for every tool, sorted by name.
    pub fn list_schemas(&self) -> Vec<Value> {
        self.names()
            .into_iter()
            .filter_map(|name| self.get(name))
            .map(|t| {
                json!({
                    "name": t.name(),
                    "description": t.description(),
                    "parameters": t.parameters_schema(),
                })
            })
            .collect()
    }

    /// Dispatch a call by tool name.
    pub async fn call(&self, name: &str, params: Value) -> Result<Value> {
        let tool = self
            .get(name)
            .ok_or_else(|| anyhow!("unknown tool '{name}'. Available tools: {:?}", self.names()))?;
        tool.execute(params).await
    }
}
