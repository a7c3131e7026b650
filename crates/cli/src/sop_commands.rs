//! `agent-sops list|show|prompt|render|tool|rule` — read-only views of the
//! SOP registry.

use std::sync::Arc;

use {
    anyhow::{Context, Result, bail},
    serde_json::{Value, json},
    sops_config::SopsConfig,
    sops_distribution::{PromptTable, RenderTarget, ToolTable, sop_format_rule},
    sops_registry::build_registry,
};

pub async fn handle_list(config: &SopsConfig, json: bool) -> Result<()> {
    let registry = build_registry(config).await;
    if json {
        println!("{}", serde_json::to_string_pretty(&registry.list_metadata())?);
        return Ok(());
    }
    if registry.is_empty() {
        println!("No SOPs found.");
        return Ok(());
    }
    for doc in registry.list() {
        println!("  {} — {} [{}]", doc.name, doc.description, doc.source_tier);
    }
    Ok(())
}

pub async fn handle_show(config: &SopsConfig, name: &str, json: bool) -> Result<()> {
    let registry = build_registry(config).await;
    let doc = registry.get(name)?;
    let meta = registry.metadata(name)?;

    if json {
        let mut value = serde_json::to_value(&meta)?;
        if let Value::Object(ref mut map) = value {
            map.insert("content".into(), Value::String(doc.content.clone()));
            map.insert("source".into(), Value::String(doc.source_tier.to_string()));
            map.insert("path".into(), Value::String(doc.path.display().to_string()));
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("Name:        {}", meta.name);
    println!("Description: {}", meta.description);
    println!("Source:      {}", doc.source_tier);
    println!("Path:        {}", doc.path.display());
    if !meta.parameters.is_empty() {
        println!("Parameters:");
        for p in &meta.parameters {
            let qualifier = if p.required {
                "required".to_string()
            } else {
                match &p.default {
                    Some(default) => format!("optional, default: {default}"),
                    None => "optional".to_string(),
                }
            };
            println!("  {} ({qualifier}): {}", p.name, p.description);
        }
    }
    println!("\n{}", doc.content);
    Ok(())
}

pub async fn handle_prompt(config: &SopsConfig, name: &str, input: &str) -> Result<()> {
    let registry = build_registry(config).await;
    let prompts = PromptTable::from_registry(&registry);
    println!("{}", prompts.render(name, input)?);
    Ok(())
}

pub async fn handle_render(config: &SopsConfig, name: &str, target: RenderTarget) -> Result<()> {
    let registry = build_registry(config).await;
    let doc = registry.get(name)?;
    let meta = registry.metadata(name)?;
    let rendered = target
        .renderer()
        .render(doc, &meta)
        .with_context(|| format!("rendering '{name}' as {target}"))?;
    print!("{rendered}");
    Ok(())
}

pub async fn handle_tool(config: &SopsConfig, name: Option<&str>, args: &str) -> Result<()> {
    let registry = Arc::new(build_registry(config).await);
    let tools = ToolTable::for_registry(registry);

    let Some(name) = name else {
        let listing = json!({
            "server": config.server.name,
            "tools": tools.list_schemas(),
        });
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    };

    let params: Value =
        serde_json::from_str(args).with_context(|| format!("invalid --args JSON: {args}"))?;
    let result = tools.call(name, params).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub fn handle_rule(config: &SopsConfig) -> Result<()> {
    let Some(rule) = sop_format_rule(config.rules_dir.as_deref()) else {
        bail!("SOP format rule not found");
    };
    print!("{rule}");
    Ok(())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, std::path::Path};

    fn config_for(dir: &Path) -> SopsConfig {
        SopsConfig {
            builtin_dir: Some(dir.to_path_buf()),
            ..Default::default()
        }
    }

    fn write_sop(dir: &Path, name: &str, overview: &str) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(
            dir.join(format!("{name}.sop.md")),
            format!("# {name}\n\n## Overview\n{overview}\n"),
        )
        .unwrap();
    }

    #[tokio::test]
    async fn show_unknown_name_lists_available() {
        let tmp = tempfile::tempdir().unwrap();
        write_sop(tmp.path(), "pdd", "Plans things.");
        let err = handle_show(&config_for(tmp.path()), "nope", false)
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("nope") && err.contains("pdd"));
    }

    #[tokio::test]
    async fn tool_rejects_invalid_args() {
        let tmp = tempfile::tempdir().unwrap();
        let err = handle_tool(&config_for(tmp.path()), Some("get_agent_sop"), "{not json")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("--args"));
    }

    #[tokio::test]
    async fn tool_table_serves_registry_contents() {
        let tmp = tempfile::tempdir().unwrap();
        write_sop(tmp.path(), "pdd", "Plans things.");
        let registry = Arc::new(build_registry(&config_for(tmp.path())).await);
        let result = ToolTable::for_registry(registry)
            .call("get_agent_sop", json!({"sop_name": "pdd"}))
            .await
            .unwrap();
        assert_eq!(result["description"], "Plans things.");
    }

    #[test]
    fn rule_missing_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let config = SopsConfig {
            rules_dir: Some(tmp.path().to_path_buf()),
            ..Default::default()
        };
        assert!(handle_rule(&config).is_err());
    }
}
