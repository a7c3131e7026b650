mod check_commands;
mod sop_commands;

use std::path::PathBuf;

use {
    clap::{Parser, Subcommand},
    sops_config::SopsConfig,
    sops_distribution::RenderTarget,
    tracing::debug,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "agent-sops", about = "agent-sops — discover, inspect and render agent SOPs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Colon-separated SOP directories, searched before the built-in SOPs
    /// (overrides config and AGENT_SOP_PATHS).
    #[arg(long, global = true)]
    sop_paths: Option<String>,

    /// Config file to load instead of searching for agent-sops.{toml,yaml,json}.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List every SOP in the registry.
    List {
        /// Print metadata as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show one SOP's metadata and content.
    Show {
        /// SOP name.
        name: String,
        #[arg(long)]
        json: bool,
    },
    /// Render a SOP as a prompt.
    Prompt {
        /// SOP name.
        name: String,
        /// Text placed in the prompt's user-input block.
        #[arg(long, default_value = "")]
        input: String,
    },
    /// Render a SOP as a skill bundle or IDE command document.
    Render {
        /// SOP name.
        name: String,
        /// Output format: skill or command.
        #[arg(long)]
        target: RenderTarget,
    },
    /// List the SOP tools, or call one.
    Tool {
        /// Tool to call; omit to print every tool schema.
        name: Option<String>,
        /// Tool arguments as a JSON object.
        #[arg(long, default_value = "{}")]
        args: String,
    },
    /// Print the SOP authoring rule.
    Rule,
    /// Validate SOP directories and report per-document status.
    Check {
        /// Directories to check (default: the configured search path).
        dirs: Vec<PathBuf>,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries command output only.
    if cli.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Load config, then let `--sop-paths` override everything else.
fn load_config(cli: &Cli) -> anyhow::Result<SopsConfig> {
    let mut config = sops_config::discover_and_load(cli.config.as_deref())?;
    if let Some(ref paths) = cli.sop_paths {
        config.sop_paths = Some(paths.clone());
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);

    debug!(version = env!("CARGO_PKG_VERSION"), "agent-sops starting");

    let config = load_config(&cli)?;

    match cli.command {
        Commands::List { json } => sop_commands::handle_list(&config, json).await,
        Commands::Show { name, json } => sop_commands::handle_show(&config, &name, json).await,
        Commands::Prompt { name, input } => {
            sop_commands::handle_prompt(&config, &name, &input).await
        },
        Commands::Render { name, target } => {
            sop_commands::handle_render(&config, &name, target).await
        },
        Commands::Tool { name, args } => {
            sop_commands::handle_tool(&config, name.as_deref(), &args).await
        },
        Commands::Rule => sop_commands::handle_rule(&config),
        Commands::Check { dirs } => check_commands::handle_check(&config, dirs).await,
    }
}
