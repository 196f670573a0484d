//! synd-tool - run one Syndicast agent tool from the command line

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use libsyndicast::api::HttpApiClient;
use libsyndicast::confirm::{ConfirmationGate, ScriptedGate, StdinGate};
use libsyndicast::logging::{LogFormat, LoggingConfig, LOG_FORMAT_ENV, LOG_LEVEL_ENV};
use libsyndicast::tools::definitions;
use libsyndicast::{Config, PublishService, SyndicastError, ToolRegistry, ToolResult};
use serde_json::Value;
use tracing::{debug, warn};

#[derive(Parser, Debug)]
#[command(name = "synd-tool")]
#[command(version, about = "Run a Syndicast publishing tool and print its JSON result")]
#[command(long_about = r#"Run one Syndicast agent tool and print the structured result as JSON.

Arguments are passed as a single JSON object, using the same field names
the agent host sends. Publishing tools ask for confirmation on the terminal
unless confirmation is disabled in the config or --yes is given.

EXAMPLES:
    # Show every tool with its input schema
    synd-tool --list

    # Publish now to twitter and linkedin
    synd-tool create_post '{"content": "Hello!", "platforms": ["twitter", "linkedin"]}'

    # Schedule a thread
    synd-tool create_thread '{"platform": "threads", "schedule_for": "2024-12-25T10:00:00Z",
        "items": [{"content": "1/ Big news"}, {"content": "2/ Details"}]}'

    # Check connected accounts after a failed post
    synd-tool check_account_health

EXIT CODES:
    0 - Success (including a post cancelled at the prompt)
    1 - Tool failed (upload, submission, API or config error)
    2 - Authentication rejected by the publishing API
    3 - Invalid arguments
"#)]
struct Cli {
    /// Tool to run (see --list)
    #[arg(value_name = "TOOL", required_unless_present = "list")]
    tool: Option<String>,

    /// Tool arguments as a JSON object
    #[arg(value_name = "JSON", default_value = "{}")]
    args: String,

    /// Print the tool definitions as JSON and exit
    #[arg(long)]
    list: bool,

    /// Path to configuration file
    #[arg(short, long, env = "SYNDICAST_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Approve confirmation prompts without asking
    #[arg(short, long)]
    yes: bool,

    /// Log format (text, json, pretty)
    #[arg(long, env = LOG_FORMAT_ENV, default_value = "text", value_name = "FORMAT")]
    log_format: LogFormat,

    /// Log level when --verbose is not given
    #[arg(long, env = LOG_LEVEL_ENV, default_value = "warn", value_name = "LEVEL")]
    log_level: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    LoggingConfig::new(cli.log_format, cli.log_level.clone(), cli.verbose).init();

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<i32> {
    if cli.list {
        print_json(&definitions())?;
        return Ok(0);
    }

    let tool = cli.tool.clone().context("no tool given; use --list to see the tools")?;

    let result = match invoke(&cli, &tool).await {
        Ok(result) => result,
        Err(e) => ToolResult::from_error(&e),
    };

    print_json(&result)?;
    Ok(result.exit_code())
}

async fn invoke(cli: &Cli, tool: &str) -> libsyndicast::Result<ToolResult> {
    let input: Value = serde_json::from_str(&cli.args).map_err(|e| {
        SyndicastError::Validation(format!("tool arguments are not valid JSON: {}", e))
    })?;

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    debug!(base_url = %config.api.base_url, "Loaded configuration");

    // A disabled agent needs no API key; refuse before building the client.
    if !config.agent.enabled {
        warn!(tool, "Agent tools are disabled");
        return Ok(ToolResult::failure("agent tools are disabled"));
    }

    let api = HttpApiClient::from_config(&config.api)?;
    let gate: Arc<dyn ConfirmationGate> = if cli.yes {
        Arc::new(ScriptedGate::approve())
    } else {
        Arc::new(StdinGate)
    };

    let registry = ToolRegistry::new(PublishService::new(Arc::new(api), config.agent, gate));
    Ok(registry.dispatch(tool, input).await)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
