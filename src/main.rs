use alloy_mcp_client::{config::Config, demo, logging, mcp::client::McpClient};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::info;

#[derive(Debug, Parser)]
#[command(version, about = "Talk to a hosted MCP server over JSON-RPC/HTTP")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Initialize, list tools, run the first tool and list resources
    Demo,
    /// List the server's tools
    Tools,
    /// List the server's resources
    Resources,
    /// List the server's prompts
    Prompts,
    /// Execute one tool
    Call {
        name: String,
        /// Tool arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
    },
    /// Read one resource by URI
    Read { uri: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let client = McpClient::new(config.client_config()?)?;

    info!(
        timeout_secs = config.timeout.as_secs(),
        bearer_auth = config.bearer_auth,
        "client starting"
    );

    match cli.command.unwrap_or(Command::Demo) {
        Command::Demo => demo::run_demo(&client).await?,
        Command::Tools => demo::show_tools(&client).await?,
        Command::Resources => demo::show_resources(&client).await?,
        Command::Prompts => demo::show_prompts(&client).await?,
        Command::Call { name, args } => {
            let arguments: Value = serde_json::from_str(&args)?;
            demo::call_tool(&client, &name, arguments).await?;
        }
        Command::Read { uri } => demo::read_resource(&client, &uri).await?,
    }

    Ok(())
}
