use airgate_domain::CliOverrides;
use clap::{Parser, Subcommand};
use tracing::info;

mod bootstrap;
mod commands;
mod di;
mod server;

use commands::{BlockCommand, DeviceCommand, UpstreamCommand};

#[derive(Parser)]
#[command(name = "airgate")]
#[command(version)]
#[command(about = "Airgate - wireless router core with DNS blocking and per-device traffic accounting")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Upstream resolver (IP or IP:PORT)
    #[arg(long)]
    upstream: Option<String>,

    /// State file path (":memory:" keeps state in memory only)
    #[arg(long, value_name = "FILE")]
    storage: Option<String>,

    /// Monitor-mode interface to capture frames from
    #[arg(long, value_name = "IFACE")]
    capture_interface: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the router (default)
    Run,
    /// Manage the DNS block list
    #[command(subcommand)]
    Block(BlockCommand),
    /// Show or change the upstream resolver
    #[command(subcommand)]
    Upstream(UpstreamCommand),
    /// Manage per-device settings
    #[command(subcommand)]
    Device(DeviceCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.dns_port,
        bind_address: cli.bind.clone(),
        upstream: cli.upstream.clone(),
        storage_path: cli.storage.clone(),
        capture_interface: cli.capture_interface.clone(),
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;
    bootstrap::init_logging(&config);

    let stores = bootstrap::open_stores(&config.storage.path).await?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            info!("Starting Airgate v{}", env!("CARGO_PKG_VERSION"));
            bootstrap::check_privileges(&config);
            server::run(config, stores).await?;
        }
        Command::Block(command) => {
            let ctx = di::AppContext::build(&config, &stores, Vec::new()).await?;
            commands::block(&ctx, command).await?;
        }
        Command::Upstream(command) => {
            let ctx = di::AppContext::build(&config, &stores, Vec::new()).await?;
            commands::upstream(&ctx, command).await?;
        }
        Command::Device(command) => {
            let ctx = di::AppContext::build(&config, &stores, Vec::new()).await?;
            commands::device(&ctx, command).await?;
        }
    }

    Ok(())
}
