//! One-shot administrative commands acting on the persisted state.

use crate::di::AppContext;
use airgate_domain::MacAddress;
use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum BlockCommand {
    /// Block a domain and all of its subdomains
    Add { domain: String },
    /// Remove a domain from the block list
    Remove { domain: String },
    /// Print the block list
    List,
    /// Empty the block list
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum UpstreamCommand {
    /// Print the upstream resolver in use
    Show,
    /// Replace the upstream resolver (`IP` or `IP:PORT`)
    Set { address: String },
}

#[derive(Subcommand, Debug)]
pub enum DeviceCommand {
    /// Set the display name of a device; an empty name clears it
    Rename { mac: MacAddress, name: String },
    /// Zero the persisted traffic counters of every device
    ResetAll,
}

pub async fn block(ctx: &AppContext, command: BlockCommand) -> anyhow::Result<()> {
    let use_cases = &ctx.use_cases;
    match command {
        BlockCommand::Add { domain } => {
            if use_cases.add_blocked_domain.execute(&domain).await? {
                println!("Blocked {}", domain);
            } else {
                println!("{} is already blocked", domain);
            }
        }
        BlockCommand::Remove { domain } => {
            if use_cases.remove_blocked_domain.execute(&domain).await {
                println!("Unblocked {}", domain);
            } else {
                anyhow::bail!("{} is not in the block list", domain);
            }
        }
        BlockCommand::List => {
            for domain in use_cases.get_blocked_domains.execute() {
                println!("{}", domain);
            }
        }
        BlockCommand::Clear => {
            let removed = use_cases.clear_blocked_domains.execute().await;
            println!("Removed {} domains", removed);
        }
    }
    Ok(())
}

pub async fn upstream(ctx: &AppContext, command: UpstreamCommand) -> anyhow::Result<()> {
    match command {
        UpstreamCommand::Show => println!("{}", ctx.state.upstream()),
        UpstreamCommand::Set { address } => {
            let upstream = ctx.use_cases.set_upstream.execute(&address).await?;
            println!("Upstream set to {}", upstream);
        }
    }
    Ok(())
}

pub async fn device(ctx: &AppContext, command: DeviceCommand) -> anyhow::Result<()> {
    match command {
        DeviceCommand::Rename { mac, name } => {
            ctx.use_cases.rename_device.execute(&mac, &name).await?;
            if name.trim().is_empty() {
                println!("Cleared name of {}", mac);
            } else {
                println!("{} is now {}", mac, name.trim());
            }
        }
        DeviceCommand::ResetAll => {
            ctx.use_cases.reset_device_stats.execute_all().await;
            println!("Device counters reset");
        }
    }
    Ok(())
}
