pub mod storage;

use airgate_domain::{CliOverrides, Config};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

pub use storage::open_stores;

pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, overrides)?;
    config.validate()?;
    Ok(config)
}

/// `RUST_LOG` wins over the configured level when set.
pub fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Warns when the DNS port needs privileges the process does not have.
#[cfg(unix)]
pub fn check_privileges(config: &Config) {
    // SAFETY: geteuid has no preconditions and cannot fail.
    let euid = unsafe { libc::geteuid() };
    if config.server.dns_port < 1024 && euid != 0 {
        warn!(
            port = config.server.dns_port,
            euid, "Binding a privileged DNS port without root; expect EACCES unless CAP_NET_BIND_SERVICE is granted"
        );
    }
}

#[cfg(not(unix))]
pub fn check_privileges(_config: &Config) {}

/// Resolves on SIGINT or SIGTERM.
#[cfg(unix)]
pub async fn shutdown_signal() -> anyhow::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let name = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    info!(signal = name, "Shutdown requested");
    Ok(name)
}

#[cfg(not(unix))]
pub async fn shutdown_signal() -> anyhow::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    info!(signal = "SIGINT", "Shutdown requested");
    Ok("SIGINT")
}
