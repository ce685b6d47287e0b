mod capture;
mod dns;

use crate::bootstrap::shutdown_signal;
use crate::di::{AppContext, Stores};
use airgate_application::use_cases::GetDevicesUseCase;
use airgate_domain::Config;
use airgate_infrastructure::capture::event_channel;
use airgate_infrastructure::dns::{DnsInterceptor, ResponseCache, UpstreamForwarder};
use airgate_infrastructure::ControlLoop;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use dns::bind_dns_socket;

/// Runs the router until SIGINT or SIGTERM.
pub async fn run(config: Config, stores: Stores) -> anyhow::Result<()> {
    let self_macs = capture::self_addresses(&config).await;
    info!(self_macs = self_macs.len(), "Appliance addresses excluded from accounting");

    let ctx = AppContext::build(&config, &stores, self_macs).await?;
    let status = ctx.use_cases.get_status.execute();
    info!(
        upstream = %status.upstream,
        blocked_domains = status.blocked_domains,
        device_capacity = status.device_capacity,
        "Router state restored"
    );

    let listen: SocketAddr = config
        .server
        .dns_listen_address()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid DNS listen address: {}", e))?;
    let socket = bind_dns_socket(listen)?;

    let shutdown = CancellationToken::new();
    let queue = config.dns.forward_queue_capacity;
    let (request_tx, request_rx) = mpsc::channel(queue);
    let (response_tx, response_rx) = mpsc::channel(queue);

    let forwarder = UpstreamForwarder::bind(
        dns::forwarder_bind_address(status.upstream),
        request_rx,
        response_tx,
    )
    .await?
    .with_query_timeout(config.dns.query_timeout());
    info!(local = ?forwarder.local_addr().ok(), "Upstream forwarder ready");
    let forwarder_task = tokio::spawn(forwarder.run(shutdown.clone()));

    let interceptor = DnsInterceptor::new(
        ctx.state.clone(),
        ResponseCache::new(config.dns.cache_capacity, config.dns.cache_ttl()),
        request_tx,
        ctx.stats.clone(),
        ctx.clock.clone(),
    );

    let (producer, consumer) = event_channel(config.tracking.event_channel_capacity);
    let monitor = capture::start_capture(&config, producer);

    let control = ControlLoop::new(
        socket,
        interceptor,
        response_rx,
        consumer,
        ctx.accountant.clone(),
    )
    .with_intervals(
        config.tracking.tick_interval(),
        config.tracking.status_interval(),
    );
    let control_task = tokio::spawn(control.run(shutdown.clone()));

    let report_task = tokio::spawn(report_devices(
        ctx.use_cases.get_devices.clone(),
        config.tracking.status_interval(),
        shutdown.clone(),
    ));

    info!(listen = %listen, "Airgate running");
    shutdown_signal().await?;
    shutdown.cancel();

    if let Some(monitor) = monitor {
        monitor.shutdown();
    }
    if let Err(e) = control_task.await {
        warn!(error = %e, "Control loop task failed");
    }
    match forwarder_task.await {
        Ok(timeouts) => info!(timeouts, "Forwarder stopped"),
        Err(e) => warn!(error = %e, "Forwarder task failed"),
    }
    let _ = report_task.await;

    let status = ctx.use_cases.get_status.execute();
    info!(
        queries = status.dns.queries,
        blocked = status.dns.blocked,
        cache_hits = status.dns.cache_hits,
        devices = status.tracked_devices,
        "Airgate stopped"
    );
    Ok(())
}

/// Periodic per-device traffic report at debug level.
async fn report_devices(
    get_devices: Arc<GetDevicesUseCase>,
    period: Duration,
    shutdown: CancellationToken,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {
                for device in get_devices.execute().await {
                    debug!(
                        mac = %device.mac,
                        name = %device.name,
                        ip = ?device.ip,
                        upload = device.upload_bytes,
                        download = device.download_bytes,
                        active = device.active,
                        "Device traffic"
                    );
                }
            }
        }
    }
}
