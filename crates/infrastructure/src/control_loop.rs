use crate::capture::EventConsumer;
use crate::dns::wire::MAX_UDP_PAYLOAD;
use crate::dns::{DnsInterceptor, ForwardResponse, InterceptOutcome};
use airgate_application::TrafficAccountant;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);
pub const DEFAULT_STATUS_INTERVAL: Duration = Duration::from_secs(60);

/// The cooperative main loop: answers DNS queries, relays forwarded
/// answers, and periodically feeds captured traffic into the accountant.
pub struct ControlLoop {
    socket: Arc<UdpSocket>,
    interceptor: DnsInterceptor,
    responses: mpsc::Receiver<ForwardResponse>,
    events: EventConsumer,
    accountant: Arc<TrafficAccountant>,
    tick_interval: Duration,
    status_interval: Duration,
    reported_drops: u64,
}

impl ControlLoop {
    pub fn new(
        socket: Arc<UdpSocket>,
        interceptor: DnsInterceptor,
        responses: mpsc::Receiver<ForwardResponse>,
        events: EventConsumer,
        accountant: Arc<TrafficAccountant>,
    ) -> Self {
        Self {
            socket,
            interceptor,
            responses,
            events,
            accountant,
            tick_interval: DEFAULT_TICK_INTERVAL,
            status_interval: DEFAULT_STATUS_INTERVAL,
            reported_drops: 0,
        }
    }

    pub fn with_intervals(mut self, tick: Duration, status: Duration) -> Self {
        self.tick_interval = tick;
        self.status_interval = status;
        self
    }

    pub async fn run(mut self, shutdown: CancellationToken) {
        let mut buf = [0u8; MAX_UDP_PAYLOAD];

        let mut tick = interval(self.tick_interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut status = interval_at(Instant::now() + self.status_interval, self.status_interval);
        status.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            listen = ?self.socket.local_addr().ok(),
            tick_ms = self.tick_interval.as_millis() as u64,
            "Control loop started"
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,

                received = self.socket.recv_from(&mut buf) => match received {
                    Ok((len, client)) => self.on_query(&mut buf, len, client).await,
                    Err(e) => debug!(error = %e, "DNS receive failed"),
                },

                Some(response) = self.responses.recv() => self.on_response(response).await,

                _ = tick.tick() => self.on_tick().await,

                _ = status.tick() => self.log_status(),
            }
        }

        self.drain_events().await;
        let saved = self.accountant.save().await;
        info!(saved, "Control loop stopped");
    }

    async fn on_query(&mut self, buf: &mut [u8], len: usize, client: SocketAddr) {
        let reply = match self.interceptor.handle_query(buf, len, client) {
            InterceptOutcome::Blocked(reply) => reply,
            InterceptOutcome::CacheHit(reply) => {
                self.send(&reply, client).await;
                return;
            }
            InterceptOutcome::Forwarded | InterceptOutcome::Dropped(_) => return,
        };
        if let Err(e) = self.socket.send_to(reply, client).await {
            debug!(%client, error = %e, "Failed to send block answer");
        }
    }

    async fn on_response(&mut self, response: ForwardResponse) {
        self.interceptor.complete_forward(&response);
        self.send(&response.packet, response.client).await;
    }

    async fn send(&self, packet: &[u8], client: SocketAddr) {
        if let Err(e) = self.socket.send_to(packet, client).await {
            debug!(%client, error = %e, "Failed to send DNS reply");
        }
    }

    async fn on_tick(&mut self) {
        self.drain_events().await;
        self.accountant.sweep();
        self.accountant.save_if_due().await;
    }

    async fn drain_events(&mut self) -> usize {
        let mut drained = 0;
        for event in self.events.drain() {
            self.accountant.record_event(event).await;
            drained += 1;
        }

        let dropped = self.events.dropped();
        if dropped > self.reported_drops {
            warn!(
                dropped = dropped - self.reported_drops,
                total = dropped,
                "Event channel overflowed"
            );
            self.reported_drops = dropped;
        }
        drained
    }

    fn log_status(&self) {
        let dns = self.interceptor.stats().snapshot();
        info!(
            queries = dns.queries,
            blocked = dns.blocked,
            cache_hits = dns.cache_hits,
            forwarded = dns.forwarded,
            cached = self.interceptor.cache().len(),
            devices = self.accountant.tracked_count(),
            active = self.accountant.active_count(),
            "Status"
        );
    }
}
