use super::messages::{ForwardRequest, ForwardResponse};
use crate::dns::wire::transaction_id;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::time::{timeout_at, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_millis(1000);
/// How long a correlated answer may wait for room in the response queue.
pub const RESPONSE_POST_TIMEOUT: Duration = Duration::from_millis(100);

const RECV_BUFFER_LEN: usize = 4096;

/// Worker relaying queued queries to the upstream resolver one at a time
/// over a single long-lived socket.
pub struct UpstreamForwarder {
    socket: UdpSocket,
    requests: mpsc::Receiver<ForwardRequest>,
    responses: mpsc::Sender<ForwardResponse>,
    query_timeout: Duration,
    answered: u64,
    timeouts: u64,
    buffer: Box<[u8; RECV_BUFFER_LEN]>,
}

impl UpstreamForwarder {
    pub async fn bind(
        bind_addr: SocketAddr,
        requests: mpsc::Receiver<ForwardRequest>,
        responses: mpsc::Sender<ForwardResponse>,
    ) -> io::Result<Self> {
        let socket = UdpSocket::bind(bind_addr).await?;
        Ok(Self {
            socket,
            requests,
            responses,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            answered: 0,
            timeouts: 0,
            buffer: Box::new([0u8; RECV_BUFFER_LEN]),
        })
    }

    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Processes requests until the queue closes or `shutdown` fires.
    /// Returns the number of abandoned exchanges.
    pub async fn run(mut self, shutdown: CancellationToken) -> u64 {
        info!(
            local = ?self.socket.local_addr().ok(),
            timeout_ms = self.query_timeout.as_millis() as u64,
            "Upstream forwarder started"
        );

        loop {
            let request = tokio::select! {
                _ = shutdown.cancelled() => break,
                request = self.requests.recv() => match request {
                    Some(request) => request,
                    None => break,
                },
            };

            if let Some(response) = self.exchange(request).await {
                self.post(response).await;
            }
        }

        info!(
            answered = self.answered,
            timeouts = self.timeouts,
            "Upstream forwarder stopped"
        );
        self.timeouts
    }

    async fn exchange(&mut self, request: ForwardRequest) -> Option<ForwardResponse> {
        let query_id = transaction_id(&request.packet)?;

        self.flush_stale();

        if let Err(e) = self.socket.send_to(&request.packet, request.upstream).await {
            warn!(error = %e, upstream = %request.upstream, domain = %request.domain, "Upstream send failed");
            return None;
        }

        let deadline = Instant::now() + self.query_timeout;
        loop {
            match timeout_at(deadline, self.socket.recv_from(&mut self.buffer[..])).await {
                Err(_) => {
                    self.timeouts += 1;
                    warn!(
                        domain = %request.domain,
                        upstream = %request.upstream,
                        timeouts = self.timeouts,
                        "Upstream timeout"
                    );
                    return None;
                }
                Ok(Err(e)) => {
                    debug!(error = %e, "Upstream receive failed");
                }
                Ok(Ok((len, from))) => {
                    let packet = &self.buffer[..len];
                    if from != request.upstream || transaction_id(packet) != Some(query_id) {
                        debug!(%from, domain = %request.domain, "Discarding stale upstream response");
                        continue;
                    }
                    self.answered += 1;
                    return Some(ForwardResponse {
                        packet: packet.to_vec(),
                        client: request.client,
                        domain: request.domain,
                    });
                }
            }
        }
    }

    /// Drops datagrams left over from exchanges that already timed out.
    fn flush_stale(&mut self) {
        let mut flushed = 0usize;
        loop {
            match self.socket.try_recv_from(&mut self.buffer[..]) {
                Ok(_) => flushed += 1,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => {
                    debug!(error = %e, "Stale flush read failed");
                    break;
                }
            }
        }
        if flushed > 0 {
            debug!(flushed, "Flushed stale upstream datagrams");
        }
    }

    async fn post(&self, response: ForwardResponse) {
        let domain = response.domain.clone();
        if self
            .responses
            .send_timeout(response, RESPONSE_POST_TIMEOUT)
            .await
            .is_err()
        {
            warn!(domain = %domain, "Response queue full, dropping upstream answer");
        }
    }
}
