use super::block_response::write_block_response;
use super::cache::ResponseCache;
use super::forwarding::{ForwardRequest, ForwardResponse};
use super::wire::{is_response, parse_query, set_transaction_id, WireError};
use airgate_application::ports::Clock;
use airgate_application::{DnsStats, SharedState};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    Malformed(WireError),
    /// The synthetic answer would not fit in a UDP reply.
    ReplyTooLarge,
    QueueFull,
    QueueClosed,
}

/// What the listener should do with one inbound query.
#[derive(Debug, PartialEq, Eq)]
pub enum InterceptOutcome<'a> {
    /// Send this block answer, built in place over the request buffer.
    Blocked(&'a [u8]),
    /// Send this cached answer, already carrying the query's id.
    CacheHit(Vec<u8>),
    /// Handed to the upstream forwarder; the answer arrives later.
    Forwarded,
    Dropped(DropReason),
}

/// Decides the fate of every query arriving on the listening socket:
/// block, answer from cache, or forward.
pub struct DnsInterceptor {
    state: SharedState,
    cache: ResponseCache,
    requests: mpsc::Sender<ForwardRequest>,
    stats: DnsStats,
    clock: Arc<dyn Clock>,
}

impl DnsInterceptor {
    pub fn new(
        state: SharedState,
        cache: ResponseCache,
        requests: mpsc::Sender<ForwardRequest>,
        stats: DnsStats,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            state,
            cache,
            requests,
            stats,
            clock,
        }
    }

    /// `buf` holds the datagram in its first `len` bytes; a block answer is
    /// written over it, so it should span the full receive buffer.
    pub fn handle_query<'a>(
        &mut self,
        buf: &'a mut [u8],
        len: usize,
        client: SocketAddr,
    ) -> InterceptOutcome<'a> {
        let len = len.min(buf.len());
        let query = match parse_query(&buf[..len]) {
            Ok(query) => query,
            Err(e) => {
                debug!(%client, error = %e, "Dropping malformed query");
                return InterceptOutcome::Dropped(DropReason::Malformed(e));
            }
        };

        self.stats.record_query();

        let (blocked, upstream) = self
            .state
            .read(|s| (s.blocklist.is_blocked(&query.domain), s.upstream));

        if blocked {
            self.stats.record_blocked();
            return match write_block_response(buf, query.question_end) {
                Some(reply_len) => {
                    debug!(domain = %query.domain, %client, "Blocked");
                    InterceptOutcome::Blocked(&buf[..reply_len])
                }
                None => {
                    warn!(domain = %query.domain, %client, "Block answer does not fit, dropping query");
                    InterceptOutcome::Dropped(DropReason::ReplyTooLarge)
                }
            };
        }

        let now = self.clock.now_millis();
        if let Some(cached) = self.cache.lookup(&query.domain, now) {
            let mut reply = cached.to_vec();
            set_transaction_id(&mut reply, query.id);
            self.stats.record_cache_hit();
            debug!(domain = %query.domain, %client, "Cache hit");
            return InterceptOutcome::CacheHit(reply);
        }

        let request = ForwardRequest {
            packet: buf[..len].to_vec(),
            client,
            domain: query.domain,
            upstream,
        };
        match self.requests.try_send(request) {
            Ok(()) => {
                self.stats.record_forwarded();
                InterceptOutcome::Forwarded
            }
            Err(TrySendError::Full(request)) => {
                self.stats.record_forward_dropped();
                warn!(domain = %request.domain, %client, "Forward queue full, dropping query");
                InterceptOutcome::Dropped(DropReason::QueueFull)
            }
            Err(TrySendError::Closed(request)) => {
                self.stats.record_forward_dropped();
                warn!(domain = %request.domain, "Forwarder is gone, dropping query");
                InterceptOutcome::Dropped(DropReason::QueueClosed)
            }
        }
    }

    /// Records an upstream answer before it is relayed to the client.
    /// Returns whether it was cached.
    pub fn complete_forward(&mut self, response: &ForwardResponse) -> bool {
        if !is_response(&response.packet) {
            return false;
        }
        self.stats.record_upstream_answer();
        let now = self.clock.now_millis();
        self.cache.store(&response.domain, &response.packet, now);
        true
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn stats(&self) -> &DnsStats {
        &self.stats
    }
}
