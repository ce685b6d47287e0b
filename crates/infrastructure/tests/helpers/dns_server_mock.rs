#![allow(dead_code)]
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

pub const ANSWER_IP: [u8; 4] = [93, 184, 216, 34];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamMode {
    Answer,
    /// Sends a reply carrying the wrong transaction id before the real one.
    StaleThenAnswer,
    Silent,
    /// Answers the first query after `first` and every later one after `rest`.
    Delayed { first: Duration, rest: Duration },
}

/// Resolver on 127.0.0.1 answering every query with one A record.
pub struct MockUpstream {
    addr: SocketAddr,
    received: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockUpstream {
    pub async fn start(mode: UpstreamMode) -> Self {
        let socket = Arc::new(UdpSocket::bind("127.0.0.1:0").await.unwrap());
        let addr = socket.local_addr().unwrap();
        let received = Arc::new(AtomicUsize::new(0));
        let counter = received.clone();
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = socket.recv_from(&mut buf) => {
                        let Ok((len, peer)) = result else { continue };
                        let seen = counter.fetch_add(1, Ordering::SeqCst);
                        let query = &buf[..len];
                        match mode {
                            UpstreamMode::Silent => {}
                            UpstreamMode::Answer => {
                                let _ = socket.send_to(&answer_for(query), peer).await;
                            }
                            UpstreamMode::StaleThenAnswer => {
                                let mut stale = answer_for(query);
                                stale[0] ^= 0xFF;
                                let _ = socket.send_to(&stale, peer).await;
                                let _ = socket.send_to(&answer_for(query), peer).await;
                            }
                            UpstreamMode::Delayed { first, rest } => {
                                let delay = if seen == 0 { first } else { rest };
                                let answer = answer_for(query);
                                let socket = socket.clone();
                                tokio::spawn(async move {
                                    tokio::time::sleep(delay).await;
                                    let _ = socket.send_to(&answer, peer).await;
                                });
                            }
                        }
                    }
                }
            }
        });

        Self {
            addr,
            received,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Queries seen so far.
    pub fn received(&self) -> usize {
        self.received.load(Ordering::SeqCst)
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Echoes the query as a response with a single A record appended.
pub fn answer_for(query: &[u8]) -> Vec<u8> {
    let mut answer = query.to_vec();
    answer[2] |= 0x80;
    answer[3] |= 0x80;
    answer[6..8].copy_from_slice(&1u16.to_be_bytes());
    answer.extend_from_slice(&[
        0xC0, 0x0C, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x0E, 0x10, 0x00, 0x04,
    ]);
    answer.extend_from_slice(&ANSWER_IP);
    answer
}
