//! Lock-free single-producer/single-consumer channel carrying
//! [`TrafficEvent`]s from the capture thread to the control loop.
//!
//! The producer alone writes `head`, the consumer alone writes `tail`. Each
//! side is a distinct non-`Clone` handle, so a second writer or reader cannot
//! be created once the channel is split.

use airgate_domain::TrafficEvent;
use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Modular index arithmetic for a ring of `capacity` slots.
///
/// One slot is always kept empty so that `head == tail` means empty and
/// `advance(head) == tail` means full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingIndex {
    capacity: usize,
}

impl RingIndex {
    pub const MIN_CAPACITY: usize = 2;

    /// Capacities below [`MIN_CAPACITY`](Self::MIN_CAPACITY) are raised to it.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(Self::MIN_CAPACITY),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Events the ring can hold at once.
    pub fn usable(&self) -> usize {
        self.capacity - 1
    }

    pub fn advance(&self, index: usize) -> usize {
        debug_assert!(index < self.capacity, "ring index {} out of range", index);
        if index + 1 == self.capacity {
            0
        } else {
            index + 1
        }
    }

    pub fn len(&self, head: usize, tail: usize) -> usize {
        debug_assert!(head < self.capacity && tail < self.capacity);
        if head >= tail {
            head - tail
        } else {
            self.capacity - tail + head
        }
    }

    pub fn is_full(&self, head: usize, tail: usize) -> bool {
        self.advance(head) == tail
    }
}

struct Shared {
    slots: Box<[UnsafeCell<TrafficEvent>]>,
    head: AtomicUsize,
    tail: AtomicUsize,
    dropped: AtomicU64,
    index: RingIndex,
}

// SAFETY: a slot is written only by the producer while it lies outside
// [tail, head), and read only by the consumer while it lies inside. The
// Release store of `head` (or `tail`) publishes the slot to the other side,
// which observes it through an Acquire load before touching it.
unsafe impl Sync for Shared {}

/// Creates a channel of `capacity` slots, retaining at most `capacity - 1`
/// unconsumed events.
pub fn event_channel(capacity: usize) -> (EventProducer, EventConsumer) {
    let index = RingIndex::new(capacity);
    let slots = (0..index.capacity())
        .map(|_| UnsafeCell::new(TrafficEvent::default()))
        .collect::<Vec<_>>()
        .into_boxed_slice();

    let shared = Arc::new(Shared {
        slots,
        head: AtomicUsize::new(0),
        tail: AtomicUsize::new(0),
        dropped: AtomicU64::new(0),
        index,
    });

    (
        EventProducer {
            shared: Arc::clone(&shared),
        },
        EventConsumer { shared },
    )
}

/// Write half. Never blocks and never allocates.
pub struct EventProducer {
    shared: Arc<Shared>,
}

impl EventProducer {
    /// Publishes `event`, or drops it and returns `false` when the ring is full.
    #[inline]
    pub fn publish(&mut self, event: TrafficEvent) -> bool {
        let shared = &*self.shared;
        let head = shared.head.load(Ordering::Relaxed);
        let next = shared.index.advance(head);

        if next == shared.tail.load(Ordering::Acquire) {
            shared.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        // SAFETY: `head` is outside [tail, head), so the consumer does not
        // read this slot until the Release store below.
        unsafe {
            *shared.slots[head].get() = event;
        }
        shared.head.store(next, Ordering::Release);
        true
    }

    pub fn dropped(&self) -> u64 {
        self.shared.dropped.load(Ordering::Relaxed)
    }

    pub fn capacity(&self) -> usize {
        self.shared.index.capacity()
    }
}

/// Read half.
pub struct EventConsumer {
    shared: Arc<Shared>,
}

impl EventConsumer {
    pub fn pop(&mut self) -> Option<TrafficEvent> {
        let shared = &*self.shared;
        let tail = shared.tail.load(Ordering::Relaxed);
        if tail == shared.head.load(Ordering::Acquire) {
            return None;
        }
        Some(self.take(tail))
    }

    /// Yields every event published before this call, oldest first. Events
    /// published while draining are left for the next drain.
    pub fn drain(&mut self) -> Drain<'_> {
        let end = self.shared.head.load(Ordering::Acquire);
        Drain {
            consumer: self,
            end,
        }
    }

    pub fn len(&self) -> usize {
        let head = self.shared.head.load(Ordering::Acquire);
        let tail = self.shared.tail.load(Ordering::Relaxed);
        self.shared.index.len(head, tail)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Events rejected by the producer because the ring was full.
    pub fn dropped(&self) -> u64 {
        self.shared.dropped.load(Ordering::Relaxed)
    }

    pub fn capacity(&self) -> usize {
        self.shared.index.capacity()
    }

    fn take(&mut self, tail: usize) -> TrafficEvent {
        let shared = &*self.shared;
        // SAFETY: `tail` is inside [tail, head) as observed by an Acquire
        // load of `head`, so the producer finished writing it and will not
        // touch it until `tail` moves past.
        let event = unsafe { *shared.slots[tail].get() };
        shared
            .tail
            .store(shared.index.advance(tail), Ordering::Release);
        event
    }
}

pub struct Drain<'a> {
    consumer: &'a mut EventConsumer,
    end: usize,
}

impl Iterator for Drain<'_> {
    type Item = TrafficEvent;

    fn next(&mut self) -> Option<TrafficEvent> {
        let tail = self.consumer.shared.tail.load(Ordering::Relaxed);
        if tail == self.end {
            return None;
        }
        Some(self.consumer.take(tail))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airgate_domain::{Direction, MacAddress};

    fn event(n: u16) -> TrafficEvent {
        TrafficEvent {
            source: MacAddress::new([0x02, 0, 0, 0, (n >> 8) as u8, n as u8]),
            destination: MacAddress::new([0x02, 0, 0, 0, 0, 0xAA]),
            length: n,
            direction: Direction::Upload,
        }
    }

    #[test]
    fn test_ring_index_wraps() {
        let index = RingIndex::new(4);
        assert_eq!(index.advance(0), 1);
        assert_eq!(index.advance(3), 0);
        assert_eq!(index.usable(), 3);
    }

    #[test]
    fn test_ring_index_len_across_wrap() {
        let index = RingIndex::new(8);
        assert_eq!(index.len(0, 0), 0);
        assert_eq!(index.len(5, 2), 3);
        assert_eq!(index.len(1, 6), 3);
        assert_eq!(index.len(6, 7), 7);
        assert!(index.is_full(6, 7));
        assert!(index.is_full(7, 0));
        assert!(!index.is_full(0, 0));
    }

    #[test]
    fn test_ring_index_minimum_capacity() {
        let index = RingIndex::new(0);
        assert_eq!(index.capacity(), RingIndex::MIN_CAPACITY);
        assert_eq!(index.usable(), 1);
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn test_ring_index_rejects_out_of_range() {
        RingIndex::new(4).advance(4);
    }

    #[test]
    fn test_fewer_than_capacity_drains_in_order() {
        let (mut producer, mut consumer) = event_channel(16);
        for n in 0..10 {
            assert!(producer.publish(event(n)));
        }

        let drained: Vec<_> = consumer.drain().map(|e| e.length).collect();

        assert_eq!(drained, (0..10).collect::<Vec<_>>());
        assert!(consumer.is_empty());
        assert_eq!(producer.dropped(), 0);
    }

    #[test]
    fn test_overflow_retains_capacity_minus_one() {
        let (mut producer, mut consumer) = event_channel(8);
        let accepted = (0..20).filter(|&n| producer.publish(event(n))).count();

        assert_eq!(accepted, 7);
        assert_eq!(consumer.dropped(), 13);
        assert_eq!(consumer.len(), 7);

        let drained: Vec<_> = consumer.drain().collect();
        assert_eq!(drained, (0..7).map(event).collect::<Vec<_>>());
    }

    #[test]
    fn test_wraparound_over_many_rounds() {
        let (mut producer, mut consumer) = event_channel(4);
        let mut expected = 0u16;
        for round in 0..50u16 {
            for k in 0..3 {
                assert!(producer.publish(event(round * 3 + k)));
            }
            for e in consumer.drain() {
                assert_eq!(e.length, expected);
                expected += 1;
            }
        }
        assert_eq!(expected, 150);
    }

    #[test]
    fn test_drain_stops_at_snapshot() {
        let (mut producer, mut consumer) = event_channel(8);
        producer.publish(event(1));
        producer.publish(event(2));

        let mut drain = consumer.drain();
        assert_eq!(drain.next().map(|e| e.length), Some(1));
        producer.publish(event(3));
        assert_eq!(drain.next().map(|e| e.length), Some(2));
        assert_eq!(drain.next(), None);

        assert_eq!(consumer.pop().map(|e| e.length), Some(3));
        assert_eq!(consumer.pop(), None);
    }

    #[test]
    fn test_concurrent_producer_and_consumer() {
        let (mut producer, mut consumer) = event_channel(64);
        const TOTAL: u16 = 20_000;

        let writer = std::thread::spawn(move || {
            let mut published = Vec::new();
            for n in 0..TOTAL {
                if producer.publish(event(n)) {
                    published.push(n);
                }
            }
            published
        });

        let mut received = Vec::new();
        loop {
            received.extend(consumer.drain().map(|e| e.length));
            if writer.is_finished() {
                received.extend(consumer.drain().map(|e| e.length));
                break;
            }
            std::thread::yield_now();
        }

        let published = writer.join().unwrap();
        assert_eq!(received, published);
    }
}
