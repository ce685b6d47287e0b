use super::ring::EventProducer;
use airgate_domain::{Direction, FrameKind, FrameMeta, MacAddress, TrafficEvent};

/// Shortest frame carrying a complete three-address 802.11 data header.
pub const MIN_FRAME_LEN: usize = 24;

/// Default bytes subtracted from the signal length (header, CCMP, FCS).
pub const DEFAULT_FRAME_OVERHEAD: u16 = 36;

const FRAME_TYPE_DATA: u16 = 2;
const TO_DS: u16 = 1 << 8;
const FROM_DS: u16 = 1 << 9;
const ADDR1_OFFSET: usize = 4;
const ADDR2_OFFSET: usize = 10;

/// Destination of classified events. Implementations must not block.
pub trait EventSink {
    /// Returns `false` when the event had to be dropped.
    fn publish(&mut self, event: TrafficEvent) -> bool;
}

impl EventSink for EventProducer {
    #[inline]
    fn publish(&mut self, event: TrafficEvent) -> bool {
        EventProducer::publish(self, event)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    TooShort,
    NotData,
    /// WDS (both DS bits) or ad-hoc (neither) frames.
    UnsupportedDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Published(Direction),
    ChannelFull,
    Rejected(RejectReason),
}

/// Turns raw 802.11 frames into [`TrafficEvent`]s on the capture thread.
pub struct FrameClassifier<S> {
    sink: S,
    overhead: u16,
}

impl<S: EventSink> FrameClassifier<S> {
    pub fn new(sink: S) -> Self {
        Self::with_overhead(sink, DEFAULT_FRAME_OVERHEAD)
    }

    pub fn with_overhead(sink: S, overhead: u16) -> Self {
        Self { sink, overhead }
    }

    pub fn classify(&mut self, frame: &[u8], meta: FrameMeta) -> Classification {
        if (meta.sig_len as usize) < MIN_FRAME_LEN || frame.len() < MIN_FRAME_LEN {
            return Classification::Rejected(RejectReason::TooShort);
        }
        if meta.kind != FrameKind::Data {
            return Classification::Rejected(RejectReason::NotData);
        }

        let frame_control = u16::from_le_bytes([frame[0], frame[1]]);
        if (frame_control >> 2) & 0x3 != FRAME_TYPE_DATA {
            return Classification::Rejected(RejectReason::NotData);
        }

        let direction = match (frame_control & TO_DS != 0, frame_control & FROM_DS != 0) {
            (true, false) => Direction::Upload,
            (false, true) => Direction::Download,
            _ => return Classification::Rejected(RejectReason::UnsupportedDirection),
        };

        let (Some(destination), Some(source)) = (
            MacAddress::from_slice(frame, ADDR1_OFFSET),
            MacAddress::from_slice(frame, ADDR2_OFFSET),
        ) else {
            return Classification::Rejected(RejectReason::TooShort);
        };

        let event = TrafficEvent {
            source,
            destination,
            length: meta.sig_len.saturating_sub(self.overhead),
            direction,
        };

        if self.sink.publish(event) {
            Classification::Published(direction)
        } else {
            Classification::ChannelFull
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
