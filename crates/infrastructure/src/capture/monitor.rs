use super::classifier::{EventSink, FrameClassifier};
use airgate_domain::{FrameKind, FrameMeta};
use thiserror::Error;

#[cfg(feature = "monitor-capture")]
use std::sync::atomic::{AtomicBool, Ordering};
#[cfg(feature = "monitor-capture")]
use std::sync::Arc;
#[cfg(feature = "monitor-capture")]
use std::thread::JoinHandle;
#[cfg(feature = "monitor-capture")]
use std::time::Duration;
#[cfg(feature = "monitor-capture")]
use tracing::{debug, info, warn};

/// `LINKTYPE_IEEE802_11`: bare 802.11 frames.
pub const LINKTYPE_IEEE802_11: i32 = 105;
/// `LINKTYPE_IEEE802_11_RADIOTAP`: 802.11 frames behind a radiotap header.
pub const LINKTYPE_RADIOTAP: i32 = 127;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Monitor capture support not compiled in (enable feature `monitor-capture`)")]
    Unsupported,

    #[error("Failed to open capture on {interface}: {reason}")]
    Open { interface: String, reason: String },

    #[error("Interface {interface} has unsupported link type {linktype}")]
    Datalink { interface: String, linktype: i32 },
}

/// Strips the radiotap header, returning the 802.11 frame and the header
/// length. `None` for a truncated or malformed header.
pub fn radiotap_payload(packet: &[u8]) -> Option<(&[u8], usize)> {
    if packet.len() < 4 || packet[0] != 0 {
        return None;
    }
    let header_len = u16::from_le_bytes([packet[2], packet[3]]) as usize;
    if header_len < 4 || header_len > packet.len() {
        return None;
    }
    Some((&packet[header_len..], header_len))
}

/// Derives capture metadata from the frame-control type bits and the
/// on-air length of the 802.11 frame.
pub fn frame_meta(frame: &[u8], wire_len: usize) -> FrameMeta {
    let kind = match frame.first().map(|fc| (fc >> 2) & 0x3) {
        Some(0) => FrameKind::Management,
        Some(1) => FrameKind::Control,
        Some(2) => FrameKind::Data,
        _ => FrameKind::Misc,
    };
    FrameMeta {
        sig_len: wire_len.min(u16::MAX as usize) as u16,
        kind,
    }
}

/// Feeds one captured packet of the given link type to the classifier.
pub fn dispatch_packet<S: EventSink>(
    classifier: &mut FrameClassifier<S>,
    linktype: i32,
    packet: &[u8],
    wire_len: usize,
) {
    let (frame, header_len) = match linktype {
        LINKTYPE_RADIOTAP => match radiotap_payload(packet) {
            Some(split) => split,
            None => return,
        },
        _ => (packet, 0),
    };
    let meta = frame_meta(frame, wire_len.saturating_sub(header_len));
    classifier.classify(frame, meta);
}

/// Capture thread reading a monitor-mode interface into a [`FrameClassifier`].
pub struct MonitorCapture {
    #[cfg(feature = "monitor-capture")]
    stop: Arc<AtomicBool>,
    #[cfg(feature = "monitor-capture")]
    handle: Option<JoinHandle<()>>,
}

impl MonitorCapture {
    pub fn supported() -> bool {
        cfg!(feature = "monitor-capture")
    }

    #[cfg(feature = "monitor-capture")]
    pub fn start<S>(interface: &str, mut classifier: FrameClassifier<S>) -> Result<Self, CaptureError>
    where
        S: EventSink + Send + 'static,
    {
        use pcap::Capture;

        let open_error = |e: pcap::Error| CaptureError::Open {
            interface: interface.to_string(),
            reason: e.to_string(),
        };

        let cap = Capture::from_device(interface)
            .map_err(open_error)?
            .promisc(true)
            .immediate_mode(true)
            .open()
            .map_err(open_error)?;

        let linktype = cap.get_datalink().0;
        if linktype != LINKTYPE_RADIOTAP && linktype != LINKTYPE_IEEE802_11 {
            return Err(CaptureError::Datalink {
                interface: interface.to_string(),
                linktype,
            });
        }

        let mut cap = cap.setnonblock().map_err(open_error)?;

        let stop = Arc::new(AtomicBool::new(false));
        let stop_thread = stop.clone();
        let name = interface.to_string();

        let handle = std::thread::Builder::new()
            .name("airgate-capture".to_string())
            .spawn(move || {
                info!(interface = %name, linktype, "Monitor capture started");
                let mut packets: u64 = 0;
                while !stop_thread.load(Ordering::SeqCst) {
                    match cap.next_packet() {
                        Ok(packet) => {
                            packets += 1;
                            dispatch_packet(
                                &mut classifier,
                                linktype,
                                packet.data,
                                packet.header.len as usize,
                            );
                        }
                        Err(pcap::Error::TimeoutExpired) => {
                            std::thread::sleep(Duration::from_millis(10));
                        }
                        Err(pcap::Error::NoMorePackets) => break,
                        Err(e) => {
                            debug!(error = %e, "Capture read failed");
                            std::thread::sleep(Duration::from_millis(50));
                        }
                    }
                }
                info!(interface = %name, packets, "Monitor capture stopped");
            })
            .map_err(|e| CaptureError::Open {
                interface: interface.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    #[cfg(not(feature = "monitor-capture"))]
    pub fn start<S>(_interface: &str, _classifier: FrameClassifier<S>) -> Result<Self, CaptureError>
    where
        S: EventSink + Send + 'static,
    {
        Err(CaptureError::Unsupported)
    }

    #[cfg(feature = "monitor-capture")]
    pub fn shutdown(mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Capture thread panicked");
            }
        }
    }

    #[cfg(not(feature = "monitor-capture"))]
    pub fn shutdown(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::ring::event_channel;
    use airgate_domain::Direction;

    fn radiotap(frame: &[u8]) -> Vec<u8> {
        let mut packet = vec![0x00, 0x00, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00];
        packet.extend_from_slice(frame);
        packet
    }

    fn upload_frame() -> Vec<u8> {
        let mut frame = vec![0u8; 40];
        frame[0] = 0x08;
        frame[1] = 0x01;
        frame[4..10].copy_from_slice(&[0x02, 0xAA, 0, 0, 0, 1]);
        frame[10..16].copy_from_slice(&[0x02, 0x11, 0, 0, 0, 2]);
        frame
    }

    #[test]
    fn test_radiotap_payload_strips_header() {
        let packet = radiotap(&[0x08, 0x01, 0xFF]);
        let (frame, len) = radiotap_payload(&packet).unwrap();
        assert_eq!(len, 8);
        assert_eq!(frame, &[0x08, 0x01, 0xFF]);
    }

    #[test]
    fn test_radiotap_payload_rejects_bad_headers() {
        assert!(radiotap_payload(&[0x00, 0x00]).is_none());
        assert!(radiotap_payload(&[0x01, 0x00, 0x04, 0x00]).is_none());
        assert!(radiotap_payload(&[0x00, 0x00, 0x40, 0x00, 0x00]).is_none());
    }

    #[test]
    fn test_frame_meta_kind_from_type_bits() {
        assert_eq!(frame_meta(&[0x80], 100).kind, FrameKind::Management);
        assert_eq!(frame_meta(&[0xD4], 10).kind, FrameKind::Control);
        assert_eq!(frame_meta(&[0x88], 100).kind, FrameKind::Data);
        assert_eq!(frame_meta(&[], 0).kind, FrameKind::Misc);
        assert_eq!(frame_meta(&[0x08], 100_000).sig_len, u16::MAX);
    }

    #[test]
    fn test_dispatch_radiotap_packet_publishes_event() {
        let (producer, mut consumer) = event_channel(8);
        let mut classifier = FrameClassifier::with_overhead(producer, 0);
        let packet = radiotap(&upload_frame());

        dispatch_packet(&mut classifier, LINKTYPE_RADIOTAP, &packet, packet.len());

        let event = consumer.pop().unwrap();
        assert_eq!(event.direction, Direction::Upload);
        assert_eq!(event.length, 40);
    }

    #[test]
    fn test_dispatch_bare_frame() {
        let (producer, mut consumer) = event_channel(8);
        let mut classifier = FrameClassifier::with_overhead(producer, 0);
        let frame = upload_frame();

        dispatch_packet(&mut classifier, LINKTYPE_IEEE802_11, &frame, 1500);

        assert_eq!(consumer.pop().unwrap().length, 1500);
    }

    #[cfg(not(feature = "monitor-capture"))]
    #[test]
    fn test_start_without_feature_is_unsupported() {
        let (producer, _consumer) = event_channel(8);
        let result = MonitorCapture::start("mon0", FrameClassifier::new(producer));
        assert!(matches!(result, Err(CaptureError::Unsupported)));
        assert!(!MonitorCapture::supported());
    }
}
