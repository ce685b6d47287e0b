use crate::mac_address::MacAddress;
use serde::{Deserialize, Serialize};

/// Direction of a data frame relative to the access point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Station to AP (toDS set, fromDS clear).
    #[default]
    Upload,
    /// AP to station (fromDS set, toDS clear).
    Download,
}

/// One classified data frame, as published by the capture context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrafficEvent {
    pub source: MacAddress,
    pub destination: MacAddress,
    pub length: u16,
    pub direction: Direction,
}

impl TrafficEvent {
    /// The wireless station this frame is accounted against.
    pub fn client(&self) -> MacAddress {
        match self.direction {
            Direction::Upload => self.source,
            Direction::Download => self.destination,
        }
    }

    pub fn involves_group_address(&self) -> bool {
        self.source.is_multicast() || self.destination.is_multicast()
    }
}

/// Frame category reported by the capture hardware alongside each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Management,
    Control,
    Data,
    Misc,
}

/// Capture metadata for one frame: the reported signal length (which may
/// exceed the captured bytes) and the hardware frame category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameMeta {
    pub sig_len: u16,
    pub kind: FrameKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    const STA: MacAddress = MacAddress::new([0x02, 0, 0, 0, 0, 0x01]);
    const AP: MacAddress = MacAddress::new([0x02, 0, 0, 0, 0, 0xAA]);

    #[test]
    fn test_client_follows_direction() {
        let up = TrafficEvent {
            source: STA,
            destination: AP,
            length: 100,
            direction: Direction::Upload,
        };
        assert_eq!(up.client(), STA);

        let down = TrafficEvent {
            source: AP,
            destination: STA,
            length: 100,
            direction: Direction::Download,
        };
        assert_eq!(down.client(), STA);
    }

    #[test]
    fn test_group_address_detection() {
        let event = TrafficEvent {
            source: STA,
            destination: MacAddress::BROADCAST,
            length: 0,
            direction: Direction::Upload,
        };
        assert!(event.involves_group_address());
    }
}
