pub mod classifier;
pub mod monitor;
pub mod ring;

pub use classifier::{Classification, EventSink, FrameClassifier, RejectReason};
pub use monitor::{CaptureError, MonitorCapture};
pub use ring::{event_channel, EventConsumer, EventProducer, RingIndex};
