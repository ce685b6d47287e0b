use airgate_domain::{Config, MacAddress};
use airgate_infrastructure::capture::{EventProducer, FrameClassifier, MonitorCapture};
use airgate_infrastructure::system::InterfaceAddresses;
use tracing::{info, warn};

/// Addresses of the appliance's own radios plus the configured extras.
pub async fn self_addresses(config: &Config) -> Vec<MacAddress> {
    let interfaces = config
        .tracking
        .ap_interface
        .iter()
        .chain(config.tracking.station_interface.iter())
        .map(String::as_str);

    let mut macs = InterfaceAddresses::new().collect(interfaces).await;
    for raw in &config.tracking.self_macs {
        match raw.parse::<MacAddress>() {
            Ok(mac) if !macs.contains(&mac) => macs.push(mac),
            Ok(_) => {}
            Err(e) => warn!(mac = %raw, error = %e, "Ignoring invalid self address"),
        }
    }
    macs
}

/// Starts frame capture when an interface is configured. Without one the
/// producer is dropped and traffic accounting stays idle.
pub fn start_capture(config: &Config, producer: EventProducer) -> Option<MonitorCapture> {
    let Some(interface) = config.tracking.capture_interface.as_deref() else {
        info!("No capture interface configured, traffic accounting disabled");
        return None;
    };

    let classifier = FrameClassifier::with_overhead(producer, config.tracking.frame_overhead);
    match MonitorCapture::start(interface, classifier) {
        Ok(capture) => Some(capture),
        Err(e) => {
            warn!(interface, error = %e, "Monitor capture unavailable");
            None
        }
    }
}
