pub mod arp_reader;
pub mod clock;
pub mod directory;
pub mod interfaces;

pub use arp_reader::LinuxArpReader;
pub use clock::MonotonicClock;
pub use directory::StoredNameDirectory;
pub use interfaces::InterfaceAddresses;
