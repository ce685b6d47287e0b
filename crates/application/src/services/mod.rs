pub mod traffic_accountant;

pub use traffic_accountant::TrafficAccountant;
