//! Airgate Infrastructure Layer
//!
//! Capture, DNS, persistence and system adapters behind the application
//! ports, plus the control loop tying them together.
pub mod capture;
pub mod control_loop;
pub mod dns;
pub mod persistence;
pub mod system;

pub use control_loop::ControlLoop;
