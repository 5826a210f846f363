//! Part of beacon, a minimal device registration and heartbeat system over MQTT.
//!
//! The collector. Subscribes to the `register` and `heartbeat` channels and
//! maintains an in-memory registry of known devices and their last seen
//! timestamps. The registry is volatile by design: it is rebuilt from
//! re-announcements after a restart.

mod collector;
mod registry;

pub use collector::{Collector, CollectorHandle};
pub use registry::{DeviceRegistry, RegistryEntry};
