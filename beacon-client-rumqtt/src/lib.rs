//! Part of beacon, a minimal device registration and heartbeat system over MQTT.
//!
//! [beacon_client::Client] and [beacon_client::EventLoop] implementations
//! using [rumqttc].

mod client;

pub use client::{Client, EventLoop};
pub use rumqttc::v5::MqttOptions;
