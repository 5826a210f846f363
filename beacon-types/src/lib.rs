//! Part of beacon, a minimal device registration and heartbeat system over MQTT.
//!
//! This library defines the channels, wire payloads and persisted identity
//! record shared by the agent and collector crates.

pub mod constants;
pub mod payload;
pub mod topic;
pub mod utils;
