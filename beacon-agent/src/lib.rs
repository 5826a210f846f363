//! Part of beacon, a minimal device registration and heartbeat system over MQTT.
//!
//! The device side agent. Resolves a persistent device identity, announces
//! it on the `register` channel once per connection and emits liveness
//! pulses on the `heartbeat` channel on a fixed cadence.

mod agent;
mod builder;
mod error;
mod identity;

pub use agent::{Agent, AgentHandle, DEFAULT_HEARTBEAT_INTERVAL};
pub use builder::AgentBuilder;
pub use error::{AgentError, IdentityError};
pub use identity::IdentityStore;
