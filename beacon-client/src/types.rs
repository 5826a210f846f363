use beacon_types::payload::{Heartbeat, RecordError, Registration};
use thiserror::Error;

/// Error types for message processing operations.
///
/// This enum represents the various error conditions that can occur when
/// decoding inbound publishes into registration or heartbeat messages.
#[derive(Error, Debug, PartialEq)]
pub enum MessageError {
    #[error("there was an error decoding the payload: {0}")]
    InvalidPayload(#[from] RecordError),
    #[error("the topic was not a known beacon channel")]
    UnknownChannel,
}

/// An enum that represents the different types of events an [EventLoop](crate::EventLoop) implementation can produce.
#[derive(Debug, PartialEq)]
pub enum Event {
    Offline,
    Online,
    Registration(Registration),
    Heartbeat(Heartbeat),
    InvalidPublish {
        reason: MessageError,
        topic: Vec<u8>,
        payload: Vec<u8>,
    },
}
