use beacon_types::{
    constants::{HEARTBEAT, REGISTER},
    payload::{Heartbeat, Registration},
};

use crate::{Event, MessageError};

fn decode(topic: &[u8], payload: &[u8]) -> Result<Event, MessageError> {
    match topic {
        t if t == REGISTER.as_bytes() => Ok(Event::Registration(Registration::try_from(payload)?)),
        t if t == HEARTBEAT.as_bytes() => Ok(Event::Heartbeat(Heartbeat::try_from(payload)?)),
        _ => Err(MessageError::UnknownChannel),
    }
}

/// Decode an inbound publish into an [Event].
///
/// Malformed payloads and unrecognised topics are mapped to
/// [Event::InvalidPublish] so transport implementations never have to drop a
/// message silently.
pub fn topic_and_payload_to_event(topic: Vec<u8>, payload: Vec<u8>) -> Event {
    match decode(&topic, &payload) {
        Ok(event) => event,
        Err(reason) => Event::InvalidPublish {
            reason,
            topic,
            payload,
        },
    }
}
