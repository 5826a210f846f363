use std::str::Utf8Error;

use thiserror::Error;

use crate::constants::RECORD_DELIMITER;

/// Error types produced when decoding a persisted record or wire payload.
#[derive(Error, Debug, PartialEq)]
pub enum RecordError {
    #[error("record utf8 decode error: {0}")]
    Utf8(#[from] Utf8Error),
    #[error("record is missing the '{RECORD_DELIMITER}' field delimiter")]
    MissingDelimiter,
    #[error("record field must not be empty")]
    EmptyField,
    #[error("invalid timestamp field: {0}")]
    InvalidTimestamp(String),
}

fn split_record(record: &str) -> Result<(&str, &str), RecordError> {
    let (first, second) = record
        .split_once(RECORD_DELIMITER)
        .ok_or(RecordError::MissingDelimiter)?;
    if first.is_empty() || second.is_empty() {
        return Err(RecordError::EmptyField);
    }
    Ok((first, second))
}

/// The identity a device registers under.
///
/// Persisted on the device as a single `<id>,<name>` line and announced on
/// the wire as `<name>,<id>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub name: String,
    pub id: String,
}

impl DeviceIdentity {
    /// Encode the identity in the on-disk record format, `<id>,<name>`.
    pub fn to_record(&self) -> String {
        format!("{}{RECORD_DELIMITER}{}", self.id, self.name)
    }

    /// Decode an identity from the on-disk record format.
    pub fn from_record(record: &str) -> Result<Self, RecordError> {
        let (id, name) = split_record(record)?;
        Ok(Self {
            name: name.into(),
            id: id.into(),
        })
    }
}

/// The payload a device publishes on the `register` channel, `<name>,<id>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub id: String,
}

impl Registration {
    pub fn new(identity: &DeviceIdentity) -> Self {
        Self {
            name: identity.name.clone(),
            id: identity.id.clone(),
        }
    }
}

impl From<Registration> for Vec<u8> {
    fn from(value: Registration) -> Self {
        format!("{}{RECORD_DELIMITER}{}", value.name, value.id).into_bytes()
    }
}

impl TryFrom<&[u8]> for Registration {
    type Error = RecordError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let (name, id) = split_record(std::str::from_utf8(value)?)?;
        Ok(Self {
            name: name.into(),
            id: id.into(),
        })
    }
}

/// The payload a device publishes on the `heartbeat` channel, `<id>,<nanos>`,
/// where `<nanos>` is a decimal nanosecond unix timestamp.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Heartbeat {
    pub device_id: String,
    pub timestamp: u64,
}

impl From<Heartbeat> for Vec<u8> {
    fn from(value: Heartbeat) -> Self {
        format!("{}{RECORD_DELIMITER}{}", value.device_id, value.timestamp).into_bytes()
    }
}

impl TryFrom<&[u8]> for Heartbeat {
    type Error = RecordError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let (device_id, timestamp) = split_record(std::str::from_utf8(value)?)?;
        let timestamp = timestamp
            .parse::<u64>()
            .map_err(|_| RecordError::InvalidTimestamp(timestamp.into()))?;
        Ok(Self {
            device_id: device_id.into(),
            timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_record_round_trip() {
        let identity = DeviceIdentity {
            name: "sensor1".into(),
            id: "3f2c".into(),
        };
        assert_eq!(identity.to_record(), "3f2c,sensor1");
        assert_eq!(DeviceIdentity::from_record("3f2c,sensor1").unwrap(), identity);
    }

    #[test]
    fn identity_record_invalid() {
        assert_eq!(
            DeviceIdentity::from_record("no delimiter here"),
            Err(RecordError::MissingDelimiter)
        );
        assert_eq!(
            DeviceIdentity::from_record(",name"),
            Err(RecordError::EmptyField)
        );
        assert_eq!(
            DeviceIdentity::from_record("id,"),
            Err(RecordError::EmptyField)
        );
    }

    #[test]
    fn registration_wire_format_is_name_first() {
        let reg = Registration {
            name: "sensor1".into(),
            id: "3f2c".into(),
        };
        assert_eq!(Vec::<u8>::from(reg.clone()), b"sensor1,3f2c".to_vec());
        assert_eq!(Registration::try_from(b"sensor1,3f2c".as_slice()).unwrap(), reg);
    }

    #[test]
    fn heartbeat_wire_format() {
        let hb = Heartbeat {
            device_id: "3f2c".into(),
            timestamp: 1700000000000000000,
        };
        assert_eq!(
            Vec::<u8>::from(hb.clone()),
            b"3f2c,1700000000000000000".to_vec()
        );
        assert_eq!(
            Heartbeat::try_from(b"3f2c,1700000000000000000".as_slice()).unwrap(),
            hb
        );
    }

    #[test]
    fn heartbeat_rejects_non_numeric_timestamp() {
        assert_eq!(
            Heartbeat::try_from(b"3f2c,soon".as_slice()),
            Err(RecordError::InvalidTimestamp("soon".into()))
        );
    }
}
