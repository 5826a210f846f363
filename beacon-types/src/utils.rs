use std::time::{SystemTime, UNIX_EPOCH};

use crate::constants::RECORD_DELIMITER;

/// Get the current unix timestamp in nanoseconds
pub fn timestamp_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos() as u64
}

/// Validate a device name.
///
/// Names must be non empty and must not contain the `,` delimiter used by
/// the identity record and the registration payload.
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("name string must not be empty".into());
    }
    if name.contains(RECORD_DELIMITER) {
        return Err(format!(
            "name string {name} cannot contain the '{RECORD_DELIMITER}' character"
        ));
    }
    Ok(())
}

/// The client identifier a device connects to the broker with
pub fn client_id(name: &str, id: &str) -> String {
    format!("{name}/{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_valid_strings() {
        assert!(validate_name("hello").is_ok());
        assert!(validate_name("hello123").is_ok());
        assert!(validate_name("hello_world").is_ok());
    }

    #[test]
    fn test_validate_name_invalid_strings() {
        assert!(validate_name("").is_err());
        assert!(validate_name("hello,world").is_err());
        assert!(validate_name(",").is_err());
    }

    #[test]
    fn test_client_id() {
        assert_eq!(client_id("sensor1", "3f2c"), "sensor1/3f2c");
    }
}
