pub const REGISTER: &str = "register";
pub const HEARTBEAT: &str = "heartbeat";

/// Field delimiter used by the identity record and both wire payloads
pub const RECORD_DELIMITER: char = ',';

/// Default file the device identity record is persisted to
pub const IDENTITY_FILE: &str = "device.info";
