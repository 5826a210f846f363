use beacon_types::payload::RecordError;
use thiserror::Error;

/// Errors produced while resolving the persisted device identity.
///
/// Every variant is unrecoverable for the calling process: the identity
/// record could not be created, read or locked. Callers are expected to
/// treat these as fatal (print a diagnostic and exit non zero), they are
/// surfaced as values so embedding code and tests can intercept them.
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("identity file io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("identity record is malformed: {0}")]
    InvalidRecord(#[from] RecordError),
    #[error("invalid device name: {0}")]
    InvalidName(String),
    #[error("host name is not valid utf8")]
    Hostname,
}

#[derive(Error, Debug)]
pub enum AgentError {
    #[error(transparent)]
    Identity(#[from] IdentityError),
}
