use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};
use uuid::Uuid;

use beacon_types::{constants::IDENTITY_FILE, payload::DeviceIdentity, utils::validate_name};

use crate::error::IdentityError;

/// Resolves a stable `(name, id)` pair for the current device across restarts.
///
/// The identity is persisted as a single `<id>,<name>` line. After every
/// write the record is made read-only to discourage accidental edits between
/// runs; it is only made writable again around an explicit re-registration.
///
/// The store assumes it is the only process using the record. Two processes
/// registering against the same file concurrently have undefined outcome.
pub struct IdentityStore {
    path: PathBuf,
}

impl IdentityStore {
    /// Create a store over the default record path, [IDENTITY_FILE].
    pub fn new() -> Self {
        Self::with_path(IDENTITY_FILE)
    }

    /// Create a store over a specific record path.
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve the device identity.
    ///
    /// - With `re_register` set, any existing record is unlocked and replaced
    ///   wholesale: a new id is generated and the old one discarded.
    /// - Otherwise an existing record is returned verbatim and
    ///   `requested_name` is ignored.
    /// - With no record on disk a fresh registration is performed:
    ///   `requested_name`, or the machine host name when absent, is bound to
    ///   a newly generated id.
    ///
    /// Any [IdentityError] is unrecoverable, see its documentation.
    pub fn resolve(
        &self,
        requested_name: Option<&str>,
        re_register: bool,
    ) -> Result<DeviceIdentity, IdentityError> {
        if re_register {
            if self.path.exists() {
                self.set_writable()?;
            }
            return self.register(requested_name);
        }
        if !self.path.exists() {
            return self.register(requested_name);
        }
        self.load()
    }

    fn load(&self) -> Result<DeviceIdentity, IdentityError> {
        let contents = fs::read_to_string(&self.path)?;
        let identity = DeviceIdentity::from_record(contents.trim_end())?;
        debug!(
            "Loaded existing identity. device={} id={}",
            identity.name, identity.id
        );
        Ok(identity)
    }

    fn register(&self, requested_name: Option<&str>) -> Result<DeviceIdentity, IdentityError> {
        let name = match requested_name {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => hostname()?,
        };
        validate_name(&name).map_err(IdentityError::InvalidName)?;

        let identity = DeviceIdentity {
            name,
            id: Uuid::new_v4().to_string(),
        };
        fs::write(&self.path, identity.to_record())?;
        self.set_read_only()?;
        info!(
            "Registered new identity. device={} id={}",
            identity.name, identity.id
        );
        Ok(identity)
    }

    #[cfg(unix)]
    fn set_writable(&self) -> Result<(), IdentityError> {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&self.path, fs::Permissions::from_mode(0o777))?;
        Ok(())
    }

    #[cfg(unix)]
    fn set_read_only(&self) -> Result<(), IdentityError> {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&self.path, fs::Permissions::from_mode(0o444))?;
        Ok(())
    }

    #[cfg(not(unix))]
    fn set_writable(&self) -> Result<(), IdentityError> {
        let mut perms = fs::metadata(&self.path)?.permissions();
        perms.set_readonly(false);
        fs::set_permissions(&self.path, perms)?;
        Ok(())
    }

    #[cfg(not(unix))]
    fn set_read_only(&self) -> Result<(), IdentityError> {
        let mut perms = fs::metadata(&self.path)?.permissions();
        perms.set_readonly(true);
        fs::set_permissions(&self.path, perms)?;
        Ok(())
    }
}

impl Default for IdentityStore {
    fn default() -> Self {
        Self::new()
    }
}

fn hostname() -> Result<String, IdentityError> {
    gethostname::gethostname()
        .into_string()
        .map_err(|_| IdentityError::Hostname)
}
