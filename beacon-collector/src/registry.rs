use std::{collections::HashMap, sync::Mutex};

use log::{debug, info};

use beacon_types::{
    payload::{Heartbeat, Registration},
    utils::timestamp_nanos,
};

/// The latest known state for a registered device.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryEntry {
    /// The name the device reported at its last registration.
    pub name: String,
    /// Nanosecond unix timestamp of the most recent registration.
    pub first_seen: u64,
    /// Nanosecond unix timestamp of the most recent registration or heartbeat.
    pub last_seen: u64,
}

/// An in-memory mapping from device id to [RegistryEntry].
///
/// Writes are serialized through an internal mutex since the transport may
/// dispatch message handlers concurrently. A registration always fully
/// overwrites any existing entry for that id; a heartbeat only refreshes
/// `last_seen` and only for ids that have registered.
pub struct DeviceRegistry {
    devices: Mutex<HashMap<String, RegistryEntry>>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self {
            devices: Mutex::new(HashMap::new()),
        }
    }

    /// Record a registration, replacing any prior entry for the id.
    pub fn on_registration(&self, registration: Registration) {
        self.register_at(registration, timestamp_nanos())
    }

    fn register_at(&self, registration: Registration, now: u64) {
        let entry = RegistryEntry {
            name: registration.name,
            first_seen: now,
            last_seen: now,
        };
        info!("Registered device. id={} name={}", registration.id, entry.name);
        self.devices.lock().unwrap().insert(registration.id, entry);
    }

    /// Record a heartbeat, refreshing `last_seen` for a known id.
    ///
    /// Heartbeats from ids that never registered are dropped; a name is only
    /// known once a registration arrives.
    pub fn on_heartbeat(&self, heartbeat: Heartbeat) {
        let mut devices = self.devices.lock().unwrap();
        match devices.get_mut(&heartbeat.device_id) {
            Some(entry) => {
                entry.last_seen = heartbeat.timestamp;
                debug!(
                    "Heartbeat. id={} last_seen={}",
                    heartbeat.device_id, heartbeat.timestamp
                );
            }
            None => debug!(
                "Heartbeat from unregistered device. id={}",
                heartbeat.device_id
            ),
        }
    }

    /// The entry for a device id, if it has registered.
    pub fn get(&self, id: &str) -> Option<RegistryEntry> {
        self.devices.lock().unwrap().get(id).cloned()
    }

    /// All known devices as `(id, entry)` pairs.
    pub fn snapshot(&self) -> Vec<(String, RegistryEntry)> {
        self.devices
            .lock()
            .unwrap()
            .iter()
            .map(|(id, entry)| (id.clone(), entry.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.devices.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.lock().unwrap().is_empty()
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
