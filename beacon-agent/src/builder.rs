use std::{path::PathBuf, sync::Arc, time::Duration};

use beacon_client::{Client, DynClient, DynEventLoop, EventLoop};
use beacon_types::constants::IDENTITY_FILE;

use crate::{
    agent::DEFAULT_HEARTBEAT_INTERVAL, error::AgentError, Agent, AgentHandle,
};

/// A builder for creating and configuring [Agent] instances.
///
/// Building resolves the device identity before anything touches the
/// network, so identity errors surface from [AgentBuilder::build] rather
/// than mid-run.
pub struct AgentBuilder {
    pub(crate) name: Option<String>,
    pub(crate) re_register: bool,
    pub(crate) identity_path: PathBuf,
    pub(crate) heartbeat_interval: Duration,
    pub(crate) eventloop_client: (Box<DynEventLoop>, Arc<DynClient>),
}

impl AgentBuilder {
    /// Creates a new builder with the specified event loop and client.
    pub fn new<E: EventLoop + Send + 'static, C: Client + Send + Sync + 'static>(
        eventloop: E,
        client: C,
    ) -> Self {
        Self {
            name: None,
            re_register: false,
            identity_path: IDENTITY_FILE.into(),
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
            eventloop_client: (Box::new(eventloop), Arc::new(client)),
        }
    }

    /// Sets the requested device name.
    ///
    /// Only used when a fresh registration takes place; an existing identity
    /// record wins otherwise. When never set the machine host name is used.
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Discard any persisted identity and register with a new id.
    pub fn with_re_register(mut self, re_register: bool) -> Self {
        self.re_register = re_register;
        self
    }

    /// Override the identity record path (defaults to `device.info`).
    pub fn with_identity_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.identity_path = path.into();
        self
    }

    /// Override the heartbeat cadence (defaults to 30 seconds).
    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    /// Builds the agent with the configured settings.
    ///
    /// Resolves the device identity as described by
    /// [IdentityStore::resolve](crate::IdentityStore::resolve); identity
    /// failures are fatal for registration purposes and are returned here.
    pub fn build(self) -> Result<(Agent, AgentHandle), AgentError> {
        Agent::new_from_builder(self)
    }
}
