use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use log::{error, info, warn};
use tokio::{
    select,
    sync::mpsc,
    time::{Interval, MissedTickBehavior},
};

use beacon_client::{DynClient, DynEventLoop, Event};
use beacon_types::{
    payload::{DeviceIdentity, Heartbeat, Registration},
    utils::timestamp_nanos,
};

use crate::{builder::AgentBuilder, error::AgentError, identity::IdentityStore};

/// The cadence heartbeats are emitted at unless overridden on the builder.
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug)]
struct AgentShutdown;

pub(crate) struct AgentState {
    running: AtomicBool,
    online: AtomicBool,
    identity: DeviceIdentity,
}

impl AgentState {
    fn online_swap(&self, online: bool) -> bool {
        self.online.swap(online, Ordering::SeqCst)
    }
}

/// A handle for interacting with a running [Agent].
#[derive(Clone)]
pub struct AgentHandle {
    state: Arc<AgentState>,
    client: Arc<DynClient>,
    stop_tx: mpsc::Sender<AgentShutdown>,
}

impl AgentHandle {
    /// The identity the agent resolved at build time.
    pub fn identity(&self) -> &DeviceIdentity {
        &self.state.identity
    }

    /// Stop all operations and disconnect from the broker.
    ///
    /// This will cancel [Agent::run()]
    pub async fn cancel(&self) {
        if !self.state.running.load(Ordering::SeqCst) {
            return;
        }
        info!("Agent stopping. device={}", self.state.identity.name);
        _ = self.stop_tx.send(AgentShutdown).await;
        _ = self.client.disconnect().await;
    }
}

/// Structure that represents a device side agent instance.
///
/// Once running, the agent announces its identity on the `register` channel
/// every time the connection comes up and publishes a heartbeat on a fixed
/// interval while online. See [AgentBuilder](crate::AgentBuilder) on how to
/// create an [Agent] instance.
pub struct Agent {
    eventloop: Box<DynEventLoop>,
    client: Arc<DynClient>,
    state: Arc<AgentState>,
    heartbeat_interval: Duration,
    stop_rx: mpsc::Receiver<AgentShutdown>,
}

impl Agent {
    pub(crate) fn new_from_builder(builder: AgentBuilder) -> Result<(Self, AgentHandle), AgentError> {
        let store = IdentityStore::with_path(builder.identity_path);
        let identity = store.resolve(builder.name.as_deref(), builder.re_register)?;

        let (eventloop, client) = builder.eventloop_client;
        let (stop_tx, stop_rx) = mpsc::channel(1);

        let state = Arc::new(AgentState {
            running: AtomicBool::new(false),
            online: AtomicBool::new(false),
            identity,
        });

        let handle = AgentHandle {
            state: state.clone(),
            client: client.clone(),
            stop_tx,
        };

        let agent = Self {
            eventloop,
            client,
            state,
            heartbeat_interval: builder.heartbeat_interval,
            stop_rx,
        };

        Ok((agent, handle))
    }

    async fn announce(&self) {
        let identity = &self.state.identity;
        let registration = Registration::new(identity);
        match self.client.publish_registration(registration).await {
            Ok(_) => info!(
                "Announced registration. device={} id={}",
                identity.name, identity.id
            ),
            Err(_) => error!(
                "Publishing registration failed. device={}",
                identity.name
            ),
        }
    }

    async fn on_online(&self, ticker: &mut Interval) {
        if self.state.online_swap(true) {
            return;
        }
        info!("Agent online. device={}", self.state.identity.name);
        self.announce().await;
        //registration goes out before the first heartbeat of this connection
        ticker.reset();
    }

    fn on_offline(&self) {
        if !self.state.online_swap(false) {
            return;
        }
        info!("Agent offline. device={}", self.state.identity.name);
    }

    async fn beat(&self) {
        if !self.state.online.load(Ordering::SeqCst) {
            return;
        }
        let heartbeat = Heartbeat {
            device_id: self.state.identity.id.clone(),
            timestamp: timestamp_nanos(),
        };
        if self.client.publish_heartbeat(heartbeat).await.is_err() {
            warn!(
                "Publishing heartbeat failed. device={}",
                self.state.identity.name
            );
        }
    }

    async fn handle_event(&self, event: Event, ticker: &mut Interval) {
        match event {
            Event::Online => self.on_online(ticker).await,
            Event::Offline => self.on_offline(),
            //the agent subscribes to nothing, inbound publishes are unexpected
            Event::Registration(_) | Event::Heartbeat(_) => (),
            Event::InvalidPublish { .. } => (),
        }
    }

    /// Run the agent
    ///
    /// Runs until [AgentHandle::cancel()] is called
    pub async fn run(mut self) {
        info!("Agent running. device={}", self.state.identity.name);
        self.state.running.store(true, Ordering::SeqCst);

        let mut ticker = tokio::time::interval(self.heartbeat_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            select! {
                event = self.eventloop.poll() => self.handle_event(event, &mut ticker).await,
                _ = ticker.tick() => self.beat().await,
                Some(_) = self.stop_rx.recv() => break,
            }
        }

        info!("Agent stopped. device={}", self.state.identity.name);
        self.state.running.store(false, Ordering::SeqCst);
    }
}
