use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use log::{info, warn};
use tokio::{select, sync::mpsc};

use beacon_client::{Client, DynClient, DynEventLoop, Event, EventLoop};
use beacon_types::topic::{Channel, QoS, TopicFilter};

use crate::registry::DeviceRegistry;

#[derive(Debug)]
struct CollectorShutdown;

struct CollectorState {
    running: AtomicBool,
    online: AtomicBool,
}

impl CollectorState {
    fn online_swap(&self, online: bool) -> bool {
        self.online.swap(online, Ordering::SeqCst)
    }
}

/// A handle for interacting with a running [Collector].
#[derive(Clone)]
pub struct CollectorHandle {
    registry: Arc<DeviceRegistry>,
    client: Arc<DynClient>,
    state: Arc<CollectorState>,
    stop_tx: mpsc::Sender<CollectorShutdown>,
}

impl CollectorHandle {
    /// The registry the collector writes into.
    ///
    /// Shared ownership: the registry stays readable after the collector
    /// stops, it is simply no longer updated.
    pub fn registry(&self) -> Arc<DeviceRegistry> {
        self.registry.clone()
    }

    /// Unsubscribe by disconnecting from the broker and stop the collector.
    ///
    /// This will cancel [Collector::run()]
    pub async fn cancel(&self) {
        if !self.state.running.load(Ordering::SeqCst) {
            return;
        }
        info!("Collector stopping");
        _ = self.stop_tx.send(CollectorShutdown).await;
        _ = self.client.disconnect().await;
    }
}

/// Structure that represents a collector instance.
///
/// Subscribes to the `register` and `heartbeat` channels whenever the
/// connection comes up and folds received messages into its [DeviceRegistry].
pub struct Collector {
    eventloop: Box<DynEventLoop>,
    client: Arc<DynClient>,
    registry: Arc<DeviceRegistry>,
    state: Arc<CollectorState>,
    stop_rx: mpsc::Receiver<CollectorShutdown>,
}

impl Collector {
    /// Creates a collector over the given event loop and client, along with
    /// its handle.
    pub fn new<E: EventLoop + Send + 'static, C: Client + Send + Sync + 'static>(
        eventloop: E,
        client: C,
    ) -> (Self, CollectorHandle) {
        let (stop_tx, stop_rx) = mpsc::channel(1);
        let registry = Arc::new(DeviceRegistry::new());
        let client: Arc<DynClient> = Arc::new(client);
        let state = Arc::new(CollectorState {
            running: AtomicBool::new(false),
            online: AtomicBool::new(false),
        });

        let handle = CollectorHandle {
            registry: registry.clone(),
            client: client.clone(),
            state: state.clone(),
            stop_tx,
        };

        let collector = Self {
            eventloop: Box::new(eventloop),
            client,
            registry,
            state,
            stop_rx,
        };

        (collector, handle)
    }

    fn sub_topics() -> Vec<TopicFilter> {
        vec![
            TopicFilter::new_with_qos(Channel::Register, QoS::AtLeastOnce),
            TopicFilter::new_with_qos(Channel::Heartbeat, QoS::AtLeastOnce),
        ]
    }

    async fn on_online(&self) {
        if self.state.online_swap(true) {
            return;
        }
        info!("Collector online");
        match self.client.subscribe_many(Self::sub_topics()).await {
            Ok(_) => info!("Subscribed to channels: register, heartbeat"),
            Err(_) => warn!("Subscribing to channels failed"),
        }
    }

    fn on_offline(&self) {
        if !self.state.online_swap(false) {
            return;
        }
        info!("Collector offline");
    }

    async fn handle_event(&self, event: Event) {
        match event {
            Event::Online => self.on_online().await,
            Event::Offline => self.on_offline(),
            Event::Registration(registration) => self.registry.on_registration(registration),
            Event::Heartbeat(heartbeat) => self.registry.on_heartbeat(heartbeat),
            Event::InvalidPublish {
                reason,
                topic,
                payload,
            } => warn!(
                "Dropping invalid publish. reason={reason} topic={:?} payload={:?}",
                String::from_utf8_lossy(&topic),
                String::from_utf8_lossy(&payload)
            ),
        }
    }

    /// Run the collector
    ///
    /// Runs until [CollectorHandle::cancel()] is called
    pub async fn run(mut self) {
        info!("Collector running");
        self.state.running.store(true, Ordering::SeqCst);

        loop {
            select! {
                event = self.eventloop.poll() => self.handle_event(event).await,
                Some(_) = self.stop_rx.recv() => break,
            }
        }

        info!("Collector stopped");
        self.state.running.store(false, Ordering::SeqCst);
    }
}
