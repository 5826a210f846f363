use crate::Event;
use async_trait::async_trait;
use beacon_types::{
    payload::{Heartbeat, Registration},
    topic::TopicFilter,
};
use tokio::sync::mpsc;

/// A [Client](crate::Client) implementation that uses channels for message passing.
///
/// # Examples
///
/// See [ChannelEventLoop]
#[derive(Clone)]
pub struct ChannelClient {
    tx: mpsc::UnboundedSender<OutboundMessage>,
}

#[async_trait]
impl crate::Client for ChannelClient {
    async fn disconnect(&self) -> Result<(), ()> {
        match self.tx.send(OutboundMessage::Disconnect) {
            Ok(_) => Ok(()),
            Err(_) => Err(()),
        }
    }

    async fn publish_registration(&self, registration: Registration) -> Result<(), ()> {
        match self.tx.send(OutboundMessage::Registration(registration)) {
            Ok(_) => Ok(()),
            Err(_) => Err(()),
        }
    }

    async fn publish_heartbeat(&self, heartbeat: Heartbeat) -> Result<(), ()> {
        match self.tx.send(OutboundMessage::Heartbeat(heartbeat)) {
            Ok(_) => Ok(()),
            Err(_) => Err(()),
        }
    }

    async fn subscribe_many(&self, topics: Vec<TopicFilter>) -> Result<(), ()> {
        match self.tx.send(OutboundMessage::Subscribe(topics)) {
            Ok(_) => Ok(()),
            Err(_) => Err(()),
        }
    }
}

/// An Enum representing different messages and requests a [ChannelClient] can send to the [ChannelBroker]
#[derive(Clone, Debug, PartialEq)]
pub enum OutboundMessage {
    Disconnect,
    Registration(Registration),
    Heartbeat(Heartbeat),
    Subscribe(Vec<TopicFilter>),
}

/// A "broker" that manages the communication between a [ChannelClient] and a [ChannelEventLoop].
///
/// Used to send events to the eventloop and inspect messages/requests produced by the client
///
/// # Examples
///
/// ```no_run
/// use beacon_client::{Event, channel::{ChannelEventLoop, ChannelClient}};
/// use tokio::runtime::Runtime;
///
/// let rt = Runtime::new().unwrap();
/// rt.block_on(async {
///     let (mut eventloop, client, mut broker) = ChannelEventLoop::new();
///
///     //create agent or collector that uses the EventLoop and client
///
///     //Send an event to the EventLoop
///     broker.tx_event.send(Event::Online).unwrap();
///
///     //Receive a message or request from the Client
///     let message = broker.rx_outbound.recv().await.unwrap();
/// });
/// ```
pub struct ChannelBroker {
    pub rx_outbound: mpsc::UnboundedReceiver<OutboundMessage>,
    pub tx_event: mpsc::UnboundedSender<Event>,
}

/// An [EventLoop](crate::EventLoop) implementation that uses channels
///
/// # Examples
///
/// See [ChannelBroker]
pub struct ChannelEventLoop {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl ChannelEventLoop {
    /// Creates a new event loop along with the corresponding client and broker.
    pub fn new() -> (Self, ChannelClient, ChannelBroker) {
        let (tx_event, rx_event) = mpsc::unbounded_channel();
        let (tx_outbound, rx_outbound) = mpsc::unbounded_channel();
        let el = Self { rx: rx_event };
        (
            el,
            ChannelClient { tx: tx_outbound },
            ChannelBroker {
                rx_outbound,
                tx_event,
            },
        )
    }
}

#[async_trait]
impl crate::EventLoop for ChannelEventLoop {
    async fn poll(&mut self) -> Event {
        match self.rx.recv().await {
            Some(event) => event,
            //all senders dropped, nothing will ever arrive again
            None => std::future::pending().await,
        }
    }
}
