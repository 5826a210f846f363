use async_trait::async_trait;
use beacon_types::{
    payload::{Heartbeat, Registration},
    topic::TopicFilter,
};

use crate::Event;

#[async_trait]
pub trait Client {
    /// Disconnects the client.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if the disconnection was successful
    /// - `Err(())` if the disconnection failed
    async fn disconnect(&self) -> Result<(), ()>;

    /// Publishes a registration announcement on the `register` channel.
    ///
    /// This method will yield to the async runtime until the message is accepted by the client
    ///
    /// # Returns
    ///
    /// - `Ok(())` if the message was successfully published
    /// - `Err(())` if the publication failed
    async fn publish_registration(&self, registration: Registration) -> Result<(), ()>;

    /// Publishes a liveness pulse on the `heartbeat` channel.
    ///
    /// This method will yield to the async runtime until the message is accepted by the client
    ///
    /// # Returns
    ///
    /// - `Ok(())` if the message was successfully published
    /// - `Err(())` if the publication failed
    async fn publish_heartbeat(&self, heartbeat: Heartbeat) -> Result<(), ()>;

    /// Subscribes to a single channel.
    ///
    /// This is a convenience method that calls `subscribe_many` with a single filter.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if the subscription was successful
    /// - `Err(())` if the subscription failed
    async fn subscribe(&self, topic: TopicFilter) -> Result<(), ()> {
        self.subscribe_many(vec![topic]).await
    }

    /// Subscribes to multiple channels in a single operation.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if all subscriptions were successful
    /// - `Err(())` if any subscription failed
    async fn subscribe_many(&self, topics: Vec<TopicFilter>) -> Result<(), ()>;
}

pub type DynClient = dyn Client + Send + Sync;

#[async_trait]
pub trait EventLoop {
    async fn poll(&mut self) -> Event;
}

pub type DynEventLoop = dyn EventLoop + Send;
