//! Drives an agent and a collector against each other through the channel
//! client, shuttling the agent's publishes across the real wire encoding.

use std::time::Duration;

use beacon::agent::AgentBuilder;
use beacon::collector::Collector;
use beacon::types::constants::{HEARTBEAT, REGISTER};
use beacon_client::{
    channel::{ChannelBroker, ChannelEventLoop, OutboundMessage},
    topic_and_payload_to_event, Event,
};
use tempfile::TempDir;
use tokio::time::timeout;

/// Forward one agent publish to the collector as wire bytes.
async fn relay(agent_broker: &mut ChannelBroker, collector_broker: &ChannelBroker) {
    let outbound = timeout(Duration::from_secs(1), agent_broker.rx_outbound.recv())
        .await
        .unwrap()
        .unwrap();
    let (topic, payload) = match outbound {
        OutboundMessage::Registration(registration) => {
            (REGISTER.as_bytes().to_vec(), Vec::<u8>::from(registration))
        }
        OutboundMessage::Heartbeat(heartbeat) => {
            (HEARTBEAT.as_bytes().to_vec(), Vec::<u8>::from(heartbeat))
        }
        other => panic!("unexpected outbound message {other:?}"),
    };
    collector_broker
        .tx_event
        .send(topic_and_payload_to_event(topic, payload))
        .unwrap();
}

#[tokio::test]
async fn device_registers_and_pulses_through_to_the_registry() {
    let dir = TempDir::new().unwrap();

    let (collector_eventloop, collector_client, collector_broker) = ChannelEventLoop::new();
    let (collector, collector_handle) = Collector::new(collector_eventloop, collector_client);
    tokio::spawn(async move { collector.run().await });

    let (agent_eventloop, agent_client, mut agent_broker) = ChannelEventLoop::new();
    let (agent, agent_handle) = AgentBuilder::new(agent_eventloop, agent_client)
        .with_name("sensor1")
        .with_identity_path(dir.path().join("device.info"))
        .with_heartbeat_interval(Duration::from_millis(100))
        .build()
        .unwrap();
    let identity = agent_handle.identity().clone();
    assert_eq!(identity.name, "sensor1");
    tokio::spawn(async move { agent.run().await });

    collector_broker.tx_event.send(Event::Online).unwrap();
    agent_broker.tx_event.send(Event::Online).unwrap();

    //registration arrives first
    relay(&mut agent_broker, &collector_broker).await;
    let registry = collector_handle.registry();
    timeout(Duration::from_secs(1), async {
        while registry.get(&identity.id).is_none() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();

    let entry = registry.get(&identity.id).unwrap();
    assert_eq!(entry.name, "sensor1");
    assert_eq!(entry.first_seen, entry.last_seen);

    //then a heartbeat, which refreshes last_seen but not first_seen
    relay(&mut agent_broker, &collector_broker).await;
    timeout(Duration::from_secs(1), async {
        loop {
            let current = registry.get(&identity.id).unwrap();
            if current.last_seen != current.first_seen {
                break current;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();
    assert_eq!(registry.get(&identity.id).unwrap().first_seen, entry.first_seen);

    //a second run of the same device resolves the identical identity
    agent_handle.cancel().await;
    let (eventloop, client, _broker) = ChannelEventLoop::new();
    let (_, second_handle) = AgentBuilder::new(eventloop, client)
        .with_identity_path(dir.path().join("device.info"))
        .build()
        .unwrap();
    assert_eq!(*second_handle.identity(), identity);
}
