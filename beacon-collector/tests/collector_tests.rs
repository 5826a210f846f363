use std::time::Duration;

use beacon_client::{
    channel::{ChannelBroker, ChannelEventLoop, OutboundMessage},
    Event, MessageError,
};
use beacon_collector::{Collector, CollectorHandle, DeviceRegistry};
use beacon_types::{
    payload::{Heartbeat, Registration},
    topic::{Channel, QoS, TopicFilter},
};
use std::sync::Arc;
use tokio::time::timeout;

fn spawn_collector() -> (CollectorHandle, ChannelBroker) {
    let (eventloop, client, broker) = ChannelEventLoop::new();
    let (collector, handle) = Collector::new(eventloop, client);
    tokio::spawn(async move { collector.run().await });
    (handle, broker)
}

fn registration(name: &str, id: &str) -> Registration {
    Registration {
        name: name.into(),
        id: id.into(),
    }
}

/// Poll the registry until `predicate` holds or a second passes.
async fn wait_for<F: Fn(&DeviceRegistry) -> bool>(registry: &Arc<DeviceRegistry>, predicate: F) {
    timeout(Duration::from_secs(1), async {
        while !predicate(registry) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("registry did not reach expected state in time");
}

#[tokio::test]
async fn subscribes_to_both_channels_on_online() {
    let (_handle, mut broker) = spawn_collector();
    broker.tx_event.send(Event::Online).unwrap();

    let outbound = timeout(Duration::from_secs(1), broker.rx_outbound.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        outbound,
        OutboundMessage::Subscribe(vec![
            TopicFilter::new_with_qos(Channel::Register, QoS::AtLeastOnce),
            TopicFilter::new_with_qos(Channel::Heartbeat, QoS::AtLeastOnce),
        ])
    );
}

#[tokio::test]
async fn registration_populates_registry() {
    let (handle, broker) = spawn_collector();
    let registry = handle.registry();

    broker.tx_event.send(Event::Online).unwrap();
    broker
        .tx_event
        .send(Event::Registration(registration("sensor1", "a")))
        .unwrap();

    wait_for(&registry, |r| r.len() == 1).await;
    let entry = registry.get("a").unwrap();
    assert_eq!(entry.name, "sensor1");
    assert_eq!(entry.first_seen, entry.last_seen);
    assert!(entry.first_seen > 0);
}

#[tokio::test]
async fn second_registration_overwrites_entry() {
    let (handle, broker) = spawn_collector();
    let registry = handle.registry();

    broker
        .tx_event
        .send(Event::Registration(registration("sensor1", "a")))
        .unwrap();
    wait_for(&registry, |r| r.len() == 1).await;
    let first = registry.get("a").unwrap();

    broker
        .tx_event
        .send(Event::Registration(registration("renamed", "a")))
        .unwrap();
    wait_for(&registry, |r| {
        r.get("a").map(|e| e.name == "renamed").unwrap_or(false)
    })
    .await;

    let second = registry.get("a").unwrap();
    assert_eq!(registry.len(), 1);
    assert_eq!(second.first_seen, second.last_seen);
    assert!(second.first_seen >= first.first_seen);
}

#[tokio::test]
async fn registrations_for_distinct_ids_are_isolated() {
    let (handle, broker) = spawn_collector();
    let registry = handle.registry();

    broker
        .tx_event
        .send(Event::Registration(registration("sensor1", "a")))
        .unwrap();
    broker
        .tx_event
        .send(Event::Registration(registration("sensor2", "b")))
        .unwrap();

    wait_for(&registry, |r| r.len() == 2).await;
    assert_eq!(registry.get("a").unwrap().name, "sensor1");
    assert_eq!(registry.get("b").unwrap().name, "sensor2");
}

#[tokio::test]
async fn heartbeat_updates_last_seen_for_known_device() {
    let (handle, broker) = spawn_collector();
    let registry = handle.registry();

    broker
        .tx_event
        .send(Event::Registration(registration("sensor1", "a")))
        .unwrap();
    wait_for(&registry, |r| r.len() == 1).await;
    let registered = registry.get("a").unwrap();

    broker
        .tx_event
        .send(Event::Heartbeat(Heartbeat {
            device_id: "a".into(),
            timestamp: registered.last_seen + 1_000,
        }))
        .unwrap();

    wait_for(&registry, |r| {
        r.get("a").map(|e| e.last_seen > e.first_seen).unwrap_or(false)
    })
    .await;
    let entry = registry.get("a").unwrap();
    assert_eq!(entry.first_seen, registered.first_seen);
    assert_eq!(entry.last_seen, registered.last_seen + 1_000);
}

#[tokio::test]
async fn heartbeat_from_unknown_device_creates_no_entry() {
    let (handle, broker) = spawn_collector();
    let registry = handle.registry();

    broker
        .tx_event
        .send(Event::Heartbeat(Heartbeat {
            device_id: "ghost".into(),
            timestamp: 1,
        }))
        .unwrap();
    //a later registration proves the heartbeat was processed and dropped
    broker
        .tx_event
        .send(Event::Registration(registration("sensor1", "a")))
        .unwrap();

    wait_for(&registry, |r| r.len() == 1).await;
    assert!(registry.get("ghost").is_none());
}

#[tokio::test]
async fn invalid_publish_is_dropped() {
    let (handle, broker) = spawn_collector();
    let registry = handle.registry();

    broker
        .tx_event
        .send(Event::InvalidPublish {
            reason: MessageError::UnknownChannel,
            topic: b"other".to_vec(),
            payload: b"junk".to_vec(),
        })
        .unwrap();
    broker
        .tx_event
        .send(Event::Registration(registration("sensor1", "a")))
        .unwrap();

    wait_for(&registry, |r| r.len() == 1).await;
    assert_eq!(registry.get("a").unwrap().name, "sensor1");
}

#[tokio::test]
async fn cancel_disconnects_and_stops() {
    let (handle, mut broker) = spawn_collector();
    broker.tx_event.send(Event::Online).unwrap();
    let outbound = timeout(Duration::from_secs(1), broker.rx_outbound.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(outbound, OutboundMessage::Subscribe(_)));

    handle.cancel().await;
    let outbound = timeout(Duration::from_secs(1), broker.rx_outbound.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outbound, OutboundMessage::Disconnect);
}
