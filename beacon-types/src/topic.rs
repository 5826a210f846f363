use super::constants::{HEARTBEAT, REGISTER};

/// The well known channels devices publish on and the collector subscribes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Register,
    Heartbeat,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Register => REGISTER,
            Channel::Heartbeat => HEARTBEAT,
        }
    }

    /// The [QoS] a message on this channel should be published with
    pub fn publish_qos(&self) -> QoS {
        match self {
            Channel::Register => QoS::AtMostOnce,
            Channel::Heartbeat => QoS::AtMostOnce,
        }
    }
}

impl From<Channel> for String {
    fn from(value: Channel) -> Self {
        value.as_str().into()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum QoS {
    AtMostOnce,
    AtLeastOnce,
    ExactlyOnce,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TopicFilter {
    pub channel: Channel,
    pub qos: QoS,
}

impl TopicFilter {
    pub fn new(channel: Channel) -> Self {
        Self::new_with_qos(channel, QoS::AtMostOnce)
    }

    pub fn new_with_qos(channel: Channel, qos: QoS) -> Self {
        Self { channel, qos }
    }
}
