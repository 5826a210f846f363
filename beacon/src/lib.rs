pub use beacon_agent as agent;
pub use beacon_collector as collector;
pub use beacon_types as types;
pub mod client {
    pub use beacon_client::*;

    pub mod mqtt_client {
        pub use beacon_client_rumqtt as rumqtt;
    }
}
