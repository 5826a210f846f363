use std::time::Duration;

use clap::Parser;
use log::info;

use beacon::client::mqtt_client::rumqtt;
use beacon::collector::Collector;

#[derive(Parser)]
#[command(about = "Collector: tracks registered devices and their liveness")]
struct Args {
    /// The hostname of the MQTT broker
    #[arg(long, default_value = "localhost")]
    host: String,

    /// The port of the MQTT broker
    #[arg(long, default_value_t = 1883)]
    port: u16,

    /// Client identifier for the MQTT connection
    #[arg(long, default_value = "collector")]
    client_id: String,

    /// Username for the MQTT connection
    #[arg(long)]
    username: Option<String>,

    /// Password for the MQTT connection
    #[arg(long)]
    password: Option<String>,

    /// How often to log a registry snapshot, in seconds
    #[arg(long, default_value_t = 30)]
    snapshot_secs: u64,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut options = rumqtt::MqttOptions::new(args.client_id, &args.host, args.port);
    if let (Some(username), Some(password)) = (args.username, args.password) {
        options.set_credentials(username, password);
    }

    let (eventloop, client) = rumqtt::EventLoop::new(options, 10);
    let (collector, handle) = Collector::new(eventloop, client);

    let registry = handle.registry();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(args.snapshot_secs));
        loop {
            ticker.tick().await;
            let devices = registry.snapshot();
            info!("Known devices: {}", devices.len());
            for (id, entry) in devices {
                info!(
                    "Device. id={id} name={} first_seen={} last_seen={}",
                    entry.name, entry.first_seen, entry.last_seen
                );
            }
        }
    });

    let shutdown_handle = handle.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            info!("Failed to register CTRL-C handler: {e}");
            return;
        }
        shutdown_handle.cancel().await;
    });

    collector.run().await;
}
