use std::{process::ExitCode, time::Duration};

use clap::Parser;
use log::{error, info};

use beacon::agent::{AgentBuilder, IdentityStore};
use beacon::client::mqtt_client::rumqtt;
use beacon::types::utils::client_id;

#[derive(Parser)]
#[command(about = "Device agent: registers the device and emits heartbeats")]
struct Args {
    /// The hostname of the MQTT broker
    #[arg(long, default_value = "localhost")]
    host: String,

    /// The port of the MQTT broker
    #[arg(long, default_value_t = 1883)]
    port: u16,

    /// The name with which the device will be identified
    #[arg(long)]
    name: Option<String>,

    /// Re-register the device with a new name and id
    #[arg(short = 'r', long)]
    re_register: bool,

    /// Username for the MQTT connection
    #[arg(long)]
    username: Option<String>,

    /// Password for the MQTT connection
    #[arg(long)]
    password: Option<String>,

    /// Heartbeat cadence in seconds
    #[arg(long, default_value_t = 30)]
    heartbeat_secs: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    //identity comes first: the broker client id is derived from it
    let store = IdentityStore::new();
    let identity = match store.resolve(args.name.as_deref(), args.re_register) {
        Ok(identity) => identity,
        Err(e) => {
            error!("Could not resolve device identity: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut options = rumqtt::MqttOptions::new(
        client_id(&identity.name, &identity.id),
        &args.host,
        args.port,
    );
    if let (Some(username), Some(password)) = (args.username, args.password) {
        options.set_credentials(username, password);
    }

    let (eventloop, client) = rumqtt::EventLoop::new(options, 10);
    let (agent, handle) = match AgentBuilder::new(eventloop, client)
        .with_heartbeat_interval(Duration::from_secs(args.heartbeat_secs))
        .build()
    {
        Ok(v) => v,
        Err(e) => {
            error!("Could not build agent: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!(
        "Device identity resolved. name={} id={}",
        handle.identity().name,
        handle.identity().id
    );

    let shutdown_handle = handle.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            info!("Failed to register CTRL-C handler: {e}");
            return;
        }
        shutdown_handle.cancel().await;
    });

    agent.run().await;
    ExitCode::SUCCESS
}
