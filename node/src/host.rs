use std::{
    io::ErrorKind,
    path::PathBuf,
    sync::OnceLock,
    time::{Duration, Instant},
};

use anyhow::Context;
use rumqttc::{AsyncClient, Event as MqttEvent, Incoming, LastWill, MqttOptions, QoS};
use tokio::sync::mpsc;
use tracing::{info, warn};

use lcd_thermostat_common::{
    ButtonSide, Event, NodeRuntime, RuntimeConfig, TOPIC_CMD_BUTTON, TOPIC_NODE_STATUS,
};

use crate::{
    adapters::{FileEeprom, MqttRadio, TraceDisplay, TraceLeds},
    peripherals,
};

const EVENT_QUEUE_DEPTH: usize = 64;
const DISPLAY_REFRESH_MS: u64 = 250;
const MAX_MQTT_PAYLOAD_BYTES: usize = 64;

struct NodeStore {
    runtime_path: PathBuf,
    eeprom_path: PathBuf,
}

impl NodeStore {
    fn new() -> Self {
        let data_dir = std::env::var("LCD_THERMOSTAT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./.lcd-thermostat"));

        Self {
            runtime_path: data_dir.join("runtime.json"),
            eeprom_path: data_dir.join("eeprom.bin"),
        }
    }

    async fn load_runtime_config(&self) -> anyhow::Result<RuntimeConfig> {
        match tokio::fs::read(&self.runtime_path).await {
            Ok(raw) => Ok(serde_json::from_slice::<RuntimeConfig>(&raw)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(RuntimeConfig::default()),
            Err(err) => Err(err.into()),
        }
    }
}

pub async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let store = NodeStore::new();
    let mut runtime_config = store.load_runtime_config().await.unwrap_or_else(|err| {
        warn!("failed to load runtime config from store: {err:#}");
        RuntimeConfig::default()
    });
    runtime_config.sanitize();
    let RuntimeConfig {
        thermostat,
        network,
        device,
    } = runtime_config;

    let mqtt_host = std::env::var("MQTT_HOST").unwrap_or(network.mqtt_host);
    let mqtt_port = std::env::var("MQTT_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(network.mqtt_port);

    let mut mqtt_options = MqttOptions::new(device.name.clone(), mqtt_host, mqtt_port);
    mqtt_options.set_last_will(LastWill::new(
        TOPIC_NODE_STATUS,
        "offline",
        QoS::AtLeastOnce,
        true,
    ));
    let mqtt_user = std::env::var("MQTT_USER").unwrap_or(network.mqtt_user);
    let mqtt_pass = std::env::var("MQTT_PASS").unwrap_or(network.mqtt_pass);
    if !mqtt_user.is_empty() {
        mqtt_options.set_credentials(mqtt_user, mqtt_pass);
    }

    let (mqtt, eventloop) = AsyncClient::new(mqtt_options, 32);

    mqtt.subscribe(TOPIC_CMD_BUTTON, QoS::AtMostOnce)
        .await
        .context("failed to subscribe to button commands")?;
    mqtt.publish(TOPIC_NODE_STATUS, QoS::AtLeastOnce, true, "online")
        .await
        .context("failed to publish node online status")?;

    let eeprom = FileEeprom::open(store.eeprom_path.clone(), device.eeprom_size)
        .with_context(|| format!("failed to open {}", store.eeprom_path.display()))?;

    let mut node = NodeRuntime::new(
        thermostat.clone(),
        eeprom,
        MqttRadio::new(mqtt.clone()),
        TraceDisplay::new(Duration::from_millis(DISPLAY_REFRESH_MS)),
        TraceLeds,
    );

    let (events_tx, mut events_rx) = mpsc::channel::<Event>(EVENT_QUEUE_DEPTH);
    spawn_mqtt_loop(eventloop, events_tx.clone());
    peripherals::spawn_peripherals(&thermostat, events_tx);

    node.start(&device.name, &device.firmware_version);
    node.run_pending(monotonic_ms());
    info!("{} {} running", device.name, device.firmware_version);

    loop {
        tokio::select! {
            event = events_rx.recv() => {
                let Some(event) = event else {
                    warn!("event sources closed");
                    break;
                };
                let now_ms = monotonic_ms();
                node.dispatch(event, now_ms);
                node.run_pending(now_ms);
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested");
                break;
            }
        }
    }

    if let Err(err) = mqtt
        .publish(TOPIC_NODE_STATUS, QoS::AtLeastOnce, true, "offline")
        .await
    {
        warn!("failed to publish node offline status: {err}");
    }
    Ok(())
}

fn spawn_mqtt_loop(mut eventloop: rumqttc::EventLoop, events: mpsc::Sender<Event>) {
    tokio::spawn(async move {
        loop {
            match eventloop.poll().await {
                Ok(MqttEvent::Incoming(Incoming::Publish(message))) => {
                    let Some(side) = parse_button_command(&message.topic, &message.payload) else {
                        continue;
                    };
                    if events.send(Event::ButtonClick(side)).await.is_err() {
                        break;
                    }
                }
                Ok(MqttEvent::Incoming(Incoming::ConnAck(_))) => {
                    info!("mqtt connected");
                }
                Ok(_) => {}
                Err(err) => {
                    warn!("node mqtt poll error: {err}");
                    tokio::time::sleep(Duration::from_secs(2)).await;
                }
            }
        }
    });
}

fn parse_button_command(topic: &str, payload: &[u8]) -> Option<ButtonSide> {
    if topic != TOPIC_CMD_BUTTON {
        return None;
    }
    if payload.len() > MAX_MQTT_PAYLOAD_BYTES {
        warn!(
            "dropping oversized button command ({} bytes)",
            payload.len()
        );
        return None;
    }

    let side = std::str::from_utf8(payload).ok().and_then(ButtonSide::parse);
    if side.is_none() {
        warn!("ignoring unknown button command {:?}", String::from_utf8_lossy(payload));
    }
    side
}

fn monotonic_ms() -> u64 {
    static START: OnceLock<Instant> = OnceLock::new();
    START
        .get_or_init(Instant::now)
        .elapsed()
        .as_millis()
        .try_into()
        .unwrap_or(u64::MAX)
}
