//! What the listener knows about the node, built purely from its publishes.

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use lcd_thermostat_common::{
    ChannelStatus, LivenessTracker, PairingPayload, PublishChannel, TOPIC_NODE_STATUS,
    TOPIC_PAIRING,
};

pub const LIVENESS_GRACE_MS: u64 = 60_000;
const MAX_PAYLOAD_BYTES: usize = 256;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    #[serde(rename = "nodeOnline")]
    pub node_online: bool,
    #[serde(rename = "nodeStatus")]
    pub node_status: Option<String>,
    pub pairing: Option<PairingPayload>,
    #[serde(rename = "lastSeenEpoch")]
    pub last_seen_epoch: Option<i64>,
    pub channels: Vec<ChannelStatus>,
}

#[derive(Debug)]
pub struct NodeView {
    liveness: LivenessTracker,
    pairing: Option<PairingPayload>,
    node_status: Option<String>,
    last_seen: Option<DateTime<Utc>>,
}

impl NodeView {
    pub fn new(heartbeat_interval_ms: u64) -> Self {
        Self {
            liveness: LivenessTracker::new(heartbeat_interval_ms, LIVENESS_GRACE_MS),
            pairing: None,
            node_status: None,
            last_seen: None,
        }
    }

    /// Applies one publish. `retained` marks a broker replay of an old
    /// message, which says nothing about whether the node is alive now.
    pub fn ingest(
        &mut self,
        topic: &str,
        payload: &[u8],
        retained: bool,
        now_ms: u64,
        now: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        if payload.len() > MAX_PAYLOAD_BYTES {
            bail!("payload on {topic} too large ({} bytes)", payload.len());
        }

        if let Some(channel) = PublishChannel::from_topic(topic) {
            let value = parse_reading(payload)
                .with_context(|| format!("invalid {} reading", channel.as_str()))?;
            if retained {
                debug!("ignoring retained {} = {value}", channel.as_str());
                return Ok(());
            }
            debug!("{} = {value}", channel.as_str());
            self.liveness.record(channel, value, now_ms);
            self.last_seen = Some(now);
            return Ok(());
        }

        match topic {
            TOPIC_PAIRING => {
                let pairing: PairingPayload =
                    serde_json::from_slice(payload).context("invalid pairing payload")?;
                info!(
                    "pairing request from {} ({})",
                    pairing.name, pairing.firmware_version
                );
                self.pairing = Some(pairing);
                self.last_seen = Some(now);
            }
            TOPIC_NODE_STATUS => {
                let status = std::str::from_utf8(payload)
                    .context("node status is not utf-8")?
                    .trim()
                    .to_string();
                info!("node is {status}");
                self.node_status = Some(status);
            }
            _ => {}
        }

        Ok(())
    }

    pub fn status(&self, now_ms: u64) -> StatusResponse {
        StatusResponse {
            node_online: self.liveness.node_online(now_ms),
            node_status: self.node_status.clone(),
            pairing: self.pairing.clone(),
            last_seen_epoch: self.last_seen.map(|seen| seen.timestamp()),
            channels: self.liveness.status(now_ms),
        }
    }
}

fn parse_reading(payload: &[u8]) -> anyhow::Result<f32> {
    let text = std::str::from_utf8(payload)?.trim();
    let value = text.parse::<f32>()?;
    if !value.is_finite() {
        bail!("non-finite reading {text}");
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use lcd_thermostat_common::{
        ButtonSide, ChannelHealth, TOPIC_BUTTON_LEFT_COUNT, TOPIC_SET_POINT, TOPIC_TEMPERATURE,
    };
    use pretty_assertions::assert_eq;

    use super::*;

    const INTERVAL_MS: u64 = 900_000;

    fn at(epoch: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(epoch, 0).single().unwrap()
    }

    fn health_of(response: &StatusResponse, channel: PublishChannel) -> ChannelHealth {
        response
            .channels
            .iter()
            .find(|entry| entry.channel == channel.as_str())
            .map(|entry| entry.health)
            .unwrap()
    }

    #[test]
    fn readings_are_recorded_per_channel() {
        let mut view = NodeView::new(INTERVAL_MS);
        view.ingest(TOPIC_TEMPERATURE, b"21.40", false, 0, at(1_700_000_000))
            .unwrap();
        view.ingest(TOPIC_BUTTON_LEFT_COUNT, b"3", false, 10, at(1_700_000_000))
            .unwrap();

        let status = view.status(10);
        let temperature = status
            .channels
            .iter()
            .find(|entry| entry.channel == "temperature")
            .unwrap();
        assert_eq!(temperature.value, Some(21.4));
        assert_eq!(temperature.age_ms, Some(10));
        assert_eq!(
            health_of(&status, PublishChannel::ClickCount(ButtonSide::Left)),
            ChannelHealth::Unmonitored
        );
        assert_eq!(status.last_seen_epoch, Some(1_700_000_000));
    }

    #[test]
    fn node_goes_offline_when_heartbeats_stop() {
        let mut view = NodeView::new(INTERVAL_MS);
        view.ingest(TOPIC_TEMPERATURE, b"21.00", false, 0, at(0)).unwrap();
        view.ingest(TOPIC_SET_POINT, b"21.00", false, 0, at(0)).unwrap();

        assert!(view.status(INTERVAL_MS).node_online);

        let late = INTERVAL_MS + LIVENESS_GRACE_MS + 1;
        let status = view.status(late);
        assert!(!status.node_online);
        assert_eq!(
            health_of(&status, PublishChannel::SetPoint),
            ChannelHealth::Stale
        );
    }

    #[test]
    fn pairing_and_status_are_kept() {
        let mut view = NodeView::new(INTERVAL_MS);
        view.ingest(
            TOPIC_PAIRING,
            br#"{"name":"kit-lcd-thermostat","firmwareVersion":"v2.0.1"}"#,
            false,
            0,
            at(5),
        )
        .unwrap();
        view.ingest(TOPIC_NODE_STATUS, b"online", false, 0, at(5)).unwrap();

        let status = view.status(0);
        assert_eq!(
            status.pairing,
            Some(PairingPayload {
                name: "kit-lcd-thermostat".to_string(),
                firmware_version: "v2.0.1".to_string(),
            })
        );
        assert_eq!(status.node_status.as_deref(), Some("online"));
        assert!(!status.node_online);
    }

    #[test]
    fn retained_replay_does_not_count_as_heartbeat() {
        let mut view = NodeView::new(INTERVAL_MS);
        view.ingest(TOPIC_TEMPERATURE, b"21.00", true, 0, at(0)).unwrap();
        view.ingest(TOPIC_SET_POINT, b"21.00", true, 0, at(0)).unwrap();

        let status = view.status(0);
        assert!(!status.node_online);
        assert_eq!(
            health_of(&status, PublishChannel::Temperature),
            ChannelHealth::Waiting
        );
        assert_eq!(status.last_seen_epoch, None);

        view.ingest(TOPIC_TEMPERATURE, b"21.10", false, 1_000, at(1))
            .unwrap();
        view.ingest(TOPIC_SET_POINT, b"21.00", false, 1_000, at(1))
            .unwrap();
        assert!(view.status(1_000).node_online);
    }

    #[test]
    fn malformed_payloads_are_rejected_without_recording() {
        let mut view = NodeView::new(INTERVAL_MS);
        assert!(view.ingest(TOPIC_TEMPERATURE, b"warm", false, 0, at(0)).is_err());
        assert!(view.ingest(TOPIC_TEMPERATURE, b"NaN", false, 0, at(0)).is_err());
        assert!(view.ingest(TOPIC_PAIRING, b"{", false, 0, at(0)).is_err());

        let status = view.status(0);
        assert_eq!(
            health_of(&status, PublishChannel::Temperature),
            ChannelHealth::Waiting
        );
        assert_eq!(status.last_seen_epoch, None);
    }
}
