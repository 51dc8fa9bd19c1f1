//! Listener-side view of a node's channels.
//!
//! Only channels with a heartbeat (temperature and setpoint) can be judged
//! stale; event counts and battery voltage arrive on their own schedule.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::PublishChannel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelHealth {
    Waiting,
    Live,
    Stale,
    Unmonitored,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Sample {
    value: f32,
    received_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelStatus {
    pub channel: &'static str,
    pub topic: &'static str,
    pub value: Option<f32>,
    #[serde(rename = "ageMs")]
    pub age_ms: Option<u64>,
    pub health: ChannelHealth,
}

#[derive(Debug, Clone)]
pub struct LivenessTracker {
    heartbeat_interval_ms: u64,
    grace_ms: u64,
    samples: HashMap<PublishChannel, Sample>,
}

impl LivenessTracker {
    pub fn new(heartbeat_interval_ms: u64, grace_ms: u64) -> Self {
        Self {
            heartbeat_interval_ms,
            grace_ms,
            samples: HashMap::new(),
        }
    }

    pub fn record(&mut self, channel: PublishChannel, value: f32, now_ms: u64) {
        self.samples.insert(
            channel,
            Sample {
                value,
                received_ms: now_ms,
            },
        );
    }

    pub fn has_heartbeat(channel: PublishChannel) -> bool {
        matches!(
            channel,
            PublishChannel::Temperature | PublishChannel::SetPoint
        )
    }

    pub fn health(&self, channel: PublishChannel, now_ms: u64) -> ChannelHealth {
        if !Self::has_heartbeat(channel) {
            return ChannelHealth::Unmonitored;
        }

        match self.samples.get(&channel) {
            None => ChannelHealth::Waiting,
            Some(sample) => {
                let limit = self.heartbeat_interval_ms.saturating_add(self.grace_ms);
                if now_ms.saturating_sub(sample.received_ms) > limit {
                    ChannelHealth::Stale
                } else {
                    ChannelHealth::Live
                }
            }
        }
    }

    /// True while every heartbeat channel has been heard from recently.
    pub fn node_online(&self, now_ms: u64) -> bool {
        PublishChannel::ALL
            .into_iter()
            .filter(|channel| Self::has_heartbeat(*channel))
            .all(|channel| self.health(channel, now_ms) == ChannelHealth::Live)
    }

    pub fn status(&self, now_ms: u64) -> Vec<ChannelStatus> {
        PublishChannel::ALL
            .into_iter()
            .map(|channel| {
                let sample = self.samples.get(&channel);
                ChannelStatus {
                    channel: channel.as_str(),
                    topic: channel.topic(),
                    value: sample.map(|sample| sample.value),
                    age_ms: sample.map(|sample| now_ms.saturating_sub(sample.received_ms)),
                    health: self.health(channel, now_ms),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ButtonSide;

    const INTERVAL_MS: u64 = 900_000;
    const GRACE_MS: u64 = 60_000;

    #[test]
    fn heartbeat_channels_go_stale_after_interval_and_grace() {
        let mut tracker = LivenessTracker::new(INTERVAL_MS, GRACE_MS);
        assert_eq!(
            tracker.health(PublishChannel::Temperature, 0),
            ChannelHealth::Waiting
        );

        tracker.record(PublishChannel::Temperature, 21.3, 1_000);
        tracker.record(PublishChannel::SetPoint, 21.0, 1_000);
        assert!(tracker.node_online(1_000 + INTERVAL_MS + GRACE_MS));
        assert_eq!(
            tracker.health(PublishChannel::Temperature, 1_001 + INTERVAL_MS + GRACE_MS),
            ChannelHealth::Stale
        );
        assert!(!tracker.node_online(1_001 + INTERVAL_MS + GRACE_MS));
    }

    #[test]
    fn event_channels_are_unmonitored() {
        let mut tracker = LivenessTracker::new(INTERVAL_MS, GRACE_MS);
        tracker.record(PublishChannel::ClickCount(ButtonSide::Left), 3.0, 0);

        assert_eq!(
            tracker.health(PublishChannel::ClickCount(ButtonSide::Left), u64::MAX),
            ChannelHealth::Unmonitored
        );

        let status = tracker.status(10);
        let left = status
            .iter()
            .find(|entry| entry.channel == "leftClicks")
            .unwrap();
        assert_eq!(left.value, Some(3.0));
        assert_eq!(left.age_ms, Some(10));
    }
}
