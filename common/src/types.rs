use serde::{Deserialize, Serialize};

use crate::topics::{
    TOPIC_BATTERY_VOLTAGE, TOPIC_BUTTON_LEFT_COUNT, TOPIC_BUTTON_RIGHT_COUNT, TOPIC_SET_POINT,
    TOPIC_TEMPERATURE,
};

/// Display rotation, clockwise from the module's natural orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    #[serde(rename = "0")]
    Deg0,
    #[serde(rename = "90")]
    Deg90,
    #[serde(rename = "180")]
    Deg180,
    #[serde(rename = "270")]
    Deg270,
}

impl Rotation {
    pub fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonSide {
    Left,
    Right,
}

impl ButtonSide {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }

    /// LCD-module LED pulsed when this button is clicked.
    pub fn indicator(self) -> Led {
        match self {
            Self::Left => Led::LcdBlue,
            Self::Right => Led::LcdRed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Led {
    Core,
    LcdRed,
    LcdBlue,
}

/// One accelerometer sample in g.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl AccelSample {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublishChannel {
    Temperature,
    SetPoint,
    ClickCount(ButtonSide),
    BatteryVoltage,
}

impl PublishChannel {
    pub const ALL: [Self; 5] = [
        Self::Temperature,
        Self::SetPoint,
        Self::ClickCount(ButtonSide::Left),
        Self::ClickCount(ButtonSide::Right),
        Self::BatteryVoltage,
    ];

    pub fn topic(self) -> &'static str {
        match self {
            Self::Temperature => TOPIC_TEMPERATURE,
            Self::SetPoint => TOPIC_SET_POINT,
            Self::ClickCount(ButtonSide::Left) => TOPIC_BUTTON_LEFT_COUNT,
            Self::ClickCount(ButtonSide::Right) => TOPIC_BUTTON_RIGHT_COUNT,
            Self::BatteryVoltage => TOPIC_BATTERY_VOLTAGE,
        }
    }

    pub fn from_topic(topic: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|channel| channel.topic() == topic)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::SetPoint => "setPoint",
            Self::ClickCount(ButtonSide::Left) => "leftClicks",
            Self::ClickCount(ButtonSide::Right) => "rightClicks",
            Self::BatteryVoltage => "batteryVoltage",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PublishValue {
    Celsius(f32),
    Count(u16),
    Volts(f32),
}

impl PublishValue {
    pub fn payload(self) -> String {
        match self {
            Self::Celsius(value) | Self::Volts(value) => format!("{value:.2}"),
            Self::Count(count) => count.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PairingPayload {
    pub name: String,
    #[serde(rename = "firmwareVersion")]
    pub firmware_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_topics_round_trip() {
        for channel in PublishChannel::ALL {
            assert_eq!(PublishChannel::from_topic(channel.topic()), Some(channel));
        }
        assert_eq!(PublishChannel::from_topic("lcd-thermostat/unknown"), None);
    }

    #[test]
    fn channels_key_hash_maps() {
        let counts: std::collections::HashMap<PublishChannel, usize> = PublishChannel::ALL
            .into_iter()
            .enumerate()
            .map(|(index, channel)| (channel, index))
            .collect();

        assert_eq!(counts.len(), PublishChannel::ALL.len());
        assert_eq!(
            counts.get(&PublishChannel::ClickCount(ButtonSide::Right)),
            Some(&3)
        );
    }

    #[test]
    fn payloads_are_plain_decimals() {
        assert_eq!(PublishValue::Celsius(21.5).payload(), "21.50");
        assert_eq!(PublishValue::Count(7).payload(), "7");
        assert_eq!(PublishValue::Volts(2.987).payload(), "2.99");
    }

    #[test]
    fn button_side_parsing_ignores_case() {
        assert_eq!(ButtonSide::parse(" LEFT "), Some(ButtonSide::Left));
        assert_eq!(ButtonSide::parse("right"), Some(ButtonSide::Right));
        assert_eq!(ButtonSide::parse("middle"), None);
    }
}
