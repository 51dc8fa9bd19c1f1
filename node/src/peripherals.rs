//! Simulated temperature tag, accelerometer and battery gauge.
//!
//! Hardware integration point: each simulator stands in for one I2C driver
//! and produces the same event it would on the device.

use std::time::Duration;

use tokio::sync::mpsc::Sender;
use tracing::debug;

use lcd_thermostat_common::{AccelSample, Event, ThermostatConfig};

/// Every this many samples the tag fails to answer.
const TEMPERATURE_DROPOUT_EVERY: u64 = 300;
const ACCEL_SAMPLES_PER_POSE: u64 = 200;
const BATTERY_UNAVAILABLE_EVERY: u64 = 5;

#[derive(Debug, Default)]
pub struct TemperatureTag {
    samples: u64,
}

impl TemperatureTag {
    pub fn sample(&mut self) -> Option<f32> {
        self.samples = self.samples.saturating_add(1);
        if self.samples % TEMPERATURE_DROPOUT_EVERY == 0 {
            return None;
        }

        // Slow triangle wave between 21.0 and 22.0.
        let step = (self.samples / 20) % 20;
        let offset = if step < 10 { step } else { 20 - step };
        Some(21.0 + offset as f32 * 0.1)
    }
}

#[derive(Debug, Default)]
pub struct Accelerometer {
    samples: u64,
}

impl Accelerometer {
    const POSES: [AccelSample; 5] = [
        AccelSample {
            x: 0.02,
            y: 0.55,
            z: 0.80,
        },
        AccelSample {
            x: 0.60,
            y: -0.05,
            z: 0.75,
        },
        AccelSample {
            x: -0.03,
            y: -0.58,
            z: 0.78,
        },
        AccelSample {
            x: -0.62,
            y: 0.04,
            z: 0.74,
        },
        // Lying flat on a desk; orientation is ambiguous.
        AccelSample {
            x: 0.01,
            y: 0.02,
            z: 0.99,
        },
    ];

    pub fn sample(&mut self) -> AccelSample {
        let pose = (self.samples / ACCEL_SAMPLES_PER_POSE) as usize % Self::POSES.len();
        self.samples = self.samples.saturating_add(1);
        Self::POSES[pose]
    }
}

#[derive(Debug, Default)]
pub struct BatteryGauge {
    samples: u64,
}

impl BatteryGauge {
    pub fn voltage(&mut self) -> Option<f32> {
        self.samples = self.samples.saturating_add(1);
        if self.samples % BATTERY_UNAVAILABLE_EVERY == 0 {
            return None;
        }
        Some((3.0 - self.samples as f32 * 0.002).max(2.2))
    }
}

pub fn spawn_peripherals(config: &ThermostatConfig, events: Sender<Event>) {
    spawn_periodic(
        "temperature",
        Duration::from_millis(config.temperature_update_interval_ms),
        events.clone(),
        {
            let mut tag = TemperatureTag::default();
            move || Event::TemperatureUpdate(tag.sample())
        },
    );

    spawn_periodic(
        "accelerometer",
        Duration::from_millis(config.accelerometer_update_interval_ms),
        events.clone(),
        {
            let mut accelerometer = Accelerometer::default();
            move || Event::AccelUpdate(accelerometer.sample())
        },
    );

    spawn_periodic(
        "battery",
        Duration::from_millis(config.battery_update_interval_ms),
        events,
        {
            let mut gauge = BatteryGauge::default();
            move || Event::BatteryUpdate(gauge.voltage())
        },
    );
}

fn spawn_periodic<F>(name: &'static str, period: Duration, events: Sender<Event>, mut next: F)
where
    F: FnMut() -> Event + Send + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            if events.send(next()).await.is_err() {
                debug!("{name} simulator stopped; event loop closed");
                break;
            }
        }
    });
}
