use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use rumqttc::{AsyncClient, QoS};
use tracing::{debug, info, warn};

use lcd_thermostat_common::{
    display::Font,
    Display, Indicator, Led, MemoryEeprom, NonVolatileStorage, PairingPayload, PublishChannel,
    PublishValue, Radio, Rotation, StorageError, TOPIC_PAIRING,
};

pub struct MqttRadio {
    client: AsyncClient,
}

impl MqttRadio {
    pub fn new(client: AsyncClient) -> Self {
        Self { client }
    }
}

impl Radio for MqttRadio {
    fn publish(&mut self, channel: PublishChannel, value: PublishValue) {
        if let Err(err) =
            self.client
                .try_publish(channel.topic(), QoS::AtLeastOnce, true, value.payload())
        {
            warn!("failed to publish {}: {err}", channel.as_str());
        }
    }

    fn pairing_request(&mut self, name: &str, firmware_version: &str) {
        let payload = PairingPayload {
            name: name.to_string(),
            firmware_version: firmware_version.to_string(),
        };

        match serde_json::to_vec(&payload) {
            Ok(body) => {
                if let Err(err) = self
                    .client
                    .try_publish(TOPIC_PAIRING, QoS::AtLeastOnce, false, body)
                {
                    warn!("failed to publish pairing request: {err}");
                }
            }
            Err(err) => warn!("pairing payload serialization failed: {err}"),
        }
    }
}

/// EEPROM image mirrored to a file; every write is flushed through.
pub struct FileEeprom {
    path: PathBuf,
    image: MemoryEeprom,
}

impl FileEeprom {
    pub fn open(path: PathBuf, capacity: usize) -> Result<Self, StorageError> {
        let image = match std::fs::read(&path) {
            Ok(raw) => MemoryEeprom::from_image(raw, capacity),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!("no eeprom image at {}; starting erased", path.display());
                MemoryEeprom::erased(capacity)
            }
            Err(err) => return Err(StorageError::Io(err.to_string())),
        };

        Ok(Self { path, image })
    }

    /// Writes the whole image back. Runs the file I/O through
    /// `block_in_place` so the event-loop worker is handed off while it waits.
    fn flush(&self) -> Result<(), StorageError> {
        tokio::task::block_in_place(|| {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&self.path, self.image.as_bytes())
        })
        .map_err(|err| StorageError::Io(err.to_string()))
    }
}

impl NonVolatileStorage for FileEeprom {
    fn read(&mut self, address: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        self.image.read(address, buf)
    }

    fn write(&mut self, address: usize, data: &[u8]) -> Result<(), StorageError> {
        self.image.write(address, data)?;
        self.flush()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Glyphs {
    x: i32,
    y: i32,
    text: String,
}

/// Text-only stand-in for the LCD. Each commit is logged as one line and
/// keeps the panel busy for `refresh`, like a slow memory-LCD update.
pub struct TraceDisplay {
    rotation: Rotation,
    pending: Vec<Glyphs>,
    last_frame: String,
    refresh: Duration,
    busy_until: Option<Instant>,
}

impl TraceDisplay {
    pub fn new(refresh: Duration) -> Self {
        Self {
            rotation: Rotation::default(),
            pending: Vec::new(),
            last_frame: String::new(),
            refresh,
            busy_until: None,
        }
    }

    #[cfg(test)]
    pub fn last_frame(&self) -> &str {
        &self.last_frame
    }
}

impl Display for TraceDisplay {
    fn is_ready(&self) -> bool {
        self.busy_until
            .map_or(true, |until| Instant::now() >= until)
    }

    fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    fn clear(&mut self) {
        self.pending.clear();
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, font: Font) -> i32 {
        let advance = i32::from(font.pixel_height()) / 2;
        let width = advance.saturating_mul(text.chars().count() as i32);
        self.pending.push(Glyphs {
            x,
            y,
            text: text.to_string(),
        });
        x.saturating_add(width)
    }

    fn commit(&mut self) {
        self.pending.sort_by_key(|glyphs| (glyphs.y, glyphs.x));
        let frame = self
            .pending
            .iter()
            .map(|glyphs| glyphs.text.as_str())
            .collect::<Vec<_>>()
            .join(" | ");

        if frame == self.last_frame {
            debug!("lcd [{}\u{b0}] refreshed", self.rotation.degrees());
        } else {
            info!("lcd [{}\u{b0}] {frame}", self.rotation.degrees());
            self.last_frame = frame;
        }
        self.busy_until = Some(Instant::now() + self.refresh);
    }
}

pub struct TraceLeds;

impl Indicator for TraceLeds {
    fn pulse(&mut self, led: Led, duration_ms: u64) {
        let name = match led {
            Led::Core => "core",
            Led::LcdRed => "lcd-red",
            Led::LcdBlue => "lcd-blue",
        };
        info!("led {name} pulse {duration_ms} ms");
    }
}
