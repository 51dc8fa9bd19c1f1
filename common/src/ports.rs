//! Collaborator seams between the policy core and the device.
//!
//! The engine never calls these directly; [`NodeRuntime`](crate::runtime::NodeRuntime)
//! turns [`EngineAction`](crate::thermostat::EngineAction)s into calls on
//! whichever implementations the target provides.

use thiserror::Error;

use crate::{
    display::Font,
    scheduler::TaskId,
    types::{Led, PublishChannel, PublishValue, Rotation},
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("access at {address}..{end} is outside the {capacity} byte storage")]
    OutOfBounds {
        address: usize,
        end: usize,
        capacity: usize,
    },
    #[error("storage i/o failed: {0}")]
    Io(String),
}

/// Fire-and-forget radio uplink.
pub trait Radio {
    fn publish(&mut self, channel: PublishChannel, value: PublishValue);

    fn pairing_request(&mut self, name: &str, firmware_version: &str);
}

/// Byte-addressed non-volatile memory with fixed offsets.
pub trait NonVolatileStorage {
    fn read(&mut self, address: usize, buf: &mut [u8]) -> Result<(), StorageError>;

    fn write(&mut self, address: usize, data: &[u8]) -> Result<(), StorageError>;
}

/// Monochrome framebuffer display. All calls are non-blocking; a busy
/// panel reports itself through [`Display::is_ready`].
pub trait Display {
    fn is_ready(&self) -> bool;

    fn set_rotation(&mut self, rotation: Rotation);

    fn clear(&mut self);

    /// Draws `text` with its top-left corner at (`x`, `y`) and returns the x
    /// coordinate just past the last glyph.
    fn draw_text(&mut self, x: i32, y: i32, text: &str, font: Font) -> i32;

    fn commit(&mut self);
}

pub trait Indicator {
    fn pulse(&mut self, led: Led, duration_ms: u64);
}

/// "Run this task at the next opportunity". Repeated requests before the
/// task runs must collapse into one run.
pub trait TaskScheduler {
    fn request_run(&mut self, task: TaskId);
}
