pub mod config;
pub mod display;
pub mod eeprom;
pub mod liveness;
pub mod orientation;
pub mod ports;
pub mod publish;
pub mod runtime;
pub mod scheduler;
pub mod setpoint;
pub mod thermostat;
pub mod topics;
pub mod types;

pub use config::{DeviceConfig, NetworkConfig, RuntimeConfig, ThermostatConfig};
pub use eeprom::MemoryEeprom;
pub use liveness::{ChannelHealth, ChannelStatus, LivenessTracker};
pub use ports::{Display, Indicator, NonVolatileStorage, Radio, StorageError, TaskScheduler};
pub use runtime::NodeRuntime;
pub use setpoint::{SetpointError, SetpointStore};
pub use thermostat::{EngineAction, Event, ThermostatEngine};
pub use topics::*;
pub use types::{
    AccelSample, ButtonSide, Led, PairingPayload, PublishChannel, PublishValue, Rotation,
};
