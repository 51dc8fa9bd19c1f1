use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThermostatConfig {
    pub heartbeat_interval_ms: u64,
    pub publish_threshold_c: f32,
    pub setpoint_step_c: f32,
    pub default_setpoint_c: f32,
    pub orientation_z_max_g: f32,
    pub temperature_update_interval_ms: u64,
    pub accelerometer_update_interval_ms: u64,
    pub battery_update_interval_ms: u64,
    pub button_led_pulse_ms: u64,
    pub boot_led_pulse_ms: u64,
}

impl Default for ThermostatConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_ms: 900_000,
            publish_threshold_c: 0.2,
            setpoint_step_c: 0.5,
            default_setpoint_c: 21.0,
            orientation_z_max_g: 0.90,
            temperature_update_interval_ms: 1_000,
            accelerometer_update_interval_ms: 100,
            battery_update_interval_ms: 3_600_000,
            button_led_pulse_ms: 30,
            boot_led_pulse_ms: 2_000,
        }
    }
}

impl ThermostatConfig {
    pub fn sanitize(&mut self) {
        let defaults = Self::default();

        if self.heartbeat_interval_ms == 0 {
            self.heartbeat_interval_ms = defaults.heartbeat_interval_ms;
        }
        if !self.publish_threshold_c.is_finite() || self.publish_threshold_c < 0.0 {
            self.publish_threshold_c = defaults.publish_threshold_c;
        }
        if !self.setpoint_step_c.is_finite() || self.setpoint_step_c <= 0.0 {
            self.setpoint_step_c = defaults.setpoint_step_c;
        }
        if !self.default_setpoint_c.is_finite() {
            self.default_setpoint_c = defaults.default_setpoint_c;
        }
        if !(0.0..=1.0).contains(&self.orientation_z_max_g) {
            self.orientation_z_max_g = defaults.orientation_z_max_g;
        }

        self.temperature_update_interval_ms = self.temperature_update_interval_ms.max(100);
        self.accelerometer_update_interval_ms = self.accelerometer_update_interval_ms.max(10);
        self.battery_update_interval_ms = self.battery_update_interval_ms.max(1_000);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub mqtt_host: String,
    pub mqtt_port: u16,
    pub mqtt_user: String,
    pub mqtt_pass: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            mqtt_host: "127.0.0.1".to_string(),
            mqtt_port: 1883,
            mqtt_user: String::new(),
            mqtt_pass: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceConfig {
    pub name: String,
    #[serde(rename = "firmwareVersion")]
    pub firmware_version: String,
    /// Size of the emulated EEPROM image in bytes.
    #[serde(rename = "eepromSize")]
    pub eeprom_size: usize,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: "kit-lcd-thermostat".to_string(),
            firmware_version: option_env!("LCD_THERMOSTAT_VERSION")
                .unwrap_or("vdev")
                .to_string(),
            eeprom_size: 64,
        }
    }
}

impl DeviceConfig {
    pub fn sanitize(&mut self) {
        if self.name.trim().is_empty() {
            self.name = Self::default().name;
        }
        // The setpoint record occupies the first 8 bytes.
        self.eeprom_size = self.eeprom_size.max(crate::setpoint::RECORD_LEN);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub thermostat: ThermostatConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub device: DeviceConfig,
}

impl RuntimeConfig {
    pub fn sanitize(&mut self) {
        self.thermostat.sanitize();
        self.device.sanitize();
    }
}
