pub const TOPIC_TEMPERATURE: &str = "lcd-thermostat/thermometer/temperature";
pub const TOPIC_SET_POINT: &str = "lcd-thermostat/thermostat/set-point";
pub const TOPIC_BUTTON_LEFT_COUNT: &str = "lcd-thermostat/push-button/lcd-left/event-count";
pub const TOPIC_BUTTON_RIGHT_COUNT: &str = "lcd-thermostat/push-button/lcd-right/event-count";
pub const TOPIC_BATTERY_VOLTAGE: &str = "lcd-thermostat/battery/voltage";
pub const TOPIC_PAIRING: &str = "lcd-thermostat/pairing";
pub const TOPIC_NODE_STATUS: &str = "lcd-thermostat/status";

pub const TOPIC_CMD_BUTTON: &str = "lcd-thermostat/cmnd/button";
