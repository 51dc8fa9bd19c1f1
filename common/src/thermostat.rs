use tracing::debug;

use crate::{
    config::ThermostatConfig,
    display::{self, Readout},
    orientation,
    ports::Display,
    publish::ChangePublisher,
    types::{AccelSample, ButtonSide, Led, PublishChannel, PublishValue, Rotation},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// `None` when the tag reported the reading as unreadable.
    TemperatureUpdate(Option<f32>),
    ButtonClick(ButtonSide),
    AccelUpdate(AccelSample),
    /// `None` when the gauge could not produce a voltage.
    BatteryUpdate(Option<f32>),
    RedrawTick,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineAction {
    Publish(PublishChannel, PublishValue),
    PairingRequest {
        name: String,
        firmware_version: String,
    },
    PersistSetpoint(f32),
    PulseLed(Led, u64),
    RequestRedraw,
    Render,
}

#[derive(Debug, Clone)]
pub struct ThermostatEngine {
    pub config: ThermostatConfig,

    setpoint_c: f32,
    setpoint_publisher: ChangePublisher,
    temperature: ChangePublisher,

    // None until the first successful render.
    displayed_temp_c: Option<f32>,
    displayed_setpoint_c: Option<f32>,
    active_rotation: Option<Rotation>,
    rotation: Rotation,

    click_counts: [u16; 2],
}

impl ThermostatEngine {
    pub fn new(config: ThermostatConfig, setpoint_c: f32) -> Self {
        let temperature =
            ChangePublisher::new(config.publish_threshold_c, config.heartbeat_interval_ms);
        // Setpoint changes always publish; only its deadline matters.
        let setpoint_publisher = ChangePublisher::new(f32::INFINITY, config.heartbeat_interval_ms);

        Self {
            config,
            setpoint_c,
            setpoint_publisher,
            temperature,
            displayed_temp_c: None,
            displayed_setpoint_c: None,
            active_rotation: None,
            rotation: Rotation::default(),
            click_counts: [0; 2],
        }
    }

    pub fn setpoint_c(&self) -> f32 {
        self.setpoint_c
    }

    /// Last transmitted temperature; NaN while the sensor is unreadable.
    pub fn sensed_temp_c(&self) -> f32 {
        self.temperature.last_published()
    }

    pub fn displayed_temp_c(&self) -> Option<f32> {
        self.displayed_temp_c
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn active_rotation(&self) -> Option<Rotation> {
        self.active_rotation
    }

    pub fn click_count(&self, side: ButtonSide) -> u16 {
        self.click_counts[side.index()]
    }

    pub fn setpoint_deadline_ms(&self) -> u64 {
        self.setpoint_publisher.next_deadline_ms()
    }

    pub fn readout(&self) -> Readout {
        Readout {
            temperature_c: self.sensed_temp_c(),
            setpoint_c: self.setpoint_c,
            rotation: self.rotation,
        }
    }

    /// Whether the panel shows a temperature or setpoint other than the
    /// current ones.
    pub fn is_display_stale(&self) -> bool {
        match (self.displayed_temp_c, self.displayed_setpoint_c) {
            (Some(temperature_c), Some(setpoint_c)) => {
                !display::same_reading(temperature_c, self.sensed_temp_c())
                    || setpoint_c != self.setpoint_c
            }
            _ => true,
        }
    }

    /// One-time actions issued when the device boots.
    pub fn startup_actions(&self, device_name: &str, firmware_version: &str) -> Vec<EngineAction> {
        vec![
            EngineAction::PairingRequest {
                name: device_name.to_string(),
                firmware_version: firmware_version.to_string(),
            },
            EngineAction::PulseLed(Led::Core, self.config.boot_led_pulse_ms),
            EngineAction::RequestRedraw,
        ]
    }

    pub fn handle(&mut self, event: Event, now_ms: u64) -> Vec<EngineAction> {
        let mut actions = Vec::new();

        match event {
            Event::TemperatureUpdate(reading) => {
                self.on_temperature(reading, now_ms, &mut actions);
            }
            Event::ButtonClick(side) => self.on_button_click(side, now_ms, &mut actions),
            Event::AccelUpdate(sample) => self.on_accel(sample, &mut actions),
            Event::BatteryUpdate(voltage) => self.on_battery(voltage, &mut actions),
            Event::RedrawTick => actions.push(EngineAction::Render),
        }

        self.service_setpoint_heartbeat(now_ms, &mut actions);
        actions
    }

    /// Redraw task body. Returns whether the panel was actually drawn.
    pub fn redraw<D: Display + ?Sized>(&mut self, display: &mut D) -> bool {
        let readout = self.readout();
        if !display::render(display, &readout) {
            debug!("display busy; redraw skipped");
            return false;
        }

        self.displayed_temp_c = Some(readout.temperature_c);
        self.displayed_setpoint_c = Some(readout.setpoint_c);
        self.active_rotation = Some(readout.rotation);
        true
    }

    fn on_temperature(&mut self, reading: Option<f32>, now_ms: u64, actions: &mut Vec<EngineAction>) {
        match reading.filter(|value| value.is_finite()) {
            Some(value) => {
                if let Some(published) = self.temperature.observe(value, now_ms) {
                    actions.push(EngineAction::Publish(
                        PublishChannel::Temperature,
                        PublishValue::Celsius(published),
                    ));
                }
            }
            None => self.temperature.mark_unknown(),
        }

        if self.is_display_stale() {
            actions.push(EngineAction::RequestRedraw);
        }
    }

    fn on_button_click(&mut self, side: ButtonSide, now_ms: u64, actions: &mut Vec<EngineAction>) {
        let step = self.config.setpoint_step_c;
        self.setpoint_c += match side {
            ButtonSide::Left => -step,
            ButtonSide::Right => step,
        };

        let count = &mut self.click_counts[side.index()];
        *count = count.wrapping_add(1);
        actions.push(EngineAction::Publish(
            PublishChannel::ClickCount(side),
            PublishValue::Count(*count),
        ));
        actions.push(EngineAction::PulseLed(
            side.indicator(),
            self.config.button_led_pulse_ms,
        ));

        self.publish_setpoint(now_ms, actions);
        actions.push(EngineAction::PersistSetpoint(self.setpoint_c));
        actions.push(EngineAction::RequestRedraw);
    }

    fn on_accel(&mut self, sample: AccelSample, actions: &mut Vec<EngineAction>) {
        let Some(rotation) = orientation::classify(sample, self.config.orientation_z_max_g) else {
            return;
        };

        self.rotation = rotation;
        if self.active_rotation != Some(rotation) {
            actions.push(EngineAction::RequestRedraw);
        }
    }

    fn on_battery(&mut self, voltage: Option<f32>, actions: &mut Vec<EngineAction>) {
        if let Some(voltage) = voltage.filter(|value| value.is_finite()) {
            actions.push(EngineAction::Publish(
                PublishChannel::BatteryVoltage,
                PublishValue::Volts(voltage),
            ));
        }
    }

    fn service_setpoint_heartbeat(&mut self, now_ms: u64, actions: &mut Vec<EngineAction>) {
        if self.setpoint_publisher.is_due(now_ms) {
            self.publish_setpoint(now_ms, actions);
        }
    }

    fn publish_setpoint(&mut self, now_ms: u64, actions: &mut Vec<EngineAction>) {
        self.setpoint_publisher.mark_published(self.setpoint_c, now_ms);
        actions.push(EngineAction::Publish(
            PublishChannel::SetPoint,
            PublishValue::Celsius(self.setpoint_c),
        ));
    }
}
