use tracing::{debug, info, warn};

use crate::{
    config::ThermostatConfig,
    ports::{Display, Indicator, NonVolatileStorage, Radio, TaskScheduler},
    scheduler::{PendingTasks, TaskId},
    setpoint::SetpointStore,
    thermostat::{EngineAction, Event, ThermostatEngine},
};

/// The device's application state plus the collaborators its actions are
/// carried out against. Owned by a single task; every call runs to
/// completion.
pub struct NodeRuntime<R, S, D, L> {
    engine: ThermostatEngine,
    store: SetpointStore<S>,
    radio: R,
    display: D,
    indicator: L,
    pending: PendingTasks,
    redraw_runs: u64,
}

impl<R, S, D, L> NodeRuntime<R, S, D, L>
where
    R: Radio,
    S: NonVolatileStorage,
    D: Display,
    L: Indicator,
{
    /// Restores the setpoint from storage (or the configured default) and
    /// builds the engine around it.
    pub fn new(config: ThermostatConfig, storage: S, radio: R, display: D, indicator: L) -> Self {
        let mut store = SetpointStore::new(storage, config.default_setpoint_c);
        let setpoint_c = store.load();
        info!("setpoint restored to {setpoint_c:.1}");

        Self {
            engine: ThermostatEngine::new(config, setpoint_c),
            store,
            radio,
            display,
            indicator,
            pending: PendingTasks::new(),
            redraw_runs: 0,
        }
    }

    pub fn engine(&self) -> &ThermostatEngine {
        &self.engine
    }

    pub fn radio(&self) -> &R {
        &self.radio
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn indicator(&self) -> &L {
        &self.indicator
    }

    pub fn storage(&self) -> &S {
        self.store.storage()
    }

    pub fn is_redraw_pending(&self) -> bool {
        self.pending.is_pending(TaskId::Redraw)
    }

    /// Number of times the redraw task has run, drawn or skipped.
    pub fn redraw_runs(&self) -> u64 {
        self.redraw_runs
    }

    pub fn start(&mut self, device_name: &str, firmware_version: &str) {
        let actions = self.engine.startup_actions(device_name, firmware_version);
        self.execute(actions);
    }

    pub fn dispatch(&mut self, event: Event, now_ms: u64) {
        let actions = self.engine.handle(event, now_ms);
        self.execute(actions);
    }

    /// Runs every task requested since the last call.
    pub fn run_pending(&mut self, now_ms: u64) {
        if self.pending.take(TaskId::Redraw) {
            self.redraw_runs = self.redraw_runs.saturating_add(1);
            self.dispatch(Event::RedrawTick, now_ms);
        }
    }

    fn execute(&mut self, actions: Vec<EngineAction>) {
        for action in actions {
            match action {
                EngineAction::Publish(channel, value) => {
                    debug!("publish {} = {}", channel.as_str(), value.payload());
                    self.radio.publish(channel, value);
                }
                EngineAction::PairingRequest {
                    name,
                    firmware_version,
                } => {
                    info!("pairing request as {name} {firmware_version}");
                    self.radio.pairing_request(&name, &firmware_version);
                }
                EngineAction::PersistSetpoint(value) => {
                    if let Err(err) = self.store.save(value) {
                        warn!("failed to persist setpoint {value:.1}: {err}");
                    }
                }
                EngineAction::PulseLed(led, duration_ms) => {
                    self.indicator.pulse(led, duration_ms);
                }
                EngineAction::RequestRedraw => self.pending.request_run(TaskId::Redraw),
                EngineAction::Render => {
                    self.engine.redraw(&mut self.display);
                }
            }
        }
    }
}
