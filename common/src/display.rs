//! Readout layout and the redraw task body.

use crate::{ports::Display, types::Rotation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// Ubuntu 33 px, sensed temperature.
    Large,
    /// Ubuntu 24 px, unit suffix.
    Medium,
    /// Ubuntu 15 px, setpoint label and value.
    Small,
}

impl Font {
    pub fn pixel_height(self) -> u8 {
        match self {
            Self::Large => 33,
            Self::Medium => 24,
            Self::Small => 15,
        }
    }
}

pub const UNIT_SUFFIX: &str = "\u{b0}C";
pub const SETPOINT_LABEL: &str = "Set temperature";

/// Everything the redraw task reads from application state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Readout {
    pub temperature_c: f32,
    pub setpoint_c: f32,
    pub rotation: Rotation,
}

/// Whether `displayed` still shows `sensed`. Two unknown readings match.
pub fn same_reading(displayed: f32, sensed: f32) -> bool {
    (displayed.is_nan() && sensed.is_nan()) || displayed == sensed
}

pub fn format_temperature(value: f32) -> String {
    if value.is_finite() {
        format!("{value:.1}")
    } else {
        "--.-".to_string()
    }
}

pub fn format_setpoint(value: f32) -> String {
    format!("{} {UNIT_SUFFIX}", format_temperature(value))
}

/// Draws the readout. Returns `false` without touching the panel when it is
/// not ready.
pub fn render<D: Display + ?Sized>(display: &mut D, readout: &Readout) -> bool {
    if !display.is_ready() {
        return false;
    }

    display.set_rotation(readout.rotation);
    display.clear();

    let temperature = format_temperature(readout.temperature_c);
    let x_end = display.draw_text(20, 20, &temperature, Font::Large);
    display.draw_text(x_end - 20, 25, UNIT_SUFFIX, Font::Medium);

    display.draw_text(10, 80, SETPOINT_LABEL, Font::Small);
    display.draw_text(40, 100, &format_setpoint(readout.setpoint_c), Font::Small);

    display.commit();
    true
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Rotation(Rotation),
        Clear,
        Text(i32, i32, String, Font),
        Commit,
    }

    struct Recorder {
        ready: bool,
        calls: Vec<Call>,
    }

    impl Display for Recorder {
        fn is_ready(&self) -> bool {
            self.ready
        }

        fn set_rotation(&mut self, rotation: Rotation) {
            self.calls.push(Call::Rotation(rotation));
        }

        fn clear(&mut self) {
            self.calls.push(Call::Clear);
        }

        fn draw_text(&mut self, x: i32, y: i32, text: &str, font: Font) -> i32 {
            self.calls.push(Call::Text(x, y, text.to_string(), font));
            x + 10 * text.chars().count() as i32
        }

        fn commit(&mut self) {
            self.calls.push(Call::Commit);
        }
    }

    #[test]
    fn renders_full_layout() {
        let mut display = Recorder {
            ready: true,
            calls: Vec::new(),
        };
        let readout = Readout {
            temperature_c: 22.46,
            setpoint_c: 21.0,
            rotation: Rotation::Deg90,
        };

        assert!(render(&mut display, &readout));
        assert_eq!(
            display.calls,
            vec![
                Call::Rotation(Rotation::Deg90),
                Call::Clear,
                Call::Text(20, 20, "22.5".to_string(), Font::Large),
                Call::Text(40, 25, "\u{b0}C".to_string(), Font::Medium),
                Call::Text(10, 80, "Set temperature".to_string(), Font::Small),
                Call::Text(40, 100, "21.0 \u{b0}C".to_string(), Font::Small),
                Call::Commit,
            ]
        );
    }

    #[test]
    fn busy_panel_is_left_alone() {
        let mut display = Recorder {
            ready: false,
            calls: Vec::new(),
        };
        let readout = Readout {
            temperature_c: 20.0,
            setpoint_c: 21.0,
            rotation: Rotation::Deg0,
        };

        assert!(!render(&mut display, &readout));
        assert!(display.calls.is_empty());
    }

    #[test]
    fn unknown_temperature_is_placeholder() {
        assert_eq!(format_temperature(f32::NAN), "--.-");
        assert!(same_reading(f32::NAN, f32::NAN));
        assert!(!same_reading(f32::NAN, 20.0));
        assert!(same_reading(20.0, 20.0));
    }
}
