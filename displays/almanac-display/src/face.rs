//! Watchface layout on a character screen

use almanac_core::state::{
    Conditions, BATTERY_LEN, DATE_LEN, RATE_LEN, TEMPERATURE_LEN, TIME_LEN,
};
use almanac_core::traits::Renderer;
use heapless::String;

use crate::screen::{Screen, SCREEN_COLS};

// Layer positions (row, col)
const DATE_POS: (usize, usize) = (0, 0);
const BATTERY_POS: (usize, usize) = (0, 16);
const TIME_POS: (usize, usize) = (2, 8);
const ICON_POS: (usize, usize) = (4, 1);
const TEMPERATURE_POS: (usize, usize) = (4, 11);
const RATE_POS: (usize, usize) = (6, 0);

/// Short text stand-in for a weather icon
pub fn icon_label(conditions: Conditions) -> &'static str {
    match conditions {
        Conditions::Clear => "SUN",
        Conditions::Clouds => "CLOUD",
        Conditions::Rain => "RAIN",
        Conditions::Mist => "MIST",
        Conditions::Unknown => "",
    }
}

/// Watchface layers rendered onto a [`Screen`]
///
/// Each layer keeps its own text; rows are recomposed from the layers
/// whenever one of them changes.
#[derive(Clone, Default)]
pub struct FaceScreen {
    screen: Screen,
    time: String<TIME_LEN>,
    date: String<DATE_LEN>,
    battery: String<BATTERY_LEN>,
    temperature: String<TEMPERATURE_LEN>,
    rate: String<RATE_LEN>,
    icon: Conditions,
}

impl FaceScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    pub fn icon(&self) -> Conditions {
        self.icon
    }

    fn compose(&mut self, row: usize) {
        let mut cells = [b' '; SCREEN_COLS];
        let layers: [((usize, usize), &str); 6] = [
            (DATE_POS, self.date.as_str()),
            (BATTERY_POS, self.battery.as_str()),
            (TIME_POS, self.time.as_str()),
            (ICON_POS, icon_label(self.icon)),
            (TEMPERATURE_POS, self.temperature.as_str()),
            (RATE_POS, self.rate.as_str()),
        ];
        for ((r, col), text) in layers {
            if r != row {
                continue;
            }
            for (cell, ch) in cells[col..].iter_mut().zip(text.chars()) {
                *cell = if ch.is_ascii() { ch as u8 } else { b'?' };
            }
        }

        let len = cells.iter().rposition(|c| *c != b' ').map_or(0, |i| i + 1);
        // Cells only ever hold ASCII
        let line = core::str::from_utf8(&cells[..len]).unwrap_or("");
        self.screen.set_line(row, line);
    }
}

fn replace<const N: usize>(slot: &mut String<N>, text: &str) -> bool {
    if slot.as_str() == text {
        return false;
    }
    slot.clear();
    for ch in text.chars() {
        if slot.push(ch).is_err() {
            break;
        }
    }
    true
}

impl Renderer for FaceScreen {
    fn set_time(&mut self, text: &str) {
        if replace(&mut self.time, text) {
            self.compose(TIME_POS.0);
        }
    }

    fn set_date(&mut self, text: &str) {
        if replace(&mut self.date, text) {
            self.compose(DATE_POS.0);
        }
    }

    fn set_battery(&mut self, text: &str) {
        if replace(&mut self.battery, text) {
            self.compose(BATTERY_POS.0);
        }
    }

    fn set_temperature(&mut self, text: &str) {
        if replace(&mut self.temperature, text) {
            self.compose(TEMPERATURE_POS.0);
        }
    }

    fn set_rate(&mut self, text: &str) {
        if replace(&mut self.rate, text) {
            self.compose(RATE_POS.0);
        }
    }

    fn set_condition_icon(&mut self, conditions: Conditions) {
        if self.icon != conditions {
            self.icon = conditions;
            self.compose(ICON_POS.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let mut face = FaceScreen::new();
        face.set_date("Wed 06 Mar");
        face.set_battery("87%");
        face.set_time("10:30");
        face.set_condition_icon(Conditions::Rain);
        face.set_temperature("+21C");
        face.set_rate("$=123.45");

        let screen = face.screen();
        assert_eq!(screen.line(0), Some("Wed 06 Mar      87%"));
        assert_eq!(screen.line(2), Some("        10:30"));
        assert_eq!(screen.line(4), Some(" RAIN      +21C"));
        assert_eq!(screen.line(6), Some("$=123.45"));
        assert_eq!(screen.line(1), Some(""));
    }

    #[test]
    fn test_same_value_keeps_screen_clean() {
        let mut face = FaceScreen::new();
        face.set_time("10:30");
        face.screen_mut().mark_clean();

        face.set_time("10:30");
        face.set_condition_icon(Conditions::Unknown);
        assert!(!face.screen().is_dirty());

        face.set_time("10:31");
        assert!(face.screen().is_dirty());
    }

    #[test]
    fn test_long_rate_clipped_at_edge() {
        let mut face = FaceScreen::new();
        face.set_rate("$=-21474836.48 extra text");
        assert_eq!(face.screen().line(6), Some("$=-21474836.48 extra"));
    }

    #[test]
    fn test_icon_labels_fit_before_temperature() {
        for c in [
            Conditions::Clear,
            Conditions::Clouds,
            Conditions::Rain,
            Conditions::Mist,
        ] {
            assert!(ICON_POS.1 + icon_label(c).len() < TEMPERATURE_POS.1);
        }
    }
}
