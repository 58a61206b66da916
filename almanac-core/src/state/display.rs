use heapless::String;

use super::{
    Conditions, DisplayCommand, Field, FieldSet, BATTERY_LEN, DATE_LEN, RATE_LEN, TEMPERATURE_LEN,
    TIME_LEN,
};
use crate::codec::WeatherUpdate;
use crate::format::{self, RateStyle, PLACEHOLDER};

/// Current values of every on-screen field
///
/// Weather and rate start empty and show a placeholder until the first
/// reply. Fields are only ever replaced, never cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayState {
    time: String<TIME_LEN>,
    date: String<DATE_LEN>,
    battery_percent: u8,
    temperature_celsius: Option<i32>,
    conditions: Conditions,
    rate_cents: Option<i32>,
    rate_style: RateStyle,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new(RateStyle::default())
    }
}

impl DisplayState {
    pub fn new(rate_style: RateStyle) -> Self {
        Self {
            time: format::clip("00:00"),
            date: String::new(),
            battery_percent: 0,
            temperature_celsius: None,
            conditions: Conditions::Unknown,
            rate_cents: None,
            rate_style,
        }
    }

    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn battery_percent(&self) -> u8 {
        self.battery_percent
    }

    pub fn temperature_celsius(&self) -> Option<i32> {
        self.temperature_celsius
    }

    pub fn conditions(&self) -> Conditions {
        self.conditions
    }

    pub fn rate_cents(&self) -> Option<i32> {
        self.rate_cents
    }

    pub fn rate_style(&self) -> RateStyle {
        self.rate_style
    }

    /// Replace the time and date text
    ///
    /// Both fields are always reported; the renderer drops repeats.
    pub fn set_clock(&mut self, time: &str, date: &str) -> FieldSet {
        self.time = format::clip(time);
        self.date = format::clip(date);
        FieldSet::only(Field::Time) | FieldSet::only(Field::Date)
    }

    /// Replace the battery level, clamped to 100
    pub fn set_battery(&mut self, percent: u8) -> FieldSet {
        let percent = percent.min(100);
        if self.battery_percent == percent {
            return FieldSet::empty();
        }
        self.battery_percent = percent;
        FieldSet::only(Field::Battery)
    }

    /// Merge a decoded companion reply
    ///
    /// Temperature and conditions arrive together; the codec drops either
    /// if the other is missing. An unrecognised conditions tag still
    /// updates the temperature but leaves the previous icon in place.
    pub fn apply_update(&mut self, update: &WeatherUpdate) -> FieldSet {
        let mut touched = FieldSet::empty();

        if let (Some(celsius), Some(tag)) = (update.temperature_celsius, update.conditions.as_deref()) {
            self.temperature_celsius = Some(celsius);
            touched.insert(Field::Temperature);

            let conditions = Conditions::from_tag(tag);
            if conditions.is_known() {
                self.conditions = conditions;
                touched.insert(Field::Conditions);
            }
        }

        if let Some(cents) = update.rate_cents {
            self.rate_cents = Some(cents);
            touched.insert(Field::Rate);
        }

        touched
    }

    pub fn battery_text(&self) -> String<BATTERY_LEN> {
        format::format_battery(self.battery_percent)
    }

    pub fn temperature_text(&self) -> String<TEMPERATURE_LEN> {
        match self.temperature_celsius {
            Some(celsius) => format::format_temperature(celsius),
            None => format::clip(PLACEHOLDER),
        }
    }

    pub fn rate_text(&self) -> String<RATE_LEN> {
        match self.rate_cents {
            Some(cents) => format::format_rate(cents, self.rate_style),
            None => format::clip(PLACEHOLDER),
        }
    }

    /// Render commands for `fields`, in render order
    ///
    /// The conditions field yields no command while the category is
    /// unknown, so the icon layer keeps whatever it last showed.
    pub fn commands(&self, fields: FieldSet) -> impl Iterator<Item = DisplayCommand> + '_ {
        fields.iter().filter_map(move |field| self.command_for(field))
    }

    fn command_for(&self, field: Field) -> Option<DisplayCommand> {
        let command = match field {
            Field::Time => DisplayCommand::SetTime(self.time.clone()),
            Field::Date => DisplayCommand::SetDate(self.date.clone()),
            Field::Battery => DisplayCommand::SetBattery(self.battery_text()),
            Field::Temperature => DisplayCommand::SetTemperature(self.temperature_text()),
            Field::Conditions if self.conditions.is_known() => {
                DisplayCommand::SetConditionIcon(self.conditions)
            }
            Field::Conditions => return None,
            Field::Rate => DisplayCommand::SetRate(self.rate_text()),
        };
        Some(command)
    }
}
