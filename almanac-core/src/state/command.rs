use heapless::String;

use super::{Conditions, BATTERY_LEN, DATE_LEN, RATE_LEN, TEMPERATURE_LEN, TIME_LEN};
use crate::traits::Renderer;

/// One field update for the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayCommand {
    SetTime(String<TIME_LEN>),
    SetDate(String<DATE_LEN>),
    SetBattery(String<BATTERY_LEN>),
    SetTemperature(String<TEMPERATURE_LEN>),
    SetRate(String<RATE_LEN>),
    SetConditionIcon(Conditions),
}

impl DisplayCommand {
    /// Forward this command to a renderer
    pub fn apply<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        match self {
            DisplayCommand::SetTime(text) => renderer.set_time(text),
            DisplayCommand::SetDate(text) => renderer.set_date(text),
            DisplayCommand::SetBattery(text) => renderer.set_battery(text),
            DisplayCommand::SetTemperature(text) => renderer.set_temperature(text),
            DisplayCommand::SetRate(text) => renderer.set_rate(text),
            DisplayCommand::SetConditionIcon(conditions) => renderer.set_condition_icon(*conditions),
        }
    }
}
