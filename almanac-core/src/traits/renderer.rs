//! Renderer trait for the watchface layers

use crate::state::Conditions;

/// Trait for whatever draws the watchface
///
/// Each method replaces the content of one layer. Rendering cannot fail
/// from the watchface's point of view; a renderer that drives a remote
/// screen queues its own retries.
pub trait Renderer {
    /// Time layer, `HH:MM`
    fn set_time(&mut self, text: &str);

    /// Date layer, `Wkd DD Mon`
    fn set_date(&mut self, text: &str);

    /// Battery layer, `87%`
    fn set_battery(&mut self, text: &str);

    /// Temperature layer, `+21C` or the placeholder
    fn set_temperature(&mut self, text: &str);

    /// Exchange rate layer, `$=123.45` or the placeholder
    fn set_rate(&mut self, text: &str);

    /// Weather icon layer, only called with known conditions
    fn set_condition_icon(&mut self, conditions: Conditions);
}
