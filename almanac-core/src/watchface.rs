//! Watchface event pipeline
//!
//! [`Watchface`] owns the display state and its collaborators. The host
//! feeds it events one at a time (ticks, battery changes, transport
//! reports) and it keeps the renderer and the companion in step.
//!
//! ```text
//! tick ──► Scheduler ──► DisplayState ──► Renderer
//!              │
//!              └─► MessageCodec ──► CompanionLink ─ ─ ► companion
//!                                                          │
//! TransportEvent ◄─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─┘
//!      │
//!      └─► MessageCodec ──► DisplayState ──► Renderer
//! ```

use crate::battery::BatteryChargeState;
use crate::clock::{LocalTime, Tick};
use crate::codec::MessageCodec;
use crate::config::{LinkConfig, WatchfaceConfig};
use crate::error::WatchfaceError;
use crate::scheduler::{Refresh, Scheduler};
use crate::state::{DisplayState, FieldSet};
use crate::traits::{CompanionLink, Renderer, TransportEvent};

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickReport {
    /// Clock redrawn, no refresh due
    ClockUpdated,
    /// Clock redrawn and a refresh request handed to the link
    RefreshRequested,
    /// Refresh due but skipped because a request is still in flight
    RefreshSkipped,
}

/// What a transport event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventReport {
    /// Inbound message decoded and merged; carries the fields redrawn
    Applied(FieldSet),
    /// Outbound request acknowledged
    Sent,
}

/// The watchface: display state, scheduling and companion sync
pub struct Watchface<R, L> {
    state: DisplayState,
    scheduler: Scheduler,
    codec: MessageCodec,
    link_config: LinkConfig,
    renderer: R,
    link: L,
}

impl<R: Renderer, L: CompanionLink> Watchface<R, L> {
    pub fn new(config: &WatchfaceConfig, renderer: R, link: L) -> Self {
        Self {
            state: DisplayState::new(config.rate_style),
            scheduler: Scheduler::new(config.refresh, config.clock_style),
            codec: MessageCodec::new(config.keys),
            link_config: config.link,
            renderer,
            link,
        }
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Draw the initial face and open the companion link
    ///
    /// Everything is rendered before the link is opened, so a link failure
    /// still leaves a working clock. No request is sent until the first
    /// refresh boundary.
    pub fn start(
        &mut self,
        now: &LocalTime,
        battery: BatteryChargeState,
    ) -> Result<(), WatchfaceError> {
        self.scheduler.update_clock(now, &mut self.state);
        self.state.set_battery(battery.charge_percent);
        self.render(FieldSet::ALL);

        self.link
            .open(self.link_config.inbox_size, self.link_config.outbox_size)
            .map_err(WatchfaceError::LinkOpen)
    }

    /// Handle a minute tick
    pub fn on_tick(&mut self, tick: &Tick) -> Result<TickReport, WatchfaceError> {
        let outcome = self.scheduler.tick(tick, &mut self.state);
        self.render(outcome.touched);

        match outcome.refresh {
            Refresh::None => Ok(TickReport::ClockUpdated),
            Refresh::SkippedPending => Ok(TickReport::RefreshSkipped),
            Refresh::Send => {
                let request = self.codec.encode_refresh_request();
                self.link
                    .send(&request)
                    .map_err(WatchfaceError::TransportSendFailed)?;
                self.scheduler.request_sent();
                Ok(TickReport::RefreshRequested)
            }
        }
    }

    /// Handle a battery change
    pub fn on_battery(&mut self, charge: BatteryChargeState) {
        let touched = self.state.set_battery(charge.charge_percent);
        self.render(touched);
    }

    /// Handle a report from the companion transport
    ///
    /// Errors leave the display state untouched.
    pub fn on_transport_event(
        &mut self,
        event: TransportEvent,
    ) -> Result<EventReport, WatchfaceError> {
        self.scheduler.request_settled();

        match event {
            TransportEvent::Received(dict) => {
                let update = self.codec.decode(&dict)?;
                let touched = self.state.apply_update(&update);
                self.render(touched);
                Ok(EventReport::Applied(touched))
            }
            TransportEvent::Dropped(reason) => Err(WatchfaceError::TransportDropped(reason)),
            TransportEvent::SendFailed(reason) => {
                Err(WatchfaceError::TransportSendFailed(reason))
            }
            TransportEvent::SendSucceeded => Ok(EventReport::Sent),
        }
    }

    fn render(&mut self, fields: FieldSet) {
        for command in self.state.commands(fields) {
            command.apply(&mut self.renderer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WatchfaceConfig;
    use crate::scheduler::RefreshPolicy;
    use crate::state::{Conditions, Field};
    use crate::testing::{FakeLink, RecordingRenderer, RenderCall};
    use almanac_protocol::{AppMessageResult, Dictionary, TupleValue};

    fn time(hour: u8, minute: u8) -> LocalTime {
        LocalTime::new(2024, 3, 6, hour, minute, 0).unwrap()
    }

    fn battery(percent: u8) -> BatteryChargeState {
        BatteryChargeState {
            charge_percent: percent,
            is_charging: false,
            is_plugged: false,
        }
    }

    fn started(config: &WatchfaceConfig) -> Watchface<RecordingRenderer, FakeLink> {
        let mut face = Watchface::new(config, RecordingRenderer::default(), FakeLink::default());
        face.start(&time(10, 17), battery(80)).unwrap();
        face.renderer_mut().calls.clear();
        face
    }

    fn reply(tuples: &[(u32, TupleValue)]) -> TransportEvent {
        let mut dict = Dictionary::new();
        for (key, value) in tuples {
            dict.insert(*key, value.clone()).unwrap();
        }
        TransportEvent::Received(dict)
    }

    #[test]
    fn test_start_renders_everything_and_opens_link() {
        let mut face = Watchface::new(
            &WatchfaceConfig::default(),
            RecordingRenderer::default(),
            FakeLink::default(),
        );
        face.start(&time(10, 17), battery(80)).unwrap();

        assert_eq!(
            face.renderer().calls,
            [
                RenderCall::Time("10:17".into()),
                RenderCall::Date("Wed 06 Mar".into()),
                RenderCall::Battery("80%".into()),
                RenderCall::Temperature("..".into()),
                RenderCall::Rate("..".into()),
            ]
        );
        assert_eq!(face.link().opened, Some((128, 128)));
        assert!(face.link().sent.is_empty());
    }

    #[test]
    fn test_start_reports_link_failure_after_rendering() {
        let link = FakeLink {
            open_error: Some(AppMessageResult::OutOfMemory),
            ..FakeLink::default()
        };
        let mut face = Watchface::new(&WatchfaceConfig::default(), RecordingRenderer::default(), link);

        assert_eq!(
            face.start(&time(9, 0), battery(50)),
            Err(WatchfaceError::LinkOpen(AppMessageResult::OutOfMemory))
        );
        assert!(!face.renderer().calls.is_empty());
        assert_eq!(face.state().time(), "09:00");
    }

    #[test]
    fn test_tick_off_boundary_redraws_time_and_date() {
        let mut face = started(&WatchfaceConfig::default());
        let report = face.on_tick(&Tick::at(time(10, 18))).unwrap();

        assert_eq!(report, TickReport::ClockUpdated);
        assert_eq!(
            face.renderer().calls,
            [
                RenderCall::Time("10:18".into()),
                RenderCall::Date("Wed 06 Mar".into()),
            ]
        );
        assert!(face.link().sent.is_empty());
    }

    #[test]
    fn test_tick_on_boundary_sends_request() {
        let mut face = started(&WatchfaceConfig::default());
        let report = face.on_tick(&Tick::at(time(10, 30))).unwrap();

        assert_eq!(report, TickReport::RefreshRequested);
        assert_eq!(face.link().sent.len(), 1);
        assert_eq!(face.link().sent[0].get(0), Some(&TupleValue::UInt8(0)));
        assert!(face.scheduler().is_pending());
    }

    #[test]
    fn test_immediate_send_failure() {
        let mut face = started(&WatchfaceConfig::default());
        face.link_mut().send_error = Some(AppMessageResult::NotConnected);
        let before = face.state().clone();

        let result = face.on_tick(&Tick::at(time(11, 0)));
        assert_eq!(
            result,
            Err(WatchfaceError::TransportSendFailed(AppMessageResult::NotConnected))
        );
        assert!(!face.scheduler().is_pending());
        // Only the clock moved
        assert_eq!(face.state().temperature_celsius(), before.temperature_celsius());
        assert_eq!(face.state().time(), "11:00");
    }

    #[test]
    fn test_reply_updates_and_renders() {
        let mut face = started(&WatchfaceConfig::default());
        let report = face
            .on_transport_event(reply(&[
                (10000, TupleValue::Int32(21)),
                (10001, TupleValue::string("Clouds").unwrap()),
                (10002, TupleValue::Int32(12345)),
            ]))
            .unwrap();

        let EventReport::Applied(touched) = report else {
            panic!("expected applied report");
        };
        assert!(touched.contains(Field::Temperature));
        assert_eq!(
            face.renderer().calls,
            [
                RenderCall::Temperature("+21C".into()),
                RenderCall::Icon(Conditions::Clouds),
                RenderCall::Rate("$=123.45".into()),
            ]
        );
    }

    #[test]
    fn test_rate_only_reply() {
        let mut face = started(&WatchfaceConfig::default());
        face.on_transport_event(reply(&[(10002, TupleValue::Int32(-5))]))
            .unwrap();

        assert_eq!(face.renderer().calls, [RenderCall::Rate("$=-0.05".into())]);
        assert_eq!(face.state().temperature_celsius(), None);
    }

    #[test]
    fn test_mistyped_reply_leaves_state() {
        let mut face = started(&WatchfaceConfig::default());
        let before = face.state().clone();

        let result = face.on_transport_event(reply(&[
            (10000, TupleValue::Int32(21)),
            (10001, TupleValue::Int32(3)),
        ]));
        assert_eq!(
            result,
            Err(WatchfaceError::Decode(crate::DecodeError::TypeMismatch { key: 10001 }))
        );
        assert_eq!(face.state(), &before);
        assert!(face.renderer().calls.is_empty());
    }

    #[test]
    fn test_transport_failures_leave_state() {
        let mut face = started(&WatchfaceConfig::default());
        let before = face.state().clone();

        assert_eq!(
            face.on_transport_event(TransportEvent::Dropped(AppMessageResult::BufferOverflow)),
            Err(WatchfaceError::TransportDropped(AppMessageResult::BufferOverflow))
        );
        assert_eq!(
            face.on_transport_event(TransportEvent::SendFailed(AppMessageResult::SendTimeout)),
            Err(WatchfaceError::TransportSendFailed(AppMessageResult::SendTimeout))
        );
        assert_eq!(face.state(), &before);
        assert!(face.renderer().calls.is_empty());
    }

    #[test]
    fn test_send_succeeded_settles_pending() {
        let mut config = WatchfaceConfig::default();
        config.refresh.policy = RefreshPolicy::SkipWhilePending;
        let mut face = started(&config);

        face.on_tick(&Tick::at(time(10, 30))).unwrap();
        assert!(face.scheduler().is_pending());
        assert_eq!(
            face.on_transport_event(TransportEvent::SendSucceeded),
            Ok(EventReport::Sent)
        );
        assert!(!face.scheduler().is_pending());
        assert_eq!(
            face.on_tick(&Tick::at(time(11, 0))).unwrap(),
            TickReport::RefreshRequested
        );
    }

    #[test]
    fn test_unanswered_request_skips_one_boundary() {
        let mut config = WatchfaceConfig::default();
        config.refresh.policy = RefreshPolicy::SkipWhilePending;
        let mut face = started(&config);

        face.on_tick(&Tick::at(time(10, 30))).unwrap();
        assert_eq!(
            face.on_tick(&Tick::at(time(11, 0))).unwrap(),
            TickReport::RefreshSkipped
        );
        assert_eq!(
            face.on_tick(&Tick::at(time(11, 30))).unwrap(),
            TickReport::RefreshRequested
        );
        assert_eq!(face.link().sent.len(), 2);
    }

    #[test]
    fn test_same_reply_twice_is_idempotent() {
        let mut face = started(&WatchfaceConfig::default());
        let message = reply(&[
            (10000, TupleValue::Int8(-3)),
            (10001, TupleValue::string("Mist").unwrap()),
        ]);

        face.on_transport_event(message.clone()).unwrap();
        let state = face.state().clone();
        let first = core::mem::take(&mut face.renderer_mut().calls);

        face.on_transport_event(message).unwrap();
        assert_eq!(face.state(), &state);
        assert_eq!(face.renderer().calls, first);
        assert_eq!(
            first,
            [
                RenderCall::Temperature("-3C".into()),
                RenderCall::Icon(Conditions::Mist),
            ]
        );
    }

    #[test]
    fn test_long_tag_still_applies_temperature_and_rate() {
        let mut face = started(&WatchfaceConfig::default());
        let tag = TupleValue::string_clipped("Thunderstorm with heavy rain and hailxxx");

        let report = face
            .on_transport_event(reply(&[
                (10000, TupleValue::Int32(21)),
                (10001, tag),
                (10002, TupleValue::Int32(12345)),
            ]))
            .unwrap();

        let EventReport::Applied(touched) = report else {
            panic!("expected an applied update");
        };
        assert!(!touched.contains(Field::Conditions));
        assert_eq!(face.state().temperature_celsius(), Some(21));
        assert_eq!(face.state().rate_cents(), Some(12345));
        assert_eq!(face.state().conditions(), Conditions::Unknown);
        assert_eq!(
            face.renderer().calls,
            [
                RenderCall::Temperature("+21C".into()),
                RenderCall::Rate("$=123.45".into()),
            ]
        );
    }

    #[test]
    fn test_lone_conditions_change_nothing() {
        let mut face = started(&WatchfaceConfig::default());
        face.on_transport_event(reply(&[(10000, TupleValue::Int32(5))]))
            .unwrap();
        face.on_transport_event(reply(&[(10001, TupleValue::string("Tornado").unwrap())]))
            .unwrap();

        assert!(face.renderer().calls.is_empty());
        assert_eq!(face.state().conditions(), Conditions::Unknown);
        assert_eq!(face.state().temperature_celsius(), None);
    }

    #[test]
    fn test_ticks_leave_weather_alone() {
        let mut face = started(&WatchfaceConfig::default());
        face.on_transport_event(reply(&[
            (10000, TupleValue::Int32(21)),
            (10001, TupleValue::string("Clear").unwrap()),
            (10002, TupleValue::Int32(12345)),
        ]))
        .unwrap();
        let before = face.state().clone();

        for minute in 18..60 {
            face.on_tick(&Tick::at(time(10, minute))).unwrap();
        }
        assert_eq!(face.state().temperature_celsius(), before.temperature_celsius());
        assert_eq!(face.state().conditions(), before.conditions());
        assert_eq!(face.state().rate_cents(), before.rate_cents());
        assert_eq!(face.state().battery_percent(), before.battery_percent());
        assert_eq!(face.link().sent.len(), 1);
    }

    #[test]
    fn test_battery_change_renders_battery() {
        let mut face = started(&WatchfaceConfig::default());
        face.on_battery(battery(70));
        face.on_battery(battery(70));
        assert_eq!(face.renderer().calls, [RenderCall::Battery("70%".into())]);
    }
}
