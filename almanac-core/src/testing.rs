//! Test doubles for the collaborator traits

use almanac_protocol::{AppMessageResult, Dictionary};
use std::string::String;
use std::vec::Vec;

use crate::codec::OutboundRequest;
use crate::state::Conditions;
use crate::traits::{CompanionLink, Renderer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCall {
    Time(String),
    Date(String),
    Battery(String),
    Temperature(String),
    Rate(String),
    Icon(Conditions),
}

/// Renderer that records every call in order
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<RenderCall>,
}

impl Renderer for RecordingRenderer {
    fn set_time(&mut self, text: &str) {
        self.calls.push(RenderCall::Time(text.into()));
    }

    fn set_date(&mut self, text: &str) {
        self.calls.push(RenderCall::Date(text.into()));
    }

    fn set_battery(&mut self, text: &str) {
        self.calls.push(RenderCall::Battery(text.into()));
    }

    fn set_temperature(&mut self, text: &str) {
        self.calls.push(RenderCall::Temperature(text.into()));
    }

    fn set_rate(&mut self, text: &str) {
        self.calls.push(RenderCall::Rate(text.into()));
    }

    fn set_condition_icon(&mut self, conditions: Conditions) {
        self.calls.push(RenderCall::Icon(conditions));
    }
}

/// Link that records requests and fails on demand
#[derive(Debug, Default)]
pub struct FakeLink {
    pub opened: Option<(u16, u16)>,
    pub sent: Vec<Dictionary>,
    pub open_error: Option<AppMessageResult>,
    pub send_error: Option<AppMessageResult>,
}

impl CompanionLink for FakeLink {
    fn open(&mut self, inbox_size: u16, outbox_size: u16) -> Result<(), AppMessageResult> {
        if let Some(e) = self.open_error {
            return Err(e);
        }
        self.opened = Some((inbox_size, outbox_size));
        Ok(())
    }

    fn send(&mut self, request: &OutboundRequest) -> Result<(), AppMessageResult> {
        if let Some(e) = self.send_error {
            return Err(e);
        }
        self.sent.push(request.dictionary().clone());
        Ok(())
    }
}
