//! Companion link over UART
//!
//! The watch talks to a companion bridge using [`LinkMessage`] frames.
//! [`UartLink`] is the watchface's handle for sending; the receive task
//! runs every inbound frame through [`LinkState::handle_frame`], which
//! decides the reply for the bridge and the event for the watchface.

use almanac_core::codec::OutboundRequest;
use almanac_core::traits::{CompanionLink, TransportEvent};
use almanac_protocol::link::MAX_DICTIONARY_SIZE;
use almanac_protocol::{AppMessageResult, Frame, LinkError, LinkMessage};
use defmt::*;
use portable_atomic::{AtomicU16, Ordering};

use crate::channels::LINK_TX;

/// No outbound push awaiting an answer
const NO_TXN: u16 = u16::MAX;

/// Link state shared by the watchface and the receive task
pub static LINK_STATE: LinkState = LinkState::new();

/// Inbox capacity and the outstanding outbound push
pub struct LinkState {
    /// Inbox capacity in bytes, 0 while the link is closed
    inbox_size: AtomicU16,
    /// Transaction id of the last outbound push, or [`NO_TXN`]
    outbound_txn: AtomicU16,
}

impl LinkState {
    pub const fn new() -> Self {
        Self {
            inbox_size: AtomicU16::new(0),
            outbound_txn: AtomicU16::new(NO_TXN),
        }
    }

    fn open_inbox(&self, inbox_size: u16) {
        self.inbox_size.store(inbox_size, Ordering::Release);
    }

    /// Wait for an answer to `txn`; an older push is forgotten
    fn expect_answer(&self, txn: u8) {
        self.outbound_txn.store(u16::from(txn), Ordering::Release);
    }

    /// Interpret one frame received from the bridge
    pub fn handle_frame(&self, frame: &Frame) -> Inbound {
        match LinkMessage::from_frame(frame) {
            Ok(LinkMessage::Push { txn, dict }) => {
                let inbox = self.inbox_size.load(Ordering::Acquire);
                if inbox == 0 {
                    // Nobody listening yet
                    return nack(txn, AppMessageResult::AppNotRunning, false);
                }
                // Payload is the txn byte followed by the encoded dictionary
                if frame.payload.len() - 1 > usize::from(inbox) {
                    return nack(txn, AppMessageResult::BufferOverflow, true);
                }
                Inbound {
                    reply: Some(LinkMessage::Ack { txn }),
                    event: Some(TransportEvent::Received(dict)),
                }
            }
            Ok(LinkMessage::Ack { txn }) => Inbound {
                reply: None,
                event: self.settle(txn).then_some(TransportEvent::SendSucceeded),
            },
            Ok(LinkMessage::Nack { txn, reason }) => Inbound {
                reply: None,
                event: self.settle(txn).then_some(TransportEvent::SendFailed(reason)),
            },
            Err(LinkError::Dictionary { txn, error }) => {
                warn!("Undecodable push {}: {:?}", txn, error);
                nack(txn, AppMessageResult::InvalidArgs, true)
            }
            Err(LinkError::Frame(e)) => {
                warn!("Unexpected link frame kind {}: {:?}", frame.kind, e);
                Inbound::default()
            }
        }
    }

    /// Clear the outstanding push if `txn` answers it
    fn settle(&self, txn: u8) -> bool {
        let settled = self
            .outbound_txn
            .compare_exchange(u16::from(txn), NO_TXN, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if !settled {
            debug!("Ignoring stale answer for txn {}", txn);
        }
        settled
    }
}

/// Sending half of the companion link
pub struct UartLink {
    state: &'static LinkState,
    outbox_size: u16,
    next_txn: u8,
}

impl UartLink {
    pub fn new() -> Self {
        Self {
            state: &LINK_STATE,
            outbox_size: 0,
            next_txn: 0,
        }
    }
}

impl CompanionLink for UartLink {
    fn open(&mut self, inbox_size: u16, outbox_size: u16) -> Result<(), AppMessageResult> {
        let limit = MAX_DICTIONARY_SIZE as u16;
        if inbox_size == 0 || outbox_size == 0 {
            return Err(AppMessageResult::InvalidArgs);
        }
        if inbox_size > limit || outbox_size > limit {
            return Err(AppMessageResult::OutOfMemory);
        }

        self.outbox_size = outbox_size;
        self.state.open_inbox(inbox_size);
        info!("Companion link open: inbox={}B outbox={}B", inbox_size, outbox_size);
        Ok(())
    }

    fn send(&mut self, request: &OutboundRequest) -> Result<(), AppMessageResult> {
        if self.outbox_size == 0 {
            return Err(AppMessageResult::InvalidState);
        }

        let dict = request.dictionary();
        if dict.encoded_len() > usize::from(self.outbox_size) {
            return Err(AppMessageResult::BufferOverflow);
        }

        let txn = self.next_txn;
        LINK_TX
            .try_send(LinkMessage::Push {
                txn,
                dict: dict.clone(),
            })
            .map_err(|_| AppMessageResult::Busy)?;

        self.next_txn = self.next_txn.wrapping_add(1);
        self.state.expect_answer(txn);
        debug!("Push {} queued ({} bytes)", txn, dict.encoded_len());
        Ok(())
    }
}

/// What to do with one inbound frame
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Inbound {
    /// Ack or nack for the bridge
    pub reply: Option<LinkMessage>,
    /// Event for the watchface
    pub event: Option<TransportEvent>,
}

fn nack(txn: u8, reason: AppMessageResult, report: bool) -> Inbound {
    Inbound {
        reply: Some(LinkMessage::Nack { txn, reason }),
        event: report.then_some(TransportEvent::Dropped(reason)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use almanac_protocol::link::MSG_PUSH;
    use almanac_protocol::{Dictionary, TupleValue};

    fn open_state(inbox_size: u16) -> LinkState {
        let state = LinkState::new();
        state.open_inbox(inbox_size);
        state
    }

    fn push(txn: u8) -> Frame {
        let dict = Dictionary::single(10002, TupleValue::Int32(12345));
        LinkMessage::Push { txn, dict }.to_frame().unwrap()
    }

    fn answer(message: LinkMessage) -> Frame {
        message.to_frame().unwrap()
    }

    #[test]
    fn test_push_acked_and_received() {
        let state = open_state(128);
        let inbound = state.handle_frame(&push(4));

        assert_eq!(inbound.reply, Some(LinkMessage::Ack { txn: 4 }));
        let Some(TransportEvent::Received(dict)) = inbound.event else {
            panic!("expected a received dictionary");
        };
        assert_eq!(dict.get(10002), Some(&TupleValue::Int32(12345)));
    }

    #[test]
    fn test_push_while_closed_nacked_silently() {
        let state = LinkState::new();
        let inbound = state.handle_frame(&push(1));

        assert_eq!(
            inbound.reply,
            Some(LinkMessage::Nack {
                txn: 1,
                reason: AppMessageResult::AppNotRunning
            })
        );
        assert_eq!(inbound.event, None);
    }

    #[test]
    fn test_push_over_inbox_dropped() {
        // The dictionary above encodes to 12 bytes
        let state = open_state(8);
        let inbound = state.handle_frame(&push(2));

        assert_eq!(
            inbound.reply,
            Some(LinkMessage::Nack {
                txn: 2,
                reason: AppMessageResult::BufferOverflow
            })
        );
        assert_eq!(
            inbound.event,
            Some(TransportEvent::Dropped(AppMessageResult::BufferOverflow))
        );
    }

    #[test]
    fn test_undecodable_push_dropped() {
        let state = open_state(128);
        let frame = Frame::new(MSG_PUSH, &[6, 1, 0, 0]).unwrap();
        let inbound = state.handle_frame(&frame);

        assert_eq!(
            inbound.reply,
            Some(LinkMessage::Nack {
                txn: 6,
                reason: AppMessageResult::InvalidArgs
            })
        );
        assert_eq!(
            inbound.event,
            Some(TransportEvent::Dropped(AppMessageResult::InvalidArgs))
        );
    }

    #[test]
    fn test_ack_settles_outbound_push() {
        let state = open_state(128);
        state.expect_answer(3);

        let inbound = state.handle_frame(&answer(LinkMessage::Ack { txn: 3 }));
        assert_eq!(inbound.reply, None);
        assert_eq!(inbound.event, Some(TransportEvent::SendSucceeded));

        // A repeated ack finds nothing outstanding
        let inbound = state.handle_frame(&answer(LinkMessage::Ack { txn: 3 }));
        assert_eq!(inbound, Inbound::default());
    }

    #[test]
    fn test_nack_reports_send_failure() {
        let state = open_state(128);
        state.expect_answer(9);

        let inbound = state.handle_frame(&answer(LinkMessage::Nack {
            txn: 9,
            reason: AppMessageResult::SendTimeout,
        }));
        assert_eq!(inbound.reply, None);
        assert_eq!(
            inbound.event,
            Some(TransportEvent::SendFailed(AppMessageResult::SendTimeout))
        );
    }

    #[test]
    fn test_stale_answer_ignored() {
        let state = open_state(128);
        state.expect_answer(1);
        state.expect_answer(2);

        // Answers for the superseded push do not settle the current one
        let inbound = state.handle_frame(&answer(LinkMessage::Ack { txn: 1 }));
        assert_eq!(inbound.event, None);
        let inbound = state.handle_frame(&answer(LinkMessage::Nack {
            txn: 1,
            reason: AppMessageResult::Busy,
        }));
        assert_eq!(inbound.event, None);

        let inbound = state.handle_frame(&answer(LinkMessage::Ack { txn: 2 }));
        assert_eq!(inbound.event, Some(TransportEvent::SendSucceeded));
    }

    #[test]
    fn test_unknown_frame_ignored() {
        let state = open_state(128);
        let frame = Frame::new(0x7F, &[1]).unwrap();
        assert_eq!(state.handle_frame(&frame), Inbound::default());
    }
}
