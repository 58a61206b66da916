//! Companion UART receive task
//!
//! Receives frames from the companion bridge, answers pushes and forwards
//! transport events to the watchface.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use almanac_protocol::FrameParser;

use crate::channels::{WatchEvent, LINK_TX, WATCH_EVENTS};
use crate::link::LINK_STATE;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Link RX task - receives and parses frames from the companion bridge
#[embassy_executor::task]
pub async fn link_rx_task(mut rx: BufferedUartRx) {
    info!("Link RX task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(frame)) => {
                            let inbound = LINK_STATE.handle_frame(&frame);
                            if let Some(reply) = inbound.reply {
                                LINK_TX.send(reply).await;
                            }
                            if let Some(event) = inbound.event {
                                WATCH_EVENTS.send(WatchEvent::Transport(event)).await;
                            }
                        }
                        Ok(None) => {
                            // Need more bytes
                        }
                        Err(e) => {
                            warn!("Frame parse error: {:?}", e);
                        }
                    }
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}
