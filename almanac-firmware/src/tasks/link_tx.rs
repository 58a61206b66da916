//! Companion UART transmit task
//!
//! Sends queued pushes, acks and nacks to the companion bridge.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use almanac_protocol::frame::MAX_FRAME_SIZE;

use crate::channels::LINK_TX;

/// Link TX task - frames and writes outbound link messages
#[embassy_executor::task]
pub async fn link_tx_task(mut tx: BufferedUartTx) {
    info!("Link TX task started");

    let mut buf = [0u8; MAX_FRAME_SIZE];

    loop {
        let msg = LINK_TX.receive().await;

        let frame = match msg.to_frame() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Failed to frame link message {}: {:?}", msg.txn(), e);
                continue;
            }
        };

        match frame.encode(&mut buf) {
            Ok(len) => {
                if let Err(e) = tx.write_all(&buf[..len]).await {
                    warn!("Failed to send link frame: {:?}", e);
                } else {
                    trace!("Link frame sent: kind={} txn={}", frame.kind, msg.txn());
                }
            }
            Err(e) => warn!("Failed to encode link frame: {:?}", e),
        }
    }
}
