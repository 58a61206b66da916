//! Display UART transmit task
//!
//! Sends screen updates to the external display module.

use almanac_display::{encode_screen, Screen};
use almanac_protocol::frame::MAX_FRAME_SIZE;
use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embedded_io_async::Write;

use crate::channels::SCREEN_UPDATE;

/// Shared screen buffer protected by mutex
pub static SCREEN_BUFFER: Mutex<CriticalSectionRawMutex, Screen> = Mutex::new(Screen::new());

/// Display TX task - sends frames to the display module
#[embassy_executor::task]
pub async fn display_tx_task(mut tx: BufferedUartTx) {
    info!("Display TX task started");

    loop {
        SCREEN_UPDATE.wait().await;
        send_screen_update(&mut tx).await;
    }
}

/// Send current screen content to display
async fn send_screen_update(tx: &mut BufferedUartTx) {
    let screen = SCREEN_BUFFER.lock().await;
    let mut buf = [0u8; MAX_FRAME_SIZE];

    for frame in encode_screen(&screen) {
        let len = match frame.and_then(|f| f.encode(&mut buf)) {
            Ok(len) => len,
            Err(e) => {
                warn!("Failed to encode screen frame: {:?}", e);
                continue;
            }
        };
        if let Err(e) = tx.write_all(&buf[..len]).await {
            warn!("Failed to send screen frame: {:?}", e);
            break;
        }
    }

    trace!("Screen update sent");
}
