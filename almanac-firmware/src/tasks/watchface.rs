//! Watchface task
//!
//! Owns the watchface pipeline and feeds it every event in arrival order.
//! This is where pipeline outcomes get logged.

use almanac_core::battery::BatteryChargeState;
use almanac_core::clock::LocalTime;
use almanac_core::config::WatchfaceConfig;
use almanac_core::{EventReport, TickReport, Watchface, WatchfaceError};
use almanac_display::FaceScreen;
use defmt::*;

use crate::channels::{WatchEvent, SCREEN_UPDATE, WATCH_EVENTS};
use crate::link::UartLink;
use crate::tasks::display_tx::SCREEN_BUFFER;

type Face = Watchface<FaceScreen, UartLink>;

/// Watchface task - main coordination loop
#[embassy_executor::task]
pub async fn watchface_task(config: WatchfaceConfig, now: LocalTime, battery: BatteryChargeState) {
    info!("Watchface task started");

    let mut face = Face::new(&config, FaceScreen::new(), UartLink::new());

    if let Err(e) = face.start(&now, battery) {
        // The clock keeps running without a companion
        error!("Companion link unavailable: {:?}", e);
    }
    publish_screen(&mut face).await;

    loop {
        match WATCH_EVENTS.receive().await {
            WatchEvent::Tick(tick) => match face.on_tick(&tick) {
                Ok(TickReport::ClockUpdated) => {}
                Ok(TickReport::RefreshRequested) => info!("Refresh requested"),
                Ok(TickReport::RefreshSkipped) => debug!("Refresh skipped, request in flight"),
                Err(e) => log_error(e),
            },
            WatchEvent::Battery(charge) => face.on_battery(charge),
            WatchEvent::Transport(event) => match face.on_transport_event(event) {
                Ok(EventReport::Sent) => info!("Refresh request delivered"),
                Ok(EventReport::Applied(fields)) => debug!("Applied update: {} fields", fields.len()),
                Err(e) => log_error(e),
            },
        }

        publish_screen(&mut face).await;
    }
}

fn log_error(e: WatchfaceError) {
    match e {
        WatchfaceError::TransportDropped(reason) => warn!("Inbound message dropped: {:?}", reason),
        WatchfaceError::TransportSendFailed(reason) => warn!("Refresh send failed: {:?}", reason),
        WatchfaceError::Decode(e) => warn!("Inbound message rejected: {:?}", e),
        WatchfaceError::LinkOpen(reason) => error!("Link open failed: {:?}", reason),
    }
}

/// Copy the face to the shared buffer if anything changed
async fn publish_screen(face: &mut Face) {
    let screen = face.renderer_mut().screen_mut();
    if !screen.is_dirty() {
        return;
    }
    screen.mark_clean();

    *SCREEN_BUFFER.lock().await = screen.clone();
    SCREEN_UPDATE.signal(());
}
