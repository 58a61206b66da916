//! Almanac - watchface firmware
//!
//! Main firmware binary for RP2040-based boards. Shows time, date,
//! battery, weather and an exchange rate on an external character display,
//! and keeps weather and rate in sync with a companion bridge over UART.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, InterruptHandler as AdcInterruptHandler};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::peripherals::{UART0, UART1};
use embassy_rp::rtc::Rtc;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use almanac_core::battery::BatteryChargeState;

use crate::tasks::BatteryMonitor;

mod channels;
mod config;
mod link;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    UART1_IRQ => BufferedInterruptHandler<UART1>;
    ADC_IRQ_FIFO => AdcInterruptHandler;
});

// Static cells for UART buffers (must live forever)
static DISPLAY_TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static DISPLAY_RX_BUF: StaticCell<[u8; 16]> = StaticCell::new();
static LINK_TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static LINK_RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Almanac firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load_config();

    // Display module on UART0 (Pico: GPIO0 TX, GPIO1 RX)
    let display_uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default());
    let display_uart = display_uart.into_buffered(
        Irqs,
        DISPLAY_TX_BUF.init([0u8; 256]),
        DISPLAY_RX_BUF.init([0u8; 16]),
    );
    // The display module never talks back
    let (display_tx, _display_rx) = display_uart.split();
    info!("UART initialized for display communication");

    // Companion bridge on UART1 (Pico: GPIO4 TX, GPIO5 RX)
    let link_uart = Uart::new_blocking(p.UART1, p.PIN_4, p.PIN_5, UartConfig::default());
    let link_uart = link_uart.into_buffered(
        Irqs,
        LINK_TX_BUF.init([0u8; 256]),
        LINK_RX_BUF.init([0u8; 256]),
    );
    let (link_tx, link_rx) = link_uart.split();
    info!("UART initialized for companion link");

    // Battery: VSYS/3 on GPIO29, VBUS sense on GPIO24
    let adc = Adc::new(p.ADC, Irqs, embassy_rp::adc::Config::default());
    let vsys = Channel::new_pin(p.PIN_29, Pull::None);
    let vbus = Input::new(p.PIN_24, Pull::None);
    let mut battery = BatteryMonitor::new(adc, vsys, vbus, config.battery);

    // Startup peek so the first frame already shows a level
    let charge = match battery.sample().await {
        Some(charge) => charge,
        None => {
            warn!("No initial battery reading");
            BatteryChargeState::default()
        }
    };
    info!("Battery at {}%", charge.charge_percent);

    let mut rtc = Rtc::new(p.RTC);
    let now = tasks::clock::start_rtc(&mut rtc);
    info!("Clock at {}:{}", now.hour(), now.minute());

    // Spawn tasks
    spawner.spawn(tasks::display_tx_task(display_tx)).unwrap();
    spawner.spawn(tasks::link_tx_task(link_tx)).unwrap();
    spawner.spawn(tasks::link_rx_task(link_rx)).unwrap();
    spawner
        .spawn(tasks::watchface_task(config, now, charge))
        .unwrap();
    spawner.spawn(tasks::clock_task(rtc, now)).unwrap();
    spawner.spawn(tasks::battery_task(battery, charge)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
