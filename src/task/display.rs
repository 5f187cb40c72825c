//! Display rendering
//!
//! Composes an immutable snapshot on a fixed cadence and draws it through
//! the panel driver. Runs headless when no display answers at boot; the
//! rest of the system does not depend on it.
//!
//! The default panel is an SSD1306 on the shared I2C bus; the
//! `display-spi` feature swaps the same controller on SPI instead. Both
//! are plain [`embedded_graphics::draw_target::DrawTarget`] backends under
//! the drawing code in [`crate::system::screens`].

use defmt::{info, warn};
use embassy_time::{Duration, Instant, Ticker};
use ssd1306::prelude::*;
use ssd1306::Ssd1306Async;

use crate::system::screens;
use crate::system::snapshot::RenderSnapshot;
use crate::system::state::SYSTEM_STATE;

/// Redraw cadence
const DISPLAY_UPDATE_INTERVAL: Duration = Duration::from_millis(100);

/// Render task for the shared-bus I2C panel
#[cfg(not(feature = "display-spi"))]
#[embassy_executor::task]
pub async fn display(i2c_bus: &'static crate::system::resources::I2cBus) {
    use embassy_embedded_hal::shared_bus::asynch::i2c::I2cDevice;
    use ssd1306::I2CDisplayInterface;

    let interface = I2CDisplayInterface::new(I2cDevice::new(i2c_bus));
    let mut display = Ssd1306Async::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    if display.init().await.is_err() {
        warn!("no display found, running headless");
        return;
    }
    info!("display initialized");

    let mut ticker = Ticker::every(DISPLAY_UPDATE_INTERVAL);
    loop {
        ticker.next().await;
        let snapshot = {
            let state = SYSTEM_STATE.lock().await;
            RenderSnapshot::capture(&state, Instant::now())
        };
        // drawing into the buffer is infallible, only the flush hits the bus
        let _ = screens::render_frame(&mut display, &snapshot);
        if display.flush().await.is_err() {
            warn!("display flush failed");
        }
    }
}

/// Render task for the SPI panel variant
#[cfg(feature = "display-spi")]
#[embassy_executor::task]
pub async fn display(r: crate::system::resources::DisplaySpiResources) {
    use display_interface_spi::SPIInterface;
    use embassy_embedded_hal::shared_bus::asynch::spi::SpiDevice;
    use embassy_rp::gpio::{Level, Output};
    use embassy_rp::peripherals::SPI0;
    use embassy_rp::spi::{Async as SpiAsync, Config as SpiConfig, Spi};
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use embassy_sync::mutex::Mutex;
    use static_cell::StaticCell;

    static SPI_BUS: StaticCell<Mutex<CriticalSectionRawMutex, Spi<'static, SPI0, SpiAsync>>> =
        StaticCell::new();

    let mut config = SpiConfig::default();
    config.frequency = 8_000_000;
    let spi = Spi::new_txonly(r.spi, r.clk_pin, r.mosi_pin, r.tx_dma, config);
    let bus = SPI_BUS.init(Mutex::new(spi));
    let device = SpiDevice::new(bus, Output::new(r.cs_pin, Level::High));
    let dc = Output::new(r.dc_pin, Level::Low);
    // panel reset is wired but the controller powers up cleanly; hold high
    let _rst = Output::new(r.rst_pin, Level::High);

    let interface = SPIInterface::new(device, dc);
    let mut display = Ssd1306Async::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    if display.init().await.is_err() {
        warn!("no display found, running headless");
        return;
    }
    info!("display initialized (spi)");

    let mut ticker = Ticker::every(DISPLAY_UPDATE_INTERVAL);
    loop {
        ticker.next().await;
        let snapshot = {
            let state = SYSTEM_STATE.lock().await;
            RenderSnapshot::capture(&state, Instant::now())
        };
        let _ = screens::render_frame(&mut display, &snapshot);
        if display.flush().await.is_err() {
            warn!("display flush failed");
        }
    }
}
