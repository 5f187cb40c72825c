//! Hardware Resource Management
//!
//! Manages and allocates hardware resources (pins, peripherals) to the
//! system components:
//! - Defines clear ownership of hardware resources
//! - Prevents conflicts in hardware access
//! - Provides safe concurrent access to the shared I2C bus
//!
//! # Resource Groups
//! - Encoder: rotary encoder quadrature pins and push button
//! - WiFi: CYW43 radio (Pico 2 W on-board wiring)
//!
//! # Shared Resources
//! The I2C bus carries the OLED display and the three power sensors. Tasks
//! access it through `I2cDevice` wrappers over the bus mutex, so one task's
//! transfer cannot interleave with another's.

use assign_resources::assign_resources;
use embassy_rp::bind_interrupts;
use embassy_rp::i2c::{Async as I2cAsync, Config as I2cConfig, I2c, InterruptHandler as I2cInterruptHandler};
use embassy_rp::peripherals::{self, I2C0, PIO0};
use embassy_rp::pio::InterruptHandler as PioInterruptHandler;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use static_cell::StaticCell;

/// Shared I2C bus: OLED display plus the three power sensors
pub type I2cBus = Mutex<CriticalSectionRawMutex, I2c<'static, I2C0, I2cAsync>>;

static I2C_BUS: StaticCell<I2cBus> = StaticCell::new();

/// Initializes the shared I2C bus (400 kHz fast mode)
///
/// Called once from main, before any task that uses the bus is spawned.
pub fn init_i2c(r: I2cBusResources) -> &'static I2cBus {
    let mut config = I2cConfig::default();
    config.frequency = 400_000;
    let bus = I2c::new_async(r.i2c, r.scl_pin, r.sda_pin, Irqs, config);
    I2C_BUS.init(Mutex::new(bus))
}

assign_resources! {
    /// Shared I2C bus pins (display + power sensors)
    i2c: I2cBusResources {
        i2c: I2C0,
        scl_pin: PIN_13,
        sda_pin: PIN_12,
    },
    /// Rotary encoder with push button
    encoder: EncoderResources {
        clk_pin: PIN_14,
        dt_pin: PIN_15,
        sw_pin: PIN_16,
    },
    /// CYW43 radio (fixed on-board wiring)
    wifi: WifiResources {
        pwr_pin: PIN_23,
        cs_pin: PIN_25,
        dio_pin: PIN_24,
        clk_pin: PIN_29,
        pio: PIO0,
        dma_ch: DMA_CH0,
    },
    /// SPI OLED wiring for the display-spi variant
    display_spi: DisplaySpiResources {
        spi: SPI0,
        clk_pin: PIN_18,
        mosi_pin: PIN_19,
        cs_pin: PIN_17,
        dc_pin: PIN_20,
        rst_pin: PIN_21,
        tx_dma: DMA_CH1,
    },
}

/// Splits the peripherals into the per-task resource groups
pub fn split(p: embassy_rp::Peripherals) -> AssignedResources {
    split_resources!(p)
}

bind_interrupts!(pub struct Irqs {
    I2C0_IRQ => I2cInterruptHandler<I2C0>;
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});
