//! Shed monitor firmware entry point
//!
//! Initializes the board and spawns the subsystem tasks.

#![no_std]
#![no_main]

use cyw43_pio::{PioSpi, DEFAULT_CLOCK_DIVIDER};
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_net::StackResources;
use embassy_rp::block::ImageDef;
use embassy_rp::config::Config;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::pio::Pio;
use embassy_time::Instant;
use shed_monitor::system::resources::{self, Irqs};
use shed_monitor::task::{
    display::display, encoder::encoder_watch, input_poll::input_poll, messaging,
    orchestrate::orchestrate, power_monitor::power_monitor, track_inactivity::track_inactivity,
};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

/// Firmware image type for bootloader
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

/// High-priority executor for the encoder edge watcher
static INPUT_EXECUTOR: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    INPUT_EXECUTOR.on_interrupt()
}

/// Firmware entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Config::default());
    let r = resources::split(p);

    // Shared I2C bus must exist before the display and sampler tasks start.
    let i2c_bus = resources::init_i2c(r.i2c);

    // CYW43 radio over PIO SPI
    let pwr = Output::new(r.wifi.pwr_pin, Level::Low);
    let cs = Output::new(r.wifi.cs_pin, Level::High);
    let mut pio = Pio::new(r.wifi.pio, Irqs);
    let spi = PioSpi::new(
        &mut pio.common,
        pio.sm0,
        DEFAULT_CLOCK_DIVIDER,
        pio.irq0,
        cs,
        r.wifi.dio_pin,
        r.wifi.clk_pin,
        r.wifi.dma_ch,
    );

    // CYW43 firmware blobs, flashed separately:
    //   probe-rs download 43439A0.bin --binary-format bin --chip RP235x --base-address 0x10100000
    //   probe-rs download 43439A0_clm.bin --binary-format bin --chip RP235x --base-address 0x10140000
    let fw = unsafe { core::slice::from_raw_parts(0x1010_0000 as *const u8, 230321) };
    let clm = unsafe { core::slice::from_raw_parts(0x1014_0000 as *const u8, 4752) };

    static CYW43_STATE: StaticCell<cyw43::State> = StaticCell::new();
    let state = CYW43_STATE.init(cyw43::State::new());
    let (net_device, mut control, runner) = cyw43::new(state, pwr, spi, fw).await;
    spawner.spawn(messaging::cyw43_driver(runner)).unwrap();
    control.init(clm).await;
    control
        .set_power_management(cyw43::PowerManagementMode::PowerSave)
        .await;

    // Network stack with DHCP
    static NET_RESOURCES: StaticCell<StackResources<8>> = StaticCell::new();
    let seed = Instant::now().as_ticks();
    let (stack, net_runner) = embassy_net::new(
        net_device,
        embassy_net::Config::dhcpv4(Default::default()),
        NET_RESOURCES.init(StackResources::new()),
        seed,
    );
    spawner.spawn(messaging::net_stack(net_runner)).unwrap();

    // The encoder edge watcher runs in interrupt context; everything it
    // shares with the cooperative world goes through the input atomics.
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let input_spawner = INPUT_EXECUTOR.start(interrupt::SWI_IRQ_1);
    input_spawner.spawn(encoder_watch(r.encoder)).unwrap();

    // Finally spawn the cooperative tasks
    spawner.spawn(orchestrate()).unwrap();
    spawner.spawn(input_poll()).unwrap();
    spawner.spawn(track_inactivity()).unwrap();
    spawner.spawn(power_monitor(i2c_bus)).unwrap();
    #[cfg(not(feature = "display-spi"))]
    {
        spawner.spawn(display(i2c_bus)).unwrap();
        let _ = r.display_spi;
    }
    #[cfg(feature = "display-spi")]
    spawner.spawn(display(r.display_spi)).unwrap();
    spawner.spawn(messaging::messaging(stack, control)).unwrap();
}
