//! # i2s-rms
//!
//! Loudness sensor for an I2S MEMS microphone, packaged as a polling sensor
//! component with its configuration schema.
//!
//! - **Config**: option schema, defaults and validation of one sensor block
//! - **Registry**: binds a validated block to a new sensor instance
//! - **Sensor**: deferred-start I2S receiver, RMS over each update interval,
//!   loudness published as `0.0..=1.0`
//! - **Microphone**: ESP32-S3 I2S RX frame source (Xtensa targets only)
//!
//! ## Quick start
//!
//! ```rust,ignore
//! let peripherals = i2s_rms::init();
//! let resources = i2s_rms::split_resources!(peripherals);
//!
//! let block = [("pin_bclk", Value::Int(14)), ("pin_ws", Value::Int(15))];
//! let mut registry = Registry::<1>::new();
//! let Binding::Created(mut sensor, _) = setup_block(&block, Chip::Esp32S3, &mut registry, || {
//!     Microphone::new(resources.mic, descriptors)
//! })?
//! else {
//!     unreachable!()
//! };
//! sensor.start();
//! ```

#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod component;
pub mod config;
pub mod duration;
#[cfg(target_arch = "xtensa")]
pub mod microphone;
pub mod registry;
pub mod rms;
pub mod sensor;
pub mod source;

pub use component::{
    Component,
    Control,
    ControlSignal,
    PollingComponent,
    Sensor,
    StateSignal,
};
pub use config::{
    Chip,
    Pins,
    SensorConfig,
    Value,
    validate,
};
pub use duration::UpdateInterval;
#[cfg(target_arch = "xtensa")]
pub use microphone::Microphone;
pub use registry::{
    Binding,
    Registry,
    setup_block,
    to_code,
};
pub use sensor::I2sRmsSensor;
pub use source::FrameSource;

/// StaticCell helper — allocates a value into a `static` exactly once.
#[macro_export]
macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        #[deny(unused_attributes)]
        let x = STATIC_CELL.uninit().write($val);
        x
    }};
}

#[cfg(target_arch = "xtensa")]
pub use board::*;

#[cfg(target_arch = "xtensa")]
mod board {
    use esp_hal::{
        assign_resources,
        clock::{
            Clock,
            CpuClock,
        },
        rom,
    };

    // ── Peripheral assignments ──────────────────────────────────────────────

    // The I2S pins are chosen by the sensor configuration, so only the
    // peripheral and its DMA channel are assigned here.
    assign_resources! {
        pub Resources<'d> {
            mic: MicResources<'d> {
                i2s: I2S0,
                dma: DMA_CH1,
            },
        }
    }

    // ── Board initialisation ────────────────────────────────────────────────

    /// Minimal CPU clock switcher for ESP32-S3.
    ///
    /// Steps through an intermediate frequency before reaching the target,
    /// which is required by the hardware.
    fn set_cpu_clock(cpu_clock_speed: CpuClock) {
        let _ = esp_hal::peripherals::SYSTEM::regs()
            .sysclk_conf()
            .modify(|_, w| unsafe { w.soc_clk_sel().bits(1) });
        let _ = esp_hal::peripherals::SYSTEM::regs()
            .cpu_per_conf()
            .modify(|_, w| unsafe {
                let _ = w.pll_freq_sel().set_bit();
                w.cpuperiod_sel().bits(match cpu_clock_speed {
                    CpuClock::_80MHz => 0,
                    CpuClock::_160MHz => 1,
                    CpuClock::_240MHz => 2,
                    _ => panic!("Unsupported CPU clock speed"),
                })
            });

        rom::ets_update_cpu_frequency_rom(cpu_clock_speed.frequency().as_mhz());
    }

    /// Initialise the chip and return the raw peripheral set.
    ///
    /// Call this once at the top of your `main`. Then use [`split_resources!`] to
    /// break the peripherals into typed resource groups.
    #[must_use]
    pub fn init() -> esp_hal::peripherals::Peripherals {
        set_cpu_clock(CpuClock::_160MHz);
        let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
        esp_hal::init(config)
    }

    impl From<esp_hal::peripherals::Peripherals> for Resources<'_> {
        fn from(peripherals: esp_hal::peripherals::Peripherals) -> Self {
            split_resources!(peripherals)
        }
    }
}
