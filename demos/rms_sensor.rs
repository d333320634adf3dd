//! Binds an I2S RMS sensor from a configuration block, starts it after a
//! short delay and logs every published loudness reading.

#![no_std]
#![no_main]

use defmt::{
    error,
    info,
};
use embassy_executor::Spawner;
use embassy_time::{
    Duration,
    Timer,
};
use esp_backtrace as _;
use esp_hal::{
    dma::DmaDescriptor,
    timer::timg::TimerGroup,
};
use esp_println as _;
#[allow(clippy::wildcard_imports)]
use i2s_rms::*;

extern crate alloc;

esp_bootloader_esp_idf::esp_app_desc!();

type MicSensor = I2sRmsSensor<'static, Microphone<'static>>;

static LOUDNESS: StateSignal = StateSignal::new();
static CONTROL: ControlSignal = ControlSignal::new();

#[embassy_executor::task]
async fn sensor_task(sensor: &'static mut MicSensor) {
    i2s_rms::component::run(sensor, &CONTROL).await
}

#[embassy_executor::task]
async fn report_task() {
    loop {
        let level = LOUDNESS.wait().await;
        info!("Loudness: {}", level);
    }
}

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    let peripherals = i2s_rms::init();
    let resources = split_resources!(peripherals);

    esp_alloc::heap_allocator!(size: 64 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let descriptors = mk_static!([DmaDescriptor; 8], [DmaDescriptor::EMPTY; 8]);

    let block = [
        ("id", Value::Str("room_loudness")),
        ("name", Value::Str("Room loudness")),
        ("update_interval", Value::Str("100ms")),
        ("sample_rate", Value::Int(16_000)),
        ("pin_bclk", Value::Int(46)),
        ("pin_ws", Value::Int(8)),
        ("pin_data", Value::Int(3)),
    ];

    let mut registry = Registry::<1>::new();
    let sensor = match setup_block(&block, Chip::Esp32S3, &mut registry, || {
        Microphone::new(resources.mic, descriptors)
    }) {
        Ok(Binding::Created(sensor, _)) => sensor,
        Ok(Binding::Existing(index)) => panic!("slot {} already bound", index),
        Err(e) => {
            error!("Sensor setup failed: {}", e);
            loop {
                Timer::after(Duration::from_secs(600)).await;
            }
        }
    };

    let sensor = mk_static!(MicSensor, sensor);
    sensor.set_sink(&LOUDNESS);

    spawner.must_spawn(sensor_task(sensor));
    spawner.must_spawn(report_task());

    Timer::after(Duration::from_secs(1)).await;
    CONTROL.signal(Control::Start);

    loop {
        Timer::after(Duration::from_secs(600)).await;
    }
}
