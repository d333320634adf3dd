//! The I2S RMS loudness sensor.
//!
//! The I2S receiver is not started in [`Component::setup`]: nothing is
//! installed until [`I2sRmsSensor::start`] is called (or a
//! [`Control::Start`] arrives), so a board without a microphone attached
//! keeps running and simply reports silence.

use crate::{
    component::{
        Component,
        Control,
        PollingComponent,
        Sensor,
        SensorCore,
        StateSignal,
    },
    config::{
        DEFAULT_SAMPLE_RATE,
        DEFAULT_UPDATE_INTERVAL,
        Pins,
        SensorMeta,
    },
    duration::UpdateInterval,
    rms::{
        RmsAccumulator,
        loudness,
    },
    source::FrameSource,
};

/// Samples requested from the source per read.
pub const BLOCK_SAMPLES: usize = 1024;

/// Upper bound on full blocks read per update, keeps one update short.
pub const MAX_BLOCKS_PER_UPDATE: usize = 8;

/// Loudness sensor fed by an I2S microphone.
pub struct I2sRmsSensor<'a, S> {
    source: S,
    pins: Pins,
    sample_rate: u32,
    update_interval: UpdateInterval,
    started: bool,
    accumulator: RmsAccumulator,
    core: SensorCore<'a>,
}

impl<'a, S: FrameSource> I2sRmsSensor<'a, S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            pins: Pins::DEFAULT,
            sample_rate: DEFAULT_SAMPLE_RATE,
            update_interval: DEFAULT_UPDATE_INTERVAL,
            started: false,
            accumulator: RmsAccumulator::new(),
            core: SensorCore::new(SensorMeta::default()),
        }
    }

    pub fn set_pins(&mut self, bclk: u8, ws: u8, data: u8) {
        self.pins = Pins { bclk, ws, data };
    }

    pub fn pins(&self) -> Pins {
        self.pins
    }

    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        self.sample_rate = sample_rate;
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn set_meta(&mut self, meta: SensorMeta) {
        self.core.set_meta(meta);
    }

    /// Also publish readings to `sink`.
    pub fn set_sink(&mut self, sink: &'a StateSignal) {
        self.core.set_sink(sink);
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Install the I2S receiver. Does nothing when already running.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        match self.source.start(self.pins, self.sample_rate) {
            Ok(()) => {
                self.started = true;
                info!(
                    "I2S RX started: BCLK={}, WS={}, DATA={}",
                    self.pins.bclk,
                    self.pins.ws,
                    self.pins.data
                );
            }
            Err(e) => error!("I2S RX start failed: {}", e),
        }
    }

    /// Uninstall the I2S receiver. Does nothing when stopped.
    pub fn stop(&mut self) {
        if !self.started {
            return;
        }
        self.source.stop();
        self.started = false;
        info!("I2S RX stopped.");
    }

    /// Samples read in one update: the whole frames that fit in one update
    /// interval, at least one frame and at most [`MAX_BLOCKS_PER_UPDATE`]
    /// blocks. With [`UpdateInterval::Never`] one block.
    pub fn samples_per_update(&self) -> usize {
        let channels = u64::from(self.source.channels().max(1));
        let Some(interval_ms) = self.update_interval.as_millis() else {
            return BLOCK_SAMPLES;
        };
        let frames = u64::from(self.sample_rate) * u64::from(interval_ms) / 1000;
        let max_frames = (MAX_BLOCKS_PER_UPDATE * BLOCK_SAMPLES) as u64 / channels;
        (frames.clamp(1, max_frames) * channels) as usize
    }

    /// Read and accumulate [`samples_per_update`](Self::samples_per_update)
    /// samples, returning the loudness or `None` when nothing arrived.
    async fn sample(&mut self) -> Option<f32> {
        let mut buf = [0i16; BLOCK_SAMPLES];
        let mut remaining = self.samples_per_update();
        while remaining > 0 {
            let want = remaining.min(BLOCK_SAMPLES);
            match self.source.read(&mut buf[..want]).await {
                Ok(0) => break,
                Ok(n) => {
                    let n = n.min(want);
                    self.accumulator.push(&buf[..n]);
                    remaining -= n;
                }
                Err(e) => {
                    warn!("I2S read failed: {}", e);
                    break;
                }
            }
        }
        self.accumulator.finish().map(loudness)
    }
}

impl<S: FrameSource> Component for I2sRmsSensor<'_, S> {
    fn setup(&mut self) {
        info!("Deferred start: waiting for enable before installing I2S RX driver.");
    }

    fn dump_config(&self) {
        info!("I2S RMS Sensor (RX, deferred start)");
        info!("  Loudness '{}'", self.core.name());
        info!("  BCLK Pin: {}", self.pins.bclk);
        info!("  WS Pin: {}", self.pins.ws);
        info!("  DATA Pin: {}", self.pins.data);
        info!("  Sample Rate: {} Hz", self.sample_rate);
        info!("  Update Interval: {} ms", self.update_interval.to_raw_millis());
        info!("  Started: {}", if self.started { "yes" } else { "no" });
    }

    fn control(&mut self, command: Control) {
        match command {
            Control::Start => self.start(),
            Control::Stop => self.stop(),
        }
    }
}

impl<S: FrameSource> PollingComponent for I2sRmsSensor<'_, S> {
    async fn update(&mut self) {
        let state = if self.started {
            self.sample().await.unwrap_or(0.0)
        } else {
            0.0
        };
        self.publish_state(state);
    }

    fn update_interval(&self) -> UpdateInterval {
        self.update_interval
    }

    fn set_update_interval(&mut self, interval: UpdateInterval) {
        self.update_interval = interval;
    }
}

impl<'a, S> Sensor<'a> for I2sRmsSensor<'a, S> {
    fn core(&self) -> &SensorCore<'a> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SensorCore<'a> {
        &mut self.core
    }
}
