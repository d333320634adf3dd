//! I2S microphone frame source for the ESP32-S3.
//!
//! The receiver runs in TDM Philips master mode with 16-bit stereo frames, so
//! the chip drives BCLK and WS and samples DATA. Pins are picked at runtime
//! from the validated sensor configuration.
//!
//! Uses async DMA for sample capture. A read that does not complete within
//! twice its own duration returns no samples instead of stalling the executor.

use embassy_time::{
    Duration,
    with_timeout,
};
use esp_hal::{
    Async,
    dma::DmaDescriptor,
    gpio::AnyPin,
    i2s::master::{
        Channels,
        Config,
        DataFormat,
        I2s,
        I2sRx,
    },
    time::Rate,
};

use crate::{
    MicResources,
    config::{
        Chip,
        Pins,
    },
    sensor::BLOCK_SAMPLES,
    source::{
        FrameSource,
        SourceError,
    },
};

/// Slack added to the expected duration of one DMA read.
const READ_MARGIN: Duration = Duration::from_millis(5);

/// I2S RX frame source, built on first start.
pub struct Microphone<'a> {
    res: Option<MicResources<'a>>,
    descriptors: Option<&'static mut [DmaDescriptor]>,
    rx: Option<I2sRx<'a, Async>>,
    running: bool,
    built_with: Option<(Pins, u32)>,
}

impl<'a> Microphone<'a> {
    /// Create a microphone from raw resources and a static descriptor slice.
    ///
    /// `descriptors` must be a `&'static mut` slice — use [`mk_static!`](crate::mk_static)
    /// or a static array.
    pub fn new(res: MicResources<'a>, descriptors: &'static mut [DmaDescriptor]) -> Self {
        Self {
            res: Some(res),
            descriptors: Some(descriptors),
            rx: None,
            running: false,
            built_with: None,
        }
    }

    fn build(&mut self, pins: Pins, sample_rate: u32) -> Result<I2sRx<'a, Async>, SourceError> {
        // `AnyPin::steal` panics on a GPIO the chip does not have, and the
        // resources are gone once taken, so check before touching either.
        if let Err(e) = pins.check(Chip::Esp32S3) {
            error!("I2S pins cannot be routed: {}", e);
            return Err(SourceError::Pins);
        }

        let (Some(res), Some(descriptors)) = (self.res.take(), self.descriptors.take()) else {
            return Err(SourceError::Driver);
        };

        let i2s = I2s::new(
            res.i2s,
            res.dma,
            Config::new_tdm_philips()
                .with_sample_rate(Rate::from_hz(sample_rate))
                .with_data_format(DataFormat::Data16Channel16)
                .with_channels(Channels::STEREO),
        )
        .map_err(|_| SourceError::Driver)?
        .into_async();

        // SAFETY: `Pins::check` above guarantees the pins exist on the chip
        // and are distinct, and the board assigns none of them to another
        // resource group.
        let (bclk, ws, din) = unsafe {
            (
                AnyPin::steal(pins.bclk),
                AnyPin::steal(pins.ws),
                AnyPin::steal(pins.data),
            )
        };

        Ok(i2s
            .i2s_rx
            .with_bclk(bclk)
            .with_ws(ws)
            .with_din(din)
            .build(descriptors))
    }
}

impl FrameSource for Microphone<'_> {
    fn start(&mut self, pins: Pins, sample_rate: u32) -> Result<(), SourceError> {
        if self.rx.is_none() {
            let rx = self.build(pins, sample_rate)?;
            self.rx = Some(rx);
            self.built_with = Some((pins, sample_rate));
        } else if self.built_with != Some((pins, sample_rate)) {
            // The peripheral is owned by the receiver once built.
            warn!("I2S RX already built, keeping the original pins and sample rate");
        }
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.running = false;
    }

    async fn read(&mut self, buf: &mut [i16]) -> Result<usize, SourceError> {
        let Some((_, sample_rate)) = self.built_with else {
            return Err(SourceError::NotStarted);
        };
        let samples = buf.len().min(BLOCK_SAMPLES);
        let frames = (samples as u64).div_ceil(u64::from(self.channels()));
        let expected = Duration::from_micros(frames * 1_000_000 / u64::from(sample_rate.max(1)));

        let rx = match self.rx.as_mut() {
            Some(rx) if self.running => rx,
            _ => return Err(SourceError::NotStarted),
        };
        let mut bytes = [0u8; BLOCK_SAMPLES * 2];
        let bytes = &mut bytes[..samples * 2];
        match with_timeout(expected * 2 + READ_MARGIN, rx.read_dma_async(bytes)).await {
            Ok(Ok(())) => {}
            Ok(Err(_)) => return Err(SourceError::Driver),
            Err(_) => {
                trace!("I2S read timed out");
                return Ok(0);
            }
        }

        for (sample, raw) in buf.iter_mut().zip(bytes.chunks_exact(2)) {
            *sample = i16::from_le_bytes([raw[0], raw[1]]);
        }
        Ok(samples)
    }
}
