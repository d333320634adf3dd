//! Where PCM samples come from.

use core::fmt;

use crate::config::Pins;

/// Error reported by a [`FrameSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SourceError {
    /// `read` was called before a successful `start`.
    NotStarted,
    /// The I2S driver or its DMA channel failed.
    Driver,
    /// The pins could not be routed to the peripheral.
    Pins,
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::NotStarted => f.write_str("source not started"),
            SourceError::Driver => f.write_str("I2S driver error"),
            SourceError::Pins => f.write_str("I2S pin routing failed"),
        }
    }
}

impl core::error::Error for SourceError {}

/// A receiver of signed 16-bit PCM samples, usually an I2S RX unit.
///
/// Stereo sources deliver interleaved right/left samples. Reads are async so a
/// receiver waiting on DMA never stalls the executor.
#[allow(async_fn_in_trait)]
pub trait FrameSource {
    /// Bring up the receiver on `pins` at `sample_rate` Hz.
    fn start(&mut self, pins: Pins, sample_rate: u32) -> Result<(), SourceError>;

    /// Shut the receiver down. Does nothing when already stopped.
    fn stop(&mut self);

    /// Read up to `buf.len()` samples, returning how many were written.
    ///
    /// `Ok(0)` means no data arrived in time.
    async fn read(&mut self, buf: &mut [i16]) -> Result<usize, SourceError>;

    /// Interleaved channels per frame.
    fn channels(&self) -> u32 {
        2
    }
}

impl<T: FrameSource + ?Sized> FrameSource for &mut T {
    fn start(&mut self, pins: Pins, sample_rate: u32) -> Result<(), SourceError> {
        (**self).start(pins, sample_rate)
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    async fn read(&mut self, buf: &mut [i16]) -> Result<usize, SourceError> {
        (**self).read(buf).await
    }

    fn channels(&self) -> u32 {
        (**self).channels()
    }
}
