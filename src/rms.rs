//! RMS accumulation over 16-bit PCM blocks.

/// Full scale of a signed 16-bit sample.
pub const FULL_SCALE: f64 = 32_768.0;

/// Gain applied to the normalised RMS before clamping.
pub const LOUDNESS_GAIN: f32 = 2.0;

/// Running sum of squares across one or more sample blocks.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RmsAccumulator {
    sum_of_squares: f64,
    count: u32,
}

impl RmsAccumulator {
    pub const fn new() -> Self {
        Self {
            sum_of_squares: 0.0,
            count: 0,
        }
    }

    /// Add one block of samples.
    pub fn push(&mut self, block: &[i16]) {
        for &sample in block {
            let s = f64::from(sample);
            self.sum_of_squares += s * s;
        }
        self.count = self.count.saturating_add(block.len() as u32);
    }

    /// Number of samples accumulated since the last [`finish`](Self::finish).
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// RMS normalised to `0.0..=1.0` of full scale, then reset.
    ///
    /// Returns `None` when nothing was pushed.
    pub fn finish(&mut self) -> Option<f32> {
        if self.count == 0 {
            return None;
        }
        let mean = self.sum_of_squares / f64::from(self.count);
        *self = Self::new();
        Some((libm::sqrt(mean) / FULL_SCALE) as f32)
    }
}

/// Map a normalised RMS value to the published loudness.
pub fn loudness(rms: f32) -> f32 {
    (rms * LOUDNESS_GAIN).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn empty_accumulator_yields_nothing() {
        let mut acc = RmsAccumulator::new();
        acc.push(&[]);
        assert!(acc.is_empty());
        assert_eq!(acc.finish(), None);
    }

    #[test]
    fn silence_is_zero() {
        let mut acc = RmsAccumulator::new();
        acc.push(&[0; 256]);
        assert_eq!(acc.finish(), Some(0.0));
    }

    #[test]
    fn square_wave_rms_equals_amplitude() {
        let block: [i16; 8] = [8192, -8192, 8192, -8192, 8192, -8192, 8192, -8192];
        let mut acc = RmsAccumulator::new();
        acc.push(&block);
        let rms = acc.finish().unwrap();
        assert!(close(rms, 0.25));
        assert!(close(loudness(rms), 0.5));
    }

    #[test]
    fn state_carries_across_blocks_and_resets() {
        let mut acc = RmsAccumulator::new();
        acc.push(&[16384; 4]);
        acc.push(&[0; 4]);
        assert_eq!(acc.count(), 8);
        // mean square is half of 16384^2
        let rms = acc.finish().unwrap();
        assert!(close(rms, 0.5 / core::f32::consts::SQRT_2));
        assert!(acc.is_empty());
    }

    #[test]
    fn loudness_is_clamped() {
        let mut acc = RmsAccumulator::new();
        acc.push(&[i16::MIN, i16::MAX]);
        let rms = acc.finish().unwrap();
        assert!(rms > 0.99);
        assert_eq!(loudness(rms), 1.0);
        assert_eq!(loudness(0.1), 0.2);
    }
}
