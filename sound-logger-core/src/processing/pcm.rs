//! Sample-format helpers for sources that deliver float frames.

/// Downmix interleaved multi-channel audio to mono by averaging each frame.
pub fn downmix_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    let ch = channels as usize;
    samples
        .chunks_exact(ch)
        .map(|frame| frame.iter().sum::<f32>() / ch as f32)
        .collect()
}

/// Streaming linear-interpolation resampler for mono audio.
///
/// Keeps the fractional read position and the last input sample between
/// calls, so a stream fed in arbitrary chunk sizes yields the same samples
/// as one fed in a single call.
#[derive(Debug, Clone)]
pub struct LinearResampler {
    source_rate: u32,
    target_rate: u32,
    /// Position of the next output, in input samples from the start of the
    /// pending window (which begins with `last` when present).
    position: f64,
    last: Option<f32>,
}

impl LinearResampler {
    pub fn new(source_rate: u32, target_rate: u32) -> Self {
        Self {
            source_rate,
            target_rate,
            position: 0.0,
            last: None,
        }
    }

    pub fn source_rate(&self) -> u32 {
        self.source_rate
    }

    /// Forget stream position, e.g. after a gap in the input.
    pub fn reset(&mut self) {
        self.position = 0.0;
        self.last = None;
    }

    /// Resample the next chunk of the stream and append the output to `out`.
    /// Matching rates pass samples through unchanged.
    pub fn process(&mut self, samples: &[f32], out: &mut Vec<f32>) {
        if self.source_rate == self.target_rate || self.source_rate == 0 || self.target_rate == 0 {
            out.extend_from_slice(samples);
            return;
        }
        if samples.is_empty() {
            return;
        }

        let step = self.source_rate as f64 / self.target_rate as f64;
        let offset = usize::from(self.last.is_some());
        let window_len = samples.len() + offset;
        let at = |i: usize| -> f32 {
            match self.last {
                Some(last) if i == 0 => last,
                _ => samples[i - offset],
            }
        };

        loop {
            let index = self.position as usize;
            if index + 1 >= window_len {
                break;
            }
            let fraction = (self.position - index as f64) as f32;
            out.push(at(index) * (1.0 - fraction) + at(index + 1) * fraction);
            self.position += step;
        }

        // The last sample starts the next window.
        self.position -= (window_len - 1) as f64;
        self.last = samples.last().copied();
    }
}

/// Convert `[-1.0, 1.0]` floats to 16-bit PCM. Out-of-range values are clamped.
pub fn f32_to_i16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
        .collect()
}

/// Write samples as little-endian bytes. Returns the number of bytes written;
/// stops at the last whole sample that fits in `out`.
pub fn i16_to_le_bytes(samples: &[i16], out: &mut [u8]) -> usize {
    let mut written = 0;
    for (sample, dst) in samples.iter().zip(out.chunks_exact_mut(2)) {
        dst.copy_from_slice(&sample.to_le_bytes());
        written += 2;
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn downmix_stereo_to_mono() {
        let mono = downmix_to_mono(&[0.2, 0.8, 0.4, 0.6], 2);
        assert_eq!(mono.len(), 2);
        assert_abs_diff_eq!(mono[0], 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(mono[1], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn downmix_mono_passthrough() {
        let samples = vec![0.1, 0.2, 0.3];
        assert_eq!(downmix_to_mono(&samples, 1), samples);
    }

    fn resample(samples: &[f32], source_rate: u32, target_rate: u32) -> Vec<f32> {
        let mut out = Vec::new();
        LinearResampler::new(source_rate, target_rate).process(samples, &mut out);
        out
    }

    #[test]
    fn resample_same_rate_is_passthrough() {
        let samples = vec![1.0, 2.0, 3.0];
        assert_eq!(resample(&samples, 22050, 22050), samples);
    }

    #[test]
    fn resample_upsample_2x_interpolates() {
        let result = resample(&[0.0, 1.0, 0.0], 11025, 22050);
        assert_eq!(result.len(), 4);
        assert_abs_diff_eq!(result[1], 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(result[2], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(result[3], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn resample_downsample() {
        let samples: Vec<f32> = (0..100).map(|i| i as f32 / 100.0).collect();
        let result = resample(&samples, 44100, 22050);
        assert_eq!(result.len(), 50);
        assert_abs_diff_eq!(result[49], 0.98, epsilon = 1e-6);
    }

    #[test]
    fn chunked_stream_matches_single_call() {
        let samples: Vec<f32> = (0..4800).map(|i| (i as f32 * 0.01).sin()).collect();
        let whole = resample(&samples, 48000, 22050);

        let mut resampler = LinearResampler::new(48000, 22050);
        let mut chunked = Vec::new();
        for chunk in samples.chunks(480) {
            resampler.process(chunk, &mut chunked);
        }

        assert_eq!(chunked.len(), whole.len());
        for (a, b) in chunked.iter().zip(&whole) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-4);
        }
    }

    #[test]
    fn chunked_stream_keeps_exact_rate() {
        let mut resampler = LinearResampler::new(48000, 22050);
        let mut out = Vec::new();
        for _ in 0..100 {
            resampler.process(&[0.25; 480], &mut out);
        }
        assert_eq!(out.len(), 22050);
    }

    #[test]
    fn float_conversion_clamps() {
        assert_eq!(f32_to_i16(&[0.0, 1.0, -1.0, 2.0, -3.0]), vec![0, i16::MAX, -i16::MAX, i16::MAX, -i16::MAX]);
    }

    #[test]
    fn le_bytes_stop_at_whole_samples() {
        let mut out = [0u8; 5];
        let written = i16_to_le_bytes(&[0x0102, -2, 7], &mut out);
        assert_eq!(written, 4);
        assert_eq!(&out[..4], &[0x02, 0x01, 0xFE, 0xFF]);
    }
}
