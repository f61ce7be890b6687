//! Push-to-pull bridge between a callback-driven audio device and the
//! capture reader.

use std::sync::Arc;

use parking_lot::Mutex;

use sound_logger_core::models::error::LoggerError;
use sound_logger_core::processing::pcm::{self, LinearResampler};
use sound_logger_core::processing::ring_buffer::RingBuffer;
use sound_logger_core::traits::audio_source::AudioSource;

struct Intake {
    ring: RingBuffer,
    resampler: LinearResampler,
}

/// Cloneable handle to a shared mono i16 ring buffer at the logger rate.
///
/// The device callback calls `push`; the recorder owns a clone and drains it
/// through `AudioSource::fill`. When nothing drains it (recorder idle) the
/// oldest samples are overwritten.
#[derive(Clone)]
pub struct BufferedSource {
    intake: Arc<Mutex<Intake>>,
    sample_rate: u32,
}

impl BufferedSource {
    /// Buffer holding `seconds` of audio at `sample_rate`.
    pub fn new(sample_rate: u32, seconds: f32) -> Self {
        let capacity = (sample_rate as f32 * seconds.max(0.0)) as usize;
        Self {
            intake: Arc::new(Mutex::new(Intake {
                ring: RingBuffer::new(capacity),
                resampler: LinearResampler::new(sample_rate, sample_rate),
            })),
            sample_rate,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Append interleaved float frames captured at `rate` with `channels`.
    ///
    /// Successive calls are treated as one continuous stream; a change of
    /// `rate` starts a new one.
    pub fn push(&self, samples: &[f32], rate: u32, channels: u16) {
        let mono = pcm::downmix_to_mono(samples, channels);
        let mut intake = self.intake.lock();
        if intake.resampler.source_rate() != rate {
            intake.resampler = LinearResampler::new(rate, self.sample_rate);
        }
        let mut resampled = Vec::with_capacity(mono.len());
        intake.resampler.process(&mono, &mut resampled);
        intake.ring.write(&pcm::f32_to_i16(&resampled));
    }

    /// Samples waiting to be read.
    pub fn available(&self) -> usize {
        self.intake.lock().ring.count()
    }

    /// Samples lost to overflow since the last `clear`.
    pub fn overflowed(&self) -> u64 {
        self.intake.lock().ring.overflowed()
    }

    /// Discard buffered audio, e.g. stale audio from before a recording.
    pub fn clear(&self) {
        let mut intake = self.intake.lock();
        intake.ring.reset();
        intake.resampler.reset();
    }
}

impl AudioSource for BufferedSource {
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize, LoggerError> {
        let mut samples = vec![0i16; buf.len() / 2];
        let count = self.intake.lock().ring.read_into(&mut samples);
        Ok(pcm::i16_to_le_bytes(&samples[..count], buf))
    }
}
