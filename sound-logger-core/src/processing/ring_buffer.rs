/// Fixed-capacity circular buffer of 16-bit PCM samples.
///
/// Bridges push-style audio callbacks and the pull-style `AudioSource`.
/// Wrap in `Arc<parking_lot::Mutex<RingBuffer>>` for cross-thread access.
///
/// Overflow behavior: drops oldest samples and counts them.
#[derive(Debug)]
pub struct RingBuffer {
    buffer: Box<[i16]>,
    write_index: usize,
    read_index: usize,
    available: usize,
    overflowed: u64,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0; capacity.max(1)].into_boxed_slice(),
            write_index: 0,
            read_index: 0,
            available: 0,
            overflowed: 0,
        }
    }

    /// Write samples into the ring buffer.
    ///
    /// If the buffer overflows, the oldest samples are dropped.
    /// If `samples` is larger than capacity, only the last `capacity` samples are kept.
    pub fn write(&mut self, samples: &[i16]) {
        if samples.is_empty() {
            return;
        }
        let capacity = self.capacity();

        let samples = if samples.len() > capacity {
            self.overflowed += (samples.len() - capacity) as u64;
            &samples[samples.len() - capacity..]
        } else {
            samples
        };

        let overflow = (self.available + samples.len()).saturating_sub(capacity);
        if overflow > 0 {
            self.read_index = (self.read_index + overflow) % capacity;
            self.available -= overflow;
            self.overflowed += overflow as u64;
        }

        for &sample in samples {
            self.buffer[self.write_index] = sample;
            self.write_index = (self.write_index + 1) % capacity;
        }
        self.available += samples.len();
    }

    /// Move up to `out.len()` samples into `out`. Returns how many were read.
    pub fn read_into(&mut self, out: &mut [i16]) -> usize {
        let to_read = out.len().min(self.available);
        let capacity = self.capacity();
        for slot in out.iter_mut().take(to_read) {
            *slot = self.buffer[self.read_index];
            self.read_index = (self.read_index + 1) % capacity;
        }
        self.available -= to_read;
        to_read
    }

    /// Number of samples currently available for reading.
    pub fn count(&self) -> usize {
        self.available
    }

    pub fn is_empty(&self) -> bool {
        self.available == 0
    }

    /// Total samples discarded by overflow since creation or the last reset.
    pub fn overflowed(&self) -> u64 {
        self.overflowed
    }

    /// Reset the buffer to empty state.
    pub fn reset(&mut self) {
        self.write_index = 0;
        self.read_index = 0;
        self.available = 0;
        self.overflowed = 0;
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}
