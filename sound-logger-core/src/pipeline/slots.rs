use std::mem;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use crate::models::error::LoggerError;
use crate::models::stats::PipelineStats;

/// One capture buffer: fixed capacity plus the number of valid bytes.
#[derive(Debug)]
pub struct BufferSlot {
    bytes: Box<[u8]>,
    valid_len: usize,
}

impl BufferSlot {
    fn new(capacity: usize) -> Self {
        Self {
            bytes: vec![0u8; capacity].into_boxed_slice(),
            valid_len: 0,
        }
    }

    /// The bytes captured by the last read into this slot.
    pub fn data(&self) -> &[u8] {
        &self.bytes[..self.valid_len]
    }

    pub fn valid_len(&self) -> usize {
        self.valid_len
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Whole buffer, for the reader to fill.
    pub fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

/// Who currently holds a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOwner {
    Free,
    Reader,
    Ready,
    Writer,
}

/// A cell either stores its slot (`Free`, `Ready`) or records which role has
/// moved it out (`Reader`, `Writer`).
#[derive(Debug)]
enum SlotCell {
    Free(BufferSlot),
    Ready(BufferSlot),
    Reader,
    Writer,
}

impl SlotCell {
    fn owner(&self) -> SlotOwner {
        match self {
            Self::Free(_) => SlotOwner::Free,
            Self::Ready(_) => SlotOwner::Ready,
            Self::Reader => SlotOwner::Reader,
            Self::Writer => SlotOwner::Writer,
        }
    }
}

/// Move a ready slot out of `cell`, leaving `holder` in its place.
/// Leaves the cell untouched if it is not ready.
fn take_if_ready(cell: &mut SlotCell, holder: SlotCell) -> Option<BufferSlot> {
    match mem::replace(cell, holder) {
        SlotCell::Ready(slot) => Some(slot),
        previous => {
            *cell = previous;
            None
        }
    }
}

#[derive(Debug)]
struct Handoff {
    cells: [SlotCell; 2],
    next_fill: usize,
    stop_requested: bool,
    reader_done: bool,
    stats: PipelineStats,
}

/// What `publish` did with the previous hand-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Delivered,
    /// The older ready slot had not been taken by the writer and was discarded.
    DroppedStale,
}

/// A slot taken by the reader for its next read.
#[derive(Debug)]
pub struct FillSlot {
    pub index: usize,
    pub slot: BufferSlot,
    /// Undelivered data was discarded to free this slot.
    pub dropped_stale: bool,
}

/// Two capture slots used in strict alternation by one reader and one writer.
///
/// Ownership moves with the storage: the reader and writer each hold the
/// `BufferSlot` itself while working on it, so neither can touch bytes the
/// other owns. At most one slot is `Ready` at a time, which makes the pair a
/// depth-1 channel between the two threads.
///
/// Drop policy: the reader never waits on the writer while recording. When
/// the writer has not consumed the ready slot by the time newer data is
/// available, the older ready data is discarded and counted. After a stop
/// request the ready slot is never discarded.
pub struct SlotPair {
    inner: Mutex<Handoff>,
    ready: Condvar,
    freed: Condvar,
    capacity: usize,
}

impl SlotPair {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Handoff {
                cells: [
                    SlotCell::Free(BufferSlot::new(capacity)),
                    SlotCell::Free(BufferSlot::new(capacity)),
                ],
                next_fill: 0,
                stop_requested: false,
                reader_done: false,
                stats: PipelineStats::default(),
            }),
            ready: Condvar::new(),
            freed: Condvar::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Prepare for a new session. Both slots must be back in the pair.
    pub fn reset(&self) -> Result<(), LoggerError> {
        let mut h = self.inner.lock();
        if h.cells.iter().any(|c| !matches!(c, SlotCell::Free(_))) {
            return Err(LoggerError::InvalidState(format!(
                "capture slots still in use: {:?}",
                [h.cells[0].owner(), h.cells[1].owner()]
            )));
        }
        h.next_fill = 0;
        h.stop_requested = false;
        h.reader_done = false;
        h.stats = PipelineStats::default();
        Ok(())
    }

    /// Ask both roles to wind down. Returns false if stop was already requested.
    pub fn request_stop(&self) -> bool {
        let mut h = self.inner.lock();
        let first = !h.stop_requested;
        h.stop_requested = true;
        drop(h);
        self.ready.notify_all();
        self.freed.notify_all();
        first
    }

    pub fn is_stop_requested(&self) -> bool {
        self.inner.lock().stop_requested
    }

    pub fn owners(&self) -> [SlotOwner; 2] {
        let h = self.inner.lock();
        [h.cells[0].owner(), h.cells[1].owner()]
    }

    pub fn stats(&self) -> PipelineStats {
        self.inner.lock().stats
    }

    // --- Reader side ---

    /// Take the slot the reader should fill next, or `None` once stop is requested.
    ///
    /// If the writer still holds the slot due for filling, the other slot
    /// (holding undelivered data) is reclaimed instead and counted as a drop.
    pub fn acquire_fill(&self) -> Option<FillSlot> {
        let mut h = self.inner.lock();
        if h.stop_requested {
            return None;
        }

        let index = match h.cells[h.next_fill].owner() {
            SlotOwner::Writer => 1 - h.next_fill,
            _ => h.next_fill,
        };
        let (slot, dropped_stale) = match mem::replace(&mut h.cells[index], SlotCell::Reader) {
            SlotCell::Free(slot) => (slot, false),
            SlotCell::Ready(mut slot) => {
                h.stats.dropped_frames += 1;
                h.stats.dropped_bytes += slot.valid_len as u64;
                slot.valid_len = 0;
                (slot, true)
            }
            previous => {
                log::error!("No capture slot available to the reader: {:?}", previous.owner());
                h.cells[index] = previous;
                return None;
            }
        };
        h.next_fill = index;
        Some(FillSlot {
            index,
            slot,
            dropped_stale,
        })
    }

    /// Account for one read call on the source.
    pub fn record_read(&self, len: usize) {
        let mut h = self.inner.lock();
        h.stats.total_reads += 1;
        h.stats.bytes_read += len as u64;
        if len == 0 {
            h.stats.empty_reads += 1;
        }
    }

    pub fn record_read_error(&self) {
        let mut h = self.inner.lock();
        h.stats.total_reads += 1;
        h.stats.read_errors += 1;
    }

    /// Return a slot without handing it to the writer (empty or failed read).
    pub fn release_fill(&self, index: usize, mut slot: BufferSlot) {
        slot.valid_len = 0;
        let mut h = self.inner.lock();
        h.cells[index] = SlotCell::Free(slot);
        drop(h);
        self.freed.notify_all();
    }

    /// Mark a filled slot ready for the writer and alternate.
    pub fn publish(&self, index: usize, mut slot: BufferSlot, len: usize) -> PublishOutcome {
        slot.valid_len = len.min(slot.capacity());
        let other = 1 - index;

        let mut h = self.inner.lock();
        let mut outcome = PublishOutcome::Delivered;
        if h.stop_requested {
            while h.cells[other].owner() == SlotOwner::Ready {
                self.freed.wait(&mut h);
            }
        } else if let Some(mut stale) = take_if_ready(&mut h.cells[other], SlotCell::Reader) {
            h.stats.dropped_frames += 1;
            h.stats.dropped_bytes += stale.valid_len as u64;
            stale.valid_len = 0;
            h.cells[other] = SlotCell::Free(stale);
            outcome = PublishOutcome::DroppedStale;
        }
        h.cells[index] = SlotCell::Ready(slot);
        h.next_fill = other;
        drop(h);
        self.ready.notify_all();
        outcome
    }

    /// Record that the reader has left its loop.
    pub fn finish_reader(&self) {
        self.inner.lock().reader_done = true;
        self.ready.notify_all();
    }

    // --- Writer side ---

    /// Take the ready slot, waiting up to `idle` at a time for one to appear.
    ///
    /// Returns `None` only when stop was requested, the reader has exited and
    /// no slot is ready, so the last hand-off is always drained.
    pub fn take_ready(&self, idle: Duration) -> Option<(usize, BufferSlot)> {
        let mut h = self.inner.lock();
        loop {
            for index in 0..2 {
                if let Some(slot) = take_if_ready(&mut h.cells[index], SlotCell::Writer) {
                    return Some((index, slot));
                }
            }
            if h.stop_requested && h.reader_done {
                return None;
            }
            self.ready.wait_for(&mut h, idle);
        }
    }

    /// Return a drained slot. `written` is how many of its bytes reached storage.
    pub fn release_drained(&self, index: usize, mut slot: BufferSlot, written: usize) {
        let lost = slot.valid_len.saturating_sub(written);
        slot.valid_len = 0;

        let mut h = self.inner.lock();
        h.stats.bytes_written += written as u64;
        if lost > 0 {
            h.stats.write_errors += 1;
            h.stats.lost_bytes += lost as u64;
        }
        h.cells[index] = SlotCell::Free(slot);
        drop(h);
        self.freed.notify_all();
    }
}
