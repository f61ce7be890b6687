use std::thread;

use parking_lot::Mutex;

use crate::models::config::LoggerConfig;
use crate::pipeline::slots::{FillSlot, PublishOutcome, SlotPair};
use crate::traits::audio_source::AudioSource;

/// Marks the reader finished however its loop ends, so the writer can exit.
struct ReaderDone<'a>(&'a SlotPair);

impl Drop for ReaderDone<'_> {
    fn drop(&mut self) {
        self.0.finish_reader();
    }
}

/// Called once per counted drop. Only the reader discards slots, so every
/// value of the counter passes through here.
fn note_drop(slots: &SlotPair, config: &LoggerConfig) -> bool {
    let stats = slots.stats();
    let due = stats.dropped_frames % config.drop_log_interval == 0;
    if due {
        log::warn!(
            "Capture buffer full, dropped {}/{} frames",
            stats.dropped_frames,
            stats.total_reads
        );
    }
    due
}

/// Capture reader loop: one source read per iteration into whichever slot is
/// free, handed to the writer through `slots`. Runs until stop is requested;
/// the read in flight at that moment is still handed off.
pub fn run_reader<A: AudioSource>(source: &Mutex<A>, slots: &SlotPair, config: &LoggerConfig) {
    let _done = ReaderDone(slots);
    log::info!("Capture reader started");

    while let Some(FillSlot {
        index,
        mut slot,
        dropped_stale,
    }) = slots.acquire_fill()
    {
        if dropped_stale {
            note_drop(slots, config);
        }
        let result = source.lock().fill(slot.buffer_mut());
        match result {
            Ok(0) => {
                slots.record_read(0);
                slots.release_fill(index, slot);
                thread::sleep(config.idle_backoff());
            }
            Ok(len) => {
                let len = len.min(slot.capacity());
                slots.record_read(len);
                if slots.publish(index, slot, len) == PublishOutcome::DroppedStale {
                    note_drop(slots, config);
                }
            }
            Err(e) => {
                slots.record_read_error();
                slots.release_fill(index, slot);
                log::warn!("Audio source read failed: {}", e);
                thread::sleep(config.error_backoff());
            }
        }
    }

    let stats = slots.stats();
    log::info!(
        "Capture reader stopped. Dropped: {}/{} ({:.1}%)",
        stats.dropped_frames,
        stats.total_reads,
        stats.drop_ratio()
    );
}
