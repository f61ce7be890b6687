use std::io::{ErrorKind, Write};
use std::thread;

use crate::models::config::LoggerConfig;
use crate::pipeline::slots::SlotPair;

/// Capture writer loop: drains each ready slot into `out` and returns it to
/// the reader. Exits only after stop is requested, the reader has finished,
/// and the last ready slot has been written.
///
/// Returns the number of bytes that reached `out`.
pub fn run_writer<W: Write>(slots: &SlotPair, out: &mut W, config: &LoggerConfig) -> u64 {
    log::info!("Capture writer started");
    let mut bytes_written = 0u64;

    while let Some((index, slot)) = slots.take_ready(config.writer_idle_wait()) {
        let written = write_with_retry(out, slot.data(), config);
        bytes_written += written as u64;
        slots.release_drained(index, slot, written);
    }

    log::info!("Capture writer drained, {} bytes written", bytes_written);
    bytes_written
}

/// Write `data`, retrying transient failures with a pause between attempts.
///
/// Returns how many bytes were accepted, which is less than `data.len()` only
/// when every retry failed.
fn write_with_retry<W: Write>(out: &mut W, data: &[u8], config: &LoggerConfig) -> usize {
    let mut done = 0;
    let mut failures = 0;

    while done < data.len() {
        match out.write(&data[done..]) {
            Ok(0) => {
                failures += 1;
                log::error!("Storage accepted no bytes ({} of {} written)", done, data.len());
            }
            Ok(n) => done += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                failures += 1;
                log::error!("Failed to write audio data: {}", e);
            }
        }
        if failures > config.write_retries {
            log::error!(
                "Giving up on capture slot after {} failed writes, {} bytes lost",
                failures,
                data.len() - done
            );
            break;
        }
        if failures > 0 && done < data.len() {
            thread::sleep(config.error_backoff());
        }
    }
    done
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use crate::pipeline::slots::FillSlot;

    /// Accepts at most `chunk` bytes per call and fails the first `failures` calls.
    struct FlakySink {
        data: Vec<u8>,
        chunk: usize,
        failures: usize,
    }

    impl Write for FlakySink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.failures > 0 {
                self.failures -= 1;
                return Err(io::Error::new(ErrorKind::Other, "card busy"));
            }
            let n = buf.len().min(self.chunk);
            self.data.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn quick_config() -> LoggerConfig {
        LoggerConfig {
            error_backoff_ms: 0,
            writer_idle_wait_ms: 1,
            ..Default::default()
        }
    }

    #[test]
    fn transient_failures_are_retried() {
        let mut sink = FlakySink {
            data: Vec::new(),
            chunk: 3,
            failures: 2,
        };
        let written = write_with_retry(&mut sink, &[9; 10], &quick_config());
        assert_eq!(written, 10);
        assert_eq!(sink.data, vec![9; 10]);
    }

    #[test]
    fn persistent_failure_reports_partial_write() {
        let mut sink = FlakySink {
            data: Vec::new(),
            chunk: 4,
            failures: usize::MAX,
        };
        assert_eq!(write_with_retry(&mut sink, &[1; 8], &quick_config()), 0);
    }

    #[test]
    fn writer_drains_final_slot_after_stop() {
        let slots = SlotPair::new(8);
        let FillSlot { index, mut slot, .. } = slots.acquire_fill().unwrap();
        slot.buffer_mut()[..5].copy_from_slice(b"abcde");
        slots.record_read(5);
        slots.publish(index, slot, 5);
        slots.request_stop();
        slots.finish_reader();

        let mut out = Vec::new();
        let written = run_writer(&slots, &mut out, &quick_config());

        assert_eq!(written, 5);
        assert_eq!(out, b"abcde");
        assert_eq!(slots.stats().bytes_written, 5);
    }
}
