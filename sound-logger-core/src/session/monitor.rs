use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crate::models::state::RecorderState;
use crate::session::recorder::Recorder;
use crate::traits::audio_source::AudioSource;
use crate::traits::signal_source::SignalSource;
use crate::traits::storage::Storage;

/// Control loop: samples the inputs every `poll_interval_ms` and feeds them to
/// the recorder. Never touches audio data, so a slow SD card cannot delay it.
pub struct Monitor<I: SignalSource, A: AudioSource + 'static, S: Storage + 'static> {
    signals: I,
    recorder: Recorder<A, S>,
}

impl<I: SignalSource, A: AudioSource + 'static, S: Storage + 'static> Monitor<I, A, S> {
    pub fn new(signals: I, recorder: Recorder<A, S>) -> Self {
        Self { signals, recorder }
    }

    pub fn recorder(&self) -> &Recorder<A, S> {
        &self.recorder
    }

    pub fn recorder_mut(&mut self) -> &mut Recorder<A, S> {
        &mut self.recorder
    }

    pub fn into_recorder(self) -> Recorder<A, S> {
        self.recorder
    }

    /// One polling iteration. A failed start is reported by the recorder and
    /// retried on a later tick.
    pub fn tick(&mut self) -> RecorderState {
        let signals = self.signals.sample();
        match self.recorder.evaluate(signals) {
            Ok(state) => state,
            Err(_) => self.recorder.state(),
        }
    }

    /// Poll until `running` is cleared, then finalize any recording in flight.
    pub fn run(&mut self, running: &AtomicBool) {
        let interval = self.recorder.config().poll_interval();
        log::info!("Monitor started, polling every {:?}", interval);

        while running.load(Ordering::SeqCst) {
            self.tick();
            thread::sleep(interval);
        }

        log::info!("Monitor stopping");
        self.recorder.shutdown();
    }
}
