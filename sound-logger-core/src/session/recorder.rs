use std::io::Write;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::models::config::LoggerConfig;
use crate::models::error::LoggerError;
use crate::models::indicator::IndicatorRequest;
use crate::models::recording_result::RecordingResult;
use crate::models::signals::TriggerState;
use crate::models::state::RecorderState;
use crate::models::stats::PipelineStats;
use crate::pipeline::reader::run_reader;
use crate::pipeline::slots::SlotPair;
use crate::pipeline::writer::run_writer;
use crate::processing::wav_format::WAV_HEADER_SIZE;
use crate::session::finalizer::Finalizer;
use crate::session::naming;
use crate::session::recording::RecordingSession;
use crate::storage::fs_storage::FsStorage;
use crate::storage::index_store::{IndexLoad, IndexStore};
use crate::traits::audio_source::AudioSource;
use crate::traits::clock::{Clock, SystemClock};
use crate::traits::recorder_delegate::RecorderDelegate;
use crate::traits::status_indicator::StatusIndicator;
use crate::traits::storage::Storage;

/// Mutable recorder state shared with the capture writer thread.
struct Shared {
    state: RecorderState,
    last_sequence: u32,
    last_result: Option<RecordingResult>,
    last_error: Option<LoggerError>,
    /// Inputs of the latest `evaluate`, for the indicator after finalization.
    signals: TriggerState,
}

struct SharedState {
    inner: Mutex<Shared>,
    idle: Condvar,
    /// Last request sent to the indicator. Held while deciding and sending,
    /// so updates from the monitor and the writer thread stay ordered.
    shown: Mutex<Option<IndicatorRequest>>,
}

fn show_if_changed(shown: &mut Option<IndicatorRequest>, indicator: &dyn StatusIndicator, request: IndicatorRequest) {
    if *shown != Some(request) {
        indicator.show(request);
        *shown = Some(request);
    }
}

/// Recording lifecycle state machine.
///
/// Fed one `TriggerState` per polling tick through `evaluate`. Starts a
/// capture reader and writer when both inputs are asserted, requests a
/// cooperative stop as soon as either drops, and returns to `Idle` only after
/// the writer has drained the last slot and the finalizer has run.
///
/// ```text
/// [AudioSource] → capture-reader → [SlotPair] → capture-writer → temp file
///                                                      ↓ (after drain)
///                                   Finalizer → rec_NNNN_mm-ss.wav + index
/// ```
///
/// The two slots are allocated once and reused by every recording.
pub struct Recorder<A: AudioSource + 'static, S: Storage + 'static> {
    config: LoggerConfig,
    source: Arc<Mutex<A>>,
    storage: Arc<S>,
    index: Arc<IndexStore<S>>,
    slots: Arc<SlotPair>,
    shared: Arc<SharedState>,
    clock: Arc<dyn Clock>,
    indicator: Option<Arc<dyn StatusIndicator>>,
    delegate: Option<Arc<dyn RecorderDelegate>>,

    reader_handle: Option<thread::JoinHandle<()>>,
    writer_handle: Option<thread::JoinHandle<()>>,
}

impl<A: AudioSource + 'static> Recorder<A, FsStorage> {
    /// Recorder writing into `config.output_directory`.
    pub fn open(config: LoggerConfig, source: A) -> Result<Self, LoggerError> {
        let storage = FsStorage::new(&config.output_directory)?;
        Self::new(config, source, storage)
    }
}

impl<A: AudioSource + 'static, S: Storage + 'static> Recorder<A, S> {
    /// Validate `config` and load the last used sequence number.
    pub fn new(config: LoggerConfig, source: A, storage: S) -> Result<Self, LoggerError> {
        config.validate().map_err(LoggerError::ConfigurationFailed)?;

        let storage = Arc::new(storage);
        let index = Arc::new(IndexStore::new(Arc::clone(&storage), config.index_file_name.clone()));
        let last_sequence = match index.load() {
            IndexLoad::Loaded(n) => {
                log::info!("Last index loaded: {}", n);
                n
            }
            IndexLoad::Missing => {
                log::info!("No index file, starting from 0");
                0
            }
            IndexLoad::Corrupt(reason) => {
                log::warn!("Unreadable index file ({}), starting from 0", reason);
                0
            }
        };

        Ok(Self {
            slots: Arc::new(SlotPair::new(config.slot_capacity)),
            config,
            source: Arc::new(Mutex::new(source)),
            storage,
            index,
            shared: Arc::new(SharedState {
                inner: Mutex::new(Shared {
                    state: RecorderState::Idle,
                    last_sequence,
                    last_result: None,
                    last_error: None,
                    signals: TriggerState::default(),
                }),
                idle: Condvar::new(),
                shown: Mutex::new(None),
            }),
            clock: Arc::new(SystemClock),
            indicator: None,
            delegate: None,
            reader_handle: None,
            writer_handle: None,
        })
    }

    pub fn set_indicator(&mut self, indicator: Arc<dyn StatusIndicator>) {
        self.indicator = Some(indicator);
        *self.shared.shown.lock() = None;
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn RecorderDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn set_clock(&mut self, clock: Arc<dyn Clock>) {
        self.clock = clock;
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    pub fn state(&self) -> RecorderState {
        self.shared.inner.lock().state
    }

    /// Sequence number of the last successfully finalized recording.
    pub fn last_sequence(&self) -> u32 {
        self.shared.inner.lock().last_sequence
    }

    pub fn last_result(&self) -> Option<RecordingResult> {
        self.shared.inner.lock().last_result.clone()
    }

    pub fn last_error(&self) -> Option<LoggerError> {
        self.shared.inner.lock().last_error.clone()
    }

    /// Counters of the current (or most recent) capture session.
    pub fn stats(&self) -> PipelineStats {
        self.slots.stats()
    }

    /// Apply one sampled input pair. Returns the state after the transition.
    ///
    /// A start failure leaves the recorder `Idle` and is returned as an error;
    /// the next tick may try again.
    pub fn evaluate(&mut self, signals: TriggerState) -> Result<RecorderState, LoggerError> {
        let current = {
            let mut s = self.shared.inner.lock();
            s.signals = signals;
            s.state
        };
        if current.is_idle() && signals.should_record() {
            // The previous writer may still be updating the indicator.
            self.reap_pipeline();
        }

        let shared = Arc::clone(&self.shared);
        let mut shown = shared.shown.lock();
        let (state, result) = match current {
            RecorderState::Idle if signals.should_record() => match self.start_recording() {
                Ok(sequence) => (RecorderState::Recording { sequence }, Ok(())),
                Err(e) => (RecorderState::Idle, Err(e)),
            },
            RecorderState::Recording { sequence } if !signals.should_record() => {
                self.request_stop(sequence);
                (RecorderState::Stopping { sequence }, Ok(()))
            }
            _ => (self.state(), Ok(())),
        };
        if let Some(ref indicator) = self.indicator {
            show_if_changed(&mut shown, indicator.as_ref(), IndicatorRequest::for_state(&state, &signals));
        }
        drop(shown);

        if let Err(ref e) = result {
            log::error!("Failed to start recording: {}", e);
            self.shared.inner.lock().last_error = Some(e.clone());
            if let Some(ref delegate) = self.delegate {
                delegate.on_error(e);
            }
        }
        result.map(|()| state)
    }

    /// Block until the recorder is `Idle` or `timeout` elapses.
    pub fn wait_until_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        {
            let mut s = self.shared.inner.lock();
            while !s.state.is_idle() {
                if self.shared.idle.wait_until(&mut s, deadline).timed_out() {
                    return s.state.is_idle();
                }
            }
        }
        self.reap_pipeline();
        true
    }

    /// Stop any recording in flight and wait for it to be finalized.
    pub fn shutdown(&mut self) {
        if let RecorderState::Recording { sequence } = self.state() {
            self.request_stop(sequence);
        }
        self.reap_pipeline();
    }

    // --- Internal helpers ---

    fn set_state(&self, new_state: RecorderState) {
        self.shared.inner.lock().state = new_state;
        if let Some(ref delegate) = self.delegate {
            delegate.on_state_changed(&new_state);
        }
    }

    /// Move to `Stopping` and ask the pipeline to wind down. The writer
    /// thread moves the state on to `Idle` once finalization is done.
    fn request_stop(&self, sequence: u32) {
        self.set_state(RecorderState::Stopping { sequence });
        if self.slots.request_stop() {
            log::info!("Requesting stop of recording {}", sequence);
        }
    }

    /// Join pipeline threads. Blocks until a session in flight is finalized.
    fn reap_pipeline(&mut self) {
        for handle in [self.reader_handle.take(), self.writer_handle.take()].into_iter().flatten() {
            if handle.join().is_err() {
                log::error!("Capture thread panicked");
            }
        }
    }

    fn start_recording(&mut self) -> Result<u32, LoggerError> {
        let sequence = self
            .last_sequence()
            .checked_add(1)
            .ok_or_else(|| LoggerError::InvalidState("sequence numbers exhausted".into()))?;
        let temp_name = naming::temp_file_name(sequence);
        log::info!("Starting recording: {}", self.storage.path_of(&temp_name).display());

        if self.storage.exists(&temp_name) {
            self.clear_leftover(sequence, &temp_name)?;
        }

        let mut file = self.storage.create(&temp_name)?;
        if let Err(e) = file.write_all(&[0u8; WAV_HEADER_SIZE]).and_then(|()| file.flush()) {
            drop(file);
            if let Err(rm) = self.storage.remove(&temp_name) {
                log::warn!("Could not remove {}: {}", temp_name, rm);
            }
            return Err(LoggerError::StorageError(format!("failed to write placeholder header: {}", e)));
        }

        self.slots.reset()?;
        let session = RecordingSession::new(sequence, temp_name, file, self.clock.now());

        self.set_state(RecorderState::Recording { sequence });
        if let Err(e) = self.spawn_pipeline(session) {
            self.slots.request_stop();
            self.reap_pipeline();
            self.set_state(RecorderState::Idle);
            return Err(e);
        }
        Ok(sequence)
    }

    /// Move the temp file of an abandoned session out of the way of a new
    /// recording that reuses its sequence number. A file holding no audio is
    /// deleted; anything else is kept under an orphan name.
    fn clear_leftover(&self, sequence: u32, temp_name: &str) -> Result<(), LoggerError> {
        if let Ok(size) = self.storage.size(temp_name) {
            if size <= WAV_HEADER_SIZE as u64 {
                log::info!("Removing empty leftover {}", temp_name);
                return self.storage.remove(temp_name);
            }
        }
        let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S").to_string();
        let orphan = naming::orphan_file_name(sequence, &stamp);
        log::warn!("Found leftover {}, keeping it as {}", temp_name, orphan);
        self.storage.rename(temp_name, &orphan)
    }

    /// Start the capture reader and writer threads for `session`.
    fn spawn_pipeline(&mut self, mut session: RecordingSession<S::File>) -> Result<(), LoggerError> {
        let source = Arc::clone(&self.source);
        let slots = Arc::clone(&self.slots);
        let config = self.config.clone();

        let reader = thread::Builder::new()
            .name("capture-reader".into())
            .spawn(move || run_reader(&source, &slots, &config))
            .map_err(|e| LoggerError::InvalidState(format!("failed to spawn reader thread: {}", e)))?;
        self.reader_handle = Some(reader);

        let slots = Arc::clone(&self.slots);
        let config = self.config.clone();
        let finalizer = Finalizer::new(Arc::clone(&self.storage), Arc::clone(&self.index), &self.config);
        let shared = Arc::clone(&self.shared);
        let delegate = self.delegate.clone();
        let indicator = self.indicator.clone();
        let clock = Arc::clone(&self.clock);

        let writer = thread::Builder::new()
            .name("capture-writer".into())
            .spawn(move || {
                session.bytes_written = run_writer(&slots, &mut session.file, &config);
                let outcome = finalizer.finalize(session, clock.now(), slots.stats());

                {
                    let mut s = shared.inner.lock();
                    match &outcome {
                        Ok(result) => {
                            s.last_sequence = result.sequence;
                            s.last_result = Some(result.clone());
                        }
                        Err(e) => {
                            log::error!("Recording abandoned: {}", e);
                            s.last_error = Some(e.clone());
                        }
                    }
                    s.state = RecorderState::Idle;
                }
                if let Some(ref indicator) = indicator {
                    let mut shown = shared.shown.lock();
                    let signals = shared.inner.lock().signals;
                    let request = IndicatorRequest::for_state(&RecorderState::Idle, &signals);
                    show_if_changed(&mut shown, indicator.as_ref(), request);
                }
                shared.idle.notify_all();

                if let Some(ref d) = delegate {
                    match &outcome {
                        Ok(result) => d.on_recording_finished(result),
                        Err(e) => d.on_error(e),
                    }
                    d.on_state_changed(&RecorderState::Idle);
                }
            })
            .map_err(|e| LoggerError::InvalidState(format!("failed to spawn writer thread: {}", e)))?;
        self.writer_handle = Some(writer);

        Ok(())
    }
}

impl<A: AudioSource + 'static, S: Storage + 'static> Drop for Recorder<A, S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
