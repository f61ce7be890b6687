//! Fakes shared by the session tests.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::models::error::LoggerError;
use crate::models::indicator::IndicatorRequest;
use crate::models::recording_result::RecordingResult;
use crate::models::signals::TriggerState;
use crate::models::state::RecorderState;
use crate::processing::wav_format::WAV_HEADER_SIZE;
use crate::storage::fs_storage::FsStorage;
use crate::traits::audio_source::AudioSource;
use crate::traits::clock::Clock;
use crate::traits::recorder_delegate::RecorderDelegate;
use crate::traits::signal_source::SignalSource;
use crate::traits::status_indicator::StatusIndicator;
use crate::traits::storage::Storage;

/// Deterministic non-silent payload of `len` bytes.
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

fn injected(what: &str) -> LoggerError {
    LoggerError::StorageError(format!("injected {} failure", what))
}

/// `FsStorage` with switchable failures.
pub struct FaultyStorage {
    inner: FsStorage,
    renames: AtomicBool,
    patches: AtomicBool,
    index_writes: AtomicBool,
    creates: AtomicBool,
}

impl FaultyStorage {
    pub fn new(inner: FsStorage) -> Self {
        Self {
            inner,
            renames: AtomicBool::new(false),
            patches: AtomicBool::new(false),
            index_writes: AtomicBool::new(false),
            creates: AtomicBool::new(false),
        }
    }

    pub fn fail_renames(&self, fail: bool) {
        self.renames.store(fail, Ordering::SeqCst);
    }

    pub fn fail_patches(&self, fail: bool) {
        self.patches.store(fail, Ordering::SeqCst);
    }

    pub fn fail_index_writes(&self, fail: bool) {
        self.index_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_creates(&self, fail: bool) {
        self.creates.store(fail, Ordering::SeqCst);
    }
}

impl Storage for FaultyStorage {
    type File = std::fs::File;

    fn create(&self, name: &str) -> Result<Self::File, LoggerError> {
        if self.creates.load(Ordering::SeqCst) {
            return Err(injected("create"));
        }
        self.inner.create(name)
    }

    fn patch(&self, name: &str, offset: u64, bytes: &[u8]) -> Result<(), LoggerError> {
        if self.patches.load(Ordering::SeqCst) {
            return Err(injected("patch"));
        }
        self.inner.patch(name, offset, bytes)
    }

    fn rename(&self, from: &str, to: &str) -> Result<(), LoggerError> {
        if self.renames.load(Ordering::SeqCst) {
            return Err(injected("rename"));
        }
        self.inner.rename(from, to)
    }

    fn remove(&self, name: &str) -> Result<(), LoggerError> {
        self.inner.remove(name)
    }

    fn exists(&self, name: &str) -> bool {
        self.inner.exists(name)
    }

    fn size(&self, name: &str) -> Result<u64, LoggerError> {
        self.inner.size(name)
    }

    fn read_to_string(&self, name: &str) -> Result<String, LoggerError> {
        self.inner.read_to_string(name)
    }

    fn write_string(&self, name: &str, contents: &str) -> Result<(), LoggerError> {
        if self.index_writes.load(Ordering::SeqCst) {
            return Err(injected("write"));
        }
        self.inner.write_string(name, contents)
    }

    fn path_of(&self, name: &str) -> PathBuf {
        self.inner.path_of(name)
    }
}

/// Hands out queued chunks, then reports no data.
pub struct ScriptedSource {
    chunks: VecDeque<Result<Vec<u8>, LoggerError>>,
}

impl ScriptedSource {
    pub fn new(chunks: Vec<Result<Vec<u8>, LoggerError>>) -> Self {
        Self { chunks: chunks.into() }
    }

    pub fn repeating(chunk: Vec<u8>, times: usize) -> Self {
        Self::new((0..times).map(|_| Ok(chunk.clone())).collect())
    }
}

impl AudioSource for ScriptedSource {
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize, LoggerError> {
        match self.chunks.pop_front() {
            Some(Ok(chunk)) => {
                let n = chunk.len().min(buf.len());
                buf[..n].copy_from_slice(&chunk[..n]);
                Ok(n)
            }
            Some(Err(e)) => Err(e),
            None => Ok(0),
        }
    }
}

/// Emits `payload` in chunks, each only after the previous one reached the
/// watched file, so the writer never falls behind.
pub struct LockstepSource {
    watch: PathBuf,
    payload: Vec<u8>,
    chunk: usize,
    emitted: usize,
}

impl LockstepSource {
    pub fn new(watch: PathBuf, payload: Vec<u8>, chunk: usize) -> Self {
        Self {
            watch,
            payload,
            chunk,
            emitted: 0,
        }
    }

    pub fn progress(&self) -> Progress {
        Progress::new(self.watch.clone())
    }

    fn file_holds(&self, bytes: usize, timeout: Duration) -> bool {
        self.progress().wait_for(bytes, timeout)
    }
}

impl AudioSource for LockstepSource {
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize, LoggerError> {
        if self.emitted == self.payload.len() {
            return Ok(0);
        }
        if !self.file_holds(self.emitted, Duration::from_secs(2)) {
            return Ok(0);
        }
        let n = self.chunk.min(buf.len()).min(self.payload.len() - self.emitted);
        buf[..n].copy_from_slice(&self.payload[self.emitted..self.emitted + n]);
        self.emitted += n;
        Ok(n)
    }
}

/// Observes how much PCM data has reached a temp file.
pub struct Progress {
    watch: PathBuf,
}

impl Progress {
    pub fn new(watch: PathBuf) -> Self {
        Self { watch }
    }

    /// Wait until the file holds a header plus `bytes` of data.
    pub fn wait_for(&self, bytes: usize, timeout: Duration) -> bool {
        let target = (WAV_HEADER_SIZE + bytes) as u64;
        let deadline = Instant::now() + timeout;
        loop {
            let len = std::fs::metadata(&self.watch).map(|m| m.len()).unwrap_or(0);
            if len == target {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(1));
        }
    }
}

#[derive(Default)]
struct GateState {
    blocked: bool,
    open: bool,
}

/// Remote control for a `GatedSource`.
#[derive(Clone, Default)]
pub struct Gate {
    state: Arc<(Mutex<GateState>, Condvar)>,
}

impl Gate {
    pub fn open(&self) {
        let (lock, cvar) = &*self.state;
        lock.lock().open = true;
        cvar.notify_all();
    }

    /// Wait until the source is parked inside `fill`.
    pub fn wait_until_blocked(&self, timeout: Duration) -> bool {
        let (lock, cvar) = &*self.state;
        let deadline = Instant::now() + timeout;
        let mut s = lock.lock();
        while !s.blocked {
            if cvar.wait_until(&mut s, deadline).timed_out() {
                return s.blocked;
            }
        }
        true
    }
}

/// First read blocks until the gate opens and then returns `payload`; later
/// reads return nothing.
pub struct GatedSource {
    gate: Gate,
    payload: Option<Vec<u8>>,
}

impl GatedSource {
    pub fn new(payload: Vec<u8>) -> Self {
        Self {
            gate: Gate::default(),
            payload: Some(payload),
        }
    }

    pub fn gate(&self) -> Gate {
        self.gate.clone()
    }
}

impl AudioSource for GatedSource {
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize, LoggerError> {
        let Some(payload) = self.payload.take() else {
            return Ok(0);
        };
        let (lock, cvar) = &*self.gate.state;
        let mut s = lock.lock();
        s.blocked = true;
        cvar.notify_all();
        while !s.open {
            cvar.wait(&mut s);
        }
        let n = payload.len().min(buf.len());
        buf[..n].copy_from_slice(&payload[..n]);
        Ok(n)
    }
}

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}

#[derive(Default)]
pub struct RecordingIndicator {
    shown: Mutex<Vec<IndicatorRequest>>,
}

impl RecordingIndicator {
    pub fn shown(&self) -> Vec<IndicatorRequest> {
        self.shown.lock().clone()
    }
}

impl StatusIndicator for RecordingIndicator {
    fn show(&self, request: IndicatorRequest) {
        self.shown.lock().push(request);
    }
}

#[derive(Default)]
pub struct EventLog {
    states: Mutex<Vec<RecorderState>>,
    finished: Mutex<Vec<u32>>,
    errors: AtomicUsize,
}

impl EventLog {
    pub fn states(&self) -> Vec<RecorderState> {
        self.states.lock().clone()
    }

    pub fn finished(&self) -> Vec<u32> {
        self.finished.lock().clone()
    }

    pub fn errors(&self) -> usize {
        self.errors.load(Ordering::SeqCst)
    }
}

impl RecorderDelegate for EventLog {
    fn on_state_changed(&self, state: &RecorderState) {
        self.states.lock().push(*state);
    }

    fn on_recording_finished(&self, result: &RecordingResult) {
        self.finished.lock().push(result.sequence);
    }

    fn on_error(&self, _error: &LoggerError) {
        self.errors.fetch_add(1, Ordering::SeqCst);
    }
}

/// Replays a fixed list of input samples, repeating the last one.
pub struct ScriptedSignals {
    samples: VecDeque<TriggerState>,
    last: TriggerState,
}

impl ScriptedSignals {
    pub fn new(samples: Vec<TriggerState>) -> Self {
        Self {
            samples: samples.into(),
            last: TriggerState::default(),
        }
    }
}

impl SignalSource for ScriptedSignals {
    fn sample(&mut self) -> TriggerState {
        if let Some(next) = self.samples.pop_front() {
            self.last = next;
        }
        self.last
    }
}
