//! # sound-logger-core
//!
//! Platform-agnostic core of a trigger-driven sound logger.
//!
//! Records mono 16-bit PCM from an `AudioSource` into WAV files on a
//! `Storage` (normally an SD card) while an enable input and a trigger input
//! are both asserted. Host backends (cpal microphone, GPIO pins, status LED)
//! implement the traits and plug into the generic `Recorder`.
//!
//! ## Architecture
//!
//! ```text
//! sound-logger-core (this crate)
//! ├── traits/       ← AudioSource, Storage, SignalSource, StatusIndicator, RecorderDelegate, Clock
//! ├── models/       ← LoggerConfig, LoggerError, RecorderState, TriggerState, PipelineStats, etc.
//! ├── pipeline/     ← SlotPair handoff, capture reader and writer loops
//! ├── processing/   ← WAV header, PCM conversion, RingBuffer
//! ├── session/      ← Recorder (state machine), Finalizer, Monitor
//! └── storage/      ← FsStorage, IndexStore
//! ```

pub mod models;
pub mod pipeline;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::config::LoggerConfig;
pub use models::error::LoggerError;
pub use models::indicator::{IndicatorColor, IndicatorMode, IndicatorRequest};
pub use models::recording_result::RecordingResult;
pub use models::signals::TriggerState;
pub use models::state::RecorderState;
pub use models::stats::PipelineStats;
pub use pipeline::slots::SlotPair;
pub use processing::ring_buffer::RingBuffer;
pub use session::finalizer::Finalizer;
pub use session::monitor::Monitor;
pub use session::recorder::Recorder;
pub use storage::fs_storage::FsStorage;
pub use storage::index_store::{IndexLoad, IndexStore};
pub use traits::audio_source::AudioSource;
pub use traits::clock::{Clock, SystemClock};
pub use traits::recorder_delegate::RecorderDelegate;
pub use traits::signal_source::SignalSource;
pub use traits::status_indicator::StatusIndicator;
pub use traits::storage::Storage;
