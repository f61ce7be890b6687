//! # sound-logger-cpal
//!
//! Host audio backend for sound-logger.
//!
//! Provides:
//! - `BufferedSource`: ring-buffered `AudioSource` fed by any push-style callback
//! - `CpalMicrophone`: default or name-matched input device via cpal (Windows, macOS)
//!
//! ## Usage
//! ```ignore
//! use sound_logger_core::{LoggerConfig, Recorder};
//! use sound_logger_cpal::{BufferedSource, CpalMicrophone};
//!
//! let config = LoggerConfig::default();
//! let source = BufferedSource::new(config.sample_rate, 2.0);
//! let _mic = CpalMicrophone::open(None, source.clone()).unwrap();
//! let mut recorder = Recorder::open(config, source).unwrap();
//! ```

pub mod buffered_source;
#[cfg(any(target_os = "windows", target_os = "macos"))]
pub mod mic;

pub use buffered_source::BufferedSource;
#[cfg(any(target_os = "windows", target_os = "macos"))]
pub use mic::{list_input_devices, CpalMicrophone};
