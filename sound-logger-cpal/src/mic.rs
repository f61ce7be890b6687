//! cpal microphone feeding a `BufferedSource`.
//!
//! Opens the default input device (or the first whose name contains a
//! pattern) and delivers f32 frames on the cpal callback thread.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, StreamConfig};

use sound_logger_core::models::error::LoggerError;

use crate::buffered_source::BufferedSource;

/// Live input stream. Audio flows into the `BufferedSource` while playing;
/// dropping the microphone closes the stream.
pub struct CpalMicrophone {
    stream: cpal::Stream,
    device_name: String,
    device_rate: u32,
    device_channels: u16,
}

impl CpalMicrophone {
    /// Open an input stream and start pushing into `sink`.
    ///
    /// `device_pattern` is matched case-insensitively against device names;
    /// `None` or no match selects the host default.
    pub fn open(device_pattern: Option<&str>, sink: BufferedSource) -> Result<Self, LoggerError> {
        let (device, config) = resolve_device(device_pattern, sink.sample_rate())?;
        let device_name = device.name().unwrap_or_else(|_| "<unknown>".into());
        let device_rate = config.sample_rate.0;
        let device_channels = config.channels;
        log::info!(
            "Audio device: {} ({}Hz, {}ch{})",
            device_name,
            device_rate,
            device_channels,
            if device_channels > 1 { ", downmixing to mono" } else { "" }
        );

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    sink.push(data, device_rate, device_channels);
                },
                |err| log::error!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| LoggerError::SourceError(format!("failed to build input stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| LoggerError::SourceError(format!("failed to start input stream: {}", e)))?;

        Ok(Self {
            stream,
            device_name,
            device_rate,
            device_channels,
        })
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn device_rate(&self) -> u32 {
        self.device_rate
    }

    pub fn device_channels(&self) -> u16 {
        self.device_channels
    }

    pub fn pause(&self) -> Result<(), LoggerError> {
        self.stream
            .pause()
            .map_err(|e| LoggerError::SourceError(format!("failed to pause input stream: {}", e)))
    }

    pub fn resume(&self) -> Result<(), LoggerError> {
        self.stream
            .play()
            .map_err(|e| LoggerError::SourceError(format!("failed to resume input stream: {}", e)))
    }
}

/// Names of all input devices on the default host.
pub fn list_input_devices() -> Vec<String> {
    let host = cpal::default_host();
    match host.input_devices() {
        Ok(devices) => devices.filter_map(|d| d.name().ok()).collect(),
        Err(e) => {
            log::warn!("Failed to enumerate input devices: {}", e);
            vec![]
        }
    }
}

/// Pick the device and a stream config at `sample_rate` if the device
/// supports it, else the device default. Rate conversion happens in `push`.
fn resolve_device(pattern: Option<&str>, sample_rate: u32) -> Result<(Device, StreamConfig), LoggerError> {
    let host = cpal::default_host();
    let matched = match pattern {
        Some(pattern) => {
            let pattern = pattern.to_lowercase();
            host.input_devices()
                .map_err(|e| LoggerError::SourceError(format!("failed to enumerate input devices: {}", e)))?
                .find(|d| d.name().map(|n| n.to_lowercase().contains(&pattern)).unwrap_or(false))
        }
        None => None,
    };
    let device = matched
        .or_else(|| host.default_input_device())
        .ok_or_else(|| LoggerError::SourceError("no input audio device found".into()))?;

    let desired = SampleRate(sample_rate);
    let supported = device
        .supported_input_configs()
        .map_err(|e| LoggerError::SourceError(format!("cannot query input configs: {}", e)))?
        .find(|c| c.min_sample_rate() <= desired && desired <= c.max_sample_rate());

    let config: StreamConfig = match supported {
        Some(range) => range.with_sample_rate(desired).into(),
        None => {
            let default = device
                .default_input_config()
                .map_err(|e| LoggerError::SourceError(format!("no default input config: {}", e)))?;
            log::warn!(
                "{}Hz not supported by input device; capturing at {}Hz and resampling",
                sample_rate,
                default.sample_rate().0
            );
            default.into()
        }
    };
    Ok((device, config))
}
