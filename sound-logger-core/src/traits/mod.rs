pub mod audio_source;
pub mod clock;
pub mod recorder_delegate;
pub mod signal_source;
pub mod status_indicator;
pub mod storage;
