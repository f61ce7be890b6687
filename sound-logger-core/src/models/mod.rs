pub mod config;
pub mod error;
pub mod indicator;
pub mod recording_result;
pub mod signals;
pub mod state;
pub mod stats;
