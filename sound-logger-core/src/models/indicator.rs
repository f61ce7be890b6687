use super::signals::TriggerState;
use super::state::RecorderState;

/// Named colors understood by the status light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorColor {
    Red,
    Green,
    Blue,
    Yellow,
    Off,
}

impl IndicatorColor {
    /// Dimmed RGB levels for a single addressable LED.
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Self::Red => (10, 0, 0),
            Self::Green => (0, 10, 0),
            Self::Blue => (0, 0, 10),
            Self::Yellow => (10, 10, 0),
            Self::Off => (0, 0, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorMode {
    Solid,
    Blink,
}

/// What the status light should show. Rendering and blink timing belong to
/// the `StatusIndicator` implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndicatorRequest {
    pub color: IndicatorColor,
    pub mode: IndicatorMode,
}

impl IndicatorRequest {
    pub fn new(color: IndicatorColor, mode: IndicatorMode) -> Self {
        Self { color, mode }
    }

    /// Status shown for a recorder state and the inputs that produced it.
    ///
    /// - red blink: disabled
    /// - green blink: enabled, waiting for trigger
    /// - blue blink: recording
    /// - yellow solid: draining and finalizing
    pub fn for_state(state: &RecorderState, signals: &TriggerState) -> Self {
        match state {
            RecorderState::Recording { .. } => Self::new(IndicatorColor::Blue, IndicatorMode::Blink),
            RecorderState::Stopping { .. } => Self::new(IndicatorColor::Yellow, IndicatorMode::Solid),
            RecorderState::Idle if signals.enabled => Self::new(IndicatorColor::Green, IndicatorMode::Blink),
            RecorderState::Idle => Self::new(IndicatorColor::Red, IndicatorMode::Blink),
        }
    }
}
