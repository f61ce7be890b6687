/// Recording lifecycle state machine.
///
/// State transitions:
/// ```text
/// idle ──(enabled ∧ triggered)──→ recording
///  ↑                                  │ (any other signal pair)
///  └──── finalized / abandoned ←── stopping
/// ```
///
/// `Stopping` covers the window between the stop request and the writer
/// finishing its drain and finalization. A new recording cannot start until
/// the state is back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording { sequence: u32 },
    Stopping { sequence: u32 },
}

impl RecorderState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording { .. })
    }

    pub fn is_stopping(&self) -> bool {
        matches!(self, Self::Stopping { .. })
    }

    /// Sequence number of the session in flight, if any.
    pub fn sequence(&self) -> Option<u32> {
        match self {
            Self::Recording { sequence } | Self::Stopping { sequence } => Some(*sequence),
            Self::Idle => None,
        }
    }
}
