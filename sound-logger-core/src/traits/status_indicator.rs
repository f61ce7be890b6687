use crate::models::indicator::IndicatorRequest;

/// Status light driver. Receives a request on every change of recorder
/// status; color rendering and blink timing are up to the implementation.
pub trait StatusIndicator: Send + Sync {
    fn show(&self, request: IndicatorRequest);
}
