use crate::models::signals::TriggerState;

/// Source of the debounced enable/trigger pair. Pin reading and debouncing
/// live behind this trait.
pub trait SignalSource: Send {
    fn sample(&mut self) -> TriggerState;
}
