/// Debounced pair of digital inputs sampled by the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TriggerState {
    pub enabled: bool,
    pub triggered: bool,
}

impl TriggerState {
    pub fn new(enabled: bool, triggered: bool) -> Self {
        Self { enabled, triggered }
    }

    /// Build from raw pin levels: enable is active-high, trigger is
    /// active-low (pulled up, closed to ground when pressed).
    pub fn from_pin_levels(enable_high: bool, trigger_high: bool) -> Self {
        Self {
            enabled: enable_high,
            triggered: !trigger_high,
        }
    }

    /// Recording may run only while both inputs are asserted.
    pub fn should_record(&self) -> bool {
        self.enabled && self.triggered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_both_asserted_records() {
        assert!(TriggerState::new(true, true).should_record());
        assert!(!TriggerState::new(true, false).should_record());
        assert!(!TriggerState::new(false, true).should_record());
        assert!(!TriggerState::new(false, false).should_record());
    }

    #[test]
    fn trigger_pin_is_active_low() {
        assert_eq!(TriggerState::from_pin_levels(true, false), TriggerState::new(true, true));
        assert_eq!(TriggerState::from_pin_levels(true, true), TriggerState::new(true, false));
        assert_eq!(TriggerState::from_pin_levels(false, false), TriggerState::new(false, true));
    }
}
