//! Edge-triggered status alerts.
//!
//! The simulator re-sends status with every state update, so a level
//! check would re-fire a tone dozens of times per second while a fault
//! persists. The reactor keeps the last observed status and fires only
//! on the transition into an alert-worthy value.

use crate::telemetry::Status;

/// Alert cue kinds, mapped to tones and banners by the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    /// Entered WARNING.
    Warning,
    /// Entered SAFETY_OVERRIDE.
    Critical,
    /// Entered COMMANDER_RTB.
    Override,
}

/// Edge detector over the store's status field.
#[derive(Debug, Default)]
pub struct AlertReactor {
    last_status: Option<Status>,
}

impl AlertReactor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe the current status. Returns an alert exactly once per
    /// transition into an alert-worthy status; equal consecutive statuses
    /// and transitions back to NOMINAL return None.
    pub fn observe(&mut self, status: Status) -> Option<AlertKind> {
        let changed = self.last_status != Some(status);
        self.last_status = Some(status);
        if !changed {
            return None;
        }
        match status {
            Status::Warning => Some(AlertKind::Warning),
            Status::SafetyOverride => Some(AlertKind::Critical),
            Status::CommanderRtb => Some(AlertKind::Override),
            Status::Nominal => None,
        }
    }

    /// Forget the observed status (session teardown).
    pub fn reset(&mut self) {
        self.last_status = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_status_fires_once() {
        let mut reactor = AlertReactor::new();
        assert_eq!(reactor.observe(Status::Warning), Some(AlertKind::Warning));
        assert_eq!(reactor.observe(Status::Warning), None);
        assert_eq!(reactor.observe(Status::Warning), None);
    }

    #[test]
    fn transition_sequence_fires_exactly_twice() {
        let mut reactor = AlertReactor::new();
        let mut alerts = 0;
        for status in [
            Status::Nominal,
            Status::Warning,
            Status::Warning,
            Status::SafetyOverride,
        ] {
            if reactor.observe(status).is_some() {
                alerts += 1;
            }
        }
        assert_eq!(alerts, 2);
    }

    #[test]
    fn return_to_nominal_is_silent() {
        let mut reactor = AlertReactor::new();
        reactor.observe(Status::Warning);
        assert_eq!(reactor.observe(Status::Nominal), None);
    }

    #[test]
    fn refires_after_clearing() {
        let mut reactor = AlertReactor::new();
        reactor.observe(Status::Warning);
        reactor.observe(Status::Nominal);
        assert_eq!(reactor.observe(Status::Warning), Some(AlertKind::Warning));
    }
}
