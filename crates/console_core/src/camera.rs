//! Camera mode state: a closed set of view behaviors plus clamped settings.

/// Active camera behavior. Each mode is a pure transform computed by the
/// renderer; there are no transitions beyond direct reassignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraMode {
    Fpv,
    #[default]
    Follow,
    Orbit,
    TopDown,
    Free,
}

impl CameraMode {
    /// Modes reachable via the cycle key, in order.
    pub const CYCLE: [CameraMode; 3] = [CameraMode::Fpv, CameraMode::Follow, CameraMode::Orbit];

    /// Next mode in the cycle, wrapping. Cycling from a non-cycle mode
    /// (topdown/free) re-enters the cycle at fpv.
    pub fn cycled(self) -> Self {
        match Self::CYCLE.iter().position(|m| *m == self) {
            Some(i) => Self::CYCLE[(i + 1) % Self::CYCLE.len()],
            None => Self::CYCLE[0],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CameraMode::Fpv => "FPV",
            CameraMode::Follow => "FOLLOW",
            CameraMode::Orbit => "ORBIT",
            CameraMode::TopDown => "TOPDOWN",
            CameraMode::Free => "FREE",
        }
    }
}

/// Camera distance bounds in world units.
pub const DISTANCE_MIN: f32 = 2.0;
pub const DISTANCE_MAX: f32 = 50.0;

/// Operator-adjustable camera settings. Never touched by the network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    pub mode: CameraMode,
    distance: f32,
    pub fov_degrees: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            mode: CameraMode::default(),
            distance: 10.0,
            fov_degrees: 60.0,
        }
    }
}

impl CameraSettings {
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Set the distance, clamped to [2, 50].
    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(DISTANCE_MIN, DISTANCE_MAX);
    }

    /// Nudge the distance by a delta, clamped to [2, 50].
    pub fn adjust_distance(&mut self, delta: f32) {
        self.set_distance(self.distance + delta);
    }

    pub fn cycle_mode(&mut self) {
        self.mode = self.mode.cycled();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_returns_to_start_after_three() {
        let mut mode = CameraMode::Fpv;
        for _ in 0..3 {
            mode = mode.cycled();
        }
        assert_eq!(mode, CameraMode::Fpv);
    }

    #[test]
    fn cycle_order() {
        assert_eq!(CameraMode::Fpv.cycled(), CameraMode::Follow);
        assert_eq!(CameraMode::Follow.cycled(), CameraMode::Orbit);
        assert_eq!(CameraMode::Orbit.cycled(), CameraMode::Fpv);
    }

    #[test]
    fn cycle_from_direct_mode_reenters_at_fpv() {
        assert_eq!(CameraMode::TopDown.cycled(), CameraMode::Fpv);
        assert_eq!(CameraMode::Free.cycled(), CameraMode::Fpv);
    }

    #[test]
    fn distance_clamped() {
        let mut s = CameraSettings::default();
        s.set_distance(100.0);
        assert_eq!(s.distance(), 50.0);
        s.set_distance(-5.0);
        assert_eq!(s.distance(), 2.0);
        s.adjust_distance(1000.0);
        assert_eq!(s.distance(), 50.0);
    }
}
