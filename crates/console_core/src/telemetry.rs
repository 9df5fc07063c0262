//! Telemetry data model: vehicle state, doctrine overlay, control vector,
//! session thresholds, and connection status.

use glam::Vec3;

/// Discrete vehicle status reported by the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Nominal,
    Warning,
    SafetyOverride,
    CommanderRtb,
}

impl Status {
    /// Display label matching the wire form.
    pub fn label(self) -> &'static str {
        match self {
            Status::Nominal => "NOMINAL",
            Status::Warning => "WARNING",
            Status::SafetyOverride => "SAFETY_OVERRIDE",
            Status::CommanderRtb => "COMMANDER_RTB",
        }
    }

    /// Parse the wire form. Unknown strings map to None so the caller can
    /// keep the previous status.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NOMINAL" => Some(Status::Nominal),
            "WARNING" => Some(Status::Warning),
            "SAFETY_OVERRIDE" => Some(Status::SafetyOverride),
            "COMMANDER_RTB" => Some(Status::CommanderRtb),
            _ => None,
        }
    }
}

/// Latest known physical and doctrinal state of the vehicle.
///
/// Mutated only by validated inbound snapshots and (for `controls`) by
/// the local sampler. Reset to defaults on session teardown, never dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleState {
    pub position: Vec3,
    /// Euler angles in radians, applied yaw (Y) then pitch (X) then roll (Z).
    pub rotation: Vec3,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    /// Battery percentage [0, 100].
    pub battery: f32,
    pub armed: bool,
    /// Flight mode label as reported by the simulator (e.g. "STABILIZE").
    pub mode: String,
    /// Speed magnitude in units/s.
    pub speed: f32,
    /// Signal-denial intensity [0, 100].
    pub gps_jam: f32,
    /// Navigation confidence [0, 100].
    pub nav_confidence: f32,
    pub status: Status,
    pub retrograde_active: bool,
    pub controls: ControlVector,
}

impl Default for VehicleState {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 2.0, 0.0),
            rotation: Vec3::ZERO,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            battery: 100.0,
            armed: false,
            mode: "STABILIZE".to_string(),
            speed: 0.0,
            gps_jam: 0.0,
            nav_confidence: 100.0,
            status: Status::Nominal,
            retrograde_active: false,
            controls: ControlVector::default(),
        }
    }
}

impl VehicleState {
    /// Heading in radians: the yaw component of the Euler rotation.
    pub fn heading(&self) -> f32 {
        self.rotation.y
    }
}

/// A validated partial update to `VehicleState`.
///
/// Pose fields are mandatory and guaranteed finite by construction (the
/// uplink decoder rejects a snapshot wholesale if any component is null,
/// missing, or non-finite). Everything else is optional: absent fields
/// keep their previous value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleUpdate {
    pub position: Vec3,
    pub rotation: Vec3,
    pub velocity: Option<Vec3>,
    pub angular_velocity: Option<Vec3>,
    pub battery: Option<f32>,
    pub armed: Option<bool>,
    pub mode: Option<String>,
    pub speed: Option<f32>,
    pub gps_jam: Option<f32>,
    pub nav_confidence: Option<f32>,
    pub status: Option<Status>,
    pub retrograde_active: Option<bool>,
}

impl VehicleState {
    /// Merge a validated update into this state.
    pub fn apply(&mut self, u: &VehicleUpdate) {
        self.position = u.position;
        self.rotation = u.rotation;
        if let Some(v) = u.velocity {
            self.velocity = v;
        }
        if let Some(v) = u.angular_velocity {
            self.angular_velocity = v;
        }
        if let Some(v) = u.battery {
            self.battery = v;
        }
        if let Some(v) = u.armed {
            self.armed = v;
        }
        if let Some(m) = &u.mode {
            self.mode = m.clone();
        }
        if let Some(v) = u.speed {
            self.speed = v;
        }
        if let Some(v) = u.gps_jam {
            self.gps_jam = v;
        }
        if let Some(v) = u.nav_confidence {
            self.nav_confidence = v;
        }
        if let Some(s) = u.status {
            self.status = s;
        }
        if let Some(v) = u.retrograde_active {
            self.retrograde_active = v;
        }
    }
}

/// Navigation-integrity visualization data supplied by the simulator.
/// Replaced wholesale by inbound doctrine updates, never locally mutated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DoctrineOverlay {
    /// Historical position samples, oldest first. Capped at
    /// [`crate::trail::TRAIL_CAP`] server-side; clamped again on ingest.
    pub breadcrumbs: Vec<Vec3>,
    /// Operator-logged waypoints.
    pub anchors: Vec<Vec3>,
    pub target_point: Option<Vec3>,
    pub return_queue_length: u32,
}

/// Operator control command. Pitch, roll, and yaw rate are reserved and
/// always 0; the simulator owns attitude stabilization.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlVector {
    pub forward: f32,
    pub yaw: f32,
    pub throttle: f32,
    pub pitch: f32,
    pub roll: f32,
    pub yaw_rate: f32,
}

/// Alert thresholds on the nav-confidence scale, seeded at session start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Below this, the HUD shows a warning band.
    pub warn: f32,
    /// Below this, anchor logging is rejected server-side.
    pub reject: f32,
    /// Below this, the simulator aborts to safety override.
    pub abort: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            warn: 70.0,
            reject: 40.0,
            abort: 10.0,
        }
    }
}

/// Uplink connection state as seen by the UI. The render and sampler
/// loops keep running regardless of this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionStatus {
    pub fn label(self) -> &'static str {
        match self {
            ConnectionStatus::Disconnected => "OFFLINE",
            ConnectionStatus::Connecting => "LINKING",
            ConnectionStatus::Connected => "LINKED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_thresholds() {
        let t = Thresholds::default();
        assert_eq!(t.warn, 70.0);
        assert_eq!(t.reject, 40.0);
        assert_eq!(t.abort, 10.0);
    }

    #[test]
    fn status_round_trip() {
        for s in [
            Status::Nominal,
            Status::Warning,
            Status::SafetyOverride,
            Status::CommanderRtb,
        ] {
            assert_eq!(Status::parse(s.label()), Some(s));
        }
        assert_eq!(Status::parse("GARBAGE"), None);
    }

    #[test]
    fn apply_keeps_absent_fields() {
        let mut state = VehicleState::default();
        state.battery = 55.0;
        state.gps_jam = 30.0;
        let update = VehicleUpdate {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Vec3::new(0.0, 1.0, 0.0),
            speed: Some(4.0),
            ..Default::default()
        };
        state.apply(&update);
        assert_eq!(state.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(state.speed, 4.0);
        assert_eq!(state.battery, 55.0);
        assert_eq!(state.gps_jam, 30.0);
    }
}
