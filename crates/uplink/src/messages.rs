//! Wire message types and snapshot validation.

use console_core::{DoctrineOverlay, Status, Thresholds, VehicleUpdate, TRAIL_CAP};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inbound messages from the simulator, tagged by `"event"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Inbound {
    SessionCreated {
        session_id: String,
        #[serde(default)]
        initial_state: Option<StateSnapshot>,
        #[serde(default)]
        thresholds: Option<ThresholdValues>,
    },
    StateUpdate {
        session_id: String,
        #[serde(default)]
        state: Option<StateSnapshot>,
        #[serde(default)]
        doctrine: Option<DoctrineSnapshot>,
    },
    /// Informational log line. Matching-session filter applies, then the
    /// message is only logged.
    Status {
        session_id: String,
        message: String,
    },
    AnchorLogged {
        session_id: String,
        success: bool,
        #[serde(default)]
        position: Option<[f64; 3]>,
    },
    JamChanged {
        session_id: String,
        gps_jam: f32,
    },
}

impl Inbound {
    pub fn session_id(&self) -> &str {
        match self {
            Inbound::SessionCreated { session_id, .. }
            | Inbound::StateUpdate { session_id, .. }
            | Inbound::Status { session_id, .. }
            | Inbound::AnchorLogged { session_id, .. }
            | Inbound::JamChanged { session_id, .. } => session_id,
        }
    }
}

/// Outbound commands. Every command carries the bound session id.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Outbound {
    Arm {
        session_id: String,
    },
    Disarm {
        session_id: String,
    },
    Reset {
        session_id: String,
    },
    LogAnchor {
        session_id: String,
    },
    AdjustJam {
        session_id: String,
        delta: f32,
    },
    SetControls {
        session_id: String,
        forward: f32,
        yaw: f32,
        throttle: f32,
        pitch: f32,
        roll: f32,
        yaw_rate: f32,
    },
    CommanderOverride {
        session_id: String,
    },
}

/// Raw vehicle snapshot as it appears on the wire. Pose components are
/// individually nullable so a corrupt update can be rejected wholesale
/// instead of poisoning the store with partial data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StateSnapshot {
    #[serde(default)]
    pub position: Option<[Option<f64>; 3]>,
    #[serde(default)]
    pub rotation: Option<[Option<f64>; 3]>,
    #[serde(default)]
    pub velocity: Option<[f64; 3]>,
    #[serde(default)]
    pub angular_velocity: Option<[f64; 3]>,
    #[serde(default)]
    pub battery: Option<f32>,
    #[serde(default)]
    pub armed: Option<bool>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub speed: Option<f32>,
    #[serde(default)]
    pub gps_jam: Option<f32>,
    #[serde(default)]
    pub nav_confidence: Option<f32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub retrograde_active: Option<bool>,
}

/// Why a snapshot was rejected. The update is discarded wholesale and the
/// previous state retained; none of these are fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("snapshot missing {0}")]
    MissingField(&'static str),
    #[error("null component in {0}")]
    NullComponent(&'static str),
    #[error("non-finite component in {0}")]
    NonFinite(&'static str),
}

fn take_vec3(
    field: Option<[Option<f64>; 3]>,
    name: &'static str,
) -> Result<Vec3, SnapshotError> {
    let raw = field.ok_or(SnapshotError::MissingField(name))?;
    let mut out = [0.0f32; 3];
    for (i, component) in raw.iter().enumerate() {
        let v = component.ok_or(SnapshotError::NullComponent(name))?;
        if !v.is_finite() {
            return Err(SnapshotError::NonFinite(name));
        }
        out[i] = v as f32;
    }
    Ok(Vec3::from_array(out))
}

fn finite_vec3(raw: [f64; 3]) -> Option<Vec3> {
    if raw.iter().all(|v| v.is_finite()) {
        Some(Vec3::new(raw[0] as f32, raw[1] as f32, raw[2] as f32))
    } else {
        None
    }
}

impl StateSnapshot {
    /// Validate into a core update. Position and rotation must be present,
    /// non-null, and finite or the whole snapshot is rejected.
    pub fn into_update(self) -> Result<VehicleUpdate, SnapshotError> {
        let position = take_vec3(self.position, "position")?;
        let rotation = take_vec3(self.rotation, "rotation")?;

        let status = match self.status.as_deref() {
            Some(s) => {
                let parsed = Status::parse(s);
                if parsed.is_none() {
                    log::warn!("Unknown status {:?}, keeping previous", s);
                }
                parsed
            }
            None => None,
        };

        Ok(VehicleUpdate {
            position,
            rotation,
            velocity: self.velocity.and_then(finite_vec3),
            angular_velocity: self.angular_velocity.and_then(finite_vec3),
            battery: self.battery.filter(|v| v.is_finite()),
            armed: self.armed,
            mode: self.mode,
            speed: self.speed.filter(|v| v.is_finite()),
            gps_jam: self.gps_jam.filter(|v| v.is_finite()),
            nav_confidence: self.nav_confidence.filter(|v| v.is_finite()),
            status,
            retrograde_active: self.retrograde_active,
        })
    }
}

/// Doctrine overlay as it appears on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DoctrineSnapshot {
    #[serde(default)]
    pub breadcrumbs: Vec<[f64; 3]>,
    #[serde(default)]
    pub anchors: Vec<[f64; 3]>,
    #[serde(default)]
    pub target_point: Option<[f64; 3]>,
    #[serde(default)]
    pub return_queue_length: u32,
}

impl DoctrineSnapshot {
    /// Convert to the core overlay, dropping non-finite points and
    /// clamping breadcrumbs to the trail cap (newest kept).
    pub fn into_overlay(self) -> DoctrineOverlay {
        let mut breadcrumbs: Vec<Vec3> =
            self.breadcrumbs.into_iter().filter_map(finite_vec3).collect();
        if breadcrumbs.len() > TRAIL_CAP {
            breadcrumbs.drain(..breadcrumbs.len() - TRAIL_CAP);
        }
        DoctrineOverlay {
            breadcrumbs,
            anchors: self.anchors.into_iter().filter_map(finite_vec3).collect(),
            target_point: self.target_point.and_then(finite_vec3),
            return_queue_length: self.return_queue_length,
        }
    }
}

/// Alert thresholds as seeded by session creation.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ThresholdValues {
    pub warn: f32,
    pub reject: f32,
    pub abort: f32,
}

impl From<ThresholdValues> for Thresholds {
    fn from(t: ThresholdValues) -> Self {
        Thresholds {
            warn: t.warn,
            reject: t.reject,
            abort: t.abort,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_json(s: &str) -> StateSnapshot {
        serde_json::from_str(s).unwrap()
    }

    #[test]
    fn valid_snapshot_converts() {
        let snap = snapshot_json(
            r#"{"position":[1.0,2.0,3.0],"rotation":[0.0,1.5,0.0],"battery":80.0,"status":"WARNING"}"#,
        );
        let update = snap.into_update().unwrap();
        assert_eq!(update.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(update.status, Some(Status::Warning));
        assert_eq!(update.battery, Some(80.0));
    }

    #[test]
    fn null_component_rejects_wholesale() {
        let snap = snapshot_json(r#"{"position":[1.0,null,3.0],"rotation":[0.0,0.0,0.0]}"#);
        assert_eq!(
            snap.into_update(),
            Err(SnapshotError::NullComponent("position"))
        );
    }

    #[test]
    fn missing_rotation_rejects() {
        let snap = snapshot_json(r#"{"position":[1.0,2.0,3.0]}"#);
        assert_eq!(
            snap.into_update(),
            Err(SnapshotError::MissingField("rotation"))
        );
    }

    #[test]
    fn non_finite_rotation_rejects() {
        let mut snap = StateSnapshot {
            position: Some([Some(0.0), Some(0.0), Some(0.0)]),
            rotation: Some([Some(0.0), Some(f64::NAN), Some(0.0)]),
            ..Default::default()
        };
        assert_eq!(
            snap.clone().into_update(),
            Err(SnapshotError::NonFinite("rotation"))
        );
        snap.rotation = Some([Some(0.0), Some(f64::INFINITY), Some(0.0)]);
        assert_eq!(snap.into_update(), Err(SnapshotError::NonFinite("rotation")));
    }

    #[test]
    fn unknown_status_keeps_previous() {
        let snap = snapshot_json(
            r#"{"position":[0,0,0],"rotation":[0,0,0],"status":"EXPLODED"}"#,
        );
        let update = snap.into_update().unwrap();
        assert_eq!(update.status, None);
    }

    #[test]
    fn inbound_event_tag_dispatch() {
        let msg: Inbound = serde_json::from_str(
            r#"{"event":"state_update","session_id":"D1","state":{"position":[0,0,0],"rotation":[0,0,0]}}"#,
        )
        .unwrap();
        assert_eq!(msg.session_id(), "D1");
        assert!(matches!(msg, Inbound::StateUpdate { .. }));
    }

    #[test]
    fn breadcrumbs_clamped_to_cap() {
        let snap = DoctrineSnapshot {
            breadcrumbs: (0..400).map(|i| [i as f64, 0.0, 0.0]).collect(),
            ..Default::default()
        };
        let overlay = snap.into_overlay();
        assert_eq!(overlay.breadcrumbs.len(), TRAIL_CAP);
        // Newest retained.
        assert_eq!(overlay.breadcrumbs.last().unwrap().x, 399.0);
    }

    #[test]
    fn outbound_controls_serialization() {
        let cmd = Outbound::SetControls {
            session_id: "D1".into(),
            forward: 1.0,
            yaw: 0.0,
            throttle: 0.7,
            pitch: 0.0,
            roll: 0.0,
            yaw_rate: 0.0,
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains(r#""event":"set_controls""#));
        assert!(json.contains(r#""session_id":"D1""#));
    }
}
