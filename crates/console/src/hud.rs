//! HUD data derivation: pure mapping from store state to the labels,
//! colors, and gates the overlay draws. Kept free of rendering so every
//! rule here is unit-testable.

use std::time::Instant;

use console_core::{ConnectionStatus, Status, StoreState};

// Tactical palette
pub const GREEN: [f32; 4] = [0.0, 1.0, 0.53, 1.0];
pub const AMBER: [f32; 4] = [1.0, 0.67, 0.0, 1.0];
pub const ORANGE: [f32; 4] = [1.0, 0.4, 0.1, 1.0];
pub const RED: [f32; 4] = [1.0, 0.2, 0.2, 1.0];
pub const CYAN: [f32; 4] = [0.3, 0.85, 1.0, 1.0];
pub const PURPLE: [f32; 4] = [1.0, 0.0, 1.0, 1.0];
pub const YELLOW: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
pub const GRAY: [f32; 4] = [0.6, 0.62, 0.68, 1.0];

/// Signal-denial level above which the vehicle flies on optical
/// navigation and the HUD raises a notice.
pub const OPTICAL_NAV_JAM: f32 = 50.0;

/// Everything the overlay needs, derived once per frame.
#[derive(Debug, Clone)]
pub struct HudData {
    pub status_label: &'static str,
    pub status_color: [f32; 4],
    pub connection_label: &'static str,
    pub connection_color: [f32; 4],
    pub mode: String,
    pub armed: bool,
    pub battery: f32,
    pub battery_color: [f32; 4],
    pub altitude: f32,
    pub speed: f32,
    pub heading_degrees: f32,
    pub gps_jam: f32,
    pub nav_confidence: f32,
    pub confidence_color: [f32; 4],
    /// Anchor logging is rejected below the reject threshold; the HUD
    /// grays the hint out so the operator is not surprised server-side.
    pub anchor_allowed: bool,
    pub anchor_count: usize,
    pub return_queue_length: u32,
    pub retrograde: bool,
    /// Jam past the optical-nav level raises a notice.
    pub optical_nav: bool,
    /// Full-width banner for override and retrograde states.
    pub banner: Option<(&'static str, [f32; 4])>,
}

fn status_color(status: Status, retrograde: bool) -> [f32; 4] {
    match status {
        Status::CommanderRtb => PURPLE,
        Status::SafetyOverride => RED,
        _ if retrograde => RED,
        Status::Warning => AMBER,
        Status::Nominal => GREEN,
    }
}

fn connection_color(connection: ConnectionStatus) -> [f32; 4] {
    match connection {
        ConnectionStatus::Connected => GREEN,
        ConnectionStatus::Connecting => AMBER,
        ConnectionStatus::Disconnected => RED,
    }
}

/// Color for a 0..100 value on the nav-confidence threshold scale.
pub fn scale_color(value: f32, state: &StoreState) -> [f32; 4] {
    let t = state.thresholds;
    if value > t.warn {
        GREEN
    } else if value > t.reject {
        AMBER
    } else if value > t.abort {
        ORANGE
    } else {
        RED
    }
}

/// Battery bands are fixed, independent of the nav thresholds: above
/// half green, above reserve amber, else red.
pub fn battery_color(value: f32) -> [f32; 4] {
    if value > 50.0 {
        GREEN
    } else if value > 15.0 {
        AMBER
    } else {
        RED
    }
}

/// Heading in display degrees, [0, 360).
pub fn heading_degrees(heading_radians: f32) -> f32 {
    heading_radians.to_degrees().rem_euclid(360.0)
}

pub fn derive(state: &StoreState) -> HudData {
    let v = &state.vehicle;
    // Retrograde raises a banner on its own; the override statuses name
    // the cause when they are the reason for it.
    let banner = match v.status {
        Status::CommanderRtb => Some(("COMMANDER OVERRIDE", PURPLE)),
        Status::SafetyOverride => Some(("SAFETY OVERRIDE", RED)),
        _ if v.retrograde_active => Some(("RETROGRADE ACTIVE", RED)),
        _ => None,
    };

    HudData {
        status_label: v.status.label(),
        status_color: status_color(v.status, v.retrograde_active),
        connection_label: state.connection.label(),
        connection_color: connection_color(state.connection),
        mode: v.mode.clone(),
        armed: v.armed,
        battery: v.battery,
        battery_color: battery_color(v.battery),
        altitude: v.position.y,
        speed: v.speed,
        heading_degrees: heading_degrees(v.heading()),
        gps_jam: v.gps_jam,
        nav_confidence: v.nav_confidence,
        confidence_color: scale_color(v.nav_confidence, state),
        anchor_allowed: v.nav_confidence > state.thresholds.reject,
        anchor_count: state.doctrine.anchors.len(),
        return_queue_length: state.doctrine.return_queue_length,
        retrograde: v.retrograde_active,
        optical_nav: v.gps_jam > OPTICAL_NAV_JAM,
        banner,
    }
}

/// Wall-clock mission timer, running while the vehicle is armed.
/// Disarming resets it.
#[derive(Debug, Default)]
pub struct MissionTimer {
    start: Option<Instant>,
}

impl MissionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track the armed flag once per frame.
    pub fn observe(&mut self, armed: bool) {
        if armed {
            if self.start.is_none() {
                self.start = Some(Instant::now());
            }
        } else {
            self.start = None;
        }
    }

    /// Whole seconds since arming, while armed.
    pub fn elapsed_seconds(&self) -> Option<u64> {
        self.start.map(|s| s.elapsed().as_secs())
    }
}

/// MM:SS display form of a mission duration.
pub fn format_mission_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use console_core::StoreState;

    fn state_with_confidence(c: f32) -> StoreState {
        let mut s = StoreState::default();
        s.vehicle.nav_confidence = c;
        s
    }

    #[test]
    fn heading_wraps_into_display_range() {
        assert!((heading_degrees(0.0) - 0.0).abs() < 1e-4);
        assert!((heading_degrees(-std::f32::consts::FRAC_PI_2) - 270.0).abs() < 1e-3);
        assert!((heading_degrees(std::f32::consts::TAU) - 0.0).abs() < 1e-3);
    }

    #[test]
    fn confidence_colors_follow_thresholds() {
        // Defaults: warn 70, reject 40, abort 10.
        let s = StoreState::default();
        assert_eq!(scale_color(80.0, &s), GREEN);
        assert_eq!(scale_color(55.0, &s), AMBER);
        assert_eq!(scale_color(25.0, &s), ORANGE);
        assert_eq!(scale_color(5.0, &s), RED);
    }

    #[test]
    fn anchor_gate_is_strict_at_reject_threshold() {
        let hud = derive(&state_with_confidence(40.0));
        assert!(!hud.anchor_allowed);
        let hud = derive(&state_with_confidence(40.1));
        assert!(hud.anchor_allowed);
    }

    #[test]
    fn override_states_raise_banners() {
        let mut s = StoreState::default();
        assert!(derive(&s).banner.is_none());
        s.vehicle.status = Status::SafetyOverride;
        assert_eq!(derive(&s).banner, Some(("SAFETY OVERRIDE", RED)));
        s.vehicle.status = Status::CommanderRtb;
        assert_eq!(derive(&s).banner, Some(("COMMANDER OVERRIDE", PURPLE)));
    }

    #[test]
    fn retrograde_raises_banner_regardless_of_status() {
        let mut s = StoreState::default();
        s.vehicle.retrograde_active = true;
        for status in [Status::Nominal, Status::Warning] {
            s.vehicle.status = status;
            let hud = derive(&s);
            assert_eq!(hud.banner, Some(("RETROGRADE ACTIVE", RED)));
            assert_eq!(hud.status_color, RED);
        }
        // Override statuses keep naming the cause.
        s.vehicle.status = Status::CommanderRtb;
        assert_eq!(derive(&s).banner, Some(("COMMANDER OVERRIDE", PURPLE)));
    }

    #[test]
    fn battery_bands_are_fixed() {
        assert_eq!(battery_color(80.0), GREEN);
        assert_eq!(battery_color(50.0), AMBER);
        assert_eq!(battery_color(30.0), AMBER);
        assert_eq!(battery_color(15.0), RED);
        assert_eq!(battery_color(5.0), RED);
    }

    #[test]
    fn high_jam_flags_optical_nav() {
        let mut s = StoreState::default();
        s.vehicle.gps_jam = 50.0;
        assert!(!derive(&s).optical_nav);
        s.vehicle.gps_jam = 50.1;
        assert!(derive(&s).optical_nav);
    }

    #[test]
    fn anchor_count_tracks_doctrine() {
        let mut s = StoreState::default();
        assert_eq!(derive(&s).anchor_count, 0);
        s.doctrine.anchors = vec![glam::Vec3::ZERO, glam::Vec3::ONE];
        assert_eq!(derive(&s).anchor_count, 2);
    }

    #[test]
    fn mission_timer_runs_only_while_armed() {
        let mut timer = MissionTimer::new();
        assert_eq!(timer.elapsed_seconds(), None);
        timer.observe(true);
        assert_eq!(timer.elapsed_seconds(), Some(0));
        // Still running, not restarted, on repeated armed frames.
        timer.observe(true);
        assert!(timer.elapsed_seconds().is_some());
        timer.observe(false);
        assert_eq!(timer.elapsed_seconds(), None);
        timer.observe(true);
        assert_eq!(timer.elapsed_seconds(), Some(0));
    }

    #[test]
    fn mission_time_formats_as_minutes_seconds() {
        assert_eq!(format_mission_time(0), "00:00");
        assert_eq!(format_mission_time(75), "01:15");
        assert_eq!(format_mission_time(3605), "60:05");
    }
}
