//! Flight trail: a dead-zone-filtered ring buffer of position samples.

use glam::Vec3;
use std::collections::VecDeque;

/// Maximum number of recorded trail points.
pub const TRAIL_CAP: usize = 300;

/// Minimum per-axis movement before a new point is recorded. Filters out
/// near-stationary jitter.
pub const TRAIL_DEAD_ZONE: f32 = 0.1;

/// Recorded flight path of the vehicle. Oldest point first.
#[derive(Debug, Clone, Default)]
pub struct Trail {
    points: VecDeque<Vec3>,
}

impl Trail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `position` if it moved more than the dead zone from the last
    /// recorded point in at least one axis. Evicts the oldest point past
    /// the cap. Returns true if the trail changed (geometry needs rebuild).
    pub fn push_if_moved(&mut self, position: Vec3) -> bool {
        if let Some(last) = self.points.back() {
            let d = position - *last;
            if d.x.abs() <= TRAIL_DEAD_ZONE
                && d.y.abs() <= TRAIL_DEAD_ZONE
                && d.z.abs() <= TRAIL_DEAD_ZONE
            {
                return false;
            }
        }
        self.points.push_back(position);
        while self.points.len() > TRAIL_CAP {
            self.points.pop_front();
        }
        true
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Oldest-first iteration for geometry rebuilds.
    pub fn iter(&self) -> impl Iterator<Item = &Vec3> {
        self.points.iter()
    }

    pub fn oldest(&self) -> Option<Vec3> {
        self.points.front().copied()
    }

    pub fn newest(&self) -> Option<Vec3> {
        self.points.back().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_point_always_recorded() {
        let mut trail = Trail::new();
        assert!(trail.push_if_moved(Vec3::ZERO));
        assert_eq!(trail.len(), 1);
    }

    #[test]
    fn dead_zone_filters_jitter() {
        let mut trail = Trail::new();
        trail.push_if_moved(Vec3::ZERO);
        // Jitter of 0.05 around the recorded point never grows the trail.
        for i in 0..100 {
            let x = if i % 2 == 0 { 0.05 } else { 0.0 };
            assert!(!trail.push_if_moved(Vec3::new(x, 0.0, 0.0)));
        }
        assert_eq!(trail.len(), 1);
    }

    #[test]
    fn any_axis_beyond_dead_zone_records() {
        let mut trail = Trail::new();
        trail.push_if_moved(Vec3::ZERO);
        assert!(!trail.push_if_moved(Vec3::new(0.1, 0.1, 0.1)));
        assert!(trail.push_if_moved(Vec3::new(0.0, 0.0, 0.11)));
        assert_eq!(trail.len(), 2);
    }

    #[test]
    fn cap_evicts_oldest() {
        let mut trail = Trail::new();
        for i in 0..(TRAIL_CAP + 1) {
            assert!(trail.push_if_moved(Vec3::new(i as f32, 0.0, 0.0)));
        }
        assert_eq!(trail.len(), TRAIL_CAP);
        // Point 0 evicted; oldest is now point 1.
        assert_eq!(trail.oldest(), Some(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(trail.newest(), Some(Vec3::new(TRAIL_CAP as f32, 0.0, 0.0)));
    }
}
