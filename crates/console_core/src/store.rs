//! Shared state store: the single source of truth for vehicle, doctrine,
//! camera, and UI state.
//!
//! All mutation happens on the main thread through the setters below;
//! each setter commits its field group and then synchronously notifies
//! every subscriber with the full new state. Subscribers pick out the
//! fields they care about. There is no locking because there is no
//! preemption: the uplink reader thread never touches the store, it only
//! feeds a channel the main thread drains.

use crate::camera::CameraSettings;
use crate::telemetry::{
    ConnectionStatus, ControlVector, DoctrineOverlay, Status, Thresholds, VehicleState,
    VehicleUpdate,
};

/// Full console state snapshot passed to subscribers.
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    pub vehicle: VehicleState,
    pub doctrine: DoctrineOverlay,
    pub camera: CameraSettings,
    pub thresholds: Thresholds,
    pub connection: ConnectionStatus,
    pub hud_visible: bool,
    pub debug_visible: bool,
    /// True once any pose has been received this session. The render loop
    /// skips camera and trail updates until then.
    pub pose_received: bool,
}

impl StoreState {
    fn session_defaults() -> Self {
        Self {
            hud_visible: true,
            ..Self::default()
        }
    }
}

/// Handle returned by [`Store::subscribe`]; pass to `unsubscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberId(u64);

type Subscriber = Box<dyn FnMut(&StoreState)>;

/// The process-wide state store. Owned by the console state, mutated only
/// on the event-loop thread.
pub struct Store {
    state: StoreState,
    subscribers: Vec<(u64, Subscriber)>,
    next_id: u64,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self {
            state: StoreState::session_defaults(),
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    /// Read access to the latest committed state.
    pub fn state(&self) -> &StoreState {
        &self.state
    }

    /// Register a callback invoked synchronously after every committed
    /// write, with the full new state.
    pub fn subscribe(&mut self, f: impl FnMut(&StoreState) + 'static) -> SubscriberId {
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push((id, Box::new(f)));
        SubscriberId(id)
    }

    /// Remove a subscriber. Unsubscribing twice is a no-op.
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.retain(|(sid, _)| *sid != id.0);
    }

    fn notify(&mut self) {
        let state = &self.state;
        for (_, f) in &mut self.subscribers {
            f(state);
        }
    }

    // ── Field-group setters ─────────────────────────────────────────────

    /// Apply a validated inbound vehicle snapshot.
    pub fn apply_vehicle_update(&mut self, update: &VehicleUpdate) {
        self.state.vehicle.apply(update);
        self.state.pose_received = true;
        self.notify();
    }

    /// Seed the full vehicle state (session creation).
    pub fn set_vehicle(&mut self, vehicle: VehicleState) {
        self.state.vehicle = vehicle;
        self.state.pose_received = true;
        self.notify();
    }

    /// Replace the doctrine overlay wholesale.
    pub fn set_doctrine(&mut self, doctrine: DoctrineOverlay) {
        self.state.doctrine = doctrine;
        self.notify();
    }

    /// Local optimistic write of the sampled control vector.
    pub fn set_controls(&mut self, controls: ControlVector) {
        self.state.vehicle.controls = controls;
        self.notify();
    }

    /// Jam level change acknowledged by the simulator.
    pub fn set_gps_jam(&mut self, gps_jam: f32) {
        self.state.vehicle.gps_jam = gps_jam.clamp(0.0, 100.0);
        self.notify();
    }

    pub fn set_thresholds(&mut self, thresholds: Thresholds) {
        self.state.thresholds = thresholds;
        self.notify();
    }

    pub fn set_connection(&mut self, connection: ConnectionStatus) {
        if self.state.connection != connection {
            log::info!("Uplink {}", connection.label());
        }
        self.state.connection = connection;
        self.notify();
    }

    /// Mutate camera settings in place (mode, distance).
    pub fn update_camera(&mut self, f: impl FnOnce(&mut CameraSettings)) {
        f(&mut self.state.camera);
        self.notify();
    }

    pub fn toggle_hud(&mut self) {
        self.state.hud_visible = !self.state.hud_visible;
        self.notify();
    }

    pub fn toggle_debug(&mut self) {
        self.state.debug_visible = !self.state.debug_visible;
        self.notify();
    }

    /// Reset vehicle, doctrine, and thresholds to defaults on session
    /// teardown. Camera and UI toggles are operator preferences and
    /// survive the reset.
    pub fn reset_session(&mut self) {
        let camera = self.state.camera;
        let hud = self.state.hud_visible;
        let debug = self.state.debug_visible;
        let connection = self.state.connection;
        self.state = StoreState::session_defaults();
        self.state.camera = camera;
        self.state.hud_visible = hud;
        self.state.debug_visible = debug;
        self.state.connection = connection;
        self.notify();
    }

    /// Convenience read of the current status.
    pub fn status(&self) -> Status {
        self.state.vehicle.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn subscriber_fires_once_per_commit() {
        let mut store = Store::new();
        let count = Rc::new(RefCell::new(0u32));
        let c = count.clone();
        store.subscribe(move |_| *c.borrow_mut() += 1);

        store.set_controls(ControlVector::default());
        store.set_thresholds(Thresholds::default());
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn subscriber_sees_committed_state() {
        let mut store = Store::new();
        let seen = Rc::new(RefCell::new(Vec3::ZERO));
        let s = seen.clone();
        store.subscribe(move |state| *s.borrow_mut() = state.vehicle.position);

        let update = VehicleUpdate {
            position: Vec3::new(3.0, 4.0, 5.0),
            rotation: Vec3::ZERO,
            ..Default::default()
        };
        store.apply_vehicle_update(&update);
        assert_eq!(*seen.borrow(), Vec3::new(3.0, 4.0, 5.0));
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let mut store = Store::new();
        let count = Rc::new(RefCell::new(0u32));
        let c = count.clone();
        let id = store.subscribe(move |_| *c.borrow_mut() += 1);

        store.toggle_hud();
        store.unsubscribe(id);
        store.unsubscribe(id);
        store.toggle_hud();
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn reset_preserves_operator_preferences() {
        let mut store = Store::new();
        store.update_camera(|c| c.set_distance(25.0));
        store.toggle_debug();
        store.set_vehicle(VehicleState {
            battery: 12.0,
            ..Default::default()
        });

        store.reset_session();
        assert_eq!(store.state().camera.distance(), 25.0);
        assert!(store.state().debug_visible);
        assert_eq!(store.state().vehicle.battery, 100.0);
        assert!(!store.state().pose_received);
    }

    #[test]
    fn controls_write_is_local_only() {
        let mut store = Store::new();
        let controls = ControlVector {
            forward: 1.0,
            throttle: 0.7,
            ..Default::default()
        };
        store.set_controls(controls);
        assert_eq!(store.state().vehicle.controls, controls);
        // A controls write does not count as a received pose.
        assert!(!store.state().pose_received);
    }
}
