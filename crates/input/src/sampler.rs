//! Control sampler: held-key state to ControlVector, plus one-shot
//! console actions.
//!
//! The sampler itself is pure. The console drives it from a 16 ms fixed
//! tick so holding a key produces a steady, evenly spaced command stream;
//! the resulting vector is written to the store and sent over the uplink
//! every tick whether or not it changed, because the simulator is
//! stateless with respect to control input.

use console_core::ControlVector;

use crate::{InputState, KeyCode};

/// Key bindings for movement and one-shot console actions.
#[derive(Debug, Clone)]
pub struct Bindings {
    pub forward: [KeyCode; 2],
    pub backward: [KeyCode; 2],
    pub turn_left: [KeyCode; 2],
    pub turn_right: [KeyCode; 2],
    /// Brake and ascend. Forces forward to 0; throttles up unless the
    /// descend modifier is held.
    pub brake: KeyCode,
    /// Descend modifier, wins over ascend throttle.
    pub descend: [KeyCode; 2],

    pub log_anchor: KeyCode,
    pub jam_down: KeyCode,
    pub jam_up: KeyCode,
    pub toggle_hud: KeyCode,
    pub toggle_debug: KeyCode,
    pub cycle_camera: KeyCode,
    pub arm: KeyCode,
    pub disarm: KeyCode,
    pub reset: KeyCode,
    pub commander_override: KeyCode,
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            forward: [KeyCode::KeyW, KeyCode::ArrowUp],
            backward: [KeyCode::KeyS, KeyCode::ArrowDown],
            turn_left: [KeyCode::KeyA, KeyCode::ArrowLeft],
            turn_right: [KeyCode::KeyD, KeyCode::ArrowRight],
            brake: KeyCode::Space,
            descend: [KeyCode::ShiftLeft, KeyCode::ShiftRight],
            log_anchor: KeyCode::KeyL,
            jam_down: KeyCode::BracketLeft,
            jam_up: KeyCode::BracketRight,
            toggle_hud: KeyCode::KeyH,
            // F3 rather than a letter: the turn keys already claim D,
            // and a debug toggle must never fight a movement key.
            toggle_debug: KeyCode::F3,
            cycle_camera: KeyCode::KeyC,
            arm: KeyCode::KeyP,
            disarm: KeyCode::KeyO,
            reset: KeyCode::KeyR,
            commander_override: KeyCode::KeyB,
        }
    }
}

/// Fixed step applied by the jam nudge keys.
pub const JAM_STEP: f32 = 5.0;

/// Throttle while the descend modifier is held.
pub const THROTTLE_DESCEND: f32 = 0.3;
/// Throttle while ascending (brake key without descend modifier).
pub const THROTTLE_ASCEND: f32 = 0.7;

/// One-shot console actions, edge-triggered on key-down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConsoleAction {
    LogAnchor,
    /// Nudge the jam level by a signed step.
    AdjustJam(f32),
    ToggleHud,
    ToggleDebug,
    CycleCamera,
    SetCameraMode(console_core::CameraMode),
    Arm,
    Disarm,
    Reset,
    CommanderOverride,
}

fn any_held(input: &InputState, keys: &[KeyCode]) -> bool {
    keys.iter().any(|k| input.is_key_held(*k))
}

/// Derive the control vector from held keys.
///
/// Resolution order within a tick is last-writer-wins, not additive:
/// backward beats forward, turn-right beats turn-left, and the brake
/// forces forward to 0 regardless of the movement keys.
pub fn sample_controls(input: &InputState, bindings: &Bindings) -> ControlVector {
    let mut controls = ControlVector::default();

    if any_held(input, &bindings.forward) {
        controls.forward = 1.0;
    }
    if any_held(input, &bindings.backward) {
        controls.forward = -1.0;
    }
    if any_held(input, &bindings.turn_left) {
        controls.yaw = 1.0;
    }
    if any_held(input, &bindings.turn_right) {
        controls.yaw = -1.0;
    }

    let brake = input.is_key_held(bindings.brake);
    let descend = any_held(input, &bindings.descend);
    if descend {
        controls.throttle = THROTTLE_DESCEND;
    } else if brake {
        controls.throttle = THROTTLE_ASCEND;
    }
    if brake {
        controls.forward = 0.0;
    }

    controls
}

/// Collect the one-shot actions triggered this frame. Key repeat is
/// already filtered by [`InputState`], so each physical press yields
/// exactly one action.
pub fn collect_actions(input: &InputState, bindings: &Bindings) -> Vec<ConsoleAction> {
    use console_core::CameraMode;

    let mut actions = Vec::new();
    if input.is_key_pressed(bindings.log_anchor) {
        actions.push(ConsoleAction::LogAnchor);
    }
    if input.is_key_pressed(bindings.jam_down) {
        actions.push(ConsoleAction::AdjustJam(-JAM_STEP));
    }
    if input.is_key_pressed(bindings.jam_up) {
        actions.push(ConsoleAction::AdjustJam(JAM_STEP));
    }
    if input.is_key_pressed(bindings.toggle_hud) {
        actions.push(ConsoleAction::ToggleHud);
    }
    if input.is_key_pressed(bindings.toggle_debug) {
        actions.push(ConsoleAction::ToggleDebug);
    }
    if input.is_key_pressed(bindings.cycle_camera) {
        actions.push(ConsoleAction::CycleCamera);
    }
    for (key, mode) in [
        (KeyCode::Digit1, CameraMode::Fpv),
        (KeyCode::Digit2, CameraMode::Follow),
        (KeyCode::Digit3, CameraMode::Orbit),
        (KeyCode::Digit4, CameraMode::TopDown),
        (KeyCode::Digit5, CameraMode::Free),
    ] {
        if input.is_key_pressed(key) {
            actions.push(ConsoleAction::SetCameraMode(mode));
        }
    }
    if input.is_key_pressed(bindings.arm) {
        actions.push(ConsoleAction::Arm);
    }
    if input.is_key_pressed(bindings.disarm) {
        actions.push(ConsoleAction::Disarm);
    }
    if input.is_key_pressed(bindings.reset) {
        actions.push(ConsoleAction::Reset);
    }
    if input.is_key_pressed(bindings.commander_override) {
        actions.push(ConsoleAction::CommanderOverride);
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ElementState;

    fn held(keys: &[KeyCode]) -> InputState {
        let mut input = InputState::new();
        for k in keys {
            input.process_keyboard(*k, ElementState::Pressed);
        }
        input
    }

    #[test]
    fn idle_vector_is_zero() {
        let input = InputState::new();
        let c = sample_controls(&input, &Bindings::default());
        assert_eq!(c, ControlVector::default());
    }

    #[test]
    fn forward_and_turn() {
        let input = held(&[KeyCode::KeyW, KeyCode::KeyA]);
        let c = sample_controls(&input, &Bindings::default());
        assert_eq!(c.forward, 1.0);
        assert_eq!(c.yaw, 1.0);
        assert_eq!(c.throttle, 0.0);
    }

    #[test]
    fn backward_wins_over_forward() {
        let input = held(&[KeyCode::KeyW, KeyCode::KeyS]);
        let c = sample_controls(&input, &Bindings::default());
        assert_eq!(c.forward, -1.0);
    }

    #[test]
    fn turn_right_wins_over_left() {
        let input = held(&[KeyCode::ArrowLeft, KeyCode::ArrowRight]);
        let c = sample_controls(&input, &Bindings::default());
        assert_eq!(c.yaw, -1.0);
    }

    #[test]
    fn brake_overrides_forward() {
        let input = held(&[KeyCode::KeyW, KeyCode::Space]);
        let c = sample_controls(&input, &Bindings::default());
        assert_eq!(c.forward, 0.0);
        assert_eq!(c.throttle, THROTTLE_ASCEND);
    }

    #[test]
    fn descend_modifier_wins_over_ascend() {
        let input = held(&[KeyCode::Space, KeyCode::ShiftLeft]);
        let c = sample_controls(&input, &Bindings::default());
        assert_eq!(c.throttle, THROTTLE_DESCEND);
    }

    #[test]
    fn reserved_axes_stay_zero() {
        let input = held(&[KeyCode::KeyW, KeyCode::Space, KeyCode::ShiftLeft]);
        let c = sample_controls(&input, &Bindings::default());
        assert_eq!(c.pitch, 0.0);
        assert_eq!(c.roll, 0.0);
        assert_eq!(c.yaw_rate, 0.0);
    }

    #[test]
    fn one_shots_fire_once_per_press() {
        let bindings = Bindings::default();
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyL, ElementState::Pressed);
        let actions = collect_actions(&input, &bindings);
        assert_eq!(actions, vec![ConsoleAction::LogAnchor]);

        input.begin_frame();
        // Held across frames with key repeat: no further action.
        input.process_keyboard(KeyCode::KeyL, ElementState::Pressed);
        assert!(collect_actions(&input, &bindings).is_empty());
    }

    #[test]
    fn jam_nudge_steps() {
        let bindings = Bindings::default();
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::BracketLeft, ElementState::Pressed);
        input.process_keyboard(KeyCode::BracketRight, ElementState::Pressed);
        let actions = collect_actions(&input, &bindings);
        assert!(actions.contains(&ConsoleAction::AdjustJam(-5.0)));
        assert!(actions.contains(&ConsoleAction::AdjustJam(5.0)));
    }
}
