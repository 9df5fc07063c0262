//! Per-frame console update: drain the uplink, react to status edges,
//! apply operator actions, and run the fixed-rate control sampler.

use audio::Cue;
use console_core::{ConnectionStatus, Status};
use input::{collect_actions, sample_controls, ConsoleAction};
use renderer::VehiclePose;
use uplink::{Inbound, Outbound};

use crate::scene::PROP_SPIN_RATE;
use crate::ConsoleState;

impl ConsoleState {
    pub fn update(&mut self) {
        let delta = self.clock.tick();

        let messages = match &self.uplink {
            Some(link) => link.poll(),
            None => Vec::new(),
        };
        for msg in messages {
            if !self.session.accepts(&msg) {
                continue;
            }
            self.apply_inbound(msg);
        }

        self.sync_connection();
        self.drain_status_edges();

        let scroll = self.input.scroll_delta();
        if scroll != 0.0 {
            // Scroll up zooms in.
            self.store.update_camera(|c| c.adjust_distance(-scroll * 2.0));
        }

        for action in collect_actions(&self.input, &self.bindings) {
            self.apply_action(action);
        }

        let ticks = self.sampler_tick.advance(delta);
        if ticks > 0 {
            let controls = sample_controls(&self.input, &self.bindings);
            self.store.set_controls(controls);
            // One command per elapsed tick keeps the stream evenly paced
            // even when a frame spans several sampler periods.
            for _ in 0..ticks {
                self.send_command(|id| Outbound::SetControls {
                    session_id: id,
                    forward: controls.forward,
                    yaw: controls.yaw,
                    throttle: controls.throttle,
                    pitch: controls.pitch,
                    roll: controls.roll,
                    yaw_rate: controls.yaw_rate,
                });
            }
        }

        if self.store.state().pose_received {
            let position = self.store.state().vehicle.position;
            self.trail.push_if_moved(position);
        }

        let armed = self.store.state().vehicle.armed;
        self.mission_timer.observe(armed);

        self.scene.prop_spin += PROP_SPIN_RATE;

        let state = self.store.state();
        let pose = state.pose_received.then(|| VehiclePose {
            position: state.vehicle.position,
            yaw: state.vehicle.heading(),
        });
        let settings = state.camera;
        let elapsed = self.clock.elapsed_seconds();
        self.camera_rig.update(pose, &settings, elapsed);
        self.renderer.update_camera(&self.camera_rig);

        if let Some(audio) = &mut self.audio {
            audio.cleanup();
        }
        self.input.begin_frame();
    }

    /// Keep the store's connection status in sync with the link and the
    /// session binding. Commits only on change.
    fn sync_connection(&mut self) {
        let desired = match &self.uplink {
            None => ConnectionStatus::Disconnected,
            Some(link) if !link.is_connected() => ConnectionStatus::Disconnected,
            Some(_) if self.session.is_bound() => ConnectionStatus::Connected,
            Some(_) => ConnectionStatus::Connecting,
        };
        if self.store.state().connection != desired {
            self.store.set_connection(desired);
        }
    }

    /// Run every status committed since the last frame through the edge
    /// detector and play a cue per transition.
    fn drain_status_edges(&mut self) {
        let statuses: Vec<Status> = self.pending_status.borrow_mut().drain(..).collect();
        for status in statuses {
            if let Some(kind) = self.alerts.observe(status) {
                self.play_cue(Cue::from(kind));
            }
        }
    }

    fn apply_inbound(&mut self, msg: Inbound) {
        match msg {
            Inbound::SessionCreated {
                session_id,
                initial_state,
                thresholds,
            } => {
                let rebinding = self.session.id().is_some_and(|prev| prev != session_id);
                if rebinding {
                    self.store.reset_session();
                    self.trail.clear();
                    self.alerts.reset();
                }
                self.session.bind(&session_id);
                log::info!("Session {} established", session_id);
                if let Some(t) = thresholds {
                    self.store.set_thresholds(t.into());
                }
                if let Some(snapshot) = initial_state {
                    match snapshot.into_update() {
                        Ok(update) => self.store.apply_vehicle_update(&update),
                        Err(e) => log::warn!("Rejecting initial snapshot: {}", e),
                    }
                }
            }
            Inbound::StateUpdate { state, doctrine, .. } => {
                if let Some(snapshot) = state {
                    match snapshot.into_update() {
                        Ok(update) => self.store.apply_vehicle_update(&update),
                        Err(e) => log::warn!("Rejecting snapshot: {}", e),
                    }
                }
                if let Some(d) = doctrine {
                    self.store.set_doctrine(d.into_overlay());
                }
            }
            Inbound::Status { message, .. } => log::info!("Simulator: {}", message),
            Inbound::AnchorLogged {
                success, position, ..
            } => {
                if success {
                    log::info!("Anchor logged at {:?}", position);
                    self.play_cue(Cue::Confirm);
                } else {
                    log::warn!("Anchor rejected by simulator");
                }
            }
            Inbound::JamChanged { gps_jam, .. } => self.store.set_gps_jam(gps_jam),
        }
    }

    fn apply_action(&mut self, action: ConsoleAction) {
        match action {
            ConsoleAction::LogAnchor => {
                let confidence = self.store.state().vehicle.nav_confidence;
                let reject = self.store.state().thresholds.reject;
                if confidence > reject {
                    self.send_command(|id| Outbound::LogAnchor { session_id: id });
                } else {
                    log::warn!(
                        "Anchor blocked: nav confidence {:.0} at or below reject threshold",
                        confidence
                    );
                }
            }
            ConsoleAction::AdjustJam(delta) => {
                self.send_command(move |id| Outbound::AdjustJam {
                    session_id: id,
                    delta,
                });
            }
            ConsoleAction::ToggleHud => self.store.toggle_hud(),
            ConsoleAction::ToggleDebug => self.store.toggle_debug(),
            ConsoleAction::CycleCamera => self.store.update_camera(|c| c.cycle_mode()),
            ConsoleAction::SetCameraMode(mode) => {
                self.store.update_camera(move |c| c.mode = mode)
            }
            ConsoleAction::Arm => self.send_command(|id| Outbound::Arm { session_id: id }),
            ConsoleAction::Disarm => self.send_command(|id| Outbound::Disarm { session_id: id }),
            ConsoleAction::Reset => {
                self.trail.clear();
                self.send_command(|id| Outbound::Reset { session_id: id });
            }
            ConsoleAction::CommanderOverride => {
                self.send_command(|id| Outbound::CommanderOverride { session_id: id })
            }
        }
    }

    fn play_cue(&mut self, cue: Cue) {
        if let Some(audio) = &mut self.audio {
            audio.play(cue);
        }
    }

    /// Stamp the bound session id onto a command and send it. Commands
    /// issued before a session exists are dropped.
    fn send_command(&mut self, make: impl FnOnce(String) -> Outbound) {
        let Some(id) = self.session.id().map(str::to_owned) else {
            log::debug!("No session bound, dropping command");
            return;
        };
        if let Some(link) = &mut self.uplink {
            link.send(&make(id));
        }
    }
}
