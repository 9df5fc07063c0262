//! OpenGCS operator console entry point.

mod config;
mod events;
mod hud;
mod render;
mod scene;
mod tactical_map;
mod update;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::Result;
use console_core::{
    AlertReactor, ConnectionStatus, FixedTick, FrameClock, Status, Store, SubscriberId, Trail,
};
use input::{Bindings, InputState};
use renderer::{CameraRig, Renderer};
use uplink::{SessionBinding, UplinkClient};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Fullscreen, Window, WindowId};

use audio::AudioSystem;
use config::ConsoleConfig;
use hud::MissionTimer;
use scene::SceneAssets;

/// Everything the console owns: the store, the link, timing, input, and
/// the GPU side. Lives for the whole window lifetime.
pub struct ConsoleState {
    config: ConsoleConfig,
    store: Store,
    input: InputState,
    bindings: Bindings,
    clock: FrameClock,
    sampler_tick: FixedTick,
    trail: Trail,
    alerts: AlertReactor,
    mission_timer: MissionTimer,
    /// Statuses committed to the store since the last frame, fed by a
    /// store subscription and drained by the alert reactor.
    pending_status: Rc<RefCell<Vec<Status>>>,
    status_sub: SubscriberId,
    audio: Option<AudioSystem>,
    uplink: Option<UplinkClient>,
    session: SessionBinding,
    renderer: Renderer,
    camera_rig: CameraRig,
    scene: SceneAssets,
    shut_down: bool,
}

impl ConsoleState {
    async fn new(window: Arc<Window>, config: ConsoleConfig) -> Result<Self> {
        let renderer = Renderer::new(window).await?;
        let mut camera_rig = CameraRig::new();
        let (w, h) = renderer.dimensions();
        camera_rig.set_aspect(w, h);
        let scene = SceneAssets::new(renderer.device());

        let mut store = Store::new();
        let pending_status = Rc::new(RefCell::new(Vec::new()));
        let pending = pending_status.clone();
        let status_sub = store.subscribe(move |s| pending.borrow_mut().push(s.vehicle.status));

        // Missing audio output is a degraded mode, not a startup failure.
        let audio = if config.audio_enabled {
            match AudioSystem::new() {
                Ok(a) => Some(a),
                Err(e) => {
                    log::warn!("Audio unavailable, cues disabled: {}", e);
                    None
                }
            }
        } else {
            None
        };

        // Same for the simulator link: the console renders last-known
        // (default) state while offline.
        let uplink = match UplinkClient::connect(&config.server_addr) {
            Ok(link) => {
                store.set_connection(ConnectionStatus::Connecting);
                Some(link)
            }
            Err(e) => {
                log::warn!("Simulator unreachable, starting offline: {:#}", e);
                None
            }
        };

        Ok(Self {
            config,
            store,
            input: InputState::new(),
            bindings: Bindings::default(),
            clock: FrameClock::new(),
            sampler_tick: FixedTick::default(),
            trail: Trail::new(),
            alerts: AlertReactor::new(),
            mission_timer: MissionTimer::new(),
            pending_status,
            status_sub,
            audio,
            uplink,
            session: SessionBinding::new(),
            renderer,
            camera_rig,
            scene,
            shut_down: false,
        })
    }

    /// Tear everything down. Idempotent: a second call is a no-op.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        if let Some(mut link) = self.uplink.take() {
            link.shutdown();
        }
        if let Some(audio) = &mut self.audio {
            audio.stop_all();
        }
        self.store.unsubscribe(self.status_sub);
        self.config.save();
        log::info!("Console shut down");
    }
}

#[derive(Default)]
struct App {
    state: Option<ConsoleState>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let config = ConsoleConfig::load();
        let mut attrs = Window::default_attributes()
            .with_title("OpenGCS Operator Console")
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.window_width,
                config.window_height,
            ));
        if config.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Could not create window: {}", e);
                event_loop.exit();
                return;
            }
        };
        match pollster::block_on(ConsoleState::new(window, config)) {
            Ok(state) => {
                state.renderer.window.request_redraw();
                self.state = Some(state);
            }
            Err(e) => {
                log::error!("Console startup failed: {:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(state) = &mut self.state {
            if state.handle_window_event(event) {
                state.shutdown();
                event_loop.exit();
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("╔════════════════════════════════════════════════╗");
    println!("║           OpenGCS Operator Console             ║");
    println!("╠════════════════════════════════════════════════╣");
    println!("║  W/S A/D   steer        Space   brake/ascend   ║");
    println!("║  Shift     descend      L       log anchor     ║");
    println!("║  [ / ]     jam level    P/O     arm/disarm     ║");
    println!("║  C, 1-5    camera       H/F3    hud/debug      ║");
    println!("║  R  reset  B  commander override  Esc  quit    ║");
    println!("╚════════════════════════════════════════════════╝");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    let mut app = App::default();
    event_loop.run_app(&mut app)?;
    Ok(())
}
