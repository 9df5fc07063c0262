//! Window event handling.

use input::{ElementState, KeyCode};
use winit::event::{KeyEvent, MouseScrollDelta, WindowEvent};
use winit::keyboard::PhysicalKey;

use crate::render;
use crate::ConsoleState;

impl ConsoleState {
    /// Handle a window event. Returns true when the console should exit.
    pub fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => true,
            WindowEvent::Resized(size) => {
                self.renderer.resize(size);
                self.camera_rig.set_aspect(size.width, size.height);
                false
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => {
                if code == KeyCode::Escape && state == ElementState::Pressed {
                    return true;
                }
                self.input.process_keyboard(code, state);
                false
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    // Touchpads report pixels; roughly 20 px per notch.
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / 20.0,
                };
                self.input.process_scroll(lines);
                false
            }
            WindowEvent::RedrawRequested => {
                self.update();
                if let Err(e) = render::run(self) {
                    if let Some(wgpu::SurfaceError::OutOfMemory) = e.downcast_ref() {
                        log::error!("Out of GPU memory, exiting");
                        return true;
                    }
                    // Lost or outdated surfaces recover on reconfigure.
                    log::warn!("Dropped frame: {}", e);
                    let size = self.renderer.size;
                    self.renderer.resize(size);
                }
                self.renderer.window.request_redraw();
                false
            }
            _ => false,
        }
    }
}
