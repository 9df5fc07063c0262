//! Frame rendering: scene passes, line passes, and the HUD overlay.

pub mod overlay;

use anyhow::Result;
use glam::{Mat4, Vec3};
use renderer::{trail_lines, InstanceData};

use crate::scene;
use crate::ConsoleState;

const TRAIL_COLOR: [f32; 4] = [0.3, 0.85, 1.0, 0.8];

/// Render one frame from the current console state.
pub fn run(state: &mut ConsoleState) -> Result<()> {
    let (output, mut encoder) = state.renderer.begin_frame()?;
    let view = output
        .texture
        .create_view(&wgpu::TextureViewDescriptor::default());

    let snapshot = state.store.state().clone();

    // Ground plane clears the frame; everything after loads.
    let ground = [InstanceData::new(
        Mat4::from_translation(Vec3::new(0.0, -0.05, 0.0)).to_cols_array_2d(),
        [0.04, 0.07, 0.05, 1.0],
    )];
    state
        .renderer
        .render_instanced(&mut encoder, &view, &state.scene.ground, &ground);

    // Launch pad and its ring marker.
    let pad = [InstanceData::new(
        Mat4::from_translation(Vec3::new(0.0, 0.02, 0.0)).to_cols_array_2d(),
        [0.1, 0.12, 0.14, 1.0],
    )];
    state
        .renderer
        .render_instanced_load(&mut encoder, &view, &state.scene.pad, &pad);
    let ring = [InstanceData::new(
        Mat4::from_translation(Vec3::new(0.0, 0.03, 0.0)).to_cols_array_2d(),
        [0.0, 0.8, 0.4, 1.0],
    )];
    state
        .renderer
        .render_instanced_load(&mut encoder, &view, &state.scene.pad_ring, &ring);

    // One cube batch: stars, doctrine markers, then the drone itself.
    let mut cubes = state.scene.stars.clone();
    cubes.extend(scene::anchor_instances(&snapshot.doctrine.anchors));
    if let Some(target) = scene::target_instance(snapshot.doctrine.target_point) {
        cubes.push(target);
    }
    if snapshot.pose_received {
        cubes.extend(scene::drone_instances(
            snapshot.vehicle.position,
            snapshot.vehicle.rotation,
            state.scene.prop_spin,
        ));
    }
    state
        .renderer
        .render_instanced_load(&mut encoder, &view, &state.scene.cube, &cubes);

    // Ground grid plus the recorded flight trail.
    let mut lines = state.scene.grid.clone();
    lines.extend(trail_lines(state.trail.iter().copied(), TRAIL_COLOR));
    state.renderer.render_lines(&mut encoder, &view, &lines);

    let (w, h) = state.renderer.dimensions();
    let tb = overlay::build(
        &snapshot,
        state.clock.fps(),
        state.mission_timer.elapsed_seconds(),
        w as f32,
        h as f32,
    );
    state
        .renderer
        .render_overlay(&mut encoder, &view, &tb.vertices, &tb.indices);

    state.renderer.end_frame(output, encoder);
    Ok(())
}
