//! Static 3D scene and the drone model.
//!
//! Everything is composed from a handful of primitive meshes drawn
//! instanced; the drone itself is a body, two arm bars, four spinning
//! props, and a nose marker, all scaled cube instances.

use glam::{EulerRot, Mat4, Quat, Vec3};
use rand::{Rng, SeedableRng};
use renderer::{grid_lines, InstanceData, Mesh, Vertex};

/// Prop rotation advance per rendered frame, in radians.
pub const PROP_SPIN_RATE: f32 = 0.5;

/// Ground grid half extent in world units.
const GRID_HALF: f32 = 100.0;
const GRID_STEP: f32 = 10.0;

const STAR_COUNT: usize = 600;

/// GPU meshes and precomputed instance lists for the static scene.
pub struct SceneAssets {
    pub cube: Mesh,
    pub ground: Mesh,
    pub pad: Mesh,
    pub pad_ring: Mesh,
    /// Ground grid line vertices, built once.
    pub grid: Vec<Vertex>,
    /// Starfield instances, built once from a fixed seed.
    pub stars: Vec<InstanceData>,
    /// Accumulated prop rotation.
    pub prop_spin: f32,
}

impl SceneAssets {
    pub fn new(device: &wgpu::Device) -> Self {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0x6763_7321);
        let mut stars = Vec::with_capacity(STAR_COUNT);
        for _ in 0..STAR_COUNT {
            // Uniform over the upper hemisphere, pushed out past the far grid.
            let azimuth = rng.gen_range(0.0..std::f32::consts::TAU);
            let elevation = rng.gen_range(0.05f32..1.4);
            let radius = rng.gen_range(350.0f32..500.0);
            let position = Vec3::new(
                radius * elevation.cos() * azimuth.cos(),
                radius * elevation.sin(),
                radius * elevation.cos() * azimuth.sin(),
            );
            let size = rng.gen_range(0.3f32..0.9);
            let brightness = rng.gen_range(0.4f32..1.0);
            stars.push(InstanceData::new(
                Mat4::from_scale_rotation_translation(Vec3::splat(size), Quat::IDENTITY, position)
                    .to_cols_array_2d(),
                [brightness, brightness, brightness * 0.95, 1.0],
            ));
        }

        Self {
            cube: Mesh::cube(device),
            ground: Mesh::plane(device, 2.0 * GRID_HALF),
            pad: Mesh::disc(device, 6.0, 48),
            pad_ring: Mesh::ring(device, 6.2, 7.0, 48),
            grid: grid_lines(GRID_HALF, GRID_STEP, [0.0, 0.35, 0.15, 0.5]),
            stars,
            prop_spin: 0.0,
        }
    }
}

fn part(base: Mat4, offset: Vec3, rotation: Quat, scale: Vec3, color: [f32; 4]) -> InstanceData {
    let local = Mat4::from_scale_rotation_translation(scale, rotation, offset);
    InstanceData::new((base * local).to_cols_array_2d(), color)
}

/// Build the drone model instances for the current pose and prop phase.
pub fn drone_instances(position: Vec3, rotation: Vec3, prop_spin: f32) -> Vec<InstanceData> {
    let base = Mat4::from_rotation_translation(
        Quat::from_euler(EulerRot::YXZ, rotation.y, rotation.x, rotation.z),
        position,
    );

    let body = [0.16, 0.17, 0.19, 1.0];
    let arm = [0.28, 0.29, 0.31, 1.0];
    let prop = [0.08, 0.08, 0.09, 1.0];
    let nose = [0.0, 1.0, 0.53, 1.0];

    let mut parts = vec![
        part(base, Vec3::ZERO, Quat::IDENTITY, Vec3::new(0.6, 0.2, 0.9), body),
        // Crossed arm bars under the props.
        part(
            base,
            Vec3::new(0.0, 0.05, 0.0),
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_4),
            Vec3::new(1.6, 0.08, 0.12),
            arm,
        ),
        part(
            base,
            Vec3::new(0.0, 0.05, 0.0),
            Quat::from_rotation_y(-std::f32::consts::FRAC_PI_4),
            Vec3::new(1.6, 0.08, 0.12),
            arm,
        ),
        // Nose marker so the facing reads at a glance.
        part(
            base,
            Vec3::new(0.0, 0.0, 0.5),
            Quat::IDENTITY,
            Vec3::new(0.15, 0.15, 0.15),
            nose,
        ),
    ];

    // Props at the four arm tips, counter-rotating pairs.
    let tip = 1.6 * 0.5 * std::f32::consts::FRAC_PI_4.cos();
    for (i, (sx, sz)) in [(1.0, 1.0), (-1.0, 1.0), (-1.0, -1.0), (1.0, -1.0)]
        .iter()
        .enumerate()
    {
        let spin = if i % 2 == 0 { prop_spin } else { -prop_spin };
        parts.push(part(
            base,
            Vec3::new(sx * tip, 0.14, sz * tip),
            Quat::from_rotation_y(spin),
            Vec3::new(0.55, 0.02, 0.07),
            prop,
        ));
    }

    parts
}

/// Anchor markers: small amber cubes at logged positions.
pub fn anchor_instances(anchors: &[Vec3]) -> Vec<InstanceData> {
    anchors
        .iter()
        .map(|p| {
            InstanceData::new(
                Mat4::from_scale_rotation_translation(
                    Vec3::splat(0.4),
                    Quat::from_rotation_y(std::f32::consts::FRAC_PI_4),
                    *p,
                )
                .to_cols_array_2d(),
                [1.0, 0.67, 0.0, 1.0],
            )
        })
        .collect()
}

/// Return-target marker, when the doctrine overlay carries one.
pub fn target_instance(target: Option<Vec3>) -> Option<InstanceData> {
    target.map(|p| {
        InstanceData::new(
            Mat4::from_scale_rotation_translation(Vec3::splat(0.6), Quat::IDENTITY, p)
                .to_cols_array_2d(),
            [0.3, 0.85, 1.0, 0.9],
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drone_has_nine_parts() {
        let parts = drone_instances(Vec3::new(0.0, 2.0, 0.0), Vec3::ZERO, 0.0);
        assert_eq!(parts.len(), 9);
    }

    #[test]
    fn drone_parts_track_position() {
        let a = drone_instances(Vec3::ZERO, Vec3::ZERO, 0.0);
        let b = drone_instances(Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO, 0.0);
        // Translation column shifts by the position delta for every part.
        for (pa, pb) in a.iter().zip(&b) {
            assert!((pb.model[3][0] - pa.model[3][0] - 10.0).abs() < 1e-4);
        }
    }

    #[test]
    fn anchors_map_one_to_one() {
        let anchors = [Vec3::ZERO, Vec3::new(5.0, 1.0, 5.0)];
        assert_eq!(anchor_instances(&anchors).len(), 2);
        assert!(target_instance(None).is_none());
        assert!(target_instance(Some(Vec3::ONE)).is_some());
    }
}
