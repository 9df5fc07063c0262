//! Mesh data structures and primitive generation.

use crate::vertex::Vertex;
use wgpu::util::DeviceExt;

/// A GPU mesh with vertex and index buffers.
pub struct Mesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_indices: u32,
}

impl Mesh {
    /// Create a mesh from vertex and index data.
    pub fn new(device: &wgpu::Device, vertices: &[Vertex], indices: &[u32]) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            num_indices: indices.len() as u32,
        }
    }

    /// Create a unit cube centered at origin. The drone model, anchor
    /// markers, and starfield are all scaled/tinted instances of this.
    pub fn cube(device: &wgpu::Device) -> Self {
        let vertices = [
            // Front face
            Vertex::new([-0.5, -0.5, 0.5], [0.0, 0.0, 1.0], [0.0, 1.0]),
            Vertex::new([0.5, -0.5, 0.5], [0.0, 0.0, 1.0], [1.0, 1.0]),
            Vertex::new([0.5, 0.5, 0.5], [0.0, 0.0, 1.0], [1.0, 0.0]),
            Vertex::new([-0.5, 0.5, 0.5], [0.0, 0.0, 1.0], [0.0, 0.0]),
            // Back face
            Vertex::new([0.5, -0.5, -0.5], [0.0, 0.0, -1.0], [0.0, 1.0]),
            Vertex::new([-0.5, -0.5, -0.5], [0.0, 0.0, -1.0], [1.0, 1.0]),
            Vertex::new([-0.5, 0.5, -0.5], [0.0, 0.0, -1.0], [1.0, 0.0]),
            Vertex::new([0.5, 0.5, -0.5], [0.0, 0.0, -1.0], [0.0, 0.0]),
            // Top face
            Vertex::new([-0.5, 0.5, 0.5], [0.0, 1.0, 0.0], [0.0, 1.0]),
            Vertex::new([0.5, 0.5, 0.5], [0.0, 1.0, 0.0], [1.0, 1.0]),
            Vertex::new([0.5, 0.5, -0.5], [0.0, 1.0, 0.0], [1.0, 0.0]),
            Vertex::new([-0.5, 0.5, -0.5], [0.0, 1.0, 0.0], [0.0, 0.0]),
            // Bottom face
            Vertex::new([-0.5, -0.5, -0.5], [0.0, -1.0, 0.0], [0.0, 1.0]),
            Vertex::new([0.5, -0.5, -0.5], [0.0, -1.0, 0.0], [1.0, 1.0]),
            Vertex::new([0.5, -0.5, 0.5], [0.0, -1.0, 0.0], [1.0, 0.0]),
            Vertex::new([-0.5, -0.5, 0.5], [0.0, -1.0, 0.0], [0.0, 0.0]),
            // Right face
            Vertex::new([0.5, -0.5, 0.5], [1.0, 0.0, 0.0], [0.0, 1.0]),
            Vertex::new([0.5, -0.5, -0.5], [1.0, 0.0, 0.0], [1.0, 1.0]),
            Vertex::new([0.5, 0.5, -0.5], [1.0, 0.0, 0.0], [1.0, 0.0]),
            Vertex::new([0.5, 0.5, 0.5], [1.0, 0.0, 0.0], [0.0, 0.0]),
            // Left face
            Vertex::new([-0.5, -0.5, -0.5], [-1.0, 0.0, 0.0], [0.0, 1.0]),
            Vertex::new([-0.5, -0.5, 0.5], [-1.0, 0.0, 0.0], [1.0, 1.0]),
            Vertex::new([-0.5, 0.5, 0.5], [-1.0, 0.0, 0.0], [1.0, 0.0]),
            Vertex::new([-0.5, 0.5, -0.5], [-1.0, 0.0, 0.0], [0.0, 0.0]),
        ];

        #[rustfmt::skip]
        let indices: [u32; 36] = [
            0, 1, 2, 2, 3, 0,       // Front
            4, 5, 6, 6, 7, 4,       // Back
            8, 9, 10, 10, 11, 8,   // Top
            12, 13, 14, 14, 15, 12, // Bottom
            16, 17, 18, 18, 19, 16, // Right
            20, 21, 22, 22, 23, 20, // Left
        ];

        Self::new(device, &vertices, &indices)
    }

    /// Create a ground plane.
    pub fn plane(device: &wgpu::Device, size: f32) -> Self {
        let half = size / 2.0;
        let vertices = [
            Vertex::new([-half, 0.0, half], [0.0, 1.0, 0.0], [0.0, 0.0]),
            Vertex::new([half, 0.0, half], [0.0, 1.0, 0.0], [1.0, 0.0]),
            Vertex::new([half, 0.0, -half], [0.0, 1.0, 0.0], [1.0, 1.0]),
            Vertex::new([-half, 0.0, -half], [0.0, 1.0, 0.0], [0.0, 1.0]),
        ];

        let indices: [u32; 6] = [0, 1, 2, 2, 3, 0];

        Self::new(device, &vertices, &indices)
    }

    /// Flat disc in the XZ plane facing up (landing pad).
    pub fn disc(device: &wgpu::Device, radius: f32, segments: u32) -> Self {
        let mut vertices = vec![Vertex::new([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.5, 0.5])];
        for i in 0..=segments {
            let theta = std::f32::consts::TAU * i as f32 / segments as f32;
            let (sin_t, cos_t) = theta.sin_cos();
            vertices.push(Vertex::new(
                [radius * cos_t, 0.0, radius * sin_t],
                [0.0, 1.0, 0.0],
                [0.5 + 0.5 * cos_t, 0.5 + 0.5 * sin_t],
            ));
        }

        let mut indices = Vec::with_capacity(segments as usize * 3);
        for i in 0..segments {
            indices.push(0);
            indices.push(i + 2);
            indices.push(i + 1);
        }

        Self::new(device, &vertices, &indices)
    }

    /// Flat annulus in the XZ plane facing up (landing pad marker ring).
    pub fn ring(device: &wgpu::Device, inner: f32, outer: f32, segments: u32) -> Self {
        let mut vertices = Vec::with_capacity((segments as usize + 1) * 2);
        for i in 0..=segments {
            let theta = std::f32::consts::TAU * i as f32 / segments as f32;
            let (sin_t, cos_t) = theta.sin_cos();
            let u = i as f32 / segments as f32;
            vertices.push(Vertex::new(
                [inner * cos_t, 0.0, inner * sin_t],
                [0.0, 1.0, 0.0],
                [u, 0.0],
            ));
            vertices.push(Vertex::new(
                [outer * cos_t, 0.0, outer * sin_t],
                [0.0, 1.0, 0.0],
                [u, 1.0],
            ));
        }

        let mut indices = Vec::with_capacity(segments as usize * 6);
        for i in 0..segments {
            let base = i * 2;
            indices.extend_from_slice(&[base, base + 3, base + 1, base, base + 2, base + 3]);
        }

        Self::new(device, &vertices, &indices)
    }
}

/// Build vertices for a square grid of lines in the XZ plane, drawn with
/// the line pipeline (LineList, pairs of vertices per segment).
pub fn grid_lines(half_extent: f32, step: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    let n = (half_extent / step) as i32;
    for i in -n..=n {
        let offset = i as f32 * step;
        vertices.push(Vertex::with_color(
            [offset, 0.0, -half_extent],
            [0.0, 1.0, 0.0],
            [0.0, 0.0],
            color,
        ));
        vertices.push(Vertex::with_color(
            [offset, 0.0, half_extent],
            [0.0, 1.0, 0.0],
            [0.0, 0.0],
            color,
        ));
        vertices.push(Vertex::with_color(
            [-half_extent, 0.0, offset],
            [0.0, 1.0, 0.0],
            [0.0, 0.0],
            color,
        ));
        vertices.push(Vertex::with_color(
            [half_extent, 0.0, offset],
            [0.0, 1.0, 0.0],
            [0.0, 0.0],
            color,
        ));
    }
    vertices
}

/// Build LineList vertices connecting consecutive breadcrumb points.
pub fn trail_lines(points: impl Iterator<Item = glam::Vec3>, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    let mut prev: Option<glam::Vec3> = None;
    for p in points {
        if let Some(q) = prev {
            vertices.push(Vertex::with_color(q.to_array(), [0.0, 1.0, 0.0], [0.0, 0.0], color));
            vertices.push(Vertex::with_color(p.to_array(), [0.0, 1.0, 0.0], [0.0, 0.0], color));
        }
        prev = Some(p);
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn grid_segment_count() {
        // -5..=5 in both axes: 11 lines each way, 2 vertices per line.
        let vertices = grid_lines(50.0, 10.0, [1.0; 4]);
        assert_eq!(vertices.len(), 11 * 2 * 2);
    }

    #[test]
    fn trail_connects_consecutive_points() {
        let points = [Vec3::ZERO, Vec3::X, Vec3::Y];
        let vertices = trail_lines(points.into_iter(), [1.0; 4]);
        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(vertices[2].position, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn single_point_trail_is_empty() {
        let vertices = trail_lines(std::iter::once(Vec3::ZERO), [1.0; 4]);
        assert!(vertices.is_empty());
    }
}
