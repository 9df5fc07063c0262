//! Tactical map: top-down overhead projection of the operating area,
//! drawn in the overlay's top-right corner. North (+Z) is up. The map is
//! centered on the origin and auto-zooms to keep the vehicle in frame.
//!
//! Projection math is pure and separate from drawing.

use crate::hud;
use glam::Vec3;
use renderer::OverlayBuilder;

/// Map panel edge length in pixels.
pub const MAP_SIZE: f32 = 160.0;
/// Gap from the screen edges.
pub const MAP_MARGIN: f32 = 12.0;
/// Minimum world half-extent shown, so the map does not over-zoom when
/// the vehicle sits near the origin.
pub const MIN_RANGE: f32 = 40.0;
/// Headroom multiplier so the vehicle marker never touches the border.
const RANGE_PAD: f32 = 1.2;

/// Placement and zoom of the map panel for one frame.
#[derive(Debug, Clone, Copy)]
pub struct MapFrame {
    /// Panel center in screen pixels.
    pub center: [f32; 2],
    /// Half the panel edge in pixels.
    pub half: f32,
    /// Pixels per world unit.
    pub scale: f32,
}

/// Compute panel placement and zoom from the vehicle position.
pub fn frame(screen_w: f32, vehicle: Vec3) -> MapFrame {
    let half = MAP_SIZE * 0.5;
    let range = vehicle.x.abs().max(vehicle.z.abs()).max(MIN_RANGE) * RANGE_PAD;
    MapFrame {
        center: [screen_w - MAP_MARGIN - half, MAP_MARGIN + half],
        half,
        scale: half / range,
    }
}

/// Project a world position into panel pixels. +X east goes right, +Z
/// north goes up (screen y decreases).
pub fn world_to_map(f: &MapFrame, p: Vec3) -> [f32; 2] {
    [f.center[0] + p.x * f.scale, f.center[1] - p.z * f.scale]
}

/// Vertices of the vehicle marker triangle, tip pointing along the heading.
pub fn heading_triangle(at: [f32; 2], heading: f32, size: f32) -> [[f32; 2]; 3] {
    // World forward for yaw h is (sin h, cos h) in the XZ plane; +Z is up
    // on the panel, so screen-forward is (sin h, -cos h).
    let fwd = [heading.sin(), -heading.cos()];
    let right = [-fwd[1], fwd[0]];
    let tip = [at[0] + fwd[0] * size, at[1] + fwd[1] * size];
    let back = 0.6 * size;
    let left_v = [
        at[0] - fwd[0] * back - right[0] * back,
        at[1] - fwd[1] * back - right[1] * back,
    ];
    let right_v = [
        at[0] - fwd[0] * back + right[0] * back,
        at[1] - fwd[1] * back + right[1] * back,
    ];
    [tip, left_v, right_v]
}

/// Vehicle marker color: red when flying retrograde, green otherwise.
pub fn marker_color(retrograde: bool) -> [f32; 4] {
    if retrograde {
        [1.0, 0.2, 0.2, 1.0]
    } else {
        [0.0, 1.0, 0.53, 1.0]
    }
}

/// Draw the tactical map into the overlay. Draw order is background,
/// grid, range rings, breadcrumbs, anchors, vehicle marker, origin.
#[allow(clippy::too_many_arguments)]
pub fn draw(
    tb: &mut OverlayBuilder,
    f: &MapFrame,
    vehicle: Vec3,
    heading: f32,
    retrograde: bool,
    breadcrumbs: &[Vec3],
    anchors: &[Vec3],
    target: Option<Vec3>,
) {
    let [cx, cy] = f.center;
    let top_left = [cx - f.half, cy - f.half];

    tb.add_rect(
        top_left[0],
        top_left[1],
        MAP_SIZE,
        MAP_SIZE,
        [0.0, 0.02, 0.0, 0.68],
    );

    // Grid every 10 world units, clipped to the panel.
    let grid_color = [0.0, 0.5, 0.2, 0.25];
    let mut w = -50.0f32;
    while w <= 50.0 {
        let x = cx + w * f.scale;
        if (x - cx).abs() <= f.half {
            tb.add_line([x, cy - f.half], [x, cy + f.half], 1.0, grid_color);
        }
        let y = cy - w * f.scale;
        if (y - cy).abs() <= f.half {
            tb.add_line([cx - f.half, y], [cx + f.half, y], 1.0, grid_color);
        }
        w += 10.0;
    }

    // Range rings at 20/40/60 world units.
    for radius in [20.0, 40.0, 60.0] {
        let px = radius * f.scale;
        if px <= f.half {
            tb.add_circle_outline([cx, cy], px, 1.0, [0.0, 0.7, 0.3, 0.4]);
        }
    }

    if breadcrumbs.len() >= 2 {
        let points: Vec<[f32; 2]> = breadcrumbs.iter().map(|p| world_to_map(f, *p)).collect();
        tb.add_polyline(&points, 1.0, [0.3, 0.85, 1.0, 0.7]);
    }

    for anchor in anchors {
        let [ax, ay] = world_to_map(f, *anchor);
        tb.add_rect(ax - 2.0, ay - 2.0, 4.0, 4.0, hud::AMBER);
    }

    if let Some(t) = target {
        let [tx, ty] = world_to_map(f, t);
        tb.add_circle_outline([tx, ty], 4.0, 1.0, [1.0, 1.0, 1.0, 0.9]);
    }

    let at = world_to_map(f, vehicle);
    tb.add_triangle(heading_triangle(at, heading, 6.0), marker_color(retrograde));

    // Origin marker (launch point).
    tb.add_line([cx - 3.0, cy], [cx + 3.0, cy], 1.0, [1.0, 1.0, 1.0, 0.8]);
    tb.add_line([cx, cy - 3.0], [cx, cy + 3.0], 1.0, [1.0, 1.0, 1.0, 0.8]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_clamps_near_origin() {
        let near = frame(800.0, Vec3::new(1.0, 5.0, 2.0));
        let expected = (MAP_SIZE * 0.5) / (MIN_RANGE * RANGE_PAD);
        assert!((near.scale - expected).abs() < 1e-5);
    }

    #[test]
    fn zoom_follows_vehicle_range() {
        let far = frame(800.0, Vec3::new(100.0, 5.0, 2.0));
        let expected = (MAP_SIZE * 0.5) / (100.0 * RANGE_PAD);
        assert!((far.scale - expected).abs() < 1e-5);
        assert!(far.scale < frame(800.0, Vec3::ZERO).scale);
    }

    #[test]
    fn origin_projects_to_panel_center() {
        let f = frame(800.0, Vec3::new(30.0, 0.0, -10.0));
        assert_eq!(world_to_map(&f, Vec3::ZERO), f.center);
    }

    #[test]
    fn north_is_up() {
        let f = frame(800.0, Vec3::ZERO);
        let north = world_to_map(&f, Vec3::new(0.0, 0.0, 10.0));
        assert!(north[1] < f.center[1]);
        assert_eq!(north[0], f.center[0]);
    }

    #[test]
    fn marker_tip_tracks_heading() {
        // Heading 0 faces +Z, which is up on the panel.
        let tri = heading_triangle([100.0, 100.0], 0.0, 6.0);
        assert!(tri[0][1] < 100.0);
        // Heading pi/2 faces +X, to the right.
        let tri = heading_triangle([100.0, 100.0], std::f32::consts::FRAC_PI_2, 6.0);
        assert!(tri[0][0] > 100.0);
    }

    #[test]
    fn retrograde_flips_marker_color() {
        assert_eq!(marker_color(false), [0.0, 1.0, 0.53, 1.0]);
        assert_eq!(marker_color(true), [1.0, 0.2, 0.2, 1.0]);
    }
}
