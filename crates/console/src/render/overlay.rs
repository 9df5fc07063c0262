//! HUD overlay construction: status panel, value bars, tactical map,
//! connection badge, banners, and the debug readout.
//!
//! Pure function from store state to overlay geometry, so layout rules
//! are testable without a GPU.

use console_core::StoreState;
use renderer::OverlayBuilder;

use crate::hud;
use crate::tactical_map;

const PANEL_BG: [f32; 4] = [0.0, 0.0, 0.0, 0.55];
const BAR_W: f32 = 140.0;
const BAR_H: f32 = 10.0;

/// Build the full overlay for one frame. `mission_seconds` is present
/// while the vehicle is armed.
pub fn build(
    state: &StoreState,
    fps: f32,
    mission_seconds: Option<u64>,
    screen_w: f32,
    screen_h: f32,
) -> OverlayBuilder {
    let data = hud::derive(state);
    let mut tb = OverlayBuilder::new(screen_w, screen_h);

    // Mission timer, top center, only while armed.
    if let Some(seconds) = mission_seconds {
        let text = format!("MISSION {}", hud::format_mission_time(seconds));
        let w = OverlayBuilder::text_width(&text, 2.0);
        tb.add_text_with_bg(
            (screen_w - w) * 0.5,
            12.0,
            &text,
            2.0,
            hud::GREEN,
            PANEL_BG,
        );
    }

    if state.hud_visible {
        let x = 12.0;
        let mut y = 12.0;

        y += tb.add_text_with_bg(
            x,
            y,
            &format!("STATUS {}", data.status_label),
            2.0,
            data.status_color,
            PANEL_BG,
        ) + 4.0;

        let arm_color = if data.armed { hud::GREEN } else { hud::GRAY };
        let arm_label = if data.armed { "ARMED" } else { "DISARMED" };
        y += tb.add_text_with_bg(
            x,
            y,
            &format!("MODE {}  {}", data.mode, arm_label),
            1.5,
            arm_color,
            PANEL_BG,
        ) + 4.0;

        y = draw_bar(&mut tb, x, y, "BAT", data.battery, data.battery_color);
        y = draw_bar(&mut tb, x, y, "JAM", data.gps_jam, hud::AMBER);
        y = draw_bar(&mut tb, x, y, "NAV", data.nav_confidence, data.confidence_color);
        // Threshold ticks on the nav bar just drawn.
        let bar_y = y - BAR_H - 4.0;
        let t = state.thresholds;
        for threshold in [t.warn, t.reject, t.abort] {
            let tx = x + 42.0 + BAR_W * (threshold / 100.0).clamp(0.0, 1.0);
            tb.add_line(
                [tx, bar_y - 1.0],
                [tx, bar_y + BAR_H + 1.0],
                1.0,
                [1.0, 1.0, 1.0, 0.7],
            );
        }
        y += 2.0;

        y += tb.add_text_with_bg(
            x,
            y,
            &format!(
                "HDG {:03.0}  ALT {:5.1}  SPD {:4.1}  PTS {}",
                data.heading_degrees, data.altitude, data.speed, data.anchor_count
            ),
            1.5,
            hud::GRAY,
            PANEL_BG,
        ) + 2.0;

        y += tb.add_text_with_bg(
            x,
            y,
            &format!(
                "CAM {}  RANGE {:.0}",
                state.camera.mode.label(),
                state.camera.distance()
            ),
            1.5,
            hud::GRAY,
            PANEL_BG,
        ) + 2.0;

        if data.anchor_allowed {
            tb.add_text_with_bg(x, y, "L LOG ANCHOR", 1.5, hud::GREEN, PANEL_BG);
        } else {
            tb.add_text_with_bg(x, y, "ANCHOR HOLD: NAV LOW", 1.5, hud::RED, PANEL_BG);
        }

        let v = &state.vehicle;
        let map = tactical_map::frame(screen_w, v.position);
        tactical_map::draw(
            &mut tb,
            &map,
            v.position,
            v.heading(),
            data.retrograde,
            &state.doctrine.breadcrumbs,
            &state.doctrine.anchors,
            state.doctrine.target_point,
        );
    }

    // Connection badge stays visible even with the HUD hidden, so the
    // operator always knows whether the link is live.
    let badge_y = screen_h - 34.0;
    tb.add_text_with_bg(
        12.0,
        badge_y,
        &format!("LINK {}", data.connection_label),
        1.5,
        data.connection_color,
        PANEL_BG,
    );
    if data.return_queue_length > 0 {
        tb.add_text_with_bg(
            130.0,
            badge_y,
            &format!("RTB QUEUE {}", data.return_queue_length),
            1.5,
            hud::CYAN,
            PANEL_BG,
        );
    }

    // Alert banners stack from the top: override/retrograde first, then
    // the optical-nav notice.
    let mut banner_y = screen_h * 0.18;
    if let Some((text, color)) = data.banner {
        let scale = 3.0;
        let w = OverlayBuilder::text_width(text, scale);
        tb.add_text_with_bg(
            (screen_w - w) * 0.5,
            banner_y,
            text,
            scale,
            color,
            [0.0, 0.0, 0.0, 0.75],
        );
        banner_y += 40.0;
    }
    if data.optical_nav {
        let text = "OPTICAL NAV ACTIVE";
        let scale = 2.0;
        let w = OverlayBuilder::text_width(text, scale);
        tb.add_text_with_bg(
            (screen_w - w) * 0.5,
            banner_y,
            text,
            scale,
            hud::YELLOW,
            [0.2, 0.2, 0.0, 0.6],
        );
    }

    if state.debug_visible {
        let v = &state.vehicle;
        let mut dy = screen_h - 90.0;
        dy += tb.add_text_with_bg(
            12.0,
            dy,
            &format!("FPS {:.0}", fps),
            1.5,
            hud::GRAY,
            PANEL_BG,
        ) + 2.0;
        tb.add_text_with_bg(
            12.0,
            dy,
            &format!(
                "POS {:6.1} {:6.1} {:6.1}",
                v.position.x, v.position.y, v.position.z
            ),
            1.5,
            hud::GRAY,
            PANEL_BG,
        );
    }

    tb
}

/// Label, background track, colored fill, numeric readout. Returns the
/// y coordinate of the next row.
fn draw_bar(
    tb: &mut OverlayBuilder,
    x: f32,
    y: f32,
    label: &str,
    value: f32,
    color: [f32; 4],
) -> f32 {
    tb.add_text(x, y + 1.0, label, 1.5, hud::GRAY);
    let bx = x + 42.0;
    tb.add_rect(bx, y, BAR_W, BAR_H, [0.1, 0.12, 0.14, 0.8]);
    let fill = BAR_W * (value / 100.0).clamp(0.0, 1.0);
    if fill > 0.0 {
        tb.add_rect(bx, y, fill, BAR_H, color);
    }
    tb.add_text(bx + BAR_W + 6.0, y + 1.0, &format!("{:3.0}", value), 1.5, color);
    y + BAR_H + 4.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use console_core::Status;

    fn visible_state() -> StoreState {
        let mut s = StoreState::default();
        s.hud_visible = true;
        s
    }

    #[test]
    fn hidden_hud_still_shows_connection_badge() {
        let hidden = build(&StoreState::default(), 60.0, None, 1280.0, 720.0);
        assert!(!hidden.vertices.is_empty());
        let shown = build(&visible_state(), 60.0, None, 1280.0, 720.0);
        assert!(shown.vertices.len() > hidden.vertices.len());
    }

    #[test]
    fn override_status_adds_banner_geometry() {
        let mut s = StoreState::default();
        let without = build(&s, 60.0, None, 1280.0, 720.0).vertices.len();
        s.vehicle.status = Status::SafetyOverride;
        let with = build(&s, 60.0, None, 1280.0, 720.0).vertices.len();
        assert!(with > without);
    }

    #[test]
    fn mission_timer_adds_geometry_while_armed() {
        let s = visible_state();
        let disarmed = build(&s, 60.0, None, 1280.0, 720.0).vertices.len();
        let armed = build(&s, 60.0, Some(90), 1280.0, 720.0).vertices.len();
        assert!(armed > disarmed);
    }

    #[test]
    fn high_jam_adds_optical_nav_notice() {
        let mut s = StoreState::default();
        let without = build(&s, 60.0, None, 1280.0, 720.0).vertices.len();
        s.vehicle.gps_jam = 80.0;
        let with = build(&s, 60.0, None, 1280.0, 720.0).vertices.len();
        assert!(with > without);
    }

    #[test]
    fn debug_readout_adds_geometry() {
        let mut s = visible_state();
        let without = build(&s, 60.0, None, 1280.0, 720.0).vertices.len();
        s.debug_visible = true;
        let with = build(&s, 60.0, None, 1280.0, 720.0).vertices.len();
        assert!(with > without);
    }
}
