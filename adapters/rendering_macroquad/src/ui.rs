//! Widget-style drawing helpers for the Macroquad rendering backend.
//!
//! This module hosts the hand-drawn HUD and menu widgets so the rest of the
//! adapter stays focused on the playfield. Widgets are stateless: hover
//! feedback comes from the cursor in the current frame's input and click
//! handling lives with the frame-loop closure that owns the scene.

use macroquad::{
    shapes::{draw_rectangle, draw_rectangle_lines, draw_triangle},
    text::{draw_text, measure_text},
};
use glam::Vec2;
use lane_rush_rendering::{ButtonPresentation, Color, HudPresentation};

use crate::to_macroquad_color;

const BUTTON_BORDER_THICKNESS: f32 = 3.0;
const BUTTON_LABEL_SIZE: u16 = 30;

const GAUGE_WIDTH: f32 = 30.0;
const GAUGE_HEIGHT: f32 = 150.0;
const GAUGE_MARGIN: f32 = 20.0;

/// Draws a button, lightening the fill while the cursor hovers it.
pub(crate) fn draw_button(button: &ButtonPresentation, cursor: Option<Vec2>) {
    let bounds = button.bounds;
    let fill = if button.is_hovered(cursor) {
        button.fill.lighten(0.25)
    } else {
        button.fill
    };

    draw_rectangle(
        bounds.x(),
        bounds.y(),
        bounds.width(),
        bounds.height(),
        to_macroquad_color(fill),
    );
    draw_rectangle_lines(
        bounds.x(),
        bounds.y(),
        bounds.width(),
        bounds.height(),
        BUTTON_BORDER_THICKNESS * 2.0,
        to_macroquad_color(Color::from_rgb_u8(0, 0, 0)),
    );

    if !button.label.is_empty() {
        draw_text_centered(
            &button.label,
            bounds.x() + bounds.width() / 2.0,
            bounds.y() + bounds.height() / 2.0,
            BUTTON_LABEL_SIZE,
            Color::from_rgb_u8(0, 0, 0),
        );
    }
}

/// Draws the solid triangle used as the play glyph inside the menu button.
pub(crate) fn draw_play_glyph(centre: Vec2, color: Color) {
    let v1 = macroquad::math::Vec2::new(centre.x - 10.0, centre.y - 15.0);
    let v2 = macroquad::math::Vec2::new(centre.x - 10.0, centre.y + 15.0);
    let v3 = macroquad::math::Vec2::new(centre.x + 20.0, centre.y);
    draw_triangle(v1, v2, v3, to_macroquad_color(color));
}

/// Draws the vertical fuel gauge anchored to the right screen edge.
pub(crate) fn draw_fuel_gauge(screen_width: f32, hud: &HudPresentation) {
    let tank_x = screen_width - GAUGE_WIDTH - GAUGE_MARGIN;
    let tank_y = GAUGE_MARGIN;

    draw_rectangle(
        tank_x,
        tank_y,
        GAUGE_WIDTH,
        GAUGE_HEIGHT,
        to_macroquad_color(Color::from_rgb_u8(130, 130, 130)),
    );
    draw_rectangle_lines(
        tank_x,
        tank_y,
        GAUGE_WIDTH,
        GAUGE_HEIGHT,
        BUTTON_BORDER_THICKNESS * 2.0,
        to_macroquad_color(Color::from_rgb_u8(0, 0, 0)),
    );

    let fill_height = hud.fuel_fraction() * GAUGE_HEIGHT;
    let fill_y = tank_y + (GAUGE_HEIGHT - fill_height);
    draw_rectangle(
        tank_x + 2.0,
        fill_y + 2.0,
        GAUGE_WIDTH - 4.0,
        (fill_height - 4.0).max(0.0),
        to_macroquad_color(Color::from_rgb_u8(0, 190, 60)),
    );

    draw_text(
        "FUEL",
        tank_x - 5.0,
        tank_y + GAUGE_HEIGHT + 28.0,
        20.0,
        to_macroquad_color(Color::from_rgb_u8(0, 0, 0)),
    );
}

/// Draws text with its horizontal centre at `centre_x` and vertical centre at
/// `centre_y`.
pub(crate) fn draw_text_centered(text: &str, centre_x: f32, centre_y: f32, size: u16, color: Color) {
    let dimensions = measure_text(text, None, size, 1.0);
    draw_text(
        text,
        centre_x - dimensions.width / 2.0,
        centre_y + dimensions.height / 2.0,
        size as f32,
        to_macroquad_color(color),
    );
}
