#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Lane Rush.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in containerised CI environments. To keep
//! `cargo test` usable everywhere we depend on macroquad without its default
//! `audio` feature. Consumers that need sound playback can opt back in by
//! enabling `macroquad/audio` in their own `Cargo.toml` dependency
//! specification.
//!
//! The backend draws the playfield from sprites when the manifest-driven
//! atlas is available and falls back to flat-colored shapes otherwise, so the
//! game stays playable in asset-less environments. Widget drawing lives in
//! the local `ui` module to keep the render loop focused on the playfield.

mod sprites;
mod ui;

use anyhow::{Context, Result};
use glam::Vec2;
use lane_rush_rendering::{
    Color, FrameInput, FuelCanPresentation, ModeOverlay, Presentation, RenderingBackend, Scene,
    SpriteKey,
};
use macroquad::input::{
    is_key_down, is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton,
};
use std::{sync::mpsc, time::Duration};

use self::sprites::{DrawParams, SpriteAtlas};
use self::ui::{draw_button, draw_fuel_gauge, draw_play_glyph, draw_text_centered};

use lane_rush_core::{EnemyVariant, GameOverCause, CAR_SIZE, ENEMY_SIZE, FUEL_CAN_SIZE};

/// Fallback scroll period used when no background texture is loaded.
const FALLBACK_SCROLL_PERIOD: f32 = 80.0;

/// Playfield fade applied on the game-over screen.
const GAME_OVER_FADE: f32 = 0.5;

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
        }
    }
}

fn poll_frame_input() -> FrameInput {
    let (cursor_x, cursor_y) = mouse_position();
    FrameInput {
        steer_left: is_key_down(KeyCode::Left),
        steer_right: is_key_down(KeyCode::Right),
        cursor_position: Some(Vec2::new(cursor_x, cursor_y)),
        primary_pressed: is_mouse_button_pressed(MouseButton::Left),
    }
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the average once a second elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let per_second = if seconds <= f32::EPSILON {
            0.0
        } else {
            self.frames as f32 / seconds
        };
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    load_sprites: bool,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            load_sprites: true,
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display
    /// refresh rate or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Configures whether the backend should attempt to load sprite assets.
    #[must_use]
    pub fn with_sprite_loading(mut self, enabled: bool) -> Self {
        self.load_sprites = enabled;
        self
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            load_sprites,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: scene.viewport.width() as i32,
            window_height: scene.viewport.height() as i32,
            window_resizable: false,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (init_sender, init_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;

            let sprite_atlas = if load_sprites {
                match SpriteAtlas::from_default_manifest()
                    .context("failed to initialise sprite atlas")
                {
                    Ok(atlas) => Some(atlas),
                    Err(error) => {
                        let _ = init_sender.send(Err(error));
                        return;
                    }
                }
            } else {
                None
            };
            let _ = init_sender.send(Ok(()));

            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();
            let mut scroll_offset = 0.0_f32;

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                let dt = Duration::from_secs_f32(macroquad::time::get_frame_time());
                let input = poll_frame_input();

                update_scene(dt, input, &mut scene);

                scroll_offset += scene.scroll_speed;
                let period = background_period(&scene, sprite_atlas.as_ref());
                if scroll_offset >= period {
                    scroll_offset = 0.0;
                }

                macroquad::window::clear_background(background);
                draw_scene(&scene, sprite_atlas.as_ref(), scroll_offset, input);

                if show_fps {
                    if let Some(per_second) = fps_counter.record_frame(dt) {
                        println!("fps: {per_second:.1}");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        match init_receiver.try_recv() {
            Ok(Err(error)) => Err(error),
            _ => Ok(()),
        }
    }
}

pub(crate) fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

/// Scroll distance after which the background pattern repeats.
fn background_period(scene: &Scene, atlas: Option<&SpriteAtlas>) -> f32 {
    atlas
        .and_then(|atlas| atlas.texture_size(SpriteKey::Background))
        .map(|size| {
            let scale = scene.viewport.width() / size.x.max(1.0);
            (size.y * scale).max(1.0)
        })
        .unwrap_or(FALLBACK_SCROLL_PERIOD)
}

fn draw_scene(scene: &Scene, atlas: Option<&SpriteAtlas>, scroll_offset: f32, input: FrameInput) {
    draw_background(scene, atlas, scroll_offset);

    let dimmed = scene.overlay.dims_playfield();
    let entity_tint = if dimmed {
        Color::new(1.0, 1.0, 1.0, GAME_OVER_FADE)
    } else {
        Color::new(1.0, 1.0, 1.0, 1.0)
    };
    let car_tint = if dimmed {
        Color::new(0.9, 0.16, 0.22, 0.8)
    } else {
        Color::new(1.0, 1.0, 1.0, 1.0)
    };

    if let Some(can) = &scene.fuel_can {
        draw_fuel_can(can, atlas, entity_tint);
    }

    for enemy in &scene.enemies {
        let size = Vec2::new(ENEMY_SIZE.width(), ENEMY_SIZE.height());
        let params =
            DrawParams::new(Vec2::new(enemy.x, enemy.y), size).with_tint(entity_tint);
        let key = SpriteKey::for_variant(enemy.variant);
        if atlas.map_or(true, |atlas| atlas.draw(key, params).is_err()) {
            draw_entity_fallback(enemy.x, enemy.y, size, variant_color(enemy.variant), entity_tint);
        }
    }

    let car_size = Vec2::new(CAR_SIZE.width(), CAR_SIZE.height());
    let car_params =
        DrawParams::new(Vec2::new(scene.car.x, scene.car.y), car_size).with_tint(car_tint);
    if atlas.map_or(true, |atlas| atlas.draw(SpriteKey::PlayerCar, car_params).is_err()) {
        draw_entity_fallback(
            scene.car.x,
            scene.car.y,
            car_size,
            Color::from_rgb_u8(66, 99, 245),
            car_tint,
        );
    }

    draw_overlay(scene, input);
}

fn draw_background(scene: &Scene, atlas: Option<&SpriteAtlas>, scroll_offset: f32) {
    if let Some(atlas) = atlas {
        if let Some(size) = atlas.texture_size(SpriteKey::Background) {
            let scale = scene.viewport.width() / size.x.max(1.0);
            let tile = Vec2::new(scene.viewport.width(), size.y * scale);
            for y in [scroll_offset, scroll_offset - tile.y] {
                let params = DrawParams::new(Vec2::new(0.0, y), tile);
                let _ = atlas.draw(SpriteKey::Background, params);
            }
            return;
        }
    }

    draw_flat_road(scene, scroll_offset);
}

/// Shoulders, asphalt and scrolling lane markings used without textures.
fn draw_flat_road(scene: &Scene, scroll_offset: f32) {
    let viewport = scene.viewport;
    let road = &scene.road;
    let left = road.road.left_edge();
    let right = road.road.right_edge();

    macroquad::shapes::draw_rectangle(
        0.0,
        0.0,
        viewport.width(),
        viewport.height(),
        to_macroquad_color(road.shoulder_color),
    );
    macroquad::shapes::draw_rectangle(
        left,
        0.0,
        right - left,
        viewport.height(),
        to_macroquad_color(road.surface_color),
    );

    let marking = to_macroquad_color(road.marking_color);
    for edge in [left, right] {
        macroquad::shapes::draw_line(edge, 0.0, edge, viewport.height(), 3.0, marking);
    }

    // Dashed dividers between neighbouring lane spans, scrolled with the road.
    let lane_width = ENEMY_SIZE.width();
    let lanes = road.road.lanes();
    let dash = FALLBACK_SCROLL_PERIOD / 2.0;
    for pair in lanes.windows(2) {
        let divider = (pair[0] + lane_width + pair[1]) / 2.0;
        let mut y = scroll_offset % FALLBACK_SCROLL_PERIOD - FALLBACK_SCROLL_PERIOD;
        while y < viewport.height() {
            macroquad::shapes::draw_line(divider, y, divider, y + dash, 3.0, marking);
            y += FALLBACK_SCROLL_PERIOD;
        }
    }
}

fn draw_fuel_can(can: &FuelCanPresentation, atlas: Option<&SpriteAtlas>, tint: Color) {
    let size = Vec2::new(FUEL_CAN_SIZE.width(), FUEL_CAN_SIZE.height());
    let params = DrawParams::new(Vec2::new(can.x, can.y), size).with_tint(tint);
    if atlas.map_or(true, |atlas| atlas.draw(SpriteKey::FuelCan, params).is_err()) {
        draw_entity_fallback(can.x, can.y, size, Color::from_rgb_u8(0, 190, 60), tint);
    }
}

fn draw_entity_fallback(x: f32, y: f32, size: Vec2, base: Color, tint: Color) {
    let color = Color::new(
        base.red * tint.red,
        base.green * tint.green,
        base.blue * tint.blue,
        base.alpha * tint.alpha,
    );
    macroquad::shapes::draw_rectangle(x, y, size.x, size.y, to_macroquad_color(color));
    macroquad::shapes::draw_rectangle_lines(
        x,
        y,
        size.x,
        size.y,
        2.0,
        to_macroquad_color(Color::new(0.0, 0.0, 0.0, tint.alpha)),
    );
}

fn variant_color(variant: EnemyVariant) -> Color {
    match variant {
        EnemyVariant::Coupe => Color::from_rgb_u8(200, 42, 54),
        EnemyVariant::Sedan => Color::from_rgb_u8(88, 71, 255),
        EnemyVariant::Taxi => Color::from_rgb_u8(255, 193, 7),
        EnemyVariant::Van => Color::from_rgb_u8(47, 149, 50),
    }
}

fn draw_overlay(scene: &Scene, input: FrameInput) {
    let centre_x = scene.viewport.width() / 2.0;

    match &scene.overlay {
        ModeOverlay::Menu(menu) => {
            draw_text_centered(
                &menu.title,
                centre_x + 4.0,
                104.0,
                60,
                Color::from_rgb_u8(0, 0, 0),
            );
            draw_text_centered(
                &menu.title,
                centre_x,
                100.0,
                60,
                Color::from_rgb_u8(255, 161, 0),
            );
            draw_text_centered(
                &menu.tagline,
                centre_x,
                160.0,
                30,
                Color::from_rgb_u8(255, 255, 255),
            );
            draw_text_centered(
                &format!("High Score: {}", menu.high_score),
                centre_x,
                210.0,
                20,
                Color::from_rgb_u8(0, 0, 0),
            );

            draw_button(&menu.play_button, input.cursor_position);
            let bounds = menu.play_button.bounds;
            draw_play_glyph(
                Vec2::new(
                    bounds.x() + bounds.width() / 2.0,
                    bounds.y() + bounds.height() / 2.0,
                ),
                Color::from_rgb_u8(0, 0, 0),
            );
        }
        ModeOverlay::Gameplay(hud) => {
            macroquad::text::draw_text(
                &format!("Score: {}", hud.score),
                20.0,
                40.0,
                25.0,
                to_macroquad_color(Color::from_rgb_u8(0, 0, 0)),
            );
            macroquad::text::draw_text(
                &format!("High Score: {}", hud.high_score),
                20.0,
                70.0,
                20.0,
                to_macroquad_color(Color::from_rgb_u8(0, 82, 172)),
            );
            draw_fuel_gauge(scene.viewport.width(), hud);
        }
        ModeOverlay::GameOver(summary) => {
            macroquad::shapes::draw_rectangle(
                centre_x - 200.0,
                scene.viewport.height() / 2.0 - 150.0,
                400.0,
                300.0,
                to_macroquad_color(Color::new(0.0, 0.0, 0.0, 0.8)),
            );

            let (cause_text, cause_color) = match summary.cause {
                GameOverCause::Crashed => ("CRASHED!", Color::from_rgb_u8(230, 41, 55)),
                GameOverCause::OutOfFuel => ("OUT OF FUEL!", Color::from_rgb_u8(255, 161, 0)),
            };
            draw_text_centered(cause_text, centre_x, 120.0, 40, cause_color);
            draw_text_centered(
                &format!("Final Score: {}", summary.final_score),
                centre_x,
                180.0,
                30,
                Color::from_rgb_u8(255, 255, 255),
            );
            if summary.new_high_score {
                draw_text_centered(
                    "New High Score!",
                    centre_x,
                    220.0,
                    25,
                    Color::from_rgb_u8(255, 203, 0),
                );
            }
            draw_text_centered(
                &format!("High Score: {}", summary.high_score),
                centre_x,
                250.0,
                20,
                Color::from_rgb_u8(200, 200, 200),
            );

            draw_button(&summary.restart_button, input.cursor_position);
        }
    }
}
