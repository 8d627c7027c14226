#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Lane Rush adapters.
//!
//! Backends consume a declarative [`Scene`] assembled from world queries and
//! never touch the simulation directly; the frame-loop closure receives the
//! per-frame [`FrameInput`] the backend gathered and mutates the scene in
//! place before it is drawn.

use anyhow::Result as AnyResult;
use glam::Vec2;
use lane_rush_core::{EnemyVariant, GameOverCause, Rect, Road};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Whether the left steering key is held this frame.
    pub steer_left: bool,
    /// Whether the right steering key is held this frame.
    pub steer_right: bool,
    /// Cursor position in scene coordinates, if the cursor is inside the window.
    pub cursor_position: Option<Vec2>,
    /// Whether the primary mouse button was pressed on this frame.
    pub primary_pressed: bool,
}

/// Keys identifying every sprite a backend may be asked to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    /// Scrolling road background.
    Background,
    /// The player's car.
    PlayerCar,
    /// Collectible fuel can.
    FuelCan,
    /// Enemy variant: compact two-door car.
    EnemyCoupe,
    /// Enemy variant: four-door passenger car.
    EnemySedan,
    /// Enemy variant: city taxi.
    EnemyTaxi,
    /// Enemy variant: delivery van.
    EnemyVan,
}

impl SpriteKey {
    /// Every sprite key in canonical manifest order.
    pub const ALL: [Self; 7] = [
        Self::Background,
        Self::PlayerCar,
        Self::FuelCan,
        Self::EnemyCoupe,
        Self::EnemySedan,
        Self::EnemyTaxi,
        Self::EnemyVan,
    ];

    /// Maps an enemy variant to the sprite that draws it.
    #[must_use]
    pub const fn for_variant(variant: EnemyVariant) -> Self {
        match variant {
            EnemyVariant::Coupe => Self::EnemyCoupe,
            EnemyVariant::Sedan => Self::EnemySedan,
            EnemyVariant::Taxi => Self::EnemyTaxi,
            EnemyVariant::Van => Self::EnemyVan,
        }
    }
}

/// Dimensions of the drawable area in scene units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
}

impl Viewport {
    /// Creates a new viewport descriptor.
    ///
    /// Returns an error when either dimension is not strictly positive.
    pub fn new(width: f32, height: f32) -> Result<Self, RenderingError> {
        if width <= 0.0 || height <= 0.0 {
            return Err(RenderingError::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }

    /// Width of the drawable area.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the drawable area.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }
}

/// Road geometry and palette consumed by backends.
#[derive(Clone, Debug, PartialEq)]
pub struct RoadPresentation {
    /// Lane layout shared with the simulation.
    pub road: Road,
    /// Fill used for the asphalt surface between the road edges.
    pub surface_color: Color,
    /// Color used for edge lines and lane markings.
    pub marking_color: Color,
    /// Fill used for the off-road shoulders.
    pub shoulder_color: Color,
}

impl RoadPresentation {
    /// Creates a new road descriptor.
    #[must_use]
    pub const fn new(
        road: Road,
        surface_color: Color,
        marking_color: Color,
        shoulder_color: Color,
    ) -> Self {
        Self {
            road,
            surface_color,
            marking_color,
            shoulder_color,
        }
    }
}

/// The player car as a backend draws it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CarPresentation {
    /// Horizontal position of the car's left edge.
    pub x: f32,
    /// Vertical position of the car's top edge.
    pub y: f32,
}

impl CarPresentation {
    /// Creates a new car descriptor.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A single enemy vehicle as a backend draws it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyPresentation {
    /// Cosmetic variant selecting the sprite.
    pub variant: EnemyVariant,
    /// Horizontal position of the enemy's left edge.
    pub x: f32,
    /// Vertical position of the enemy's top edge.
    pub y: f32,
}

impl EnemyPresentation {
    /// Creates a new enemy descriptor.
    #[must_use]
    pub const fn new(variant: EnemyVariant, x: f32, y: f32) -> Self {
        Self { variant, x, y }
    }
}

/// The collectible fuel can as a backend draws it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FuelCanPresentation {
    /// Horizontal position of the can's left edge.
    pub x: f32,
    /// Vertical position of the can's top edge.
    pub y: f32,
}

impl FuelCanPresentation {
    /// Creates a new fuel can descriptor.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Live run readouts drawn during gameplay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HudPresentation {
    /// Score accrued by the active run.
    pub score: u32,
    /// Best score seen by this session.
    pub high_score: u32,
    /// Fill level of the fuel gauge, clamped to 0.0..=1.0.
    fuel_fraction: f32,
}

impl HudPresentation {
    /// Creates a new HUD descriptor, clamping the gauge fill into range.
    #[must_use]
    pub fn new(score: u32, high_score: u32, fuel_fraction: f32) -> Self {
        Self {
            score,
            high_score,
            fuel_fraction: fuel_fraction.clamp(0.0, 1.0),
        }
    }

    /// Fill level of the fuel gauge within 0.0..=1.0.
    #[must_use]
    pub const fn fuel_fraction(&self) -> f32 {
        self.fuel_fraction
    }
}

/// A clickable rectangle with a label, hit-tested against the cursor.
#[derive(Clone, Debug, PartialEq)]
pub struct ButtonPresentation {
    /// Screen-space rectangle reacting to the cursor.
    pub bounds: Rect,
    /// Caption drawn centred inside the bounds; may be empty.
    pub label: String,
    /// Base fill color; backends lighten it while hovered.
    pub fill: Color,
}

impl ButtonPresentation {
    /// Creates a new button descriptor.
    #[must_use]
    pub fn new<T>(bounds: Rect, label: T, fill: Color) -> Self
    where
        T: Into<String>,
    {
        Self {
            bounds,
            label: label.into(),
            fill,
        }
    }

    /// Reports whether the provided cursor position hovers the button.
    #[must_use]
    pub fn is_hovered(&self, cursor: Option<Vec2>) -> bool {
        cursor.map_or(false, |position| {
            self.bounds.contains(position.x, position.y)
        })
    }
}

/// Title-screen content shown while the game waits on the menu.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuPresentation {
    /// Large title line.
    pub title: String,
    /// Smaller tagline under the title.
    pub tagline: String,
    /// Best score seen by this session.
    pub high_score: u32,
    /// Button that starts a run.
    pub play_button: ButtonPresentation,
}

/// Post-run content shown over the frozen playfield.
#[derive(Clone, Debug, PartialEq)]
pub struct GameOverPresentation {
    /// Reason the run ended.
    pub cause: GameOverCause,
    /// Final score achieved by the run.
    pub final_score: u32,
    /// Best score seen by this session.
    pub high_score: u32,
    /// Whether the finished run set a new high score.
    pub new_high_score: bool,
    /// Button that starts the next run.
    pub restart_button: ButtonPresentation,
}

/// Mode-specific layer drawn on top of the playfield.
#[derive(Clone, Debug, PartialEq)]
pub enum ModeOverlay {
    /// Title screen with the play button.
    Menu(MenuPresentation),
    /// Live run readouts.
    Gameplay(HudPresentation),
    /// Post-run summary with the restart button.
    GameOver(GameOverPresentation),
}

impl ModeOverlay {
    /// Reports whether the playfield should be drawn dimmed.
    #[must_use]
    pub const fn dims_playfield(&self) -> bool {
        matches!(self, Self::GameOver(_))
    }
}

/// Scene description combining the playfield and the mode overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Dimensions of the drawable area.
    pub viewport: Viewport,
    /// Road geometry and palette.
    pub road: RoadPresentation,
    /// Units the background scrolls per frame, matching the run speed.
    pub scroll_speed: f32,
    /// The player car.
    pub car: CarPresentation,
    /// Enemy vehicles currently on the road.
    pub enemies: Vec<EnemyPresentation>,
    /// Active fuel can, if any.
    pub fuel_can: Option<FuelCanPresentation>,
    /// Layer drawn on top of the playfield for the active mode.
    pub overlay: ModeOverlay,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        viewport: Viewport,
        road: RoadPresentation,
        scroll_speed: f32,
        car: CarPresentation,
        enemies: Vec<EnemyPresentation>,
        fuel_can: Option<FuelCanPresentation>,
        overlay: ModeOverlay,
    ) -> Self {
        Self {
            viewport,
            road,
            scroll_speed,
            car,
            enemies,
            fuel_can,
            overlay,
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Lane Rush scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// per-frame input captured by the adapter, and may mutate the scene
    /// before it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Viewport dimensions must be strictly positive.
    InvalidViewport {
        /// Provided width that failed validation.
        width: f32,
        /// Provided height that failed validation.
        height: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidViewport { width, height } => {
                write!(
                    f,
                    "viewport dimensions must be positive (received {width}x{height})"
                )
            }
        }
    }
}

impl Error for RenderingError {}
