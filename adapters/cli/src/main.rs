#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Lane Rush experience.
//!
//! The binary wires the authoritative world, the two spawning systems and
//! the macroquad backend into one frame pipeline: gather input, turn it into
//! commands, apply them, feed the resulting events back through the systems
//! until no follow-up commands remain, then refresh the scene from world
//! queries for the backend to draw.

mod highscore;

use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use clap::Parser;
use lane_rush_core::{
    Command, Event, GameMode, GameOverCause, Rect, SteerDirection, SCREEN_HEIGHT, SCREEN_WIDTH,
};
use lane_rush_rendering::{
    ButtonPresentation, CarPresentation, Color, EnemyPresentation, FrameInput,
    FuelCanPresentation, GameOverPresentation, HudPresentation, MenuPresentation, ModeOverlay,
    Presentation, RenderingBackend, RoadPresentation, Scene, Viewport,
};
use lane_rush_rendering_macroquad::MacroquadBackend;
use lane_rush_system_fuel::{Config as FuelConfig, FuelSpawner};
use lane_rush_system_spawning::{Config as SpawningConfig, Spawning};
use lane_rush_world::{self as world, query, World, FUEL_CAPACITY};
use log::{info, warn};
use rand::Rng;

const WINDOW_TITLE: &str = "Lane Rush";
const MENU_TITLE: &str = "LANE RUSH";
const MENU_TAGLINE: &str = "DODGE TRAFFIC. CATCH FUEL.";

const CLEAR_COLOR: Color = Color::from_rgb_u8(245, 245, 245);
const BUTTON_FILL: Color = Color::from_rgb_u8(255, 203, 0);

/// Stream separator mixing the fuel RNG away from the enemy RNG.
const FUEL_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Arcade driving game: dodge four lanes of traffic and keep the tank full.
#[derive(Debug, Parser)]
#[command(name = "lane-rush", version)]
struct Args {
    /// Placement seed; a random seed is drawn when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Path of the persistent high-score file.
    #[arg(long, default_value = "highscore.txt")]
    highscore_file: PathBuf,

    /// Render as fast as possible instead of synchronising with the display.
    #[arg(long)]
    no_vsync: bool,

    /// Print frame timing metrics once per second.
    #[arg(long)]
    show_fps: bool,

    /// Skip sprite loading and draw flat-colored shapes instead.
    #[arg(long)]
    no_sprites: bool,
}

/// Entry point for the Lane Rush command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!("placement seed {seed:#018x}");

    let stored_high_score = highscore::load(&args.highscore_file);
    info!(
        "high score {} loaded from {}",
        stored_high_score,
        args.highscore_file.display()
    );

    let mut game = Game::new(seed, stored_high_score, args.highscore_file.clone());
    let scene = initial_scene(&game.world)?;
    let presentation = Presentation::new(WINDOW_TITLE, CLEAR_COLOR, scene);

    let backend = MacroquadBackend::new()
        .with_vsync(!args.no_vsync)
        .with_show_fps(args.show_fps)
        .with_sprite_loading(!args.no_sprites);

    backend.run(presentation, move |dt, input, scene| {
        game.frame(dt, input, scene);
    })
}

/// The simulation half of the frame loop: world plus systems plus persistence.
struct Game {
    world: World,
    spawning: Spawning,
    fuel: FuelSpawner,
    highscore_file: PathBuf,
}

impl Game {
    fn new(seed: u64, stored_high_score: u32, highscore_file: PathBuf) -> Self {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::SeedHighScore {
                value: stored_high_score,
            },
            &mut events,
        );

        Self {
            world,
            spawning: Spawning::new(SpawningConfig::new(seed)),
            fuel: FuelSpawner::new(FuelConfig::new(seed ^ FUEL_SEED_SALT)),
            highscore_file,
        }
    }

    /// Advances the simulation by one frame and refreshes the scene.
    fn frame(&mut self, dt: Duration, input: FrameInput, scene: &mut Scene) {
        let commands = gather_commands(&self.world, dt, input, scene);
        self.pump(commands);
        populate_scene(&self.world, scene);
    }

    /// Applies commands and feeds the produced events back through the
    /// systems until no follow-up commands remain.
    fn pump(&mut self, mut commands: Vec<Command>) {
        while !commands.is_empty() {
            let mut events = Vec::new();
            for command in commands.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
            self.persist_high_score(&events);

            let spots: Vec<_> = query::enemy_view(&self.world)
                .iter()
                .map(|enemy| (enemy.id, enemy.lane, enemy.y))
                .collect();
            self.spawning.handle(&events, &spots, &mut commands);

            let enemy_rects: Vec<Rect> = query::enemy_view(&self.world)
                .iter()
                .map(|enemy| enemy.rect())
                .collect();
            self.fuel.handle(
                &events,
                query::mode(&self.world),
                query::road(&self.world),
                &enemy_rects,
                query::fuel_can(&self.world).is_some(),
                &mut commands,
            );
        }
    }

    /// Writes the high-score file when a run beats the stored best.
    ///
    /// Write failures are logged and otherwise ignored; the session keeps the
    /// new high score in memory either way.
    fn persist_high_score(&self, events: &[Event]) {
        for event in events {
            if let Event::HighScoreBeaten { score } = event {
                if let Err(error) = highscore::save(&self.highscore_file, *score) {
                    warn!(
                        "failed to persist high score to {}: {error}",
                        self.highscore_file.display()
                    );
                }
            }
        }
    }
}

fn gather_commands(
    world: &World,
    dt: Duration,
    input: FrameInput,
    scene: &Scene,
) -> Vec<Command> {
    let mut commands = Vec::new();

    match query::mode(world) {
        GameMode::Gameplay => {
            if input.steer_left {
                commands.push(Command::SteerCar {
                    direction: SteerDirection::Left,
                });
            }
            if input.steer_right {
                commands.push(Command::SteerCar {
                    direction: SteerDirection::Right,
                });
            }
        }
        GameMode::Menu | GameMode::GameOver => {
            let clicked = input.primary_pressed
                && active_button(scene)
                    .map_or(false, |button| button.is_hovered(input.cursor_position));
            if clicked {
                commands.push(Command::StartRun);
            }
        }
    }

    commands.push(Command::Tick { dt });
    commands
}

fn active_button(scene: &Scene) -> Option<&ButtonPresentation> {
    match &scene.overlay {
        ModeOverlay::Menu(menu) => Some(&menu.play_button),
        ModeOverlay::GameOver(summary) => Some(&summary.restart_button),
        ModeOverlay::Gameplay(_) => None,
    }
}

fn initial_scene(world: &World) -> Result<Scene> {
    let viewport = Viewport::new(SCREEN_WIDTH, SCREEN_HEIGHT)?;
    let road = RoadPresentation::new(
        query::road(world).clone(),
        Color::from_rgb_u8(52, 52, 56),
        Color::from_rgb_u8(230, 230, 230),
        Color::from_rgb_u8(70, 110, 60),
    );
    let car = query::car(world);

    let mut scene = Scene::new(
        viewport,
        road,
        query::run_status(world).current_speed,
        CarPresentation::new(car.x, car.y),
        Vec::new(),
        None,
        overlay_for(world),
    );
    populate_scene(world, &mut scene);
    Ok(scene)
}

/// Refreshes every per-frame channel of the scene from world queries.
fn populate_scene(world: &World, scene: &mut Scene) {
    let car = query::car(world);
    scene.car = CarPresentation::new(car.x, car.y);
    scene.scroll_speed = query::run_status(world).current_speed;
    scene.enemies = query::enemy_view(world)
        .iter()
        .map(|enemy| EnemyPresentation::new(enemy.variant, enemy.x, enemy.y))
        .collect();
    scene.fuel_can =
        query::fuel_can(world).map(|can| FuelCanPresentation::new(can.x, can.y));
    scene.overlay = overlay_for(world);
}

fn overlay_for(world: &World) -> ModeOverlay {
    let status = query::run_status(world);
    let high_score = query::high_score(world);

    match query::mode(world) {
        GameMode::Menu => ModeOverlay::Menu(MenuPresentation {
            title: MENU_TITLE.to_owned(),
            tagline: MENU_TAGLINE.to_owned(),
            high_score,
            play_button: play_button(),
        }),
        GameMode::Gameplay => ModeOverlay::Gameplay(HudPresentation::new(
            status.score,
            high_score,
            status.fuel / FUEL_CAPACITY,
        )),
        GameMode::GameOver => ModeOverlay::GameOver(GameOverPresentation {
            cause: query::game_over_cause(world).unwrap_or(GameOverCause::Crashed),
            final_score: status.score,
            high_score,
            new_high_score: query::high_score_beaten(world),
            restart_button: restart_button(),
        }),
    }
}

fn play_button() -> ButtonPresentation {
    ButtonPresentation::new(
        Rect::new(SCREEN_WIDTH / 2.0 - 100.0, 250.0, 200.0, 80.0),
        "",
        BUTTON_FILL,
    )
}

fn restart_button() -> ButtonPresentation {
    ButtonPresentation::new(
        Rect::new(SCREEN_WIDTH / 2.0 - 80.0, 290.0, 160.0, 60.0),
        "RESTART",
        BUTTON_FILL,
    )
}
