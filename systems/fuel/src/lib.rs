#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic fuel-can spawner.
//!
//! While no can is active the system makes one spawn roll per advanced
//! frame. A successful roll samples up to a fixed number of candidate spots
//! and activates the first one whose rectangle clears every enemy on the
//! road; when all candidates collide the frame simply goes without a can,
//! which keeps placement cheap and starves nobody for long.

use lane_rush_core::{
    Command, Event, GameMode, LaneIndex, Rect, Road, FUEL_CAN_SIZE, LANE_COUNT,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// One-in-N chance per frame that an inactive can attempts to spawn.
const SPAWN_ROLL_SIDES: i32 = 51;

/// Vertical band sampled for fuel-can candidates.
const CAN_Y_RANGE: (i32, i32) = (-600, -200);

/// Upper bound on placement candidates per successful roll.
const MAX_CAN_ATTEMPTS: usize = 10;

/// Configuration parameters required to construct the fuel system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided placement seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that deterministically emits fuel-can spawn commands.
#[derive(Debug)]
pub struct FuelSpawner {
    rng: ChaCha8Rng,
}

impl FuelSpawner {
    /// Creates a new fuel spawner using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes events and road context to emit spawn commands.
    ///
    /// `enemy_rects` must hold the full bounding rectangle of every enemy
    /// currently on the road; `can_active` reports whether a can already
    /// exists, in which case the frame's roll is skipped entirely.
    pub fn handle(
        &mut self,
        events: &[Event],
        mode: GameMode,
        road: &Road,
        enemy_rects: &[Rect],
        can_active: bool,
        out: &mut Vec<Command>,
    ) {
        if mode != GameMode::Gameplay || can_active {
            return;
        }

        for event in events {
            if !matches!(event, Event::TimeAdvanced { .. }) {
                continue;
            }
            if self.rng.gen_range(0..SPAWN_ROLL_SIDES) != 1 {
                continue;
            }
            if let Some((lane, y)) = self.sample_clear_spot(road, enemy_rects) {
                out.push(Command::SpawnFuelCan { lane, y });
                return;
            }
        }
    }

    fn sample_clear_spot(
        &mut self,
        road: &Road,
        enemy_rects: &[Rect],
    ) -> Option<(LaneIndex, f32)> {
        for _ in 0..MAX_CAN_ATTEMPTS {
            let lane = LaneIndex::new(self.rng.gen_range(0..LANE_COUNT));
            let y = self.rng.gen_range(CAN_Y_RANGE.0..=CAN_Y_RANGE.1) as f32;
            let candidate = Rect::from_origin_and_size(road.lane_x(lane), y, FUEL_CAN_SIZE);
            if enemy_rects.iter().all(|rect| !candidate.overlaps(rect)) {
                return Some((lane, y));
            }
        }
        None
    }
}
