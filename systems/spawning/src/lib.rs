#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system that places enemies on the road.
//!
//! The world never rolls dice: whenever a pool slot needs a position it
//! announces the fact through events, and this system answers with fully
//! sampled [`Command::PlaceEnemy`] batches. Two situations trigger sampling:
//! a fresh run scatters the whole pool across the road, and an enemy that
//! scrolled past the bottom edge is recycled to a new spot above the screen.
//! Both paths enforce the same-lane spacing invariant by rejection sampling.

use lane_rush_core::{
    Command, EnemyId, EnemyVariant, Event, LaneIndex, LANE_COUNT, MIN_ENEMY_SPACING,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Vertical band sampled when scattering the pool at run start.
const SCATTER_Y_RANGE: (i32, i32) = (-1200, -100);

/// Speed band sampled when scattering the pool at run start.
const SCATTER_SPEED_RANGE: (i32, i32) = (2, 4);

/// Vertical band sampled when recycling an enemy mid-run.
const RESPAWN_Y_RANGE: (i32, i32) = (-1000, -200);

/// Speed band sampled when recycling an enemy mid-run.
const RESPAWN_SPEED_RANGE: (i32, i32) = (2, 5);

/// Upper bound on rejection-sampling attempts per placement.
///
/// The sampling space (4 lanes by an 800-unit band against at most 4 other
/// enemies) makes rejection runs this long unreachable in practice; the cap
/// exists so termination never depends on the lane configuration. When it is
/// reached the final candidate is accepted as sampled.
const MAX_PLACEMENT_ATTEMPTS: usize = 1024;

/// Lane and vertical offset already claimed by a pool slot.
type ClaimedSpot = (EnemyId, LaneIndex, f32);

/// Configuration parameters required to construct the spawning system.
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

/// Pure system that deterministically emits enemy placement commands.
#[derive(Debug)]
pub struct Spawning {
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes events and the enemy view to emit placement commands.
    ///
    /// `spots` must describe every pool slot the world currently tracks as
    /// `(id, lane, y)` triples in deterministic order, the shape produced by
    /// the world's enemy view.
    pub fn handle(&mut self, events: &[Event], spots: &[ClaimedSpot], out: &mut Vec<Command>) {
        let scatter = events
            .iter()
            .any(|event| matches!(event, Event::RunStarted));

        if scatter {
            // A fresh run repositions every slot; stale finish events from
            // the previous pool are superseded by the scatter.
            self.scatter(spots, out);
            return;
        }

        let mut claimed: Option<Vec<ClaimedSpot>> = None;
        for event in events {
            let Event::EnemyFinished { enemy } = event else {
                continue;
            };
            let claimed = claimed.get_or_insert_with(|| spots.to_vec());
            let (lane, y) =
                self.sample_spot(Some(*enemy), claimed, RESPAWN_Y_RANGE);
            out.push(Command::PlaceEnemy {
                enemy: *enemy,
                lane,
                y,
                speed: self.sample_speed(RESPAWN_SPEED_RANGE),
                variant: self.sample_variant(),
            });
            if let Some(entry) = claimed.iter_mut().find(|(id, _, _)| id == enemy) {
                entry.1 = lane;
                entry.2 = y;
            }
        }
    }

    fn scatter(&mut self, spots: &[ClaimedSpot], out: &mut Vec<Command>) {
        let mut placed: Vec<ClaimedSpot> = Vec::with_capacity(spots.len());
        for (id, _, _) in spots {
            // Scatter candidates are checked only against slots placed
            // earlier in this batch, never the parked pool.
            let (lane, y) = self.sample_spot(None, &placed, SCATTER_Y_RANGE);
            out.push(Command::PlaceEnemy {
                enemy: *id,
                lane,
                y,
                speed: self.sample_speed(SCATTER_SPEED_RANGE),
                variant: self.sample_variant(),
            });
            placed.push((*id, lane, y));
        }
    }

    fn sample_spot(
        &mut self,
        exclude: Option<EnemyId>,
        claimed: &[ClaimedSpot],
        y_range: (i32, i32),
    ) -> (LaneIndex, f32) {
        let mut candidate = self.roll_candidate(y_range);
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            if spot_is_clear(candidate, exclude, claimed) {
                break;
            }
            candidate = self.roll_candidate(y_range);
        }
        candidate
    }

    fn roll_candidate(&mut self, y_range: (i32, i32)) -> (LaneIndex, f32) {
        let lane = LaneIndex::new(self.rng.gen_range(0..LANE_COUNT));
        let y = self.rng.gen_range(y_range.0..=y_range.1) as f32;
        (lane, y)
    }

    fn sample_speed(&mut self, speed_range: (i32, i32)) -> f32 {
        self.rng.gen_range(speed_range.0..=speed_range.1) as f32
    }

    fn sample_variant(&mut self) -> EnemyVariant {
        EnemyVariant::from_index(self.rng.gen_range(0..EnemyVariant::ALL.len()))
    }
}

fn spot_is_clear(
    candidate: (LaneIndex, f32),
    exclude: Option<EnemyId>,
    claimed: &[ClaimedSpot],
) -> bool {
    let (lane, y) = candidate;
    claimed
        .iter()
        .filter(|(id, _, _)| Some(*id) != exclude)
        .all(|(_, other_lane, other_y)| {
            *other_lane != lane || (y - other_y).abs() >= MIN_ENEMY_SPACING
        })
}
