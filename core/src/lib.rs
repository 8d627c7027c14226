#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lane Rush game.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Width of the playfield in world units.
pub const SCREEN_WIDTH: f32 = 800.0;

/// Height of the playfield in world units.
pub const SCREEN_HEIGHT: f32 = 450.0;

/// Number of lanes carved into the road.
pub const LANE_COUNT: usize = 4;

/// Number of slots in the recycled enemy pool.
pub const ENEMY_CAPACITY: usize = 5;

/// Minimum vertical separation between two same-lane enemies at placement time.
pub const MIN_ENEMY_SPACING: f32 = 250.0;

/// Footprint of the player car expressed in world units.
pub const CAR_SIZE: EntitySize = EntitySize::new(48.0, 96.0);

/// Footprint of an enemy vehicle expressed in world units.
pub const ENEMY_SIZE: EntitySize = EntitySize::new(48.0, 96.0);

/// Footprint of the fuel can pickup expressed in world units.
pub const FUEL_CAN_SIZE: EntitySize = EntitySize::new(32.0, 40.0);

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Seeds the session high score loaded from persistent storage.
    SeedHighScore {
        /// Best score recorded by previous sessions.
        value: u32,
    },
    /// Starts a fresh run from the menu or the game-over screen.
    StartRun,
    /// Nudges the player car one steering step in the given direction.
    SteerCar {
        /// Direction of the requested steering step.
        direction: SteerDirection,
    },
    /// Advances the simulation clock by the provided frame delta.
    Tick {
        /// Duration of real time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Places an enemy at a sampled lane and vertical offset.
    PlaceEnemy {
        /// Identifier of the pool slot receiving the placement.
        enemy: EnemyId,
        /// Lane the enemy occupies after placement.
        lane: LaneIndex,
        /// Vertical offset assigned to the enemy, negative above the screen.
        y: f32,
        /// Forward speed of the enemy relative to the road.
        speed: f32,
        /// Cosmetic variant drawn for the enemy.
        variant: EnemyVariant,
    },
    /// Activates the fuel can pickup at a sampled lane and vertical offset.
    SpawnFuelCan {
        /// Lane the fuel can occupies.
        lane: LaneIndex,
        /// Vertical offset assigned to the can, negative above the screen.
        y: f32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that the game switched to a new mode.
    ModeChanged {
        /// Mode that became active after processing commands.
        mode: GameMode,
    },
    /// Confirms that a fresh run began and the enemy pool awaits a scatter.
    RunStarted,
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of real time that elapsed in the tick.
        dt: Duration,
    },
    /// Reports that an enemy scrolled past the bottom edge and awaits placement.
    EnemyFinished {
        /// Identifier of the enemy that left the screen.
        enemy: EnemyId,
    },
    /// Confirms that an enemy was placed by the spawning system.
    EnemyPlaced {
        /// Identifier of the placed enemy.
        enemy: EnemyId,
        /// Lane the enemy occupies after placement.
        lane: LaneIndex,
        /// Vertical offset the enemy received.
        y: f32,
    },
    /// Confirms that the fuel can pickup became active.
    FuelCanSpawned {
        /// Lane the fuel can occupies.
        lane: LaneIndex,
    },
    /// Reports that the player collected the fuel can.
    FuelCollected {
        /// Fuel level after the refill was applied.
        fuel: f32,
    },
    /// Reports that the fuel can scrolled past the bottom edge uncollected.
    FuelCanMissed,
    /// Reports that the score advanced by one increment.
    ScoreAwarded {
        /// Total score after the award.
        score: u32,
    },
    /// Announces that the active run ended.
    RunEnded {
        /// Reason the run ended.
        cause: GameOverCause,
        /// Final score achieved by the run.
        score: u32,
    },
    /// Announces that the finished run beat the stored high score.
    HighScoreBeaten {
        /// New high score to persist.
        score: u32,
    },
}

/// Describes the active top-level mode of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Title screen awaiting the play action.
    Menu,
    /// Active run with live steering, spawning and scoring.
    Gameplay,
    /// Post-run screen awaiting the restart action.
    GameOver,
}

/// Reasons a run can end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOverCause {
    /// The car left the road or touched an enemy vehicle.
    Crashed,
    /// The fuel gauge drained to zero.
    OutOfFuel,
}

/// Horizontal steering directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SteerDirection {
    /// Movement toward the left road edge.
    Left,
    /// Movement toward the right road edge.
    Right,
}

/// Unique identifier assigned to an enemy pool slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Zero-based index of a lane within the road.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LaneIndex(usize);

impl LaneIndex {
    /// Creates a new lane index wrapper.
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Retrieves the underlying lane index.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }
}

/// Cosmetic vehicle variant assigned to an enemy at placement time.
///
/// Variants affect only which sprite is drawn; every variant shares the same
/// footprint and behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyVariant {
    /// Compact two-door car.
    Coupe,
    /// Four-door passenger car.
    Sedan,
    /// City taxi.
    Taxi,
    /// Delivery van.
    Van,
}

impl EnemyVariant {
    /// Every variant in canonical order.
    pub const ALL: [Self; 4] = [Self::Coupe, Self::Sedan, Self::Taxi, Self::Van];

    /// Returns the variant at the provided canonical index, wrapping around.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }
}

/// Width and height of an entity footprint measured in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntitySize {
    width: f32,
    height: f32,
}

impl EntitySize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width of the footprint in world units.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the footprint in world units.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }
}

/// Axis-aligned rectangle expressed in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl Rect {
    /// Constructs a rectangle from its top-left corner and dimensions.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Constructs a rectangle from a top-left corner and an entity size.
    #[must_use]
    pub const fn from_origin_and_size(x: f32, y: f32, size: EntitySize) -> Self {
        Self::new(x, y, size.width(), size.height())
    }

    /// Horizontal position of the rectangle's left edge.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical position of the rectangle's top edge.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Width of the rectangle.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the rectangle.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Returns a copy shrunk by the provided margin on every side.
    ///
    /// Negative resulting dimensions are clamped to zero so a degenerate
    /// rectangle never reports phantom overlaps.
    #[must_use]
    pub fn inset(&self, margin: f32) -> Self {
        let width = (self.width - 2.0 * margin).max(0.0);
        let height = (self.height - 2.0 * margin).max(0.0);
        Self::new(self.x + margin, self.y + margin, width, height)
    }

    /// Reports whether two rectangles overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }

    /// Reports whether the rectangle contains the provided point.
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// Fixed geometry of the four-lane road.
#[derive(Clone, Debug, PartialEq)]
pub struct Road {
    left_edge: f32,
    right_edge: f32,
    lanes: [f32; LANE_COUNT],
}

impl Road {
    /// Creates a new road description.
    #[must_use]
    pub const fn new(left_edge: f32, right_edge: f32, lanes: [f32; LANE_COUNT]) -> Self {
        Self {
            left_edge,
            right_edge,
            lanes,
        }
    }

    /// Horizontal position of the left road edge.
    #[must_use]
    pub const fn left_edge(&self) -> f32 {
        self.left_edge
    }

    /// Horizontal position of the right road edge.
    #[must_use]
    pub const fn right_edge(&self) -> f32 {
        self.right_edge
    }

    /// Left sprite edge of every lane in canonical order.
    #[must_use]
    pub const fn lanes(&self) -> &[f32; LANE_COUNT] {
        &self.lanes
    }

    /// Left sprite edge of the provided lane.
    #[must_use]
    pub fn lane_x(&self, lane: LaneIndex) -> f32 {
        self.lanes[lane.get() % LANE_COUNT]
    }

    /// Horizontal position that centres a footprint of the given width.
    #[must_use]
    pub fn centre_x(&self, width: f32) -> f32 {
        SCREEN_WIDTH / 2.0 - width / 2.0
    }

    /// Reports whether a footprint of the given width fits inside the road.
    #[must_use]
    pub fn contains_span(&self, x: f32, width: f32) -> bool {
        x >= self.left_edge && x + width <= self.right_edge
    }
}

impl Default for Road {
    fn default() -> Self {
        Self::new(140.0, 670.0, [200.0, 300.0, 450.0, 540.0])
    }
}

#[cfg(test)]
mod tests {
    use super::{EnemyId, EnemyVariant, GameMode, GameOverCause, LaneIndex, Rect, Road, CAR_SIZE};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn rect_overlap_matches_expectation() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let c = Rect::new(10.0, 0.0, 5.0, 5.0);

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c), "touching edges do not overlap");
    }

    #[test]
    fn rect_inset_shrinks_every_side() {
        let rect = Rect::new(100.0, 200.0, 48.0, 96.0);
        let shrunk = rect.inset(5.0);

        assert_eq!(shrunk.x(), 105.0);
        assert_eq!(shrunk.y(), 205.0);
        assert_eq!(shrunk.width(), 38.0);
        assert_eq!(shrunk.height(), 86.0);
    }

    #[test]
    fn rect_inset_never_inverts() {
        let rect = Rect::new(0.0, 0.0, 4.0, 4.0);
        let shrunk = rect.inset(10.0);

        assert_eq!(shrunk.width(), 0.0);
        assert_eq!(shrunk.height(), 0.0);
        assert!(!shrunk.overlaps(&Rect::new(-50.0, -50.0, 100.0, 100.0)));
    }

    #[test]
    fn road_span_check_respects_both_edges() {
        let road = Road::default();

        assert!(road.contains_span(road.left_edge(), CAR_SIZE.width()));
        assert!(!road.contains_span(road.left_edge() - 1.0, CAR_SIZE.width()));
        assert!(!road.contains_span(road.right_edge() - CAR_SIZE.width() + 1.0, CAR_SIZE.width()));
    }

    #[test]
    fn lane_positions_are_strictly_ordered() {
        let road = Road::default();
        let lanes = road.lanes();
        for pair in lanes.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert!(lanes[0] >= road.left_edge());
        assert!(lanes[lanes.len() - 1] <= road.right_edge());
    }

    #[test]
    fn enemy_variant_index_wraps() {
        assert_eq!(EnemyVariant::from_index(0), EnemyVariant::Coupe);
        assert_eq!(EnemyVariant::from_index(3), EnemyVariant::Van);
        assert_eq!(EnemyVariant::from_index(4), EnemyVariant::Coupe);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn enemy_id_round_trips_through_bincode() {
        assert_round_trip(&EnemyId::new(3));
    }

    #[test]
    fn lane_index_round_trips_through_bincode() {
        assert_round_trip(&LaneIndex::new(2));
    }

    #[test]
    fn game_over_cause_round_trips_through_bincode() {
        assert_round_trip(&GameOverCause::OutOfFuel);
    }

    #[test]
    fn game_mode_round_trips_through_bincode() {
        assert_round_trip(&GameMode::GameOver);
    }

    #[test]
    fn enemy_variant_round_trips_through_bincode() {
        assert_round_trip(&EnemyVariant::Taxi);
    }
}
