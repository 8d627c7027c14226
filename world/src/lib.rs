#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Lane Rush.
//!
//! The world owns every piece of run state: the player car, the recycled
//! enemy pool, the optional fuel can, the score/fuel/speed accumulators and
//! the Menu/Gameplay/GameOver mode machine. All mutation flows through
//! [`apply`], which executes one [`Command`] and reports what happened as
//! [`Event`] values. Randomness never enters this crate; placements arrive
//! fully sampled from the spawning systems.

use std::time::Duration;

use lane_rush_core::{
    Command, EnemyId, EnemyVariant, Event, GameMode, GameOverCause, LaneIndex, Rect, Road,
    SteerDirection, CAR_SIZE, ENEMY_CAPACITY, ENEMY_SIZE, FUEL_CAN_SIZE, SCREEN_HEIGHT,
};

/// Forward speed assigned at the start of every run.
pub const START_SPEED: f32 = 5.0;

/// Cap the forward speed ramps toward during a run.
pub const MAX_SPEED: f32 = 15.0;

/// Speed gained per tick until the cap is reached.
const SPEED_RAMP: f32 = 0.003;

/// Horizontal distance covered by one steering step.
const STEER_STEP: f32 = 6.0;

/// Fuel level granted at the start of every run; also the clamp ceiling.
pub const FUEL_CAPACITY: f32 = 100.0;

/// Fuel drained every tick while a run is active.
const FUEL_DRAIN_PER_TICK: f32 = 0.1;

/// Fuel restored by collecting a fuel can.
const FUEL_REFILL: f32 = 35.0;

/// Elapsed-time threshold that awards one score increment.
const SCORE_INTERVAL: Duration = Duration::from_millis(500);

/// Points awarded each time the score interval elapses.
const SCORE_INCREMENT: u32 = 5;

/// Margin trimmed from every side of an enemy rectangle before crash tests.
const COLLISION_INSET: f32 = 5.0;

/// Vertical offset assigned to pool slots that await their first placement.
const PARKED_Y: f32 = -1000.0;

/// Fixed vertical position of the player car's top edge.
const CAR_Y: f32 = SCREEN_HEIGHT - CAR_SIZE.height() - 20.0;

/// Represents the authoritative Lane Rush world state.
#[derive(Debug)]
pub struct World {
    road: Road,
    mode: GameMode,
    cause: Option<GameOverCause>,
    car_x: f32,
    current_speed: f32,
    fuel: f32,
    score: u32,
    score_timer: Duration,
    enemies: [Enemy; ENEMY_CAPACITY],
    fuel_can: Option<FuelCan>,
    high_score: u32,
    high_score_beaten: bool,
}

impl World {
    /// Creates a new world sitting on the menu screen.
    #[must_use]
    pub fn new() -> Self {
        let road = Road::default();
        let car_x = road.centre_x(CAR_SIZE.width());
        Self {
            road,
            mode: GameMode::Menu,
            cause: None,
            car_x,
            current_speed: START_SPEED,
            fuel: FUEL_CAPACITY,
            score: 0,
            score_timer: Duration::ZERO,
            enemies: parked_pool(),
            fuel_can: None,
            high_score: 0,
            high_score_beaten: false,
        }
    }

    fn reset_run(&mut self) {
        self.cause = None;
        self.car_x = self.road.centre_x(CAR_SIZE.width());
        self.current_speed = START_SPEED;
        self.fuel = FUEL_CAPACITY;
        self.score = 0;
        self.score_timer = Duration::ZERO;
        self.enemies = parked_pool();
        self.fuel_can = None;
        self.high_score_beaten = false;
    }

    fn advance_run(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let mut crashed = false;
        let mut out_of_fuel = false;

        if self.current_speed < MAX_SPEED {
            self.current_speed += SPEED_RAMP;
        }

        if !self.road.contains_span(self.car_x, CAR_SIZE.width()) {
            crashed = true;
        }

        self.score_timer = self.score_timer.saturating_add(dt);
        if self.score_timer >= SCORE_INTERVAL {
            self.score = self.score.saturating_add(SCORE_INCREMENT);
            self.score_timer = Duration::ZERO;
            out_events.push(Event::ScoreAwarded { score: self.score });
        }

        self.fuel -= FUEL_DRAIN_PER_TICK;
        if self.fuel <= 0.0 {
            self.fuel = 0.0;
            out_of_fuel = true;
        }

        for enemy in &mut self.enemies {
            enemy.y += self.current_speed - enemy.speed;
            if enemy.y > SCREEN_HEIGHT {
                out_events.push(Event::EnemyFinished { enemy: enemy.id });
            }
        }

        if let Some(can) = &mut self.fuel_can {
            can.y += self.current_speed;
        }
        if self
            .fuel_can
            .as_ref()
            .map_or(false, |can| can.y > SCREEN_HEIGHT)
        {
            self.fuel_can = None;
            out_events.push(Event::FuelCanMissed);
        }

        let car_rect = Rect::from_origin_and_size(self.car_x, CAR_Y, CAR_SIZE);
        for enemy in &self.enemies {
            let enemy_rect = Rect::from_origin_and_size(enemy.x, enemy.y, ENEMY_SIZE)
                .inset(COLLISION_INSET);
            if car_rect.overlaps(&enemy_rect) {
                crashed = true;
            }
        }

        let collected = self.fuel_can.as_ref().map_or(false, |can| {
            let can_rect = Rect::from_origin_and_size(can.x, can.y, FUEL_CAN_SIZE);
            car_rect.overlaps(&can_rect)
        });
        if collected {
            self.fuel = (self.fuel + FUEL_REFILL).min(FUEL_CAPACITY);
            self.fuel_can = None;
            out_events.push(Event::FuelCollected { fuel: self.fuel });
        }

        if crashed {
            self.enter_game_over(GameOverCause::Crashed, out_events);
        } else if out_of_fuel {
            self.enter_game_over(GameOverCause::OutOfFuel, out_events);
        }
    }

    fn enter_game_over(&mut self, cause: GameOverCause, out_events: &mut Vec<Event>) {
        self.mode = GameMode::GameOver;
        self.cause = Some(cause);
        out_events.push(Event::ModeChanged {
            mode: GameMode::GameOver,
        });
        out_events.push(Event::RunEnded {
            cause,
            score: self.score,
        });

        if self.score > self.high_score {
            self.high_score = self.score;
            self.high_score_beaten = true;
            out_events.push(Event::HighScoreBeaten { score: self.score });
        } else {
            self.high_score_beaten = false;
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SeedHighScore { value } => {
            world.high_score = value;
        }
        Command::StartRun => {
            if world.mode != GameMode::Gameplay {
                world.reset_run();
                world.mode = GameMode::Gameplay;
                out_events.push(Event::ModeChanged {
                    mode: GameMode::Gameplay,
                });
                out_events.push(Event::RunStarted);
            }
        }
        Command::SteerCar { direction } => {
            if world.mode == GameMode::Gameplay {
                match direction {
                    SteerDirection::Left => world.car_x -= STEER_STEP,
                    SteerDirection::Right => world.car_x += STEER_STEP,
                }
            }
        }
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            if world.mode == GameMode::Gameplay {
                world.advance_run(dt, out_events);
            }
        }
        Command::PlaceEnemy {
            enemy,
            lane,
            y,
            speed,
            variant,
        } => {
            let index = enemy.get() as usize;
            if let Some(slot) = world.enemies.get_mut(index) {
                slot.lane = lane;
                slot.x = world.road.lane_x(lane);
                slot.y = y;
                slot.speed = speed;
                slot.variant = variant;
                out_events.push(Event::EnemyPlaced { enemy, lane, y });
            }
        }
        Command::SpawnFuelCan { lane, y } => {
            if world.mode == GameMode::Gameplay && world.fuel_can.is_none() {
                world.fuel_can = Some(FuelCan {
                    lane,
                    x: world.road.lane_x(lane),
                    y,
                });
                out_events.push(Event::FuelCanSpawned { lane });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use lane_rush_core::{
        EnemyId, EnemyVariant, GameMode, GameOverCause, LaneIndex, Rect, Road, CAR_SIZE,
        ENEMY_SIZE, FUEL_CAN_SIZE,
    };

    use super::{World, CAR_Y};

    /// Retrieves the active game mode.
    #[must_use]
    pub fn mode(world: &World) -> GameMode {
        world.mode
    }

    /// Retrieves the cause of the most recent run end, if any.
    #[must_use]
    pub fn game_over_cause(world: &World) -> Option<GameOverCause> {
        world.cause
    }

    /// Provides read-only access to the road geometry.
    #[must_use]
    pub fn road(world: &World) -> &Road {
        &world.road
    }

    /// Captures the player car's position for rendering and collision tests.
    #[must_use]
    pub fn car(world: &World) -> CarSnapshot {
        CarSnapshot {
            x: world.car_x,
            y: CAR_Y,
        }
    }

    /// Captures the run accumulators in a single snapshot.
    #[must_use]
    pub fn run_status(world: &World) -> RunStatus {
        RunStatus {
            current_speed: world.current_speed,
            fuel: world.fuel,
            score: world.score,
        }
    }

    /// Retrieves the best score seen by this session.
    #[must_use]
    pub fn high_score(world: &World) -> u32 {
        world.high_score
    }

    /// Reports whether the most recent run beat the stored high score.
    #[must_use]
    pub fn high_score_beaten(world: &World) -> bool {
        world.high_score_beaten
    }

    /// Captures a read-only view of the enemy pool.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let mut snapshots: Vec<EnemySnapshot> = world
            .enemies
            .iter()
            .map(|enemy| EnemySnapshot {
                id: enemy.id,
                lane: enemy.lane,
                x: enemy.x,
                y: enemy.y,
                speed: enemy.speed,
                variant: enemy.variant,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        EnemyView { snapshots }
    }

    /// Captures the active fuel can, if one exists.
    #[must_use]
    pub fn fuel_can(world: &World) -> Option<FuelCanSnapshot> {
        world.fuel_can.as_ref().map(|can| FuelCanSnapshot {
            lane: can.lane,
            x: can.x,
            y: can.y,
        })
    }

    /// Immutable representation of the player car used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct CarSnapshot {
        /// Horizontal position of the car's left edge.
        pub x: f32,
        /// Fixed vertical position of the car's top edge.
        pub y: f32,
    }

    impl CarSnapshot {
        /// Full bounding rectangle of the car.
        #[must_use]
        pub fn rect(&self) -> Rect {
            Rect::from_origin_and_size(self.x, self.y, CAR_SIZE)
        }
    }

    /// Scalar accumulators advanced once per tick during a run.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct RunStatus {
        /// Global scroll speed the road moves at.
        pub current_speed: f32,
        /// Remaining fuel within `0.0..=100.0`.
        pub fuel: f32,
        /// Score accrued by the active or most recent run.
        pub score: u32,
    }

    /// Read-only snapshot describing the enemy pool.
    #[derive(Clone, Debug, Default)]
    pub struct EnemyView {
        snapshots: Vec<EnemySnapshot>,
    }

    impl EnemyView {
        /// Iterator over the captured enemy snapshots in deterministic order.
        pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<EnemySnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single enemy's state used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct EnemySnapshot {
        /// Identifier of the pool slot.
        pub id: EnemyId,
        /// Lane the enemy occupies.
        pub lane: LaneIndex,
        /// Horizontal position of the enemy's left edge.
        pub x: f32,
        /// Vertical position of the enemy's top edge.
        pub y: f32,
        /// Forward speed of the enemy relative to the road.
        pub speed: f32,
        /// Cosmetic variant drawn for the enemy.
        pub variant: EnemyVariant,
    }

    impl EnemySnapshot {
        /// Full bounding rectangle of the enemy sprite.
        #[must_use]
        pub fn rect(&self) -> Rect {
            Rect::from_origin_and_size(self.x, self.y, ENEMY_SIZE)
        }
    }

    /// Immutable representation of the fuel can used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct FuelCanSnapshot {
        /// Lane the fuel can occupies.
        pub lane: LaneIndex,
        /// Horizontal position of the can's left edge.
        pub x: f32,
        /// Vertical position of the can's top edge.
        pub y: f32,
    }

    impl FuelCanSnapshot {
        /// Full bounding rectangle of the fuel can.
        #[must_use]
        pub fn rect(&self) -> Rect {
            Rect::from_origin_and_size(self.x, self.y, FUEL_CAN_SIZE)
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Enemy {
    id: EnemyId,
    lane: LaneIndex,
    x: f32,
    y: f32,
    speed: f32,
    variant: EnemyVariant,
}

#[derive(Clone, Copy, Debug)]
struct FuelCan {
    lane: LaneIndex,
    x: f32,
    y: f32,
}

fn parked_pool() -> [Enemy; ENEMY_CAPACITY] {
    let road = Road::default();
    std::array::from_fn(|index| {
        let lane = LaneIndex::new(index % lane_rush_core::LANE_COUNT);
        Enemy {
            id: EnemyId::new(index as u32),
            lane,
            x: road.lane_x(lane),
            y: PARKED_Y,
            speed: 0.0,
            variant: EnemyVariant::from_index(index),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_rush_core::LANE_COUNT;

    const FRAME: Duration = Duration::from_micros(16_667);

    fn tick(world: &mut World, dt: Duration) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, Command::Tick { dt }, &mut events);
        events
    }

    fn start_run(world: &mut World) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, Command::StartRun, &mut events);
        events
    }

    fn steer(world: &mut World, direction: SteerDirection, steps: usize) {
        let mut events = Vec::new();
        for _ in 0..steps {
            apply(world, Command::SteerCar { direction }, &mut events);
        }
    }

    #[test]
    fn start_run_resets_accumulators_and_emits_run_started() {
        let mut world = World::new();
        let events = start_run(&mut world);

        assert_eq!(query::mode(&world), GameMode::Gameplay);
        let status = query::run_status(&world);
        assert_eq!(status.score, 0);
        assert_eq!(status.fuel, FUEL_CAPACITY);
        assert_eq!(status.current_speed, START_SPEED);
        assert!(query::fuel_can(&world).is_none());
        assert!(query::game_over_cause(&world).is_none());
        assert!(events.contains(&Event::ModeChanged {
            mode: GameMode::Gameplay
        }));
        assert!(events.contains(&Event::RunStarted));
    }

    #[test]
    fn start_run_is_ignored_while_a_run_is_active() {
        let mut world = World::new();
        let _ = start_run(&mut world);
        let _ = tick(&mut world, FRAME);
        let fuel_before = query::run_status(&world).fuel;

        let events = start_run(&mut world);
        assert!(events.is_empty(), "active runs cannot be restarted");
        assert_eq!(query::run_status(&world).fuel, fuel_before);
    }

    #[test]
    fn steering_moves_the_car_only_during_gameplay() {
        let mut world = World::new();
        let parked = query::car(&world).x;
        steer(&mut world, SteerDirection::Left, 3);
        assert_eq!(query::car(&world).x, parked, "menu ignores steering");

        let _ = start_run(&mut world);
        steer(&mut world, SteerDirection::Left, 2);
        steer(&mut world, SteerDirection::Right, 1);
        assert_eq!(query::car(&world).x, parked - 6.0);
    }

    #[test]
    fn leaving_the_road_ends_the_run_with_a_crash() {
        let mut world = World::new();
        let _ = start_run(&mut world);
        // Centre is 376; 40 steps of 6 land at 136, past the 140 edge.
        steer(&mut world, SteerDirection::Left, 40);

        let events = tick(&mut world, FRAME);
        assert_eq!(query::mode(&world), GameMode::GameOver);
        assert_eq!(
            query::game_over_cause(&world),
            Some(GameOverCause::Crashed)
        );
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::RunEnded { cause, .. }
                if *cause == GameOverCause::Crashed)));
    }

    #[test]
    fn crash_does_not_suppress_the_rest_of_the_tick() {
        let mut world = World::new();
        let _ = start_run(&mut world);
        steer(&mut world, SteerDirection::Left, 40);

        let events = tick(&mut world, Duration::from_millis(500));
        // The bounds check fires first, yet the score interval and fuel
        // drain of the same tick still land before the mode switches.
        assert!(events.contains(&Event::ScoreAwarded { score: 5 }));
        let status = query::run_status(&world);
        assert_eq!(status.score, 5);
        assert!(status.fuel < FUEL_CAPACITY);
    }

    #[test]
    fn score_awards_exactly_once_per_interval_crossing() {
        let mut world = World::new();
        let _ = start_run(&mut world);

        let events = tick(&mut world, Duration::from_millis(499));
        assert!(events.iter().all(|event| !matches!(event, Event::ScoreAwarded { .. })));

        let events = tick(&mut world, Duration::from_millis(1));
        assert!(events.contains(&Event::ScoreAwarded { score: 5 }));

        // The timer resets to zero on award, so a long tick still pays once.
        let events = tick(&mut world, Duration::from_millis(1700));
        let awards = events
            .iter()
            .filter(|event| matches!(event, Event::ScoreAwarded { .. }))
            .count();
        assert_eq!(awards, 1);
        assert_eq!(query::run_status(&world).score, 10);
    }

    #[test]
    fn draining_the_tank_ends_the_run_out_of_fuel() {
        let mut world = World::new();
        let _ = start_run(&mut world);

        let mut ended = None;
        for _ in 0..2_000 {
            let events = tick(&mut world, Duration::from_millis(1));
            let status = query::run_status(&world);
            assert!((0.0..=FUEL_CAPACITY).contains(&status.fuel));
            if let Some(Event::RunEnded { cause, .. }) = events
                .iter()
                .find(|event| matches!(event, Event::RunEnded { .. }))
            {
                ended = Some(*cause);
                break;
            }
        }

        assert_eq!(ended, Some(GameOverCause::OutOfFuel));
        assert_eq!(query::run_status(&world).fuel, 0.0);
        assert_eq!(query::mode(&world), GameMode::GameOver);
    }

    #[test]
    fn touching_an_enemy_ends_the_run_with_a_crash() {
        let mut world = World::new();
        let _ = start_run(&mut world);

        let mut events = Vec::new();
        let car_y = query::car(&world).y;
        apply(
            &mut world,
            Command::PlaceEnemy {
                enemy: EnemyId::new(0),
                lane: LaneIndex::new(2),
                y: car_y - 4.0,
                speed: START_SPEED,
                variant: EnemyVariant::Taxi,
            },
            &mut events,
        );
        // Six steps to the right overlap the shrunk rectangle in lane 2.
        steer(&mut world, SteerDirection::Right, 6);

        let events = tick(&mut world, FRAME);
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::RunEnded { cause, .. }
                if *cause == GameOverCause::Crashed)));
        assert_eq!(query::mode(&world), GameMode::GameOver);
    }

    #[test]
    fn near_miss_on_the_shrunk_rectangle_is_not_a_crash() {
        let mut world = World::new();
        let _ = start_run(&mut world);

        // Lane 2 sits at x 450; the car centred at 376 spans 376..424. The
        // raw sprite rectangles touch nothing, and even steering until the
        // sprites are 4 units apart stays outside the 5-unit inset.
        let mut events = Vec::new();
        let car_y = query::car(&world).y;
        apply(
            &mut world,
            Command::PlaceEnemy {
                enemy: EnemyId::new(0),
                lane: LaneIndex::new(2),
                y: car_y,
                speed: MAX_SPEED,
                variant: EnemyVariant::Coupe,
            },
            &mut events,
        );
        steer(&mut world, SteerDirection::Right, 5);

        let _ = tick(&mut world, FRAME);
        assert_eq!(query::mode(&world), GameMode::Gameplay);
    }

    #[test]
    fn collecting_the_fuel_can_refills_and_clamps() {
        let mut world = World::new();
        let _ = start_run(&mut world);

        // Burn most of the tank first so the refill lands unclamped.
        for _ in 0..800 {
            let _ = tick(&mut world, Duration::from_millis(1));
        }
        assert_eq!(query::mode(&world), GameMode::Gameplay);
        let before = query::run_status(&world).fuel;

        let mut events = Vec::new();
        let car_y = query::car(&world).y;
        apply(
            &mut world,
            Command::SpawnFuelCan {
                lane: LaneIndex::new(2),
                y: car_y - 10.0,
            },
            &mut events,
        );
        assert!(events.contains(&Event::FuelCanSpawned {
            lane: LaneIndex::new(2)
        }));
        steer(&mut world, SteerDirection::Right, 6);

        let events = tick(&mut world, FRAME);
        let collected = events
            .iter()
            .find_map(|event| match event {
                Event::FuelCollected { fuel } => Some(*fuel),
                _ => None,
            })
            .expect("fuel can should be collected");
        let expected = before - 0.1 + 35.0;
        assert!((collected - expected).abs() < 1e-3);
        assert!(query::fuel_can(&world).is_none());
    }

    #[test]
    fn refill_clamps_at_capacity() {
        let mut world = World::new();
        let _ = start_run(&mut world);

        let mut events = Vec::new();
        let car_y = query::car(&world).y;
        apply(
            &mut world,
            Command::SpawnFuelCan {
                lane: LaneIndex::new(2),
                y: car_y - 10.0,
            },
            &mut events,
        );
        steer(&mut world, SteerDirection::Right, 6);

        let _ = tick(&mut world, FRAME);
        assert_eq!(query::run_status(&world).fuel, FUEL_CAPACITY);
    }

    #[test]
    fn fuel_can_scrolling_off_screen_despawns() {
        let mut world = World::new();
        let _ = start_run(&mut world);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnFuelCan {
                lane: LaneIndex::new(0),
                y: SCREEN_HEIGHT - 4.0,
            },
            &mut events,
        );

        let events = tick(&mut world, FRAME);
        assert!(events.contains(&Event::FuelCanMissed));
        assert!(query::fuel_can(&world).is_none());
    }

    #[test]
    fn second_fuel_can_is_rejected_while_one_is_active() {
        let mut world = World::new();
        let _ = start_run(&mut world);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnFuelCan {
                lane: LaneIndex::new(0),
                y: -300.0,
            },
            &mut events,
        );
        events.clear();
        apply(
            &mut world,
            Command::SpawnFuelCan {
                lane: LaneIndex::new(3),
                y: -500.0,
            },
            &mut events,
        );

        assert!(events.is_empty(), "only one can may be active");
        let can = query::fuel_can(&world).expect("first can remains");
        assert_eq!(can.lane, LaneIndex::new(0));
    }

    #[test]
    fn enemies_past_the_bottom_edge_request_placement() {
        let mut world = World::new();
        let _ = start_run(&mut world);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceEnemy {
                enemy: EnemyId::new(4),
                lane: LaneIndex::new(1),
                y: SCREEN_HEIGHT - 1.0,
                speed: 0.0,
                variant: EnemyVariant::Van,
            },
            &mut events,
        );

        let events = tick(&mut world, FRAME);
        assert!(events.contains(&Event::EnemyFinished {
            enemy: EnemyId::new(4)
        }));
    }

    #[test]
    fn place_enemy_updates_the_addressed_slot() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceEnemy {
                enemy: EnemyId::new(2),
                lane: LaneIndex::new(3),
                y: -640.0,
                speed: 4.0,
                variant: EnemyVariant::Sedan,
            },
            &mut events,
        );

        assert!(events.contains(&Event::EnemyPlaced {
            enemy: EnemyId::new(2),
            lane: LaneIndex::new(3),
            y: -640.0,
        }));

        let snapshot = query::enemy_view(&world)
            .into_vec()
            .into_iter()
            .find(|enemy| enemy.id == EnemyId::new(2))
            .expect("slot exists");
        assert_eq!(snapshot.lane, LaneIndex::new(3));
        assert_eq!(snapshot.x, query::road(&world).lane_x(LaneIndex::new(3)));
        assert_eq!(snapshot.y, -640.0);
        assert_eq!(snapshot.speed, 4.0);
        assert_eq!(snapshot.variant, EnemyVariant::Sedan);
    }

    #[test]
    fn high_score_updates_and_flags_once_on_run_end() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SeedHighScore { value: 120 },
            &mut events,
        );
        let _ = start_run(&mut world);

        // 25 score intervals push the run to 125 points, beating 120.
        for _ in 0..25 {
            let _ = tick(&mut world, Duration::from_millis(500));
        }
        assert_eq!(query::run_status(&world).score, 125);

        steer(&mut world, SteerDirection::Left, 40);
        let events = tick(&mut world, FRAME);
        assert!(events.contains(&Event::HighScoreBeaten { score: 125 }));
        assert_eq!(query::high_score(&world), 125);
        assert!(query::high_score_beaten(&world));

        // Further ticks on the game-over screen stay quiet.
        let events = tick(&mut world, FRAME);
        assert!(events
            .iter()
            .all(|event| matches!(event, Event::TimeAdvanced { .. })));
    }

    #[test]
    fn lower_scores_leave_the_high_score_untouched() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SeedHighScore { value: 150 },
            &mut events,
        );
        let _ = start_run(&mut world);
        for _ in 0..18 {
            let _ = tick(&mut world, Duration::from_millis(500));
        }
        assert_eq!(query::run_status(&world).score, 90);

        steer(&mut world, SteerDirection::Left, 40);
        let events = tick(&mut world, FRAME);
        assert!(events
            .iter()
            .all(|event| !matches!(event, Event::HighScoreBeaten { .. })));
        assert_eq!(query::high_score(&world), 150);
        assert!(!query::high_score_beaten(&world));
    }

    #[test]
    fn restart_from_game_over_resets_the_run() {
        let mut world = World::new();
        let _ = start_run(&mut world);
        for _ in 0..4 {
            let _ = tick(&mut world, Duration::from_millis(500));
        }
        steer(&mut world, SteerDirection::Left, 40);
        let _ = tick(&mut world, FRAME);
        assert_eq!(query::mode(&world), GameMode::GameOver);

        let events = start_run(&mut world);
        assert!(events.contains(&Event::RunStarted));
        assert_eq!(query::mode(&world), GameMode::Gameplay);
        let status = query::run_status(&world);
        assert_eq!(status.score, 0);
        assert_eq!(status.fuel, FUEL_CAPACITY);
        assert_eq!(status.current_speed, START_SPEED);
        assert_eq!(
            query::car(&world).x,
            query::road(&world).centre_x(CAR_SIZE.width())
        );
        assert!(query::fuel_can(&world).is_none());
        assert!(query::game_over_cause(&world).is_none());
        assert!(!query::high_score_beaten(&world));
        for enemy in query::enemy_view(&world).iter() {
            assert!(enemy.y <= PARKED_Y, "pool slots park above the screen");
        }
    }

    #[test]
    fn parked_pool_spreads_slots_across_lanes() {
        let world = World::new();
        for enemy in query::enemy_view(&world).iter() {
            assert!(enemy.lane.get() < LANE_COUNT);
            assert_eq!(enemy.y, PARKED_Y);
        }
    }
}
