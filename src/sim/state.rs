//! Round state and core simulation types
//!
//! A `Round` owns everything one attempt at getting the pig home needs:
//! the pig, its home, the walls drawn so far and the round clock. Nothing
//! here is global, so any number of rounds can coexist.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::Rect;
use crate::consts::*;

/// Current status of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundStatus {
    /// Created but never reset; nothing moves
    Idle,
    /// Pig is loose, clock is running
    Running,
    /// Frozen until resumed
    Paused,
    /// Pig reached home; terminal until the next reset
    Won,
}

/// How the home square is placed on reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HomePlacement {
    /// Bottom-right corner, pig spawns top-left
    Fixed,
    /// Anywhere inside the padding, pig spawns clear of it
    #[default]
    Random,
}

impl HomePlacement {
    pub fn as_str(&self) -> &'static str {
        match self {
            HomePlacement::Fixed => "fixed",
            HomePlacement::Random => "random",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fixed" | "corner" => Some(HomePlacement::Fixed),
            "random" => Some(HomePlacement::Random),
            _ => None,
        }
    }
}

/// Events emitted by the simulation for the outside world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Pig is fully inside home; carries the time to record
    Won { elapsed_secs: f64 },
}

/// The pig
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pig {
    /// Top-left corner in canvas space
    pub pos: Vec2,
    /// Displacement per tick
    pub vel: Vec2,
    pub size: f32,
}

impl Default for Pig {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: PIG_SIZE,
        }
    }
}

impl Pig {
    /// Full visual bounds
    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, self.size)
    }

    /// Inset box used for wall collisions
    pub fn hitbox(&self) -> Rect {
        self.rect().inset(HITBOX_INSET)
    }
}

/// Home square
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Home {
    pub pos: Vec2,
    pub size: f32,
}

impl Default for Home {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            size: HOME_SIZE,
        }
    }
}

impl Home {
    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, self.size)
    }

    /// Pig is home only when its whole body is inside
    pub fn contains(&self, pig: &Pig) -> bool {
        self.rect().contains_rect(&pig.rect())
    }
}

/// A wall needs at least two points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("a wall needs at least two points, got {0}")]
pub struct TooFewPoints(pub usize);

/// A committed wall: a polyline of at least two points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec2>", into = "Vec<Vec2>")]
pub struct Obstacle {
    points: Vec<Vec2>,
}

impl Obstacle {
    /// Build a wall, or `None` if there are fewer than two points
    pub fn from_points(points: Vec<Vec2>) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        Some(Self { points })
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }
}

impl TryFrom<Vec<Vec2>> for Obstacle {
    type Error = TooFewPoints;

    fn try_from(points: Vec<Vec2>) -> Result<Self, Self::Error> {
        let len = points.len();
        Self::from_points(points).ok_or(TooFewPoints(len))
    }
}

impl From<Obstacle> for Vec<Vec2> {
    fn from(obstacle: Obstacle) -> Self {
        obstacle.points
    }
}

/// Per-round tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundConfig {
    /// Canvas size in canvas units
    pub canvas: Vec2,
    pub placement: HomePlacement,
    /// Pig speed in units per tick
    pub pig_speed: f32,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            canvas: Vec2::new(800.0, 600.0),
            placement: HomePlacement::default(),
            pig_speed: PIG_SPEED,
        }
    }
}

/// Read-only view handed to renderers each frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundSnapshot {
    pub generation: u64,
    pub status: RoundStatus,
    pub pig: Pig,
    pub home: Home,
    pub obstacles: Vec<Obstacle>,
    /// Wall currently being drawn (may hold a single point)
    pub stroke: Vec<Vec2>,
    pub elapsed_secs: f64,
}

/// One attempt at getting the pig home
#[derive(Debug, Clone)]
pub struct Round {
    /// Seed the RNG was created from
    pub seed: u64,
    rng: Pcg32,
    pub config: RoundConfig,
    pub pig: Pig,
    pub home: Home,
    /// Committed walls in drawing order
    pub obstacles: Vec<Obstacle>,
    /// Wall being drawn, if a stroke is in progress
    stroke: Option<Vec<Vec2>>,
    pub(crate) status: RoundStatus,
    /// Clock reference; `now - start_time` is the elapsed time while running
    pub(crate) start_time: f64,
    pub(crate) elapsed: f64,
    /// Simulation tick counter for the current generation
    pub time_ticks: u64,
    /// Bumped on every reset; stale tick tickets compare against this
    generation: u64,
}

impl Round {
    /// Create an idle round. Call [`Round::reset`] to start playing.
    pub fn new(config: RoundConfig, seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            config,
            pig: Pig::default(),
            home: Home::default(),
            obstacles: Vec::new(),
            stroke: None,
            status: RoundStatus::Idle,
            start_time: 0.0,
            elapsed: 0.0,
            time_ticks: 0,
            generation: 0,
        }
    }

    pub fn status(&self) -> RoundStatus {
        self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Elapsed round time in seconds (frozen while paused or won)
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed
    }

    pub fn is_running(&self) -> bool {
        self.status == RoundStatus::Running
    }

    /// Start a fresh round at time `now` (seconds)
    ///
    /// Available from every status. Clears walls and any stroke in progress,
    /// places home and pig, and invalidates previously issued tick tickets.
    pub fn reset(&mut self, now: f64) {
        self.obstacles.clear();
        self.stroke = None;
        self.generation += 1;
        self.time_ticks = 0;

        match self.config.placement {
            HomePlacement::Fixed => self.place_fixed(),
            HomePlacement::Random => self.place_random(),
        }

        self.status = RoundStatus::Running;
        self.start_time = now;
        self.elapsed = 0.0;

        log::info!(
            "Round {} started: pig at ({:.1}, {:.1}), home at ({:.1}, {:.1})",
            self.generation,
            self.pig.pos.x,
            self.pig.pos.y,
            self.home.pos.x,
            self.home.pos.y
        );
    }

    /// Home in the bottom-right corner, pig in the top-left
    fn place_fixed(&mut self) {
        let canvas = self.config.canvas;
        self.home = Home {
            pos: Vec2::new(
                canvas.x - HOME_SIZE - CANVAS_PADDING,
                canvas.y - HOME_SIZE - CANVAS_PADDING,
            ),
            size: HOME_SIZE,
        };

        let mut speed = self.config.pig_speed;
        if canvas.x < NARROW_CANVAS_WIDTH {
            speed *= NARROW_CANVAS_SPEED_SCALE;
        }
        self.pig = Pig {
            pos: Vec2::splat(CANVAS_PADDING * 2.0),
            vel: self.random_heading() * speed,
            size: PIG_SIZE,
        };
    }

    /// Home anywhere inside the padding, pig resampled until clear of it
    fn place_random(&mut self) {
        let canvas = self.config.canvas;
        let home_pos = self.random_point_within(canvas, HOME_SIZE);
        self.home = Home {
            pos: home_pos,
            size: HOME_SIZE,
        };

        let mut spawn = None;
        for _ in 0..MAX_SPAWN_ATTEMPTS {
            let candidate = self.random_point_within(canvas, PIG_SIZE);
            if !self.spawn_overlaps_home(candidate) {
                spawn = Some(candidate);
                break;
            }
        }

        let spawn = spawn.unwrap_or_else(|| {
            let fallback = self.fallback_spawn();
            log::warn!(
                "No clear spawn point after {} attempts, using ({:.1}, {:.1})",
                MAX_SPAWN_ATTEMPTS,
                fallback.x,
                fallback.y
            );
            fallback
        });

        self.pig = Pig {
            pos: spawn,
            vel: self.random_heading() * self.config.pig_speed,
            size: PIG_SIZE,
        };
    }

    /// Uniform point such that a square of `size` stays inside the padding
    fn random_point_within(&mut self, canvas: Vec2, size: f32) -> Vec2 {
        let span = (canvas - Vec2::splat(size + 2.0 * CANVAS_PADDING)).max(Vec2::ZERO);
        let x = CANVAS_PADDING + self.rng.random::<f32>() * span.x;
        let y = CANVAS_PADDING + self.rng.random::<f32>() * span.y;
        Vec2::new(x, y)
    }

    /// Spawn is rejected inside home grown by one pig size up and left
    fn spawn_overlaps_home(&self, spawn: Vec2) -> bool {
        let home = self.home;
        spawn.x > home.pos.x - PIG_SIZE
            && spawn.x < home.pos.x + home.size
            && spawn.y > home.pos.y - PIG_SIZE
            && spawn.y < home.pos.y + home.size
    }

    /// Padded canvas corner farthest from home
    fn fallback_spawn(&self) -> Vec2 {
        let canvas = self.config.canvas;
        let far = (canvas - Vec2::splat(PIG_SIZE + CANVAS_PADDING)).max(Vec2::splat(CANVAS_PADDING));
        let corners = [
            Vec2::splat(CANVAS_PADDING),
            Vec2::new(far.x, CANVAS_PADDING),
            Vec2::new(CANVAS_PADDING, far.y),
            far,
        ];
        let home_center = self.home.pos + Vec2::splat(self.home.size / 2.0);
        corners
            .into_iter()
            .max_by(|a, b| {
                a.distance_squared(home_center)
                    .partial_cmp(&b.distance_squared(home_center))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(Vec2::splat(CANVAS_PADDING))
    }

    /// Unit vector in a uniformly random direction
    fn random_heading(&mut self) -> Vec2 {
        let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
        Vec2::from_angle(angle)
    }

    /// Freeze the round at time `now`. Ignored unless running.
    pub fn pause(&mut self, now: f64) {
        if self.status != RoundStatus::Running {
            return;
        }
        self.elapsed = now - self.start_time;
        self.status = RoundStatus::Paused;
        log::info!("Round {} paused at {:.1}s", self.generation, self.elapsed);
    }

    /// Continue a paused round; elapsed time skips the paused interval
    pub fn resume(&mut self, now: f64) {
        if self.status != RoundStatus::Paused {
            return;
        }
        self.start_time = now - self.elapsed;
        self.status = RoundStatus::Running;
        log::info!("Round {} resumed", self.generation);
    }

    /// Pause if running, resume if paused, otherwise do nothing
    pub fn toggle_pause(&mut self, now: f64) {
        match self.status {
            RoundStatus::Running => self.pause(now),
            RoundStatus::Paused => self.resume(now),
            RoundStatus::Idle | RoundStatus::Won => {}
        }
    }

    /// Start a new wall at `point`, dropping any unfinished one
    pub fn begin_stroke(&mut self, point: Vec2) {
        if !self.is_running() {
            return;
        }
        self.stroke = Some(vec![point]);
    }

    /// Append `point` to the wall being drawn
    pub fn extend_stroke(&mut self, point: Vec2) {
        if !self.is_running() {
            return;
        }
        if let Some(stroke) = self.stroke.as_mut() {
            stroke.push(point);
        }
    }

    /// Finish the wall being drawn
    ///
    /// The wall is committed only if the round is running and the stroke has
    /// at least two points; otherwise it is discarded.
    pub fn end_stroke(&mut self) {
        let Some(points) = self.stroke.take() else {
            return;
        };
        if !self.is_running() {
            log::debug!("Stroke dropped: round is {:?}", self.status);
            return;
        }
        match Obstacle::from_points(points) {
            Some(obstacle) => {
                log::debug!(
                    "Wall {} committed with {} segments",
                    self.obstacles.len(),
                    obstacle.segment_count()
                );
                self.obstacles.push(obstacle);
            }
            None => log::debug!("Single-point stroke discarded"),
        }
    }

    /// Points of the wall being drawn, if any
    pub fn current_stroke(&self) -> Option<&[Vec2]> {
        self.stroke.as_deref()
    }

    /// Copy of everything a renderer needs for this frame
    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            generation: self.generation,
            status: self.status,
            pig: self.pig,
            home: self.home,
            obstacles: self.obstacles.clone(),
            stroke: self.stroke.clone().unwrap_or_default(),
            elapsed_secs: self.elapsed,
        }
    }
}
