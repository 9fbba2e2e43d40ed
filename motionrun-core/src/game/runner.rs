use crate::game::{GameObject, HeightTier, IdAllocator, ObjectKind, Outcome, Phase};
use crate::motion::MotionEvent;
use crate::scene::{
    COIN_COLOR, GROUND_COLOR, PLAYER_COLOR, RUNNER_OBSTACLE_COLOR, SceneCamera, SceneFrame,
    SceneItem, Shape,
};
use fastrand::Rng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_WIN_LENGTH: f32 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub move_speed: f32,
    pub coin_count: usize,
    pub obstacle_count: usize,
    pub spawn_distance: f32,
    pub spawn_offset: f32,
    pub spawn_jitter: f32,
    pub remove_distance: f32,
    pub scene_length: f32,
    pub win_length: f32,
    pub player_height: f32,
    pub jump_height: f32,
    pub duck_scale: f32,
    pub pose_hold_secs: f64,
    pub pickup_distance: f32,
    pub collision_distance: f32,
    pub tier_split: f32,
    pub camera_height: f32,
    pub camera_distance: f32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            move_speed: 0.1,
            coin_count: 10,
            obstacle_count: 5,
            spawn_distance: 100.0,
            spawn_offset: 30.0,
            spawn_jitter: 2.0,
            remove_distance: 5.0,
            scene_length: 110.0,
            win_length: DEFAULT_WIN_LENGTH,
            player_height: 0.5,
            jump_height: 1.5,
            duck_scale: 0.5,
            pose_hold_secs: 2.0,
            pickup_distance: 1.0,
            collision_distance: 1.0,
            tier_split: 1.0,
            camera_height: 5.0,
            camera_distance: 10.0,
        }
    }
}

impl RunnerConfig {
    pub fn tier_for_height(&self, y: f32) -> HeightTier {
        if y > self.tier_split {
            HeightTier::High
        } else if y < self.tier_split {
            HeightTier::Low
        } else {
            HeightTier::Mid
        }
    }
}

/// Win-distance input: leading digits are read, anything unusable falls back
/// to [`DEFAULT_WIN_LENGTH`].
pub fn parse_win_length(input: &str) -> f32 {
    let trimmed = input.trim();
    let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
    match digits.parse::<u32>() {
        Ok(value) if value > 0 => value as f32,
        _ => DEFAULT_WIN_LENGTH,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunnerPlayer {
    pub position: [f32; 3],
    pub scale_y: f32,
    jump_until: Option<f64>,
    duck_until: Option<f64>,
}

impl RunnerPlayer {
    fn new(height: f32) -> Self {
        Self {
            position: [0.0, height, 0.0],
            scale_y: 1.0,
            jump_until: None,
            duck_until: None,
        }
    }

    pub fn is_jumping(&self) -> bool {
        self.jump_until.is_some()
    }

    pub fn is_ducking(&self) -> bool {
        self.duck_until.is_some()
    }

    /// Whether touching an obstacle of `tier` ends the run.
    pub fn is_hit_by(&self, tier: HeightTier) -> bool {
        match tier {
            HeightTier::High => self.is_jumping() || !self.is_ducking(),
            HeightTier::Low => self.is_ducking() || !self.is_jumping(),
            HeightTier::Mid => false,
        }
    }
}

/// Endless runner: the player moves forward along -z collecting coins and
/// jumping or ducking past obstacles.
pub struct RunnerGame {
    config: RunnerConfig,
    player: RunnerPlayer,
    coins: Vec<GameObject>,
    obstacles: Vec<GameObject>,
    ticks: u64,
    score: u32,
    phase: Phase,
    next_batch_at: f32,
    ids: IdAllocator,
    rng: Rng,
}

impl RunnerGame {
    pub fn new(config: RunnerConfig, rng: Rng) -> Self {
        let mut game = Self {
            player: RunnerPlayer::new(config.player_height),
            coins: Vec::new(),
            obstacles: Vec::new(),
            ticks: 0,
            score: 0,
            phase: Phase::Playing,
            next_batch_at: config.scene_length,
            ids: IdAllocator::default(),
            rng,
            config,
        };
        game.spawn_batch();
        game
    }

    pub fn player(&self) -> &RunnerPlayer {
        &self.player
    }

    pub fn coins(&self) -> &[GameObject] {
        &self.coins
    }

    pub fn obstacles(&self) -> &[GameObject] {
        &self.obstacles
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn distance_travelled(&self) -> f32 {
        self.player.position[2].abs()
    }

    pub fn insert_coin(&mut self, position: [f32; 3]) -> GameObject {
        let coin = GameObject {
            id: self.ids.allocate(),
            kind: ObjectKind::Coin,
            position,
        };
        self.coins.push(coin);
        coin
    }

    pub fn insert_obstacle(&mut self, position: [f32; 3]) -> GameObject {
        let obstacle = GameObject {
            id: self.ids.allocate(),
            kind: ObjectKind::Obstacle(self.config.tier_for_height(position[1])),
            position,
        };
        self.obstacles.push(obstacle);
        obstacle
    }

    /// Spawns one batch of coins and obstacles ahead of the player, evenly
    /// spaced over `spawn_distance` with a small random push further away.
    pub fn spawn_batch(&mut self) {
        let start_z = self.player.position[2] - self.config.spawn_offset;
        let jitter = self.config.spawn_jitter;

        if self.config.coin_count > 0 {
            let spacing = self.config.spawn_distance / self.config.coin_count as f32;
            let mut z = start_z;
            for _ in 0..self.config.coin_count {
                z -= spacing;
                let offset = self.rng.f32() * jitter;
                self.insert_coin([0.0, self.config.player_height, z - offset]);
            }
        }

        if self.config.obstacle_count > 0 {
            let spacing = self.config.spawn_distance / self.config.obstacle_count as f32;
            let mut z = start_z;
            for _ in 0..self.config.obstacle_count {
                z -= spacing;
                let height = self.config.player_height + self.rng.f32();
                let offset = self.rng.f32() * jitter;
                self.insert_obstacle([0.0, height, z - offset]);
            }
        }

        tracing::debug!(
            from_z = start_z,
            coins = self.coins.len(),
            obstacles = self.obstacles.len(),
            "spawned batch"
        );
    }

    pub fn on_motion(&mut self, event: MotionEvent, now: f64) {
        if self.phase != Phase::Playing {
            return;
        }
        let hold_until = now + self.config.pose_hold_secs;
        match event {
            MotionEvent::Jump if !self.player.is_jumping() => {
                self.player.jump_until = Some(hold_until);
                self.player.position[1] += self.config.jump_height;
                tracing::info!("Avoiding obstacles by jumping!");
            }
            MotionEvent::Squat if !self.player.is_ducking() => {
                self.player.duck_until = Some(hold_until);
                self.player.scale_y = self.config.duck_scale;
                tracing::info!("Avoiding obstacles by squatting!");
            }
            _ => {}
        }
    }

    pub fn tick(&mut self, now: f64) -> Option<Outcome> {
        if self.phase != Phase::Playing {
            return None;
        }

        self.release_expired_poses(now);

        self.ticks += 1;
        self.player.position[2] = -(self.ticks as f32) * self.config.move_speed;

        self.collect_coins();
        if self.hit_obstacle() {
            self.phase = Phase::GameOver;
            tracing::info!(score = self.score, "Game Over! You hit an obstacle.");
            return Some(Outcome::GameOver);
        }
        self.remove_passed_objects();

        let travelled = self.distance_travelled();
        if travelled >= self.next_batch_at {
            self.next_batch_at += self.config.scene_length;
            self.spawn_batch();
        }

        if travelled >= self.config.win_length {
            self.phase = Phase::Won;
            tracing::info!(score = self.score, "Hurray! You won the game!");
            return Some(Outcome::Won);
        }
        None
    }

    fn release_expired_poses(&mut self, now: f64) {
        if self.player.jump_until.is_some_and(|until| now >= until) {
            self.player.jump_until = None;
            self.player.position[1] = self.config.player_height;
        }
        if self.player.duck_until.is_some_and(|until| now >= until) {
            self.player.duck_until = None;
            self.player.scale_y = 1.0;
        }
    }

    fn collect_coins(&mut self) {
        let player = self.player.position;
        let reach = self.config.pickup_distance;
        let before = self.coins.len();
        self.coins.retain(|coin| coin.distance_to(player) >= reach);
        let collected = (before - self.coins.len()) as u32;
        if collected > 0 {
            self.score = self.score.saturating_add(collected);
            tracing::debug!(score = self.score, "coin collected");
        }
    }

    fn hit_obstacle(&self) -> bool {
        let player = self.player.position;
        let reach = self.config.collision_distance;
        self.obstacles.iter().any(|obstacle| {
            let ObjectKind::Obstacle(tier) = obstacle.kind else {
                return false;
            };
            obstacle.distance_to(player) < reach && self.player.is_hit_by(tier)
        })
    }

    fn remove_passed_objects(&mut self) {
        let cutoff = self.player.position[2] + self.config.remove_distance;
        self.coins.retain(|coin| coin.position[2] <= cutoff);
        self.obstacles
            .retain(|obstacle| obstacle.position[2] <= cutoff);
    }

    pub fn scene(&self) -> SceneFrame {
        let player = self.player.position;
        let camera = SceneCamera::new(
            [0.0, self.config.camera_height, player[2] + self.config.camera_distance],
            player,
        );
        let mut frame = SceneFrame::new(camera);

        frame.items.push(SceneItem::new(
            Shape::Plane,
            [0.0, 0.0, player[2]],
            [5.0, 0.0, 1000.0],
            GROUND_COLOR,
        ));
        frame.items.push(SceneItem::new(
            Shape::Cube,
            player,
            [1.0, self.player.scale_y, 1.0],
            PLAYER_COLOR,
        ));
        frame.items.extend(
            self.coins
                .iter()
                .map(|coin| SceneItem::for_object(coin, Shape::Sphere, 1.0, COIN_COLOR)),
        );
        frame.items.extend(self.obstacles.iter().map(|obstacle| {
            SceneItem::for_object(obstacle, Shape::Cube, 1.0, RUNNER_OBSTACLE_COLOR)
        }));

        frame.hud.score = Some(self.score);
        frame.hud.banner = match self.phase {
            Phase::Playing => None,
            Phase::GameOver => Some("Game Over! You hit an obstacle.".to_string()),
            Phase::Won => Some("Hurray! You won the game!".to_string()),
        };
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_track() -> RunnerConfig {
        RunnerConfig {
            coin_count: 0,
            obstacle_count: 0,
            ..RunnerConfig::default()
        }
    }

    fn strictly_decreasing(objects: &[GameObject]) -> bool {
        objects
            .windows(2)
            .all(|pair| pair[1].position[2] < pair[0].position[2])
    }

    #[test]
    fn initial_batch_is_evenly_spaced_ahead() {
        let game = RunnerGame::new(RunnerConfig::default(), Rng::with_seed(11));

        assert_eq!(game.coins().len(), 10);
        assert_eq!(game.obstacles().len(), 5);
        assert!(strictly_decreasing(game.coins()));
        assert!(strictly_decreasing(game.obstacles()));

        for (index, coin) in game.coins().iter().enumerate() {
            let slot = -30.0 - 10.0 * (index as f32 + 1.0);
            assert!(coin.position[2] <= slot && coin.position[2] > slot - 2.0);
        }
        for (index, obstacle) in game.obstacles().iter().enumerate() {
            let slot = -30.0 - 20.0 * (index as f32 + 1.0);
            assert!(obstacle.position[2] <= slot && obstacle.position[2] > slot - 2.0);
            assert!((0.5..1.5).contains(&obstacle.position[1]));
        }
    }

    #[test]
    fn player_advances_one_step_per_tick() {
        let mut game = RunnerGame::new(empty_track(), Rng::with_seed(1));
        assert_eq!(game.player().position[2], 0.0);

        for _ in 0..250 {
            game.tick(0.0);
        }

        assert!((game.player().position[2] - (-25.0)).abs() < 1e-4);
    }

    #[test]
    fn win_is_signalled_exactly_once() {
        let mut game = RunnerGame::new(empty_track(), Rng::with_seed(1));
        let mut wins = Vec::new();

        for tick in 1..=6000u32 {
            if let Some(outcome) = game.tick(tick as f64 / 60.0) {
                wins.push((tick, outcome));
            }
        }

        assert_eq!(wins, vec![(5000, Outcome::Won)]);
        assert_eq!(game.phase(), Phase::Won);
        assert!((game.player().position[2] - (-500.0)).abs() < 1e-3);
        assert_eq!(
            game.scene().hud.banner.as_deref(),
            Some("Hurray! You won the game!")
        );
    }

    #[test]
    fn new_batches_spawn_every_scene_length() {
        let mut game = RunnerGame::new(
            RunnerConfig {
                obstacle_count: 0,
                ..RunnerConfig::default()
            },
            Rng::with_seed(5),
        );

        let beyond_second_offset = |game: &RunnerGame| -> Vec<GameObject> {
            game.coins()
                .iter()
                .filter(|coin| coin.position[2] < -140.0)
                .copied()
                .collect()
        };

        for _ in 0..1099 {
            game.tick(0.0);
        }
        assert!(beyond_second_offset(&game).is_empty());

        game.tick(0.0);
        assert!((game.distance_travelled() - 110.0).abs() < 1e-3);
        let newest = beyond_second_offset(&game);
        assert_eq!(newest.len(), 10);
        assert!(strictly_decreasing(&newest));
        assert!(newest[0].position[2] <= -150.0);
    }

    #[test]
    fn coin_is_collected_once() {
        let mut game = RunnerGame::new(empty_track(), Rng::with_seed(2));
        let coin = game.insert_coin([0.0, 0.5, -0.5]);

        game.tick(0.0);
        assert_eq!(game.score(), 1);
        assert!(game.coins().iter().all(|c| c.id != coin.id));

        for _ in 0..20 {
            game.tick(0.0);
        }
        assert_eq!(game.score(), 1);
    }

    #[test]
    fn passed_objects_are_removed() {
        let mut game = RunnerGame::new(empty_track(), Rng::with_seed(2));
        game.insert_coin([3.0, 0.5, 4.0]);
        game.insert_obstacle([3.0, 0.5, 6.0]);

        game.tick(0.0);

        assert_eq!(game.coins().len(), 1);
        assert!(game.obstacles().is_empty());

        for _ in 0..20 {
            game.tick(0.0);
        }
        assert!(game.coins().is_empty());
    }

    #[test]
    fn low_obstacle_needs_a_jump() {
        let mut game = RunnerGame::new(empty_track(), Rng::with_seed(3));
        game.insert_obstacle([0.0, 0.8, -1.0]);

        game.on_motion(MotionEvent::Jump, 0.0);
        assert!(game.player().is_jumping());
        for tick in 1..=40 {
            assert_eq!(game.tick(tick as f64 / 60.0), None);
        }
        assert_eq!(game.phase(), Phase::Playing);
    }

    #[test]
    fn high_obstacle_needs_a_duck() {
        let mut ducking = RunnerGame::new(empty_track(), Rng::with_seed(3));
        ducking.insert_obstacle([0.0, 1.2, -1.0]);
        ducking.on_motion(MotionEvent::Squat, 0.0);
        assert_eq!(ducking.player().scale_y, 0.5);
        for tick in 1..=40 {
            assert_eq!(ducking.tick(tick as f64 / 60.0), None);
        }

        let mut standing = RunnerGame::new(empty_track(), Rng::with_seed(3));
        standing.insert_obstacle([0.0, 1.2, -1.0]);
        let outcome = (1..=40).find_map(|tick| standing.tick(tick as f64 / 60.0));
        assert_eq!(outcome, Some(Outcome::GameOver));
    }

    #[test]
    fn pickup_and_collision_reach_are_separate() {
        let config = RunnerConfig {
            pickup_distance: 0.1,
            ..empty_track()
        };
        let mut game = RunnerGame::new(config, Rng::with_seed(8));
        game.insert_coin([0.5, 0.5, -0.5]);
        game.insert_obstacle([0.0, 0.8, -2.0]);

        let outcome = (0..30).find_map(|_| game.tick(0.0));
        assert_eq!(outcome, Some(Outcome::GameOver));
        assert_eq!(game.score(), 0);

        let config = RunnerConfig {
            collision_distance: 0.1,
            ..empty_track()
        };
        let mut game = RunnerGame::new(config, Rng::with_seed(8));
        game.insert_coin([0.5, 0.5, -0.5]);
        game.insert_obstacle([0.5, 0.8, -2.0]);

        for _ in 0..30 {
            assert_eq!(game.tick(0.0), None);
        }
        assert_eq!(game.score(), 1);
    }

    #[test]
    fn collision_freezes_the_run() {
        let mut game = RunnerGame::new(empty_track(), Rng::with_seed(4));
        game.insert_obstacle([0.0, 0.8, -0.5]);
        game.insert_coin([0.0, 0.5, -50.0]);

        assert_eq!(game.tick(0.0), Some(Outcome::GameOver));
        let position = game.player().position;
        let score = game.score();

        for tick in 0..100 {
            assert_eq!(game.tick(tick as f64), None);
            game.on_motion(MotionEvent::Jump, tick as f64);
        }

        assert_eq!(game.player().position, position);
        assert_eq!(game.score(), score);
        assert!(!game.player().is_jumping());
        assert_eq!(game.phase(), Phase::GameOver);
    }

    #[test]
    fn poses_release_after_hold() {
        let mut game = RunnerGame::new(empty_track(), Rng::with_seed(4));

        game.on_motion(MotionEvent::Jump, 1.0);
        game.on_motion(MotionEvent::Squat, 1.0);
        game.on_motion(MotionEvent::Jump, 1.5);
        assert!((game.player().position[1] - 2.0).abs() < 1e-6);

        game.tick(2.9);
        assert!(game.player().is_jumping());
        game.tick(3.0);
        assert!(!game.player().is_jumping());
        assert!(!game.player().is_ducking());
        assert_eq!(game.player().position[1], 0.5);
        assert_eq!(game.player().scale_y, 1.0);
    }

    #[test]
    fn scene_items_track_live_objects_by_id() {
        let mut game = RunnerGame::new(empty_track(), Rng::with_seed(6));
        let coin = game.insert_coin([0.0, 0.5, -0.5]);
        let obstacle = game.insert_obstacle([3.0, 1.2, -30.0]);

        let frame = game.scene();
        let coin_item = frame.item(coin.id).unwrap();
        assert_eq!(coin_item.shape, Shape::Sphere);
        assert_eq!(coin_item.position, coin.position);
        assert_eq!(frame.item(obstacle.id).unwrap().color, RUNNER_OBSTACLE_COLOR);

        game.tick(0.0);

        let frame = game.scene();
        assert!(frame.item(coin.id).is_none());
        assert!(frame.item(obstacle.id).is_some());
    }

    #[test]
    fn tiers_split_at_player_reach() {
        let config = RunnerConfig::default();
        assert_eq!(config.tier_for_height(1.2), HeightTier::High);
        assert_eq!(config.tier_for_height(0.7), HeightTier::Low);
        assert_eq!(config.tier_for_height(1.0), HeightTier::Mid);
    }

    #[test]
    fn win_length_input_falls_back_to_default() {
        assert_eq!(parse_win_length("750"), 750.0);
        assert_eq!(parse_win_length(" 120m "), 120.0);
        assert_eq!(parse_win_length(""), DEFAULT_WIN_LENGTH);
        assert_eq!(parse_win_length("abc"), DEFAULT_WIN_LENGTH);
        assert_eq!(parse_win_length("0"), DEFAULT_WIN_LENGTH);
        assert_eq!(parse_win_length("-40"), DEFAULT_WIN_LENGTH);
    }
}
