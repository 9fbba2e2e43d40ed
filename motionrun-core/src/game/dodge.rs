use crate::game::{GameObject, HeightTier, IdAllocator, ObjectKind, Outcome, Phase};
use crate::motion::MotionEvent;
use crate::scene::{
    DODGE_OBSTACLE_COLOR, DODGE_PLAYER_COLOR, SceneCamera, SceneFrame, SceneItem, Shape,
};
use fastrand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DodgeConfig {
    pub spawn_interval_secs: f64,
    pub obstacle_speed: f32,
    pub camera_z: f32,
    pub spawn_depth: f32,
    pub spawn_spread: f32,
    pub collision_distance: f32,
    pub low_below: f32,
    pub high_above: f32,
    pub player_size: f32,
    pub obstacle_diameter: f32,
}

impl Default for DodgeConfig {
    fn default() -> Self {
        Self {
            spawn_interval_secs: 2.0,
            obstacle_speed: 0.05,
            camera_z: 5.0,
            spawn_depth: 10.0,
            spawn_spread: 4.0,
            collision_distance: 0.5,
            low_below: -0.5,
            high_above: 0.5,
            player_size: 0.5,
            obstacle_diameter: 0.6,
        }
    }
}

impl DodgeConfig {
    pub fn tier_for_height(&self, y: f32) -> HeightTier {
        if y < self.low_below {
            HeightTier::Low
        } else if y > self.high_above {
            HeightTier::High
        } else {
            HeightTier::Mid
        }
    }
}

/// Obstacles fly at a stationary player and must be dodged with matching motions.
pub struct DodgeGame {
    config: DodgeConfig,
    player: [f32; 3],
    obstacles: Vec<GameObject>,
    next_spawn_at: Option<f64>,
    phase: Phase,
    dodged: u32,
    ids: IdAllocator,
    rng: Rng,
}

impl DodgeGame {
    pub fn new(config: DodgeConfig, rng: Rng) -> Self {
        Self {
            config,
            player: [0.0; 3],
            obstacles: Vec::new(),
            next_spawn_at: None,
            phase: Phase::Playing,
            dodged: 0,
            ids: IdAllocator::default(),
            rng,
        }
    }

    pub fn obstacles(&self) -> &[GameObject] {
        &self.obstacles
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.dodged
    }

    /// Places an obstacle at `position`, bypassing the spawn timer.
    pub fn insert_obstacle(&mut self, position: [f32; 3]) -> GameObject {
        let obstacle = GameObject {
            id: self.ids.allocate(),
            kind: ObjectKind::Obstacle(self.config.tier_for_height(position[1])),
            position,
        };
        self.obstacles.push(obstacle);
        obstacle
    }

    fn spawn_obstacle(&mut self) {
        let spread = self.config.spawn_spread;
        let x = (self.rng.f32() - 0.5) * spread;
        let y = (self.rng.f32() - 0.5) * spread;
        let z = self.config.camera_z - self.config.spawn_depth;
        let obstacle = self.insert_obstacle([x, y, z]);
        tracing::debug!(id = obstacle.id, x, y, z, "spawned obstacle");
    }

    pub fn on_motion(&mut self, event: MotionEvent, _now: f64) {
        if self.phase != Phase::Playing {
            return;
        }
        let Some(nearest) = self.obstacles.first() else {
            return;
        };
        let ObjectKind::Obstacle(tier) = nearest.kind else {
            return;
        };

        let avoided = match event {
            MotionEvent::Jump => tier == HeightTier::Low,
            MotionEvent::Squat => tier == HeightTier::High,
            MotionEvent::Lunge => true,
        };
        if avoided {
            let removed = self.obstacles.remove(0);
            self.dodged = self.dodged.saturating_add(1);
            tracing::info!(id = removed.id, "avoided obstacle by {}", event.label());
        }
    }

    pub fn tick(&mut self, now: f64) -> Option<Outcome> {
        if self.phase != Phase::Playing {
            return None;
        }

        let interval = self.config.spawn_interval_secs.max(f64::EPSILON);
        let next_spawn_at = self.next_spawn_at.get_or_insert(now + interval);
        let mut due = 0;
        while now >= *next_spawn_at {
            *next_spawn_at += interval;
            due += 1;
        }
        for _ in 0..due {
            self.spawn_obstacle();
        }

        let speed = self.config.obstacle_speed;
        let camera_z = self.config.camera_z;
        for obstacle in &mut self.obstacles {
            obstacle.position[2] += speed;
        }
        self.obstacles
            .retain(|obstacle| obstacle.position[2] < camera_z);

        let player = self.player;
        let limit = self.config.collision_distance;
        if let Some(hit) = self
            .obstacles
            .iter()
            .find(|obstacle| obstacle.distance_to(player) < limit)
        {
            tracing::info!(id = hit.id, "Game Over!");
            self.phase = Phase::GameOver;
            return Some(Outcome::GameOver);
        }
        None
    }

    pub fn scene(&self) -> SceneFrame {
        let camera = SceneCamera::new([0.0, 0.0, self.config.camera_z], [0.0, 0.0, 0.0]);
        let mut frame = SceneFrame::new(camera);
        frame.items.push(SceneItem::new(
            Shape::Cube,
            self.player,
            [self.config.player_size; 3],
            DODGE_PLAYER_COLOR,
        ));
        frame.items.extend(self.obstacles.iter().map(|obstacle| {
            SceneItem::for_object(
                obstacle,
                Shape::Sphere,
                self.config.obstacle_diameter,
                DODGE_OBSTACLE_COLOR,
            )
        }));
        frame.hud.score = Some(self.dodged);
        if self.phase == Phase::GameOver {
            frame.hud.banner = Some("Game Over!".to_string());
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: f64 = 1.0 / 60.0;

    fn game() -> DodgeGame {
        DodgeGame::new(DodgeConfig::default(), Rng::with_seed(42))
    }

    #[test]
    fn spawns_on_fixed_interval() {
        let mut game = game();

        game.tick(0.0);
        assert!(game.obstacles().is_empty());
        game.tick(1.99);
        assert!(game.obstacles().is_empty());
        game.tick(2.0);
        assert_eq!(game.obstacles().len(), 1);
        game.tick(3.0);
        assert_eq!(game.obstacles().len(), 1);
        game.tick(4.0);
        assert_eq!(game.obstacles().len(), 2);
    }

    #[test]
    fn spawned_obstacles_stay_within_spread() {
        let mut game = DodgeGame::new(
            DodgeConfig {
                spawn_interval_secs: 0.5,
                collision_distance: 0.0,
                ..DodgeConfig::default()
            },
            Rng::with_seed(9),
        );

        game.tick(0.0);
        game.tick(10.0);

        assert_eq!(game.obstacles().len(), 20);
        for obstacle in game.obstacles() {
            assert!((-2.0..2.0).contains(&obstacle.position[0]));
            assert!((-2.0..2.0).contains(&obstacle.position[1]));
            assert!((obstacle.position[2] - (-4.95)).abs() < 1e-5);
        }
    }

    #[test]
    fn obstacles_advance_and_leave_behind_camera() {
        let mut game = game();
        game.insert_obstacle([3.0, 3.0, 4.97]);
        game.insert_obstacle([3.0, 3.0, 0.0]);

        game.tick(0.0);
        game.tick(STEP);

        assert_eq!(game.obstacles().len(), 1);
        assert!((game.obstacles()[0].position[2] - 0.1).abs() < 1e-6);
    }

    #[test]
    fn matching_motion_avoids_nearest_obstacle() {
        let mut game = game();
        let low = game.insert_obstacle([0.0, -1.0, -3.0]);
        let high = game.insert_obstacle([0.0, 1.0, -4.0]);

        game.on_motion(MotionEvent::Squat, 0.0);
        assert_eq!(game.obstacles().len(), 2);

        game.on_motion(MotionEvent::Jump, 0.0);
        assert_eq!(game.obstacles()[0].id, high.id);
        assert_ne!(game.obstacles()[0].id, low.id);

        game.on_motion(MotionEvent::Squat, 0.0);
        assert!(game.obstacles().is_empty());
        assert_eq!(game.score(), 2);
    }

    #[test]
    fn lunge_avoids_any_tier() {
        let mut game = game();
        game.insert_obstacle([0.0, 0.0, -3.0]);

        game.on_motion(MotionEvent::Jump, 0.0);
        game.on_motion(MotionEvent::Squat, 0.0);
        assert_eq!(game.obstacles().len(), 1);

        game.on_motion(MotionEvent::Lunge, 0.0);
        assert!(game.obstacles().is_empty());
    }

    #[test]
    fn collision_ends_game_once() {
        let mut game = game();
        game.insert_obstacle([0.0, 0.0, -0.5]);

        let mut outcomes = Vec::new();
        for tick in 0..200 {
            if let Some(outcome) = game.tick(tick as f64 * STEP) {
                outcomes.push(outcome);
            }
        }

        assert_eq!(outcomes, vec![Outcome::GameOver]);
        assert_eq!(game.phase(), Phase::GameOver);
        let frozen: Vec<_> = game.obstacles().to_vec();
        game.tick(100.0);
        game.on_motion(MotionEvent::Lunge, 100.0);
        assert_eq!(game.obstacles(), frozen.as_slice());
        assert_eq!(game.scene().hud.banner.as_deref(), Some("Game Over!"));
    }
}
