use crate::game::{Outcome, Phase};
use crate::motion::MotionEvent;
use crate::scene::{Rgb, SceneCamera, SceneFrame, SceneItem, Shape};
use fastrand::Rng;
use serde::{Deserialize, Serialize};

pub const REWARD_START_COLOR: Rgb = 0x00ff00;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    pub rotation_step: f32,
    pub camera_z: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            rotation_step: 0.01,
            camera_z: 5.0,
        }
    }
}

/// A spinning cube that changes color whenever a motion is detected.
pub struct RewardGame {
    config: RewardConfig,
    color: Rgb,
    rotation: [f32; 2],
    rewards: u32,
    last_message: Option<&'static str>,
    rng: Rng,
}

impl RewardGame {
    pub fn new(config: RewardConfig, rng: Rng) -> Self {
        Self {
            config,
            color: REWARD_START_COLOR,
            rotation: [0.0, 0.0],
            rewards: 0,
            last_message: None,
            rng,
        }
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn rotation(&self) -> [f32; 2] {
        self.rotation
    }

    pub fn rewards(&self) -> u32 {
        self.rewards
    }

    pub fn phase(&self) -> Phase {
        Phase::Playing
    }

    pub fn on_motion(&mut self, event: MotionEvent, _now: f64) {
        tracing::info!("{}", event.message());
        self.color = self.rng.u32(0..=0xffffff);
        self.rewards = self.rewards.saturating_add(1);
        self.last_message = Some(event.message());
    }

    pub fn tick(&mut self, _now: f64) -> Option<Outcome> {
        self.rotation[0] += self.config.rotation_step;
        self.rotation[1] += self.config.rotation_step;
        None
    }

    pub fn scene(&self) -> SceneFrame {
        let camera = SceneCamera::new([0.0, 0.0, self.config.camera_z], [0.0, 0.0, 0.0]);
        let mut frame = SceneFrame::new(camera);
        frame.items.push(
            SceneItem::new(Shape::Cube, [0.0; 3], [1.0; 3], self.color).with_rotation([
                self.rotation[0],
                self.rotation[1],
                0.0,
            ]),
        );
        frame.hud.score = Some(self.rewards);
        frame.hud.message = self.last_message.map(str::to_string);
        frame
    }
}
