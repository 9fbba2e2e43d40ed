pub mod dodge;
pub mod reward;
pub mod runner;

use serde::{Deserialize, Serialize};

pub use dodge::{DodgeConfig, DodgeGame};
pub use reward::{RewardConfig, RewardGame};
pub use runner::{RunnerConfig, RunnerGame};

pub type ObjectId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
    Reward,
    Dodge,
    #[default]
    Runner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    GameOver,
    Won,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    GameOver,
    Won,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeightTier {
    Low,
    Mid,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Coin,
    Obstacle(HeightTier),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub position: [f32; 3],
}

impl GameObject {
    pub fn distance_to(&self, point: [f32; 3]) -> f32 {
        distance(self.position, point)
    }
}

pub fn distance(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

#[derive(Debug, Clone, Default)]
pub(crate) struct IdAllocator {
    next: ObjectId,
}

impl IdAllocator {
    pub(crate) fn allocate(&mut self) -> ObjectId {
        let id = self.next;
        self.next += 1;
        id
    }
}
