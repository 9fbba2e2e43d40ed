use crate::config::GameConfig;
use crate::error::Result;
use crate::game::{DodgeGame, ModeKind, Outcome, Phase, RewardGame, RunnerGame};
use crate::motion::{MotionClassifier, MotionEvent, MotionEvents};
use crate::pose::Pose;
use crate::scene::SceneFrame;
use fastrand::Rng;

pub enum ModeState {
    Reward(RewardGame),
    Dodge(DodgeGame),
    Runner(RunnerGame),
}

impl ModeState {
    fn build(config: &GameConfig, rng: Rng) -> Self {
        match config.mode {
            ModeKind::Reward => ModeState::Reward(RewardGame::new(config.reward, rng)),
            ModeKind::Dodge => ModeState::Dodge(DodgeGame::new(config.dodge, rng)),
            ModeKind::Runner => ModeState::Runner(RunnerGame::new(config.runner, rng)),
        }
    }

    fn on_motion(&mut self, event: MotionEvent, now: f64) {
        match self {
            ModeState::Reward(game) => game.on_motion(event, now),
            ModeState::Dodge(game) => game.on_motion(event, now),
            ModeState::Runner(game) => game.on_motion(event, now),
        }
    }

    fn tick(&mut self, now: f64) -> Option<Outcome> {
        match self {
            ModeState::Reward(game) => game.tick(now),
            ModeState::Dodge(game) => game.tick(now),
            ModeState::Runner(game) => game.tick(now),
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            ModeState::Reward(game) => game.phase(),
            ModeState::Dodge(game) => game.phase(),
            ModeState::Runner(game) => game.phase(),
        }
    }

    pub fn score(&self) -> u32 {
        match self {
            ModeState::Reward(game) => game.rewards(),
            ModeState::Dodge(game) => game.score(),
            ModeState::Runner(game) => game.score(),
        }
    }

    pub fn scene(&self) -> SceneFrame {
        match self {
            ModeState::Reward(game) => game.scene(),
            ModeState::Dodge(game) => game.scene(),
            ModeState::Runner(game) => game.scene(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    pub events: MotionEvents,
    pub outcome: Option<Outcome>,
}

/// Single owner of the classifier and game state; the host calls [`Session::tick`]
/// once per frame with whatever pose it sampled.
pub struct Session {
    config: GameConfig,
    classifier: MotionClassifier,
    mode: ModeState,
    running: bool,
    ticks: u64,
    restarts: u64,
}

impl Session {
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        let mode = ModeState::build(&config, Self::rng_for(&config, 0));
        tracing::info!(mode = ?config.mode, win_length = config.runner.win_length, "session started");
        Ok(Self {
            classifier: MotionClassifier::new(config.policy),
            mode,
            running: true,
            ticks: 0,
            restarts: 0,
            config,
        })
    }

    fn rng_for(config: &GameConfig, restarts: u64) -> Rng {
        match config.seed {
            Some(seed) => Rng::with_seed(seed.wrapping_add(restarts)),
            None => Rng::new(),
        }
    }

    pub fn mode(&self) -> &ModeState {
        &self.mode
    }

    pub fn phase(&self) -> Phase {
        self.mode.phase()
    }

    pub fn score(&self) -> u32 {
        self.mode.score()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advances one frame. Stopped or finished sessions ignore the call.
    pub fn tick(&mut self, pose: Option<&Pose>, now: f64) -> TickReport {
        let mut report = TickReport::default();
        if !self.running || self.mode.phase() != Phase::Playing {
            return report;
        }

        if let Some(pose) = pose {
            report.events = self.classifier.classify(pose, now);
        }
        for event in report.events.iter() {
            self.mode.on_motion(event, now);
        }

        self.ticks += 1;
        report.outcome = self.mode.tick(now);
        if let Some(outcome) = report.outcome {
            tracing::info!(?outcome, score = self.score(), ticks = self.ticks, "session finished");
            self.running = false;
        }
        report
    }

    pub fn stop(&mut self) {
        if self.running {
            tracing::info!(ticks = self.ticks, "session stopped");
        }
        self.running = false;
    }

    /// Discards all game and motion state and starts over with the same config.
    pub fn restart(&mut self) {
        self.restarts += 1;
        self.classifier = MotionClassifier::new(self.config.policy);
        self.mode = ModeState::build(&self.config, Self::rng_for(&self.config, self.restarts));
        self.running = true;
        self.ticks = 0;
        tracing::info!(restarts = self.restarts, "session restarted");
    }

    pub fn scene(&self) -> SceneFrame {
        self.mode.scene()
    }
}
