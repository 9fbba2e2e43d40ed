use crate::error::{MotionRunError, Result};
use crate::game::{DodgeConfig, ModeKind, RewardConfig, RunnerConfig};
use crate::motion::MotionPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub mode: ModeKind,
    pub policy: MotionPolicy,
    pub reward: RewardConfig,
    pub dodge: DodgeConfig,
    pub runner: RunnerConfig,
    /// Fixed RNG seed for reproducible spawns and colors.
    pub seed: Option<u64>,
    /// JSON-lines pose recording to play instead of live input.
    pub replay: Option<String>,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. "info" or "motionrun_core=debug,warn".
    pub level: String,
    pub json: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mode: ModeKind::default(),
            policy: MotionPolicy::default(),
            reward: RewardConfig::default(),
            dodge: DodgeConfig::default(),
            runner: RunnerConfig::default(),
            seed: None,
            replay: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl GameConfig {
    pub fn for_mode(mode: ModeKind) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MotionRunError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_win_length(mut self, win_length: f32) -> Self {
        self.runner.win_length = win_length;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.policy.validate()?;

        let runner = &self.runner;
        if !(runner.win_length.is_finite() && runner.win_length > 0.0) {
            return Err(MotionRunError::config("runner.win_length must be positive"));
        }
        if !(runner.move_speed.is_finite() && runner.move_speed > 0.0) {
            return Err(MotionRunError::config("runner.move_speed must be positive"));
        }
        if !(runner.scene_length.is_finite() && runner.scene_length > 0.0) {
            return Err(MotionRunError::config("runner.scene_length must be positive"));
        }
        if runner.spawn_distance < 0.0 || runner.spawn_jitter < 0.0 {
            return Err(MotionRunError::config(
                "runner spawn distances must not be negative",
            ));
        }

        let dodge = &self.dodge;
        if !(dodge.spawn_interval_secs.is_finite() && dodge.spawn_interval_secs > 0.0) {
            return Err(MotionRunError::config(
                "dodge.spawn_interval_secs must be positive",
            ));
        }
        if dodge.low_below > dodge.high_above {
            return Err(MotionRunError::config(
                "dodge.low_below must not exceed dodge.high_above",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::JumpRule;

    #[test]
    fn empty_object_gives_defaults() {
        let config = GameConfig::from_json_str("{}").unwrap();

        assert_eq!(config, GameConfig::default());
        assert_eq!(config.mode, ModeKind::Runner);
        assert_eq!(config.runner.win_length, 500.0);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_sections_override_fields() {
        let config = GameConfig::from_json_str(
            r#"{
                "mode": "dodge",
                "seed": 7,
                "policy": {"squat_margin": 35.0, "jump": {"kind": "ankle_delta", "min_delta": 20.0}},
                "runner": {"win_length": 800.0}
            }"#,
        )
        .unwrap();

        assert_eq!(config.mode, ModeKind::Dodge);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.policy.squat_margin, 35.0);
        assert_eq!(config.policy.jump, JumpRule::AnkleDelta { min_delta: 20.0 });
        assert_eq!(config.policy.smoothing_window, 3);
        assert_eq!(config.runner.win_length, 800.0);
        assert_eq!(config.runner.coin_count, 10);
    }

    #[test]
    fn rejects_invalid_values() {
        let result = GameConfig::from_json_str(r#"{"runner": {"win_length": -1.0}}"#);
        assert!(matches!(result, Err(MotionRunError::Config { .. })));

        let result = GameConfig::from_json_str(r#"{"dodge": {"spawn_interval_secs": 0.0}}"#);
        assert!(matches!(result, Err(MotionRunError::Config { .. })));

        let result = GameConfig::from_json_str(r#"{"mode": "tennis"}"#);
        assert!(matches!(result, Err(MotionRunError::Json(_))));
    }

    #[test]
    fn serialized_config_loads_back() {
        let config = GameConfig::for_mode(ModeKind::Reward).with_win_length(250.0);
        let text = config.to_json_string().unwrap();

        assert_eq!(GameConfig::from_json_str(&text).unwrap(), config);
    }

    #[test]
    fn load_reports_missing_file() {
        let result = GameConfig::load("definitely/not/here/motionrun.json");

        assert!(matches!(result, Err(MotionRunError::ConfigNotFound { .. })));
    }
}
