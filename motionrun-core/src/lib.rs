pub mod config;
pub mod cooldown;
pub mod error;
pub mod game;
pub mod motion;
pub mod pose;
pub mod recording;
pub mod scene;
pub mod session;
pub mod smoothing;

pub use config::{GameConfig, LoggingConfig};
pub use cooldown::Cooldown;
pub use error::{MotionRunError, Result};
pub use game::runner::{DEFAULT_WIN_LENGTH, parse_win_length};
pub use game::{
    DodgeConfig, DodgeGame, GameObject, HeightTier, ModeKind, ObjectId, ObjectKind, Outcome,
    Phase, RewardConfig, RewardGame, RunnerConfig, RunnerGame,
};
pub use motion::{JumpRule, MotionClassifier, MotionEvent, MotionEvents, MotionPolicy, MotionState};
pub use pose::{BODY_PARTS, BodyPart, FLAT_POSE_LEN, KEYPOINT_COUNT, Keypoint, Pose, Position};
pub use recording::{PoseRecording, PoseSource};
pub use scene::{Hud, Rgb, SceneCamera, SceneFrame, SceneItem, Shape, rgb_components};
pub use session::{ModeState, Session, TickReport};
pub use smoothing::MovingAverage;
