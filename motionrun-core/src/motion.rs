use crate::cooldown::Cooldown;
use crate::error::{MotionRunError, Result};
use crate::pose::{BodyPart, Keypoint, Pose};
use crate::smoothing::MovingAverage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionEvent {
    Squat,
    Jump,
    Lunge,
}

impl MotionEvent {
    pub const ALL: [MotionEvent; 3] = [MotionEvent::Squat, MotionEvent::Jump, MotionEvent::Lunge];

    pub fn label(self) -> &'static str {
        match self {
            MotionEvent::Squat => "squat",
            MotionEvent::Jump => "jump",
            MotionEvent::Lunge => "lunge",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            MotionEvent::Squat => "Squat detected!",
            MotionEvent::Jump => "Jump detected!",
            MotionEvent::Lunge => "Lunge detected!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JumpRule {
    /// Averaged ankle y sits above averaged knee y by more than `margin` px.
    AnkleAboveKnee { margin: f32 },
    /// Averaged ankle y moved more than `min_delta` px since the last accepted sample.
    AnkleDelta { min_delta: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionPolicy {
    pub min_pose_score: f32,
    pub min_confidence: f32,
    pub smoothing_window: usize,
    pub squat_margin: f32,
    pub jump: JumpRule,
    pub lunge_separation: f32,
    pub cooldown_secs: f64,
}

impl Default for MotionPolicy {
    fn default() -> Self {
        Self {
            min_pose_score: 0.5,
            min_confidence: 0.5,
            smoothing_window: 3,
            squat_margin: 50.0,
            jump: JumpRule::AnkleDelta { min_delta: 30.0 },
            lunge_separation: 100.0,
            cooldown_secs: 2.0,
        }
    }
}

impl MotionPolicy {
    /// Raw coordinates, hip-below-knee squat and ankle-above-knee jump.
    pub fn reward() -> Self {
        Self {
            smoothing_window: 1,
            jump: JumpRule::AnkleAboveKnee { margin: 30.0 },
            ..Self::default()
        }
    }

    pub fn dodge() -> Self {
        Self::reward()
    }

    /// Smoothed hips/knees, any hip excess squats, ankle delta jumps.
    pub fn runner() -> Self {
        Self {
            min_pose_score: 0.0,
            min_confidence: 0.6,
            squat_margin: 0.0,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.smoothing_window == 0 {
            return Err(MotionRunError::config("smoothing_window must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) || !(0.0..=1.0).contains(&self.min_pose_score)
        {
            return Err(MotionRunError::config("confidence thresholds must lie in [0, 1]"));
        }
        if !self.cooldown_secs.is_finite() || self.cooldown_secs < 0.0 {
            return Err(MotionRunError::config("cooldown_secs must be a non-negative number"));
        }
        let jump_threshold = match self.jump {
            JumpRule::AnkleAboveKnee { margin } => margin,
            JumpRule::AnkleDelta { min_delta } => min_delta,
        };
        if !self.squat_margin.is_finite()
            || !self.lunge_separation.is_finite()
            || !jump_threshold.is_finite()
        {
            return Err(MotionRunError::config("motion thresholds must be finite"));
        }
        Ok(())
    }
}

/// Events fired during a single classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotionEvents {
    pub squat: bool,
    pub jump: bool,
    pub lunge: bool,
}

impl MotionEvents {
    pub fn contains(&self, event: MotionEvent) -> bool {
        match event {
            MotionEvent::Squat => self.squat,
            MotionEvent::Jump => self.jump,
            MotionEvent::Lunge => self.lunge,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.squat || self.jump || self.lunge)
    }

    pub fn iter(&self) -> impl Iterator<Item = MotionEvent> + '_ {
        MotionEvent::ALL
            .into_iter()
            .filter(|event| self.contains(*event))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionState {
    squat: Cooldown,
    jump: Cooldown,
    lunge: Cooldown,
}

impl MotionState {
    pub fn new(cooldown_secs: f64) -> Self {
        Self {
            squat: Cooldown::new(cooldown_secs),
            jump: Cooldown::new(cooldown_secs),
            lunge: Cooldown::new(cooldown_secs),
        }
    }

    pub fn is_active(&self, event: MotionEvent, now: f64) -> bool {
        self.cooldown(event).is_active(now)
    }

    pub fn squatting(&self, now: f64) -> bool {
        self.is_active(MotionEvent::Squat, now)
    }

    pub fn jumping(&self, now: f64) -> bool {
        self.is_active(MotionEvent::Jump, now)
    }

    pub fn lunging(&self, now: f64) -> bool {
        self.is_active(MotionEvent::Lunge, now)
    }

    fn cooldown(&self, event: MotionEvent) -> &Cooldown {
        match event {
            MotionEvent::Squat => &self.squat,
            MotionEvent::Jump => &self.jump,
            MotionEvent::Lunge => &self.lunge,
        }
    }

    fn trigger(&mut self, event: MotionEvent, now: f64) -> bool {
        let cooldown = match event {
            MotionEvent::Squat => &mut self.squat,
            MotionEvent::Jump => &mut self.jump,
            MotionEvent::Lunge => &mut self.lunge,
        };
        cooldown.try_trigger(now)
    }

    fn reset(&mut self) {
        self.squat.reset();
        self.jump.reset();
        self.lunge.reset();
    }
}

struct LowerBody<'a> {
    left_knee: &'a Keypoint,
    right_knee: &'a Keypoint,
    left_hip: &'a Keypoint,
    right_hip: &'a Keypoint,
    left_ankle: &'a Keypoint,
    right_ankle: &'a Keypoint,
}

impl<'a> LowerBody<'a> {
    fn from_pose(pose: &'a Pose, min_confidence: f32) -> Option<Self> {
        Some(Self {
            left_knee: pose.confident(BodyPart::LeftKnee, min_confidence)?,
            right_knee: pose.confident(BodyPart::RightKnee, min_confidence)?,
            left_hip: pose.confident(BodyPart::LeftHip, min_confidence)?,
            right_hip: pose.confident(BodyPart::RightHip, min_confidence)?,
            left_ankle: pose.confident(BodyPart::LeftAnkle, min_confidence)?,
            right_ankle: pose.confident(BodyPart::RightAnkle, min_confidence)?,
        })
    }

    fn knee_y(&self) -> f32 {
        (self.left_knee.position.y + self.right_knee.position.y) / 2.0
    }

    fn hip_y(&self) -> f32 {
        (self.left_hip.position.y + self.right_hip.position.y) / 2.0
    }

    fn ankle_y(&self) -> f32 {
        (self.left_ankle.position.y + self.right_ankle.position.y) / 2.0
    }

    fn knee_separation(&self) -> f32 {
        (self.left_knee.position.x - self.right_knee.position.x).abs()
    }
}

pub struct MotionClassifier {
    policy: MotionPolicy,
    state: MotionState,
    knee_y: MovingAverage,
    hip_y: MovingAverage,
    previous_ankle_y: Option<f32>,
}

impl MotionClassifier {
    pub fn new(policy: MotionPolicy) -> Self {
        Self {
            state: MotionState::new(policy.cooldown_secs),
            knee_y: MovingAverage::new(policy.smoothing_window),
            hip_y: MovingAverage::new(policy.smoothing_window),
            previous_ankle_y: None,
            policy,
        }
    }

    pub fn state(&self) -> &MotionState {
        &self.state
    }

    /// Classifies one sampled pose at time `now` (seconds). Poses not above the
    /// score gate or missing any confident knee/hip/ankle produce no events.
    pub fn classify(&mut self, pose: &Pose, now: f64) -> MotionEvents {
        let mut events = MotionEvents::default();

        if pose.score <= self.policy.min_pose_score {
            tracing::trace!(score = pose.score, "pose below score gate");
            return events;
        }
        let Some(lower) = LowerBody::from_pose(pose, self.policy.min_confidence) else {
            tracing::trace!("lower body keypoints missing or uncertain");
            return events;
        };

        let knee_y = self.knee_y.push(lower.knee_y());
        let hip_y = self.hip_y.push(lower.hip_y());
        let ankle_y = lower.ankle_y();

        if hip_y > knee_y + self.policy.squat_margin {
            events.squat = self.state.trigger(MotionEvent::Squat, now);
        }

        let jump_crossed = match self.policy.jump {
            JumpRule::AnkleAboveKnee { margin } => ankle_y < lower.knee_y() - margin,
            JumpRule::AnkleDelta { min_delta } => self
                .previous_ankle_y
                .is_some_and(|previous| (previous - ankle_y).abs() > min_delta),
        };
        self.previous_ankle_y = Some(ankle_y);
        if jump_crossed {
            events.jump = self.state.trigger(MotionEvent::Jump, now);
        }

        if lower.knee_separation() > self.policy.lunge_separation {
            events.lunge = self.state.trigger(MotionEvent::Lunge, now);
        }

        for event in events.iter() {
            tracing::debug!(event = event.label(), now, "motion detected");
        }
        events
    }

    pub fn reset(&mut self) {
        self.state.reset();
        self.knee_y.clear();
        self.hip_y.clear();
        self.previous_ankle_y = None;
    }
}
