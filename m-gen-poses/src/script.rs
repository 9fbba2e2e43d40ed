use crate::keyframes::Stance;
use motionrun_core::{Pose, PoseRecording};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Move {
    Stand,
    Squat,
    Jump,
    Lunge,
}

impl Move {
    pub fn stance(self) -> Stance {
        match self {
            Move::Stand => Stance::standing(),
            Move::Squat => Stance::squat(),
            Move::Jump => Stance::tuck_jump(),
            Move::Lunge => Stance::lunge(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScriptStep {
    pub movement: Move,
    pub hold_frames: usize,
    pub blend_frames: usize, // frames spent moving into this step's stance
}

impl ScriptStep {
    pub const fn new(movement: Move, blend_frames: usize, hold_frames: usize) -> Self {
        Self {
            movement,
            hold_frames,
            blend_frames,
        }
    }
}

/// Where the generated demo lives, relative to the workspace root.
pub const DEMO_RECORDING_PATH: &str = "assets/poses/demo.jsonl";

/// A short workout exercising every motion, at 60 frames per second.
pub fn demo_script() -> Vec<ScriptStep> {
    vec![
        ScriptStep::new(Move::Stand, 0, 60),
        ScriptStep::new(Move::Squat, 12, 30),
        ScriptStep::new(Move::Stand, 12, 120),
        ScriptStep::new(Move::Jump, 3, 10),
        ScriptStep::new(Move::Stand, 3, 120),
        ScriptStep::new(Move::Lunge, 15, 30),
        ScriptStep::new(Move::Stand, 15, 120),
    ]
}

pub fn render_script(steps: &[ScriptStep]) -> Vec<Pose> {
    let mut frames = Vec::new();
    let mut current = Stance::standing();

    for step in steps {
        let target = step.movement.stance();
        for frame in 1..=step.blend_frames {
            let t = frame as f32 / step.blend_frames as f32;
            frames.push(current.lerp(&target, t).to_pose());
        }
        for _ in 0..step.hold_frames {
            frames.push(target.to_pose());
        }
        current = target;
    }

    frames
}

pub fn demo_recording() -> PoseRecording {
    PoseRecording::new(render_script(&demo_script())).with_looping(true)
}
