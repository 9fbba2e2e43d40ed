use crate::error::{MotionRunError, Result};
use crate::pose::Pose;

/// Something that can be asked for the current pose once per tick.
pub trait PoseSource {
    fn next_pose(&mut self, now: f64) -> Option<Pose>;
}

/// Pre-recorded poses, one JSON object per line.
#[derive(Debug, Clone, Default)]
pub struct PoseRecording {
    frames: Vec<Pose>,
    cursor: usize,
    looping: bool,
}

impl PoseRecording {
    pub fn new(frames: Vec<Pose>) -> Self {
        Self {
            frames,
            cursor: 0,
            looping: false,
        }
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Parses a JSON-lines recording. Blank lines and `#` comments are skipped.
    pub fn load_jsonl(text: &str) -> Result<Self> {
        let mut frames = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let pose = serde_json::from_str::<Pose>(line).map_err(|err| {
                MotionRunError::Recording {
                    line: index + 1,
                    message: err.to_string(),
                }
            })?;
            frames.push(pose);
        }
        Ok(Self::new(frames))
    }

    pub fn to_jsonl(&self) -> Result<String> {
        let mut out = String::new();
        for pose in &self.frames {
            out.push_str(&serde_json::to_string(pose)?);
            out.push('\n');
        }
        Ok(out)
    }

    pub fn frames(&self) -> &[Pose] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        !self.looping && self.cursor >= self.frames.len()
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}

impl PoseSource for PoseRecording {
    fn next_pose(&mut self, _now: f64) -> Option<Pose> {
        if self.frames.is_empty() {
            return None;
        }
        if self.cursor >= self.frames.len() {
            if !self.looping {
                return None;
            }
            self.cursor = 0;
        }
        let pose = self.frames[self.cursor].clone();
        self.cursor += 1;
        Some(pose)
    }
}
