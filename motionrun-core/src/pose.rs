use crate::error::{MotionRunError, Result};
use serde::{Deserialize, Serialize};

pub const KEYPOINT_COUNT: usize = 17;

/// Length of a flat pose buffer: `[x, y, score]` per keypoint, optionally
/// followed by the overall pose score.
pub const FLAT_POSE_LEN: usize = KEYPOINT_COUNT * 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BodyPart {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

/// PoseNet keypoint order.
pub const BODY_PARTS: [BodyPart; KEYPOINT_COUNT] = [
    BodyPart::Nose,
    BodyPart::LeftEye,
    BodyPart::RightEye,
    BodyPart::LeftEar,
    BodyPart::RightEar,
    BodyPart::LeftShoulder,
    BodyPart::RightShoulder,
    BodyPart::LeftElbow,
    BodyPart::RightElbow,
    BodyPart::LeftWrist,
    BodyPart::RightWrist,
    BodyPart::LeftHip,
    BodyPart::RightHip,
    BodyPart::LeftKnee,
    BodyPart::RightKnee,
    BodyPart::LeftAnkle,
    BodyPart::RightAnkle,
];

impl BodyPart {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        BODY_PARTS.get(index).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub part: BodyPart,
    pub score: f32,
    pub position: Position, // pixel coordinates, y grows downwards
}

impl Keypoint {
    pub fn new(part: BodyPart, x: f32, y: f32, score: f32) -> Self {
        Self {
            part,
            score,
            position: Position::new(x, y),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub score: f32,
    pub keypoints: Vec<Keypoint>,
}

impl Pose {
    pub fn new(score: f32, keypoints: Vec<Keypoint>) -> Self {
        Self { score, keypoints }
    }

    pub fn keypoint(&self, part: BodyPart) -> Option<&Keypoint> {
        self.keypoints.iter().find(|keypoint| keypoint.part == part)
    }

    /// Keypoint for `part` if present with a score strictly above `min_score`.
    pub fn confident(&self, part: BodyPart, min_score: f32) -> Option<&Keypoint> {
        self.keypoint(part)
            .filter(|keypoint| keypoint.score > min_score)
    }

    /// Builds a pose from `[x, y, score]` triples in PoseNet order. A trailing
    /// value is taken as the pose score; without it the mean keypoint score is used.
    pub fn from_flat(data: &[f32]) -> Result<Self> {
        if data.len() != FLAT_POSE_LEN && data.len() != FLAT_POSE_LEN + 1 {
            return Err(MotionRunError::pose(format!(
                "expected {} or {} values, got {}",
                FLAT_POSE_LEN,
                FLAT_POSE_LEN + 1,
                data.len()
            )));
        }
        if let Some(bad) = data.iter().position(|value| !value.is_finite()) {
            return Err(MotionRunError::pose(format!("non-finite value at {}", bad)));
        }

        let keypoints: Vec<Keypoint> = BODY_PARTS
            .iter()
            .zip(data.chunks_exact(3))
            .map(|(&part, triple)| Keypoint::new(part, triple[0], triple[1], triple[2]))
            .collect();

        let score = match data.get(FLAT_POSE_LEN) {
            Some(&score) => score,
            None => keypoints.iter().map(|k| k.score).sum::<f32>() / KEYPOINT_COUNT as f32,
        };

        Ok(Self { score, keypoints })
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_standing() -> Vec<f32> {
        let mut data = Vec::with_capacity(FLAT_POSE_LEN);
        for index in 0..KEYPOINT_COUNT {
            data.extend_from_slice(&[index as f32, 10.0 * index as f32, 0.9]);
        }
        data
    }

    #[test]
    fn parses_posenet_json() {
        let json = r#"{
            "score": 0.82,
            "keypoints": [
                {"part": "leftKnee", "score": 0.91, "position": {"x": 300.5, "y": 330.0}},
                {"part": "rightAnkle", "score": 0.4, "position": {"x": 340.0, "y": 420.0}}
            ]
        }"#;

        let pose = Pose::from_json_str(json).unwrap();

        assert_eq!(pose.keypoints.len(), 2);
        let knee = pose.keypoint(BodyPart::LeftKnee).unwrap();
        assert_eq!(knee.position, Position::new(300.5, 330.0));
        assert!(pose.keypoint(BodyPart::Nose).is_none());
    }

    #[test]
    fn confident_filters_low_scores() {
        let pose = Pose::new(
            0.9,
            vec![
                Keypoint::new(BodyPart::LeftHip, 0.0, 0.0, 0.5),
                Keypoint::new(BodyPart::RightHip, 0.0, 0.0, 0.51),
            ],
        );

        assert!(pose.confident(BodyPart::LeftHip, 0.5).is_none());
        assert!(pose.confident(BodyPart::RightHip, 0.5).is_some());
        assert!(pose.confident(BodyPart::LeftKnee, 0.0).is_none());
    }

    #[test]
    fn from_flat_maps_posenet_order() {
        let pose = Pose::from_flat(&flat_standing()).unwrap();

        assert_eq!(pose.keypoints.len(), KEYPOINT_COUNT);
        let ankle = pose.keypoint(BodyPart::RightAnkle).unwrap();
        assert_eq!(ankle.position, Position::new(16.0, 160.0));
        assert!((pose.score - 0.9).abs() < 1e-6);
    }

    #[test]
    fn from_flat_uses_trailing_pose_score() {
        let mut data = flat_standing();
        data.push(0.3);

        let pose = Pose::from_flat(&data).unwrap();

        assert_eq!(pose.score, 0.3);
    }

    #[test]
    fn from_flat_rejects_bad_input() {
        assert!(matches!(
            Pose::from_flat(&[1.0, 2.0]),
            Err(MotionRunError::Pose { .. })
        ));

        let mut data = flat_standing();
        data[4] = f32::NAN;
        assert!(Pose::from_flat(&data).is_err());
    }

    #[test]
    fn body_part_index_round_trips() {
        for (index, part) in BODY_PARTS.iter().enumerate() {
            assert_eq!(part.index(), index);
            assert_eq!(BodyPart::from_index(index), Some(*part));
        }
        assert_eq!(BodyPart::from_index(KEYPOINT_COUNT), None);
    }
}
