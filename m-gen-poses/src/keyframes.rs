use motionrun_core::{BODY_PARTS, BodyPart, Keypoint, Pose};

pub const FRAME_WIDTH: f32 = 640.0;
pub const FRAME_HEIGHT: f32 = 480.0;
pub const KEYPOINT_SCORE: f32 = 0.9;

/// Vertical landmarks of a body facing the camera, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stance {
    pub center_x: f32,
    pub head_y: f32,
    pub shoulder_y: f32,
    pub hip_y: f32,
    pub knee_y: f32,
    pub ankle_y: f32,
    pub knee_spread: f32,
    pub lift: f32, // whole-body offset upwards
}

impl Stance {
    pub const fn standing() -> Self {
        Self {
            center_x: FRAME_WIDTH / 2.0,
            head_y: 60.0,
            shoulder_y: 130.0,
            hip_y: 240.0,
            knee_y: 330.0,
            ankle_y: 420.0,
            knee_spread: 40.0,
            lift: 0.0,
        }
    }

    /// Hips dropped well below the knees.
    pub const fn squat() -> Self {
        Self {
            head_y: 180.0,
            shoulder_y: 250.0,
            hip_y: 400.0,
            knee_y: 330.0,
            ..Self::standing()
        }
    }

    /// Airborne with the feet tucked above the knees.
    pub const fn tuck_jump() -> Self {
        Self {
            ankle_y: 280.0,
            lift: 40.0,
            ..Self::standing()
        }
    }

    pub const fn lunge() -> Self {
        Self {
            hip_y: 280.0,
            knee_y: 360.0,
            knee_spread: 200.0,
            ..Self::standing()
        }
    }

    fn point(&self, part: BodyPart) -> (f32, f32) {
        let cx = self.center_x;
        let half_knee = self.knee_spread / 2.0;
        let (x, y) = match part {
            BodyPart::Nose => (cx, self.head_y),
            BodyPart::LeftEye => (cx - 10.0, self.head_y - 8.0),
            BodyPart::RightEye => (cx + 10.0, self.head_y - 8.0),
            BodyPart::LeftEar => (cx - 22.0, self.head_y - 2.0),
            BodyPart::RightEar => (cx + 22.0, self.head_y - 2.0),
            BodyPart::LeftShoulder => (cx - 50.0, self.shoulder_y),
            BodyPart::RightShoulder => (cx + 50.0, self.shoulder_y),
            BodyPart::LeftElbow => (cx - 65.0, self.shoulder_y + 55.0),
            BodyPart::RightElbow => (cx + 65.0, self.shoulder_y + 55.0),
            BodyPart::LeftWrist => (cx - 70.0, self.shoulder_y + 105.0),
            BodyPart::RightWrist => (cx + 70.0, self.shoulder_y + 105.0),
            BodyPart::LeftHip => (cx - 30.0, self.hip_y),
            BodyPart::RightHip => (cx + 30.0, self.hip_y),
            BodyPart::LeftKnee => (cx - half_knee, self.knee_y),
            BodyPart::RightKnee => (cx + half_knee, self.knee_y),
            BodyPart::LeftAnkle => (cx - 25.0, self.ankle_y),
            BodyPart::RightAnkle => (cx + 25.0, self.ankle_y),
        };
        (x, y - self.lift)
    }

    pub fn to_pose(&self) -> Pose {
        self.to_pose_with_score(KEYPOINT_SCORE)
    }

    pub fn to_pose_with_score(&self, score: f32) -> Pose {
        let keypoints = BODY_PARTS
            .iter()
            .map(|&part| {
                let (x, y) = self.point(part);
                Keypoint::new(part, x, y, score)
            })
            .collect();
        Pose::new(score, keypoints)
    }

    /// Linear blend towards `other`; `t` is clamped to [0, 1].
    pub fn lerp(&self, other: &Stance, t: f32) -> Stance {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Stance {
            center_x: mix(self.center_x, other.center_x),
            head_y: mix(self.head_y, other.head_y),
            shoulder_y: mix(self.shoulder_y, other.shoulder_y),
            hip_y: mix(self.hip_y, other.hip_y),
            knee_y: mix(self.knee_y, other.knee_y),
            ankle_y: mix(self.ankle_y, other.ankle_y),
            knee_spread: mix(self.knee_spread, other.knee_spread),
            lift: mix(self.lift, other.lift),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use motionrun_core::{KEYPOINT_COUNT, MotionClassifier, MotionPolicy};

    #[test]
    fn poses_cover_every_keypoint_inside_the_frame() {
        for stance in [
            Stance::standing(),
            Stance::squat(),
            Stance::tuck_jump(),
            Stance::lunge(),
        ] {
            let pose = stance.to_pose();
            assert_eq!(pose.keypoints.len(), KEYPOINT_COUNT);
            for keypoint in &pose.keypoints {
                assert!((0.0..FRAME_WIDTH).contains(&keypoint.position.x));
                assert!((0.0..FRAME_HEIGHT).contains(&keypoint.position.y));
            }
        }
    }

    #[test]
    fn keyframes_trigger_their_motion() {
        let now = 0.0;
        let mut classifier = MotionClassifier::new(MotionPolicy::reward());
        assert!(classifier.classify(&Stance::standing().to_pose(), now).is_empty());
        assert!(classifier.classify(&Stance::squat().to_pose(), now).squat);
        assert!(classifier.classify(&Stance::tuck_jump().to_pose(), now).jump);
        assert!(classifier.classify(&Stance::lunge().to_pose(), now).lunge);
    }

    #[test]
    fn lerp_endpoints() {
        let start = Stance::standing();
        let end = Stance::squat();

        assert_eq!(start.lerp(&end, 0.0), start);
        assert_eq!(start.lerp(&end, 1.0), end);
        assert_eq!(start.lerp(&end, 2.0), end);
        assert_eq!(start.lerp(&end, 0.5).hip_y, 320.0);
    }
}
