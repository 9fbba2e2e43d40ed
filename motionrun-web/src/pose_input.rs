use m_gen_poses::keyframes::Stance;
use macroquad::prelude::{KeyCode, is_key_down};
use motionrun_core::{FLAT_POSE_LEN, Pose, PoseRecording, PoseSource};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock, PoisonError};

/// Room for 17 `[x, y, score]` triples plus the trailing pose score.
pub const POSE_BUFFER_LEN: usize = FLAT_POSE_LEN + 1;

static BRIDGE_ACTIVE: AtomicBool = AtomicBool::new(false);

fn pose_buffer() -> &'static Mutex<[f32; POSE_BUFFER_LEN]> {
    static POSE_BUFFER: OnceLock<Mutex<[f32; POSE_BUFFER_LEN]>> = OnceLock::new();
    POSE_BUFFER.get_or_init(|| Mutex::new([0.0; POSE_BUFFER_LEN]))
}

fn latest_bridge_pose() -> &'static Mutex<Option<Pose>> {
    static LATEST_BRIDGE_POSE: OnceLock<Mutex<Option<Pose>>> = OnceLock::new();
    LATEST_BRIDGE_POSE.get_or_init(|| Mutex::new(None))
}

/// Address the page writes keypoints into before calling [`push_pose`].
#[unsafe(no_mangle)]
pub extern "C" fn pose_buffer_ptr() -> *mut f32 {
    pose_buffer()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_mut_ptr()
}

#[unsafe(no_mangle)]
pub extern "C" fn pose_buffer_len() -> usize {
    POSE_BUFFER_LEN
}

/// Publishes the first `len` values of the pose buffer: 17 `[x, y, score]`
/// triples in PoseNet order, optionally followed by the overall pose score.
#[unsafe(no_mangle)]
pub extern "C" fn push_pose(len: usize) {
    if len > POSE_BUFFER_LEN {
        tracing::warn!(len, "push_pose length exceeds the pose buffer");
        return;
    }
    let frame = *pose_buffer()
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    submit_flat_pose(&frame[..len]);
}

/// Stores a flat pose as the latest bridge pose. Malformed frames are logged and dropped.
pub fn submit_flat_pose(data: &[f32]) -> bool {
    match Pose::from_flat(data) {
        Ok(pose) => {
            *latest_bridge_pose()
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = Some(pose);
            BRIDGE_ACTIVE.store(true, Ordering::SeqCst);
            true
        }
        Err(err) => {
            tracing::warn!(%err, "dropping pose frame");
            false
        }
    }
}

pub fn bridge_active() -> bool {
    BRIDGE_ACTIVE.load(Ordering::SeqCst)
}

fn take_bridge_pose() -> Option<Pose> {
    latest_bridge_pose()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub squat: bool,
    pub jump: bool,
    pub lunge: bool,
}

impl HeldKeys {
    pub fn read() -> Self {
        Self {
            squat: is_key_down(KeyCode::S) || is_key_down(KeyCode::Down),
            jump: is_key_down(KeyCode::J) || is_key_down(KeyCode::Up),
            lunge: is_key_down(KeyCode::L),
        }
    }

    pub fn stance(self) -> Stance {
        if self.jump {
            Stance::tuck_jump()
        } else if self.squat {
            Stance::squat()
        } else if self.lunge {
            Stance::lunge()
        } else {
            Stance::standing()
        }
    }
}

/// Where poses come from when the page's pose estimator is silent: the
/// keyboard, or a recording that hands over to the keyboard once played
/// through. Once the page delivers a pose it takes over.
pub enum PoseInput {
    Live,
    Replay(PoseRecording),
}

impl PoseInput {
    pub fn describe(&self) -> &'static str {
        match self {
            _ if bridge_active() => "camera",
            PoseInput::Replay(recording) if !recording.is_finished() => "replay",
            _ => "keyboard (S squat, J jump, L lunge)",
        }
    }

    /// Starts a recording over; live input has nothing to rewind.
    pub fn rewind(&mut self) {
        if let PoseInput::Replay(recording) = self {
            recording.rewind();
        }
    }
}

fn replay_then_keys(
    recording: &mut PoseRecording,
    now: f64,
    keys: impl FnOnce() -> HeldKeys,
) -> Option<Pose> {
    if recording.is_finished() {
        return Some(keys().stance().to_pose());
    }
    recording.next_pose(now)
}

impl PoseSource for PoseInput {
    fn next_pose(&mut self, now: f64) -> Option<Pose> {
        if bridge_active() {
            return take_bridge_pose();
        }
        match self {
            PoseInput::Live => Some(HeldKeys::read().stance().to_pose()),
            PoseInput::Replay(recording) => replay_then_keys(recording, now, HeldKeys::read),
        }
    }
}
