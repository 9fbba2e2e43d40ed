#[cfg(target_arch = "wasm32")]
use macroquad::miniquad;
use macroquad::prelude::*;
use motionrun_core::{
    DEFAULT_WIN_LENGTH, GameConfig, ModeKind, MotionRunError, Outcome, Phase, PoseRecording,
    PoseSource, Session, parse_win_length,
};
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering};

use crate::pose_input::PoseInput;
use crate::scene_draw::{HudDrawConfig, draw_footer, draw_scene, draw_start_screen};

pub mod logging;
pub mod pose_input;
pub mod scene_draw;

const FIXED_STEP_SECONDS: f32 = 1.0 / 60.0;
const MAX_STEPS_PER_FRAME: u32 = 8;
const CONFIG_PATH: &str = "assets/motionrun.json";
const MAX_WIN_LENGTH_DIGITS: usize = 6;

static PENDING_START: AtomicBool = AtomicBool::new(false);
static PENDING_STOP: AtomicBool = AtomicBool::new(false);
static PENDING_WIN_LENGTH_BITS: AtomicU32 = AtomicU32::new(0); // 0 means nothing pending

static SCORE: AtomicU32 = AtomicU32::new(0);
static PHASE_CODE: AtomicI32 = AtomicI32::new(HostPhase::Start as i32);

#[unsafe(no_mangle)]
pub extern "C" fn start_game() {
    log_ui_action("start game");
    PENDING_START.store(true, Ordering::SeqCst);
}

#[unsafe(no_mangle)]
pub extern "C" fn stop_game() {
    log_ui_action("stop game");
    PENDING_STOP.store(true, Ordering::SeqCst);
}

/// Win distance for the next endless run. Non-positive or non-finite input
/// falls back to the default length.
#[unsafe(no_mangle)]
pub extern "C" fn set_win_length(length: f32) {
    let length = if length.is_finite() && length > 0.0 {
        length
    } else {
        DEFAULT_WIN_LENGTH
    };
    PENDING_WIN_LENGTH_BITS.store(length.to_bits(), Ordering::SeqCst);
}

fn take_pending_win_length() -> Option<f32> {
    match PENDING_WIN_LENGTH_BITS.swap(0, Ordering::SeqCst) {
        0 => None,
        bits => Some(f32::from_bits(bits)),
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn game_score() -> u32 {
    SCORE.load(Ordering::SeqCst)
}

/// 0 start screen, 1 playing, 2 game over, 3 won, 4 stopped.
#[unsafe(no_mangle)]
pub extern "C" fn game_phase() -> i32 {
    PHASE_CODE.load(Ordering::SeqCst)
}

fn log_ui_action(label: &str) {
    tracing::info!(action = label, "ui action");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
enum HostPhase {
    Start = 0,
    Playing = 1,
    GameOver = 2,
    Won = 3,
    Stopped = 4,
}

enum Screen {
    Start { win_length_input: String },
    Running(Session),
}

impl Screen {
    fn host_phase(&self) -> HostPhase {
        match self {
            Screen::Start { .. } => HostPhase::Start,
            Screen::Running(session) => match session.phase() {
                Phase::GameOver => HostPhase::GameOver,
                Phase::Won => HostPhase::Won,
                Phase::Playing if session.is_running() => HostPhase::Playing,
                Phase::Playing => HostPhase::Stopped,
            },
        }
    }

    fn score(&self) -> u32 {
        match self {
            Screen::Start { .. } => 0,
            Screen::Running(session) => session.score(),
        }
    }
}

fn start_screen() -> Screen {
    Screen::Start {
        win_length_input: String::new(),
    }
}

/// Applies typed characters to the win-length field; only digits are kept.
fn edit_win_length_input(input: &mut String, typed: impl IntoIterator<Item = char>) {
    for ch in typed {
        if ch.is_ascii_digit() && input.len() < MAX_WIN_LENGTH_DIGITS {
            input.push(ch);
        }
    }
}

async fn load_config() -> motionrun_core::Result<GameConfig> {
    let text = load_string(CONFIG_PATH)
        .await
        .map_err(|_| MotionRunError::ConfigNotFound {
            path: CONFIG_PATH.into(),
        })?;
    GameConfig::from_json_str(&text)
}

async fn load_pose_input(config: &GameConfig) -> PoseInput {
    let Some(path) = config.replay.as_deref() else {
        return PoseInput::Live;
    };
    let text = match load_string(path).await {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(path, %err, "replay not readable, using live input");
            return PoseInput::Live;
        }
    };
    match PoseRecording::load_jsonl(&text) {
        Ok(recording) => {
            tracing::info!(path, frames = recording.len(), "replaying poses");
            PoseInput::Replay(recording)
        }
        Err(err) => {
            tracing::warn!(path, %err, "replay not loadable, using live input");
            PoseInput::Live
        }
    }
}

struct GameHost {
    config: GameConfig,
    screen: Screen,
    input: PoseInput,
    win_length_override: Option<f32>,
    now: f64,
    hud: HudDrawConfig,
}

impl GameHost {
    async fn new() -> Self {
        let (config, load_error) = match load_config().await {
            Ok(config) => (config, None),
            Err(err) => (GameConfig::default(), Some(err)),
        };
        logging::init_logging(&config.logging);
        if let Some(err) = load_error {
            tracing::info!(%err, "using default config");
        }

        let input = load_pose_input(&config).await;
        Self::with_config(config, input)
    }

    /// Runner mode waits on the start screen; the other modes start playing at once.
    fn with_config(config: GameConfig, input: PoseInput) -> Self {
        let mut host = Self {
            config,
            screen: start_screen(),
            input,
            win_length_override: None,
            now: 0.0,
            hud: HudDrawConfig::default(),
        };
        if host.config.mode != ModeKind::Runner {
            host.start_session(None);
        }
        host
    }

    fn start_session(&mut self, win_length: Option<f32>) {
        let mut config = self.config.clone();
        if let Some(win_length) = win_length {
            config = config.with_win_length(win_length);
        }
        match Session::new(config) {
            Ok(session) => {
                log_ui_action("session start");
                self.screen = Screen::Running(session);
            }
            Err(err) => tracing::error!(%err, "cannot start session"),
        }
    }

    fn start_from_input(&mut self) {
        let Screen::Start { win_length_input } = &self.screen else {
            return;
        };
        let win_length = self
            .win_length_override
            .take()
            .unwrap_or_else(|| parse_win_length(win_length_input));
        self.start_session(Some(win_length));
    }

    fn restart(&mut self) {
        let Screen::Running(session) = &mut self.screen else {
            return;
        };
        if self.config.mode == ModeKind::Runner {
            log_ui_action("back to start screen");
            self.screen = start_screen();
        } else {
            session.restart();
        }
        self.input.rewind();
    }

    fn stop(&mut self) {
        if let Screen::Running(session) = &mut self.screen {
            session.stop();
        }
    }

    fn is_playing(&self) -> bool {
        self.screen.host_phase() == HostPhase::Playing
    }

    fn fixed_update(&mut self) {
        let Screen::Running(session) = &mut self.screen else {
            return;
        };
        if !session.is_running() {
            return;
        }

        self.now += FIXED_STEP_SECONDS as f64;
        let pose = self.input.next_pose(self.now);
        let report = session.tick(pose.as_ref(), self.now);
        if let Some(outcome) = report.outcome {
            log_ui_action(match outcome {
                Outcome::GameOver => "game over",
                Outcome::Won => "game won",
            });
        }
    }

    fn apply_pending_ui_actions(&mut self) {
        if let Some(length) = take_pending_win_length() {
            self.win_length_override = Some(length);
        }
        if PENDING_STOP.swap(false, Ordering::SeqCst) {
            self.stop();
        }
        if PENDING_START.swap(false, Ordering::SeqCst) {
            self.activate();
        }
    }

    /// Enter on the start screen starts a run; once a run ended it restarts.
    fn activate(&mut self) {
        match self.screen.host_phase() {
            HostPhase::Start => self.start_from_input(),
            HostPhase::Playing => {}
            HostPhase::GameOver | HostPhase::Won | HostPhase::Stopped => self.restart(),
        }
    }

    fn handle_keys(&mut self) {
        if let Screen::Start { win_length_input } = &mut self.screen {
            edit_win_length_input(win_length_input, std::iter::from_fn(get_char_pressed));
            if is_key_pressed(KeyCode::Backspace) {
                win_length_input.pop();
                self.win_length_override = None;
            }
        } else {
            // Drain typed characters so they do not leak into the next start screen.
            while get_char_pressed().is_some() {}
        }

        if is_key_pressed(KeyCode::Enter) || is_key_pressed(KeyCode::KpEnter) {
            self.activate();
        }
    }

    fn publish_status(&self) {
        SCORE.store(self.screen.score(), Ordering::SeqCst);
        PHASE_CODE.store(self.screen.host_phase() as i32, Ordering::SeqCst);
    }

    fn render(&self) {
        match &self.screen {
            Screen::Start { win_length_input } => {
                let shown = match self.win_length_override {
                    Some(length) => length.to_string(),
                    None => win_length_input.clone(),
                };
                draw_start_screen(&shown, self.input.describe(), &self.hud);
            }
            Screen::Running(session) => {
                draw_scene(&session.scene(), &self.hud);
                match self.screen.host_phase() {
                    HostPhase::Stopped => draw_footer("Stopped. Press Enter to restart", &self.hud),
                    HostPhase::GameOver | HostPhase::Won => {
                        draw_footer("Press Enter to play again", &self.hud)
                    }
                    HostPhase::Start | HostPhase::Playing => {}
                }
            }
        }
    }
}

pub async fn run() {
    install_panic_hook();
    let mut game = GameHost::new().await;
    let mut accumulator = 0.0_f32;

    loop {
        if is_key_pressed(KeyCode::Escape) {
            log_ui_action("escape");
            game.stop();
            #[cfg(not(target_arch = "wasm32"))]
            break;
        }

        game.apply_pending_ui_actions();
        game.handle_keys();

        if game.is_playing() {
            // Consume real elapsed time in fixed-size simulation steps.
            accumulator += get_frame_time();
            let mut steps = 0;
            while accumulator >= FIXED_STEP_SECONDS && steps < MAX_STEPS_PER_FRAME {
                game.fixed_update();
                accumulator -= FIXED_STEP_SECONDS;
                steps += 1;
            }
            if steps == MAX_STEPS_PER_FRAME {
                accumulator = accumulator.min(FIXED_STEP_SECONDS);
            }
        } else {
            accumulator = 0.0;
        }

        game.publish_status();
        game.render();

        next_frame().await;
    }
}

#[cfg(target_arch = "wasm32")]
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let msg = info.to_string();
        if let Some(location) = info.location() {
            miniquad::error!("motionrun panic at {}:{}: {}", location.file(), location.line(), msg);
        } else {
            miniquad::error!("motionrun panic: {}", msg);
        }
    }));
}

#[cfg(not(target_arch = "wasm32"))]
fn install_panic_hook() {}
