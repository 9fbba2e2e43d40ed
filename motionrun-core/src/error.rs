use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum MotionRunError {
    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("invalid pose: {message}")]
    Pose { message: String },

    #[error("recording line {line}: {message}")]
    Recording { line: usize, message: String },

    #[error("config file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MotionRunError>;

impl MotionRunError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn pose(message: impl Into<String>) -> Self {
        Self::Pose {
            message: message.into(),
        }
    }
}
