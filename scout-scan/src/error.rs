use scout_core::Error as CoreError;
use scout_eye::VisionError;
use scout_spk::SpeechError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Scan already active (state: {0})")]
    AlreadyActive(&'static str),

    #[error("No async runtime available: {0}")]
    NoRuntime(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Vision error: {0}")]
    Vision(#[from] VisionError),

    #[error("Speech error: {0}")]
    Speech(#[from] SpeechError),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl From<ScanError> for CoreError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::Config(msg) => CoreError::Configuration(msg),
            ScanError::Vision(inner) => inner.into(),
            ScanError::Speech(inner) => inner.into(),
            ScanError::Core(inner) => inner,
            other => CoreError::Session(other.to_string()),
        }
    }
}
