use thiserror::Error;

/// Main error type for the dino-vis library
#[derive(Error, Debug)]
pub enum VisualizerError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    #[error("Frequency source error: {0}")]
    Source(#[from] SourceError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Caller contract violations when handing a frame to the extractor
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidInputError {
    #[error("Frame length mismatch: expected {expected} samples, got {actual}")]
    FrameLength { expected: usize, actual: usize },

    #[error("Sample {index} out of range: {value} (allowed 0..={max})")]
    SampleOutOfRange { index: usize, value: f64, max: f64 },
}

/// Frequency source errors
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read frame file: {path}")]
    ReadFailed { path: String },

    #[error("Failed to parse frame at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Source frame length {actual} does not match configured length {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Invalid source parameters: {details}")]
    InvalidParameters { details: String },
}

/// Renderer errors
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to encode tick {tick}: {reason}")]
    EncodeFailed { tick: u64, reason: String },

    #[error("Failed to write output: {reason}")]
    WriteFailed { reason: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using VisualizerError
pub type Result<T> = std::result::Result<T, VisualizerError>;

impl VisualizerError {
    /// Check if the driving loop can skip this tick and carry on
    pub fn is_recoverable(&self) -> bool {
        // A bad frame only spoils its own tick; everything else happens at load time
        matches!(self, Self::InvalidInput(_))
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput(InvalidInputError::FrameLength { expected, actual }) => {
                format!(
                    "The frequency source delivered {} bins but the extractor expects {}. Check `dynamics.frame_length`.",
                    actual, expected
                )
            }
            Self::Source(SourceError::ReadFailed { path }) => {
                format!("Could not read frame file '{}'. Please check the file exists.", path)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}
