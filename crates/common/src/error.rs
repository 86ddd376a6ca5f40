//! Error types shared across PoseKit crates.

use std::path::PathBuf;

/// Top-level error type for PoseKit operations.
#[derive(Debug, thiserror::Error)]
pub enum PosekitError {
    #[error("Decode error in {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },

    #[error("Estimator error: {message}")]
    Estimator { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Invoker error: {message}")]
    Invoker { message: String },

    #[error("Directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias using PosekitError.
pub type PosekitResult<T> = Result<T, PosekitError>;

impl PosekitError {
    pub fn decode(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            message: msg.into(),
        }
    }

    pub fn estimator(msg: impl Into<String>) -> Self {
        Self::Estimator {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn invoker(msg: impl Into<String>) -> Self {
        Self::Invoker {
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_path() {
        let err = PosekitError::decode("/in/broken.jpg", "unexpected EOF");
        assert_eq!(err.to_string(), "Decode error in /in/broken.jpg: unexpected EOF");

        let err = PosekitError::DirectoryNotFound {
            path: PathBuf::from("/in/missing"),
        };
        assert_eq!(err.to_string(), "Directory not found: /in/missing");
    }
}
