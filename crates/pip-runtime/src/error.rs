use pip_core::{GuideError, LayoutError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid configuration: {}", .0.join("; "))]
    InvalidConfig(Vec<String>),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Guide(#[from] GuideError),

    #[error("no content is being shown")]
    NoContent,

    #[error("picture-in-picture controller is not current")]
    NotCurrent,

    #[error("picture-in-picture is not supported: {reason}")]
    Unsupported { reason: String },
}

impl RuntimeError {
    #[must_use]
    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::Unsupported {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RuntimeError;

    #[test]
    fn invalid_config_joins_messages() {
        let error = RuntimeError::InvalidConfig(vec!["a".into(), "b".into()]);
        assert_eq!(error.to_string(), "invalid configuration: a; b");
    }

    #[test]
    fn unsupported_constructor_keeps_reason() {
        let error = RuntimeError::unsupported("no backend");
        assert_eq!(
            error.to_string(),
            "picture-in-picture is not supported: no backend"
        );
    }

    #[test]
    fn layout_errors_are_transparent() {
        let inner = pip_core::Layout::from_json("{}").unwrap_err();
        let message = inner.to_string();
        let error = RuntimeError::from(inner);
        assert_eq!(error.to_string(), message);
    }
}
