use std::path::PathBuf;

/// Failures surfaced by canvas operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid size, bounds, radius or vertex data. Never retried.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An operation called in a state where it cannot answer, such as reading
    /// the mouse position before any click.
    #[error("state error: {0}")]
    State(String),

    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image error on {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("window backend error: {0}")]
    Backend(String),

    #[error("dialog error: {0}")]
    Dialog(String),
}

impl Error {
    pub(crate) fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub(crate) fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }

    pub(crate) fn image(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        let path = path.into();
        match source {
            image::ImageError::IoError(source) => Self::Io { path, source },
            source => Self::Image { path, source },
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    pub fn is_state(&self) -> bool {
        matches!(self, Self::State(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
