pub mod color;
pub mod draw;
pub mod error;
pub mod logging;
pub mod picture;
pub mod settings;

pub use color::*;
pub use draw::{Canvas, CanvasLifecycle, HeadlessBackend};
pub use error::{Error, Result};
pub use picture::Picture;
