pub mod backend;
pub mod canvas;
pub mod composite;
pub mod dialog;
pub mod input;
pub mod messages;
pub mod pen;
pub mod render;
pub mod save;
pub mod scale;
pub mod state;
pub mod text;
pub mod window;

pub use backend::{Backend, HeadlessBackend};
pub use canvas::Canvas;
pub use dialog::{DialogService, ProcessDialogService};
pub use messages::{CanvasEvent, MouseButton};
pub use save::SaveOutcome;
pub use state::CanvasLifecycle;
pub use window::WindowBackend;
