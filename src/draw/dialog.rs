//! Save-file dialogs, run in child processes so the dialog toolkit never
//! shares an event loop with the canvas window.

use crate::error::{Error, Result};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use tracing::{debug, warn};

pub const CONFIRM_SAVE_TITLE: &str = "File Save Confirmation";
pub const CONFIRM_SAVE_MESSAGE: &str = "The drawing was saved to the file.";
pub const SAVE_ERROR_TITLE: &str = "File Save Error";

/// The dialogs the canvas needs when the user asks to save.
pub trait DialogService {
    /// Asks for a destination. `None` when the user cancels.
    fn pick_save_path(&mut self) -> Result<Option<PathBuf>>;

    fn confirm_save(&mut self) -> Result<()>;

    fn report_save_error(&mut self, message: &str) -> Result<()>;

    /// Collects dialogs that have finished. Called on every event poll.
    fn reap(&mut self) {}
}

/// First command-line argument selecting a dialog child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogMode {
    GetFileName,
    ConfirmFileSave,
    ReportFileSaveError,
}

impl DialogMode {
    pub fn as_arg(self) -> &'static str {
        match self {
            DialogMode::GetFileName => "getFileName",
            DialogMode::ConfirmFileSave => "confirmFileSave",
            DialogMode::ReportFileSaveError => "reportFileSaveError",
        }
    }

    pub fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "getFileName" => Some(DialogMode::GetFileName),
            "confirmFileSave" => Some(DialogMode::ConfirmFileSave),
            "reportFileSaveError" => Some(DialogMode::ReportFileSaveError),
            _ => None,
        }
    }
}

/// Re-runs an executable (by default the current one) with a [`DialogMode`]
/// argument. The file picker is awaited; message dialogs are left running and
/// reaped by [`DialogService::reap`].
#[derive(Debug)]
pub struct ProcessDialogService {
    program: Option<PathBuf>,
    children: Vec<Child>,
}

impl Default for ProcessDialogService {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessDialogService {
    pub fn new() -> Self {
        Self {
            program: None,
            children: Vec::new(),
        }
    }

    /// Uses `program` instead of the current executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: Some(program.into()),
            children: Vec::new(),
        }
    }

    /// Message dialogs spawned and not yet reaped.
    pub fn running_dialogs(&self) -> usize {
        self.children.len()
    }

    fn command(&self, mode: DialogMode) -> Result<Command> {
        let program = match &self.program {
            Some(program) => program.clone(),
            None => std::env::current_exe()
                .map_err(|e| Error::Dialog(format!("resolve current executable: {e}")))?,
        };
        let mut command = Command::new(program);
        command.arg(mode.as_arg());
        Ok(command)
    }

    fn spawn_detached(&mut self, mut command: Command) -> Result<()> {
        let child = command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|e| Error::Dialog(format!("spawn dialog process: {e}")))?;
        debug!(pid = child.id(), "spawned dialog process");
        self.children.push(child);
        self.reap();
        Ok(())
    }
}

/// Reads the file picker's answer from its standard output.
pub fn parse_picked_path(stdout: &[u8]) -> Option<PathBuf> {
    let text = String::from_utf8_lossy(stdout);
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
}

/// Accepted extensions for saving from the dialog, matched case-sensitively
/// like the file picker reports them.
pub fn has_image_extension(path: &std::path::Path) -> bool {
    let name = path.to_string_lossy();
    name.ends_with(".jpg") || name.ends_with(".png")
}

impl DialogService for ProcessDialogService {
    fn pick_save_path(&mut self) -> Result<Option<PathBuf>> {
        let output = self
            .command(DialogMode::GetFileName)?
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| Error::Dialog(format!("run file picker: {e}")))?;
        Ok(parse_picked_path(&output.stdout))
    }

    fn confirm_save(&mut self) -> Result<()> {
        let command = self.command(DialogMode::ConfirmFileSave)?;
        self.spawn_detached(command)
    }

    fn report_save_error(&mut self, message: &str) -> Result<()> {
        let mut command = self.command(DialogMode::ReportFileSaveError)?;
        command.arg(message);
        self.spawn_detached(command)
    }

    fn reap(&mut self) {
        self.children.retain_mut(|child| match child.try_wait() {
            Ok(Some(status)) => {
                debug!(pid = child.id(), %status, "dialog process exited");
                false
            }
            Ok(None) => true,
            Err(err) => {
                warn!(pid = child.id(), error = %err, "unable to query dialog process");
                false
            }
        });
    }
}

/// Body of a dialog child process. For [`DialogMode::GetFileName`] the chosen
/// path (or nothing, on cancel) is written to standard output.
pub fn run_dialog_child(mode: DialogMode, message: Option<&str>) -> Result<()> {
    match mode {
        DialogMode::GetFileName => {
            let reply = rfd::FileDialog::new()
                .set_directory(".")
                .add_filter("Image", &["png", "jpg"])
                .save_file();
            let mut stdout = std::io::stdout().lock();
            if let Some(path) = reply {
                write!(stdout, "{}", path.display())
                    .map_err(|e| Error::Dialog(format!("write picked path: {e}")))?;
            }
            stdout
                .flush()
                .map_err(|e| Error::Dialog(format!("flush picked path: {e}")))?;
        }
        DialogMode::ConfirmFileSave => {
            rfd::MessageDialog::new()
                .set_level(rfd::MessageLevel::Info)
                .set_title(CONFIRM_SAVE_TITLE)
                .set_description(CONFIRM_SAVE_MESSAGE)
                .set_buttons(rfd::MessageButtons::Ok)
                .show();
        }
        DialogMode::ReportFileSaveError => {
            rfd::MessageDialog::new()
                .set_level(rfd::MessageLevel::Error)
                .set_title(SAVE_ERROR_TITLE)
                .set_description(message.unwrap_or("The drawing could not be saved."))
                .set_buttons(rfd::MessageButtons::Ok)
                .show();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        has_image_extension, parse_picked_path, DialogMode, DialogService, ProcessDialogService,
    };
    use std::path::{Path, PathBuf};
    use std::time::{Duration, Instant};

    #[test]
    fn mode_arguments_round_trip() {
        for mode in [
            DialogMode::GetFileName,
            DialogMode::ConfirmFileSave,
            DialogMode::ReportFileSaveError,
        ] {
            assert_eq!(DialogMode::from_arg(mode.as_arg()), Some(mode));
        }
        assert_eq!(DialogMode::from_arg("demo"), None);
    }

    #[test]
    fn picked_path_is_trimmed_and_empty_means_cancel() {
        assert_eq!(
            parse_picked_path(b"  /tmp/out.png\n"),
            Some(PathBuf::from("/tmp/out.png"))
        );
        assert_eq!(parse_picked_path(b""), None);
        assert_eq!(parse_picked_path(b"\n"), None);
    }

    #[test]
    fn only_jpg_and_png_are_accepted() {
        assert!(has_image_extension(Path::new("drawing.png")));
        assert!(has_image_extension(Path::new("/a/b/drawing.jpg")));
        assert!(!has_image_extension(Path::new("drawing.gif")));
        assert!(!has_image_extension(Path::new("drawing")));
        assert!(!has_image_extension(Path::new("drawing.PNG")));
    }

    #[cfg(unix)]
    #[test]
    fn finished_message_dialogs_are_reaped() {
        let mut dialogs = ProcessDialogService::with_program("true");
        dialogs.confirm_save().expect("spawn confirmation");
        dialogs.report_save_error("disk full").expect("spawn error dialog");

        let deadline = Instant::now() + Duration::from_secs(5);
        while dialogs.running_dialogs() > 0 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
            dialogs.reap();
        }
        assert_eq!(dialogs.running_dialogs(), 0);
    }
}
