use crate::draw::composite::RgbaBuffer;
use crate::draw::dialog::{has_image_extension, DialogService};
use std::path::PathBuf;
use tracing::{info, warn};

pub const EXTENSION_ERROR_MESSAGE: &str = "File name must end with \".jpg\" or \".png\".";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The picker was dismissed or could not be shown.
    Cancelled,
    /// The chosen name has no accepted image extension.
    Rejected(PathBuf),
    Saved(PathBuf),
    Failed { path: PathBuf, error: String },
}

/// Asks for a file name, writes `frame` there and tells the user how it went.
/// Failures end up in a dialog or the log; nothing is returned as an error.
pub fn save_with_dialogs(dialogs: &mut dyn DialogService, frame: &RgbaBuffer) -> SaveOutcome {
    let path = match dialogs.pick_save_path() {
        Ok(Some(path)) => path,
        Ok(None) => return SaveOutcome::Cancelled,
        Err(err) => {
            warn!(error = %err, "file picker failed");
            return SaveOutcome::Cancelled;
        }
    };

    if !has_image_extension(&path) {
        notify_error(dialogs, EXTENSION_ERROR_MESSAGE);
        return SaveOutcome::Rejected(path);
    }

    match frame.save(&path) {
        Ok(()) => {
            info!(path = %path.display(), "saved drawing");
            if let Err(err) = dialogs.confirm_save() {
                warn!(error = %err, "unable to show save confirmation");
            }
            SaveOutcome::Saved(path)
        }
        Err(err) => {
            let error = err.to_string();
            warn!(path = %path.display(), %error, "saving drawing failed");
            notify_error(dialogs, &error);
            SaveOutcome::Failed { path, error }
        }
    }
}

fn notify_error(dialogs: &mut dyn DialogService, message: &str) {
    if let Err(err) = dialogs.report_save_error(message) {
        warn!(error = %err, message, "unable to show save error");
    }
}
