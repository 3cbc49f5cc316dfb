use sketchpad::settings::CanvasSettings;
use tempfile::tempdir;

#[test]
fn default_settings_log_to_stderr_only() {
    let settings = CanvasSettings::default();
    assert!(settings.log_file.is_none());
    sketchpad::logging::init(settings.debug_logging, settings.log_file.clone());

    let dir = tempdir().unwrap();
    let mut canvas = sketchpad::Canvas::headless().with_settings(settings);
    canvas.save(dir.path().join("frame.png")).unwrap();

    let written: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(written, vec![std::ffi::OsString::from("frame.png")]);
}
