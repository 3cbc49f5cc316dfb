use anyhow::{bail, Context, Result};
use sketchpad::draw::dialog::{run_dialog_child, DialogMode};
use sketchpad::settings::{self, CanvasSettings};
use sketchpad::{Canvas, Color, Picture};
use sketchpad::{
    BLACK, BLUE, CYAN, DARK_BLUE, DARK_GREEN, DARK_RED, GREEN, MAGENTA, ORANGE, PINK, RED,
    YELLOW,
};
use std::io::Write;
use std::time::Duration;

fn main() -> Result<()> {
    let settings = settings::load().unwrap_or_else(|err| {
        eprintln!("using default settings: {err:#}");
        CanvasSettings::default()
    });
    sketchpad::logging::init(settings.debug_logging, settings.log_file.clone());

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(first) = args.first() else {
        return demo(settings);
    };
    let Some(mode) = DialogMode::from_arg(first) else {
        bail!("unknown argument {first:?}");
    };
    run_dialog_child(mode, args.get(1).map(String::as_str))
        .with_context(|| format!("run {} dialog", mode.as_arg()))
}

/// A small badge standing in for an image file.
fn badge() -> Result<Picture> {
    let mut pic = Picture::new(48, 48);
    for y in 0..48u32 {
        for x in 0..48u32 {
            let shade = (x * 5) as u8;
            pic.set(x, y, Color::rgb(shade, 90, 166))?;
        }
    }
    Ok(pic)
}

fn demo(settings: CanvasSettings) -> Result<()> {
    let mut canvas = Canvas::new().with_settings(settings);
    let frame = Some(Duration::ZERO);

    canvas.clear_default()?;

    for (radius, color, x, y) in [
        (0.5, ORANGE, 0.5, 0.5),
        (0.25, BLUE, 0.5, 0.5),
        (0.02, RED, 0.25, 0.25),
        (0.01, GREEN, 0.25, 0.25),
        (0.0, BLACK, 0.25, 0.25),
        (0.1, RED, 0.75, 0.75),
    ] {
        canvas.set_pen_radius(radius)?;
        canvas.set_pen_color(color);
        canvas.point(x, y)?;
        canvas.show(frame)?;
    }

    canvas.set_pen_radius(0.0)?;
    canvas.set_pen_color(CYAN);
    for i in 0..100 {
        canvas.point(i as f64 / 512.0, 0.5)?;
        canvas.point(0.5, i as f64 / 512.0)?;
    }
    canvas.show(frame)?;

    canvas.set_pen_color(MAGENTA);
    canvas.line(0.1, 0.1, 0.3, 0.3)?;
    canvas.line(0.1, 0.2, 0.3, 0.2)?;
    canvas.line(0.2, 0.1, 0.2, 0.3)?;
    canvas.show(frame)?;

    canvas.set_pen_radius(0.05)?;
    canvas.line(0.7, 0.5, 0.8, 0.9)?;
    canvas.show(frame)?;

    canvas.set_pen_radius(0.01)?;
    canvas.set_pen_color(YELLOW);
    canvas.circle(0.75, 0.25, 0.2)?;
    canvas.filled_circle(0.75, 0.25, 0.1)?;
    canvas.show(frame)?;

    canvas.set_pen_color(PINK);
    canvas.rectangle(0.25, 0.75, 0.1, 0.2)?;
    canvas.filled_rectangle(0.25, 0.75, 0.05, 0.1)?;
    canvas.show(frame)?;

    canvas.set_pen_color(DARK_RED);
    canvas.square(0.5, 0.5, 0.1)?;
    canvas.filled_square(0.5, 0.5, 0.05)?;
    canvas.show(frame)?;

    canvas.set_pen_color(DARK_BLUE);
    canvas.polygon(&[0.4, 0.5, 0.6], &[0.7, 0.8, 0.7])?;
    canvas.show(frame)?;

    canvas.set_pen_color(DARK_GREEN);
    canvas.set_font_size(24);
    canvas.text(0.2, 0.4, "hello, world")?;
    canvas.show(frame)?;

    canvas.picture(&badge()?, 0.5, 0.85)?;
    canvas.show(frame)?;

    canvas.set_pen_color(BLACK);
    println!("Left click with the mouse or type a key");
    let mut stdout = std::io::stdout();
    loop {
        if canvas.mouse_pressed() {
            canvas.filled_circle(canvas.mouse_x()?, canvas.mouse_y()?, 0.02)?;
        }
        if canvas.has_next_key_typed() {
            write!(stdout, "{}", canvas.next_key_typed()?)?;
            stdout.flush()?;
        }
        canvas.show(frame)?;
    }
}
