use sketchpad::draw::{CanvasEvent, MouseButton};
use sketchpad::{Canvas, CanvasLifecycle, BLACK, WHITE};
use std::time::{Duration, Instant};

fn click(button: MouseButton, x: f64, y: f64) -> [CanvasEvent; 2] {
    [
        CanvasEvent::MouseDown { button, x, y },
        CanvasEvent::MouseUp { button, x, y },
    ]
}

#[test]
fn mouse_position_is_an_error_before_any_click() {
    let mut canvas = Canvas::headless();
    assert!(!canvas.mouse_pressed());
    assert!(canvas.mouse_x().unwrap_err().is_state());
    assert!(canvas.mouse_y().unwrap_err().is_state());
}

#[test]
fn left_click_maps_back_to_user_coordinates() {
    let mut canvas = Canvas::headless();
    canvas.set_x_scale(-1.0, 1.0).expect("x scale");
    for event in click(MouseButton::Left, 128.0, 128.0) {
        canvas.backend_mut().push_event(event);
    }
    canvas.show(Some(Duration::ZERO)).expect("show");

    assert!(canvas.mouse_pressed());
    assert!(!canvas.mouse_pressed());
    assert!((canvas.mouse_x().expect("x") - -0.5).abs() < 1e-12);
    assert!((canvas.mouse_y().expect("y") - 0.75).abs() < 1e-12);
}

#[test]
fn other_buttons_do_not_count_as_clicks() {
    let mut canvas = Canvas::headless();
    for event in click(MouseButton::Middle, 10.0, 10.0) {
        canvas.backend_mut().push_event(event);
    }
    canvas.show(Some(Duration::ZERO)).expect("show");
    assert!(!canvas.mouse_pressed());
    assert!(canvas.mouse_x().is_err());
}

#[test]
fn keys_come_back_newest_first() {
    let mut canvas = Canvas::headless();
    canvas.backend_mut().push_event(CanvasEvent::KeyDown('a'));
    canvas.backend_mut().push_event(CanvasEvent::KeyDown('b'));
    assert!(!canvas.has_next_key_typed());

    canvas.show(Some(Duration::ZERO)).expect("show");

    assert!(canvas.has_next_key_typed());
    assert_eq!(canvas.next_key_typed().expect("first"), 'b');
    assert_eq!(canvas.next_key_typed().expect("second"), 'a');
    assert!(!canvas.has_next_key_typed());
    assert!(canvas.next_key_typed().unwrap_err().is_state());
}

#[test]
fn show_publishes_offscreen_buffer() {
    let mut canvas = Canvas::headless();
    canvas.set_pen_radius(0.0).expect("radius");
    canvas.point(0.5, 0.5).expect("point");

    assert_eq!(canvas.window_pixel(256, 256), Some(WHITE));
    assert_eq!(canvas.backend().frames_presented(), 0);

    canvas.show(Some(Duration::ZERO)).expect("show");

    assert_eq!(canvas.window_pixel(256, 256), Some(BLACK));
    assert_eq!(canvas.backend().frames_presented(), 1);
    let frame = canvas.backend().last_frame().expect("frame");
    assert_eq!(frame.pixel(256, 256), Some(BLACK));
    assert_eq!(canvas.lifecycle(), CanvasLifecycle::Idle);
}

#[test]
fn show_waits_and_keeps_polling() {
    let mut canvas = Canvas::headless();
    let started = Instant::now();
    canvas.show_millis(250).expect("show");
    assert!(started.elapsed() >= Duration::from_millis(250));
    // create, publish, the first wait poll and one per 100ms slice
    assert!(canvas.backend().polls() >= 5, "polls {}", canvas.backend().polls());
}

#[test]
fn short_show_is_a_single_sleep() {
    let mut canvas = Canvas::headless();
    canvas.show(Some(Duration::from_millis(20))).expect("show");
    assert_eq!(canvas.backend().polls(), 3);
}

#[test]
fn events_queued_before_creation_are_read_on_first_draw() {
    let mut canvas = Canvas::headless();
    canvas.backend_mut().push_event(CanvasEvent::KeyDown('q'));
    canvas.point(0.1, 0.1).expect("point");
    assert_eq!(canvas.next_key_typed().expect("key"), 'q');
}

#[test]
fn input_arriving_mid_wait_is_read_at_the_next_slice() {
    let mut canvas = Canvas::headless();
    // polls: create, publish, wait start, then one per 100ms slice
    canvas.backend_mut().push_event_at_poll(5, CanvasEvent::KeyDown('z'));
    canvas
        .backend_mut()
        .push_event_at_poll(5, CanvasEvent::MouseDown {
            button: MouseButton::Left,
            x: 256.0,
            y: 0.0,
        });

    canvas.show_millis(250).expect("show");

    assert_eq!(canvas.next_key_typed().expect("key"), 'z');
    assert!(canvas.mouse_pressed());
    assert!((canvas.mouse_y().expect("y") - 1.0).abs() < 1e-12);
}

#[test]
fn input_scheduled_past_a_short_show_waits_for_the_next_one() {
    let mut canvas = Canvas::headless();
    canvas.backend_mut().push_event_at_poll(4, CanvasEvent::KeyDown('w'));

    canvas.show(Some(Duration::from_millis(10))).expect("first show");
    assert!(!canvas.has_next_key_typed());

    canvas.show(Some(Duration::ZERO)).expect("second show");
    assert_eq!(canvas.next_key_typed().expect("key"), 'w');
}
