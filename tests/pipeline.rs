//! End-to-end tests of the sample -> trail/estimator -> feed pipeline,
//! driven with raw `/coords` bodies and a simulated clock.

use approx::assert_relative_eq;
use pendulum_vis::core::{
    parse_snapshot, ControlCommand, PendulumState, Point2D, Quantity, VisConfig, Viewport,
};

fn coords(x1: f64, y1: f64, x2: f64, y2: f64) -> String {
    format!(r#"[{{"x":{x1},"y":{y1}}},{{"x":{x2},"y":{y2}}},{{"m1":10,"m2":12}}]"#)
}

fn feed_sample(state: &mut PendulumState, body: &str, now: f64) {
    assert!(state.accept_poll(parse_snapshot(body)));
    assert!(state.tick(now).new_sample);
}

#[test]
fn test_velocity_then_acceleration() {
    let mut state = PendulumState::new(VisConfig::default());
    state.set_canvas_size(400.0, 300.0);

    feed_sample(&mut state, &coords(0.0, 0.0, 0.0, 100.0), 0.0);
    assert!(state.latest_derivatives().is_none());

    feed_sample(&mut state, &coords(10.0, 0.0, 10.0, 100.0), 0.04);
    let d = state.latest_derivatives().expect("derivative after two samples");
    assert_relative_eq!(d.bobs[0].velocity.x, 250.0, epsilon = 1e-9);
    assert_relative_eq!(d.bobs[0].velocity.y, 0.0);
    assert!(d.bobs[0].acceleration.is_none());

    feed_sample(&mut state, &coords(20.0, 0.0, 20.0, 100.0), 0.08);
    let d = state.latest_derivatives().expect("derivative after three samples");
    assert_relative_eq!(d.bobs[0].velocity.x, 250.0, epsilon = 1e-9);
    let a = d.bobs[0].acceleration.expect("acceleration after three samples");
    assert_relative_eq!(a.x, 0.0, epsilon = 1e-6);
    assert_relative_eq!(a.y, 0.0, epsilon = 1e-6);

    // Second sample emitted immediately, third fell inside the throttle window
    let feed = state.feed();
    assert_eq!(feed.window(Quantity::AngularVelocity(0)).len(), 1);
    assert!(feed.window(Quantity::Acceleration(0)).is_empty());
    assert_eq!(feed.window(Quantity::AngularVelocity(0))[0].label, "0.5");
}

#[test]
fn test_trails_follow_bobs_in_world_space() {
    let mut state = PendulumState::new(VisConfig::default());
    state.set_canvas_size(400.0, 300.0);

    for i in 0..5 {
        let x = i as f64 * 3.0;
        feed_sample(&mut state, &coords(x, 50.0, x, 120.0), i as f64 * 0.04);
    }

    let trail: Vec<Point2D> = state.trail(0).points().collect();
    assert_eq!(trail.len(), 5);
    assert_eq!(trail[0], Point2D::new(200.0, 200.0));
    assert_eq!(trail[4], Point2D::new(212.0, 200.0));

    let frame = state.frame();
    assert_eq!(frame.trails[0].len(), 5);
    assert_eq!(frame.bobs.len(), 2);
    assert_relative_eq!(frame.bobs[1].radius, 12.0);
}

#[test]
fn test_command_quiet_period() {
    let mut state = PendulumState::new(VisConfig::default());
    state.set_canvas_size(400.0, 300.0);

    feed_sample(&mut state, &coords(0.0, 50.0, 0.0, 120.0), 0.0);
    feed_sample(&mut state, &coords(5.0, 50.0, 5.0, 120.0), 0.04);
    assert_eq!(state.trail(0).len(), 2);

    state.apply_command(&ControlCommand::Reset, 1.0);
    assert!(state.trail(0).is_empty());
    assert!(state.trail(1).is_empty());
    assert!(state.frame().arms.is_empty());

    // Inside the quiet period: the snapshot is drawn but not recorded
    feed_sample(&mut state, &coords(0.0, 50.0, 0.0, 120.0), 1.2);
    assert!(state.trail(0).is_empty());
    assert_eq!(state.frame().arms.len(), 2);

    feed_sample(&mut state, &coords(1.0, 50.0, 1.0, 120.0), 1.5);
    assert_eq!(state.trail(0).len(), 1);
    assert_eq!(state.trail(1).len(), 1);
}

#[test]
fn test_trail_capacity_bounded() {
    let mut state = PendulumState::new(VisConfig::default());
    state.set_canvas_size(400.0, 300.0);

    for i in 0..350 {
        let x = i as f64;
        feed_sample(&mut state, &coords(x, 0.0, x, 10.0), i as f64 * 0.04);
    }

    assert_eq!(state.trail(0).len(), 300);
    // Oldest 50 evicted
    assert_eq!(
        state.trail(0).points().next(),
        Some(Point2D::new(200.0 + 50.0, 150.0))
    );
}

#[test]
fn test_feed_windows_bounded() {
    let mut state = PendulumState::new(VisConfig::default());
    state.set_canvas_size(400.0, 300.0);

    // One sample per emission period, so every sample after the first emits
    for i in 0..200 {
        let x = (i as f64 * 0.1).sin() * 50.0;
        feed_sample(&mut state, &coords(x, 80.0, x + 10.0, 160.0), i as f64 * 0.5);
    }

    let feed = state.feed();
    for quantity in Quantity::ALL {
        assert_eq!(feed.window(quantity).len(), 80, "{:?}", quantity);
    }
    assert_relative_eq!(feed.sim_time(), 99.5, epsilon = 1e-9);
    let last = feed
        .window(Quantity::AngularVelocity(1))
        .back()
        .expect("non-empty window");
    assert_eq!(last.label, "99.5");
}

#[test]
fn test_failed_polls_do_not_disturb_pipeline() {
    let mut state = PendulumState::new(VisConfig::default());
    state.set_canvas_size(400.0, 300.0);

    feed_sample(&mut state, &coords(0.0, 50.0, 0.0, 120.0), 0.0);
    assert!(!state.accept_poll(parse_snapshot("not json")));
    assert!(!state.accept_poll(parse_snapshot("[]")));
    assert!(!state.tick(0.04).new_sample);

    assert_eq!(state.trail(0).len(), 1);
    assert_eq!(state.frame().bobs.len(), 2);
    let stats = state.poll_stats();
    assert_eq!((stats.accepted, stats.failed), (1, 2));
}

#[test]
fn test_zoom_round_trip_at_cursor() {
    let mut vp = Viewport::default();
    let cursor = Point2D::new(120.0, 80.0);
    let world = vp.to_world(cursor);

    vp.zoom_at(cursor, 1.0);
    vp.zoom_at(cursor, 1.0);
    assert_relative_eq!(vp.zoom(), 1.21, epsilon = 1e-12);
    let back = vp.to_canvas(world);
    assert_relative_eq!(back.x, cursor.x, epsilon = 1e-9);
    assert_relative_eq!(back.y, cursor.y, epsilon = 1e-9);

    vp.zoom_at(cursor, -1.0);
    vp.zoom_at(cursor, -1.0);
    assert_relative_eq!(vp.zoom(), 1.0, epsilon = 1e-12);
    assert_relative_eq!(vp.offset().x, 0.0, epsilon = 1e-9);
    assert_relative_eq!(vp.offset().y, 0.0, epsilon = 1e-9);
}

#[test]
fn test_zoom_clamped_after_many_steps() {
    let mut vp = Viewport::default();
    for _ in 0..100 {
        vp.zoom_at(Point2D::new(10.0, 10.0), 1.0);
    }
    assert_relative_eq!(vp.zoom(), 5.0);
    for _ in 0..100 {
        vp.pinch(0.5);
    }
    assert_relative_eq!(vp.zoom(), 0.5);

    vp.reset();
    assert_eq!(vp.zoom(), 1.0);
    assert_eq!(vp.offset(), Point2D::ZERO);
}
