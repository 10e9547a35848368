//! Integration tests for playback through the scheduler
//!
//! These tests verify that:
//! - Tweens evaluate to the expected values at fixed frame timestamps
//! - Looping, alternation and removal behave across frames
//! - Timelines place children at the requested offsets
//! - The value model and easing library hold their documented laws

use kinetic_animation::value::{decompose, recompose};
use kinetic_animation::{
    bezier, path, AnimationScheduler, AnimeParams, Easing, ElementTarget, ManualFrames,
    ObjectTarget, Point, Polyline, PropertyValue, Target, TimelineOffset,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn scheduler() -> AnimationScheduler {
    let scheduler = AnimationScheduler::new();
    scheduler.set_frame_source(Arc::new(ManualFrames::new()));
    scheduler
}

/// A linear 0 -> 100 tween is at 50 halfway through
#[test]
fn test_linear_tween_midpoint() {
    let scheduler = scheduler();
    let handle = scheduler.handle();
    let obj = Arc::new(ObjectTarget::new().with_field("value", 0));

    let anime = handle.animate(
        AnimeParams::new()
            .targets(obj.clone())
            .property("value", 100)
            .duration(1000.0)
            .easing(Easing::Linear),
    );

    handle.step(0.0);
    handle.step(500.0);
    assert_eq!(obj.number("value"), Some(50.0));
    assert_eq!(anime.progress(), 50.0);
    assert_eq!(anime.current_value("value").as_deref(), Some("50"));
}

/// Alternating over two loops ends where it started
#[test]
fn test_alternate_two_loops_returns_to_start() {
    let scheduler = scheduler();
    let handle = scheduler.handle();
    let obj = Arc::new(ObjectTarget::new().with_field("x", 0));

    let anime = handle.animate(
        AnimeParams::new()
            .targets(obj.clone())
            .property("x", 100)
            .duration(1000.0)
            .easing(Easing::Linear)
            .loop_count(2)
            .alternate(),
    );

    handle.step(0.0);
    handle.step(1000.0);
    assert_eq!(obj.number("x"), Some(100.0));
    assert!(!anime.is_completed());

    handle.step(1500.0);
    assert_eq!(obj.number("x"), Some(50.0));

    handle.step(2000.0);
    assert_eq!(obj.number("x"), Some(0.0));
    assert!(anime.is_completed());
    assert!(handle.running().is_empty());
}

/// Without a loop count, an alternating instance makes a single pass
#[test]
fn test_alternate_without_loop_count_plays_once() {
    let scheduler = scheduler();
    let handle = scheduler.handle();
    let obj = Arc::new(ObjectTarget::new().with_field("x", 0));

    let anime = handle.animate(
        AnimeParams::new()
            .targets(obj.clone())
            .property("x", 100)
            .duration(1000.0)
            .easing(Easing::Linear)
            .alternate(),
    );

    handle.step(0.0);
    handle.step(1000.0);
    assert!(anime.is_completed());
    assert_eq!(obj.number("x"), Some(100.0));

    handle.step(1500.0);
    assert_eq!(obj.number("x"), Some(100.0));
    assert!(handle.running().is_empty());
}

/// Replaying a finished alternating instance goes forward again
#[test]
fn test_alternate_replay_after_completion() {
    let scheduler = scheduler();
    let handle = scheduler.handle();
    let obj = Arc::new(ObjectTarget::new().with_field("x", 0));

    let anime = handle.animate(
        AnimeParams::new()
            .targets(obj.clone())
            .property("x", 100)
            .duration(100.0)
            .easing(Easing::Linear)
            .loop_count(2)
            .alternate(),
    );
    handle.step(0.0);
    handle.step(100.0);
    handle.step(200.0);
    assert!(anime.is_completed());

    anime.play();
    handle.step(300.0);
    handle.step(350.0);
    assert_eq!(obj.number("x"), Some(50.0));
    assert!(!anime.is_reversed());
}

/// Removing targets shrinks the instance, then pauses it once empty
#[test]
fn test_remove_targets_then_pause() {
    let scheduler = scheduler();
    let handle = scheduler.handle();
    let a = Arc::new(ObjectTarget::new().with_field("x", 0));
    let b = Arc::new(ObjectTarget::new().with_field("x", 0));
    let updates = Arc::new(AtomicUsize::new(0));
    let counter = updates.clone();

    let anime = handle.animate(
        AnimeParams::new()
            .targets(vec![a.clone() as Target, b.clone() as Target])
            .property("x", 100)
            .duration(1000.0)
            .easing(Easing::Linear)
            .on_update(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
    );
    assert_eq!(anime.animation_count(), 2);
    handle.step(0.0);
    handle.step(100.0);

    handle.remove(a.clone());
    assert_eq!(anime.animation_count(), 1);
    assert!(!anime.is_paused());

    handle.step(200.0);
    assert_eq!(a.number("x"), Some(10.0));
    assert_eq!(b.number("x"), Some(20.0));

    handle.remove(b.clone());
    assert_eq!(anime.animation_count(), 0);
    assert!(anime.is_paused());
    assert!(handle.running().is_empty());

    let before = updates.load(Ordering::SeqCst);
    handle.step(300.0);
    handle.step(400.0);
    assert_eq!(updates.load(Ordering::SeqCst), before);
    assert_eq!(b.number("x"), Some(20.0));
}

/// A `"+=100"` child starts 100ms after the previous child ends
#[test]
fn test_timeline_relative_offset() {
    let scheduler = scheduler();
    let handle = scheduler.handle();
    let obj = Arc::new(ObjectTarget::new().with_field("x", 0).with_field("y", 0));

    let tl = handle.timeline(AnimeParams::new().autoplay(false));
    let first = tl.add_params(
        AnimeParams::new().targets(obj.clone()).property("x", 10).duration(500.0),
        0.0,
    );
    let second = tl
        .add_at(
            AnimeParams::new().targets(obj.clone()).property("y", 10).duration(300.0),
            "+=100",
        )
        .unwrap();

    assert_eq!(tl.duration(), 900.0);

    // The second child is still at its start until 600ms
    tl.seek(600.0);
    assert_eq!(first.current_time(), 500.0);
    assert_eq!(second.current_time(), 0.0);
    tl.seek(750.0);
    assert_eq!(second.current_time(), 150.0);
    assert_eq!(obj.number("y"), Some(5.0));
    assert_eq!(TimelineOffset::Relative(100.0).resolve(500.0), 600.0);
}

/// Transform sub-properties of one target compose into one write per frame
#[test]
fn test_transforms_compose_per_frame() {
    let scheduler = scheduler();
    let handle = scheduler.handle();
    let el = Arc::new(ElementTarget::new());

    handle.animate(
        AnimeParams::new()
            .targets(el.clone())
            .property("translateX", 100)
            .property("rotate", PropertyValue::from_to(0, 90))
            .duration(1000.0)
            .easing(Easing::Linear),
    );
    let writes = el.transform_writes();
    handle.step(0.0);
    handle.step(500.0);

    assert_eq!(el.transform(), "translateX(50px) rotate(45deg)");
    assert_eq!(el.transform_writes(), writes + 2);
}

/// Path-progress values move a target along the sampled path
#[test]
fn test_motion_path_drives_translation() {
    let scheduler = scheduler();
    let handle = scheduler.handle();
    let el = Arc::new(ElementTarget::new());
    let corner = Arc::new(Polyline::new(vec![
        Point::new(0.0, 0.0),
        Point::new(100.0, 0.0),
        Point::new(100.0, 100.0),
    ]));
    let motion = path(corner, None);

    let anime = handle.animate(
        AnimeParams::new()
            .targets(el.clone())
            .property("translateX", motion.x())
            .property("translateY", motion.y())
            .duration(1000.0)
            .easing(Easing::Linear),
    );

    handle.step(0.0);
    handle.step(250.0);
    assert_eq!(el.transform(), "translateX(50px) translateY(0px)");

    handle.step(750.0);
    assert_eq!(el.transform(), "translateX(100px) translateY(50px)");

    handle.step(1000.0);
    assert_eq!(el.transform(), "translateX(100px) translateY(100px)");
    assert!(anime.is_completed());
}

/// Color styles interpolate per channel as integers
#[test]
fn test_color_style_tween() {
    let scheduler = scheduler();
    let handle = scheduler.handle();
    let el = Arc::new(ElementTarget::new().with_style("backgroundColor", "#FFF"));

    handle.animate(
        AnimeParams::new()
            .targets(el.clone())
            .property("backgroundColor", "#000")
            .duration(1000.0)
            .easing(Easing::Linear),
    );
    handle.step(0.0);
    handle.step(500.0);
    assert_eq!(el.style("background-color").as_deref(), Some("rgb(128,128,128)"));
}

#[test]
fn test_decompose_px_scenario() {
    let d = decompose("10px", None);
    assert_eq!(d.numbers.as_slice(), &[10.0]);
    assert_eq!(d.strings, vec!["".to_string(), "px".to_string()]);
    assert_eq!(recompose(&[10.0], &d.strings), "10px");
    assert_eq!(decompose(&d.recompose(), None), d);
}

#[test]
fn test_hex_color_channels() {
    let d = decompose("#FFF", None);
    assert_eq!(d.numbers.len(), 3);
    assert!(d.numbers.iter().all(|&c| c == 255.0));
}

#[test]
fn test_easing_endpoints() {
    for easing in Easing::ALL {
        let f = easing.resolve().unwrap();
        assert!(f.apply(0.0, 0.5).abs() < 1e-9, "{easing} at 0");
        assert!((f.apply(1.0, 0.5) - 1.0).abs() < 1e-9, "{easing} at 1");
    }
}

#[test]
fn test_linear_bezier_is_linear() {
    let curve = bezier(0.25, 0.25, 0.75, 0.75).unwrap();
    let linear = Easing::Linear.resolve().unwrap();
    for i in 0..=100 {
        let t = f64::from(i) / 100.0;
        assert!((curve.ease(t) - linear.apply(t, 0.5)).abs() < 1e-9);
    }
}

/// The global entry points fail cleanly before installation, then delegate
#[test]
fn test_global_scheduler() {
    assert!(matches!(
        kinetic_animation::animate(AnimeParams::new()),
        Err(kinetic_animation::Error::SchedulerNotInitialized)
    ));
    assert_eq!(kinetic_animation::speed(), 1.0);

    let scheduler = scheduler();
    kinetic_animation::set_global_scheduler(scheduler.handle());
    assert!(kinetic_animation::is_scheduler_initialized());

    let obj = Arc::new(ObjectTarget::new().with_field("x", 0));
    let anime = kinetic_animation::animate(
        AnimeParams::new()
            .targets(obj.clone())
            .property("x", 10)
            .duration(100.0)
            .easing(Easing::Linear),
    )
    .unwrap();
    kinetic_animation::set_speed(2.0);
    assert_eq!(kinetic_animation::speed(), 2.0);

    scheduler.step(0.0);
    scheduler.step(25.0);
    assert_eq!(obj.number("x"), Some(5.0));

    kinetic_animation::remove(obj.clone());
    assert!(anime.is_paused());
    assert!(kinetic_animation::timeline(AnimeParams::new()).is_ok());
}
