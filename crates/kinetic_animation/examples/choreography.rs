//! Choreography Demo
//!
//! Drives headless elements with a timeline on the background frame thread:
//! - A card slides in, then fades while a badge pops with an elastic curve
//! - A dot follows a motion path, staggered by index
//! - Frames are reported through `tracing`
//!
//! Run with: cargo run -p kinetic_animation --example choreography
//! Set RUST_LOG=kinetic_animation=trace to see every frame.

use anyhow::Result;
use kinetic_animation::{
    path, set_global_scheduler, AnimationScheduler, AnimeParams, Easing, ElementTarget,
    EngineConfig, Param, Point, Polyline, PropertyValue, Target, TimelineOffset,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = EngineConfig::from_toml_str(
        r#"
        duration = 600
        easing = "easeOutCubic"
        target_fps = 60
        "#,
    )?;
    let mut scheduler = AnimationScheduler::with_config(config);
    scheduler.start_background();
    set_global_scheduler(scheduler.handle());

    let card = Arc::new(
        ElementTarget::new()
            .with_style("opacity", "1")
            .with_style("backgroundColor", "#1e1e2e"),
    );
    let badge = Arc::new(ElementTarget::new());

    let done = Arc::new(AtomicBool::new(false));
    let finished = done.clone();
    let tl = kinetic_animation::timeline(
        AnimeParams::new()
            .autoplay(false)
            .on_complete(move |_| finished.store(true, Ordering::SeqCst)),
    )?;

    tl.add_params(
        AnimeParams::new()
            .targets(card.clone())
            .property("translateX", PropertyValue::from_to("-200px", 0))
            .easing(Easing::EaseOutExpo),
        TimelineOffset::After,
    );
    tl.add_at(
        AnimeParams::new()
            .targets(card.clone())
            .property("opacity", 0.4)
            .property("backgroundColor", "hsl(210, 60%, 40%)"),
        "+=100",
    )?;
    tl.add_at(
        AnimeParams::new()
            .targets(badge.clone())
            .property("scale", PropertyValue::sequence([0.0, 1.4, 1.0]))
            .property("rotate", "+=360deg")
            .easing(Easing::EaseOutElastic)
            .elasticity(300.0),
        "-=400",
    )?;

    // Dots travel a zig-zag path, each starting a little later
    let track = Arc::new(Polyline::new(vec![
        Point::new(0.0, 0.0),
        Point::new(100.0, 60.0),
        Point::new(200.0, 0.0),
        Point::new(300.0, 60.0),
    ]));
    let motion = path(track, None);
    let dots: Vec<Target> = (0..3)
        .map(|_| Arc::new(ElementTarget::new()) as Target)
        .collect();
    tl.add_params(
        AnimeParams::new()
            .targets(dots.clone())
            .property("translateX", motion.x())
            .property("translateY", motion.y())
            .property("rotate", motion.angle())
            .delay(Param::computed(|_, index, _| index as f64 * 120.0))
            .duration(1200.0)
            .round(10.0),
        0.0,
    );

    tracing::info!("timeline is {}ms long", tl.duration());
    tl.play();

    let started = Instant::now();
    while !done.load(Ordering::SeqCst) && started.elapsed() < Duration::from_secs(10) {
        std::thread::sleep(Duration::from_millis(250));
        tracing::info!(
            "{:>5.1}% card: {} opacity={} | badge: {}",
            tl.progress(),
            card.transform(),
            card.style("opacity").unwrap_or_default(),
            badge.transform(),
        );
    }

    tracing::info!(
        "done: card background {}",
        card.style("background-color").unwrap_or_default()
    );
    for (i, dot) in dots.iter().enumerate() {
        tracing::info!(
            "dot {} at {}",
            i,
            kinetic_animation::get_value(dot.as_ref(), "translateX").unwrap_or_default()
        );
    }

    scheduler.stop_background();
    Ok(())
}
