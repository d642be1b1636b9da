use approx::assert_abs_diff_eq;
use jux_reactive::animation::{
    AnimationStatus, Duration, FadeTransition, FrameScheduler, Interpolator, KeyFrame, KeyValue,
    Node, Timeline, VirtualFrameScheduler, default_scheduler, set_default_scheduler,
};
use jux_reactive::{BooleanProperty, DoubleProperty, IntegerProperty, StringProperty, bindings};
use std::cell::Cell;
use std::rc::Rc;

fn install_virtual_clock() -> Rc<VirtualFrameScheduler> {
    let clock = Rc::new(VirtualFrameScheduler::new());
    set_default_scheduler(clock.clone());
    clock
}

#[test]
fn test_single_key_frame_reaches_end_value_and_finishes_once() {
    let clock = install_virtual_clock();
    let x = DoubleProperty::new(0.0);
    let finished = Rc::new(Cell::new(0));

    let timeline = Timeline::new([KeyFrame::new(Duration::millis(1000.0))
        .unwrap()
        .with_value(KeyValue::new(&x, 100.0))]);
    timeline.set_on_finished({
        let finished = finished.clone();
        move || finished.set(finished.get() + 1)
    });

    timeline.play();
    assert!(clock.run_until_idle(2000.0), "timeline should stop requesting frames");

    assert_abs_diff_eq!(x.get(), 100.0, epsilon = 0.01);
    assert_eq!(finished.get(), 1);
    assert_eq!(timeline.status(), AnimationStatus::Stopped);
}

#[test]
fn test_default_scheduler_seam_is_used_by_new_timelines() {
    let clock = install_virtual_clock();
    let shared: Rc<dyn FrameScheduler> = clock.clone();
    assert!(Rc::ptr_eq(&default_scheduler(), &shared));

    let timeline = Timeline::new([KeyFrame::new(Duration::millis(50.0)).unwrap()]);
    timeline.play();
    assert!(clock.has_pending());
    timeline.stop();
    assert!(!clock.has_pending());
}

#[test]
fn test_integers_round_and_strings_snap() {
    let clock = Rc::new(VirtualFrameScheduler::with_frame_interval(100.0).unwrap());
    let count = IntegerProperty::new(0);
    let label = StringProperty::new(String::from("start"));
    let timeline = Timeline::with_scheduler(
        [KeyFrame::new(Duration::millis(400.0))
            .unwrap()
            .with_value(KeyValue::new(&count, 3))
            .with_value(KeyValue::new(&label, String::from("end")))],
        clock.clone(),
    );

    timeline.play();
    clock.tick(); // elapsed 0
    clock.tick(); // elapsed 100: 0.75 rounds to 1
    assert_eq!(count.get(), 1);
    assert_eq!(label.get(), "start");

    clock.run_until_idle(1000.0);
    assert_eq!(count.get(), 3);
    assert_eq!(label.get(), "end");
}

#[test]
fn test_overshooting_curve_does_not_snap_objects_early() {
    let clock = Rc::new(VirtualFrameScheduler::with_frame_interval(100.0).unwrap());
    let flag = BooleanProperty::new(false);
    let label = StringProperty::new(String::from("start"));
    let timeline = Timeline::with_scheduler(
        [KeyFrame::new(Duration::millis(1000.0))
            .unwrap()
            .with_value(KeyValue::with_interpolator(&flag, true, Interpolator::OVERSHOOT))
            .with_value(KeyValue::with_interpolator(
                &label,
                String::from("end"),
                Interpolator::OVERSHOOT,
            ))],
        clock.clone(),
    );

    timeline.play();
    clock.tick(); // elapsed 0
    for _ in 0..7 {
        clock.tick();
    }
    // The curve is already past 1 at 0.7
    assert!(Interpolator::OVERSHOOT.curve(0.7) > 1.0);
    assert!(!flag.get());
    assert_eq!(label.get(), "start");

    clock.run_until_idle(1000.0);
    assert!(flag.get());
    assert_eq!(label.get(), "end");
}

#[test]
fn test_bindings_follow_an_animated_property() {
    let clock = Rc::new(VirtualFrameScheduler::with_frame_interval(100.0).unwrap());
    let width = DoubleProperty::new(10.0);
    let area = bindings::multiply(&width, &width);
    let timeline = Timeline::with_scheduler(
        [KeyFrame::new(Duration::millis(200.0))
            .unwrap()
            .with_value(KeyValue::with_interpolator(&width, 20.0, Interpolator::LINEAR))],
        clock.clone(),
    );

    timeline.play();
    clock.tick();
    clock.tick();
    assert_abs_diff_eq!(area.double_value(), 225.0, epsilon = 1e-9);
    clock.run_until_idle(1000.0);
    assert_abs_diff_eq!(area.double_value(), 400.0, epsilon = 1e-9);
}

#[test]
fn test_playhead_is_observable() {
    let clock = Rc::new(VirtualFrameScheduler::with_frame_interval(100.0).unwrap());
    let timeline = Timeline::with_scheduler(
        [KeyFrame::new(Duration::millis(300.0)).unwrap()],
        clock.clone(),
    );
    let at_end = bindings::create_boolean_binding(
        {
            let playhead = timeline.current_time_property();
            move || playhead.get() == Duration::millis(300.0)
        },
        &[timeline.current_time_property().as_observable()],
    );

    timeline.play();
    clock.tick();
    assert!(!at_end.get());
    clock.run_until_idle(1000.0);
    assert!(at_end.get());
}

#[test]
fn test_fade_resolves_from_the_live_value() {
    let clock = Rc::new(VirtualFrameScheduler::with_frame_interval(100.0).unwrap());
    let node = Node::new();
    let fade = FadeTransition::new(Duration::millis(200.0))
        .node(&node)
        .to_value(0.0)
        .scheduler(clock.clone());

    node.opacity.set(0.5);
    fade.play().unwrap();
    clock.tick();
    assert_abs_diff_eq!(node.opacity.get(), 0.5, epsilon = 1e-9);
    clock.run_until_idle(1000.0);
    assert_abs_diff_eq!(node.opacity.get(), 0.0);

    // Replaying starts from wherever the node is now
    node.opacity.set(0.25);
    let fade = fade.to_value(1.0);
    fade.play().unwrap();
    clock.tick();
    assert_abs_diff_eq!(node.opacity.get(), 0.25, epsilon = 1e-9);
    clock.run_until_idle(1000.0);
    assert_abs_diff_eq!(node.opacity.get(), 1.0);
}
