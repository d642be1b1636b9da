use jux_reactive::reactivity::ConcatPart;
use jux_reactive::{
    Binding, BooleanProperty, DoubleProperty, IntegerProperty, LongProperty, NumericKind,
    Property, StringProperty, binding, bindings,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn counted_sum(a: &IntegerProperty, b: &IntegerProperty) -> (Binding<i32>, Rc<Cell<u32>>) {
    let runs = Rc::new(Cell::new(0));
    let sum = Binding::with_dependencies(
        {
            let (a, b, runs) = (a.clone(), b.clone(), runs.clone());
            move || {
                runs.set(runs.get() + 1);
                a.get() + b.get()
            }
        },
        &[a.as_observable(), b.as_observable()],
    );
    (sum, runs)
}

#[test]
fn test_reading_twice_computes_once() {
    let a = IntegerProperty::new(1);
    let b = IntegerProperty::new(2);
    let (sum, runs) = counted_sum(&a, &b);

    assert_eq!(sum.get(), 3);
    assert_eq!(sum.get(), 3);
    assert_eq!(runs.get(), 1, "cached value should be reused");
}

#[test]
fn test_invalidations_coalesce_into_one_recompute() {
    let a = IntegerProperty::new(1);
    let b = IntegerProperty::new(2);
    let (sum, runs) = counted_sum(&a, &b);
    sum.get();

    a.set(10);
    a.set(11);
    b.set(12);
    assert_eq!(runs.get(), 1, "nothing is recomputed before a read");

    assert_eq!(sum.get(), 23);
    assert_eq!(runs.get(), 2);
    assert_eq!(sum.version(), 2);
}

#[test]
fn test_invalidation_fires_once_per_valid_to_invalid_transition() {
    let a = IntegerProperty::new(1);
    let b = IntegerProperty::new(2);
    let (sum, _) = counted_sum(&a, &b);
    let fired = Rc::new(Cell::new(0));
    sum.on_invalidated({
        let fired = fired.clone();
        move || fired.set(fired.get() + 1)
    });

    sum.get();
    a.set(5);
    a.set(6);
    assert_eq!(fired.get(), 1);

    sum.get();
    b.set(0);
    assert_eq!(fired.get(), 2);
}

#[test]
fn test_change_listener_sees_old_and_new() {
    let a = IntegerProperty::new(1);
    let b = IntegerProperty::new(2);
    let (sum, _) = counted_sum(&a, &b);
    let seen = Rc::new(RefCell::new(Vec::new()));
    sum.on_change({
        let seen = seen.clone();
        move |old, new| seen.borrow_mut().push((*old, *new))
    });

    a.set(4);
    sum.get();
    // Same result through a different route: no change event
    a.set(3);
    b.set(3);
    sum.get();

    assert_eq!(*seen.borrow(), vec![(3, 6)]);
}

#[test]
fn test_arithmetic_follows_its_operands() {
    let a = IntegerProperty::new(3);
    let b = IntegerProperty::new(7);
    let sum = bindings::add(&a, &b);
    assert_eq!(sum.int_value(), 10);

    a.set(20);
    assert_eq!(sum.int_value(), 27);
}

#[test]
fn test_division_truncates_for_integers_and_is_infinite_for_doubles() {
    let quotient = bindings::divide(&IntegerProperty::new(7), &IntegerProperty::new(2));
    assert_eq!(quotient.kind(), NumericKind::Integer);
    assert_eq!(quotient.int_value(), 3);

    let infinite = bindings::divide(&DoubleProperty::new(10.0), &DoubleProperty::new(0.0));
    assert!(infinite.double_value().is_infinite());
}

#[test]
fn test_numeric_promotion_picks_the_widest_kind() {
    let int = IntegerProperty::new(2);
    let long = LongProperty::new(5_000_000_000);
    let double = DoubleProperty::new(0.5);

    let wide = bindings::add(&int, &long);
    assert_eq!(wide.kind(), NumericKind::Long);
    assert_eq!(wide.long_value(), 5_000_000_002);

    let floating = bindings::multiply(&int, &double);
    assert_eq!(floating.kind(), NumericKind::Double);
    assert_eq!(floating.double_value(), 1.0);
}

#[test]
fn test_bindings_compose() {
    let price = DoubleProperty::new(10.0);
    let quantity = IntegerProperty::new(3);
    let total = bindings::multiply(&price, &quantity);
    let expensive = bindings::greater_than(&total, 25.0);
    let label = bindings::when(&expensive).then("expensive").otherwise("cheap");

    assert_eq!(label.get(), "expensive");
    quantity.set(2);
    assert_eq!(label.get(), "cheap");
}

#[test]
fn test_concat_reads_live_values() {
    let name = StringProperty::new(String::from("Ada"));
    let age = IntegerProperty::new(36);
    let text = bindings::concat([
        ConcatPart::from(&name),
        ConcatPart::from(" is "),
        ConcatPart::from(&age),
    ]);

    assert_eq!(text.get(), "Ada is 36");
    age.set(37);
    assert_eq!(text.get(), "Ada is 37");
    assert_eq!(bindings::string_length(&name).get(), 3);
}

#[test]
fn test_boolean_logic() {
    let a = BooleanProperty::new(true);
    let b = BooleanProperty::new(false);
    let both = bindings::and(&a, &b);
    let either = bindings::or(&a, &b);
    let neither = bindings::not(&either);

    assert!(!both.get());
    assert!(either.get());
    b.set(true);
    assert!(both.get());
    a.set(false);
    b.set(false);
    assert!(neither.get());
}

#[test]
fn test_nan_always_refires_change() {
    let value = DoubleProperty::new(f64::NAN);
    let changes = Rc::new(Cell::new(0));
    value.on_change({
        let changes = changes.clone();
        move |_, _| changes.set(changes.get() + 1)
    });

    value.set(f64::NAN);
    value.set(f64::NAN);
    assert_eq!(changes.get(), 2);
}

#[test]
fn test_listener_may_remove_itself_during_dispatch() {
    let source = Property::new(0);
    let calls = Rc::new(Cell::new(0));
    let id = Rc::new(Cell::new(None));
    let registered = source.on_change({
        let (source, calls, id) = (source.clone(), calls.clone(), id.clone());
        move |_, _| {
            calls.set(calls.get() + 1);
            if let Some(id) = id.get() {
                source.remove_change_listener(id);
            }
        }
    });
    id.set(Some(registered));

    source.set(1);
    source.set(2);
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_listener_may_write_back_into_the_graph() {
    let celsius = DoubleProperty::new(0.0);
    let fahrenheit = DoubleProperty::new(32.0);
    celsius.on_change({
        let fahrenheit = fahrenheit.clone();
        move |_, c| {
            fahrenheit.set(c * 9.0 / 5.0 + 32.0);
        }
    });

    celsius.set(100.0);
    assert_eq!(fahrenheit.get(), 212.0);
}

#[test]
fn test_dropped_binding_detaches_from_its_dependencies() {
    let source = IntegerProperty::new(1);
    {
        let doubled = binding!(source => source.get() * 2);
        assert_eq!(doubled.get(), 2);
        assert_eq!(source.inner().invalidation_listener_count(), 1);
    }
    assert_eq!(source.inner().invalidation_listener_count(), 0);
}

#[test]
fn test_dispose_runs_hook_and_stops_tracking() {
    let source = IntegerProperty::new(1);
    let doubled = binding!(source => source.get() * 2);
    let disposed = Rc::new(Cell::new(false));
    doubled.on_dispose({
        let disposed = disposed.clone();
        move || disposed.set(true)
    });

    doubled.dispose();
    assert!(disposed.get());
    assert!(doubled.dependencies().is_empty());
}
