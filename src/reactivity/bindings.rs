// ============================================================================
// jux-reactive - Binding Factory
// Small ready-made bindings: arithmetic, comparison, logic, text, conditionals
// ============================================================================
//
// Every function here builds one `Binding` whose closure reads its operands
// and whose dependency list is exactly the non-constant operands. Operands
// are anything convertible into `Operand<T>` / `NumberOperand`: a constant,
// a `&Property<T>` or a `&Binding<T>`.
// ============================================================================

use std::hash::Hash;
use std::rc::Rc;

use crate::collections::{ObservableList, ObservableMap, ObservableSet};
use crate::core::observable::Observable;
use crate::primitives::binding::Binding;
use crate::reactivity::equality::{equals, equals_ignore_case, within_epsilon};
use crate::reactivity::number::{ArithOp, NumberBinding, NumberOperand, arithmetic, negation};
use crate::reactivity::operand::{ConcatPart, Operand, TextValue, dependencies_of};

// =============================================================================
// ARITHMETIC
// =============================================================================

/// `a + b`, promoted to the wider operand kind.
///
/// # Example
///
/// ```
/// use jux_reactive::{IntegerProperty, bindings};
///
/// let a = IntegerProperty::new(3);
/// let b = IntegerProperty::new(7);
/// let sum = bindings::add(&a, &b);
/// assert_eq!(sum.int_value(), 10);
///
/// a.set(20);
/// assert_eq!(sum.int_value(), 27);
/// ```
pub fn add(a: impl Into<NumberOperand>, b: impl Into<NumberOperand>) -> NumberBinding {
    arithmetic(ArithOp::Add, a.into(), b.into())
}

pub fn subtract(a: impl Into<NumberOperand>, b: impl Into<NumberOperand>) -> NumberBinding {
    arithmetic(ArithOp::Subtract, a.into(), b.into())
}

pub fn multiply(a: impl Into<NumberOperand>, b: impl Into<NumberOperand>) -> NumberBinding {
    arithmetic(ArithOp::Multiply, a.into(), b.into())
}

/// `a / b`. Integer kinds truncate toward zero and panic on a zero divisor
/// like native integer division; doubles follow IEEE (`x / 0.0` is infinite).
pub fn divide(a: impl Into<NumberOperand>, b: impl Into<NumberOperand>) -> NumberBinding {
    arithmetic(ArithOp::Divide, a.into(), b.into())
}

pub fn negate(a: impl Into<NumberOperand>) -> NumberBinding {
    negation(a.into())
}

pub fn min(a: impl Into<NumberOperand>, b: impl Into<NumberOperand>) -> NumberBinding {
    arithmetic(ArithOp::Min, a.into(), b.into())
}

pub fn max(a: impl Into<NumberOperand>, b: impl Into<NumberOperand>) -> NumberBinding {
    arithmetic(ArithOp::Max, a.into(), b.into())
}

// =============================================================================
// NUMERIC COMPARISONS
// =============================================================================

// Integer kinds compare exactly as i64; anything involving a double compares
// as f64 with IEEE semantics.
fn compare(
    a: NumberOperand,
    b: NumberOperand,
    integral: fn(i64, i64) -> bool,
    floating: fn(f64, f64) -> bool,
) -> Binding<bool> {
    let deps = dependencies_of([a.dependency(), b.dependency()]);
    if a.kind().promote(b.kind()).is_integral() {
        Binding::with_dependencies(move || integral(a.get().as_i64(), b.get().as_i64()), &deps)
    } else {
        Binding::with_dependencies(move || floating(a.get().as_f64(), b.get().as_f64()), &deps)
    }
}

pub fn equal(a: impl Into<NumberOperand>, b: impl Into<NumberOperand>) -> Binding<bool> {
    compare(a.into(), b.into(), |x, y| x == y, |x, y| x == y)
}

pub fn not_equal(a: impl Into<NumberOperand>, b: impl Into<NumberOperand>) -> Binding<bool> {
    compare(a.into(), b.into(), |x, y| x != y, |x, y| x != y)
}

/// `|a - b| <= epsilon`, evaluated in floating point. Pass
/// [`DEFAULT_EPSILON`](crate::constants::DEFAULT_EPSILON) when there is no
/// better tolerance.
pub fn equal_with_epsilon(
    a: impl Into<NumberOperand>,
    b: impl Into<NumberOperand>,
    epsilon: f64,
) -> Binding<bool> {
    let (a, b) = (a.into(), b.into());
    let deps = dependencies_of([a.dependency(), b.dependency()]);
    Binding::with_dependencies(
        move || within_epsilon(a.get().as_f64(), b.get().as_f64(), epsilon),
        &deps,
    )
}

pub fn not_equal_with_epsilon(
    a: impl Into<NumberOperand>,
    b: impl Into<NumberOperand>,
    epsilon: f64,
) -> Binding<bool> {
    not(&equal_with_epsilon(a, b, epsilon))
}

pub fn less_than(a: impl Into<NumberOperand>, b: impl Into<NumberOperand>) -> Binding<bool> {
    compare(a.into(), b.into(), |x, y| x < y, |x, y| x < y)
}

pub fn greater_than(a: impl Into<NumberOperand>, b: impl Into<NumberOperand>) -> Binding<bool> {
    compare(a.into(), b.into(), |x, y| x > y, |x, y| x > y)
}

pub fn less_than_or_equal(
    a: impl Into<NumberOperand>,
    b: impl Into<NumberOperand>,
) -> Binding<bool> {
    compare(a.into(), b.into(), |x, y| x <= y, |x, y| x <= y)
}

pub fn greater_than_or_equal(
    a: impl Into<NumberOperand>,
    b: impl Into<NumberOperand>,
) -> Binding<bool> {
    compare(a.into(), b.into(), |x, y| x >= y, |x, y| x >= y)
}

// =============================================================================
// GENERIC EQUALITY
// =============================================================================

/// `a == b` for any `PartialEq` operands.
pub fn equal_values<T: Clone + PartialEq + 'static>(
    a: impl Into<Operand<T>>,
    b: impl Into<Operand<T>>,
) -> Binding<bool> {
    let (a, b) = (a.into(), b.into());
    let deps = dependencies_of([a.dependency(), b.dependency()]);
    Binding::with_dependencies(move || equals(&a.get(), &b.get()), &deps)
}

pub fn not_equal_values<T: Clone + PartialEq + 'static>(
    a: impl Into<Operand<T>>,
    b: impl Into<Operand<T>>,
) -> Binding<bool> {
    let (a, b) = (a.into(), b.into());
    let deps = dependencies_of([a.dependency(), b.dependency()]);
    Binding::with_dependencies(move || !equals(&a.get(), &b.get()), &deps)
}

pub fn equal_ignore_case(
    a: impl Into<Operand<String>>,
    b: impl Into<Operand<String>>,
) -> Binding<bool> {
    let (a, b) = (a.into(), b.into());
    let deps = dependencies_of([a.dependency(), b.dependency()]);
    Binding::with_dependencies(move || equals_ignore_case(&a.get(), &b.get()), &deps)
}

// =============================================================================
// BOOLEAN LOGIC
// =============================================================================

pub fn and(a: impl Into<Operand<bool>>, b: impl Into<Operand<bool>>) -> Binding<bool> {
    let (a, b) = (a.into(), b.into());
    let deps = dependencies_of([a.dependency(), b.dependency()]);
    Binding::with_dependencies(move || a.get() && b.get(), &deps)
}

pub fn or(a: impl Into<Operand<bool>>, b: impl Into<Operand<bool>>) -> Binding<bool> {
    let (a, b) = (a.into(), b.into());
    let deps = dependencies_of([a.dependency(), b.dependency()]);
    Binding::with_dependencies(move || a.get() || b.get(), &deps)
}

pub fn not(a: impl Into<Operand<bool>>) -> Binding<bool> {
    let a = a.into();
    let deps = dependencies_of([a.dependency()]);
    Binding::with_dependencies(move || !a.get(), &deps)
}

// =============================================================================
// TEXT
// =============================================================================

/// Join the rendered parts. No parts yields `""`.
///
/// # Example
///
/// ```
/// use jux_reactive::{IntegerProperty, bindings};
/// use jux_reactive::reactivity::operand::ConcatPart;
///
/// let count = IntegerProperty::new(2);
/// let label = bindings::concat([ConcatPart::text("items: "), (&count).into()]);
/// assert_eq!(label.get(), "items: 2");
/// count.set(5);
/// assert_eq!(label.get(), "items: 5");
/// ```
pub fn concat(parts: impl IntoIterator<Item = ConcatPart>) -> Binding<String> {
    let parts: Vec<ConcatPart> = parts.into_iter().collect();
    let deps = dependencies_of(parts.iter().map(|part| part.dependency.clone()));
    Binding::with_dependencies(
        move || parts.iter().map(|part| (part.read)()).collect::<String>(),
        &deps,
    )
}

/// Render any operand as text.
pub fn convert<T: TextValue + Clone + PartialEq + 'static>(
    operand: impl Into<Operand<T>>,
) -> Binding<String> {
    let operand = operand.into();
    let deps = dependencies_of([operand.dependency()]);
    Binding::with_dependencies(move || operand.get().to_text(), &deps)
}

/// Length in characters.
pub fn string_length(operand: impl Into<Operand<String>>) -> Binding<i32> {
    let operand = operand.into();
    let deps = dependencies_of([operand.dependency()]);
    Binding::with_dependencies(
        move || i32::try_from(operand.get().chars().count()).unwrap_or(i32::MAX),
        &deps,
    )
}

pub fn is_empty_string(operand: impl Into<Operand<String>>) -> Binding<bool> {
    let operand = operand.into();
    let deps = dependencies_of([operand.dependency()]);
    Binding::with_dependencies(move || operand.get().is_empty(), &deps)
}

// =============================================================================
// CONDITIONAL
// =============================================================================

/// Start a `when(cond).then(a).otherwise(b)` binding.
///
/// Both branches stay bound, so a change in either branch invalidates the
/// result even while the other branch is selected.
///
/// # Example
///
/// ```
/// use jux_reactive::{BooleanProperty, bindings};
///
/// let online = BooleanProperty::new(false);
/// let status = bindings::when(&online).then("up").otherwise("down");
/// assert_eq!(status.get(), "down");
/// online.set(true);
/// assert_eq!(status.get(), "up");
/// ```
pub fn when(condition: impl Into<Operand<bool>>) -> When {
    When {
        condition: condition.into(),
    }
}

/// First stage of a conditional binding.
pub struct When {
    condition: Operand<bool>,
}

impl When {
    pub fn then<T: Clone + PartialEq + 'static>(self, value: impl Into<Operand<T>>) -> Then<T> {
        Then {
            condition: self.condition,
            then: value.into(),
        }
    }
}

/// Second stage of a conditional binding.
pub struct Then<T> {
    condition: Operand<bool>,
    then: Operand<T>,
}

impl<T: Clone + PartialEq + 'static> Then<T> {
    pub fn otherwise(self, value: impl Into<Operand<T>>) -> Binding<T> {
        let Then { condition, then } = self;
        let otherwise = value.into();
        let deps = dependencies_of([
            condition.dependency(),
            then.dependency(),
            otherwise.dependency(),
        ]);
        Binding::with_dependencies(
            move || {
                if condition.get() {
                    then.get()
                } else {
                    otherwise.get()
                }
            },
            &deps,
        )
    }
}

// =============================================================================
// ESCAPE HATCHES
// =============================================================================

/// A binding over an arbitrary closure with an explicit dependency list.
pub fn create_binding<T: Clone + PartialEq + 'static>(
    compute: impl Fn() -> T + 'static,
    dependencies: &[Rc<dyn Observable>],
) -> Binding<T> {
    Binding::with_dependencies(compute, dependencies)
}

pub fn create_boolean_binding(
    compute: impl Fn() -> bool + 'static,
    dependencies: &[Rc<dyn Observable>],
) -> Binding<bool> {
    create_binding(compute, dependencies)
}

pub fn create_integer_binding(
    compute: impl Fn() -> i32 + 'static,
    dependencies: &[Rc<dyn Observable>],
) -> Binding<i32> {
    create_binding(compute, dependencies)
}

pub fn create_long_binding(
    compute: impl Fn() -> i64 + 'static,
    dependencies: &[Rc<dyn Observable>],
) -> Binding<i64> {
    create_binding(compute, dependencies)
}

pub fn create_double_binding(
    compute: impl Fn() -> f64 + 'static,
    dependencies: &[Rc<dyn Observable>],
) -> Binding<f64> {
    create_binding(compute, dependencies)
}

pub fn create_string_binding(
    compute: impl Fn() -> String + 'static,
    dependencies: &[Rc<dyn Observable>],
) -> Binding<String> {
    create_binding(compute, dependencies)
}

pub fn create_object_binding<T: Clone + PartialEq + 'static>(
    compute: impl Fn() -> T + 'static,
    dependencies: &[Rc<dyn Observable>],
) -> Binding<T> {
    create_binding(compute, dependencies)
}

// =============================================================================
// COLLECTIONS
// =============================================================================

/// Number of elements in `list`, updated on every mutation.
pub fn size<E: Clone + 'static>(list: &ObservableList<E>) -> Binding<i32> {
    let source = list.clone();
    Binding::with_dependencies(
        move || i32::try_from(source.len()).unwrap_or(i32::MAX),
        &[list.as_observable()],
    )
}

/// The element at `index`, or `None` while the list is too short.
pub fn value_at<E: Clone + PartialEq + 'static>(
    list: &ObservableList<E>,
    index: usize,
) -> Binding<Option<E>> {
    let source = list.clone();
    Binding::with_dependencies(move || source.get(index).ok(), &[list.as_observable()])
}

pub fn map_size<K, V>(map: &ObservableMap<K, V>) -> Binding<i32>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + PartialEq + 'static,
{
    let source = map.clone();
    Binding::with_dependencies(
        move || i32::try_from(source.len()).unwrap_or(i32::MAX),
        &[map.as_observable()],
    )
}

pub fn set_size<E: Eq + Hash + Clone + 'static>(set: &ObservableSet<E>) -> Binding<i32> {
    let source = set.clone();
    Binding::with_dependencies(
        move || i32::try_from(source.len()).unwrap_or(i32::MAX),
        &[set.as_observable()],
    )
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::property::{
        BooleanProperty, DoubleProperty, IntegerProperty, LongProperty, StringProperty,
    };
    use crate::reactivity::number::{Number, NumericKind};

    #[test]
    fn integer_add_tracks_operands() {
        let a = IntegerProperty::new(3);
        let b = IntegerProperty::new(7);
        let sum = add(&a, &b);
        assert_eq!(sum.kind(), NumericKind::Integer);
        assert_eq!(sum.int_value(), 10);
        a.set(20);
        assert_eq!(sum.int_value(), 27);
    }

    #[test]
    fn integer_division_truncates() {
        let quotient = divide(&IntegerProperty::new(7), &IntegerProperty::new(2));
        assert_eq!(quotient.get(), Number::Integer(3));
        let negative = divide(-7_i32, 2_i32);
        assert_eq!(negative.int_value(), -3);
    }

    #[test]
    fn double_division_by_zero_is_infinite() {
        let quotient = divide(&DoubleProperty::new(10.0), &DoubleProperty::new(0.0));
        assert!(quotient.double_value().is_infinite());
    }

    #[test]
    fn constant_in_either_position() {
        let x = IntegerProperty::new(10);
        assert_eq!(subtract(&x, 4_i32).int_value(), 6);
        assert_eq!(subtract(4_i32, &x).int_value(), -6);
    }

    #[test]
    fn mixing_in_a_double_promotes() {
        let x = IntegerProperty::new(3);
        let half = multiply(&x, 0.5_f64);
        assert_eq!(half.kind(), NumericKind::Double);
        assert_eq!(half.double_value(), 1.5);

        let big = add(&x, &LongProperty::new(1));
        assert_eq!(big.kind(), NumericKind::Long);
    }

    #[test]
    fn negate_min_max() {
        let x = DoubleProperty::new(2.5);
        assert_eq!(negate(&x).double_value(), -2.5);
        assert_eq!(min(&x, 1.0_f64).double_value(), 1.0);
        assert_eq!(max(3_i32, 9_i32).int_value(), 9);
    }

    #[test]
    fn comparisons() {
        let a = IntegerProperty::new(1);
        let b = DoubleProperty::new(1.0);
        let eq = equal(&a, &b);
        let lt = less_than(&a, &b);
        let ge = greater_than_or_equal(&a, &b);
        assert!(eq.get());
        assert!(!lt.get());
        assert!(ge.get());

        b.set(1.5);
        assert!(!eq.get());
        assert!(lt.get());
        assert!(less_than_or_equal(&a, &b).get());
        assert!(!greater_than(&a, &b).get());
        assert!(not_equal(&a, &b).get());
    }

    #[test]
    fn epsilon_equality() {
        let a = DoubleProperty::new(1.0);
        let close = equal_with_epsilon(&a, 1.05_f64, 0.1);
        assert!(close.get());
        a.set(1.2);
        assert!(!close.get());
        assert!(not_equal_with_epsilon(&a, 1.0_f64, 0.1).get());

        a.set(0.1 + 0.2);
        assert!(equal_with_epsilon(&a, 0.3_f64, crate::constants::DEFAULT_EPSILON).get());
    }

    #[test]
    fn nan_is_never_equal() {
        let a = DoubleProperty::new(f64::NAN);
        assert!(!equal(&a, &a).get());
        assert!(not_equal(&a, f64::NAN).get());
    }

    #[test]
    fn boolean_logic() {
        let a = BooleanProperty::new(true);
        let b = BooleanProperty::new(false);
        let both = and(&a, &b);
        let either = or(&a, &b);
        let neither = not(&either);
        assert!(!both.get());
        assert!(either.get());
        assert!(!neither.get());

        a.set(false);
        assert!(neither.get());
    }

    #[test]
    fn concat_renders_null_and_literals() {
        let name: crate::primitives::property::Property<Option<String>> =
            crate::primitives::property::Property::new(None);
        let greeting = concat([ConcatPart::text("hi "), (&name).into()]);
        assert_eq!(greeting.get(), "hi null");

        name.set(Some("ada".into()));
        assert_eq!(greeting.get(), "hi ada");
        assert_eq!(concat(Vec::new()).get(), "");
    }

    #[test]
    fn concat_binds_only_observable_parts() {
        let n = IntegerProperty::new(1);
        let text = concat(["n=".into(), (&n).into(), ConcatPart::of(2.5_f64)]);
        assert_eq!(text.dependencies().len(), 1);
        assert_eq!(text.get(), "n=12.5");
    }

    #[test]
    fn when_then_otherwise_tracks_all_branches() {
        let flag = BooleanProperty::new(true);
        let yes = StringProperty::new("yes".into());
        let choice = when(&flag).then(&yes).otherwise("no");

        assert_eq!(choice.get(), "yes");
        yes.set("YES".into());
        assert_eq!(choice.get(), "YES");
        flag.set(false);
        assert_eq!(choice.get(), "no");
    }

    #[test]
    fn string_helpers() {
        let s = StringProperty::new(String::new());
        let len = string_length(&s);
        let empty = is_empty_string(&s);
        assert_eq!(len.get(), 0);
        assert!(empty.get());

        s.set("héllo".into());
        assert_eq!(len.get(), 5);
        assert!(!empty.get());
        assert!(equal_ignore_case(&s, "HÉLLO").get());
        assert_eq!(convert(&IntegerProperty::new(4)).get(), "4");
    }

    #[test]
    fn generic_value_equality() {
        let a = crate::primitives::property::Property::new(vec![1, 2]);
        let same = equal_values(&a, Operand::value(vec![1, 2]));
        let differs = not_equal_values(&a, Operand::value(vec![1, 2]));
        assert!(same.get());
        a.set(vec![3]);
        assert!(!same.get());
        assert!(differs.get());
    }

    #[test]
    fn escape_hatch_uses_explicit_dependencies() {
        let a = IntegerProperty::new(2);
        let squared = create_integer_binding(
            {
                let a = a.clone();
                move || a.get() * a.get()
            },
            &[a.as_observable()],
        );
        assert_eq!(squared.get(), 4);
        a.set(3);
        assert_eq!(squared.get(), 9);

        let label = create_string_binding(|| "fixed".to_string(), &[]);
        assert_eq!(label.get(), "fixed");
    }

    #[test]
    fn collection_sizes() {
        let list = ObservableList::from_vec(vec![1, 2]);
        let len = size(&list);
        let second = value_at(&list, 1);
        assert_eq!(len.get(), 2);
        assert_eq!(second.get(), Some(2));

        list.remove_at(0).unwrap();
        assert_eq!(len.get(), 1);
        assert_eq!(second.get(), None);

        let set = ObservableSet::new();
        let count = set_size(&set);
        set.insert("x").unwrap();
        assert_eq!(count.get(), 1);

        let map = ObservableMap::new();
        let entries = map_size(&map);
        map.insert(1, "one").unwrap();
        assert_eq!(entries.get(), 1);
    }
}
