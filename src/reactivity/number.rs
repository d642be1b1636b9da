// ============================================================================
// jux-reactive - Numeric Promotion
// Integer/Long/Double tags resolved when a binding is built
// ============================================================================
//
// Arithmetic bindings pick their result type from the operand types once, at
// construction. Two integer operands give an integer binding, an integer and
// a long give a long binding, and anything involving a double gives a double
// binding. Nothing is inspected at runtime.
// ============================================================================

use std::rc::Rc;

use crate::core::listener::ListenerId;
use crate::core::observable::Observable;
use crate::primitives::binding::Binding;
use crate::primitives::property::Property;
use crate::reactivity::operand::{Operand, dependencies_of};

// =============================================================================
// KIND + VALUE
// =============================================================================

/// The numeric type of an operand or binding, ordered by promotion rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumericKind {
    Integer,
    Long,
    Double,
}

impl NumericKind {
    /// The kind an expression over `self` and `other` produces.
    pub fn promote(self, other: NumericKind) -> NumericKind {
        self.max(other)
    }

    /// Whether values of this kind are whole numbers.
    pub fn is_integral(self) -> bool {
        self != NumericKind::Double
    }
}

/// A value read from a numeric operand or binding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i32),
    Long(i64),
    Double(f64),
}

impl Number {
    pub fn kind(&self) -> NumericKind {
        match self {
            Number::Integer(_) => NumericKind::Integer,
            Number::Long(_) => NumericKind::Long,
            Number::Double(_) => NumericKind::Double,
        }
    }

    /// Narrowing conversions truncate the same way an `as` cast does.
    pub fn as_i32(&self) -> i32 {
        match *self {
            Number::Integer(v) => v,
            Number::Long(v) => v as i32,
            Number::Double(v) => v as i32,
        }
    }

    pub fn as_i64(&self) -> i64 {
        match *self {
            Number::Integer(v) => i64::from(v),
            Number::Long(v) => v,
            Number::Double(v) => v as i64,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Integer(v) => f64::from(v),
            Number::Long(v) => v as f64,
            Number::Double(v) => v,
        }
    }
}

// =============================================================================
// NUMBER OPERAND
// =============================================================================

/// A numeric input of an arithmetic or comparison binding.
#[derive(Clone)]
pub enum NumberOperand {
    Integer(Operand<i32>),
    Long(Operand<i64>),
    Double(Operand<f64>),
}

impl NumberOperand {
    pub fn kind(&self) -> NumericKind {
        match self {
            NumberOperand::Integer(_) => NumericKind::Integer,
            NumberOperand::Long(_) => NumericKind::Long,
            NumberOperand::Double(_) => NumericKind::Double,
        }
    }

    /// Read the operand's current value.
    pub fn get(&self) -> Number {
        match self {
            NumberOperand::Integer(op) => Number::Integer(op.get()),
            NumberOperand::Long(op) => Number::Long(op.get()),
            NumberOperand::Double(op) => Number::Double(op.get()),
        }
    }

    pub fn dependency(&self) -> Option<Rc<dyn Observable>> {
        match self {
            NumberOperand::Integer(op) => op.dependency(),
            NumberOperand::Long(op) => op.dependency(),
            NumberOperand::Double(op) => op.dependency(),
        }
    }
}

macro_rules! number_operand_from {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for NumberOperand {
            fn from(value: $ty) -> Self {
                NumberOperand::$variant(Operand::Value(value))
            }
        }

        impl From<&Property<$ty>> for NumberOperand {
            fn from(property: &Property<$ty>) -> Self {
                NumberOperand::$variant(Operand::from(property))
            }
        }

        impl From<&Binding<$ty>> for NumberOperand {
            fn from(binding: &Binding<$ty>) -> Self {
                NumberOperand::$variant(Operand::from(binding))
            }
        }

        impl From<Operand<$ty>> for NumberOperand {
            fn from(operand: Operand<$ty>) -> Self {
                NumberOperand::$variant(operand)
            }
        }
    };
}

number_operand_from!(Integer, i32);
number_operand_from!(Long, i64);
number_operand_from!(Double, f64);

impl From<&NumberBinding> for NumberOperand {
    fn from(binding: &NumberBinding) -> Self {
        match binding {
            NumberBinding::Integer(b) => NumberOperand::Integer(Operand::from(b)),
            NumberBinding::Long(b) => NumberOperand::Long(Operand::from(b)),
            NumberBinding::Double(b) => NumberOperand::Double(Operand::from(b)),
        }
    }
}

// =============================================================================
// NUMBER BINDING
// =============================================================================

/// The result of an arithmetic factory: a binding of the promoted kind.
///
/// # Example
///
/// ```
/// use jux_reactive::{IntegerProperty, bindings};
///
/// let a = IntegerProperty::new(7);
/// let b = IntegerProperty::new(2);
/// let quotient = bindings::divide(&a, &b);
/// assert_eq!(quotient.int_value(), 3);
/// ```
#[derive(Clone)]
pub enum NumberBinding {
    Integer(Binding<i32>),
    Long(Binding<i64>),
    Double(Binding<f64>),
}

impl NumberBinding {
    pub fn kind(&self) -> NumericKind {
        match self {
            NumberBinding::Integer(_) => NumericKind::Integer,
            NumberBinding::Long(_) => NumericKind::Long,
            NumberBinding::Double(_) => NumericKind::Double,
        }
    }

    pub fn get(&self) -> Number {
        match self {
            NumberBinding::Integer(b) => Number::Integer(b.get()),
            NumberBinding::Long(b) => Number::Long(b.get()),
            NumberBinding::Double(b) => Number::Double(b.get()),
        }
    }

    pub fn int_value(&self) -> i32 {
        self.get().as_i32()
    }

    pub fn long_value(&self) -> i64 {
        self.get().as_i64()
    }

    pub fn double_value(&self) -> f64 {
        self.get().as_f64()
    }

    pub fn is_valid(&self) -> bool {
        match self {
            NumberBinding::Integer(b) => b.is_valid(),
            NumberBinding::Long(b) => b.is_valid(),
            NumberBinding::Double(b) => b.is_valid(),
        }
    }

    pub fn invalidate(&self) {
        match self {
            NumberBinding::Integer(b) => b.invalidate(),
            NumberBinding::Long(b) => b.invalidate(),
            NumberBinding::Double(b) => b.invalidate(),
        }
    }

    pub fn version(&self) -> u64 {
        match self {
            NumberBinding::Integer(b) => b.version(),
            NumberBinding::Long(b) => b.version(),
            NumberBinding::Double(b) => b.version(),
        }
    }

    pub fn dispose(&self) {
        match self {
            NumberBinding::Integer(b) => b.dispose(),
            NumberBinding::Long(b) => b.dispose(),
            NumberBinding::Double(b) => b.dispose(),
        }
    }

    pub fn on_invalidated(&self, f: impl Fn() + 'static) -> ListenerId {
        match self {
            NumberBinding::Integer(b) => b.on_invalidated(f),
            NumberBinding::Long(b) => b.on_invalidated(f),
            NumberBinding::Double(b) => b.on_invalidated(f),
        }
    }

    /// Register a change callback receiving `(old, new)` as [`Number`]s.
    pub fn on_change(&self, f: impl Fn(Number, Number) + 'static) -> ListenerId {
        match self {
            NumberBinding::Integer(b) => {
                b.on_change(move |old, new| f(Number::Integer(*old), Number::Integer(*new)))
            }
            NumberBinding::Long(b) => {
                b.on_change(move |old, new| f(Number::Long(*old), Number::Long(*new)))
            }
            NumberBinding::Double(b) => {
                b.on_change(move |old, new| f(Number::Double(*old), Number::Double(*new)))
            }
        }
    }

    pub fn as_observable(&self) -> Rc<dyn Observable> {
        match self {
            NumberBinding::Integer(b) => b.as_observable(),
            NumberBinding::Long(b) => b.as_observable(),
            NumberBinding::Double(b) => b.as_observable(),
        }
    }

    pub fn as_integer(&self) -> Option<&Binding<i32>> {
        match self {
            NumberBinding::Integer(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<&Binding<i64>> {
        match self {
            NumberBinding::Long(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<&Binding<f64>> {
        match self {
            NumberBinding::Double(b) => Some(b),
            _ => None,
        }
    }
}

impl std::fmt::Debug for NumberBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumberBinding::Integer(b) => f.debug_tuple("Integer").field(b).finish(),
            NumberBinding::Long(b) => f.debug_tuple("Long").field(b).finish(),
            NumberBinding::Double(b) => f.debug_tuple("Double").field(b).finish(),
        }
    }
}

// =============================================================================
// ARITHMETIC
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArithOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Min,
    Max,
}

impl ArithOp {
    // Integer ops wrap on overflow. Division by zero panics.
    fn apply_i32(self, a: i32, b: i32) -> i32 {
        match self {
            ArithOp::Add => a.wrapping_add(b),
            ArithOp::Subtract => a.wrapping_sub(b),
            ArithOp::Multiply => a.wrapping_mul(b),
            ArithOp::Divide => a.wrapping_div(b),
            ArithOp::Min => a.min(b),
            ArithOp::Max => a.max(b),
        }
    }

    fn apply_i64(self, a: i64, b: i64) -> i64 {
        match self {
            ArithOp::Add => a.wrapping_add(b),
            ArithOp::Subtract => a.wrapping_sub(b),
            ArithOp::Multiply => a.wrapping_mul(b),
            ArithOp::Divide => a.wrapping_div(b),
            ArithOp::Min => a.min(b),
            ArithOp::Max => a.max(b),
        }
    }

    fn apply_f64(self, a: f64, b: f64) -> f64 {
        match self {
            ArithOp::Add => a + b,
            ArithOp::Subtract => a - b,
            ArithOp::Multiply => a * b,
            ArithOp::Divide => a / b,
            // NaN on either side propagates
            ArithOp::Min => {
                if a.is_nan() || b.is_nan() {
                    f64::NAN
                } else {
                    a.min(b)
                }
            }
            ArithOp::Max => {
                if a.is_nan() || b.is_nan() {
                    f64::NAN
                } else {
                    a.max(b)
                }
            }
        }
    }
}

/// Build a binary arithmetic binding of the promoted kind.
pub(crate) fn arithmetic(op: ArithOp, a: NumberOperand, b: NumberOperand) -> NumberBinding {
    let deps = dependencies_of([a.dependency(), b.dependency()]);
    match a.kind().promote(b.kind()) {
        NumericKind::Integer => NumberBinding::Integer(Binding::with_dependencies(
            move || op.apply_i32(a.get().as_i32(), b.get().as_i32()),
            &deps,
        )),
        NumericKind::Long => NumberBinding::Long(Binding::with_dependencies(
            move || op.apply_i64(a.get().as_i64(), b.get().as_i64()),
            &deps,
        )),
        NumericKind::Double => NumberBinding::Double(Binding::with_dependencies(
            move || op.apply_f64(a.get().as_f64(), b.get().as_f64()),
            &deps,
        )),
    }
}

/// Build a negation binding of the operand's own kind.
pub(crate) fn negation(a: NumberOperand) -> NumberBinding {
    let deps = dependencies_of([a.dependency()]);
    match a.kind() {
        NumericKind::Integer => NumberBinding::Integer(Binding::with_dependencies(
            move || a.get().as_i32().wrapping_neg(),
            &deps,
        )),
        NumericKind::Long => NumberBinding::Long(Binding::with_dependencies(
            move || a.get().as_i64().wrapping_neg(),
            &deps,
        )),
        NumericKind::Double => {
            NumberBinding::Double(Binding::with_dependencies(move || -a.get().as_f64(), &deps))
        }
    }
}
