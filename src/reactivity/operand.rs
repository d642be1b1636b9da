// ============================================================================
// jux-reactive - Operands
// Constants or observables feeding the binding factory
// ============================================================================

use std::rc::Rc;

use crate::core::observable::{Observable, ObservableValue};
use crate::primitives::binding::Binding;
use crate::primitives::property::Property;

// =============================================================================
// OPERAND<T>
// =============================================================================

/// One input of a factory binding: either a constant or an observable.
pub enum Operand<T> {
    /// A literal that never changes
    Value(T),

    /// A live observable plus the type-erased handle used to bind to it
    Observable {
        source: Rc<dyn ObservableValue<T>>,
        dependency: Rc<dyn Observable>,
    },
}

impl<T: Clone> Clone for Operand<T> {
    fn clone(&self) -> Self {
        match self {
            Operand::Value(value) => Operand::Value(value.clone()),
            Operand::Observable { source, dependency } => Operand::Observable {
                source: Rc::clone(source),
                dependency: Rc::clone(dependency),
            },
        }
    }
}

impl<T: Clone + PartialEq + 'static> Operand<T> {
    /// Wrap a constant.
    pub fn value(value: T) -> Self {
        Operand::Value(value)
    }

    /// Read the operand's current value.
    pub fn get(&self) -> T {
        match self {
            Operand::Value(value) => value.clone(),
            Operand::Observable { source, .. } => source.value(),
        }
    }

    /// The observable to bind to, if the operand is not a constant.
    pub fn dependency(&self) -> Option<Rc<dyn Observable>> {
        match self {
            Operand::Value(_) => None,
            Operand::Observable { dependency, .. } => Some(Rc::clone(dependency)),
        }
    }
}

impl<T: Clone + PartialEq + 'static> From<&Property<T>> for Operand<T> {
    fn from(property: &Property<T>) -> Self {
        Operand::Observable {
            source: property.as_value(),
            dependency: property.as_observable(),
        }
    }
}

impl<T: Clone + PartialEq + 'static> From<&Binding<T>> for Operand<T> {
    fn from(binding: &Binding<T>) -> Self {
        Operand::Observable {
            source: binding.as_value(),
            dependency: binding.as_observable(),
        }
    }
}

macro_rules! constant_operand {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Operand<$ty> {
                fn from(value: $ty) -> Self {
                    Operand::Value(value)
                }
            }
        )+
    };
}

constant_operand!(bool, i32, i64, f64, String);

impl From<&str> for Operand<String> {
    fn from(value: &str) -> Self {
        Operand::Value(value.to_string())
    }
}

/// Collect the dependencies of several operands.
pub(crate) fn dependencies_of(
    deps: impl IntoIterator<Item = Option<Rc<dyn Observable>>>,
) -> Vec<Rc<dyn Observable>> {
    deps.into_iter().flatten().collect()
}

// =============================================================================
// TEXT RENDERING
// =============================================================================

/// How a value is rendered by `concat` and `convert`.
///
/// `None` renders as the literal text `null`.
pub trait TextValue {
    fn to_text(&self) -> String;
}

macro_rules! display_text {
    ($($ty:ty),+) => {
        $(
            impl TextValue for $ty {
                fn to_text(&self) -> String {
                    self.to_string()
                }
            }
        )+
    };
}

display_text!(String, &'static str, char, bool, i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl TextValue for f64 {
    fn to_text(&self) -> String {
        // Debug keeps the fractional part: 1.0 renders as "1.0"
        format!("{self:?}")
    }
}

impl TextValue for f32 {
    fn to_text(&self) -> String {
        format!("{self:?}")
    }
}

impl<T: TextValue> TextValue for Option<T> {
    fn to_text(&self) -> String {
        match self {
            Some(value) => value.to_text(),
            None => "null".to_string(),
        }
    }
}

/// One piece of a `concat` binding.
#[derive(Clone)]
pub struct ConcatPart {
    pub(crate) read: Rc<dyn Fn() -> String>,
    pub(crate) dependency: Option<Rc<dyn Observable>>,
}

impl ConcatPart {
    /// A literal piece of text.
    pub fn text(text: impl Into<String>) -> Self {
        let text: String = text.into();
        Self {
            read: Rc::new(move || text.clone()),
            dependency: None,
        }
    }

    /// Any operand rendered through [`TextValue`].
    pub fn of<T>(operand: impl Into<Operand<T>>) -> Self
    where
        T: TextValue + Clone + PartialEq + 'static,
    {
        let operand: Operand<T> = operand.into();
        let dependency = operand.dependency();
        Self {
            read: Rc::new(move || operand.get().to_text()),
            dependency,
        }
    }
}

impl From<&str> for ConcatPart {
    fn from(text: &str) -> Self {
        ConcatPart::text(text)
    }
}

impl From<String> for ConcatPart {
    fn from(text: String) -> Self {
        ConcatPart::text(text)
    }
}

impl<T: TextValue + Clone + PartialEq + 'static> From<&Property<T>> for ConcatPart {
    fn from(property: &Property<T>) -> Self {
        ConcatPart::of::<T>(property)
    }
}

impl<T: TextValue + Clone + PartialEq + 'static> From<&Binding<T>> for ConcatPart {
    fn from(binding: &Binding<T>) -> Self {
        ConcatPart::of::<T>(binding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_operand_has_no_dependency() {
        let op = Operand::value(3);
        assert_eq!(op.get(), 3);
        assert!(op.dependency().is_none());
    }

    #[test]
    fn property_operand_reads_live_value() {
        let p = Property::new(1_i64);
        let op = Operand::from(&p);
        p.set(7);
        assert_eq!(op.get(), 7);
        assert!(op.dependency().is_some());
    }

    #[test]
    fn option_renders_null() {
        assert_eq!(None::<i32>.to_text(), "null");
        assert_eq!(Some(4).to_text(), "4");
        assert_eq!(1.0_f64.to_text(), "1.0");
    }
}
