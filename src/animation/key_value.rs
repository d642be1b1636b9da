// ============================================================================
// jux-reactive - KeyValue
// One property's end value and easing inside one KeyFrame
// ============================================================================

use std::any::Any;
use std::rc::Rc;

use crate::animation::interpolator::{Interpolatable, Interpolator};
use crate::animation::track::{Track, TypedTrack};
use crate::error::{JuxError, Result};
use crate::primitives::property::Property;

/// Binds `target` to `end_value` for one KeyFrame.
///
/// The interpolator eases the segment that *ends* at this KeyValue.
pub struct KeyValue<T> {
    target: Property<T>,
    end_value: T,
    interpolator: Interpolator,
}

impl<T: Clone> Clone for KeyValue<T> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
            end_value: self.end_value.clone(),
            interpolator: self.interpolator.clone(),
        }
    }
}

impl<T: Interpolatable> KeyValue<T> {
    /// A linearly interpolated key value.
    pub fn new(target: &Property<T>, end_value: T) -> Self {
        Self::with_interpolator(target, end_value, Interpolator::LINEAR)
    }

    pub fn with_interpolator(target: &Property<T>, end_value: T, interpolator: Interpolator) -> Self {
        Self {
            target: target.clone(),
            end_value,
            interpolator,
        }
    }

    pub fn builder() -> KeyValueBuilder<T> {
        KeyValueBuilder {
            target: None,
            end_value: None,
            interpolator: Interpolator::LINEAR,
        }
    }

    pub fn target(&self) -> &Property<T> {
        &self.target
    }

    pub fn end_value(&self) -> &T {
        &self.end_value
    }

    pub fn interpolator(&self) -> &Interpolator {
        &self.interpolator
    }
}

/// Assembles a [`KeyValue`] whose parts arrive separately.
pub struct KeyValueBuilder<T> {
    target: Option<Property<T>>,
    end_value: Option<T>,
    interpolator: Interpolator,
}

impl<T: Interpolatable> KeyValueBuilder<T> {
    pub fn target(mut self, target: &Property<T>) -> Self {
        self.target = Some(target.clone());
        self
    }

    pub fn end_value(mut self, end_value: T) -> Self {
        self.end_value = Some(end_value);
        self
    }

    pub fn interpolator(mut self, interpolator: Interpolator) -> Self {
        self.interpolator = interpolator;
        self
    }

    /// Fails with `NullArgument` naming the first missing part.
    pub fn build(self) -> Result<KeyValue<T>> {
        let target = self.target.ok_or(JuxError::NullArgument { name: "target" })?;
        let end_value = self
            .end_value
            .ok_or(JuxError::NullArgument { name: "end_value" })?;
        Ok(KeyValue {
            target,
            end_value,
            interpolator: self.interpolator,
        })
    }
}

// =============================================================================
// TYPE ERASURE
// =============================================================================

/// A `KeyValue<T>` with its `T` erased so one KeyFrame can hold many types.
pub trait AnyKeyValue {
    /// Identity of the target property.
    fn target_key(&self) -> *const ();

    fn as_any(&self) -> &dyn Any;

    /// A fresh, empty track for this KeyValue's target.
    fn new_track(&self) -> Rc<dyn Track>;
}

impl<T: Interpolatable> AnyKeyValue for KeyValue<T> {
    fn target_key(&self) -> *const () {
        self.target.key()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn new_track(&self) -> Rc<dyn Track> {
        Rc::new(TypedTrack::new(self.target.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_requires_a_target() {
        let missing = KeyValue::<f64>::builder().end_value(1.0).build();
        assert_eq!(missing.err(), Some(JuxError::NullArgument { name: "target" }));

        let p = Property::new(0.0);
        let missing_end = KeyValue::builder().target(&p).build();
        assert_eq!(
            missing_end.err(),
            Some(JuxError::NullArgument { name: "end_value" })
        );

        let kv = KeyValue::builder()
            .target(&p)
            .end_value(5.0)
            .interpolator(Interpolator::EASE_IN)
            .build()
            .unwrap();
        assert_eq!(*kv.end_value(), 5.0);
        assert!(kv.target().ptr_eq(&p));
    }

    #[test]
    fn erased_key_value_downcasts_to_its_type() {
        let p = Property::new(1_i32);
        let kv: Rc<dyn AnyKeyValue> = Rc::new(KeyValue::new(&p, 9));
        assert_eq!(kv.target_key(), p.key());
        let typed = kv.as_any().downcast_ref::<KeyValue<i32>>().unwrap();
        assert_eq!(*typed.end_value(), 9);
        assert!(kv.as_any().downcast_ref::<KeyValue<f64>>().is_none());
    }
}
