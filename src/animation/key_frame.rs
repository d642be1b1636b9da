// ============================================================================
// jux-reactive - KeyFrame
// A point on the timeline holding the KeyValues reached there
// ============================================================================

use std::fmt;
use std::rc::Rc;

use crate::animation::duration::Duration;
use crate::animation::interpolator::Interpolatable;
use crate::animation::key_value::{AnyKeyValue, KeyValue};
use crate::error::{JuxError, Result};

/// A time offset, the KeyValues reached at it, and an optional callback run
/// whenever the playhead crosses it.
#[derive(Clone)]
pub struct KeyFrame {
    time: Duration,
    values: Vec<Rc<dyn AnyKeyValue>>,
    on_finished: Option<Rc<dyn Fn()>>,
    name: Option<String>,
}

impl KeyFrame {
    /// An empty KeyFrame at `time`. The offset must be finite and not
    /// negative.
    pub fn new(time: Duration) -> Result<Self> {
        if !time.is_finite() || time.less_than(Duration::ZERO) {
            return Err(JuxError::illegal(format!(
                "key frame time must be finite and non-negative, got {time}"
            )));
        }
        Ok(Self {
            time,
            values: Vec::new(),
            on_finished: None,
            name: None,
        })
    }

    pub fn with_value<T: Interpolatable>(mut self, key_value: KeyValue<T>) -> Self {
        self.values.push(Rc::new(key_value));
        self
    }

    pub fn with_on_finished(mut self, f: impl Fn() + 'static) -> Self {
        self.on_finished = Some(Rc::new(f));
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn time(&self) -> Duration {
        self.time
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn values(&self) -> &[Rc<dyn AnyKeyValue>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn on_finished(&self) -> Option<Rc<dyn Fn()>> {
        self.on_finished.clone()
    }
}

impl fmt::Debug for KeyFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyFrame")
            .field("time", &self.time)
            .field("name", &self.name)
            .field("values", &self.values.len())
            .field("has_on_finished", &self.on_finished.is_some())
            .finish()
    }
}
