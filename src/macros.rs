// ============================================================================
// jux-reactive - Ergonomic Macros
// ============================================================================

/// Clone handles into a move closure.
///
/// Properties, bindings and collections are `Rc` handles, so this is the
/// usual way to hand them to a listener.
///
/// # Usage
///
/// ```rust
/// use jux_reactive::{cloned, IntegerProperty};
///
/// let count = IntegerProperty::new(0);
/// let bump = cloned!(count => move || { count.update(|c| *c += 1); });
/// bump();
/// assert_eq!(count.get(), 1);
/// ```
#[macro_export]
macro_rules! cloned {
    ($($n:ident),+ => $e:expr) => {
        {
            $( let $n = $n.clone(); )+
            $e
        }
    };
}

/// Build a [`Binding`](crate::Binding) over the listed dependencies.
///
/// Each dependency is cloned into the compute closure and bound, so the
/// binding invalidates whenever one of them does.
///
/// # Usage
///
/// ```rust
/// use jux_reactive::{binding, DoubleProperty};
///
/// let width = DoubleProperty::new(2.0);
/// let height = DoubleProperty::new(3.0);
/// let area = binding!(width, height => width.get() * height.get());
///
/// assert_eq!(area.get(), 6.0);
/// width.set(4.0);
/// assert_eq!(area.get(), 12.0);
/// ```
#[macro_export]
macro_rules! binding {
    ($($deps:ident),+ => $body:expr) => {
        $crate::Binding::with_dependencies(
            $crate::cloned!($($deps),+ => move || $body),
            &[$($deps.as_observable()),+],
        )
    };
}

#[cfg(test)]
mod tests {
    use crate::{BooleanProperty, IntegerProperty, StringProperty};
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn binding_macro_tracks_every_dependency() {
        let name = StringProperty::new(String::from("ada"));
        let loud = BooleanProperty::new(false);
        let greeting = binding!(name, loud => {
            let name = name.get();
            if loud.get() { name.to_uppercase() } else { name }
        });

        assert_eq!(greeting.get(), "ada");
        loud.set(true);
        assert_eq!(greeting.get(), "ADA");
        name.set(String::from("grace"));
        assert_eq!(greeting.get(), "GRACE");
        assert_eq!(greeting.dependencies().len(), 2);
    }

    #[test]
    fn cloned_listener_keeps_its_own_handle() {
        let source = IntegerProperty::new(1);
        let seen = Rc::new(Cell::new(0));
        source.on_change(cloned!(seen => move |_, new| seen.set(*new)));

        source.set(5);
        assert_eq!(seen.get(), 5);
    }
}
