// ============================================================================
// jux-reactive - Observable Properties, Bindings and Animation for Rust
// ============================================================================
//
// A single-threaded, synchronous dependency graph: Property leaves, lazily
// recomputed Binding nodes, observable collections that describe every
// mutation, and a keyframe animation engine driven by a pluggable frame
// scheduler.
// ============================================================================

//! Observable properties, lazy bindings, observable collections and
//! keyframe animation.
//!
//! ```
//! use jux_reactive::{bindings, IntegerProperty};
//!
//! let a = IntegerProperty::new(3);
//! let b = IntegerProperty::new(7);
//! let sum = bindings::add(&a, &b);
//! assert_eq!(sum.int_value(), 10);
//!
//! a.set(20);
//! assert_eq!(sum.int_value(), 27);
//! ```
//!
//! Collections report structural changes:
//!
//! ```
//! use jux_reactive::collections::{self, ObservableList};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let list: ObservableList<&str> = ["gamma", "alpha", "delta", "beta"].into_iter().collect();
//! let events = Rc::new(Cell::new(0));
//! list.on_change({
//!     let events = events.clone();
//!     move |change| {
//!         assert!(change.next());
//!         assert!(change.was_permutated());
//!         events.set(events.get() + 1);
//!     }
//! });
//!
//! collections::sort(&list).unwrap();
//! assert_eq!(list.to_vec(), ["alpha", "beta", "delta", "gamma"]);
//! assert_eq!(events.get(), 1);
//! ```

mod macros;

pub mod animation;
pub mod collections;
pub mod core;
pub mod error;
pub mod primitives;
pub mod reactivity;

// Re-export core items at crate root
pub use core::constants;
pub use core::listener::ListenerId;
pub use core::observable::{ChangeListener, InvalidationListener, Observable, ObservableValue};

pub use error::{JuxError, Result};

// Re-export primitives at crate root
pub use primitives::binding::Binding;
pub use primitives::property::{
    BooleanProperty, DoubleProperty, IntegerProperty, LongProperty, Property, StringProperty,
};

// The factory is used as a namespace: `bindings::add(&a, &b)`
pub use reactivity::bindings;
pub use reactivity::{Number, NumberBinding, NumberOperand, NumericKind, Operand};

// Re-export the collection types
pub use collections::{ObservableList, ObservableMap, ObservableSet};

// =============================================================================
// TESTS
// =============================================================================
