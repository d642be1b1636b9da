// ============================================================================
// jux-reactive - Reactivity Module
// Combinators over the graph: operands, numeric promotion, the binding factory
// ============================================================================

pub mod bindings;
pub mod equality;
pub mod number;
pub mod operand;

pub use number::{Number, NumberBinding, NumberOperand, NumericKind};
pub use operand::{ConcatPart, Operand, TextValue};
