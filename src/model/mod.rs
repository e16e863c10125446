//! Dynamic value model for the diff engine.
//!
//! The engine compares arbitrary in-memory values, so the crate defines a
//! closed [`Value`] enum covering the runtime shapes the engine dispatches
//! on. Containers are shared (`Rc`) and interior-mutable so cyclic graphs
//! can be built and compared; identity for cycle tracking is the allocation
//! pointer.

mod shape;
mod value;

pub use shape::Shape;
pub use value::{
    same_value, ArrayRef, FuncValue, MapRef, ObjectRef, ObjectValue, RegexFlags, RegexValue,
    SetRef, Value,
};
