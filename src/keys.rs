//! Keybind input core: physical-key canonicalization, the binding table,
//! and the modifier-gated keydown hot path.

pub mod bindings;
pub mod gate;
pub mod layout;

pub use bindings::{Binding, BindingTable};
pub use gate::{KeyDisposition, KeyGate};
pub use layout::{canonical_key, KeyInput};
