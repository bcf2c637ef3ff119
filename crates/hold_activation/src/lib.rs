//! Pointer-hold activation core.
//!
//! [`HoldActivation`] turns raw pointer down/up edges plus a per-frame elapsed
//! time into at-most-once-per-engagement activation notifications. It knows
//! nothing about rendering, physics or scene graphs; an owning frame loop
//! feeds it and observers react.

mod group;
mod hold;
mod observer;

pub use group::*;
pub use hold::*;
pub use observer::*;
