//! Central system ordering labels to make the per-frame interaction sequence explicit.
//! Stages (within `Update`, chained):
//! 1. Collect (raw mouse / touch edges -> `PointerSignal`)
//! 2. Dispatch (pointer signals -> touchable down / up)
//! 3. Tick (hold time accumulation, activation)
//! 4. React (stage editing, menus, storage)
use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum TouchSet {
    Collect,
    Dispatch,
    Tick,
    React,
}
