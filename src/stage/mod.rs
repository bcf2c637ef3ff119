//! Stage editing: placing objects from storage, long-press edit menus, and
//! returning objects to storage.
pub mod data;
pub mod editing;
pub mod radial;
pub mod visuals;

pub use data::{PropStorage, StageObject, StageObjectData, StageObjectKind};
pub use editing::{
    EditMenuEvent, StageCommand, StageEditing, StageObjectPlaced, StageObjectStored, StagePlugin,
    SubfunctionAction, SubfunctionButton,
};
