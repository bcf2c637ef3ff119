pub mod app;
pub mod core;
pub mod interaction;
pub mod stage;

// Curated re-exports
pub use app::editor::StageEditorPlugin;
pub use core::config::EditorConfig;
pub use hold_activation;
pub use interaction::input::pointer::PointerSignal;
pub use interaction::touchable::{TouchActivated, TouchArea, TouchDown, TouchEdge, TouchUp, Touchable, TouchablePlugin};
