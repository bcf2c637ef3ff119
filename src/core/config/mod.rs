pub mod config;

pub use config::{EditorConfig, RadialMenuConfig, ScriptedPress, SessionConfig, StageConfig, TouchConfig, WindowConfig};
