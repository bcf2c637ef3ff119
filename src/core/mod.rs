pub mod config;
pub mod layer;
pub mod system;
