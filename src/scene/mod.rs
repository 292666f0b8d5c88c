//! The scene graph of a loaded level, and everything needed to get there from a level name.
pub mod builder;
pub mod debug;
pub mod graph;
pub mod loader;
pub mod terrain;
