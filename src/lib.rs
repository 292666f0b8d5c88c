pub mod animation;
pub mod asset_graph;
pub mod common;
pub mod io;
pub mod loader;
pub mod scene;
pub mod settings;
