/// Festival identifiers and the seasonal layer sets they stand for.
pub mod festivals;
/// Layer containers: the placed objects of a level, grouped into (festival dependent) layers.
pub mod layout;
/// The parsed, renderer agnostic representation of models, materials, textures and terrain.
pub mod types;
