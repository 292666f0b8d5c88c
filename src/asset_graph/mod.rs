//! This module contains the dependency graph of a level: which files have to be loaded to show it,
//! and the store that makes sure every one of them is only fetched and parsed once.
//!
//! A level consists of a terrain (a grid of plates, each backed by a model), and a fixed set of root
//! layer containers. Layer containers place objects: models, textures, and other layer containers
//! ("shared groups", think prefabs). The latter is what makes loading interesting: what a nested
//! container references is only known once it has been fetched and parsed, and nesting is unbounded
//! (and may even be cyclic). The [`resolver::DependencyResolver`] thus discovers the graph pass by
//! pass, until a pass does not yield any new container (the fixed point). Models, materials and
//! textures form a fixed three level chain after that and are loaded in one pass each.
//!
//! Every pass fans out into many concurrent loads, and many of them share references (the same rock,
//! the same material, the same texture). Deduplication happens in the [`store::AssetStore`]: whoever
//! asks for a path first registers an in-flight load for it _before_ the fetch starts, and everyone
//! else awaits that same load. The result is stored behind an [`std::sync::Arc`], so two references
//! to the same path always end up pointing at the very same instance.
//!
//! Failures are contained per path: a missing or broken model only means that one model is not
//! drawn. Only transport errors (the archive itself is unreachable) abort the load.
//!
//! Entries are never evicted, the store lives as long as the loaded scene. Loading another scene
//! starts over with a fresh store.
pub mod resolver;
pub mod store;
