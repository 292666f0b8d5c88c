//! Per frame animation of placed objects.
//!
//! Layer containers may come with an [`controller::AnimationController`] that knows how the objects of
//! that container move over time (e.g. windmills, doors, floating crystals). The scene graph keeps a
//! binding to that controller on every node that can be animated, and the [`walker::AnimationWalker`]
//! evaluates all bindings once per frame, overwriting the node's local matrix in place.
pub mod controller;
pub mod timeline;
pub mod walker;
