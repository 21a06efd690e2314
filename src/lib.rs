//! A FlowField provider for crowds of agents heading to one shared
//! destination. A region of the world is divided into a grid of square cells,
//! a breadth-first distance field is flooded out from the destination around
//! impassable cells and every cell is given a unit vector pointing downhill.
//!
//! The [provider::FlowFieldProvider] can be driven by hand or, as a
//! [bevy::prelude::Component], refreshed by the [plugin::FlowFieldProviderPlugin]
//!

pub mod flowfields;
pub mod plugin;
pub mod provider;

pub mod prelude;
