//! `use bevy_flowfield_provider::prelude::*;` to import common structures and methods
//!

#[doc(hidden)]
pub use crate::flowfields::{
	error::*,
	fields::{direction_field::*, distance_field::*, obstacle_field::*, *},
	grid::*,
	obstacles::*,
	utilities::*,
};

#[doc(hidden)]
pub use crate::{
	plugin::{refresh_layer::*, *},
	provider::*,
};
