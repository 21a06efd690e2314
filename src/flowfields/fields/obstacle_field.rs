//! The ObstacleField is a sparse mapping of the field cells which cannot be
//! traversed. A cell absent from the mapping is open ground. An entry with
//! the value `255` is strictly forbidden from being used in a pathing
//! calculation (effectively saying there is a wall or cliff there).
//!
//! An example of the cells marked in a `10x10` grid:
//!
//! ```text
//!  _____________________________
//! |__|__|__|__|__|__|__|__|__|__|
//! |__|__|__|__|__|x_|x_|x_|x_|x_|
//! |__|__|__|__|__|__|__|x_|x_|__|
//! |__|__|__|__|__|__|__|__|__|__|
//! |__|__|__|__|__|__|__|__|__|__|
//! |__|__|__|__|__|__|__|__|__|__|
//! |__|__|__|__|x_|__|__|__|__|__|
//! |__|__|__|__|x_|__|__|__|__|__|
//! |__|__|__|__|x_|x_|__|__|__|__|
//! |__|__|__|__|x_|x_|x_|__|__|__|
//! ```
//!
//! An [ObstacleField] is only ever replaced wholesale by a fresh scan of an
//! [crate::prelude::ObstacleSource], it is never merged into.
//!

use std::collections::HashMap;

use crate::prelude::*;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObstacleField(HashMap<FieldCell, u8>);

impl ObstacleField {
	/// Get a reference to the underlying mapping
	pub fn get(&self) -> &HashMap<FieldCell, u8> {
		&self.0
	}
	/// Mark a field cell as impassable
	pub fn insert_blocked(&mut self, field_cell: FieldCell) {
		self.0.insert(field_cell, IMPASSABLE);
	}
	/// Whether the field cell is marked as impassable
	pub fn is_blocked(&self, field_cell: FieldCell) -> bool {
		self.0.get(&field_cell) == Some(&IMPASSABLE)
	}
	/// Iterate over the impassable field cells
	pub fn iter_blocked(&self) -> impl Iterator<Item = FieldCell> + '_ {
		self.0
			.iter()
			.filter(|(_, value)| **value == IMPASSABLE)
			.map(|(cell, _)| *cell)
	}
	/// Number of entries
	pub fn len(&self) -> usize {
		self.0.len()
	}
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl FromIterator<FieldCell> for ObstacleField {
	fn from_iter<I: IntoIterator<Item = FieldCell>>(iter: I) -> Self {
		let mut field = ObstacleField::default();
		for cell in iter {
			field.insert_blocked(cell);
		}
		field
	}
}
