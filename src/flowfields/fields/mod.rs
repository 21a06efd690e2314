//! The kinds of fields used by the algorithm
//!

pub mod direction_field;
pub mod distance_field;
pub mod obstacle_field;

use crate::prelude::*;
use bevy::prelude::*;

/// Defines required access to field arrays
pub trait Field<T> {
	/// Get a reference to the dense field array, indexed by [FieldDimensions::get_index]
	fn get(&self) -> &[T];
	/// Get the dimensions the field was sized for
	fn get_dimensions(&self) -> FieldDimensions;
	/// Retrieve a field cell value
	fn get_field_cell_value(&self, field_cell: FieldCell) -> T;
	/// Set a field cell to a value
	fn set_field_cell_value(&mut self, value: T, field_cell: FieldCell);
}

/// ID of a cell within a field, `(column, row)` measured from the
/// bottom-left corner of the grid
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash, Reflect)]
pub struct FieldCell((usize, usize));

impl FieldCell {
	/// Create a new instance of [FieldCell]
	pub fn new(column: usize, row: usize) -> Self {
		FieldCell((column, row))
	}
	/// Get the `(column, row)` tuple
	pub fn get_column_row(&self) -> (usize, usize) {
		self.0
	}
	/// Get the column
	pub fn get_column(&self) -> usize {
		self.0 .0
	}
	/// Get the row
	pub fn get_row(&self) -> usize {
		self.0 .1
	}
}

/// The number of columns and rows of every field belonging to a provider.
/// Fixed for the lifetime of the provider
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash, Reflect)]
pub struct FieldDimensions {
	/// Count of cells along `x`
	columns: usize,
	/// Count of cells along `z`
	rows: usize,
}

impl FieldDimensions {
	/// Create a new instance of [FieldDimensions]
	pub fn new(columns: usize, rows: usize) -> Self {
		FieldDimensions { columns, rows }
	}
	pub fn get_columns(&self) -> usize {
		self.columns
	}
	pub fn get_rows(&self) -> usize {
		self.rows
	}
	/// Total number of cells
	pub fn len(&self) -> usize {
		self.columns * self.rows
	}
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
	/// Whether the cell lies within `[0, columns) x [0, rows)`
	pub fn contains(&self, field_cell: FieldCell) -> bool {
		field_cell.get_column() < self.columns && field_cell.get_row() < self.rows
	}
	/// Flattened index of a cell, `column * rows + row`. Two cells with the
	/// same coordinates always share an index
	pub fn get_index(&self, field_cell: FieldCell) -> usize {
		field_cell.get_column() * self.rows + field_cell.get_row()
	}
	/// Inverse of [FieldDimensions::get_index]
	pub fn get_field_cell(&self, index: usize) -> FieldCell {
		FieldCell::new(index / self.rows, index % self.rows)
	}
	/// The neighbour one step away in the direction of `ordinal`, or [None]
	/// if that would leave the grid
	pub fn step(&self, field_cell: FieldCell, ordinal: Ordinal) -> Option<FieldCell> {
		let (d_column, d_row) = ordinal.offset();
		let column = field_cell.get_column().checked_add_signed(d_column as isize)?;
		let row = field_cell.get_row().checked_add_signed(d_row as isize)?;
		let neighbour = FieldCell::new(column, row);
		if self.contains(neighbour) {
			Some(neighbour)
		} else {
			None
		}
	}
	/// Based on a cells `(column, row)` position find its in-bounds
	/// orthogonal neighbours (up to 4) in [Ordinal::FLOOD_ORDER]
	pub fn get_orthogonal_neighbours(&self, field_cell: FieldCell) -> [Option<FieldCell>; 4] {
		Ordinal::FLOOD_ORDER.map(|ordinal| self.step(field_cell, ordinal))
	}
	/// Iterate over every cell in index order
	pub fn iter_cells(&self) -> impl Iterator<Item = FieldCell> + '_ {
		(0..self.len()).map(|index| self.get_field_cell(index))
	}
}
