//! A [DirectionField] is a 2D array of unit vectors derived from a
//! [DistanceField]. Each cell points at whichever of its 8 neighbours has
//! the smallest recorded distance, a steering pipeline/character controller
//! should read the vector of the cell an actor stands in to provide
//! movement.
//!
//! Neighbours are inspected clockwise starting East, see
//! [Ordinal::SCAN_ORDER]. A neighbour only replaces the current choice when
//! it is strictly cheaper, so ties go to the earliest neighbour in that
//! order. Unreached neighbours (`-1`) are never chosen and blocked
//! neighbours (`i32::MAX`) never compare as cheaper. Blocked cells,
//! unreached cells and cells with no usable neighbour hold [Vec2::ZERO].
//!
//! ```text
//!  _____________________________
//! |     |     |     |     |     |
//! |  ↘  |  ↘  |  ↓  |  ↙  |  ↙  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  ↘  |  ↘  |  ↓  |  ↙  |  ↙  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  →  |  →  |  →  |  ←  |  ←  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  ↗  |  ↗  |  ↑  |  ↖  |  ↖  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  ↗  |  ↗  |  ↑  |  ↖  |  ↖  |
//! |_____|_____|_____|_____|_____|
//! ```
//!

use crate::prelude::*;
use bevy::prelude::*;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DirectionField {
	/// Size of the grid
	dimensions: FieldDimensions,
	/// Direction of each cell, indexed by [FieldDimensions::get_index]
	vectors: Vec<Vec2>,
}

impl Field<Vec2> for DirectionField {
	/// Get a reference to the field array
	fn get(&self) -> &[Vec2] {
		&self.vectors
	}
	fn get_dimensions(&self) -> FieldDimensions {
		self.dimensions
	}
	/// Retrieve a field cell value
	fn get_field_cell_value(&self, field_cell: FieldCell) -> Vec2 {
		if !self.dimensions.contains(field_cell) {
			panic!("Cannot get a DirectionField value, index out of bounds. Asked for column {}, row {}, field column length is {}, field row length is {}", field_cell.get_column(), field_cell.get_row(), self.dimensions.get_columns(), self.dimensions.get_rows())
		}
		self.vectors[self.dimensions.get_index(field_cell)]
	}
	/// Set a field cell to a value
	fn set_field_cell_value(&mut self, value: Vec2, field_cell: FieldCell) {
		if !self.dimensions.contains(field_cell) {
			panic!("Cannot set a DirectionField value, index out of bounds. Asked for column {}, row {}, field column length is {}, field row length is {}", field_cell.get_column(), field_cell.get_row(), self.dimensions.get_columns(), self.dimensions.get_rows())
		}
		let index = self.dimensions.get_index(field_cell);
		self.vectors[index] = value;
	}
}

impl DirectionField {
	/// Creates a new [DirectionField] where every cell is [Vec2::ZERO]
	pub fn new(dimensions: FieldDimensions) -> Self {
		DirectionField {
			dimensions,
			vectors: vec![Vec2::ZERO; dimensions.len()],
		}
	}
	/// Calculate the direction of every cell from a [DistanceField],
	/// resizing to its dimensions when needed
	pub fn calculate(&mut self, distance_field: &DistanceField) {
		let dimensions = distance_field.get_dimensions();
		if self.dimensions != dimensions || self.vectors.len() != dimensions.len() {
			*self = DirectionField::new(dimensions);
		}
		for index in 0..dimensions.len() {
			let field_cell = dimensions.get_field_cell(index);
			let ordinal = steepest_descent(field_cell, distance_field);
			self.vectors[index] = ordinal.unit_vector();
		}
	}
	/// Create a [DirectionField] from a [DistanceField]
	pub fn from_distance_field(distance_field: &DistanceField) -> Self {
		let mut field = DirectionField::new(distance_field.get_dimensions());
		field.calculate(distance_field);
		field
	}
}

/// Find the [Ordinal] of the cheapest neighbour of `field_cell`, or
/// [Ordinal::Zero] when the cell is blocked, unreached or has no neighbour
/// with a real distance
pub fn steepest_descent(field_cell: FieldCell, distance_field: &DistanceField) -> Ordinal {
	let current = distance_field.get_field_cell_value(field_cell);
	if current == DISTANCE_BLOCKED || current == DISTANCE_UNREACHED {
		return Ordinal::Zero;
	}
	let dimensions = distance_field.get_dimensions();
	let mut cheapest_value = DISTANCE_BLOCKED;
	let mut cheapest_ordinal = Ordinal::Zero;
	for ordinal in Ordinal::SCAN_ORDER {
		if let Some(neighbour) = dimensions.step(field_cell, ordinal) {
			let neighbour_distance = distance_field.get_field_cell_value(neighbour);
			if neighbour_distance != DISTANCE_UNREACHED && neighbour_distance < cheapest_value {
				cheapest_value = neighbour_distance;
				cheapest_ordinal = ordinal;
			}
		}
	}
	cheapest_ordinal
}

// #[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;

	/// Build both fields for a grid in one go
	fn fields(
		dimensions: FieldDimensions,
		obstacles: &ObstacleField,
		destination: FieldCell,
	) -> (DistanceField, DirectionField) {
		let (distance, _) = DistanceField::from_obstacles(dimensions, obstacles, destination).unwrap();
		let direction = DirectionField::from_distance_field(&distance);
		(distance, direction)
	}

	#[test]
	fn corner_points_diagonally_at_centre() {
		let (distance, direction) = fields(FieldDimensions::new(5, 5), &ObstacleField::default(), FieldCell::new(2, 2));
		assert_eq!(4, distance.get_field_cell_value(FieldCell::new(0, 0)));
		let result = direction.get_field_cell_value(FieldCell::new(0, 0));
		assert!((result.length() - 1.0).abs() < 1e-6);
		assert!(result.x > 0.0 && result.y > 0.0);
		assert_eq!(Ordinal::NorthEast.unit_vector(), result);
	}
	#[test]
	fn matches_diagram() {
		let (_, direction) = fields(FieldDimensions::new(5, 5), &ObstacleField::default(), FieldCell::new(2, 2));
		// bottom row, left to right
		let expected = [
			Ordinal::NorthEast,
			Ordinal::NorthEast,
			Ordinal::North,
			Ordinal::NorthWest,
			Ordinal::NorthWest,
		];
		for (column, ordinal) in expected.iter().enumerate() {
			assert_eq!(ordinal.unit_vector(), direction.get_field_cell_value(FieldCell::new(column, 0)));
		}
		// middle row, either side of the goal
		assert_eq!(Ordinal::East.unit_vector(), direction.get_field_cell_value(FieldCell::new(0, 2)));
		assert_eq!(Ordinal::West.unit_vector(), direction.get_field_cell_value(FieldCell::new(4, 2)));
		assert_eq!(Ordinal::SouthWest.unit_vector(), direction.get_field_cell_value(FieldCell::new(4, 4)));
	}
	#[test]
	fn goal_points_at_first_neighbour_in_scan_order() {
		let (_, direction) = fields(FieldDimensions::new(5, 5), &ObstacleField::default(), FieldCell::new(2, 2));
		assert_eq!(Ordinal::East.unit_vector(), direction.get_field_cell_value(FieldCell::new(2, 2)));
	}
	#[test]
	fn ties_go_to_earliest_in_scan_order() {
		let dimensions = FieldDimensions::new(3, 3);
		let mut distance = DistanceField::new(dimensions);
		for cell in dimensions.iter_cells() {
			distance.set_field_cell_value(5, cell);
		}
		// South-East and West tie
		distance.set_field_cell_value(2, FieldCell::new(2, 0));
		distance.set_field_cell_value(2, FieldCell::new(0, 1));
		assert_eq!(Ordinal::SouthEast, steepest_descent(FieldCell::new(1, 1), &distance));
		// West and North tie once South-East is no longer cheapest
		distance.set_field_cell_value(5, FieldCell::new(2, 0));
		distance.set_field_cell_value(2, FieldCell::new(1, 2));
		assert_eq!(Ordinal::West, steepest_descent(FieldCell::new(1, 1), &distance));
	}
	#[test]
	fn equal_orthogonal_and_diagonal_prefers_east() {
		let dimensions = FieldDimensions::new(3, 3);
		let mut distance = DistanceField::new(dimensions);
		for cell in dimensions.iter_cells() {
			distance.set_field_cell_value(5, cell);
		}
		distance.set_field_cell_value(4, FieldCell::new(2, 1));
		distance.set_field_cell_value(4, FieldCell::new(2, 2));
		distance.set_field_cell_value(4, FieldCell::new(1, 2));
		let result = steepest_descent(FieldCell::new(1, 1), &distance);
		assert_eq!(Ordinal::East, result);
	}
	#[test]
	fn last_diagonal_tracks_minimum() {
		// only the North-East neighbour is cheapest, it must win outright
		let dimensions = FieldDimensions::new(3, 3);
		let mut distance = DistanceField::new(dimensions);
		for cell in dimensions.iter_cells() {
			distance.set_field_cell_value(5, cell);
		}
		distance.set_field_cell_value(3, FieldCell::new(2, 2));
		distance.set_field_cell_value(4, FieldCell::new(2, 1));
		assert_eq!(Ordinal::NorthEast, steepest_descent(FieldCell::new(1, 1), &distance));
	}
	#[test]
	fn unreached_neighbours_are_ignored() {
		let dimensions = FieldDimensions::new(3, 1);
		let mut distance = DistanceField::new(dimensions);
		distance.set_field_cell_value(2, FieldCell::new(1, 0));
		distance.set_field_cell_value(3, FieldCell::new(2, 0));
		// West is -1 which would otherwise be the smallest value
		assert_eq!(Ordinal::East, steepest_descent(FieldCell::new(1, 0), &distance));
	}
	#[test]
	fn isolated_cell_has_zero_vector() {
		let dimensions = FieldDimensions::new(5, 5);
		let mut obstacles = ObstacleField::default();
		for column in 1..4 {
			for row in 1..4 {
				if (column, row) != (2, 2) {
					obstacles.insert_blocked(FieldCell::new(column, row));
				}
			}
		}
		let (distance, direction) = fields(dimensions, &obstacles, FieldCell::new(4, 4));
		assert_eq!(DISTANCE_UNREACHED, distance.get_field_cell_value(FieldCell::new(2, 2)));
		assert_eq!(Vec2::ZERO, direction.get_field_cell_value(FieldCell::new(2, 2)));
	}
	#[test]
	fn blocked_cells_have_zero_vector() {
		let obstacles: ObstacleField = vec![FieldCell::new(1, 1)].into_iter().collect();
		let (_, direction) = fields(FieldDimensions::new(3, 3), &obstacles, FieldCell::new(0, 0));
		assert_eq!(Vec2::ZERO, direction.get_field_cell_value(FieldCell::new(1, 1)));
	}
	#[test]
	fn single_cell_grid_has_zero_vector() {
		let (_, direction) = fields(FieldDimensions::new(1, 1), &ObstacleField::default(), FieldCell::new(0, 0));
		assert_eq!(Vec2::ZERO, direction.get_field_cell_value(FieldCell::new(0, 0)));
	}
	#[test]
	fn reachable_cells_have_unit_vectors_pointing_downhill() {
		let dimensions = FieldDimensions::new(8, 6);
		let obstacles: ObstacleField = vec![
			FieldCell::new(3, 0), FieldCell::new(3, 1), FieldCell::new(3, 2), FieldCell::new(3, 3),
			FieldCell::new(5, 5), FieldCell::new(5, 4), FieldCell::new(5, 3),
		].into_iter().collect();
		let (distance, direction) = fields(dimensions, &obstacles, FieldCell::new(7, 0));
		for cell in dimensions.iter_cells().filter(|c| distance.is_reachable(*c)) {
			let vector = direction.get_field_cell_value(cell);
			assert!((vector.length() - 1.0).abs() < 1e-5, "{:?} has {:?}", cell, vector);
			if distance.get_field_cell_value(cell) > 0 {
				let step = (vector * std::f32::consts::SQRT_2).round();
				let target = FieldCell::new(
					(cell.get_column() as i32 + step.x as i32) as usize,
					(cell.get_row() as i32 + step.y as i32) as usize,
				);
				assert!(distance.get_field_cell_value(target) < distance.get_field_cell_value(cell));
			}
		}
	}
}
