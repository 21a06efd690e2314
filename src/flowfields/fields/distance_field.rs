//! The DistanceField contains a 2D array of 32-bit values and it uses an
//! [ObstacleField] to produce the number of orthogonal steps needed to reach
//! the destination/goal from every cell of the grid.
//!
//! When a new field needs to be built the working state of every cell is
//! reset (no parent, unreached) and the grid cell containing the goal is set
//! to `0`. The goal's orthogonal neighbours are queued (East, South, West,
//! North, when not against a boundary) each recording the goal as their
//! parent. The queue is then drained strictly first-in first-out:
//!
//! 1. A cell which already has a distance is skipped
//! 2. An open cell takes its parent's distance plus one and queues every
//! orthogonal neighbour that has not yet been claimed by a parent
//! 3. A blocked cell is marked with `i32::MAX` and nothing is propagated from it
//!
//! As every step costs the same and the queue is FIFO the first parent to
//! claim a cell always lies on a shortest path, so no cell is ever revisited
//! with a smaller distance. Cells that are never dequeued (walled off
//! regions) keep `-1`.
//!
//! A goal on open ground with a short wall (`X`) to the West produces:
//!
//! ```text
//!  _____________________________
//! |     |     |     |     |     |
//! |  5  |  4  |  3  |  2  |  3  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  6  |  X  |  2  |  1  |  2  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  7  |  X  |  1  |  0  |  1  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  6  |  X  |  2  |  1  |  2  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  5  |  4  |  3  |  2  |  3  |
//! |_____|_____|_____|_____|_____|
//! ```
//!
//! If the goal itself is blocked a second breadth-first search walks outward
//! through blocked cells, ring by ring, and the first open cell it meets
//! becomes the goal instead.
//!

use std::collections::VecDeque;

use crate::prelude::*;
use bevy::prelude::*;

/// Marks a cell which has not been claimed by a parent
const NO_PARENT: usize = usize::MAX;

/// Dense hop counts to the goal, `-1` for unreached cells and `i32::MAX`
/// for blocked cells
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DistanceField {
	/// Size of the grid
	dimensions: FieldDimensions,
	/// Distance of each cell, indexed by [FieldDimensions::get_index]
	values: Vec<i32>,
}

impl Field<i32> for DistanceField {
	/// Get a reference to the field array
	fn get(&self) -> &[i32] {
		&self.values
	}
	fn get_dimensions(&self) -> FieldDimensions {
		self.dimensions
	}
	/// Retrieve a field cell value
	fn get_field_cell_value(&self, field_cell: FieldCell) -> i32 {
		if !self.dimensions.contains(field_cell) {
			panic!("Cannot get a DistanceField value, index out of bounds. Asked for column {}, row {}, field column length is {}, field row length is {}", field_cell.get_column(), field_cell.get_row(), self.dimensions.get_columns(), self.dimensions.get_rows())
		}
		self.values[self.dimensions.get_index(field_cell)]
	}
	/// Set a field cell to a value
	fn set_field_cell_value(&mut self, value: i32, field_cell: FieldCell) {
		if !self.dimensions.contains(field_cell) {
			panic!("Cannot set a DistanceField value, index out of bounds. Asked for column {}, row {}, field column length is {}, field row length is {}", field_cell.get_column(), field_cell.get_row(), self.dimensions.get_columns(), self.dimensions.get_rows())
		}
		let index = self.dimensions.get_index(field_cell);
		self.values[index] = value;
	}
}

impl DistanceField {
	/// Creates a new [DistanceField] where every cell is unreached
	pub fn new(dimensions: FieldDimensions) -> Self {
		DistanceField {
			dimensions,
			values: vec![DISTANCE_UNREACHED; dimensions.len()],
		}
	}
	/// Build a field in one go with a throwaway [DistanceFieldBuilder],
	/// returning it alongside the goal it was flooded from
	pub fn from_obstacles(
		dimensions: FieldDimensions,
		obstacles: &ObstacleField,
		destination: FieldCell,
	) -> Result<(Self, FieldCell), FlowFieldError> {
		let mut builder = DistanceFieldBuilder::new(dimensions);
		let mut field = DistanceField::new(dimensions);
		let goal = builder.build(obstacles, destination, &mut field)?;
		Ok((field, goal))
	}
	/// Whether the cell holds a real hop count
	pub fn is_reachable(&self, field_cell: FieldCell) -> bool {
		let value = self.get_field_cell_value(field_cell);
		value != DISTANCE_UNREACHED && value != DISTANCE_BLOCKED
	}
	/// Whether the cell holds the blocked marker
	pub fn is_blocked(&self, field_cell: FieldCell) -> bool {
		self.get_field_cell_value(field_cell) == DISTANCE_BLOCKED
	}
}

/// Per-cell working state of a flood fill, kept as separate arrays indexed
/// by [FieldDimensions::get_index] so that repeated builds reuse the same
/// allocations. Nothing in here carries meaning between builds
#[derive(Clone, Debug, Default)]
pub struct FloodFillBuffers {
	/// Size the buffers are allocated for
	dimensions: FieldDimensions,
	/// Column of the cell that claimed each cell
	parent_column: Vec<usize>,
	/// Row of the cell that claimed each cell
	parent_row: Vec<usize>,
	/// Working distance of each cell
	distance: Vec<i32>,
	/// Dense copy of the sparse [ObstacleField]
	blocked: Vec<bool>,
	/// Indices of cells waiting to be processed
	queue: VecDeque<usize>,
}

impl FloodFillBuffers {
	/// Create buffers sized for `dimensions`
	pub fn new(dimensions: FieldDimensions) -> Self {
		let mut buffers = FloodFillBuffers::default();
		buffers.resize(dimensions);
		buffers
	}
	pub fn get_dimensions(&self) -> FieldDimensions {
		self.dimensions
	}
	/// Reallocate the buffers, only when the dimensions actually change
	pub fn resize(&mut self, dimensions: FieldDimensions) {
		if self.dimensions == dimensions && self.distance.len() == dimensions.len() {
			return;
		}
		let len = dimensions.len();
		self.dimensions = dimensions;
		self.parent_column = vec![NO_PARENT; len];
		self.parent_row = vec![NO_PARENT; len];
		self.distance = vec![DISTANCE_UNREACHED; len];
		self.blocked = vec![false; len];
		self.queue = VecDeque::with_capacity(len);
	}
	/// Forget every parent and distance from a previous search
	fn reset(&mut self) {
		self.parent_column.fill(NO_PARENT);
		self.parent_row.fill(NO_PARENT);
		self.distance.fill(DISTANCE_UNREACHED);
		self.queue.clear();
	}
	/// Copy the blocked cells of `obstacles` into the dense lookup
	fn load_obstacles(&mut self, obstacles: &ObstacleField) {
		self.blocked.fill(false);
		for cell in obstacles.iter_blocked() {
			if self.dimensions.contains(cell) {
				let index = self.dimensions.get_index(cell);
				self.blocked[index] = true;
			} else {
				trace!("Ignoring obstacle {:?} outside of the grid", cell);
			}
		}
	}
	/// Whether the cell at `index` has been claimed
	fn has_parent(&self, index: usize) -> bool {
		self.parent_column[index] != NO_PARENT
	}
	/// Record `parent` as the claimant of the cell at `index`
	fn set_parent(&mut self, index: usize, parent: FieldCell) {
		self.parent_column[index] = parent.get_column();
		self.parent_row[index] = parent.get_row();
	}
	/// The cell which claimed the cell at `index`
	fn get_parent(&self, index: usize) -> Option<FieldCell> {
		if self.has_parent(index) {
			Some(FieldCell::new(
				self.parent_column[index],
				self.parent_row[index],
			))
		} else {
			None
		}
	}
	/// Claim and queue every unclaimed orthogonal neighbour of `field_cell`
	fn enqueue_neighbours(&mut self, field_cell: FieldCell) {
		for neighbour in self
			.dimensions
			.get_orthogonal_neighbours(field_cell)
			.into_iter()
			.flatten()
		{
			let index = self.dimensions.get_index(neighbour);
			if !self.has_parent(index) {
				self.set_parent(index, field_cell);
				self.queue.push_back(index);
			}
		}
	}
}

/// Produces [DistanceField]s for a grid of fixed dimensions, reusing its
/// [FloodFillBuffers] between builds
#[derive(Clone, Debug, Default)]
pub struct DistanceFieldBuilder {
	/// Working state of the most recent search
	buffers: FloodFillBuffers,
}

impl DistanceFieldBuilder {
	/// Create a new instance of [DistanceFieldBuilder]
	pub fn new(dimensions: FieldDimensions) -> Self {
		DistanceFieldBuilder {
			buffers: FloodFillBuffers::new(dimensions),
		}
	}
	pub fn get_dimensions(&self) -> FieldDimensions {
		self.buffers.get_dimensions()
	}
	/// The cell that claimed `field_cell` during the most recent flood fill,
	/// the goal claims itself. [None] for cells the fill never reached
	pub fn get_parent(&self, field_cell: FieldCell) -> Option<FieldCell> {
		if !self.get_dimensions().contains(field_cell) {
			return None;
		}
		self.buffers
			.get_parent(self.get_dimensions().get_index(field_cell))
	}
	/// Flood fill from `destination` around the blocked cells of `obstacles`
	/// and write the hop counts into `field`, resizing it when needed. The
	/// goal actually used is returned, it differs from `destination` when
	/// that is blocked and had to be relocated.
	///
	/// On failure `field` is left untouched
	pub fn build(
		&mut self,
		obstacles: &ObstacleField,
		destination: FieldCell,
		field: &mut DistanceField,
	) -> Result<FieldCell, FlowFieldError> {
		let dimensions = self.get_dimensions();
		if !dimensions.contains(destination) {
			debug!("Distance field destination {:?} is out of bounds", destination);
			return Err(FlowFieldError::InvalidDestination {
				column: destination.get_column() as i64,
				row: destination.get_row() as i64,
				columns: dimensions.get_columns(),
				rows: dimensions.get_rows(),
			});
		}
		self.buffers.load_obstacles(obstacles);

		let mut goal = destination;
		if self.buffers.blocked[dimensions.get_index(goal)] {
			debug!(
				"Distance field destination {:?} is blocked, finding a new destination...",
				destination
			);
			match self.find_nearest_unblocked(destination) {
				Some(cell) => {
					debug!("New destination {:?} found", cell);
					goal = cell;
				}
				None => {
					debug!("No new destination could be found for {:?}", destination);
					return Err(FlowFieldError::NoReachableDestination {
						column: destination.get_column(),
						row: destination.get_row(),
					});
				}
			}
		}

		self.flood(goal);

		if field.get_dimensions() != dimensions || field.values.len() != dimensions.len() {
			*field = DistanceField::new(dimensions);
		}
		for (index, value) in field.values.iter_mut().enumerate() {
			*value = if self.buffers.blocked[index] {
				DISTANCE_BLOCKED
			} else {
				self.buffers.distance[index]
			};
		}
		Ok(goal)
	}
	/// Breadth-first search outward from a blocked `destination`, passing
	/// only through blocked cells, for the closest open cell
	fn find_nearest_unblocked(&mut self, destination: FieldCell) -> Option<FieldCell> {
		let dimensions = self.get_dimensions();
		self.buffers.reset();
		let index = dimensions.get_index(destination);
		self.buffers.set_parent(index, destination);
		self.buffers.enqueue_neighbours(destination);

		while let Some(index) = self.buffers.queue.pop_front() {
			let cell = dimensions.get_field_cell(index);
			if !self.buffers.blocked[index] {
				return Some(cell);
			}
			self.buffers.enqueue_neighbours(cell);
		}
		None
	}
	/// Fill the working distances outward from an open `goal`
	fn flood(&mut self, goal: FieldCell) {
		let dimensions = self.get_dimensions();
		self.buffers.reset();
		let goal_index = dimensions.get_index(goal);
		self.buffers.distance[goal_index] = DISTANCE_GOAL;
		self.buffers.set_parent(goal_index, goal);
		self.buffers.enqueue_neighbours(goal);

		while let Some(index) = self.buffers.queue.pop_front() {
			if self.buffers.distance[index] != DISTANCE_UNREACHED {
				continue;
			}
			if self.buffers.blocked[index] {
				self.buffers.distance[index] = DISTANCE_BLOCKED;
				continue;
			}
			// queued cells are always claimed before they are pushed
			let Some(parent) = self.buffers.get_parent(index) else {
				error!("Flood fill dequeued unclaimed cell {:?}", dimensions.get_field_cell(index));
				continue;
			};
			let parent_distance = self.buffers.distance[dimensions.get_index(parent)];
			self.buffers.distance[index] = parent_distance + 1;
			self.buffers
				.enqueue_neighbours(dimensions.get_field_cell(index));
		}
	}
}
