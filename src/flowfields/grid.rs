//! Discretises world space into square cells on the ground plane.
//!
//! In 3d the ground plane is `(x, z)` and height `y` is ignored, columns run
//! along `x` and rows along `z`. With the `2d` feature positions given as a
//! [Vec2] use `(x, y)` instead.
//!
//! ```text
//!  z
//!  ^   _______________
//!  |  |   |   |   |   |
//!  |  |___|___|___|___| <- top-right corner (excluded cell)
//!  |  |   |   |   |   |
//!  |  |___|___|___|___|
//!  |  |   |   |   |   |
//!  |  |___|___|___|___|
//!  |  ^ region origin (bottom-left cell)
//!  +-------------------> x
//! ```
//!

use crate::prelude::*;
use bevy::prelude::*;

/// ID of a cell in world space. Unlike a [FieldCell] this is unbounded and
/// signed, the cell containing the world origin is `(0, 0)`
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash, Reflect)]
pub struct WorldCell((i32, i32));

impl WorldCell {
	/// Create a new instance of [WorldCell]
	pub fn new(column: i32, row: i32) -> Self {
		WorldCell((column, row))
	}
	/// Get the `(column, row)` tuple
	pub fn get_column_row(&self) -> (i32, i32) {
		self.0
	}
	/// Get the column
	pub fn get_column(&self) -> i32 {
		self.0 .0
	}
	/// Get the row
	pub fn get_row(&self) -> i32 {
		self.0 .1
	}
}

/// Converts positions to and from cells of a fixed size
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Debug, Reflect)]
pub struct GridMapper {
	/// Length of a side of a cell in world units
	cell_size: f32,
}

impl GridMapper {
	/// Create a new instance of [GridMapper], `cell_size` must be positive
	/// and finite
	pub fn new(cell_size: f32) -> Result<Self, ConfigurationError> {
		if !cell_size.is_finite() || cell_size <= 0.0 {
			return Err(ConfigurationError::InvalidCellSize(cell_size));
		}
		Ok(GridMapper { cell_size })
	}
	pub fn get_cell_size(&self) -> f32 {
		self.cell_size
	}
	/// The cell along one axis whose origin is the greatest origin not
	/// exceeding `coordinate`. [None] when the coordinate is not finite or
	/// lies beyond the range of cell IDs
	fn axis_to_cell(&self, coordinate: f32) -> Option<i32> {
		if !coordinate.is_finite() {
			return None;
		}
		let quotient = (coordinate as f64 / self.cell_size as f64).floor();
		if quotient < i32::MIN as f64 || quotient > i32::MAX as f64 {
			return None;
		}
		let mut cell = quotient as i32;
		// floor of the quotient can land one cell off its own origin
		if self.axis_to_world(cell) > coordinate {
			cell = cell.checked_sub(1)?;
		} else if let Some(next) = cell.checked_add(1) {
			if self.axis_to_world(next) <= coordinate {
				cell = next;
			}
		}
		Some(cell)
	}
	/// Origin of a cell along one axis
	fn axis_to_world(&self, cell: i32) -> f32 {
		cell as f32 * self.cell_size
	}
	/// Find the cell containing a 3d position, height is ignored. Positions
	/// with a non-finite or out of range ground coordinate have no cell
	pub fn world_to_cell(&self, position: Vec3) -> Option<WorldCell> {
		Some(WorldCell::new(
			self.axis_to_cell(position.x)?,
			self.axis_to_cell(position.z)?,
		))
	}
	/// The bottom-left corner (origin) of a cell in 3d space with `y` of `0`.
	/// Only the origin is recoverable, not the position that produced the cell
	pub fn cell_to_world(&self, cell: WorldCell) -> Vec3 {
		Vec3::new(
			self.axis_to_world(cell.get_column()),
			0.0,
			self.axis_to_world(cell.get_row()),
		)
	}
	/// The centre of a cell in 3d space, where obstacle sources sample it
	pub fn cell_centre(&self, cell: WorldCell) -> Vec3 {
		let half = self.cell_size * 0.5;
		self.cell_to_world(cell) + Vec3::new(half, 0.0, half)
	}
	/// Radius of the sphere used when sampling a cell for occupancy, half a
	/// cell
	pub fn get_sample_radius(&self) -> f32 {
		self.cell_size * 0.5
	}
	/// Whether two 3d positions fall within the same cell, exactly equal
	/// ground coordinates always do. Positions without a cell share nothing
	pub fn positions_share_cell(&self, a: Vec3, b: Vec3) -> bool {
		if a.x == b.x && a.z == b.z {
			return true;
		}
		match (self.world_to_cell(a), self.world_to_cell(b)) {
			(Some(a), Some(b)) => a == b,
			_ => false,
		}
	}
	/// Find the cell containing a 2d position
	#[cfg(feature = "2d")]
	pub fn world_to_cell_xy(&self, position: Vec2) -> Option<WorldCell> {
		Some(WorldCell::new(
			self.axis_to_cell(position.x)?,
			self.axis_to_cell(position.y)?,
		))
	}
	/// The bottom-left corner (origin) of a cell in 2d space
	#[cfg(feature = "2d")]
	pub fn cell_to_world_xy(&self, cell: WorldCell) -> Vec2 {
		Vec2::new(
			self.axis_to_world(cell.get_column()),
			self.axis_to_world(cell.get_row()),
		)
	}
	/// Whether two 2d positions fall within the same cell
	#[cfg(feature = "2d")]
	pub fn positions_share_cell_xy(&self, a: Vec2, b: Vec2) -> bool {
		if a == b {
			return true;
		}
		match (self.world_to_cell_xy(a), self.world_to_cell_xy(b)) {
			(Some(a), Some(b)) => a == b,
			_ => false,
		}
	}
}

/// The rectangle of world cells a provider builds fields over
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Reflect)]
pub struct GridRegion {
	/// World cell of the bottom-left corner, [FieldCell] `(0, 0)`
	origin: WorldCell,
	/// Number of columns and rows
	dimensions: FieldDimensions,
}

impl GridRegion {
	/// Create a new instance of [GridRegion] from an origin and size
	pub fn new(origin: WorldCell, dimensions: FieldDimensions) -> Self {
		GridRegion { origin, dimensions }
	}
	/// Create a region spanning two opposite corners given in any order.
	/// The cell containing the top-right corner is not part of the region
	pub fn from_corners(
		mapper: &GridMapper,
		corner_a: Vec3,
		corner_b: Vec3,
	) -> Result<Self, ConfigurationError> {
		if !corner_a.is_finite() || !corner_b.is_finite() {
			return Err(ConfigurationError::NonFiniteBounds);
		}
		let (bottom_left, top_right) = normalise_bounds(corner_a, corner_b);
		let (Some(origin), Some(far)) = (
			mapper.world_to_cell(bottom_left),
			mapper.world_to_cell(top_right),
		) else {
			return Err(ConfigurationError::BoundsOutOfRange);
		};
		let columns = far.get_column() as i64 - origin.get_column() as i64;
		let rows = far.get_row() as i64 - origin.get_row() as i64;
		if columns <= 0 || rows <= 0 {
			return Err(ConfigurationError::DegenerateBounds { columns, rows });
		}
		Ok(GridRegion {
			origin,
			dimensions: FieldDimensions::new(columns as usize, rows as usize),
		})
	}
	pub fn get_origin(&self) -> WorldCell {
		self.origin
	}
	pub fn get_dimensions(&self) -> FieldDimensions {
		self.dimensions
	}
	/// Offset of a world cell from the origin, it may lie outside the region
	pub fn get_local_offset(&self, cell: WorldCell) -> (i64, i64) {
		(
			cell.get_column() as i64 - self.origin.get_column() as i64,
			cell.get_row() as i64 - self.origin.get_row() as i64,
		)
	}
	/// Convert a world cell into a [FieldCell] of this region, [None] if it
	/// lies outside
	pub fn get_field_cell(&self, cell: WorldCell) -> Option<FieldCell> {
		let (column, row) = self.get_local_offset(cell);
		if column < 0 || row < 0 {
			return None;
		}
		let field_cell = FieldCell::new(column as usize, row as usize);
		if self.dimensions.contains(field_cell) {
			Some(field_cell)
		} else {
			None
		}
	}
	/// Convert a [FieldCell] of this region back into a world cell
	pub fn get_world_cell(&self, field_cell: FieldCell) -> WorldCell {
		WorldCell::new(
			self.origin.get_column() + field_cell.get_column() as i32,
			self.origin.get_row() + field_cell.get_row() as i32,
		)
	}
	/// Iterate over every world cell of the region
	pub fn iter_world_cells(&self) -> impl Iterator<Item = (FieldCell, WorldCell)> + '_ {
		self.dimensions
			.iter_cells()
			.map(|field_cell| (field_cell, self.get_world_cell(field_cell)))
	}
}

/// Order two corners of a box into its bottom-left and top-right corners on
/// the ground plane
pub fn normalise_bounds(corner_a: Vec3, corner_b: Vec3) -> (Vec3, Vec3) {
	let bottom_left = Vec3::new(corner_a.x.min(corner_b.x), 0.0, corner_a.z.min(corner_b.z));
	let top_right = Vec3::new(corner_a.x.max(corner_b.x), 0.0, corner_a.z.max(corner_b.z));
	(bottom_left, top_right)
}
