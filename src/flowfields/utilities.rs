//! Useful structures and tools used by the fields
//!

use bevy::prelude::*;

/// Distance of a field cell that the flood fill never reached
pub const DISTANCE_UNREACHED: i32 = -1;
/// Distance marker of an impassable field cell
pub const DISTANCE_BLOCKED: i32 = i32::MAX;
/// Distance of the destination (goal) cell
pub const DISTANCE_GOAL: i32 = 0;
/// Value of an [crate::prelude::ObstacleField] entry marking an impassable cell
pub const IMPASSABLE: u8 = 255;

/// Convenience way of accessing the 4 orthogonal neighbours of a cell used by
/// the flood fill and the 8 directions of movement used by the
/// [crate::prelude::DirectionField].
///
/// Columns increase towards the East (`+x`) and rows increase towards the
/// North (`+z`)
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Reflect)]
pub enum Ordinal {
	North,
	East,
	South,
	West,
	NorthEast,
	SouthEast,
	SouthWest,
	NorthWest,
	/// Special case, used to indicate a cell without a direction
	Zero,
}

impl Ordinal {
	/// Order in which orthogonal neighbours are pushed onto the flood fill
	/// queue. This decides which parent a cell records when two frontier
	/// cells could both claim it
	pub const FLOOD_ORDER: [Ordinal; 4] = [
		Ordinal::East,
		Ordinal::South,
		Ordinal::West,
		Ordinal::North,
	];
	/// Order in which the 8 neighbours of a cell are inspected when choosing a
	/// direction of steepest descent. A neighbour only replaces the current
	/// choice when its distance is strictly smaller, so of several equally
	/// cheap neighbours the one earliest in this list wins
	pub const SCAN_ORDER: [Ordinal; 8] = [
		Ordinal::East,
		Ordinal::SouthEast,
		Ordinal::South,
		Ordinal::SouthWest,
		Ordinal::West,
		Ordinal::NorthWest,
		Ordinal::North,
		Ordinal::NorthEast,
	];
	/// The `(column, row)` step taken when moving one cell in this direction
	pub fn offset(&self) -> (i32, i32) {
		match self {
			Ordinal::North => (0, 1),
			Ordinal::East => (1, 0),
			Ordinal::South => (0, -1),
			Ordinal::West => (-1, 0),
			Ordinal::NorthEast => (1, 1),
			Ordinal::SouthEast => (1, -1),
			Ordinal::SouthWest => (-1, -1),
			Ordinal::NorthWest => (-1, 1),
			Ordinal::Zero => (0, 0),
		}
	}
	/// Unit length vector pointing in this direction on the ground plane, `x`
	/// along columns and `y` along rows. [Ordinal::Zero] produces
	/// [Vec2::ZERO] rather than dividing by a zero length
	pub fn unit_vector(&self) -> Vec2 {
		let (column, row) = self.offset();
		Vec2::new(column as f32, row as f32).normalize_or_zero()
	}
}
