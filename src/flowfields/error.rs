//! Failures raised while configuring a provider or refreshing its fields
//!

use thiserror::Error;

/// A provider was set up with values it cannot work with. Nothing can be
/// built until the configuration is corrected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
	#[error("cell size must be a positive finite number, found {0}")]
	InvalidCellSize(f32),
	#[error("world bounds must be finite")]
	NonFiniteBounds,
	#[error("world bounds lie beyond the range of cell IDs")]
	BoundsOutOfRange,
	#[error("world bounds span {columns} columns by {rows} rows, at least one cell is needed along each axis")]
	DegenerateBounds { columns: i64, rows: i64 },
	#[error("refresh interval must be a non-negative finite number of seconds, found {0}")]
	InvalidRefreshInterval(f32),
	#[cfg(feature = "ron")]
	#[error("failed opening file: {0}")]
	Io(String),
	#[cfg(feature = "ron")]
	#[error("failed deserializing file: {0}")]
	Deserialize(String),
}

/// Column and row reported by [FlowFieldError::InvalidDestination] for a
/// destination which has no cell at all, being non-finite or beyond the range
/// of cell IDs
pub const UNMAPPED_CELL: i64 = i64::MIN;

/// A refresh attempt could not produce a field. Any previously published
/// field stays untouched
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowFieldError {
	#[error("destination cell ({column}, {row}) lies outside the {columns}x{rows} grid")]
	InvalidDestination {
		column: i64,
		row: i64,
		columns: usize,
		rows: usize,
	},
	#[error("destination cell ({column}, {row}) is blocked and no traversable cell could replace it")]
	NoReachableDestination { column: usize, row: usize },
}
