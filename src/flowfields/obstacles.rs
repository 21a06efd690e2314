//! Sources of impassable terrain.
//!
//! A provider never decides by itself what is blocked, instead an
//! [ObstacleSource] is asked to scan the [GridRegion] and report the cells
//! occupied by obstacles of a given [ObstacleClassification]. Every scan
//! produces a complete replacement [ObstacleField].
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Tag describing which kind of obstacle a scan is interested in, akin to a
/// physics layer mask
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash, Reflect)]
pub struct ObstacleClassification(u32);

impl ObstacleClassification {
	/// Create a new instance of [ObstacleClassification]
	pub fn new(value: u32) -> Self {
		ObstacleClassification(value)
	}
	pub fn get(&self) -> u32 {
		self.0
	}
}

/// Reports which cells of a region are impassable
pub trait ObstacleSource {
	/// Find every cell of `region` occupied by an obstacle of `classification`
	fn scan(
		&self,
		mapper: &GridMapper,
		region: &GridRegion,
		classification: ObstacleClassification,
	) -> ObstacleField;
}

/// Open ground, nothing is ever blocked
#[derive(Clone, Copy, Debug, Default)]
pub struct NoObstacles;

impl ObstacleSource for NoObstacles {
	fn scan(&self, _: &GridMapper, _: &GridRegion, _: ObstacleClassification) -> ObstacleField {
		ObstacleField::default()
	}
}

/// Wraps a host occupancy query which is evaluated at the centre of every
/// cell with a sample radius of half a cell. The query receives
/// `(sample_point, radius, classification)` and returns whether anything of
/// that classification occupies that sphere
pub struct SampledObstacles<F>
where
	F: Fn(Vec3, f32, ObstacleClassification) -> bool,
{
	/// The occupancy query
	query: F,
}

impl<F> SampledObstacles<F>
where
	F: Fn(Vec3, f32, ObstacleClassification) -> bool,
{
	/// Create a new instance of [SampledObstacles]
	pub fn new(query: F) -> Self {
		SampledObstacles { query }
	}
}

impl<F> ObstacleSource for SampledObstacles<F>
where
	F: Fn(Vec3, f32, ObstacleClassification) -> bool,
{
	fn scan(
		&self,
		mapper: &GridMapper,
		region: &GridRegion,
		classification: ObstacleClassification,
	) -> ObstacleField {
		let radius = mapper.get_sample_radius();
		region
			.iter_world_cells()
			.filter(|(_, world_cell)| (self.query)(mapper.cell_centre(*world_cell), radius, classification))
			.map(|(field_cell, _)| field_cell)
			.collect()
	}
}

/// An axis aligned rectangle on the ground plane (`x`, `z`) occupied by an
/// obstacle
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Debug, Reflect)]
pub struct ObstacleRegion {
	/// What kind of obstacle this is
	classification: ObstacleClassification,
	/// Smallest `(x, z)` corner
	min: Vec2,
	/// Largest `(x, z)` corner
	max: Vec2,
}

impl ObstacleRegion {
	/// Create a new instance of [ObstacleRegion] from any two opposite
	/// corners given as `(x, z)`
	pub fn new(classification: ObstacleClassification, corner_a: Vec2, corner_b: Vec2) -> Self {
		ObstacleRegion {
			classification,
			min: corner_a.min(corner_b),
			max: corner_a.max(corner_b),
		}
	}
	pub fn get_classification(&self) -> ObstacleClassification {
		self.classification
	}
	/// Whether the ground plane point `(x, z)` lies inside, edges included
	pub fn contains(&self, point: Vec2) -> bool {
		point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
	}
}

/// A fixed layout of rectangular obstacles, a cell is blocked when its centre
/// lies inside a rectangle of the requested classification
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, PartialEq, Debug, Default, Reflect)]
pub struct StaticObstacles {
	/// Every obstacle of the layout
	regions: Vec<ObstacleRegion>,
}

impl StaticObstacles {
	/// Create a new instance of [StaticObstacles]
	pub fn new(regions: Vec<ObstacleRegion>) -> Self {
		StaticObstacles { regions }
	}
	pub fn get_regions(&self) -> &[ObstacleRegion] {
		&self.regions
	}
	/// Add another obstacle to the layout
	pub fn push(&mut self, region: ObstacleRegion) {
		self.regions.push(region);
	}
	/// Load a layout from a RON file
	#[cfg(feature = "ron")]
	pub fn from_ron(path: String) -> Result<Self, ConfigurationError> {
		let file = std::fs::File::open(&path)
			.map_err(|e| ConfigurationError::Io(format!("{}: {}", path, e)))?;
		ron::de::from_reader(file).map_err(|e| ConfigurationError::Deserialize(e.to_string()))
	}
}

impl ObstacleSource for StaticObstacles {
	fn scan(
		&self,
		mapper: &GridMapper,
		region: &GridRegion,
		classification: ObstacleClassification,
	) -> ObstacleField {
		let relevant: Vec<&ObstacleRegion> = self
			.regions
			.iter()
			.filter(|r| r.get_classification() == classification)
			.collect();
		if relevant.is_empty() {
			return ObstacleField::default();
		}
		region
			.iter_world_cells()
			.filter(|(_, world_cell)| {
				let centre = mapper.cell_centre(*world_cell);
				let point = Vec2::new(centre.x, centre.z);
				relevant.iter().any(|r| r.contains(point))
			})
			.map(|(field_cell, _)| field_cell)
			.collect()
	}
}

// #[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	/// A `4x4` region of unit cells starting at the world origin
	fn region() -> (GridMapper, GridRegion) {
		let mapper = GridMapper::new(1.0).unwrap();
		let region = GridRegion::from_corners(&mapper, Vec3::ZERO, Vec3::new(4.0, 0.0, 4.0)).unwrap();
		(mapper, region)
	}
	#[test]
	fn open_ground() {
		let (mapper, region) = region();
		let result = NoObstacles.scan(&mapper, &region, ObstacleClassification::default());
		assert!(result.is_empty());
	}
	#[test]
	fn sampled_at_cell_centres() {
		let (mapper, region) = region();
		let source = SampledObstacles::new(|point: Vec3, radius: f32, _| {
			assert_eq!(0.5, radius);
			point == Vec3::new(1.5, 0.0, 2.5)
		});
		let result = source.scan(&mapper, &region, ObstacleClassification::default());
		assert_eq!(1, result.len());
		assert!(result.is_blocked(FieldCell::new(1, 2)));
	}
	#[test]
	fn sampled_passes_classification() {
		let (mapper, region) = region();
		let source = SampledObstacles::new(|point: Vec3, _, classification: ObstacleClassification| {
			classification.get() == 3 && point.x < 1.0
		});
		let walls = source.scan(&mapper, &region, ObstacleClassification::new(3));
		assert_eq!(4, walls.len());
		let other = source.scan(&mapper, &region, ObstacleClassification::new(1));
		assert!(other.is_empty());
	}
	#[test]
	fn static_layout() {
		let (mapper, region) = region();
		let source = StaticObstacles::new(vec![
			// a wall along the second column
			ObstacleRegion::new(ObstacleClassification::new(1), Vec2::new(1.2, 3.0), Vec2::new(1.8, 0.0)),
			ObstacleRegion::new(ObstacleClassification::new(2), Vec2::new(0.0, 0.0), Vec2::new(4.0, 4.0)),
		]);
		let result = source.scan(&mapper, &region, ObstacleClassification::new(1));
		let mut cells: Vec<FieldCell> = result.iter_blocked().collect();
		cells.sort();
		let actual = vec![FieldCell::new(1, 0), FieldCell::new(1, 1), FieldCell::new(1, 2)];
		assert_eq!(actual, cells);
	}
	#[test]
	fn static_layout_offset_region() {
		let mapper = GridMapper::new(2.0).unwrap();
		let region = GridRegion::from_corners(&mapper, Vec3::new(-4.0, 0.0, -4.0), Vec3::new(4.0, 0.0, 4.0)).unwrap();
		let source = StaticObstacles::new(vec![ObstacleRegion::new(
			ObstacleClassification::default(),
			Vec2::new(-1.0, -1.0),
			Vec2::new(1.0, 1.0),
		)]);
		let result = source.scan(&mapper, &region, ObstacleClassification::default());
		let mut cells: Vec<FieldCell> = result.iter_blocked().collect();
		cells.sort();
		let actual = vec![
			FieldCell::new(1, 1),
			FieldCell::new(1, 2),
			FieldCell::new(2, 1),
			FieldCell::new(2, 2),
		];
		assert_eq!(actual, cells);
	}
	#[test]
	#[cfg(feature = "ron")]
	fn static_layout_from_ron() {
		let path = env!("CARGO_MANIFEST_DIR").to_string() + "/assets/obstacles.ron";
		let source = StaticObstacles::from_ron(path).unwrap();
		assert_eq!(3, source.get_regions().len());
		let mapper = GridMapper::new(1.0).unwrap();
		let region = GridRegion::from_corners(&mapper, Vec3::ZERO, Vec3::new(10.0, 0.0, 10.0)).unwrap();
		let result = source.scan(&mapper, &region, ObstacleClassification::new(1));
		assert_eq!(12, result.len());
		assert!(result.is_blocked(FieldCell::new(2, 5)));
		assert!(result.is_blocked(FieldCell::new(5, 9)));
		assert!(!result.is_blocked(FieldCell::new(2, 6)));
	}
}
