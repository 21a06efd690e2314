//! The [FlowFieldProvider] owns a grid over a region of the world, the
//! obstacles found in it and the most recently published FlowField. Agents
//! query it with their position to find which way to move.
//!
//! ```text
//!  configure ──> scan obstacles
//!                      │
//!  refresh(destination)│ (rescan when dynamic)
//!                      v
//!           DistanceFieldBuilder ──> DirectionField ──> publish {cell -> vector}
//!                                                              │
//!  get_vector(position) <──────────────────────────────────────┘
//! ```
//!

use std::{collections::HashMap, sync::Arc};

use crate::prelude::*;
use bevy::prelude::*;

/// Settings from which a [FlowFieldProvider] is built
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Debug, Reflect)]
pub struct FlowFieldConfig {
	/// Length of a side of a cell in world units
	cell_size: f32,
	/// One corner of the region covered by the grid
	corner_a: Vec3,
	/// The opposite corner of the region
	corner_b: Vec3,
	/// Which obstacles block movement
	classification: ObstacleClassification,
	/// Whether obstacles are rescanned on every refresh
	dynamic_obstacles: bool,
	/// Seconds between automatic refreshes when used with the plugin
	refresh_interval: f32,
}

impl Default for FlowFieldConfig {
	fn default() -> Self {
		FlowFieldConfig {
			cell_size: 1.0,
			corner_a: Vec3::ZERO,
			corner_b: Vec3::new(10.0, 0.0, 10.0),
			classification: ObstacleClassification::default(),
			dynamic_obstacles: false,
			refresh_interval: 0.5,
		}
	}
}

impl FlowFieldConfig {
	/// Create a new instance of [FlowFieldConfig] covering the box between two
	/// corners given in any order
	pub fn new(cell_size: f32, corner_a: Vec3, corner_b: Vec3) -> Self {
		FlowFieldConfig {
			cell_size,
			corner_a,
			corner_b,
			..default()
		}
	}
	pub fn with_classification(mut self, classification: ObstacleClassification) -> Self {
		self.classification = classification;
		self
	}
	pub fn with_dynamic_obstacles(mut self, dynamic_obstacles: bool) -> Self {
		self.dynamic_obstacles = dynamic_obstacles;
		self
	}
	pub fn with_refresh_interval(mut self, seconds: f32) -> Self {
		self.refresh_interval = seconds;
		self
	}
	pub fn get_cell_size(&self) -> f32 {
		self.cell_size
	}
	pub fn get_corners(&self) -> (Vec3, Vec3) {
		(self.corner_a, self.corner_b)
	}
	pub fn get_classification(&self) -> ObstacleClassification {
		self.classification
	}
	pub fn is_dynamic(&self) -> bool {
		self.dynamic_obstacles
	}
	pub fn get_refresh_interval(&self) -> f32 {
		self.refresh_interval
	}
	/// Check the settings can describe a grid, returning the mapper and
	/// region they produce
	pub fn validate(&self) -> Result<(GridMapper, GridRegion), ConfigurationError> {
		if !self.refresh_interval.is_finite() || self.refresh_interval < 0.0 {
			return Err(ConfigurationError::InvalidRefreshInterval(
				self.refresh_interval,
			));
		}
		let mapper = GridMapper::new(self.cell_size)?;
		let region = GridRegion::from_corners(&mapper, self.corner_a, self.corner_b)?;
		Ok((mapper, region))
	}
	/// Load settings from a RON file
	#[cfg(feature = "ron")]
	pub fn from_ron(path: String) -> Result<Self, ConfigurationError> {
		let file = std::fs::File::open(&path)
			.map_err(|e| ConfigurationError::Io(format!("{}: {}", path, e)))?;
		let config: FlowFieldConfig = ron::de::from_reader(file)
			.map_err(|e| ConfigurationError::Deserialize(e.to_string()))?;
		config.validate()?;
		Ok(config)
	}
}

/// Published mapping of grid cells to their unit direction vectors
pub type FlowFieldMap = HashMap<FieldCell, Vec2>;

/// Builds FlowFields over a fixed region and answers direction queries
#[derive(Component)]
pub struct FlowFieldProvider {
	/// Converts world positions to cells
	mapper: GridMapper,
	/// The cells covered by every field of the provider
	region: GridRegion,
	/// Obstacle kind requested from the source
	classification: ObstacleClassification,
	/// Whether the source is rescanned on every refresh
	dynamic_obstacles: bool,
	/// Where obstacles come from
	source: Box<dyn ObstacleSource + Send + Sync>,
	/// Result of the latest scan
	obstacles: ObstacleField,
	/// Flood fill with its reusable buffers
	builder: DistanceFieldBuilder,
	/// Distances behind the published FlowField
	distance_field: DistanceField,
	/// Target of the next build, swapped with `distance_field` on success
	scratch_field: DistanceField,
	/// Directions behind the published FlowField
	direction_field: DirectionField,
	/// The mapping queries are answered from
	flow_field: Arc<FlowFieldMap>,
	/// Goal cell of the last successful refresh
	destination: Option<FieldCell>,
}

impl std::fmt::Debug for FlowFieldProvider {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FlowFieldProvider")
			.field("mapper", &self.mapper)
			.field("region", &self.region)
			.field("classification", &self.classification)
			.field("dynamic_obstacles", &self.dynamic_obstacles)
			.field("obstacles", &self.obstacles.len())
			.field("destination", &self.destination)
			.finish_non_exhaustive()
	}
}

impl FlowFieldProvider {
	/// Create a new instance of [FlowFieldProvider] over the box between two
	/// corners. The `source` is scanned once straight away with the default
	/// [ObstacleClassification], see [FlowFieldProvider::configure_obstacles]
	pub fn new<S>(
		cell_size: f32,
		corner_a: Vec3,
		corner_b: Vec3,
		source: S,
	) -> Result<Self, ConfigurationError>
	where
		S: ObstacleSource + Send + Sync + 'static,
	{
		let config = FlowFieldConfig::new(cell_size, corner_a, corner_b);
		FlowFieldProvider::from_config(&config, source)
	}
	/// Create a new instance of [FlowFieldProvider] from a [FlowFieldConfig]
	pub fn from_config<S>(config: &FlowFieldConfig, source: S) -> Result<Self, ConfigurationError>
	where
		S: ObstacleSource + Send + Sync + 'static,
	{
		let (mapper, region) = config.validate()?;
		let dimensions = region.get_dimensions();
		debug!(
			"Creating FlowFieldProvider with {}x{} cells of size {} at {:?}",
			dimensions.get_columns(),
			dimensions.get_rows(),
			mapper.get_cell_size(),
			region.get_origin()
		);
		let mut provider = FlowFieldProvider {
			mapper,
			region,
			classification: config.get_classification(),
			dynamic_obstacles: config.is_dynamic(),
			source: Box::new(source),
			obstacles: ObstacleField::default(),
			builder: DistanceFieldBuilder::new(dimensions),
			distance_field: DistanceField::new(dimensions),
			scratch_field: DistanceField::new(dimensions),
			direction_field: DirectionField::new(dimensions),
			flow_field: Arc::new(FlowFieldMap::new()),
			destination: None,
		};
		provider.scan_obstacles();
		Ok(provider)
	}
	/// Store which obstacles block movement and whether they move, then scan
	/// for them immediately
	pub fn configure_obstacles(
		&mut self,
		classification: ObstacleClassification,
		dynamic_obstacles: bool,
	) {
		self.classification = classification;
		self.dynamic_obstacles = dynamic_obstacles;
		self.scan_obstacles();
	}
	/// Replace the [ObstacleField] with a fresh scan of the source
	pub fn scan_obstacles(&mut self) {
		self.obstacles = self
			.source
			.scan(&self.mapper, &self.region, self.classification);
		trace!("Scanned {} obstacle cells", self.obstacles.len());
	}
	/// Rebuild the FlowField towards `destination`. On success the published
	/// mapping is replaced wholesale and the goal cell actually used is
	/// returned, it differs from the cell of `destination` when that cell is
	/// blocked. On failure the previously published mapping is kept
	pub fn refresh(&mut self, destination: Vec3) -> Result<FieldCell, FlowFieldError> {
		let world_cell = self.mapper.world_to_cell(destination);
		self.refresh_world_cell(world_cell)
	}
	/// Rebuild the FlowField towards a 2d `destination`
	#[cfg(feature = "2d")]
	pub fn refresh_xy(&mut self, destination: Vec2) -> Result<FieldCell, FlowFieldError> {
		let world_cell = self.mapper.world_to_cell_xy(destination);
		self.refresh_world_cell(world_cell)
	}
	/// Rebuild the FlowField towards the cell `world_cell`, a destination
	/// without a cell is reported as lying outside the grid
	fn refresh_world_cell(
		&mut self,
		world_cell: Option<WorldCell>,
	) -> Result<FieldCell, FlowFieldError> {
		if self.dynamic_obstacles {
			self.scan_obstacles();
		}
		let dimensions = self.region.get_dimensions();
		let Some(world_cell) = world_cell else {
			debug!("Destination has no cell, it is not finite or too far away");
			return Err(FlowFieldError::InvalidDestination {
				column: UNMAPPED_CELL,
				row: UNMAPPED_CELL,
				columns: dimensions.get_columns(),
				rows: dimensions.get_rows(),
			});
		};
		let Some(field_cell) = self.region.get_field_cell(world_cell) else {
			let (column, row) = self.region.get_local_offset(world_cell);
			debug!("Destination {:?} lies outside the grid", world_cell);
			return Err(FlowFieldError::InvalidDestination {
				column,
				row,
				columns: dimensions.get_columns(),
				rows: dimensions.get_rows(),
			});
		};
		let goal = self
			.builder
			.build(&self.obstacles, field_cell, &mut self.scratch_field)?;
		std::mem::swap(&mut self.distance_field, &mut self.scratch_field);
		self.direction_field.calculate(&self.distance_field);
		self.publish();
		self.destination = Some(goal);
		Ok(goal)
	}
	/// Swap in a new mapping built from the [DirectionField]
	fn publish(&mut self) {
		let dimensions = self.direction_field.get_dimensions();
		let vectors = self.direction_field.get();
		let mut map = FlowFieldMap::with_capacity(dimensions.len());
		for (index, vector) in vectors.iter().enumerate() {
			map.insert(dimensions.get_field_cell(index), *vector);
		}
		self.flow_field = Arc::new(map);
	}
	/// Direction of travel from a 3d position as `(x, z)`, [Vec2::ZERO] when
	/// the position lies outside the grid or nothing has been published yet
	pub fn get_vector(&self, position: Vec3) -> Vec2 {
		self.lookup(self.mapper.world_to_cell(position))
	}
	/// Direction of travel from a 3d position with a `y` of `0`
	pub fn get_vector_xyz(&self, position: Vec3) -> Vec3 {
		let v = self.get_vector(position);
		Vec3::new(v.x, 0.0, v.y)
	}
	/// Direction of travel from a 2d position
	#[cfg(feature = "2d")]
	pub fn get_vector_xy(&self, position: Vec2) -> Vec2 {
		self.lookup(self.mapper.world_to_cell_xy(position))
	}
	/// Published vector of a world cell
	fn lookup(&self, world_cell: Option<WorldCell>) -> Vec2 {
		world_cell
			.and_then(|world_cell| self.region.get_field_cell(world_cell))
			.and_then(|field_cell| self.flow_field.get(&field_cell).copied())
			.unwrap_or(Vec2::ZERO)
	}
	pub fn get_obstacles(&self) -> &ObstacleField {
		&self.obstacles
	}
	pub fn get_flow_field(&self) -> &FlowFieldMap {
		&self.flow_field
	}
	/// A shared handle to the published mapping which later refreshes never
	/// modify
	pub fn get_flow_field_snapshot(&self) -> Arc<FlowFieldMap> {
		Arc::clone(&self.flow_field)
	}
	/// Distances of the last successful refresh
	pub fn get_distance_field(&self) -> &DistanceField {
		&self.distance_field
	}
	pub fn get_direction_field(&self) -> &DirectionField {
		&self.direction_field
	}
	/// Goal cell of the last successful refresh
	pub fn get_destination(&self) -> Option<FieldCell> {
		self.destination
	}
	pub fn get_mapper(&self) -> &GridMapper {
		&self.mapper
	}
	pub fn get_region(&self) -> &GridRegion {
		&self.region
	}
	pub fn get_classification(&self) -> ObstacleClassification {
		self.classification
	}
	pub fn is_dynamic(&self) -> bool {
		self.dynamic_obstacles
	}
	/// Whether a refresh has ever succeeded
	pub fn has_flow_field(&self) -> bool {
		self.destination.is_some()
	}
}

/// A [FlowFieldProvider] with the timer driving its refreshes
#[derive(Bundle)]
pub struct FlowFieldBundle {
	/// The provider
	provider: FlowFieldProvider,
	/// How often it refreshes
	cadence: RefreshCadence,
}

impl FlowFieldBundle {
	/// Create a new instance of [FlowFieldBundle] from a [FlowFieldConfig]
	pub fn new<S>(config: &FlowFieldConfig, source: S) -> Result<Self, ConfigurationError>
	where
		S: ObstacleSource + Send + Sync + 'static,
	{
		let provider = FlowFieldProvider::from_config(config, source)?;
		let cadence = RefreshCadence::new(config.get_refresh_interval());
		Ok(FlowFieldBundle { provider, cadence })
	}
	/// Create a new instance of [FlowFieldBundle] from a RON config file
	#[cfg(feature = "ron")]
	pub fn new_from_disk<S>(path: &str, source: S) -> Result<Self, ConfigurationError>
	where
		S: ObstacleSource + Send + Sync + 'static,
	{
		let config = FlowFieldConfig::from_ron(path.to_string())?;
		FlowFieldBundle::new(&config, source)
	}
}
