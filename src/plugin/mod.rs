//! Defines the Bevy [Plugin] for FlowFieldProviders
//!

use crate::prelude::*;
use bevy::prelude::*;

pub mod refresh_layer;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum OrderingSet {
	Cadence,
	Calculate,
}

pub struct FlowFieldProviderPlugin;

impl Plugin for FlowFieldProviderPlugin {
	#[cfg(not(tarpaulin_include))]
	fn build(&self, app: &mut App) {
		app.register_type::<Ordinal>()
			.register_type::<FieldCell>()
			.register_type::<FieldDimensions>()
			.register_type::<WorldCell>()
			.register_type::<GridMapper>()
			.register_type::<GridRegion>()
			.register_type::<ObstacleClassification>()
			.register_type::<ObstacleRegion>()
			.register_type::<StaticObstacles>()
			.register_type::<FlowFieldConfig>()
			.add_event::<refresh_layer::EventRefreshFlowField>()
			.add_event::<refresh_layer::EventFlowFieldRefreshed>()
			.add_event::<refresh_layer::EventFlowFieldRefreshFailed>()
			.configure_sets(
				Update,
				(OrderingSet::Cadence, OrderingSet::Calculate).chain(),
			)
			.add_systems(
				Update,
				(
					(
						refresh_layer::request_initial_refresh,
						refresh_layer::tick_refresh_cadence,
					)
						.in_set(OrderingSet::Cadence),
					refresh_layer::process_refresh_requests.in_set(OrderingSet::Calculate),
				),
			);
	}
}
