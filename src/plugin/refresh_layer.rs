//! Logic relating to refreshing [FlowFieldProvider]s from within a Bevy app
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Repeating timer controlling how often a provider with a
/// [DestinationTracker] refreshes
#[derive(Component, Debug, Clone)]
pub struct RefreshCadence(Timer);

impl RefreshCadence {
	/// Create a new instance of [RefreshCadence] firing every `seconds`
	pub fn new(seconds: f32) -> Self {
		RefreshCadence(Timer::from_seconds(seconds, TimerMode::Repeating))
	}
	pub fn get_timer(&self) -> &Timer {
		&self.0
	}
}

/// Marks the entity whose [GlobalTransform] is the destination of a
/// provider, it is followed every time the [RefreshCadence] fires
#[derive(Component, Debug, Clone, Copy)]
pub struct DestinationTracker(Entity);

impl DestinationTracker {
	/// Create a new instance of [DestinationTracker]
	pub fn new(target: Entity) -> Self {
		DestinationTracker(target)
	}
	pub fn get(&self) -> Entity {
		self.0
	}
}

/// A request to rebuild the FlowField of a provider towards a destination
#[derive(Event, Debug, Clone, Copy)]
pub struct EventRefreshFlowField {
	/// Entity holding the [FlowFieldProvider]
	provider: Entity,
	/// World position to flow towards
	destination: Vec3,
}

impl EventRefreshFlowField {
	pub fn new(provider: Entity, destination: Vec3) -> Self {
		EventRefreshFlowField {
			provider,
			destination,
		}
	}
	pub fn get_provider(&self) -> Entity {
		self.provider
	}
	pub fn get_destination(&self) -> Vec3 {
		self.destination
	}
}

/// A provider published a new FlowField
#[derive(Event, Debug, Clone, Copy)]
pub struct EventFlowFieldRefreshed {
	/// Entity holding the [FlowFieldProvider]
	provider: Entity,
	/// The goal cell actually used
	destination: FieldCell,
}

impl EventFlowFieldRefreshed {
	pub fn get_provider(&self) -> Entity {
		self.provider
	}
	pub fn get_destination(&self) -> FieldCell {
		self.destination
	}
}

/// A provider could not refresh and kept its previous FlowField
#[derive(Event, Debug, Clone, Copy)]
pub struct EventFlowFieldRefreshFailed {
	/// Entity holding the [FlowFieldProvider]
	provider: Entity,
	/// Why it failed
	error: FlowFieldError,
}

impl EventFlowFieldRefreshFailed {
	pub fn get_provider(&self) -> Entity {
		self.provider
	}
	pub fn get_error(&self) -> FlowFieldError {
		self.error
	}
}

/// Request a refresh as soon as a provider starts tracking a destination so
/// that agents have a FlowField before the first [RefreshCadence] fires
#[cfg(not(tarpaulin_include))]
pub fn request_initial_refresh(
	tracker_q: Query<
		(Entity, &DestinationTracker),
		(Added<DestinationTracker>, With<FlowFieldProvider>),
	>,
	target_q: Query<&GlobalTransform>,
	mut events: EventWriter<EventRefreshFlowField>,
) {
	for (provider, tracker) in &tracker_q {
		if let Ok(transform) = target_q.get(tracker.get()) {
			events.write(EventRefreshFlowField::new(provider, transform.translation()));
		} else {
			warn!(
				"Destination {:?} of FlowFieldProvider {:?} has no GlobalTransform",
				tracker.get(),
				provider
			);
		}
	}
}

/// Tick every [RefreshCadence] and request a refresh towards the tracked
/// entity when it fires
#[cfg(not(tarpaulin_include))]
pub fn tick_refresh_cadence(
	mut cadence_q: Query<(Entity, &mut RefreshCadence, &DestinationTracker)>,
	target_q: Query<&GlobalTransform>,
	time: Res<Time>,
	mut events: EventWriter<EventRefreshFlowField>,
) {
	for (provider, mut cadence, tracker) in &mut cadence_q {
		cadence.0.tick(time.delta());
		if !cadence.0.just_finished() {
			continue;
		}
		if let Ok(transform) = target_q.get(tracker.get()) {
			events.write(EventRefreshFlowField::new(provider, transform.translation()));
		} else {
			warn!(
				"Destination {:?} of FlowFieldProvider {:?} has no GlobalTransform",
				tracker.get(),
				provider
			);
		}
	}
}

/// Refresh providers from [EventRefreshFlowField]s. Several requests may
/// arrive for one provider in the same tick, only the latest is calculated
#[cfg(not(tarpaulin_include))]
pub fn process_refresh_requests(
	mut requests: EventReader<EventRefreshFlowField>,
	mut provider_q: Query<&mut FlowFieldProvider>,
	mut refreshed: EventWriter<EventFlowFieldRefreshed>,
	mut failed: EventWriter<EventFlowFieldRefreshFailed>,
) {
	let latest = coalesce_requests(requests.read());
	for request in latest {
		let provider = request.get_provider();
		let Ok(mut flow_field_provider) = provider_q.get_mut(provider) else {
			warn!("Refresh requested for {:?} which has no FlowFieldProvider", provider);
			continue;
		};
		match flow_field_provider.refresh(request.get_destination()) {
			Ok(destination) => {
				trace!("FlowFieldProvider {:?} flows to {:?}", provider, destination);
				refreshed.write(EventFlowFieldRefreshed {
					provider,
					destination,
				});
			}
			Err(error) => {
				warn!("FlowFieldProvider {:?} failed to refresh: {}", provider, error);
				failed.write(EventFlowFieldRefreshFailed { provider, error });
			}
		}
	}
}

/// Keep the last request of each provider, in the order providers were first
/// requested
pub fn coalesce_requests<'a, I>(requests: I) -> Vec<EventRefreshFlowField>
where
	I: IntoIterator<Item = &'a EventRefreshFlowField>,
{
	let mut latest: Vec<EventRefreshFlowField> = Vec::new();
	for request in requests {
		if let Some(existing) = latest
			.iter_mut()
			.find(|r| r.get_provider() == request.get_provider())
		{
			*existing = *request;
		} else {
			latest.push(*request);
		}
	}
	latest
}

// #[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	use std::time::Duration;

	/// A headless app running the plugin with a manually advanced clock
	fn app() -> App {
		let mut app = App::new();
		app.add_plugins(FlowFieldProviderPlugin).init_resource::<Time>();
		app
	}
	/// A `5x5` provider of unit cells from the world origin
	fn spawn_provider(app: &mut App) -> Entity {
		let config = FlowFieldConfig::new(1.0, Vec3::ZERO, Vec3::new(5.0, 0.0, 5.0));
		let provider = FlowFieldProvider::from_config(&config, NoObstacles).unwrap();
		app.world_mut().spawn(provider).id()
	}
	#[test]
	fn coalesce_keeps_latest_per_provider() {
		let a = Entity::from_raw(1);
		let b = Entity::from_raw(2);
		let requests = vec![
			EventRefreshFlowField::new(a, Vec3::X),
			EventRefreshFlowField::new(b, Vec3::Y),
			EventRefreshFlowField::new(a, Vec3::Z),
		];
		let result = coalesce_requests(requests.iter());
		assert_eq!(2, result.len());
		assert_eq!(a, result[0].get_provider());
		assert_eq!(Vec3::Z, result[0].get_destination());
		assert_eq!(b, result[1].get_provider());
	}
	#[test]
	fn refresh_from_event() {
		let mut app = app();
		let provider = spawn_provider(&mut app);
		app.world_mut()
			.send_event(EventRefreshFlowField::new(provider, Vec3::new(0.5, 0.0, 0.5)));
		app.world_mut()
			.send_event(EventRefreshFlowField::new(provider, Vec3::new(3.5, 0.0, 1.5)));
		app.update();
		let flow_field_provider = app.world().get::<FlowFieldProvider>(provider).unwrap();
		assert_eq!(Some(FieldCell::new(3, 1)), flow_field_provider.get_destination());
		let events = app.world().resource::<Events<EventFlowFieldRefreshed>>();
		let result: Vec<&EventFlowFieldRefreshed> = events.iter_current_update_events().collect();
		assert_eq!(1, result.len());
		assert_eq!(provider, result[0].get_provider());
		assert_eq!(FieldCell::new(3, 1), result[0].get_destination());
	}
	#[test]
	fn failed_refresh_from_event() {
		let mut app = app();
		let provider = spawn_provider(&mut app);
		app.world_mut()
			.send_event(EventRefreshFlowField::new(provider, Vec3::new(2.5, 0.0, 2.5)));
		app.update();
		app.world_mut()
			.send_event(EventRefreshFlowField::new(provider, Vec3::new(-3.5, 0.0, 2.5)));
		app.update();
		let flow_field_provider = app.world().get::<FlowFieldProvider>(provider).unwrap();
		assert_eq!(Some(FieldCell::new(2, 2)), flow_field_provider.get_destination());
		assert_eq!(25, flow_field_provider.get_flow_field().len());
		let events = app.world().resource::<Events<EventFlowFieldRefreshFailed>>();
		let result: Vec<&EventFlowFieldRefreshFailed> = events.iter_current_update_events().collect();
		assert_eq!(1, result.len());
		let actual = FlowFieldError::InvalidDestination {
			column: -4,
			row: 2,
			columns: 5,
			rows: 5,
		};
		assert_eq!(actual, result[0].get_error());
	}
	#[test]
	fn tracked_destination_refreshes_on_spawn() {
		let mut app = app();
		let target = app
			.world_mut()
			.spawn(GlobalTransform::from_translation(Vec3::new(4.5, 0.0, 0.5)))
			.id();
		let config = FlowFieldConfig::new(1.0, Vec3::ZERO, Vec3::new(5.0, 0.0, 5.0))
			.with_refresh_interval(0.5);
		let bundle = FlowFieldBundle::new(&config, NoObstacles).unwrap();
		let provider = app
			.world_mut()
			.spawn((bundle, DestinationTracker::new(target)))
			.id();
		app.update();
		let flow_field_provider = app.world().get::<FlowFieldProvider>(provider).unwrap();
		assert_eq!(Some(FieldCell::new(4, 0)), flow_field_provider.get_destination());
		let result = flow_field_provider.get_vector(Vec3::new(0.5, 0.0, 0.5));
		assert_eq!(Vec2::new(1.0, 0.0), result);
	}
	#[test]
	fn cadence_follows_tracked_entity() {
		let mut app = app();
		let target = app
			.world_mut()
			.spawn(GlobalTransform::from_translation(Vec3::new(4.5, 0.0, 0.5)))
			.id();
		let config = FlowFieldConfig::new(1.0, Vec3::ZERO, Vec3::new(5.0, 0.0, 5.0))
			.with_refresh_interval(0.5);
		let bundle = FlowFieldBundle::new(&config, NoObstacles).unwrap();
		let provider = app
			.world_mut()
			.spawn((bundle, DestinationTracker::new(target)))
			.id();
		app.world_mut()
			.resource_mut::<Time>()
			.advance_by(Duration::from_millis(200));
		app.update();
		// target moves
		*app.world_mut().get_mut::<GlobalTransform>(target).unwrap() =
			GlobalTransform::from_translation(Vec3::new(0.5, 0.0, 4.5));
		// not yet due
		app.world_mut()
			.resource_mut::<Time>()
			.advance_by(Duration::from_millis(200));
		app.update();
		let flow_field_provider = app.world().get::<FlowFieldProvider>(provider).unwrap();
		assert_eq!(Some(FieldCell::new(4, 0)), flow_field_provider.get_destination());
		// due
		app.world_mut()
			.resource_mut::<Time>()
			.advance_by(Duration::from_millis(200));
		app.update();
		let flow_field_provider = app.world().get::<FlowFieldProvider>(provider).unwrap();
		assert_eq!(Some(FieldCell::new(0, 4)), flow_field_provider.get_destination());
		let events = app.world().resource::<Events<EventFlowFieldRefreshed>>();
		assert_eq!(1, events.iter_current_update_events().count());
	}
}
