//! Measure refreshing a FlowFieldProvider through a serpentine maze of walls
//!
//! World is 200 cells by 200 cells, every fourth column is a wall with a
//! single gap alternating between the top and bottom rows
//!
//! ```text
//!  _______________________
//! |__|__|__|__|__|__|x_|__|
//! |__|__|x_|__|__|__|x_|__|
//! |__|__|x_|__|__|__|x_|__|
//! |__|__|x_|__|__|__|__|__|
//! ```
//!

use bevy::prelude::*;
use bevy_flowfield_provider::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Walls of the maze as ground plane rectangles
fn maze(columns: usize, rows: usize) -> StaticObstacles {
	let mut obstacles = StaticObstacles::default();
	for (i, column) in (2..columns).step_by(4).enumerate() {
		let x = column as f32;
		// gap at the top or the bottom
		let (bottom, top) = if i % 2 == 0 {
			(0.0, rows as f32 - 1.0)
		} else {
			(1.0, rows as f32)
		};
		obstacles.push(ObstacleRegion::new(
			ObstacleClassification::default(),
			Vec2::new(x, bottom),
			Vec2::new(x + 1.0, top),
		));
	}
	obstacles
}

/// Create the provider and scan its walls before benchmarking
fn prepare_provider(columns: usize, rows: usize) -> FlowFieldProvider {
	FlowFieldProvider::new(
		1.0,
		Vec3::ZERO,
		Vec3::new(columns as f32, 0.0, rows as f32),
		maze(columns, rows),
	)
	.unwrap()
}

/// Flow from the far side of the maze
fn refresh_maze(provider: &mut FlowFieldProvider, destination: Vec3) {
	let _ = provider.refresh(destination);
}

pub fn criterion_benchmark(c: &mut Criterion) {
	let mut group = c.benchmark_group("algorithm_use");
	group.significance_level(0.05).sample_size(100);
	let mut provider = prepare_provider(200, 200);
	group.bench_function("refresh_maze", |b| {
		b.iter(|| refresh_maze(black_box(&mut provider), black_box(Vec3::new(199.5, 0.0, 0.5))))
	});
	group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
