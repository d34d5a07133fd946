//! Layout engines. Each owns the simulation-space position of every node.

mod force;
mod quadtree;
mod rigid;

use rand::Rng;

pub use force::ForceDirected;
pub use rigid::{CollisionGroup, RigidBody};

use super::config::{LayoutConfig, LayoutMode};
use super::model::{Graph, NodeIdx};
use super::scale::{Point, SimulationSpace, Viewport};

/// A simulation backend driven one step per frame.
pub trait LayoutEngine {
	/// Advances the simulation by exactly one step.
	fn step(&mut self);

	/// Current position of `node`, always finite.
	fn position(&self, node: NodeIdx) -> Point;

	/// The space [`position`](Self::position) reports in.
	fn space(&self) -> SimulationSpace;

	/// Reacts to a new viewport. Engines living in an abstract space ignore it.
	fn resize(&mut self, _viewport: &Viewport) {}

	fn mode(&self) -> LayoutMode;
}

/// Builds the engine selected by `config.mode`.
pub fn build_layout<R: Rng>(
	graph: &Graph,
	config: &LayoutConfig,
	viewport: &Viewport,
	node_radius: f64,
	rng: &mut R,
) -> Box<dyn LayoutEngine> {
	match config.mode {
		LayoutMode::ForceDirected => Box::new(ForceDirected::new(graph, config.force.clone(), rng)),
		LayoutMode::RigidBody => Box::new(RigidBody::new(
			graph,
			config.rigid.clone(),
			viewport,
			node_radius,
			rng,
		)),
	}
}

/// Replaces every non-finite entry of `current` with its `last_good`
/// counterpart. Returns how many entries were restored.
fn restore_non_finite(current: &mut [Point], last_good: &[Point]) -> usize {
	let mut restored = 0;
	for (p, good) in current.iter_mut().zip(last_good) {
		if !p.is_finite() {
			*p = *good;
			restored += 1;
		}
	}
	restored
}

/// Scales `delta` down to at most `limit` in length. Non-finite input
/// collapses to zero.
fn clamp_length(delta: Point, limit: f64) -> Point {
	let len = delta.length();
	if !len.is_finite() {
		Point::ZERO
	} else if len > limit {
		delta * (limit / len)
	} else {
		delta
	}
}
