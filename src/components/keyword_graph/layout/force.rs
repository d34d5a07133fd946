use log::warn;
use rand::Rng;

use super::super::config::{ForceParams, LayoutMode};
use super::super::model::{Graph, NodeIdx};
use super::super::scale::{Point, SimulationSpace};
use super::quadtree::QuadNode;
use super::{LayoutEngine, clamp_length};

/// Cooling applied inside a tick.
const ALPHA_DECAY: f64 = 0.99;

/// Verlet particle simulation: springs along links, pairwise charge and a
/// weak pull toward the middle of the `[0, size]²` square.
pub struct ForceDirected {
	params: ForceParams,
	positions: Vec<Point>,
	previous: Vec<Point>,
	links: Vec<(usize, usize)>,
	degree: Vec<f64>,
	alpha: f64,
}

impl ForceDirected {
	pub fn new<R: Rng>(graph: &Graph, params: ForceParams, rng: &mut R) -> Self {
		let positions: Vec<Point> = (0..graph.len())
			.map(|_| Point::new(rng.r#gen::<f64>() * params.size, rng.r#gen::<f64>() * params.size))
			.collect();

		let mut degree = vec![0.0; graph.len()];
		let links = graph
			.edges()
			.iter()
			.filter(|edge| !edge.is_loop())
			.map(|edge| {
				degree[edge.source.0] += 1.0;
				degree[edge.target.0] += 1.0;
				(edge.source.0, edge.target.0)
			})
			.collect();

		Self {
			previous: positions.clone(),
			positions,
			params,
			links,
			degree,
			alpha: 0.0,
		}
	}

	pub fn positions(&self) -> &[Point] {
		&self.positions
	}

	/// One integration pass at the current temperature.
	fn tick(&mut self) {
		self.alpha *= ALPHA_DECAY;
		let alpha = self.alpha;
		let last_good = self.positions.clone();

		for &(s, t) in &self.links {
			let delta = self.positions[t] - self.positions[s];
			let len = delta.length();
			if len <= 0.0 {
				continue;
			}
			let pull = delta
				* (alpha * self.params.link_strength * (len - self.params.link_distance) / len);
			let (ws, wt) = (self.degree[s], self.degree[t]);
			let k = if ws + wt > 0.0 { ws / (ws + wt) } else { 0.5 };
			self.positions[t] -= pull * k;
			self.positions[s] += pull * (1.0 - k);
		}

		let gravity = alpha * self.params.gravity;
		if gravity != 0.0 {
			let center = Point::new(self.params.size / 2.0, self.params.size / 2.0);
			for p in &mut self.positions {
				*p += (center - *p) * gravity;
			}
		}

		if self.params.charge != 0.0 {
			if let Some(tree) = QuadNode::build(&self.positions) {
				let point_charge = alpha * self.params.charge;
				for i in 0..self.positions.len() {
					let impulse =
						tree.charge_impulse(i, &self.positions, point_charge, self.params.theta);
					self.previous[i] -= impulse;
				}
			}
		}

		let mut restored = 0;
		for ((p, prev), good) in self
			.positions
			.iter_mut()
			.zip(self.previous.iter_mut())
			.zip(&last_good)
		{
			let velocity = (*p - *prev) * self.params.friction;
			*prev = *p;
			*p += velocity;

			if !(p.is_finite() && prev.is_finite()) {
				*p = *good;
				*prev = *good;
				restored += 1;
				continue;
			}
			*p = *good + clamp_length(*p - *good, self.params.max_step);
			*prev = *p - clamp_length(*p - *prev, self.params.max_step);
		}
		if restored > 0 {
			warn!("force layout: held {restored} node(s) at their last finite position");
		}
	}
}

impl LayoutEngine for ForceDirected {
	/// Restarts the solver, ticks once and stops it again, so nothing moves
	/// between frames and every frame costs one tick.
	fn step(&mut self) {
		self.alpha = self.params.alpha;
		self.tick();
		self.alpha = 0.0;
	}

	fn position(&self, node: NodeIdx) -> Point {
		self.positions[node.0]
	}

	fn space(&self) -> SimulationSpace {
		SimulationSpace::Extent(self.params.size)
	}

	fn mode(&self) -> LayoutMode {
		LayoutMode::ForceDirected
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;
	use crate::components::keyword_graph::types::{GraphData, GraphLink, GraphNode};

	fn chain(n: usize) -> Graph {
		let data = GraphData {
			nodes: (0..n).map(|i| GraphNode::new(i.to_string(), "g")).collect(),
			edges: (1..n)
				.map(|i| GraphLink::new((i - 1).to_string(), i.to_string(), 1.0))
				.collect(),
		};
		Graph::from_data(&data).unwrap()
	}

	fn engine(graph: &Graph, params: ForceParams, seed: u64) -> ForceDirected {
		ForceDirected::new(graph, params, &mut StdRng::seed_from_u64(seed))
	}

	#[test]
	fn initial_positions_lie_in_the_square() {
		let graph = chain(50);
		let layout = engine(&graph, ForceParams::default(), 3);
		for p in layout.positions() {
			assert!((0.0..1500.0).contains(&p.x));
			assert!((0.0..1500.0).contains(&p.y));
		}
	}

	#[test]
	fn same_seed_same_trajectory() {
		let graph = chain(20);
		let mut a = engine(&graph, ForceParams::default(), 11);
		let mut b = engine(&graph, ForceParams::default(), 11);
		for _ in 0..25 {
			a.step();
			b.step();
		}
		assert_eq!(a.positions(), b.positions());
	}

	#[test]
	fn one_step_is_bounded() {
		let graph = chain(30);
		let params = ForceParams {
			charge: -5000.0,
			link_strength: 1.0,
			max_step: 40.0,
			..ForceParams::default()
		};
		let mut layout = engine(&graph, params, 5);
		for _ in 0..50 {
			let before = layout.positions().to_vec();
			layout.step();
			for (a, b) in before.iter().zip(layout.positions()) {
				assert!((*b - *a).length() <= 40.0 + 1e-9);
			}
		}
	}

	#[test]
	fn linked_pair_settles_near_link_distance() {
		let graph = chain(2);
		let params = ForceParams {
			charge: 0.0,
			gravity: 0.0,
			link_strength: 1.0,
			..ForceParams::default()
		};
		let mut layout = engine(&graph, params, 9);
		for _ in 0..2000 {
			layout.step();
		}
		let distance = (layout.positions()[1] - layout.positions()[0]).length();
		assert!((distance - 50.0).abs() < 1.0, "distance was {distance}");
	}

	#[test]
	fn charge_pushes_isolated_nodes_apart() {
		let graph = Graph::from_data(&GraphData {
			nodes: vec![GraphNode::new("a", "g"), GraphNode::new("b", "g")],
			edges: Vec::new(),
		})
		.unwrap();
		let params = ForceParams {
			gravity: 0.0,
			..ForceParams::default()
		};
		let mut layout = engine(&graph, params, 1);
		let before = (layout.positions()[1] - layout.positions()[0]).length();
		for _ in 0..10 {
			layout.step();
		}
		let after = (layout.positions()[1] - layout.positions()[0]).length();
		assert!(after > before);
	}

	#[test]
	fn runaway_forces_hold_last_finite_position() {
		let graph = chain(3);
		let params = ForceParams {
			charge: f64::NEG_INFINITY,
			..ForceParams::default()
		};
		let mut layout = engine(&graph, params, 2);
		for _ in 0..5 {
			layout.step();
			assert!(layout.positions().iter().all(|p| p.is_finite()));
		}
	}

	#[test]
	fn empty_graph_steps_without_work() {
		let graph = Graph::default();
		let mut layout = engine(&graph, ForceParams::default(), 0);
		layout.step();
		assert!(layout.positions().is_empty());
	}
}
