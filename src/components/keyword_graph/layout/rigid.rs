use std::f64::consts::TAU;

use log::warn;
use rand::Rng;

use super::super::config::{LayoutMode, RigidParams};
use super::super::model::{Graph, NodeIdx};
use super::super::scale::{Point, SimulationSpace, Viewport};
use super::{LayoutEngine, clamp_length, restore_non_finite};

/// Bitmask pair deciding which bodies push each other apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionGroup {
	pub group: u32,
	pub mask: u32,
}

impl CollisionGroup {
	pub const NODES: Self = Self { group: 1, mask: 1 };
	pub const NONE: Self = Self { group: 0, mask: 0 };

	pub fn collides(self, other: Self) -> bool {
		self.group & other.mask != 0 && other.group & self.mask != 0
	}
}

#[derive(Clone, Debug)]
struct Body {
	position: Point,
	velocity: Point,
	radius: f64,
	collision: CollisionGroup,
}

#[derive(Clone, Copy, Debug)]
struct DistanceConstraint {
	a: usize,
	b: usize,
	length: f64,
}

/// Circular bodies in screen space, held together by distance constraints
/// and pulled toward the viewport center.
///
/// Integration is position based: bodies move under the centering force,
/// constraints and contacts are relaxed, and velocities are re-derived from
/// the resulting displacement.
pub struct RigidBody {
	params: RigidParams,
	bodies: Vec<Body>,
	constraints: Vec<DistanceConstraint>,
	center: Point,
	width: f64,
	height: f64,
}

impl RigidBody {
	/// One body per node, scattered on a disk around the viewport center with
	/// density rising toward the middle.
	pub fn new<R: Rng>(
		graph: &Graph,
		params: RigidParams,
		viewport: &Viewport,
		radius: f64,
		rng: &mut R,
	) -> Self {
		let spread = params.scatter * viewport.min_side();
		let group = if params.collide {
			CollisionGroup::NODES
		} else {
			CollisionGroup::NONE
		};
		let mut world = Self::empty(params, viewport);

		for _ in graph.node_indices() {
			let r: f64 = rng.r#gen();
			let angle = rng.r#gen::<f64>() * TAU;
			let offset = (1.0 - r * r) * spread;
			let position = world.center + Point::new(angle.cos(), angle.sin()) * offset;
			let body = world.create_body(position, radius);
			world.set_collision_group(body, group);
		}
		for edge in graph.edges().iter().filter(|edge| !edge.is_loop()) {
			let length = edge.value * world.params.link_length;
			world.create_distance_constraint(edge.source.0, edge.target.0, length);
		}
		world
	}

	/// A world with no bodies.
	pub fn empty(params: RigidParams, viewport: &Viewport) -> Self {
		Self {
			params,
			bodies: Vec::new(),
			constraints: Vec::new(),
			center: viewport.center(),
			width: viewport.width(),
			height: viewport.height(),
		}
	}

	pub fn create_body(&mut self, position: Point, radius: f64) -> usize {
		self.bodies.push(Body {
			position,
			velocity: Point::ZERO,
			radius: radius.max(0.0),
			collision: CollisionGroup::NODES,
		});
		self.bodies.len() - 1
	}

	pub fn create_distance_constraint(&mut self, a: usize, b: usize, length: f64) {
		self.constraints.push(DistanceConstraint { a, b, length });
	}

	pub fn set_collision_group(&mut self, body: usize, group: CollisionGroup) {
		self.bodies[body].collision = group;
	}

	pub fn positions(&self) -> Vec<Point> {
		self.bodies.iter().map(|b| b.position).collect()
	}

	pub fn center(&self) -> Point {
		self.center
	}

	pub fn constraint_lengths(&self) -> impl Iterator<Item = f64> + '_ {
		self.constraints.iter().map(|c| c.length)
	}

	/// Quadratic pull toward the center, minus linear friction.
	fn apply_forces(&mut self, dt: f64) {
		let RigidParams {
			attraction,
			friction,
			max_speed,
			..
		} = self.params;
		for body in &mut self.bodies {
			let offset = self.center - body.position;
			let accel = offset * (attraction * offset.length()) - body.velocity * friction;
			body.velocity = clamp_length(body.velocity + accel * dt, max_speed);
			body.position += body.velocity * dt;
		}
	}

	fn solve_constraints(&mut self) {
		let stiffness = self.params.stiffness;
		for c in &self.constraints {
			let delta = self.bodies[c.b].position - self.bodies[c.a].position;
			let len = delta.length();
			if len <= 0.0 {
				continue;
			}
			let correction = delta * ((len - c.length) / len * stiffness * 0.5);
			self.bodies[c.a].position += correction;
			self.bodies[c.b].position -= correction;
		}
	}

	/// Separates overlapping bodies, using a sweep along x as broad phase.
	fn solve_contacts(&mut self) {
		let mut order: Vec<usize> = (0..self.bodies.len())
			.filter(|&i| self.bodies[i].collision != CollisionGroup::NONE)
			.collect();
		order.sort_by(|&a, &b| {
			let (a, b) = (&self.bodies[a], &self.bodies[b]);
			(a.position.x - a.radius).total_cmp(&(b.position.x - b.radius))
		});

		for (i, &a) in order.iter().enumerate() {
			for &b in &order[i + 1..] {
				let (body_a, body_b) = (&self.bodies[a], &self.bodies[b]);
				if body_b.position.x - body_b.radius > body_a.position.x + body_a.radius {
					break;
				}
				if !body_a.collision.collides(body_b.collision) {
					continue;
				}
				let min_distance = body_a.radius + body_b.radius;
				let delta = body_b.position - body_a.position;
				let distance = delta.length();
				if distance >= min_distance {
					continue;
				}
				let direction = if distance > 1e-9 {
					delta / distance
				} else {
					let angle = (a as f64 * 0.618_034 + b as f64 * 0.414_214) * TAU;
					Point::new(angle.cos(), angle.sin())
				};
				let push = direction * ((min_distance - distance) * 0.5);
				self.bodies[a].position -= push;
				self.bodies[b].position += push;
			}
		}
	}

	fn keep_in_bounds(&mut self) {
		let fit = |v: f64, r: f64, extent: f64| {
			if extent <= 2.0 * r {
				extent / 2.0
			} else {
				v.clamp(r, extent - r)
			}
		};
		for body in &mut self.bodies {
			body.position.x = fit(body.position.x, body.radius, self.width);
			body.position.y = fit(body.position.y, body.radius, self.height);
		}
	}
}

impl LayoutEngine for RigidBody {
	fn step(&mut self) {
		let dt = self.params.time_step;
		let last_good = self.positions();

		self.apply_forces(dt);
		for _ in 0..self.params.iterations {
			self.solve_constraints();
			if self.params.collide {
				self.solve_contacts();
			}
		}
		self.keep_in_bounds();

		let mut positions = self.positions();
		let restored = restore_non_finite(&mut positions, &last_good);
		let max_step = self.params.max_speed * dt;
		for ((body, position), good) in self.bodies.iter_mut().zip(positions).zip(&last_good) {
			let moved = clamp_length(position - *good, max_step);
			body.position = *good + moved;
			body.velocity = moved / dt;
		}
		if restored > 0 {
			warn!("rigid layout: held {restored} body(ies) at their last finite position");
		}
	}

	fn position(&self, node: NodeIdx) -> Point {
		self.bodies[node.0].position
	}

	fn space(&self) -> SimulationSpace {
		SimulationSpace::Screen
	}

	fn resize(&mut self, viewport: &Viewport) {
		self.center = viewport.center();
		self.width = viewport.width();
		self.height = viewport.height();
		self.keep_in_bounds();
	}

	fn mode(&self) -> LayoutMode {
		LayoutMode::RigidBody
	}
}
