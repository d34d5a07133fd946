use super::super::scale::Point;

const LEAF_CAPACITY: usize = 12;
const MAX_DEPTH: usize = 10;

#[derive(Clone, Copy, Debug)]
struct QuadBounds {
	center: Point,
	half_extent: f64,
}

impl QuadBounds {
	fn from_points(points: &[Point]) -> Option<Self> {
		let mut min = Point::new(f64::INFINITY, f64::INFINITY);
		let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
		for p in points {
			min.x = min.x.min(p.x);
			min.y = min.y.min(p.y);
			max.x = max.x.max(p.x);
			max.y = max.y.max(p.y);
		}
		if !min.is_finite() || !max.is_finite() {
			return None;
		}

		let span = (max.x - min.x).max(max.y - min.y).max(1.0);
		Some(Self {
			center: (min + max) * 0.5,
			half_extent: span * 0.5 + 1.0,
		})
	}

	fn contains(self, p: Point) -> bool {
		(p.x - self.center.x).abs() <= self.half_extent
			&& (p.y - self.center.y).abs() <= self.half_extent
	}

	fn child(self, quadrant: usize) -> Self {
		let quarter = self.half_extent * 0.5;
		let offset = match quadrant {
			0 => Point::new(-quarter, -quarter),
			1 => Point::new(quarter, -quarter),
			2 => Point::new(-quarter, quarter),
			_ => Point::new(quarter, quarter),
		};
		Self {
			center: self.center + offset,
			half_extent: quarter,
		}
	}

	fn quadrant_for(self, p: Point) -> usize {
		match (p.x >= self.center.x, p.y >= self.center.y) {
			(false, false) => 0,
			(true, false) => 1,
			(false, true) => 2,
			(true, true) => 3,
		}
	}

	fn side(self) -> f64 {
		self.half_extent * 2.0
	}
}

/// Barnes-Hut tree over particle positions. Every particle carries the same
/// charge, so a cell's charge center is the mean of its points.
pub(super) struct QuadNode {
	bounds: QuadBounds,
	center: Point,
	count: usize,
	indices: Vec<usize>,
	children: [Option<Box<QuadNode>>; 4],
}

impl QuadNode {
	/// `None` when there are no points or some of them are not finite.
	pub(super) fn build(positions: &[Point]) -> Option<Self> {
		if positions.is_empty() {
			return None;
		}
		let bounds = QuadBounds::from_points(positions)?;
		Some(Self::build_node(
			bounds,
			(0..positions.len()).collect(),
			positions,
			0,
		))
	}

	fn build_node(bounds: QuadBounds, indices: Vec<usize>, positions: &[Point], depth: usize) -> Self {
		let center = Point::centroid(indices.iter().map(|&i| positions[i])).unwrap_or(bounds.center);
		let mut node = Self {
			bounds,
			center,
			count: indices.len(),
			indices,
			children: std::array::from_fn(|_| None),
		};
		if depth >= MAX_DEPTH || node.indices.len() <= LEAF_CAPACITY {
			return node;
		}

		let mut buckets = std::array::from_fn::<_, 4, _>(|_| Vec::new());
		for &i in &node.indices {
			buckets[bounds.quadrant_for(positions[i])].push(i);
		}
		if buckets.iter().filter(|b| !b.is_empty()).count() <= 1 {
			return node;
		}

		for (quadrant, bucket) in buckets.into_iter().enumerate() {
			if bucket.is_empty() {
				continue;
			}
			node.children[quadrant] = Some(Box::new(Self::build_node(
				bounds.child(quadrant),
				bucket,
				positions,
				depth + 1,
			)));
		}
		node.indices.clear();
		node
	}

	fn is_leaf(&self) -> bool {
		self.children.iter().all(Option::is_none)
	}

	/// Sums the charge impulse on particle `index`.
	///
	/// `point_charge` is the already alpha-scaled charge of one particle. The
	/// result is to be subtracted from the particle's previous position, so a
	/// negative charge pushes particles apart. Coincident particles exert
	/// nothing on each other.
	pub(super) fn charge_impulse(
		&self,
		index: usize,
		positions: &[Point],
		point_charge: f64,
		theta: f64,
	) -> Point {
		let mut impulse = Point::ZERO;
		self.accumulate(index, positions, point_charge, theta * theta, &mut impulse);
		impulse
	}

	fn accumulate(
		&self,
		index: usize,
		positions: &[Point],
		point_charge: f64,
		theta_sq: f64,
		impulse: &mut Point,
	) {
		let p = positions[index];

		if self.is_leaf() {
			for &other in &self.indices {
				if other == index {
					continue;
				}
				let delta = positions[other] - p;
				let dn = delta.length_sq();
				if dn > 0.0 {
					*impulse += delta * (point_charge / dn);
				}
			}
			return;
		}

		let delta = self.center - p;
		let dn = delta.length_sq();
		let side = self.bounds.side();
		if !self.bounds.contains(p) && dn > 0.0 && side * side / theta_sq < dn {
			*impulse += delta * (point_charge * self.count as f64 / dn);
			return;
		}

		for child in self.children.iter().flatten() {
			child.accumulate(index, positions, point_charge, theta_sq, impulse);
		}
	}
}
