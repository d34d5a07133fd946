//! Simulation space to screen space.

use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};

/// A 2D point or vector.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn length_sq(self) -> f64 {
		self.x * self.x + self.y * self.y
	}

	pub fn length(self) -> f64 {
		self.length_sq().sqrt()
	}

	pub fn is_finite(self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}

	/// Mean of `points`, or `None` when there are none.
	pub fn centroid<I: IntoIterator<Item = Point>>(points: I) -> Option<Point> {
		let (sum, count) = points
			.into_iter()
			.fold((Point::ZERO, 0usize), |(sum, n), p| (sum + p, n + 1));
		(count > 0).then(|| sum / count as f64)
	}
}

impl Add for Point {
	type Output = Point;
	fn add(self, rhs: Point) -> Point {
		Point::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl AddAssign for Point {
	fn add_assign(&mut self, rhs: Point) {
		self.x += rhs.x;
		self.y += rhs.y;
	}
}

impl Sub for Point {
	type Output = Point;
	fn sub(self, rhs: Point) -> Point {
		Point::new(self.x - rhs.x, self.y - rhs.y)
	}
}

impl SubAssign for Point {
	fn sub_assign(&mut self, rhs: Point) {
		self.x -= rhs.x;
		self.y -= rhs.y;
	}
}

impl Mul<f64> for Point {
	type Output = Point;
	fn mul(self, rhs: f64) -> Point {
		Point::new(self.x * rhs, self.y * rhs)
	}
}

impl Div<f64> for Point {
	type Output = Point;
	fn div(self, rhs: f64) -> Point {
		Point::new(self.x / rhs, self.y / rhs)
	}
}

/// Drawing surface size. CSS pixels times the device pixel ratio gives the
/// backing-store size everything is drawn in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub css_width: f64,
	pub css_height: f64,
	pub pixel_ratio: f64,
}

impl Viewport {
	/// A non-positive or non-finite `pixel_ratio` is taken as 1.
	pub fn new(css_width: f64, css_height: f64, pixel_ratio: f64) -> Self {
		let pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
			pixel_ratio
		} else {
			1.0
		};
		Self {
			css_width: css_width.max(0.0),
			css_height: css_height.max(0.0),
			pixel_ratio,
		}
	}

	/// Width in device pixels.
	pub fn width(&self) -> f64 {
		self.css_width * self.pixel_ratio
	}

	/// Height in device pixels.
	pub fn height(&self) -> f64 {
		self.css_height * self.pixel_ratio
	}

	/// The shorter of width and height.
	pub fn min_side(&self) -> f64 {
		self.width().min(self.height())
	}

	/// Middle of the drawing surface in device pixels.
	pub fn center(&self) -> Point {
		Point::new(self.width() / 2.0, self.height() / 2.0)
	}

	/// Whether `p` lies on the drawing surface, edges included.
	pub fn contains(&self, p: Point) -> bool {
		(0.0..=self.width()).contains(&p.x) && (0.0..=self.height()).contains(&p.y)
	}
}

/// The coordinate system a layout engine reports positions in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimulationSpace {
	/// Square `[0, extent]²`, independent of the viewport.
	Extent(f64),
	/// Already in device pixels.
	Screen,
}

/// Maps one simulation point onto the viewport.
///
/// The extent square is scaled to the shorter viewport side and centered on
/// each axis independently.
pub fn to_screen(space: SimulationSpace, viewport: &Viewport, sim: Point) -> Point {
	match space {
		SimulationSpace::Screen => sim,
		SimulationSpace::Extent(extent) => {
			let scale = viewport.min_side() / extent;
			Point::new(
				(sim.x - extent / 2.0) * scale + viewport.width() / 2.0,
				(sim.y - extent / 2.0) * scale + viewport.height() / 2.0,
			)
		}
	}
}
