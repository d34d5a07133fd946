//! Tunables for layout, scene and drawing.
//!
//! Every field has a default, so a partial JSON object (or none at all) is a
//! valid configuration.

use serde::Deserialize;

use super::error::ConfigError;

/// Category palette groups draw their color from.
pub const COLORS: &[&str] = &[
	"#1f77b4", "#aec7e8", "#ff7f0e", "#ffbb78", "#2ca02c", "#98df8a", "#d62728", "#ff9896",
	"#9467bd", "#c5b0d5", "#8c564b", "#c49c94", "#e377c2", "#f7b6d2", "#7f7f7f", "#c7c7c7",
	"#bcbd22", "#dbdb8d", "#17becf", "#9edae5",
];

/// Simulation strategy, fixed for the lifetime of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutMode {
	#[default]
	#[serde(alias = "force")]
	ForceDirected,
	#[serde(alias = "rigid")]
	RigidBody,
}

impl LayoutMode {
	/// Parses the short names used in the page query string.
	pub fn from_query(value: &str) -> Option<Self> {
		match value {
			"force" | "force-directed" => Some(Self::ForceDirected),
			"rigid" | "rigid-body" => Some(Self::RigidBody),
			_ => None,
		}
	}
}

/// Knobs of the force-directed solver.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForceParams {
	/// Side length of the square simulation space.
	pub size: f64,
	/// Stiffness of every link, in `[0, 1]`.
	pub link_strength: f64,
	/// Rest length of every link, in simulation units.
	pub link_distance: f64,
	/// Pairwise charge; negative values repel.
	pub charge: f64,
	/// Pull toward the middle of the simulation space.
	pub gravity: f64,
	/// Velocity retained after each tick.
	pub friction: f64,
	/// Barnes-Hut opening criterion.
	pub theta: f64,
	/// Temperature the solver is restarted at on each frame.
	pub alpha: f64,
	/// Largest displacement a particle may take in one tick.
	pub max_step: f64,
}

impl Default for ForceParams {
	fn default() -> Self {
		Self {
			size: 1500.0,
			link_strength: 0.1,
			link_distance: 50.0,
			charge: -40.0,
			gravity: 0.1,
			friction: 0.9,
			theta: 0.8,
			alpha: 0.1,
			max_step: 100.0,
		}
	}
}

/// Knobs of the rigid-body world. Distances are device pixels.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RigidParams {
	/// Seconds integrated per frame.
	pub time_step: f64,
	/// Centering acceleration per squared pixel of distance from the center.
	pub attraction: f64,
	/// Linear velocity damping, per second.
	pub friction: f64,
	/// Constraint length per unit of edge value.
	pub link_length: f64,
	/// Fraction of a constraint error corrected per relaxation pass.
	pub stiffness: f64,
	/// Relaxation passes per step.
	pub iterations: usize,
	/// Radius of the initial scatter disk, as a fraction of the shorter viewport side.
	pub scatter: f64,
	/// Speed cap in pixels per second.
	pub max_speed: f64,
	/// Whether node bodies push each other apart.
	pub collide: bool,
}

impl Default for RigidParams {
	fn default() -> Self {
		Self {
			time_step: 1.0 / 60.0,
			attraction: 0.002,
			friction: 2.0,
			link_length: 50.0,
			stiffness: 0.5,
			iterations: 4,
			scatter: 0.25,
			max_speed: 1200.0,
			collide: true,
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
	pub mode: LayoutMode,
	pub force: ForceParams,
	pub rigid: RigidParams,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct NodeStyle {
	/// Radius as a percentage of the shorter viewport side, before pixel ratio.
	pub radius_percent: f64,
	pub stroke: f64,
	pub stroke_color: String,
}

impl Default for NodeStyle {
	fn default() -> Self {
		Self {
			radius_percent: 0.2,
			stroke: 1.0,
			stroke_color: "#7e7e7e".into(),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LabelStyle {
	pub base_size: f64,
	pub size_per_member: f64,
	pub font: String,
	pub weight: String,
	pub stroke_color: String,
	pub stroke_thickness: f64,
}

impl Default for LabelStyle {
	fn default() -> Self {
		Self {
			base_size: 20.0,
			size_per_member: 1.0,
			font: "Calibri".into(),
			weight: "lighter".into(),
			stroke_color: "#545454".into(),
			stroke_thickness: 2.0,
		}
	}
}

impl LabelStyle {
	/// Font size for a cluster of `members` nodes.
	pub fn font_size(&self, members: usize, pixel_ratio: f64) -> f64 {
		(self.base_size + self.size_per_member * members as f64) * pixel_ratio
	}
}

/// Stroke shared by every edge line.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EdgeStyle {
	pub width: f64,
	pub color: String,
	pub alpha: f64,
}

impl Default for EdgeStyle {
	fn default() -> Self {
		Self {
			width: 1.0,
			color: "#000000".into(),
			alpha: 0.2,
		}
	}
}

/// Everything a session needs besides the document and the viewport.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	pub seed: u64,
	/// Clusters with fewer members than this get no label.
	pub keyword_threshold: usize,
	pub palette: Vec<String>,
	pub background: String,
	pub layout: LayoutConfig,
	pub node: NodeStyle,
	pub label: LabelStyle,
	pub edge: EdgeStyle,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			seed: 0,
			keyword_threshold: 2,
			palette: COLORS.iter().map(|c| (*c).to_owned()).collect(),
			background: "#FFFFFF".into(),
			layout: LayoutConfig::default(),
			node: NodeStyle::default(),
			label: LabelStyle::default(),
			edge: EdgeStyle::default(),
		}
	}
}

impl GraphConfig {
	pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
		let config: Self = serde_json::from_str(raw)?;
		config.validate()?;
		Ok(config)
	}

	pub fn with_mode(mut self, mode: LayoutMode) -> Self {
		self.layout.mode = mode;
		self
	}

	pub fn with_seed(mut self, seed: u64) -> Self {
		self.seed = seed;
		self
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_owned()));
		let force = &self.layout.force;
		let rigid = &self.layout.rigid;

		if self.palette.is_empty() {
			return invalid("palette must contain at least one color");
		}
		if !(force.size.is_finite() && force.size > 0.0) {
			return invalid("force.size must be positive");
		}
		if !(0.0..=1.0).contains(&force.friction) {
			return invalid("force.friction must lie in [0, 1]");
		}
		if !(force.max_step > 0.0) {
			return invalid("force.max_step must be positive");
		}
		if !(rigid.time_step > 0.0) {
			return invalid("rigid.time_step must be positive");
		}
		if !(rigid.max_speed > 0.0) {
			return invalid("rigid.max_speed must be positive");
		}
		if !(0.0..=1.0).contains(&rigid.stiffness) {
			return invalid("rigid.stiffness must lie in [0, 1]");
		}
		Ok(())
	}
}
