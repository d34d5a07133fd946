use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::config::GraphConfig;
use super::error::SessionError;
use super::frame::update_frame;
use super::layout::{LayoutEngine, build_layout};
use super::model::Graph;
use super::render::{DisplayList, Renderer};
use super::scale::{Point, Viewport, to_screen};
use super::scene::{Scene, node_radius};
use super::types::GraphData;

/// One running visualization: topology, simulation and visual handles.
pub struct KeywordGraphState<R: Renderer = DisplayList> {
	pub graph: Graph,
	pub scene: Scene,
	pub renderer: R,
	pub viewport: Viewport,
	pub config: GraphConfig,
	layout: Box<dyn LayoutEngine>,
}

impl<R: Renderer> KeywordGraphState<R> {
	/// Validates the configuration and the document, then builds layout and
	/// scene. Nothing is drawn or simulated when this fails.
	pub fn new(
		data: &GraphData,
		viewport: Viewport,
		config: GraphConfig,
		mut renderer: R,
	) -> Result<Self, SessionError> {
		config.validate()?;
		let graph = Graph::from_data(data)?;
		let mut rng = StdRng::seed_from_u64(config.seed);
		let radius = node_radius(&config.node, &viewport);
		let layout = build_layout(&graph, &config.layout, &viewport, radius, &mut rng);
		let scene = Scene::build(
			&graph,
			layout.as_ref(),
			&viewport,
			&config,
			&mut rng,
			&mut renderer,
		);

		info!(
			"keyword graph ready: {} nodes, {} edges, {} labels, {:?} layout, seed {}",
			graph.len(),
			graph.edges().len(),
			scene.clusters().count(),
			layout.mode(),
			config.seed,
		);

		Ok(Self {
			graph,
			scene,
			renderer,
			viewport,
			config,
			layout,
		})
	}

	/// Advances one frame.
	pub fn tick(&mut self) {
		update_frame(
			&self.graph,
			self.layout.as_mut(),
			&self.scene,
			&self.viewport,
			&self.config.edge,
			&mut self.renderer,
		);
	}

	pub fn resize(&mut self, viewport: Viewport) {
		debug!(
			"resize to {}x{} @{}",
			viewport.css_width, viewport.css_height, viewport.pixel_ratio
		);
		self.viewport = viewport;
		self.layout.resize(&self.viewport);
	}

	pub fn layout(&self) -> &dyn LayoutEngine {
		self.layout.as_ref()
	}

	/// Where the layout currently puts every node on screen.
	pub fn screen_positions(&self) -> Vec<Point> {
		let space = self.layout.space();
		self.graph
			.node_indices()
			.map(|idx| to_screen(space, &self.viewport, self.layout.position(idx)))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::keyword_graph::config::LayoutMode;
	use crate::components::keyword_graph::error::{ConfigError, GraphError};
	use crate::components::keyword_graph::types::{GraphLink, GraphNode};

	fn data() -> GraphData {
		GraphData {
			nodes: vec![
				GraphNode::new("a", "g1").with_keywords(["x"]),
				GraphNode::new("b", "g1").with_keywords(["x"]),
				GraphNode::new("c", "g2"),
			],
			edges: vec![GraphLink::new("a", "b", 1.0), GraphLink::new("b", "c", 2.0)],
		}
	}

	#[test]
	fn unknown_endpoint_stops_construction() {
		let mut bad = data();
		bad.edges.push(GraphLink::new("a", "zz", 1.0));
		let result = KeywordGraphState::new(
			&bad,
			Viewport::new(800.0, 600.0, 1.0),
			GraphConfig::default(),
			DisplayList::default(),
		);
		assert!(matches!(
			result,
			Err(SessionError::Graph(GraphError::UnknownEndpoint { .. }))
		));
	}

	fn start(config: GraphConfig) -> Result<KeywordGraphState, SessionError> {
		KeywordGraphState::new(
			&data(),
			Viewport::new(800.0, 600.0, 1.0),
			config,
			DisplayList::default(),
		)
	}

	#[test]
	fn empty_palette_is_rejected_before_building() {
		let config = GraphConfig {
			palette: Vec::new(),
			..GraphConfig::default()
		};
		assert!(matches!(
			start(config),
			Err(SessionError::Config(ConfigError::Invalid(_)))
		));
	}

	#[test]
	fn degenerate_simulation_sizes_are_rejected() {
		let mut zero_extent = GraphConfig::default();
		zero_extent.layout.force.size = 0.0;
		assert!(matches!(
			start(zero_extent),
			Err(SessionError::Config(ConfigError::Invalid(_)))
		));

		let mut zero_step = GraphConfig::default().with_mode(LayoutMode::RigidBody);
		zero_step.layout.rigid.time_step = 0.0;
		assert!(matches!(
			start(zero_step),
			Err(SessionError::Config(ConfigError::Invalid(_)))
		));
	}

	#[test]
	fn rigid_resize_keeps_nodes_on_screen() {
		let config = GraphConfig::default().with_mode(LayoutMode::RigidBody);
		let mut state = KeywordGraphState::new(
			&data(),
			Viewport::new(800.0, 600.0, 1.0),
			config,
			DisplayList::default(),
		)
		.unwrap();
		state.tick();
		let small = Viewport::new(200.0, 150.0, 1.0);
		state.resize(small);
		for p in state.screen_positions() {
			assert!(small.contains(p));
		}
	}

	#[test]
	fn sessions_with_equal_seeds_render_identically() {
		let config = GraphConfig::default().with_seed(99);
		let viewport = Viewport::new(800.0, 600.0, 1.0);
		let mut a =
			KeywordGraphState::new(&data(), viewport, config.clone(), DisplayList::default()).unwrap();
		let mut b = KeywordGraphState::new(&data(), viewport, config, DisplayList::default()).unwrap();
		for _ in 0..10 {
			a.tick();
			b.tick();
		}
		assert_eq!(a.renderer.sprites(), b.renderer.sprites());
		assert_eq!(a.renderer.texts(), b.renderer.texts());
	}

	#[test]
	fn rigid_sessions_with_equal_seeds_render_identically() {
		let config = GraphConfig::default()
			.with_mode(LayoutMode::RigidBody)
			.with_seed(7);
		let viewport = Viewport::new(800.0, 600.0, 1.0);
		let mut a =
			KeywordGraphState::new(&data(), viewport, config.clone(), DisplayList::default()).unwrap();
		let mut b = KeywordGraphState::new(&data(), viewport, config, DisplayList::default()).unwrap();
		for _ in 0..50 {
			a.tick();
			b.tick();
		}
		assert_eq!(a.renderer.sprites(), b.renderer.sprites());
		assert_eq!(a.renderer.lines(), b.renderer.lines());
		assert_eq!(a.renderer.texts(), b.renderer.texts());
	}
}
