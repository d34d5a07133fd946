use std::collections::HashMap;

use keyword_graph_canvas::components::keyword_graph::render::DisplayList;
use keyword_graph_canvas::components::keyword_graph::scale::Viewport;
use keyword_graph_canvas::components::keyword_graph::{
	GraphConfig, GraphData, GraphError, GraphLink, GraphNode, KeywordGraphState, LayoutMode,
	SessionError,
};

fn viewport() -> Viewport {
	Viewport::new(1280.0, 720.0, 1.0)
}

fn session(data: &GraphData, config: GraphConfig) -> KeywordGraphState {
	KeywordGraphState::new(data, viewport(), config, DisplayList::default()).unwrap()
}

#[test]
fn three_node_chain() {
	let data = GraphData {
		nodes: ["A", "B", "C"]
			.iter()
			.map(|id| GraphNode::new(*id, "g1").with_keywords(["x"]))
			.collect(),
		edges: vec![GraphLink::new("A", "B", 1.0), GraphLink::new("B", "C", 1.0)],
	};
	let mut state = session(&data, GraphConfig::default());
	let graph = &state.graph;
	let count = |id: &str| graph.node(graph.lookup(id).unwrap()).connections.len();
	assert_eq!((count("A"), count("B"), count("C")), (1, 2, 1));

	let groups: Vec<_> = state.scene.groups().collect();
	assert_eq!(groups.len(), 1);
	assert_eq!(groups[0].members.len(), 3);

	let clusters: Vec<_> = state.scene.clusters().collect();
	assert_eq!(clusters.len(), 1);
	assert_eq!(clusters[0].keyword, "x");
	assert_eq!(clusters[0].members.len(), 3);

	state.tick();
	assert_eq!(state.renderer.lines().len(), 2);
	assert_eq!(state.renderer.texts().len(), 1);
}

#[test]
fn lone_node_stays_on_screen() {
	let data = GraphData {
		nodes: vec![GraphNode::new("only", "g")],
		edges: Vec::new(),
	};
	for mode in [LayoutMode::ForceDirected, LayoutMode::RigidBody] {
		for seed in 0..8 {
			let config = GraphConfig::default().with_mode(mode).with_seed(seed);
			let mut state = session(&data, config);
			for _ in 0..100 {
				state.tick();
				let sprite = state.renderer.sprites()[0].position;
				assert!(sprite.is_finite());
				assert!(viewport().contains(sprite), "{mode:?} seed {seed}: {sprite:?}");
			}
		}
	}
}

#[test]
fn dangling_edge_fails_before_any_frame() {
	let data = GraphData {
		nodes: vec![GraphNode::new("a", "g")],
		edges: vec![GraphLink::new("a", "missing", 1.0)],
	};
	let result = KeywordGraphState::new(&data, viewport(), GraphConfig::default(), DisplayList::default());
	assert!(matches!(
		result,
		Err(SessionError::Graph(GraphError::UnknownEndpoint { .. }))
	));
}

#[test]
fn empty_document_runs_as_a_no_op() {
	for mode in [LayoutMode::ForceDirected, LayoutMode::RigidBody] {
		let mut state = session(&GraphData::default(), GraphConfig::default().with_mode(mode));
		for _ in 0..5 {
			state.tick();
		}
		assert!(state.renderer.sprites().is_empty());
		assert!(state.renderer.lines().is_empty());
		assert!(state.renderer.texts().is_empty());
	}
}

#[test]
fn rendered_labels_match_group_keyword_pairs_over_threshold() {
	let words = ["alpha", "beta", "gamma", "delta", "eps"];
	let nodes: Vec<GraphNode> = (0..60)
		.map(|i| {
			let keywords: Vec<&str> = (0..(i % 4))
				.map(|k| words[(i * 7 + k * 3) % words.len()])
				.collect();
			GraphNode::new(format!("n{i}"), format!("g{}", i % 5)).with_keywords(keywords)
		})
		.collect();
	let edges = (1..60)
		.map(|i| GraphLink::new(format!("n{}", i / 2), format!("n{i}"), 1.0 + (i % 3) as f64))
		.collect();
	let data = GraphData { nodes, edges };

	for threshold in [1, 2, 3, 5] {
		let mut pairs: HashMap<(String, String), usize> = HashMap::new();
		for node in &data.nodes {
			let mut seen = Vec::new();
			for word in &node.keywords {
				if !seen.contains(word) {
					seen.push(word.clone());
					*pairs.entry((node.group.clone(), word.clone())).or_default() += 1;
				}
			}
		}
		let expected = pairs.values().filter(|&&n| n >= threshold).count();

		let config = GraphConfig {
			keyword_threshold: threshold,
			..GraphConfig::default()
		};
		let state = session(&data, config);
		assert_eq!(state.scene.clusters().count(), expected);
		assert_eq!(state.renderer.texts().len(), expected);
		assert!(state.scene.clusters().all(|c| c.members.len() >= threshold));
	}
}

#[test]
fn edge_lines_track_sprites_every_frame() {
	let data = GraphData {
		nodes: (0..10).map(|i| GraphNode::new(i.to_string(), "g")).collect(),
		edges: (1..10)
			.map(|i| GraphLink::new("0", i.to_string(), 1.0))
			.collect(),
	};
	for mode in [LayoutMode::ForceDirected, LayoutMode::RigidBody] {
		let mut state = session(&data, GraphConfig::default().with_mode(mode));
		for _ in 0..20 {
			state.tick();
			let sprites = state.renderer.sprites();
			let lines = state.renderer.lines();
			assert_eq!(lines.len(), 9);
			for (i, line) in lines.iter().enumerate() {
				assert_eq!(line.from, sprites[0].position);
				assert_eq!(line.to, sprites[i + 1].position);
			}
		}
	}
}
