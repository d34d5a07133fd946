use super::config::EdgeStyle;
use super::layout::LayoutEngine;
use super::model::Graph;
use super::render::{LineStyle, Renderer};
use super::scale::{Point, Viewport, to_screen};
use super::scene::Scene;

/// Runs one frame: steps the layout, moves every sprite, redraws every edge
/// and re-centers every label. Screen positions are derived from the layout
/// each time and never kept.
pub fn update_frame<R: Renderer>(
	graph: &Graph,
	layout: &mut dyn LayoutEngine,
	scene: &Scene,
	viewport: &Viewport,
	edge_style: &EdgeStyle,
	renderer: &mut R,
) {
	layout.step();

	let space = layout.space();
	let screen: Vec<Point> = graph
		.node_indices()
		.map(|idx| {
			let p = to_screen(space, viewport, layout.position(idx));
			renderer.set_sprite_position(scene.sprite(idx), p);
			p
		})
		.collect();

	renderer.clear_lines();
	let line = LineStyle {
		width: edge_style.width,
		color: edge_style.color.clone(),
		alpha: edge_style.alpha,
	};
	for edge in graph.edges() {
		renderer.draw_line(screen[edge.source.0], screen[edge.target.0], &line);
	}

	for cluster in scene.clusters() {
		if let Some(center) = Point::centroid(cluster.members.iter().map(|m| screen[m.0])) {
			renderer.set_text_position(cluster.label, center);
		}
	}
}
