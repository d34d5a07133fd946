//! One-time construction of everything drawn: group colors, node sprites
//! and keyword labels.

use indexmap::IndexMap;
use rand::Rng;

use super::config::{GraphConfig, NodeStyle};
use super::layout::LayoutEngine;
use super::model::{Graph, NodeIdx};
use super::render::{BitmapHandle, Renderer, SpriteHandle, TextHandle, TextStyle};
use super::scale::{Point, Viewport, to_screen};

/// Nodes of one group sharing a keyword, drawn as a single label.
#[derive(Clone, Debug)]
pub struct KeywordCluster {
	pub keyword: String,
	/// Always the owning group's color.
	pub color: String,
	/// Each node at most once.
	pub members: Vec<NodeIdx>,
	pub label: TextHandle,
}

/// Nodes sharing a `group` key.
#[derive(Clone, Debug)]
pub struct Group {
	pub key: String,
	pub color: String,
	pub members: Vec<NodeIdx>,
	/// Only clusters that reached the visibility threshold.
	pub keywords: IndexMap<String, KeywordCluster>,
}

/// Visual handles for one session, indexed like the graph.
#[derive(Clone, Debug)]
pub struct Scene {
	groups: IndexMap<String, Group>,
	node_group: Vec<usize>,
	sprites: Vec<SpriteHandle>,
}

/// Sprite radius in device pixels.
pub fn node_radius(style: &NodeStyle, viewport: &Viewport) -> f64 {
	style.radius_percent * viewport.min_side() / 100.0 * viewport.pixel_ratio
}

impl Scene {
	/// Builds the scene from the layout's current positions.
	///
	/// The first node seen in a group draws the group's color from the
	/// palette. Labels are created smallest cluster first, so larger
	/// clusters end up drawn on top.
	pub fn build<R: Renderer, G: Rng>(
		graph: &Graph,
		layout: &dyn LayoutEngine,
		viewport: &Viewport,
		config: &GraphConfig,
		rng: &mut G,
		renderer: &mut R,
	) -> Self {
		let radius = node_radius(&config.node, viewport);
		let bitmaps: IndexMap<String, BitmapHandle> = config
			.palette
			.iter()
			.map(|color| {
				let bmp = renderer.create_circle_bitmap(
					color,
					radius,
					&config.node.stroke_color,
					config.node.stroke,
				);
				(color.clone(), bmp)
			})
			.collect();

		let screen: Vec<Point> = graph
			.node_indices()
			.map(|idx| to_screen(layout.space(), viewport, layout.position(idx)))
			.collect();

		let mut groups: IndexMap<String, Group> = IndexMap::new();
		let mut node_group = Vec::with_capacity(graph.len());
		let mut sprites = Vec::with_capacity(graph.len());
		for idx in graph.node_indices() {
			let node = graph.node(idx);
			let entry = groups.entry(node.group.clone());
			let group_idx = entry.index();
			let group = entry.or_insert_with(|| Group {
				key: node.group.clone(),
				color: config.palette[rng.gen_range(0..config.palette.len())].clone(),
				members: Vec::new(),
				keywords: IndexMap::new(),
			});
			group.members.push(idx);
			node_group.push(group_idx);
			sprites.push(renderer.create_sprite(screen[idx.0], bitmaps[&group.color]));
		}

		let mut pending: Vec<(usize, String, Vec<NodeIdx>)> = Vec::new();
		for (group_idx, group) in groups.values().enumerate() {
			let mut clusters: IndexMap<&str, Vec<NodeIdx>> = IndexMap::new();
			for &member in &group.members {
				for word in &graph.node(member).keywords {
					if word.is_empty() {
						continue;
					}
					let nodes = clusters.entry(word.as_str()).or_default();
					if nodes.last() != Some(&member) {
						nodes.push(member);
					}
				}
			}
			pending.extend(
				clusters
					.into_iter()
					.filter(|(_, nodes)| nodes.len() >= config.keyword_threshold)
					.map(|(word, nodes)| (group_idx, word.to_owned(), nodes)),
			);
		}
		// Stable, so equal sizes keep group then keyword order.
		pending.sort_by_key(|(_, _, nodes)| nodes.len());

		for (group_idx, keyword, members) in pending {
			let group = &mut groups[group_idx];
			let center = Point::centroid(members.iter().map(|m| screen[m.0])).unwrap_or_default();
			let style = TextStyle {
				font_size: config.label.font_size(members.len(), viewport.pixel_ratio),
				font: config.label.font.clone(),
				weight: config.label.weight.clone(),
				color: group.color.clone(),
				stroke_color: config.label.stroke_color.clone(),
				stroke_thickness: config.label.stroke_thickness,
				anchor: Point::new(rng.r#gen(), rng.r#gen()),
			};
			let label = renderer.create_text(center, &keyword, style);
			group.keywords.insert(
				keyword.clone(),
				KeywordCluster {
					keyword,
					color: group.color.clone(),
					members,
					label,
				},
			);
		}

		Self {
			groups,
			node_group,
			sprites,
		}
	}

	/// Groups in first-seen order.
	pub fn groups(&self) -> impl Iterator<Item = &Group> {
		self.groups.values()
	}

	/// The group `node` belongs to.
	pub fn group_of(&self, node: NodeIdx) -> &Group {
		&self.groups[self.node_group[node.0]]
	}

	/// Sprite drawn for `node`.
	pub fn sprite(&self, node: NodeIdx) -> SpriteHandle {
		self.sprites[node.0]
	}

	/// Every labelled cluster across all groups.
	pub fn clusters(&self) -> impl Iterator<Item = &KeywordCluster> {
		self.groups.values().flat_map(|g| g.keywords.values())
	}
}
