use serde::Deserialize;

/// A node as it arrives from the data source.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphNode {
	pub id: String,
	pub group: String,
	pub name: String,
	pub keywords: Vec<String>,
	pub img: String,
	pub source: String,
	pub url: String,
}

/// A weighted link between two node ids.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphLink {
	pub source: String,
	pub target: String,
	#[serde(default = "default_value")]
	pub value: f64,
}

fn default_value() -> f64 {
	1.0
}

/// The `{nodes, edges}` document the graph is built from.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphData {
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	#[serde(default)]
	pub edges: Vec<GraphLink>,
}

/// One entry of the topics endpoint; only the graph is consumed.
#[derive(Clone, Debug, Deserialize)]
pub struct Topic {
	pub graph: GraphData,
}

impl GraphNode {
	pub fn new(id: impl Into<String>, group: impl Into<String>) -> Self {
		let id = id.into();
		Self {
			name: id.clone(),
			id,
			group: group.into(),
			..Self::default()
		}
	}

	pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.keywords = keywords.into_iter().map(Into::into).collect();
		self
	}
}

impl GraphLink {
	pub fn new(source: impl Into<String>, target: impl Into<String>, value: f64) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			value,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn deserializes_document_with_missing_optional_fields() {
		let raw = r#"{
			"nodes": [
				{"id": "a", "group": "g1", "name": "A", "keywords": ["x", "y"], "img": "a.png", "source": "feed", "url": "http://a"},
				{"id": "b", "group": "g1"}
			],
			"edges": [{"source": "a", "target": "b", "value": 3}]
		}"#;
		let data: GraphData = serde_json::from_str(raw).unwrap();
		assert_eq!(data.nodes.len(), 2);
		assert_eq!(data.nodes[0].keywords, vec!["x", "y"]);
		assert!(data.nodes[1].keywords.is_empty());
		assert_eq!(data.edges[0].value, 3.0);
	}

	#[test]
	fn edge_value_defaults_to_one() {
		let link: GraphLink = serde_json::from_str(r#"{"source": "a", "target": "b"}"#).unwrap();
		assert_eq!(link.value, 1.0);
	}
}
