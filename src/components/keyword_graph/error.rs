use std::fmt;

/// Which side of an edge failed to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
	Source,
	Target,
}

impl fmt::Display for Endpoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Endpoint::Source => f.write_str("source"),
			Endpoint::Target => f.write_str("target"),
		}
	}
}

/// Failures while turning a document into a [`Graph`](super::model::Graph).
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
	#[error("edge {edge} references unknown {end} node `{id}`")]
	UnknownEndpoint {
		edge: usize,
		end: Endpoint,
		id: String,
	},
	#[error("node id `{id}` appears more than once")]
	DuplicateNode { id: String },
	#[error("edge {edge} has weight {value}, expected a finite positive number")]
	InvalidWeight { edge: usize, value: f64 },
}

/// Failures while fetching the graph document.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
	#[error("request failed: {0}")]
	Request(String),
	#[error("server answered with status {0}")]
	Status(u16),
	#[error("malformed graph document: {0}")]
	Parse(#[from] serde_json::Error),
	#[error("response contained no graph")]
	Empty,
}

/// Rejected configuration values.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("malformed configuration: {0}")]
	Parse(#[from] serde_json::Error),
	#[error("invalid configuration: {0}")]
	Invalid(String),
}

/// Why a session could not start.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
	#[error(transparent)]
	Graph(#[from] GraphError),
	#[error(transparent)]
	Config(#[from] ConfigError),
}
