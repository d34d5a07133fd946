//! Force-laid-out keyword graph drawn on a canvas.

mod component;
pub mod config;
pub mod error;
pub mod frame;
pub mod layout;
pub mod model;
pub mod render;
pub mod scale;
pub mod scene;
pub mod source;
mod state;
pub mod types;

pub use component::KeywordGraphCanvas;
pub use config::{GraphConfig, LayoutMode};
pub use error::{ConfigError, GraphError, LoadError, SessionError};
pub use state::KeywordGraphState;
pub use types::{GraphData, GraphLink, GraphNode};
