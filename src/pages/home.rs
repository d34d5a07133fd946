use leptos::prelude::*;
use log::error;
use web_sys::UrlSearchParams;

use crate::components::keyword_graph::source::{fetch_graph, topics_url};
use crate::components::keyword_graph::{GraphConfig, GraphData, KeywordGraphCanvas, LayoutMode};
use crate::util::today;

/// Applies the `layout` and `seed` query parameters on top of the defaults.
fn config_from_query(layout: Option<&str>, seed: Option<&str>, fallback_seed: u64) -> GraphConfig {
	let mut config = GraphConfig::default().with_seed(fallback_seed);
	if let Some(mode) = layout.and_then(LayoutMode::from_query) {
		config.layout.mode = mode;
	}
	if let Some(seed) = seed.and_then(|s| s.parse().ok()) {
		config.seed = seed;
	}
	config
}

fn page_config() -> GraphConfig {
	let fallback_seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
	let params = web_sys::window()
		.and_then(|w| w.location().search().ok())
		.and_then(|search| UrlSearchParams::new_with_str(&search).ok());
	match params {
		Some(params) => config_from_query(
			params.get("layout").as_deref(),
			params.get("seed").as_deref(),
			fallback_seed,
		),
		None => config_from_query(None, None, fallback_seed),
	}
}

/// Loads today's topic graph and shows it full window.
#[component]
pub fn Home() -> impl IntoView {
	let (graph, set_graph) = signal(None::<Result<GraphData, String>>);
	let config = page_config();

	let url = topics_url(&today());
	let requested = fetch_graph(&url, move |result| {
		if let Err(ref e) = result {
			error!("loading the graph failed: {e}");
		}
		set_graph.set(Some(result.map_err(|e| e.to_string())));
	});
	if let Err(e) = requested {
		error!("cannot request {url}: {e}");
		set_graph.set(Some(Err(e.to_string())));
	}

	view! {
		<div class="fullscreen-graph">
			{move || match graph.get() {
				None => view! { <p class="graph-status">"Loading graph..."</p> }.into_any(),
				Some(Ok(data)) => {
					view! { <KeywordGraphCanvas data=data config=config.clone() /> }.into_any()
				}
				Some(Err(e)) => {
					view! {
						<h1>"Uh oh! Something went wrong!"</h1>
						<p class="graph-error">{e}</p>
					}
						.into_any()
				}
			}}
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn query_selects_mode_and_seed() {
		let config = config_from_query(Some("rigid"), Some("17"), 3);
		assert_eq!(config.layout.mode, LayoutMode::RigidBody);
		assert_eq!(config.seed, 17);
	}

	#[test]
	fn unknown_query_values_fall_back() {
		let config = config_from_query(Some("spring"), Some("abc"), 3);
		assert_eq!(config.layout.mode, LayoutMode::ForceDirected);
		assert_eq!(config.seed, 3);
	}
}
