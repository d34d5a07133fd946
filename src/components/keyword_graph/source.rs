use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::XmlHttpRequest;

use super::error::LoadError;
use super::types::{GraphData, Topic};

/// Topics endpoint for one calendar day.
pub fn topics_url(day: &str) -> String {
	format!("/api/topics/filter?day={day}")
}

/// Extracts the first topic's graph from a topics response body.
pub fn parse_topics(body: &str) -> Result<GraphData, LoadError> {
	let topics: Vec<Topic> = serde_json::from_str(body)?;
	topics
		.into_iter()
		.next()
		.map(|topic| topic.graph)
		.ok_or(LoadError::Empty)
}

fn js_error(value: JsValue) -> LoadError {
	LoadError::Request(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

fn read_response(request: &XmlHttpRequest) -> Result<GraphData, LoadError> {
	let status = request.status().map_err(js_error)?;
	if !(200..300).contains(&status) {
		return Err(LoadError::Status(status));
	}
	let body = request.response_text().map_err(js_error)?.unwrap_or_default();
	parse_topics(&body)
}

/// Fetches the graph document asynchronously; `on_done` runs exactly once.
pub fn fetch_graph(
	url: &str,
	on_done: impl FnOnce(Result<GraphData, LoadError>) + 'static,
) -> Result<(), LoadError> {
	let request = XmlHttpRequest::new().map_err(js_error)?;
	request.open("GET", url).map_err(js_error)?;

	let pending: Rc<RefCell<Option<Box<dyn FnOnce(Result<GraphData, LoadError>)>>>> =
		Rc::new(RefCell::new(Some(Box::new(on_done))));

	let (pending_load, xhr) = (pending.clone(), request.clone());
	let onload = Closure::<dyn FnMut()>::new(move || {
		if let Some(done) = pending_load.borrow_mut().take() {
			done(read_response(&xhr));
		}
	});
	let pending_error = pending.clone();
	let onerror = Closure::<dyn FnMut()>::new(move || {
		if let Some(done) = pending_error.borrow_mut().take() {
			done(Err(LoadError::Request("network error".into())));
		}
	});
	request.set_onload(Some(onload.as_ref().unchecked_ref()));
	request.set_onerror(Some(onerror.as_ref().unchecked_ref()));
	// The request owns the callbacks from here on.
	onload.forget();
	onerror.forget();

	request.send().map_err(js_error)
}
