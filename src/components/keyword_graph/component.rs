use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::error;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::config::GraphConfig;
use super::render;
use super::scale::Viewport;
use super::state::KeywordGraphState;
use super::types::GraphData;

fn window_viewport(window: &Window) -> Option<Viewport> {
	Some(Viewport::new(
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
		window.device_pixel_ratio(),
	))
}

/// Sizes the backing store in device pixels and the element in CSS pixels.
fn fit_canvas(canvas: &HtmlCanvasElement, viewport: &Viewport) {
	canvas.set_width(viewport.width() as u32);
	canvas.set_height(viewport.height() as u32);
	let style = web_sys::HtmlElement::style(canvas);
	let _ = style.set_property("width", &format!("{}px", viewport.css_width));
	let _ = style.set_property("height", &format!("{}px", viewport.css_height));
}

/// Full-window canvas running the keyword graph until the page goes away.
#[component]
pub fn KeywordGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(optional)] config: GraphConfig,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let (failure, set_failure) = signal(None::<String>);
	let state: Rc<RefCell<Option<KeywordGraphState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		let Some(viewport) = window_viewport(&window) else {
			return;
		};
		fit_canvas(&canvas, &viewport);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			set_failure.set(Some("canvas 2d context unavailable".into()));
			return;
		};

		let display = render::DisplayList::new(config.background.clone());
		match KeywordGraphState::new(&data.get(), viewport, config.clone(), display) {
			Ok(s) => *state_init.borrow_mut() = Some(s),
			Err(e) => {
				error!("cannot build keyword graph: {e}");
				set_failure.set(Some(e.to_string()));
				return;
			}
		}

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let Some(viewport) = web_sys::window().as_ref().and_then(window_viewport) else {
				return;
			};
			fit_canvas(&canvas_resize, &viewport);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(viewport);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick();
				render::paint(&s.renderer, &ctx, &s.viewport);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="keyword-graph-canvas"
			style="display: block;"
		/>
		<Show when=move || failure.get().is_some()>
			<p class="graph-error">{move || failure.get().unwrap_or_default()}</p>
		</Show>
	}
}
