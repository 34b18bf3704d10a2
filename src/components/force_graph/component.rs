use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{Element, PointerEvent, Window};

use super::config::ChartConfig;
use super::model::GraphModel;
use super::render::{edge_lines, node_groups, now_ms};
use super::scene::SceneFrame;
use super::state::{ChartState, drawing_size};
use super::types::ChartData;

const FALLBACK_SIZE: (f64, f64) = (800.0, 600.0);

/// Only the main button drags, as with a plain mouse click or a touch.
fn starts_drag(button: i16) -> bool {
	button == 0
}

fn window_size(window: &Window) -> (f64, f64) {
	let dim = |v: Result<JsValue, JsValue>, fallback: f64| {
		v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
	};
	(
		dim(window.inner_width(), FALLBACK_SIZE.0),
		dim(window.inner_height(), FALLBACK_SIZE.1),
	)
}

#[component]
pub fn ForceGraphSvg(
	#[prop(into)] data: Signal<ChartData>,
	/// Size members by level (checked) or give them a fixed radius.
	#[prop(into)]
	level_sized: Signal<bool>,
	#[prop(optional)] config: ChartConfig,
) -> impl IntoView {
	let svg_ref = NodeRef::<leptos::svg::Svg>::new();
	let (inner_w, inner_h) = web_sys::window()
		.map(|w| window_size(&w))
		.unwrap_or(FALLBACK_SIZE);
	let (w, h) = drawing_size(inner_w, inner_h, &config);

	let model = GraphModel::build(&data.get_untracked(), &config);
	info!(
		"chart: {} nodes, {} edges, {}x{}",
		model.nodes.len(),
		model.edges.len(),
		w,
		h
	);
	let state = Rc::new(RefCell::new(ChartState::new(model, config, w, h)));
	let frame = RwSignal::new(state.borrow().scene.frame(now_ms()));
	let edge_count = state.borrow().scene.edges.len();

	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(window) = web_sys::window() else {
			warn!("chart: no window, layout will not run");
			return;
		};

		let state_resize = state_init.clone();
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			let (nw, nh) = window_size(&win);
			state_resize.borrow_mut().resize(nw, nh);
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			if window
				.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref())
				.is_err()
			{
				warn!("chart: failed to register resize listener");
			}
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let now = now_ms();
			let next: Option<SceneFrame> = {
				let mut s = state_anim.borrow_mut();
				s.frame(now).then(|| s.scene.frame(now))
			};
			if let Some(next) = next {
				frame.set(next);
			}
			if let (Some(win), Some(cb)) = (web_sys::window(), &*animate_inner.borrow()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_toggle = state.clone();
	Effect::new(move |_| {
		let on = level_sized.get();
		let mut s = state_toggle.borrow_mut();
		if s.level_sized != on {
			s.set_level_sized(on);
		}
	});

	let pointer_position = move |ev: &PointerEvent| -> Option<(Element, f64, f64)> {
		let svg: Element = svg_ref.get()?.into();
		let rect = svg.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		Some((svg, x, y))
	};

	let state_down = state.clone();
	let on_drag_start = move |ev: PointerEvent, idx: usize| {
		if !starts_drag(ev.button()) {
			return;
		}
		let Some((svg, x, y)) = pointer_position(&ev) else {
			return;
		};
		ev.prevent_default();
		if let Err(e) = svg.set_pointer_capture(ev.pointer_id()) {
			warn!("chart: pointer capture failed: {e:?}");
		}
		state_down.borrow_mut().drag_start(ev.pointer_id(), idx, x, y);
	};

	let state_mm = state.clone();
	let on_pointermove = move |ev: PointerEvent| {
		if let Some((_, x, y)) = pointer_position(&ev) {
			state_mm.borrow_mut().drag_move(ev.pointer_id(), x, y);
		}
	};

	let state_mu = state.clone();
	let on_pointerup = move |ev: PointerEvent| {
		state_mu.borrow_mut().drag_end(ev.pointer_id());
	};

	let state_mc = state.clone();
	let on_pointercancel = move |ev: PointerEvent| {
		state_mc.borrow_mut().drag_end(ev.pointer_id());
	};

	view! {
		<svg
			node_ref=svg_ref
			class="chart"
			id="chart"
			width=move || frame.with(|f| f.width.to_string())
			height=move || frame.with(|f| f.height.to_string())
			viewBox=move || frame.with(|f| f.view_box.clone())
			on:pointermove=on_pointermove
			on:pointerup=on_pointerup
			on:pointercancel=on_pointercancel
			style="display: block; touch-action: none;"
		>
			<g class="links">{edge_lines(frame, edge_count)}</g>
			<g class="nodes">{node_groups(frame, state, on_drag_start)}</g>
		</svg>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn only_the_main_button_drags() {
		assert!(starts_drag(0));
		assert!(!starts_drag(1));
		assert!(!starts_drag(2));
	}
}
