use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use web_sys::{MouseEvent, PointerEvent};

use super::scene::{EDGE_WIDTH, EdgeFrame, LABEL_FILL, NodeFrame, SceneFrame};
use super::state::ChartState;

/// Current time in milliseconds, on the same clock as animation frames.
pub fn now_ms() -> f64 {
	web_sys::window()
		.and_then(|w| w.performance())
		.map(|p| p.now())
		.unwrap_or_default()
}

/// One `<line>` per edge; attributes track the published frame.
pub fn edge_lines(frame: RwSignal<SceneFrame>, count: usize) -> impl IntoView {
	(0..count)
		.map(|i| {
			let edge = move |f: fn(&EdgeFrame) -> String| {
				move || frame.with(|s| s.edges.get(i).map(f).unwrap_or_default())
			};
			view! {
				<line
					stroke-width=EDGE_WIDTH.to_string()
					x1=edge(|e| e.x1.to_string())
					y1=edge(|e| e.y1.to_string())
					x2=edge(|e| e.x2.to_string())
					y2=edge(|e| e.y2.to_string())
					stroke=edge(|e| e.stroke.clone())
					opacity=edge(|e| e.opacity.to_string())
				/>
			}
		})
		.collect_view()
}

/// One `<g class="node-group">` per node holding its circle and label, with
/// drag and hover handlers attached.
pub fn node_groups(
	frame: RwSignal<SceneFrame>,
	state: Rc<RefCell<ChartState>>,
	on_drag_start: impl Fn(PointerEvent, usize) + Clone + 'static,
) -> impl IntoView {
	let nodes: Vec<(String, String, f64)> = {
		let s = state.borrow();
		s.scene
			.nodes
			.iter()
			.map(|n| (n.title.clone(), n.fill.clone(), s.scene.font_size))
			.collect()
	};

	nodes
		.into_iter()
		.enumerate()
		.map(|(i, (title, fill, font_size))| {
			let node = move |f: fn(&NodeFrame) -> String| {
				move || frame.with(|s| s.nodes.get(i).map(f).unwrap_or_default())
			};
			let (state_enter, state_leave) = (state.clone(), state.clone());
			let on_drag_start = on_drag_start.clone();
			view! {
				<g
					class="node-group"
					transform=node(|n| n.transform.clone())
					opacity=node(|n| n.opacity.to_string())
					on:pointerdown=move |ev: PointerEvent| on_drag_start(ev, i)
					on:mouseenter=move |_: MouseEvent| {
						state_enter.borrow_mut().hover_enter(i, now_ms());
					}
					on:mouseleave=move |_: MouseEvent| {
						state_leave.borrow_mut().hover_leave(now_ms());
					}
				>
					<circle
						r=node(|n| n.radius.to_string())
						fill=fill
						stroke=node(|n| n.stroke.clone())
						stroke-width=node(|n| n.stroke_width.to_string())
						style="cursor: pointer;"
					/>
					<text
						text-anchor="middle"
						dy=node(|n| n.label_dy.to_string())
						font-size=font_size.to_string()
						fill=LABEL_FILL
					>
						{title}
					</text>
				</g>
			}
		})
		.collect_view()
}
