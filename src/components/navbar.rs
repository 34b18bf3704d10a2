//! Page navbar: a collapsible menu and hide-on-scroll behavior.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;

/// Scroll tracking for the navbar.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NavbarState {
	last_scroll: f64,
}

impl NavbarState {
	/// Records the new scroll offset and returns whether the navbar should be
	/// hidden: scrolling down hides it, anything else shows it.
	pub fn on_scroll(&mut self, current: f64) -> bool {
		let hidden = current > self.last_scroll;
		self.last_scroll = current;
		hidden
	}
}

#[component]
pub fn Navbar(#[prop(into)] title: String, children: Children) -> impl IntoView {
	let (hidden, set_hidden) = signal(false);
	let (menu_open, set_menu_open) = signal(false);
	let scroll_state = Rc::new(RefCell::new(NavbarState::default()));
	let scroll_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	Effect::new(move |_| {
		let Some(window) = web_sys::window() else {
			return;
		};
		let state = scroll_state.clone();
		*scroll_cb.borrow_mut() = Some(Closure::new(move || {
			let Some(offset) = web_sys::window().and_then(|w| w.page_y_offset().ok()) else {
				return;
			};
			set_hidden.set(state.borrow_mut().on_scroll(offset));
		}));
		if let Some(ref cb) = *scroll_cb.borrow() {
			if window
				.add_event_listener_with_callback("scroll", cb.as_ref().unchecked_ref())
				.is_err()
			{
				warn!("navbar: failed to register scroll listener");
			}
		}
	});

	view! {
		<nav
			class="navbar"
			style:transform=move || {
				if hidden.get() { "translateY(-100%)" } else { "translateY(0)" }
			}
		>
			<span class="navbar-title">{title}</span>
			<button class="navbar-toggle" on:click=move |_| set_menu_open.update(|open| *open = !*open)>
				"☰"
			</button>
			<div class="navbar-menu" class:active=move || menu_open.get()>
				{children()}
			</div>
		</nav>
	}
}
