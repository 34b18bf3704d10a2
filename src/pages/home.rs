use leptos::prelude::*;
use log::warn;

use crate::components::force_graph::ForceGraphSvg;
use crate::components::navbar::Navbar;
use crate::loader::{load_chart_config, load_chart_data};

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let config = load_chart_config();
	let (level_sized, set_level_sized) = signal(true);

	let chart_data = load_chart_data().inspect_err(|e| warn!("chart data unavailable: {e}"));

	view! {
		<Navbar title="Situation Chart">
			<label class="navbar-item" for="level-sized">
				<input
					type="checkbox"
					id="level-sized"
					prop:checked=move || level_sized.get()
					on:change=move |ev| set_level_sized.set(event_target_checked(&ev))
				/>
				" Size members by level"
			</label>
		</Navbar>

		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			<div id="container" class="chart-container">
				{chart_data
					.map(|data| {
						let graph_data = Signal::derive(move || data.clone());
						view! { <ForceGraphSvg data=graph_data level_sized=level_sized config=config /> }
					})}
			</div>
		</ErrorBoundary>
	}
}
