use leptos::prelude::*;
use leptos::task::spawn_local;
use log::error;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlInputElement;

use crate::components::force_graph::ForceGraphCanvas;
use crate::components::status::StatusBar;
use crate::compute::ComputeClient;
use crate::config::AppConfig;
use crate::dimacs::{ACCEPTED_EXTENSIONS, parse_edges};
use crate::session::{AdvisoryLevel, GraphSession};

/// Upload a DIMACS file, solve it remotely and show the highlighted clique.
#[component]
pub fn Home() -> impl IntoView {
	let config = use_context::<AppConfig>().unwrap_or_default();
	let client = ComputeClient::new(config.api_base_url.clone());
	let session = RwSignal::new(GraphSession::new(config.render.clone()));

	let model = Memo::new(move |_| session.with(|s| s.model().clone()));
	let busy = Signal::derive(move || session.with(|s| s.is_busy()));
	let notices = Signal::derive(move || session.with(|s| s.notices().to_vec()));
	let settled = Signal::derive(move || session.with(|s| s.is_layout_settled()));

	let on_file = move |ev: leptos::ev::Event| {
		let input: HtmlInputElement = event_target(&ev);
		let Some(file) = input.files().and_then(|files| files.get(0)) else {
			return;
		};
		let client = client.clone();
		spawn_local(async move {
			let text = match JsFuture::from(file.text()).await {
				Ok(value) => value.as_string().unwrap_or_default(),
				Err(err) => {
					error!("failed to read {}: {err:?}", file.name());
					session.update(|s| s.notify(AdvisoryLevel::Error, "Could not read file"));
					return;
				}
			};
			let edges = parse_edges(&text);

			let mut ticket = None;
			session.update(|s| ticket = s.load_edges(edges.clone()));
			let Some(ticket) = ticket else {
				return;
			};
			let result = client.find_max_clique(&edges).await;
			session.update(|s| {
				s.complete(ticket, result);
			});
		});
	};

	let stats = move || {
		model.with(|m| {
			format!(
				"{} vertices, {} edges, {} clusters",
				m.nodes.len(),
				m.links.len(),
				m.cluster_count
			)
		})
	};

	view! {
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

			<header class="app-header">
				<h1>"Max Clique Visualization"</h1>
				<label class="upload">
					"Upload DIMACS file (.col/.clq)"
					<input type="file" accept=ACCEPTED_EXTENSIONS on:change=on_file />
				</label>
			</header>
			<StatusBar
				busy=busy
				notices=notices
				on_dismiss=Callback::new(move |i| session.update(|s| s.dismiss(i)))
			/>
			<main class="graph-container">
				<Show
					when=move || !model.with(|m| m.is_empty())
					fallback=|| view! { <p class="placeholder">"Load a graph to begin."</p> }
				>
					<p class="graph-stats">
						{stats}
						{move || if settled.get() { " · layout settled" } else { "" }}
					</p>
				</Show>
				<div class="graph-frame">
					<ForceGraphCanvas
						data=model
						config=config.render.clone()
						on_settle=Callback::new(move |_| session.update(|s| s.mark_layout_settled()))
					/>
				</div>
			</main>
		</ErrorBoundary>
	}
}
