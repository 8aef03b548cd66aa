use leptos::prelude::*;

use crate::session::{Advisory, AdvisoryLevel};

fn level_class(level: AdvisoryLevel) -> &'static str {
	match level {
		AdvisoryLevel::Info => "notice notice-info",
		AdvisoryLevel::Success => "notice notice-success",
		AdvisoryLevel::Warning => "notice notice-warning",
		AdvisoryLevel::Error => "notice notice-error",
	}
}

/// Busy indicator and dismissable advisories.
#[component]
pub fn StatusBar(
	#[prop(into)] busy: Signal<bool>,
	#[prop(into)] notices: Signal<Vec<Advisory>>,
	on_dismiss: Callback<usize>,
) -> impl IntoView {
	view! {
		<div class="status-bar">
			<Show when=move || busy.get()>
				<span class="busy">"Computing maximum clique…"</span>
			</Show>
			<ul class="notices">
				{move || {
					notices
						.get()
						.into_iter()
						.enumerate()
						.map(|(i, notice)| {
							view! {
								<li class=level_class(notice.level)>
									<span>{notice.message}</span>
									<button class="dismiss" on:click=move |_| on_dismiss.run(i)>
										"×"
									</button>
								</li>
							}
						})
						.collect_view()
				}}
			</ul>
		</div>
	}
}
