//! Leptos client-side app that lays out a DIMACS graph and highlights its maximum clique.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info, warn};

// Modules
mod components;
mod compute;
mod config;
mod dimacs;
mod pages;
mod session;

// Top-Level pages
use crate::config::AppConfig;
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Id of the optional `<script type="application/json">` element holding the app config.
const CONFIG_ELEMENT_ID: &str = "app-config";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Reads the embedded config, falling back to defaults.
fn load_config() -> AppConfig {
	let text = web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
		.and_then(|e| e.text_content());
	let Some(text) = text else {
		return AppConfig::default();
	};
	AppConfig::from_json(&text).unwrap_or_else(|err| {
		warn!("ignoring embedded config: {err}");
		AppConfig::default()
	})
}

/// An app router which renders the homepage and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();
	provide_context(load_config());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="Max Clique Visualization" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
