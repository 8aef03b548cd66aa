use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error, info};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render;
use super::state::ForceGraphState;
use super::types::{RenderConfig, RenderModel};
use super::viewport::{Viewport, ViewportTracker};

/// Window size in fullscreen mode, otherwise the explicit size or the parent's box.
fn measure_container(
	canvas: &HtmlCanvasElement,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> Option<(f64, f64)> {
	if fullscreen {
		let window = web_sys::window()?;
		let w = window.inner_width().ok()?.as_f64()?;
		let h = window.inner_height().ok()?.as_f64()?;
		return Some((w, h));
	}
	let rect = canvas
		.parent_element()
		.map(|p| p.get_bounding_client_rect());
	let w = width.or_else(|| rect.as_ref().map(|r| r.width()))?;
	let h = height.or_else(|| rect.as_ref().map(|r| r.height()))?;
	Some((w, h))
}

/// Bookkeeping shared by the frame loop and unmount.
#[derive(Debug, Default)]
struct FrameLoop {
	stopped: Cell<bool>,
	pending: Cell<Option<i32>>,
}

impl FrameLoop {
	fn is_running(&self) -> bool {
		!self.stopped.get()
	}

	fn scheduled(&self, request_id: i32) {
		self.pending.set(Some(request_id));
	}

	/// Stops the loop; returns the outstanding frame request to cancel.
	fn stop(&self) -> Option<i32> {
		self.stopped.set(true);
		self.pending.take()
	}
}

type SharedClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn apply_size(canvas: &HtmlCanvasElement, viewport: Viewport) {
	canvas.set_width(viewport.width as u32);
	canvas.set_height(viewport.height as u32);
}

#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<RenderModel>,
	config: RenderConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	/// Fired each time the simulation comes to rest.
	#[prop(optional)]
	on_settle: Option<Callback<()>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<ForceGraphState>>> = Rc::new(RefCell::new(None));
	let tracker = Rc::new(RefCell::new(ViewportTracker::new()));
	let frames = Rc::new(FrameLoop::default());
	let animate: SharedClosure = Rc::new(RefCell::new(None));
	let resize_cb: SharedClosure = Rc::new(RefCell::new(None));

	// Rebuild the simulation wholesale whenever the model changes.
	let (state_model, tracker_model) = (state.clone(), tracker.clone());
	Effect::new(move |_| {
		let model = data.get();
		let viewport = tracker_model.borrow().current();
		debug!(
			"rebuilding simulation: {} nodes, {} links",
			model.nodes.len(),
			model.links.len()
		);
		*state_model.borrow_mut() = Some(ForceGraphState::new(&model, &config, viewport));
	});

	// One-time canvas setup: size, resize observation and the frame loop.
	let (state_init, tracker_init, frames_init, animate_init, resize_cb_init) = (
		state.clone(),
		tracker.clone(),
		frames.clone(),
		animate.clone(),
		resize_cb.clone(),
	);
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if animate_init.borrow().is_some() || !frames_init.is_running() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			error!("no window; graph canvas disabled");
			return;
		};

		tracker_init
			.borrow_mut()
			.measure(measure_container(&canvas, fullscreen, width, height));
		let viewport = tracker_init.borrow().current();
		apply_size(&canvas, viewport);
		if let Some(ref mut s) = *state_init.borrow_mut() {
			s.resize(viewport);
		}

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			error!("2d canvas context unavailable");
			return;
		};

		let (state_resize, tracker_resize, canvas_resize) =
			(state_init.clone(), tracker_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let measured = measure_container(&canvas_resize, fullscreen, width, height);
			if !tracker_resize.borrow_mut().measure(measured) {
				return;
			}
			let viewport = tracker_resize.borrow().current();
			apply_size(&canvas_resize, viewport);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(viewport);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_anim, frames_anim, animate_inner) =
			(state_init.clone(), frames_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !frames_anim.is_running() {
				return;
			}
			let mut settled = false;
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				settled = s.tick(0.016);
				render::render(s, &ctx);
			}
			if settled {
				info!("layout settled");
				if let Some(cb) = on_settle {
					cb.run(());
				}
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				if let Ok(id) = win.request_animation_frame(cb.as_ref().unchecked_ref()) {
					frames_anim.scheduled(id);
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				frames_init.scheduled(id);
			}
		}
	});

	// Unmount: detach the resize listener and break the frame loop's self-reference.
	let handles = StoredValue::new_local((frames, animate, resize_cb));
	on_cleanup(move || {
		handles.try_with_value(|(frames, animate, resize_cb)| {
			let window = web_sys::window();
			if let (Some(id), Some(win)) = (frames.stop(), window.as_ref()) {
				let _ = win.cancel_animation_frame(id);
			}
			if let (Some(cb), Some(win)) = (resize_cb.borrow_mut().take(), window.as_ref()) {
				let _ = win.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
			animate.borrow_mut().take();
			debug!("graph canvas unmounted");
		});
	});

	let local_point = move |ev: &MouseEvent| -> Option<(f64, f64)> {
		let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
		let rect = canvas.get_bounding_client_rect();
		Some((
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		))
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(&ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.begin_interaction(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(&ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_moved(x, y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.end_interaction();
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.end_interaction();
			s.set_hover(None);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let mouse: &MouseEvent = &ev;
		let Some((x, y)) = local_point(mouse) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			s.zoom_at(x, y, factor);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn stopped_loop_hands_back_pending_frame_once() {
		let frames = FrameLoop::default();
		assert!(frames.is_running());
		assert_eq!(frames.stop(), None);

		let frames = FrameLoop::default();
		frames.scheduled(3);
		frames.scheduled(4);
		assert_eq!(frames.stop(), Some(4));
		assert!(!frames.is_running());
		assert_eq!(frames.stop(), None);
	}
}
