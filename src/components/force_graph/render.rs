use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::DefaultNodeIdx;
use web_sys::CanvasRenderingContext2d;

use super::state::{ForceGraphState, NodeInfo};
use super::types::RenderConfig;

/// Labels below the zoom threshold are skipped; at low zoom they only add clutter.
pub fn label_visible(scale: f64, config: &RenderConfig) -> bool {
	scale > config.label_zoom_threshold
}

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(&state.config.background_color);
	ctx.fill_rect(0.0, 0.0, state.viewport.width, state.viewport.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	let mut positions = HashMap::with_capacity(state.links.len());
	state.graph.visit_nodes(|node| {
		positions.insert(node.index(), (node.x() as f64, node.y() as f64));
	});
	draw_links(state, &positions, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_links(
	state: &ForceGraphState,
	positions: &HashMap<DefaultNodeIdx, (f64, f64)>,
	ctx: &CanvasRenderingContext2d,
) {
	for link in &state.links {
		let (Some(&(x1, y1)), Some(&(x2, y2))) =
			(positions.get(&link.source), positions.get(&link.target))
		else {
			continue;
		};
		let width = if state.is_link_hovered(link) {
			link.width * 1.5
		} else {
			link.width
		};
		ctx.set_stroke_style_str(&link.color);
		ctx.set_line_width(width);
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();
	}
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	state.graph.visit_nodes(|node| {
		let info = &node.data.user_data;
		let (x, y) = (node.x() as f64, node.y() as f64);
		paint_node(info, (x, y), ctx, k, &state.config);

		if state.is_hovered(node.index()) {
			ctx.begin_path();
			let _ = ctx.arc(x, y, info.radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&info.color);
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
			if !label_visible(k, &state.config) {
				ctx.set_fill_style_str(&info.color);
				ctx.set_font(&format!("{}px sans-serif", 12.0 / k));
				ctx.set_text_align("left");
				let _ = ctx.fill_text(&info.label, x + info.radius + 3.0 / k, y);
			}
		} else if state.is_neighbor(node.index()) {
			ctx.begin_path();
			let _ = ctx.arc(x, y, info.radius + 1.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&info.color);
			ctx.set_line_width(0.75 / k);
			ctx.stroke();
		}
	});
}

/// Paints one node: a filled circle of radius `node.radius`, and its centered
/// label when `scale` is above the configured threshold.
pub fn paint_node(
	node: &NodeInfo,
	(x, y): (f64, f64),
	ctx: &CanvasRenderingContext2d,
	scale: f64,
	config: &RenderConfig,
) {
	ctx.set_fill_style_str(&node.color);
	ctx.begin_path();
	let _ = ctx.arc(x, y, node.radius, 0.0, 2.0 * PI);
	ctx.fill();

	if label_visible(scale, config) {
		ctx.set_font(&format!("{}px sans-serif", 8.0 / scale));
		ctx.set_fill_style_str(&config.label_color);
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		let _ = ctx.fill_text(&node.label, x, y);
	}
}

#[cfg(test)]
mod tests {
	use super::super::state::MIN_ZOOM;
	use super::*;

	#[test]
	fn labels_follow_zoom_threshold() {
		let config = RenderConfig::default();
		assert!(!label_visible(0.3, &config));
		assert!(!label_visible(0.5, &config));
		assert!(label_visible(0.51, &config));
		let always = RenderConfig {
			label_zoom_threshold: 0.0,
			..RenderConfig::default()
		};
		assert!(label_visible(MIN_ZOOM, &always));
	}
}
