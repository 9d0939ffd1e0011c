use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::ForceGraphState;

const BACKGROUND: &str = "#1a1a2e";
const TOPIC_FILL: &str = "#ff7f0e";
const RELATED_FILL: &str = "#1f77b4";
const SELECTED_FILL: &str = "#e63946";
const PLAQUE_FILL: &str = "rgba(10, 10, 25, 0.7)";

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	draw_relation_labels(state, ctx);
	ctx.restore();
}

fn font_px(state: &ForceGraphState, base: f64) -> f64 {
	base / state.transform.k.max(0.5)
}

/// Text centred horizontally on `x`, top edge at `y`, over a translucent plaque.
fn draw_plaque_text(
	ctx: &CanvasRenderingContext2d,
	text: &str,
	x: f64,
	y: f64,
	size: f64,
	color: &str,
) {
	ctx.set_font(&format!("{}px sans-serif", size));
	let width = ctx
		.measure_text(text)
		.map(|m| m.width())
		.unwrap_or(text.len() as f64 * size * 0.6);
	let pad = size * 0.3;
	ctx.set_fill_style_str(PLAQUE_FILL);
	let (left, top) = (x - width / 2.0 - pad, y - pad * 0.5);
	ctx.fill_rect(left, top, width + pad * 2.0, size + pad);
	ctx.set_fill_style_str(color);
	ctx.set_text_align("center");
	ctx.set_text_baseline("top");
	let _ = ctx.fill_text(text, x, y);
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let (line_width, dash, gap, arrow_size) = (1.5 / k, 8.0 / k, 4.0 / k, 8.0 / k);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);
	let t = ease_out_cubic(state.hover.highlight_t);

	state.graph.visit_edges(|n1, n2, _| {
		let (x1, y1, x2, y2) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			return;
		}
		let r1 = state.node_radius(&n1.data.user_data, n1.index());
		let r2 = state.node_radius(&n2.data.user_data, n2.index());

		let is_highlighted = state.is_highlighted(n1.index()) && state.is_highlighted(n2.index());

		// t=0: every edge at base alpha; t=1: highlighted edges brighten, others dim
		let (edge_alpha, arrow_alpha, width) = if is_highlighted {
			(0.6 + 0.3 * t, 0.8 + 0.1 * t, line_width * (1.0 + 0.3 * t))
		} else {
			(0.6 - 0.45 * t, 0.8 - 0.45 * t, line_width * (1.0 - 0.3 * t))
		};

		ctx.set_stroke_style_str(&format!("rgba(100, 180, 255, {})", edge_alpha));
		ctx.set_line_width(width);
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(dash),
			&JsValue::from_f64(gap),
		));
		ctx.set_line_dash_offset(dash_offset);

		let (ux, uy) = (dx / dist, dy / dist);
		ctx.begin_path();
		ctx.move_to(x1 + ux * r1, y1 + uy * r1);
		ctx.line_to(x2 - ux * (r2 + arrow_size), y2 - uy * (r2 + arrow_size));
		ctx.stroke();

		let _ = ctx.set_line_dash(&js_sys::Array::new());
		ctx.set_fill_style_str(&format!("rgba(100, 180, 255, {})", arrow_alpha));
		let (tip_x, tip_y) = (x2 - ux * r2, y2 - uy * r2);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	});
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

/// Relation text at each link's midpoint, drawn last so nodes never cover it.
fn draw_relation_labels(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let size = font_px(state, 9.0);
	let t = ease_out_cubic(state.hover.highlight_t);
	state.graph.visit_edges(|n1, n2, edge| {
		let Some(relation) = edge.user_data.relation.as_deref() else {
			return;
		};
		if relation.is_empty() {
			return;
		}
		let highlighted = state.is_highlighted(n1.index()) && state.is_highlighted(n2.index());
		let alpha = if highlighted { 0.9 } else { 0.9 - 0.6 * t };
		let (mx, my) = (
			(n1.x() as f64 + n2.x() as f64) / 2.0,
			(n1.y() as f64 + n2.y() as f64) / 2.0,
		);
		draw_plaque_text(
			ctx,
			relation,
			mx,
			my - size / 2.0,
			size,
			&format!("rgba(190, 220, 255, {})", alpha),
		);
	});
}

fn node_fill(
	state: &ForceGraphState,
	is_topic: bool,
	idx: force_graph::DefaultNodeIdx,
) -> &'static str {
	if state.is_selected(idx) {
		SELECTED_FILL
	} else if is_topic {
		TOPIC_FILL
	} else {
		RELATED_FILL
	}
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let (has_highlight, t) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
	);
	let size = font_px(state, 10.0);

	// dimmed pass first, highlighted nodes on top
	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if has_highlight && state.is_highlighted(idx) {
			return;
		}
		let info = &node.data.user_data;
		let (x, y) = (node.x() as f64, node.y() as f64);
		let base = state.node_radius(info, idx);
		let (alpha, radius) = (1.0 - 0.7 * t, base * (1.0 - 0.15 * t));

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node_fill(state, info.is_topic, idx));
		ctx.fill();
		draw_plaque_text(ctx, &info.name, x, y + radius + 3.0, size, "white");
		ctx.set_global_alpha(1.0);
	});

	if !has_highlight {
		return;
	}

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if !state.is_highlighted(idx) {
			return;
		}
		let info = &node.data.user_data;
		let (x, y) = (node.x() as f64, node.y() as f64);
		let base = state.node_radius(info, idx);
		let is_hovered = state.is_hovered(idx);
		let is_neighbor =
			state.hover.neighbors.contains(&idx) || state.hover.prev_neighbors.contains(&idx);

		let (radius, glow_radius) = if is_hovered {
			(base * (1.0 + 0.35 * t), base * (1.8 + 1.2 * t))
		} else if is_neighbor {
			(base * (1.0 + 0.2 * t), base * (1.4 + 0.6 * t))
		} else {
			(base, 0.0)
		};

		if glow_radius > 0.0 && t > 0.01 {
			let gradient = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, glow_radius);
			if let Ok(gradient) = gradient {
				let alpha = if is_hovered { 0.35 * t } else { 0.2 * t };
				let inner = format!("rgba(255, 255, 255, {})", alpha);
				let mid = format!("rgba(200, 220, 255, {})", alpha * 0.3);
				let _ = gradient.add_color_stop(0.0, &inner);
				let _ = gradient.add_color_stop(0.6, &mid);
				let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
				ctx.begin_path();
				let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node_fill(state, info.is_topic, idx));
		ctx.fill();

		if is_hovered && t > 0.01 {
			let k = state.transform.k;
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * t));
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		draw_plaque_text(ctx, &info.name, x, y + radius + 3.0, size, "white");
	});
}
