//! Canvas painting for the ontology graph.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::{GraphScene, NODE_RADIUS};

const BACKGROUND: &str = "#141824";
const EDGE_COLOR: (u8, u8, u8) = (110, 160, 220);
const SELECTION_COLOR: &str = "#ffd166";

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Repaint every bound element from the bodies' current positions.
pub fn render(scene: &GraphScene, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, scene.width, scene.height);
	ctx.save();
	let _ = ctx.translate(scene.transform.x, scene.transform.y);
	let _ = ctx.scale(scene.transform.k, scene.transform.k);
	draw_edges(scene, ctx);
	draw_nodes(scene, ctx);
	ctx.restore();
}

fn draw_edges(scene: &GraphScene, ctx: &CanvasRenderingContext2d) {
	let k = scene.transform.k;
	let (line_width, arrow_size) = (1.5 / k, 7.0 / k);
	let t = ease_out_cubic(scene.highlight_t());
	let (r, g, b) = EDGE_COLOR;

	scene.graph.visit_edges(|n1, n2, _| {
		let (x1, y1, x2, y2) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			return;
		}

		// While hovering, edges between highlighted nodes brighten and the
		// rest recede.
		let emphasized = scene.is_highlighted(n1.index()) && scene.is_highlighted(n2.index());
		let (alpha, width) = if emphasized {
			(0.55 + 0.35 * t, line_width * (1.0 + 0.4 * t))
		} else {
			(0.55 - 0.4 * t, line_width)
		};

		let (ux, uy) = (dx / dist, dy / dist);
		ctx.set_stroke_style_str(&format!("rgba({r}, {g}, {b}, {alpha})"));
		ctx.set_line_width(width);
		ctx.begin_path();
		ctx.move_to(x1 + ux * NODE_RADIUS, y1 + uy * NODE_RADIUS);
		ctx.line_to(
			x2 - ux * (NODE_RADIUS + arrow_size),
			y2 - uy * (NODE_RADIUS + arrow_size),
		);
		ctx.stroke();

		// Arrowhead marks the relationship direction, source to target.
		let (tip_x, tip_y) = (x2 - ux * NODE_RADIUS, y2 - uy * NODE_RADIUS);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.set_fill_style_str(&format!("rgba({r}, {g}, {b}, {alpha})"));
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	});
}

fn draw_nodes(scene: &GraphScene, ctx: &CanvasRenderingContext2d) {
	let has_highlight = scene.has_active_highlight();
	let t = ease_out_cubic(scene.highlight_t());
	let k = scene.transform.k;

	scene.graph.visit_nodes(|node| {
		let idx = node.index();
		let (x, y) = (node.x() as f64, node.y() as f64);
		let emphasized = scene.is_highlighted(idx);

		// Non-highlighted nodes recede while a hover is active.
		let alpha = if has_highlight && !emphasized { 1.0 - 0.65 * t } else { 1.0 };
		let radius = if scene.is_hovered(idx) {
			NODE_RADIUS * (1.0 + 0.3 * t)
		} else {
			NODE_RADIUS
		};

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node.data.user_data.color);
		ctx.fill();

		if scene.is_selected(idx) {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 3.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(SELECTION_COLOR);
			ctx.set_line_width(2.0 / k);
			ctx.stroke();
		} else if scene.is_hovered(idx) && t > 0.01 {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * t));
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		let name = &node.data.user_data.node.name;
		if !name.is_empty() {
			ctx.set_fill_style_str(&format!("rgba(235, 240, 250, {})", alpha * 0.85));
			ctx.set_font(&format!("{}px sans-serif", 11.0 / k.max(0.5)));
			let _ = ctx.fill_text(name, x + radius + 4.0, y + 3.5);
		}
		ctx.set_global_alpha(1.0);
	});
}
