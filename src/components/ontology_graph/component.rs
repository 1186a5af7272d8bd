//! Canvas component owning the simulation lifecycle.
//!
//! Exactly one scene is live per mounted component. A new snapshot disposes
//! the previous scene and its animation-frame loop before anything is
//! rebuilt; unmounting stops the loop and removes the window resize
//! listener.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::__reexports::send_wrapper::SendWrapper;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render;
use super::state::GraphScene;
use crate::model::{GraphNode, GraphSnapshot};

const FALLBACK_WIDTH: f64 = 800.0;
const FALLBACK_HEIGHT: f64 = 600.0;

type SharedScene = Rc<RefCell<Option<GraphScene>>>;
type SharedClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Interactive force-directed view of an ontology snapshot. `selected`
/// mirrors the scene's selection so surrounding views can show details.
#[component]
pub fn OntologyGraphCanvas(
	#[prop(into)] snapshot: Signal<GraphSnapshot>,
	selected: RwSignal<Option<GraphNode>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let scene: SharedScene = Rc::new(RefCell::new(None));
	let animate: SharedClosure = Rc::new(RefCell::new(None));
	let resize_cb: SharedClosure = Rc::new(RefCell::new(None));
	let raf_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));

	// Rebuild whenever a snapshot arrives; dispose-before-rebuild keeps a
	// single live simulation per canvas.
	{
		let (scene, animate, raf_id) = (scene.clone(), animate.clone(), raf_id.clone());
		Effect::new(move |_| {
			let data = snapshot.get();
			// Not mounted yet: a timing guard, not a failure. The effect
			// re-runs once the node ref is populated.
			let Some(canvas) = canvas_ref.get() else {
				return;
			};
			let canvas: HtmlCanvasElement = canvas.into();

			stop_animation(&animate, &raf_id);
			*scene.borrow_mut() = None;

			if data.nodes.is_empty() {
				return;
			}

			let (w, h) = measure(&canvas);
			canvas.set_width(w as u32);
			canvas.set_height(h as u32);
			let ctx: CanvasRenderingContext2d = canvas
				.get_context("2d")
				.unwrap()
				.unwrap()
				.dyn_into()
				.unwrap();

			*scene.borrow_mut() = GraphScene::from_snapshot(&data, w, h);
			start_animation(&scene, &animate, &raf_id, ctx);
		});
	}

	// One window resize listener per mounted component.
	{
		let (scene, resize_cb) = (scene.clone(), resize_cb.clone());
		Effect::new(move |_| {
			let Some(canvas) = canvas_ref.get() else {
				return;
			};
			if resize_cb.borrow().is_some() {
				return;
			}
			let canvas: HtmlCanvasElement = canvas.into();
			let scene = scene.clone();
			let cb = Closure::new(move || {
				let (w, h) = measure(&canvas);
				if let Some(ref mut s) = *scene.borrow_mut() {
					canvas.set_width(w as u32);
					canvas.set_height(h as u32);
					s.resize(w, h);
				}
			});
			let _ = web_sys::window()
				.unwrap()
				.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			*resize_cb.borrow_mut() = Some(cb);
		});
	}

	{
		// leptos requires cleanup closures to be Send + Sync; the scene and
		// closure handles are !Send Rc values, so wrap them to satisfy the
		// bound. Access stays single-threaded (wasm CSR), so this never panics.
		let (scene, animate, raf_id, resize_cb) = (
			SendWrapper::new(scene.clone()),
			SendWrapper::new(animate.clone()),
			SendWrapper::new(raf_id.clone()),
			SendWrapper::new(resize_cb.clone()),
		);
		on_cleanup(move || {
			stop_animation(&animate, &raf_id);
			*scene.borrow_mut() = None;
			if let Some(cb) = resize_cb.borrow_mut().take() {
				if let Some(window) = web_sys::window() {
					let _ = window
						.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
			}
		});
	}

	let scene_down = scene.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *scene_down.borrow_mut() {
			// A node press selects; a background press clears. Never both in
			// one interaction.
			selected.set(s.pointer_down(x, y));
		}
	};

	let scene_move = scene.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *scene_move.borrow_mut() {
			s.pointer_move(x, y);
		}
	};

	let scene_up = scene.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *scene_up.borrow_mut() {
			s.pointer_up();
		}
	};

	let scene_leave = scene.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *scene_leave.borrow_mut() {
			s.pointer_leave();
		}
	};

	let scene_wheel = scene.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *scene_wheel.borrow_mut() {
			s.zoom(x, y, ev.delta_y());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="ontology-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}

/// Container size with fixed fallbacks for a not-yet-laid-out container.
fn measure(canvas: &HtmlCanvasElement) -> (f64, f64) {
	let parent = canvas.parent_element();
	let w = parent.as_ref().map(|p| p.client_width() as f64).unwrap_or(0.0);
	let h = parent.as_ref().map(|p| p.client_height() as f64).unwrap_or(0.0);
	(
		if w > 0.0 { w } else { FALLBACK_WIDTH },
		if h > 0.0 { h } else { FALLBACK_HEIGHT },
	)
}

fn pointer_position(
	canvas_ref: NodeRef<leptos::html::Canvas>,
	ev: &MouseEvent,
) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn start_animation(
	scene: &SharedScene,
	animate: &SharedClosure,
	raf_id: &Rc<Cell<Option<i32>>>,
	ctx: CanvasRenderingContext2d,
) {
	let scene = scene.clone();
	let animate_inner = animate.clone();
	let raf_inner = raf_id.clone();
	*animate.borrow_mut() = Some(Closure::new(move || {
		if let Some(ref mut s) = *scene.borrow_mut() {
			s.tick(0.016);
			render::render(s, &ctx);
		}
		if let Some(ref cb) = *animate_inner.borrow() {
			raf_inner.set(
				web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref())
					.ok(),
			);
		}
	}));
	if let Some(ref cb) = *animate.borrow() {
		raf_id.set(
			web_sys::window()
				.unwrap()
				.request_animation_frame(cb.as_ref().unchecked_ref())
				.ok(),
		);
	}
}

/// Cancel the pending frame and drop the loop closure. Dropping outside the
/// closure's own call is what makes the rebuild safe from duplicate ticks.
fn stop_animation(animate: &SharedClosure, raf_id: &Rc<Cell<Option<i32>>>) {
	if let Some(id) = raf_id.take() {
		if let Some(window) = web_sys::window() {
			let _ = window.cancel_animation_frame(id);
		}
	}
	*animate.borrow_mut() = None;
}
