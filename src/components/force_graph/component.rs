use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, ResizeObserver, WheelEvent,
};

use super::render;
use super::scale::canvas_size;
use super::schedule::FitScheduler;
use super::state::{ForceGraphState, PointerRelease};
use super::types::RenderGraph;

/// Delay before fitting a new graph, so the layout has spread the nodes out.
pub const FIT_DELAY_MS: u64 = 400;

type SharedState = Rc<RefCell<Option<ForceGraphState>>>;
type AnimationSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Browser resources held by one mounted canvas, released on unmount.
#[derive(Default)]
struct Teardown {
	alive: Rc<Cell<bool>>,
	frame: Rc<Cell<Option<i32>>>,
	animate: AnimationSlot,
	state: SharedState,
	pending_fit: Rc<Cell<Option<TimeoutHandle>>>,
	observer: Option<(ResizeObserver, Closure<dyn FnMut()>)>,
}

impl Teardown {
	fn run(&mut self) {
		self.alive.set(false);
		if let Some(id) = self.frame.take() {
			if let Some(win) = web_sys::window() {
				let _ = win.cancel_animation_frame(id);
			}
		}
		// the frame closure holds its own slot; emptying it breaks the cycle
		self.animate.borrow_mut().take();
		if let Some(handle) = self.pending_fit.take() {
			handle.clear();
		}
		if let Some((ro, _)) = self.observer.take() {
			ro.disconnect();
		}
		self.state.borrow_mut().take();
	}
}

fn container_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	let (w, h) = canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.unwrap_or((800.0, 600.0));
	canvas_size(w, h)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<RenderGraph>,
	#[prop(into)] selected: Signal<Option<String>>,
	#[prop(into)] on_select: Callback<Option<String>>,
	#[prop(default = FIT_DELAY_MS)] fit_delay_ms: u64,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let size = Rc::new(Cell::new(canvas_size(0.0, 0.0)));
	let animate: AnimationSlot = Rc::new(RefCell::new(None));
	let frame: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
	let alive = Rc::new(Cell::new(true));
	let pending_fit: Rc<Cell<Option<TimeoutHandle>>> = Rc::new(Cell::new(None));
	let teardown = StoredValue::new_local(Teardown {
		alive: alive.clone(),
		frame: frame.clone(),
		animate: animate.clone(),
		state: state.clone(),
		pending_fit: pending_fit.clone(),
		observer: None,
	});

	// one-time canvas setup: sizing, resize observation, animation loop
	let (state_init, size_init, animate_init, alive_init) =
		(state.clone(), size.clone(), animate.clone(), alive.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if animate_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(ctx) = context_2d(&canvas) else {
			warn!("canvas has no 2d context");
			return;
		};

		let (w, h) = container_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		size_init.set((w, h));
		if let Some(ref mut s) = *state_init.borrow_mut() {
			s.resize(w, h);
		}

		let (state_resize, size_resize, canvas_resize) =
			(state_init.clone(), size_init.clone(), canvas.clone());
		let on_resize = Closure::<dyn FnMut()>::new(move || {
			let (nw, nh) = container_size(&canvas_resize);
			if (nw, nh) == size_resize.get() {
				return;
			}
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			size_resize.set((nw, nh));
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		});
		match (
			ResizeObserver::new(on_resize.as_ref().unchecked_ref()),
			canvas.parent_element(),
		) {
			(Ok(ro), Some(parent)) => {
				ro.observe(&parent);
				teardown.update_value(|t| t.observer = Some((ro, on_resize)));
			}
			_ => warn!("resize observation unavailable; canvas keeps its initial size"),
		}

		let (state_anim, animate_inner, frame_anim) =
			(state_init.clone(), animate_init.clone(), frame.clone());
		let alive_anim = alive_init.clone();
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			frame_anim.set(None);
			if !alive_anim.get() {
				return;
			}
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.animation_running {
					s.tick(0.016);
				}
				render::render(s, &ctx);
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let id = win.request_animation_frame(cb.as_ref().unchecked_ref());
				frame_anim.set(id.ok());
			}
		}));
		if let (Some(cb), Some(win)) = (animate_init.borrow().as_ref(), web_sys::window()) {
			let id = win.request_animation_frame(cb.as_ref().unchecked_ref());
			frame.set(id.ok());
		}
	});

	// rebuild the layout whenever the graph changes, then fit once it has settled
	let scheduler = Rc::new(FitScheduler::default());
	let (state_data, size_data, alive_data) = (state.clone(), size.clone(), alive.clone());
	Effect::new(move |_| {
		let graph = data.get();
		let (w, h) = size_data.get();
		let mut next = ForceGraphState::new(&graph, w, h);
		next.set_selected_id(selected.get_untracked().as_deref());
		debug!(
			"layout rebuilt with {} nodes and {} links, fit in {}ms",
			next.node_count(),
			next.edge_count(),
			fit_delay_ms
		);
		*state_data.borrow_mut() = Some(next);

		if let Some(handle) = pending_fit.take() {
			handle.clear();
		}
		let ticket = scheduler.schedule();
		let (state_fit, scheduler_fit, alive_fit) =
			(state_data.clone(), scheduler.clone(), alive_data.clone());
		match set_timeout_with_handle(
			move || {
				if !alive_fit.get() || !scheduler_fit.is_current(ticket) {
					return;
				}
				if let Some(ref mut s) = *state_fit.borrow_mut() {
					s.fit_to_view();
				}
			},
			Duration::from_millis(fit_delay_ms),
		) {
			Ok(handle) => pending_fit.set(Some(handle)),
			Err(_) => warn!("could not schedule fit-to-view"),
		}
	});

	let state_sel = state.clone();
	Effect::new(move |_| {
		let id = selected.get();
		if let Some(ref mut s) = *state_sel.borrow_mut() {
			s.set_selected_id(id.as_deref());
		}
	});

	on_cleanup(move || {
		teardown.try_update_value(Teardown::run);
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.press(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_move(x, y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		let outcome = state_mu.borrow_mut().as_mut().map(|s| s.release());
		match outcome {
			Some(PointerRelease::NodeClick(id)) => on_select.run(Some(id)),
			Some(PointerRelease::BackgroundClick) => on_select.run(None),
			Some(PointerRelease::Drag) | None => {}
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.cancel_pointer();
			s.set_hover(None);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.zoom_at(x, y, ev.delta_y() < 0.0);
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
