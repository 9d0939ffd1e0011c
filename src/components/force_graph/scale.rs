//! Viewport math shared by the canvas and its event handlers.

use super::state::ViewTransform;

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;

/// Canvas never shrinks below this, even inside a collapsed container.
pub const MIN_CANVAS_WIDTH: f64 = 320.0;
pub const MIN_CANVAS_HEIGHT: f64 = 240.0;

pub fn clamp_zoom(k: f64) -> f64 {
	k.clamp(MIN_ZOOM, MAX_ZOOM)
}

pub fn canvas_size(width: f64, height: f64) -> (f64, f64) {
	(
		width.max(MIN_CANVAS_WIDTH).floor(),
		height.max(MIN_CANVAS_HEIGHT).floor(),
	)
}

/// Axis-aligned box in graph space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub min_x: f64,
	pub min_y: f64,
	pub max_x: f64,
	pub max_y: f64,
}

impl Bounds {
	/// Smallest box holding every circle `(x, y, r)`. `None` for no points.
	pub fn around(circles: impl IntoIterator<Item = (f64, f64, f64)>) -> Option<Self> {
		circles.into_iter().fold(None, |acc, (x, y, r)| {
			let b = Self {
				min_x: x - r,
				min_y: y - r,
				max_x: x + r,
				max_y: y + r,
			};
			Some(match acc {
				None => b,
				Some(a) => Self {
					min_x: a.min_x.min(b.min_x),
					min_y: a.min_y.min(b.min_y),
					max_x: a.max_x.max(b.max_x),
					max_y: a.max_y.max(b.max_y),
				},
			})
		})
	}

	pub fn width(&self) -> f64 {
		self.max_x - self.min_x
	}

	pub fn height(&self) -> f64 {
		self.max_y - self.min_y
	}

	pub fn center(&self) -> (f64, f64) {
		(
			(self.min_x + self.max_x) / 2.0,
			(self.min_y + self.max_y) / 2.0,
		)
	}
}

/// Transform that centres `bounds` in a `width`×`height` viewport with
/// `padding` screen pixels on every side. Never zooms past 1:1 so tiny graphs
/// are not blown up.
pub fn fit_transform(bounds: Bounds, width: f64, height: f64, padding: f64) -> ViewTransform {
	let avail_w = (width - 2.0 * padding).max(1.0);
	let avail_h = (height - 2.0 * padding).max(1.0);
	let k = if bounds.width() <= f64::EPSILON && bounds.height() <= f64::EPSILON {
		1.0
	} else {
		(avail_w / bounds.width().max(f64::EPSILON))
			.min(avail_h / bounds.height().max(f64::EPSILON))
			.min(1.0)
	};
	let k = clamp_zoom(k);
	let (cx, cy) = bounds.center();
	ViewTransform {
		x: width / 2.0 - cx * k,
		y: height / 2.0 - cy * k,
		k,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn canvas_size_has_a_floor() {
		assert_eq!(canvas_size(0.0, 0.0), (MIN_CANVAS_WIDTH, MIN_CANVAS_HEIGHT));
		assert_eq!(canvas_size(1024.7, 768.2), (1024.0, 768.0));
	}

	#[test]
	fn bounds_include_radius() {
		let b = Bounds::around([(0.0, 0.0, 5.0), (100.0, 50.0, 5.0)]).unwrap();
		assert_eq!(
			b,
			Bounds {
				min_x: -5.0,
				min_y: -5.0,
				max_x: 105.0,
				max_y: 55.0
			}
		);
		assert_eq!(Bounds::around(std::iter::empty()), None);
	}

	#[test]
	fn fit_centres_and_shrinks_large_graphs() {
		let b = Bounds {
			min_x: -1000.0,
			min_y: -500.0,
			max_x: 1000.0,
			max_y: 500.0,
		};
		let t = fit_transform(b, 800.0, 600.0, 40.0);
		assert!((t.k - 0.36).abs() < 1e-9);
		// graph centre lands on the viewport centre
		assert!((t.x - 400.0).abs() < 1e-9);
		assert!((t.y - 300.0).abs() < 1e-9);
	}

	#[test]
	fn fit_does_not_magnify_small_graphs() {
		let b = Bounds::around([(10.0, 10.0, 5.0)]).unwrap();
		let t = fit_transform(b, 800.0, 600.0, 40.0);
		assert_eq!(t.k, 1.0);
		assert_eq!((t.x, t.y), (390.0, 290.0));
	}
}
